/*
 * Copyright (C) 2022 The Android Open Source Project
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Fixed-size arrays in parcelables and over binder.

use super::enums::{ByteEnum, IntEnum, LongEnum};
use super::{read_reply_status, write_reply};
use crate::binder::{Interface, TransactionCode};
use crate::error::{Result, StatusCode};
use crate::parcel::{Deserialize, Parcel, Parcelable, ParcelableMetadata, Serialize};
use crate::SpIBinder;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntParcelable {
    pub value: i32,
}

impl Parcelable for IntParcelable {
    fn write_to_parcel(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.sized_write(|subparcel| subparcel.write(&self.value))
    }

    fn read_from_parcel(&mut self, parcel: &Parcel) -> Result<()> {
        parcel.sized_read(|subparcel| {
            if subparcel.has_more_data() {
                self.value = subparcel.read()?;
            }
            Ok(())
        })
    }
}

crate::impl_serialize_for_parcelable!(IntParcelable);
crate::impl_deserialize_for_parcelable!(IntParcelable);

impl ParcelableMetadata for IntParcelable {
    fn get_descriptor() -> &'static str {
        "android.aidl.fixedsizearray.FixedSizeArrayExample.IntParcelable"
    }
}

/// One field per fixed-size array shape the codec supports.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FixedSizeArrayExample {
    pub int_2x3: [[i32; 3]; 2],
    pub bool_array: [bool; 2],
    pub byte_array: [u8; 2],
    pub int_array: [i32; 2],
    pub long_array: [i64; 2],
    pub float_array: [f32; 2],
    pub double_array: [f64; 2],
    pub string_array: [String; 2],
    pub byte_enum_array: [ByteEnum; 2],
    pub int_enum_array: [IntEnum; 2],
    pub long_enum_array: [LongEnum; 2],
    pub parcelable_array: [IntParcelable; 2],
    pub bool_matrix: [[bool; 2]; 2],
    pub byte_matrix: [[u8; 2]; 2],
    pub int_matrix: [[i32; 2]; 2],
    pub long_matrix: [[i64; 2]; 2],
    pub float_matrix: [[f32; 2]; 2],
    pub double_matrix: [[f64; 2]; 2],
    pub string_matrix: [[String; 2]; 2],
    pub byte_enum_matrix: [[ByteEnum; 2]; 2],
    pub parcelable_matrix: [[IntParcelable; 2]; 2],
    pub bool_nullable_array: Option<[bool; 2]>,
    pub byte_nullable_array: Option<[u8; 2]>,
    pub string_nullable_array: Option<[Option<String>; 2]>,
    pub parcelable_nullable_array: Option<[Option<IntParcelable>; 2]>,
    pub bool_nullable_matrix: Option<[[bool; 2]; 2]>,
    pub byte_nullable_matrix: Option<[[u8; 2]; 2]>,
    pub string_nullable_matrix: Option<[[Option<String>; 2]; 2]>,
}

impl Parcelable for FixedSizeArrayExample {
    fn write_to_parcel(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.sized_write(|subparcel| {
            subparcel.write(&self.int_2x3)?;
            subparcel.write(&self.bool_array)?;
            subparcel.write(&self.byte_array)?;
            subparcel.write(&self.int_array)?;
            subparcel.write(&self.long_array)?;
            subparcel.write(&self.float_array)?;
            subparcel.write(&self.double_array)?;
            subparcel.write(&self.string_array)?;
            subparcel.write(&self.byte_enum_array)?;
            subparcel.write(&self.int_enum_array)?;
            subparcel.write(&self.long_enum_array)?;
            subparcel.write(&self.parcelable_array)?;
            subparcel.write(&self.bool_matrix)?;
            subparcel.write(&self.byte_matrix)?;
            subparcel.write(&self.int_matrix)?;
            subparcel.write(&self.long_matrix)?;
            subparcel.write(&self.float_matrix)?;
            subparcel.write(&self.double_matrix)?;
            subparcel.write(&self.string_matrix)?;
            subparcel.write(&self.byte_enum_matrix)?;
            subparcel.write(&self.parcelable_matrix)?;
            subparcel.write(&self.bool_nullable_array)?;
            subparcel.write(&self.byte_nullable_array)?;
            subparcel.write(&self.string_nullable_array)?;
            subparcel.write(&self.parcelable_nullable_array)?;
            subparcel.write(&self.bool_nullable_matrix)?;
            subparcel.write(&self.byte_nullable_matrix)?;
            subparcel.write(&self.string_nullable_matrix)
        })
    }

    fn read_from_parcel(&mut self, parcel: &Parcel) -> Result<()> {
        parcel.sized_read(|subparcel| {
            macro_rules! read_fields {
                ($sub:ident => $this:ident { $($field:ident),* $(,)? }) => {
                    $(
                        if !$sub.has_more_data() {
                            return Ok(());
                        }
                        $this.$field = $sub.read()?;
                    )*
                };
            }

            read_fields!(subparcel => self {
                int_2x3,
                bool_array,
                byte_array,
                int_array,
                long_array,
                float_array,
                double_array,
                string_array,
                byte_enum_array,
                int_enum_array,
                long_enum_array,
                parcelable_array,
                bool_matrix,
                byte_matrix,
                int_matrix,
                long_matrix,
                float_matrix,
                double_matrix,
                string_matrix,
                byte_enum_matrix,
                parcelable_matrix,
                bool_nullable_array,
                byte_nullable_array,
                string_nullable_array,
                parcelable_nullable_array,
                bool_nullable_matrix,
                byte_nullable_matrix,
                string_nullable_matrix,
            });
            Ok(())
        })
    }
}

crate::impl_serialize_for_parcelable!(FixedSizeArrayExample);
crate::impl_deserialize_for_parcelable!(FixedSizeArrayExample);

impl ParcelableMetadata for FixedSizeArrayExample {
    fn get_descriptor() -> &'static str {
        "android.aidl.fixedsizearray.FixedSizeArrayExample"
    }
}

/// Every method stores its input in `repeated` and returns it.
pub trait IRepeatFixedSizeArray: Interface {
    fn repeat_bytes(&self, input: &[u8; 3], repeated: &mut [u8; 3]) -> crate::Result<[u8; 3]>;
    fn repeat_ints(&self, input: &[i32; 3], repeated: &mut [i32; 3]) -> crate::Result<[i32; 3]>;
    fn repeat_binders(
        &self,
        input: &[SpIBinder; 3],
        repeated: &mut [SpIBinder; 3],
    ) -> crate::Result<[SpIBinder; 3]>;
    fn repeat_parcelables(
        &self,
        input: &[IntParcelable; 3],
        repeated: &mut [IntParcelable; 3],
    ) -> crate::Result<[IntParcelable; 3]>;
    fn repeat_2d_bytes(
        &self,
        input: &[[u8; 3]; 2],
        repeated: &mut [[u8; 3]; 2],
    ) -> crate::Result<[[u8; 3]; 2]>;
    fn repeat_2d_ints(
        &self,
        input: &[[i32; 3]; 2],
        repeated: &mut [[i32; 3]; 2],
    ) -> crate::Result<[[i32; 3]; 2]>;
    fn repeat_2d_binders(
        &self,
        input: &[[SpIBinder; 3]; 2],
        repeated: &mut [[SpIBinder; 3]; 2],
    ) -> crate::Result<[[SpIBinder; 3]; 2]>;
    fn repeat_2d_parcelables(
        &self,
        input: &[[IntParcelable; 3]; 2],
        repeated: &mut [[IntParcelable; 3]; 2],
    ) -> crate::Result<[[IntParcelable; 3]; 2]>;
}

pub mod transactions {
    use crate::binder::{TransactionCode, FIRST_CALL_TRANSACTION};

    pub const REPEAT_BYTES: TransactionCode = FIRST_CALL_TRANSACTION;
    pub const REPEAT_INTS: TransactionCode = FIRST_CALL_TRANSACTION + 1;
    pub const REPEAT_BINDERS: TransactionCode = FIRST_CALL_TRANSACTION + 2;
    pub const REPEAT_PARCELABLES: TransactionCode = FIRST_CALL_TRANSACTION + 3;
    pub const REPEAT_2D_BYTES: TransactionCode = FIRST_CALL_TRANSACTION + 4;
    pub const REPEAT_2D_INTS: TransactionCode = FIRST_CALL_TRANSACTION + 5;
    pub const REPEAT_2D_BINDERS: TransactionCode = FIRST_CALL_TRANSACTION + 6;
    pub const REPEAT_2D_PARCELABLES: TransactionCode = FIRST_CALL_TRANSACTION + 7;
}

declare_binder_interface! {
    IRepeatFixedSizeArray["android.aidl.fixedsizearray.FixedSizeArrayExample.IRepeatFixedSizeArray"] {
        native: BnRepeatFixedSizeArray(on_transact),
        proxy: BpRepeatFixedSizeArray,
    }
}

impl BpRepeatFixedSizeArray {
    fn repeat<T: Serialize + Deserialize>(
        &self,
        code: TransactionCode,
        input: &T,
        repeated: &mut T,
    ) -> crate::Result<T> {
        let reply = self.binder.transact(code, 0, |data| data.write(input))?;
        read_reply_status(&reply)?;
        let value: T = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(value)
    }
}

impl IRepeatFixedSizeArray for BpRepeatFixedSizeArray {
    fn repeat_bytes(&self, input: &[u8; 3], repeated: &mut [u8; 3]) -> crate::Result<[u8; 3]> {
        self.repeat(transactions::REPEAT_BYTES, input, repeated)
    }

    fn repeat_ints(&self, input: &[i32; 3], repeated: &mut [i32; 3]) -> crate::Result<[i32; 3]> {
        self.repeat(transactions::REPEAT_INTS, input, repeated)
    }

    fn repeat_binders(
        &self,
        input: &[SpIBinder; 3],
        repeated: &mut [SpIBinder; 3],
    ) -> crate::Result<[SpIBinder; 3]> {
        self.repeat(transactions::REPEAT_BINDERS, input, repeated)
    }

    fn repeat_parcelables(
        &self,
        input: &[IntParcelable; 3],
        repeated: &mut [IntParcelable; 3],
    ) -> crate::Result<[IntParcelable; 3]> {
        self.repeat(transactions::REPEAT_PARCELABLES, input, repeated)
    }

    fn repeat_2d_bytes(
        &self,
        input: &[[u8; 3]; 2],
        repeated: &mut [[u8; 3]; 2],
    ) -> crate::Result<[[u8; 3]; 2]> {
        self.repeat(transactions::REPEAT_2D_BYTES, input, repeated)
    }

    fn repeat_2d_ints(
        &self,
        input: &[[i32; 3]; 2],
        repeated: &mut [[i32; 3]; 2],
    ) -> crate::Result<[[i32; 3]; 2]> {
        self.repeat(transactions::REPEAT_2D_INTS, input, repeated)
    }

    fn repeat_2d_binders(
        &self,
        input: &[[SpIBinder; 3]; 2],
        repeated: &mut [[SpIBinder; 3]; 2],
    ) -> crate::Result<[[SpIBinder; 3]; 2]> {
        self.repeat(transactions::REPEAT_2D_BINDERS, input, repeated)
    }

    fn repeat_2d_parcelables(
        &self,
        input: &[[IntParcelable; 3]; 2],
        repeated: &mut [[IntParcelable; 3]; 2],
    ) -> crate::Result<[[IntParcelable; 3]; 2]> {
        self.repeat(transactions::REPEAT_2D_PARCELABLES, input, repeated)
    }
}

fn on_transact(
    service: &dyn IRepeatFixedSizeArray,
    code: TransactionCode,
    data: &Parcel,
    reply: &mut Parcel,
) -> Result<()> {
    macro_rules! dispatch {
        ($method:ident($input:ident: $ty:ty) -> $initial:expr) => {{
            let $input: $ty = data.read()?;
            let mut repeated: $ty = $initial;
            let result = service.$method(&$input, &mut repeated);
            write_reply(reply, result, |reply| reply.write(&repeated))
        }};
    }

    // References have no default value, so their out slots start as a copy
    // of the input.
    match code {
        transactions::REPEAT_BYTES => dispatch!(repeat_bytes(input: [u8; 3]) -> [0; 3]),
        transactions::REPEAT_INTS => dispatch!(repeat_ints(input: [i32; 3]) -> [0; 3]),
        transactions::REPEAT_BINDERS => {
            dispatch!(repeat_binders(input: [SpIBinder; 3]) -> input.clone())
        }
        transactions::REPEAT_PARCELABLES => {
            dispatch!(repeat_parcelables(input: [IntParcelable; 3]) -> Default::default())
        }
        transactions::REPEAT_2D_BYTES => dispatch!(repeat_2d_bytes(input: [[u8; 3]; 2]) -> [[0; 3]; 2]),
        transactions::REPEAT_2D_INTS => dispatch!(repeat_2d_ints(input: [[i32; 3]; 2]) -> [[0; 3]; 2]),
        transactions::REPEAT_2D_BINDERS => {
            dispatch!(repeat_2d_binders(input: [[SpIBinder; 3]; 2]) -> input.clone())
        }
        transactions::REPEAT_2D_PARCELABLES => {
            dispatch!(repeat_2d_parcelables(input: [[IntParcelable; 3]; 2]) -> Default::default())
        }
        _ => Err(StatusCode::UNKNOWN_TRANSACTION),
    }
}
