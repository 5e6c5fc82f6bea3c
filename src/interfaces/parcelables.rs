/*
 * Copyright (C) 2021 The Android Open Source Project
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

//! Structured parcelables exchanged with the test service.
//!
//! Every body is written as a size-prefixed section. Readers stop at the
//! first field the section does not contain and keep the default for the
//! rest, so older and newer writers interoperate.

use super::enums::{ByteEnum, IntEnum, LongEnum};
use super::union::Union;
use crate::error::Result;
use crate::parcel::{
    Parcel, Parcelable, ParcelableMetadata, NON_NULL_PARCELABLE_FLAG, NULL_PARCELABLE_FLAG,
};
use crate::SpIBinder;
use std::fmt;

/// A parcelable with no fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Empty;

impl Parcelable for Empty {
    fn write_to_parcel(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.sized_write(|_| Ok(()))
    }

    fn read_from_parcel(&mut self, parcel: &Parcel) -> Result<()> {
        parcel.sized_read(|_| Ok(()))
    }
}

crate::impl_serialize_for_parcelable!(Empty);
crate::impl_deserialize_for_parcelable!(Empty);

impl ParcelableMetadata for Empty {
    fn get_descriptor() -> &'static str {
        "android.aidl.tests.ITestService.Empty"
    }
}

/// Singly linked list of integers.
///
/// Operations on the chain iterate instead of recursing, so a list may be as
/// deep as memory allows.
#[derive(Default)]
pub struct RecursiveList {
    pub value: i32,
    pub next: Option<Box<RecursiveList>>,
}

impl RecursiveList {
    fn nodes(&self) -> impl Iterator<Item = &RecursiveList> {
        std::iter::successors(Some(self), |node| node.next.as_deref())
    }

    /// Iterate over the values from this node to the end of the list.
    pub fn values(&self) -> impl Iterator<Item = i32> + '_ {
        self.nodes().map(|node| node.value)
    }
}

impl Clone for RecursiveList {
    fn clone(&self) -> Self {
        let mut head = RecursiveList { value: self.value, next: None };
        let mut tail = &mut head.next;
        for value in self.values().skip(1) {
            tail = &mut tail.insert(Box::new(RecursiveList { value, next: None })).next;
        }
        head
    }
}

impl PartialEq for RecursiveList {
    fn eq(&self, other: &Self) -> bool {
        self.values().eq(other.values())
    }
}

impl Eq for RecursiveList {}

impl fmt::Debug for RecursiveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursiveList").field("values", &self.values().collect::<Vec<_>>()).finish()
    }
}

impl Drop for RecursiveList {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}

// Every node's section encloses the rest of the list. Sections are opened
// head first and closed tail first.
impl Parcelable for RecursiveList {
    fn write_to_parcel(&self, parcel: &mut Parcel) -> Result<()> {
        let mut starts = Vec::new();
        for node in self.nodes() {
            starts.push(parcel.begin_sized_write()?);
            parcel.write(&node.value)?;
            let flag =
                if node.next.is_some() { NON_NULL_PARCELABLE_FLAG } else { NULL_PARCELABLE_FLAG };
            parcel.write(&flag)?;
        }
        for start in starts.into_iter().rev() {
            parcel.end_sized_write(start)?;
        }
        Ok(())
    }

    fn read_from_parcel(&mut self, parcel: &Parcel) -> Result<()> {
        let mut ends = Vec::new();
        let mut node = self;
        loop {
            let subparcel = parcel.begin_sized_read()?;
            ends.push(subparcel.end_position());
            if subparcel.has_more_data() {
                node.value = subparcel.read()?;
            }
            if !subparcel.has_more_data() {
                break;
            }
            if subparcel.read::<i32>()? == NULL_PARCELABLE_FLAG {
                node.next = None;
                break;
            }
            node = &mut **node.next.insert(Box::default());
        }
        for end in ends.into_iter().rev() {
            parcel.end_sized_read(end)?;
        }
        Ok(())
    }
}

crate::impl_serialize_for_parcelable!(RecursiveList);
crate::impl_deserialize_for_parcelable!(RecursiveList);

impl ParcelableMetadata for RecursiveList {
    fn get_descriptor() -> &'static str {
        "android.aidl.tests.RecursiveList"
    }
}

/// Parcelable covering every field kind, with declared defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredParcelable {
    pub should_contain_three_fs: Vec<i32>,
    pub f: i32,
    pub should_be_jerry: String,
    pub should_be_byte_bar: ByteEnum,
    pub should_be_int_bar: IntEnum,
    pub should_be_long_bar: LongEnum,
    pub should_contain_two_byte_foos: Vec<ByteEnum>,
    pub should_contain_two_int_foos: Vec<IntEnum>,
    pub should_contain_two_long_foos: Vec<LongEnum>,
    pub string_defaults_to_foo: String,
    pub byte_defaults_to_four: i8,
    pub int_defaults_to_five: i32,
    pub long_defaults_to_negative_seven: i64,
    pub boolean_defaults_to_true: bool,
    pub char_defaults_to_c: u16,
    pub float_defaults_to_pi: f32,
    pub double_with_default: f64,
    pub array_defaults_to_123: Vec<i32>,
    pub array_defaults_to_empty: Vec<i32>,
    pub bool_default: bool,
    pub byte_default: i8,
    pub int_default: i32,
    pub long_default: i64,
    pub float_default: f32,
    pub double_default: f64,
    pub int32_min: i32,
    pub int32_max: i32,
    pub int64_max: i64,
    pub hex_int32_neg_1: i32,
    pub ibinder: Option<SpIBinder>,
    pub add_string1: String,
    pub add_string2: String,
    pub should_set_bit0_and_bit2: i32,
    pub u: Option<Union>,
    pub should_be_const_s1: Option<Union>,
    pub default_with_foo: IntEnum,
}

impl StructuredParcelable {
    pub const BIT0: i32 = 0x1;
    pub const BIT1: i32 = 0x2;
    pub const BIT2: i32 = 0x4;
}

#[allow(clippy::approx_constant)]
impl Default for StructuredParcelable {
    fn default() -> Self {
        Self {
            should_contain_three_fs: vec![],
            f: 0,
            should_be_jerry: String::new(),
            should_be_byte_bar: ByteEnum::default(),
            should_be_int_bar: IntEnum::default(),
            should_be_long_bar: LongEnum::default(),
            should_contain_two_byte_foos: vec![],
            should_contain_two_int_foos: vec![],
            should_contain_two_long_foos: vec![],
            string_defaults_to_foo: "foo".into(),
            byte_defaults_to_four: 4,
            int_defaults_to_five: 5,
            long_defaults_to_negative_seven: -7,
            boolean_defaults_to_true: true,
            char_defaults_to_c: 'C' as u16,
            float_defaults_to_pi: 3.14,
            double_with_default: -3.14e17,
            array_defaults_to_123: vec![1, 2, 3],
            array_defaults_to_empty: vec![],
            bool_default: false,
            byte_default: 0,
            int_default: 0,
            long_default: 0,
            float_default: 0.0,
            double_default: 0.0,
            int32_min: i32::MIN,
            int32_max: i32::MAX,
            int64_max: i64::MAX,
            hex_int32_neg_1: -1,
            ibinder: None,
            add_string1: "hello world!".into(),
            add_string2: "The quick brown fox jumps over the lazy dog.".into(),
            should_set_bit0_and_bit2: 0,
            u: None,
            should_be_const_s1: None,
            default_with_foo: IntEnum::FOO,
        }
    }
}

impl Parcelable for StructuredParcelable {
    fn write_to_parcel(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.sized_write(|subparcel| {
            subparcel.write(&self.should_contain_three_fs)?;
            subparcel.write(&self.f)?;
            subparcel.write(&self.should_be_jerry)?;
            subparcel.write(&self.should_be_byte_bar)?;
            subparcel.write(&self.should_be_int_bar)?;
            subparcel.write(&self.should_be_long_bar)?;
            subparcel.write(&self.should_contain_two_byte_foos)?;
            subparcel.write(&self.should_contain_two_int_foos)?;
            subparcel.write(&self.should_contain_two_long_foos)?;
            subparcel.write(&self.string_defaults_to_foo)?;
            subparcel.write(&self.byte_defaults_to_four)?;
            subparcel.write(&self.int_defaults_to_five)?;
            subparcel.write(&self.long_defaults_to_negative_seven)?;
            subparcel.write(&self.boolean_defaults_to_true)?;
            subparcel.write(&self.char_defaults_to_c)?;
            subparcel.write(&self.float_defaults_to_pi)?;
            subparcel.write(&self.double_with_default)?;
            subparcel.write(&self.array_defaults_to_123)?;
            subparcel.write(&self.array_defaults_to_empty)?;
            subparcel.write(&self.bool_default)?;
            subparcel.write(&self.byte_default)?;
            subparcel.write(&self.int_default)?;
            subparcel.write(&self.long_default)?;
            subparcel.write(&self.float_default)?;
            subparcel.write(&self.double_default)?;
            subparcel.write(&self.int32_min)?;
            subparcel.write(&self.int32_max)?;
            subparcel.write(&self.int64_max)?;
            subparcel.write(&self.hex_int32_neg_1)?;
            subparcel.write(&self.ibinder)?;
            subparcel.write(&self.add_string1)?;
            subparcel.write(&self.add_string2)?;
            subparcel.write(&self.should_set_bit0_and_bit2)?;
            subparcel.write(&self.u)?;
            subparcel.write(&self.should_be_const_s1)?;
            subparcel.write(&self.default_with_foo)
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
                should_contain_three_fs,
                f,
                should_be_jerry,
                should_be_byte_bar,
                should_be_int_bar,
                should_be_long_bar,
                should_contain_two_byte_foos,
                should_contain_two_int_foos,
                should_contain_two_long_foos,
                string_defaults_to_foo,
                byte_defaults_to_four,
                int_defaults_to_five,
                long_defaults_to_negative_seven,
                boolean_defaults_to_true,
                char_defaults_to_c,
                float_defaults_to_pi,
                double_with_default,
                array_defaults_to_123,
                array_defaults_to_empty,
                bool_default,
                byte_default,
                int_default,
                long_default,
                float_default,
                double_default,
                int32_min,
                int32_max,
                int64_max,
                hex_int32_neg_1,
                ibinder,
                add_string1,
                add_string2,
                should_set_bit0_and_bit2,
                u,
                should_be_const_s1,
                default_with_foo,
            });
            Ok(())
        })
    }
}

crate::impl_serialize_for_parcelable!(StructuredParcelable);
crate::impl_deserialize_for_parcelable!(StructuredParcelable);

impl ParcelableMetadata for StructuredParcelable {
    fn get_descriptor() -> &'static str {
        "android.aidl.tests.StructuredParcelable"
    }
}
