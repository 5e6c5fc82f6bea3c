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

//! Parcelables with extension slots, and the extensions stored in them.

use crate::binder::Stability;
use crate::error::Result;
use crate::parcel::{Parcel, Parcelable, ParcelableHolder, ParcelableMetadata};

/// A parcelable with two extension slots between its regular fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendableParcelable {
    pub a: i32,
    pub b: String,
    pub ext: ParcelableHolder,
    pub c: i64,
    pub ext2: ParcelableHolder,
}

impl Default for ExtendableParcelable {
    fn default() -> Self {
        Self {
            a: 0,
            b: String::new(),
            ext: ParcelableHolder::new(Stability::Local),
            c: 0,
            ext2: ParcelableHolder::new(Stability::Local),
        }
    }
}

impl Parcelable for ExtendableParcelable {
    fn write_to_parcel(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.sized_write(|subparcel| {
            subparcel.write(&self.a)?;
            subparcel.write(&self.b)?;
            subparcel.write(&self.ext)?;
            subparcel.write(&self.c)?;
            subparcel.write(&self.ext2)
        })
    }

    fn read_from_parcel(&mut self, parcel: &Parcel) -> Result<()> {
        parcel.sized_read(|subparcel| {
            if subparcel.has_more_data() {
                self.a = subparcel.read()?;
            }
            if subparcel.has_more_data() {
                self.b = subparcel.read()?;
            }
            if subparcel.has_more_data() {
                self.ext = subparcel.read()?;
            }
            if subparcel.has_more_data() {
                self.c = subparcel.read()?;
            }
            if subparcel.has_more_data() {
                self.ext2 = subparcel.read()?;
            }
            Ok(())
        })
    }
}

crate::impl_serialize_for_parcelable!(ExtendableParcelable);
crate::impl_deserialize_for_parcelable!(ExtendableParcelable);

impl ParcelableMetadata for ExtendableParcelable {
    fn get_descriptor() -> &'static str {
        "android.aidl.tests.extension.ExtendableParcelable"
    }
}

/// Writes the `a: i32, b: String` body shared by [`MyExt`] and [`MyExtLike`].
macro_rules! int_string_parcelable {
    ($parcelable:ident, $descriptor:expr) => {
        impl Parcelable for $parcelable {
            fn write_to_parcel(&self, parcel: &mut Parcel) -> Result<()> {
                parcel.sized_write(|subparcel| {
                    subparcel.write(&self.a)?;
                    subparcel.write(&self.b)
                })
            }

            fn read_from_parcel(&mut self, parcel: &Parcel) -> Result<()> {
                parcel.sized_read(|subparcel| {
                    if subparcel.has_more_data() {
                        self.a = subparcel.read()?;
                    }
                    if subparcel.has_more_data() {
                        self.b = subparcel.read()?;
                    }
                    Ok(())
                })
            }
        }

        crate::impl_serialize_for_parcelable!($parcelable);
        crate::impl_deserialize_for_parcelable!($parcelable);

        impl ParcelableMetadata for $parcelable {
            fn get_descriptor() -> &'static str {
                $descriptor
            }
        }
    };
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MyExt {
    pub a: i32,
    pub b: String,
}

int_string_parcelable!(MyExt, "android.aidl.tests.extension.MyExt");

/// Same layout as [`MyExt`] under a different descriptor. A holder storing
/// one never yields the other.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MyExtLike {
    pub a: i32,
    pub b: String,
}

int_string_parcelable!(MyExtLike, "android.aidl.tests.extension.MyExtLike");

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MyExt2 {
    pub a: i32,
    pub b: MyExt,
    pub c: String,
}

impl Parcelable for MyExt2 {
    fn write_to_parcel(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.sized_write(|subparcel| {
            subparcel.write(&self.a)?;
            subparcel.write(&self.b)?;
            subparcel.write(&self.c)
        })
    }

    fn read_from_parcel(&mut self, parcel: &Parcel) -> Result<()> {
        parcel.sized_read(|subparcel| {
            if subparcel.has_more_data() {
                self.a = subparcel.read()?;
            }
            if subparcel.has_more_data() {
                self.b = subparcel.read()?;
            }
            if subparcel.has_more_data() {
                self.c = subparcel.read()?;
            }
            Ok(())
        })
    }
}

crate::impl_serialize_for_parcelable!(MyExt2);
crate::impl_deserialize_for_parcelable!(MyExt2);

impl ParcelableMetadata for MyExt2 {
    fn get_descriptor() -> &'static str {
        "android.aidl.tests.extension.MyExt2"
    }
}
