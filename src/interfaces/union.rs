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

//! The `android.aidl.tests.Union` tagged union.

use super::enums::ByteEnum;
use crate::error::{Result, StatusCode};
use crate::parcel::{Parcel, Parcelable, ParcelableMetadata};
use crate::SpIBinder;

/// Exactly one of the alternatives below. The default is an empty `Ns`.
#[derive(Debug, Clone, PartialEq)]
pub enum Union {
    Ns(Vec<i32>),
    N(i32),
    M(i32),
    S(String),
    Ibinder(Option<SpIBinder>),
    Ss(Vec<String>),
    Be(ByteEnum),
}

/// String constant declared by the union.
pub const S1: &str = "a string constant in union";

impl Default for Union {
    fn default() -> Self {
        Self::Ns(vec![])
    }
}

pub mod tag {
    declare_binder_enum! {
        /// Discriminant of a [`Union`](super::Union), as written on the wire.
        Tag : [i32; 7] {
            NS = 0,
            N = 1,
            M = 2,
            S = 3,
            IBINDER = 4,
            SS = 5,
            BE = 6,
        }
    }
}

pub use tag::Tag;

impl Union {
    pub fn get_tag(&self) -> Tag {
        match self {
            Self::Ns(_) => Tag::NS,
            Self::N(_) => Tag::N,
            Self::M(_) => Tag::M,
            Self::S(_) => Tag::S,
            Self::Ibinder(_) => Tag::IBINDER,
            Self::Ss(_) => Tag::SS,
            Self::Be(_) => Tag::BE,
        }
    }
}

impl Parcelable for Union {
    fn write_to_parcel(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.write(&self.get_tag())?;
        match self {
            Self::Ns(v) => parcel.write(v),
            Self::N(v) => parcel.write(v),
            Self::M(v) => parcel.write(v),
            Self::S(v) => parcel.write(v),
            Self::Ibinder(v) => parcel.write(v),
            Self::Ss(v) => parcel.write(v),
            Self::Be(v) => parcel.write(v),
        }
    }

    fn read_from_parcel(&mut self, parcel: &Parcel) -> Result<()> {
        let tag: Tag = parcel.read()?;
        *self = match tag {
            Tag::NS => Self::Ns(parcel.read()?),
            Tag::N => Self::N(parcel.read()?),
            Tag::M => Self::M(parcel.read()?),
            Tag::S => Self::S(parcel.read()?),
            Tag::IBINDER => Self::Ibinder(parcel.read()?),
            Tag::SS => Self::Ss(parcel.read()?),
            Tag::BE => Self::Be(parcel.read()?),
            _ => return Err(StatusCode::BAD_TYPE),
        };
        Ok(())
    }
}

crate::impl_serialize_for_parcelable!(Union);
crate::impl_deserialize_for_parcelable!(Union);

impl ParcelableMetadata for Union {
    fn get_descriptor() -> &'static str {
        "android.aidl.tests.Union"
    }
}
