/*
 * Copyright (C) 2020 The Android Open Source Project
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

use super::{
    Deserialize, DeserializeArray, DeserializeOption, Parcel, Serialize, SerializeArray,
    SerializeOption, NON_NULL_PARCELABLE_FLAG, NULL_PARCELABLE_FLAG,
};
use crate::error::{Result, StatusCode};

use std::fs::File;
use std::os::unix::io::{AsRawFd, RawFd};

/// Rust version of the Java class android.os.ParcelFileDescriptor
///
/// Writing one into a parcel stores a duplicate of the descriptor, and every
/// read hands out a fresh duplicate. The wrapped [`File`] is closed when the
/// wrapper is dropped.
#[derive(Debug)]
pub struct ParcelFileDescriptor(File);

impl ParcelFileDescriptor {
    /// Create a new `ParcelFileDescriptor`
    pub fn new(file: File) -> Self {
        Self(file)
    }

    /// Duplicate the underlying descriptor.
    pub fn try_clone(&self) -> Result<Self> {
        self.0.try_clone().map(Self).map_err(|_| StatusCode::BAD_VALUE)
    }
}

impl AsRef<File> for ParcelFileDescriptor {
    fn as_ref(&self) -> &File {
        &self.0
    }
}

impl From<ParcelFileDescriptor> for File {
    fn from(file: ParcelFileDescriptor) -> File {
        file.0
    }
}

impl AsRawFd for ParcelFileDescriptor {
    fn as_raw_fd(&self) -> RawFd {
        self.0.as_raw_fd()
    }
}

// Two descriptors are the same value when they name the same open file
// description, which is what survives a dup.
impl PartialEq for ParcelFileDescriptor {
    fn eq(&self, other: &Self) -> bool {
        match (self.0.metadata(), other.0.metadata()) {
            (Ok(a), Ok(b)) => {
                use std::os::unix::fs::MetadataExt;
                a.dev() == b.dev() && a.ino() == b.ino()
            }
            _ => false,
        }
    }
}

impl Eq for ParcelFileDescriptor {}

impl Serialize for ParcelFileDescriptor {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.write_file_descriptor(&self.0)
    }
}

impl SerializeArray for ParcelFileDescriptor {}

impl SerializeOption for ParcelFileDescriptor {
    fn serialize_option(this: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        if let Some(f) = this {
            parcel.write(&NON_NULL_PARCELABLE_FLAG)?;
            f.serialize(parcel)
        } else {
            parcel.write(&NULL_PARCELABLE_FLAG)
        }
    }
}

impl Deserialize for ParcelFileDescriptor {
    fn deserialize(parcel: &Parcel) -> Result<Self> {
        parcel.read_file_descriptor().map(ParcelFileDescriptor::new)
    }
}

impl DeserializeArray for ParcelFileDescriptor {}

impl DeserializeOption for ParcelFileDescriptor {
    fn deserialize_option(parcel: &Parcel) -> Result<Option<Self>> {
        let has_fd: i32 = parcel.read()?;
        match has_fd {
            NULL_PARCELABLE_FLAG => Ok(None),
            NON_NULL_PARCELABLE_FLAG => parcel.read().map(Some),
            _ => Err(StatusCode::BAD_VALUE),
        }
    }
}
