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

//! Container for messages that are sent via binder.

use crate::error::{Result, StatusCode};
use crate::proxy::SpIBinder;

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::ops::Range;

mod file_descriptor;
mod parcelable;
mod parcelable_holder;

pub use self::file_descriptor::ParcelFileDescriptor;
pub use self::parcelable::{
    Deserialize, DeserializeArray, DeserializeOption, Parcelable, ParcelableMetadata, Serialize,
    SerializeArray, SerializeOption, NON_NULL_PARCELABLE_FLAG, NULL_PARCELABLE_FLAG,
};
pub use self::parcelable_holder::ParcelableHolder;

// Markers stored in the data stream at the offset of a flattened object. The
// object itself lives in the parcel's object table.
const BINDER_OBJECT_MARKER: i32 = 0x7362_2a85;
const FD_OBJECT_MARKER: i32 = 0x6664_2a85;
const NULL_OBJECT_MARKER: i32 = 0;

#[derive(Debug)]
enum ParcelObject {
    Binder(SpIBinder),
    FileDescriptor(File),
}

impl ParcelObject {
    fn duplicate(&self) -> Result<Self> {
        match self {
            ParcelObject::Binder(binder) => Ok(ParcelObject::Binder(binder.clone())),
            ParcelObject::FileDescriptor(file) => file
                .try_clone()
                .map(ParcelObject::FileDescriptor)
                .map_err(|_| StatusCode::BAD_VALUE),
        }
    }
}

/// Container for a message (data and object references) that can be sent
/// through Binder.
///
/// A Parcel can contain both flattened data that will be unflattened on the
/// other side of the IPC (using the [`Serialize`] and [`Deserialize`] traits),
/// and references to live Binder objects that will result in the other side
/// receiving a reference to the same object.
///
/// Every value is padded to a multiple of four bytes. Writes land at the
/// current data position and advance it; reads consume from the data position
/// and never mutate the parcel contents, so they only need `&self`.
#[derive(Default)]
pub struct Parcel {
    data: Vec<u8>,
    position: Cell<usize>,
    objects: BTreeMap<usize, ParcelObject>,
}

fn pad_size(len: usize) -> Option<usize> {
    len.checked_add(3).map(|padded| padded & !3)
}

impl Parcel {
    /// Create a new empty `Parcel`.
    pub fn new() -> Self {
        Default::default()
    }

    /// The flattened bytes of this parcel.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the total amount of data contained in the parcel.
    pub fn data_size(&self) -> usize {
        self.data.len()
    }

    /// Returns the amount of data remaining to be read from the parcel. That is,
    /// data_size() - data_position().
    pub fn data_avail(&self) -> usize {
        self.data.len().saturating_sub(self.position.get())
    }

    /// Returns the current position in the parcel data. Never more than data_size().
    pub fn data_position(&self) -> usize {
        self.position.get()
    }

    /// Move the current read/write position in the parcel.
    pub fn set_data_position(&self, pos: usize) -> Result<()> {
        // pos: New offset in the parcel; must be between 0 and data_size().
        if pos > self.data_size() {
            return Err(StatusCode::BAD_VALUE);
        }
        self.position.set(pos);
        Ok(())
    }

    /// Replace the contents of this parcel with raw bytes.
    ///
    /// Any objects previously written are released and the data position is
    /// reset to the start.
    pub fn set_data(&mut self, data: &[u8]) {
        self.data = data.to_vec();
        self.objects.clear();
        self.position.set(0);
    }

    /// Number of live objects (binders and file descriptors) in the parcel.
    pub fn objects_count(&self) -> usize {
        self.objects.len()
    }

    pub fn has_file_descriptors(&self) -> bool {
        self.objects.values().any(|object| matches!(object, ParcelObject::FileDescriptor(_)))
    }

    /// Write a type that implements [`Serialize`] to the parcel.
    pub fn write<S: Serialize + ?Sized>(&mut self, parcelable: &S) -> Result<()> {
        parcelable.serialize(self)
    }

    /// Attempt to read a type that implements [`Deserialize`] from this
    /// parcel.
    pub fn read<D: Deserialize>(&self) -> Result<D> {
        D::deserialize(self)
    }

    /// Attempt to read a type that implements [`Deserialize`] from this parcel
    /// onto an existing value. This operation will overwrite the old value
    /// partially or completely, depending on how much data is available.
    pub fn read_onto<D: Deserialize>(&self, x: &mut D) -> Result<()> {
        x.deserialize_from(self)
    }

    /// Writes the length of a slice to the parcel.
    ///
    /// This is used in AIDL-generated client side code to indicate the
    /// allocated space for an output array parameter. A `None` slice is
    /// written as the absent marker `-1`.
    pub fn write_slice_size<T>(&mut self, slice: Option<&[T]>) -> Result<()> {
        if let Some(slice) = slice {
            let len: i32 = slice.len().try_into().or(Err(StatusCode::BAD_VALUE))?;
            self.write(&len)
        } else {
            self.write(&-1i32)
        }
    }

    /// Perform a series of writes to the parcel, prepended with the length
    /// (in bytes) of the written data.
    ///
    /// The length `0i32` will be written to the parcel first, followed by the
    /// writes performed by the callback. The initial length will then be
    /// updated to the length of all data written by the callback, plus the
    /// size of the length elemement itself (4 bytes).
    ///
    /// # Examples
    ///
    /// After the following call:
    ///
    /// ```
    /// # use binder_conformance::Parcel;
    /// # let mut parcel = Parcel::new();
    /// parcel.sized_write(|subparcel| {
    ///     subparcel.write(&1u32)?;
    ///     subparcel.write(&2u32)?;
    ///     subparcel.write(&3u32)
    /// });
    /// ```
    ///
    /// `parcel` will contain the following:
    ///
    /// ```ignore
    /// [16i32, 1u32, 2u32, 3u32]
    /// ```
    pub fn sized_write<F>(&mut self, f: F) -> Result<()>
    where
        for<'a> F: FnOnce(&'a mut WritableSubParcel<'a>) -> Result<()>,
    {
        let start = self.begin_sized_write()?;
        {
            let mut subparcel = WritableSubParcel(&mut *self);
            f(&mut subparcel)?;
        }
        self.end_sized_write(start)
    }

    /// Write a placeholder length and return where the section starts.
    pub(crate) fn begin_sized_write(&mut self) -> Result<usize> {
        let start = self.data_position();
        self.write(&0i32)?;
        Ok(start)
    }

    /// Patch the length of the section at `start` to end at the current
    /// position. Nested sections may be closed innermost first.
    pub(crate) fn end_sized_write(&mut self, start: usize) -> Result<()> {
        let end = self.data_position();
        let parcelable_size: i32 = (end - start).try_into().or(Err(StatusCode::BAD_VALUE))?;
        self.set_data_position(start)?;
        self.write(&parcelable_size)?;
        self.set_data_position(end)
    }

    /// Read a size-prefixed section written by [`sized_write`](Self::sized_write).
    ///
    /// The callback may stop early; bytes it leaves unread, such as fields
    /// appended by a newer version of the writer, are skipped. Reading past
    /// the declared end of the section fails.
    pub fn sized_read<F>(&self, f: F) -> Result<()>
    where
        for<'a> F: FnOnce(ReadableSubParcel<'a>) -> Result<()>,
    {
        let subparcel = self.begin_sized_read()?;
        let end = subparcel.end_position;
        f(subparcel)?;
        self.end_sized_read(end)
    }

    /// Read a section length and return a view bounded by it.
    pub(crate) fn begin_sized_read(&self) -> Result<ReadableSubParcel<'_>> {
        let start = self.data_position();
        let parcelable_size: i32 = self.read()?;
        if parcelable_size < 4 {
            return Err(StatusCode::BAD_VALUE);
        }

        let end = usize::try_from(parcelable_size)
            .ok()
            .and_then(|size| start.checked_add(size))
            .filter(|end| *end <= self.data_size())
            .ok_or(StatusCode::BAD_VALUE)?;

        Ok(ReadableSubParcel { parcel: self, end_position: end })
    }

    /// Skip to the end of a section, failing if reads overran it.
    pub(crate) fn end_sized_read(&self, end: usize) -> Result<()> {
        if self.data_position() > end {
            return Err(StatusCode::BAD_VALUE);
        }
        self.set_data_position(end)
    }

    /// Append a subset of another parcel.
    ///
    /// Objects that live in the copied range are duplicated into this parcel:
    /// binders keep their identity and file descriptors are `dup`ed.
    pub fn append_from(&mut self, other: &Parcel, start: usize, size: usize) -> Result<()> {
        let end = start
            .checked_add(size)
            .filter(|end| *end <= other.data_size())
            .ok_or(StatusCode::BAD_VALUE)?;
        let dest = self.data_position();
        self.write_aligned(&other.data[start..end])?;
        for (offset, object) in other.objects.range(start..end) {
            self.objects.insert(dest + (offset - start), object.duplicate()?);
        }
        Ok(())
    }

    /// Append the contents of another parcel.
    pub fn append_all_from(&mut self, other: &Parcel) -> Result<()> {
        self.append_from(other, 0, other.data_size())
    }

    /// Write raw bytes followed by zero padding up to the next four-byte
    /// boundary.
    pub(crate) fn write_aligned(&mut self, bytes: &[u8]) -> Result<()> {
        let start = self.data_position();
        let end = pad_size(bytes.len())
            .and_then(|padded| start.checked_add(padded))
            .ok_or(StatusCode::NO_MEMORY)?;
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        let (payload, padding) = self.data[start..end].split_at_mut(bytes.len());
        payload.copy_from_slice(bytes);
        padding.fill(0);
        self.release_objects(start..end);
        self.position.set(end);
        Ok(())
    }

    /// Consume `len` bytes plus their padding.
    pub(crate) fn read_aligned(&self, len: usize) -> Result<&[u8]> {
        let start = self.data_position();
        let end = pad_size(len)
            .and_then(|padded| start.checked_add(padded))
            .filter(|end| *end <= self.data.len())
            .ok_or(StatusCode::NOT_ENOUGH_DATA)?;
        self.position.set(end);
        Ok(&self.data[start..start + len])
    }

    pub(crate) fn read_fixed<const N: usize>(&self) -> Result<[u8; N]> {
        self.read_aligned(N)?.try_into().or(Err(StatusCode::NOT_ENOUGH_DATA))
    }

    /// Read the length prefix of a sequence.
    ///
    /// `None` is the absent marker. A negative length other than `-1`, or a
    /// length whose elements could not fit in the remaining data given their
    /// minimum encoded size, is malformed.
    pub(crate) fn read_sequence_len(&self, min_element_size: usize) -> Result<Option<usize>> {
        let len: i32 = self.read()?;
        if len == -1 {
            return Ok(None);
        }
        let len = usize::try_from(len).or(Err(StatusCode::BAD_VALUE))?;
        match len.checked_mul(min_element_size) {
            Some(needed) if needed <= self.data_avail() => Ok(Some(len)),
            _ => Err(StatusCode::BAD_VALUE),
        }
    }

    /// Read the length prefix of a packed sequence of `unit_size`-byte units.
    ///
    /// The units, `trailing_units` more after them and the padding to the next
    /// four-byte boundary must all fit in the remaining data.
    pub(crate) fn read_packed_len(
        &self,
        unit_size: usize,
        trailing_units: usize,
    ) -> Result<Option<usize>> {
        let len = match self.read_sequence_len(unit_size)? {
            Some(len) => len,
            None => return Ok(None),
        };
        len.checked_add(trailing_units)
            .and_then(|units| units.checked_mul(unit_size))
            .and_then(pad_size)
            .filter(|padded| *padded <= self.data_avail())
            .map(|_| Some(len))
            .ok_or(StatusCode::BAD_VALUE)
    }

    pub(crate) fn write_binder(&mut self, binder: Option<&SpIBinder>) -> Result<()> {
        match binder {
            Some(binder) => {
                let offset = self.data_position();
                self.write(&BINDER_OBJECT_MARKER)?;
                self.objects.insert(offset, ParcelObject::Binder(binder.clone()));
                Ok(())
            }
            None => self.write(&NULL_OBJECT_MARKER),
        }
    }

    pub(crate) fn read_binder(&self) -> Result<Option<SpIBinder>> {
        let offset = self.data_position();
        let marker: i32 = self.read()?;
        match self.objects.get(&offset) {
            Some(ParcelObject::Binder(binder)) => Ok(Some(binder.clone())),
            Some(ParcelObject::FileDescriptor(_)) => Err(StatusCode::BAD_TYPE),
            None if marker == NULL_OBJECT_MARKER => Ok(None),
            None => Err(StatusCode::BAD_TYPE),
        }
    }

    /// Store a duplicate of `file` in the parcel. The caller keeps ownership
    /// of its own descriptor.
    pub(crate) fn write_file_descriptor(&mut self, file: &File) -> Result<()> {
        let dup = file.try_clone().map_err(|_| StatusCode::BAD_VALUE)?;
        let offset = self.data_position();
        self.write(&FD_OBJECT_MARKER)?;
        self.objects.insert(offset, ParcelObject::FileDescriptor(dup));
        Ok(())
    }

    /// Read a new duplicate of a descriptor stored in the parcel.
    pub(crate) fn read_file_descriptor(&self) -> Result<File> {
        let offset = self.data_position();
        let _marker: i32 = self.read()?;
        match self.objects.get(&offset) {
            Some(ParcelObject::FileDescriptor(file)) => {
                file.try_clone().map_err(|_| StatusCode::BAD_VALUE)
            }
            _ => Err(StatusCode::BAD_TYPE),
        }
    }

    fn release_objects(&mut self, range: Range<usize>) {
        let stale: Vec<usize> = self.objects.range(range).map(|(offset, _)| *offset).collect();
        for offset in stale {
            self.objects.remove(&offset);
        }
    }
}

impl fmt::Debug for Parcel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Parcel")
            .field("data_size", &self.data_size())
            .field("data_position", &self.data_position())
            .field("objects", &self.objects.len())
            .finish()
    }
}

/// A segment of a writable parcel, used for [`Parcel::sized_write`].
pub struct WritableSubParcel<'a>(&'a mut Parcel);

impl<'a> WritableSubParcel<'a> {
    /// Write a type that implements [`Serialize`] to the sub-parcel.
    pub fn write<S: Serialize + ?Sized>(&mut self, parcelable: &S) -> Result<()> {
        parcelable.serialize(self.0)
    }
}

/// A segment of a readable parcel, used for [`Parcel::sized_read`].
pub struct ReadableSubParcel<'a> {
    parcel: &'a Parcel,
    end_position: usize,
}

impl<'a> ReadableSubParcel<'a> {
    /// Read a type that implements [`Deserialize`] from the sub-parcel.
    pub fn read<D: Deserialize>(&self) -> Result<D> {
        let value = self.parcel.read()?;
        if self.parcel.data_position() > self.end_position {
            return Err(StatusCode::BAD_VALUE);
        }
        Ok(value)
    }

    /// Read a type that implements [`Deserialize`] from the sub-parcel onto
    /// an existing value.
    pub fn read_onto<D: Deserialize>(&self, x: &mut D) -> Result<()> {
        self.parcel.read_onto(x)?;
        if self.parcel.data_position() > self.end_position {
            return Err(StatusCode::BAD_VALUE);
        }
        Ok(())
    }

    /// Check if the sub-parcel has more data to read
    pub fn has_more_data(&self) -> bool {
        self.parcel.data_position() < self.end_position
    }

    pub(crate) fn end_position(&self) -> usize {
        self.end_position
    }
}

#[test]
fn test_write_data() {
    let mut parcel = Parcel::new();

    assert_eq!(parcel.data(), []);
    assert_eq!(parcel.data_avail(), 0);
    assert_eq!(parcel.data_position(), 0);

    parcel.set_data(&[1, 2, 3, 4, 5, 6, 7, 8]);

    assert_eq!(parcel.data(), [1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(parcel.data_avail(), 8);
    assert_eq!(parcel.data_position(), 0);

    assert!(parcel.set_data_position(4).is_ok());
    assert!(parcel.write(&0x0b0a_0908i32).is_ok());
    assert_eq!(parcel.data(), [1, 2, 3, 4, 8, 9, 10, 11]);
    assert_eq!(parcel.data_avail(), 0);

    assert!(parcel.write(&[1u8, 2, 3][..]).is_ok());
    assert_eq!(parcel.data_size(), 16);
    assert_eq!(&parcel.data()[8..], [3, 0, 0, 0, 1, 2, 3, 0]);

    let mut parcel2 = Parcel::new();

    // Bounds checked
    assert_eq!(parcel2.append_from(&parcel, 11, 10), Err(StatusCode::BAD_VALUE));
    assert_eq!(parcel2.data(), []);

    assert!(parcel2.append_from(&parcel, 4, 4).is_ok());
    assert_eq!(parcel2.data(), [8, 9, 10, 11]);

    assert_eq!(parcel.set_data_position(17), Err(StatusCode::BAD_VALUE));
}

#[test]
fn test_read_data() {
    let mut parcel = Parcel::new();

    assert_eq!(parcel.read::<bool>(), Err(StatusCode::NOT_ENOUGH_DATA));
    assert_eq!(parcel.read::<i8>(), Err(StatusCode::NOT_ENOUGH_DATA));
    assert_eq!(parcel.read::<u16>(), Err(StatusCode::NOT_ENOUGH_DATA));
    assert_eq!(parcel.read::<i32>(), Err(StatusCode::NOT_ENOUGH_DATA));
    assert_eq!(parcel.read::<u32>(), Err(StatusCode::NOT_ENOUGH_DATA));
    assert_eq!(parcel.read::<i64>(), Err(StatusCode::NOT_ENOUGH_DATA));
    assert_eq!(parcel.read::<u64>(), Err(StatusCode::NOT_ENOUGH_DATA));
    assert_eq!(parcel.read::<f32>(), Err(StatusCode::NOT_ENOUGH_DATA));
    assert_eq!(parcel.read::<f64>(), Err(StatusCode::NOT_ENOUGH_DATA));
    assert_eq!(parcel.read::<Option<String>>(), Err(StatusCode::NOT_ENOUGH_DATA));

    parcel.set_data(b"Hello, Binder!\0\0");

    assert_eq!(parcel.read::<bool>(), Ok(true));
    assert_eq!(parcel.data_position(), 4);

    assert!(parcel.set_data_position(0).is_ok());

    assert_eq!(parcel.read::<i8>(), Ok(72));
    assert_eq!(parcel.data_position(), 4);

    assert!(parcel.set_data_position(0).is_ok());

    assert_eq!(parcel.read::<u16>(), Ok(25928));
    assert_eq!(parcel.data_position(), 4);

    assert!(parcel.set_data_position(0).is_ok());

    assert_eq!(parcel.read::<i32>(), Ok(1819043144));
    assert_eq!(parcel.data_position(), 4);

    assert!(parcel.set_data_position(0).is_ok());

    assert_eq!(parcel.read::<u32>(), Ok(1819043144));
    assert_eq!(parcel.data_position(), 4);

    assert!(parcel.set_data_position(0).is_ok());

    assert_eq!(parcel.read::<i64>(), Ok(4764857262830019912));
    assert_eq!(parcel.data_position(), 8);

    assert!(parcel.set_data_position(0).is_ok());

    assert_eq!(parcel.read::<u64>(), Ok(4764857262830019912));
    assert_eq!(parcel.data_position(), 8);

    assert!(parcel.set_data_position(0).is_ok());

    assert_eq!(parcel.read::<f32>(), Ok(1143139100000000000000000000.0));
    assert_eq!(parcel.data_position(), 4);
    assert_eq!(parcel.read::<f32>(), Ok(40.043392));
    assert_eq!(parcel.data_position(), 8);

    assert!(parcel.set_data_position(0).is_ok());

    assert_eq!(parcel.read::<f64>(), Ok(34732488246.197815));
    assert_eq!(parcel.data_position(), 8);

    // Reads are all-or-nothing: a short read leaves the position alone.
    assert!(parcel.set_data_position(12).is_ok());
    assert_eq!(parcel.read::<i64>(), Err(StatusCode::NOT_ENOUGH_DATA));
    assert_eq!(parcel.data_position(), 12);
}

#[test]
fn test_utf8_utf16_conversions() {
    let mut parcel = Parcel::new();

    assert!(parcel.write("Hello, Binder!").is_ok());
    assert!(parcel.set_data_position(0).is_ok());
    assert_eq!(parcel.read::<String>().unwrap(), "Hello, Binder!");
    assert!(parcel.set_data_position(0).is_ok());
    assert_eq!(parcel.read::<crate::String16>().unwrap(), "Hello, Binder!");
    assert!(parcel.set_data_position(0).is_ok());

    assert!(parcel.write(&["str1", "str2", "str3"][..]).is_ok());
    assert!(parcel
        .write(&[String::from("str4"), String::from("str5"), String::from("str6"),][..])
        .is_ok());

    let s1 = "Hello, Binder!";
    let s2 = "This is a utf8 string.";
    let s3 = "Some more text here.";

    assert!(parcel.write(&[s1, s2, s3][..]).is_ok());
    assert!(parcel.set_data_position(0).is_ok());

    assert_eq!(parcel.read::<Vec<String>>().unwrap(), ["str1", "str2", "str3"]);
    assert_eq!(parcel.read::<Vec<String>>().unwrap(), ["str4", "str5", "str6"]);
    assert_eq!(parcel.read::<Vec<String>>().unwrap(), [s1, s2, s3]);
}

#[test]
fn test_sized_write_skips_unknown_fields() {
    let mut parcel = Parcel::new();

    // A newer writer with a third field.
    assert!(parcel
        .sized_write(|subparcel| {
            subparcel.write(&1i32)?;
            subparcel.write(&2i64)?;
            subparcel.write("added later")
        })
        .is_ok());
    assert!(parcel.write(&99i32).is_ok());
    assert_eq!(parcel.data()[..4], 44i32.to_le_bytes());

    assert!(parcel.set_data_position(0).is_ok());

    // An older reader that only knows the first two.
    let mut fields = (0i32, 0i64);
    assert!(parcel
        .sized_read(|subparcel| {
            if subparcel.has_more_data() {
                fields.0 = subparcel.read()?;
            }
            if subparcel.has_more_data() {
                fields.1 = subparcel.read()?;
            }
            Ok(())
        })
        .is_ok());
    assert_eq!(fields, (1, 2));
    assert_eq!(parcel.read::<i32>(), Ok(99));
}

#[test]
fn test_sized_read_rejects_bad_sizes() {
    let mut parcel = Parcel::new();
    assert!(parcel.write(&2i32).is_ok());
    assert!(parcel.set_data_position(0).is_ok());
    assert_eq!(parcel.sized_read(|_| Ok(())), Err(StatusCode::BAD_VALUE));

    let mut parcel = Parcel::new();
    assert!(parcel.write(&64i32).is_ok());
    assert!(parcel.write(&0i32).is_ok());
    assert!(parcel.set_data_position(0).is_ok());
    assert_eq!(parcel.sized_read(|_| Ok(())), Err(StatusCode::BAD_VALUE));
}
