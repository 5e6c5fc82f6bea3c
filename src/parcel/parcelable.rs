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

use crate::binder::Stability;
use crate::error::{Result, StatusCode};
use crate::parcel::Parcel;
use crate::utils::String16;

use std::iter;

/// Flag that specifies that the following parcelable is present.
///
/// This is the Rust equivalent of `Parcel::kNonNullParcelableFlag`
/// from `include/binder/Parcel.h` in C++.
pub const NON_NULL_PARCELABLE_FLAG: i32 = 1;

/// Flag that specifies that the following parcelable is absent.
///
/// This is the Rust equivalent of `Parcel::kNullParcelableFlag`
/// from `include/binder/Parcel.h` in C++.
pub const NULL_PARCELABLE_FLAG: i32 = 0;

/// Super-trait for structured Binder parcelables, i.e. those generated from
/// AIDL.
///
/// This trait is equivalent `android::Parcelable` in C++,
/// and defines a common interface that all parcelables need
/// to implement.
pub trait Parcelable {
    /// Internal serialization function for parcelables.
    ///
    /// This method is mainly for internal use.
    /// `Serialize::serialize` and its variants are generally
    /// preferred over this function, since the former also
    /// prepend a header.
    fn write_to_parcel(&self, parcel: &mut Parcel) -> Result<()>;

    /// Internal deserialization function for parcelables.
    ///
    /// This method is mainly for internal use.
    /// `Deserialize::deserialize` and its variants are generally
    /// preferred over this function, since the former also
    /// parse the additional header.
    fn read_from_parcel(&mut self, parcel: &Parcel) -> Result<()>;
}

/// Metadata that `ParcelableHolder` needs for all parcelables.
///
/// The compiler auto-generates implementations of this trait
/// for AIDL parcelables.
pub trait ParcelableMetadata {
    /// The Binder parcelable descriptor string.
    ///
    /// This string is a unique identifier for a Binder parcelable.
    fn get_descriptor() -> &'static str;

    /// The Binder parcelable stability.
    fn get_stability(&self) -> Stability {
        Stability::Local
    }
}

/// A struct whose instances can be written to a [`Parcel`].
// Might be able to hook this up as a serde backend in the future?
pub trait Serialize {
    /// Serialize this instance into the given [`Parcel`].
    fn serialize(&self, parcel: &mut Parcel) -> Result<()>;
}

/// A struct whose instances can be restored from a [`Parcel`].
// Might be able to hook this up as a serde backend in the future?
pub trait Deserialize: Sized {
    /// Deserialize an instance from the given [`Parcel`].
    fn deserialize(parcel: &Parcel) -> Result<Self>;

    /// Deserialize an instance from the given [`Parcel`] onto the
    /// current object. This operation will overwrite the old value
    /// partially or completely, depending on how much data is available.
    fn deserialize_from(&mut self, parcel: &Parcel) -> Result<()> {
        *self = Self::deserialize(parcel)?;
        Ok(())
    }
}

/// Helper trait for types that can be serialized as arrays.
///
/// Defaults to calling Serialize::serialize() manually for every element,
/// but can be overridden for custom implementations like `writeByteArray`.
///
/// The `fixed` variants encode arrays whose length is part of the type. No
/// count is written for a fixed dimension, except that byte types write the
/// outer count of a two-dimensional array before packing all rows together.
// Until specialization is stabilized in Rust, we need this to be a separate
// trait because it's the only way to have a default implementation for a
// method. We want the default implementation for most types, but an override
// for a few special ones like `readByteArray` for `u8`.
pub trait SerializeArray: Serialize + Sized {
    /// Serialize an array of this type into the given parcel.
    fn serialize_array(slice: &[Self], parcel: &mut Parcel) -> Result<()> {
        parcel.write_slice_size(Some(slice))?;

        for item in slice {
            parcel.write(item)?;
        }

        Ok(())
    }

    /// Serialize the elements of a fixed-size array, without a count.
    fn serialize_fixed_array(slice: &[Self], parcel: &mut Parcel) -> Result<()> {
        for item in slice {
            parcel.write(item)?;
        }

        Ok(())
    }

    /// Serialize the rows of a two-dimensional fixed-size array.
    fn serialize_fixed_rows<const N: usize>(rows: &[[Self; N]], parcel: &mut Parcel) -> Result<()> {
        for row in rows {
            Self::serialize_fixed_array(row, parcel)?;
        }

        Ok(())
    }
}

/// Helper trait for types that can be deserialized as arrays.
///
/// Defaults to calling Deserialize::deserialize() manually for every element,
/// but can be overridden for custom implementations like `readByteArray`.
pub trait DeserializeArray: Deserialize {
    /// Fewest bytes one element occupies on the wire.
    const MIN_ENCODED_SIZE: usize = 4;

    /// Deserialize an array of type from the given parcel.
    fn deserialize_array(parcel: &Parcel) -> Result<Option<Vec<Self>>> {
        let len = match parcel.read_sequence_len(Self::MIN_ENCODED_SIZE)? {
            Some(len) => len,
            None => return Ok(None),
        };

        let mut vec = Vec::with_capacity(len);
        for _ in 0..len {
            vec.push(parcel.read()?);
        }

        Ok(Some(vec))
    }

    /// Deserialize exactly `N` elements written by
    /// [`SerializeArray::serialize_fixed_array`].
    fn deserialize_fixed_array<const N: usize>(parcel: &Parcel) -> Result<[Self; N]> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(parcel.read()?);
        }

        vec_to_array(items)
    }

    /// Deserialize `M` rows of `N` elements written by
    /// [`SerializeArray::serialize_fixed_rows`].
    fn deserialize_fixed_rows<const N: usize, const M: usize>(
        parcel: &Parcel,
    ) -> Result<[[Self; N]; M]> {
        let mut rows = Vec::with_capacity(M);
        for _ in 0..M {
            rows.push(Self::deserialize_fixed_array::<N>(parcel)?);
        }

        vec_to_array(rows)
    }
}

fn vec_to_array<T, const N: usize>(items: Vec<T>) -> Result<[T; N]> {
    items.try_into().or(Err(StatusCode::BAD_VALUE))
}

/// Helper trait for types that can be nullable when serialized.
// We really need this trait instead of implementing `Serialize for Option<T>`
// because of the Rust orphan rule which prevents us from doing
// `impl Serialize for Option<&dyn IFoo>` for AIDL interfaces.
// Instead we emit `impl SerializeOption for dyn IFoo` which is allowed.
// We also use it to provide a default implementation for AIDL-generated
// parcelables.
pub trait SerializeOption: Serialize {
    /// Serialize an Option of this type into the given parcel.
    fn serialize_option(this: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        if let Some(inner) = this {
            parcel.write(&NON_NULL_PARCELABLE_FLAG)?;
            parcel.write(inner)
        } else {
            parcel.write(&NULL_PARCELABLE_FLAG)
        }
    }
}

/// Helper trait for types that can be nullable when deserialized.
pub trait DeserializeOption: Deserialize {
    /// Deserialize an Option of this type from the given parcel.
    fn deserialize_option(parcel: &Parcel) -> Result<Option<Self>> {
        let null: i32 = parcel.read()?;
        match null {
            NULL_PARCELABLE_FLAG => Ok(None),
            NON_NULL_PARCELABLE_FLAG => parcel.read().map(Some),
            _ => Err(StatusCode::BAD_VALUE),
        }
    }

    /// Deserialize an Option of this type from the given parcel onto the
    /// current object. This operation will overwrite the current value
    /// partially or completely, depending on how much data is available.
    fn deserialize_option_from(this: &mut Option<Self>, parcel: &Parcel) -> Result<()> {
        *this = Self::deserialize_option(parcel)?;
        Ok(())
    }
}

impl Serialize for bool {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.write(&(*self as i32))
    }
}

impl Deserialize for bool {
    fn deserialize(parcel: &Parcel) -> Result<Self> {
        parcel.read::<i32>().map(|b| b != 0)
    }
}

impl Serialize for i8 {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.write(&i32::from(*self))
    }
}

impl Deserialize for i8 {
    fn deserialize(parcel: &Parcel) -> Result<Self> {
        parcel.read::<i32>().map(|b| b as i8)
    }
}

impl Serialize for u8 {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.write(&(*self as i8))
    }
}

impl Deserialize for u8 {
    fn deserialize(parcel: &Parcel) -> Result<Self> {
        parcel.read::<i32>().map(|b| b as u8)
    }
}

// char16 is widened to a full int32 slot.
impl Serialize for u16 {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.write(&i32::from(*self))
    }
}

impl Deserialize for u16 {
    fn deserialize(parcel: &Parcel) -> Result<Self> {
        parcel.read::<i32>().map(|c| c as u16)
    }
}

// A void return value occupies no space.
impl Serialize for () {
    fn serialize(&self, _parcel: &mut Parcel) -> Result<()> {
        Ok(())
    }
}

impl Deserialize for () {
    fn deserialize(_parcel: &Parcel) -> Result<Self> {
        Ok(())
    }
}

macro_rules! parcelable_le_bytes {
    ($($ty:ty)*) => {
        $(
            impl Serialize for $ty {
                fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
                    parcel.write_aligned(&self.to_le_bytes())
                }
            }

            impl Deserialize for $ty {
                fn deserialize(parcel: &Parcel) -> Result<Self> {
                    parcel.read_fixed().map(<$ty>::from_le_bytes)
                }
            }
        )*
    };
}

parcelable_le_bytes! { i32 u32 i64 u64 f32 f64 }

macro_rules! parcelable_array_default {
    ($($ty:ty = $size:expr),* $(,)?) => {
        $(
            impl SerializeArray for $ty {}
            impl DeserializeArray for $ty {
                const MIN_ENCODED_SIZE: usize = $size;
            }
        )*
    };
}

parcelable_array_default! {
    bool = 4,
    u16 = 4,
    i32 = 4,
    u32 = 4,
    i64 = 8,
    u64 = 8,
    f32 = 4,
    f64 = 8,
}

// Byte arrays are packed, four bytes per slot.
impl SerializeArray for u8 {
    fn serialize_array(slice: &[Self], parcel: &mut Parcel) -> Result<()> {
        parcel.write_slice_size(Some(slice))?;
        parcel.write_aligned(slice)
    }

    fn serialize_fixed_array(slice: &[Self], parcel: &mut Parcel) -> Result<()> {
        parcel.write_aligned(slice)
    }

    fn serialize_fixed_rows<const N: usize>(rows: &[[Self; N]], parcel: &mut Parcel) -> Result<()> {
        // Outer count, then every row back to back with no per-row length.
        parcel.write_slice_size(Some(rows))?;
        parcel.write_aligned(&rows.concat())
    }
}

impl DeserializeArray for u8 {
    const MIN_ENCODED_SIZE: usize = 1;

    fn deserialize_array(parcel: &Parcel) -> Result<Option<Vec<Self>>> {
        match parcel.read_packed_len(1, 0)? {
            Some(len) => parcel.read_aligned(len).map(|bytes| Some(bytes.to_vec())),
            None => Ok(None),
        }
    }

    fn deserialize_fixed_array<const N: usize>(parcel: &Parcel) -> Result<[Self; N]> {
        parcel.read_fixed()
    }

    fn deserialize_fixed_rows<const N: usize, const M: usize>(
        parcel: &Parcel,
    ) -> Result<[[Self; N]; M]> {
        let rows: i32 = parcel.read()?;
        if usize::try_from(rows).ok() != Some(M) {
            return Err(StatusCode::BAD_VALUE);
        }

        let len = N.checked_mul(M).ok_or(StatusCode::BAD_VALUE)?;
        let bytes = parcel.read_aligned(len)?;

        let mut result = [[0u8; N]; M];
        for (i, row) in result.iter_mut().enumerate() {
            row.copy_from_slice(&bytes[i * N..(i + 1) * N]);
        }
        Ok(result)
    }
}

impl SerializeArray for i8 {
    fn serialize_array(slice: &[Self], parcel: &mut Parcel) -> Result<()> {
        let bytes: Vec<u8> = slice.iter().map(|b| *b as u8).collect();
        u8::serialize_array(&bytes, parcel)
    }

    fn serialize_fixed_array(slice: &[Self], parcel: &mut Parcel) -> Result<()> {
        let bytes: Vec<u8> = slice.iter().map(|b| *b as u8).collect();
        u8::serialize_fixed_array(&bytes, parcel)
    }

    fn serialize_fixed_rows<const N: usize>(rows: &[[Self; N]], parcel: &mut Parcel) -> Result<()> {
        let rows: Vec<[u8; N]> = rows.iter().map(|row| row.map(|b| b as u8)).collect();
        u8::serialize_fixed_rows(&rows[..], parcel)
    }
}

impl DeserializeArray for i8 {
    const MIN_ENCODED_SIZE: usize = 1;

    fn deserialize_array(parcel: &Parcel) -> Result<Option<Vec<Self>>> {
        let bytes = u8::deserialize_array(parcel)?;
        Ok(bytes.map(|bytes| bytes.into_iter().map(|b| b as i8).collect()))
    }

    fn deserialize_fixed_array<const N: usize>(parcel: &Parcel) -> Result<[Self; N]> {
        u8::deserialize_fixed_array::<N>(parcel).map(|bytes| bytes.map(|b| b as i8))
    }

    fn deserialize_fixed_rows<const N: usize, const M: usize>(
        parcel: &Parcel,
    ) -> Result<[[Self; N]; M]> {
        let rows = u8::deserialize_fixed_rows::<N, M>(parcel)?;
        Ok(rows.map(|row| row.map(|b| b as i8)))
    }
}

// Strings are UTF-16 on the wire: a unit count (-1 when absent), the units, a
// NUL unit, then padding.
fn write_utf16(parcel: &mut Parcel, units: Option<&[u16]>) -> Result<()> {
    let units = match units {
        Some(units) => units,
        None => return parcel.write(&-1i32),
    };

    let len: i32 = units.len().try_into().or(Err(StatusCode::BAD_VALUE))?;
    parcel.write(&len)?;

    let bytes: Vec<u8> =
        units.iter().chain(iter::once(&0u16)).flat_map(|unit| unit.to_le_bytes()).collect();
    parcel.write_aligned(&bytes)
}

fn read_utf16(parcel: &Parcel) -> Result<Option<Vec<u16>>> {
    // The count excludes the NUL unit.
    let len = match parcel.read_packed_len(2, 1)? {
        Some(len) => len,
        None => return Ok(None),
    };

    let bytes = parcel.read_aligned((len + 1) * 2)?;
    let mut units: Vec<u16> =
        bytes.chunks_exact(2).map(|unit| u16::from_le_bytes([unit[0], unit[1]])).collect();

    if units.pop() != Some(0) {
        return Err(StatusCode::BAD_VALUE);
    }

    Ok(Some(units))
}

impl Serialize for String16 {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        write_utf16(parcel, Some(self.as_slice()))
    }
}

impl SerializeOption for String16 {
    fn serialize_option(this: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        write_utf16(parcel, this.map(String16::as_slice))
    }
}

impl SerializeArray for String16 {}

impl Deserialize for String16 {
    fn deserialize(parcel: &Parcel) -> Result<Self> {
        Deserialize::deserialize(parcel)
            .transpose()
            .unwrap_or(Err(StatusCode::UNEXPECTED_NULL))
    }
}

impl DeserializeOption for String16 {
    fn deserialize_option(parcel: &Parcel) -> Result<Option<Self>> {
        read_utf16(parcel).map(|units| units.map(String16::from_units))
    }
}

impl DeserializeArray for String16 {}

impl Serialize for str {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        let units: Vec<u16> = self.encode_utf16().collect();
        write_utf16(parcel, Some(&units))
    }
}

impl SerializeOption for str {
    fn serialize_option(this: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        match this {
            Some(s) => s.serialize(parcel),
            None => write_utf16(parcel, None),
        }
    }
}

impl Serialize for String {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        self.as_str().serialize(parcel)
    }
}

impl SerializeOption for String {
    fn serialize_option(this: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        SerializeOption::serialize_option(this.map(String::as_str), parcel)
    }
}

impl SerializeArray for String {}

impl Deserialize for String {
    fn deserialize(parcel: &Parcel) -> Result<Self> {
        Deserialize::deserialize(parcel)
            .transpose()
            .unwrap_or(Err(StatusCode::UNEXPECTED_NULL))
    }
}

impl DeserializeOption for String {
    fn deserialize_option(parcel: &Parcel) -> Result<Option<Self>> {
        match read_utf16(parcel)? {
            Some(units) => String::from_utf16(&units).map(Some).or(Err(StatusCode::BAD_VALUE)),
            None => Ok(None),
        }
    }
}

impl DeserializeArray for String {}

impl<T: SerializeArray> Serialize for [T] {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        SerializeArray::serialize_array(self, parcel)
    }
}

impl<T: SerializeArray> Serialize for Vec<T> {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        SerializeArray::serialize_array(&self[..], parcel)
    }
}

impl<T: SerializeArray> SerializeOption for [T] {
    fn serialize_option(this: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        if let Some(v) = this {
            SerializeArray::serialize_array(v, parcel)
        } else {
            parcel.write_slice_size::<T>(None)
        }
    }
}

impl<T: SerializeArray> SerializeOption for Vec<T> {
    fn serialize_option(this: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        SerializeOption::serialize_option(this.map(Vec::as_slice), parcel)
    }
}

impl<T: DeserializeArray> Deserialize for Vec<T> {
    fn deserialize(parcel: &Parcel) -> Result<Self> {
        DeserializeArray::deserialize_array(parcel)
            .transpose()
            .unwrap_or(Err(StatusCode::UNEXPECTED_NULL))
    }
}

impl<T: DeserializeArray> DeserializeOption for Vec<T> {
    fn deserialize_option(parcel: &Parcel) -> Result<Option<Self>> {
        DeserializeArray::deserialize_array(parcel)
    }
}

impl<T: SerializeArray, const N: usize> Serialize for [T; N] {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        T::serialize_fixed_array(self, parcel)
    }
}

impl<T: SerializeArray, const N: usize> SerializeArray for [T; N] {
    fn serialize_fixed_array(slice: &[Self], parcel: &mut Parcel) -> Result<()> {
        T::serialize_fixed_rows(slice, parcel)
    }
}

impl<T: SerializeArray, const N: usize> SerializeOption for [T; N] {}

impl<T: DeserializeArray, const N: usize> Deserialize for [T; N] {
    fn deserialize(parcel: &Parcel) -> Result<Self> {
        T::deserialize_fixed_array::<N>(parcel)
    }
}

impl<T: DeserializeArray, const N: usize> DeserializeArray for [T; N] {
    fn deserialize_fixed_array<const M: usize>(parcel: &Parcel) -> Result<[Self; M]> {
        T::deserialize_fixed_rows::<N, M>(parcel)
    }
}

impl<T: DeserializeArray, const N: usize> DeserializeOption for [T; N] {}

impl<T: SerializeOption> Serialize for Option<T> {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        SerializeOption::serialize_option(self.as_ref(), parcel)
    }
}

impl<T: SerializeOption> SerializeArray for Option<T> {}

impl<T: DeserializeOption> Deserialize for Option<T> {
    fn deserialize(parcel: &Parcel) -> Result<Self> {
        DeserializeOption::deserialize_option(parcel)
    }

    fn deserialize_from(&mut self, parcel: &Parcel) -> Result<()> {
        DeserializeOption::deserialize_option_from(self, parcel)
    }
}

impl<T: DeserializeOption> DeserializeArray for Option<T> {}

impl<T: Serialize + ?Sized> Serialize for &T {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        T::serialize(*self, parcel)
    }
}

impl<T: SerializeOption + ?Sized> SerializeOption for &T {
    fn serialize_option(this: Option<&&T>, parcel: &mut Parcel) -> Result<()> {
        T::serialize_option(this.copied(), parcel)
    }
}

impl<T: Serialize + ?Sized> SerializeArray for &T {}

impl<T: Serialize + ?Sized> Serialize for Box<T> {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        Serialize::serialize(&**self, parcel)
    }
}

impl<T: SerializeOption> SerializeOption for Box<T> {
    fn serialize_option(this: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        SerializeOption::serialize_option(this.map(|b| &**b), parcel)
    }
}

impl<T: Deserialize> Deserialize for Box<T> {
    fn deserialize(parcel: &Parcel) -> Result<Self> {
        Deserialize::deserialize(parcel).map(Box::new)
    }
}

impl<T: DeserializeOption> DeserializeOption for Box<T> {
    fn deserialize_option(parcel: &Parcel) -> Result<Option<Self>> {
        DeserializeOption::deserialize_option(parcel).map(|t: Option<T>| t.map(Box::new))
    }
}

/// Implement `Serialize` trait and friends for a parcelable
///
/// This is an internal macro used by the AIDL compiler to implement
/// `Serialize`, `SerializeArray` and `SerializeOption` for
/// structured parcelables. The target type must implement the
/// `Parcelable` trait.
#[macro_export]
macro_rules! impl_serialize_for_parcelable {
    ($parcelable:ident) => {
        impl $crate::parcel::Serialize for $parcelable {
            fn serialize(
                &self,
                parcel: &mut $crate::parcel::Parcel,
            ) -> std::result::Result<(), $crate::StatusCode> {
                <Self as $crate::parcel::SerializeOption>::serialize_option(Some(self), parcel)
            }
        }

        impl $crate::parcel::SerializeArray for $parcelable {}

        impl $crate::parcel::SerializeOption for $parcelable {
            fn serialize_option(
                this: Option<&Self>,
                parcel: &mut $crate::parcel::Parcel,
            ) -> std::result::Result<(), $crate::StatusCode> {
                if let Some(this) = this {
                    parcel.write(&$crate::parcel::NON_NULL_PARCELABLE_FLAG)?;
                    $crate::parcel::Parcelable::write_to_parcel(this, parcel)
                } else {
                    parcel.write(&$crate::parcel::NULL_PARCELABLE_FLAG)
                }
            }
        }
    };
}

/// Implement `Deserialize` trait and friends for a parcelable
///
/// This is an internal macro used by the AIDL compiler to implement
/// `Deserialize`, `DeserializeArray` and `DeserializeOption` for
/// structured parcelables. The target type must implement the
/// `Parcelable` trait and `Default`.
#[macro_export]
macro_rules! impl_deserialize_for_parcelable {
    ($parcelable:ident) => {
        impl $crate::parcel::Deserialize for $parcelable {
            fn deserialize(
                parcel: &$crate::parcel::Parcel,
            ) -> std::result::Result<Self, $crate::StatusCode> {
                <Self as $crate::parcel::DeserializeOption>::deserialize_option(parcel)
                    .transpose()
                    .unwrap_or(Err($crate::StatusCode::UNEXPECTED_NULL))
            }

            fn deserialize_from(
                &mut self,
                parcel: &$crate::parcel::Parcel,
            ) -> std::result::Result<(), $crate::StatusCode> {
                let status: i32 = parcel.read()?;
                if status == $crate::parcel::NULL_PARCELABLE_FLAG {
                    Err($crate::StatusCode::UNEXPECTED_NULL)
                } else {
                    $crate::parcel::Parcelable::read_from_parcel(self, parcel)
                }
            }
        }

        impl $crate::parcel::DeserializeArray for $parcelable {}

        impl $crate::parcel::DeserializeOption for $parcelable {
            fn deserialize_option(
                parcel: &$crate::parcel::Parcel,
            ) -> std::result::Result<Option<Self>, $crate::StatusCode> {
                let mut result = None;
                Self::deserialize_option_from(&mut result, parcel)?;
                Ok(result)
            }

            fn deserialize_option_from(
                this: &mut Option<Self>,
                parcel: &$crate::parcel::Parcel,
            ) -> std::result::Result<(), $crate::StatusCode> {
                let status: i32 = parcel.read()?;
                if status == $crate::parcel::NULL_PARCELABLE_FLAG {
                    *this = None;
                    Ok(())
                } else {
                    $crate::parcel::Parcelable::read_from_parcel(
                        this.get_or_insert_with(Self::default),
                        parcel,
                    )
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: i32,
        label: String,
    }

    impl Parcelable for Point {
        fn write_to_parcel(&self, parcel: &mut Parcel) -> Result<()> {
            parcel.sized_write(|subparcel| {
                subparcel.write(&self.x)?;
                subparcel.write(&self.label)
            })
        }

        fn read_from_parcel(&mut self, parcel: &Parcel) -> Result<()> {
            parcel.sized_read(|subparcel| {
                if subparcel.has_more_data() {
                    self.x = subparcel.read()?;
                }
                if subparcel.has_more_data() {
                    self.label = subparcel.read()?;
                }
                Ok(())
            })
        }
    }

    impl_serialize_for_parcelable!(Point);
    impl_deserialize_for_parcelable!(Point);

    #[test]
    fn test_custom_parcelable() {
        let point = Point { x: 42, label: "answer".into() };

        let mut parcel = Parcel::new();
        assert!(parcel.write(&point).is_ok());
        assert!(parcel.write(&(None as Option<Point>)).is_ok());
        assert!(parcel.set_data_position(0).is_ok());

        assert_eq!(parcel.read::<Point>(), Ok(point));
        assert_eq!(parcel.read::<Option<Point>>(), Ok(None));
    }

    #[test]
    fn test_null_parcelable_where_required() {
        let mut parcel = Parcel::new();
        assert!(parcel.write(&(None as Option<Point>)).is_ok());
        assert!(parcel.set_data_position(0).is_ok());
        assert_eq!(parcel.read::<Point>(), Err(StatusCode::UNEXPECTED_NULL));

        assert!(parcel.set_data_position(0).is_ok());
        let mut point = Point::default();
        assert_eq!(parcel.read_onto(&mut point), Err(StatusCode::UNEXPECTED_NULL));
    }

    #[test]
    fn test_slices() {
        let bools = [true, false, false, true];

        let mut parcel = Parcel::new();

        assert!(parcel.write(&bools[..]).is_ok());
        assert!(parcel.set_data_position(0).is_ok());

        assert_eq!(
            parcel.data(),
            [4, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0]
        );
        assert_eq!(parcel.read::<Vec<bool>>().unwrap(), bools);

        let u8s = [101u8, 255, 42, 117];

        let mut parcel = Parcel::new();

        assert!(parcel.write(&u8s[..]).is_ok());
        assert_eq!(parcel.data_position(), 8);
        assert!(parcel.set_data_position(0).is_ok());
        assert_eq!(parcel.data(), [4, 0, 0, 0, 101, 255, 42, 117]);
        assert_eq!(parcel.read::<Vec<u8>>().unwrap(), u8s);

        let i8s = [-128i8, 127, 42, -117];

        assert!(parcel.set_data_position(0).is_ok());
        assert!(parcel.write(&i8s[..]).is_ok());
        assert!(parcel.set_data_position(0).is_ok());
        assert_eq!(parcel.data(), [4, 0, 0, 0, 128, 127, 42, 139]);
        assert_eq!(parcel.read::<Vec<i8>>().unwrap(), i8s);

        let u16s = [u16::MAX, 12_345, 42, 117];

        let mut parcel = Parcel::new();
        assert!(parcel.write(&u16s[..]).is_ok());
        assert!(parcel.set_data_position(0).is_ok());
        assert_eq!(
            parcel.data(),
            [4, 0, 0, 0, 255, 255, 0, 0, 57, 48, 0, 0, 42, 0, 0, 0, 117, 0, 0, 0]
        );
        assert_eq!(parcel.read::<Vec<u16>>().unwrap(), u16s);

        let i32s = [i32::MAX, i32::MIN, 42, -117];

        assert!(parcel.set_data_position(0).is_ok());
        assert!(parcel.write(&i32s[..]).is_ok());
        assert!(parcel.set_data_position(0).is_ok());
        assert_eq!(
            parcel.data(),
            [4, 0, 0, 0, 255, 255, 255, 127, 0, 0, 0, 128, 42, 0, 0, 0, 139, 255, 255, 255]
        );
        assert_eq!(parcel.read::<Vec<i32>>().unwrap(), i32s);

        let i64s = [i64::MAX, i64::MIN, 42, -117];

        assert!(parcel.set_data_position(0).is_ok());
        assert!(parcel.write(&i64s[..]).is_ok());
        assert!(parcel.set_data_position(0).is_ok());
        assert_eq!(parcel.read::<Vec<i64>>().unwrap(), i64s);

        let f32s = [f32::NAN, f32::INFINITY, 1.23456789, f32::EPSILON];

        assert!(parcel.set_data_position(0).is_ok());
        assert!(parcel.write(&f32s[..]).is_ok());
        assert!(parcel.set_data_position(0).is_ok());

        let vec = parcel.read::<Vec<f32>>().unwrap();

        // NAN != NAN so we can't use it in the assert_eq:
        assert!(vec[0].is_nan());
        assert_eq!(vec[1..], f32s[1..]);

        let str16s: [String16; 3] =
            ["Hello, Binder!".into(), "This is a utf16 string.".into(), "".into()];

        assert!(parcel.set_data_position(0).is_ok());
        assert!(parcel.write(&str16s[..]).is_ok());
        assert!(parcel.set_data_position(0).is_ok());
        assert_eq!(parcel.read::<Vec<String16>>().unwrap(), str16s);
    }

    #[test]
    fn test_nullable_sequences_are_three_state() {
        let mut parcel = Parcel::new();

        assert!(parcel.write(&(None as Option<Vec<i32>>)).is_ok());
        assert!(parcel.write(&Some(Vec::<i32>::new())).is_ok());
        assert!(parcel.write(&Some(vec![7i32])).is_ok());
        assert!(parcel.write(&vec![Some("a".to_string()), None]).is_ok());
        assert!(parcel.set_data_position(0).is_ok());

        assert_eq!(parcel.data()[..4], (-1i32).to_le_bytes());
        assert_eq!(parcel.read::<Option<Vec<i32>>>(), Ok(None));
        assert_eq!(parcel.read::<Option<Vec<i32>>>(), Ok(Some(vec![])));
        assert_eq!(parcel.read::<Option<Vec<i32>>>(), Ok(Some(vec![7])));
        assert_eq!(
            parcel.read::<Vec<Option<String>>>(),
            Ok(vec![Some("a".to_string()), None])
        );

        assert!(parcel.set_data_position(0).is_ok());
        assert_eq!(parcel.read::<Vec<i32>>(), Err(StatusCode::UNEXPECTED_NULL));
    }

    #[test]
    fn test_string_encoding() {
        let mut parcel = Parcel::new();

        assert!(parcel.write("ab").is_ok());
        assert_eq!(parcel.data(), [2, 0, 0, 0, b'a', 0, b'b', 0, 0, 0, 0, 0]);

        // Embedded NULs and surrogate pairs survive.
        let tricky = "\0\0\u{10437}\u{20AC}";
        assert!(parcel.set_data_position(0).is_ok());
        assert!(parcel.write(tricky).is_ok());
        assert!(parcel.write("").is_ok());
        assert!(parcel.write(&(None as Option<&str>)).is_ok());
        assert!(parcel.set_data_position(0).is_ok());
        assert_eq!(parcel.read::<String>().as_deref(), Ok(tricky));
        assert_eq!(parcel.read::<Option<String>>(), Ok(Some(String::new())));
        assert_eq!(parcel.read::<Option<String>>(), Ok(None));

        // A lone surrogate is a valid String16 but not a valid String.
        let lone = String16::from_units(vec![0xD800]);
        let mut parcel = Parcel::new();
        assert!(parcel.write(&lone).is_ok());
        assert!(parcel.set_data_position(0).is_ok());
        assert_eq!(parcel.read::<String16>(), Ok(lone));
        assert!(parcel.set_data_position(0).is_ok());
        assert_eq!(parcel.read::<String>(), Err(StatusCode::BAD_VALUE));
    }

    #[test]
    fn test_malformed_lengths() {
        let mut parcel = Parcel::new();

        // Declares 100 ints but only carries one.
        parcel.set_data(&[100, 0, 0, 0, 1, 0, 0, 0]);
        assert_eq!(parcel.read::<Vec<i32>>(), Err(StatusCode::BAD_VALUE));

        parcel.set_data(&(-2i32).to_le_bytes());
        assert_eq!(parcel.read::<Option<Vec<u8>>>(), Err(StatusCode::BAD_VALUE));

        parcel.set_data(&[9, 0, 0, 0, b'a', 0, 0, 0]);
        assert_eq!(parcel.read::<Option<String>>(), Err(StatusCode::BAD_VALUE));

        // Missing NUL terminator.
        parcel.set_data(&[1, 0, 0, 0, b'a', 0, b'b', 0]);
        assert_eq!(parcel.read::<String16>(), Err(StatusCode::BAD_VALUE));

        // 64-bit elements need eight bytes each.
        parcel.set_data(&[2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 7, 0, 0, 0]);
        assert_eq!(parcel.read::<Vec<i64>>(), Err(StatusCode::BAD_VALUE));
        parcel.set_data(&[1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(parcel.read::<Vec<f64>>(), Err(StatusCode::BAD_VALUE));
        parcel.set_data(&[1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(parcel.read::<Vec<crate::interfaces::enums::LongEnum>>(), Err(StatusCode::BAD_VALUE));

        // Packed payloads must include their padding.
        parcel.set_data(&[3, 0, 0, 0, 1, 2, 3]);
        assert_eq!(parcel.read::<Vec<u8>>(), Err(StatusCode::BAD_VALUE));
        parcel.set_data(&[2, 0, 0, 0, b'a', 0, b'b', 0, 0, 0]);
        assert_eq!(parcel.read::<String>(), Err(StatusCode::BAD_VALUE));

        // Truncated scalars are a different failure.
        parcel.set_data(&[1, 0, 0, 0, 2, 0]);
        assert_eq!(parcel.read::<i64>(), Err(StatusCode::NOT_ENOUGH_DATA));
    }

    #[test]
    fn test_fixed_byte_rows_are_packed() {
        let rows: [[u8; 3]; 2] = [[1, 2, 3], [4, 5, 6]];

        let mut parcel = Parcel::new();
        assert!(parcel.write(&rows).is_ok());
        assert!(parcel.set_data_position(0).is_ok());

        // Outer count, then six contiguous bytes and two bytes of padding.
        assert_eq!(parcel.data(), [2, 0, 0, 0, 1, 2, 3, 4, 5, 6, 0, 0]);
        assert_eq!(parcel.read::<[[u8; 3]; 2]>(), Ok(rows));

        // A row count that disagrees with the declared shape is rejected.
        assert!(parcel.set_data_position(0).is_ok());
        assert_eq!(parcel.read::<[[u8; 3]; 3]>(), Err(StatusCode::BAD_VALUE));
        assert!(parcel.set_data_position(0).is_ok());
        assert_eq!(parcel.read::<[[u8; 2]; 3]>(), Err(StatusCode::BAD_VALUE));
    }

    #[test]
    fn test_fixed_arrays_carry_no_count() {
        let ints: [[i32; 2]; 2] = [[1, 2], [3, 4]];
        let bytes: [i8; 3] = [-1, 0, 1];

        let mut parcel = Parcel::new();
        assert!(parcel.write(&ints).is_ok());
        assert_eq!(parcel.data_size(), 16);
        assert!(parcel.write(&bytes).is_ok());
        assert_eq!(parcel.data_size(), 20);
        assert!(parcel.write(&(None as Option<[i32; 2]>)).is_ok());
        assert!(parcel.write(&Some([5i32, 6])).is_ok());
        assert!(parcel.write(&[Some("x".to_string()), None]).is_ok());
        assert!(parcel.set_data_position(0).is_ok());

        assert_eq!(parcel.read::<[[i32; 2]; 2]>(), Ok(ints));
        assert_eq!(parcel.read::<[i8; 3]>(), Ok(bytes));
        assert_eq!(parcel.read::<Option<[i32; 2]>>(), Ok(None));
        assert_eq!(parcel.read::<Option<[i32; 2]>>(), Ok(Some([5, 6])));
        assert_eq!(parcel.read::<[Option<String>; 2]>(), Ok([Some("x".to_string()), None]));
    }
}
