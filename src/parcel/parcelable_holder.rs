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

use crate::binder::Stability;
use crate::error::{Result, StatusCode};
use crate::parcel::{
    Deserialize, DeserializeOption, Parcel, Parcelable, ParcelableMetadata, Serialize,
    SerializeOption, NON_NULL_PARCELABLE_FLAG, NULL_PARCELABLE_FLAG,
};

use downcast_rs::{impl_downcast, DowncastSync};
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Type-erased value stored in a `ParcelableHolder`.
trait AnyParcelable: DowncastSync + Parcelable + fmt::Debug {}
impl_downcast!(sync AnyParcelable);
impl<T> AnyParcelable for T where T: DowncastSync + Parcelable + fmt::Debug {}

#[derive(Debug)]
enum ParcelableHolderData {
    Empty,
    Parcelable { parcelable: Arc<dyn AnyParcelable>, name: String },
    Parcel(Parcel),
}

impl ParcelableHolderData {
    fn try_clone(&self) -> Result<Self> {
        Ok(match self {
            ParcelableHolderData::Empty => ParcelableHolderData::Empty,
            ParcelableHolderData::Parcelable { parcelable, name } => {
                ParcelableHolderData::Parcelable {
                    parcelable: Arc::clone(parcelable),
                    name: name.clone(),
                }
            }
            ParcelableHolderData::Parcel(parcel) => {
                let mut new_parcel = Parcel::new();
                new_parcel.append_all_from(parcel)?;
                ParcelableHolderData::Parcel(new_parcel)
            }
        })
    }
}

/// A container that can hold any single `Parcelable` as an extension slot.
///
/// The holder keeps either a live value, or the still-serialized bytes it
/// received from a parcel. Those bytes are decoded the first time they are
/// requested as a concrete type whose descriptor matches. Asking for any
/// other type yields `None` without disturbing the stored value.
///
/// A holder has a fixed [`Stability`] and refuses values that are less
/// stable than itself.
pub struct ParcelableHolder {
    // This is a `Mutex` because of `get_parcelable`
    // which takes `&self` for consistency with C++.
    // We could make `get_parcelable` take a `&mut self`
    // and get rid of the `Mutex` here for a performance
    // improvement, but then callers would require a mutable
    // `ParcelableHolder` even for that getter method.
    data: Mutex<ParcelableHolderData>,
    stability: Stability,
}

impl ParcelableHolder {
    /// Construct a new empty `ParcelableHolder` with the given stability.
    pub fn new(stability: Stability) -> Self {
        Self { data: Mutex::new(ParcelableHolderData::Empty), stability }
    }

    fn lock(&self) -> MutexGuard<'_, ParcelableHolderData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reset the contents of this `ParcelableHolder`.
    ///
    /// Note that this method does not reset the stability,
    /// only the contents.
    pub fn reset(&mut self) {
        *self.data.get_mut().unwrap_or_else(PoisonError::into_inner) = ParcelableHolderData::Empty;
    }

    /// Set the parcelable contained in this `ParcelableHolder`.
    pub fn set_parcelable<T>(&mut self, p: Arc<T>) -> Result<()>
    where
        T: Any + Parcelable + ParcelableMetadata + fmt::Debug + Send + Sync,
    {
        if self.stability > p.get_stability() {
            return Err(StatusCode::BAD_VALUE);
        }

        *self.data.get_mut().unwrap_or_else(PoisonError::into_inner) =
            ParcelableHolderData::Parcelable { parcelable: p, name: T::get_descriptor().into() };

        Ok(())
    }

    /// Retrieve the parcelable stored in this `ParcelableHolder`.
    ///
    /// This method attempts to retrieve the parcelable inside
    /// the current object as a parcelable of type `T`.
    /// The object is validated against `T` by checking that
    /// its parcelable descriptor matches the one returned
    /// by `T::get_descriptor()`.
    ///
    /// Returns `Ok(None)` if the holder is empty or the descriptor
    /// does not match.
    pub fn get_parcelable<T>(&self) -> Result<Option<Arc<T>>>
    where
        T: Any + Parcelable + ParcelableMetadata + Default + fmt::Debug + Send + Sync,
    {
        let parcelable_desc = T::get_descriptor();
        let mut data = self.lock();
        match *data {
            ParcelableHolderData::Empty => Ok(None),
            ParcelableHolderData::Parcelable { ref parcelable, ref name } => {
                if name != parcelable_desc {
                    return Ok(None);
                }

                Ok(Arc::clone(parcelable).downcast_arc::<T>().ok())
            }
            ParcelableHolderData::Parcel(ref parcel) => {
                parcel.set_data_position(0)?;

                let name: String = parcel.read()?;
                if name != parcelable_desc {
                    return Ok(None);
                }

                let mut parcelable = T::default();
                parcelable.read_from_parcel(parcel)?;

                let parcelable = Arc::new(parcelable);
                let result = Arc::clone(&parcelable);
                *data = ParcelableHolderData::Parcelable { parcelable, name };

                Ok(Some(result))
            }
        }
    }

    /// Return the stability value of this object.
    pub fn get_stability(&self) -> Stability {
        self.stability
    }

    /// Copy this holder.
    ///
    /// A value that is still serialized is copied as bytes, and any file
    /// descriptors in it are duplicated. Fails if a descriptor cannot be
    /// duplicated.
    pub fn try_clone(&self) -> Result<Self> {
        let data = self.lock().try_clone()?;
        Ok(Self { data: Mutex::new(data), stability: self.stability })
    }
}

/// Same as [`ParcelableHolder::try_clone`], except that a failure to duplicate
/// a file descriptor is logged and yields an empty holder with the same
/// stability.
impl Clone for ParcelableHolder {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|e| {
            log::warn!("ParcelableHolder clone dropped its value: {}", e);
            Self::new(self.stability)
        })
    }
}

// Two holders are equal only when they are the same holder.
impl PartialEq for ParcelableHolder {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for ParcelableHolder {}

impl fmt::Debug for ParcelableHolder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ParcelableHolder").field("stability", &self.stability).finish()
    }
}

impl Serialize for ParcelableHolder {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.write(&NON_NULL_PARCELABLE_FLAG)?;
        self.write_to_parcel(parcel)
    }
}

impl SerializeOption for ParcelableHolder {
    fn serialize_option(this: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        match this {
            Some(holder) => holder.serialize(parcel),
            None => parcel.write(&NULL_PARCELABLE_FLAG),
        }
    }
}

impl Deserialize for ParcelableHolder {
    fn deserialize(parcel: &Parcel) -> Result<Self> {
        let status: i32 = parcel.read()?;
        if status == NULL_PARCELABLE_FLAG {
            return Err(StatusCode::UNEXPECTED_NULL);
        }

        let mut holder = ParcelableHolder::new(Stability::Local);
        holder.read_from_parcel(parcel)?;
        Ok(holder)
    }
}

impl DeserializeOption for ParcelableHolder {
    fn deserialize_option(parcel: &Parcel) -> Result<Option<Self>> {
        let status: i32 = parcel.read()?;
        if status == NULL_PARCELABLE_FLAG {
            return Ok(None);
        }

        let mut holder = ParcelableHolder::new(Stability::Local);
        holder.read_from_parcel(parcel)?;
        Ok(Some(holder))
    }
}

impl Parcelable for ParcelableHolder {
    fn write_to_parcel(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.write(&i32::from(self.stability))?;

        match *self.lock() {
            ParcelableHolderData::Empty => parcel.write(&0i32),
            ParcelableHolderData::Parcelable { ref parcelable, ref name } => {
                // The size counts the payload only, not itself.
                let length_start = parcel.data_position();
                parcel.write(&0i32)?;

                let data_start = parcel.data_position();
                parcel.write(name)?;
                parcelable.write_to_parcel(parcel)?;

                let end = parcel.data_position();
                let size: i32 = (end - data_start).try_into().or(Err(StatusCode::BAD_VALUE))?;
                parcel.set_data_position(length_start)?;
                parcel.write(&size)?;
                parcel.set_data_position(end)
            }
            ParcelableHolderData::Parcel(ref p) => {
                let size: i32 = p.data_size().try_into().or(Err(StatusCode::BAD_VALUE))?;
                parcel.write(&size)?;
                parcel.append_all_from(p)
            }
        }
    }

    fn read_from_parcel(&mut self, parcel: &Parcel) -> Result<()> {
        self.stability = parcel.read::<i32>()?.try_into()?;

        let data_size: i32 = parcel.read()?;
        let data = if data_size < 0 {
            return Err(StatusCode::BAD_VALUE);
        } else if data_size == 0 {
            ParcelableHolderData::Empty
        } else {
            let data_start = parcel.data_position();
            let data_size = data_size as usize;

            let mut new_parcel = Parcel::new();
            new_parcel.append_from(parcel, data_start, data_size)?;
            parcel.set_data_position(data_start + data_size)?;
            ParcelableHolderData::Parcel(new_parcel)
        };

        *self.data.get_mut().unwrap_or_else(PoisonError::into_inner) = data;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parcel::ParcelFileDescriptor;
    use std::os::unix::io::AsRawFd;

    #[derive(Debug, Default, PartialEq)]
    struct Extension {
        a: i32,
        b: String,
    }

    impl Parcelable for Extension {
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

    impl ParcelableMetadata for Extension {
        fn get_descriptor() -> &'static str {
            "test.Extension"
        }
    }

    #[derive(Debug, Default)]
    struct OtherExtension;

    impl Parcelable for OtherExtension {
        fn write_to_parcel(&self, parcel: &mut Parcel) -> Result<()> {
            parcel.sized_write(|_| Ok(()))
        }

        fn read_from_parcel(&mut self, parcel: &Parcel) -> Result<()> {
            parcel.sized_read(|_| Ok(()))
        }
    }

    impl ParcelableMetadata for OtherExtension {
        fn get_descriptor() -> &'static str {
            "test.OtherExtension"
        }
    }

    #[test]
    fn test_holder_rejects_less_stable_values() {
        let mut holder = ParcelableHolder::new(Stability::Vintf);
        assert_eq!(
            holder.set_parcelable(Arc::new(Extension::default())),
            Err(StatusCode::BAD_VALUE)
        );
        assert_eq!(holder.get_parcelable::<Extension>(), Ok(None));
    }

    #[test]
    fn test_holder_typed_access() {
        let mut holder = ParcelableHolder::new(Stability::Local);
        assert_eq!(holder.get_parcelable::<Extension>(), Ok(None));

        let ext = Arc::new(Extension { a: 42, b: "ext".into() });
        assert!(holder.set_parcelable(Arc::clone(&ext)).is_ok());

        let got = holder.get_parcelable::<Extension>().unwrap().unwrap();
        assert!(Arc::ptr_eq(&got, &ext));
        assert_eq!(holder.get_parcelable::<OtherExtension>().map(|o| o.is_some()), Ok(false));

        holder.reset();
        assert_eq!(holder.get_parcelable::<Extension>(), Ok(None));
    }

    #[test]
    fn test_holder_decodes_lazily_after_transfer() {
        let mut holder = ParcelableHolder::new(Stability::Local);
        assert!(holder.set_parcelable(Arc::new(Extension { a: 7, b: "seven".into() })).is_ok());

        let mut parcel = Parcel::new();
        assert!(parcel.write(&holder).is_ok());
        assert!(parcel.write(&99i32).is_ok());
        assert!(parcel.set_data_position(0).is_ok());

        let received: ParcelableHolder = parcel.read().unwrap();
        assert_eq!(parcel.read::<i32>(), Ok(99));
        assert_eq!(received.get_stability(), Stability::Local);

        // A mismatched request leaves the serialized value in place.
        assert_eq!(received.get_parcelable::<OtherExtension>().map(|o| o.is_some()), Ok(false));
        let ext = received.get_parcelable::<Extension>().unwrap().unwrap();
        assert_eq!(*ext, Extension { a: 7, b: "seven".into() });

        // Cloning a still-serialized holder copies the bytes.
        let mut parcel = Parcel::new();
        assert!(parcel.write(&holder).is_ok());
        assert!(parcel.set_data_position(0).is_ok());
        let received: ParcelableHolder = parcel.read().unwrap();
        let copy = received.clone();
        assert_ne!(copy, received);
        assert_eq!(copy, copy);
        assert_eq!(copy.get_parcelable::<Extension>().unwrap().map(|e| e.a), Some(7));
    }

    #[derive(Debug, Default)]
    struct FdExtension {
        fd: Option<ParcelFileDescriptor>,
    }

    impl Parcelable for FdExtension {
        fn write_to_parcel(&self, parcel: &mut Parcel) -> Result<()> {
            parcel.sized_write(|subparcel| subparcel.write(&self.fd))
        }

        fn read_from_parcel(&mut self, parcel: &Parcel) -> Result<()> {
            parcel.sized_read(|subparcel| {
                if subparcel.has_more_data() {
                    self.fd = subparcel.read()?;
                }
                Ok(())
            })
        }
    }

    impl ParcelableMetadata for FdExtension {
        fn get_descriptor() -> &'static str {
            "test.FdExtension"
        }
    }

    #[test]
    fn test_holder_clone_duplicates_descriptors() {
        let file = ParcelFileDescriptor::new(tempfile::tempfile().unwrap());
        let mut holder = ParcelableHolder::new(Stability::Local);
        let ext = FdExtension { fd: Some(file.try_clone().unwrap()) };
        assert!(holder.set_parcelable(Arc::new(ext)).is_ok());

        let mut parcel = Parcel::new();
        assert!(parcel.write(&holder).is_ok());
        assert!(parcel.set_data_position(0).is_ok());
        let received: ParcelableHolder = parcel.read().unwrap();
        drop(parcel);

        let copy = received.try_clone().unwrap();
        drop(received);
        assert_eq!(copy.get_stability(), Stability::Local);
        let ext = copy.get_parcelable::<FdExtension>().unwrap().unwrap();
        let fd = ext.fd.as_ref().unwrap();
        assert_eq!(*fd, file);
        assert_ne!(fd.as_raw_fd(), file.as_raw_fd());

        let copy = copy.clone();
        let ext = copy.get_parcelable::<FdExtension>().unwrap().unwrap();
        assert_eq!(ext.fd.as_ref(), Some(&file));
    }

    #[test]
    fn test_empty_holder_wire_form() {
        let holder = ParcelableHolder::new(Stability::Vintf);

        let mut parcel = Parcel::new();
        assert!(parcel.write(&holder).is_ok());
        assert_eq!(parcel.data(), [1, 0, 0, 0, 0b111111, 0, 0, 0, 0, 0, 0, 0]);

        assert!(parcel.set_data_position(0).is_ok());
        let received: ParcelableHolder = parcel.read().unwrap();
        assert_eq!(received.get_stability(), Stability::Vintf);
        assert_eq!(received.get_parcelable::<Extension>(), Ok(None));
    }
}
