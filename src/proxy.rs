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

//! Rust API for interacting with a remote binder service.

use crate::binder::{
    FromIBinder, Strong, TransactionCode, TransactionFlags, FLAG_ONEWAY, INTERFACE_TRANSACTION,
    PING_TRANSACTION,
};
use crate::error::{Result, StatusCode};
use crate::parcel::{
    Deserialize, DeserializeArray, DeserializeOption, Parcel, Serialize, SerializeArray,
    SerializeOption,
};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// The transport seen from the calling side of a binder reference.
pub(crate) trait IBinderInternal: Send + Sync {
    /// Deliver `data` to the object and collect its answer in `reply`.
    fn transact(
        &self,
        code: TransactionCode,
        data: &Parcel,
        reply: &mut Parcel,
        flags: TransactionFlags,
    ) -> Result<()>;
}

/// A strong reference to a Binder remote object.
///
/// This struct encapsulates the generic C++ `sp<IBinder>` class. This wrapper
/// is untyped; typed interface access is implemented by the AIDL compiler.
///
/// References compare equal, and hash alike, exactly when they point at the
/// same binder object.
#[derive(Clone)]
pub struct SpIBinder(Arc<dyn IBinderInternal>);

impl SpIBinder {
    pub(crate) fn from_internal(binder: Arc<dyn IBinderInternal>) -> Self {
        Self(binder)
    }

    fn as_ptr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast()
    }

    /// Try to convert this Binder object into a trait object for the given
    /// Binder interface.
    ///
    /// If this object does not implement the expected interface, the error
    /// `StatusCode::BAD_TYPE` is returned.
    pub fn into_interface<I: FromIBinder + ?Sized>(self) -> Result<Strong<I>> {
        <I as FromIBinder>::try_from(self)
    }

    /// Create a new empty parcel for the request of a transaction.
    pub fn prepare_transact(&self) -> Result<Parcel> {
        Ok(Parcel::new())
    }

    /// Send a fully built request to this object and wait for the reply.
    ///
    /// The request is read from its start and the reply is rewound so the
    /// caller can decode it directly. A one-way request returns an empty
    /// reply and never reports the callee's failure.
    pub fn submit_transact(
        &self,
        code: TransactionCode,
        data: Parcel,
        flags: TransactionFlags,
    ) -> Result<Parcel> {
        data.set_data_position(0)?;
        let mut reply = Parcel::new();

        if flags & FLAG_ONEWAY != 0 {
            if let Err(e) = self.0.transact(code, &data, &mut reply, flags) {
                log::warn!("oneway transaction {:#x} failed: {}", code, e);
            }
            return Ok(Parcel::new());
        }

        self.0.transact(code, &data, &mut reply, flags)?;
        reply.set_data_position(0)?;
        Ok(reply)
    }

    /// Perform a generic operation with the object.
    ///
    /// # Arguments
    /// * `code` - Transaction code for the operation
    /// * `flags` - Transaction flags, e.g. marking the transaction as
    ///   asynchronous ([`FLAG_ONEWAY`](crate::FLAG_ONEWAY))
    /// * `input_callback` A callback for building the `Parcel` to be sent
    ///   to the target binder object.
    pub fn transact<F: FnOnce(&mut Parcel) -> Result<()>>(
        &self,
        code: TransactionCode,
        flags: TransactionFlags,
        input_callback: F,
    ) -> Result<Parcel> {
        let mut parcel = self.prepare_transact()?;
        input_callback(&mut parcel)?;
        self.submit_transact(code, parcel, flags)
    }

    /// Send a ping transaction to this object
    pub fn ping_binder(&self) -> Result<()> {
        self.submit_transact(PING_TRANSACTION, Parcel::new(), 0).map(|_| ())
    }

    /// Return the canonical name of the interface provided by this IBinder
    /// object.
    pub fn get_interface_descriptor(&self) -> Result<String> {
        let reply = self.submit_transact(INTERFACE_TRANSACTION, Parcel::new(), 0)?;
        reply.read()
    }

    /// Is this object still alive?
    ///
    /// Objects live as long as any reference to them, so this is always
    /// true within one process.
    pub fn is_binder_alive(&self) -> bool {
        true
    }
}

impl PartialEq for SpIBinder {
    fn eq(&self, other: &Self) -> bool {
        self.as_ptr() == other.as_ptr()
    }
}

impl Eq for SpIBinder {}

impl Hash for SpIBinder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_ptr().hash(state)
    }
}

impl fmt::Debug for SpIBinder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SpIBinder({:p})", self.as_ptr())
    }
}

impl Serialize for SpIBinder {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.write_binder(Some(self))
    }
}

impl SerializeOption for SpIBinder {
    fn serialize_option(this: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        parcel.write_binder(this)
    }
}

impl SerializeArray for SpIBinder {}

impl Deserialize for SpIBinder {
    fn deserialize(parcel: &Parcel) -> Result<SpIBinder> {
        parcel.read_binder().transpose().unwrap_or(Err(StatusCode::UNEXPECTED_NULL))
    }
}

impl DeserializeOption for SpIBinder {
    fn deserialize_option(parcel: &Parcel) -> Result<Option<SpIBinder>> {
        parcel.read_binder()
    }
}

impl DeserializeArray for SpIBinder {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Remotable;
    use crate::native::Binder;
    use std::collections::HashSet;

    struct Nothing;

    impl Remotable for Nothing {
        fn get_descriptor() -> &'static str {
            "test.Nothing"
        }

        fn on_transact(&self, _: TransactionCode, _: &Parcel, _: &mut Parcel) -> Result<()> {
            Err(StatusCode::UNKNOWN_TRANSACTION)
        }
    }

    #[test]
    fn test_identity() {
        let a: SpIBinder = Binder::new(Nothing).into();
        let b: SpIBinder = Binder::new(Nothing).into();

        assert_eq!(a, a.clone());
        assert_ne!(a, b);

        let set: HashSet<SpIBinder> = [a.clone(), b.clone(), a.clone()].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_binders_through_parcel() {
        let a: SpIBinder = Binder::new(Nothing).into();
        let b: SpIBinder = Binder::new(Nothing).into();

        let mut parcel = Parcel::new();
        assert!(parcel.write(&a).is_ok());
        assert!(parcel.write(&(None as Option<SpIBinder>)).is_ok());
        assert!(parcel.write(&vec![Some(b.clone()), None, Some(a.clone())]).is_ok());
        assert_eq!(parcel.objects_count(), 3);
        assert!(parcel.set_data_position(0).is_ok());

        assert_eq!(parcel.read::<SpIBinder>(), Ok(a.clone()));
        assert_eq!(parcel.read::<Option<SpIBinder>>(), Ok(None));
        assert_eq!(parcel.read::<Vec<Option<SpIBinder>>>(), Ok(vec![Some(b), None, Some(a)]));

        // A null reference where one is required.
        assert!(parcel.set_data_position(4).is_ok());
        assert_eq!(parcel.read::<SpIBinder>(), Err(StatusCode::UNEXPECTED_NULL));
    }

    #[test]
    fn test_forged_object_is_rejected() {
        let mut parcel = Parcel::new();
        assert!(parcel.write(&0x7362_2a85i32).is_ok());
        assert!(parcel.set_data_position(0).is_ok());
        assert_eq!(parcel.read::<Option<SpIBinder>>(), Err(StatusCode::BAD_TYPE));
    }
}
