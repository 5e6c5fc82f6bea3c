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

use crate::binder::{
    Remotable, TransactionCode, TransactionFlags, FLAG_ONEWAY, INTERFACE_TRANSACTION,
    PING_TRANSACTION,
};
use crate::error::{Result, StatusCode};
use crate::parcel::Parcel;
use crate::proxy::{IBinderInternal, SpIBinder};

use std::ops::Deref;
use std::sync::Arc;

/// Rust wrapper around Binder remotable objects.
///
/// Implements the C++ `BBinder` class: built-in transactions are answered
/// here, everything else is forwarded to the wrapped [`Remotable`].
pub struct Binder<T: Remotable> {
    rust_object: T,
}

impl<T: Remotable> Binder<T> {
    /// Create a new Binder remotable object.
    ///
    /// This moves the `rust_object` into the binder. Converting the binder
    /// into an [`SpIBinder`] hands its lifetime over to reference counting.
    pub fn new(rust_object: T) -> Binder<T> {
        Binder { rust_object }
    }
}

impl<T: Remotable> IBinderInternal for Binder<T> {
    fn transact(
        &self,
        code: TransactionCode,
        data: &Parcel,
        reply: &mut Parcel,
        flags: TransactionFlags,
    ) -> Result<()> {
        log::debug!(
            "{}: transaction {:#x}{}",
            T::get_descriptor(),
            code,
            if flags & FLAG_ONEWAY != 0 { " (oneway)" } else { "" }
        );

        match code {
            PING_TRANSACTION => Ok(()),
            INTERFACE_TRANSACTION => reply.write(T::get_descriptor()),
            _ => {
                let result = self.rust_object.on_transact(code, data, reply);
                if result == Err(StatusCode::UNKNOWN_TRANSACTION) {
                    log::warn!("{}: unknown transaction {:#x}", T::get_descriptor(), code);
                }
                result
            }
        }
    }
}

impl<T: Remotable> Deref for Binder<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.rust_object
    }
}

impl<B: Remotable> From<Binder<B>> for SpIBinder {
    fn from(binder_native: Binder<B>) -> Self {
        SpIBinder::from_internal(Arc::new(binder_native))
    }
}
