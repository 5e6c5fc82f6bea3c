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

//! In-process Binder runtime and the AIDL conformance interfaces.
//!
//! Every call made through an interface handle is encoded into a [`Parcel`],
//! dispatched to the native object by transaction code, and decoded again on
//! the way back, so the wire contract is exercised even without a kernel
//! driver.
//!
//! # Example
//!
//! ```
//! use binder_conformance::interfaces::test_service::{BnTestService, ITestService};
//! use binder_conformance::service::TestService;
//!
//! let service = BnTestService::new_binder(TestService::default());
//! assert_eq!(service.repeat_int(1 << 30), Ok(1 << 30));
//!
//! let mut repeated = vec![];
//! assert_eq!(service.reverse_int(&[1, 2, 3], &mut repeated), Ok(vec![3, 2, 1]));
//! assert_eq!(repeated, [1, 2, 3]);
//! ```

#[macro_use]
mod binder;
mod error;
mod native;
mod proxy;
mod utils;

pub mod interfaces;
pub mod parcel;
pub mod service;

pub use crate::binder::{
    FromIBinder, Interface, Remotable, Stability, Strong, TransactionCode, TransactionFlags,
    FIRST_CALL_TRANSACTION, FLAG_ONEWAY, INTERFACE_TRANSACTION, LAST_CALL_TRANSACTION,
    PING_TRANSACTION,
};
pub use error::{parse_status_code, status_result, ExceptionCode, Status, StatusCode};
pub use native::Binder;
pub use parcel::{Parcel, ParcelFileDescriptor, ParcelableHolder};
pub use proxy::SpIBinder;
pub use utils::String16;

/// Binder result containing a [`Status`] on error.
pub type Result<T> = std::result::Result<T, Status>;

/// Re-exports of core structures, prefixed with `Binder`.
///
/// This module renames binder exports so they be glob-imported without
/// conflicting with standard structures. Import the prelude with:
/// ```rust
/// use binder_conformance::prelude::*;
/// ```
pub mod prelude {
    pub use super::Binder;
    pub use super::ExceptionCode as BinderExceptionCode;
    pub use super::FromIBinder;
    pub use super::Interface;
    pub use super::Remotable as BinderRemotable;
    pub use super::Result as BinderResult;
    pub use super::SpIBinder;
    pub use super::Status as BinderStatus;
    pub use super::StatusCode as BinderStatusCode;
    pub use super::Strong;
}
