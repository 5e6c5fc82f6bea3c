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

//! An interface renamed from `IOldName` to `INewName`.
//!
//! Both names keep the old descriptor, so a binder of either kind converts
//! to either trait and answers the same calls.

use super::{read_reply_status, write_reply};
use crate::binder::{Interface, TransactionCode, FIRST_CALL_TRANSACTION};
use crate::error::{Result, StatusCode};
use crate::parcel::Parcel;
use crate::{SpIBinder, String16};

pub const DESCRIPTOR: &str = "android.aidl.tests.IOldName";

pub trait IOldName: Interface {
    fn real_name(&self) -> crate::Result<String16>;
}

pub trait INewName: Interface {
    fn real_name(&self) -> crate::Result<String16>;
}

pub mod transactions {
    use super::*;

    pub const REAL_NAME: TransactionCode = FIRST_CALL_TRANSACTION;
}

declare_binder_interface! {
    IOldName[DESCRIPTOR] {
        native: BnOldName(on_transact_old),
        proxy: BpOldName,
    }
}

declare_binder_interface! {
    INewName[DESCRIPTOR] {
        native: BnNewName(on_transact_new),
        proxy: BpNewName,
    }
}

fn call_real_name(binder: &SpIBinder) -> crate::Result<String16> {
    let reply = binder.transact(transactions::REAL_NAME, 0, |_| Ok(()))?;
    read_reply_status(&reply)?;
    Ok(reply.read()?)
}

impl IOldName for BpOldName {
    fn real_name(&self) -> crate::Result<String16> {
        call_real_name(&self.binder)
    }
}

impl INewName for BpNewName {
    fn real_name(&self) -> crate::Result<String16> {
        call_real_name(&self.binder)
    }
}

fn on_transact_old(
    service: &dyn IOldName,
    code: TransactionCode,
    _data: &Parcel,
    reply: &mut Parcel,
) -> Result<()> {
    match code {
        transactions::REAL_NAME => write_reply(reply, service.real_name(), |_| Ok(())),
        _ => Err(StatusCode::UNKNOWN_TRANSACTION),
    }
}

fn on_transact_new(
    service: &dyn INewName,
    code: TransactionCode,
    _data: &Parcel,
    reply: &mut Parcel,
) -> Result<()> {
    match code {
        transactions::REAL_NAME => write_reply(reply, service.real_name(), |_| Ok(())),
        _ => Err(StatusCode::UNKNOWN_TRANSACTION),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FromIBinder;

    struct Named(&'static str);

    impl Interface for Named {}

    impl IOldName for Named {
        fn real_name(&self) -> crate::Result<String16> {
            Ok(self.0.into())
        }
    }

    impl INewName for Named {
        fn real_name(&self) -> crate::Result<String16> {
            Ok(self.0.into())
        }
    }

    #[test]
    fn test_old_binder_as_new_name() {
        let old = BnOldName::new_binder(Named("OldName"));
        assert_eq!(old.as_binder().get_interface_descriptor().as_deref(), Ok(DESCRIPTOR));

        let as_new = <dyn INewName as FromIBinder>::try_from(old.as_binder()).unwrap();
        assert_eq!(as_new.real_name().map(|n| n.to_string()), Ok("OldName".to_string()));
        assert_eq!(as_new.as_binder(), old.as_binder());
    }
}
