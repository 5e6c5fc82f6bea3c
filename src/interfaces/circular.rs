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

//! `ICircular` and `CircularParcelable`, which refer back to `ITestService`.

use super::test_service::ITestService;
use super::{read_reply_status, write_reply};
use crate::binder::{Interface, Strong, TransactionCode, FIRST_CALL_TRANSACTION};
use crate::error::{Result, StatusCode};
use crate::parcel::{Parcel, Parcelable, ParcelableMetadata};

/// Parcelable holding a nullable `ITestService`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CircularParcelable {
    pub test_service: Option<Strong<dyn ITestService>>,
}

impl Parcelable for CircularParcelable {
    fn write_to_parcel(&self, parcel: &mut Parcel) -> Result<()> {
        parcel.sized_write(|subparcel| subparcel.write(&self.test_service))
    }

    fn read_from_parcel(&mut self, parcel: &Parcel) -> Result<()> {
        parcel.sized_read(|subparcel| {
            if subparcel.has_more_data() {
                self.test_service = subparcel.read()?;
            }
            Ok(())
        })
    }
}

crate::impl_serialize_for_parcelable!(CircularParcelable);
crate::impl_deserialize_for_parcelable!(CircularParcelable);

impl ParcelableMetadata for CircularParcelable {
    fn get_descriptor() -> &'static str {
        "android.aidl.tests.CircularParcelable"
    }
}

pub trait ICircular: Interface {
    fn get_test_service(&self) -> crate::Result<Option<Strong<dyn ITestService>>>;
}

pub mod transactions {
    use super::*;

    pub const GET_TEST_SERVICE: TransactionCode = FIRST_CALL_TRANSACTION;
}

declare_binder_interface! {
    ICircular["android.aidl.tests.ICircular"] {
        native: BnCircular(on_transact),
        proxy: BpCircular,
    }
}

impl ICircular for BpCircular {
    fn get_test_service(&self) -> crate::Result<Option<Strong<dyn ITestService>>> {
        let reply = self.binder.transact(transactions::GET_TEST_SERVICE, 0, |_| Ok(()))?;
        read_reply_status(&reply)?;
        Ok(reply.read()?)
    }
}

fn on_transact(
    service: &dyn ICircular,
    code: TransactionCode,
    _data: &Parcel,
    reply: &mut Parcel,
) -> Result<()> {
    match code {
        transactions::GET_TEST_SERVICE => {
            write_reply(reply, service.get_test_service(), |_| Ok(()))
        }
        _ => Err(StatusCode::UNKNOWN_TRANSACTION),
    }
}
