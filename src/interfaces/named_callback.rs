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

//! A callback object that only knows its own name.

use super::{read_reply_status, write_reply};
use crate::binder::{Interface, TransactionCode, FIRST_CALL_TRANSACTION};
use crate::error::{Result, StatusCode};
use crate::parcel::Parcel;
use crate::String16;

pub trait INamedCallback: Interface {
    fn get_name(&self) -> crate::Result<String16>;
}

pub mod transactions {
    use super::*;

    pub const GET_NAME: TransactionCode = FIRST_CALL_TRANSACTION;
}

declare_binder_interface! {
    INamedCallback["android.aidl.tests.INamedCallback"] {
        native: BnNamedCallback(on_transact),
        proxy: BpNamedCallback,
    }
}

impl INamedCallback for BpNamedCallback {
    fn get_name(&self) -> crate::Result<String16> {
        let reply = self.binder.transact(transactions::GET_NAME, 0, |_| Ok(()))?;
        read_reply_status(&reply)?;
        Ok(reply.read()?)
    }
}

fn on_transact(
    service: &dyn INamedCallback,
    code: TransactionCode,
    _data: &Parcel,
    reply: &mut Parcel,
) -> Result<()> {
    match code {
        transactions::GET_NAME => write_reply(reply, service.get_name(), |_| Ok(())),
        _ => Err(StatusCode::UNKNOWN_TRANSACTION),
    }
}
