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

//! AIDL conformance interfaces and the types they exchange.
//!
//! Every reply starts with a [`Status`]. A successful reply continues with
//! the return value and then the out parameters in declaration order; a
//! failed one carries nothing else.

use crate::error::StatusCode;
use crate::parcel::{Parcel, Serialize};
use crate::Status;

pub mod circular;
pub mod enums;
pub mod extension;
pub mod fixed_size_array;
pub mod named_callback;
pub mod parcelables;
pub mod renamed;
pub mod test_service;
pub mod union;

/// Read the status at the head of a reply, failing the call unless it is ok.
pub(crate) fn read_reply_status(reply: &Parcel) -> crate::Result<()> {
    let status: Status = reply.read()?;
    if status.is_ok() {
        Ok(())
    } else {
        Err(status)
    }
}

/// Write a reply: the status, then on success the return value followed by
/// whatever `write_outs` appends.
///
/// A transport-level failure cannot travel as a status, so writing one fails
/// the whole transaction with its error code.
pub(crate) fn write_reply<T, F>(
    reply: &mut Parcel,
    result: crate::Result<T>,
    write_outs: F,
) -> std::result::Result<(), StatusCode>
where
    T: Serialize,
    F: FnOnce(&mut Parcel) -> std::result::Result<(), StatusCode>,
{
    match result {
        Ok(value) => {
            reply.write(&Status::ok())?;
            reply.write(&value)?;
            write_outs(reply)
        }
        Err(status) => reply.write(&status),
    }
}
