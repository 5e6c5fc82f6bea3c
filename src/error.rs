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

use crate::parcel::{Deserialize, Parcel, Serialize};
use crate::utils::String16;

use std::error;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::result;

/// Low-level status codes from Android `libutils`.
// All error codes are negative integer values. Derived from the anonymous enum
// in utils/Errors.h
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StatusCode {
    OK = 0,
    UNKNOWN_ERROR = i32::MIN,
    NO_MEMORY = -libc::ENOMEM,
    INVALID_OPERATION = -libc::ENOSYS,
    BAD_VALUE = -libc::EINVAL,
    BAD_TYPE = i32::MIN + 1,
    NAME_NOT_FOUND = -libc::ENOENT,
    PERMISSION_DENIED = -libc::EPERM,
    NO_INIT = -libc::ENODEV,
    ALREADY_EXISTS = -libc::EEXIST,
    DEAD_OBJECT = -libc::EPIPE,
    FAILED_TRANSACTION = i32::MIN + 2,
    BAD_INDEX = -libc::EOVERFLOW,
    NOT_ENOUGH_DATA = -libc::ENODATA,
    WOULD_BLOCK = -libc::EWOULDBLOCK,
    TIMED_OUT = -libc::ETIMEDOUT,
    UNKNOWN_TRANSACTION = -libc::EBADMSG,
    FDS_NOT_ALLOWED = i32::MIN + 7,
    UNEXPECTED_NULL = i32::MIN + 8,
}

/// A specialized [`Result`](result::Result) for the parcel codec.
pub type Result<T> = result::Result<T, StatusCode>;

/// Convert a raw `status_t` value back into a [`StatusCode`].
///
/// Values that do not correspond to a known code map to `UNKNOWN_ERROR`.
pub fn parse_status_code(code: i32) -> StatusCode {
    const KNOWN: [StatusCode; 19] = [
        StatusCode::OK,
        StatusCode::UNKNOWN_ERROR,
        StatusCode::NO_MEMORY,
        StatusCode::INVALID_OPERATION,
        StatusCode::BAD_VALUE,
        StatusCode::BAD_TYPE,
        StatusCode::NAME_NOT_FOUND,
        StatusCode::PERMISSION_DENIED,
        StatusCode::NO_INIT,
        StatusCode::ALREADY_EXISTS,
        StatusCode::DEAD_OBJECT,
        StatusCode::FAILED_TRANSACTION,
        StatusCode::BAD_INDEX,
        StatusCode::NOT_ENOUGH_DATA,
        StatusCode::WOULD_BLOCK,
        StatusCode::TIMED_OUT,
        StatusCode::UNKNOWN_TRANSACTION,
        StatusCode::FDS_NOT_ALLOWED,
        StatusCode::UNEXPECTED_NULL,
    ];
    KNOWN.iter().copied().find(|known| *known as i32 == code).unwrap_or(StatusCode::UNKNOWN_ERROR)
}

/// Convert a raw `status_t` into the idiomatic result type.
pub fn status_result(status: i32) -> Result<()> {
    match parse_status_code(status) {
        StatusCode::OK => Ok(()),
        e => Err(e),
    }
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{:?}", self)
    }
}

impl error::Error for StatusCode {}

/// Exception codes carried by an AIDL [`Status`].
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExceptionCode {
    NONE = 0,
    SECURITY = -1,
    BAD_PARCELABLE = -2,
    ILLEGAL_ARGUMENT = -3,
    NULL_POINTER = -4,
    ILLEGAL_STATE = -5,
    NETWORK_MAIN_THREAD = -6,
    UNSUPPORTED_OPERATION = -7,
    SERVICE_SPECIFIC = -8,
    PARCELABLE = -9,
    /// Never written to a parcel. Indicates that the transaction itself
    /// failed and [`Status::transaction_error`] holds the reason.
    TRANSACTION_FAILED = -129,
}

impl ExceptionCode {
    fn name(self) -> &'static str {
        match self {
            ExceptionCode::NONE => "EX_NONE",
            ExceptionCode::SECURITY => "EX_SECURITY",
            ExceptionCode::BAD_PARCELABLE => "EX_BAD_PARCELABLE",
            ExceptionCode::ILLEGAL_ARGUMENT => "EX_ILLEGAL_ARGUMENT",
            ExceptionCode::NULL_POINTER => "EX_NULL_POINTER",
            ExceptionCode::ILLEGAL_STATE => "EX_ILLEGAL_STATE",
            ExceptionCode::NETWORK_MAIN_THREAD => "EX_NETWORK_MAIN_THREAD",
            ExceptionCode::UNSUPPORTED_OPERATION => "EX_UNSUPPORTED_OPERATION",
            ExceptionCode::SERVICE_SPECIFIC => "EX_SERVICE_SPECIFIC",
            ExceptionCode::PARCELABLE => "EX_PARCELABLE",
            ExceptionCode::TRANSACTION_FAILED => "EX_TRANSACTION_FAILED",
        }
    }
}

impl TryFrom<i32> for ExceptionCode {
    type Error = StatusCode;

    fn try_from(code: i32) -> Result<Self> {
        Ok(match code {
            0 => ExceptionCode::NONE,
            -1 => ExceptionCode::SECURITY,
            -2 => ExceptionCode::BAD_PARCELABLE,
            -3 => ExceptionCode::ILLEGAL_ARGUMENT,
            -4 => ExceptionCode::NULL_POINTER,
            -5 => ExceptionCode::ILLEGAL_STATE,
            -6 => ExceptionCode::NETWORK_MAIN_THREAD,
            -7 => ExceptionCode::UNSUPPORTED_OPERATION,
            -8 => ExceptionCode::SERVICE_SPECIFIC,
            -9 => ExceptionCode::PARCELABLE,
            -129 => ExceptionCode::TRANSACTION_FAILED,
            _ => return Err(StatusCode::BAD_VALUE),
        })
    }
}

/// High-level binder status object that encapsulates a standard way to keep
/// track of and chain binder errors along with service specific errors.
///
/// Used in AIDL transactions to represent failed transactions.
#[derive(Clone, PartialEq, Eq)]
pub struct Status {
    exception: ExceptionCode,
    // Service-specific code for SERVICE_SPECIFIC, transaction error for
    // TRANSACTION_FAILED, otherwise zero.
    error_code: i32,
    message: String,
}

impl Status {
    /// Create a status object representing a successful transaction.
    pub fn ok() -> Self {
        Self { exception: ExceptionCode::NONE, error_code: 0, message: String::new() }
    }

    /// Create a status object from a service specific error
    pub fn new_service_specific_error(err: i32, message: Option<&str>) -> Self {
        Self {
            exception: ExceptionCode::SERVICE_SPECIFIC,
            error_code: err,
            message: message.unwrap_or_default().to_owned(),
        }
    }

    /// Create a status object from an exception code
    pub fn new_exception(exception: ExceptionCode, message: Option<&str>) -> Self {
        if exception == ExceptionCode::NONE {
            return Self::ok();
        }
        Self { exception, error_code: 0, message: message.unwrap_or_default().to_owned() }
    }

    /// Returns `true` if this status represents a successful transaction.
    pub fn is_ok(&self) -> bool {
        self.exception == ExceptionCode::NONE
    }

    /// Returns a description of the status.
    pub fn get_description(&self) -> String {
        self.to_string()
    }

    /// Returns the exception code of the status.
    pub fn exception_code(&self) -> ExceptionCode {
        self.exception
    }

    /// Return a status code representing a transaction failure, or
    /// `StatusCode::OK` if there was no transaction failure.
    ///
    /// If this method returns `OK`, the status may still represent a different
    /// exception or a service specific error. To find out if this transaction
    /// as a whole is okay, use [`is_ok`](Self::is_ok) instead.
    pub fn transaction_error(&self) -> StatusCode {
        if self.exception == ExceptionCode::TRANSACTION_FAILED {
            parse_status_code(self.error_code)
        } else {
            StatusCode::OK
        }
    }

    /// Return a service specific error if this status represents one.
    ///
    /// This function will only ever return a non-zero result if
    /// [`exception_code`](Self::exception_code) returns
    /// `ExceptionCode::SERVICE_SPECIFIC`. If this function returns 0, the
    /// status object may still represent a different exception or status. To
    /// find out if this transaction as a whole is okay, use
    /// [`is_ok`](Self::is_ok) instead.
    pub fn service_specific_error(&self) -> i32 {
        if self.exception == ExceptionCode::SERVICE_SPECIFIC {
            self.error_code
        } else {
            0
        }
    }

    /// The message attached to this status, empty if there is none.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::ok()
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        if self.is_ok() {
            return f.write_str("No error");
        }
        write!(f, "Status({}, {}): '", self.exception as i32, self.exception.name())?;
        match self.exception {
            ExceptionCode::TRANSACTION_FAILED => write!(f, "{}: ", self.transaction_error())?,
            ExceptionCode::SERVICE_SPECIFIC => write!(f, "{}: ", self.error_code)?,
            _ => {}
        }
        write!(f, "{}'", self.message)
    }
}

impl Debug for Status {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(&self.get_description())
    }
}

impl error::Error for Status {}

impl From<StatusCode> for Status {
    fn from(status: StatusCode) -> Status {
        match status {
            StatusCode::OK => Status::ok(),
            StatusCode::UNEXPECTED_NULL => {
                Status::new_exception(ExceptionCode::NULL_POINTER, Some("unexpected null"))
            }
            code => Status {
                exception: ExceptionCode::TRANSACTION_FAILED,
                error_code: code as i32,
                message: String::new(),
            },
        }
    }
}

impl From<ExceptionCode> for Status {
    fn from(exception: ExceptionCode) -> Status {
        Status::new_exception(exception, None)
    }
}

impl From<Status> for result::Result<(), Status> {
    fn from(status: Status) -> result::Result<(), Status> {
        if status.is_ok() {
            Ok(())
        } else {
            Err(status)
        }
    }
}

impl Serialize for Status {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        if self.exception == ExceptionCode::TRANSACTION_FAILED {
            // Failed transactions are reported by the transport, not written
            // into the reply.
            return Err(self.transaction_error());
        }
        parcel.write(&(self.exception as i32))?;
        if self.exception == ExceptionCode::NONE {
            return Ok(());
        }
        parcel.write(&String16::from(self.message.as_str()))?;
        if self.exception == ExceptionCode::SERVICE_SPECIFIC {
            parcel.write(&self.error_code)?;
        }
        Ok(())
    }
}

impl Deserialize for Status {
    fn deserialize(parcel: &Parcel) -> Result<Self> {
        let exception = ExceptionCode::try_from(parcel.read::<i32>()?)?;
        match exception {
            ExceptionCode::NONE => return Ok(Status::ok()),
            ExceptionCode::TRANSACTION_FAILED => return Err(StatusCode::BAD_VALUE),
            _ => {}
        }
        let message: Option<String16> = parcel.read()?;
        let message = message.map(|m| m.to_string()).unwrap_or_default();
        let error_code = if exception == ExceptionCode::SERVICE_SPECIFIC { parcel.read()? } else { 0 };
        Ok(Status { exception, error_code, message })
    }
}
