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

//! The `android.aidl.tests.ITestService` interface.
//!
//! Methods are numbered from [`FIRST_CALL_TRANSACTION`] in the order of
//! [`transactions`]. A request carries the in arguments in declaration
//! order; out parameters travel only in the reply.

use super::circular::{CircularParcelable, ICircular};
use super::enums::{BackendType, ByteEnum, IntEnum, LongEnum};
use super::extension::ExtendableParcelable;
use super::named_callback::INamedCallback;
use super::parcelables::{Empty, RecursiveList, StructuredParcelable};
use super::renamed::{INewName, IOldName};
use super::union::{Tag, Union};
use super::{read_reply_status, write_reply};
use crate::binder::{Interface, Strong, TransactionCode, FIRST_CALL_TRANSACTION, FLAG_ONEWAY};
use crate::error::{Result, StatusCode};
use crate::parcel::{Parcel, ParcelFileDescriptor};
use crate::{SpIBinder, String16};

use std::sync::{Arc, Mutex, PoisonError};

pub const TEST_CONSTANT: i32 = 42;
pub const STRING_CONSTANT: &str = "foo";

pub trait ITestService: Interface {
    /// Not implemented by the service. Callers fall back to the registered
    /// [default implementation](set_default_impl), if any.
    fn unimplemented_method(&self, arg: i32) -> crate::Result<i32>;

    /// One-way: the caller never learns the outcome.
    fn test_oneway(&self) -> crate::Result<()>;

    fn repeat_boolean(&self, token: bool) -> crate::Result<bool>;
    fn repeat_byte(&self, token: i8) -> crate::Result<i8>;
    fn repeat_char(&self, token: u16) -> crate::Result<u16>;
    fn repeat_int(&self, token: i32) -> crate::Result<i32>;
    fn repeat_long(&self, token: i64) -> crate::Result<i64>;
    fn repeat_float(&self, token: f32) -> crate::Result<f32>;
    fn repeat_double(&self, token: f64) -> crate::Result<f64>;
    fn repeat_string(&self, token: &String16) -> crate::Result<String16>;
    fn repeat_byte_enum(&self, token: ByteEnum) -> crate::Result<ByteEnum>;
    fn repeat_int_enum(&self, token: IntEnum) -> crate::Result<IntEnum>;
    fn repeat_long_enum(&self, token: LongEnum) -> crate::Result<LongEnum>;

    fn reverse_boolean(&self, input: &[bool], repeated: &mut Vec<bool>) -> crate::Result<Vec<bool>>;
    fn reverse_byte(&self, input: &[u8], repeated: &mut Vec<u8>) -> crate::Result<Vec<u8>>;
    fn reverse_char(&self, input: &[u16], repeated: &mut Vec<u16>) -> crate::Result<Vec<u16>>;
    fn reverse_int(&self, input: &[i32], repeated: &mut Vec<i32>) -> crate::Result<Vec<i32>>;
    fn reverse_long(&self, input: &[i64], repeated: &mut Vec<i64>) -> crate::Result<Vec<i64>>;
    fn reverse_float(&self, input: &[f32], repeated: &mut Vec<f32>) -> crate::Result<Vec<f32>>;
    fn reverse_double(&self, input: &[f64], repeated: &mut Vec<f64>) -> crate::Result<Vec<f64>>;
    fn reverse_string(
        &self,
        input: &[String16],
        repeated: &mut Vec<String16>,
    ) -> crate::Result<Vec<String16>>;
    fn reverse_byte_enum(
        &self,
        input: &[ByteEnum],
        repeated: &mut Vec<ByteEnum>,
    ) -> crate::Result<Vec<ByteEnum>>;
    fn reverse_int_enum(
        &self,
        input: &[IntEnum],
        repeated: &mut Vec<IntEnum>,
    ) -> crate::Result<Vec<IntEnum>>;
    fn reverse_long_enum(
        &self,
        input: &[LongEnum],
        repeated: &mut Vec<LongEnum>,
    ) -> crate::Result<Vec<LongEnum>>;

    /// Look up the callback registered under `name`, creating it first if
    /// there is none.
    fn get_other_test_service(&self, name: &String16) -> crate::Result<Strong<dyn INamedCallback>>;
    /// Register `service` under `name`. Returns true if that exact callback
    /// was already registered there.
    fn set_other_test_service(
        &self,
        name: &String16,
        service: &Strong<dyn INamedCallback>,
    ) -> crate::Result<bool>;
    fn verify_name(&self, service: &Strong<dyn INamedCallback>, name: &String16)
        -> crate::Result<bool>;
    fn get_interface_array(&self, names: &[String16])
        -> crate::Result<Vec<Strong<dyn INamedCallback>>>;
    fn verify_names_with_interface_array(
        &self,
        services: &[Strong<dyn INamedCallback>],
        names: &[String16],
    ) -> crate::Result<bool>;
    fn get_nullable_interface_array(
        &self,
        names: Option<&[Option<String16>]>,
    ) -> crate::Result<Option<Vec<Option<Strong<dyn INamedCallback>>>>>;
    fn verify_names_with_nullable_interface_array(
        &self,
        services: Option<&[Option<Strong<dyn INamedCallback>>]>,
        names: Option<&[Option<String16>]>,
    ) -> crate::Result<bool>;
    fn get_interface_list(
        &self,
        names: Option<&[Option<String16>]>,
    ) -> crate::Result<Option<Vec<Option<Strong<dyn INamedCallback>>>>>;
    fn verify_names_with_interface_list(
        &self,
        services: Option<&[Option<Strong<dyn INamedCallback>>]>,
        names: Option<&[Option<String16>]>,
    ) -> crate::Result<bool>;
    fn reverse_string_list(
        &self,
        input: &[String16],
        repeated: &mut Vec<String16>,
    ) -> crate::Result<Vec<String16>>;

    fn repeat_parcel_file_descriptor(
        &self,
        read: &ParcelFileDescriptor,
    ) -> crate::Result<ParcelFileDescriptor>;
    fn reverse_parcel_file_descriptor_array(
        &self,
        input: &[ParcelFileDescriptor],
        repeated: &mut Vec<ParcelFileDescriptor>,
    ) -> crate::Result<Vec<ParcelFileDescriptor>>;

    /// Fails with the service-specific error `code`.
    fn throw_service_exception(&self, code: i32) -> crate::Result<()>;

    fn repeat_nullable_int_array(&self, input: Option<&[i32]>) -> crate::Result<Option<Vec<i32>>>;
    fn repeat_nullable_byte_enum_array(
        &self,
        input: Option<&[ByteEnum]>,
    ) -> crate::Result<Option<Vec<ByteEnum>>>;
    fn repeat_nullable_int_enum_array(
        &self,
        input: Option<&[IntEnum]>,
    ) -> crate::Result<Option<Vec<IntEnum>>>;
    fn repeat_nullable_long_enum_array(
        &self,
        input: Option<&[LongEnum]>,
    ) -> crate::Result<Option<Vec<LongEnum>>>;
    fn repeat_nullable_string(&self, input: Option<&String16>) -> crate::Result<Option<String16>>;
    fn repeat_nullable_string_list(
        &self,
        input: Option<&[Option<String16>]>,
    ) -> crate::Result<Option<Vec<Option<String16>>>>;
    fn repeat_nullable_parcelable(&self, input: Option<&Empty>) -> crate::Result<Option<Empty>>;
    fn repeat_nullable_parcelable_array(
        &self,
        input: Option<&[Option<Empty>]>,
    ) -> crate::Result<Option<Vec<Option<Empty>>>>;
    fn repeat_nullable_parcelable_list(
        &self,
        input: Option<&[Option<Empty>]>,
    ) -> crate::Result<Option<Vec<Option<Empty>>>>;

    fn takes_an_ibinder(&self, input: &SpIBinder) -> crate::Result<()>;
    fn takes_a_nullable_ibinder(&self, input: Option<&SpIBinder>) -> crate::Result<()>;
    fn takes_an_ibinder_list(&self, input: &[SpIBinder]) -> crate::Result<()>;
    fn takes_a_nullable_ibinder_list(&self, input: Option<&[Option<SpIBinder>]>)
        -> crate::Result<()>;

    fn repeat_utf8_cpp_string(&self, token: &str) -> crate::Result<String>;
    fn repeat_nullable_utf8_cpp_string(&self, token: Option<&str>) -> crate::Result<Option<String>>;
    fn reverse_utf8_cpp_string(
        &self,
        input: &[String],
        repeated: &mut Vec<String>,
    ) -> crate::Result<Vec<String>>;
    fn reverse_nullable_utf8_cpp_string(
        &self,
        input: Option<&[Option<String>]>,
        repeated: &mut Option<Vec<Option<String>>>,
    ) -> crate::Result<Option<Vec<Option<String>>>>;
    /// A `None` input returns `None` and leaves `repeated` as `None`.
    fn reverse_utf8_cpp_string_list(
        &self,
        input: Option<&[Option<String>]>,
        repeated: &mut Option<Vec<Option<String>>>,
    ) -> crate::Result<Option<Vec<Option<String>>>>;

    fn get_callback(&self, return_null: bool) -> crate::Result<Option<Strong<dyn INamedCallback>>>;
    fn fill_out_structured_parcelable(&self, parcel: &mut StructuredParcelable) -> crate::Result<()>;
    fn repeat_extendable_parcelable(
        &self,
        ep: &ExtendableParcelable,
        ep2: &mut ExtendableParcelable,
    ) -> crate::Result<()>;
    fn reverse_list(&self, list: &RecursiveList) -> crate::Result<RecursiveList>;
    fn reverse_ibinder_array(
        &self,
        input: &[SpIBinder],
        repeated: &mut Vec<SpIBinder>,
    ) -> crate::Result<Vec<SpIBinder>>;
    fn reverse_nullable_ibinder_array(
        &self,
        input: Option<&[Option<SpIBinder>]>,
        repeated: &mut Option<Vec<Option<SpIBinder>>>,
    ) -> crate::Result<Option<Vec<Option<SpIBinder>>>>;
    fn get_union_tags(&self, input: &[Union]) -> crate::Result<Vec<Tag>>;
    /// Store `input` in `repeated` and return it with the payload of an `ns`,
    /// `s` or `ss` alternative reversed.
    fn reverse_union(&self, input: &Union, repeated: &mut Union) -> crate::Result<Union>;
    fn get_backend_type(&self) -> crate::Result<BackendType>;

    fn get_old_name_interface(&self) -> crate::Result<Strong<dyn IOldName>>;
    fn get_new_name_interface(&self) -> crate::Result<Strong<dyn INewName>>;
    /// Same as [`reverse_ibinder_array`](Self::reverse_ibinder_array), for
    /// binders that callers treat as `INamedCallback`s.
    fn reverse_named_callback_list(
        &self,
        input: &[SpIBinder],
        repeated: &mut Vec<SpIBinder>,
    ) -> crate::Result<Vec<SpIBinder>>;
    /// Returns an `ICircular` whose service is also stored in `cp`.
    fn get_circular(&self, cp: &mut CircularParcelable) -> crate::Result<Strong<dyn ICircular>>;
}

/// Fallback for methods a remote service does not implement.
pub trait ITestServiceDefault: Send + Sync {
    fn unimplemented_method(&self, _arg: i32) -> crate::Result<i32> {
        Err(StatusCode::UNKNOWN_TRANSACTION.into())
    }
}

pub type ITestServiceDefaultRef = Option<Arc<dyn ITestServiceDefault>>;

static DEFAULT_IMPL: Mutex<ITestServiceDefaultRef> = Mutex::new(None);

/// Install the fallback used by every [`BpTestService`], returning the
/// previous one.
pub fn set_default_impl(d: ITestServiceDefaultRef) -> ITestServiceDefaultRef {
    let mut guard = DEFAULT_IMPL.lock().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *guard, d)
}

pub fn get_default_impl() -> ITestServiceDefaultRef {
    DEFAULT_IMPL.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

pub mod transactions {
    use super::*;

    pub const UNIMPLEMENTED_METHOD: TransactionCode = FIRST_CALL_TRANSACTION;
    pub const TEST_ONEWAY: TransactionCode = FIRST_CALL_TRANSACTION + 1;
    pub const REPEAT_BOOLEAN: TransactionCode = FIRST_CALL_TRANSACTION + 2;
    pub const REPEAT_BYTE: TransactionCode = FIRST_CALL_TRANSACTION + 3;
    pub const REPEAT_CHAR: TransactionCode = FIRST_CALL_TRANSACTION + 4;
    pub const REPEAT_INT: TransactionCode = FIRST_CALL_TRANSACTION + 5;
    pub const REPEAT_LONG: TransactionCode = FIRST_CALL_TRANSACTION + 6;
    pub const REPEAT_FLOAT: TransactionCode = FIRST_CALL_TRANSACTION + 7;
    pub const REPEAT_DOUBLE: TransactionCode = FIRST_CALL_TRANSACTION + 8;
    pub const REPEAT_STRING: TransactionCode = FIRST_CALL_TRANSACTION + 9;
    pub const REPEAT_BYTE_ENUM: TransactionCode = FIRST_CALL_TRANSACTION + 10;
    pub const REPEAT_INT_ENUM: TransactionCode = FIRST_CALL_TRANSACTION + 11;
    pub const REPEAT_LONG_ENUM: TransactionCode = FIRST_CALL_TRANSACTION + 12;
    pub const REVERSE_BOOLEAN: TransactionCode = FIRST_CALL_TRANSACTION + 13;
    pub const REVERSE_BYTE: TransactionCode = FIRST_CALL_TRANSACTION + 14;
    pub const REVERSE_CHAR: TransactionCode = FIRST_CALL_TRANSACTION + 15;
    pub const REVERSE_INT: TransactionCode = FIRST_CALL_TRANSACTION + 16;
    pub const REVERSE_LONG: TransactionCode = FIRST_CALL_TRANSACTION + 17;
    pub const REVERSE_FLOAT: TransactionCode = FIRST_CALL_TRANSACTION + 18;
    pub const REVERSE_DOUBLE: TransactionCode = FIRST_CALL_TRANSACTION + 19;
    pub const REVERSE_STRING: TransactionCode = FIRST_CALL_TRANSACTION + 20;
    pub const REVERSE_BYTE_ENUM: TransactionCode = FIRST_CALL_TRANSACTION + 21;
    pub const REVERSE_INT_ENUM: TransactionCode = FIRST_CALL_TRANSACTION + 22;
    pub const REVERSE_LONG_ENUM: TransactionCode = FIRST_CALL_TRANSACTION + 23;
    pub const GET_OTHER_TEST_SERVICE: TransactionCode = FIRST_CALL_TRANSACTION + 24;
    pub const SET_OTHER_TEST_SERVICE: TransactionCode = FIRST_CALL_TRANSACTION + 25;
    pub const VERIFY_NAME: TransactionCode = FIRST_CALL_TRANSACTION + 26;
    pub const GET_INTERFACE_ARRAY: TransactionCode = FIRST_CALL_TRANSACTION + 27;
    pub const VERIFY_NAMES_WITH_INTERFACE_ARRAY: TransactionCode = FIRST_CALL_TRANSACTION + 28;
    pub const GET_NULLABLE_INTERFACE_ARRAY: TransactionCode = FIRST_CALL_TRANSACTION + 29;
    pub const VERIFY_NAMES_WITH_NULLABLE_INTERFACE_ARRAY: TransactionCode = FIRST_CALL_TRANSACTION + 30;
    pub const GET_INTERFACE_LIST: TransactionCode = FIRST_CALL_TRANSACTION + 31;
    pub const VERIFY_NAMES_WITH_INTERFACE_LIST: TransactionCode = FIRST_CALL_TRANSACTION + 32;
    pub const REVERSE_STRING_LIST: TransactionCode = FIRST_CALL_TRANSACTION + 33;
    pub const REPEAT_PARCEL_FILE_DESCRIPTOR: TransactionCode = FIRST_CALL_TRANSACTION + 34;
    pub const REVERSE_PARCEL_FILE_DESCRIPTOR_ARRAY: TransactionCode = FIRST_CALL_TRANSACTION + 35;
    pub const THROW_SERVICE_EXCEPTION: TransactionCode = FIRST_CALL_TRANSACTION + 36;
    pub const REPEAT_NULLABLE_INT_ARRAY: TransactionCode = FIRST_CALL_TRANSACTION + 37;
    pub const REPEAT_NULLABLE_BYTE_ENUM_ARRAY: TransactionCode = FIRST_CALL_TRANSACTION + 38;
    pub const REPEAT_NULLABLE_INT_ENUM_ARRAY: TransactionCode = FIRST_CALL_TRANSACTION + 39;
    pub const REPEAT_NULLABLE_LONG_ENUM_ARRAY: TransactionCode = FIRST_CALL_TRANSACTION + 40;
    pub const REPEAT_NULLABLE_STRING: TransactionCode = FIRST_CALL_TRANSACTION + 41;
    pub const REPEAT_NULLABLE_STRING_LIST: TransactionCode = FIRST_CALL_TRANSACTION + 42;
    pub const REPEAT_NULLABLE_PARCELABLE: TransactionCode = FIRST_CALL_TRANSACTION + 43;
    pub const REPEAT_NULLABLE_PARCELABLE_ARRAY: TransactionCode = FIRST_CALL_TRANSACTION + 44;
    pub const REPEAT_NULLABLE_PARCELABLE_LIST: TransactionCode = FIRST_CALL_TRANSACTION + 45;
    pub const TAKES_AN_IBINDER: TransactionCode = FIRST_CALL_TRANSACTION + 46;
    pub const TAKES_A_NULLABLE_IBINDER: TransactionCode = FIRST_CALL_TRANSACTION + 47;
    pub const TAKES_AN_IBINDER_LIST: TransactionCode = FIRST_CALL_TRANSACTION + 48;
    pub const TAKES_A_NULLABLE_IBINDER_LIST: TransactionCode = FIRST_CALL_TRANSACTION + 49;
    pub const REPEAT_UTF8_CPP_STRING: TransactionCode = FIRST_CALL_TRANSACTION + 50;
    pub const REPEAT_NULLABLE_UTF8_CPP_STRING: TransactionCode = FIRST_CALL_TRANSACTION + 51;
    pub const REVERSE_UTF8_CPP_STRING: TransactionCode = FIRST_CALL_TRANSACTION + 52;
    pub const REVERSE_NULLABLE_UTF8_CPP_STRING: TransactionCode = FIRST_CALL_TRANSACTION + 53;
    pub const REVERSE_UTF8_CPP_STRING_LIST: TransactionCode = FIRST_CALL_TRANSACTION + 54;
    pub const GET_CALLBACK: TransactionCode = FIRST_CALL_TRANSACTION + 55;
    pub const FILL_OUT_STRUCTURED_PARCELABLE: TransactionCode = FIRST_CALL_TRANSACTION + 56;
    pub const REPEAT_EXTENDABLE_PARCELABLE: TransactionCode = FIRST_CALL_TRANSACTION + 57;
    pub const REVERSE_LIST: TransactionCode = FIRST_CALL_TRANSACTION + 58;
    pub const REVERSE_IBINDER_ARRAY: TransactionCode = FIRST_CALL_TRANSACTION + 59;
    pub const REVERSE_NULLABLE_IBINDER_ARRAY: TransactionCode = FIRST_CALL_TRANSACTION + 60;
    pub const GET_UNION_TAGS: TransactionCode = FIRST_CALL_TRANSACTION + 61;
    pub const REVERSE_UNION: TransactionCode = FIRST_CALL_TRANSACTION + 62;
    pub const GET_BACKEND_TYPE: TransactionCode = FIRST_CALL_TRANSACTION + 63;
    pub const GET_OLD_NAME_INTERFACE: TransactionCode = FIRST_CALL_TRANSACTION + 64;
    pub const GET_NEW_NAME_INTERFACE: TransactionCode = FIRST_CALL_TRANSACTION + 65;
    pub const REVERSE_NAMED_CALLBACK_LIST: TransactionCode = FIRST_CALL_TRANSACTION + 66;
    pub const GET_CIRCULAR: TransactionCode = FIRST_CALL_TRANSACTION + 67;
}

declare_binder_interface! {
    ITestService["android.aidl.tests.ITestService"] {
        native: BnTestService(on_transact),
        proxy: BpTestService,
    }
}

impl BpTestService {
    /// Send a request and check the status at the head of the reply.
    fn call<F>(&self, code: TransactionCode, input: F) -> crate::Result<Parcel>
    where
        F: FnOnce(&mut Parcel) -> Result<()>,
    {
        let reply = self.binder.transact(code, 0, input)?;
        read_reply_status(&reply)?;
        Ok(reply)
    }
}

impl ITestService for BpTestService {
    fn unimplemented_method(&self, arg: i32) -> crate::Result<i32> {
        let reply = match self.call(transactions::UNIMPLEMENTED_METHOD, |data| data.write(&arg)) {
            Err(status) if status.transaction_error() == StatusCode::UNKNOWN_TRANSACTION => {
                return match get_default_impl() {
                    Some(default_impl) => default_impl.unimplemented_method(arg),
                    None => Err(status),
                };
            }
            result => result?,
        };
        Ok(reply.read()?)
    }

    fn test_oneway(&self) -> crate::Result<()> {
        self.binder.transact(transactions::TEST_ONEWAY, FLAG_ONEWAY, |_| Ok(()))?;
        Ok(())
    }

    fn repeat_boolean(&self, token: bool) -> crate::Result<bool> {
        let reply = self.call(transactions::REPEAT_BOOLEAN, |data| data.write(&token))?;
        Ok(reply.read()?)
    }

    fn repeat_byte(&self, token: i8) -> crate::Result<i8> {
        let reply = self.call(transactions::REPEAT_BYTE, |data| data.write(&token))?;
        Ok(reply.read()?)
    }

    fn repeat_char(&self, token: u16) -> crate::Result<u16> {
        let reply = self.call(transactions::REPEAT_CHAR, |data| data.write(&token))?;
        Ok(reply.read()?)
    }

    fn repeat_int(&self, token: i32) -> crate::Result<i32> {
        let reply = self.call(transactions::REPEAT_INT, |data| data.write(&token))?;
        Ok(reply.read()?)
    }

    fn repeat_long(&self, token: i64) -> crate::Result<i64> {
        let reply = self.call(transactions::REPEAT_LONG, |data| data.write(&token))?;
        Ok(reply.read()?)
    }

    fn repeat_float(&self, token: f32) -> crate::Result<f32> {
        let reply = self.call(transactions::REPEAT_FLOAT, |data| data.write(&token))?;
        Ok(reply.read()?)
    }

    fn repeat_double(&self, token: f64) -> crate::Result<f64> {
        let reply = self.call(transactions::REPEAT_DOUBLE, |data| data.write(&token))?;
        Ok(reply.read()?)
    }

    fn repeat_string(&self, token: &String16) -> crate::Result<String16> {
        let reply = self.call(transactions::REPEAT_STRING, |data| data.write(token))?;
        Ok(reply.read()?)
    }

    fn repeat_byte_enum(&self, token: ByteEnum) -> crate::Result<ByteEnum> {
        let reply = self.call(transactions::REPEAT_BYTE_ENUM, |data| data.write(&token))?;
        Ok(reply.read()?)
    }

    fn repeat_int_enum(&self, token: IntEnum) -> crate::Result<IntEnum> {
        let reply = self.call(transactions::REPEAT_INT_ENUM, |data| data.write(&token))?;
        Ok(reply.read()?)
    }

    fn repeat_long_enum(&self, token: LongEnum) -> crate::Result<LongEnum> {
        let reply = self.call(transactions::REPEAT_LONG_ENUM, |data| data.write(&token))?;
        Ok(reply.read()?)
    }

    fn reverse_boolean(&self, input: &[bool], repeated: &mut Vec<bool>) -> crate::Result<Vec<bool>> {
        let reply = self.call(transactions::REVERSE_BOOLEAN, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn reverse_byte(&self, input: &[u8], repeated: &mut Vec<u8>) -> crate::Result<Vec<u8>> {
        let reply = self.call(transactions::REVERSE_BYTE, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn reverse_char(&self, input: &[u16], repeated: &mut Vec<u16>) -> crate::Result<Vec<u16>> {
        let reply = self.call(transactions::REVERSE_CHAR, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn reverse_int(&self, input: &[i32], repeated: &mut Vec<i32>) -> crate::Result<Vec<i32>> {
        let reply = self.call(transactions::REVERSE_INT, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn reverse_long(&self, input: &[i64], repeated: &mut Vec<i64>) -> crate::Result<Vec<i64>> {
        let reply = self.call(transactions::REVERSE_LONG, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn reverse_float(&self, input: &[f32], repeated: &mut Vec<f32>) -> crate::Result<Vec<f32>> {
        let reply = self.call(transactions::REVERSE_FLOAT, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn reverse_double(&self, input: &[f64], repeated: &mut Vec<f64>) -> crate::Result<Vec<f64>> {
        let reply = self.call(transactions::REVERSE_DOUBLE, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn reverse_string(
        &self,
        input: &[String16],
        repeated: &mut Vec<String16>,
    ) -> crate::Result<Vec<String16>> {
        let reply = self.call(transactions::REVERSE_STRING, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn reverse_byte_enum(
        &self,
        input: &[ByteEnum],
        repeated: &mut Vec<ByteEnum>,
    ) -> crate::Result<Vec<ByteEnum>> {
        let reply = self.call(transactions::REVERSE_BYTE_ENUM, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn reverse_int_enum(
        &self,
        input: &[IntEnum],
        repeated: &mut Vec<IntEnum>,
    ) -> crate::Result<Vec<IntEnum>> {
        let reply = self.call(transactions::REVERSE_INT_ENUM, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn reverse_long_enum(
        &self,
        input: &[LongEnum],
        repeated: &mut Vec<LongEnum>,
    ) -> crate::Result<Vec<LongEnum>> {
        let reply = self.call(transactions::REVERSE_LONG_ENUM, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn get_other_test_service(&self, name: &String16) -> crate::Result<Strong<dyn INamedCallback>> {
        let reply = self.call(transactions::GET_OTHER_TEST_SERVICE, |data| data.write(name))?;
        Ok(reply.read()?)
    }

    fn set_other_test_service(
        &self,
        name: &String16,
        service: &Strong<dyn INamedCallback>,
    ) -> crate::Result<bool> {
        let reply = self.call(transactions::SET_OTHER_TEST_SERVICE, |data| {
            data.write(name)?;
            data.write(service)
        })?;
        Ok(reply.read()?)
    }

    fn verify_name(
        &self,
        service: &Strong<dyn INamedCallback>,
        name: &String16,
    ) -> crate::Result<bool> {
        let reply = self.call(transactions::VERIFY_NAME, |data| {
            data.write(service)?;
            data.write(name)
        })?;
        Ok(reply.read()?)
    }

    fn get_interface_array(
        &self,
        names: &[String16],
    ) -> crate::Result<Vec<Strong<dyn INamedCallback>>> {
        let reply = self.call(transactions::GET_INTERFACE_ARRAY, |data| data.write(names))?;
        Ok(reply.read()?)
    }

    fn verify_names_with_interface_array(
        &self,
        services: &[Strong<dyn INamedCallback>],
        names: &[String16],
    ) -> crate::Result<bool> {
        let reply = self.call(transactions::VERIFY_NAMES_WITH_INTERFACE_ARRAY, |data| {
            data.write(services)?;
            data.write(names)
        })?;
        Ok(reply.read()?)
    }

    fn get_nullable_interface_array(
        &self,
        names: Option<&[Option<String16>]>,
    ) -> crate::Result<Option<Vec<Option<Strong<dyn INamedCallback>>>>> {
        let reply =
            self.call(transactions::GET_NULLABLE_INTERFACE_ARRAY, |data| data.write(&names))?;
        Ok(reply.read()?)
    }

    fn verify_names_with_nullable_interface_array(
        &self,
        services: Option<&[Option<Strong<dyn INamedCallback>>]>,
        names: Option<&[Option<String16>]>,
    ) -> crate::Result<bool> {
        let reply = self.call(transactions::VERIFY_NAMES_WITH_NULLABLE_INTERFACE_ARRAY, |data| {
            data.write(&services)?;
            data.write(&names)
        })?;
        Ok(reply.read()?)
    }

    fn get_interface_list(
        &self,
        names: Option<&[Option<String16>]>,
    ) -> crate::Result<Option<Vec<Option<Strong<dyn INamedCallback>>>>> {
        let reply = self.call(transactions::GET_INTERFACE_LIST, |data| data.write(&names))?;
        Ok(reply.read()?)
    }

    fn verify_names_with_interface_list(
        &self,
        services: Option<&[Option<Strong<dyn INamedCallback>>]>,
        names: Option<&[Option<String16>]>,
    ) -> crate::Result<bool> {
        let reply = self.call(transactions::VERIFY_NAMES_WITH_INTERFACE_LIST, |data| {
            data.write(&services)?;
            data.write(&names)
        })?;
        Ok(reply.read()?)
    }

    fn reverse_string_list(
        &self,
        input: &[String16],
        repeated: &mut Vec<String16>,
    ) -> crate::Result<Vec<String16>> {
        let reply = self.call(transactions::REVERSE_STRING_LIST, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn repeat_parcel_file_descriptor(
        &self,
        read: &ParcelFileDescriptor,
    ) -> crate::Result<ParcelFileDescriptor> {
        let reply =
            self.call(transactions::REPEAT_PARCEL_FILE_DESCRIPTOR, |data| data.write(read))?;
        Ok(reply.read()?)
    }

    fn reverse_parcel_file_descriptor_array(
        &self,
        input: &[ParcelFileDescriptor],
        repeated: &mut Vec<ParcelFileDescriptor>,
    ) -> crate::Result<Vec<ParcelFileDescriptor>> {
        let reply = self
            .call(transactions::REVERSE_PARCEL_FILE_DESCRIPTOR_ARRAY, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn throw_service_exception(&self, code: i32) -> crate::Result<()> {
        self.call(transactions::THROW_SERVICE_EXCEPTION, |data| data.write(&code))?;
        Ok(())
    }

    fn repeat_nullable_int_array(&self, input: Option<&[i32]>) -> crate::Result<Option<Vec<i32>>> {
        let reply = self.call(transactions::REPEAT_NULLABLE_INT_ARRAY, |data| data.write(&input))?;
        Ok(reply.read()?)
    }

    fn repeat_nullable_byte_enum_array(
        &self,
        input: Option<&[ByteEnum]>,
    ) -> crate::Result<Option<Vec<ByteEnum>>> {
        let reply =
            self.call(transactions::REPEAT_NULLABLE_BYTE_ENUM_ARRAY, |data| data.write(&input))?;
        Ok(reply.read()?)
    }

    fn repeat_nullable_int_enum_array(
        &self,
        input: Option<&[IntEnum]>,
    ) -> crate::Result<Option<Vec<IntEnum>>> {
        let reply =
            self.call(transactions::REPEAT_NULLABLE_INT_ENUM_ARRAY, |data| data.write(&input))?;
        Ok(reply.read()?)
    }

    fn repeat_nullable_long_enum_array(
        &self,
        input: Option<&[LongEnum]>,
    ) -> crate::Result<Option<Vec<LongEnum>>> {
        let reply =
            self.call(transactions::REPEAT_NULLABLE_LONG_ENUM_ARRAY, |data| data.write(&input))?;
        Ok(reply.read()?)
    }

    fn repeat_nullable_string(&self, input: Option<&String16>) -> crate::Result<Option<String16>> {
        let reply = self.call(transactions::REPEAT_NULLABLE_STRING, |data| data.write(&input))?;
        Ok(reply.read()?)
    }

    fn repeat_nullable_string_list(
        &self,
        input: Option<&[Option<String16>]>,
    ) -> crate::Result<Option<Vec<Option<String16>>>> {
        let reply =
            self.call(transactions::REPEAT_NULLABLE_STRING_LIST, |data| data.write(&input))?;
        Ok(reply.read()?)
    }

    fn repeat_nullable_parcelable(&self, input: Option<&Empty>) -> crate::Result<Option<Empty>> {
        let reply =
            self.call(transactions::REPEAT_NULLABLE_PARCELABLE, |data| data.write(&input))?;
        Ok(reply.read()?)
    }

    fn repeat_nullable_parcelable_array(
        &self,
        input: Option<&[Option<Empty>]>,
    ) -> crate::Result<Option<Vec<Option<Empty>>>> {
        let reply =
            self.call(transactions::REPEAT_NULLABLE_PARCELABLE_ARRAY, |data| data.write(&input))?;
        Ok(reply.read()?)
    }

    fn repeat_nullable_parcelable_list(
        &self,
        input: Option<&[Option<Empty>]>,
    ) -> crate::Result<Option<Vec<Option<Empty>>>> {
        let reply =
            self.call(transactions::REPEAT_NULLABLE_PARCELABLE_LIST, |data| data.write(&input))?;
        Ok(reply.read()?)
    }

    fn takes_an_ibinder(&self, input: &SpIBinder) -> crate::Result<()> {
        self.call(transactions::TAKES_AN_IBINDER, |data| data.write(input))?;
        Ok(())
    }

    fn takes_a_nullable_ibinder(&self, input: Option<&SpIBinder>) -> crate::Result<()> {
        self.call(transactions::TAKES_A_NULLABLE_IBINDER, |data| data.write(&input))?;
        Ok(())
    }

    fn takes_an_ibinder_list(&self, input: &[SpIBinder]) -> crate::Result<()> {
        self.call(transactions::TAKES_AN_IBINDER_LIST, |data| data.write(input))?;
        Ok(())
    }

    fn takes_a_nullable_ibinder_list(
        &self,
        input: Option<&[Option<SpIBinder>]>,
    ) -> crate::Result<()> {
        self.call(transactions::TAKES_A_NULLABLE_IBINDER_LIST, |data| data.write(&input))?;
        Ok(())
    }

    fn repeat_utf8_cpp_string(&self, token: &str) -> crate::Result<String> {
        let reply = self.call(transactions::REPEAT_UTF8_CPP_STRING, |data| data.write(token))?;
        Ok(reply.read()?)
    }

    fn repeat_nullable_utf8_cpp_string(&self, token: Option<&str>) -> crate::Result<Option<String>> {
        let reply =
            self.call(transactions::REPEAT_NULLABLE_UTF8_CPP_STRING, |data| data.write(&token))?;
        Ok(reply.read()?)
    }

    fn reverse_utf8_cpp_string(
        &self,
        input: &[String],
        repeated: &mut Vec<String>,
    ) -> crate::Result<Vec<String>> {
        let reply = self.call(transactions::REVERSE_UTF8_CPP_STRING, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn reverse_nullable_utf8_cpp_string(
        &self,
        input: Option<&[Option<String>]>,
        repeated: &mut Option<Vec<Option<String>>>,
    ) -> crate::Result<Option<Vec<Option<String>>>> {
        let reply =
            self.call(transactions::REVERSE_NULLABLE_UTF8_CPP_STRING, |data| data.write(&input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn reverse_utf8_cpp_string_list(
        &self,
        input: Option<&[Option<String>]>,
        repeated: &mut Option<Vec<Option<String>>>,
    ) -> crate::Result<Option<Vec<Option<String>>>> {
        let reply =
            self.call(transactions::REVERSE_UTF8_CPP_STRING_LIST, |data| data.write(&input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn get_callback(&self, return_null: bool) -> crate::Result<Option<Strong<dyn INamedCallback>>> {
        let reply = self.call(transactions::GET_CALLBACK, |data| data.write(&return_null))?;
        Ok(reply.read()?)
    }

    fn fill_out_structured_parcelable(&self, parcel: &mut StructuredParcelable) -> crate::Result<()> {
        let reply =
            self.call(transactions::FILL_OUT_STRUCTURED_PARCELABLE, |data| data.write(&*parcel))?;
        reply.read_onto(parcel)?;
        Ok(())
    }

    fn repeat_extendable_parcelable(
        &self,
        ep: &ExtendableParcelable,
        ep2: &mut ExtendableParcelable,
    ) -> crate::Result<()> {
        let reply = self.call(transactions::REPEAT_EXTENDABLE_PARCELABLE, |data| data.write(ep))?;
        reply.read_onto(ep2)?;
        Ok(())
    }

    fn reverse_list(&self, list: &RecursiveList) -> crate::Result<RecursiveList> {
        let reply = self.call(transactions::REVERSE_LIST, |data| data.write(list))?;
        Ok(reply.read()?)
    }

    fn reverse_ibinder_array(
        &self,
        input: &[SpIBinder],
        repeated: &mut Vec<SpIBinder>,
    ) -> crate::Result<Vec<SpIBinder>> {
        let reply = self.call(transactions::REVERSE_IBINDER_ARRAY, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn reverse_nullable_ibinder_array(
        &self,
        input: Option<&[Option<SpIBinder>]>,
        repeated: &mut Option<Vec<Option<SpIBinder>>>,
    ) -> crate::Result<Option<Vec<Option<SpIBinder>>>> {
        let reply =
            self.call(transactions::REVERSE_NULLABLE_IBINDER_ARRAY, |data| data.write(&input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn get_union_tags(&self, input: &[Union]) -> crate::Result<Vec<Tag>> {
        let reply = self.call(transactions::GET_UNION_TAGS, |data| data.write(input))?;
        Ok(reply.read()?)
    }

    fn reverse_union(&self, input: &Union, repeated: &mut Union) -> crate::Result<Union> {
        let reply = self.call(transactions::REVERSE_UNION, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn get_backend_type(&self) -> crate::Result<BackendType> {
        let reply = self.call(transactions::GET_BACKEND_TYPE, |_| Ok(()))?;
        Ok(reply.read()?)
    }

    fn get_old_name_interface(&self) -> crate::Result<Strong<dyn IOldName>> {
        let reply = self.call(transactions::GET_OLD_NAME_INTERFACE, |_| Ok(()))?;
        Ok(reply.read()?)
    }

    fn get_new_name_interface(&self) -> crate::Result<Strong<dyn INewName>> {
        let reply = self.call(transactions::GET_NEW_NAME_INTERFACE, |_| Ok(()))?;
        Ok(reply.read()?)
    }

    fn reverse_named_callback_list(
        &self,
        input: &[SpIBinder],
        repeated: &mut Vec<SpIBinder>,
    ) -> crate::Result<Vec<SpIBinder>> {
        let reply = self.call(transactions::REVERSE_NAMED_CALLBACK_LIST, |data| data.write(input))?;
        let reversed = reply.read()?;
        reply.read_onto(repeated)?;
        Ok(reversed)
    }

    fn get_circular(&self, cp: &mut CircularParcelable) -> crate::Result<Strong<dyn ICircular>> {
        let reply = self.call(transactions::GET_CIRCULAR, |_| Ok(()))?;
        let circular = reply.read()?;
        reply.read_onto(cp)?;
        Ok(circular)
    }
}

fn on_transact(
    service: &dyn ITestService,
    code: TransactionCode,
    data: &Parcel,
    reply: &mut Parcel,
) -> Result<()> {
    // `repeat!(method: T)` reads one argument and answers with the returned
    // value; `&T` lends the argument and `nullable T` passes it on as an
    // `Option` of a borrow. `reverse!(method: T)` reads a sequence of `T` and
    // also sends back the `repeated` out list.
    macro_rules! repeat {
        ($method:ident: &$ty:ty) => {{
            let token: $ty = data.read()?;
            write_reply(reply, service.$method(&token), |_| Ok(()))
        }};
        ($method:ident: nullable $ty:ty) => {{
            let input: Option<$ty> = data.read()?;
            write_reply(reply, service.$method(input.as_deref()), |_| Ok(()))
        }};
        ($method:ident: $ty:ty) => {{
            let token: $ty = data.read()?;
            write_reply(reply, service.$method(token), |_| Ok(()))
        }};
    }

    macro_rules! reverse {
        ($method:ident: nullable $ty:ty) => {{
            let input: Option<$ty> = data.read()?;
            let mut repeated = None;
            let result = service.$method(input.as_deref(), &mut repeated);
            write_reply(reply, result, |reply| reply.write(&repeated))
        }};
        ($method:ident: $ty:ty) => {{
            let input: Vec<$ty> = data.read()?;
            let mut repeated = Vec::new();
            let result = service.$method(&input, &mut repeated);
            write_reply(reply, result, |reply| reply.write(&repeated))
        }};
    }

    match code {
        transactions::UNIMPLEMENTED_METHOD => repeat!(unimplemented_method: i32),
        transactions::TEST_ONEWAY => write_reply(reply, service.test_oneway(), |_| Ok(())),
        transactions::REPEAT_BOOLEAN => repeat!(repeat_boolean: bool),
        transactions::REPEAT_BYTE => repeat!(repeat_byte: i8),
        transactions::REPEAT_CHAR => repeat!(repeat_char: u16),
        transactions::REPEAT_INT => repeat!(repeat_int: i32),
        transactions::REPEAT_LONG => repeat!(repeat_long: i64),
        transactions::REPEAT_FLOAT => repeat!(repeat_float: f32),
        transactions::REPEAT_DOUBLE => repeat!(repeat_double: f64),
        transactions::REPEAT_STRING => repeat!(repeat_string: &String16),
        transactions::REPEAT_BYTE_ENUM => repeat!(repeat_byte_enum: ByteEnum),
        transactions::REPEAT_INT_ENUM => repeat!(repeat_int_enum: IntEnum),
        transactions::REPEAT_LONG_ENUM => repeat!(repeat_long_enum: LongEnum),
        transactions::REVERSE_BOOLEAN => reverse!(reverse_boolean: bool),
        transactions::REVERSE_BYTE => reverse!(reverse_byte: u8),
        transactions::REVERSE_CHAR => reverse!(reverse_char: u16),
        transactions::REVERSE_INT => reverse!(reverse_int: i32),
        transactions::REVERSE_LONG => reverse!(reverse_long: i64),
        transactions::REVERSE_FLOAT => reverse!(reverse_float: f32),
        transactions::REVERSE_DOUBLE => reverse!(reverse_double: f64),
        transactions::REVERSE_STRING => reverse!(reverse_string: String16),
        transactions::REVERSE_BYTE_ENUM => reverse!(reverse_byte_enum: ByteEnum),
        transactions::REVERSE_INT_ENUM => reverse!(reverse_int_enum: IntEnum),
        transactions::REVERSE_LONG_ENUM => reverse!(reverse_long_enum: LongEnum),
        transactions::GET_OTHER_TEST_SERVICE => repeat!(get_other_test_service: &String16),
        transactions::SET_OTHER_TEST_SERVICE => {
            let name: String16 = data.read()?;
            let callback: Strong<dyn INamedCallback> = data.read()?;
            write_reply(reply, service.set_other_test_service(&name, &callback), |_| Ok(()))
        }
        transactions::VERIFY_NAME => {
            let callback: Strong<dyn INamedCallback> = data.read()?;
            let name: String16 = data.read()?;
            write_reply(reply, service.verify_name(&callback, &name), |_| Ok(()))
        }
        transactions::GET_INTERFACE_ARRAY => {
            let names: Vec<String16> = data.read()?;
            write_reply(reply, service.get_interface_array(&names), |_| Ok(()))
        }
        transactions::VERIFY_NAMES_WITH_INTERFACE_ARRAY => {
            let callbacks: Vec<Strong<dyn INamedCallback>> = data.read()?;
            let names: Vec<String16> = data.read()?;
            let result = service.verify_names_with_interface_array(&callbacks, &names);
            write_reply(reply, result, |_| Ok(()))
        }
        transactions::GET_NULLABLE_INTERFACE_ARRAY => {
            repeat!(get_nullable_interface_array: nullable Vec<Option<String16>>)
        }
        transactions::VERIFY_NAMES_WITH_NULLABLE_INTERFACE_ARRAY => {
            let callbacks: Option<Vec<Option<Strong<dyn INamedCallback>>>> = data.read()?;
            let names: Option<Vec<Option<String16>>> = data.read()?;
            let result = service
                .verify_names_with_nullable_interface_array(callbacks.as_deref(), names.as_deref());
            write_reply(reply, result, |_| Ok(()))
        }
        transactions::GET_INTERFACE_LIST => {
            repeat!(get_interface_list: nullable Vec<Option<String16>>)
        }
        transactions::VERIFY_NAMES_WITH_INTERFACE_LIST => {
            let callbacks: Option<Vec<Option<Strong<dyn INamedCallback>>>> = data.read()?;
            let names: Option<Vec<Option<String16>>> = data.read()?;
            let result =
                service.verify_names_with_interface_list(callbacks.as_deref(), names.as_deref());
            write_reply(reply, result, |_| Ok(()))
        }
        transactions::REVERSE_STRING_LIST => reverse!(reverse_string_list: String16),
        transactions::REPEAT_PARCEL_FILE_DESCRIPTOR => {
            repeat!(repeat_parcel_file_descriptor: &ParcelFileDescriptor)
        }
        transactions::REVERSE_PARCEL_FILE_DESCRIPTOR_ARRAY => {
            reverse!(reverse_parcel_file_descriptor_array: ParcelFileDescriptor)
        }
        transactions::THROW_SERVICE_EXCEPTION => repeat!(throw_service_exception: i32),
        transactions::REPEAT_NULLABLE_INT_ARRAY => {
            repeat!(repeat_nullable_int_array: nullable Vec<i32>)
        }
        transactions::REPEAT_NULLABLE_BYTE_ENUM_ARRAY => {
            repeat!(repeat_nullable_byte_enum_array: nullable Vec<ByteEnum>)
        }
        transactions::REPEAT_NULLABLE_INT_ENUM_ARRAY => {
            repeat!(repeat_nullable_int_enum_array: nullable Vec<IntEnum>)
        }
        transactions::REPEAT_NULLABLE_LONG_ENUM_ARRAY => {
            repeat!(repeat_nullable_long_enum_array: nullable Vec<LongEnum>)
        }
        transactions::REPEAT_NULLABLE_STRING => {
            let input: Option<String16> = data.read()?;
            write_reply(reply, service.repeat_nullable_string(input.as_ref()), |_| Ok(()))
        }
        transactions::REPEAT_NULLABLE_STRING_LIST => {
            repeat!(repeat_nullable_string_list: nullable Vec<Option<String16>>)
        }
        transactions::REPEAT_NULLABLE_PARCELABLE => {
            let input: Option<Empty> = data.read()?;
            write_reply(reply, service.repeat_nullable_parcelable(input.as_ref()), |_| Ok(()))
        }
        transactions::REPEAT_NULLABLE_PARCELABLE_ARRAY => {
            repeat!(repeat_nullable_parcelable_array: nullable Vec<Option<Empty>>)
        }
        transactions::REPEAT_NULLABLE_PARCELABLE_LIST => {
            repeat!(repeat_nullable_parcelable_list: nullable Vec<Option<Empty>>)
        }
        transactions::TAKES_AN_IBINDER => repeat!(takes_an_ibinder: &SpIBinder),
        transactions::TAKES_A_NULLABLE_IBINDER => {
            let input: Option<SpIBinder> = data.read()?;
            write_reply(reply, service.takes_a_nullable_ibinder(input.as_ref()), |_| Ok(()))
        }
        transactions::TAKES_AN_IBINDER_LIST => {
            let input: Vec<SpIBinder> = data.read()?;
            write_reply(reply, service.takes_an_ibinder_list(&input), |_| Ok(()))
        }
        transactions::TAKES_A_NULLABLE_IBINDER_LIST => {
            repeat!(takes_a_nullable_ibinder_list: nullable Vec<Option<SpIBinder>>)
        }
        transactions::REPEAT_UTF8_CPP_STRING => repeat!(repeat_utf8_cpp_string: &String),
        transactions::REPEAT_NULLABLE_UTF8_CPP_STRING => {
            repeat!(repeat_nullable_utf8_cpp_string: nullable String)
        }
        transactions::REVERSE_UTF8_CPP_STRING => reverse!(reverse_utf8_cpp_string: String),
        transactions::REVERSE_NULLABLE_UTF8_CPP_STRING => {
            reverse!(reverse_nullable_utf8_cpp_string: nullable Vec<Option<String>>)
        }
        transactions::REVERSE_UTF8_CPP_STRING_LIST => {
            reverse!(reverse_utf8_cpp_string_list: nullable Vec<Option<String>>)
        }
        transactions::GET_CALLBACK => repeat!(get_callback: bool),
        transactions::FILL_OUT_STRUCTURED_PARCELABLE => {
            let mut parcelable: StructuredParcelable = data.read()?;
            let result = service.fill_out_structured_parcelable(&mut parcelable);
            write_reply(reply, result, |reply| reply.write(&parcelable))
        }
        transactions::REPEAT_EXTENDABLE_PARCELABLE => {
            let ep: ExtendableParcelable = data.read()?;
            let mut ep2 = ExtendableParcelable::default();
            let result = service.repeat_extendable_parcelable(&ep, &mut ep2);
            write_reply(reply, result, |reply| reply.write(&ep2))
        }
        transactions::REVERSE_LIST => repeat!(reverse_list: &RecursiveList),
        transactions::REVERSE_IBINDER_ARRAY => reverse!(reverse_ibinder_array: SpIBinder),
        transactions::REVERSE_NULLABLE_IBINDER_ARRAY => {
            reverse!(reverse_nullable_ibinder_array: nullable Vec<Option<SpIBinder>>)
        }
        transactions::GET_UNION_TAGS => {
            let input: Vec<Union> = data.read()?;
            write_reply(reply, service.get_union_tags(&input), |_| Ok(()))
        }
        transactions::REVERSE_UNION => {
            let input: Union = data.read()?;
            let mut repeated = Union::default();
            let result = service.reverse_union(&input, &mut repeated);
            write_reply(reply, result, |reply| reply.write(&repeated))
        }
        transactions::GET_BACKEND_TYPE => write_reply(reply, service.get_backend_type(), |_| Ok(())),
        transactions::GET_OLD_NAME_INTERFACE => {
            write_reply(reply, service.get_old_name_interface(), |_| Ok(()))
        }
        transactions::GET_NEW_NAME_INTERFACE => {
            write_reply(reply, service.get_new_name_interface(), |_| Ok(()))
        }
        transactions::REVERSE_NAMED_CALLBACK_LIST => {
            reverse!(reverse_named_callback_list: SpIBinder)
        }
        transactions::GET_CIRCULAR => {
            let mut cp = CircularParcelable::default();
            let result = service.get_circular(&mut cp);
            write_reply(reply, result, |reply| reply.write(&cp))
        }
        _ => Err(StatusCode::UNKNOWN_TRANSACTION),
    }
}
