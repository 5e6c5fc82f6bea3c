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

//! Reference implementations of the conformance services.
//!
//! Wrap them with the matching native type to get a handle, e.g.
//! `BnTestService::new_binder(TestService::default())`.

use crate::interfaces::circular::{BnCircular, CircularParcelable, ICircular};
use crate::interfaces::enums::{BackendType, ByteEnum, IntEnum, LongEnum};
use crate::interfaces::extension::{ExtendableParcelable, MyExt};
use crate::interfaces::fixed_size_array::{IRepeatFixedSizeArray, IntParcelable};
use crate::interfaces::named_callback::{BnNamedCallback, INamedCallback};
use crate::interfaces::parcelables::{Empty, RecursiveList, StructuredParcelable};
use crate::interfaces::renamed::{BnNewName, BnOldName, INewName, IOldName};
use crate::interfaces::test_service::{BnTestService, ITestService};
use crate::interfaces::union::{self, Tag, Union};
use crate::{Interface, ParcelFileDescriptor, SpIBinder, Status, StatusCode, String16, Strong};

use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Name of the callback handed out by [`ITestService::get_callback`].
const ALWAYS_BE_TESTING: &str = "ABT: always be testing";

/// A callback that answers with the name it was created with.
pub struct NamedCallback(String16);

impl NamedCallback {
    pub fn new(name: String16) -> Self {
        Self(name)
    }
}

impl Interface for NamedCallback {}

impl INamedCallback for NamedCallback {
    fn get_name(&self) -> crate::Result<String16> {
        Ok(self.0.clone())
    }
}

/// Answers to `IOldName` with `"OldName"`.
pub struct OldName;

impl Interface for OldName {}

impl IOldName for OldName {
    fn real_name(&self) -> crate::Result<String16> {
        Ok("OldName".into())
    }
}

/// Answers to `INewName` with `"NewName"`.
pub struct NewName;

impl Interface for NewName {}

impl INewName for NewName {
    fn real_name(&self) -> crate::Result<String16> {
        Ok("NewName".into())
    }
}

/// Hands back the test service it was created with.
pub struct Circular(Strong<dyn ITestService>);

impl Interface for Circular {}

impl ICircular for Circular {
    fn get_test_service(&self) -> crate::Result<Option<Strong<dyn ITestService>>> {
        Ok(Some(self.0.clone()))
    }
}

fn reverse<T: Clone>(input: &[T], repeated: &mut Vec<T>) -> crate::Result<Vec<T>> {
    repeated.clear();
    repeated.extend_from_slice(input);
    Ok(input.iter().rev().cloned().collect())
}

fn reverse_nullable<T: Clone>(
    input: Option<&[T]>,
    repeated: &mut Option<Vec<T>>,
) -> crate::Result<Option<Vec<T>>> {
    *repeated = input.map(<[T]>::to_vec);
    Ok(input.map(|input| input.iter().rev().cloned().collect()))
}

fn dup_all(fds: &[ParcelFileDescriptor]) -> crate::Result<Vec<ParcelFileDescriptor>> {
    Ok(fds.iter().map(ParcelFileDescriptor::try_clone).collect::<Result<_, _>>()?)
}

/// The conformance service behind `ITestService`.
#[derive(Default)]
pub struct TestService {
    service_map: Mutex<HashMap<String16, Strong<dyn INamedCallback>>>,
}

impl Interface for TestService {}

impl TestService {
    fn verify_nullable_names(
        &self,
        services: Option<&[Option<Strong<dyn INamedCallback>>]>,
        names: Option<&[Option<String16>]>,
    ) -> crate::Result<bool> {
        let (services, names) = match (services, names) {
            (Some(services), Some(names)) => (services, names),
            (services, names) => return Ok(services.is_some() == names.is_some()),
        };
        if services.len() != names.len() {
            return Ok(false);
        }
        for pair in services.iter().zip(names) {
            match pair {
                (Some(service), Some(name)) => {
                    if !self.verify_name(service, name)? {
                        return Ok(false);
                    }
                }
                (None, None) => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }

    fn nullable_callbacks(
        &self,
        names: Option<&[Option<String16>]>,
    ) -> crate::Result<Option<Vec<Option<Strong<dyn INamedCallback>>>>> {
        let names = names.unwrap_or_default();
        let services = names
            .iter()
            .map(|name| name.as_ref().map(|name| self.get_other_test_service(name)).transpose())
            .collect::<crate::Result<_>>()?;
        Ok(Some(services))
    }
}

impl ITestService for TestService {
    fn unimplemented_method(&self, _arg: i32) -> crate::Result<i32> {
        Err(StatusCode::UNKNOWN_TRANSACTION.into())
    }

    fn test_oneway(&self) -> crate::Result<()> {
        Err(StatusCode::UNKNOWN_ERROR.into())
    }

    fn repeat_boolean(&self, token: bool) -> crate::Result<bool> {
        Ok(token)
    }

    fn repeat_byte(&self, token: i8) -> crate::Result<i8> {
        Ok(token)
    }

    fn repeat_char(&self, token: u16) -> crate::Result<u16> {
        Ok(token)
    }

    fn repeat_int(&self, token: i32) -> crate::Result<i32> {
        Ok(token)
    }

    fn repeat_long(&self, token: i64) -> crate::Result<i64> {
        Ok(token)
    }

    fn repeat_float(&self, token: f32) -> crate::Result<f32> {
        Ok(token)
    }

    fn repeat_double(&self, token: f64) -> crate::Result<f64> {
        Ok(token)
    }

    fn repeat_string(&self, token: &String16) -> crate::Result<String16> {
        Ok(token.clone())
    }

    fn repeat_byte_enum(&self, token: ByteEnum) -> crate::Result<ByteEnum> {
        Ok(token)
    }

    fn repeat_int_enum(&self, token: IntEnum) -> crate::Result<IntEnum> {
        Ok(token)
    }

    fn repeat_long_enum(&self, token: LongEnum) -> crate::Result<LongEnum> {
        Ok(token)
    }

    fn reverse_boolean(&self, input: &[bool], repeated: &mut Vec<bool>) -> crate::Result<Vec<bool>> {
        reverse(input, repeated)
    }

    fn reverse_byte(&self, input: &[u8], repeated: &mut Vec<u8>) -> crate::Result<Vec<u8>> {
        reverse(input, repeated)
    }

    fn reverse_char(&self, input: &[u16], repeated: &mut Vec<u16>) -> crate::Result<Vec<u16>> {
        reverse(input, repeated)
    }

    fn reverse_int(&self, input: &[i32], repeated: &mut Vec<i32>) -> crate::Result<Vec<i32>> {
        reverse(input, repeated)
    }

    fn reverse_long(&self, input: &[i64], repeated: &mut Vec<i64>) -> crate::Result<Vec<i64>> {
        reverse(input, repeated)
    }

    fn reverse_float(&self, input: &[f32], repeated: &mut Vec<f32>) -> crate::Result<Vec<f32>> {
        reverse(input, repeated)
    }

    fn reverse_double(&self, input: &[f64], repeated: &mut Vec<f64>) -> crate::Result<Vec<f64>> {
        reverse(input, repeated)
    }

    fn reverse_string(
        &self,
        input: &[String16],
        repeated: &mut Vec<String16>,
    ) -> crate::Result<Vec<String16>> {
        reverse(input, repeated)
    }

    fn reverse_byte_enum(
        &self,
        input: &[ByteEnum],
        repeated: &mut Vec<ByteEnum>,
    ) -> crate::Result<Vec<ByteEnum>> {
        reverse(input, repeated)
    }

    fn reverse_int_enum(
        &self,
        input: &[IntEnum],
        repeated: &mut Vec<IntEnum>,
    ) -> crate::Result<Vec<IntEnum>> {
        reverse(input, repeated)
    }

    fn reverse_long_enum(
        &self,
        input: &[LongEnum],
        repeated: &mut Vec<LongEnum>,
    ) -> crate::Result<Vec<LongEnum>> {
        reverse(input, repeated)
    }

    fn get_other_test_service(&self, name: &String16) -> crate::Result<Strong<dyn INamedCallback>> {
        let mut service_map = self.service_map.lock().unwrap_or_else(PoisonError::into_inner);
        let service = service_map.entry(name.clone()).or_insert_with(|| {
            info!("Creating named callback {}", name);
            BnNamedCallback::new_binder(NamedCallback::new(name.clone()))
        });
        Ok(service.clone())
    }

    fn set_other_test_service(
        &self,
        name: &String16,
        service: &Strong<dyn INamedCallback>,
    ) -> crate::Result<bool> {
        let mut service_map = self.service_map.lock().unwrap_or_else(PoisonError::into_inner);
        if service_map.get(name) == Some(service) {
            return Ok(true);
        }
        service_map.insert(name.clone(), service.clone());
        Ok(false)
    }

    fn verify_name(
        &self,
        service: &Strong<dyn INamedCallback>,
        name: &String16,
    ) -> crate::Result<bool> {
        Ok(service.get_name()? == *name)
    }

    fn get_interface_array(
        &self,
        names: &[String16],
    ) -> crate::Result<Vec<Strong<dyn INamedCallback>>> {
        names.iter().map(|name| self.get_other_test_service(name)).collect()
    }

    fn verify_names_with_interface_array(
        &self,
        services: &[Strong<dyn INamedCallback>],
        names: &[String16],
    ) -> crate::Result<bool> {
        if services.len() != names.len() {
            return Ok(false);
        }
        for (service, name) in services.iter().zip(names) {
            if !self.verify_name(service, name)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn get_nullable_interface_array(
        &self,
        names: Option<&[Option<String16>]>,
    ) -> crate::Result<Option<Vec<Option<Strong<dyn INamedCallback>>>>> {
        self.nullable_callbacks(names)
    }

    fn verify_names_with_nullable_interface_array(
        &self,
        services: Option<&[Option<Strong<dyn INamedCallback>>]>,
        names: Option<&[Option<String16>]>,
    ) -> crate::Result<bool> {
        self.verify_nullable_names(services, names)
    }

    fn get_interface_list(
        &self,
        names: Option<&[Option<String16>]>,
    ) -> crate::Result<Option<Vec<Option<Strong<dyn INamedCallback>>>>> {
        self.nullable_callbacks(names)
    }

    fn verify_names_with_interface_list(
        &self,
        services: Option<&[Option<Strong<dyn INamedCallback>>]>,
        names: Option<&[Option<String16>]>,
    ) -> crate::Result<bool> {
        self.verify_nullable_names(services, names)
    }

    fn reverse_string_list(
        &self,
        input: &[String16],
        repeated: &mut Vec<String16>,
    ) -> crate::Result<Vec<String16>> {
        reverse(input, repeated)
    }

    fn repeat_parcel_file_descriptor(
        &self,
        read: &ParcelFileDescriptor,
    ) -> crate::Result<ParcelFileDescriptor> {
        debug!("Repeating parcel file descriptor");
        Ok(read.try_clone()?)
    }

    fn reverse_parcel_file_descriptor_array(
        &self,
        input: &[ParcelFileDescriptor],
        repeated: &mut Vec<ParcelFileDescriptor>,
    ) -> crate::Result<Vec<ParcelFileDescriptor>> {
        *repeated = dup_all(input)?;
        let mut reversed = dup_all(input)?;
        reversed.reverse();
        Ok(reversed)
    }

    fn throw_service_exception(&self, code: i32) -> crate::Result<()> {
        debug!("Throwing service-specific error {}", code);
        Err(Status::new_service_specific_error(code, None))
    }

    fn repeat_nullable_int_array(&self, input: Option<&[i32]>) -> crate::Result<Option<Vec<i32>>> {
        Ok(input.map(<[i32]>::to_vec))
    }

    fn repeat_nullable_byte_enum_array(
        &self,
        input: Option<&[ByteEnum]>,
    ) -> crate::Result<Option<Vec<ByteEnum>>> {
        Ok(input.map(<[ByteEnum]>::to_vec))
    }

    fn repeat_nullable_int_enum_array(
        &self,
        input: Option<&[IntEnum]>,
    ) -> crate::Result<Option<Vec<IntEnum>>> {
        Ok(input.map(<[IntEnum]>::to_vec))
    }

    fn repeat_nullable_long_enum_array(
        &self,
        input: Option<&[LongEnum]>,
    ) -> crate::Result<Option<Vec<LongEnum>>> {
        Ok(input.map(<[LongEnum]>::to_vec))
    }

    fn repeat_nullable_string(&self, input: Option<&String16>) -> crate::Result<Option<String16>> {
        Ok(input.cloned())
    }

    fn repeat_nullable_string_list(
        &self,
        input: Option<&[Option<String16>]>,
    ) -> crate::Result<Option<Vec<Option<String16>>>> {
        Ok(input.map(<[Option<String16>]>::to_vec))
    }

    fn repeat_nullable_parcelable(&self, input: Option<&Empty>) -> crate::Result<Option<Empty>> {
        Ok(input.cloned())
    }

    fn repeat_nullable_parcelable_array(
        &self,
        input: Option<&[Option<Empty>]>,
    ) -> crate::Result<Option<Vec<Option<Empty>>>> {
        Ok(input.map(<[Option<Empty>]>::to_vec))
    }

    fn repeat_nullable_parcelable_list(
        &self,
        input: Option<&[Option<Empty>]>,
    ) -> crate::Result<Option<Vec<Option<Empty>>>> {
        Ok(input.map(<[Option<Empty>]>::to_vec))
    }

    fn takes_an_ibinder(&self, _input: &SpIBinder) -> crate::Result<()> {
        Ok(())
    }

    fn takes_a_nullable_ibinder(&self, _input: Option<&SpIBinder>) -> crate::Result<()> {
        Ok(())
    }

    fn takes_an_ibinder_list(&self, _input: &[SpIBinder]) -> crate::Result<()> {
        Ok(())
    }

    fn takes_a_nullable_ibinder_list(
        &self,
        _input: Option<&[Option<SpIBinder>]>,
    ) -> crate::Result<()> {
        Ok(())
    }

    fn repeat_utf8_cpp_string(&self, token: &str) -> crate::Result<String> {
        Ok(token.into())
    }

    fn repeat_nullable_utf8_cpp_string(&self, token: Option<&str>) -> crate::Result<Option<String>> {
        Ok(token.map(String::from))
    }

    fn reverse_utf8_cpp_string(
        &self,
        input: &[String],
        repeated: &mut Vec<String>,
    ) -> crate::Result<Vec<String>> {
        reverse(input, repeated)
    }

    fn reverse_nullable_utf8_cpp_string(
        &self,
        input: Option<&[Option<String>]>,
        repeated: &mut Option<Vec<Option<String>>>,
    ) -> crate::Result<Option<Vec<Option<String>>>> {
        reverse_nullable(input, repeated)
    }

    fn reverse_utf8_cpp_string_list(
        &self,
        input: Option<&[Option<String>]>,
        repeated: &mut Option<Vec<Option<String>>>,
    ) -> crate::Result<Option<Vec<Option<String>>>> {
        reverse_nullable(input, repeated)
    }

    fn get_callback(&self, return_null: bool) -> crate::Result<Option<Strong<dyn INamedCallback>>> {
        if return_null {
            return Ok(None);
        }
        self.get_other_test_service(&ALWAYS_BE_TESTING.into()).map(Some)
    }

    fn fill_out_structured_parcelable(&self, parcel: &mut StructuredParcelable) -> crate::Result<()> {
        parcel.should_be_jerry = "Jerry".into();
        parcel.should_contain_three_fs = vec![parcel.f; 3];
        parcel.should_be_byte_bar = ByteEnum::BAR;
        parcel.should_be_int_bar = IntEnum::BAR;
        parcel.should_be_long_bar = LongEnum::BAR;
        parcel.should_contain_two_byte_foos = vec![ByteEnum::FOO; 2];
        parcel.should_contain_two_int_foos = vec![IntEnum::FOO; 2];
        parcel.should_contain_two_long_foos = vec![LongEnum::FOO; 2];
        parcel.should_set_bit0_and_bit2 = StructuredParcelable::BIT0 | StructuredParcelable::BIT2;
        parcel.u = Some(Union::Ns(vec![1, 2, 3]));
        parcel.should_be_const_s1 = Some(Union::S(union::S1.into()));
        Ok(())
    }

    fn repeat_extendable_parcelable(
        &self,
        ep: &ExtendableParcelable,
        ep2: &mut ExtendableParcelable,
    ) -> crate::Result<()> {
        ep2.a = ep.a;
        ep2.b = ep.b.clone();
        match ep.ext.get_parcelable::<MyExt>()? {
            Some(ext) => ep2.ext.set_parcelable(ext)?,
            None => ep2.ext.reset(),
        }
        Ok(())
    }

    fn reverse_list(&self, list: &RecursiveList) -> crate::Result<RecursiveList> {
        let mut reversed: Option<Box<RecursiveList>> = None;
        for value in list.values() {
            reversed = Some(Box::new(RecursiveList { value, next: reversed }));
        }
        // `values` yields at least the head, so `reversed` is never empty here.
        Ok(reversed.map(|head| *head).unwrap_or_default())
    }

    fn reverse_ibinder_array(
        &self,
        input: &[SpIBinder],
        repeated: &mut Vec<SpIBinder>,
    ) -> crate::Result<Vec<SpIBinder>> {
        reverse(input, repeated)
    }

    fn reverse_nullable_ibinder_array(
        &self,
        input: Option<&[Option<SpIBinder>]>,
        repeated: &mut Option<Vec<Option<SpIBinder>>>,
    ) -> crate::Result<Option<Vec<Option<SpIBinder>>>> {
        reverse_nullable(input, repeated)
    }

    fn get_union_tags(&self, input: &[Union]) -> crate::Result<Vec<Tag>> {
        Ok(input.iter().map(Union::get_tag).collect())
    }

    fn reverse_union(&self, input: &Union, repeated: &mut Union) -> crate::Result<Union> {
        debug!("Repeated a Union");
        repeated.clone_from(input);
        let mut reversed = input.clone();
        match &mut reversed {
            Union::Ns(ns) => ns.reverse(),
            Union::S(s) => *s = s.chars().rev().collect(),
            Union::Ss(ss) => ss.reverse(),
            _ => {}
        }
        Ok(reversed)
    }

    fn get_backend_type(&self) -> crate::Result<BackendType> {
        Ok(BackendType::RUST)
    }

    fn get_old_name_interface(&self) -> crate::Result<Strong<dyn IOldName>> {
        Ok(BnOldName::new_binder(OldName))
    }

    fn get_new_name_interface(&self) -> crate::Result<Strong<dyn INewName>> {
        Ok(BnNewName::new_binder(NewName))
    }

    fn reverse_named_callback_list(
        &self,
        input: &[SpIBinder],
        repeated: &mut Vec<SpIBinder>,
    ) -> crate::Result<Vec<SpIBinder>> {
        reverse(input, repeated)
    }

    // A native service does not hold a handle to itself, so the circle goes
    // through a fresh instance.
    fn get_circular(&self, cp: &mut CircularParcelable) -> crate::Result<Strong<dyn ICircular>> {
        let service = BnTestService::new_binder(TestService::default());
        debug!("Creating circular reference");
        cp.test_service = Some(service.clone());
        Ok(BnCircular::new_binder(Circular(service)))
    }
}

/// The conformance service behind `IRepeatFixedSizeArray`.
#[derive(Default)]
pub struct FixedSizeArrayService;

impl Interface for FixedSizeArrayService {}

fn repeat_fixed<T: Clone>(input: &T, repeated: &mut T) -> crate::Result<T> {
    repeated.clone_from(input);
    Ok(input.clone())
}

impl IRepeatFixedSizeArray for FixedSizeArrayService {
    fn repeat_bytes(&self, input: &[u8; 3], repeated: &mut [u8; 3]) -> crate::Result<[u8; 3]> {
        repeat_fixed(input, repeated)
    }

    fn repeat_ints(&self, input: &[i32; 3], repeated: &mut [i32; 3]) -> crate::Result<[i32; 3]> {
        repeat_fixed(input, repeated)
    }

    fn repeat_binders(
        &self,
        input: &[SpIBinder; 3],
        repeated: &mut [SpIBinder; 3],
    ) -> crate::Result<[SpIBinder; 3]> {
        repeat_fixed(input, repeated)
    }

    fn repeat_parcelables(
        &self,
        input: &[IntParcelable; 3],
        repeated: &mut [IntParcelable; 3],
    ) -> crate::Result<[IntParcelable; 3]> {
        repeat_fixed(input, repeated)
    }

    fn repeat_2d_bytes(
        &self,
        input: &[[u8; 3]; 2],
        repeated: &mut [[u8; 3]; 2],
    ) -> crate::Result<[[u8; 3]; 2]> {
        repeat_fixed(input, repeated)
    }

    fn repeat_2d_ints(
        &self,
        input: &[[i32; 3]; 2],
        repeated: &mut [[i32; 3]; 2],
    ) -> crate::Result<[[i32; 3]; 2]> {
        repeat_fixed(input, repeated)
    }

    fn repeat_2d_binders(
        &self,
        input: &[[SpIBinder; 3]; 2],
        repeated: &mut [[SpIBinder; 3]; 2],
    ) -> crate::Result<[[SpIBinder; 3]; 2]> {
        repeat_fixed(input, repeated)
    }

    fn repeat_2d_parcelables(
        &self,
        input: &[[IntParcelable; 3]; 2],
        repeated: &mut [[IntParcelable; 3]; 2],
    ) -> crate::Result<[[IntParcelable; 3]; 2]> {
        repeat_fixed(input, repeated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parcel;

    #[test]
    fn test_reverse_list_direct() {
        let list = RecursiveList {
            value: 1,
            next: Some(Box::new(RecursiveList { value: 2, next: None })),
        };
        let reversed = TestService::default().reverse_list(&list).unwrap();
        assert_eq!(reversed.values().collect::<Vec<_>>(), [2, 1]);
    }

    #[test]
    fn test_registry_reuses_callbacks() {
        let service = TestService::default();
        let name: String16 = "Foo".into();
        let first = service.get_other_test_service(&name).unwrap();
        let second = service.get_other_test_service(&name).unwrap();
        assert_eq!(first, second);
        assert_eq!(service.set_other_test_service(&name, &first), Ok(true));

        let other = BnNamedCallback::new_binder(NamedCallback::new("Foo".into()));
        assert_eq!(service.set_other_test_service(&name, &other), Ok(false));
        assert_eq!(service.get_other_test_service(&name), Ok(other));
    }

    #[test]
    fn test_wrapped_callback_writes_its_binder() {
        let callback = BnNamedCallback::new_binder(NamedCallback::new("a".into()));
        let mut parcel = Parcel::new();
        assert!(parcel.write(&callback).is_ok());
        assert!(parcel.set_data_position(0).is_ok());

        let read: Strong<dyn INamedCallback> = parcel.read().unwrap();
        assert_eq!(read, callback);
        assert_eq!(read.get_name().map(|name| name.to_string()), Ok("a".to_string()));
    }

    #[test]
    #[should_panic(expected = "cannot be converted into an SpIBinder")]
    fn test_bare_callback_has_no_binder() {
        let bare: Strong<dyn INamedCallback> =
            Strong::new(Box::new(NamedCallback::new("a".into())));
        let mut parcel = Parcel::new();
        let _ = parcel.write(&bare);
    }

    #[test]
    fn test_verify_nullable_names() {
        let service = TestService::default();
        let a = service.get_other_test_service(&"a".into()).unwrap();
        let services: Vec<Option<Strong<dyn INamedCallback>>> = vec![Some(a), None];
        let names: Vec<Option<String16>> = vec![Some("a".into()), None];
        assert_eq!(service.verify_nullable_names(Some(&services), Some(&names)), Ok(true));
        assert_eq!(service.verify_nullable_names(None, None), Ok(true));
        assert_eq!(service.verify_nullable_names(Some(&services), None), Ok(false));

        let mismatched: Vec<Option<String16>> = vec![Some("a".into()), Some("b".into())];
        assert_eq!(service.verify_nullable_names(Some(&services), Some(&mismatched)), Ok(false));
    }
}
