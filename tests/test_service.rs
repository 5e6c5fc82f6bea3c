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

//! Client-side conformance suite for `ITestService`.

use binder_conformance::interfaces::circular::{CircularParcelable, ICircular};
use binder_conformance::interfaces::enums::{BackendType, ByteEnum, IntEnum, LongEnum};
use binder_conformance::interfaces::extension::{ExtendableParcelable, MyExt, MyExtLike};
use binder_conformance::interfaces::named_callback::{BnNamedCallback, INamedCallback};
use binder_conformance::interfaces::parcelables::{Empty, RecursiveList, StructuredParcelable};
use binder_conformance::interfaces::renamed::{INewName, IOldName};
use binder_conformance::interfaces::test_service::{
    self, transactions, BnTestService, ITestService, ITestServiceDefault,
};
use binder_conformance::interfaces::union::{self, Tag, Union};
use binder_conformance::service::{NamedCallback, TestService};
use binder_conformance::{
    ExceptionCode, Interface, ParcelFileDescriptor, SpIBinder, Status, StatusCode, String16,
    Strong,
};

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::os::unix::io::FromRawFd;
use std::sync::Arc;
use std::thread;

fn get_test_service() -> Strong<dyn ITestService> {
    BnTestService::new_binder(TestService::default())
}

fn names(names: &[&str]) -> Vec<String16> {
    names.iter().map(|&name| name.into()).collect()
}

fn nullable_names(names: &[Option<&str>]) -> Vec<Option<String16>> {
    names.iter().map(|name| name.map(String16::from)).collect()
}

/// Returns the (read, write) ends of a new pipe.
fn pipe() -> (File, File) {
    let mut fds = [0; 2];
    // SAFETY: `fds` has room for the two descriptors written by `pipe`, and
    // each one is owned by exactly one `File` afterwards.
    unsafe {
        assert_eq!(libc::pipe(fds.as_mut_ptr()), 0);
        (File::from_raw_fd(fds[0]), File::from_raw_fd(fds[1]))
    }
}

#[test]
fn test_constants() {
    assert_eq!(test_service::TEST_CONSTANT, 42);
    assert_eq!(test_service::STRING_CONSTANT, "foo");
}

#[test]
fn test_builtin_transactions() {
    let service = get_test_service();
    let binder = service.as_binder();
    assert_eq!(binder.ping_binder(), Ok(()));
    assert_eq!(binder.get_interface_descriptor().as_deref(), Ok("android.aidl.tests.ITestService"));
    assert!(binder.is_binder_alive());
}

#[test]
fn test_wrong_interface_is_rejected() {
    let callback = BnNamedCallback::new_binder(NamedCallback::new("Foo".into()));
    let result = callback.as_binder().into_interface::<dyn ITestService>();
    assert_eq!(result.err(), Some(StatusCode::BAD_TYPE));
}

#[test]
fn test_repeat_primitives() {
    let service = get_test_service();
    assert_eq!(service.repeat_int(1 << 30), Ok(1 << 30));
    assert_eq!(service.repeat_boolean(true), Ok(true));
    assert_eq!(service.repeat_byte(-128), Ok(-128));
    assert_eq!(service.repeat_char(u16::from(b'A')), Ok(u16::from(b'A')));
    assert_eq!(service.repeat_long(1 << 60), Ok(1 << 60));
    assert_eq!(service.repeat_float(1.0 / 3.0), Ok(1.0 / 3.0));
    assert_eq!(service.repeat_double(-1e100), Ok(-1e100));
    assert_eq!(service.repeat_byte_enum(ByteEnum::FOO), Ok(ByteEnum::FOO));
    assert_eq!(service.repeat_int_enum(IntEnum::QUX), Ok(IntEnum::QUX));
    assert_eq!(service.repeat_long_enum(LongEnum::BAZ), Ok(LongEnum::BAZ));
}

#[test]
fn test_repeat_strings() {
    let service = get_test_service();
    for input in ["", "Hello, world", "日本語", "😁", test_service::STRING_CONSTANT] {
        let token = String16::from(input);
        assert_eq!(service.repeat_string(&token), Ok(token));
        assert_eq!(service.repeat_utf8_cpp_string(input).as_deref(), Ok(input));
    }
}

#[test]
fn test_reverse_arrays() {
    let service = get_test_service();

    let mut repeated = vec![];
    assert_eq!(service.reverse_int(&[1, 2, 3], &mut repeated), Ok(vec![3, 2, 1]));
    assert_eq!(repeated, [1, 2, 3]);

    let mut repeated = vec![];
    let reversed = service.reverse_boolean(&[true, false, false], &mut repeated).unwrap();
    assert_eq!(reversed, [false, false, true]);
    assert_eq!(repeated, [true, false, false]);

    let mut repeated = vec![];
    let reversed = service.reverse_byte(&[255, 0, 1], &mut repeated).unwrap();
    assert_eq!(reversed, [1, 0, 255]);

    let mut repeated = vec![];
    let reversed = service.reverse_long(&[i64::MIN, 0, i64::MAX], &mut repeated).unwrap();
    assert_eq!(reversed, [i64::MAX, 0, i64::MIN]);

    let mut repeated = vec![];
    let reversed = service.reverse_double(&[-1.5, 2.5], &mut repeated).unwrap();
    assert_eq!(reversed, [2.5, -1.5]);

    let input = names(&["f", "a", "b"]);
    let mut repeated = vec![];
    let reversed = service.reverse_string(&input, &mut repeated).unwrap();
    assert_eq!(reversed, names(&["b", "a", "f"]));
    assert_eq!(repeated, input);

    // Reversing twice gives back the input.
    let mut again = vec![];
    assert_eq!(service.reverse_string_list(&reversed, &mut again), Ok(input));

    let mut repeated = vec![];
    let reversed = service
        .reverse_byte_enum(&[ByteEnum::BAR, ByteEnum::FOO, ByteEnum::BAZ], &mut repeated)
        .unwrap();
    assert_eq!(reversed, [ByteEnum::BAZ, ByteEnum::FOO, ByteEnum::BAR]);

    let mut repeated = vec![];
    let reversed = service.reverse_int_enum(&[IntEnum::FOO, IntEnum::BAR], &mut repeated).unwrap();
    assert_eq!(reversed, [IntEnum::BAR, IntEnum::FOO]);

    let mut repeated = vec![LongEnum::FOO];
    let reversed = service.reverse_long_enum(&[], &mut repeated).unwrap();
    assert!(reversed.is_empty());
    assert!(repeated.is_empty());
}

#[test]
fn test_unimplemented_method_falls_back_to_default() {
    struct Doubler;

    impl ITestServiceDefault for Doubler {
        fn unimplemented_method(&self, arg: i32) -> binder_conformance::Result<i32> {
            Ok(arg * 2)
        }
    }

    let service = get_test_service();

    let status = service.unimplemented_method(21).unwrap_err();
    assert_eq!(status.exception_code(), ExceptionCode::TRANSACTION_FAILED);
    assert_eq!(status.transaction_error(), StatusCode::UNKNOWN_TRANSACTION);

    let previous = test_service::set_default_impl(Some(Arc::new(Doubler)));
    assert!(previous.is_none());
    assert!(test_service::get_default_impl().is_some());
    assert_eq!(service.unimplemented_method(21), Ok(42));

    test_service::set_default_impl(None);
    assert!(service.unimplemented_method(21).is_err());
}

#[test]
fn test_oneway_hides_the_service_failure() {
    let service = get_test_service();
    assert_eq!(service.test_oneway(), Ok(()));
}

#[test]
fn test_service_specific_exception() {
    let service = get_test_service();
    for code in [-1, 1, 2, i32::MAX] {
        let status = service.throw_service_exception(code).unwrap_err();
        assert_eq!(status.exception_code(), ExceptionCode::SERVICE_SPECIFIC);
        assert_eq!(status.service_specific_error(), code);
    }
}

#[test]
fn test_named_callbacks() {
    let service = get_test_service();
    let name: String16 = "Foo".into();

    let callback = service.get_other_test_service(&name).unwrap();
    assert_eq!(callback.get_name(), Ok(name.clone()));
    assert_eq!(service.verify_name(&callback, &name), Ok(true));
    assert_eq!(service.verify_name(&callback, &"Bar".into()), Ok(false));

    // The registry hands out the same object for a known name.
    assert_eq!(service.get_other_test_service(&name), Ok(callback.clone()));
    assert_eq!(service.set_other_test_service(&name, &callback), Ok(true));

    let replacement = BnNamedCallback::new_binder(NamedCallback::new("Foo".into()));
    assert_eq!(service.set_other_test_service(&name, &replacement), Ok(false));
    assert_eq!(service.get_other_test_service(&name), Ok(replacement));
}

#[test]
fn test_get_callback() {
    let service = get_test_service();
    assert_eq!(service.get_callback(true).map(|cb| cb.is_none()), Ok(true));

    let callback = service.get_callback(false).unwrap().unwrap();
    assert_eq!(callback.get_name().map(|name| name.to_string()), Ok("ABT: always be testing".into()));
}

#[test]
fn test_concurrent_registration_yields_one_callback() {
    let service = get_test_service();
    let name: String16 = "Concurrent".into();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            let name = name.clone();
            thread::spawn(move || service.get_other_test_service(&name).unwrap())
        })
        .collect();
    let callbacks: Vec<_> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();

    assert!(callbacks.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(service.get_other_test_service(&name).as_ref(), Ok(&callbacks[0]));
}

#[test]
fn test_interface_array() {
    let service = get_test_service();
    let input = names(&["Fizz", "Buzz"]);

    let callbacks = service.get_interface_array(&input).unwrap();
    assert_eq!(callbacks.len(), 2);
    assert_eq!(callbacks[1].get_name(), Ok("Buzz".into()));
    assert_eq!(service.verify_names_with_interface_array(&callbacks, &input), Ok(true));

    let swapped = names(&["Buzz", "Fizz"]);
    assert_eq!(service.verify_names_with_interface_array(&callbacks, &swapped), Ok(false));
    assert_eq!(service.verify_names_with_interface_array(&callbacks[..1], &input), Ok(false));
}

#[test]
fn test_nullable_interface_array() {
    let service = get_test_service();
    let input = nullable_names(&[Some("Fizz"), None, Some("Buzz")]);

    for callbacks in [
        service.get_nullable_interface_array(Some(&input)).unwrap(),
        service.get_interface_list(Some(&input)).unwrap(),
    ] {
        let callbacks = callbacks.unwrap();
        assert_eq!(callbacks.len(), 3);
        assert!(callbacks[1].is_none());
        assert_eq!(callbacks[0].as_ref().map(|cb| cb.get_name()), Some(Ok("Fizz".into())));

        assert_eq!(
            service.verify_names_with_nullable_interface_array(Some(&callbacks), Some(&input)),
            Ok(true)
        );
        assert_eq!(service.verify_names_with_interface_list(Some(&callbacks), Some(&input)), Ok(true));

        let shifted = nullable_names(&[Some("Fizz"), Some("Buzz"), None]);
        assert_eq!(
            service.verify_names_with_nullable_interface_array(Some(&callbacks), Some(&shifted)),
            Ok(false)
        );
    }

    assert_eq!(service.get_nullable_interface_array(None).map(|cbs| cbs.map(|v| v.len())), Ok(Some(0)));
    assert_eq!(service.verify_names_with_nullable_interface_array(None, None), Ok(true));
    assert_eq!(service.verify_names_with_interface_list(None, Some(&input)), Ok(false));
}

#[test]
fn test_repeat_nullable() {
    let service = get_test_service();

    assert_eq!(service.repeat_nullable_int_array(Some(&[1, 2, 3])), Ok(Some(vec![1, 2, 3])));
    assert_eq!(service.repeat_nullable_int_array(None), Ok(None));
    assert_eq!(service.repeat_nullable_int_array(Some(&[])), Ok(Some(vec![])));

    assert_eq!(
        service.repeat_nullable_byte_enum_array(Some(&[ByteEnum::FOO, ByteEnum::BAR])),
        Ok(Some(vec![ByteEnum::FOO, ByteEnum::BAR]))
    );
    assert_eq!(service.repeat_nullable_int_enum_array(None), Ok(None));
    assert_eq!(
        service.repeat_nullable_long_enum_array(Some(&[LongEnum::BAZ])),
        Ok(Some(vec![LongEnum::BAZ]))
    );

    let token: String16 = "Blooob".into();
    assert_eq!(service.repeat_nullable_string(Some(&token)), Ok(Some(token)));
    assert_eq!(service.repeat_nullable_string(None), Ok(None));

    let list = nullable_names(&[Some("Wat"), None, Some("Blooob")]);
    assert_eq!(service.repeat_nullable_string_list(Some(&list)), Ok(Some(list)));
    assert_eq!(service.repeat_nullable_string_list(None), Ok(None));

    assert_eq!(service.repeat_nullable_parcelable(Some(&Empty)), Ok(Some(Empty)));
    assert_eq!(service.repeat_nullable_parcelable(None), Ok(None));

    let parcelables = vec![Some(Empty), None, Some(Empty)];
    assert_eq!(service.repeat_nullable_parcelable_array(Some(&parcelables)), Ok(Some(parcelables.clone())));
    assert_eq!(service.repeat_nullable_parcelable_list(Some(&parcelables)), Ok(Some(parcelables)));
    assert_eq!(service.repeat_nullable_parcelable_list(None), Ok(None));

    assert_eq!(service.repeat_nullable_utf8_cpp_string(Some("héllo")), Ok(Some("héllo".into())));
    assert_eq!(service.repeat_nullable_utf8_cpp_string(None), Ok(None));
}

#[test]
fn test_binder_arguments() {
    let service = get_test_service();
    let binder = BnNamedCallback::new_binder(NamedCallback::new("Foo".into())).as_binder();

    assert_eq!(service.takes_an_ibinder(&binder), Ok(()));
    assert_eq!(service.takes_a_nullable_ibinder(Some(&binder)), Ok(()));
    assert_eq!(service.takes_a_nullable_ibinder(None), Ok(()));
    assert_eq!(service.takes_an_ibinder_list(&[binder.clone(), binder.clone()]), Ok(()));
    assert_eq!(service.takes_a_nullable_ibinder_list(Some(&[Some(binder), None])), Ok(()));
    assert_eq!(service.takes_a_nullable_ibinder_list(None), Ok(()));
}

#[test]
fn test_null_for_non_nullable_binder() {
    let service = get_test_service();
    let result = service
        .as_binder()
        .transact(transactions::TAKES_AN_IBINDER, 0, |data| data.write(&None::<SpIBinder>));
    assert_eq!(result.as_ref().err(), Some(&StatusCode::UNEXPECTED_NULL));

    let status: Status = result.unwrap_err().into();
    assert_eq!(status.exception_code(), ExceptionCode::NULL_POINTER);
}

#[test]
fn test_reverse_binder_arrays() {
    let service = get_test_service();
    let first = BnNamedCallback::new_binder(NamedCallback::new("first".into())).as_binder();
    let second = service.as_binder();

    let input = vec![first.clone(), second.clone()];
    let mut repeated = vec![];
    let reversed = service.reverse_ibinder_array(&input, &mut repeated).unwrap();
    assert_eq!(repeated, input);
    assert_eq!(reversed, [second.clone(), first.clone()]);

    let input = vec![Some(first.clone()), None, Some(second.clone())];
    let mut repeated = None;
    let reversed = service.reverse_nullable_ibinder_array(Some(&input), &mut repeated).unwrap();
    assert_eq!(repeated, Some(input));
    assert_eq!(reversed, Some(vec![Some(second), None, Some(first)]));

    let mut repeated = Some(vec![]);
    assert_eq!(service.reverse_nullable_ibinder_array(None, &mut repeated), Ok(None));
    assert_eq!(repeated, None);
}

#[test]
fn test_reverse_utf8_strings() {
    let service = get_test_service();

    let input: Vec<String> = vec!["a".into(), String::new(), "\u{00FF}".into()];
    let mut repeated = vec![];
    let reversed = service.reverse_utf8_cpp_string(&input, &mut repeated).unwrap();
    assert_eq!(repeated, input);
    assert_eq!(reversed, ["\u{00FF}", "", "a"]);

    let input = vec![Some("a".to_string()), None, Some("c".to_string())];
    let mut repeated = None;
    let reversed = service.reverse_nullable_utf8_cpp_string(Some(&input), &mut repeated).unwrap();
    assert_eq!(repeated.as_deref(), Some(&input[..]));
    assert_eq!(reversed, Some(vec![Some("c".to_string()), None, Some("a".to_string())]));
}

#[test]
fn test_null_string_list_clears_out_list() {
    let service = get_test_service();
    assert_eq!(service.get_backend_type(), Ok(BackendType::RUST));

    // This backend can report a null out list; the Java one cannot.
    let mut repeated = Some(vec![Some("stale".to_string())]);
    assert_eq!(service.reverse_utf8_cpp_string_list(None, &mut repeated), Ok(None));
    assert_eq!(repeated, None);
}

#[test]
fn test_parcel_file_descriptor() {
    let service = get_test_service();
    let (mut read_end, write_end) = pipe();

    let repeated = service.repeat_parcel_file_descriptor(&ParcelFileDescriptor::new(write_end)).unwrap();
    let mut writer = File::from(repeated);
    writer.write_all(b"Greetings from the other side").unwrap();
    drop(writer);

    let mut greeting = String::new();
    read_end.read_to_string(&mut greeting).unwrap();
    assert_eq!(greeting, "Greetings from the other side");
}

#[test]
fn test_parcel_file_descriptor_array() {
    let service = get_test_service();
    let first = tempfile::tempfile().unwrap();
    let second = tempfile::tempfile().unwrap();
    let input = vec![ParcelFileDescriptor::new(first), ParcelFileDescriptor::new(second)];

    let mut repeated = vec![];
    let reversed = service.reverse_parcel_file_descriptor_array(&input, &mut repeated).unwrap();
    assert_eq!(repeated, input);
    assert_eq!(reversed.len(), 2);
    assert_eq!(reversed[0], input[1]);
    assert_eq!(reversed[1], input[0]);

    // Every copy is its own descriptor on the same open file.
    let mut file = File::from(reversed.into_iter().next().unwrap());
    file.write_all(b"shared").unwrap();
    let mut original = input[1].as_ref();
    original.seek(SeekFrom::Start(0)).unwrap();
    let mut contents = String::new();
    original.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "shared");
}

#[test]
fn test_fill_out_structured_parcelable() {
    let service = get_test_service();
    let mut parcelable = StructuredParcelable { f: 17, ..Default::default() };

    service.fill_out_structured_parcelable(&mut parcelable).unwrap();

    assert_eq!(parcelable.should_contain_three_fs, [17, 17, 17]);
    assert_eq!(parcelable.should_be_jerry, "Jerry");
    assert_eq!(parcelable.should_be_byte_bar, ByteEnum::BAR);
    assert_eq!(parcelable.should_be_int_bar, IntEnum::BAR);
    assert_eq!(parcelable.should_be_long_bar, LongEnum::BAR);
    assert_eq!(parcelable.should_contain_two_byte_foos, [ByteEnum::FOO; 2]);
    assert_eq!(parcelable.should_contain_two_int_foos, [IntEnum::FOO; 2]);
    assert_eq!(parcelable.should_contain_two_long_foos, [LongEnum::FOO; 2]);
    assert_eq!(
        parcelable.should_set_bit0_and_bit2,
        StructuredParcelable::BIT0 | StructuredParcelable::BIT2
    );
    assert_eq!(parcelable.u, Some(Union::Ns(vec![1, 2, 3])));
    assert_eq!(parcelable.should_be_const_s1, Some(Union::S(union::S1.into())));

    // Untouched fields keep their defaults.
    assert_eq!(parcelable.string_defaults_to_foo, "foo");
    assert_eq!(parcelable.int_defaults_to_five, 5);
    assert_eq!(parcelable.default_with_foo, IntEnum::FOO);
}

#[test]
fn test_repeat_extendable_parcelable() {
    let service = get_test_service();

    let ext = Arc::new(MyExt { a: 42, b: "EXT".into() });
    let mut ep = ExtendableParcelable { a: 1, b: "a".into(), c: 42, ..Default::default() };
    ep.ext.set_parcelable(Arc::clone(&ext)).unwrap();

    let mut ep2 = ExtendableParcelable::default();
    service.repeat_extendable_parcelable(&ep, &mut ep2).unwrap();

    assert_eq!(ep2.a, ep.a);
    assert_eq!(ep2.b, ep.b);
    assert_eq!(ep2.c, ExtendableParcelable::default().c);

    let ret_ext = ep2.ext.get_parcelable::<MyExt>().unwrap();
    assert_eq!(ret_ext.as_deref(), Some(&*ext));
    assert!(ep2.ext.get_parcelable::<MyExtLike>().unwrap().is_none());
}

#[test]
fn test_reverse_recursive_list() {
    let service = get_test_service();

    let mut head: Option<Box<RecursiveList>> = None;
    for value in 0..10 {
        head = Some(Box::new(RecursiveList { value, next: head }));
    }
    let list = *head.unwrap();
    assert_eq!(list.values().collect::<Vec<_>>(), (0..10).rev().collect::<Vec<_>>());

    let reversed = service.reverse_list(&list).unwrap();
    assert_eq!(reversed.values().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
    assert_eq!(reversed.values().count(), 10);
}

#[test]
fn test_reverse_deep_recursive_list() {
    let service = get_test_service();

    let mut head: Option<Box<RecursiveList>> = None;
    for value in 0..20_000 {
        head = Some(Box::new(RecursiveList { value, next: head }));
    }
    let list = *head.unwrap();

    let reversed = service.reverse_list(&list).unwrap();
    assert!(reversed.values().eq(0..20_000));
}

#[test]
fn test_union() {
    let service = get_test_service();

    let unions = vec![
        Union::Ns(vec![]),
        Union::N(0),
        Union::M(1),
        Union::S(String::new()),
        Union::Ibinder(None),
        Union::Ss(vec![]),
        Union::Be(ByteEnum::FOO),
    ];
    assert_eq!(
        service.get_union_tags(&unions),
        Ok(vec![Tag::NS, Tag::N, Tag::M, Tag::S, Tag::IBINDER, Tag::SS, Tag::BE])
    );

    let mut repeated = Union::default();
    let input = Union::Ns(vec![1, 2, 3]);
    assert_eq!(service.reverse_union(&input, &mut repeated), Ok(Union::Ns(vec![3, 2, 1])));
    assert_eq!(repeated, input);

    let input = Union::S("abc".into());
    assert_eq!(service.reverse_union(&input, &mut repeated), Ok(Union::S("cba".into())));

    let input = Union::Ss(vec!["x".into(), "y".into()]);
    assert_eq!(service.reverse_union(&input, &mut repeated), Ok(Union::Ss(vec!["y".into(), "x".into()])));

    let input = Union::N(7);
    assert_eq!(service.reverse_union(&input, &mut repeated), Ok(Union::N(7)));
    assert_eq!(repeated, input);
}

#[test]
fn test_backend_type() {
    let service = get_test_service();
    assert_eq!(service.get_backend_type(), Ok(BackendType::RUST));
}

fn callback_name(binder: &SpIBinder) -> String {
    let callback = binder.clone().into_interface::<dyn INamedCallback>().unwrap();
    callback.get_name().unwrap().to_string()
}

#[test]
fn test_reverse_named_callback_list() {
    let service = get_test_service();
    let input: Vec<SpIBinder> = ["a", "b", "c"]
        .iter()
        .map(|&name| BnNamedCallback::new_binder(NamedCallback::new(name.into())).as_binder())
        .collect();

    let mut repeated = vec![];
    let reversed = service.reverse_named_callback_list(&input, &mut repeated).unwrap();
    assert_eq!(repeated, input);
    assert_eq!(repeated.iter().map(callback_name).collect::<Vec<_>>(), ["a", "b", "c"]);
    assert_eq!(reversed.iter().map(callback_name).collect::<Vec<_>>(), ["c", "b", "a"]);
    assert_eq!(reversed[0], input[2]);
}

#[test]
fn test_renamed_interface() {
    let service = get_test_service();
    let old_name = service.get_old_name_interface().unwrap();
    let new_name = service.get_new_name_interface().unwrap();

    for binder in [old_name.as_binder(), new_name.as_binder()] {
        assert_eq!(binder.get_interface_descriptor().as_deref(), Ok("android.aidl.tests.IOldName"));
    }
    assert_eq!(old_name.real_name().map(|n| n.to_string()), Ok("OldName".to_string()));
    assert_eq!(new_name.real_name().map(|n| n.to_string()), Ok("NewName".to_string()));

    let old_as_new = old_name.as_binder().into_interface::<dyn INewName>().unwrap();
    assert_eq!(old_as_new.real_name().map(|n| n.to_string()), Ok("OldName".to_string()));
    let new_as_old = new_name.as_binder().into_interface::<dyn IOldName>().unwrap();
    assert_eq!(new_as_old.real_name().map(|n| n.to_string()), Ok("NewName".to_string()));
}

#[test]
fn test_circular_references() {
    let service = get_test_service();
    let mut cp = CircularParcelable::default();
    let circular = service.get_circular(&mut cp).unwrap();

    let inner = cp.test_service.clone().unwrap();
    assert_eq!(circular.get_test_service(), Ok(Some(inner.clone())));
    assert_ne!(inner, service);
    assert_eq!(inner.repeat_int(7), Ok(7));
}
