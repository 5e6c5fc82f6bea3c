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

//! Raw transactions through a hand-written interface, checking the wire
//! encoding on both sides of a call.

use binder_conformance::interfaces::enums::ByteEnum;
use binder_conformance::interfaces::union::Union;
use binder_conformance::{
    declare_binder_interface, Interface, Parcel, SpIBinder, Status, StatusCode, String16,
    TransactionCode, FIRST_CALL_TRANSACTION,
};

static I8S: &[i8; 4] = &[-128, 0, 117, 127];
static U8S: &[u8; 4] = &[0, 42, 117, 255];
static U16S: &[u16; 4] = &[0, 42, 117, u16::MAX];
static I32S: &[i32; 4] = &[i32::MIN, 0, 117, i32::MAX];
static I64S: &[i64; 4] = &[i64::MIN, 0, 117, i64::MAX];
static FLOATS: &[f32; 4] = &[-f32::INFINITY, 0.5, 117.0, f32::INFINITY];
static DOUBLES: &[f64; 4] = &[-f64::INFINITY, 0.25, 117.0, f64::INFINITY];
static BOOLS: &[bool; 4] = &[true, false, false, true];
static STRINGS: &[Option<&str>; 4] = &[Some(""), None, Some("test"), Some("😁")];

const READ_VALUES: TransactionCode = FIRST_CALL_TRANSACTION;
const ECHO_STRINGS: TransactionCode = FIRST_CALL_TRANSACTION + 1;
const READ_UNION: TransactionCode = FIRST_CALL_TRANSACTION + 2;

pub trait ReadParcelTest: Interface {}

declare_binder_interface! {
    ReadParcelTest["read_parcel_test"] {
        native: BnReadParcelTest(on_transact),
        proxy: BpReadParcelTest,
    }
}

impl ReadParcelTest for BpReadParcelTest {}

struct ReadParcelService;

impl Interface for ReadParcelService {}

impl ReadParcelTest for ReadParcelService {}

#[allow(clippy::float_cmp)]
fn on_transact(
    _service: &dyn ReadParcelTest,
    code: TransactionCode,
    parcel: &Parcel,
    reply: &mut Parcel,
) -> Result<(), StatusCode> {
    match code {
        READ_VALUES => {
            assert!(parcel.read::<bool>()?);
            assert!(!parcel.read::<bool>()?);
            assert_eq!(parcel.read::<Vec<bool>>()?, BOOLS);
            assert_eq!(parcel.read::<Option<Vec<bool>>>()?, None);

            assert_eq!(parcel.read::<i8>()?, i8::MAX);
            assert_eq!(parcel.read::<Vec<i8>>()?, I8S);
            assert_eq!(parcel.read::<Vec<u8>>()?, U8S);
            assert_eq!(parcel.read::<Option<Vec<u8>>>()?, None);

            assert_eq!(parcel.read::<u16>()?, u16::MAX);
            assert_eq!(parcel.read::<Vec<u16>>()?, U16S);

            assert_eq!(parcel.read::<i32>()?, i32::MIN);
            assert_eq!(parcel.read::<Vec<i32>>()?, I32S);
            assert_eq!(parcel.read::<i64>()?, i64::MAX);
            assert_eq!(parcel.read::<Vec<i64>>()?, I64S);

            assert_eq!(parcel.read::<f32>()?, 1.5);
            assert_eq!(parcel.read::<Vec<f32>>()?, FLOATS);
            assert_eq!(parcel.read::<f64>()?, -2.5);
            assert_eq!(parcel.read::<Vec<f64>>()?, DOUBLES);

            assert_eq!(parcel.read::<String16>()?, "String16");
            assert_eq!(parcel.read::<Option<String16>>()?, None);

            assert_eq!(parcel.data_avail(), 0);
            reply.write(&Status::ok())
        }
        ECHO_STRINGS => {
            let strings: Vec<Option<String>> = parcel.read()?;
            reply.write(&strings)
        }
        READ_UNION => {
            let union: Union = parcel.read()?;
            reply.write(&union.get_tag())
        }
        _ => Err(StatusCode::UNKNOWN_TRANSACTION),
    }
}

fn read_parcel_binder() -> SpIBinder {
    BnReadParcelTest::new_binder(ReadParcelService).as_binder()
}

#[test]
fn test_read_values() {
    let binder = read_parcel_binder();
    let reply = binder
        .transact(READ_VALUES, 0, |data| {
            data.write(&true)?;
            data.write(&false)?;
            data.write(&BOOLS[..])?;
            data.write(&None::<Vec<bool>>)?;

            data.write(&i8::MAX)?;
            data.write(&I8S[..])?;
            data.write(&U8S[..])?;
            data.write(&None::<Vec<u8>>)?;

            data.write(&u16::MAX)?;
            data.write(&U16S[..])?;

            data.write(&i32::MIN)?;
            data.write(&I32S[..])?;
            data.write(&i64::MAX)?;
            data.write(&I64S[..])?;

            data.write(&1.5f32)?;
            data.write(&FLOATS[..])?;
            data.write(&-2.5f64)?;
            data.write(&DOUBLES[..])?;

            data.write(&String16::from("String16"))?;
            data.write(&None::<String16>)
        })
        .unwrap();
    assert_eq!(reply.read::<Status>().map(|s| s.is_ok()), Ok(true));
}

#[test]
fn test_echo_nullable_strings() {
    let binder = read_parcel_binder();
    let strings: Vec<Option<String>> = STRINGS.iter().map(|s| s.map(String::from)).collect();
    let reply = binder.transact(ECHO_STRINGS, 0, |data| data.write(&strings)).unwrap();
    assert_eq!(reply.read::<Vec<Option<String>>>(), Ok(strings));
}

#[test]
fn test_union_tag_on_the_wire() {
    let binder = read_parcel_binder();
    let reply = binder
        .transact(READ_UNION, 0, |data| data.write(&Union::Be(ByteEnum::BAZ)))
        .unwrap();
    assert_eq!(reply.read::<i32>(), Ok(6));
}

#[test]
fn test_truncated_request_fails_the_call() {
    let binder = read_parcel_binder();
    let result = binder.transact(READ_VALUES, 0, |data| data.write(&true));
    assert_eq!(result.err(), Some(StatusCode::NOT_ENOUGH_DATA));
}

#[test]
fn test_unknown_transaction() {
    let binder = read_parcel_binder();
    let result = binder.transact(FIRST_CALL_TRANSACTION + 99, 0, |_| Ok(()));
    assert_eq!(result.err(), Some(StatusCode::UNKNOWN_TRANSACTION));
}

#[test]
fn test_builtin_transactions() {
    let binder = read_parcel_binder();
    assert_eq!(binder.ping_binder(), Ok(()));
    assert_eq!(binder.get_interface_descriptor().as_deref(), Ok("read_parcel_test"));
}
