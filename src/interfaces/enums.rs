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

//! Enumerations used by the test interfaces.

declare_binder_enum! {
    /// Byte-backed enumeration; arrays of it are packed like byte arrays.
    ByteEnum : [i8; 3] {
        FOO = 1,
        BAR = 2,
        BAZ = 3,
    }
}

declare_binder_enum! {
    IntEnum : [i32; 4] {
        FOO = 1000,
        BAR = 2000,
        BAZ = 2001,
        QUX = 2002,
    }
}

declare_binder_enum! {
    LongEnum : [i64; 3] {
        FOO = 100000000000,
        BAR = 200000000000,
        BAZ = 200000000001,
    }
}

declare_binder_enum! {
    /// The language binding a service was built with.
    ///
    /// Some behaviour differs between bindings, most visibly whether an
    /// output list can be cleared to null.
    BackendType : [i8; 4] {
        CPP = 0,
        JAVA = 1,
        NDK = 2,
        RUST = 3,
    }
}
