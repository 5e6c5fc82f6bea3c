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

use std::fmt;
use std::ops;

/// Owned UTF-16 string, the in-memory form of an AIDL `String` without
/// `@utf8InCpp`.
///
/// The code units are kept verbatim, so unpaired surrogates survive a round
/// trip even though they cannot be represented by a Rust [`String`].
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct String16(Vec<u16>);

impl String16 {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_units(units: Vec<u16>) -> Self {
        Self(units)
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }

}

impl From<&str> for String16 {
    fn from(s: &str) -> String16 {
        String16(s.encode_utf16().collect())
    }
}

impl From<&[u16]> for String16 {
    fn from(units: &[u16]) -> String16 {
        String16(units.to_vec())
    }
}

impl ops::Deref for String16 {
    type Target = [u16];

    #[inline]
    fn deref(&self) -> &[u16] {
        &self.0
    }
}

impl fmt::Display for String16 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lossy: String = std::char::decode_utf16(self.0.iter().copied())
            .map(|r| r.unwrap_or(std::char::REPLACEMENT_CHARACTER))
            .collect();
        f.write_str(&lossy)
    }
}

impl fmt::Debug for String16 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.to_string().fmt(f)
    }
}

impl PartialEq<&str> for String16 {
    fn eq(&self, other: &&str) -> bool {
        self.0.iter().copied().eq(other.encode_utf16())
    }
}
