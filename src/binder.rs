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

//! Trait definitions for binder objects

use crate::error::{Result, StatusCode};
use crate::parcel::{
    Deserialize, DeserializeArray, DeserializeOption, Parcel, Serialize, SerializeArray,
    SerializeOption,
};
use crate::proxy::SpIBinder;

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Binder action to perform.
///
/// This must be a number between [`FIRST_CALL_TRANSACTION`] and
/// [`LAST_CALL_TRANSACTION`]. Generated interfaces number their methods
/// from `FIRST_CALL_TRANSACTION` in declaration order.
pub type TransactionCode = u32;

/// Additional operation flags.
///
/// Can be either 0 for a normal RPC, or [`FLAG_ONEWAY`] for a
/// one-way RPC.
pub type TransactionFlags = u32;

/// First transaction code available for user commands.
pub const FIRST_CALL_TRANSACTION: TransactionCode = 0x0000_0001;
/// Last transaction code available for user commands.
pub const LAST_CALL_TRANSACTION: TransactionCode = 0x00ff_ffff;

/// Built-in transaction answered by every binder object without reaching
/// the service.
pub const PING_TRANSACTION: TransactionCode = b_pack_chars('_', 'P', 'N', 'G');
/// Built-in transaction that replies with the interface descriptor.
pub const INTERFACE_TRANSACTION: TransactionCode = b_pack_chars('_', 'N', 'T', 'F');

/// Corresponds to TF_ONE_WAY -- an asynchronous call.
pub const FLAG_ONEWAY: TransactionFlags = 0x01;

const fn b_pack_chars(c1: char, c2: char, c3: char, c4: char) -> TransactionCode {
    ((c1 as u32) << 24) | ((c2 as u32) << 16) | ((c3 as u32) << 8) | (c4 as u32)
}

/// Interface stability promise
///
/// An interface can promise to be a stable vendor interface ([`Vintf`]), or
/// makes no stability guarantees ([`Local`]). [`Local`] is
/// currently the default stability.
///
/// [`Vintf`]: Stability::Vintf
/// [`Local`]: Stability::Local
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stability {
    /// Default stability, visible to other modules in the same compilation
    /// context (e.g. modules on system.img)
    #[default]
    Local,

    /// A Vendor Interface Object, which promises to be stable
    Vintf,
}

impl From<Stability> for i32 {
    fn from(stability: Stability) -> i32 {
        use Stability::*;
        match stability {
            Local => 0,
            Vintf => 0b111111,
        }
    }
}

impl TryFrom<i32> for Stability {
    type Error = StatusCode;
    fn try_from(stability: i32) -> Result<Stability> {
        use Stability::*;
        match stability {
            0 => Ok(Local),
            0b111111 => Ok(Vintf),
            _ => Err(StatusCode::BAD_VALUE),
        }
    }
}

/// A struct that is remotable via Binder.
///
/// This is a low-level interface that should normally be automatically
/// generated from AIDL via the [`declare_binder_interface!`] macro. When using
/// the macro, the `on_transact` handler is generated from a dispatch function
/// over the interface trait.
pub trait Remotable: Send + Sync + 'static {
    /// The Binder interface descriptor string.
    ///
    /// This string is a unique identifier for a Binder interface, and should be
    /// the same between all implementations of that interface.
    fn get_descriptor() -> &'static str;

    /// Handle and reply to a request to invoke a transaction on this object.
    ///
    /// Built-in transactions (ping, interface descriptor) never reach this
    /// method. An unknown `code` must be answered with
    /// `Err(StatusCode::UNKNOWN_TRANSACTION)`.
    fn on_transact(&self, code: TransactionCode, data: &Parcel, reply: &mut Parcel) -> Result<()>;
}

/// Super-trait for Binder interfaces.
///
/// This trait allows conversion of a Binder interface trait object into an
/// IBinder object for IPC calls. All Binder remotable interface (i.e. AIDL
/// interfaces) must implement this trait.
///
/// This is equivalent `IInterface` in C++.
pub trait Interface: Send + Sync {
    /// Convert this binder object into a generic [`SpIBinder`] reference.
    ///
    /// Proxies generated by [`declare_binder_interface!`] implement this. A
    /// local service has no binder of its own; wrap it with the generated
    /// `new_binder` and use the handle that returns.
    ///
    /// # Panics
    ///
    /// The default implementation panics. It is reached when a bare service
    /// is placed in a [`Strong`] with [`Strong::new`] and then written to a
    /// parcel or compared.
    fn as_binder(&self) -> SpIBinder {
        panic!("This object was not a Binder object and cannot be converted into an SpIBinder.")
    }
}

/// Interface for transforming a generic SpIBinder into a specific remote
/// interface trait.
///
/// # Example
///
/// For Binder interface `IFoo`, the following implementation should be made:
/// ```ignore
/// impl FromIBinder for dyn IFoo {
///     fn try_from(ibinder: SpIBinder) -> Result<Strong<Self>, StatusCode> {
///         // ...
///     }
/// }
/// ```
pub trait FromIBinder: Interface {
    /// Try to interpret a generic Binder object as this interface.
    ///
    /// Returns a trait object for the `Self` interface if this object
    /// implements that interface.
    fn try_from(ibinder: SpIBinder) -> Result<Strong<Self>>;
}

/// Strong reference to a binder object
///
/// Cloning is cheap and every clone refers to the same binder object. Two
/// references are equal when they refer to the same object.
pub struct Strong<I: FromIBinder + ?Sized>(Arc<I>);

impl<I: FromIBinder + ?Sized> Strong<I> {
    /// Create a new strong reference to the provided binder object
    ///
    /// `binder` must implement [`Interface::as_binder`], as generated proxies
    /// do.
    pub fn new(binder: Box<I>) -> Self {
        Self(Arc::from(binder))
    }
}

impl<I: FromIBinder + ?Sized> Clone for Strong<I> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<I: FromIBinder + ?Sized> Deref for Strong<I> {
    type Target = I;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<I: FromIBinder + ?Sized> fmt::Debug for Strong<I> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Strong").field(&self.0.as_binder()).finish()
    }
}

impl<I: FromIBinder + ?Sized> PartialEq for Strong<I> {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_binder() == other.0.as_binder()
    }
}

impl<I: FromIBinder + ?Sized> Eq for Strong<I> {}

impl<T: Serialize + FromIBinder + ?Sized> Serialize for Strong<T> {
    fn serialize(&self, parcel: &mut Parcel) -> Result<()> {
        Serialize::serialize(&*self.0, parcel)
    }
}

impl<T: SerializeOption + FromIBinder + ?Sized> SerializeOption for Strong<T> {
    fn serialize_option(this: Option<&Self>, parcel: &mut Parcel) -> Result<()> {
        SerializeOption::serialize_option(this.map(|b| &*b.0), parcel)
    }
}

impl<T: Serialize + FromIBinder + ?Sized> SerializeArray for Strong<T> {}

impl<T: FromIBinder + ?Sized> Deserialize for Strong<T> {
    fn deserialize(parcel: &Parcel) -> Result<Self> {
        let ibinder: SpIBinder = parcel.read()?;
        <T as FromIBinder>::try_from(ibinder)
    }
}

impl<T: FromIBinder + ?Sized> DeserializeOption for Strong<T> {
    fn deserialize_option(parcel: &Parcel) -> Result<Option<Self>> {
        let ibinder: Option<SpIBinder> = parcel.read()?;
        ibinder.map(<T as FromIBinder>::try_from).transpose()
    }
}

impl<T: FromIBinder + ?Sized> DeserializeArray for Strong<T> {}

/// Declare a binder interface.
///
/// This is mainly used internally by the AIDL compiler. It generates a
/// native type (`$native`) that wraps any implementation of `$interface`
/// into a remotable object, and a proxy type (`$proxy`) that turns trait
/// calls into transactions. The caller provides the proxy's trait
/// implementation and the `$on_transact` dispatch function.
///
/// Binders created with `$native::new_binder` are always reached through
/// `$proxy`, so every call is marshalled into a parcel and back even though
/// the service lives in this process.
///
/// # Examples
///
/// The following example declares the local service type `BnServiceManager`
/// and a remote proxy type `BpServiceManager` (the `n` and `p` stand for
/// native and proxy respectively) for the IServiceManager Binder interface.
///
/// ```ignore
/// declare_binder_interface! {
///     IServiceManager["android.os.IServiceManager"] {
///         native: BnServiceManager(on_transact),
///         proxy: BpServiceManager,
///     }
/// }
/// ```
#[macro_export]
macro_rules! declare_binder_interface {
    {
        $interface:ident[$descriptor:expr] {
            native: $native:ident($on_transact:path),
            proxy: $proxy:ident,
        }
    } => {
        #[doc = concat!("A binder proxy for the ", stringify!($interface), " interface.")]
        pub struct $proxy {
            binder: $crate::SpIBinder,
        }

        impl $crate::Interface for $proxy {
            fn as_binder(&self) -> $crate::SpIBinder {
                self.binder.clone()
            }
        }

        #[doc = concat!("The local (native) side of the ", stringify!($interface), " interface.")]
        #[repr(transparent)]
        pub struct $native(Box<dyn $interface + Sync + Send + 'static>);

        impl $native {
            /// Create a new binder service.
            pub fn new_binder<T: $interface + Sync + Send + 'static>(
                inner: T,
            ) -> $crate::Strong<dyn $interface> {
                let binder: $crate::SpIBinder = $crate::Binder::new($native(Box::new(inner))).into();
                $crate::Strong::new(Box::new($proxy { binder }))
            }
        }

        impl $crate::Remotable for $native {
            fn get_descriptor() -> &'static str {
                $descriptor
            }

            fn on_transact(
                &self,
                code: $crate::TransactionCode,
                data: &$crate::Parcel,
                reply: &mut $crate::Parcel,
            ) -> std::result::Result<(), $crate::StatusCode> {
                $on_transact(&*self.0, code, data, reply)
            }
        }

        impl $crate::FromIBinder for dyn $interface {
            fn try_from(
                ibinder: $crate::SpIBinder,
            ) -> std::result::Result<$crate::Strong<dyn $interface>, $crate::StatusCode> {
                if ibinder.get_interface_descriptor()? != <$native as $crate::Remotable>::get_descriptor() {
                    return Err($crate::StatusCode::BAD_TYPE);
                }
                Ok($crate::Strong::new(Box::new($proxy { binder: ibinder })))
            }
        }

        impl $crate::parcel::Serialize for dyn $interface + '_ {
            fn serialize(
                &self,
                parcel: &mut $crate::Parcel,
            ) -> std::result::Result<(), $crate::StatusCode> {
                let binder = $crate::Interface::as_binder(self);
                parcel.write(&binder)
            }
        }

        impl $crate::parcel::SerializeOption for dyn $interface + '_ {
            fn serialize_option(
                this: Option<&Self>,
                parcel: &mut $crate::Parcel,
            ) -> std::result::Result<(), $crate::StatusCode> {
                parcel.write(&this.map($crate::Interface::as_binder))
            }
        }

        impl std::fmt::Debug for dyn $interface + '_ {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.pad(stringify!($interface))
            }
        }
    };
}

/// Declare an AIDL enumeration.
///
/// This is mainly used internally by the AIDL compiler. The enumeration is a
/// newtype over its backing integer, so values outside the declared set
/// survive a round trip. Arrays of a byte-backed enumeration are packed like
/// byte arrays.
#[macro_export]
macro_rules! declare_binder_enum {
    {
        $( #[$attr:meta] )*
        $enum:ident : [$backing:ty; $size:expr] {
            $( $name:ident = $value:expr, )*
        }
    } => {
        $( #[$attr] )*
        #[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[allow(missing_docs)]
        pub struct $enum(pub $backing);

        impl $enum {
            $(
                #[allow(missing_docs)]
                pub const $name: Self = Self($value);
            )*

            /// Every declared value, in declaration order.
            #[inline(always)]
            pub const fn enum_values() -> [Self; $size] {
                [$(Self::$name),*]
            }
        }

        impl std::fmt::Debug for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                $(
                    if *self == Self::$name {
                        return f.write_str(stringify!($name));
                    }
                )*
                f.write_fmt(format_args!("{}", self.0))
            }
        }

        impl $crate::parcel::Serialize for $enum {
            fn serialize(
                &self,
                parcel: &mut $crate::Parcel,
            ) -> std::result::Result<(), $crate::StatusCode> {
                parcel.write(&self.0)
            }
        }

        impl $crate::parcel::SerializeArray for $enum {
            fn serialize_array(
                slice: &[Self],
                parcel: &mut $crate::Parcel,
            ) -> std::result::Result<(), $crate::StatusCode> {
                let v: Vec<$backing> = slice.iter().map(|x| x.0).collect();
                <$backing as $crate::parcel::SerializeArray>::serialize_array(&v[..], parcel)
            }

            fn serialize_fixed_array(
                slice: &[Self],
                parcel: &mut $crate::Parcel,
            ) -> std::result::Result<(), $crate::StatusCode> {
                let v: Vec<$backing> = slice.iter().map(|x| x.0).collect();
                <$backing as $crate::parcel::SerializeArray>::serialize_fixed_array(&v[..], parcel)
            }

            fn serialize_fixed_rows<const N: usize>(
                rows: &[[Self; N]],
                parcel: &mut $crate::Parcel,
            ) -> std::result::Result<(), $crate::StatusCode> {
                let v: Vec<[$backing; N]> = rows.iter().map(|row| row.map(|x| x.0)).collect();
                <$backing as $crate::parcel::SerializeArray>::serialize_fixed_rows(&v[..], parcel)
            }
        }

        impl $crate::parcel::Deserialize for $enum {
            fn deserialize(
                parcel: &$crate::Parcel,
            ) -> std::result::Result<Self, $crate::StatusCode> {
                parcel.read().map(Self)
            }
        }

        impl $crate::parcel::DeserializeArray for $enum {
            const MIN_ENCODED_SIZE: usize =
                <$backing as $crate::parcel::DeserializeArray>::MIN_ENCODED_SIZE;

            fn deserialize_array(
                parcel: &$crate::Parcel,
            ) -> std::result::Result<Option<Vec<Self>>, $crate::StatusCode> {
                let v: Option<Vec<$backing>> =
                    <$backing as $crate::parcel::DeserializeArray>::deserialize_array(parcel)?;
                Ok(v.map(|v| v.into_iter().map(Self).collect()))
            }

            fn deserialize_fixed_array<const N: usize>(
                parcel: &$crate::Parcel,
            ) -> std::result::Result<[Self; N], $crate::StatusCode> {
                <$backing as $crate::parcel::DeserializeArray>::deserialize_fixed_array::<N>(parcel)
                    .map(|v| v.map(Self))
            }

            fn deserialize_fixed_rows<const N: usize, const M: usize>(
                parcel: &$crate::Parcel,
            ) -> std::result::Result<[[Self; N]; M], $crate::StatusCode> {
                <$backing as $crate::parcel::DeserializeArray>::deserialize_fixed_rows::<N, M>(parcel)
                    .map(|rows| rows.map(|row| row.map(Self)))
            }
        }
    };
}
