//! Canonical encoding of ASN.1 values in the Distinguished Encoding Rules.
//!
//! The crate encodes dynamically typed value trees. A tree is built from
//! [`Value`]s, the SEQUENCE and SET values in it carry their components
//! together with a [`Schema`][value::Schema] declaring which components are
//! optional or have a default. The tree is then handed to [`encode()`] which
//! produces the one and only DER encoding of it:
//!
//! ```
//! use cander::{EncodeOptions, Value, encode};
//!
//! let value = Value::SetOf(vec![
//!     Value::octet_string("b"), Value::octet_string("a"),
//! ]);
//! assert_eq!(
//!     encode(&value, EncodeOptions::new()).unwrap(),
//!     [0x31, 6, 4, 1, b'a', 4, 1, b'b']
//! );
//! ```
//!
//! The machinery behind [`encode()`] lives in the [`encode`][mod@encode]
//! module.

pub use self::encode::{EncodeOptions, Engine, Policy, encode};
pub use self::error::{EncodeError, ErrorKind};
pub use self::ident::{Class, Ident, Tag};
pub use self::int::Integer;
pub use self::length::Length;
pub use self::oid::Oid;
pub use self::string::{BitString, CharString, OctetString, StringKind};
pub use self::value::Value;

#[macro_use] pub mod debug;

pub mod encode;
pub mod oid;
pub mod string;
pub mod value;

mod error;
mod ident;
mod int;
mod length;
