//! Strings types.
//!
//! This module provides types that match the various string types provided
//! by ASN.1.
//!
//! There are two types of strings for binary data. [`OctetString`]s contain
//! a unrestricted sequence of octets while [`BitString`]s contain a sequence
//! of bits that does not need to be of a length divisible by eight.
//!
//! In addition, there are a number of so-called restricted character strings
//! that each contain a sequence of characters according to a pre-defined
//! character set. These are all represented by [`CharString`] with a
//! [`StringKind`] selecting the type. The kind also covers the two time
//! types UTCTime and GeneralizedTime.

//--- Re-exports

pub use self::bit::BitString;
pub use self::octet::OctetString;
pub use self::restricted::{CharString, StringKind};

//--- Private modules

mod bit;
mod octet;
mod restricted;
