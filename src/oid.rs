//! ASN.1 Object Identifiers.
//!
//! This module contains the [`Oid`] type that implements object identifiers,
//! a construct used by ASN.1 to uniquely identify all sorts of things. The
//! type is also re-exported at the top-level.

use std::{fmt, str};
use smallvec::SmallVec;
use crate::error::EncodeError;


//------------ Oid -----------------------------------------------------------

/// An object identifer.
///
/// Object identifiers are globally unique, hierarchical values that are used
/// to identify objects or their type. When written, they are presented as a
/// sequence of integers separated by dots such as ‘1.3.6.1.5.5.7.1’.
///
/// Values of this type keep the integers, called arcs, as given. Whether
/// they actually form a valid object identifier is only checked when the
/// content octets are produced: there need to be at least two arcs, the
/// first one can only be 0, 1, or 2, and below 0 and 1 the second arc has
/// to be less than 40.
///
/// # Encoding
///
/// The first two arcs are combined into a single subidentifier with the
/// value `first * 40 + second`. Each subidentifier is encoded as an
/// unsigned integer in base 128, most significant digit first, with as few
/// digits as possible and bit 8 set in all octets but the last.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Oid {
    arcs: SmallVec<[u64; 8]>,
}

impl Oid {
    /// Creates an object identifier from its arcs.
    pub fn new(arcs: &[u64]) -> Self {
        Oid { arcs: arcs.into() }
    }

    /// Returns the arcs of the object identifier.
    pub fn arcs(&self) -> &[u64] {
        self.arcs.as_ref()
    }

    /// Appends the content octets to `target`.
    pub fn append_content(
        &self, target: &mut Vec<u8>
    ) -> Result<(), EncodeError> {
        let (first, second, tail) = match self.arcs.as_slice() {
            [first, second, tail @ ..] => (*first, *second, tail),
            _ => {
                xerr!(return Err(EncodeError::invalid_value(
                    "object identifier needs at least two arcs"
                )))
            }
        };
        let head = match first {
            0 | 1 if second < 40 => first * 40 + second,
            2 => match second.checked_add(80) {
                Some(head) => head,
                None => {
                    xerr!(return Err(EncodeError::invalid_value(
                        "object identifier arc too large"
                    )))
                }
            }
            _ => {
                xerr!(return Err(EncodeError::invalid_value(
                    "illegal leading object identifier arcs"
                )))
            }
        };
        append_subidentifier(head, target);
        for &arc in tail {
            append_subidentifier(arc, target);
        }
        Ok(())
    }
}

/// Appends a single base-128 subidentifier.
fn append_subidentifier(value: u64, target: &mut Vec<u8>) {
    let mut buf = [0u8; 10];
    let mut idx = buf.len() - 1;
    let mut value = value;
    buf[idx] = (value & 0x7F) as u8;
    value >>= 7;
    while value != 0 {
        idx -= 1;
        buf[idx] = (value & 0x7F) as u8 | 0x80;
        value >>= 7;
    }
    target.extend_from_slice(&buf[idx..])
}


//--- From and FromStr

impl From<&[u64]> for Oid {
    fn from(arcs: &[u64]) -> Self {
        Self::new(arcs)
    }
}

impl str::FromStr for Oid {
    type Err = ParseOidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('.').map(|item| {
            item.parse::<u64>().map_err(|_| ParseOidError)
        }).collect::<Result<SmallVec<_>, _>>().map(|arcs| Oid { arcs })
    }
}


//--- Display and Debug

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut arcs = self.arcs.iter();
        if let Some(first) = arcs.next() {
            write!(f, "{}", first)?;
            for arc in arcs {
                write!(f, ".{}", arc)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}


//------------ ParseOidError -------------------------------------------------

/// The string didn’t contain a dotted sequence of integers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseOidError;

impl fmt::Display for ParseOidError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid object identifier")
    }
}

impl std::error::Error for ParseOidError { }


//============ Tests =========================================================
