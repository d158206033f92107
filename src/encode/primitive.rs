//! Encoders for primitive values.
//!
//! This is an internal module. The relevant items are re-exported by the
//! parent.
//!
//! The string encoders come in two flavours. Those registered in the base
//! table break long strings into a constructed series of chunks if the
//! options ask for it. The canonical ones always produce the primitive
//! form.

use crate::error::EncodeError;
use crate::ident::Tag;
use crate::value::Value;
use super::engine::{EncodeOptions, Engine, append_header};
use super::registry::{Encoder, mismatch};


//------------ BooleanEncoder ------------------------------------------------

/// Encodes BOOLEAN values.
///
/// True is always encoded as 0xFF.
#[derive(Clone, Copy, Debug, Default)]
pub struct BooleanEncoder;

impl Encoder for BooleanEncoder {
    fn encode_content(
        &self, value: &Value, _: &Engine, _: EncodeOptions,
        target: &mut Vec<u8>,
    ) -> Result<bool, EncodeError> {
        match *value {
            Value::Boolean(true) => target.push(0xFF),
            Value::Boolean(false) => target.push(0),
            _ => return Err(mismatch(self, value))
        }
        Ok(false)
    }
}


//------------ IntegerEncoder ------------------------------------------------

/// Encodes INTEGER and ENUMERATED values.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntegerEncoder;

impl Encoder for IntegerEncoder {
    fn encode_content(
        &self, value: &Value, _: &Engine, _: EncodeOptions,
        target: &mut Vec<u8>,
    ) -> Result<bool, EncodeError> {
        match *value {
            Value::Integer(ref int) | Value::Enumerated(ref int) => {
                target.extend_from_slice(int.as_slice());
                Ok(false)
            }
            _ => Err(mismatch(self, value))
        }
    }
}


//------------ NullEncoder ---------------------------------------------------

/// Encodes the NULL value with empty content.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEncoder;

impl Encoder for NullEncoder {
    fn encode_content(
        &self, value: &Value, _: &Engine, _: EncodeOptions,
        _: &mut Vec<u8>,
    ) -> Result<bool, EncodeError> {
        match *value {
            Value::Null => Ok(false),
            _ => Err(mismatch(self, value))
        }
    }
}


//------------ OidEncoder ----------------------------------------------------

/// Encodes OBJECT IDENTIFIER values.
#[derive(Clone, Copy, Debug, Default)]
pub struct OidEncoder;

impl Encoder for OidEncoder {
    fn encode_content(
        &self, value: &Value, _: &Engine, _: EncodeOptions,
        target: &mut Vec<u8>,
    ) -> Result<bool, EncodeError> {
        match *value {
            Value::Oid(ref oid) => {
                oid.append_content(target)?;
                Ok(false)
            }
            _ => Err(mismatch(self, value))
        }
    }
}


//------------ CharStringEncoder ---------------------------------------------

/// Encodes restricted character strings and time values.
///
/// These are always encoded in primitive form.
#[derive(Clone, Copy, Debug, Default)]
pub struct CharStringEncoder;

impl Encoder for CharStringEncoder {
    fn encode_content(
        &self, value: &Value, _: &Engine, _: EncodeOptions,
        target: &mut Vec<u8>,
    ) -> Result<bool, EncodeError> {
        match *value {
            Value::String(ref s) => {
                target.extend_from_slice(s.canonical_content()?.as_ref());
                Ok(false)
            }
            _ => Err(mismatch(self, value))
        }
    }
}


//------------ OctetStringEncoder --------------------------------------------

/// Encodes OCTET STRING values, breaking them into chunks if requested.
///
/// If the options give a maximum chunk size and the string is longer than
/// that, the string is encoded in constructed form as a sequence of
/// primitive octet strings of at most that size.
#[derive(Clone, Copy, Debug, Default)]
pub struct OctetStringEncoder;

impl Encoder for OctetStringEncoder {
    fn encode_content(
        &self, value: &Value, _: &Engine, options: EncodeOptions,
        target: &mut Vec<u8>,
    ) -> Result<bool, EncodeError> {
        let octets = match *value {
            Value::OctetString(ref octets) => octets.as_slice(),
            _ => return Err(mismatch(self, value))
        };
        match chunk_size(options, octets.len()) {
            Some(size) => {
                for chunk in octets.chunks(size) {
                    append_header(
                        target, Tag::OCTET_STRING, false, chunk.len()
                    );
                    target.extend_from_slice(chunk);
                }
                Ok(true)
            }
            None => {
                target.extend_from_slice(octets);
                Ok(false)
            }
        }
    }
}


//------------ BitStringEncoder ----------------------------------------------

/// Encodes BIT STRING values, breaking them into chunks if requested.
///
/// The chunk size applies to the octets of the bit string. Only the last
/// chunk carries the unused bits. The unused bits themselves are kept as
/// given.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitStringEncoder;

impl Encoder for BitStringEncoder {
    fn encode_content(
        &self, value: &Value, _: &Engine, options: EncodeOptions,
        target: &mut Vec<u8>,
    ) -> Result<bool, EncodeError> {
        let bits = match *value {
            Value::BitString(ref bits) => bits,
            _ => return Err(mismatch(self, value))
        };
        bits.check()?;
        let octets = bits.octet_slice();
        let size = match chunk_size(options, octets.len()) {
            Some(size) => size,
            None => {
                bits.append_content(false, target)?;
                return Ok(false)
            }
        };
        let mut chunks = octets.chunks(size).peekable();
        while let Some(chunk) = chunks.next() {
            let unused = match chunks.peek() {
                Some(_) => 0,
                None => bits.unused(),
            };
            append_header(target, Tag::BIT_STRING, false, chunk.len() + 1);
            target.push(unused);
            target.extend_from_slice(chunk);
        }
        Ok(true)
    }
}

/// Returns the chunk size if a string of length `len` is to be chunked.
fn chunk_size(options: EncodeOptions, len: usize) -> Option<usize> {
    let size = options.chunk_size();
    if size == 0 || len <= size {
        None
    }
    else {
        Some(size)
    }
}


//------------ CanonicalOctetStringEncoder -----------------------------------

/// Encodes OCTET STRING values in primitive form only.
///
/// The maximum chunk size of the options is ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanonicalOctetStringEncoder;

impl Encoder for CanonicalOctetStringEncoder {
    fn encode_content(
        &self, value: &Value, _: &Engine, _: EncodeOptions,
        target: &mut Vec<u8>,
    ) -> Result<bool, EncodeError> {
        match *value {
            Value::OctetString(ref octets) => {
                target.extend_from_slice(octets.as_slice());
                Ok(false)
            }
            _ => Err(mismatch(self, value))
        }
    }
}


//------------ CanonicalBitStringEncoder -------------------------------------

/// Encodes BIT STRING values in primitive form with unused bits cleared.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanonicalBitStringEncoder;

impl Encoder for CanonicalBitStringEncoder {
    fn encode_content(
        &self, value: &Value, _: &Engine, _: EncodeOptions,
        target: &mut Vec<u8>,
    ) -> Result<bool, EncodeError> {
        match *value {
            Value::BitString(ref bits) => {
                bits.append_content(true, target)?;
                Ok(false)
            }
            _ => Err(mismatch(self, value))
        }
    }
}


//============ Tests =========================================================
