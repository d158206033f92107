//! Bit strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::error::EncodeError;


//------------ BitString -----------------------------------------------------

/// A bit string value.
///
/// Bit strings are a sequence of bits. Unlike
/// [`OctetString`][crate::string::OctetString]s, they do not need to contain
/// a multiple of eight bits.
///
/// You can create a bit string either from its octets and the number of
/// unused bits in the last octet via [`new`][Self::new] or from a sequence
/// of individual bits via [`from_bits`][Self::from_bits].
///
/// # Encoding
///
/// If encoded as a primitive value, the first octet of the content
/// contains the number of unused bits in the last octet and the following
/// octets contain the bits with the first bit in the most significant bit
/// of the octet.
///
/// In the constructed encoding, the bit string is represented as a sequence
/// of primitively encoded bit strings. Only the last of these may have a
/// non-zero number of unused bits.
///
/// Canonical encoding only allows the primitive form and requires the
/// unused bits of the last octet to be zero.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct BitString {
    /// The number of unused bits in the last byte.
    unused: u8,

    /// The bytes of the bit string.
    bits: Bytes,
}

impl BitString {
    /// Creates a new bit string.
    ///
    /// The value isn’t checked here. An unused count above 7 or a non-zero
    /// count with empty bits will be rejected upon encoding.
    pub fn new(unused: u8, bits: Bytes) -> Self {
        Self { unused, bits }
    }

    /// Creates a bit string from a sequence of bits.
    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Self {
        let mut octets = Vec::new();
        let mut len = 0usize;
        for bit in bits {
            if len % 8 == 0 {
                octets.push(0);
            }
            if bit {
                if let Some(last) = octets.last_mut() {
                    *last |= 0x80 >> (len % 8);
                }
            }
            len += 1;
        }
        let unused = ((8 - len % 8) % 8) as u8;
        Self::new(unused, octets.into())
    }

    /// Returns the value of the given bit.
    pub fn bit(&self, bit: usize) -> bool {
        let idx = bit >> 3;
        if self.bits.len() <= idx {
            return false
        }
        let bit = 7 - (bit as u8 & 7);
        if idx + 1 == self.bits.len() && self.unused > bit {
            return false
        }
        self.bits[idx] & (1 << bit) != 0
    }

    /// Returns the number of bits in the bit string.
    pub fn bit_len(&self) -> usize {
        (self.bits.len() << 3).saturating_sub(usize::from(self.unused))
    }

    /// Returns the number of unused bits in the last octet.
    pub fn unused(&self) -> u8 {
        self.unused
    }

    /// Returns the octets of the bit string.
    pub fn octet_slice(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Checks that the bit string can be encoded at all.
    pub fn check(&self) -> Result<(), EncodeError> {
        if self.unused > 7 {
            xerr!(return Err(EncodeError::invalid_value(
                "more than seven unused bits in bit string"
            )))
        }
        if self.bits.is_empty() && self.unused != 0 {
            xerr!(return Err(EncodeError::invalid_value(
                "unused bits in empty bit string"
            )))
        }
        Ok(())
    }

    /// Appends the content octets of a primitive encoding to `target`.
    ///
    /// If `clear_unused` is `true`, the unused bits of the last octet are
    /// set to zero, otherwise they are copied verbatim.
    pub fn append_content(
        &self, clear_unused: bool, target: &mut Vec<u8>
    ) -> Result<(), EncodeError> {
        self.check()?;
        target.push(self.unused);
        match self.bits.split_last() {
            Some((&last, head)) if clear_unused => {
                target.extend_from_slice(head);
                target.push(last & (0xFFu8 << self.unused));
            }
            _ => target.extend_from_slice(self.bits.as_ref())
        }
        Ok(())
    }
}


//============ Tests =========================================================
