//! The length octets.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::fmt;


//------------ Length --------------------------------------------------------

/// The definite length of some encoded octets.
///
/// # Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the length. Thus, if the first octet is less than
/// 128, it provides the length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. Those following octets give the big-endian encoding of the
/// length of the content octets.
///
/// A first octet of exactly 128 would signal the indefinite form. Since
/// canonical encoding only ever uses the definite form, this type cannot
/// represent it. The long form is always produced with the minimum number
/// of octets, i.e., without leading zero octets.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Length(usize);

impl Length {
    const LEN: usize = std::mem::size_of::<usize>();

    /// Creates a new length value.
    pub const fn new(len: usize) -> Self {
        Length(len)
    }

    /// Returns the length as a `usize`.
    pub const fn to_usize(self) -> usize {
        self.0
    }

    /// Returns the number of length octets needed to encode the value.
    pub fn encoded_len(self) -> usize {
        if self.0 > 0x7F {
            Self::LEN - self.encoded_start_idx() + 1
        }
        else {
            1
        }
    }

    /// Appends the length octets to the end of `target`.
    pub fn append_encoded(self, target: &mut Vec<u8>) {
        if self.0 > 0x7F {
            let idx = self.encoded_start_idx();
            debug_assert!(idx < Self::LEN);

            // LEN will never be greater than 126 bytes. Also, `idx` won’t be
            // greater than LEN, so the subtraction here is fine.
            target.push(((Self::LEN - idx) | 0x80) as u8);
            target.extend_from_slice(&self.0.to_be_bytes()[idx..])
        }
        else {
            target.push(self.0 as u8)
        }
    }

    /// Returns the index of the first non-zero octet of the length.
    fn encoded_start_idx(self) -> usize {
        (self.0.leading_zeros() / 8) as usize
    }
}


//--- From

impl From<usize> for Length {
    fn from(len: usize) -> Self {
        Length(len)
    }
}


//--- Display

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode() {
        fn step<const N: usize>(l: usize, res: &[u8; N]) {
            let l = Length::new(l);
            let mut vec = Vec::new();
            l.append_encoded(&mut vec);
            assert_eq!(
                vec.as_slice(), res.as_ref(),
                "append failed for {l:?}: {vec:?}"
            );
            assert_eq!(l.encoded_len(), N);
        }

        step(0, b"\x00");
        step(0x12, b"\x12");
        step(0x7f, b"\x7f");
        step(0x80, b"\x81\x80");
        step(0xff, b"\x81\xff");
        step(0x100, b"\x82\x01\x00");
        step(0xdead, b"\x82\xde\xad");
        step(0x01_0000, b"\x83\x01\x00\x00");
    }
}
