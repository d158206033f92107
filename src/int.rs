//! Encoded integers.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::fmt;
use bytes::Bytes;


//------------ Integer -------------------------------------------------------

/// A signed integer of arbitrary size.
///
/// As integers are variable length, this type is just a simple wrapper
/// atop a `Bytes` value containing the content octets. These are the
/// big-endian, two’s complement octets of the value using the smallest
/// possible number of octets: the first nine bits of a multi-octet value
/// are never all the same. All constructors normalise their input into
/// this form, so two integers compare equal exactly when they have the
/// same value and their content octets can be used directly in the
/// encoding.
///
/// # Encoding
///
/// An INTEGER is encoded as a primitive value with the content octets
/// providing the two’s complement byte sequence of that integer. Thus, the
/// most-significant bit of the first octet serves as the sign bit. The
/// ENUMERATED type is encoded identically with a different tag.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Integer(Bytes);

impl Integer {
    /// Creates an integer from big-endian two’s complement octets.
    ///
    /// Redundant leading octets are dropped. An empty slice is zero.
    pub fn from_signed_be_bytes(octets: &[u8]) -> Self {
        Integer(Bytes::copy_from_slice(Self::trim(octets)))
    }

    /// Creates an integer from big-endian octets of a unsigned value.
    ///
    /// If the most significant bit of the value is set, a leading zero
    /// octet is added to keep the value positive.
    pub fn from_unsigned_be_bytes(octets: &[u8]) -> Self {
        let start = octets.iter().position(|&x| x != 0).unwrap_or(
            octets.len()
        );
        let octets = &octets[start..];
        match octets.first() {
            None => Integer(Bytes::from_static(b"\0")),
            Some(&first) if first & 0x80 != 0 => {
                let mut res = Vec::with_capacity(octets.len() + 1);
                res.push(0);
                res.extend_from_slice(octets);
                Integer(res.into())
            }
            Some(_) => Integer(Bytes::copy_from_slice(octets))
        }
    }

    /// Returns the content octets of the integer.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns whether the integer is negative.
    pub fn is_negative(&self) -> bool {
        self.0.first().map(|x| x & 0x80 != 0).unwrap_or(false)
    }

    /// Converts the integer into an `i128` if it fits.
    pub fn to_i128(&self) -> Option<i128> {
        if self.0.len() > 16 {
            return None
        }
        let fill = if self.is_negative() { 0xFF } else { 0 };
        let mut buf = [fill; 16];
        buf[16 - self.0.len()..].copy_from_slice(self.0.as_ref());
        Some(i128::from_be_bytes(buf))
    }

    /// Returns the minimal slice of a two’s complement representation.
    fn trim(octets: &[u8]) -> &[u8] {
        if octets.is_empty() {
            return b"\0"
        }
        let mut start = 0;
        while start + 1 < octets.len() {
            match (octets[start], octets[start + 1] & 0x80 != 0) {
                (0, false) | (0xFF, true) => start += 1,
                _ => break
            }
        }
        &octets[start..]
    }
}


//--- From

macro_rules! signed_from {
    ( $( $type:ident ),* ) => {
        $(
            impl From<$type> for Integer {
                fn from(val: $type) -> Self {
                    Self::from_signed_be_bytes(&val.to_be_bytes())
                }
            }
        )*
    }
}

macro_rules! unsigned_from {
    ( $( $type:ident ),* ) => {
        $(
            impl From<$type> for Integer {
                fn from(val: $type) -> Self {
                    Self::from_unsigned_be_bytes(&val.to_be_bytes())
                }
            }
        )*
    }
}

signed_from!(i8, i16, i32, i64, i128);
unsigned_from!(u8, u16, u32, u64, u128);


//--- Display and Debug

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_i128() {
            Some(val) => val.fmt(f),
            None => {
                f.write_str("0x")?;
                for ch in self.0.as_ref() {
                    write!(f, "{:02x}", ch)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Integer({})", self)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn minimal_content() {
        assert_eq!(Integer::from(0i32).as_slice(), b"\x00");
        assert_eq!(Integer::from(123i32).as_slice(), b"\x7b");
        assert_eq!(Integer::from(127u8).as_slice(), b"\x7f");
        assert_eq!(Integer::from(128u8).as_slice(), b"\x00\x80");
        assert_eq!(Integer::from(256i64).as_slice(), b"\x01\x00");
        assert_eq!(Integer::from(-1i8).as_slice(), b"\xff");
        assert_eq!(Integer::from(-128i64).as_slice(), b"\x80");
        assert_eq!(Integer::from(-129i16).as_slice(), b"\xff\x7f");
        assert_eq!(Integer::from(u64::MAX).as_slice(),
            b"\x00\xff\xff\xff\xff\xff\xff\xff\xff"
        );
        assert_eq!(Integer::from(i128::MIN).as_slice().len(), 16);
    }

    #[test]
    fn normalise_input() {
        assert_eq!(
            Integer::from_signed_be_bytes(b"\x00\x00\x7b"),
            Integer::from(123u32)
        );
        assert_eq!(
            Integer::from_signed_be_bytes(b"\xff\xff\x80"),
            Integer::from(-128i32)
        );
        assert_eq!(Integer::from_signed_be_bytes(b""), Integer::from(0u8));
        assert_eq!(
            Integer::from_unsigned_be_bytes(b"\x00\x00"),
            Integer::from(0u8)
        );
        assert_eq!(
            Integer::from_unsigned_be_bytes(b"\x00\xff"),
            Integer::from(255u32)
        );
    }

    #[test]
    fn to_i128() {
        for val in [0i128, 1, -1, 127, 128, -129, i64::MIN as i128, i128::MAX] {
            assert_eq!(Integer::from(val).to_i128(), Some(val));
        }
        assert_eq!(Integer::from(u128::MAX).to_i128(), None);
        assert_eq!(Integer::from(33u8).to_string(), "33");
    }
}
