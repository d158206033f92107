//! The identifier octets of an encoded value.
//!
//! This is a private module. The relevant items are re-exported by the
//! parent.

use std::fmt;
use smallvec::SmallVec;


//------------ Tag -----------------------------------------------------------

/// The tag of a value.
///
/// In ASN.1, tags are used to identify the type of a value. Tags consist of
/// one of four classes, represented by the [`Class`] enum, and a number
/// within this class.
///
/// When encoded, the tag becomes part of the identifier octets by combining
/// it with a bit indicating whether a value is primitive or constructed.
/// This combination is represented by [`Ident`].
///
/// Tags are ordered the way canonical encoding orders the components of a
/// SET: first by class in the order universal, application, context
/// specific, private, then by number.
///
/// # Limitations
///
/// We only support tag numbers that fit into a `u32`. This should be more
/// than enough in practice.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    // Field order matters for the derived ordering.
    class: Class,
    number: u32,
}

impl Tag {
    /// Creates a tag from a class and number.
    pub const fn new(class: Class, number: u32) -> Self {
        Tag { class, number }
    }

    const fn universal(number: u32) -> Self {
        Self::new(Class::Universal, number)
    }

    /// Creates a new tag in class “context specific” with the given number.
    pub const fn ctx(number: u32) -> Self {
        Self::new(Class::Context, number)
    }

    /// Creates a new tag in class “application” with the given number.
    pub const fn application(number: u32) -> Self {
        Self::new(Class::Application, number)
    }

    /// Creates a new tag in class “private” with the given number.
    pub const fn private(number: u32) -> Self {
        Self::new(Class::Private, number)
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.class
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns the ASN.1 name of a universal tag known to this crate.
    fn universal_name(self) -> Option<&'static str> {
        if self.class != Class::Universal {
            return None
        }
        Some(match self.number {
            1 => "BOOLEAN",
            2 => "INTEGER",
            3 => "BIT STRING",
            4 => "OCTET STRING",
            5 => "NULL",
            6 => "OBJECT IDENTIFIER",
            10 => "ENUMERATED",
            12 => "UTF8String",
            16 => "SEQUENCE",
            17 => "SET",
            18 => "NumericString",
            19 => "PrintableString",
            20 => "TeletexString",
            21 => "VideotexString",
            22 => "IA5String",
            23 => "UTCTime",
            24 => "GeneralizedTime",
            25 => "GraphicString",
            26 => "VisibleString",
            27 => "GeneralString",
            28 => "UniversalString",
            30 => "BMPString",
            _ => return None
        })
    }
}

/// # Universal tags used by the encoders
///
/// The numbers are assigned in X.680, clause 8.4.
impl Tag {
    pub const BOOLEAN: Self = Self::universal(1);
    pub const INTEGER: Self = Self::universal(2);
    pub const BIT_STRING: Self = Self::universal(3);
    pub const OCTET_STRING: Self = Self::universal(4);
    pub const NULL: Self = Self::universal(5);
    pub const OID: Self = Self::universal(6);
    pub const ENUMERATED: Self = Self::universal(10);
    pub const UTF8_STRING: Self = Self::universal(12);

    /// Shared by SEQUENCE and SEQUENCE OF.
    pub const SEQUENCE: Self = Self::universal(16);

    /// Shared by SET and SET OF.
    pub const SET: Self = Self::universal(17);

    pub const NUMERIC_STRING: Self = Self::universal(18);
    pub const PRINTABLE_STRING: Self = Self::universal(19);
    pub const TELETEX_STRING: Self = Self::universal(20);
    pub const VIDEOTEX_STRING: Self = Self::universal(21);
    pub const IA5_STRING: Self = Self::universal(22);
    pub const UTC_TIME: Self = Self::universal(23);
    pub const GENERALIZED_TIME: Self = Self::universal(24);
    pub const GRAPHIC_STRING: Self = Self::universal(25);
    pub const VISIBLE_STRING: Self = Self::universal(26);
    pub const GENERAL_STRING: Self = Self::universal(27);
    pub const UNIVERSAL_STRING: Self = Self::universal(28);
    pub const BMP_STRING: Self = Self::universal(30);
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(name) = self.universal_name() {
            return f.write_str(name)
        }
        let prefix = match self.class {
            Class::Universal => "UNIVERSAL ",
            Class::Application => "APPLICATION ",
            Class::Context => "",
            Class::Private => "PRIVATE ",
        };
        write!(f, "[{}{}]", prefix, self.number)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//------------ Ident ---------------------------------------------------------

/// The identifier octets of an encoded value.
///
/// This is a tag plus the bit that says whether the value is constructed.
///
/// # Encoding
///
/// The two most significant bits of the first octet hold the class and
/// the next bit is set for constructed values. Tag numbers up to 30 are
/// kept in the remaining five bits. Larger numbers set these five bits to
/// one and follow in base 128 in as few subsequent octets as possible,
/// most significant digit first, with bit 8 set in all but the last octet.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Ident {
    tag: Tag,
    constructed: bool,
}

/// Identifier octets never exceed this size for a `u32` tag number.
type Octets = SmallVec<[u8; 6]>;

impl Ident {
    /// Creates identifier octets from a tag.
    pub const fn from_tag(tag: Tag, constructed: bool) -> Self {
        Ident { tag, constructed }
    }

    /// Returns the tag for the identifier octets.
    pub const fn tag(self) -> Tag {
        self.tag
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.tag.class
    }

    /// Returns whether the identifier is for a constructed value.
    pub const fn is_constructed(self) -> bool {
        self.constructed
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.tag.number
    }

    /// Returns the encoded identifier octets.
    pub fn to_octets(self) -> Octets {
        let mut first = self.tag.class.into_u8();
        if self.constructed {
            first |= 0x20;
        }
        let number = self.tag.number;
        let mut res = Octets::new();
        if number < 0x1f {
            res.push(first | number as u8);
            return res
        }
        res.push(first | 0x1f);

        // Start at the most significant base-128 digit.
        let bits = u32::BITS - number.leading_zeros();
        let mut shift = (bits + 6) / 7 * 7;
        while shift > 7 {
            shift -= 7;
            res.push(((number >> shift) & 0x7f) as u8 | 0x80);
        }
        res.push((number & 0x7f) as u8);
        res
    }

    /// Takes the identifier octets from the beginning of a slice.
    ///
    /// Returns the identifier and the number of octets it occupies, or
    /// `None` if the slice does not start with complete identifier octets
    /// in minimal form or the tag number doesn’t fit into a `u32`.
    pub fn take_from_slice(data: &[u8]) -> Option<(Self, usize)> {
        let (&first, rest) = data.split_first()?;
        let class = Class::from_u8(first);
        let constructed = first & 0x20 != 0;
        if first & 0x1f != 0x1f {
            let tag = Tag::new(class, u32::from(first & 0x1f));
            return Some((Self::from_tag(tag, constructed), 1))
        }
        if rest.first() == Some(&0x80) {
            return None
        }
        let mut number = 0u32;
        for (idx, &octet) in rest.iter().enumerate() {
            if number > u32::MAX >> 7 {
                return None
            }
            number = (number << 7) | u32::from(octet & 0x7f);
            if octet & 0x80 == 0 {
                let tag = Tag::new(class, number);
                return Some((Self::from_tag(tag, constructed), idx + 2))
            }
        }
        None
    }

    /// Returns the number of identifier octets.
    pub fn encoded_len(self) -> usize {
        self.to_octets().len()
    }

    /// Appends the identifier octets to the end of `target`.
    pub fn append_encoded(self, target: &mut Vec<u8>) {
        target.extend_from_slice(&self.to_octets())
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let form = if self.constructed { "constructed" } else { "primitive" };
        write!(f, "Ident({}, {})", self.tag, form)
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
///
/// The variants are declared in canonical order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    /// Returns the class encoded in the top two bits of an octet.
    const fn from_u8(octet: u8) -> Self {
        match octet >> 6 {
            0 => Class::Universal,
            1 => Class::Application,
            2 => Class::Context,
            _ => Class::Private,
        }
    }

    const fn into_u8(self) -> u8 {
        (self as u8) << 6
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn octets(tag: Tag, constructed: bool) -> Vec<u8> {
        Ident::from_tag(tag, constructed).to_octets().to_vec()
    }

    #[test]
    fn short_and_long_form() {
        assert_eq!(octets(Tag::OCTET_STRING, false), b"\x04");
        assert_eq!(octets(Tag::SET, true), b"\x31");
        assert_eq!(octets(Tag::ctx(30), true), b"\xbe");
        assert_eq!(octets(Tag::ctx(31), false), b"\x9f\x1f");
        assert_eq!(octets(Tag::application(0x80), false), b"\x5f\x81\x00");
        assert_eq!(octets(Tag::private(0x3fff), true), b"\xff\xff\x7f");
        assert_eq!(
            octets(Tag::ctx(u32::MAX), false), b"\x9f\x8f\xff\xff\xff\x7f"
        );
        assert_eq!(Ident::from_tag(Tag::ctx(0x4000), false).encoded_len(), 4);
    }

    #[test]
    fn round_trip() {
        for number in [0, 1, 30, 31, 127, 128, 0x3fff, 0x4000, u32::MAX] {
            for class in [
                Class::Universal, Class::Application, Class::Context,
                Class::Private
            ] {
                let ident = Ident::from_tag(Tag::new(class, number), true);
                let mut data = Vec::new();
                ident.append_encoded(&mut data);
                let len = data.len();
                data.push(0);
                assert_eq!(Ident::take_from_slice(&data), Some((ident, len)));
            }
        }
    }

    #[test]
    fn malformed() {
        assert_eq!(Ident::take_from_slice(b""), None);
        assert_eq!(Ident::take_from_slice(b"\x1f"), None);
        assert_eq!(Ident::take_from_slice(b"\x1f\x81"), None);
        assert_eq!(Ident::take_from_slice(b"\x1f\x80\x01"), None);
        assert_eq!(
            Ident::take_from_slice(b"\x1f\x90\x80\x80\x80\x00"), None
        );
    }

    #[test]
    fn canonical_order() {
        assert!(Tag::BOOLEAN < Tag::SEQUENCE);
        assert!(Tag::SEQUENCE < Tag::IA5_STRING);
        assert!(Tag::BMP_STRING < Tag::application(0));
        assert!(Tag::application(40) < Tag::ctx(0));
        assert!(Tag::ctx(2) < Tag::ctx(31));
        assert!(Tag::ctx(400) < Tag::private(0));
    }

    #[test]
    fn display() {
        assert_eq!(Tag::SET.to_string(), "SET");
        assert_eq!(Tag::ctx(3).to_string(), "[3]");
        assert_eq!(Tag::private(3).to_string(), "[PRIVATE 3]");
        assert_eq!(Tag::new(Class::Universal, 9).to_string(), "[UNIVERSAL 9]");
    }
}
