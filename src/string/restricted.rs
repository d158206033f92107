//! Restricted character strings and time strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{fmt, str};
use std::borrow::Cow;
use bytes::Bytes;
use crate::error::EncodeError;
use crate::ident::Tag;


//------------ StringKind ----------------------------------------------------

/// The kind of a character string.
///
/// Each kind has its own universal tag and defines the octets that may
/// appear in its content. The two time types are strings with a fixed
/// syntax and are included here because they are encoded just like the
/// character strings.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StringKind {
    Utf8,
    Numeric,
    Printable,
    Teletex,
    Videotex,
    Ia5,
    Graphic,
    Visible,
    General,
    Universal,
    Bmp,
    UtcTime,
    GeneralizedTime,
}

impl StringKind {
    /// All string kinds.
    pub const ALL: [StringKind; 13] = [
        StringKind::Utf8, StringKind::Numeric, StringKind::Printable,
        StringKind::Teletex, StringKind::Videotex, StringKind::Ia5,
        StringKind::Graphic, StringKind::Visible, StringKind::General,
        StringKind::Universal, StringKind::Bmp, StringKind::UtcTime,
        StringKind::GeneralizedTime,
    ];

    /// Returns the natural tag of the kind.
    pub const fn tag(self) -> Tag {
        match self {
            StringKind::Utf8 => Tag::UTF8_STRING,
            StringKind::Numeric => Tag::NUMERIC_STRING,
            StringKind::Printable => Tag::PRINTABLE_STRING,
            StringKind::Teletex => Tag::TELETEX_STRING,
            StringKind::Videotex => Tag::VIDEOTEX_STRING,
            StringKind::Ia5 => Tag::IA5_STRING,
            StringKind::Graphic => Tag::GRAPHIC_STRING,
            StringKind::Visible => Tag::VISIBLE_STRING,
            StringKind::General => Tag::GENERAL_STRING,
            StringKind::Universal => Tag::UNIVERSAL_STRING,
            StringKind::Bmp => Tag::BMP_STRING,
            StringKind::UtcTime => Tag::UTC_TIME,
            StringKind::GeneralizedTime => Tag::GENERALIZED_TIME,
        }
    }

    /// Returns whether the kind is one of the two time types.
    pub const fn is_time(self) -> bool {
        matches!(self, StringKind::UtcTime | StringKind::GeneralizedTime)
    }

    /// Checks the content octets against the character set.
    fn check(self, content: &[u8]) -> Result<(), EncodeError> {
        let ok = match self {
            StringKind::Utf8 => str::from_utf8(content).is_ok(),
            StringKind::Numeric => {
                content.iter().all(|&ch| ch == b' ' || ch.is_ascii_digit())
            }
            StringKind::Printable => {
                content.iter().all(|&ch| is_printable(ch))
            }
            StringKind::Ia5 => content.is_ascii(),
            StringKind::Visible => {
                content.iter().all(|&ch| (0x20..0x7F).contains(&ch))
            }
            StringKind::Bmp => content.len() % 2 == 0,
            StringKind::Universal => content.len() % 4 == 0,
            StringKind::Teletex | StringKind::Videotex
            | StringKind::Graphic | StringKind::General => true,
            StringKind::UtcTime | StringKind::GeneralizedTime => {
                content.is_ascii()
            }
        };
        if ok {
            Ok(())
        }
        else {
            xerr!(Err(EncodeError::invalid_value(format!(
                "illegal content for {}", self.tag()
            ))))
        }
    }
}

/// Returns whether an octet is part of the PrintableString character set.
fn is_printable(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch,
        b' ' | b'\'' | b'(' | b')' | b'+' | b',' | b'-' | b'.' | b'/'
        | b':' | b'=' | b'?'
    )
}


//------------ CharString ----------------------------------------------------

/// A character string of one of the restricted character string types.
///
/// The value keeps the content octets as given. Checking them against the
/// character set of the kind happens when the content is produced for
/// encoding.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct CharString {
    kind: StringKind,
    content: Bytes,
}

impl CharString {
    /// Creates a new character string from its kind and content octets.
    pub fn new(kind: StringKind, content: Bytes) -> Self {
        CharString { kind, content }
    }

    /// Creates a UTF8String.
    pub fn utf8(s: &str) -> Self {
        Self::new(StringKind::Utf8, Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Creates a PrintableString.
    pub fn printable(s: &str) -> Self {
        Self::new(StringKind::Printable, Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Creates an IA5String.
    pub fn ia5(s: &str) -> Self {
        Self::new(StringKind::Ia5, Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Creates a UTCTime value from its textual representation.
    pub fn utc_time(s: &str) -> Self {
        Self::new(StringKind::UtcTime, Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Creates a GeneralizedTime value from its textual representation.
    pub fn generalized_time(s: &str) -> Self {
        Self::new(
            StringKind::GeneralizedTime, Bytes::copy_from_slice(s.as_bytes())
        )
    }

    /// Creates a BMPString from a string.
    pub fn bmp(s: &str) -> Self {
        let content: Vec<u8> = s.encode_utf16().flat_map(|unit| {
            unit.to_be_bytes()
        }).collect();
        Self::new(StringKind::Bmp, content.into())
    }

    /// Returns the kind of the string.
    pub fn kind(&self) -> StringKind {
        self.kind
    }

    /// Returns the content octets as given.
    pub fn as_slice(&self) -> &[u8] {
        self.content.as_ref()
    }

    /// Returns the content octets to be encoded.
    ///
    /// Checks the content against the character set of the kind. For the
    /// time types, the content is brought into canonical form.
    pub fn canonical_content(&self) -> Result<Cow<[u8]>, EncodeError> {
        self.kind.check(self.content.as_ref())?;
        if self.kind.is_time() {
            canonical_time(self.kind, self.content.as_ref())
        }
        else {
            Ok(Cow::Borrowed(self.content.as_ref()))
        }
    }
}

impl fmt::Debug for CharString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "CharString({}, {:?})",
            self.kind.tag(), String::from_utf8_lossy(self.content.as_ref())
        )
    }
}


//------------ canonical_time ------------------------------------------------

/// Brings the content of a time value into canonical form.
///
/// The time must be in UTC, i.e., end in `Z` without an offset, and must
/// include the seconds. UTCTime has no fractional seconds. GeneralizedTime
/// may only use a dot as the decimal separator. Trailing zeros of
/// fractional seconds are dropped, as is a dot without any digits left
/// behind it.
fn canonical_time(
    kind: StringKind, content: &[u8]
) -> Result<Cow<[u8]>, EncodeError> {
    let body = match content.split_last() {
        Some((b'Z', body)) => body,
        _ => {
            xerr!(return Err(EncodeError::invalid_value(
                "time value must end in ‘Z’"
            )))
        }
    };
    if body.iter().any(|&ch| ch == b'+' || ch == b'-') {
        xerr!(return Err(EncodeError::invalid_value(
            "time value must be in UTC"
        )))
    }
    if body.contains(&b',') {
        xerr!(return Err(EncodeError::invalid_value(
            "comma in fractional seconds not allowed"
        )))
    }
    let (int_part, fraction) = match body.iter().position(|&ch| ch == b'.') {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None)
    };
    let digits = match kind {
        StringKind::UtcTime => 12,
        _ => 14,
    };
    if int_part.len() != digits || !int_part.iter().all(u8::is_ascii_digit) {
        xerr!(return Err(EncodeError::invalid_value(
            "malformed time value"
        )))
    }
    let fraction = match fraction {
        Some(_) if kind == StringKind::UtcTime => {
            xerr!(return Err(EncodeError::invalid_value(
                "fractional seconds not allowed in UTCTime"
            )))
        }
        Some(fraction) => fraction,
        None => return Ok(Cow::Borrowed(content))
    };
    if !fraction.iter().all(u8::is_ascii_digit) {
        xerr!(return Err(EncodeError::invalid_value(
            "malformed fractional seconds"
        )))
    }
    let keep = fraction.iter().rposition(|&ch| ch != b'0').map(|pos| pos + 1);
    if keep == Some(fraction.len()) {
        return Ok(Cow::Borrowed(content))
    }
    let mut res = Vec::with_capacity(content.len());
    res.extend_from_slice(int_part);
    if let Some(keep) = keep {
        res.push(b'.');
        res.extend_from_slice(&fraction[..keep]);
    }
    res.push(b'Z');
    Ok(Cow::Owned(res))
}


//============ Tests =========================================================
