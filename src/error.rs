//! Error handling.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::{error, fmt};
use std::borrow::Cow;


//------------ ErrorKind -----------------------------------------------------

/// The kind of an encoding error.
///
/// All errors are terminal. An encoder never returns partial output, so
/// the kind is all a caller needs to decide what went wrong.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// No encoder is registered for the value’s tag or declared type.
    UnknownType,

    /// A mandatory component of a structured value is absent.
    MissingComponent,

    /// Indefinite length output was requested.
    IndefiniteLengthNotAllowed,

    /// A value is not well-formed enough to produce its content octets.
    InvalidValue,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            ErrorKind::UnknownType => "unknown type",
            ErrorKind::MissingComponent => "missing component",
            ErrorKind::IndefiniteLengthNotAllowed => {
                "indefinite length not allowed"
            }
            ErrorKind::InvalidValue => "invalid value",
        })
    }
}


//------------ EncodeError ---------------------------------------------------

/// An error happened while encoding a value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodeError {
    /// The kind of error.
    kind: ErrorKind,

    /// Some details for a human reader.
    msg: Cow<'static, str>,
}

impl EncodeError {
    /// Creates a new error from a kind and a message.
    pub fn new(kind: ErrorKind, msg: impl Into<Cow<'static, str>>) -> Self {
        EncodeError { kind, msg: msg.into() }
    }

    /// Creates an unknown type error.
    pub fn unknown_type(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::UnknownType, msg)
    }

    /// Creates a missing component error.
    pub fn missing_component(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::MissingComponent, msg)
    }

    /// Creates the error for a request of indefinite length encoding.
    pub fn indefinite_length() -> Self {
        Self::new(
            ErrorKind::IndefiniteLengthNotAllowed,
            "canonical encoding requires definite length"
        )
    }

    /// Creates an invalid value error.
    pub fn invalid_value(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidValue, msg)
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message of the error.
    pub fn message(&self) -> &str {
        self.msg.as_ref()
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)
    }
}

impl error::Error for EncodeError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            EncodeError::missing_component("field ‘age’").to_string(),
            "missing component: field ‘age’"
        );
        assert_eq!(
            EncodeError::indefinite_length().kind(),
            ErrorKind::IndefiniteLengthNotAllowed
        );
    }
}
