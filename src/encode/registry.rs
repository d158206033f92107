//! The encoder registry.
//!
//! This is an internal module. The relevant items are re-exported by the
//! parent.

use std::fmt;
use std::collections::HashMap;
use std::sync::Arc;
use crate::error::EncodeError;
use crate::ident::Tag;
use crate::string::StringKind;
use crate::value::{Kind, Value};
use super::engine::{EncodeOptions, Engine};
use super::{primitive, structured};


//------------ Encoder -------------------------------------------------------

/// A type that knows how to produce the content octets of some values.
///
/// An encoder is handed a value of a kind it has been registered for. It
/// appends the content octets of that value to `target` and returns
/// whether they form a constructed value. Encoders of structured values
/// use `engine` to encode their components.
///
/// The identifier and length octets are added by the engine afterwards.
pub trait Encoder: fmt::Debug + Send + Sync {
    /// Appends the content octets of `value` to `target`.
    fn encode_content(
        &self,
        value: &Value,
        engine: &Engine,
        options: EncodeOptions,
        target: &mut Vec<u8>,
    ) -> Result<bool, EncodeError>;
}

/// Returns the error for a value handed to an encoder of the wrong kind.
pub(crate) fn mismatch(encoder: &dyn Encoder, value: &Value) -> EncodeError {
    xerr!(EncodeError::unknown_type(format!(
        "{:?} cannot encode {:?} values", encoder, value.kind()
    )))
}


//------------ Key -----------------------------------------------------------

/// The key an encoder is registered under.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Key {
    /// All values with this natural tag.
    Tag(Tag),

    /// All values of this declared type.
    Kind(Kind),
}


//------------ Registry ------------------------------------------------------

/// The mapping from values to the encoders responsible for them.
///
/// A registry is built once through a [`RegistryBuilder`] and is immutable
/// afterwards.
///
/// Encoders are found primarily via the natural tag of a value’s type.
/// Some types share the same tag: SEQUENCE and SEQUENCE OF as well as SET
/// and SET OF. For these, an encoder registered for the declared type takes
/// precedence.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    tags: HashMap<Tag, Arc<dyn Encoder>>,
    kinds: HashMap<Kind, Arc<dyn Encoder>>,
}

impl Registry {
    /// Returns a builder for an empty registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Returns a builder for the base table.
    ///
    /// The base table contains an encoder for every kind. Its string
    /// encoders break values into chunks if asked to and its set encoder
    /// keeps the order of components as given.
    pub(crate) fn basic() -> RegistryBuilder {
        let integer = Arc::new(primitive::IntegerEncoder);
        let strings = Arc::new(primitive::CharStringEncoder);
        let sequence = Arc::new(structured::SequenceEncoder);
        let set = Arc::new(structured::SetEncoder);

        let mut res = Self::builder()
            .register(Key::Tag(Tag::BOOLEAN), primitive::BooleanEncoder)
            .register_arc(Key::Tag(Tag::INTEGER), integer.clone())
            .register_arc(Key::Tag(Tag::ENUMERATED), integer)
            .register(Key::Tag(Tag::NULL), primitive::NullEncoder)
            .register(Key::Tag(Tag::OID), primitive::OidEncoder)
            .register(
                Key::Tag(Tag::BIT_STRING), primitive::BitStringEncoder
            )
            .register(
                Key::Tag(Tag::OCTET_STRING), primitive::OctetStringEncoder
            )
            .register_arc(Key::Kind(Kind::Sequence), sequence.clone())
            .register_arc(Key::Kind(Kind::SequenceOf), sequence)
            .register_arc(Key::Kind(Kind::Set), set.clone())
            .register_arc(Key::Kind(Kind::SetOf), set);
        for kind in StringKind::ALL {
            res = res.register_arc(Key::Tag(kind.tag()), strings.clone());
        }
        res
    }

    /// Returns the encoder for values of the given kind.
    pub fn lookup(&self, kind: Kind) -> Result<&dyn Encoder, EncodeError> {
        let by_tag = || kind.tag().and_then(|tag| self.tags.get(&tag));
        let by_kind = || self.kinds.get(&kind);
        let found = if kind.shares_tag() {
            by_kind().or_else(by_tag)
        }
        else {
            by_tag().or_else(by_kind)
        };
        match found {
            Some(encoder) => Ok(encoder.as_ref()),
            None => {
                xerr!(Err(EncodeError::unknown_type(format!(
                    "no encoder registered for {:?}", kind
                ))))
            }
        }
    }
}


//------------ RegistryBuilder -----------------------------------------------

/// A builder for a registry.
///
/// Registering an encoder for a key that already has one replaces the
/// earlier encoder. This is how the canonical encoding rules are layered
/// over the base table.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    /// Registers an encoder for a key.
    pub fn register(self, key: Key, encoder: impl Encoder + 'static) -> Self {
        self.register_arc(key, Arc::new(encoder))
    }

    /// Registers a shared encoder for a key.
    pub fn register_arc(mut self, key: Key, encoder: Arc<dyn Encoder>) -> Self {
        let replaced = match key {
            Key::Tag(tag) => {
                self.registry.tags.insert(tag, encoder).is_some()
            }
            Key::Kind(kind) => {
                self.registry.kinds.insert(kind, encoder).is_some()
            }
        };
        if replaced {
            log::trace!("replaced encoder for {:?}", key);
        }
        self
    }

    /// Finishes building and returns the registry.
    pub fn finish(self) -> Registry {
        self.registry
    }
}


//============ Tests =========================================================
