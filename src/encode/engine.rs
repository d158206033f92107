//! The recursive encoding engine.
//!
//! This is an internal module. The relevant items are re-exported by the
//! parent.

use std::sync::OnceLock;
use crate::error::EncodeError;
use crate::ident::{Ident, Tag};
use crate::length::Length;
use crate::value::{TagMode, Value};
use super::policy::Policy;
use super::registry::Registry;


//------------ EncodeOptions -------------------------------------------------

/// Options for a single encoding run.
///
/// The options are passed down unchanged to every encoder involved. Which
/// of them are honoured depends on the policy of the engine: the canonical
/// encoders ignore the chunk size.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EncodeOptions {
    definite_length: bool,
    max_chunk_size: usize,
}

impl EncodeOptions {
    /// Returns the default options.
    ///
    /// These ask for definite length encoding without chunking.
    pub const fn new() -> Self {
        EncodeOptions {
            definite_length: true,
            max_chunk_size: 0,
        }
    }

    /// Sets whether definite length encoding is requested.
    ///
    /// Asking for indefinite length encoding makes every encoding attempt
    /// fail.
    pub const fn definite_length(mut self, definite: bool) -> Self {
        self.definite_length = definite;
        self
    }

    /// Sets the maximum size of chunks for string values.
    ///
    /// A value of zero disables chunking.
    pub const fn max_chunk_size(mut self, size: usize) -> Self {
        self.max_chunk_size = size;
        self
    }

    /// Returns whether definite length encoding is requested.
    pub const fn is_definite_length(self) -> bool {
        self.definite_length
    }

    /// Returns the maximum chunk size.
    pub const fn chunk_size(self) -> usize {
        self.max_chunk_size
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::new()
    }
}


//------------ Engine --------------------------------------------------------

/// An encoding engine.
///
/// The engine walks a value tree and produces its encoding. For every value
/// it finds the responsible encoder in its registry, lets it produce the
/// content octets, and adds identifier and length octets. CHOICE values,
/// tagged values, and raw values are dealt with by the engine itself.
///
/// An engine is immutable once created and can be shared freely between
/// threads. The engine used by the [`encode`] function is available via
/// [`Engine::global`].
#[derive(Clone, Debug)]
pub struct Engine {
    registry: Registry,
    policy: Policy,
}

impl Engine {
    /// Creates an engine for the given policy.
    pub fn new(policy: Policy) -> Self {
        Engine {
            registry: policy.apply(Registry::basic()).finish(),
            policy,
        }
    }

    /// Creates an engine with a custom registry.
    ///
    /// The policy’s encoder overrides are not applied to the registry.
    pub fn with_registry(registry: Registry, policy: Policy) -> Self {
        Engine { registry, policy }
    }

    /// Returns the process-wide engine for the Distinguished Encoding Rules.
    ///
    /// The engine is created upon first use.
    pub fn global() -> &'static Self {
        static ENGINE: OnceLock<Engine> = OnceLock::new();
        ENGINE.get_or_init(|| Engine::new(Policy::DISTINGUISHED))
    }

    /// Returns the registry of the engine.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the policy of the engine.
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Encodes a value.
    ///
    /// Returns the complete encoding or an error. There is no partial
    /// output.
    pub fn encode(
        &self, value: &Value, options: EncodeOptions
    ) -> Result<Vec<u8>, EncodeError> {
        if !options.is_definite_length() {
            xerr!(return Err(EncodeError::indefinite_length()))
        }
        log::trace!("encoding {:?} value", value.kind());
        self.encode_to_vec(value, options)
    }

    /// Encodes a value into a new vec without checking the options.
    pub fn encode_to_vec(
        &self, value: &Value, options: EncodeOptions
    ) -> Result<Vec<u8>, EncodeError> {
        let mut res = Vec::new();
        self.encode_value(value, options, &mut res)?;
        Ok(res)
    }

    /// Appends the encoding of a value to `target`.
    ///
    /// This is the recursion step used by the encoders of structured
    /// values. If an error is returned, `target` may contain a partial
    /// encoding and must be discarded.
    pub fn encode_value(
        &self, value: &Value, options: EncodeOptions, target: &mut Vec<u8>,
    ) -> Result<(), EncodeError> {
        match *value {
            Value::Choice(ref choice) => {
                match choice.selected_value() {
                    Some(inner) => self.encode_value(inner, options, target),
                    None => {
                        xerr!(Err(EncodeError::missing_component(
                            "CHOICE without a selected alternative"
                        )))
                    }
                }
            }
            Value::Tagged(ref tagged) => {
                match tagged.mode() {
                    TagMode::Explicit => {
                        let content = self.encode_to_vec(
                            tagged.inner(), options
                        )?;
                        append_header(
                            target, tagged.tag(), true, content.len()
                        );
                        target.extend_from_slice(&content);
                        Ok(())
                    }
                    TagMode::Implicit => {
                        let start = target.len();
                        self.encode_value(tagged.inner(), options, target)?;
                        retag(target, start, tagged.tag())
                    }
                }
            }
            Value::Raw(ref raw) => {
                if Ident::take_from_slice(raw.as_ref()).is_none() {
                    xerr!(return Err(EncodeError::invalid_value(
                        "raw value without identifier octets"
                    )))
                }
                target.extend_from_slice(raw.as_ref());
                Ok(())
            }
            _ => self.encode_natural(value, options, target)
        }
    }

    /// Encodes a value with its natural tag via the registry.
    fn encode_natural(
        &self, value: &Value, options: EncodeOptions, target: &mut Vec<u8>,
    ) -> Result<(), EncodeError> {
        let (kind, tag) = match value.kind() {
            Some(kind) => match kind.tag() {
                Some(tag) => (kind, tag),
                None => {
                    xerr!(return Err(EncodeError::unknown_type(format!(
                        "{:?} has no tag", kind
                    ))))
                }
            },
            None => {
                xerr!(return Err(EncodeError::unknown_type(
                    "value without a type"
                )))
            }
        };
        let encoder = self.registry.lookup(kind)?;
        let mut content = Vec::new();
        let constructed = encoder.encode_content(
            value, self, options, &mut content
        )?;
        append_header(target, tag, constructed, content.len());
        target.extend_from_slice(&content);
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Policy::default())
    }
}


//------------ encode --------------------------------------------------------

/// Encodes a value using the Distinguished Encoding Rules.
///
/// This uses the engine returned by [`Engine::global`].
pub fn encode(
    value: &Value, options: EncodeOptions
) -> Result<Vec<u8>, EncodeError> {
    Engine::global().encode(value, options)
}


//------------ Helper Functions ----------------------------------------------

/// Appends the identifier and length octets of a value to `target`.
pub(crate) fn append_header(
    target: &mut Vec<u8>, tag: Tag, constructed: bool, len: usize
) {
    Ident::from_tag(tag, constructed).append_encoded(target);
    Length::new(len).append_encoded(target);
}

/// Replaces the tag of the value encoded at `start` in `target`.
///
/// The constructed bit of the original identifier is kept.
fn retag(
    target: &mut Vec<u8>, start: usize, tag: Tag
) -> Result<(), EncodeError> {
    let (ident, len) = match Ident::take_from_slice(&target[start..]) {
        Some(some) => some,
        None => {
            xerr!(return Err(EncodeError::invalid_value(
                "cannot replace tag of malformed value"
            )))
        }
    };
    let ident = Ident::from_tag(tag, ident.is_constructed());
    target.splice(start..start + len, ident.to_octets());
    Ok(())
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use bytes::Bytes;
    use hex_literal::hex;
    use crate::error::ErrorKind;
    use crate::ident::Tag;
    use crate::string::{BitString, CharString, OctetString};
    use crate::value::{Choice, Components, Schema};
    use super::*;

    fn der(value: impl Into<Value>) -> Vec<u8> {
        encode(&value.into(), EncodeOptions::new()).unwrap()
    }

    fn der_err(value: impl Into<Value>) -> ErrorKind {
        encode(&value.into(), EncodeOptions::new()).unwrap_err().kind()
    }

    fn with_header(header: &[u8], content: &[u8]) -> Vec<u8> {
        [header, content].concat()
    }

    #[test]
    fn octet_string() {
        assert_eq!(
            der(Value::octet_string("Quick brown fox")),
            with_header(&[4, 15], b"Quick brown fox")
        );
    }

    #[test]
    fn chunking_is_ignored() {
        assert_eq!(
            encode(
                &Value::octet_string("Quick brown"),
                EncodeOptions::new().max_chunk_size(2)
            ).unwrap(),
            with_header(&[4, 11], b"Quick brown")
        );
        assert_eq!(
            encode(
                &Value::BitString(
                    BitString::new(0, Bytes::from_static(b"\x01\x02\x03"))
                ),
                EncodeOptions::new().max_chunk_size(1)
            ).unwrap(),
            hex!("03 04 00 01 02 03")
        );
    }

    #[test]
    fn long_length() {
        let content = vec![0x61u8; 200];
        assert_eq!(
            der(OctetString::from(content.clone())),
            with_header(&[4, 0x81, 200], &content)
        );
    }

    #[test]
    fn bit_string() {
        assert_eq!(der(BitString::from_bits([true])), [3, 2, 7, 128]);
        assert_eq!(
            der(BitString::new(7, Bytes::from_static(b"\xff"))),
            [3, 2, 7, 128]
        );
        assert_eq!(der(BitString::from_bits(std::iter::empty())), [3, 1, 0]);
        assert_eq!(
            der_err(BitString::new(8, Bytes::from_static(b"\xff"))),
            ErrorKind::InvalidValue
        );
    }

    #[test]
    fn primitives() {
        assert_eq!(der(true), [1, 1, 0xFF]);
        assert_eq!(der(false), [1, 1, 0]);
        assert_eq!(der(()), [5, 0]);
        assert_eq!(der(0), [2, 1, 0]);
        assert_eq!(der(128), [2, 2, 0, 128]);
        assert_eq!(der(-1), [2, 1, 0xFF]);
        assert_eq!(
            der(Value::Enumerated(1u8.into())), [0x0a, 1, 1]
        );
        assert_eq!(
            der(CharString::utf8("ä")), [0x0c, 2, 0xc3, 0xa4]
        );
        assert_eq!(
            der(CharString::generalized_time("20170801120112.0990Z")),
            with_header(&[0x18, 19], b"20170801120112.099Z")
        );
        assert_eq!(
            der_err(CharString::utc_time("1708011201+0100")),
            ErrorKind::InvalidValue
        );
    }

    #[test]
    fn set_of_ordering() {
        let expected = [49, 7, 4, 1, 97, 4, 2, 97, 98];
        assert_eq!(
            der(Value::SetOf(vec![
                Value::octet_string("a"), Value::octet_string("ab")
            ])),
            expected
        );
        assert_eq!(
            der(Value::SetOf(vec![
                Value::octet_string("ab"), Value::octet_string("a")
            ])),
            expected
        );
        assert_eq!(
            der(Value::SetOf(vec![
                Value::octet_string("b"), Value::octet_string("a")
            ])),
            [49, 6, 4, 1, 97, 4, 1, 98]
        );
        assert_eq!(
            der(Value::SetOf(vec![
                Value::octet_string("a"), Value::octet_string("b")
            ])),
            [49, 6, 4, 1, 97, 4, 1, 98]
        );
        assert_eq!(der(Value::SetOf(Vec::new())), [49, 0]);
    }

    fn keyed_set(key: Choice) -> Value {
        let schema = Schema::new()
            .mandatory("data")
            .mandatory("key")
            .into_arc();
        Value::Set(
            Components::new(schema)
                .with("data", Value::octet_string("x")).unwrap()
                .with("key", key).unwrap()
        )
    }

    fn key_choice() -> Choice {
        Choice::new(["id", "ref"])
    }

    #[test]
    fn set_ordering_follows_selected_alternative() {
        assert_eq!(
            der(keyed_set(key_choice().with("id", 5).unwrap())),
            hex!("31 06 02 01 05 04 01 78")
        );
        assert_eq!(
            der(keyed_set(key_choice().with(
                "ref", Value::implicit(Tag::ctx(0), Value::octet_string("ab"))
            ).unwrap())),
            hex!("31 07 04 01 78 80 02 61 62")
        );
        assert_eq!(
            der_err(keyed_set(key_choice())),
            ErrorKind::MissingComponent
        );
    }

    #[test]
    fn empty_sequence() {
        let schema = Schema::new().optional("a").optional("b").into_arc();
        assert_eq!(der(Value::Sequence(Components::new(schema))), [48, 0]);
        assert_eq!(der(Value::SequenceOf(Vec::new())), [48, 0]);
    }

    #[test]
    fn indefinite_length() {
        assert_eq!(
            encode(
                &Value::octet_string("Quick brown fox"),
                EncodeOptions::new().definite_length(false)
            ).unwrap_err().kind(),
            ErrorKind::IndefiniteLengthNotAllowed
        );
        assert_eq!(
            encode(
                &Value::Null, EncodeOptions::new().definite_length(false)
            ).unwrap_err().kind(),
            ErrorKind::IndefiniteLengthNotAllowed
        );
    }

    fn inner_schema() -> Arc<Schema> {
        Schema::new().optional("str").optional("int").into_arc()
    }

    fn outer(inner: Option<Value>) -> Value {
        let mut res = Components::new(
            Schema::new().optional("inner").into_arc()
        );
        if let Some(inner) = inner {
            res.set("inner", inner).unwrap();
        }
        Value::Sequence(res)
    }

    #[test]
    fn nested_optional_sequence() {
        let inner = Components::new(inner_schema());
        assert_eq!(
            der(outer(Some(Value::Sequence(
                inner.clone()
                    .with("str", Value::octet_string("test")).unwrap()
                    .with("int", 123).unwrap()
            )))),
            [48, 11, 48, 9, 4, 4, 116, 101, 115, 116, 2, 1, 123]
        );
        assert_eq!(
            der(outer(Some(Value::Sequence(
                inner.clone().with("int", 123).unwrap()
            )))),
            [48, 5, 48, 3, 2, 1, 123]
        );
        assert_eq!(
            der(outer(Some(Value::Sequence(
                inner.clone().with("str", Value::octet_string("test")).unwrap()
            )))),
            [48, 8, 48, 6, 4, 4, 116, 101, 115, 116]
        );
        assert_eq!(der(outer(Some(Value::Sequence(inner)))), [48, 2, 48, 0]);
        assert_eq!(der(outer(None)), [48, 0]);
    }

    #[test]
    fn nested_default_sequence() {
        let inner = Components::new(
            Schema::new()
                .defaulted("str", Value::octet_string("test"))
                .optional("int")
                .into_arc()
        );
        assert_eq!(
            der(outer(Some(Value::Sequence(
                inner.clone()
                    .with("str", Value::octet_string("test")).unwrap()
                    .with("int", 123).unwrap()
            )))),
            [48, 5, 48, 3, 2, 1, 123]
        );
        assert_eq!(
            der(outer(Some(Value::Sequence(
                inner.clone()
                    .with("str", Value::octet_string("best")).unwrap()
            )))),
            [48, 8, 48, 6, 4, 4, 98, 101, 115, 116]
        );
        assert_eq!(
            der(outer(Some(Value::Sequence(
                inner.with("str", Value::octet_string("test")).unwrap()
            )))),
            [48, 2, 48, 0]
        );
    }

    #[test]
    fn default_kept_without_omission() {
        let value = Value::Sequence(
            Components::new(Schema::new().defaulted("version", 0).into_arc())
                .with("version", 0).unwrap()
        );
        assert_eq!(der(value.clone()), [48, 0]);
        assert_eq!(
            Engine::new(Policy::BASIC).encode(
                &value, EncodeOptions::new()
            ).unwrap(),
            [48, 3, 2, 1, 0]
        );
    }

    fn person_schema() -> Arc<Schema> {
        Schema::new()
            .optional("first-name")
            .defaulted("age", 33)
            .into_arc()
    }

    fn person(name: Option<&'static str>, age: Option<i32>) -> Value {
        let mut res = Components::new(person_schema());
        if let Some(name) = name {
            res.set("first-name", Value::octet_string(name)).unwrap();
        }
        if let Some(age) = age {
            res.set("age", age).unwrap();
        }
        Value::Sequence(res)
    }

    #[test]
    fn nested_defaulted_sequence() {
        let outer = |inner: Value| {
            let schema = Schema::new()
                .defaulted("inner", person(None, None))
                .into_arc();
            Value::Sequence(
                Components::new(schema).with("inner", inner).unwrap()
            )
        };
        assert_eq!(
            der(outer(person(Some("test"), Some(123)))),
            [48, 11, 48, 9, 4, 4, 116, 101, 115, 116, 2, 1, 123]
        );
        assert_eq!(
            der(outer(person(Some("test"), None))),
            [48, 8, 48, 6, 4, 4, 116, 101, 115, 116]
        );
        assert_eq!(
            der(outer(person(None, Some(123)))),
            [48, 5, 48, 3, 2, 1, 123]
        );
        assert_eq!(der(outer(person(None, Some(33)))), [48, 0]);
        assert_eq!(der(outer(person(None, None))), [48, 0]);
    }

    #[test]
    fn nested_optional_choice() {
        let choice = Choice::new(["inner", "first-name"]);
        let select = |inner: Value| {
            Value::from(choice.clone().with("inner", inner).unwrap())
        };
        assert_eq!(
            der(outer(Some(select(person(Some("test"), Some(123)))))),
            [48, 11, 48, 9, 4, 4, 116, 101, 115, 116, 2, 1, 123]
        );
        assert_eq!(
            der(outer(Some(select(person(None, Some(123)))))),
            [48, 5, 48, 3, 2, 1, 123]
        );
        assert_eq!(
            der(outer(Some(select(person(Some("test"), None))))),
            [48, 8, 48, 6, 4, 4, 116, 101, 115, 116]
        );
        assert_eq!(
            der(outer(Some(
                choice.clone()
                    .with("first-name", Value::octet_string("test")).unwrap()
                    .into()
            ))),
            [48, 6, 4, 4, 116, 101, 115, 116]
        );
        assert_eq!(der(outer(Some(choice.clone().into()))), [48, 0]);
        assert_eq!(
            der(outer(Some(Value::explicit(Tag::ctx(0), choice)))),
            [48, 0]
        );
        assert_eq!(der(outer(None)), [48, 0]);
    }

    #[test]
    fn set_with_choice() {
        let set = |status: Choice| {
            let schema = Schema::new()
                .mandatory("value")
                .mandatory("status")
                .into_arc();
            Value::Set(
                Components::new(schema)
                    .with("value", 5).unwrap()
                    .with("status", status).unwrap()
            )
        };
        let status = Choice::new(["name", "amount"]);
        assert_eq!(
            der(set(
                status.clone().with("name", Value::octet_string("A")).unwrap()
            )),
            [49, 6, 2, 1, 5, 4, 1, 65]
        );
        assert_eq!(
            der(set(status.with("amount", true).unwrap())),
            [49, 6, 1, 1, 255, 2, 1, 5]
        );
    }

    #[test]
    fn nested_optional_sequence_of() {
        assert_eq!(
            der(outer(Some(Value::SequenceOf(vec![
                Value::octet_string("test")
            ])))),
            [48, 8, 48, 6, 4, 4, 116, 101, 115, 116]
        );
        assert_eq!(
            der(outer(Some(Value::SequenceOf(Vec::new())))),
            [48, 2, 48, 0]
        );
        assert_eq!(der(outer(None)), [48, 0]);
    }

    #[test]
    fn choice() {
        assert_eq!(
            der(Choice::new(["flag"]).with("flag", true).unwrap()),
            [1, 1, 0xFF]
        );
        assert_eq!(der_err(Choice::new(["flag"])), ErrorKind::MissingComponent);
        assert_eq!(
            der_err(Value::SequenceOf(vec![Choice::new(["flag"]).into()])),
            ErrorKind::MissingComponent
        );
    }

    #[test]
    fn missing_component() {
        let schema = Schema::new().mandatory("id").optional("name").into_arc();
        assert_eq!(
            der_err(Value::Sequence(
                Components::new(schema.clone())
                    .with("name", CharString::utf8("x")).unwrap()
            )),
            ErrorKind::MissingComponent
        );
        assert_eq!(
            der_err(Value::Set(Components::new(schema))),
            ErrorKind::MissingComponent
        );
    }

    #[test]
    fn tagging() {
        assert_eq!(der(Value::explicit(Tag::ctx(1), 5)), hex!("a1 03 02 01 05"));
        assert_eq!(der(Value::implicit(Tag::ctx(1), 5)), hex!("81 01 05"));
        assert_eq!(
            der(Value::implicit(Tag::ctx(1), Value::SequenceOf(Vec::new()))),
            hex!("a1 00")
        );
        assert_eq!(
            der(Value::implicit(
                Tag::ctx(0), Choice::new(["int"]).with("int", 5).unwrap()
            )),
            hex!("a0 03 02 01 05")
        );
        assert_eq!(
            der(Value::implicit(Tag::ctx(2), Value::explicit(Tag::ctx(1), 5))),
            hex!("a2 03 02 01 05")
        );
        assert_eq!(
            der(Value::implicit(Tag::application(31), ())),
            hex!("5f 1f 00")
        );
        assert_eq!(
            der(Value::implicit(Tag::private(200), ())),
            hex!("df 81 48 00")
        );
    }

    #[test]
    fn raw() {
        assert_eq!(
            der(Value::SequenceOf(vec![
                Value::Raw(Bytes::from_static(b"\x05\x00")), true.into()
            ])),
            hex!("30 05 05 00 01 01 ff")
        );
        assert_eq!(
            der(Value::implicit(
                Tag::ctx(3), Value::Raw(Bytes::from_static(b"\x02\x01\x05"))
            )),
            hex!("83 01 05")
        );
        assert_eq!(der_err(Value::Raw(Bytes::new())), ErrorKind::InvalidValue);
    }

    #[test]
    fn unknown_type() {
        let engine = Engine::with_registry(
            Registry::builder().finish(), Policy::DISTINGUISHED
        );
        assert_eq!(
            engine.encode(&Value::Boolean(true), EncodeOptions::new())
                .unwrap_err().kind(),
            ErrorKind::UnknownType
        );
        assert_eq!(
            engine.encode(
                &Value::Raw(Bytes::from_static(b"\x05\x00")),
                EncodeOptions::new()
            ).unwrap(),
            [5, 0]
        );
    }

    #[test]
    fn basic_engine() {
        let engine = Engine::new(Policy::BASIC);
        assert_eq!(
            engine.encode(
                &Value::SetOf(vec![
                    Value::octet_string("b"), Value::octet_string("a")
                ]),
                EncodeOptions::new()
            ).unwrap(),
            [49, 6, 4, 1, 98, 4, 1, 97]
        );
        assert_eq!(
            engine.encode(
                &Value::octet_string("Quick"),
                EncodeOptions::new().max_chunk_size(3)
            ).unwrap(),
            hex!("24 09 04 03 51 75 69 04 02 63 6b")
        );
        assert_eq!(
            engine.encode(
                &Value::Null, EncodeOptions::new().definite_length(false)
            ).unwrap_err().kind(),
            ErrorKind::IndefiniteLengthNotAllowed
        );
    }

    #[test]
    fn global_engine() {
        assert!(std::ptr::eq(Engine::global(), Engine::global()));
        assert_eq!(Engine::global().policy(), Policy::DISTINGUISHED);
        assert_eq!(
            Engine::default().encode(&Value::from(7), EncodeOptions::default())
                .unwrap(),
            der(7)
        );
    }
}
