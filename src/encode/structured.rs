//! Encoders for structured values.
//!
//! This is an internal module. The relevant items are re-exported by the
//! parent.

use std::cmp::Ordering;
use smallvec::SmallVec;
use crate::error::EncodeError;
use crate::ident::{Ident, Tag};
use crate::value::{Components, Presence, Value};
use super::engine::{EncodeOptions, Engine};
use super::registry::{Encoder, mismatch};


//------------ present_components --------------------------------------------

/// Returns the component values to be encoded in declaration order.
///
/// Absent optional and defaulted components are skipped, as are optional
/// components holding a CHOICE without a selection. If the engine’s policy
/// omits defaults, a component whose value equals its declared default is
/// skipped, too. Two values are equal if they are structurally equal or
/// their encodings are identical.
///
/// Returns an error if a mandatory component is absent or holds a CHOICE
/// without a selection.
pub(crate) fn present_components<'a>(
    components: &'a Components, engine: &Engine, options: EncodeOptions,
) -> Result<SmallVec<[&'a Value; 8]>, EncodeError> {
    let omit_defaults = engine.policy().omits_defaults();
    let mut res = SmallVec::new();
    for (spec, value) in components.iter() {
        let value = match value {
            Some(value) if !value.is_empty_choice() => value,
            _ => {
                if let Presence::Mandatory = spec.presence() {
                    xerr!(return Err(EncodeError::missing_component(format!(
                        "mandatory component ‘{}’ is absent", spec.name()
                    ))))
                }
                continue
            }
        };
        if omit_defaults {
            if let Some(default) = spec.default_value() {
                if is_default(value, default, engine, options)? {
                    continue
                }
            }
        }
        res.push(value);
    }
    Ok(res)
}

/// Returns whether `value` is the same as the declared `default`.
///
/// A default that cannot be encoded never matches.
fn is_default(
    value: &Value, default: &Value, engine: &Engine, options: EncodeOptions,
) -> Result<bool, EncodeError> {
    if value == default {
        return Ok(true)
    }
    let encoded = engine.encode_to_vec(value, options)?;
    Ok(engine.encode_to_vec(default, options).map_or(false, |default| {
        default == encoded
    }))
}


//------------ SequenceEncoder -----------------------------------------------

/// Encodes SEQUENCE and SEQUENCE OF values.
///
/// The components or elements are encoded in order and concatenated.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequenceEncoder;

impl Encoder for SequenceEncoder {
    fn encode_content(
        &self, value: &Value, engine: &Engine, options: EncodeOptions,
        target: &mut Vec<u8>,
    ) -> Result<bool, EncodeError> {
        match *value {
            Value::Sequence(ref components) => {
                for item in present_components(components, engine, options)? {
                    engine.encode_value(item, options, target)?;
                }
            }
            Value::SequenceOf(ref elements) => {
                for item in elements {
                    engine.encode_value(item, options, target)?;
                }
            }
            _ => return Err(mismatch(self, value))
        }
        Ok(true)
    }
}


//------------ SetEncoder ----------------------------------------------------

/// Encodes SET and SET OF values without reordering.
///
/// Components of a SET are encoded in declaration order, elements of a
/// SET OF in the order given.
#[derive(Clone, Copy, Debug, Default)]
pub struct SetEncoder;

impl Encoder for SetEncoder {
    fn encode_content(
        &self, value: &Value, engine: &Engine, options: EncodeOptions,
        target: &mut Vec<u8>,
    ) -> Result<bool, EncodeError> {
        match *value {
            Value::Set(ref components) => {
                for item in present_components(components, engine, options)? {
                    engine.encode_value(item, options, target)?;
                }
            }
            Value::SetOf(ref elements) => {
                for item in elements {
                    engine.encode_value(item, options, target)?;
                }
            }
            _ => return Err(mismatch(self, value))
        }
        Ok(true)
    }
}


//------------ CanonicalSetEncoder -------------------------------------------

/// Encodes SET and SET OF values in canonical order.
///
/// Each component or element is encoded first. The components of a SET are
/// then ordered by the tag of their encoding, so a CHOICE component is
/// ordered by the tag of its selected alternative. The elements of a SET OF
/// are ordered by their complete encoding compared as octet strings.
///
/// The order of the value as given is irrelevant.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanonicalSetEncoder;

impl Encoder for CanonicalSetEncoder {
    fn encode_content(
        &self, value: &Value, engine: &Engine, options: EncodeOptions,
        target: &mut Vec<u8>,
    ) -> Result<bool, EncodeError> {
        let mut encoded: SmallVec<[Vec<u8>; 8]> = SmallVec::new();
        match *value {
            Value::Set(ref components) => {
                for item in present_components(components, engine, options)? {
                    encoded.push(engine.encode_to_vec(item, options)?);
                }
                encoded.sort_by(|left, right| cmp_by_tag(left, right));
            }
            Value::SetOf(ref elements) => {
                for item in elements {
                    encoded.push(engine.encode_to_vec(item, options)?);
                }
                encoded.sort();
            }
            _ => return Err(mismatch(self, value))
        }
        log::trace!("sorted {} set elements", encoded.len());
        for item in &encoded {
            target.extend_from_slice(item);
        }
        Ok(true)
    }
}

/// Returns the tag of an encoded value.
fn outer_tag(encoded: &[u8]) -> Option<Tag> {
    Ident::take_from_slice(encoded).map(|(ident, _)| ident.tag())
}

/// Compares two encoded values by their tags.
///
/// Values with the same tag are ordered by their complete encoding so that
/// the result does not depend on the order of the input.
fn cmp_by_tag(left: &[u8], right: &[u8]) -> Ordering {
    outer_tag(left).cmp(&outer_tag(right)).then_with(|| left.cmp(right))
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use bytes::Bytes;
    use crate::encode::Policy;
    use crate::error::ErrorKind;
    use crate::string::{BitString, CharString};
    use crate::value::{Choice, Schema};

    fn present(
        components: &Components, omit_defaults: bool
    ) -> Result<SmallVec<[&Value; 8]>, EncodeError> {
        let engine = if omit_defaults {
            Engine::global().clone()
        }
        else {
            Engine::new(Policy::BASIC)
        };
        present_components(components, &engine, EncodeOptions::new())
    }

    #[test]
    fn presence() {
        let schema = Schema::new()
            .mandatory("id")
            .optional("name")
            .defaulted("age", 33)
            .optional("contact")
            .into_arc();
        let mut value = Components::new(schema.clone());
        assert_eq!(
            present(&value, true).unwrap_err().kind(),
            ErrorKind::MissingComponent
        );

        value.set("id", 1).unwrap();
        value.set("contact", Choice::new(["email", "phone"])).unwrap();
        assert_eq!(present(&value, true).unwrap().len(), 1);

        value.set(
            "contact", Value::explicit(Tag::ctx(0), Choice::new(["email"]))
        ).unwrap();
        assert_eq!(present(&value, true).unwrap().len(), 1);

        value.set("age", 33).unwrap();
        assert_eq!(present(&value, true).unwrap().len(), 1);
        assert_eq!(present(&value, false).unwrap().len(), 2);

        value.set("age", 34).unwrap();
        assert_eq!(
            present(&value, true).unwrap().as_slice(),
            [&Value::from(1), &Value::from(34)]
        );

        let mut value = Components::new(schema);
        value.set("id", Choice::new(["email", "phone"])).unwrap();
        assert_eq!(
            present(&value, true).unwrap_err().kind(),
            ErrorKind::MissingComponent
        );
    }

    #[test]
    fn defaults_compare_by_encoding() {
        let inner = Schema::new()
            .optional("name")
            .defaulted("age", 33)
            .into_arc();
        let empty_inner = Value::Sequence(Components::new(inner.clone()));
        let schema = Schema::new()
            .defaulted("inner", empty_inner)
            .defaulted("flags", BitString::new(4, Bytes::from_static(b"\xa0")))
            .defaulted(
                "time", CharString::generalized_time("20170801120112.5Z")
            )
            .into_arc();

        let inner = Components::new(inner).with("age", 33).unwrap();
        let flags = BitString::new(4, Bytes::from_static(b"\xaf"));
        let time = CharString::generalized_time("20170801120112.500Z");
        let value = Components::new(schema)
            .with("inner", Value::Sequence(inner)).unwrap()
            .with("flags", flags).unwrap()
            .with("time", time).unwrap();
        assert!(present(&value, true).unwrap().is_empty());
        assert_eq!(present(&value, false).unwrap().len(), 3);
    }

    #[test]
    fn tag_order() {
        // Context tags sort after universal ones regardless of number.
        assert_eq!(
            cmp_by_tag(b"\x80\x01\x00", b"\x02\x01\x05"), Ordering::Greater
        );
        assert_eq!(cmp_by_tag(b"\x02\x01\x05", b"\x04\x00"), Ordering::Less);
        assert_eq!(cmp_by_tag(b"\xa1\x00", b"\x82\x00"), Ordering::Less);
        assert_eq!(
            cmp_by_tag(b"\x04\x01\x62", b"\x04\x01\x61"), Ordering::Greater
        );
    }
}
