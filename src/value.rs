//! The value tree to be encoded.
//!
//! This module contains the types that make up a value tree: the [`Value`]
//! enum over all supported kinds of values, [`Components`] for the named
//! components of SEQUENCE and SET values together with their [`Schema`],
//! and [`Choice`] for values that hold one of several alternatives.
//!
//! Value trees are built by the caller and only ever read by the encoder.

use std::{fmt, slice};
use std::borrow::Cow;
use std::sync::Arc;
use bytes::Bytes;
use crate::ident::Tag;
use crate::int::Integer;
use crate::oid::Oid;
use crate::string::{BitString, CharString, OctetString, StringKind};


//------------ Kind ----------------------------------------------------------

/// The declared type of a value.
///
/// This is the type identity used by the encoder registry to distinguish
/// between types that share the same tag, such as SET and SET OF.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Kind {
    Boolean,
    Integer,
    Enumerated,
    BitString,
    OctetString,
    Null,
    Oid,
    String(StringKind),
    Sequence,
    SequenceOf,
    Set,
    SetOf,
    Choice,
}

impl Kind {
    /// Returns the natural tag of values of this kind.
    ///
    /// Returns `None` for CHOICE which has no tag of its own.
    pub const fn tag(self) -> Option<Tag> {
        Some(match self {
            Kind::Boolean => Tag::BOOLEAN,
            Kind::Integer => Tag::INTEGER,
            Kind::Enumerated => Tag::ENUMERATED,
            Kind::BitString => Tag::BIT_STRING,
            Kind::OctetString => Tag::OCTET_STRING,
            Kind::Null => Tag::NULL,
            Kind::Oid => Tag::OID,
            Kind::String(kind) => kind.tag(),
            Kind::Sequence | Kind::SequenceOf => Tag::SEQUENCE,
            Kind::Set | Kind::SetOf => Tag::SET,
            Kind::Choice => return None,
        })
    }

    /// Returns whether values of this kind use the constructed form.
    pub const fn is_constructed(self) -> bool {
        matches!(
            self,
            Kind::Sequence | Kind::SequenceOf | Kind::Set | Kind::SetOf
        )
    }

    /// Returns whether another kind has the same natural tag.
    pub const fn shares_tag(self) -> bool {
        self.is_constructed()
    }
}


//------------ Value ---------------------------------------------------------

/// A node in a value tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    /// A BOOLEAN value.
    Boolean(bool),

    /// An INTEGER value.
    Integer(Integer),

    /// An ENUMERATED value.
    Enumerated(Integer),

    /// A BIT STRING value.
    BitString(BitString),

    /// An OCTET STRING value.
    OctetString(OctetString),

    /// The NULL value.
    Null,

    /// An OBJECT IDENTIFIER value.
    Oid(Oid),

    /// A restricted character string or time value.
    String(CharString),

    /// A SEQUENCE value with named components.
    Sequence(Components),

    /// A SEQUENCE OF value.
    SequenceOf(Vec<Value>),

    /// A SET value with named components.
    Set(Components),

    /// A SET OF value.
    SetOf(Vec<Value>),

    /// A CHOICE value.
    Choice(Choice),

    /// A value with a tag other than its natural tag.
    Tagged(Tagged),

    /// A complete, already encoded value.
    ///
    /// The octets are copied into the output as they are. They are
    /// expected to be a single value in canonical encoding already.
    Raw(Bytes),
}

impl Value {
    /// Creates an OCTET STRING value from something bytes-like.
    pub fn octet_string(octets: impl Into<OctetString>) -> Self {
        Value::OctetString(octets.into())
    }

    /// Creates an INTEGER value.
    pub fn integer(value: impl Into<Integer>) -> Self {
        Value::Integer(value.into())
    }

    /// Wraps a value into an explicit tag.
    pub fn explicit(tag: Tag, inner: impl Into<Value>) -> Self {
        Value::Tagged(Tagged::new(tag, TagMode::Explicit, inner.into()))
    }

    /// Replaces the tag of a value with an implicit tag.
    pub fn implicit(tag: Tag, inner: impl Into<Value>) -> Self {
        Value::Tagged(Tagged::new(tag, TagMode::Implicit, inner.into()))
    }

    /// Returns the declared type of the value.
    ///
    /// For a tagged value, this is the type of the tagged value. For a raw
    /// value, it is `None`.
    pub fn kind(&self) -> Option<Kind> {
        Some(match *self {
            Value::Boolean(_) => Kind::Boolean,
            Value::Integer(_) => Kind::Integer,
            Value::Enumerated(_) => Kind::Enumerated,
            Value::BitString(_) => Kind::BitString,
            Value::OctetString(_) => Kind::OctetString,
            Value::Null => Kind::Null,
            Value::Oid(_) => Kind::Oid,
            Value::String(ref s) => Kind::String(s.kind()),
            Value::Sequence(_) => Kind::Sequence,
            Value::SequenceOf(_) => Kind::SequenceOf,
            Value::Set(_) => Kind::Set,
            Value::SetOf(_) => Kind::SetOf,
            Value::Choice(_) => Kind::Choice,
            Value::Tagged(ref tagged) => return tagged.inner().kind(),
            Value::Raw(_) => return None,
        })
    }

    /// Returns whether the value is an unselected choice.
    ///
    /// Tags around the choice are looked through. An optional component
    /// holding such a value is treated as absent.
    pub fn is_empty_choice(&self) -> bool {
        match *self {
            Value::Choice(ref choice) => choice.selected().is_none(),
            Value::Tagged(ref tagged) => tagged.inner().is_empty_choice(),
            _ => false,
        }
    }
}


//--- From

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<Integer> for Value {
    fn from(value: Integer) -> Self {
        Value::Integer(value)
    }
}

macro_rules! integer_from {
    ( $( $type:ident ),* ) => {
        $(
            impl From<$type> for Value {
                fn from(value: $type) -> Self {
                    Value::Integer(value.into())
                }
            }
        )*
    }
}

integer_from!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

impl From<BitString> for Value {
    fn from(value: BitString) -> Self {
        Value::BitString(value)
    }
}

impl From<OctetString> for Value {
    fn from(value: OctetString) -> Self {
        Value::OctetString(value)
    }
}

impl From<Oid> for Value {
    fn from(value: Oid) -> Self {
        Value::Oid(value)
    }
}

impl From<CharString> for Value {
    fn from(value: CharString) -> Self {
        Value::String(value)
    }
}

impl From<Choice> for Value {
    fn from(value: Choice) -> Self {
        Value::Choice(value)
    }
}

impl From<Tagged> for Value {
    fn from(value: Tagged) -> Self {
        Value::Tagged(value)
    }
}


//------------ TagMode and Tagged --------------------------------------------

/// How a tag is applied to a value.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TagMode {
    /// The tag replaces the natural tag of the value.
    Implicit,

    /// The value is wrapped into a constructed value with the tag.
    Explicit,
}

/// A value with a tag other than its natural tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tagged {
    tag: Tag,
    mode: TagMode,
    inner: Box<Value>,
}

impl Tagged {
    /// Creates a new tagged value.
    pub fn new(tag: Tag, mode: TagMode, inner: Value) -> Self {
        Tagged { tag, mode, inner: Box::new(inner) }
    }

    /// Returns the tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns how the tag is applied.
    ///
    /// An implicit tag on a CHOICE value is applied as an explicit tag.
    pub fn mode(&self) -> TagMode {
        match *self.inner {
            Value::Choice(_) => TagMode::Explicit,
            _ => self.mode
        }
    }

    /// Returns the tagged value.
    pub fn inner(&self) -> &Value {
        &self.inner
    }
}


//------------ Presence ------------------------------------------------------

/// Whether a component has to be present.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Presence {
    /// The component must always be present.
    Mandatory,

    /// The component may be absent.
    Optional,

    /// The component may be absent in which case it has the given value.
    Defaulted(Value),
}


//------------ ComponentSpec -------------------------------------------------

/// The declaration of a single component of a structured type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComponentSpec {
    name: Cow<'static, str>,
    presence: Presence,
}

impl ComponentSpec {
    /// Creates a new component declaration.
    pub fn new(name: impl Into<Cow<'static, str>>, presence: Presence) -> Self {
        ComponentSpec { name: name.into(), presence }
    }

    /// Returns the name of the component.
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Returns the presence policy of the component.
    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    /// Returns the default value if the component has one.
    pub fn default_value(&self) -> Option<&Value> {
        match self.presence {
            Presence::Defaulted(ref value) => Some(value),
            _ => None,
        }
    }
}


//------------ Schema --------------------------------------------------------

/// The ordered component declarations of a SEQUENCE or SET type.
///
/// Schemas are built once and then shared between all values of the type:
///
/// ```
/// use cander::value::{Schema, Components};
///
/// let schema = Schema::new()
///     .optional("first-name")
///     .defaulted("age", 33)
///     .into_arc();
/// let mut person = Components::new(schema);
/// person.set("age", 123).unwrap();
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Schema {
    components: Vec<ComponentSpec>,
}

impl Schema {
    /// Creates a new, empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component declaration.
    pub fn component(mut self, spec: ComponentSpec) -> Self {
        self.components.push(spec);
        self
    }

    /// Adds a mandatory component.
    pub fn mandatory(self, name: impl Into<Cow<'static, str>>) -> Self {
        self.component(ComponentSpec::new(name, Presence::Mandatory))
    }

    /// Adds an optional component.
    pub fn optional(self, name: impl Into<Cow<'static, str>>) -> Self {
        self.component(ComponentSpec::new(name, Presence::Optional))
    }

    /// Adds a component with a default value.
    pub fn defaulted(
        self, name: impl Into<Cow<'static, str>>, default: impl Into<Value>
    ) -> Self {
        self.component(
            ComponentSpec::new(name, Presence::Defaulted(default.into()))
        )
    }

    /// Converts the schema into a shareable value.
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Returns the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns whether the schema has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns the index of the component with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.components.iter().position(|spec| spec.name() == name)
    }

    /// Returns an iterator over the component declarations.
    pub fn iter(&self) -> slice::Iter<'_, ComponentSpec> {
        self.components.iter()
    }
}


//------------ Components ----------------------------------------------------

/// The named components of a SEQUENCE or SET value.
///
/// Each component declared by the schema has a slot that is either empty,
/// i.e., the component is absent, or holds a value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Components {
    schema: Arc<Schema>,
    slots: Vec<Option<Value>>,
}

impl Components {
    /// Creates a new value with all components absent.
    pub fn new(schema: Arc<Schema>) -> Self {
        let slots = vec![None; schema.len()];
        Components { schema, slots }
    }

    /// Returns the schema of the value.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Sets the component with the given name.
    pub fn set(
        &mut self, name: &str, value: impl Into<Value>
    ) -> Result<(), NoSuchComponent> {
        *self.slot_mut(name)? = Some(value.into());
        Ok(())
    }

    /// Sets the component with the given name and returns the value.
    pub fn with(
        mut self, name: &str, value: impl Into<Value>
    ) -> Result<Self, NoSuchComponent> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Makes the component with the given name absent.
    pub fn remove(&mut self, name: &str) -> Result<(), NoSuchComponent> {
        *self.slot_mut(name)? = None;
        Ok(())
    }

    /// Makes all components absent.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None)
    }

    /// Returns the value of the component with the given name if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.position(name).and_then(|idx| self.slots[idx].as_ref())
    }

    /// Returns a mutable reference to the component with the given name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self.schema.position(name) {
            Some(idx) => self.slots[idx].as_mut(),
            None => None,
        }
    }

    /// Returns an iterator over the declarations and values in order.
    pub fn iter(
        &self
    ) -> impl Iterator<Item = (&ComponentSpec, Option<&Value>)> + '_ {
        self.schema.iter().zip(self.slots.iter().map(Option::as_ref))
    }

    fn slot_mut(
        &mut self, name: &str
    ) -> Result<&mut Option<Value>, NoSuchComponent> {
        match self.schema.position(name) {
            Some(idx) => Ok(&mut self.slots[idx]),
            None => Err(NoSuchComponent(name.to_string())),
        }
    }
}


//------------ Choice --------------------------------------------------------

/// A CHOICE value.
///
/// The value knows the names of its declared alternatives and holds at
/// most one selected alternative. Its tag is the tag of the selected
/// alternative.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Choice {
    alternatives: Arc<[Cow<'static, str>]>,
    selected: Option<(usize, Box<Value>)>,
}

impl Choice {
    /// Creates a choice with the given alternatives and no selection.
    pub fn new<I, S>(alternatives: I) -> Self
    where I: IntoIterator<Item = S>, S: Into<Cow<'static, str>> {
        Choice {
            alternatives: alternatives.into_iter().map(|alt| {
                let alt: Cow<'static, str> = alt.into();
                alt
            }).collect(),
            selected: None,
        }
    }

    /// Selects the alternative with the given name.
    pub fn select(
        &mut self, name: &str, value: impl Into<Value>
    ) -> Result<(), NoSuchComponent> {
        match self.alternatives.iter().position(|alt| alt == name) {
            Some(idx) => {
                self.selected = Some((idx, Box::new(value.into())));
                Ok(())
            }
            None => Err(NoSuchComponent(name.to_string()))
        }
    }

    /// Selects an alternative and returns the value.
    pub fn with(
        mut self, name: &str, value: impl Into<Value>
    ) -> Result<Self, NoSuchComponent> {
        self.select(name, value)?;
        Ok(self)
    }

    /// Removes the selection.
    pub fn clear(&mut self) {
        self.selected = None
    }

    /// Returns the name and value of the selected alternative.
    pub fn selected(&self) -> Option<(&str, &Value)> {
        self.selected.as_ref().map(|(idx, value)| {
            (self.alternatives[*idx].as_ref(), value.as_ref())
        })
    }

    /// Returns the value of the selected alternative.
    pub fn selected_value(&self) -> Option<&Value> {
        self.selected.as_ref().map(|(_, value)| value.as_ref())
    }
}


//------------ NoSuchComponent -----------------------------------------------

/// A component or alternative of the given name isn’t declared.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NoSuchComponent(String);

impl fmt::Display for NoSuchComponent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "no component named ‘{}’", self.0)
    }
}

impl std::error::Error for NoSuchComponent { }


//============ Tests =========================================================
