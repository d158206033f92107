//! Encoding value trees.
//!
//! Encoding is driven by an [`Engine`]. It walks a [`Value`] tree and asks
//! an [`Encoder`] for the content octets of each value. Which encoder is
//! responsible for a value is decided by the engine’s [`Registry`]: an
//! encoder is registered either for the natural tag of a type or, for types
//! that share their tag with another type, for the declared type itself.
//!
//! The engine then adds identifier and length octets. Length octets are
//! always in definite form.
//!
//! The [`Policy`] of an engine decides which encoders are installed on top
//! of the base table and whether components equal to their default value
//! are encoded. The only public policy produces the Distinguished Encoding
//! Rules, and the [`encode`] function uses a process-wide engine for it.
//!
//! [`Value`]: crate::value::Value

pub use self::engine::{EncodeOptions, Engine, encode};
pub use self::policy::Policy;
pub use self::primitive::{
    BooleanEncoder, CanonicalBitStringEncoder, CanonicalOctetStringEncoder,
    CharStringEncoder, IntegerEncoder, NullEncoder, OidEncoder,
};
pub use self::registry::{Encoder, Key, Registry, RegistryBuilder};
pub use self::structured::{CanonicalSetEncoder, SequenceEncoder};

mod engine;
mod policy;
mod primitive;
mod registry;
mod structured;
