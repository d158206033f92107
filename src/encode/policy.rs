//! The encoding policy.
//!
//! This is an internal module. The relevant items are re-exported by the
//! parent.

use std::sync::Arc;
use crate::ident::Tag;
use crate::value::Kind;
use super::primitive::{CanonicalBitStringEncoder, CanonicalOctetStringEncoder};
use super::registry::{Key, RegistryBuilder};
use super::structured::CanonicalSetEncoder;


//------------ Policy --------------------------------------------------------

/// The rules an engine follows beyond what its encoders do.
///
/// The only policy available outside this crate is
/// [`Policy::DISTINGUISHED`] which produces the Distinguished Encoding
/// Rules. It replaces the encoders for BIT STRING, OCTET STRING, SET, and
/// SET OF with their canonical versions and omits components equal to
/// their default value.
///
/// Independently of the policy, engines only ever produce definite length
/// encodings.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Policy {
    /// Omit components whose value equals their declared default.
    omit_defaults: bool,

    /// Install the canonical encoders.
    canonical_forms: bool,
}

impl Policy {
    /// The Distinguished Encoding Rules.
    pub const DISTINGUISHED: Self = Policy {
        omit_defaults: true,
        canonical_forms: true,
    };

    /// The base rules without any canonical overrides.
    ///
    /// Strings may be chunked, sets are encoded in the order given, and
    /// components equal to their default are encoded.
    pub(crate) const BASIC: Self = Policy {
        omit_defaults: false,
        canonical_forms: false,
    };

    /// Returns whether components equal to their default are omitted.
    pub fn omits_defaults(self) -> bool {
        self.omit_defaults
    }

    /// Returns whether the policy produces canonical encodings.
    pub fn is_canonical(self) -> bool {
        self.canonical_forms
    }

    /// Applies the policy’s encoder overrides to a registry.
    pub(crate) fn apply(self, builder: RegistryBuilder) -> RegistryBuilder {
        if !self.is_canonical() {
            return builder
        }
        log::trace!("installing canonical encoder overrides");
        let set = Arc::new(CanonicalSetEncoder);
        builder
            .register(Key::Tag(Tag::BIT_STRING), CanonicalBitStringEncoder)
            .register(Key::Tag(Tag::OCTET_STRING), CanonicalOctetStringEncoder)
            .register_arc(Key::Kind(Kind::Set), set.clone())
            .register_arc(Key::Kind(Kind::SetOf), set)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::DISTINGUISHED
    }
}


//============ Tests =========================================================
