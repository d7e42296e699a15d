//! The envelope value itself: a digest-addressed tree of `subject` plus
//! `assertions`, leaves, wrapped boundaries, and (feature-gated) obscured
//! forms (spec §3).

use std::rc::Rc;

use bc_components::{Digest, DigestProvider};
#[cfg(feature = "compress")]
use bc_components::Compressed;
#[cfg(feature = "encrypt")]
use bc_components::EncryptedMessage;
use dcbor::prelude::*;

use crate::error::{EnvelopeError, Result};
use crate::Assertion;
#[cfg(feature = "known_value")]
use crate::KnownValue;

pub(crate) const TAG_ENVELOPE: u64 = bc_components::tags::TAG_ENVELOPE;

/// A Gordian Envelope. Cheaply cloneable: internally reference-counted, so
/// every transforming method (`add_assertion`, `elide`, `wrap`, ...) returns
/// a new `Envelope` sharing untouched subtrees with the original.
#[derive(Clone)]
pub struct Envelope(pub(crate) Rc<EnvelopeCase>);

#[derive(Debug)]
pub enum EnvelopeCase {
    Node { subject: Envelope, assertions: Vec<Envelope>, digest: Digest },
    Leaf { cbor: CBOR, digest: Digest },
    Wrapped { envelope: Envelope, digest: Digest },
    Assertion(Assertion),
    Elided(Digest),
    #[cfg(feature = "known_value")]
    KnownValue { value: KnownValue, digest: Digest },
    #[cfg(feature = "encrypt")]
    Encrypted(EncryptedMessage),
    #[cfg(feature = "compress")]
    Compressed(Compressed),
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{:?}", self.0) }
}

/// Anything that can become the subject, predicate, or object of an
/// envelope. Implemented directly for leaf-ish value types and, via the
/// blanket `Into<Envelope>` impl, for `Envelope` itself.
pub trait EnvelopeEncodable {
    fn into_envelope(self) -> Envelope;
    fn to_envelope(&self) -> Envelope
    where
        Self: Clone,
    {
        self.clone().into_envelope()
    }
}

impl<T> EnvelopeEncodable for T
where
    T: Into<Envelope> + Clone,
{
    fn into_envelope(self) -> Envelope { self.into() }
}

impl EnvelopeEncodable for Assertion {
    fn into_envelope(self) -> Envelope { Envelope::new_with_assertion(self) }
}

impl EnvelopeEncodable for CBOR {
    fn into_envelope(self) -> Envelope { Envelope::new_leaf(self) }
}

impl EnvelopeEncodable for String {
    fn into_envelope(self) -> Envelope { Envelope::new_leaf(self) }
}

impl EnvelopeEncodable for &str {
    fn into_envelope(self) -> Envelope { Envelope::new_leaf(self.to_string()) }
}

macro_rules! impl_envelope_encodable {
    ($type:ty) => {
        impl EnvelopeEncodable for $type {
            fn into_envelope(self) -> Envelope { Envelope::new_leaf(self) }
        }
    };
}

impl_envelope_encodable!(u8);
impl_envelope_encodable!(u16);
impl_envelope_encodable!(u32);
impl_envelope_encodable!(u64);
impl_envelope_encodable!(usize);
impl_envelope_encodable!(i8);
impl_envelope_encodable!(i16);
impl_envelope_encodable!(i32);
impl_envelope_encodable!(i64);
impl_envelope_encodable!(bool);
impl_envelope_encodable!(Vec<u8>);
impl_envelope_encodable!(bc_components::Digest);
impl_envelope_encodable!(bc_components::ARID);
impl_envelope_encodable!(bc_components::Salt);
#[cfg(feature = "known_value")]
impl_envelope_encodable!(KnownValue);
#[cfg(feature = "recipient")]
impl_envelope_encodable!(bc_components::SealedMessage);
#[cfg(feature = "signature")]
impl_envelope_encodable!(bc_components::Signature);

impl Envelope {
    /// Wraps `subject` as a leaf-or-richer envelope with no assertions.
    pub fn new(subject: impl EnvelopeEncodable) -> Self { subject.into_envelope() }

    /// Convenience constructor for a single `predicate: object` assertion
    /// envelope, equivalent to `Envelope::new(predicate).add_assertion(...)`
    /// boiled down to the assertion case directly.
    pub fn new_assertion(predicate: impl EnvelopeEncodable, object: impl EnvelopeEncodable) -> Self {
        Self::new_with_assertion(Assertion::new(predicate.into_envelope(), object.into_envelope()))
    }

    pub(crate) fn new_leaf(value: impl Into<CBOR>) -> Self {
        let cbor = value.into();
        let digest = Digest::from_image(canonical_bytes(&cbor));
        Self(Rc::new(EnvelopeCase::Leaf { cbor, digest }))
    }

    pub(crate) fn new_with_assertion(assertion: Assertion) -> Self {
        Self(Rc::new(EnvelopeCase::Assertion(assertion)))
    }

    pub(crate) fn new_elided(digest: Digest) -> Self { Self(Rc::new(EnvelopeCase::Elided(digest))) }

    #[cfg(feature = "known_value")]
    pub(crate) fn new_with_known_value(value: KnownValue) -> Self {
        let digest = Digest::from_image(canonical_bytes(&CBOR::from(value.clone())));
        Self(Rc::new(EnvelopeCase::KnownValue { value, digest }))
    }

    #[cfg(feature = "encrypt")]
    pub(crate) fn new_with_encrypted(message: EncryptedMessage) -> Self {
        Self(Rc::new(EnvelopeCase::Encrypted(message)))
    }

    #[cfg(feature = "compress")]
    pub(crate) fn new_with_compressed(compressed: Compressed) -> Self {
        Self(Rc::new(EnvelopeCase::Compressed(compressed)))
    }

    pub(crate) fn new_wrapped(envelope: Envelope) -> Self {
        let digest = Digest::from_digests(&[envelope.digest()]);
        Self(Rc::new(EnvelopeCase::Wrapped { envelope, digest }))
    }

    /// Builds a `Node` from a subject and an assertion list, trusting the
    /// caller that every assertion is a genuine `Assertion` or an obscured
    /// stand-in for one. Sorts assertions by digest so node digests and
    /// elision are order-independent, and computes the node's digest as
    /// `Digest::from_digests([subject, ...sorted(assertions)])`.
    pub(crate) fn new_with_unchecked_assertions(subject: Envelope, mut assertions: Vec<Envelope>) -> Self {
        assertions.sort_by_key(|a| a.digest());
        let mut digests = Vec::with_capacity(assertions.len() + 1);
        digests.push(subject.digest());
        digests.extend(assertions.iter().map(|a| a.digest()));
        let digest = Digest::from_digests(&digests);
        Self(Rc::new(EnvelopeCase::Node { subject, assertions, digest }))
    }

    /// As [`Self::new_with_unchecked_assertions`], but rejects any assertion
    /// that isn't actually an assertion, elided, encrypted, or compressed
    /// form of one.
    pub(crate) fn new_with_assertions(subject: Envelope, assertions: Vec<Envelope>) -> Result<Self> {
        for assertion in &assertions {
            if !assertion.is_subject_assertion_or_obscured() {
                return Err(EnvelopeError::InvalidFormat);
            }
        }
        Ok(Self::new_with_unchecked_assertions(subject, assertions))
    }

    pub(crate) fn case(&self) -> &EnvelopeCase { &self.0 }
}

impl Envelope {
    fn is_subject_assertion_or_obscured(&self) -> bool {
        matches!(
            self.case(),
            EnvelopeCase::Assertion(_) | EnvelopeCase::Elided(_)
        ) || self.is_obscured()
    }

    /// True for `Elided`, and (when their features are enabled) `Encrypted`
    /// and `Compressed` — the three forms elision can replace a subtree
    /// with.
    pub fn is_obscured(&self) -> bool {
        match self.case() {
            EnvelopeCase::Elided(_) => true,
            #[cfg(feature = "encrypt")]
            EnvelopeCase::Encrypted(_) => true,
            #[cfg(feature = "compress")]
            EnvelopeCase::Compressed(_) => true,
            _ => false,
        }
    }
}

/// Every `CBOR` value this crate builds is assembled from its own
/// constructors, so canonical encoding never fails in practice.
pub(crate) fn canonical_bytes(cbor: &CBOR) -> Vec<u8> {
    dcbor::encode(cbor).expect("envelope-internal CBOR values are always canonical")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_digest_is_stable() {
        let a = Envelope::new("hello");
        let b = Envelope::new("hello");
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn different_leaves_have_different_digests() {
        assert_ne!(Envelope::new("hello").digest(), Envelope::new("goodbye").digest());
    }
}
