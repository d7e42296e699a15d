//! A single predicate/object pair (spec §3: the only thing an envelope's
//! `assertions` list holds).

use bc_components::{Digest, DigestProvider};

use crate::envelope::EnvelopeEncodable;
use crate::Envelope;

/// `predicate: object`, digest-bound so it can be sorted, deduplicated, and
/// elided like any other envelope subtree.
#[derive(Debug, Clone)]
pub struct Assertion {
    predicate: Envelope,
    object: Envelope,
    digest: Digest,
}

impl Assertion {
    pub fn new(predicate: impl EnvelopeEncodable, object: impl EnvelopeEncodable) -> Self {
        let predicate = predicate.into_envelope();
        let object = object.into_envelope();
        let digest = Digest::from_digests(&[predicate.digest(), object.digest()]);
        Self { predicate, object, digest }
    }

    pub fn predicate(&self) -> &Envelope { &self.predicate }
    pub fn object(&self) -> &Envelope { &self.object }
}

impl DigestProvider for Assertion {
    fn digest(&self) -> Digest { self.digest }
}

impl PartialEq for Assertion {
    fn eq(&self, other: &Self) -> bool { self.digest == other.digest }
}
impl Eq for Assertion {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_bound_to_predicate_and_object() {
        let a = Assertion::new("knows", "Bob");
        let b = Assertion::new("knows", "Carol");
        assert_ne!(a.digest(), b.digest());
    }
}
