//! `DigestProvider for Envelope`, plus the equivalence/identity pair the
//! elision machinery and the pattern matcher both lean on (spec §3/§4.2).

use bc_components::{Digest, DigestProvider};

use crate::envelope::EnvelopeCase;
use crate::Envelope;

impl DigestProvider for Envelope {
    fn digest(&self) -> Digest {
        match self.case() {
            EnvelopeCase::Node { digest, .. } => *digest,
            EnvelopeCase::Leaf { digest, .. } => *digest,
            EnvelopeCase::Wrapped { digest, .. } => *digest,
            EnvelopeCase::Assertion(assertion) => assertion.digest(),
            EnvelopeCase::Elided(digest) => *digest,
            #[cfg(feature = "known_value")]
            EnvelopeCase::KnownValue { digest, .. } => *digest,
            #[cfg(feature = "encrypt")]
            EnvelopeCase::Encrypted(message) => message.digest(),
            #[cfg(feature = "compress")]
            EnvelopeCase::Compressed(compressed) => compressed.digest(),
        }
    }
}

impl Envelope {
    /// Every digest reachable within `level_limit` levels of this envelope:
    /// the envelope's own digest, its subject's (if it's a node), and so on
    /// down, but never descending into an obscured subtree.
    pub fn digests(&self, level_limit: usize) -> std::collections::HashSet<Digest> {
        let mut out = std::collections::HashSet::new();
        self.collect_digests(level_limit, &mut out);
        out
    }

    fn collect_digests(&self, level_limit: usize, out: &mut std::collections::HashSet<Digest>) {
        out.insert(self.digest());
        if level_limit == 0 {
            return;
        }
        match self.case() {
            EnvelopeCase::Node { subject, assertions, .. } => {
                subject.collect_digests(level_limit - 1, out);
                for assertion in assertions {
                    assertion.collect_digests(level_limit - 1, out);
                }
            }
            EnvelopeCase::Wrapped { envelope, .. } => envelope.collect_digests(level_limit - 1, out),
            EnvelopeCase::Assertion(assertion) => {
                assertion.predicate().collect_digests(level_limit - 1, out);
                assertion.object().collect_digests(level_limit - 1, out);
            }
            _ => {}
        }
    }

    pub fn deep_digests(&self) -> std::collections::HashSet<Digest> { self.digests(usize::MAX) }

    pub fn shallow_digests(&self) -> std::collections::HashSet<Digest> { self.digests(2) }

    /// A digest over the envelope's *structure*, not just its content:
    /// obscured subtrees contribute a discriminator byte along with their
    /// digest, so two envelopes with the same semantic digest but different
    /// elision/encryption/compression patterns produce different structural
    /// digests. O(size of tree); not suitable as a hot-path equality check.
    pub fn structural_digest(&self) -> Digest {
        let mut image = Vec::new();
        self.push_structural_image(&mut image);
        Digest::from_image(image)
    }

    fn push_structural_image(&self, image: &mut Vec<u8>) {
        match self.case() {
            EnvelopeCase::Elided(digest) => {
                image.push(1);
                image.extend_from_slice(digest.data());
            }
            #[cfg(feature = "encrypt")]
            EnvelopeCase::Encrypted(_) => {
                image.push(0);
                image.extend_from_slice(self.digest().data());
            }
            #[cfg(feature = "compress")]
            EnvelopeCase::Compressed(_) => {
                image.push(2);
                image.extend_from_slice(self.digest().data());
            }
            EnvelopeCase::Node { subject, assertions, .. } => {
                image.push(3);
                subject.push_structural_image(image);
                for assertion in assertions {
                    assertion.push_structural_image(image);
                }
            }
            EnvelopeCase::Wrapped { envelope, .. } => {
                image.push(4);
                envelope.push_structural_image(image);
            }
            EnvelopeCase::Assertion(assertion) => {
                image.push(5);
                assertion.predicate().push_structural_image(image);
                assertion.object().push_structural_image(image);
            }
            _ => {
                image.push(6);
                image.extend_from_slice(self.digest().data());
            }
        }
    }

    /// O(1) semantic equivalence: do these envelopes carry the same content,
    /// ignoring how (or whether) any subtree is obscured?
    pub fn is_equivalent_to(&self, other: &Envelope) -> bool { self.digest() == other.digest() }

    /// O(size of tree) structural identity: same content *and* the same
    /// elision/encryption/compression pattern throughout.
    pub fn is_identical_to(&self, other: &Envelope) -> bool {
        self.is_equivalent_to(other) && self.structural_digest() == other.structural_digest()
    }
}

/// Deliberately no `Eq` impl: structural comparison is O(size of tree), a
/// poor fit for a type people will put in hash sets expecting O(1)
/// comparisons. Use [`Envelope::digest`] or [`Envelope::structural_digest`]
/// as the hash/equality key instead.
impl PartialEq for Envelope {
    fn eq(&self, other: &Self) -> bool { self.is_identical_to(other) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equivalent_but_not_identical_after_elision() {
        let envelope = Envelope::new("Alice").add_assertion("knows", "Bob");
        let elided = envelope.elide_removing_target(&envelope.digest());
        assert!(envelope.is_equivalent_to(&elided));
        assert!(!envelope.is_identical_to(&elided));
    }
}
