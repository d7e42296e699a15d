//! Selective elision/obscuring (spec §4.2: `elide(set<Digest>)` must be
//! digest-preserving; "an implementation MUST refuse to elide in a way that
//! would change the root digest or leave dangling references").

use std::collections::HashSet;

use bc_components::{Digest, DigestProvider};
#[cfg(feature = "encrypt")]
use bc_components::SymmetricKey;

use crate::envelope::EnvelopeCase;
use crate::error::{EnvelopeError, Result};
use crate::Envelope;

/// What an obscured subtree becomes.
#[derive(Clone)]
pub enum ObscureAction {
    Elide,
    #[cfg(feature = "encrypt")]
    Encrypt(SymmetricKey),
    #[cfg(feature = "compress")]
    Compress,
}

impl Envelope {
    /// Replaces this whole envelope with `Elided(self.digest())`, unless
    /// it's already elided.
    pub fn elide(&self) -> Self {
        if self.is_elided() {
            self.clone()
        } else {
            Envelope::new_elided(self.digest())
        }
    }

    fn apply_obscure_action(&self, action: &ObscureAction) -> Result<Self> {
        match action {
            ObscureAction::Elide => Ok(self.elide()),
            #[cfg(feature = "encrypt")]
            ObscureAction::Encrypt(key) => self.obscure_with_encryption(key),
            #[cfg(feature = "compress")]
            ObscureAction::Compress => self.obscure_with_compression(),
        }
    }

    /// Elides every subtree whose digest is in `target`; `is_revealing`
    /// flips the test so `target` instead names what must be *kept*.
    pub fn elide_set_with_action(&self, target: &HashSet<Digest>, action: &ObscureAction, is_revealing: bool) -> Self {
        let in_target = target.contains(&self.digest());
        if in_target != is_revealing {
            return self.apply_obscure_action(action).unwrap_or_else(|_| self.elide());
        }
        match self.case() {
            EnvelopeCase::Assertion(assertion) => {
                let predicate = assertion.predicate().elide_set_with_action(target, action, is_revealing);
                let object = assertion.object().elide_set_with_action(target, action, is_revealing);
                let result = Envelope::new_with_assertion(crate::Assertion::new(predicate, object));
                assert_eq!(result.digest(), self.digest());
                result
            }
            EnvelopeCase::Node { subject, assertions, .. } => {
                let new_subject = subject.elide_set_with_action(target, action, is_revealing);
                let new_assertions: Vec<Envelope> =
                    assertions.iter().map(|a| a.elide_set_with_action(target, action, is_revealing)).collect();
                let result = Envelope::new_with_unchecked_assertions(new_subject, new_assertions);
                assert_eq!(result.digest(), self.digest());
                result
            }
            EnvelopeCase::Wrapped { envelope, .. } => {
                let inner = envelope.elide_set_with_action(target, action, is_revealing);
                let result = Envelope::new_wrapped(inner);
                assert_eq!(result.digest(), self.digest());
                result
            }
            _ => self.clone(),
        }
    }

    pub fn elide_set(&self, target: &HashSet<Digest>) -> Self {
        self.elide_set_with_action(target, &ObscureAction::Elide, false)
    }

    pub fn elide_revealing_set(&self, target: &HashSet<Digest>) -> Self {
        self.elide_set_with_action(target, &ObscureAction::Elide, true)
    }

    pub fn elide_array_with_action(&self, target: &[Digest], action: &ObscureAction, is_revealing: bool) -> Self {
        self.elide_set_with_action(&target.iter().copied().collect(), action, is_revealing)
    }

    pub fn elide_array(&self, target: &[Digest]) -> Self {
        self.elide_array_with_action(target, &ObscureAction::Elide, false)
    }

    pub fn elide_revealing_array(&self, target: &[Digest]) -> Self {
        self.elide_array_with_action(target, &ObscureAction::Elide, true)
    }

    pub fn elide_target_with_action(&self, target: &Envelope, action: &ObscureAction, is_revealing: bool) -> Self {
        self.elide_set_with_action(&HashSet::from([target.digest()]), action, is_revealing)
    }

    pub fn elide_removing_target(&self, target: &Digest) -> Self {
        self.elide_set_with_action(&HashSet::from([*target]), &ObscureAction::Elide, false)
    }

    pub fn elide_revealing_target(&self, target: &Envelope) -> Self {
        self.elide_target_with_action(target, &ObscureAction::Elide, true)
    }

    /// Restores a previously-elided subtree, given the envelope it elided.
    /// The digests must match, or the original tree is corrupt or the wrong
    /// replacement is being offered.
    pub fn unelide(&self, envelope: &Envelope) -> Result<Self> {
        if self.digest() != envelope.digest() {
            return Err(EnvelopeError::InvalidDigest);
        }
        Ok(envelope.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eliding_target_preserves_root_digest() {
        let envelope = Envelope::new("Alice").add_assertion("knows", "Bob").add_assertion("age", 30);
        let bob_object = envelope.assertions_with_predicate("knows")[0].as_object().unwrap();
        let elided = envelope.elide_removing_target(&bob_object.digest());
        assert_eq!(elided.digest(), envelope.digest());
        assert!(elided.assertions_with_predicate("knows")[0].as_object().unwrap().is_elided());
    }

    #[test]
    fn elide_revealing_keeps_only_named_subtrees() {
        let envelope = Envelope::new("Alice").add_assertion("knows", "Bob");
        let subject = envelope.subject();
        let revealed = HashSet::from([envelope.digest(), subject.digest()]);
        let elided = envelope.elide_revealing_set(&revealed);
        assert_eq!(elided.digest(), envelope.digest());
        assert!(!elided.subject().is_elided());
        assert!(elided.assertions()[0].is_elided());
    }
}
