//! Adding assertions to an envelope (spec §4.2: `addAssertion` — "idempotent
//! if the assertion already exists, by digest").

use bc_components::DigestProvider;

use crate::envelope::EnvelopeCase;
use crate::{Envelope, EnvelopeEncodable};

impl Envelope {
    /// Adds `predicate: object` as a new assertion, building it into a
    /// `Node` around the current envelope (wrapping first if the current
    /// envelope is itself an assertion, so the result is always a proper
    /// subject-with-assertions node).
    pub fn add_assertion(&self, predicate: impl EnvelopeEncodable, object: impl EnvelopeEncodable) -> Self {
        self.add_assertion_envelope(Envelope::new_assertion(predicate, object))
    }

    /// Adds an already-built assertion envelope (or an obscured stand-in for
    /// one). Idempotent by digest: adding the same assertion twice leaves
    /// the set of assertions unchanged.
    pub fn add_assertion_envelope(&self, assertion: impl EnvelopeEncodable) -> Self {
        let assertion = assertion.into_envelope();
        let (subject, mut assertions) = match self.case() {
            EnvelopeCase::Node { subject, assertions, .. } => (subject.clone(), assertions.clone()),
            _ => (self.clone(), Vec::new()),
        };
        if !assertions.iter().any(|existing| existing.digest() == assertion.digest()) {
            assertions.push(assertion);
        }
        Envelope::new_with_unchecked_assertions(subject, assertions)
    }

    /// As [`Self::add_assertion`], but only adds anything when `object` is
    /// `Some`; `None` leaves the envelope unchanged.
    pub fn add_optional_assertion(
        &self,
        predicate: impl EnvelopeEncodable,
        object: Option<impl EnvelopeEncodable>,
    ) -> Self {
        match object {
            Some(object) => self.add_assertion(predicate, object),
            None => self.clone(),
        }
    }

    pub fn add_assertion_envelopes(&self, assertions: &[Envelope]) -> Self {
        assertions.iter().fold(self.clone(), |envelope, assertion| envelope.add_assertion_envelope(assertion.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_the_same_assertion_twice_is_idempotent() {
        let once = Envelope::new("Alice").add_assertion("knows", "Bob");
        let twice = once.add_assertion("knows", "Bob");
        assert_eq!(once.assertions().len(), twice.assertions().len());
        assert_eq!(once.digest(), twice.digest());
    }
}
