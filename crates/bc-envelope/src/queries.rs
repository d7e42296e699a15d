//! Reading an envelope's shape: subject/assertions, predicate/object,
//! case predicates, and typed extraction (spec §3/§4.2).

use bc_components::DigestProvider;
use dcbor::prelude::*;

use crate::decodable::EnvelopeDecodable;
use crate::envelope::EnvelopeCase;
use crate::error::{EnvelopeError, Result};
use crate::Envelope;

impl Envelope {
    /// The envelope's subject: itself, unless it's a `Node`, in which case
    /// its subject field.
    pub fn subject(&self) -> Envelope {
        match self.case() {
            EnvelopeCase::Node { subject, .. } => subject.clone(),
            _ => self.clone(),
        }
    }

    pub fn assertions(&self) -> Vec<Envelope> {
        match self.case() {
            EnvelopeCase::Node { assertions, .. } => assertions.clone(),
            _ => Vec::new(),
        }
    }

    pub fn has_assertions(&self) -> bool { !self.assertions().is_empty() }

    pub fn is_node(&self) -> bool { matches!(self.case(), EnvelopeCase::Node { .. }) }
    pub fn is_leaf(&self) -> bool { matches!(self.case(), EnvelopeCase::Leaf { .. }) }
    pub fn is_wrapped(&self) -> bool { matches!(self.case(), EnvelopeCase::Wrapped { .. }) }
    pub fn is_assertion(&self) -> bool { matches!(self.case(), EnvelopeCase::Assertion(_)) }
    pub fn is_elided(&self) -> bool { matches!(self.case(), EnvelopeCase::Elided(_)) }

    #[cfg(feature = "known_value")]
    pub fn is_known_value(&self) -> bool { matches!(self.case(), EnvelopeCase::KnownValue { .. }) }

    #[cfg(feature = "encrypt")]
    pub fn is_encrypted(&self) -> bool { matches!(self.case(), EnvelopeCase::Encrypted(_)) }

    #[cfg(feature = "compress")]
    pub fn is_compressed(&self) -> bool { matches!(self.case(), EnvelopeCase::Compressed(_)) }

    #[cfg(not(feature = "encrypt"))]
    pub fn is_encrypted(&self) -> bool { false }

    #[cfg(not(feature = "compress"))]
    pub fn is_compressed(&self) -> bool { false }

    /// `Node | Wrapped | Assertion`: envelopes with internal structure a
    /// query can walk into.
    pub fn is_internal(&self) -> bool {
        matches!(self.case(), EnvelopeCase::Node { .. } | EnvelopeCase::Wrapped { .. } | EnvelopeCase::Assertion(_))
    }

    /// Whether this envelope's subject (recursively through nested subjects)
    /// is itself an assertion.
    pub fn is_subject_assertion(&self) -> bool { self.subject().is_assertion() }
    pub fn is_subject_elided(&self) -> bool { self.subject().is_elided() }
    pub fn is_subject_encrypted(&self) -> bool { self.subject().is_encrypted() }
    pub fn is_subject_compressed(&self) -> bool { self.subject().is_compressed() }
    pub fn is_subject_obscured(&self) -> bool { self.subject().is_obscured() }

    pub fn as_assertion(&self) -> Option<&crate::Assertion> {
        match self.case() {
            EnvelopeCase::Assertion(assertion) => Some(assertion),
            _ => None,
        }
    }

    pub fn try_assertion(&self) -> Result<&crate::Assertion> {
        self.as_assertion().ok_or(EnvelopeError::NotAssertion)
    }

    /// The predicate of this envelope's subject, if the subject is an
    /// assertion.
    pub fn as_predicate(&self) -> Option<Envelope> {
        self.subject().as_assertion().map(|a| a.predicate().clone())
    }

    pub fn try_predicate(&self) -> Result<Envelope> { self.as_predicate().ok_or(EnvelopeError::NotAssertion) }

    pub fn as_object(&self) -> Option<Envelope> { self.subject().as_assertion().map(|a| a.object().clone()) }

    pub fn try_object(&self) -> Result<Envelope> { self.as_object().ok_or(EnvelopeError::NotAssertion) }

    pub fn as_leaf(&self) -> Option<&CBOR> {
        match self.case() {
            EnvelopeCase::Leaf { cbor, .. } => Some(cbor),
            _ => None,
        }
    }

    pub fn try_leaf(&self) -> Result<&CBOR> { self.as_leaf().ok_or(EnvelopeError::NotLeaf) }

    #[cfg(feature = "known_value")]
    pub fn as_known_value(&self) -> Option<&crate::KnownValue> {
        match self.case() {
            EnvelopeCase::KnownValue { value, .. } => Some(value),
            _ => None,
        }
    }

    #[cfg(feature = "known_value")]
    pub fn try_known_value(&self) -> Result<&crate::KnownValue> {
        self.as_known_value().ok_or(EnvelopeError::NotKnownValue)
    }

    /// Downcasts the subject to a leaf CBOR-decodable type.
    pub fn extract_subject<T: EnvelopeDecodable>(&self) -> Result<T> { T::from_cbor(self.subject().try_leaf()?) }

    /// All assertions on this envelope whose predicate digest matches
    /// `predicate`'s.
    pub fn assertions_with_predicate(&self, predicate: impl crate::EnvelopeEncodable) -> Vec<Envelope> {
        let predicate = predicate.into_envelope();
        self.assertions()
            .into_iter()
            .filter(|assertion| {
                assertion.as_predicate().map(|p| p.digest() == predicate.digest()).unwrap_or(false)
            })
            .collect()
    }

    pub fn assertion_with_predicate(&self, predicate: impl crate::EnvelopeEncodable) -> Result<Envelope> {
        let mut matches = self.assertions_with_predicate(predicate);
        match matches.len() {
            0 => Err(EnvelopeError::NonexistentPredicate),
            1 => Ok(matches.remove(0)),
            _ => Err(EnvelopeError::AmbiguousPredicate),
        }
    }

    pub fn optional_assertion_with_predicate(&self, predicate: impl crate::EnvelopeEncodable) -> Result<Option<Envelope>> {
        let matches = self.assertions_with_predicate(predicate);
        match matches.len() {
            0 => Ok(None),
            1 => Ok(Some(matches.into_iter().next().unwrap())),
            _ => Err(EnvelopeError::AmbiguousPredicate),
        }
    }

    pub fn object_for_predicate(&self, predicate: impl crate::EnvelopeEncodable) -> Result<Envelope> {
        self.assertion_with_predicate(predicate)?.try_object()
    }

    pub fn objects_for_predicate(&self, predicate: impl crate::EnvelopeEncodable) -> Vec<Envelope> {
        self.assertions_with_predicate(predicate).iter().filter_map(|a| a.as_object()).collect()
    }

    pub fn extract_object_for_predicate<T: EnvelopeDecodable>(&self, predicate: impl crate::EnvelopeEncodable) -> Result<T> {
        self.object_for_predicate(predicate)?.extract_subject()
    }

    pub fn extract_optional_object_for_predicate<T: EnvelopeDecodable>(
        &self,
        predicate: impl crate::EnvelopeEncodable,
    ) -> Result<Option<T>> {
        match self.optional_assertion_with_predicate(predicate)? {
            Some(assertion) => Ok(Some(assertion.try_object()?.extract_subject()?)),
            None => Ok(None),
        }
    }

    /// Recursive structural element count: one per node/leaf/assertion/
    /// wrapped/obscured element anywhere in the tree.
    pub fn elements_count(&self) -> usize {
        1 + match self.case() {
            EnvelopeCase::Node { subject, assertions, .. } => {
                subject.elements_count() + assertions.iter().map(|a| a.elements_count()).sum::<usize>()
            }
            EnvelopeCase::Wrapped { envelope, .. } => envelope.elements_count(),
            EnvelopeCase::Assertion(assertion) => {
                assertion.predicate().elements_count() + assertion.object().elements_count()
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_object_for_predicate() {
        let envelope = Envelope::new("Alice").add_assertion("knows", "Bob");
        let object: String = envelope.extract_object_for_predicate("knows").unwrap();
        assert_eq!(object, "Bob");
    }

    #[test]
    fn ambiguous_predicate_is_an_error() {
        let envelope = Envelope::new("Alice").add_assertion("knows", "Bob").add_assertion("knows", "Carol");
        assert!(matches!(envelope.object_for_predicate("knows"), Err(EnvelopeError::AmbiguousPredicate)));
    }
}
