//! `wrap`/`unwrap`: introducing or removing a digest boundary (spec §4.2).

use crate::envelope::EnvelopeCase;
use crate::error::{EnvelopeError, Result};
use crate::Envelope;

impl Envelope {
    /// Wraps the whole envelope (subject and assertions together) as the
    /// subject of a new, assertion-less envelope. The wrapped envelope's
    /// digest becomes `Digest::from_digests([inner.digest()])`, distinct
    /// from the inner digest even if the inner envelope has no assertions.
    pub fn wrap_envelope(&self) -> Self { Envelope::new_wrapped(self.clone()) }

    /// Reverses [`Self::wrap_envelope`]: returns the envelope that was
    /// wrapped, or `NotWrapped` if this envelope's subject isn't a `Wrapped`
    /// case.
    pub fn try_unwrap(&self) -> Result<Self> {
        match self.subject().case() {
            EnvelopeCase::Wrapped { envelope, .. } => Ok(envelope.clone()),
            _ => Err(EnvelopeError::NotWrapped),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_components::DigestProvider;

    #[test]
    fn wrap_then_unwrap_round_trips() {
        let envelope = Envelope::new("Alice").add_assertion("knows", "Bob");
        let wrapped = envelope.wrap_envelope();
        assert!(wrapped.is_subject_obscured() == false);
        assert_eq!(wrapped.try_unwrap().unwrap().digest(), envelope.digest());
    }

    #[test]
    fn unwrap_of_unwrapped_envelope_errors() {
        let envelope = Envelope::new("Alice");
        assert!(envelope.try_unwrap().is_err());
        let _ = envelope.digest();
    }
}
