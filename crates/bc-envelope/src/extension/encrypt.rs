//! `encryptSubject`/`decryptSubject` (spec §4.2: "replaces the subject with
//! an `Encrypted` node; AAD carries the pre-encryption subject digest, which
//! is verified on decrypt").

use bc_components::{DigestProvider, SymmetricKey};

use crate::envelope::{canonical_bytes, EnvelopeCase};
use crate::error::{EnvelopeError, Result};
use crate::Envelope;

impl Envelope {
    /// Encrypts this envelope's subject under `key`. The AAD is the
    /// subject's own digest, so [`Self::decrypt_subject`] can confirm the
    /// recovered plaintext is exactly what was encrypted before trusting it.
    pub fn encrypt_subject(&self, key: &SymmetricKey) -> Result<Self> {
        let subject = self.subject();
        if subject.is_encrypted() {
            return Err(EnvelopeError::AlreadyEncrypted);
        }
        if subject.is_elided() {
            return Err(EnvelopeError::InvalidFormat);
        }
        let encrypted_subject = subject.obscure_with_encryption(key)?;
        let result = match self.case() {
            EnvelopeCase::Node { assertions, .. } => {
                Envelope::new_with_unchecked_assertions(encrypted_subject, assertions.clone())
            }
            _ => encrypted_subject,
        };
        debug_assert_eq!(result.digest(), self.digest());
        Ok(result)
    }

    /// Reverses [`Self::encrypt_subject`]: decrypts the subject and checks
    /// the recovered envelope's digest against the one carried in the AAD.
    pub fn decrypt_subject(&self, key: &SymmetricKey) -> Result<Self> {
        let subject = self.subject();
        let message = match subject.case() {
            EnvelopeCase::Encrypted(message) => message,
            _ => return Err(EnvelopeError::NotEncrypted),
        };
        let expected_digest = message.digest();
        let plaintext = key.decrypt(message)?;
        let recovered = Envelope::from_tagged_cbor_data(&plaintext)?;
        if recovered.digest() != expected_digest {
            return Err(EnvelopeError::InvalidDigest);
        }
        let result = match self.case() {
            EnvelopeCase::Node { assertions, .. } => {
                Envelope::new_with_unchecked_assertions(recovered, assertions.clone())
            }
            _ => recovered,
        };
        if result.digest() != self.digest() {
            return Err(EnvelopeError::InvalidDigest);
        }
        Ok(result)
    }

    /// Replaces `self` wholesale with its `Encrypted` form, used both by
    /// `encrypt_subject` and by [`crate::elide::ObscureAction::Encrypt`].
    pub(crate) fn obscure_with_encryption(&self, key: &SymmetricKey) -> Result<Self> {
        let mut rng = bc_rand::SecureRandomNumberGenerator;
        let digest = self.digest();
        let plaintext = canonical_bytes(&self.tagged_cbor());
        let message = key.encrypt(&mut rng, &plaintext, digest.data())?;
        Ok(Envelope::new_with_encrypted(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_then_decrypt_round_trips() {
        let mut rng = bc_rand::make_fake_random_number_generator(1);
        let key = SymmetricKey::new(&mut rng);
        let envelope = Envelope::new("Alice").add_assertion("knows", "Bob");
        let encrypted = envelope.encrypt_subject(&key).unwrap();
        assert!(encrypted.is_subject_encrypted());
        assert_eq!(encrypted.digest(), envelope.digest());
        let decrypted = encrypted.decrypt_subject(&key).unwrap();
        assert_eq!(decrypted.digest(), envelope.digest());
    }

    #[test]
    fn decrypting_with_wrong_key_fails() {
        let mut rng = bc_rand::make_fake_random_number_generator(2);
        let key = SymmetricKey::new(&mut rng);
        let wrong_key = SymmetricKey::new(&mut rng);
        let envelope = Envelope::new("Alice");
        let encrypted = envelope.encrypt_subject(&key).unwrap();
        assert!(encrypted.decrypt_subject(&wrong_key).is_err());
    }
}
