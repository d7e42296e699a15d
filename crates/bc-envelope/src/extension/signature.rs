//! `sign`/`verify`/`verifyAny` (spec §4.2): signs the subject's digest, not
//! its bytes, so a signature survives re-serialization and stays valid
//! through wrapping.

use bc_components::{DigestProvider, Signature, SigningPrivateKey, SigningPublicKey};
use bc_rand::RandomNumberGenerator;

use crate::error::{EnvelopeError, Result};
use crate::known_values;
use crate::Envelope;

impl Envelope {
    /// Signs this envelope's subject digest with `private_key` and attaches
    /// the signature as a `'verifiedBy'` assertion.
    pub fn add_signature(
        &self,
        rng: &mut impl RandomNumberGenerator,
        private_key: &SigningPrivateKey,
    ) -> Result<Self> {
        let signature = self.make_signature(rng, private_key)?;
        Ok(self.add_assertion(known_values::VERIFIED_BY, signature))
    }

    pub fn add_signatures(
        &self,
        rng: &mut impl RandomNumberGenerator,
        private_keys: &[SigningPrivateKey],
    ) -> Result<Self> {
        let mut result = self.clone();
        for private_key in private_keys {
            result = result.add_signature(rng, private_key)?;
        }
        Ok(result)
    }

    fn make_signature(
        &self,
        rng: &mut impl RandomNumberGenerator,
        private_key: &SigningPrivateKey,
    ) -> Result<Signature> {
        let digest = self.subject().digest();
        Ok(private_key.sign(rng, digest.data())?)
    }

    /// All `'verifiedBy'` assertion objects, as `Signature`s.
    pub fn signatures(&self) -> Result<Vec<Signature>> {
        self.assertions_with_predicate(known_values::VERIFIED_BY)
            .iter()
            .map(|assertion| {
                let object = assertion.as_object().ok_or(EnvelopeError::InvalidFormat)?;
                object.extract_subject::<Signature>()
            })
            .collect()
    }

    /// Verifies that at least one attached signature is valid under
    /// `public_key`.
    pub fn verify_signature(&self, public_key: &SigningPublicKey) -> Result<()> {
        let digest = self.subject().digest();
        let signatures = self.signatures()?;
        if signatures.iter().any(|signature| public_key.verify(digest.data(), signature)) {
            Ok(())
        } else {
            Err(EnvelopeError::UnverifiedSignature)
        }
    }

    /// Verifies that every key in `public_keys` has a valid signature among
    /// those attached (useful for multi-signature threshold policies).
    pub fn verify_signatures_from(&self, public_keys: &[SigningPublicKey]) -> Result<()> {
        for public_key in public_keys {
            self.verify_signature(public_key)?;
        }
        Ok(())
    }

    /// Verifies that at least one of `public_keys` has a valid signature
    /// among those attached.
    pub fn verify_signature_from_any(&self, public_keys: &[SigningPublicKey]) -> Result<()> {
        if public_keys.iter().any(|public_key| self.verify_signature(public_key).is_ok()) {
            Ok(())
        } else {
            Err(EnvelopeError::UnverifiedSignature)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_succeeds() {
        let mut rng = bc_rand::make_fake_random_number_generator(3);
        let (private_key, public_key) = SigningPrivateKey::new_ed25519(&mut rng);

        let envelope = Envelope::new("Alice").add_assertion("knows", "Bob");
        let signed = envelope.add_signature(&mut rng, &private_key).unwrap();
        assert_eq!(signed.subject().digest(), envelope.subject().digest());
        signed.verify_signature(&public_key).unwrap();
    }

    #[test]
    fn verify_with_wrong_key_fails() {
        let mut rng = bc_rand::make_fake_random_number_generator(4);
        let (private_key, _public_key) = SigningPrivateKey::new_ed25519(&mut rng);
        let (_wrong_private_key, wrong_public_key) = SigningPrivateKey::new_ed25519(&mut rng);

        let envelope = Envelope::new("Alice");
        let signed = envelope.add_signature(&mut rng, &private_key).unwrap();
        assert!(signed.verify_signature(&wrong_public_key).is_err());
    }

    #[test]
    fn verify_signature_from_any_accepts_one_matching_key() {
        let mut rng = bc_rand::make_fake_random_number_generator(9);
        let (private_key, public_key) = SigningPrivateKey::new_ed25519(&mut rng);
        let (_other_private_key, other_public_key) = SigningPrivateKey::new_ed25519(&mut rng);

        let envelope = Envelope::new("Alice").add_signature(&mut rng, &private_key).unwrap();
        envelope.verify_signature_from_any(&[other_public_key, public_key]).unwrap();
    }
}
