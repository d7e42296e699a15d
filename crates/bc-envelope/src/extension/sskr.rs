//! Envelope-level SSKR (spec §4.4): splits a content key, encrypts the
//! subject under it, and attaches one `'sskrShare'` assertion per share so
//! the envelope carries its own recovery material.

use bc_components::{DigestProvider, SymmetricKey};
use bc_rand::RandomNumberGenerator;
use sskr::{SskrShare, SskrSpec};

use crate::error::{EnvelopeError, Result};
use crate::known_values;
use crate::Envelope;

impl Envelope {
    /// Encrypts the subject under a fresh content key, splits that key per
    /// `spec`, and attaches every resulting share as a `'sskrShare'`
    /// assertion. Returns the groups of shares alongside the envelope so
    /// callers can distribute them.
    pub fn sskr_split(
        &self,
        rng: &mut impl RandomNumberGenerator,
        spec: &SskrSpec,
    ) -> Result<(Self, Vec<Vec<SskrShare>>)> {
        let content_key = SymmetricKey::new(rng);
        let encrypted = self.encrypt_subject(&content_key)?;
        let groups = sskr::split(rng, spec, content_key.data())?;
        let mut result = encrypted;
        for group in &groups {
            for share in group {
                result = result.add_assertion(known_values::SSKR_SHARE, share.to_bytes());
            }
        }
        Ok((result, groups))
    }

    /// All `'sskrShare'` assertion objects, decoded back into `SskrShare`s.
    pub fn sskr_shares(&self) -> Result<Vec<SskrShare>> {
        self.assertions_with_predicate(known_values::SSKR_SHARE)
            .iter()
            .map(|assertion| {
                let object = assertion.as_object().ok_or(EnvelopeError::InvalidFormat)?;
                let bytes = object.extract_subject::<Vec<u8>>()?;
                Ok(SskrShare::from_bytes(&bytes)?)
            })
            .collect()
    }

    /// Recovers the content key from a sufficient quorum of `shares` and
    /// decrypts the subject with it.
    pub fn sskr_join(&self, shares: &[SskrShare]) -> Result<Self> {
        let content_key_bytes = sskr::combine(shares)?;
        let content_key = SymmetricKey::from_slice(&content_key_bytes)?;
        self.decrypt_subject(&content_key)
    }
}

#[cfg(test)]
mod tests {
    use sskr::SskrGroupSpec;

    use super::*;

    #[test]
    fn split_then_join_recovers_the_subject() {
        let mut rng = bc_rand::make_fake_random_number_generator(20);
        let envelope = Envelope::new("Alice").add_assertion("knows", "Bob");
        let spec = SskrSpec::new(1, vec![SskrGroupSpec::new(2, 3)]);

        let (shared, groups) = envelope.sskr_split(&mut rng, &spec).unwrap();
        assert_eq!(shared.digest(), envelope.digest());

        let shares = shared.sskr_shares().unwrap();
        assert_eq!(shares.len(), 3);

        let quorum = vec![groups[0][0].clone(), groups[0][2].clone()];
        let recovered = shared.sskr_join(&quorum).unwrap();
        assert_eq!(recovered.digest(), envelope.digest());
    }

    #[test]
    fn joining_with_insufficient_shares_fails() {
        let mut rng = bc_rand::make_fake_random_number_generator(21);
        let envelope = Envelope::new("Alice");
        let spec = SskrSpec::new(1, vec![SskrGroupSpec::new(2, 3)]);

        let (shared, groups) = envelope.sskr_split(&mut rng, &spec).unwrap();
        let insufficient = vec![groups[0][0].clone()];
        assert!(shared.sskr_join(&insufficient).is_err());
    }
}
