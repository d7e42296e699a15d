//! `addRecipient`/`decryptToRecipient` (spec §4.2): multi-recipient envelope
//! encryption built from a single symmetric content key, sealed once per
//! recipient's public key via KEM encapsulation.

use bc_components::{
    EncapsulationPrivateKey, EncapsulationPublicKey, SealedMessage, SymmetricKey,
};
use bc_rand::RandomNumberGenerator;

use crate::error::{EnvelopeError, Result};
use crate::known_values;
use crate::Envelope;

impl Envelope {
    /// Encrypts the subject under a fresh content key and adds one
    /// `'hasRecipient'` assertion per entry in `recipients`, each sealing
    /// that same content key to a different public key.
    pub fn encrypt_subject_to_recipients(
        &self,
        rng: &mut impl RandomNumberGenerator,
        recipients: &[EncapsulationPublicKey],
    ) -> Result<Self> {
        let content_key = SymmetricKey::new(rng);
        let mut result = self.encrypt_subject(&content_key)?;
        for recipient in recipients {
            result = result.add_recipient(rng, &content_key, recipient)?;
        }
        Ok(result)
    }

    pub fn encrypt_subject_to_recipient(
        &self,
        rng: &mut impl RandomNumberGenerator,
        recipient: &EncapsulationPublicKey,
    ) -> Result<Self> {
        self.encrypt_subject_to_recipients(rng, std::slice::from_ref(recipient))
    }

    /// Adds a `'hasRecipient': SealedMessage` assertion sealing `content_key`
    /// to `recipient`, without touching the (already encrypted) subject.
    pub fn add_recipient(
        &self,
        rng: &mut impl RandomNumberGenerator,
        content_key: &SymmetricKey,
        recipient: &EncapsulationPublicKey,
    ) -> Result<Self> {
        let sealed_message = SealedMessage::new(rng, content_key, recipient)?;
        Ok(self.add_assertion(known_values::HAS_RECIPIENT, sealed_message))
    }

    /// All `'hasRecipient'` assertion objects, as `SealedMessage`s.
    pub fn recipients(&self) -> Result<Vec<SealedMessage>> {
        self.assertions_with_predicate(known_values::HAS_RECIPIENT)
            .iter()
            .map(|assertion| {
                let object = assertion.as_object().ok_or(EnvelopeError::InvalidFormat)?;
                object.extract_subject::<SealedMessage>()
            })
            .collect()
    }

    /// Tries every `'hasRecipient'` sealed message against `private_key`,
    /// decrypting the subject with whichever one unseals.
    pub fn decrypt_to_recipient(&self, private_key: &EncapsulationPrivateKey) -> Result<Self> {
        let sealed_messages = self.recipients()?;
        for sealed_message in &sealed_messages {
            if let Ok(content_key) = sealed_message.decrypt(private_key) {
                if let Ok(decrypted) = self.decrypt_subject(&content_key) {
                    return Ok(decrypted);
                }
            }
        }
        Err(EnvelopeError::InvalidRecipient)
    }
}

#[cfg(test)]
mod tests {
    use bc_components::DigestProvider;

    use super::*;

    #[test]
    fn encrypt_then_decrypt_to_recipient_round_trips() {
        let mut rng = bc_rand::make_fake_random_number_generator(7);
        let private_key = EncapsulationPrivateKey::new_x25519(&mut rng);
        let public_key = private_key.public_key().unwrap();

        let envelope = Envelope::new("Alice").add_assertion("knows", "Bob");
        let sealed = envelope.encrypt_subject_to_recipient(&mut rng, &public_key).unwrap();
        assert_eq!(sealed.digest(), envelope.digest());

        let opened = sealed.decrypt_to_recipient(&private_key).unwrap();
        assert_eq!(opened.digest(), envelope.digest());
    }

    #[test]
    fn decrypting_with_wrong_recipient_key_fails() {
        let mut rng = bc_rand::make_fake_random_number_generator(8);
        let private_key = EncapsulationPrivateKey::new_x25519(&mut rng);
        let public_key = private_key.public_key().unwrap();
        let wrong_private_key = EncapsulationPrivateKey::new_x25519(&mut rng);

        let envelope = Envelope::new("Alice");
        let sealed = envelope.encrypt_subject_to_recipient(&mut rng, &public_key).unwrap();
        assert!(sealed.decrypt_to_recipient(&wrong_private_key).is_err());
    }
}
