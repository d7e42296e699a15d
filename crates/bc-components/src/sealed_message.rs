//! `SealedMessage`: a symmetric-key payload plus a per-recipient KEM
//! encapsulation of that key, the object of an envelope's `'hasRecipient'`
//! assertion (spec §4.2 `addRecipient`).

use bc_rand::RandomNumberGenerator;
use dcbor::prelude::*;

use crate::encapsulation_key::{EncapsulationCiphertext, EncapsulationPrivateKey, EncapsulationPublicKey};
use crate::encrypted_message::EncryptedMessage;
use crate::error::{ComponentError, Result};
use crate::symmetric_key::SymmetricKey;
use crate::tags::TAG_SEALED_MESSAGE;

/// A content key encrypted with a KEM-derived wrapping key, plus the KEM
/// ciphertext the recipient needs to re-derive that wrapping key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedMessage {
    /// The content key, encrypted under a key derived from the KEM shared
    /// secret.
    wrapped_key: EncryptedMessage,
    /// What the recipient's private key decapsulates to recover the shared
    /// secret.
    kem_ciphertext: EncapsulationCiphertext,
}

impl SealedMessage {
    /// Encapsulates `content_key` to `recipient` for inclusion as a
    /// `'hasRecipient'` assertion object alongside the envelope's encrypted
    /// subject.
    pub fn new(
        rng: &mut impl RandomNumberGenerator,
        content_key: &SymmetricKey,
        recipient: &EncapsulationPublicKey,
    ) -> Result<Self> {
        let (shared_secret, kem_ciphertext) = recipient.encapsulate(rng)?;
        let wrapping_key = SymmetricKey::from_bytes(shared_secret);
        let wrapped_key = wrapping_key.encrypt(rng, content_key.data(), &[])?;
        Ok(Self { wrapped_key, kem_ciphertext })
    }

    /// Decapsulates the shared secret with `private_key` and recovers the
    /// content key.
    pub fn decrypt(&self, private_key: &EncapsulationPrivateKey) -> Result<SymmetricKey> {
        let shared_secret = private_key.decapsulate(&self.kem_ciphertext)?;
        let wrapping_key = SymmetricKey::from_bytes(shared_secret);
        let content_key_bytes = wrapping_key.decrypt(&self.wrapped_key)?;
        SymmetricKey::from_slice(&content_key_bytes)
    }
}

impl From<SealedMessage> for CBOR {
    fn from(sealed: SealedMessage) -> Self {
        CBOR::tagged_value(
            TAG_SEALED_MESSAGE,
            CBOR::array(vec![CBOR::from(sealed.wrapped_key), CBOR::from(sealed.kem_ciphertext)]),
        )
    }
}

impl TryFrom<CBOR> for SealedMessage {
    type Error = ComponentError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let (tag, inner) =
            cbor.as_tagged().ok_or_else(|| ComponentError::InvalidFormat("sealed-message".into()))?;
        if tag.value() != TAG_SEALED_MESSAGE {
            return Err(ComponentError::InvalidTag { tag: tag.value() });
        }
        let items = inner.as_array().ok_or_else(|| ComponentError::InvalidFormat("sealed-message".into()))?;
        let [wrapped_key, kem_ciphertext] = items else {
            return Err(ComponentError::InvalidFormat("sealed-message".into()));
        };
        Ok(Self {
            wrapped_key: EncryptedMessage::try_from(wrapped_key.clone())?,
            kem_ciphertext: EncapsulationCiphertext::try_from(kem_ciphertext.clone())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encapsulation_key::EncapsulationPrivateKey;

    #[test]
    fn seal_and_unseal_round_trip() {
        let mut rng = bc_rand::make_fake_random_number_generator(5);
        let private_key = EncapsulationPrivateKey::new_x25519(&mut rng);
        let public_key = private_key.public_key().unwrap();
        let content_key = SymmetricKey::new(&mut rng);

        let sealed = SealedMessage::new(&mut rng, &content_key, &public_key).unwrap();
        let recovered = sealed.decrypt(&private_key).unwrap();
        assert_eq!(recovered, content_key);
    }
}
