//! A 32-byte ChaCha20-Poly1305 symmetric key, with real zeroization on drop
//! (spec §5: "key material MUST be zeroized when its owning object is
//! released").

use bc_rand::RandomNumberGenerator;
use dcbor::prelude::*;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::encrypted_message::EncryptedMessage;
use crate::error::{ComponentError, Result};
use crate::tags::TAG_SYMMETRIC_KEY;

pub const SYMMETRIC_KEY_SIZE: usize = bc_crypto::SYMMETRIC_KEY_SIZE;

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; SYMMETRIC_KEY_SIZE]);

impl SymmetricKey {
    pub fn from_bytes(data: [u8; SYMMETRIC_KEY_SIZE]) -> Self { Self(data) }

    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let array: [u8; SYMMETRIC_KEY_SIZE] = data
            .try_into()
            .map_err(|_| ComponentError::InvalidSize { expected: SYMMETRIC_KEY_SIZE, actual: data.len() })?;
        Ok(Self(array))
    }

    pub fn new(rng: &mut impl RandomNumberGenerator) -> Self {
        let mut bytes = [0u8; SYMMETRIC_KEY_SIZE];
        rng.fill_random_data(&mut bytes);
        Self(bytes)
    }

    pub fn data(&self) -> &[u8; SYMMETRIC_KEY_SIZE] { &self.0 }

    /// Encrypts `plaintext` with a fresh nonce, binding `aad` (typically the
    /// pre-encryption digest, spec §4.2).
    pub fn encrypt(
        &self,
        rng: &mut impl RandomNumberGenerator,
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<EncryptedMessage> {
        let nonce = crate::nonce::Nonce::new(rng);
        let (ciphertext, tag) =
            bc_crypto::chacha20_poly1305_encrypt(&self.0, nonce.data(), plaintext, aad);
        Ok(EncryptedMessage::new(ciphertext, nonce, tag, aad.to_vec()))
    }

    pub fn decrypt(&self, message: &EncryptedMessage) -> Result<Vec<u8>> {
        Ok(bc_crypto::chacha20_poly1305_decrypt(
            &self.0,
            message.nonce().data(),
            message.ciphertext(),
            message.auth_tag(),
            message.aad(),
        )?)
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey").field("data", &"<redacted>").finish()
    }
}

impl PartialEq for SymmetricKey {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.0.ct_eq(&other.0).into()
    }
}
impl Eq for SymmetricKey {}

impl From<SymmetricKey> for CBOR {
    fn from(key: SymmetricKey) -> Self { CBOR::tagged_value(TAG_SYMMETRIC_KEY, key.0.to_vec()) }
}

impl TryFrom<CBOR> for SymmetricKey {
    type Error = ComponentError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let (tag, inner) =
            cbor.as_tagged().ok_or_else(|| ComponentError::InvalidFormat("symmetric-key".into()))?;
        if tag.value() != TAG_SYMMETRIC_KEY {
            return Err(ComponentError::InvalidTag { tag: tag.value() });
        }
        SymmetricKey::from_slice(
            inner.as_byte_string().ok_or_else(|| ComponentError::InvalidFormat("symmetric-key".into()))?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_round_trip() {
        let mut rng = bc_rand::make_fake_random_number_generator(3);
        let key = SymmetricKey::new(&mut rng);
        let message = key.encrypt(&mut rng, b"hello world", b"aad").unwrap();
        assert_eq!(key.decrypt(&message).unwrap(), b"hello world");
    }

    #[test]
    fn tampered_aad_fails_to_decrypt() {
        let mut rng = bc_rand::make_fake_random_number_generator(4);
        let key = SymmetricKey::new(&mut rng);
        let mut message = key.encrypt(&mut rng, b"hello world", b"aad").unwrap();
        message.set_aad(b"different".to_vec());
        assert!(key.decrypt(&message).is_err());
    }
}
