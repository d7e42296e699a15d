//! `EncryptedMessage = (nonce, ciphertext, auth_tag, aad?)` (spec §3). Used
//! both for an envelope's encrypted subject and as the payload of a
//! `SealedMessage`.

use bc_crypto::AEAD_TAG_SIZE;
use dcbor::prelude::*;

use crate::digest::{Digest, DigestProvider};
use crate::error::{ComponentError, Result};
use crate::nonce::Nonce;
use crate::tags::TAG_ENCRYPTED;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedMessage {
    ciphertext: Vec<u8>,
    nonce: Nonce,
    auth_tag: [u8; AEAD_TAG_SIZE],
    aad: Vec<u8>,
}

impl EncryptedMessage {
    pub fn new(ciphertext: Vec<u8>, nonce: Nonce, auth_tag: [u8; AEAD_TAG_SIZE], aad: Vec<u8>) -> Self {
        Self { ciphertext, nonce, auth_tag, aad }
    }

    pub fn ciphertext(&self) -> &[u8] { &self.ciphertext }
    pub fn nonce(&self) -> &Nonce { &self.nonce }
    pub fn auth_tag(&self) -> &[u8; AEAD_TAG_SIZE] { &self.auth_tag }
    pub fn aad(&self) -> &[u8] { &self.aad }

    /// Test-only hook for simulating AAD tampering.
    #[cfg(test)]
    pub fn set_aad(&mut self, aad: Vec<u8>) { self.aad = aad; }
}

/// The AAD of an `EncryptedMessage` produced by envelope subject encryption
/// carries exactly the pre-encryption digest (spec §3: "the wire form
/// carries the pre-encryption... digest in its AAD/header and MUST round-trip
/// it"), so it can be recovered without decrypting.
impl DigestProvider for EncryptedMessage {
    fn digest(&self) -> Digest {
        Digest::from_slice(&self.aad).expect("encrypted message AAD is a digest")
    }
}

impl From<EncryptedMessage> for CBOR {
    fn from(message: EncryptedMessage) -> Self {
        CBOR::tagged_value(
            TAG_ENCRYPTED,
            CBOR::array(vec![
                CBOR::from(message.ciphertext),
                CBOR::from(message.nonce),
                CBOR::from(message.auth_tag.to_vec()),
                CBOR::from(message.aad),
            ]),
        )
    }
}

impl TryFrom<CBOR> for EncryptedMessage {
    type Error = ComponentError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let (tag, inner) =
            cbor.as_tagged().ok_or_else(|| ComponentError::InvalidFormat("encrypted-message".into()))?;
        if tag.value() != TAG_ENCRYPTED {
            return Err(ComponentError::InvalidTag { tag: tag.value() });
        }
        let items = inner
            .as_array()
            .ok_or_else(|| ComponentError::InvalidFormat("encrypted-message".into()))?;
        let [ciphertext, nonce, auth_tag, aad] = items else {
            return Err(ComponentError::InvalidFormat("encrypted-message".into()));
        };
        let ciphertext = ciphertext
            .as_byte_string()
            .ok_or_else(|| ComponentError::InvalidFormat("encrypted-message".into()))?
            .to_vec();
        let nonce = Nonce::try_from(nonce.clone())?;
        let auth_tag_bytes = auth_tag
            .as_byte_string()
            .ok_or_else(|| ComponentError::InvalidFormat("encrypted-message".into()))?;
        let auth_tag: [u8; AEAD_TAG_SIZE] = auth_tag_bytes
            .try_into()
            .map_err(|_| ComponentError::InvalidSize { expected: AEAD_TAG_SIZE, actual: auth_tag_bytes.len() })?;
        let aad = aad
            .as_byte_string()
            .ok_or_else(|| ComponentError::InvalidFormat("encrypted-message".into()))?
            .to_vec();
        Ok(Self { ciphertext, nonce, auth_tag, aad })
    }
}
