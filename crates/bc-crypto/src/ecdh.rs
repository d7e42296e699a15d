//! X25519 key agreement.

use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::error::{CryptoError, Result};

pub const X25519_KEY_SIZE: usize = 32;

/// An X25519 private scalar. Zeroized on drop.
#[derive(Clone)]
pub struct X25519PrivateKey(StaticSecret);

impl X25519PrivateKey {
    pub fn from_bytes(bytes: [u8; X25519_KEY_SIZE]) -> Self {
        Self(StaticSecret::from(bytes))
    }

    pub fn generate(rng: &mut impl bc_rand::RandomNumberGenerator) -> Self {
        let mut bytes = [0u8; X25519_KEY_SIZE];
        rng.fill_random_data(&mut bytes);
        Self::from_bytes(bytes)
    }

    pub fn public_key(&self) -> X25519PublicKey {
        X25519PublicKey(PublicKey::from(&self.0))
    }

    pub fn to_bytes(&self) -> [u8; X25519_KEY_SIZE] { self.0.to_bytes() }

    /// Diffie-Hellman agreement, producing the raw shared point (the caller
    /// is expected to run this through HKDF before use as key material).
    pub fn agree(&self, their_public: &X25519PublicKey) -> [u8; 32] {
        self.0.diffie_hellman(&their_public.0).to_bytes()
    }
}

impl Drop for X25519PrivateKey {
    fn drop(&mut self) {
        // `StaticSecret` already zeroizes internally; this makes the
        // intent explicit at this layer too.
        let mut bytes = self.0.to_bytes();
        bytes.zeroize();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct X25519PublicKey(PublicKey);

impl X25519PublicKey {
    pub fn from_bytes(bytes: [u8; X25519_KEY_SIZE]) -> Result<Self> {
        Ok(Self(PublicKey::from(bytes)))
    }

    pub fn to_bytes(&self) -> [u8; X25519_KEY_SIZE] { *self.0.as_bytes() }
}

/// Wire form with the 1-byte DJB type prefix (`0x05`), per spec §3
/// `IdentityKey` and §6 "identity/base keys carried with the 0x05 DJB
/// prefix (33 bytes on the wire, 32 bytes inside the curve)".
pub const DJB_TYPE_PREFIX: u8 = 0x05;

pub fn encode_djb_public_key(key: &X25519PublicKey) -> [u8; 33] {
    let mut out = [0u8; 33];
    out[0] = DJB_TYPE_PREFIX;
    out[1..].copy_from_slice(&key.to_bytes());
    out
}

pub fn decode_djb_public_key(bytes: &[u8]) -> Result<X25519PublicKey> {
    if bytes.len() != 33 {
        return Err(CryptoError::InvalidKeyLength { expected: 33, actual: bytes.len() });
    }
    if bytes[0] != DJB_TYPE_PREFIX {
        return Err(CryptoError::InvalidKey);
    }
    let mut raw = [0u8; 32];
    raw.copy_from_slice(&bytes[1..]);
    X25519PublicKey::from_bytes(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dh_agreement_is_symmetric() {
        let mut rng = bc_rand::make_fake_random_number_generator(1);
        let alice = X25519PrivateKey::generate(&mut rng);
        let bob = X25519PrivateKey::generate(&mut rng);
        let shared_a = alice.agree(&bob.public_key());
        let shared_b = bob.agree(&alice.public_key());
        assert_eq!(shared_a, shared_b);
    }

    #[test]
    fn djb_prefix_round_trips() {
        let mut rng = bc_rand::make_fake_random_number_generator(2);
        let key = X25519PrivateKey::generate(&mut rng).public_key();
        let encoded = encode_djb_public_key(&key);
        assert_eq!(encoded[0], DJB_TYPE_PREFIX);
        let decoded = decode_djb_public_key(&encoded).unwrap();
        assert_eq!(decoded, key);
    }
}
