//! A 12-byte AEAD nonce (spec §3).

use bc_rand::RandomNumberGenerator;
use dcbor::prelude::*;

use crate::error::{ComponentError, Result};
use crate::tags::TAG_NONCE;

pub const NONCE_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nonce([u8; NONCE_SIZE]);

impl Nonce {
    pub fn from_bytes(data: [u8; NONCE_SIZE]) -> Self { Self(data) }

    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let array: [u8; NONCE_SIZE] = data
            .try_into()
            .map_err(|_| ComponentError::InvalidSize { expected: NONCE_SIZE, actual: data.len() })?;
        Ok(Self(array))
    }

    pub fn new(rng: &mut impl RandomNumberGenerator) -> Self {
        let mut bytes = [0u8; NONCE_SIZE];
        rng.fill_random_data(&mut bytes);
        Self(bytes)
    }

    pub fn data(&self) -> &[u8; NONCE_SIZE] { &self.0 }
}

impl From<Nonce> for CBOR {
    fn from(nonce: Nonce) -> Self { CBOR::tagged_value(TAG_NONCE, nonce.0.to_vec()) }
}

impl TryFrom<CBOR> for Nonce {
    type Error = ComponentError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let (tag, inner) = cbor.as_tagged().ok_or_else(|| ComponentError::InvalidFormat("nonce".into()))?;
        if tag.value() != TAG_NONCE {
            return Err(ComponentError::InvalidTag { tag: tag.value() });
        }
        Nonce::from_slice(inner.as_byte_string().ok_or_else(|| ComponentError::InvalidFormat("nonce".into()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_distinct_nonces() {
        let mut rng = bc_rand::make_fake_random_number_generator(1);
        let a = Nonce::new(&mut rng);
        let b = Nonce::new(&mut rng);
        assert_ne!(a, b);
    }
}
