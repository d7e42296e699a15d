//! Apparently Random Identifier: a 32-byte randomly generated reference,
//! never derived from content (spec §3, glossary).

use bc_rand::RandomNumberGenerator;
use dcbor::prelude::*;

use crate::error::{ComponentError, Result};
use crate::tags::TAG_ARID;

pub const ARID_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ARID([u8; ARID_SIZE]);

impl ARID {
    pub fn from_bytes(data: [u8; ARID_SIZE]) -> Self { Self(data) }

    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let array: [u8; ARID_SIZE] = data
            .try_into()
            .map_err(|_| ComponentError::InvalidSize { expected: ARID_SIZE, actual: data.len() })?;
        Ok(Self(array))
    }

    pub fn new(rng: &mut impl RandomNumberGenerator) -> Self {
        let mut bytes = [0u8; ARID_SIZE];
        rng.fill_random_data(&mut bytes);
        Self(bytes)
    }

    pub fn data(&self) -> &[u8; ARID_SIZE] { &self.0 }
    pub fn as_hex(&self) -> String { hex::encode(self.0) }
}

impl From<ARID> for CBOR {
    fn from(arid: ARID) -> Self { CBOR::tagged_value(TAG_ARID, arid.0.to_vec()) }
}

impl TryFrom<CBOR> for ARID {
    type Error = ComponentError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let (tag, inner) = cbor.as_tagged().ok_or_else(|| ComponentError::InvalidFormat("arid".into()))?;
        if tag.value() != TAG_ARID {
            return Err(ComponentError::InvalidTag { tag: tag.value() });
        }
        ARID::from_slice(inner.as_byte_string().ok_or_else(|| ComponentError::InvalidFormat("arid".into()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_arids_are_not_content_derived() {
        let mut rng = bc_rand::make_fake_random_number_generator(7);
        let a = ARID::new(&mut rng);
        let b = ARID::new(&mut rng);
        assert_ne!(a, b);
    }
}
