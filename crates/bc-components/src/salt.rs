//! A variable-length salt, at least 8 bytes (spec §3).

use bc_rand::RandomNumberGenerator;
use dcbor::prelude::*;

use crate::error::{ComponentError, Result};
use crate::tags::TAG_SALT;

pub const MIN_SALT_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Salt(Vec<u8>);

impl Salt {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.len() < MIN_SALT_SIZE {
            return Err(ComponentError::InvalidSize { expected: MIN_SALT_SIZE, actual: data.len() });
        }
        Ok(Self(data))
    }

    pub fn new_of_size(rng: &mut impl RandomNumberGenerator, size: usize) -> Result<Self> {
        if size < MIN_SALT_SIZE {
            return Err(ComponentError::InvalidSize { expected: MIN_SALT_SIZE, actual: size });
        }
        Ok(Self(rng.random_data(size)))
    }

    /// A salt sized relative to the data it protects, as the teacher's
    /// envelope salting does: roughly 10-20% of the data's length, with a
    /// floor of `MIN_SALT_SIZE`.
    pub fn new_for_length(rng: &mut impl RandomNumberGenerator, data_len: usize) -> Self {
        let size = (data_len / 5).clamp(MIN_SALT_SIZE, MIN_SALT_SIZE + data_len);
        Self(rng.random_data(size))
    }

    pub fn data(&self) -> &[u8] { &self.0 }
}

impl From<Salt> for CBOR {
    fn from(salt: Salt) -> Self { CBOR::tagged_value(TAG_SALT, salt.0) }
}

impl TryFrom<CBOR> for Salt {
    type Error = ComponentError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let (tag, inner) = cbor.as_tagged().ok_or_else(|| ComponentError::InvalidFormat("salt".into()))?;
        if tag.value() != TAG_SALT {
            return Err(ComponentError::InvalidTag { tag: tag.value() });
        }
        let bytes = inner.as_byte_string().ok_or_else(|| ComponentError::InvalidFormat("salt".into()))?;
        Salt::from_bytes(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_too_short_salt() {
        assert!(Salt::from_bytes(vec![0u8; 4]).is_err());
    }

    #[test]
    fn scales_with_data_length() {
        let mut rng = bc_rand::make_fake_random_number_generator(1);
        let salt = Salt::new_for_length(&mut rng, 1000);
        assert!(salt.data().len() >= MIN_SALT_SIZE);
    }
}
