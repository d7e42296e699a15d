//! eXtensible IDentifier: a 32-byte randomly generated self-describing
//! identifier (spec §3, glossary). XID *document* management (resolving a
//! XID to a set of keys/services) is out of scope here; this crate only
//! provides the identifier type itself.

use bc_rand::RandomNumberGenerator;
use dcbor::prelude::*;

use crate::error::{ComponentError, Result};
use crate::tags::TAG_XID;

pub const XID_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XID([u8; XID_SIZE]);

impl XID {
    pub fn from_bytes(data: [u8; XID_SIZE]) -> Self { Self(data) }

    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let array: [u8; XID_SIZE] = data
            .try_into()
            .map_err(|_| ComponentError::InvalidSize { expected: XID_SIZE, actual: data.len() })?;
        Ok(Self(array))
    }

    pub fn new(rng: &mut impl RandomNumberGenerator) -> Self {
        let mut bytes = [0u8; XID_SIZE];
        rng.fill_random_data(&mut bytes);
        Self(bytes)
    }

    pub fn data(&self) -> &[u8; XID_SIZE] { &self.0 }
    pub fn as_hex(&self) -> String { hex::encode(self.0) }
}

impl From<XID> for CBOR {
    fn from(xid: XID) -> Self { CBOR::tagged_value(TAG_XID, xid.0.to_vec()) }
}

impl TryFrom<CBOR> for XID {
    type Error = ComponentError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let (tag, inner) = cbor.as_tagged().ok_or_else(|| ComponentError::InvalidFormat("xid".into()))?;
        if tag.value() != TAG_XID {
            return Err(ComponentError::InvalidTag { tag: tag.value() });
        }
        XID::from_slice(inner.as_byte_string().ok_or_else(|| ComponentError::InvalidFormat("xid".into()))?)
    }
}
