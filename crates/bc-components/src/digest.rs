//! 32-byte SHA-256 content digests (spec §3: "All content-addressable
//! identity derives from digests").

use dcbor::prelude::*;

use crate::error::{ComponentError, Result};
use crate::tags::TAG_DIGEST;

pub const DIGEST_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    pub fn from_bytes(data: [u8; DIGEST_SIZE]) -> Self { Self(data) }

    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let array: [u8; DIGEST_SIZE] = data
            .try_into()
            .map_err(|_| ComponentError::InvalidSize { expected: DIGEST_SIZE, actual: data.len() })?;
        Ok(Self(array))
    }

    /// Hashes `image` and returns its digest.
    pub fn from_image(image: impl AsRef<[u8]>) -> Self { Self(bc_crypto::sha256(image.as_ref())) }

    /// A digest binding a sequence of digests together, used for
    /// `Node`/`Assertion` digest composition (spec §3: `SHA-256(subject.digest
    /// ∥ sort(assertions))`, `SHA-256(pred.digest ∥ obj.digest)`). The inputs'
    /// bytes are concatenated in the order given and hashed once.
    pub fn from_digests(digests: &[Digest]) -> Self {
        let mut image = Vec::with_capacity(digests.len() * DIGEST_SIZE);
        for digest in digests {
            image.extend_from_slice(&digest.0);
        }
        Self::from_image(image)
    }

    /// A digest binding exactly two digests together.
    pub fn from_digest_pair(a: &Digest, b: &Digest) -> Self {
        Self(bc_crypto::sha256_pair(&a.0, &b.0))
    }

    pub fn data(&self) -> &[u8; DIGEST_SIZE] { &self.0 }
    pub fn as_hex(&self) -> String { hex::encode(self.0) }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Digest({})", self.as_hex())
    }
}

/// Implemented by any type with a well-defined content digest.
pub trait DigestProvider {
    fn digest(&self) -> Digest;
}

impl DigestProvider for Digest {
    fn digest(&self) -> Digest { *self }
}

impl From<Digest> for CBOR {
    fn from(digest: Digest) -> Self { CBOR::tagged_value(TAG_DIGEST, digest.0.to_vec()) }
}

impl TryFrom<CBOR> for Digest {
    type Error = ComponentError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let (tag, inner) = cbor
            .as_tagged()
            .ok_or_else(|| ComponentError::InvalidFormat("digest".into()))?;
        if tag.value() != TAG_DIGEST {
            return Err(ComponentError::InvalidTag { tag: tag.value() });
        }
        let bytes = inner
            .as_byte_string()
            .ok_or_else(|| ComponentError::InvalidFormat("digest".into()))?;
        Digest::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_of_known_bytes() {
        let digest = Digest::from_image([]);
        assert_eq!(digest.as_hex(), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
    }

    #[test]
    fn round_trips_through_cbor() {
        let digest = Digest::from_image(b"hello");
        let cbor: CBOR = digest.into();
        assert_eq!(Digest::try_from(cbor).unwrap(), digest);
    }
}
