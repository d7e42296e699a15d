//! `compress`/`decompress` (spec §4.2: "same contract [as encrypt] with a
//! compression codec (DEFLATE)" — digest-preserving, reversible).

use bc_components::{Compressed, DigestProvider};

use crate::envelope::{canonical_bytes, EnvelopeCase};
use crate::error::{EnvelopeError, Result};
use crate::Envelope;

impl Envelope {
    /// Compresses the whole envelope (not just its subject) into a single
    /// `Compressed` leaf that still reports the pre-compression digest, so
    /// elision and digest comparisons work without decompressing first.
    pub fn compress(&self) -> Result<Self> {
        if self.is_compressed() {
            return Err(EnvelopeError::AlreadyCompressed);
        }
        if self.is_encrypted() {
            return Err(EnvelopeError::AlreadyEncrypted);
        }
        if self.is_elided() {
            return Err(EnvelopeError::InvalidFormat);
        }
        self.obscure_with_compression()
    }

    pub fn uncompress(&self) -> Result<Self> {
        let compressed = match self.case() {
            EnvelopeCase::Compressed(compressed) => compressed,
            _ => return Err(EnvelopeError::NotCompressed),
        };
        let expected_digest = compressed.digest();
        let data = compressed.decompress()?;
        let result = Envelope::from_tagged_cbor_data(&data)?;
        if result.digest() != expected_digest {
            return Err(EnvelopeError::InvalidDigest);
        }
        Ok(result)
    }

    pub fn compress_subject(&self) -> Result<Self> {
        let subject = self.subject();
        let compressed_subject = subject.compress()?;
        Ok(self.replace_subject(compressed_subject))
    }

    pub fn uncompress_subject(&self) -> Result<Self> {
        let uncompressed_subject = self.subject().uncompress()?;
        Ok(self.replace_subject(uncompressed_subject))
    }

    fn replace_subject(&self, subject: Envelope) -> Self {
        match self.case() {
            EnvelopeCase::Node { assertions, .. } => {
                Envelope::new_with_unchecked_assertions(subject, assertions.clone())
            }
            _ => subject,
        }
    }

    pub(crate) fn obscure_with_compression(&self) -> Result<Self> {
        let data = canonical_bytes(&self.tagged_cbor());
        let compressed = Compressed::compress(&data);
        Ok(Envelope::new_with_compressed(compressed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_then_uncompress_round_trips() {
        let envelope = Envelope::new("Alice").add_assertion("bio", "a".repeat(200));
        let compressed = envelope.compress().unwrap();
        assert!(compressed.is_compressed());
        assert_eq!(compressed.digest(), envelope.digest());
        let restored = compressed.uncompress().unwrap();
        assert_eq!(restored.digest(), envelope.digest());
    }

    #[test]
    fn compressing_twice_errors() {
        let envelope = Envelope::new("Alice").compress().unwrap();
        assert!(envelope.compress().is_err());
    }
}
