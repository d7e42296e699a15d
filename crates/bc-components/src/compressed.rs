//! Compressed opaque envelope payload (DEFLATE), with the original digest
//! preserved so elision and digest comparisons keep working without
//! decompressing (spec §3, §4.2 `compress`/`decompress`).

use std::io::{Read, Write};

use dcbor::prelude::*;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;

use crate::digest::{Digest, DigestProvider};
use crate::error::{ComponentError, Result};
use crate::tags::TAG_COMPRESSED;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {
    checksum: Digest,
    size: usize,
    compressed_data: Vec<u8>,
}

impl Compressed {
    pub fn compress(data: &[u8]) -> Self {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).expect("writing to an in-memory encoder cannot fail");
        let compressed_data = encoder.finish().expect("finishing an in-memory encoder cannot fail");
        Self { checksum: Digest::from_image(data), size: data.len(), compressed_data }
    }

    pub fn decompress(&self) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(self.size);
        DeflateDecoder::new(self.compressed_data.as_slice())
            .read_to_end(&mut data)
            .map_err(|_| ComponentError::InvalidFormat("compressed payload".into()))?;
        if data.len() != self.size || Digest::from_image(&data) != self.checksum {
            return Err(ComponentError::InvalidFormat("compressed payload checksum mismatch".into()));
        }
        Ok(data)
    }
}

impl DigestProvider for Compressed {
    fn digest(&self) -> Digest { self.checksum }
}

impl From<Compressed> for CBOR {
    fn from(compressed: Compressed) -> Self {
        CBOR::tagged_value(
            TAG_COMPRESSED,
            CBOR::array(vec![
                CBOR::from(compressed.checksum),
                CBOR::from(compressed.size as u64),
                CBOR::from(compressed.compressed_data),
            ]),
        )
    }
}

impl TryFrom<CBOR> for Compressed {
    type Error = ComponentError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let (tag, inner) = cbor.as_tagged().ok_or_else(|| ComponentError::InvalidFormat("compressed".into()))?;
        if tag.value() != TAG_COMPRESSED {
            return Err(ComponentError::InvalidTag { tag: tag.value() });
        }
        let items = inner.as_array().ok_or_else(|| ComponentError::InvalidFormat("compressed".into()))?;
        let [checksum, size, compressed_data] = items else {
            return Err(ComponentError::InvalidFormat("compressed".into()));
        };
        Ok(Self {
            checksum: Digest::try_from(checksum.clone())?,
            size: size.as_unsigned().ok_or_else(|| ComponentError::InvalidFormat("compressed size".into()))? as usize,
            compressed_data: compressed_data
                .as_byte_string()
                .ok_or_else(|| ComponentError::InvalidFormat("compressed".into()))?
                .to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_decompress_round_trip() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(4);
        let compressed = Compressed::compress(&data);
        assert_eq!(compressed.decompress().unwrap(), data);
    }

    #[test]
    fn digest_survives_compression() {
        let data = b"hello compressed world";
        let compressed = Compressed::compress(data);
        assert_eq!(compressed.digest(), Digest::from_image(data));
    }
}
