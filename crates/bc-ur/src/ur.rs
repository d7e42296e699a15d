//! `ur:<type>/<bytewords>` single-part and `ur:<type>/<seqNum>-<seqLen>/
//! <bytewords>` multipart textual envelopes (spec §6).

use dcbor::prelude::*;

use crate::bytewords::{self, Style};
use crate::error::{Result, UrError};
use crate::fountain;

const SCHEME: &str = "ur:";

fn validate_type(ur_type: &str) -> Result<()> {
    if ur_type.is_empty()
        || !ur_type.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(UrError::InvalidType(ur_type.to_string()));
    }
    Ok(())
}

/// A decoded single-part UR: a type string plus the dCBOR payload it wraps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ur {
    ur_type: String,
    cbor: Vec<u8>,
}

impl Ur {
    pub fn new(ur_type: impl Into<String>, cbor: Vec<u8>) -> Result<Self> {
        let ur_type = ur_type.into();
        validate_type(&ur_type)?;
        Ok(Self { ur_type, cbor })
    }

    pub fn ur_type(&self) -> &str { &self.ur_type }

    pub fn cbor_bytes(&self) -> &[u8] { &self.cbor }

    pub fn encode(&self) -> String {
        format!("{SCHEME}{}/{}", self.ur_type, bytewords::encode(&self.cbor, Style::Minimal))
    }

    pub fn decode(text: &str) -> Result<Self> {
        let rest = text.strip_prefix(SCHEME).ok_or_else(|| UrError::InvalidUr(text.to_string()))?;
        let (ur_type, tail) = rest.split_once('/').ok_or_else(|| UrError::InvalidUr(text.to_string()))?;
        if tail.contains('/') {
            return Err(UrError::InvalidUr("multipart UR passed to single-part decoder".into()));
        }
        let cbor = bytewords::decode(tail, Style::Minimal)?;
        Ur::new(ur_type, cbor)
    }
}

/// One fragment of a multipart UR, as it appears on the wire:
/// `ur:<type>/<seqNum>-<seqLen>/<bytewords>`, where the bytewords payload
/// dCBOR-encodes `[seqNum, seqLen, messageLen, checksum, fragment]`.
pub fn encode_multipart(ur_type: &str, cbor: &[u8], max_fragment_len: usize) -> Result<Vec<String>> {
    validate_type(ur_type)?;
    let fragment_count = cbor.len().div_ceil(max_fragment_len).max(1);
    // A handful of extra fountain parts beyond the pure fragments gives the
    // receiver slack to recover from any single missing/corrupted part.
    let part_count = fragment_count + fragment_count.div_ceil(2).max(2);
    let parts = fountain::encode(cbor, max_fragment_len, part_count);
    parts
        .into_iter()
        .map(|part| {
            let indices: Vec<CBOR> = part.fragment_indices.iter().map(|&i| CBOR::from(i as u64)).collect();
            let part_cbor = CBOR::array(vec![
                CBOR::from(part.seq_num as u64),
                CBOR::from(part.seq_len as u64),
                CBOR::from(part.message_len as u64),
                CBOR::from(part.checksum as u64),
                CBOR::array(indices),
                CBOR::from(part.payload),
            ]);
            let encoded_bytes =
                dcbor::encode::encode(&part_cbor).map_err(|e| UrError::InvalidPart(e.to_string()))?;
            Ok(format!(
                "{SCHEME}{ur_type}/{}-{}/{}",
                part.seq_num,
                part.seq_len,
                bytewords::encode(&encoded_bytes, Style::Minimal)
            ))
        })
        .collect()
}

/// Accumulates multipart UR fragments (in any order) and returns the
/// recovered dCBOR bytes once enough parts have been received.
#[derive(Debug, Default)]
pub struct MultipartDecoder {
    ur_type: Option<String>,
    inner: fountain::Decoder,
}

impl MultipartDecoder {
    pub fn new() -> Self { Self::default() }

    pub fn is_complete(&self) -> bool { self.inner.is_complete() }

    pub fn receive(&mut self, text: &str) -> Result<()> {
        let rest = text.strip_prefix(SCHEME).ok_or_else(|| UrError::InvalidUr(text.to_string()))?;
        let mut segments = rest.splitn(3, '/');
        let ur_type = segments.next().ok_or_else(|| UrError::InvalidUr(text.to_string()))?;
        let _seq_header = segments.next().ok_or_else(|| UrError::InvalidUr(text.to_string()))?;
        let bytewords_part = segments.next().ok_or_else(|| UrError::InvalidUr(text.to_string()))?;

        match &self.ur_type {
            Some(existing) if existing != ur_type => {
                return Err(UrError::InvalidPart("UR type changed between parts".into()));
            }
            Some(_) => {}
            None => {
                validate_type(ur_type)?;
                self.ur_type = Some(ur_type.to_string());
            }
        }

        let part_bytes = bytewords::decode(bytewords_part, Style::Minimal)?;
        let part_cbor = dcbor::decode::decode(&part_bytes)
            .map_err(|e| UrError::InvalidPart(e.to_string()))?;
        let items = part_cbor
            .as_array()
            .ok_or_else(|| UrError::InvalidPart("multipart fragment".into()))?;
        let [seq_num, seq_len, message_len, checksum, indices, payload] = items else {
            return Err(UrError::InvalidPart("multipart fragment shape".into()));
        };
        let part = fountain::Part {
            seq_num: seq_num.as_unsigned().ok_or_else(|| UrError::InvalidPart("seqNum".into()))? as u32,
            seq_len: seq_len.as_unsigned().ok_or_else(|| UrError::InvalidPart("seqLen".into()))? as u32,
            message_len: message_len
                .as_unsigned()
                .ok_or_else(|| UrError::InvalidPart("messageLen".into()))? as u32,
            checksum: checksum.as_unsigned().ok_or_else(|| UrError::InvalidPart("checksum".into()))? as u32,
            fragment_indices: indices
                .as_array()
                .ok_or_else(|| UrError::InvalidPart("fragmentIndices".into()))?
                .iter()
                .map(|i| i.as_unsigned().map(|v| v as usize))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| UrError::InvalidPart("fragmentIndices".into()))?,
            payload: payload
                .as_byte_string()
                .ok_or_else(|| UrError::InvalidPart("fragment payload".into()))?
                .to_vec(),
        };
        self.inner.receive(part).map_err(Into::into)
    }

    pub fn ur_type(&self) -> Option<&str> { self.ur_type.as_deref() }

    pub fn message(&self) -> Result<Vec<u8>> { self.inner.message() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_part_round_trip() {
        let ur = Ur::new("envelope", b"hello gordian".to_vec()).unwrap();
        let text = ur.encode();
        assert!(text.starts_with("ur:envelope/"));
        let decoded = Ur::decode(&text).unwrap();
        assert_eq!(decoded, ur);
    }

    #[test]
    fn rejects_malformed_type() {
        assert!(Ur::new("Not_Valid", vec![1]).is_err());
    }

    #[test]
    fn multipart_round_trip_out_of_order() {
        let cbor: Vec<u8> = (0..3000u32).map(|i| (i % 241) as u8).collect();
        let parts = encode_multipart("envelope", &cbor, 200).unwrap();

        let mut shuffled = parts;
        shuffled.reverse();

        let mut decoder = MultipartDecoder::new();
        for part in &shuffled {
            decoder.receive(part).unwrap();
            if decoder.is_complete() {
                break;
            }
        }
        assert!(decoder.is_complete());
        assert_eq!(decoder.ur_type(), Some("envelope"));
        assert_eq!(decoder.message().unwrap(), cbor);
    }
}
