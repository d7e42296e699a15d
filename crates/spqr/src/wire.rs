//! Chunked-mode ciphertext splitting (spec §4.3.3): the 1088-byte ML-KEM-768
//! ciphertext is carried as two wire chunks, `ct1` (the first 960 bytes) and
//! `ct2` (the last 128 bytes), with a single MAC over their concatenation.

use crate::error::{Result, SpqrError};

pub const ML_KEM_768_CIPHERTEXT_LEN: usize = 1088;
pub const CT1_LEN: usize = 960;
pub const CT2_LEN: usize = ML_KEM_768_CIPHERTEXT_LEN - CT1_LEN;

pub fn split_ciphertext(ct: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    if ct.len() != ML_KEM_768_CIPHERTEXT_LEN {
        return Err(SpqrError::InvalidFormat);
    }
    Ok((ct[..CT1_LEN].to_vec(), ct[CT1_LEN..].to_vec()))
}

pub fn join_ciphertext(ct1: &[u8], ct2: &[u8]) -> Result<Vec<u8>> {
    if ct1.len() != CT1_LEN || ct2.len() != CT2_LEN {
        return Err(SpqrError::InvalidFormat);
    }
    let mut out = Vec::with_capacity(ML_KEM_768_CIPHERTEXT_LEN);
    out.extend_from_slice(ct1);
    out.extend_from_slice(ct2);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_then_join_round_trips() {
        let ct: Vec<u8> = (0..ML_KEM_768_CIPHERTEXT_LEN).map(|i| (i % 256) as u8).collect();
        let (ct1, ct2) = split_ciphertext(&ct).unwrap();
        assert_eq!(ct1.len(), CT1_LEN);
        assert_eq!(ct2.len(), CT2_LEN);
        assert_eq!(join_ciphertext(&ct1, &ct2).unwrap(), ct);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(split_ciphertext(&[0u8; 10]), Err(SpqrError::InvalidFormat)));
    }
}
