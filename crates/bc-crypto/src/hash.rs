//! SHA-256, HMAC-SHA256, HKDF-SHA256 and BLAKE2b.

use blake2::Blake2bVar;
use blake2::digest::{Update, VariableOutput};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::error::{CryptoError, Result};

pub const SHA256_SIZE: usize = 32;

/// `SHA-256(data)`.
pub fn sha256(data: impl AsRef<[u8]>) -> [u8; SHA256_SIZE] {
    let digest = Sha256::digest(data.as_ref());
    let mut out = [0u8; SHA256_SIZE];
    out.copy_from_slice(&digest);
    out
}

/// `SHA-256(a ∥ b)`, the envelope-digest combining step (spec §3: `Node`,
/// `Assertion`, and `Wrapped` digests are all SHA-256 of a concatenation of
/// prior digests).
pub fn sha256_pair(a: &[u8], b: &[u8]) -> [u8; SHA256_SIZE] {
    let mut hasher = Sha256::new();
    Digest::update(&mut hasher, a);
    Digest::update(&mut hasher, b);
    let digest = hasher.finalize();
    let mut out = [0u8; SHA256_SIZE];
    out.copy_from_slice(&digest);
    out
}

/// `HMAC-SHA256(key, data)`, truncated to `out_len` bytes.
pub fn hmac_sha256(key: &[u8], data: &[u8], out_len: usize) -> Vec<u8> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .expect("HMAC accepts a key of any length");
    Mac::update(&mut mac, data);
    let full = mac.finalize().into_bytes();
    full[..out_len.min(full.len())].to_vec()
}

/// Full-width `HMAC-SHA256(key, data)`.
pub fn hmac_sha256_full(key: &[u8], data: &[u8]) -> [u8; 32] {
    let v = hmac_sha256(key, data, 32);
    let mut out = [0u8; 32];
    out.copy_from_slice(&v);
    out
}

/// `HKDF-SHA256(salt, ikm, info)` expanded to `len` bytes.
pub fn hkdf_sha256(salt: &[u8], ikm: &[u8], info: &[u8], len: usize) -> Vec<u8> {
    let salt_opt = if salt.is_empty() { None } else { Some(salt) };
    let hk = Hkdf::<Sha256>::new(salt_opt, ikm);
    let mut okm = vec![0u8; len];
    hk.expand(info, &mut okm)
        .expect("HKDF-SHA256 output length is within the algorithm's limit");
    okm
}

/// `BLAKE2b(data)` with a caller-specified digest length (1..=64 bytes).
pub fn blake2b(data: &[u8], out_len: usize) -> Result<Vec<u8>> {
    let mut hasher = Blake2bVar::new(out_len)
        .map_err(|_| CryptoError::InvalidKeyLength { expected: 64, actual: out_len })?;
    hasher.update(data);
    let mut out = vec![0u8; out_len];
    hasher
        .finalize_variable(&mut out)
        .map_err(|_| CryptoError::InvalidKeyLength { expected: 64, actual: out_len })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty() {
        let digest = sha256(b"");
        assert_eq!(
            hex::encode(digest),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hkdf_is_deterministic() {
        let a = hkdf_sha256(b"salt", b"ikm", b"info", 32);
        let b = hkdf_sha256(b"salt", b"ikm", b"info", 32);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn hmac_truncation() {
        let full = hmac_sha256_full(b"key", b"data");
        let truncated = hmac_sha256(b"key", b"data", 8);
        assert_eq!(&full[..8], truncated.as_slice());
    }

    #[test]
    fn blake2b_respects_output_length() {
        let out = blake2b(b"hello", 20).unwrap();
        assert_eq!(out.len(), 20);
    }
}
