//! Authenticated and unauthenticated symmetric ciphers: ChaCha20-Poly1305,
//! AES-256-CBC, AES-256-GCM-SIV.

use aes::Aes256;
use aes_gcm_siv::{Aes256GcmSiv, Nonce as GcmSivNonce, aead::Aead as _};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use chacha20poly1305::{ChaCha20Poly1305, Nonce as ChaChaNonce, aead::Aead as _};
use chacha20poly1305::aead::{AeadInPlace, KeyInit};

use crate::error::{CryptoError, Result};

pub const SYMMETRIC_KEY_SIZE: usize = 32;
pub const AEAD_NONCE_SIZE: usize = 12;
pub const AEAD_TAG_SIZE: usize = 16;

/// `ChaCha20-Poly1305` seal: returns `(ciphertext, tag)`.
pub fn chacha20_poly1305_encrypt(
    key: &[u8; SYMMETRIC_KEY_SIZE],
    nonce: &[u8; AEAD_NONCE_SIZE],
    plaintext: &[u8],
    aad: &[u8],
) -> (Vec<u8>, [u8; AEAD_TAG_SIZE]) {
    let cipher = ChaCha20Poly1305::new(key.into());
    let nonce = ChaChaNonce::from_slice(nonce);
    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(nonce, aad, &mut buffer)
        .expect("ChaCha20-Poly1305 encryption cannot fail for valid-size inputs");
    let mut tag_bytes = [0u8; AEAD_TAG_SIZE];
    tag_bytes.copy_from_slice(&tag);
    (buffer, tag_bytes)
}

/// `ChaCha20-Poly1305` open. Fails with `InvalidAuthenticationTag` if the
/// tag does not verify.
pub fn chacha20_poly1305_decrypt(
    key: &[u8; SYMMETRIC_KEY_SIZE],
    nonce: &[u8; AEAD_NONCE_SIZE],
    ciphertext: &[u8],
    tag: &[u8; AEAD_TAG_SIZE],
    aad: &[u8],
) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(key.into());
    let nonce = ChaChaNonce::from_slice(nonce);
    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(nonce, aad, &mut buffer, tag.into())
        .map_err(|_| CryptoError::InvalidAuthenticationTag)?;
    Ok(buffer)
}

/// Convenience combined-buffer API matching the `aead::Aead` trait shape
/// (ciphertext with the tag appended), used where callers want a single
/// opaque blob rather than a split ciphertext/tag pair.
pub fn chacha20_poly1305_seal(
    key: &[u8; SYMMETRIC_KEY_SIZE],
    nonce: &[u8; AEAD_NONCE_SIZE],
    plaintext: &[u8],
) -> Vec<u8> {
    let cipher = ChaCha20Poly1305::new(key.into());
    cipher
        .encrypt(ChaChaNonce::from_slice(nonce), plaintext)
        .expect("ChaCha20-Poly1305 encryption cannot fail for valid-size inputs")
}

pub fn chacha20_poly1305_open(
    key: &[u8; SYMMETRIC_KEY_SIZE],
    nonce: &[u8; AEAD_NONCE_SIZE],
    sealed: &[u8],
) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(key.into());
    cipher
        .decrypt(ChaChaNonce::from_slice(nonce), sealed)
        .map_err(|_| CryptoError::InvalidAuthenticationTag)
}

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES-256-CBC with PKCS#7 padding. Unauthenticated: callers must pair this
/// with a MAC (this crate never calls it without one — see the ratchet
/// message-key derivation, which produces a CBC key alongside a separate MAC
/// key).
pub fn aes256_cbc_encrypt(
    key: &[u8; SYMMETRIC_KEY_SIZE],
    iv: &[u8; 16],
    plaintext: &[u8],
) -> Vec<u8> {
    Aes256CbcEnc::new(key.into(), iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

pub fn aes256_cbc_decrypt(
    key: &[u8; SYMMETRIC_KEY_SIZE],
    iv: &[u8; 16],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    Aes256CbcDec::new(key.into(), iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::InvalidAuthenticationTag)
}

/// AES-256-GCM-SIV seal/open (nonce-misuse resistant; used for long-lived
/// at-rest secrets rather than per-message ratchet traffic).
pub fn aes256_gcm_siv_encrypt(
    key: &[u8; SYMMETRIC_KEY_SIZE],
    nonce: &[u8; AEAD_NONCE_SIZE],
    plaintext: &[u8],
    aad: &[u8],
) -> Vec<u8> {
    let cipher = <Aes256GcmSiv as KeyInit>::new(key.into());
    cipher
        .encrypt(
            GcmSivNonce::from_slice(nonce),
            aes_gcm_siv::aead::Payload { msg: plaintext, aad },
        )
        .expect("AES-256-GCM-SIV encryption cannot fail for valid-size inputs")
}

pub fn aes256_gcm_siv_decrypt(
    key: &[u8; SYMMETRIC_KEY_SIZE],
    nonce: &[u8; AEAD_NONCE_SIZE],
    sealed: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>> {
    let cipher = <Aes256GcmSiv as KeyInit>::new(key.into());
    cipher
        .decrypt(
            GcmSivNonce::from_slice(nonce),
            aes_gcm_siv::aead::Payload { msg: sealed, aad },
        )
        .map_err(|_| CryptoError::InvalidAuthenticationTag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chacha20_poly1305_round_trip() {
        let key = [7u8; 32];
        let nonce = [1u8; 12];
        let (ct, tag) = chacha20_poly1305_encrypt(&key, &nonce, b"hello world", b"aad");
        let pt = chacha20_poly1305_decrypt(&key, &nonce, &ct, &tag, b"aad").unwrap();
        assert_eq!(pt, b"hello world");
    }

    #[test]
    fn chacha20_poly1305_rejects_tampered_aad() {
        let key = [7u8; 32];
        let nonce = [1u8; 12];
        let (ct, tag) = chacha20_poly1305_encrypt(&key, &nonce, b"hello", b"aad");
        assert!(chacha20_poly1305_decrypt(&key, &nonce, &ct, &tag, b"other").is_err());
    }

    #[test]
    fn aes256_cbc_round_trip() {
        let key = [9u8; 32];
        let iv = [2u8; 16];
        let ct = aes256_cbc_encrypt(&key, &iv, b"some plaintext bytes");
        let pt = aes256_cbc_decrypt(&key, &iv, &ct).unwrap();
        assert_eq!(pt, b"some plaintext bytes");
    }

    #[test]
    fn aes256_gcm_siv_round_trip() {
        let key = [3u8; 32];
        let nonce = [4u8; 12];
        let sealed = aes256_gcm_siv_encrypt(&key, &nonce, b"msg", b"aad");
        let opened = aes256_gcm_siv_decrypt(&key, &nonce, &sealed, b"aad").unwrap();
        assert_eq!(opened, b"msg");
    }
}
