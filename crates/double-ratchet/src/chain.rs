//! Symmetric-key and root-key derivation (spec §4.3.1): `KDF_RK` mixes a
//! fresh Diffie-Hellman output into the root key, `KDF_CK` advances a chain
//! key and produces a per-message key, and [`expand_message_key`] turns that
//! 32-byte message key into the AES key / MAC key / IV actually used to seal
//! a message.

const KDF_RK_INFO: &[u8] = b"DoubleRatchetRootKey";
const KDF_CK_CHAIN_CONSTANT: [u8; 1] = [0x01];
const KDF_CK_MESSAGE_CONSTANT: [u8; 1] = [0x02];
const MESSAGE_KEY_INFO: &[u8] = b"WhisperMessageKeys";

/// `KDF_RK(root_key, dh_output) -> (new_root_key, new_chain_key)`, via
/// HKDF-SHA256 keyed by the current root key (spec: "derive new root key and
/// new sending/receiving chains via HKDF-SHA256 with a constant info
/// string").
pub fn kdf_rk(root_key: &[u8; 32], dh_output: &[u8; 32]) -> ([u8; 32], [u8; 32]) {
    let okm = bc_crypto::hkdf_sha256(root_key, dh_output, KDF_RK_INFO, 64);
    let mut new_root_key = [0u8; 32];
    let mut new_chain_key = [0u8; 32];
    new_root_key.copy_from_slice(&okm[..32]);
    new_chain_key.copy_from_slice(&okm[32..]);
    (new_root_key, new_chain_key)
}

/// `KDF_CK(chain_key) -> (new_chain_key, message_key)`, via two
/// domain-separated HMAC-SHA256 calls keyed by the chain key.
pub fn kdf_ck(chain_key: &[u8; 32]) -> ([u8; 32], [u8; 32]) {
    let new_chain_key = bc_crypto::hmac_sha256_full(chain_key, &KDF_CK_CHAIN_CONSTANT);
    let message_key = bc_crypto::hmac_sha256_full(chain_key, &KDF_CK_MESSAGE_CONSTANT);
    (new_chain_key, message_key)
}

/// The derived key material used to seal one message: an AES-256 key, an
/// HMAC-SHA256 key, and a CBC initialization vector.
pub struct MessageKeys {
    pub cipher_key: [u8; 32],
    pub mac_key: [u8; 32],
    pub iv: [u8; 16],
}

/// Expands a 32-byte message key into the triple actually used to encrypt
/// and authenticate a message, mirroring Signal's `WhisperMessageKeys` HKDF
/// expansion.
pub fn expand_message_key(message_key: &[u8; 32]) -> MessageKeys {
    let okm = bc_crypto::hkdf_sha256(&[0u8; 32], message_key, MESSAGE_KEY_INFO, 80);
    let mut cipher_key = [0u8; 32];
    let mut mac_key = [0u8; 32];
    let mut iv = [0u8; 16];
    cipher_key.copy_from_slice(&okm[..32]);
    mac_key.copy_from_slice(&okm[32..64]);
    iv.copy_from_slice(&okm[64..80]);
    MessageKeys { cipher_key, mac_key, iv }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kdf_rk_is_deterministic_and_splits_into_two_keys() {
        let (rk1, ck1) = kdf_rk(&[1u8; 32], &[2u8; 32]);
        let (rk2, ck2) = kdf_rk(&[1u8; 32], &[2u8; 32]);
        assert_eq!(rk1, rk2);
        assert_eq!(ck1, ck2);
        assert_ne!(rk1, ck1);
    }

    #[test]
    fn kdf_ck_advances_the_chain() {
        let (ck1, mk1) = kdf_ck(&[3u8; 32]);
        let (ck2, mk2) = kdf_ck(&ck1);
        assert_ne!(ck1, ck2);
        assert_ne!(mk1, mk2);
    }
}
