//! The `Authenticator` (spec §4.3.3): tracks a root key and a MAC key for
//! one SPQR chain, advancing both whenever a new epoch's key material is
//! folded in, and producing/verifying the header and ciphertext MACs that
//! bind each epoch's wire messages to that chain.

use zeroize::Zeroize;

use crate::error::{Result, SpqrError};

const AUTH_UPDATE_INFO: &[u8] = b"Signal_SPQR_v1:auth-update";
const CT_MAC_INFO: &[u8] = b"Signal_SPQR_v1:ct-mac";
const HDR_MAC_INFO: &[u8] = b"Signal_SPQR_v1:hdr-mac";
const EPOCH_SECRET_INFO: &[u8] = b"Signal_PQCKA_V1_MLKEM768:SCKA Key";

pub struct Authenticator {
    root_key: [u8; 32],
    mac_key: [u8; 32],
}

impl Drop for Authenticator {
    fn drop(&mut self) {
        self.root_key.zeroize();
        self.mac_key.zeroize();
    }
}

impl Authenticator {
    pub fn new(root_key: [u8; 32], mac_key: [u8; 32]) -> Self { Self { root_key, mac_key } }

    pub fn root_key(&self) -> &[u8; 32] { &self.root_key }

    /// `update(epoch, key)`: folds `key` (fresh epoch secret or KEM shared
    /// secret) into the root key via `HKDF(rootKey ∥ key, salt=0, info)`,
    /// returning the resulting `(rootKey, macKey)` pair as a new
    /// `Authenticator` rather than mutating in place — callers that need to
    /// verify a MAC under the advanced keys before committing to them
    /// (spec's "no state is mutated when an error is returned") call this,
    /// verify against the result, and only assign it back on success.
    pub fn advance(&self, epoch: u64, key: &[u8; 32]) -> Authenticator {
        let mut ikm = Vec::with_capacity(64);
        ikm.extend_from_slice(&self.root_key);
        ikm.extend_from_slice(key);
        let mut info = Vec::with_capacity(AUTH_UPDATE_INFO.len() + 8);
        info.extend_from_slice(AUTH_UPDATE_INFO);
        info.extend_from_slice(&epoch.to_be_bytes());

        let okm = bc_crypto::hkdf_sha256(&[0u8; 32], &ikm, &info, 64);
        let mut root_key = [0u8; 32];
        let mut mac_key = [0u8; 32];
        root_key.copy_from_slice(&okm[..32]);
        mac_key.copy_from_slice(&okm[32..]);
        Authenticator { root_key, mac_key }
    }

    fn mac(&self, info: &[u8], epoch: u64, data: &[u8]) -> [u8; 32] {
        let mut input = Vec::with_capacity(info.len() + 8 + data.len());
        input.extend_from_slice(info);
        input.extend_from_slice(&epoch.to_be_bytes());
        input.extend_from_slice(data);
        bc_crypto::hmac_sha256_full(&self.mac_key, &input)
    }

    pub fn mac_ct(&self, epoch: u64, ct: &[u8]) -> [u8; 32] { self.mac(CT_MAC_INFO, epoch, ct) }

    pub fn mac_hdr(&self, epoch: u64, hdr: &[u8]) -> [u8; 32] { self.mac(HDR_MAC_INFO, epoch, hdr) }

    pub fn verify_ct(&self, epoch: u64, ct: &[u8], mac: &[u8; 32]) -> Result<()> {
        let expected = self.mac_ct(epoch, ct);
        if bc_crypto::constant_time_eq(&expected, mac) { Ok(()) } else { Err(SpqrError::InvalidMac) }
    }

    pub fn verify_hdr(&self, epoch: u64, hdr: &[u8], mac: &[u8; 32]) -> Result<()> {
        let expected = self.mac_hdr(epoch, hdr);
        if bc_crypto::constant_time_eq(&expected, mac) { Ok(()) } else { Err(SpqrError::InvalidMac) }
    }
}

/// `epochSecret = HKDF(ikm=kemSharedSecret, salt=0, info="...SCKA Key" ∥
/// BE8(epoch), 32)` (spec §4.3.3).
pub fn derive_epoch_secret(kem_shared_secret: &[u8], epoch: u64) -> [u8; 32] {
    let mut info = Vec::with_capacity(EPOCH_SECRET_INFO.len() + 8);
    info.extend_from_slice(EPOCH_SECRET_INFO);
    info.extend_from_slice(&epoch.to_be_bytes());
    let okm = bc_crypto::hkdf_sha256(&[0u8; 32], kem_shared_secret, &info, 32);
    let mut out = [0u8; 32];
    out.copy_from_slice(&okm);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_changes_both_keys_without_mutating_the_original() {
        let auth = Authenticator::new([1u8; 32], [2u8; 32]);
        let advanced = auth.advance(0, &[3u8; 32]);
        assert_ne!(*auth.root_key(), *advanced.root_key());
    }

    #[test]
    fn mac_round_trips_and_detects_tampering() {
        let auth = Authenticator::new([1u8; 32], [2u8; 32]);
        let mac = auth.mac_ct(5, b"ciphertext");
        assert!(auth.verify_ct(5, b"ciphertext", &mac).is_ok());
        assert!(auth.verify_ct(5, b"tampered", &mac).is_err());
        assert!(auth.verify_ct(6, b"ciphertext", &mac).is_err());
    }

    #[test]
    fn epoch_secret_is_deterministic() {
        let a = derive_epoch_secret(&[9u8; 32], 3);
        let b = derive_epoch_secret(&[9u8; 32], 3);
        let c = derive_epoch_secret(&[9u8; 32], 4);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
