//! Signing schemes: Ed25519, secp256k1 (Schnorr + ECDSA), Sr25519.

use ed25519_dalek::{Signer as _, SigningKey, Verifier as _, VerifyingKey};
use k256::ecdsa::signature::{Signer as _, Verifier as _};
use k256::schnorr::{SigningKey as SchnorrSigningKey, VerifyingKey as SchnorrVerifyingKey};

use crate::error::{CryptoError, Result};

pub const ED25519_PRIVATE_KEY_SIZE: usize = 32;
pub const ED25519_PUBLIC_KEY_SIZE: usize = 32;
pub const ED25519_SIGNATURE_SIZE: usize = 64;

pub fn ed25519_generate(
    rng: &mut impl bc_rand::RandomNumberGenerator,
) -> ([u8; ED25519_PRIVATE_KEY_SIZE], [u8; ED25519_PUBLIC_KEY_SIZE]) {
    let mut seed = [0u8; 32];
    rng.fill_random_data(&mut seed);
    let signing_key = SigningKey::from_bytes(&seed);
    let verifying_key = signing_key.verifying_key();
    (signing_key.to_bytes(), verifying_key.to_bytes())
}

pub fn ed25519_sign(private_key: &[u8; ED25519_PRIVATE_KEY_SIZE], message: &[u8]) -> [u8; ED25519_SIGNATURE_SIZE] {
    let signing_key = SigningKey::from_bytes(private_key);
    signing_key.sign(message).to_bytes()
}

pub fn ed25519_verify(
    public_key: &[u8; ED25519_PUBLIC_KEY_SIZE],
    message: &[u8],
    signature: &[u8; ED25519_SIGNATURE_SIZE],
) -> Result<()> {
    let verifying_key =
        VerifyingKey::from_bytes(public_key).map_err(|_| CryptoError::InvalidKey)?;
    let sig = ed25519_dalek::Signature::from_bytes(signature);
    verifying_key
        .verify(message, &sig)
        .map_err(|_| CryptoError::InvalidSignature)
}

pub const SECP256K1_PRIVATE_KEY_SIZE: usize = 32;
pub const SECP256K1_ECDSA_SIGNATURE_SIZE: usize = 64;
pub const SECP256K1_SCHNORR_SIGNATURE_SIZE: usize = 64;

/// secp256k1 ECDSA (low-S, deterministic per RFC6979).
pub fn secp256k1_ecdsa_sign(private_key: &[u8; SECP256K1_PRIVATE_KEY_SIZE], message: &[u8]) -> Result<[u8; SECP256K1_ECDSA_SIGNATURE_SIZE]> {
    let signing_key = k256::ecdsa::SigningKey::from_bytes(private_key.into())
        .map_err(|_| CryptoError::InvalidKey)?;
    let signature: k256::ecdsa::Signature = signing_key.sign(message);
    let mut out = [0u8; SECP256K1_ECDSA_SIGNATURE_SIZE];
    out.copy_from_slice(&signature.to_bytes());
    Ok(out)
}

pub fn secp256k1_ecdsa_verify(
    public_key_sec1: &[u8],
    message: &[u8],
    signature: &[u8; SECP256K1_ECDSA_SIGNATURE_SIZE],
) -> Result<()> {
    let verifying_key = k256::ecdsa::VerifyingKey::from_sec1_bytes(public_key_sec1)
        .map_err(|_| CryptoError::InvalidKey)?;
    let signature = k256::ecdsa::Signature::from_slice(signature)
        .map_err(|_| CryptoError::InvalidSignature)?;
    verifying_key
        .verify(message, &signature)
        .map_err(|_| CryptoError::InvalidSignature)
}

/// secp256k1 Schnorr (BIP-340 style, x-only public keys).
pub fn secp256k1_schnorr_sign(
    private_key: &[u8; SECP256K1_PRIVATE_KEY_SIZE],
    message: &[u8],
    aux_rand: &[u8; 32],
) -> Result<[u8; SECP256K1_SCHNORR_SIGNATURE_SIZE]> {
    let signing_key =
        SchnorrSigningKey::from_bytes(private_key).map_err(|_| CryptoError::InvalidKey)?;
    let signature = signing_key
        .sign_raw(message, aux_rand)
        .map_err(|_| CryptoError::InvalidSignature)?;
    let mut out = [0u8; SECP256K1_SCHNORR_SIGNATURE_SIZE];
    out.copy_from_slice(&signature.to_bytes());
    Ok(out)
}

pub fn secp256k1_schnorr_verify(
    x_only_public_key: &[u8; 32],
    message: &[u8],
    signature: &[u8; SECP256K1_SCHNORR_SIGNATURE_SIZE],
) -> Result<()> {
    let verifying_key = SchnorrVerifyingKey::from_bytes(x_only_public_key)
        .map_err(|_| CryptoError::InvalidKey)?;
    let signature = k256::schnorr::Signature::try_from(signature.as_slice())
        .map_err(|_| CryptoError::InvalidSignature)?;
    verifying_key
        .verify_raw(message, &signature)
        .map_err(|_| CryptoError::InvalidSignature)
}

/// Sr25519 (Schnorrkel over Ristretto25519), used by Substrate-style chains.
pub mod sr25519 {
    use schnorrkel::{Keypair, MiniSecretKey, PublicKey, Signature, signing_context};

    use super::{CryptoError, Result};

    const SIGNING_CONTEXT: &[u8] = b"bc-crypto/sr25519";

    pub fn generate(seed: &[u8; 32]) -> (Vec<u8>, Vec<u8>) {
        let mini = MiniSecretKey::from_bytes(seed).expect("32-byte seed is always valid");
        let keypair: Keypair = mini.expand_to_keypair(MiniSecretKey::ED25519_MODE);
        (keypair.secret.to_bytes().to_vec(), keypair.public.to_bytes().to_vec())
    }

    pub fn sign(keypair_bytes: &[u8], message: &[u8]) -> Result<Vec<u8>> {
        let keypair = Keypair::from_half_ed25519_bytes(keypair_bytes)
            .map_err(|_| CryptoError::InvalidKey)?;
        let context = signing_context(SIGNING_CONTEXT);
        Ok(keypair.sign(context.bytes(message)).to_bytes().to_vec())
    }

    pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<()> {
        let public_key =
            PublicKey::from_bytes(public_key).map_err(|_| CryptoError::InvalidKey)?;
        let signature =
            Signature::from_bytes(signature).map_err(|_| CryptoError::InvalidSignature)?;
        let context = signing_context(SIGNING_CONTEXT);
        public_key
            .verify(context.bytes(message), &signature)
            .map_err(|_| CryptoError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ed25519_round_trip() {
        let mut rng = bc_rand::make_fake_random_number_generator(5);
        let (sk, pk) = ed25519_generate(&mut rng);
        let sig = ed25519_sign(&sk, b"message");
        assert!(ed25519_verify(&pk, b"message", &sig).is_ok());
        assert!(ed25519_verify(&pk, b"tampered", &sig).is_err());
    }
}
