//! `PrivateKeyBase`: a single seed from which every scheme-specific signing
//! and encapsulation key pair is derived by HKDF with a scheme-specific salt
//! (spec §3: "A `PrivateKeyBase` is a seed from which scheme-specific keys
//! are derived by HKDF with scheme-specific salts").

use bc_rand::RandomNumberGenerator;
use dcbor::prelude::*;

use crate::encapsulation_key::{EncapsulationPrivateKey, EncapsulationPublicKey};
use crate::error::{ComponentError, Result};
use crate::signing_key::{SigningPrivateKey, SigningPublicKey};
use crate::tags::TAG_PRIVATE_KEY_BASE;

const SEED_SIZE: usize = 32;

const SALT_SIGNING_ED25519: &[u8] = b"bc-components/signing/ed25519";
const SALT_SIGNING_SR25519: &[u8] = b"bc-components/signing/sr25519";
const SALT_SIGNING_ML_DSA_44: &[u8] = b"bc-components/signing/ml-dsa-44";
const SALT_SIGNING_ML_DSA_65: &[u8] = b"bc-components/signing/ml-dsa-65";
const SALT_SIGNING_ML_DSA_87: &[u8] = b"bc-components/signing/ml-dsa-87";
const SALT_ENCAPSULATION_X25519: &[u8] = b"bc-components/encapsulation/x25519";
const SALT_ENCAPSULATION_ML_KEM_768: &[u8] = b"bc-components/encapsulation/ml-kem-768";
const SALT_ENCAPSULATION_ML_KEM_1024: &[u8] = b"bc-components/encapsulation/ml-kem-1024";

#[derive(Clone)]
pub struct PrivateKeyBase([u8; SEED_SIZE]);

impl std::fmt::Debug for PrivateKeyBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKeyBase").field("seed", &"<redacted>").finish()
    }
}

impl PrivateKeyBase {
    pub fn new(rng: &mut impl RandomNumberGenerator) -> Self {
        let mut seed = [0u8; SEED_SIZE];
        rng.fill_random_data(&mut seed);
        Self(seed)
    }

    pub fn from_bytes(bytes: [u8; SEED_SIZE]) -> Self { Self(bytes) }

    pub fn data(&self) -> &[u8; SEED_SIZE] { &self.0 }

    /// Derives a per-scheme deterministic RNG by HKDF-expanding the seed
    /// under `salt`. Each scheme gets an independent stream, so deriving one
    /// key pair never leaks information usable to predict another.
    fn derive_rng(&self, salt: &[u8]) -> bc_rand::FakeRandomNumberGenerator {
        let derived = bc_crypto::hkdf_sha256(salt, &self.0, b"bc-components/private-key-base", SEED_SIZE);
        let mut seed = [0u8; SEED_SIZE];
        seed.copy_from_slice(&derived);
        bc_rand::make_fake_random_number_generator_from_seed(seed)
    }

    pub fn ed25519_signing_key(&self) -> (SigningPrivateKey, SigningPublicKey) {
        SigningPrivateKey::new_ed25519(&mut self.derive_rng(SALT_SIGNING_ED25519))
    }

    pub fn sr25519_signing_key(&self) -> (SigningPrivateKey, SigningPublicKey) {
        SigningPrivateKey::new_sr25519(&mut self.derive_rng(SALT_SIGNING_SR25519))
    }

    pub fn ml_dsa_44_signing_key(&self) -> (SigningPrivateKey, SigningPublicKey) {
        SigningPrivateKey::new_ml_dsa_44(&mut self.derive_rng(SALT_SIGNING_ML_DSA_44))
    }

    pub fn ml_dsa_65_signing_key(&self) -> (SigningPrivateKey, SigningPublicKey) {
        SigningPrivateKey::new_ml_dsa_65(&mut self.derive_rng(SALT_SIGNING_ML_DSA_65))
    }

    pub fn ml_dsa_87_signing_key(&self) -> (SigningPrivateKey, SigningPublicKey) {
        SigningPrivateKey::new_ml_dsa_87(&mut self.derive_rng(SALT_SIGNING_ML_DSA_87))
    }

    pub fn x25519_encapsulation_key(&self) -> (EncapsulationPrivateKey, EncapsulationPublicKey) {
        let private = EncapsulationPrivateKey::new_x25519(&mut self.derive_rng(SALT_ENCAPSULATION_X25519));
        let public = private.public_key().expect("x25519 public key is always derivable");
        (private, public)
    }

    pub fn ml_kem_768_encapsulation_key(&self) -> (EncapsulationPrivateKey, EncapsulationPublicKey) {
        EncapsulationPrivateKey::new_ml_kem_768(&mut self.derive_rng(SALT_ENCAPSULATION_ML_KEM_768))
    }

    pub fn ml_kem_1024_encapsulation_key(&self) -> (EncapsulationPrivateKey, EncapsulationPublicKey) {
        EncapsulationPrivateKey::new_ml_kem_1024(&mut self.derive_rng(SALT_ENCAPSULATION_ML_KEM_1024))
    }
}

impl From<PrivateKeyBase> for CBOR {
    fn from(base: PrivateKeyBase) -> Self {
        CBOR::tagged_value(TAG_PRIVATE_KEY_BASE, CBOR::from(base.0.to_vec()))
    }
}

impl TryFrom<CBOR> for PrivateKeyBase {
    type Error = ComponentError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let (tag, inner) =
            cbor.as_tagged().ok_or_else(|| ComponentError::InvalidFormat("private-key-base".into()))?;
        if tag.value() != TAG_PRIVATE_KEY_BASE {
            return Err(ComponentError::InvalidTag { tag: tag.value() });
        }
        let bytes = inner
            .as_byte_string()
            .ok_or_else(|| ComponentError::InvalidFormat("private-key-base".into()))?;
        let seed: [u8; SEED_SIZE] = bytes
            .try_into()
            .map_err(|_| ComponentError::InvalidSize { expected: SEED_SIZE, actual: bytes.len() })?;
        Ok(Self(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let mut rng = bc_rand::make_fake_random_number_generator(3);
        let base = PrivateKeyBase::new(&mut rng);
        let (_, public_a) = base.ed25519_signing_key();
        let (_, public_b) = base.ed25519_signing_key();
        assert_eq!(public_a, public_b);
    }

    #[test]
    fn different_schemes_derive_independent_keys() {
        let mut rng = bc_rand::make_fake_random_number_generator(4);
        let base = PrivateKeyBase::new(&mut rng);
        let (_, x25519_public) = base.x25519_encapsulation_key();
        let (private, ml_kem_public) = base.ml_kem_768_encapsulation_key();
        assert_ne!(CBOR::from(x25519_public), CBOR::from(ml_kem_public));
        assert!(private.public_key().is_err());
    }

    #[test]
    fn round_trips_through_cbor() {
        let mut rng = bc_rand::make_fake_random_number_generator(6);
        let base = PrivateKeyBase::new(&mut rng);
        let seed = *base.data();
        let cbor = CBOR::from(base);
        let recovered = PrivateKeyBase::try_from(cbor).unwrap();
        assert_eq!(*recovered.data(), seed);
    }
}
