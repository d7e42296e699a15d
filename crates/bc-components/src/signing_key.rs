//! Signing schemes, scheme-tagged (spec §3: "Signing: { schnorr | ecdsa |
//! ed25519 | sr25519 | ml-dsa-{44,65,87} | ssh-* } x { private, public }").
//! `ssh-*` key import/export is out of scope here.

use bc_crypto::pqc::ml_dsa::{self, MlDsaLevel};
use bc_crypto::signing::{self, sr25519};
use dcbor::prelude::*;

use crate::error::{ComponentError, Result};
use crate::tags::{TAG_SIGNATURE, TAG_SIGNING_PUBLIC_KEY};

const SCHEME_SCHNORR: u64 = 1;
const SCHEME_ECDSA: u64 = 2;
const SCHEME_ED25519: u64 = 3;
const SCHEME_SR25519: u64 = 4;
const SCHEME_ML_DSA_44: u64 = 5;
const SCHEME_ML_DSA_65: u64 = 6;
const SCHEME_ML_DSA_87: u64 = 7;

/// A signing private key. Every scheme's public counterpart is produced
/// alongside it at generation time and must be retained by the caller: none
/// of these wire formats support cheap re-derivation from the private half
/// alone (spec §3).
#[derive(Clone, PartialEq, Eq)]
pub enum SigningPrivateKey {
    Schnorr([u8; 32]),
    Ecdsa([u8; 32]),
    Ed25519([u8; 32]),
    Sr25519(Vec<u8>),
    MlDsa44(Vec<u8>),
    MlDsa65(Vec<u8>),
    MlDsa87(Vec<u8>),
}

impl std::fmt::Debug for SigningPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningPrivateKey").field("data", &"<redacted>").finish()
    }
}

impl SigningPrivateKey {
    pub fn new_ed25519(rng: &mut impl bc_rand::RandomNumberGenerator) -> (Self, SigningPublicKey) {
        let (private, public) = signing::ed25519_generate(rng);
        (Self::Ed25519(private), SigningPublicKey::Ed25519(public))
    }

    pub fn new_sr25519(rng: &mut impl bc_rand::RandomNumberGenerator) -> (Self, SigningPublicKey) {
        let mut seed = [0u8; 32];
        rng.fill_random_data(&mut seed);
        let (secret, public) = sr25519::generate(&seed);
        let mut keypair = secret;
        keypair.extend_from_slice(&public);
        (Self::Sr25519(keypair), SigningPublicKey::Sr25519(public))
    }

    pub fn new_ml_dsa_44(rng: &mut impl bc_rand::RandomNumberGenerator) -> (Self, SigningPublicKey) {
        let mut seed = [0u8; 32];
        rng.fill_random_data(&mut seed);
        let (signing_key, verifying_key) = ml_dsa::generate(MlDsaLevel::MlDsa44, &seed);
        (Self::MlDsa44(signing_key), SigningPublicKey::MlDsa44(verifying_key))
    }

    pub fn new_ml_dsa_65(rng: &mut impl bc_rand::RandomNumberGenerator) -> (Self, SigningPublicKey) {
        let mut seed = [0u8; 32];
        rng.fill_random_data(&mut seed);
        let (signing_key, verifying_key) = ml_dsa::generate(MlDsaLevel::MlDsa65, &seed);
        (Self::MlDsa65(signing_key), SigningPublicKey::MlDsa65(verifying_key))
    }

    pub fn new_ml_dsa_87(rng: &mut impl bc_rand::RandomNumberGenerator) -> (Self, SigningPublicKey) {
        let mut seed = [0u8; 32];
        rng.fill_random_data(&mut seed);
        let (signing_key, verifying_key) = ml_dsa::generate(MlDsaLevel::MlDsa87, &seed);
        (Self::MlDsa87(signing_key), SigningPublicKey::MlDsa87(verifying_key))
    }

    pub fn sign(&self, rng: &mut impl bc_rand::RandomNumberGenerator, message: &[u8]) -> Result<Signature> {
        match self {
            Self::Ed25519(private) => Ok(Signature::Ed25519(signing::ed25519_sign(private, message))),
            Self::Schnorr(private) => {
                let mut aux_rand = [0u8; 32];
                rng.fill_random_data(&mut aux_rand);
                Ok(Signature::Schnorr(signing::secp256k1_schnorr_sign(private, message, &aux_rand)?))
            }
            Self::Ecdsa(private) => Ok(Signature::Ecdsa(signing::secp256k1_ecdsa_sign(private, message)?)),
            Self::Sr25519(keypair) => Ok(Signature::Sr25519(sr25519::sign(keypair, message)?)),
            Self::MlDsa44(signing_key) => {
                Ok(Signature::MlDsa44(ml_dsa::sign(MlDsaLevel::MlDsa44, signing_key, message)?))
            }
            Self::MlDsa65(signing_key) => {
                Ok(Signature::MlDsa65(ml_dsa::sign(MlDsaLevel::MlDsa65, signing_key, message)?))
            }
            Self::MlDsa87(signing_key) => {
                Ok(Signature::MlDsa87(ml_dsa::sign(MlDsaLevel::MlDsa87, signing_key, message)?))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningPublicKey {
    Schnorr([u8; 32]),
    Ecdsa([u8; 33]),
    Ed25519([u8; 32]),
    Sr25519(Vec<u8>),
    MlDsa44(Vec<u8>),
    MlDsa65(Vec<u8>),
    MlDsa87(Vec<u8>),
}

impl SigningPublicKey {
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        match (self, signature) {
            (Self::Ed25519(public), Signature::Ed25519(sig)) => {
                signing::ed25519_verify(public, message, sig).is_ok()
            }
            (Self::Schnorr(public), Signature::Schnorr(sig)) => {
                signing::secp256k1_schnorr_verify(public, message, sig).is_ok()
            }
            (Self::Ecdsa(public), Signature::Ecdsa(sig)) => {
                signing::secp256k1_ecdsa_verify(public, message, sig).is_ok()
            }
            (Self::Sr25519(public), Signature::Sr25519(sig)) => sr25519::verify(public, message, sig).is_ok(),
            (Self::MlDsa44(public), Signature::MlDsa44(sig)) => {
                ml_dsa::verify(MlDsaLevel::MlDsa44, public, message, sig).is_ok()
            }
            (Self::MlDsa65(public), Signature::MlDsa65(sig)) => {
                ml_dsa::verify(MlDsaLevel::MlDsa65, public, message, sig).is_ok()
            }
            (Self::MlDsa87(public), Signature::MlDsa87(sig)) => {
                ml_dsa::verify(MlDsaLevel::MlDsa87, public, message, sig).is_ok()
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    Schnorr([u8; 64]),
    Ecdsa([u8; 64]),
    Ed25519([u8; 64]),
    Sr25519(Vec<u8>),
    MlDsa44(Vec<u8>),
    MlDsa65(Vec<u8>),
    MlDsa87(Vec<u8>),
}

impl From<Signature> for CBOR {
    fn from(signature: Signature) -> Self {
        let (scheme, bytes) = match signature {
            Signature::Schnorr(b) => (SCHEME_SCHNORR, b.to_vec()),
            Signature::Ecdsa(b) => (SCHEME_ECDSA, b.to_vec()),
            Signature::Ed25519(b) => (SCHEME_ED25519, b.to_vec()),
            Signature::Sr25519(b) => (SCHEME_SR25519, b),
            Signature::MlDsa44(b) => (SCHEME_ML_DSA_44, b),
            Signature::MlDsa65(b) => (SCHEME_ML_DSA_65, b),
            Signature::MlDsa87(b) => (SCHEME_ML_DSA_87, b),
        };
        CBOR::tagged_value(TAG_SIGNATURE, CBOR::array(vec![CBOR::from(scheme), CBOR::from(bytes)]))
    }
}

impl TryFrom<CBOR> for Signature {
    type Error = ComponentError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let (tag, inner) = cbor.as_tagged().ok_or_else(|| ComponentError::InvalidFormat("signature".into()))?;
        if tag.value() != TAG_SIGNATURE {
            return Err(ComponentError::InvalidTag { tag: tag.value() });
        }
        let items = inner.as_array().ok_or_else(|| ComponentError::InvalidFormat("signature".into()))?;
        let [scheme, bytes] = items else {
            return Err(ComponentError::InvalidFormat("signature".into()));
        };
        let scheme = scheme.as_unsigned().ok_or_else(|| ComponentError::InvalidFormat("scheme".into()))?;
        let bytes = bytes.as_byte_string().ok_or_else(|| ComponentError::InvalidFormat("signature".into()))?;
        let sized = |expected: usize| -> Result<[u8; 64]> {
            if bytes.len() != expected {
                return Err(ComponentError::InvalidSize { expected, actual: bytes.len() });
            }
            let mut out = [0u8; 64];
            out.copy_from_slice(bytes);
            Ok(out)
        };
        Ok(match scheme {
            SCHEME_SCHNORR => Signature::Schnorr(sized(64)?),
            SCHEME_ECDSA => Signature::Ecdsa(sized(64)?),
            SCHEME_ED25519 => Signature::Ed25519(sized(64)?),
            SCHEME_SR25519 => Signature::Sr25519(bytes.to_vec()),
            SCHEME_ML_DSA_44 => Signature::MlDsa44(bytes.to_vec()),
            SCHEME_ML_DSA_65 => Signature::MlDsa65(bytes.to_vec()),
            SCHEME_ML_DSA_87 => Signature::MlDsa87(bytes.to_vec()),
            other => return Err(ComponentError::InvalidFormat(format!("unknown signature scheme {other}"))),
        })
    }
}

impl From<SigningPublicKey> for CBOR {
    fn from(key: SigningPublicKey) -> Self {
        let (scheme, bytes) = match key {
            SigningPublicKey::Schnorr(b) => (SCHEME_SCHNORR, b.to_vec()),
            SigningPublicKey::Ecdsa(b) => (SCHEME_ECDSA, b.to_vec()),
            SigningPublicKey::Ed25519(b) => (SCHEME_ED25519, b.to_vec()),
            SigningPublicKey::Sr25519(b) => (SCHEME_SR25519, b),
            SigningPublicKey::MlDsa44(b) => (SCHEME_ML_DSA_44, b),
            SigningPublicKey::MlDsa65(b) => (SCHEME_ML_DSA_65, b),
            SigningPublicKey::MlDsa87(b) => (SCHEME_ML_DSA_87, b),
        };
        CBOR::tagged_value(TAG_SIGNING_PUBLIC_KEY, CBOR::array(vec![CBOR::from(scheme), CBOR::from(bytes)]))
    }
}

impl TryFrom<CBOR> for SigningPublicKey {
    type Error = ComponentError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let (tag, inner) =
            cbor.as_tagged().ok_or_else(|| ComponentError::InvalidFormat("signing-public-key".into()))?;
        if tag.value() != TAG_SIGNING_PUBLIC_KEY {
            return Err(ComponentError::InvalidTag { tag: tag.value() });
        }
        let items = inner.as_array().ok_or_else(|| ComponentError::InvalidFormat("signing-public-key".into()))?;
        let [scheme, bytes] = items else {
            return Err(ComponentError::InvalidFormat("signing-public-key".into()));
        };
        let scheme = scheme.as_unsigned().ok_or_else(|| ComponentError::InvalidFormat("scheme".into()))?;
        let bytes =
            bytes.as_byte_string().ok_or_else(|| ComponentError::InvalidFormat("signing-public-key".into()))?;
        let sized = |expected: usize| -> Result<&[u8]> {
            if bytes.len() != expected {
                return Err(ComponentError::InvalidSize { expected, actual: bytes.len() });
            }
            Ok(bytes)
        };
        Ok(match scheme {
            SCHEME_SCHNORR => SigningPublicKey::Schnorr(sized(32)?.try_into().unwrap()),
            SCHEME_ECDSA => SigningPublicKey::Ecdsa(sized(33)?.try_into().unwrap()),
            SCHEME_ED25519 => SigningPublicKey::Ed25519(sized(32)?.try_into().unwrap()),
            SCHEME_SR25519 => SigningPublicKey::Sr25519(bytes.to_vec()),
            SCHEME_ML_DSA_44 => SigningPublicKey::MlDsa44(bytes.to_vec()),
            SCHEME_ML_DSA_65 => SigningPublicKey::MlDsa65(bytes.to_vec()),
            SCHEME_ML_DSA_87 => SigningPublicKey::MlDsa87(bytes.to_vec()),
            other => return Err(ComponentError::InvalidFormat(format!("unknown signing scheme {other}"))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ed25519_sign_and_verify() {
        let mut rng = bc_rand::make_fake_random_number_generator(9);
        let (private, public) = SigningPrivateKey::new_ed25519(&mut rng);
        let signature = private.sign(&mut rng, b"message").unwrap();
        assert!(public.verify(b"message", &signature));
        assert!(!public.verify(b"tampered", &signature));
    }

    #[test]
    fn ml_dsa_44_sign_and_verify() {
        let mut rng = bc_rand::make_fake_random_number_generator(13);
        let (private, public) = SigningPrivateKey::new_ml_dsa_44(&mut rng);
        let signature = private.sign(&mut rng, b"quantum message").unwrap();
        assert!(public.verify(b"quantum message", &signature));
    }

    #[test]
    fn signature_round_trips_through_cbor() {
        let mut rng = bc_rand::make_fake_random_number_generator(17);
        let (private, _) = SigningPrivateKey::new_ed25519(&mut rng);
        let signature = private.sign(&mut rng, b"hello").unwrap();
        let cbor = CBOR::from(signature.clone());
        assert_eq!(Signature::try_from(cbor).unwrap(), signature);
    }
}
