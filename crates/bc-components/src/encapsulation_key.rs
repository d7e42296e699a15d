//! Key-encapsulation schemes: X25519 (treated as a KEM via ECDH + HKDF) and
//! ML-KEM 512/768/1024 (spec §3: "Encapsulation (KEM): { x25519 |
//! ml-kem-{512,768,1024} } x { private, public, ciphertext }").

use bc_rand::RandomNumberGenerator;
use dcbor::prelude::*;
use zeroize::Zeroize;

use crate::error::{ComponentError, Result};
use crate::tags::TAG_ENCAPSULATION_PUBLIC_KEY;

const SCHEME_X25519: u64 = 1;
const SCHEME_ML_KEM_512: u64 = 2;
const SCHEME_ML_KEM_768: u64 = 3;
const SCHEME_ML_KEM_1024: u64 = 4;

/// Info string HKDF-expands an X25519 DH output into a KEM-shaped shared
/// secret, so X25519 and ML-KEM can share one `encapsulate`/`decapsulate`
/// surface.
const X25519_KEM_INFO: &[u8] = b"bc-components/x25519-kem-shared-secret";

#[derive(Clone)]
pub enum EncapsulationPrivateKey {
    X25519(bc_crypto::ecdh::X25519PrivateKey),
    MlKem512(Vec<u8>),
    MlKem768(Vec<u8>),
    MlKem1024(Vec<u8>),
}

impl EncapsulationPrivateKey {
    pub fn new_x25519(rng: &mut impl RandomNumberGenerator) -> Self {
        Self::X25519(bc_crypto::ecdh::X25519PrivateKey::generate(rng))
    }

    pub fn new_ml_kem_768(rng: &mut impl RandomNumberGenerator) -> (Self, EncapsulationPublicKey) {
        let (decap, encap) = bc_crypto::pqc::ml_kem_768::generate(rng);
        (Self::MlKem768(decap), EncapsulationPublicKey::MlKem768(encap))
    }

    pub fn new_ml_kem_1024(rng: &mut impl RandomNumberGenerator) -> (Self, EncapsulationPublicKey) {
        let (decap, encap) = bc_crypto::pqc::ml_kem_1024::generate(rng);
        (Self::MlKem1024(decap), EncapsulationPublicKey::MlKem1024(encap))
    }

    /// Re-derives the public key, for schemes where that's possible from the
    /// private key alone. ML-KEM's public key is a distinct generation
    /// output, not derivable from the decapsulation key, so callers using
    /// `new_ml_kem_768`/`new_ml_kem_1024` must hold onto the returned public
    /// key instead of calling this.
    pub fn public_key(&self) -> Result<EncapsulationPublicKey> {
        match self {
            Self::X25519(sk) => Ok(EncapsulationPublicKey::X25519(sk.public_key())),
            Self::MlKem512(_) | Self::MlKem768(_) | Self::MlKem1024(_) => {
                Err(ComponentError::InvalidFormat(
                    "ML-KEM public key is not derivable from the private key".into(),
                ))
            }
        }
    }

    pub fn decapsulate(&self, ciphertext: &EncapsulationCiphertext) -> Result<[u8; 32]> {
        match (self, ciphertext) {
            (Self::X25519(sk), EncapsulationCiphertext::X25519(ephemeral_public)) => {
                let shared_point = sk.agree(ephemeral_public);
                let mut out = [0u8; 32];
                out.copy_from_slice(&bc_crypto::hkdf_sha256(&[], &shared_point, X25519_KEM_INFO, 32));
                Ok(out)
            }
            (Self::MlKem512(decap), EncapsulationCiphertext::MlKem512(ct)) => {
                fixed_secret(bc_crypto::pqc::ml_kem_512::decapsulate(decap, ct)?)
            }
            (Self::MlKem768(decap), EncapsulationCiphertext::MlKem768(ct)) => {
                fixed_secret(bc_crypto::pqc::ml_kem_768::decapsulate(decap, ct)?)
            }
            (Self::MlKem1024(decap), EncapsulationCiphertext::MlKem1024(ct)) => {
                fixed_secret(bc_crypto::pqc::ml_kem_1024::decapsulate(decap, ct)?)
            }
            _ => Err(ComponentError::InvalidFormat("encapsulation scheme mismatch".into())),
        }
    }
}

fn fixed_secret(shared_secret: Vec<u8>) -> Result<[u8; 32]> {
    let mut out = [0u8; 32];
    out.copy_from_slice(&bc_crypto::hkdf_sha256(&[], &shared_secret, X25519_KEM_INFO, 32));
    Ok(out)
}

impl Drop for EncapsulationPrivateKey {
    fn drop(&mut self) {
        match self {
            Self::MlKem512(bytes) | Self::MlKem768(bytes) | Self::MlKem1024(bytes) => bytes.zeroize(),
            Self::X25519(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncapsulationPublicKey {
    X25519(bc_crypto::ecdh::X25519PublicKey),
    MlKem512(Vec<u8>),
    MlKem768(Vec<u8>),
    MlKem1024(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncapsulationCiphertext {
    X25519(bc_crypto::ecdh::X25519PublicKey),
    MlKem512(Vec<u8>),
    MlKem768(Vec<u8>),
    MlKem1024(Vec<u8>),
}

impl EncapsulationPublicKey {
    /// Encapsulates to this public key, returning `(shared_secret,
    /// ciphertext)`. For X25519 the "ciphertext" is an ephemeral public key
    /// (X25519 is treated as a KEM per spec §3's unified scheme list).
    pub fn encapsulate(
        &self,
        rng: &mut impl RandomNumberGenerator,
    ) -> Result<([u8; 32], EncapsulationCiphertext)> {
        match self {
            Self::X25519(public_key) => {
                let ephemeral = bc_crypto::ecdh::X25519PrivateKey::generate(rng);
                let shared_point = ephemeral.agree(public_key);
                let mut secret = [0u8; 32];
                secret.copy_from_slice(&bc_crypto::hkdf_sha256(&[], &shared_point, X25519_KEM_INFO, 32));
                Ok((secret, EncapsulationCiphertext::X25519(ephemeral.public_key())))
            }
            Self::MlKem512(encap) => {
                let (ct, ss) = bc_crypto::pqc::ml_kem_512::encapsulate(encap, rng)?;
                Ok((fixed_secret(ss)?, EncapsulationCiphertext::MlKem512(ct)))
            }
            Self::MlKem768(encap) => {
                let (ct, ss) = bc_crypto::pqc::ml_kem_768::encapsulate(encap, rng)?;
                Ok((fixed_secret(ss)?, EncapsulationCiphertext::MlKem768(ct)))
            }
            Self::MlKem1024(encap) => {
                let (ct, ss) = bc_crypto::pqc::ml_kem_1024::encapsulate(encap, rng)?;
                Ok((fixed_secret(ss)?, EncapsulationCiphertext::MlKem1024(ct)))
            }
        }
    }
}

impl From<EncapsulationPublicKey> for CBOR {
    fn from(key: EncapsulationPublicKey) -> Self {
        let (scheme, bytes) = match key {
            EncapsulationPublicKey::X25519(pk) => (SCHEME_X25519, pk.to_bytes().to_vec()),
            EncapsulationPublicKey::MlKem512(bytes) => (SCHEME_ML_KEM_512, bytes),
            EncapsulationPublicKey::MlKem768(bytes) => (SCHEME_ML_KEM_768, bytes),
            EncapsulationPublicKey::MlKem1024(bytes) => (SCHEME_ML_KEM_1024, bytes),
        };
        CBOR::tagged_value(
            TAG_ENCAPSULATION_PUBLIC_KEY,
            CBOR::array(vec![CBOR::from(scheme), CBOR::from(bytes)]),
        )
    }
}

impl TryFrom<CBOR> for EncapsulationPublicKey {
    type Error = ComponentError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let (tag, inner) = cbor
            .as_tagged()
            .ok_or_else(|| ComponentError::InvalidFormat("encapsulation-public-key".into()))?;
        if tag.value() != TAG_ENCAPSULATION_PUBLIC_KEY {
            return Err(ComponentError::InvalidTag { tag: tag.value() });
        }
        let items = inner
            .as_array()
            .ok_or_else(|| ComponentError::InvalidFormat("encapsulation-public-key".into()))?;
        let [scheme, bytes] = items else {
            return Err(ComponentError::InvalidFormat("encapsulation-public-key".into()));
        };
        let scheme = scheme.as_unsigned().ok_or_else(|| ComponentError::InvalidFormat("scheme".into()))?;
        let bytes = bytes
            .as_byte_string()
            .ok_or_else(|| ComponentError::InvalidFormat("encapsulation-public-key".into()))?
            .to_vec();
        match scheme {
            SCHEME_X25519 => {
                let array: [u8; 32] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| ComponentError::InvalidSize { expected: 32, actual: bytes.len() })?;
                Ok(Self::X25519(bc_crypto::ecdh::X25519PublicKey::from_bytes(array)?))
            }
            SCHEME_ML_KEM_512 => Ok(Self::MlKem512(bytes)),
            SCHEME_ML_KEM_768 => Ok(Self::MlKem768(bytes)),
            SCHEME_ML_KEM_1024 => Ok(Self::MlKem1024(bytes)),
            other => Err(ComponentError::InvalidFormat(format!("unknown encapsulation scheme {other}"))),
        }
    }
}

impl From<EncapsulationCiphertext> for CBOR {
    fn from(ciphertext: EncapsulationCiphertext) -> Self {
        let (scheme, bytes) = match ciphertext {
            EncapsulationCiphertext::X25519(pk) => (SCHEME_X25519, pk.to_bytes().to_vec()),
            EncapsulationCiphertext::MlKem512(bytes) => (SCHEME_ML_KEM_512, bytes),
            EncapsulationCiphertext::MlKem768(bytes) => (SCHEME_ML_KEM_768, bytes),
            EncapsulationCiphertext::MlKem1024(bytes) => (SCHEME_ML_KEM_1024, bytes),
        };
        CBOR::array(vec![CBOR::from(scheme), CBOR::from(bytes)])
    }
}

impl TryFrom<CBOR> for EncapsulationCiphertext {
    type Error = ComponentError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let items = cbor
            .as_array()
            .ok_or_else(|| ComponentError::InvalidFormat("encapsulation-ciphertext".into()))?;
        let [scheme, bytes] = items else {
            return Err(ComponentError::InvalidFormat("encapsulation-ciphertext".into()));
        };
        let scheme = scheme.as_unsigned().ok_or_else(|| ComponentError::InvalidFormat("scheme".into()))?;
        let bytes = bytes
            .as_byte_string()
            .ok_or_else(|| ComponentError::InvalidFormat("encapsulation-ciphertext".into()))?
            .to_vec();
        match scheme {
            SCHEME_X25519 => {
                let array: [u8; 32] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| ComponentError::InvalidSize { expected: 32, actual: bytes.len() })?;
                Ok(Self::X25519(bc_crypto::ecdh::X25519PublicKey::from_bytes(array)?))
            }
            SCHEME_ML_KEM_512 => Ok(Self::MlKem512(bytes)),
            SCHEME_ML_KEM_768 => Ok(Self::MlKem768(bytes)),
            SCHEME_ML_KEM_1024 => Ok(Self::MlKem1024(bytes)),
            other => Err(ComponentError::InvalidFormat(format!("unknown encapsulation scheme {other}"))),
        }
    }
}
