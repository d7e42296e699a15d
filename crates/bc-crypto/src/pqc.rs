//! Post-quantum primitives: ML-KEM (768/1024) and ML-DSA (44/65/87).

use ml_kem::{EncodedSizeUser, KemCore, kem::{Decapsulate, Encapsulate}};
use ml_kem::{MlKem512, MlKem768, MlKem1024};

use crate::error::{CryptoError, Result};

/// The 1-byte scheme prefix carried alongside ML-KEM-1024 public keys and
/// ciphertexts on the wire (spec §3/§6: "Kyber-prekey bytes include a 1-byte
/// type prefix (`0x08` for ML-KEM-1024) which is idempotent: present in wire
/// form, stripped for the KEM primitive, reprefixed for MAC domain
/// separation").
pub const ML_KEM_1024_TYPE_PREFIX: u8 = 0x08;

pub fn strip_type_prefix(bytes: &[u8]) -> Result<(u8, &[u8])> {
    if bytes.is_empty() {
        return Err(CryptoError::InvalidKey);
    }
    Ok((bytes[0], &bytes[1..]))
}

pub fn with_type_prefix(prefix: u8, bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 1);
    out.push(prefix);
    out.extend_from_slice(bytes);
    out
}

macro_rules! ml_kem_impl {
    ($mod_name:ident, $scheme:ty) => {
        pub mod $mod_name {
            use super::*;

            pub fn generate(
                rng: &mut impl bc_rand::RandomNumberGenerator,
            ) -> (Vec<u8>, Vec<u8>) {
                // The ml-kem crate wants an `rand_core::CryptoRngCore`; bridge
                // our abstraction with a tiny adapter so every PQ key
                // generation in this crate still goes through the same
                // `RandomNumberGenerator` seam as everything else.
                struct Adapter<'a, R: bc_rand::RandomNumberGenerator>(&'a mut R);
                impl<'a, R: bc_rand::RandomNumberGenerator> rand_core::RngCore for Adapter<'a, R> {
                    fn next_u32(&mut self) -> u32 { self.0.next_u32() }
                    fn next_u64(&mut self) -> u64 { self.0.next_u64() }
                    fn fill_bytes(&mut self, dest: &mut [u8]) { self.0.fill_random_data(dest) }
                    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand_core::Error> {
                        self.0.fill_random_data(dest);
                        Ok(())
                    }
                }
                impl<'a, R: bc_rand::RandomNumberGenerator> rand_core::CryptoRng for Adapter<'a, R> {}

                let mut adapter = Adapter(rng);
                let (decap_key, encap_key) = <$scheme as KemCore>::generate(&mut adapter);
                (decap_key.as_bytes().to_vec(), encap_key.as_bytes().to_vec())
            }

            pub fn encapsulate(
                encap_key_bytes: &[u8],
                rng: &mut impl bc_rand::RandomNumberGenerator,
            ) -> Result<(Vec<u8>, Vec<u8>)> {
                struct Adapter<'a, R: bc_rand::RandomNumberGenerator>(&'a mut R);
                impl<'a, R: bc_rand::RandomNumberGenerator> rand_core::RngCore for Adapter<'a, R> {
                    fn next_u32(&mut self) -> u32 { self.0.next_u32() }
                    fn next_u64(&mut self) -> u64 { self.0.next_u64() }
                    fn fill_bytes(&mut self, dest: &mut [u8]) { self.0.fill_random_data(dest) }
                    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand_core::Error> {
                        self.0.fill_random_data(dest);
                        Ok(())
                    }
                }
                impl<'a, R: bc_rand::RandomNumberGenerator> rand_core::CryptoRng for Adapter<'a, R> {}

                let encap_key = <$scheme as KemCore>::EncapsulationKey::from_bytes(
                    encap_key_bytes.try_into().map_err(|_| CryptoError::InvalidKey)?,
                );
                let mut adapter = Adapter(rng);
                let (ciphertext, shared_secret) = encap_key
                    .encapsulate(&mut adapter)
                    .map_err(|_| CryptoError::EncapsulationFailed)?;
                Ok((ciphertext.to_vec(), shared_secret.to_vec()))
            }

            pub fn decapsulate(decap_key_bytes: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
                let decap_key = <$scheme as KemCore>::DecapsulationKey::from_bytes(
                    decap_key_bytes.try_into().map_err(|_| CryptoError::InvalidKey)?,
                );
                let shared_secret = decap_key
                    .decapsulate(ciphertext.try_into().map_err(|_| CryptoError::InvalidKey)?)
                    .map_err(|_| CryptoError::DecapsulationFailed)?;
                Ok(shared_secret.to_vec())
            }
        }
    };
}

ml_kem_impl!(ml_kem_512, MlKem512);
ml_kem_impl!(ml_kem_768, MlKem768);
ml_kem_impl!(ml_kem_1024, MlKem1024);

/// ML-DSA signing, parameterized by security level (44/65/87). Grounded in
/// the same wrapper shape as the Ed25519/secp256k1 modules: raw byte
/// in/byte out, no trait objects leaking into callers.
pub mod ml_dsa {
    use ml_dsa::{KeyGen, MlDsa44, MlDsa65, MlDsa87, Signature, signature::{Signer as _, Verifier as _}};

    use super::{CryptoError, Result};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MlDsaLevel { MlDsa44, MlDsa65, MlDsa87 }

    pub fn generate(
        level: MlDsaLevel,
        seed: &[u8; 32],
    ) -> (Vec<u8>, Vec<u8>) {
        match level {
            MlDsaLevel::MlDsa44 => {
                let kp = MlDsa44::key_gen_internal(seed.into());
                (kp.signing_key().encode().to_vec(), kp.verifying_key().encode().to_vec())
            }
            MlDsaLevel::MlDsa65 => {
                let kp = MlDsa65::key_gen_internal(seed.into());
                (kp.signing_key().encode().to_vec(), kp.verifying_key().encode().to_vec())
            }
            MlDsaLevel::MlDsa87 => {
                let kp = MlDsa87::key_gen_internal(seed.into());
                (kp.signing_key().encode().to_vec(), kp.verifying_key().encode().to_vec())
            }
        }
    }

    pub fn sign(level: MlDsaLevel, signing_key_bytes: &[u8], message: &[u8]) -> Result<Vec<u8>> {
        match level {
            MlDsaLevel::MlDsa44 => {
                let sk = ml_dsa::SigningKey::<MlDsa44>::decode(
                    signing_key_bytes.try_into().map_err(|_| CryptoError::InvalidKey)?,
                );
                Ok(sk.sign(message).encode().to_vec())
            }
            MlDsaLevel::MlDsa65 => {
                let sk = ml_dsa::SigningKey::<MlDsa65>::decode(
                    signing_key_bytes.try_into().map_err(|_| CryptoError::InvalidKey)?,
                );
                Ok(sk.sign(message).encode().to_vec())
            }
            MlDsaLevel::MlDsa87 => {
                let sk = ml_dsa::SigningKey::<MlDsa87>::decode(
                    signing_key_bytes.try_into().map_err(|_| CryptoError::InvalidKey)?,
                );
                Ok(sk.sign(message).encode().to_vec())
            }
        }
    }

    pub fn verify(
        level: MlDsaLevel,
        verifying_key_bytes: &[u8],
        message: &[u8],
        signature_bytes: &[u8],
    ) -> Result<()> {
        macro_rules! verify_for {
            ($scheme:ty) => {{
                let vk = ml_dsa::VerifyingKey::<$scheme>::decode(
                    verifying_key_bytes.try_into().map_err(|_| CryptoError::InvalidKey)?,
                );
                let sig = Signature::<$scheme>::decode(
                    signature_bytes.try_into().map_err(|_| CryptoError::InvalidSignature)?,
                )
                .ok_or(CryptoError::InvalidSignature)?;
                vk.verify(message, &sig).map_err(|_| CryptoError::InvalidSignature)
            }};
        }
        match level {
            MlDsaLevel::MlDsa44 => verify_for!(MlDsa44),
            MlDsaLevel::MlDsa65 => verify_for!(MlDsa65),
            MlDsaLevel::MlDsa87 => verify_for!(MlDsa87),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ml_kem_768_round_trip() {
        let mut rng = bc_rand::make_fake_random_number_generator(11);
        let (decap, encap) = ml_kem_768::generate(&mut rng);
        let (ciphertext, shared_a) = ml_kem_768::encapsulate(&encap, &mut rng).unwrap();
        let shared_b = ml_kem_768::decapsulate(&decap, &ciphertext).unwrap();
        assert_eq!(shared_a, shared_b);
    }

    #[test]
    fn ml_kem_1024_type_prefix_round_trips() {
        let data = vec![1, 2, 3];
        let prefixed = with_type_prefix(ML_KEM_1024_TYPE_PREFIX, &data);
        let (prefix, rest) = strip_type_prefix(&prefixed).unwrap();
        assert_eq!(prefix, ML_KEM_1024_TYPE_PREFIX);
        assert_eq!(rest, data.as_slice());
    }
}
