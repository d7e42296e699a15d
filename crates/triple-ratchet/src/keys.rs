//! PQXDH key agreement (spec §4.3.2's `processPreKeyBundle`): X3DH's
//! Diffie-Hellman terms plus an ML-KEM-1024 encapsulation against a
//! signed "kyber prekey", combined into 96 bytes of output key material that
//! seeds the classical root/chain keys and the SPQR authenticator's shared
//! key in one step.

use bc_crypto::ecdh::{X25519PrivateKey, X25519PublicKey};
use bc_crypto::signing::{ed25519_sign, ed25519_verify, ED25519_PRIVATE_KEY_SIZE, ED25519_PUBLIC_KEY_SIZE, ED25519_SIGNATURE_SIZE};
use bc_rand::RandomNumberGenerator;

use crate::error::{Result, TripleRatchetError};

pub struct IdentityKeyPair {
    signing_key: [u8; ED25519_PRIVATE_KEY_SIZE],
    signing_public: [u8; ED25519_PUBLIC_KEY_SIZE],
    dh_key: X25519PrivateKey,
}

impl IdentityKeyPair {
    pub fn generate(rng: &mut impl RandomNumberGenerator) -> Self {
        let (signing_key, signing_public) = bc_crypto::signing::ed25519_generate(rng);
        let dh_key = X25519PrivateKey::generate(rng);
        Self { signing_key, signing_public, dh_key }
    }

    pub fn dh_public_key(&self) -> X25519PublicKey { self.dh_key.public_key() }
    pub fn signing_public_key(&self) -> [u8; ED25519_PUBLIC_KEY_SIZE] { self.signing_public }

    fn sign(&self, message: &[u8]) -> [u8; ED25519_SIGNATURE_SIZE] { ed25519_sign(&self.signing_key, message) }
}

pub struct SignedPreKeyPair {
    pub id: u32,
    dh_key: X25519PrivateKey,
    pub signature: [u8; ED25519_SIGNATURE_SIZE],
}

impl SignedPreKeyPair {
    pub fn generate(rng: &mut impl RandomNumberGenerator, id: u32, identity: &IdentityKeyPair) -> Self {
        let dh_key = X25519PrivateKey::generate(rng);
        let signature = identity.sign(&dh_key.public_key().to_bytes());
        Self { id, dh_key, signature }
    }

    pub fn public_key(&self) -> X25519PublicKey { self.dh_key.public_key() }
    pub fn into_dh_private_key(self) -> X25519PrivateKey { self.dh_key }
}

pub struct OneTimePreKeyPair {
    pub id: u32,
    dh_key: X25519PrivateKey,
}

impl OneTimePreKeyPair {
    pub fn generate(rng: &mut impl RandomNumberGenerator, id: u32) -> Self {
        Self { id, dh_key: X25519PrivateKey::generate(rng) }
    }

    pub fn public_key(&self) -> X25519PublicKey { self.dh_key.public_key() }
}

/// A rotating, signed ML-KEM-1024 encapsulation key: the "kyber prekey" that
/// lets PQXDH fold a post-quantum shared secret into the classical X3DH
/// output without either party needing to be online.
pub struct KyberPreKeyPair {
    pub id: u32,
    decap_key: Vec<u8>,
    pub encap_key: Vec<u8>,
    pub signature: [u8; ED25519_SIGNATURE_SIZE],
}

impl KyberPreKeyPair {
    pub fn generate(rng: &mut impl RandomNumberGenerator, id: u32, identity: &IdentityKeyPair) -> Self {
        let (decap_key, encap_key) = bc_crypto::pqc::ml_kem_1024::generate(rng);
        let signature = identity.sign(&encap_key);
        Self { id, decap_key, encap_key, signature }
    }
}

pub struct PreKeyBundle {
    pub identity_key: X25519PublicKey,
    pub identity_signing_key: [u8; ED25519_PUBLIC_KEY_SIZE],
    pub signed_prekey_id: u32,
    pub signed_prekey: X25519PublicKey,
    pub signed_prekey_signature: [u8; ED25519_SIGNATURE_SIZE],
    pub one_time_prekey_id: Option<u32>,
    pub one_time_prekey: Option<X25519PublicKey>,
    pub kyber_prekey_id: u32,
    pub kyber_prekey: Vec<u8>,
    pub kyber_prekey_signature: [u8; ED25519_SIGNATURE_SIZE],
}

/// The 96 bytes of output key material PQXDH produces, already split into
/// the classical root key, the classical first chain key, and the key that
/// seeds the braided SPQR authenticator.
pub struct HandshakeSecrets {
    pub root_key: [u8; 32],
    pub chain_key: [u8; 32],
    pub pqr_auth_key: [u8; 32],
}

pub struct InitiatorHandshake {
    pub secrets: HandshakeSecrets,
    pub base_key: X25519PublicKey,
    pub kyber_ciphertext: Vec<u8>,
    pub used_one_time_prekey: Option<u32>,
}

const PQXDH_PREFIX: [u8; 32] = [0xFFu8; 32];
const PQXDH_INFO: &[u8] = b"WhisperText_X25519_SHA-256_CRYSTALS-KYBER-1024";

pub fn initiate(
    rng: &mut impl RandomNumberGenerator,
    identity: &IdentityKeyPair,
    bundle: &PreKeyBundle,
) -> Result<InitiatorHandshake> {
    ed25519_verify(&bundle.identity_signing_key, &bundle.signed_prekey.to_bytes(), &bundle.signed_prekey_signature)
        .map_err(|_| TripleRatchetError::InvalidSignature)?;
    ed25519_verify(&bundle.identity_signing_key, &bundle.kyber_prekey, &bundle.kyber_prekey_signature)
        .map_err(|_| TripleRatchetError::InvalidSignature)?;

    let base_key = X25519PrivateKey::generate(rng);

    let dh1 = identity.dh_key.agree(&bundle.signed_prekey);
    let dh2 = base_key.agree(&bundle.identity_key);
    let dh3 = base_key.agree(&bundle.signed_prekey);
    let dh4 = bundle.one_time_prekey.map(|opk| base_key.agree(&opk));

    let (kyber_ciphertext, kyber_shared_secret) = bc_crypto::pqc::ml_kem_1024::encapsulate(&bundle.kyber_prekey, rng)
        .map_err(|_| TripleRatchetError::InvalidFormat)?;

    let secrets = combine(&dh1, &dh2, &dh3, dh4.as_ref(), &kyber_shared_secret);

    Ok(InitiatorHandshake {
        secrets,
        base_key: base_key.public_key(),
        kyber_ciphertext,
        used_one_time_prekey: bundle.one_time_prekey_id,
    })
}

pub fn respond(
    identity: &IdentityKeyPair,
    signed_prekey: &SignedPreKeyPair,
    kyber_prekey: &KyberPreKeyPair,
    one_time_prekey: Option<&OneTimePreKeyPair>,
    their_identity_key: &X25519PublicKey,
    their_base_key: &X25519PublicKey,
    kyber_ciphertext: &[u8],
) -> Result<HandshakeSecrets> {
    let dh1 = signed_prekey.dh_key.agree(their_identity_key);
    let dh2 = identity.dh_key.agree(their_base_key);
    let dh3 = signed_prekey.dh_key.agree(their_base_key);
    let dh4 = one_time_prekey.map(|opk| opk.dh_key.agree(their_base_key));

    let kyber_shared_secret = bc_crypto::pqc::ml_kem_1024::decapsulate(&kyber_prekey.decap_key, kyber_ciphertext)
        .map_err(|_| TripleRatchetError::InvalidFormat)?;

    Ok(combine(&dh1, &dh2, &dh3, dh4.as_ref(), &kyber_shared_secret))
}

fn combine(
    dh1: &[u8; 32],
    dh2: &[u8; 32],
    dh3: &[u8; 32],
    dh4: Option<&[u8; 32]>,
    kyber_shared_secret: &[u8],
) -> HandshakeSecrets {
    let mut ikm = Vec::with_capacity(32 + 32 * 4 + kyber_shared_secret.len());
    ikm.extend_from_slice(&PQXDH_PREFIX);
    ikm.extend_from_slice(dh1);
    ikm.extend_from_slice(dh2);
    ikm.extend_from_slice(dh3);
    if let Some(dh4) = dh4 {
        ikm.extend_from_slice(dh4);
    }
    ikm.extend_from_slice(kyber_shared_secret);

    let okm = bc_crypto::hkdf_sha256(&[], &ikm, PQXDH_INFO, 96);
    let mut root_key = [0u8; 32];
    let mut chain_key = [0u8; 32];
    let mut pqr_auth_key = [0u8; 32];
    root_key.copy_from_slice(&okm[..32]);
    chain_key.copy_from_slice(&okm[32..64]);
    pqr_auth_key.copy_from_slice(&okm[64..96]);
    HandshakeSecrets { root_key, chain_key, pqr_auth_key }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle_from(bob_identity: &IdentityKeyPair, bob_spk: &SignedPreKeyPair, bob_kpk: &KyberPreKeyPair) -> PreKeyBundle {
        PreKeyBundle {
            identity_key: bob_identity.dh_public_key(),
            identity_signing_key: bob_identity.signing_public_key(),
            signed_prekey_id: bob_spk.id,
            signed_prekey: bob_spk.public_key(),
            signed_prekey_signature: bob_spk.signature,
            one_time_prekey_id: None,
            one_time_prekey: None,
            kyber_prekey_id: bob_kpk.id,
            kyber_prekey: bob_kpk.encap_key.clone(),
            kyber_prekey_signature: bob_kpk.signature,
        }
    }

    #[test]
    fn initiator_and_responder_agree_on_all_three_secrets() {
        let mut rng = bc_rand::make_fake_random_number_generator(1);
        let bob_identity = IdentityKeyPair::generate(&mut rng);
        let bob_spk = SignedPreKeyPair::generate(&mut rng, 1, &bob_identity);
        let bob_kpk = KyberPreKeyPair::generate(&mut rng, 1, &bob_identity);
        let alice_identity = IdentityKeyPair::generate(&mut rng);

        let bundle = bundle_from(&bob_identity, &bob_spk, &bob_kpk);
        let handshake = initiate(&mut rng, &alice_identity, &bundle).unwrap();

        let bob_secrets = respond(
            &bob_identity,
            &bob_spk,
            &bob_kpk,
            None,
            &alice_identity.dh_public_key(),
            &handshake.base_key,
            &handshake.kyber_ciphertext,
        )
        .unwrap();

        assert_eq!(handshake.secrets.root_key, bob_secrets.root_key);
        assert_eq!(handshake.secrets.chain_key, bob_secrets.chain_key);
        assert_eq!(handshake.secrets.pqr_auth_key, bob_secrets.pqr_auth_key);
    }

    #[test]
    fn tampered_kyber_prekey_signature_is_rejected() {
        let mut rng = bc_rand::make_fake_random_number_generator(2);
        let bob_identity = IdentityKeyPair::generate(&mut rng);
        let bob_spk = SignedPreKeyPair::generate(&mut rng, 1, &bob_identity);
        let bob_kpk = KyberPreKeyPair::generate(&mut rng, 1, &bob_identity);
        let alice_identity = IdentityKeyPair::generate(&mut rng);

        let mut bundle = bundle_from(&bob_identity, &bob_spk, &bob_kpk);
        bundle.kyber_prekey_signature[0] ^= 0xFF;

        assert!(matches!(initiate(&mut rng, &alice_identity, &bundle), Err(TripleRatchetError::InvalidSignature)));
    }
}
