//! X3DH key agreement: the one-time handshake that produces the shared
//! secret and initial ratchet key the [`crate::session::Session`] is seeded
//! with (spec §4.3.1's `processPreKeyBundle`).

use bc_crypto::ecdh::{X25519PrivateKey, X25519PublicKey};
use bc_crypto::signing::{ed25519_sign, ed25519_verify, ED25519_PRIVATE_KEY_SIZE, ED25519_PUBLIC_KEY_SIZE, ED25519_SIGNATURE_SIZE};
use bc_rand::RandomNumberGenerator;

use crate::error::{RatchetError, Result};

/// A long-lived Ed25519 identity used to sign this party's current signed
/// prekey, plus the X25519 key used directly in the X3DH Diffie-Hellman
/// computations.
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

    fn sign(&self, message: &[u8]) -> [u8; ED25519_SIGNATURE_SIZE] {
        ed25519_sign(&self.signing_key, message)
    }
}

/// A rotating, signed X25519 prekey, published alongside the identity key so
/// any peer can run X3DH without that party being online.
pub struct SignedPreKeyPair {
    pub id: u32,
    dh_key: X25519PrivateKey,
    pub signature: [u8; ED25519_SIGNATURE_SIZE],
}

impl SignedPreKeyPair {
    pub fn generate(rng: &mut impl RandomNumberGenerator, id: u32, identity: &IdentityKeyPair) -> Self {
        let dh_key = X25519PrivateKey::generate(rng);
        let public_bytes = dh_key.public_key().to_bytes();
        let signature = identity.sign(&public_bytes);
        Self { id, dh_key, signature }
    }

    pub fn public_key(&self) -> X25519PublicKey { self.dh_key.public_key() }

    /// Consumes the pair, handing ownership of the private scalar to a
    /// [`crate::session::Session`] that will use it as its initial sending
    /// ratchet key (the responder side reuses its signed prekey secret as
    /// the first DH ratchet key, per spec §4.3.1).
    pub fn into_dh_private_key(self) -> X25519PrivateKey { self.dh_key }
}

/// A one-time X25519 prekey: consumed by the first peer to use it (spec §3
/// `PreKeyBundle`'s optional fourth Diffie-Hellman term).
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

/// The published material a peer fetches to start a session without its
/// owner being online: identity key, current signed prekey (with
/// signature), and optionally one one-time prekey.
pub struct PreKeyBundle {
    pub identity_key: X25519PublicKey,
    pub identity_signing_key: [u8; ED25519_PUBLIC_KEY_SIZE],
    pub signed_prekey_id: u32,
    pub signed_prekey: X25519PublicKey,
    pub signed_prekey_signature: [u8; ED25519_SIGNATURE_SIZE],
    pub one_time_prekey_id: Option<u32>,
    pub one_time_prekey: Option<X25519PublicKey>,
}

/// The output of running X3DH as the initiator: the 32-byte shared secret
/// that seeds the root key, plus the ephemeral base key the responder needs
/// to reproduce the same computation.
pub struct InitiatorHandshake {
    pub shared_secret: [u8; 32],
    pub base_key: X25519PublicKey,
    pub used_one_time_prekey: Option<u32>,
}

const X3DH_PREFIX: [u8; 32] = [0xFFu8; 32];
const X3DH_INFO: &[u8] = b"WhisperText";

/// Alice's half of X3DH: verify the bundle's signature, generate an
/// ephemeral base key, and combine `DH1..DH4` into a single shared secret
/// (spec §4.3.1/§4.3.2's "assemble secret input" step, minus the ML-KEM
/// term the triple ratchet adds on top).
pub fn initiate(
    rng: &mut impl RandomNumberGenerator,
    identity: &IdentityKeyPair,
    bundle: &PreKeyBundle,
) -> Result<InitiatorHandshake> {
    ed25519_verify(
        &bundle.identity_signing_key,
        &bundle.signed_prekey.to_bytes(),
        &bundle.signed_prekey_signature,
    )
    .map_err(|_| RatchetError::InvalidSignature)?;

    let base_key = X25519PrivateKey::generate(rng);

    let dh1 = identity.dh_key.agree(&bundle.signed_prekey);
    let dh2 = base_key.agree(&bundle.identity_key);
    let dh3 = base_key.agree(&bundle.signed_prekey);
    let dh4 = bundle.one_time_prekey.map(|opk| base_key.agree(&opk));

    let shared_secret = combine_dh_outputs(&dh1, &dh2, &dh3, dh4.as_ref());

    Ok(InitiatorHandshake {
        shared_secret,
        base_key: base_key.public_key(),
        used_one_time_prekey: bundle.one_time_prekey_id,
    })
}

/// Bob's half of X3DH: reproduce the same `DH1..DH4` outputs from the
/// identity/signed-prekey/one-time-prekey secrets he holds plus Alice's
/// public base key, carried in the `PreKeySignalMessage`.
pub fn respond(
    identity: &IdentityKeyPair,
    signed_prekey: &SignedPreKeyPair,
    one_time_prekey: Option<&OneTimePreKeyPair>,
    their_identity_key: &X25519PublicKey,
    their_base_key: &X25519PublicKey,
) -> [u8; 32] {
    let dh1 = signed_prekey.dh_key.agree(their_identity_key);
    let dh2 = identity.dh_key.agree(their_base_key);
    let dh3 = signed_prekey.dh_key.agree(their_base_key);
    let dh4 = one_time_prekey.map(|opk| opk.dh_key.agree(their_base_key));

    combine_dh_outputs(&dh1, &dh2, &dh3, dh4.as_ref())
}

fn combine_dh_outputs(dh1: &[u8; 32], dh2: &[u8; 32], dh3: &[u8; 32], dh4: Option<&[u8; 32]>) -> [u8; 32] {
    let mut ikm = Vec::with_capacity(32 + 32 * 4);
    ikm.extend_from_slice(&X3DH_PREFIX);
    ikm.extend_from_slice(dh1);
    ikm.extend_from_slice(dh2);
    ikm.extend_from_slice(dh3);
    if let Some(dh4) = dh4 {
        ikm.extend_from_slice(dh4);
    }
    let okm = bc_crypto::hkdf_sha256(&[], &ikm, X3DH_INFO, 32);
    let mut out = [0u8; 32];
    out.copy_from_slice(&okm);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initiator_and_responder_agree_on_the_shared_secret() {
        let mut rng = bc_rand::make_fake_random_number_generator(1);
        let bob_identity = IdentityKeyPair::generate(&mut rng);
        let bob_spk = SignedPreKeyPair::generate(&mut rng, 1, &bob_identity);
        let bob_opk = OneTimePreKeyPair::generate(&mut rng, 1);

        let alice_identity = IdentityKeyPair::generate(&mut rng);

        let bundle = PreKeyBundle {
            identity_key: bob_identity.dh_public_key(),
            identity_signing_key: bob_identity.signing_public_key(),
            signed_prekey_id: bob_spk.id,
            signed_prekey: bob_spk.public_key(),
            signed_prekey_signature: bob_spk.signature,
            one_time_prekey_id: Some(bob_opk.id),
            one_time_prekey: Some(bob_opk.public_key()),
        };

        let handshake = initiate(&mut rng, &alice_identity, &bundle).unwrap();

        let bob_secret = respond(
            &bob_identity,
            &bob_spk,
            Some(&bob_opk),
            &alice_identity.dh_public_key(),
            &handshake.base_key,
        );

        assert_eq!(handshake.shared_secret, bob_secret);
    }

    #[test]
    fn tampered_signed_prekey_signature_is_rejected() {
        let mut rng = bc_rand::make_fake_random_number_generator(2);
        let bob_identity = IdentityKeyPair::generate(&mut rng);
        let bob_spk = SignedPreKeyPair::generate(&mut rng, 1, &bob_identity);
        let alice_identity = IdentityKeyPair::generate(&mut rng);

        let mut bad_signature = bob_spk.signature;
        bad_signature[0] ^= 0xFF;

        let bundle = PreKeyBundle {
            identity_key: bob_identity.dh_public_key(),
            identity_signing_key: bob_identity.signing_public_key(),
            signed_prekey_id: bob_spk.id,
            signed_prekey: bob_spk.public_key(),
            signed_prekey_signature: bad_signature,
            one_time_prekey_id: None,
            one_time_prekey: None,
        };

        assert!(matches!(
            initiate(&mut rng, &alice_identity, &bundle),
            Err(RatchetError::InvalidSignature)
        ));
    }
}
