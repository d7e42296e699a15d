//! The PQXDH triple ratchet: [`keys`] runs the post-quantum-augmented X3DH
//! handshake, and [`session::Session`] braids the resulting classical
//! [`double_ratchet`] lane with a pair of [`spqr`] sub-chains (one per
//! direction) so every message is protected by both a Diffie-Hellman
//! ratchet and a post-quantum KEM ratchet at once.

pub mod error;
pub mod keys;
pub mod session;
pub mod wire;

pub use error::{Result, TripleRatchetError};
pub use keys::{HandshakeSecrets, IdentityKeyPair, InitiatorHandshake, KyberPreKeyPair, OneTimePreKeyPair, PreKeyBundle, SignedPreKeyPair};
pub use session::Session;

#[cfg(test)]
mod tests {
    use super::*;
    use double_ratchet::{RatchetState, identity_djb};

    #[test]
    fn handshake_then_round_trip_before_and_after_an_epoch_transition() {
        let mut rng = bc_rand::make_fake_random_number_generator(1);

        let bob_identity = IdentityKeyPair::generate(&mut rng);
        let bob_spk = SignedPreKeyPair::generate(&mut rng, 1, &bob_identity);
        let bob_spk_public = bob_spk.public_key();
        let bob_kpk = KyberPreKeyPair::generate(&mut rng, 1, &bob_identity);
        let alice_identity = IdentityKeyPair::generate(&mut rng);

        let bundle = PreKeyBundle {
            identity_key: bob_identity.dh_public_key(),
            identity_signing_key: bob_identity.signing_public_key(),
            signed_prekey_id: bob_spk.id,
            signed_prekey: bob_spk_public,
            signed_prekey_signature: bob_spk.signature,
            one_time_prekey_id: None,
            one_time_prekey: None,
            kyber_prekey_id: bob_kpk.id,
            kyber_prekey: bob_kpk.encap_key.clone(),
            kyber_prekey_signature: bob_kpk.signature,
        };

        let handshake = keys::initiate(&mut rng, &alice_identity, &bundle).unwrap();
        let bob_secrets = keys::respond(
            &bob_identity,
            &bob_spk,
            &bob_kpk,
            None,
            &alice_identity.dh_public_key(),
            &handshake.base_key,
            &handshake.kyber_ciphertext,
        )
        .unwrap();

        let alice_identity_djb = identity_djb(&alice_identity.dh_public_key());
        let bob_identity_djb = identity_djb(&bob_identity.dh_public_key());

        let mut alice = Session::new_initiator(
            &mut rng,
            alice_identity_djb,
            bob_identity_djb,
            handshake.secrets,
            bob_spk_public,
        );
        let mut bob = Session::new_responder(
            bob_identity_djb,
            alice_identity_djb,
            bob_secrets,
            bob_spk.into_dh_private_key(),
        );

        assert_eq!(alice.state(), RatchetState::PendingPreKey);
        assert_eq!(bob.state(), RatchetState::Fresh);

        let wire0 = alice.encrypt(b"hybrid message before any pq epoch").unwrap();
        let plaintext0 = bob.decrypt(&mut rng, &wire0).unwrap();
        assert_eq!(plaintext0, b"hybrid message before any pq epoch");
        assert_eq!(bob.state(), RatchetState::Established);

        let (header_frame, ek_frame) = alice.begin_epoch(&mut rng).unwrap();
        let ciphertext_frame = bob.respond_to_epoch(&mut rng, &header_frame, &ek_frame).unwrap();
        alice.complete_epoch(&ciphertext_frame).unwrap();

        let wire1 = alice.encrypt(b"hybrid message after the pq epoch advanced").unwrap();
        let plaintext1 = bob.decrypt(&mut rng, &wire1).unwrap();
        assert_eq!(plaintext1, b"hybrid message after the pq epoch advanced");

        let reply = bob.encrypt(b"bob replying over the braided ratchet").unwrap();
        let reply_plaintext = alice.decrypt(&mut rng, &reply).unwrap();
        assert_eq!(reply_plaintext, b"bob replying over the braided ratchet");
        assert_eq!(alice.state(), RatchetState::Established);
    }

    #[test]
    fn tampered_ciphertext_fails_the_classical_mac_before_the_inner_layer_is_even_reached() {
        let mut rng = bc_rand::make_fake_random_number_generator(2);

        let bob_identity = IdentityKeyPair::generate(&mut rng);
        let bob_spk = SignedPreKeyPair::generate(&mut rng, 1, &bob_identity);
        let bob_spk_public = bob_spk.public_key();
        let bob_kpk = KyberPreKeyPair::generate(&mut rng, 1, &bob_identity);
        let alice_identity = IdentityKeyPair::generate(&mut rng);

        let bundle = PreKeyBundle {
            identity_key: bob_identity.dh_public_key(),
            identity_signing_key: bob_identity.signing_public_key(),
            signed_prekey_id: bob_spk.id,
            signed_prekey: bob_spk_public,
            signed_prekey_signature: bob_spk.signature,
            one_time_prekey_id: None,
            one_time_prekey: None,
            kyber_prekey_id: bob_kpk.id,
            kyber_prekey: bob_kpk.encap_key.clone(),
            kyber_prekey_signature: bob_kpk.signature,
        };

        let handshake = keys::initiate(&mut rng, &alice_identity, &bundle).unwrap();
        let bob_secrets = keys::respond(
            &bob_identity,
            &bob_spk,
            &bob_kpk,
            None,
            &alice_identity.dh_public_key(),
            &handshake.base_key,
            &handshake.kyber_ciphertext,
        )
        .unwrap();

        let alice_identity_djb = identity_djb(&alice_identity.dh_public_key());
        let bob_identity_djb = identity_djb(&bob_identity.dh_public_key());

        let mut alice =
            Session::new_initiator(&mut rng, alice_identity_djb, bob_identity_djb, handshake.secrets, bob_spk_public);
        let mut bob =
            Session::new_responder(bob_identity_djb, alice_identity_djb, bob_secrets, bob_spk.into_dh_private_key());

        let mut wire0 = alice.encrypt(b"message").unwrap();
        *wire0.last_mut().unwrap() ^= 0xFF;

        assert!(bob.decrypt(&mut rng, &wire0).is_err());
    }
}
