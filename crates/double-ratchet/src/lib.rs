//! The classical (X3DH) double ratchet: a symmetric-key ratchet for
//! per-message forward secrecy, braided with a Diffie-Hellman ratchet for
//! post-compromise security. `triple-ratchet` builds on top of this crate,
//! adding a post-quantum ML-KEM lane via `spqr`.

pub mod chain;
pub mod error;
pub mod keys;
pub mod session;
pub mod wire;

pub use error::{RatchetError, Result};
pub use keys::{IdentityKeyPair, InitiatorHandshake, OneTimePreKeyPair, PreKeyBundle, SignedPreKeyPair};
pub use session::{MAX_MESSAGE_KEYS, RatchetState, Session, identity_djb};
pub use wire::{PreKeySignalMessage, SignalMessage, VERSION_BYTE};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_session_round_trip_with_out_of_order_delivery() {
        let mut rng = bc_rand::make_fake_random_number_generator(1);

        let bob_identity = IdentityKeyPair::generate(&mut rng);
        let bob_spk = SignedPreKeyPair::generate(&mut rng, 1, &bob_identity);
        let bob_spk_public = bob_spk.public_key();
        let alice_identity = IdentityKeyPair::generate(&mut rng);

        let bundle = PreKeyBundle {
            identity_key: bob_identity.dh_public_key(),
            identity_signing_key: bob_identity.signing_public_key(),
            signed_prekey_id: bob_spk.id,
            signed_prekey: bob_spk_public,
            signed_prekey_signature: bob_spk.signature,
            one_time_prekey_id: None,
            one_time_prekey: None,
        };

        let handshake = keys::initiate(&mut rng, &alice_identity, &bundle).unwrap();

        let alice_identity_djb = identity_djb(&alice_identity.dh_public_key());
        let bob_identity_djb = identity_djb(&bob_identity.dh_public_key());

        let mut alice = Session::new_initiator(
            &mut rng,
            alice_identity_djb,
            bob_identity_djb,
            handshake.shared_secret,
            bob_spk_public,
        );
        let mut bob = Session::new_responder(
            bob_identity_djb,
            alice_identity_djb,
            handshake.shared_secret,
            bob_spk.into_dh_private_key(),
        );

        assert_eq!(alice.state(), RatchetState::PendingPreKey);
        assert_eq!(bob.state(), RatchetState::Fresh);

        let wire0 = alice.encrypt(b"hello bob, message 0").unwrap();
        let wire1 = alice.encrypt(b"hello bob, message 1").unwrap();
        let wire2 = alice.encrypt(b"hello bob, message 2").unwrap();

        let plaintext2 = bob.decrypt(&mut rng, &wire2).unwrap();
        assert_eq!(plaintext2, b"hello bob, message 2");
        assert_eq!(bob.state(), RatchetState::Established);

        let plaintext0 = bob.decrypt(&mut rng, &wire0).unwrap();
        let plaintext1 = bob.decrypt(&mut rng, &wire1).unwrap();
        assert_eq!(plaintext0, b"hello bob, message 0");
        assert_eq!(plaintext1, b"hello bob, message 1");

        assert!(matches!(bob.decrypt(&mut rng, &wire0), Err(RatchetError::DuplicateMessage { .. })));

        let reply = bob.encrypt(b"hi alice").unwrap();
        let reply_plaintext = alice.decrypt(&mut rng, &reply).unwrap();
        assert_eq!(reply_plaintext, b"hi alice");
        assert_eq!(alice.state(), RatchetState::Established);
    }
}
