//! SPQR: a post-quantum sub-ratchet chained alongside the classical
//! Diffie-Hellman ratchet. One side samples a fresh ML-KEM-768 keypair each
//! epoch ([`roles::SendEk`]); the other encapsulates to it and replies
//! ([`roles::SendCt`]). Both sides derive the same `epochSecret` and fold it
//! into a shared [`authenticator::Authenticator`], which also MACs the
//! header and ciphertext exchanged along the way.

pub mod authenticator;
pub mod chain;
pub mod error;
pub mod roles;
pub mod wire;

pub use authenticator::{derive_epoch_secret, Authenticator};
pub use chain::{OooCache, MAX_JUMP, MAX_OOO_KEYS};
pub use error::{Result, SpqrError};
pub use roles::{EpochResult, SendCt, SendEk};

#[cfg(test)]
mod tests {
    use super::*;

    /// Drives both roles through several consecutive epochs, confirming
    /// each epoch's `epochSecret` and the authenticator's `rootKey` agree on
    /// both sides (spec §8, Testable Property 7).
    #[test]
    fn multiple_epochs_stay_in_agreement_on_both_sides() {
        let mut rng = bc_rand::make_fake_random_number_generator(42);
        let mut ek_auth = Authenticator::new([1u8; 32], [2u8; 32]);
        let mut ct_auth = Authenticator::new([1u8; 32], [2u8; 32]);

        for epoch in 0..3u64 {
            let mut send_ek = SendEk::new();
            let mut send_ct = SendCt::new();

            let (hdr, hdr_mac) = send_ek.send_header(&mut rng, &ek_auth, epoch).unwrap();
            let recv_epoch = send_ct.recv_header(&ct_auth, &hdr, &hdr_mac).unwrap();
            assert_eq!(recv_epoch, epoch);

            let ek = send_ek.send_ek().unwrap();
            let (ct1, ct2, ct_mac, ct_result) = send_ct.send_ct(&mut rng, &ct_auth, &ek).unwrap();

            send_ek.recv_ct1(ct1).unwrap();
            let ek_result = send_ek.recv_ct2(&ct2, &ct_mac, &ek_auth).unwrap();

            assert_eq!(ek_result.epoch_secret, ct_result.epoch_secret);
            assert_eq!(*ek_result.authenticator.root_key(), *ct_result.authenticator.root_key());

            ek_auth = ek_result.authenticator;
            ct_auth = ct_result.authenticator;
        }
    }

    #[test]
    fn corrupted_ciphertext_mac_is_rejected() {
        let mut rng = bc_rand::make_fake_random_number_generator(7);
        let auth = Authenticator::new([3u8; 32], [4u8; 32]);

        let mut send_ek = SendEk::new();
        let mut send_ct = SendCt::new();

        let (hdr, hdr_mac) = send_ek.send_header(&mut rng, &auth, 0).unwrap();
        send_ct.recv_header(&auth, &hdr, &hdr_mac).unwrap();
        let ek = send_ek.send_ek().unwrap();
        let (ct1, ct2, mut ct_mac, _) = send_ct.send_ct(&mut rng, &auth, &ek).unwrap();
        ct_mac[0] ^= 0xFF;

        send_ek.recv_ct1(ct1).unwrap();
        assert!(matches!(send_ek.recv_ct2(&ct2, &ct_mac, &auth), Err(SpqrError::InvalidMac)));
    }
}
