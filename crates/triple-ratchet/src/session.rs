//! The braided session (spec §4.3.2/§4.3.3): a classical [`double_ratchet`]
//! session carries the wire framing and the Diffie-Hellman ratchet, while a
//! second, PQ-keyed symmetric chain (reseeded by completed SPQR epochs) is
//! used to re-encrypt every payload before it is handed to the classical
//! lane. Every message is therefore protected by both lanes at once: the
//! plaintext only recovers if both the classical MAC and the inner
//! ML-KEM-derived AEAD tag verify.
//!
//! Two independent SPQR lanes run inside one session, one per direction,
//! since each side plays the `SendEk` role in the lane it initiates epochs
//! on and the `SendCt` role in its peer's lane (spec §4.3.3 describes one
//! `send_ek`/`send_ct` pair per direction of a chain).

use bc_crypto::aead::{AEAD_NONCE_SIZE, chacha20_poly1305_open, chacha20_poly1305_seal};
use bc_rand::RandomNumberGenerator;
use double_ratchet::chain::kdf_ck;
use spqr::{Authenticator, EpochResult, SendCt, SendEk};
use zeroize::Zeroize;

use crate::error::{Result, TripleRatchetError};
use crate::keys::HandshakeSecrets;
use crate::wire::EpochControl;

const LANE_INFO: &[u8] = b"TripleRatchetLane";

fn derive_lane_authenticators(pqr_auth_key: &[u8; 32]) -> (Authenticator, Authenticator) {
    let mut info_a = LANE_INFO.to_vec();
    info_a.push(b'A');
    let mut info_b = LANE_INFO.to_vec();
    info_b.push(b'B');

    let okm_a = bc_crypto::hkdf_sha256(&[0u8; 32], pqr_auth_key, &info_a, 64);
    let okm_b = bc_crypto::hkdf_sha256(&[0u8; 32], pqr_auth_key, &info_b, 64);

    let auth_from = |okm: &[u8]| {
        let mut root = [0u8; 32];
        let mut mac = [0u8; 32];
        root.copy_from_slice(&okm[..32]);
        mac.copy_from_slice(&okm[32..]);
        Authenticator::new(root, mac)
    };
    (auth_from(&okm_a), auth_from(&okm_b))
}

/// One end of a triple-ratchet conversation.
pub struct Session {
    classical: double_ratchet::Session,

    pq_send_chain_key: [u8; 32],
    pq_recv_chain_key: Option<[u8; 32]>,
    pq_send_counter: u32,
    pq_recv_counter: u32,

    /// Authenticator for the lane in which *we* sample epochs (`SendEk`).
    our_lane_auth: Authenticator,
    our_epoch: u64,
    in_flight_send_ek: Option<SendEk>,

    /// Authenticator for the lane in which our *peer* samples epochs and we
    /// respond (`SendCt`).
    peer_lane_auth: Authenticator,
    peer_epoch: u64,
}

impl Drop for Session {
    fn drop(&mut self) {
        self.pq_send_chain_key.zeroize();
        if let Some(ck) = &mut self.pq_recv_chain_key {
            ck.zeroize();
        }
    }
}

impl Session {
    pub fn new_initiator(
        rng: &mut impl RandomNumberGenerator,
        our_identity: [u8; 33],
        peer_identity: [u8; 33],
        secrets: HandshakeSecrets,
        their_signed_prekey: bc_crypto::ecdh::X25519PublicKey,
    ) -> Self {
        let classical = double_ratchet::Session::new_initiator(
            rng,
            our_identity,
            peer_identity,
            secrets.root_key,
            their_signed_prekey,
        );
        let (our_lane_auth, peer_lane_auth) = derive_lane_authenticators(&secrets.pqr_auth_key);
        Self {
            classical,
            pq_send_chain_key: secrets.chain_key,
            pq_recv_chain_key: None,
            pq_send_counter: 0,
            pq_recv_counter: 0,
            our_lane_auth,
            our_epoch: 0,
            in_flight_send_ek: None,
            peer_lane_auth,
            peer_epoch: 0,
        }
    }

    pub fn new_responder(
        our_identity: [u8; 33],
        peer_identity: [u8; 33],
        secrets: HandshakeSecrets,
        our_signed_prekey_secret: bc_crypto::ecdh::X25519PrivateKey,
    ) -> Self {
        let classical = double_ratchet::Session::new_responder(
            our_identity,
            peer_identity,
            secrets.root_key,
            our_signed_prekey_secret,
        );
        // The responder's "our lane" is the initiator's "peer lane" and vice
        // versa: both sides must derive the same pair and just swap which
        // half they call "ours".
        let (initiator_lane, responder_lane) = derive_lane_authenticators(&secrets.pqr_auth_key);
        Self {
            classical,
            pq_send_chain_key: secrets.chain_key,
            pq_recv_chain_key: None,
            pq_send_counter: 0,
            pq_recv_counter: 0,
            our_lane_auth: responder_lane,
            our_epoch: 0,
            in_flight_send_ek: None,
            peer_lane_auth: initiator_lane,
            peer_epoch: 0,
        }
    }

    pub fn state(&self) -> double_ratchet::RatchetState { self.classical.state() }

    /// `sendHeader`+`sendEk`: begins an epoch transition on our lane,
    /// returning the header-and-MAC control frame followed by the
    /// encapsulation-key control frame. The caller sends both to the peer.
    pub fn begin_epoch(&mut self, rng: &mut impl RandomNumberGenerator) -> Result<(Vec<u8>, Vec<u8>)> {
        let mut send_ek = SendEk::new();
        let (hdr, hdr_mac) = send_ek.send_header(rng, &self.our_lane_auth, self.our_epoch)?;
        let encap_key = send_ek.send_ek()?;
        self.in_flight_send_ek = Some(send_ek);

        let header_frame = EpochControl::Header { epoch: self.our_epoch, hdr, mac: hdr_mac }.encode();
        let ek_frame = EpochControl::Ek { encap_key }.encode();
        Ok((header_frame, ek_frame))
    }

    /// `recvCt1`+`recvCt2`: completes the epoch we began with [`Self::begin_epoch`]
    /// once the peer's ciphertext control frame arrives, reseeding our
    /// sending PQ chain key with the resulting `epochSecret`.
    pub fn complete_epoch(&mut self, ciphertext_frame: &[u8]) -> Result<()> {
        let mut send_ek = self.in_flight_send_ek.take().ok_or(TripleRatchetError::NoPendingEpoch)?;
        let (ct1, ct2, mac) = match EpochControl::decode(ciphertext_frame)? {
            EpochControl::Ciphertext { ct1, ct2, mac } => (ct1, ct2, mac),
            _ => return Err(TripleRatchetError::InvalidFormat),
        };
        send_ek.recv_ct1(ct1)?;
        let EpochResult { next_epoch, authenticator, epoch_secret } = send_ek.recv_ct2(&ct2, &mac, &self.our_lane_auth)?;

        self.our_lane_auth = authenticator;
        self.our_epoch = next_epoch;
        self.pq_send_chain_key = reseed_pq_chain(&self.pq_send_chain_key, &epoch_secret);
        Ok(())
    }

    /// `recvHeader`+`sendCt`: responds to the peer's epoch-control frames
    /// (header then encapsulation key), returning the ciphertext control
    /// frame to send back and reseeding our receiving PQ chain key.
    pub fn respond_to_epoch(
        &mut self,
        rng: &mut impl RandomNumberGenerator,
        header_frame: &[u8],
        ek_frame: &[u8],
    ) -> Result<Vec<u8>> {
        let (epoch, hdr, hdr_mac) = match EpochControl::decode(header_frame)? {
            EpochControl::Header { epoch, hdr, mac } => (epoch, hdr, mac),
            _ => return Err(TripleRatchetError::InvalidFormat),
        };
        let encap_key = match EpochControl::decode(ek_frame)? {
            EpochControl::Ek { encap_key } => encap_key,
            _ => return Err(TripleRatchetError::InvalidFormat),
        };

        debug_assert_eq!(self.peer_epoch, epoch);
        let mut send_ct = SendCt::new();
        let recv_epoch = send_ct.recv_header(&self.peer_lane_auth, &hdr, &hdr_mac)?;
        debug_assert_eq!(recv_epoch, epoch);

        let (ct1, ct2, ct_mac, result) = send_ct.send_ct(rng, &self.peer_lane_auth, &encap_key)?;
        let EpochResult { next_epoch, authenticator, epoch_secret } = result;

        self.peer_lane_auth = authenticator;
        self.peer_epoch = next_epoch;
        self.pq_recv_chain_key =
            Some(reseed_pq_chain(&self.pq_recv_chain_key.unwrap_or(self.pq_send_chain_key), &epoch_secret));

        Ok(EpochControl::Ciphertext { ct1, ct2, mac: ct_mac }.encode())
    }

    /// Encrypts `plaintext` through both lanes: the PQ-keyed inner AEAD
    /// layer first, then the classical ratchet's AES-CBC-plus-MAC layer. The
    /// classical lane's own wire framing (it already carries its ratchet
    /// public key, counters, and MAC) is self-describing, so its output is
    /// the whole wire message; no further outer framing is needed.
    pub fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let (new_chain_key, message_key) = kdf_ck(&self.pq_send_chain_key);
        self.pq_send_chain_key = new_chain_key;
        let counter = self.pq_send_counter;
        self.pq_send_counter += 1;

        let nonce = nonce_from_counter(counter);
        let inner_ciphertext = chacha20_poly1305_seal(&message_key, &nonce, plaintext);

        Ok(self.classical.encrypt(&inner_ciphertext)?)
    }

    pub fn decrypt(&mut self, rng: &mut impl RandomNumberGenerator, wire: &[u8]) -> Result<Vec<u8>> {
        let inner_ciphertext = self.classical.decrypt(rng, wire)?;

        let recv_chain_key = self.pq_recv_chain_key.unwrap_or(self.pq_send_chain_key);
        let (new_chain_key, message_key) = kdf_ck(&recv_chain_key);
        self.pq_recv_chain_key = Some(new_chain_key);
        let counter = self.pq_recv_counter;
        self.pq_recv_counter += 1;

        let nonce = nonce_from_counter(counter);
        chacha20_poly1305_open(&message_key, &nonce, &inner_ciphertext).map_err(|_| TripleRatchetError::InnerAeadFailed)
    }
}

fn nonce_from_counter(counter: u32) -> [u8; AEAD_NONCE_SIZE] {
    let mut nonce = [0u8; AEAD_NONCE_SIZE];
    nonce[..4].copy_from_slice(&counter.to_be_bytes());
    nonce
}

fn reseed_pq_chain(current: &[u8; 32], epoch_secret: &[u8; 32]) -> [u8; 32] {
    let (_root, chain) = double_ratchet::chain::kdf_rk(current, epoch_secret);
    chain
}
