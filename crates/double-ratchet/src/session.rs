//! The ratchet state machine itself (spec §4.3.1): a sending chain, a
//! receiving chain, and a Diffie-Hellman ratchet that reseeds both whenever
//! the peer's ratchet public key changes. Grounded in the same
//! `RatchetSession`/`kdf_rk`/`kdf_ck`/skipped-key-cache shape used by the
//! Signal-style reference implementation this crate's idiom is drawn from,
//! adapted onto this workspace's own `bc-crypto` primitives and the
//! `SignalMessage` wire format in [`crate::wire`].

use std::collections::HashMap;

use bc_crypto::aead::{aes256_cbc_decrypt, aes256_cbc_encrypt};
use bc_crypto::ecdh::{X25519PrivateKey, X25519PublicKey, encode_djb_public_key};
use bc_rand::RandomNumberGenerator;
use zeroize::Zeroize;

use crate::chain::{expand_message_key, kdf_ck, kdf_rk};
use crate::error::{RatchetError, Result};
use crate::wire::{SignalMessage, verify_mac};

/// Bound on the number of skipped-but-not-yet-consumed message keys a
/// session retains before evicting the oldest (spec §4.3.1).
pub const MAX_MESSAGE_KEYS: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatchetState {
    Fresh,
    PendingPreKey,
    Established,
}

struct SkippedKeys {
    by_key: HashMap<([u8; 32], u32), [u8; 32]>,
    order: Vec<([u8; 32], u32)>,
}

impl SkippedKeys {
    fn new() -> Self { Self { by_key: HashMap::new(), order: Vec::new() } }

    fn insert(&mut self, ratchet_key: [u8; 32], counter: u32, message_key: [u8; 32]) {
        let id = (ratchet_key, counter);
        self.by_key.insert(id, message_key);
        self.order.push(id);
        while self.order.len() > MAX_MESSAGE_KEYS {
            let oldest = self.order.remove(0);
            if let Some(mut mk) = self.by_key.remove(&oldest) {
                mk.zeroize();
            }
        }
    }

    fn take(&mut self, ratchet_key: &[u8; 32], counter: u32) -> Option<[u8; 32]> {
        let id = (*ratchet_key, counter);
        let mk = self.by_key.remove(&id);
        if mk.is_some() {
            self.order.retain(|k| k != &id);
        }
        mk
    }
}

/// One end of a double-ratchet conversation with a single peer.
pub struct Session {
    state: RatchetState,
    our_identity: [u8; 33],
    peer_identity: [u8; 33],

    root_key: [u8; 32],

    dh_send_secret: X25519PrivateKey,
    dh_send_public: X25519PublicKey,
    send_chain_key: Option<[u8; 32]>,
    send_counter: u32,
    previous_send_counter: u32,

    dh_recv_public: Option<X25519PublicKey>,
    recv_chain_key: Option<[u8; 32]>,
    recv_counter: u32,

    skipped_keys: SkippedKeys,
}

impl Drop for Session {
    fn drop(&mut self) {
        self.root_key.zeroize();
        if let Some(ck) = &mut self.send_chain_key {
            ck.zeroize();
        }
        if let Some(ck) = &mut self.recv_chain_key {
            ck.zeroize();
        }
    }
}

impl Session {
    /// Alice's path: `processPreKeyBundle` already produced `shared_secret`
    /// via X3DH (see [`crate::keys::initiate`]); this performs her first
    /// sending DH ratchet step against Bob's signed prekey, landing in
    /// `PendingPreKey` until his reply confirms the session.
    pub fn new_initiator(
        rng: &mut impl RandomNumberGenerator,
        our_identity: [u8; 33],
        peer_identity: [u8; 33],
        shared_secret: [u8; 32],
        their_signed_prekey: X25519PublicKey,
    ) -> Self {
        let dh_send_secret = X25519PrivateKey::generate(rng);
        let dh_output = dh_send_secret.agree(&their_signed_prekey);
        let (root_key, send_chain_key) = kdf_rk(&shared_secret, &dh_output);
        let dh_send_public = dh_send_secret.public_key();

        Self {
            state: RatchetState::PendingPreKey,
            our_identity,
            peer_identity,
            root_key,
            dh_send_secret,
            dh_send_public,
            send_chain_key: Some(send_chain_key),
            send_counter: 0,
            previous_send_counter: 0,
            dh_recv_public: Some(their_signed_prekey),
            recv_chain_key: None,
            recv_counter: 0,
            skipped_keys: SkippedKeys::new(),
        }
    }

    /// Bob's path: he already has `shared_secret` from X3DH and keeps using
    /// his signed prekey as the ratchet key until Alice's first message
    /// arrives and triggers the first DH ratchet step.
    pub fn new_responder(
        our_identity: [u8; 33],
        peer_identity: [u8; 33],
        shared_secret: [u8; 32],
        our_signed_prekey_secret: X25519PrivateKey,
    ) -> Self {
        let dh_send_public = our_signed_prekey_secret.public_key();
        Self {
            state: RatchetState::Fresh,
            our_identity,
            peer_identity,
            root_key: shared_secret,
            dh_send_secret: our_signed_prekey_secret,
            dh_send_public,
            send_chain_key: None,
            send_counter: 0,
            previous_send_counter: 0,
            dh_recv_public: None,
            recv_chain_key: None,
            recv_counter: 0,
            skipped_keys: SkippedKeys::new(),
        }
    }

    pub fn state(&self) -> RatchetState { self.state }

    /// Encrypts `plaintext`, advancing the sending chain by one step.
    pub fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let send_chain_key = self.send_chain_key.ok_or(RatchetError::NoPendingPreKey)?;
        let (new_chain_key, message_key) = kdf_ck(&send_chain_key);
        self.send_chain_key = Some(new_chain_key);

        let counter = self.send_counter;
        self.send_counter += 1;

        let keys = expand_message_key(&message_key);
        let ciphertext = aes256_cbc_encrypt(&keys.cipher_key, &keys.iv, plaintext);

        let message = SignalMessage {
            ratchet_key: self.dh_send_public,
            counter,
            previous_counter: self.previous_send_counter,
            ciphertext,
        };
        Ok(message.encode(&keys.mac_key, &self.our_identity, &self.peer_identity))
    }

    /// Decrypts a wire message, advancing the receiving chain (and, if the
    /// sender's ratchet key is new, performing a DH ratchet step first —
    /// which requires fresh randomness for our half of the new keypair).
    pub fn decrypt(&mut self, rng: &mut impl RandomNumberGenerator, wire: &[u8]) -> Result<Vec<u8>> {
        let (message, signed, mac) = SignalMessage::parse_unverified(wire)?;
        let ratchet_key_bytes = message.ratchet_key.to_bytes();

        if let Some(message_key) = self.skipped_keys.take(&ratchet_key_bytes, message.counter) {
            let keys = expand_message_key(&message_key);
            verify_mac(&keys.mac_key, signed, mac, &self.peer_identity, &self.our_identity)?;
            return aes256_cbc_decrypt(&keys.cipher_key, &keys.iv, &message.ciphertext)
                .map_err(|_| RatchetError::InvalidFormat);
        }

        let is_new_ratchet_key = match &self.dh_recv_public {
            Some(current) => current.to_bytes() != ratchet_key_bytes,
            None => true,
        };

        if is_new_ratchet_key {
            if self.dh_recv_public.is_some() {
                self.skip_receive_chain(message.previous_counter)?;
            }

            self.dh_recv_public = Some(message.ratchet_key);

            let dh_recv_output = self.dh_send_secret.agree(&message.ratchet_key);
            let (root_key, recv_chain_key) = kdf_rk(&self.root_key, &dh_recv_output);
            self.root_key = root_key;
            self.recv_chain_key = Some(recv_chain_key);
            self.recv_counter = 0;

            self.previous_send_counter = self.send_counter;
            self.send_counter = 0;
            let new_dh_send_secret = X25519PrivateKey::generate(rng);
            let dh_send_output = new_dh_send_secret.agree(&message.ratchet_key);
            let (root_key, send_chain_key) = kdf_rk(&self.root_key, &dh_send_output);
            self.root_key = root_key;
            self.send_chain_key = Some(send_chain_key);
            self.dh_send_public = new_dh_send_secret.public_key();
            self.dh_send_secret = new_dh_send_secret;

            self.state = RatchetState::Established;
        } else if message.counter < self.recv_counter {
            return Err(RatchetError::DuplicateMessage {
                chain_index: u64::from_le_bytes(ratchet_key_bytes[..8].try_into().unwrap()),
                counter: message.counter as u64,
            });
        }

        self.skip_receive_chain(message.counter)?;

        let recv_chain_key = self.recv_chain_key.ok_or(RatchetError::NotEstablished)?;
        let (new_chain_key, message_key) = kdf_ck(&recv_chain_key);
        self.recv_chain_key = Some(new_chain_key);
        self.recv_counter += 1;
        if self.state == RatchetState::PendingPreKey {
            self.state = RatchetState::Established;
        }

        let keys = expand_message_key(&message_key);
        verify_mac(&keys.mac_key, signed, mac, &self.peer_identity, &self.our_identity)?;
        aes256_cbc_decrypt(&keys.cipher_key, &keys.iv, &message.ciphertext).map_err(|_| RatchetError::InvalidFormat)
    }

    fn skip_receive_chain(&mut self, until: u32) -> Result<()> {
        if until <= self.recv_counter {
            return Ok(());
        }
        let skip = (until - self.recv_counter) as u64;
        if skip > MAX_MESSAGE_KEYS as u64 {
            return Err(RatchetError::TooFar { skip, max: MAX_MESSAGE_KEYS as u64 });
        }
        let ratchet_key_bytes = self.dh_recv_public.map(|k| k.to_bytes()).unwrap_or([0u8; 32]);
        let mut recv_chain_key = self.recv_chain_key.ok_or(RatchetError::NotEstablished)?;
        while self.recv_counter < until {
            let (new_chain_key, message_key) = kdf_ck(&recv_chain_key);
            recv_chain_key = new_chain_key;
            self.skipped_keys.insert(ratchet_key_bytes, self.recv_counter, message_key);
            self.recv_counter += 1;
        }
        self.recv_chain_key = Some(recv_chain_key);
        Ok(())
    }

    pub fn our_ratchet_public_key(&self) -> X25519PublicKey { self.dh_send_public }
    pub fn our_identity_djb(&self) -> [u8; 33] { self.our_identity }
}

pub fn identity_djb(public_key: &X25519PublicKey) -> [u8; 33] { encode_djb_public_key(public_key) }
