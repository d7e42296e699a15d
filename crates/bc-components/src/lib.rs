//! CBOR-tagged cryptographic value types shared by the envelope, UR, and
//! ratchet layers: digests, nonces, salts, identifiers, symmetric keys,
//! sealed/encrypted/compressed payloads, signing keys, and key-encapsulation
//! keys.
//!
//! Every type here implements `From<T> for CBOR` and `TryFrom<CBOR> for T`
//! rather than deriving `CBORTagged`, so the tag numbers in [`tags`] stay the
//! single source of truth for wire compatibility.

pub mod arid;
pub mod compressed;
pub mod digest;
pub mod encapsulation_key;
pub mod encrypted_message;
pub mod error;
pub mod nonce;
pub mod private_key_base;
pub mod salt;
pub mod sealed_message;
pub mod signing_key;
pub mod symmetric_key;
pub mod tags;
pub mod xid;

pub use arid::ARID;
pub use compressed::Compressed;
pub use digest::{Digest, DigestProvider};
pub use encapsulation_key::{EncapsulationCiphertext, EncapsulationPrivateKey, EncapsulationPublicKey};
pub use encrypted_message::EncryptedMessage;
pub use error::{ComponentError, Result};
pub use nonce::Nonce;
pub use private_key_base::PrivateKeyBase;
pub use salt::Salt;
pub use sealed_message::SealedMessage;
pub use signing_key::{Signature, SigningPrivateKey, SigningPublicKey};
pub use symmetric_key::SymmetricKey;
pub use tags::register_tags;
pub use xid::XID;

pub mod prelude {
    pub use crate::arid::ARID;
    pub use crate::compressed::Compressed;
    pub use crate::digest::{Digest, DigestProvider};
    pub use crate::encapsulation_key::{
        EncapsulationCiphertext, EncapsulationPrivateKey, EncapsulationPublicKey,
    };
    pub use crate::encrypted_message::EncryptedMessage;
    pub use crate::error::{ComponentError, Result};
    pub use crate::nonce::Nonce;
    pub use crate::private_key_base::PrivateKeyBase;
    pub use crate::salt::Salt;
    pub use crate::sealed_message::SealedMessage;
    pub use crate::signing_key::{Signature, SigningPrivateKey, SigningPublicKey};
    pub use crate::symmetric_key::SymmetricKey;
    pub use crate::tags::register_tags;
    pub use crate::xid::XID;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_registration_is_idempotent() {
        register_tags();
        register_tags();
    }

    #[test]
    fn component_roundtrip_smoke() {
        register_tags();
        let mut rng = bc_rand::make_fake_random_number_generator(1);
        let digest = Digest::from_image(b"hello");
        let cbor = dcbor::CBOR::from(digest);
        assert_eq!(Digest::try_from(cbor).unwrap(), digest);

        let key = SymmetricKey::new(&mut rng);
        let encrypted = key.encrypt(&mut rng, b"payload", &[]).unwrap();
        assert_eq!(key.decrypt(&encrypted).unwrap(), b"payload");
    }
}
