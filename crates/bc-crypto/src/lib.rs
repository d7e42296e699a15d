//! Thin, typed wrappers over the cryptographic primitives used by every
//! higher layer of this workspace: `dcbor`'s tag-bound digests, envelope
//! encryption and signing, and the ratchet family's chain advances all route
//! through the functions in this crate rather than touching RustCrypto
//! types directly.

pub mod aead;
pub mod ecdh;
pub mod error;
pub mod hash;
pub mod memzero;
pub mod pqc;
pub mod signing;

pub use aead::{
    AEAD_NONCE_SIZE, AEAD_TAG_SIZE, SYMMETRIC_KEY_SIZE, chacha20_poly1305_decrypt,
    chacha20_poly1305_encrypt,
};
pub use error::{CryptoError, Result};
pub use hash::{blake2b, hkdf_sha256, hmac_sha256, hmac_sha256_full, sha256, sha256_pair};
pub use memzero::{constant_time_eq, memzero};

/// Re-export so downstream crates can implement `RandomNumberGenerator`
/// without an extra `bc-rand` dependency declaration just for the trait.
pub use bc_rand::RandomNumberGenerator;
