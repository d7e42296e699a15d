use thiserror::Error;

/// Errors surfaced by the primitive wrappers in this crate.
///
/// Kept small and flat on purpose: primitive-level errors are reinterpreted
/// by every caller into their own domain error (`EnvelopeError`,
/// `RatchetError`, ...), so this enum only needs enough detail to explain
/// *what* failed, not *why* the caller should care.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength { expected: usize, actual: usize },

    #[error("authentication tag did not verify")]
    InvalidAuthenticationTag,

    #[error("signature did not verify")]
    InvalidSignature,

    #[error("invalid key encoding")]
    InvalidKey,

    #[error("encapsulation failed")]
    EncapsulationFailed,

    #[error("decapsulation failed")]
    DecapsulationFailed,
}

pub type Result<T> = std::result::Result<T, CryptoError>;
