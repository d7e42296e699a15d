use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComponentError {
    #[error("invalid size: expected {expected}, got {actual}")]
    InvalidSize { expected: usize, actual: usize },

    #[error("invalid key")]
    InvalidKey,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("tag {tag} is not registered for this type")]
    InvalidTag { tag: u64 },

    #[error("cbor value did not match the expected shape for {0}")]
    InvalidFormat(String),

    #[error(transparent)]
    Crypto(#[from] bc_crypto::CryptoError),

    #[error(transparent)]
    Cbor(#[from] dcbor::CBORError),
}

pub type Result<T> = std::result::Result<T, ComponentError>;
