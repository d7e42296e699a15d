use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpqrError {
    #[error("operation called out of order for the current role state")]
    InvalidState,

    #[error("ciphertext or header authentication failed")]
    InvalidMac,

    #[error("ML-KEM encapsulation or decapsulation failed")]
    KemFailure,

    #[error("epoch advanced more than maxJump ({max}) in a single step: requested {requested}")]
    ChainBroken { requested: u64, max: u64 },

    #[error("out-of-order key cache exceeded maxOooKeys ({max})")]
    TooManyOoo { max: usize },

    #[error("wire data is malformed or the wrong length")]
    InvalidFormat,
}

pub type Result<T> = std::result::Result<T, SpqrError>;
