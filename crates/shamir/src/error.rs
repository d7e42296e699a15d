use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShamirError {
    #[error("secret length must be even and between {min} and {max} bytes, got {actual}")]
    InvalidSecretLength { min: usize, max: usize, actual: usize },

    #[error("threshold must be between 1 and share count {count}, got {threshold}")]
    InvalidThreshold { threshold: usize, count: usize },

    #[error("share count must be between 1 and {max}, got {actual}")]
    InvalidShareCount { max: usize, actual: usize },

    #[error("at least one share is required")]
    NoShares,

    #[error("shares must all be the same length")]
    ShareLengthMismatch,

    #[error("duplicate share index {0}")]
    DuplicateIndex(u8),

    #[error("digest verification failed on recovered secret")]
    ChecksumFailure,
}

pub type Result<T> = std::result::Result<T, ShamirError>;
