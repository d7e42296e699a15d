use thiserror::Error;

/// Error taxonomy for the ratchet family: kinds, not concrete wire types, so
/// `triple-ratchet` and `spqr` can reuse the same shape for their own
/// failure modes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatchetError {
    #[error("wire message is malformed or truncated")]
    InvalidFormat,

    #[error("a fixed-size field had the wrong length: expected {expected}, got {actual}")]
    InvalidSize { expected: usize, actual: usize },

    #[error("key is structurally invalid")]
    InvalidKey,

    #[error("signature did not verify")]
    InvalidSignature,

    #[error("message authentication code did not verify")]
    InvalidMac,

    #[error("message at counter {counter} in chain {chain_index} has already been consumed")]
    DuplicateMessage { chain_index: u64, counter: u64 },

    #[error("message counter is too far ahead of the receiving chain ({skip} > {max})")]
    TooFar { skip: u64, max: u64 },

    #[error("session has no receiving chain yet and cannot decrypt a non-prekey message")]
    NotEstablished,

    #[error("a pre-key bundle must be processed before encrypting as the initiator")]
    NoPendingPreKey,
}

pub type Result<T> = std::result::Result<T, RatchetError>;
