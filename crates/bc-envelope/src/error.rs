//! Errors surfaced by the public envelope API (spec §7: a concrete
//! `thiserror` enum at every public boundary; `anyhow` only internally while
//! building up context before it crosses back out as one of these variants).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("envelope is already elided")]
    AlreadyElided,

    #[error("envelope subject is already encrypted")]
    AlreadyEncrypted,

    #[error("envelope subject is already compressed")]
    AlreadyCompressed,

    #[error("envelope is not wrapped")]
    NotWrapped,

    #[error("envelope subject is not encrypted")]
    NotEncrypted,

    #[error("envelope subject is not compressed")]
    NotCompressed,

    #[error("envelope is not a leaf")]
    NotLeaf,

    #[error("envelope is not an assertion")]
    NotAssertion,

    #[error("envelope is not a known value")]
    NotKnownValue,

    #[error("elision or obscuring would change the envelope's digest")]
    InvalidDigest,

    #[error("envelope could not be decoded from the given CBOR")]
    InvalidFormat,

    #[error("no assertion exists with the given predicate")]
    NonexistentPredicate,

    #[error("more than one assertion has the given predicate")]
    AmbiguousPredicate,

    #[error("no recipient could decrypt the content key")]
    InvalidRecipient,

    #[error("not enough shares were provided to recover the secret")]
    InvalidShares,

    #[error("at least one signature failed to verify")]
    UnverifiedSignature,

    #[error("no attachment matches the given vendor/conformsTo filter")]
    NonexistentAttachment,

    #[error("more than one attachment matches the given vendor/conformsTo filter")]
    AmbiguousAttachment,

    #[error("envelope is not an attachment")]
    InvalidAttachment,

    #[error(transparent)]
    Component(#[from] bc_components::ComponentError),

    #[error(transparent)]
    Cbor(#[from] dcbor::CBORError),

    #[cfg(feature = "sskr")]
    #[error(transparent)]
    Sskr(#[from] sskr::SskrError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EnvelopeError>;
