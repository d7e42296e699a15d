use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SskrError {
    #[error("group threshold must be between 1 and group count {count}, got {threshold}")]
    InvalidGroupThreshold { threshold: usize, count: usize },

    #[error("a spec must have at least one group")]
    NoGroups,

    #[error("member threshold for group {group} must be between 1 and member count {count}, got {threshold}")]
    InvalidMemberThreshold { group: usize, threshold: usize, count: usize },

    #[error(transparent)]
    Shamir(#[from] shamir::ShamirError),

    #[error("not enough groups contributed: need {needed}, have {have}")]
    NotEnoughGroups { needed: usize, have: usize },

    #[error("not enough member shares in group {group}: need {needed}, have {have}")]
    NotEnoughMembers { group: usize, needed: usize, have: usize },

    #[error("shares come from more than one split (identifier mismatch)")]
    MixedIdentifiers,

    #[error("malformed share: {0}")]
    MalformedShare(String),
}

pub type Result<T> = std::result::Result<T, SskrError>;
