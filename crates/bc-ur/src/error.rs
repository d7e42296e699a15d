use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrError {
    #[error("invalid bytewords: {0}")]
    InvalidBytewords(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid UR string: {0}")]
    InvalidUr(String),

    #[error("invalid UR type: {0}")]
    InvalidType(String),

    #[error("fountain decoder has not yet recovered enough parts")]
    Incomplete,

    #[error("fountain part is malformed: {0}")]
    InvalidPart(String),
}

pub type Result<T> = std::result::Result<T, UrError>;
