use thiserror::Error;

/// The kind of canonical violation found while decoding.
///
/// Kept as a nested enum (rather than flattening into `CBORError`) so a
/// caller that wants "why wasn't this canonical" detail can match on it
/// without widening the top-level error surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NonCanonicalKind {
    #[error("integer or length was not encoded in its shortest form")]
    NonShortestLength,
    #[error("map keys were not in canonical (bytewise) order")]
    UnsortedMapKeys,
    #[error("map contained a duplicate key")]
    DuplicateMapKey,
    #[error("float had a non-canonical bit pattern")]
    NonCanonicalFloat,
    #[error("float was not finite and not the canonical NaN")]
    NonFiniteFloat,
    #[error("trailing bytes after a complete value")]
    TrailingBytes,
    #[error("input ended before a complete value was read")]
    UnexpectedEnd,
    #[error("indefinite-length item (not supported in dCBOR)")]
    IndefiniteLength,
    #[error("reserved additional-information value")]
    ReservedAdditionalInfo,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CBORError {
    #[error("not canonical dCBOR: {0}")]
    NotCanonical(NonCanonicalKind),

    #[error("value cannot be represented canonically: {0}")]
    NonCanonicalValue(String),

    #[error("tag {tag} is not registered")]
    InvalidTag { tag: u64 },

    #[error("tag {tag} was already registered as {existing:?}, cannot redefine as {attempted:?}")]
    TagConflict { tag: u64, existing: String, attempted: String },

    #[error("tag {tag} content failed validation: {reason}")]
    TagSemanticError { tag: u64, reason: String },

    #[error("invalid text: not valid UTF-8")]
    InvalidUtf8,

    #[error("value is not of the expected CBOR type")]
    WrongType,

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

pub type Result<T> = std::result::Result<T, CBORError>;
