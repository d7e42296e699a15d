use thiserror::Error;

#[derive(Debug, Error)]
pub enum TripleRatchetError {
    #[error("classical ratchet lane failed: {0}")]
    Classical(#[from] double_ratchet::RatchetError),

    #[error("post-quantum sub-chain failed: {0}")]
    Spqr(#[from] spqr::SpqrError),

    #[error("inner post-quantum AEAD layer failed to authenticate")]
    InnerAeadFailed,

    #[error("wire data is malformed or the wrong length")]
    InvalidFormat,

    #[error("signature did not verify")]
    InvalidSignature,

    #[error("an epoch must be completed with begin_epoch/complete_epoch before it can be applied")]
    NoPendingEpoch,
}

pub type Result<T> = std::result::Result<T, TripleRatchetError>;
