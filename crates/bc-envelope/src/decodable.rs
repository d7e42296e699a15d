//! The read side of [`crate::EnvelopeEncodable`]: pulling a typed value back
//! out of a leaf's CBOR. A local trait rather than a blanket `TryFrom<CBOR>`
//! bound, since neither this crate nor `dcbor` owns `String`/`u64`/etc. to
//! add that impl directly.

use dcbor::prelude::*;

use crate::error::{EnvelopeError, Result};

pub trait EnvelopeDecodable: Sized {
    fn from_cbor(cbor: &CBOR) -> Result<Self>;
}

impl EnvelopeDecodable for CBOR {
    fn from_cbor(cbor: &CBOR) -> Result<Self> { Ok(cbor.clone()) }
}

impl EnvelopeDecodable for String {
    fn from_cbor(cbor: &CBOR) -> Result<Self> {
        cbor.as_text().map(str::to_string).ok_or(EnvelopeError::InvalidFormat)
    }
}

impl EnvelopeDecodable for bool {
    fn from_cbor(cbor: &CBOR) -> Result<Self> { cbor.as_bool().ok_or(EnvelopeError::InvalidFormat) }
}

impl EnvelopeDecodable for Vec<u8> {
    fn from_cbor(cbor: &CBOR) -> Result<Self> {
        cbor.as_byte_string().map(<[u8]>::to_vec).ok_or(EnvelopeError::InvalidFormat)
    }
}

macro_rules! impl_unsigned_decodable {
    ($type:ty) => {
        impl EnvelopeDecodable for $type {
            fn from_cbor(cbor: &CBOR) -> Result<Self> {
                cbor.as_unsigned()
                    .and_then(|v| <$type>::try_from(v).ok())
                    .ok_or(EnvelopeError::InvalidFormat)
            }
        }
    };
}

macro_rules! impl_signed_decodable {
    ($type:ty) => {
        impl EnvelopeDecodable for $type {
            fn from_cbor(cbor: &CBOR) -> Result<Self> {
                cbor.as_i64().and_then(|v| <$type>::try_from(v).ok()).ok_or(EnvelopeError::InvalidFormat)
            }
        }
    };
}

impl_unsigned_decodable!(u8);
impl_unsigned_decodable!(u16);
impl_unsigned_decodable!(u32);
impl_unsigned_decodable!(u64);
impl_unsigned_decodable!(usize);
impl_signed_decodable!(i8);
impl_signed_decodable!(i16);
impl_signed_decodable!(i32);
impl_signed_decodable!(i64);

#[cfg(feature = "known_value")]
impl EnvelopeDecodable for crate::KnownValue {
    fn from_cbor(cbor: &CBOR) -> Result<Self> {
        crate::KnownValue::try_from(cbor.clone()).map_err(|_| EnvelopeError::InvalidFormat)
    }
}

/// Covers every `bc-components` value type (`Digest`, `ARID`, `Salt`,
/// `Signature`, `SealedMessage`, ...): they each implement `TryFrom<CBOR>`
/// against their own tag, so a leaf decodes into them directly.
///
/// Enumerated per-type (rather than a blanket `impl<T: TryFrom<CBOR, Error =
/// ComponentError>>`) since a blanket impl here would conflict with the
/// `CBOR` impl above under Rust's coherence rules.
macro_rules! impl_component_decodable {
    ($type:ty) => {
        impl EnvelopeDecodable for $type {
            fn from_cbor(cbor: &CBOR) -> Result<Self> {
                <$type>::try_from(cbor.clone()).map_err(EnvelopeError::from)
            }
        }
    };
}

impl_component_decodable!(bc_components::ARID);
impl_component_decodable!(bc_components::Compressed);
impl_component_decodable!(bc_components::Digest);
impl_component_decodable!(bc_components::EncapsulationPublicKey);
impl_component_decodable!(bc_components::EncapsulationCiphertext);
impl_component_decodable!(bc_components::EncryptedMessage);
impl_component_decodable!(bc_components::Nonce);
impl_component_decodable!(bc_components::PrivateKeyBase);
impl_component_decodable!(bc_components::Salt);
impl_component_decodable!(bc_components::SealedMessage);
impl_component_decodable!(bc_components::Signature);
impl_component_decodable!(bc_components::SigningPublicKey);
impl_component_decodable!(bc_components::SymmetricKey);
impl_component_decodable!(bc_components::XID);
