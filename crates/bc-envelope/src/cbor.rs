//! Envelope wire format: `Tag(200, [case_tag, ...case_payload])`. A
//! discriminant-tagged array rather than a family of nested dCBOR tags, but
//! it carries exactly the same information the teacher's
//! `ENVELOPE(LEAF(...))`-style nested tags do: enough to tell every case
//! apart on decode (spec §3/§6).

use bc_components::DigestProvider;
use dcbor::prelude::*;

use crate::envelope::{canonical_bytes, EnvelopeCase, TAG_ENVELOPE};
use crate::error::{EnvelopeError, Result};
use crate::{Assertion, Envelope};

const CASE_LEAF: u64 = 0;
const CASE_NODE: u64 = 1;
const CASE_WRAPPED: u64 = 2;
const CASE_ASSERTION: u64 = 3;
const CASE_ELIDED: u64 = 4;
#[cfg(feature = "known_value")]
const CASE_KNOWN_VALUE: u64 = 5;
#[cfg(feature = "encrypt")]
const CASE_ENCRYPTED: u64 = 6;
#[cfg(feature = "compress")]
const CASE_COMPRESSED: u64 = 7;

impl Envelope {
    pub fn tagged_cbor(&self) -> CBOR { self.clone().into() }

    pub fn to_cbor_data(&self) -> Vec<u8> { canonical_bytes(&self.tagged_cbor()) }

    pub fn from_tagged_cbor_data(data: &[u8]) -> Result<Self> {
        Envelope::try_from(dcbor::decode(data)?)
    }
}

impl From<Envelope> for CBOR {
    fn from(envelope: Envelope) -> Self {
        let inner = match envelope.case() {
            EnvelopeCase::Leaf { cbor, .. } => CBOR::array([CBOR::from(CASE_LEAF), cbor.clone()]),
            EnvelopeCase::Node { subject, assertions, .. } => CBOR::array([
                CBOR::from(CASE_NODE),
                subject.tagged_cbor(),
                CBOR::array(assertions.iter().map(Envelope::tagged_cbor)),
            ]),
            EnvelopeCase::Wrapped { envelope, .. } => {
                CBOR::array([CBOR::from(CASE_WRAPPED), envelope.tagged_cbor()])
            }
            EnvelopeCase::Assertion(assertion) => CBOR::array([
                CBOR::from(CASE_ASSERTION),
                assertion.predicate().tagged_cbor(),
                assertion.object().tagged_cbor(),
            ]),
            EnvelopeCase::Elided(digest) => CBOR::array([CBOR::from(CASE_ELIDED), CBOR::from(*digest)]),
            #[cfg(feature = "known_value")]
            EnvelopeCase::KnownValue { value, .. } => {
                CBOR::array([CBOR::from(CASE_KNOWN_VALUE), CBOR::from(value.clone())])
            }
            #[cfg(feature = "encrypt")]
            EnvelopeCase::Encrypted(message) => {
                CBOR::array([CBOR::from(CASE_ENCRYPTED), CBOR::from(message.clone())])
            }
            #[cfg(feature = "compress")]
            EnvelopeCase::Compressed(compressed) => {
                CBOR::array([CBOR::from(CASE_COMPRESSED), CBOR::from(compressed.clone())])
            }
        };
        CBOR::tagged_value(TAG_ENVELOPE, inner)
    }
}

impl TryFrom<CBOR> for Envelope {
    type Error = EnvelopeError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let (tag, inner) = cbor.as_tagged().ok_or(EnvelopeError::InvalidFormat)?;
        if tag.value() != TAG_ENVELOPE {
            return Err(EnvelopeError::InvalidFormat);
        }
        let items = inner.as_array().ok_or(EnvelopeError::InvalidFormat)?;
        let case = items.first().and_then(CBOR::as_unsigned).ok_or(EnvelopeError::InvalidFormat)?;
        match case {
            CASE_LEAF => {
                let cbor = items.get(1).ok_or(EnvelopeError::InvalidFormat)?.clone();
                Ok(Envelope::new_leaf(cbor))
            }
            CASE_NODE => {
                let subject = Envelope::try_from(items.get(1).ok_or(EnvelopeError::InvalidFormat)?.clone())?;
                let assertions = items
                    .get(2)
                    .and_then(CBOR::as_array)
                    .ok_or(EnvelopeError::InvalidFormat)?
                    .iter()
                    .cloned()
                    .map(Envelope::try_from)
                    .collect::<Result<Vec<_>>>()?;
                Envelope::new_with_assertions(subject, assertions)
            }
            CASE_WRAPPED => {
                let inner = Envelope::try_from(items.get(1).ok_or(EnvelopeError::InvalidFormat)?.clone())?;
                Ok(Envelope::new_wrapped(inner))
            }
            CASE_ASSERTION => {
                let predicate = Envelope::try_from(items.get(1).ok_or(EnvelopeError::InvalidFormat)?.clone())?;
                let object = Envelope::try_from(items.get(2).ok_or(EnvelopeError::InvalidFormat)?.clone())?;
                Ok(Envelope::new_with_assertion(Assertion::new(predicate, object)))
            }
            CASE_ELIDED => {
                let digest = bc_components::Digest::try_from(items.get(1).ok_or(EnvelopeError::InvalidFormat)?.clone())?;
                Ok(Envelope::new_elided(digest))
            }
            #[cfg(feature = "known_value")]
            CASE_KNOWN_VALUE => {
                let value =
                    crate::KnownValue::try_from(items.get(1).ok_or(EnvelopeError::InvalidFormat)?.clone())?;
                Ok(Envelope::new_with_known_value(value))
            }
            #[cfg(feature = "encrypt")]
            CASE_ENCRYPTED => {
                let message = bc_components::EncryptedMessage::try_from(
                    items.get(1).ok_or(EnvelopeError::InvalidFormat)?.clone(),
                )?;
                Ok(Envelope::new_with_encrypted(message))
            }
            #[cfg(feature = "compress")]
            CASE_COMPRESSED => {
                let compressed = bc_components::Compressed::try_from(
                    items.get(1).ok_or(EnvelopeError::InvalidFormat)?.clone(),
                )?;
                Ok(Envelope::new_with_compressed(compressed))
            }
            _ => Err(EnvelopeError::InvalidFormat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_cbor_bytes() {
        let envelope = Envelope::new("Alice").add_assertion("knows", "Bob");
        let data = envelope.to_cbor_data();
        let decoded = Envelope::from_tagged_cbor_data(&data).unwrap();
        assert_eq!(decoded.digest(), envelope.digest());
    }

    #[test]
    fn elided_envelope_round_trips() {
        let envelope = Envelope::new("Alice");
        let elided = envelope.elide();
        let decoded = Envelope::from_tagged_cbor_data(&elided.to_cbor_data()).unwrap();
        assert!(decoded.is_elided());
        assert_eq!(decoded.digest(), envelope.digest());
    }
}
