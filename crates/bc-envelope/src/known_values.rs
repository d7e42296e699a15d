//! Known Values: a namespace of plain `u64`s standing in for common
//! ontological concepts (predicates, mostly), so assertions don't need to
//! carry a full URI to say `isA` or `note` (spec §4.2/§6: attachments and
//! SSKR/recipient assertions need predicates to hang off).
//!
//! Encoded as a bare unsigned CBOR integer (no tag of their own); the
//! envelope layer wraps them in [`crate::EnvelopeCase::KnownValue`] so a
//! reader can tell a known value apart from an ordinary integer leaf.

use dcbor::prelude::*;

/// A registered or ad-hoc known value: a `u64` plus an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KnownValue {
    value: u64,
    name: Option<&'static str>,
}

impl KnownValue {
    pub const fn new(value: u64) -> Self { Self { value, name: None } }

    pub const fn new_with_name(value: u64, name: &'static str) -> Self { Self { value, name: Some(name) } }

    pub fn value(&self) -> u64 { self.value }

    pub fn name(&self) -> String {
        self.name.map(str::to_string).unwrap_or_else(|| self.value.to_string())
    }
}

impl std::fmt::Display for KnownValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.name()) }
}

impl From<KnownValue> for CBOR {
    fn from(known_value: KnownValue) -> Self { CBOR::from(known_value.value) }
}

impl TryFrom<CBOR> for KnownValue {
    type Error = CBORError;

    fn try_from(cbor: CBOR) -> Result<Self> {
        let value = cbor.as_unsigned().ok_or(CBORError::WrongType)?;
        Ok(Self::new(value))
    }
}

macro_rules! known_value {
    ($const_name:ident, $value:expr, $name:expr) => {
        pub const $const_name: KnownValue = KnownValue::new_with_name($value, $name);
    };
}

// Registry excerpt from BCR-2023-002; only the entries this crate's
// extensions actually hang assertions off of.
known_value!(IS_A, 1, "isA");
known_value!(ID, 2, "id");
known_value!(VERIFIED_BY, 3, "verifiedBy");
known_value!(NOTE, 4, "note");
known_value!(HAS_RECIPIENT, 5, "hasRecipient");
known_value!(SSKR_SHARE, 6, "sskrShare");
known_value!(SALT, 15, "salt");
known_value!(SIGNED, 18, "signed");
known_value!(ATTACHMENT, 50, "attachment");
known_value!(VENDOR, 51, "vendor");
known_value!(CONFORMS_TO, 52, "conformsTo");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_cbor() {
        let cbor: CBOR = IS_A.clone().into();
        assert_eq!(KnownValue::try_from(cbor).unwrap().value(), 1);
    }

    #[test]
    fn unnamed_value_displays_as_number() {
        assert_eq!(KnownValue::new(9999).name(), "9999");
    }
}
