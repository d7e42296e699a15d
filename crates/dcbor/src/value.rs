//! The dCBOR value model (spec §3): the conventional CBOR universe
//! restricted to a single canonical form per logical value.

use std::cmp::Ordering;

use crate::encode::encode_case;
use crate::tag::Tag;

/// A simple (major type 7) value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Simple {
    False,
    True,
    Null,
    /// Stored as `f64`; canonicalization to the shortest exact width
    /// happens at encode time (`encode.rs`), since a value's canonical
    /// *width* is a property of the byte stream, not of this in-memory
    /// model.
    Float(f64),
}

impl Eq for Simple {}

/// One key/value pair plus the canonical bytes of its encoded key, cached so
/// repeated sorts/searches don't re-encode.
#[derive(Debug, Clone)]
struct MapEntry {
    key_bytes: Vec<u8>,
    key: CBOR,
    value: CBOR,
}

/// A dCBOR map: entries are always held sorted by the bytewise lexicographic
/// order of their canonical key encoding (spec §3), with duplicate keys
/// rejected at construction time.
#[derive(Debug, Clone, Default)]
pub struct Map {
    entries: Vec<MapEntry>,
}

impl Map {
    pub fn new() -> Self { Self { entries: Vec::new() } }

    /// Inserts a key/value pair, replacing any existing value for an equal
    /// key. Maintains canonical sort order.
    pub fn insert(&mut self, key: impl Into<CBOR>, value: impl Into<CBOR>) {
        let key = key.into();
        let value = value.into();
        let key_bytes = encode_case(&key.case);
        match self.entries.binary_search_by(|e| e.key_bytes.cmp(&key_bytes)) {
            Ok(idx) => self.entries[idx].value = value,
            Err(idx) => self.entries.insert(idx, MapEntry { key_bytes, key, value }),
        }
    }

    pub fn get(&self, key: impl Into<CBOR>) -> Option<&CBOR> {
        let key = key.into();
        let key_bytes = encode_case(&key.case);
        self.entries
            .binary_search_by(|e| e.key_bytes.cmp(&key_bytes))
            .ok()
            .map(|idx| &self.entries[idx].value)
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&CBOR, &CBOR)> {
        self.entries.iter().map(|e| (&e.key, &e.value))
    }

    pub(crate) fn sorted_key_bytes(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.iter().map(|e| e.key_bytes.as_slice())
    }

    /// Builds a map from already-encoded (key_bytes, key, value) triples
    /// produced while decoding, verifying sort order and uniqueness.
    pub(crate) fn from_decoded_entries(
        entries: Vec<(Vec<u8>, CBOR, CBOR)>,
    ) -> std::result::Result<Self, crate::error::NonCanonicalKind> {
        for window in entries.windows(2) {
            match window[0].0.cmp(&window[1].0) {
                Ordering::Less => {}
                Ordering::Equal => {
                    return Err(crate::error::NonCanonicalKind::DuplicateMapKey);
                }
                Ordering::Greater => {
                    return Err(crate::error::NonCanonicalKind::UnsortedMapKeys);
                }
            }
        }
        Ok(Self {
            entries: entries
                .into_iter()
                .map(|(key_bytes, key, value)| MapEntry { key_bytes, key, value })
                .collect(),
        })
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| a.key_bytes == b.key_bytes && a.value == b.value)
    }
}
impl Eq for Map {}

impl FromIterator<(CBOR, CBOR)> for Map {
    fn from_iter<T: IntoIterator<Item = (CBOR, CBOR)>>(iter: T) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// The discriminant of a dCBOR value: one variant per CBOR major type, plus
/// `Tagged` carrying the semantic tag and `Simple` for major type 7.
#[derive(Debug, Clone, PartialEq)]
pub enum CBORCase {
    Unsigned(u64),
    /// The actual (negative) integer value. Encodes to major type 1 with
    /// `n = -1 - value`.
    Negative(i64),
    ByteString(Vec<u8>),
    Text(String),
    Array(Vec<CBOR>),
    Map(Map),
    Tagged(Tag, Box<CBOR>),
    Simple(Simple),
}

impl Eq for CBORCase {}

/// A single dCBOR value. Cheap to clone: the heavy variants (`Array`,
/// `Map`, `ByteString`, `Text`) already own their data behind a `Vec`, so
/// clone cost is proportional to size rather than hidden behind a pointer —
/// callers who need shared ownership should wrap a `CBOR` in `Rc`/`Arc`
/// themselves, matching this crate's "do one thing" scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CBOR {
    pub(crate) case: CBORCase,
}

impl CBOR {
    pub fn case(&self) -> &CBORCase { &self.case }
    pub fn into_case(self) -> CBORCase { self.case }

    pub fn null() -> Self { CBORCase::Simple(Simple::Null).into() }
    pub fn bool_value(b: bool) -> Self {
        CBORCase::Simple(if b { Simple::True } else { Simple::False }).into()
    }

    pub fn tagged_value(tag: impl Into<Tag>, value: impl Into<CBOR>) -> Self {
        CBORCase::Tagged(tag.into(), Box::new(value.into())).into()
    }

    pub fn byte_string(bytes: impl Into<Vec<u8>>) -> Self {
        CBORCase::ByteString(bytes.into()).into()
    }

    pub fn text(s: impl Into<String>) -> Self { CBORCase::Text(s.into()).into() }

    pub fn array(items: impl IntoIterator<Item = impl Into<CBOR>>) -> Self {
        CBORCase::Array(items.into_iter().map(Into::into).collect()).into()
    }

    pub fn map(map: Map) -> Self { CBORCase::Map(map).into() }

    pub fn as_unsigned(&self) -> Option<u64> {
        match &self.case {
            CBORCase::Unsigned(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match &self.case {
            CBORCase::Unsigned(n) => i64::try_from(*n).ok(),
            CBORCase::Negative(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.case {
            CBORCase::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_byte_string(&self) -> Option<&[u8]> {
        match &self.case {
            CBORCase::ByteString(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[CBOR]> {
        match &self.case {
            CBORCase::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match &self.case {
            CBORCase::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_tagged(&self) -> Option<(Tag, &CBOR)> {
        match &self.case {
            CBORCase::Tagged(tag, inner) => Some((*tag, inner)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &self.case {
            CBORCase::Simple(Simple::True) => Some(true),
            CBORCase::Simple(Simple::False) => Some(false),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(&self.case, CBORCase::Simple(Simple::Null))
    }
}

impl From<CBORCase> for CBOR {
    fn from(case: CBORCase) -> Self { CBOR { case } }
}

impl From<u64> for CBOR {
    fn from(n: u64) -> Self { CBORCase::Unsigned(n).into() }
}
impl From<u32> for CBOR {
    fn from(n: u32) -> Self { CBORCase::Unsigned(n as u64).into() }
}
impl From<u16> for CBOR {
    fn from(n: u16) -> Self { CBORCase::Unsigned(n as u64).into() }
}
impl From<u8> for CBOR {
    fn from(n: u8) -> Self { CBORCase::Unsigned(n as u64).into() }
}
impl From<i64> for CBOR {
    fn from(n: i64) -> Self {
        if n >= 0 { CBORCase::Unsigned(n as u64).into() } else { CBORCase::Negative(n).into() }
    }
}
impl From<i32> for CBOR {
    fn from(n: i32) -> Self { CBOR::from(n as i64) }
}
impl From<i16> for CBOR {
    fn from(n: i16) -> Self { CBOR::from(n as i64) }
}
impl From<i8> for CBOR {
    fn from(n: i8) -> Self { CBOR::from(n as i64) }
}
impl From<usize> for CBOR {
    fn from(n: usize) -> Self { CBORCase::Unsigned(n as u64).into() }
}
impl From<bool> for CBOR {
    fn from(b: bool) -> Self { CBOR::bool_value(b) }
}
impl From<f64> for CBOR {
    fn from(f: f64) -> Self { CBORCase::Simple(Simple::Float(f)).into() }
}
impl From<&str> for CBOR {
    fn from(s: &str) -> Self { CBOR::text(s) }
}
impl From<String> for CBOR {
    fn from(s: String) -> Self { CBOR::text(s) }
}
impl From<Vec<u8>> for CBOR {
    fn from(b: Vec<u8>) -> Self { CBOR::byte_string(b) }
}
impl From<&[u8]> for CBOR {
    fn from(b: &[u8]) -> Self { CBOR::byte_string(b.to_vec()) }
}
