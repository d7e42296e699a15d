//! The process-wide CBOR tag registry (spec §4.1, §5).
//!
//! Registration is idempotent for equal definitions and fails with
//! `TagConflict` when the same tag number is redefined with a different
//! name. Reads see a consistent snapshot; writes are expected only at
//! program start, guarded by the registry's own lock (spec §5: "writes are
//! allowed only at program start or behind the caller's own mutual
//! exclusion").

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{CBORError, Result};

/// A registered tag's name and an optional summarizer used by annotated
/// diagnostic notation.
#[derive(Clone)]
pub struct TagInfo {
    pub value: u64,
    pub name: String,
    pub summarizer: Option<fn(&crate::CBOR) -> String>,
}

impl std::fmt::Debug for TagInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagInfo")
            .field("value", &self.value)
            .field("name", &self.name)
            .finish()
    }
}

/// A CBOR tag number with its (possibly unresolved) name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(pub u64);

impl Tag {
    pub const fn new(value: u64) -> Self { Self(value) }
    pub fn value(&self) -> u64 { self.0 }

    pub fn name(&self) -> Option<String> {
        TAG_REGISTRY.read().unwrap().get(&self.0).map(|t| t.name.clone())
    }
}

impl From<u64> for Tag {
    fn from(value: u64) -> Self { Tag(value) }
}

static TAG_REGISTRY: std::sync::LazyLock<RwLock<HashMap<u64, TagInfo>>> =
    std::sync::LazyLock::new(|| RwLock::new(HashMap::new()));

/// Registers a tag name, idempotently.
///
/// Returns `Ok(())` if the tag is new, or already registered with the exact
/// same name. Returns `TagConflict` if a different name was already
/// registered for this tag number.
pub fn register_tag(value: u64, name: impl Into<String>) -> Result<()> {
    register_tag_with_summarizer(value, name, None)
}

pub fn register_tag_with_summarizer(
    value: u64,
    name: impl Into<String>,
    summarizer: Option<fn(&crate::CBOR) -> String>,
) -> Result<()> {
    let name = name.into();
    let mut registry = TAG_REGISTRY.write().unwrap();
    match registry.get(&value) {
        Some(existing) if existing.name == name => Ok(()),
        Some(existing) => Err(CBORError::TagConflict {
            tag: value,
            existing: existing.name.clone(),
            attempted: name,
        }),
        None => {
            registry.insert(value, TagInfo { value, name, summarizer });
            Ok(())
        }
    }
}

pub fn tag_name(value: u64) -> Option<String> {
    TAG_REGISTRY.read().unwrap().get(&value).map(|t| t.name.clone())
}

pub fn summarize_tag(value: u64, cbor: &crate::CBOR) -> Option<String> {
    TAG_REGISTRY
        .read()
        .unwrap()
        .get(&value)
        .and_then(|t| t.summarizer)
        .map(|f| f(cbor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idempotent_registration_succeeds() {
        register_tag(90000, "test-tag-a").unwrap();
        register_tag(90000, "test-tag-a").unwrap();
        assert_eq!(tag_name(90000).as_deref(), Some("test-tag-a"));
    }

    #[test]
    fn conflicting_registration_fails() {
        register_tag(90001, "test-tag-b").unwrap();
        let err = register_tag(90001, "test-tag-c").unwrap_err();
        assert!(matches!(err, CBORError::TagConflict { .. }));
    }
}
