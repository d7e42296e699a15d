//! Deterministic CBOR: a restriction of conventional CBOR to exactly one
//! canonical byte encoding per logical value (spec §3), plus a process-wide
//! tag registry, diagnostic notation, and a pattern-matching engine over
//! dCBOR values.

pub mod decode;
pub mod diagnostic;
pub mod encode;
pub mod error;
pub mod float;
pub mod pattern;
pub mod tag;
pub mod value;

pub use decode::decode;
pub use diagnostic::diagnostic;
pub use encode::encode;
pub use error::{CBORError, NonCanonicalKind, Result};
pub use pattern::{Captures, Greediness, Pattern};
pub use tag::{Tag, register_tag, register_tag_with_summarizer, tag_name};
pub use value::{CBOR, CBORCase, Map, Simple};

/// Re-exports the common surface for `use dcbor::prelude::*;`.
pub mod prelude {
    pub use crate::{
        CBOR, CBORCase, CBORError, Map, Pattern, Result, Simple, Tag, decode, diagnostic, encode,
        register_tag, tag_name,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn round_trips_through_encode_decode() {
        let mut map = Map::new();
        map.insert("a", 1u64);
        map.insert("b", CBOR::array(vec![CBOR::from(2u64), CBOR::from(3u64)]));
        let value = CBOR::map(map);
        let bytes = encode(&value).unwrap();
        assert_eq!(decode(&bytes).unwrap(), value);
    }

    #[test]
    fn diagnostic_and_pattern_agree_on_structure() {
        let value = CBOR::array(vec![CBOR::from(1u64), CBOR::from(2u64), CBOR::from(3u64)]);
        assert_eq!(diagnostic(&value, false), "[1, 2, 3]");

        let pattern = Pattern::search(Pattern::number_exact(2.0));
        let (paths, _) = pattern.run(&value);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].last().unwrap(), &CBOR::from(2u64));
    }
}
