//! A small pattern algebra over dCBOR values, compiled to a matcher that
//! walks the value tree directly rather than through an intermediate byte
//! code — the teacher's envelope-level `pattern::vm` module runs a
//! Thompson-style VM over envelope axes; here the "VM" in [`vm`] is a
//! direct recursive walk because the structure being matched (a dCBOR
//! value tree) is already the thing being walked, with no separate
//! axis-traversal step to compile away.

mod leaf;
mod matcher;
mod vm;

pub use leaf::{BytesMatch, NumberMatch, TextMatch};
pub use matcher::{Path, matches};
pub use vm::{Captures, match_pattern};

use regex::Regex;

use crate::error::{CBORError, Result};

/// How a [`Pattern::Repeat`] should choose its match count when more than
/// one count would make the surrounding pattern succeed (spec §4.1:
/// "repeat `(p){m,n}` with greedy/lazy/possessive").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greediness {
    /// Try the largest count first.
    Greedy,
    /// Try the smallest count first.
    Lazy,
    /// Match the largest possible count and never backtrack off it.
    Possessive,
}

/// A compiled pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Bool(Option<bool>),
    Number(NumberMatch),
    Text(TextMatch),
    Bytes(BytesMatch),
    Literal(crate::CBOR),
    Null,
    Wildcard,
    /// Positional array match: each element of the array must match the
    /// corresponding sub-pattern, in order.
    Array(Vec<Pattern>),
    /// Unordered map match: for every `(predicate, object)` pair, some
    /// key/value entry in the map must satisfy both.
    Map(Vec<(Pattern, Pattern)>),
    Tag(u64, Box<Pattern>),
    And(Vec<Pattern>),
    Or(Vec<Pattern>),
    Not(Box<Pattern>),
    Search(Box<Pattern>),
    Capture(String, Box<Pattern>),
    Repeat(Box<Pattern>, usize, usize, Greediness),
}

impl Pattern {
    pub fn bool_any() -> Self { Pattern::Bool(None) }
    pub fn bool_value(b: bool) -> Self { Pattern::Bool(Some(b)) }
    pub fn number_any() -> Self { Pattern::Number(NumberMatch::Any) }
    pub fn number_exact(n: f64) -> Self { Pattern::Number(NumberMatch::Exact(n)) }
    pub fn number_range(lo: f64, hi: f64) -> Self { Pattern::Number(NumberMatch::Range(lo, hi)) }
    pub fn text_any() -> Self { Pattern::Text(TextMatch::Any) }
    pub fn text_exact(s: impl Into<String>) -> Self { Pattern::Text(TextMatch::Exact(s.into())) }

    pub fn text_regex(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).map_err(|e| CBORError::InvalidPattern(e.to_string()))?;
        Ok(Pattern::Text(TextMatch::Regex(re)))
    }

    pub fn bytes_any() -> Self { Pattern::Bytes(BytesMatch::Any) }
    pub fn bytes_length_range(lo: usize, hi: usize) -> Self {
        Pattern::Bytes(BytesMatch::LengthRange(lo, hi))
    }

    pub fn literal(value: impl Into<crate::CBOR>) -> Self { Pattern::Literal(value.into()) }
    pub fn array(items: Vec<Pattern>) -> Self { Pattern::Array(items) }
    pub fn map(pairs: Vec<(Pattern, Pattern)>) -> Self { Pattern::Map(pairs) }
    pub fn tag(id: u64, inner: Pattern) -> Self { Pattern::Tag(id, Box::new(inner)) }
    pub fn and(patterns: Vec<Pattern>) -> Self { Pattern::And(patterns) }
    pub fn or(patterns: Vec<Pattern>) -> Self { Pattern::Or(patterns) }
    pub fn not(inner: Pattern) -> Self { Pattern::Not(Box::new(inner)) }
    pub fn search(inner: Pattern) -> Self { Pattern::Search(Box::new(inner)) }
    pub fn capture(name: impl Into<String>, inner: Pattern) -> Self {
        Pattern::Capture(name.into(), Box::new(inner))
    }
    pub fn repeat(inner: Pattern, min: usize, max: usize, greediness: Greediness) -> Self {
        Pattern::Repeat(Box::new(inner), min, max, greediness)
    }

    /// Matches `value` against this pattern, returning every path at which
    /// the pattern (or a nested `search`) matched, plus the paths captured
    /// under each `@name` capture (spec §4.1: "`match(p, value)` returns
    /// both matching *paths*... and a mapping from capture names to the
    /// list of paths they matched").
    pub fn run(&self, value: &crate::CBOR) -> (Vec<Path>, Captures) {
        let mut captures = Captures::new();
        let mut out_paths = Vec::new();
        vm::match_pattern(self, value, &mut vec![value.clone()], &mut out_paths, &mut captures);
        (out_paths, captures)
    }
}
