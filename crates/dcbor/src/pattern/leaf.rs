//! Leaf predicates: the bottom of the pattern algebra (spec §4.1).

use regex::Regex;

use crate::value::{CBOR, CBORCase, Simple};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberMatch {
    Any,
    Exact(f64),
    LessThan(f64),
    LessOrEqual(f64),
    GreaterThan(f64),
    GreaterOrEqual(f64),
    Range(f64, f64),
}

impl NumberMatch {
    pub fn matches(&self, n: f64) -> bool {
        match self {
            NumberMatch::Any => true,
            NumberMatch::Exact(v) => n == *v,
            NumberMatch::LessThan(v) => n < *v,
            NumberMatch::LessOrEqual(v) => n <= *v,
            NumberMatch::GreaterThan(v) => n > *v,
            NumberMatch::GreaterOrEqual(v) => n >= *v,
            NumberMatch::Range(lo, hi) => n >= *lo && n <= *hi,
        }
    }
}

#[derive(Debug, Clone)]
pub enum TextMatch {
    Any,
    Exact(String),
    Regex(Regex),
}

impl PartialEq for TextMatch {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TextMatch::Any, TextMatch::Any) => true,
            (TextMatch::Exact(a), TextMatch::Exact(b)) => a == b,
            (TextMatch::Regex(a), TextMatch::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl TextMatch {
    pub fn matches(&self, s: &str) -> bool {
        match self {
            TextMatch::Any => true,
            TextMatch::Exact(v) => s == v,
            TextMatch::Regex(re) => re.is_match(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BytesMatch {
    Any,
    Exact(Vec<u8>),
    LengthRange(usize, usize),
}

impl BytesMatch {
    pub fn matches(&self, b: &[u8]) -> bool {
        match self {
            BytesMatch::Any => true,
            BytesMatch::Exact(v) => b == v.as_slice(),
            BytesMatch::LengthRange(lo, hi) => b.len() >= *lo && b.len() <= *hi,
        }
    }
}

/// Extracts the numeric value of a dCBOR leaf, if it has one (unsigned,
/// negative, or float all compare as `f64`).
pub fn numeric_value(cbor: &CBOR) -> Option<f64> {
    match cbor.case() {
        CBORCase::Unsigned(n) => Some(*n as f64),
        CBORCase::Negative(n) => Some(*n as f64),
        CBORCase::Simple(Simple::Float(f)) => Some(*f),
        _ => None,
    }
}
