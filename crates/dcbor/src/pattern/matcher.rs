//! Pure structural matching: "does this pattern match this value", with no
//! path bookkeeping. [`vm::match_pattern`] builds on top of this to collect
//! paths and captures.

use super::Pattern;
use super::leaf::numeric_value;
use crate::value::{CBOR, CBORCase};

/// A sequence of values visited from the root to a match site, inclusive of
/// both ends (spec §4.1: "each path is the sequence of values visited from
/// root to the match site").
pub type Path = Vec<CBOR>;

/// Returns whether `pattern` matches `value`, ignoring captures.
pub fn matches(pattern: &Pattern, value: &CBOR) -> bool {
    match pattern {
        Pattern::Wildcard => true,
        Pattern::Null => value.is_null(),
        Pattern::Bool(expected) => match (expected, value.as_bool()) {
            (None, Some(_)) => true,
            (Some(e), Some(actual)) => *e == actual,
            _ => false,
        },
        Pattern::Number(m) => numeric_value(value).is_some_and(|n| m.matches(n)),
        Pattern::Text(m) => value.as_text().is_some_and(|s| m.matches(s)),
        Pattern::Bytes(m) => value.as_byte_string().is_some_and(|b| m.matches(b)),
        Pattern::Literal(expected) => value == expected,
        Pattern::Array(sub_patterns) => match_array(sub_patterns, value),
        Pattern::Map(pairs) => match_map(pairs, value),
        Pattern::Tag(id, inner) => match value.case() {
            CBORCase::Tagged(tag, inner_value) => tag.value() == *id && matches(inner, inner_value),
            _ => false,
        },
        Pattern::And(patterns) => patterns.iter().all(|p| matches(p, value)),
        Pattern::Or(patterns) => patterns.iter().any(|p| matches(p, value)),
        Pattern::Not(inner) => !matches(inner, value),
        Pattern::Capture(_, inner) => matches(inner, value),
        // `search` and `repeat` are meaningful only through the path-
        // collecting walk in `vm`; evaluated structurally they degrade to
        // "does the inner pattern match here".
        Pattern::Search(inner) => matches(inner, value),
        Pattern::Repeat(inner, min, _max, _) => *min == 0 || matches(inner, value),
    }
}

fn match_array(sub_patterns: &[Pattern], value: &CBOR) -> bool {
    let Some(items) = value.as_array() else { return false };
    match_sequence(sub_patterns, items)
}

/// Matches a positional sequence of sub-patterns against `items`, expanding
/// any `Repeat` sub-pattern into a (possibly empty) run of matches.
/// Supports at most one `Repeat` per sequence, which covers the
/// `(p){m,n}` use cases spec §4.1 calls out (a fixed prefix/suffix around
/// one repeated element).
fn match_sequence(sub_patterns: &[Pattern], items: &[CBOR]) -> bool {
    let Some(repeat_idx) = sub_patterns.iter().position(|p| matches!(p, Pattern::Repeat(..)))
    else {
        return sub_patterns.len() == items.len()
            && sub_patterns.iter().zip(items).all(|(p, v)| matches(p, v));
    };

    let Pattern::Repeat(inner, min, max, greediness) = &sub_patterns[repeat_idx] else {
        unreachable!()
    };
    let prefix = &sub_patterns[..repeat_idx];
    let suffix = &sub_patterns[repeat_idx + 1..];
    if items.len() < prefix.len() + suffix.len() {
        return false;
    }
    let available = items.len() - prefix.len() - suffix.len();
    let hi = (*max).min(available);
    if *min > hi {
        return false;
    }

    let mut counts: Vec<usize> = (*min..=hi).collect();
    match greediness {
        super::Greediness::Greedy => counts.reverse(),
        super::Greediness::Lazy => {}
        super::Greediness::Possessive => counts = vec![hi],
    }

    for count in counts {
        if !prefix.iter().zip(&items[..prefix.len()]).all(|(p, v)| matches(p, v)) {
            continue;
        }
        let repeated = &items[prefix.len()..prefix.len() + count];
        if !repeated.iter().all(|v| matches(inner, v)) {
            continue;
        }
        let rest = &items[prefix.len() + count..];
        if suffix.iter().zip(rest).all(|(p, v)| matches(p, v)) {
            return true;
        }
    }
    false
}

fn match_map(pairs: &[(Pattern, Pattern)], value: &CBOR) -> bool {
    let Some(map) = value.as_map() else { return false };
    pairs.iter().all(|(pred, obj)| {
        map.iter().any(|(k, v)| matches(pred, k) && matches(obj, v))
    })
}
