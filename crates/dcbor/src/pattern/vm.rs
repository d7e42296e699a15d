//! Path- and capture-collecting walk over a dCBOR value tree.
//!
//! `match_pattern` mirrors `matcher::matches` structurally but additionally
//! records every node a capture bound to, and — for `search` — visits every
//! descendant of the current node in a stable preorder so that match order
//! is deterministic across runs (spec §4.1, §5).

use std::collections::HashMap;

use super::Pattern;
use super::matcher::{Path, matches};
use crate::value::{CBOR, CBORCase};

/// Capture name -> every path that capture matched, in discovery order.
pub type Captures = HashMap<String, Vec<Path>>;

/// Walks `value` (whose path-so-far, including itself, is `path`) against
/// `pattern`, appending every path where the pattern matched to `out_paths`
/// and recording capture paths into `captures`.
pub fn match_pattern(
    pattern: &Pattern,
    value: &CBOR,
    path: &mut Path,
    out_paths: &mut Vec<Path>,
    captures: &mut Captures,
) {
    match pattern {
        Pattern::Capture(name, inner) => {
            if matches(inner, value) {
                captures.entry(name.clone()).or_default().push(path.clone());
                out_paths.push(path.clone());
                match_pattern(inner, value, path, &mut Vec::new(), captures);
            }
        }
        Pattern::And(patterns) => {
            if patterns.iter().all(|p| matches(p, value)) {
                out_paths.push(path.clone());
                for p in patterns {
                    match_pattern(p, value, path, &mut Vec::new(), captures);
                }
            }
        }
        Pattern::Or(patterns) => {
            if let Some(first) = patterns.iter().find(|p| matches(p, value)) {
                out_paths.push(path.clone());
                match_pattern(first, value, path, &mut Vec::new(), captures);
            }
        }
        Pattern::Not(inner) => {
            if !matches(inner, value) {
                out_paths.push(path.clone());
            }
        }
        Pattern::Array(sub_patterns) => {
            if matches(pattern, value) {
                out_paths.push(path.clone());
                if let Some(items) = value.as_array() {
                    descend_into_sequence(sub_patterns, items, path, captures);
                }
            }
        }
        Pattern::Map(pairs) => {
            if matches(pattern, value) {
                out_paths.push(path.clone());
                if let Some(map) = value.as_map() {
                    for (pred, obj) in pairs {
                        if let Some((_, v)) = map.iter().find(|(k, v)| matches(pred, k) && matches(obj, v)) {
                            path.push(v.clone());
                            match_pattern(obj, v, path, &mut Vec::new(), captures);
                            path.pop();
                        }
                    }
                }
            }
        }
        Pattern::Tag(id, inner) => {
            if let CBORCase::Tagged(tag, inner_value) = value.case() {
                if tag.value() == *id && matches(inner, inner_value) {
                    out_paths.push(path.clone());
                    path.push((**inner_value).clone());
                    match_pattern(inner, inner_value, path, &mut Vec::new(), captures);
                    path.pop();
                }
            }
        }
        Pattern::Search(inner) => {
            search_descendants(inner, value, path, out_paths, captures);
        }
        Pattern::Repeat(..) => {
            // A bare `Repeat` outside of an array position is evaluated as
            // "does the inner pattern match at least `min` times", which
            // for a single scalar site means "min == 0, or inner matches".
            if matches(pattern, value) {
                out_paths.push(path.clone());
            }
        }
        // Leaf predicates: a match is the current node itself.
        _ => {
            if matches(pattern, value) {
                out_paths.push(path.clone());
            }
        }
    }
}

fn descend_into_sequence(
    sub_patterns: &[Pattern],
    items: &[CBOR],
    path: &mut Path,
    captures: &mut Captures,
) {
    // Re-derive which sub-pattern lines up with which item using the same
    // expansion rule as `matcher::match_sequence`, then recurse per item so
    // captures nested inside array elements are recorded.
    let repeat_idx = sub_patterns.iter().position(|p| matches!(p, Pattern::Repeat(..)));
    match repeat_idx {
        None => {
            for (p, v) in sub_patterns.iter().zip(items) {
                path.push(v.clone());
                match_pattern(p, v, path, &mut Vec::new(), captures);
                path.pop();
            }
        }
        Some(idx) => {
            let Pattern::Repeat(inner, _, _, _) = &sub_patterns[idx] else { unreachable!() };
            let prefix = &sub_patterns[..idx];
            let suffix = &sub_patterns[idx + 1..];
            for (p, v) in prefix.iter().zip(&items[..prefix.len().min(items.len())]) {
                path.push(v.clone());
                match_pattern(p, v, path, &mut Vec::new(), captures);
                path.pop();
            }
            let repeated_end = items.len().saturating_sub(suffix.len());
            for v in &items[prefix.len().min(repeated_end)..repeated_end] {
                path.push(v.clone());
                match_pattern(inner, v, path, &mut Vec::new(), captures);
                path.pop();
            }
            for (p, v) in suffix.iter().zip(&items[repeated_end..]) {
                path.push(v.clone());
                match_pattern(p, v, path, &mut Vec::new(), captures);
                path.pop();
            }
        }
    }
}

/// Tries `inner` at `value` and at every descendant of `value`, in a stable
/// preorder, recording every match (spec §8 E4: `search(@found(42))` over
/// `[1, [2, 42], 3]` finds the single path down to the `42` leaf).
fn search_descendants(
    inner: &Pattern,
    value: &CBOR,
    path: &mut Path,
    out_paths: &mut Vec<Path>,
    captures: &mut Captures,
) {
    match_pattern(inner, value, path, out_paths, captures);
    match value.case() {
        CBORCase::Array(items) => {
            for item in items {
                path.push(item.clone());
                search_descendants(inner, item, path, out_paths, captures);
                path.pop();
            }
        }
        CBORCase::Map(map) => {
            for (k, v) in map.iter() {
                path.push(k.clone());
                search_descendants(inner, k, path, out_paths, captures);
                path.pop();
                path.push(v.clone());
                search_descendants(inner, v, path, out_paths, captures);
                path.pop();
            }
        }
        CBORCase::Tagged(_, inner_value) => {
            path.push((**inner_value).clone());
            search_descendants(inner, inner_value, path, out_paths, captures);
            path.pop();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CBOR;

    #[test]
    fn search_capture_finds_nested_leaf() {
        let value = CBOR::array(vec![
            CBOR::from(1u64),
            CBOR::array(vec![CBOR::from(2u64), CBOR::from(42u64)]),
            CBOR::from(3u64),
        ]);
        let pattern = Pattern::search(Pattern::capture("found", Pattern::literal(42u64)));
        let (paths, captures) = pattern.run(&value);
        assert_eq!(paths.len(), 1);
        let found = &captures["found"];
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].len(), 3);
        assert_eq!(found[0][2], CBOR::from(42u64));
    }

    #[test]
    fn array_pattern_matches_positionally() {
        let value = CBOR::array(vec![CBOR::from(1u64), CBOR::from(2u64)]);
        let pattern = Pattern::array(vec![Pattern::number_exact(1.0), Pattern::number_exact(2.0)]);
        assert!(matches(&pattern, &value));
        let wrong = Pattern::array(vec![Pattern::number_exact(2.0), Pattern::number_exact(1.0)]);
        assert!(!matches(&wrong, &value));
    }
}
