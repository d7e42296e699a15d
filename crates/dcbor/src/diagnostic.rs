//! CBOR diagnostic notation (RFC 8949 §8), with optional tag annotations.

use crate::tag::tag_name;
use crate::value::{CBOR, CBORCase, Simple};

/// Renders `value` as CBOR diagnostic notation.
///
/// With `annotate = true`, registered tags are rendered with their name as
/// a trailing comment, e.g. `200(42)  / envelope /` (spec §4.1:
/// "`diagnostic(value, annotate?)`... with `annotate=true`, adds
/// human-readable annotations for registered tags").
pub fn diagnostic(value: &CBOR, annotate: bool) -> String {
    let mut out = String::new();
    write_value(value, annotate, &mut out);
    out
}

fn write_value(value: &CBOR, annotate: bool, out: &mut String) {
    match &value.case {
        CBORCase::Unsigned(n) => out.push_str(&n.to_string()),
        CBORCase::Negative(n) => out.push_str(&n.to_string()),
        CBORCase::ByteString(bytes) => {
            out.push_str("h'");
            out.push_str(&hex::encode(bytes));
            out.push('\'');
        }
        CBORCase::Text(text) => {
            out.push('"');
            for c in text.chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    _ => out.push(c),
                }
            }
            out.push('"');
        }
        CBORCase::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(item, annotate, out);
            }
            out.push(']');
        }
        CBORCase::Map(map) => {
            out.push('{');
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(k, annotate, out);
                out.push_str(": ");
                write_value(v, annotate, out);
            }
            out.push('}');
        }
        CBORCase::Tagged(tag, inner) => {
            out.push_str(&tag.value().to_string());
            out.push('(');
            write_value(inner, annotate, out);
            out.push(')');
            if annotate {
                if let Some(name) = tag_name(tag.value()) {
                    out.push_str("  / ");
                    out.push_str(&name);
                    out.push_str(" /");
                }
            }
        }
        CBORCase::Simple(simple) => write_simple(simple, out),
    }
}

fn write_simple(simple: &Simple, out: &mut String) {
    match simple {
        Simple::False => out.push_str("false"),
        Simple::True => out.push_str("true"),
        Simple::Null => out.push_str("null"),
        Simple::Float(f) => {
            if f.is_nan() {
                out.push_str("NaN");
            } else if f.is_infinite() {
                out.push_str(if *f > 0.0 { "Infinity" } else { "-Infinity" });
            } else if *f == f.trunc() && f.abs() < 1e15 {
                out.push_str(&format!("{f:.1}"));
            } else {
                out.push_str(&format!("{f}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::register_tag;
    use crate::value::Map;

    #[test]
    fn renders_map_in_insertion_independent_sorted_order() {
        let mut map = Map::new();
        map.insert(1u64, 2u64);
        map.insert(3u64, 4u64);
        let cbor = CBOR::map(map);
        assert_eq!(diagnostic(&cbor, false), "{1: 2, 3: 4}");
    }

    #[test]
    fn annotates_known_tag() {
        register_tag(91000, "example-tag").unwrap();
        let cbor = CBOR::tagged_value(91000u64, 1u64);
        assert_eq!(diagnostic(&cbor, true), "91000(1)  / example-tag /");
        assert_eq!(diagnostic(&cbor, false), "91000(1)");
    }

    #[test]
    fn renders_array_and_text() {
        let cbor = CBOR::array(vec![CBOR::text("a"), CBOR::from(1u64)]);
        assert_eq!(diagnostic(&cbor, false), r#"["a", 1]"#);
    }
}
