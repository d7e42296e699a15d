//! Envelope notation and CBOR diagnostic notation (spec §4.1/§6): human
//! readable renderings for debugging and documentation, not a wire format.

use crate::envelope::EnvelopeCase;
use crate::Envelope;

impl Envelope {
    /// A single-line envelope notation: `subject [predicate: object, ...]`,
    /// wrapped subjects as `{...}`, obscured forms as `ELIDED`/`ENCRYPTED`/
    /// `COMPRESSED`.
    pub fn format_flat(&self) -> String {
        let mut out = String::new();
        self.write_flat(&mut out);
        out
    }

    fn write_flat(&self, out: &mut String) {
        match self.case() {
            EnvelopeCase::Leaf { cbor, .. } => out.push_str(&dcbor::diagnostic(cbor, false)),
            #[cfg(feature = "known_value")]
            EnvelopeCase::KnownValue { value, .. } => {
                out.push('\'');
                out.push_str(&value.name());
                out.push('\'');
            }
            EnvelopeCase::Wrapped { envelope, .. } => {
                out.push('{');
                envelope.write_flat(out);
                out.push('}');
            }
            EnvelopeCase::Assertion(assertion) => {
                assertion.predicate().write_flat(out);
                out.push_str(": ");
                assertion.object().write_flat(out);
            }
            #[cfg(feature = "encrypt")]
            EnvelopeCase::Encrypted(_) => out.push_str("ENCRYPTED"),
            #[cfg(feature = "compress")]
            EnvelopeCase::Compressed(_) => out.push_str("COMPRESSED"),
            EnvelopeCase::Elided(_) => out.push_str("ELIDED"),
            EnvelopeCase::Node { subject, assertions, .. } => {
                if subject.is_subject_assertion() {
                    out.push('{');
                    subject.write_flat(out);
                    out.push('}');
                } else {
                    subject.write_flat(out);
                }
                out.push_str(" [");
                for (i, assertion) in assertions.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    assertion.write_flat(out);
                }
                out.push(']');
            }
        }
    }

    /// A multi-line, indented rendering of [`Self::format_flat`]'s
    /// structure; every node's assertions get their own indented block.
    pub fn format(&self) -> String {
        let mut out = String::new();
        self.write_tree(0, &mut out);
        out.trim_end().to_string()
    }

    fn write_tree(&self, level: usize, out: &mut String) {
        let indent = "    ".repeat(level);
        match self.case() {
            EnvelopeCase::Node { subject, assertions, .. } => {
                out.push_str(&indent);
                if subject.is_subject_assertion() {
                    out.push_str("{\n");
                    subject.write_tree(level + 1, out);
                    out.push_str(&indent);
                    out.push_str("}\n");
                } else {
                    out.push_str(&subject.format_flat());
                    out.push('\n');
                }
                out.push_str(&indent);
                out.push_str("[\n");
                for assertion in assertions {
                    out.push_str(&"    ".repeat(level + 1));
                    out.push_str(&assertion.format_flat());
                    out.push('\n');
                }
                out.push_str(&indent);
                out.push_str("]\n");
            }
            _ => {
                out.push_str(&indent);
                out.push_str(&self.format_flat());
                out.push('\n');
            }
        }
    }

    /// CBOR diagnostic notation (RFC 8949 §8) of this envelope's tagged
    /// wire form.
    pub fn diagnostic_opt(&self, annotate: bool) -> String {
        dcbor::diagnostic(&self.tagged_cbor(), annotate)
    }

    pub fn diagnostic(&self) -> String { self.diagnostic_opt(false) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_flat_renders_subject_and_assertions() {
        let envelope = Envelope::new("Alice").add_assertion("knows", "Bob");
        assert_eq!(envelope.format_flat(), "\"Alice\" [\"knows\": \"Bob\"]");
    }

    #[test]
    fn diagnostic_contains_the_envelope_tag() {
        let envelope = Envelope::new("Alice");
        assert!(envelope.diagnostic().contains("200"));
    }
}
