//! Attachments (spec §4.2/§6): `'attachment': (payload) ['vendor': text,
//! 'conformsTo': text?]` — vendor-namespaced data a reader can safely skip
//! if it doesn't recognize the vendor/conformsTo pair.

use crate::error::{EnvelopeError, Result};
use crate::{Assertion, Envelope, EnvelopeEncodable};

impl Assertion {
    /// Builds an attachment assertion: predicate `'attachment'`, object a
    /// wrapped envelope of `payload` carrying its own `'vendor'` and
    /// optional `'conformsTo'` assertions.
    pub fn new_attachment(
        payload: impl EnvelopeEncodable,
        vendor: impl EnvelopeEncodable,
        conforms_to: Option<impl EnvelopeEncodable>,
    ) -> Self {
        let wrapped = Envelope::new(payload).wrap_envelope();
        let wrapped = wrapped.add_assertion(crate::known_values::VENDOR, vendor);
        let wrapped = wrapped.add_optional_assertion(crate::known_values::CONFORMS_TO, conforms_to);
        Assertion::new(crate::known_values::ATTACHMENT, wrapped)
    }
}

impl Envelope {
    pub fn add_attachment(
        &self,
        payload: impl EnvelopeEncodable,
        vendor: impl EnvelopeEncodable,
        conforms_to: Option<impl EnvelopeEncodable>,
    ) -> Self {
        self.add_assertion_envelope(Assertion::new_attachment(payload, vendor, conforms_to))
    }

    /// All attachment assertion objects (each still wrapped, with its
    /// `'vendor'`/`'conformsTo'` assertions attached), optionally filtered.
    pub fn attachments(
        &self,
        vendor: Option<&str>,
        conforms_to: Option<&str>,
    ) -> Vec<Envelope> {
        self.assertions_with_predicate(crate::known_values::ATTACHMENT)
            .into_iter()
            .filter_map(|assertion| assertion.as_object())
            .filter(|attachment| {
                vendor.map(|v| attachment.attachment_vendor().ok().as_deref() == Some(v)).unwrap_or(true)
                    && conforms_to
                        .map(|c| attachment.attachment_conforms_to().ok().flatten().as_deref() == Some(c))
                        .unwrap_or(true)
            })
            .collect()
    }

    pub fn attachment(&self, vendor: Option<&str>, conforms_to: Option<&str>) -> Result<Envelope> {
        let mut matches = self.attachments(vendor, conforms_to);
        match matches.len() {
            0 => Err(EnvelopeError::NonexistentAttachment),
            1 => Ok(matches.remove(0)),
            _ => Err(EnvelopeError::AmbiguousAttachment),
        }
    }

    pub fn attachment_payload(&self) -> Result<Envelope> {
        self.try_unwrap()
    }

    pub fn attachment_vendor(&self) -> Result<String> {
        self.extract_object_for_predicate(crate::known_values::VENDOR)
    }

    pub fn attachment_conforms_to(&self) -> Result<Option<String>> {
        self.extract_optional_object_for_predicate(crate::known_values::CONFORMS_TO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_round_trips_vendor_and_payload() {
        let envelope = Envelope::new("Alice").add_attachment(
            "extra-data",
            "com.example.vendor",
            Some("https://example.com/schema"),
        );
        let attachment = envelope.attachment(Some("com.example.vendor"), None).unwrap();
        assert_eq!(attachment.attachment_vendor().unwrap(), "com.example.vendor");
        assert_eq!(
            attachment.attachment_conforms_to().unwrap().as_deref(),
            Some("https://example.com/schema")
        );
        let payload: String = attachment.attachment_payload().unwrap().extract_subject().unwrap();
        assert_eq!(payload, "extra-data");
    }

    #[test]
    fn no_matching_attachment_is_an_error() {
        let envelope = Envelope::new("Alice").add_attachment("extra-data", "com.example.vendor", None::<&str>);
        assert!(matches!(
            envelope.attachment(Some("com.other.vendor"), None),
            Err(EnvelopeError::NonexistentAttachment)
        ));
    }
}
