//! Gordian Envelope: a digest-addressed, Merkle-like tree for structured
//! data that supports selective disclosure. Every subtree carries a digest;
//! assertions (`predicate: object` pairs) hang off a subject; any subtree
//! can be elided, encrypted, or compressed without disturbing the digest of
//! anything above it (spec §3/§4.2).
//!
//! ```
//! use bc_envelope::Envelope;
//!
//! let envelope = Envelope::new("Alice").add_assertion("knows", "Bob");
//! assert_eq!(envelope.format_flat(), "\"Alice\" [\"knows\": \"Bob\"]");
//! ```

mod assertion;
mod assertions;
mod cbor;
mod decodable;
mod digest;
mod elide;
mod envelope;
mod error;
mod extension;
mod format;
#[cfg(feature = "known_value")]
pub mod known_values;
mod queries;
mod wrap;

pub use assertion::Assertion;
pub use elide::ObscureAction;
pub use envelope::{Envelope, EnvelopeEncodable};
pub use error::{EnvelopeError, Result};
#[cfg(feature = "known_value")]
pub use known_values::KnownValue;

pub mod prelude {
    pub use crate::{Assertion, Envelope, EnvelopeEncodable, EnvelopeError, ObscureAction, Result};
    #[cfg(feature = "known_value")]
    pub use crate::{known_values, KnownValue};
}
