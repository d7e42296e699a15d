//! Uniform Resources: the `ur:<type>/<bytewords>` textual envelope for
//! dCBOR payloads, with bytewords encoding and fountain-coded multipart
//! support for payloads too long for a single code (spec §6).

pub mod bytewords;
pub mod checksum;
pub mod error;
pub mod fountain;
pub mod ur;

pub use bytewords::Style as BytewordsStyle;
pub use error::{Result, UrError};
pub use fountain::{Decoder as FountainDecoder, Part as FountainPart};
pub use ur::{MultipartDecoder, Ur, encode_multipart};

pub mod prelude {
    pub use crate::bytewords::Style as BytewordsStyle;
    pub use crate::error::{Result, UrError};
    pub use crate::fountain::{Decoder as FountainDecoder, Part as FountainPart};
    pub use crate::ur::{MultipartDecoder, Ur, encode_multipart};
}
