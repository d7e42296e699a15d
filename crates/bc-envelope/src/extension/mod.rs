//! Feature-gated envelope capabilities layered on top of the core tree
//! (spec §4.2's optional operations): each module is its own cargo feature,
//! enabled by default, so a consumer that only wants the base data
//! structure can opt out of the rest.

#[cfg(feature = "attachment")]
pub mod attachment;
#[cfg(feature = "compress")]
pub mod compress;
#[cfg(feature = "encrypt")]
pub mod encrypt;
#[cfg(feature = "recipient")]
pub mod recipient;
#[cfg(feature = "salt")]
pub mod salt;
#[cfg(feature = "signature")]
pub mod signature;
#[cfg(feature = "sskr")]
pub mod sskr;
