//! Tag numbers for this crate's types, and registration with the process-wide
//! dCBOR tag registry (spec §6: "a representative subset: Envelope = 200,
//! Digest = 204, Signature = 205, SymmetricKey = 206, Nonce = 208, Salt =
//! 217, ARID = 40012, XID = 40024, JSON = 262, ProvenanceMark = 0x5050").

pub const TAG_ENVELOPE: u64 = 200;
pub const TAG_DIGEST: u64 = 204;
pub const TAG_SIGNATURE: u64 = 205;
pub const TAG_SYMMETRIC_KEY: u64 = 206;
pub const TAG_NONCE: u64 = 208;
pub const TAG_SALT: u64 = 217;
pub const TAG_SEALED_MESSAGE: u64 = 221;
pub const TAG_ENCRYPTED: u64 = 222;
pub const TAG_COMPRESSED: u64 = 223;
pub const TAG_PRIVATE_KEY_BASE: u64 = 224;
pub const TAG_SIGNING_PRIVATE_KEY: u64 = 225;
pub const TAG_SIGNING_PUBLIC_KEY: u64 = 226;
pub const TAG_ENCAPSULATION_PRIVATE_KEY: u64 = 227;
pub const TAG_ENCAPSULATION_PUBLIC_KEY: u64 = 228;
pub const TAG_ARID: u64 = 40012;
pub const TAG_XID: u64 = 40024;
pub const TAG_JSON: u64 = 262;
pub const TAG_PROVENANCE_MARK: u64 = 0x5050;

/// Registers every tag this crate defines. Idempotent: safe to call from
/// multiple crates' init paths (spec §5: tag registration is idempotent for
/// equal definitions).
pub fn register_tags() {
    let entries: &[(u64, &str)] = &[
        (TAG_ENVELOPE, "envelope"),
        (TAG_DIGEST, "digest"),
        (TAG_SIGNATURE, "signature"),
        (TAG_SYMMETRIC_KEY, "symmetric-key"),
        (TAG_NONCE, "nonce"),
        (TAG_SALT, "salt"),
        (TAG_SEALED_MESSAGE, "sealed-message"),
        (TAG_ENCRYPTED, "encrypted"),
        (TAG_COMPRESSED, "compressed"),
        (TAG_PRIVATE_KEY_BASE, "private-key-base"),
        (TAG_SIGNING_PRIVATE_KEY, "signing-private-key"),
        (TAG_SIGNING_PUBLIC_KEY, "signing-public-key"),
        (TAG_ENCAPSULATION_PRIVATE_KEY, "encapsulation-private-key"),
        (TAG_ENCAPSULATION_PUBLIC_KEY, "encapsulation-public-key"),
        (TAG_ARID, "arid"),
        (TAG_XID, "xid"),
        (TAG_JSON, "json"),
        (TAG_PROVENANCE_MARK, "provenance-mark"),
    ];
    for (value, name) in entries {
        // Registration failures here would mean two parts of this crate
        // disagree on a tag's name, a programmer error worth panicking on
        // rather than silently ignoring.
        dcbor::register_tag(*value, *name).expect("bc-components tag registration is self-consistent");
    }
}
