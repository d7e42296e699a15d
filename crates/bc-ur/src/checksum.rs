//! CRC-32 (IEEE 802.3), the checksum bytewords appends to every payload
//! before encoding. Hand-rolled rather than pulled from a crate: this is an
//! error-detection checksum, not a cryptographic primitive, the same
//! reasoning that keeps `dcbor`'s half-float conversion free of a `half`
//! dependency.

const POLY: u32 = 0xEDB88320;

fn step(mut value: u32) -> u32 {
    for _ in 0..8 {
        value = if value & 1 == 1 { (value >> 1) ^ POLY } else { value >> 1 };
    }
    value
}

pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        let index = (crc ^ byte as u32) & 0xFF;
        crc = (crc >> 8) ^ step(index);
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc32_of_known_string() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn crc32_of_empty_is_zero() {
        assert_eq!(crc32(b""), 0);
    }
}
