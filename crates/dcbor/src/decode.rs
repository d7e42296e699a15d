//! Strict canonical dCBOR decoding. Any deviation from the canonical
//! encoding — non-shortest headers, unsorted/duplicate map keys,
//! non-canonical floats, trailing bytes — is a decode error (spec §4.1,
//! §8).

use crate::error::{CBORError, NonCanonicalKind, Result};
use crate::float::f16_bits_to_f64;
use crate::tag::Tag;
use crate::value::{CBOR, CBORCase, Map, Simple};

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self { Self { data, pos: 0 } }

    fn peek_byte(&self) -> Result<u8> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(CBORError::NotCanonical(NonCanonicalKind::UnexpectedEnd))
    }

    fn take_byte(&mut self) -> Result<u8> {
        let b = self.peek_byte()?;
        self.pos += 1;
        Ok(b)
    }

    fn take_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.data.len() {
            return Err(CBORError::NotCanonical(NonCanonicalKind::UnexpectedEnd));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Reads a CBOR header's argument, enforcing the shortest-length rule.
    fn read_length(&mut self, additional: u8) -> Result<u64> {
        match additional {
            0..=23 => Ok(additional as u64),
            24 => {
                let b = self.take_byte()?;
                if b < 24 {
                    return Err(CBORError::NotCanonical(NonCanonicalKind::NonShortestLength));
                }
                Ok(b as u64)
            }
            25 => {
                let bytes = self.take_bytes(2)?;
                let v = u16::from_be_bytes(bytes.try_into().unwrap());
                if v <= u8::MAX as u16 {
                    return Err(CBORError::NotCanonical(NonCanonicalKind::NonShortestLength));
                }
                Ok(v as u64)
            }
            26 => {
                let bytes = self.take_bytes(4)?;
                let v = u32::from_be_bytes(bytes.try_into().unwrap());
                if v <= u16::MAX as u32 {
                    return Err(CBORError::NotCanonical(NonCanonicalKind::NonShortestLength));
                }
                Ok(v as u64)
            }
            27 => {
                let bytes = self.take_bytes(8)?;
                let v = u64::from_be_bytes(bytes.try_into().unwrap());
                if v <= u32::MAX as u64 {
                    return Err(CBORError::NotCanonical(NonCanonicalKind::NonShortestLength));
                }
                Ok(v)
            }
            28..=30 => Err(CBORError::NotCanonical(NonCanonicalKind::ReservedAdditionalInfo)),
            31 => Err(CBORError::NotCanonical(NonCanonicalKind::IndefiniteLength)),
            _ => unreachable!("additional info is a 5-bit field"),
        }
    }

    fn read_value(&mut self) -> Result<CBOR> {
        let header = self.take_byte()?;
        let major = header >> 5;
        let additional = header & 0x1f;

        match major {
            0 => Ok(CBORCase::Unsigned(self.read_length(additional)?).into()),
            1 => {
                let n = self.read_length(additional)?;
                let n = i64::try_from(n)
                    .map_err(|_| CBORError::NonCanonicalValue("negative integer out of range".into()))?;
                // Major type 1 encodes the value `-1 - n`.
                Ok(CBORCase::Negative(-1i64 - n).into())
            }
            2 => {
                let len = self.read_length(additional)? as usize;
                let bytes = self.take_bytes(len)?.to_vec();
                Ok(CBORCase::ByteString(bytes).into())
            }
            3 => {
                let len = self.read_length(additional)? as usize;
                let bytes = self.take_bytes(len)?;
                let text = std::str::from_utf8(bytes)
                    .map_err(|_| CBORError::InvalidUtf8)?
                    .to_string();
                Ok(CBORCase::Text(text).into())
            }
            4 => {
                let len = self.read_length(additional)? as usize;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.read_value()?);
                }
                Ok(CBORCase::Array(items).into())
            }
            5 => {
                let len = self.read_length(additional)? as usize;
                let mut entries = Vec::with_capacity(len);
                for _ in 0..len {
                    let key_start = self.pos;
                    let key = self.read_value()?;
                    let key_bytes = self.data[key_start..self.pos].to_vec();
                    let value = self.read_value()?;
                    entries.push((key_bytes, key, value));
                }
                let map = Map::from_decoded_entries(entries).map_err(CBORError::NotCanonical)?;
                Ok(CBORCase::Map(map).into())
            }
            6 => {
                let tag_value = self.read_length(additional)?;
                let inner = self.read_value()?;
                Ok(CBORCase::Tagged(Tag::new(tag_value), Box::new(inner)).into())
            }
            7 => self.read_simple(additional),
            _ => unreachable!("major type is a 3-bit field"),
        }
    }

    fn read_simple(&mut self, additional: u8) -> Result<CBOR> {
        match additional {
            20 => Ok(CBORCase::Simple(Simple::False).into()),
            21 => Ok(CBORCase::Simple(Simple::True).into()),
            22 => Ok(CBORCase::Simple(Simple::Null).into()),
            25 => {
                let bytes = self.take_bytes(2)?;
                let bits = u16::from_be_bytes(bytes.try_into().unwrap());
                let value = f16_bits_to_f64(bits);
                if value.is_nan() && bits != 0x7e00 {
                    return Err(CBORError::NotCanonical(NonCanonicalKind::NonCanonicalFloat));
                }
                if !value.is_finite() && !value.is_nan() {
                    return Err(CBORError::NotCanonical(NonCanonicalKind::NonFiniteFloat));
                }
                Ok(CBORCase::Simple(Simple::Float(value)).into())
            }
            26 => {
                let bytes = self.take_bytes(4)?;
                let bits = u32::from_be_bytes(bytes.try_into().unwrap());
                let value = f32::from_bits(bits);
                if crate::float::f64_to_f16_bits((value as f64)).is_some() {
                    return Err(CBORError::NotCanonical(NonCanonicalKind::NonShortestLength));
                }
                if !value.is_finite() {
                    return Err(CBORError::NotCanonical(NonCanonicalKind::NonFiniteFloat));
                }
                Ok(CBORCase::Simple(Simple::Float(value as f64)).into())
            }
            27 => {
                let bytes = self.take_bytes(8)?;
                let bits = u64::from_be_bytes(bytes.try_into().unwrap());
                let value = f64::from_bits(bits);
                if crate::float::f64_fits_f32_exactly(value) {
                    return Err(CBORError::NotCanonical(NonCanonicalKind::NonShortestLength));
                }
                if !value.is_finite() {
                    return Err(CBORError::NotCanonical(NonCanonicalKind::NonFiniteFloat));
                }
                Ok(CBORCase::Simple(Simple::Float(value)).into())
            }
            _ => Err(CBORError::NotCanonical(NonCanonicalKind::ReservedAdditionalInfo)),
        }
    }
}

/// Decodes canonical dCBOR bytes into a value.
///
/// Succeeds only on canonical input. Trailing bytes after a complete value
/// are a `TrailingBytes` error (spec §4.1: "The codec is strict: trailing
/// bytes, longer-than-needed length encodings, or unsorted map keys are
/// errors").
pub fn decode(data: &[u8]) -> Result<CBOR> {
    let mut reader = Reader::new(data);
    let value = reader.read_value()?;
    if reader.pos != data.len() {
        return Err(CBORError::NotCanonical(NonCanonicalKind::TrailingBytes));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;

    #[test]
    fn decodes_what_was_encoded() {
        let value: CBOR = 42u64.into();
        let bytes = encode(&value).unwrap();
        assert_eq!(decode(&bytes).unwrap(), value);
    }

    #[test]
    fn decodes_what_was_encoded_for_negative_integers() {
        for n in [-1i64, -2, -23, -24, -25, -256, -257, -65536, -65537, i64::MIN] {
            let value: CBOR = n.into();
            let bytes = encode(&value).unwrap();
            assert_eq!(decode(&bytes).unwrap(), value, "round-trip failed for {n}");
        }
    }

    #[test]
    fn decodes_negative_one() {
        // Major type 1, additional info 0: the value `-1 - 0 = -1`.
        let value = decode(&[0x20]).unwrap();
        assert_eq!(value.as_i64(), Some(-1));
    }

    #[test]
    fn decodes_minus_two() {
        // Major type 1, additional info 1: the value `-1 - 1 = -2`.
        let value = decode(&[0x21]).unwrap();
        assert_eq!(value.as_i64(), Some(-2));
    }

    #[test]
    fn rejects_non_shortest_length() {
        // `24 01` encodes 1 using the 1-byte-length form, but 1 fits inline.
        assert!(decode(&[0x18, 0x01]).is_err());
    }

    #[test]
    fn rejects_trailing_bytes() {
        assert!(decode(&[0x01, 0x02]).is_err());
    }

    #[test]
    fn rejects_unsorted_map_keys() {
        // {3: 4, 1: 2} — keys out of canonical order.
        assert!(decode(&hex::decode("a203040102").unwrap()).is_err());
    }

    #[test]
    fn rejects_duplicate_map_keys() {
        // {1: 2, 1: 3}
        assert!(decode(&hex::decode("a201020103").unwrap()).is_err());
    }

    #[test]
    fn accepts_sorted_map() {
        let value = decode(&hex::decode("a201020304").unwrap()).unwrap();
        assert_eq!(value.as_map().unwrap().len(), 2);
    }
}
