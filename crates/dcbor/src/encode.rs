//! Canonical dCBOR encoding: shortest-length headers, sorted map keys,
//! shortest-exact float widths (spec §3, §4.1, §8).

use crate::error::{CBORError, NonCanonicalKind, Result};
use crate::float::{f64_fits_f32_exactly, f64_to_f16_bits};
use crate::value::{CBOR, CBORCase, Simple};

fn encode_header(major: u8, value: u64, out: &mut Vec<u8>) {
    let major_bits = major << 5;
    if value < 24 {
        out.push(major_bits | value as u8);
    } else if value <= u8::MAX as u64 {
        out.push(major_bits | 24);
        out.push(value as u8);
    } else if value <= u16::MAX as u64 {
        out.push(major_bits | 25);
        out.extend_from_slice(&(value as u16).to_be_bytes());
    } else if value <= u32::MAX as u64 {
        out.push(major_bits | 26);
        out.extend_from_slice(&(value as u32).to_be_bytes());
    } else {
        out.push(major_bits | 27);
        out.extend_from_slice(&value.to_be_bytes());
    }
}

/// Encodes a value's canonical bytes, assuming it is already valid
/// (non-finite floats encode using their raw `f64` width rather than
/// failing — callers that need validation must call [`validate`] first).
/// Used internally by `Map` to compute a key's canonical sort bytes, and by
/// [`encode`] after validation has already run.
pub(crate) fn encode_case(case: &CBORCase) -> Vec<u8> {
    let mut out = Vec::new();
    encode_case_into(case, &mut out);
    out
}

fn encode_case_into(case: &CBORCase, out: &mut Vec<u8>) {
    match case {
        CBORCase::Unsigned(n) => encode_header(0, *n, out),
        CBORCase::Negative(n) => {
            debug_assert!(*n < 0);
            let encoded = (-1 - *n) as u64;
            encode_header(1, encoded, out);
        }
        CBORCase::ByteString(bytes) => {
            encode_header(2, bytes.len() as u64, out);
            out.extend_from_slice(bytes);
        }
        CBORCase::Text(text) => {
            let bytes = text.as_bytes();
            encode_header(3, bytes.len() as u64, out);
            out.extend_from_slice(bytes);
        }
        CBORCase::Array(items) => {
            encode_header(4, items.len() as u64, out);
            for item in items {
                encode_case_into(&item.case, out);
            }
        }
        CBORCase::Map(map) => {
            encode_header(5, map.len() as u64, out);
            for key_bytes in map.sorted_key_bytes() {
                out.extend_from_slice(key_bytes);
            }
            // Re-walk to emit values in the same order as keys.
            for (_, value) in map.iter() {
                encode_case_into(&value.case, out);
            }
        }
        CBORCase::Tagged(tag, inner) => {
            encode_header(6, tag.value(), out);
            encode_case_into(&inner.case, out);
        }
        CBORCase::Simple(simple) => encode_simple(simple, out),
    }
}

fn encode_simple(simple: &Simple, out: &mut Vec<u8>) {
    match simple {
        Simple::False => out.push(0xf4),
        Simple::True => out.push(0xf5),
        Simple::Null => out.push(0xf6),
        Simple::Float(f) => encode_float(*f, out),
    }
}

fn encode_float(value: f64, out: &mut Vec<u8>) {
    if let Some(bits) = f64_to_f16_bits(value) {
        out.push(0xf9);
        out.extend_from_slice(&bits.to_be_bytes());
    } else if f64_fits_f32_exactly(value) {
        out.push(0xfa);
        out.extend_from_slice(&(value as f32).to_bits().to_be_bytes());
    } else {
        out.push(0xfb);
        out.extend_from_slice(&value.to_bits().to_be_bytes());
    }
}

/// Recursively validates that every float in `value` is finite or the
/// canonical NaN, per spec §3/§8 ("Floats written as the shortest exact
/// decimal that round-trips; finite or NaN only").
pub fn validate(value: &CBOR) -> Result<()> {
    match &value.case {
        CBORCase::Simple(Simple::Float(f)) => {
            if f.is_nan() {
                Ok(())
            } else if f.is_finite() {
                Ok(())
            } else {
                Err(CBORError::NonCanonicalValue(
                    "non-finite float is not representable in dCBOR".into(),
                ))
            }
        }
        CBORCase::Array(items) => items.iter().try_for_each(validate),
        CBORCase::Map(map) => {
            for (k, v) in map.iter() {
                validate(k)?;
                validate(v)?;
            }
            Ok(())
        }
        CBORCase::Tagged(_, inner) => validate(inner),
        _ => Ok(()),
    }
}

/// Encodes `value` to its canonical dCBOR byte representation.
///
/// Fails with [`CBORError::NonCanonicalValue`] if `value` contains a
/// non-finite, non-NaN float (spec: "Fails with `NonCanonical` on any input
/// that cannot be represented canonically").
pub fn encode(value: &CBOR) -> Result<Vec<u8>> {
    validate(value)?;
    Ok(encode_case(&value.case))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::f16_bits_to_f64;
    use crate::value::Map;

    fn f16_round_trips(value: f64) -> bool {
        match f64_to_f16_bits(value) {
            Some(bits) => {
                let back = f16_bits_to_f64(bits);
                back == value || (value.is_nan() && back.is_nan())
            }
            None => true,
        }
    }

    #[test]
    fn encodes_small_unsigned_inline() {
        assert_eq!(encode(&42u64.into()).unwrap(), vec![0x18, 0x2a]);
        assert_eq!(encode(&1u64.into()).unwrap(), vec![0x01]);
    }

    #[test]
    fn encodes_map_with_sorted_keys() {
        let mut map = Map::new();
        map.insert(3u64, 4u64);
        map.insert(1u64, 2u64);
        let cbor = CBOR::map(map);
        assert_eq!(hex::encode(encode(&cbor).unwrap()), "a201020304");
    }

    #[test]
    fn rejects_non_finite_float() {
        let cbor: CBOR = f64::INFINITY.into();
        assert!(encode(&cbor).is_err());
    }

    #[test]
    fn float_round_trip_check_helper_works() {
        assert!(f16_round_trips(1.5));
        assert!(f16_round_trips(f64::NAN));
    }
}
