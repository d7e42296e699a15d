//! Secret hygiene: real zeroization and constant-time comparison.
//!
//! The source this spec was distilled from notes that JavaScript cannot
//! guarantee secret erasure. This is a systems language: `zeroize` performs
//! a volatile write the optimizer cannot elide, so "zeroize on drop" here is
//! an actual guarantee, not a best-effort gesture.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Overwrites `data` with zero bytes using a volatile write.
pub fn memzero(data: &mut [u8]) { data.zeroize(); }

/// Constant-time equality, for comparing secrets (keys, MACs, shares)
/// without leaking timing information about where two buffers first
/// differ.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroes_a_buffer() {
        let mut data = vec![1u8, 2, 3, 4];
        memzero(&mut data);
        assert_eq!(data, vec![0, 0, 0, 0]);
    }

    #[test]
    fn constant_time_eq_detects_mismatch() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
