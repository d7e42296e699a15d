//! Shamir secret sharing over GF(256), with a built-in digest share so
//! `recover` can detect a wrong or tampered share combination instead of
//! silently returning garbage (spec §4.4).
//!
//! The scheme fixes two of its Lagrange interpolation basis points at
//! reserved x-coordinates: `SECRET_INDEX` (255), where the polynomial's
//! value is the secret itself, and `DIGEST_INDEX` (254), where it is an
//! HMAC-derived checksum of the secret. The remaining `threshold - 2` basis
//! points are random, and every output share beyond those is obtained by
//! evaluating the resulting polynomial at its own index.

mod error;
mod gf256;

pub use error::{Result, ShamirError};

pub const MIN_SECRET_LEN: usize = 16;
pub const MAX_SECRET_LEN: usize = 32;
pub const MAX_SHARE_COUNT: usize = 16;

const DIGEST_INDEX: u8 = 254;
const SECRET_INDEX: u8 = 255;
const DIGEST_LEN: usize = 4;

fn validate_secret(secret: &[u8]) -> Result<()> {
    if secret.len() % 2 != 0 || secret.len() < MIN_SECRET_LEN || secret.len() > MAX_SECRET_LEN {
        return Err(ShamirError::InvalidSecretLength {
            min: MIN_SECRET_LEN,
            max: MAX_SECRET_LEN,
            actual: secret.len(),
        });
    }
    Ok(())
}

fn digest_of(secret: &[u8], random_padding: &[u8]) -> [u8; DIGEST_LEN] {
    let mac = bc_crypto::hmac_sha256(random_padding, secret, DIGEST_LEN);
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&mac);
    out
}

/// Splits `secret` into `count` shares, any `threshold` of which recover it.
/// `threshold == 1` returns `count` identical copies (spec: "Shamir with
/// k=1 returns n identical copies of the secret").
pub fn split(
    rng: &mut impl bc_rand::RandomNumberGenerator,
    threshold: usize,
    count: usize,
    secret: &[u8],
) -> Result<Vec<Vec<u8>>> {
    validate_secret(secret)?;
    if count == 0 || count > MAX_SHARE_COUNT {
        return Err(ShamirError::InvalidShareCount { max: MAX_SHARE_COUNT, actual: count });
    }
    if threshold == 0 || threshold > count {
        return Err(ShamirError::InvalidThreshold { threshold, count });
    }
    if threshold == 1 {
        return Ok((0..count).map(|_| secret.to_vec()).collect());
    }

    let random_share_count = threshold - 2;
    let random_shares: Vec<Vec<u8>> =
        (0..random_share_count).map(|_| rng.random_data(secret.len())).collect();

    let random_padding = rng.random_data(secret.len() - DIGEST_LEN);
    let digest = digest_of(secret, &random_padding);
    let mut digest_share = Vec::with_capacity(secret.len());
    digest_share.extend_from_slice(&digest);
    digest_share.extend_from_slice(&random_padding);

    let mut basis_x: Vec<u8> = (0..random_share_count as u8).collect();
    basis_x.push(DIGEST_INDEX);
    basis_x.push(SECRET_INDEX);

    let mut basis_y: Vec<&[u8]> = random_shares.iter().map(|s| s.as_slice()).collect();
    basis_y.push(&digest_share);
    basis_y.push(secret);

    let mut shares = Vec::with_capacity(count);
    for index in 0..count {
        if index < random_share_count {
            shares.push(random_shares[index].clone());
            continue;
        }
        let x = index as u8;
        let mut share = vec![0u8; secret.len()];
        for byte_pos in 0..secret.len() {
            let ys: Vec<u8> = basis_y.iter().map(|s| s[byte_pos]).collect();
            share[byte_pos] = gf256::interpolate(&basis_x, &ys, x);
        }
        shares.push(share);
    }
    Ok(shares)
}

/// Recovers the secret from `indexes`/`shares` pairs (order-independent,
/// any quorum suffices) and verifies the embedded digest.
pub fn recover(indexes: &[u8], shares: &[Vec<u8>]) -> Result<Vec<u8>> {
    if shares.is_empty() || indexes.len() != shares.len() {
        return Err(ShamirError::NoShares);
    }
    let share_len = shares[0].len();
    if shares.iter().any(|s| s.len() != share_len) {
        return Err(ShamirError::ShareLengthMismatch);
    }
    let mut seen = std::collections::HashSet::new();
    for &index in indexes {
        if !seen.insert(index) {
            return Err(ShamirError::DuplicateIndex(index));
        }
    }

    if indexes.len() == 1 {
        // A single share only makes sense for a threshold-1 split, where
        // every share already equals the secret verbatim.
        return Ok(shares[0].clone());
    }

    let mut secret = vec![0u8; share_len];
    let mut digest_share = vec![0u8; share_len];
    for byte_pos in 0..share_len {
        let ys: Vec<u8> = shares.iter().map(|s| s[byte_pos]).collect();
        secret[byte_pos] = gf256::interpolate(indexes, &ys, SECRET_INDEX);
        digest_share[byte_pos] = gf256::interpolate(indexes, &ys, DIGEST_INDEX);
    }

    let (claimed_digest, random_padding) = digest_share.split_at(DIGEST_LEN);
    if digest_of(&secret, random_padding).as_slice() != claimed_digest {
        return Err(ShamirError::ChecksumFailure);
    }
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_one_returns_copies() {
        let mut rng = bc_rand::make_fake_random_number_generator(1);
        let secret = b"0123456789abcdef".to_vec();
        let shares = split(&mut rng, 1, 4, &secret).unwrap();
        assert_eq!(shares.len(), 4);
        assert!(shares.iter().all(|s| s == &secret));
    }

    #[test]
    fn split_and_recover_quorum() {
        let mut rng = bc_rand::make_fake_random_number_generator(2);
        let secret = b"my secret belongs to me.".to_vec();
        let shares = split(&mut rng, 2, 3, &secret).unwrap();

        let indexes = [0u8, 2];
        let chosen = vec![shares[0].clone(), shares[2].clone()];
        assert_eq!(recover(&indexes, &chosen).unwrap(), secret);
    }

    #[test]
    fn tampered_share_fails_checksum() {
        let mut rng = bc_rand::make_fake_random_number_generator(3);
        let secret = b"my secret belongs to me.".to_vec();
        let mut shares = split(&mut rng, 2, 3, &secret).unwrap();
        shares[0][0] ^= 0xFF;

        let indexes = [0u8, 2];
        let chosen = vec![shares[0].clone(), shares[2].clone()];
        assert_eq!(recover(&indexes, &chosen), Err(ShamirError::ChecksumFailure));
    }

    #[test]
    fn rejects_odd_secret_length() {
        let mut rng = bc_rand::make_fake_random_number_generator(4);
        assert!(split(&mut rng, 2, 3, b"odd").is_err());
    }
}
