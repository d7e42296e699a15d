//! Two-level Shamir secret sharing (SSKR): `groupThreshold` of `groupCount`
//! groups must contribute, each by producing `memberThreshold` of its
//! `memberCount` member shares (spec §4.4/§6).
//!
//! The secret is first split at the group level with [`shamir::split`],
//! producing one "group secret" per group; each group secret is then split
//! again among that group's members. Recovery runs the same two levels in
//! reverse: within each contributing group, `memberThreshold` member shares
//! reconstruct the group secret, and once `groupThreshold` group secrets are
//! back, the original secret falls out of the group-level reconstruction.
//! Collection order never matters.

mod error;
mod share;

pub use error::{Result, SskrError};
pub use share::{SskrShare, SskrShareHeader};

const MAX_GROUP_COUNT: usize = 16;
const MAX_MEMBER_COUNT: usize = 16;

/// One group's shape: how many of its `member_count` shares are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SskrGroupSpec {
    pub member_threshold: usize,
    pub member_count: usize,
}

impl SskrGroupSpec {
    pub fn new(member_threshold: usize, member_count: usize) -> Self {
        Self { member_threshold, member_count }
    }
}

/// The overall sharing shape: `group_threshold` of `groups.len()` groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SskrSpec {
    pub group_threshold: usize,
    pub groups: Vec<SskrGroupSpec>,
}

impl SskrSpec {
    pub fn new(group_threshold: usize, groups: Vec<SskrGroupSpec>) -> Self {
        Self { group_threshold, groups }
    }

    fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            return Err(SskrError::NoGroups);
        }
        if self.groups.len() > MAX_GROUP_COUNT
            || self.group_threshold == 0
            || self.group_threshold > self.groups.len()
        {
            return Err(SskrError::InvalidGroupThreshold {
                threshold: self.group_threshold,
                count: self.groups.len(),
            });
        }
        for (index, group) in self.groups.iter().enumerate() {
            if group.member_count == 0
                || group.member_count > MAX_MEMBER_COUNT
                || group.member_threshold == 0
                || group.member_threshold > group.member_count
            {
                return Err(SskrError::InvalidMemberThreshold {
                    group: index,
                    threshold: group.member_threshold,
                    count: group.member_count,
                });
            }
        }
        Ok(())
    }
}

/// Splits `secret` per `spec`, returning one `Vec<SskrShare>` per group.
pub fn split(
    rng: &mut impl bc_rand::RandomNumberGenerator,
    spec: &SskrSpec,
    secret: &[u8],
) -> Result<Vec<Vec<SskrShare>>> {
    spec.validate()?;
    let identifier = u16::from_be_bytes(rng.random_data(2).try_into().unwrap());

    let group_secrets = shamir::split(rng, spec.group_threshold, spec.groups.len(), secret)?;

    let mut out = Vec::with_capacity(spec.groups.len());
    for (group_index, group) in spec.groups.iter().enumerate() {
        let group_secret = &group_secrets[group_index];
        let member_shares =
            shamir::split(rng, group.member_threshold, group.member_count, group_secret)?;
        let shares = member_shares
            .into_iter()
            .enumerate()
            .map(|(member_index, value)| SskrShare {
                header: SskrShareHeader {
                    identifier,
                    group_threshold: spec.group_threshold as u8,
                    group_index: group_index as u8,
                    group_count: spec.groups.len() as u8,
                    member_threshold: group.member_threshold as u8,
                    member_index: member_index as u8,
                },
                value,
            })
            .collect();
        out.push(shares);
    }
    Ok(out)
}

/// Recovers the secret from any sufficient, unordered combination of shares
/// produced by a single [`split`] call.
pub fn combine(shares: &[SskrShare]) -> Result<Vec<u8>> {
    if shares.is_empty() {
        return Err(SskrError::NotEnoughGroups { needed: 1, have: 0 });
    }
    let identifier = shares[0].header.identifier;
    if shares.iter().any(|s| s.header.identifier != identifier) {
        return Err(SskrError::MixedIdentifiers);
    }
    let group_threshold = shares[0].header.group_threshold as usize;

    let mut by_group: std::collections::BTreeMap<u8, Vec<&SskrShare>> =
        std::collections::BTreeMap::new();
    for share in shares {
        by_group.entry(share.header.group_index).or_default().push(share);
    }

    let mut group_indexes = Vec::new();
    let mut group_secrets = Vec::new();
    for (&group_index, group_shares) in by_group.iter() {
        let member_threshold = group_shares[0].header.member_threshold as usize;
        if group_shares.len() < member_threshold {
            continue;
        }
        let indexes: Vec<u8> = group_shares.iter().map(|s| s.header.member_index).collect();
        let values: Vec<Vec<u8>> = group_shares.iter().map(|s| s.value.clone()).collect();
        let group_secret = shamir::recover(&indexes, &values)?;
        group_indexes.push(group_index);
        group_secrets.push(group_secret);
        if group_secrets.len() >= group_threshold {
            break;
        }
    }

    if group_secrets.len() < group_threshold {
        return Err(SskrError::NotEnoughGroups {
            needed: group_threshold,
            have: group_secrets.len(),
        });
    }

    Ok(shamir::recover(&group_indexes, &group_secrets)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_group_recovers_with_quorum_of_members() {
        let mut rng = bc_rand::make_fake_random_number_generator(10);
        let secret = b"0123456789abcdef".to_vec();
        let spec = SskrSpec::new(1, vec![SskrGroupSpec::new(2, 3)]);
        let groups = split(&mut rng, &spec, &secret).unwrap();
        assert_eq!(groups.len(), 1);
        let members = &groups[0];

        let quorum = vec![members[0].clone(), members[2].clone()];
        assert_eq!(combine(&quorum).unwrap(), secret);
    }

    #[test]
    fn single_group_rejects_insufficient_members() {
        let mut rng = bc_rand::make_fake_random_number_generator(11);
        let secret = b"0123456789abcdef".to_vec();
        let spec = SskrSpec::new(1, vec![SskrGroupSpec::new(2, 3)]);
        let groups = split(&mut rng, &spec, &secret).unwrap();

        let single = vec![groups[0][0].clone()];
        assert!(combine(&single).is_err());
    }

    #[test]
    fn recovery_is_order_independent() {
        let mut rng = bc_rand::make_fake_random_number_generator(12);
        let secret = b"0123456789abcdef".to_vec();
        let spec = SskrSpec::new(2, vec![SskrGroupSpec::new(1, 1), SskrGroupSpec::new(2, 3)]);
        let groups = split(&mut rng, &spec, &secret).unwrap();

        let mut shares = vec![groups[0][0].clone(), groups[1][1].clone(), groups[1][2].clone()];
        assert_eq!(combine(&shares).unwrap(), secret);

        shares.reverse();
        assert_eq!(combine(&shares).unwrap(), secret);
    }

    #[test]
    fn share_bytes_round_trip() {
        let mut rng = bc_rand::make_fake_random_number_generator(13);
        let secret = b"0123456789abcdef".to_vec();
        let spec = SskrSpec::new(1, vec![SskrGroupSpec::new(2, 3)]);
        let groups = split(&mut rng, &spec, &secret).unwrap();
        let bytes = groups[0][0].to_bytes();
        assert_eq!(SskrShare::from_bytes(&bytes).unwrap(), groups[0][0]);
    }
}
