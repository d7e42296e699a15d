//! `'salt'` assertions (spec §4.2): padding that changes an envelope's
//! digest without changing its meaning, so two envelopes carrying identical
//! data don't leak that fact through matching digests.

use bc_components::Salt;
use bc_rand::RandomNumberGenerator;

use crate::Envelope;

impl Envelope {
    /// Adds a salt sized proportionally to this envelope's own encoded
    /// length (10-20%, minimum 8 bytes — see [`Salt::new_for_length`]).
    pub fn add_salt(&self, rng: &mut impl RandomNumberGenerator) -> Self {
        let len = self.to_cbor_data().len();
        let salt = Salt::new_for_length(rng, len);
        self.add_salt_instance(salt)
    }

    pub fn add_salt_with_len(&self, rng: &mut impl RandomNumberGenerator, size: usize) -> crate::error::Result<Self> {
        let salt = Salt::new_of_size(rng, size)?;
        Ok(self.add_salt_instance(salt))
    }

    pub fn add_salt_instance(&self, salt: Salt) -> Self {
        self.add_assertion(crate::known_values::SALT, salt)
    }
}

#[cfg(test)]
mod tests {
    use bc_components::DigestProvider;

    use super::*;

    #[test]
    fn add_salt_changes_digest_but_not_subject() {
        let mut rng = bc_rand::make_fake_random_number_generator(30);
        let envelope = Envelope::new("Alice");
        let salted = envelope.add_salt(&mut rng);
        assert_ne!(salted.digest(), envelope.digest());
        assert_eq!(salted.subject().digest(), envelope.digest());
    }
}
