//! Password hashing (Argon2id, PHC string format)

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordVerifier};

/// One-way password hashing
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, argon2::password_hash::Error>;

    /// `false` for a wrong password and for an unparsable stored hash
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id with default parameters
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::PasswordHasher as _;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("s3cret!").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("s3cret!", &hash));
        assert!(!hasher.verify("s3cret", &hash));
    }

    #[test]
    fn test_salted() {
        let hasher = Argon2Hasher;
        assert_ne!(hasher.hash("same").unwrap(), hasher.hash("same").unwrap());
    }

    #[test]
    fn test_verify_garbage_hash() {
        assert!(!Argon2Hasher.verify("anything", "not-a-phc-string"));
    }
}
