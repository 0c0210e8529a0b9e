use bcrypt::DEFAULT_COST;
use tracing::{error, warn};

use crate::error::ApiError;

/// Cheapest cost bcrypt accepts; keeps hashing fast in tests.
#[cfg(test)]
pub(crate) const TEST_COST: u32 = 4;

/// Salted one-way password hashing (bcrypt, `$2b$` variant).
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, plain: &str) -> Result<String, ApiError> {
        bcrypt::hash(plain, self.cost).map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::Internal("password hashing failed".into())
        })
    }

    /// A malformed stored hash counts as a mismatch.
    pub fn verify(&self, plain: &str, hashed: &str) -> bool {
        bcrypt::verify(plain, hashed).unwrap_or_else(|e| {
            warn!("Unverifiable password hash: {}", e);
            false
        })
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_bcrypt() {
        let hasher = PasswordHasher::new(TEST_COST);
        let first = hasher.hash("testuser").unwrap();
        let second = hasher.hash("testuser").unwrap();

        assert!(first.starts_with("$2b$"));
        assert_ne!(first, "testuser");
        assert_ne!(first, second);
        assert!(hasher.verify("testuser", &first));
        assert!(!hasher.verify("wrong", &first));
    }

    #[test]
    fn garbage_hash_does_not_verify() {
        let hasher = PasswordHasher::new(TEST_COST);
        assert!(!hasher.verify("pass", "HASHED_PASSWORD"));
    }
}
