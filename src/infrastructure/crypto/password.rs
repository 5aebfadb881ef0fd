//! Password hashing utilities

use bcrypt::{hash, verify, BcryptError};

/// Hash a password using bcrypt with the given work factor.
///
/// The cost comes from configuration so deployments can tune it. Fails
/// only on internal errors; password content is validated upstream.
pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    hash(password, cost)
}

/// Verify a password against a hash. A mismatch is `Ok(false)`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, BcryptError> {
    verify(password, hash)
}
