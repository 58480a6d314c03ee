use super::errors::PasswordError;

/// Work factor for bcrypt. 2^12 rounds, roughly 250ms per hash on
/// commodity hardware.
const COST: u32 = 12;

/// Password hashing implementation.
///
/// Wraps bcrypt with a fixed work factor and a per-password random salt.
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a new password hasher with the standard work factor.
    pub fn new() -> Self {
        Self { cost: COST }
    }

    /// Hash a plaintext password securely.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Modular crypt format hash (embeds cost and salt)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Comparison is constant-time; a wrong password yields `Ok(false)`,
    /// never an error. Errors are reserved for malformed hash data, which
    /// indicates a storage integrity problem rather than a user mistake.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `InvalidHash` - Hash format is invalid
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(password, hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
