use thiserror::Error;

/// Errors from hashing and verifying passwords.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// The stored hash is not in modular crypt format. A mismatch between
    /// password and hash is not an error; `verify` reports it as `Ok(false)`.
    #[error("Invalid password hash: {0}")]
    InvalidHash(String),
}
