use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} is too long (maximum {max} characters)")]
    TooLong { field: String, max: usize },

    #[error("{field} must be a valid email address")]
    InvalidFormat { field: String },
}

/// Error for password policy violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Senha deve ter pelo menos {min} caracteres")]
    TooShort { min: usize },
}

/// Error for role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Invalid role: {0}")]
    Unknown(String),
}

/// Top-level error for authentication and user operations.
///
/// Classified once at the point of origin; the HTTP layer translates
/// each variant to a status code in a single place.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Input shape errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("{0}")]
    InvalidEmail(#[from] EmailError),

    #[error("{0}")]
    WeakPassword(#[from] PasswordPolicyError),

    #[error("{0}")]
    InvalidRole(#[from] RoleError),

    #[error("{0}")]
    Validation(String),

    // Credential and token errors. Unknown email and wrong password
    // share one variant so the two cases are indistinguishable to the
    // caller.
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Usuário inativo")]
    InactiveUser,

    #[error("Token inválido")]
    TokenInvalid,

    #[error("Token expirado")]
    TokenExpired,

    #[error("Usuário não encontrado ou inativo")]
    SubjectNotFound,

    // Domain-level errors
    #[error("{0} não encontrado")]
    NotFound(String),

    #[error("Usuário já existe com este email")]
    EmailAlreadyExists,

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Unknown(err.to_string())
    }
}
