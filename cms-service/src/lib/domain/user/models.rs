use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::RoleError;
use crate::user::errors::UserIdError;

lazy_static! {
    // Linear-time pattern, ASCII-only local@domain.tld shape.
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex");
}

/// User aggregate entity, hash included.
///
/// Only the lookup-by-email path produces this type; everything else
/// works with [`UserProfile`] so the hash cannot leak into responses.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Project the entity to its hash-free form.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// User projection without the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: EmailAddress,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Access tier. ADMIN holds every EDITOR privilege, EDITOR holds every
/// USER privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Editor,
    Admin,
}

impl Role {
    /// Content-editing privilege: EDITOR or ADMIN.
    pub fn can_edit(&self) -> bool {
        matches!(self, Role::Editor | Role::Admin)
    }

    /// Administrative privilege: ADMIN only.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Editor => "EDITOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "EDITOR" => Ok(Role::Editor),
            "ADMIN" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Email address value type.
///
/// Normalizes (trim + lowercase) before validating, so two spellings of
/// the same address always compare equal and the stored form is canonical.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 254;

    /// Create a new validated, normalized email address.
    ///
    /// # Errors
    /// * `Required` - Empty after trimming
    /// * `TooLong` - Longer than 254 characters
    /// * `InvalidFormat` - Does not match the `local@domain.tld` shape
    pub fn new(email: &str) -> Result<Self, EmailError> {
        Self::with_field_name(email, "email")
    }

    /// Same as [`EmailAddress::new`] with a custom field name in errors.
    pub fn with_field_name(email: &str, field: &str) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(EmailError::Required {
                field: field.to_string(),
            });
        }

        if normalized.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                field: field.to_string(),
                max: Self::MAX_LENGTH,
            });
        }

        if !EMAIL_RE.is_match(&normalized) {
            return Err(EmailError::InvalidFormat {
                field: field.to_string(),
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted for registration or password change.
///
/// Holds the policy check (minimum 8 characters) and redacts itself in
/// debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;

    /// Create a policy-checked password.
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 8 characters
    pub fn new(password: &str) -> Result<Self, PasswordPolicyError> {
        if password.chars().count() < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        Ok(Self(password.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Fields persisted when a user record is created.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub name: String,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
}

/// Command to register a new account with validated fields.
#[derive(Debug)]
pub struct RegisterCommand {
    pub name: String,
    pub email: EmailAddress,
    pub password: Password,
    pub role: Option<Role>,
}
