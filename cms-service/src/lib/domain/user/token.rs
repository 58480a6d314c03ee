use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::user::models::Role;
use crate::user::models::UserId;

/// Claims carried by an access token.
///
/// The payload shape is fixed: subject id, email, role, issued-at and
/// expiry. Tokens are never persisted; expiry is the only lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Subject user id (UUID string)
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AccessClaims {
    /// Create claims for a user with an expiry window from now.
    pub fn new(user_id: UserId, email: &str, role: Role, ttl_hours: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(ttl_hours);

        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Whether the token is expired at `current_timestamp`.
    ///
    /// The expiry instant itself counts as expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
