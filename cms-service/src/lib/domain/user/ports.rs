use async_trait::async_trait;

use crate::user::errors::AuthError;
use crate::user::models::EmailAddress;
use crate::user::models::NewUser;
use crate::user::models::User;
use crate::user::models::UserId;
use crate::user::models::UserProfile;

/// Port for the persistent user directory.
///
/// The lookup-by-email path is the only one that exposes the password
/// hash; every other operation returns the hash-free profile.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Find a user by normalized email, hash included.
    ///
    /// # Errors
    /// * `DatabaseError` - Lookup failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError>;

    /// Find a user profile by id, regardless of active state.
    ///
    /// # Errors
    /// * `DatabaseError` - Lookup failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, AuthError>;

    /// Find a user profile by id, filtered to active accounts.
    ///
    /// Deactivated accounts are indistinguishable from absent ones on
    /// this path.
    ///
    /// # Errors
    /// * `DatabaseError` - Lookup failed
    async fn find_active_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, AuthError>;

    /// Persist a new user record.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Unique constraint on email violated
    /// * `DatabaseError` - Insert failed
    async fn create(&self, user: NewUser) -> Result<UserProfile, AuthError>;

    /// Replace the stored password hash for a user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Update failed
    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), AuthError>;

    /// List all user profiles, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Listing failed
    async fn list_all(&self) -> Result<Vec<UserProfile>, AuthError>;
}
