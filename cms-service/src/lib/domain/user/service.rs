use std::sync::Arc;

use auth::JwtError;
use auth::JwtHandler;
use auth::PasswordHasher;
use chrono::Utc;

use crate::user::errors::AuthError;
use crate::user::models::EmailAddress;
use crate::user::models::NewUser;
use crate::user::models::Password;
use crate::user::models::RegisterCommand;
use crate::user::models::Role;
use crate::user::models::UserId;
use crate::user::models::UserProfile;
use crate::user::ports::UserRepository;
use crate::user::token::AccessClaims;

/// Result of login, registration and token refresh.
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

/// Domain service orchestrating credential verification and the token
/// lifecycle against the user directory.
///
/// Stateless between calls; the signing secret and policy knobs are
/// fixed at construction.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    password_hasher: Arc<PasswordHasher>,
    jwt_handler: JwtHandler,
    token_ttl_hours: i64,
    default_role: Role,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        jwt_secret: &[u8],
        token_ttl_hours: i64,
        default_role: Role,
    ) -> Self {
        Self {
            users,
            password_hasher: Arc::new(PasswordHasher::new()),
            jwt_handler: JwtHandler::new(jwt_secret),
            token_ttl_hours,
            default_role,
        }
    }

    /// Authenticate with email and password.
    ///
    /// Unknown email and wrong password produce the same error so the
    /// response does not reveal whether an account exists.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No such user, or password mismatch
    /// * `InactiveUser` - Account has been deactivated
    pub async fn login(
        &self,
        email: EmailAddress,
        password: String,
    ) -> Result<AuthResponse, AuthError> {
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::InactiveUser);
        }

        let hash = user.password_hash.clone();
        if !self.verify_password(password, hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let profile = user.profile();
        let token = self.issue_token(&profile)?;

        Ok(AuthResponse {
            user: profile,
            token,
        })
    }

    /// Register a new account and log it in.
    ///
    /// The role falls back to the configured default when the command
    /// carries none. A racing registration with the same email loses at
    /// the store's unique constraint and surfaces the same conflict as
    /// the pre-check.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    pub async fn register(&self, command: RegisterCommand) -> Result<AuthResponse, AuthError> {
        if self.users.find_by_email(&command.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = self.hash_password(command.password).await?;

        let user = self
            .users
            .create(NewUser {
                id: UserId::new(),
                name: command.name,
                email: command.email,
                password_hash,
                role: command.role.unwrap_or(self.default_role),
            })
            .await?;

        let token = self.issue_token(&user)?;

        Ok(AuthResponse { user, token })
    }

    /// Resolve a bearer token to a live identity.
    ///
    /// Signature and expiry are checked first. A syntactically valid
    /// token is still rejected when the subject no longer exists or was
    /// deactivated after issuance, so the directory lookup is mandatory.
    ///
    /// # Errors
    /// * `TokenInvalid` / `TokenExpired` - Token failed verification
    /// * `SubjectNotFound` - Subject absent or inactive
    pub async fn verify_token(&self, token: &str) -> Result<UserProfile, AuthError> {
        let claims: AccessClaims = self.jwt_handler.decode(token).map_err(Self::map_jwt_error)?;

        // The JWT layer only rejects exp strictly in the past; the
        // expiry instant itself also counts as expired.
        if claims.is_expired(Utc::now().timestamp()) {
            return Err(AuthError::TokenExpired);
        }

        self.resolve_subject(&claims).await
    }

    /// Issue a fresh token for the subject of an existing one.
    ///
    /// Expiry is deliberately ignored here: a token past its window but
    /// with a valid signature may be renewed, provided the subject is
    /// still present and active.
    ///
    /// # Errors
    /// * `TokenInvalid` - Signature failed verification
    /// * `SubjectNotFound` - Subject absent or inactive
    pub async fn refresh_token(&self, token: &str) -> Result<AuthResponse, AuthError> {
        let claims: AccessClaims = self
            .jwt_handler
            .decode_expired(token)
            .map_err(|_| AuthError::TokenInvalid)?;

        let user = self.resolve_subject(&claims).await?;
        let new_token = self.issue_token(&user)?;

        Ok(AuthResponse {
            user,
            token: new_token,
        })
    }

    /// Replace a user's password after verifying the current one.
    ///
    /// The id lookup excludes the hash, so the hash-bearing record is
    /// re-fetched by email. Existing tokens stay valid until natural
    /// expiry.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Validation` - Current password does not match
    pub async fn change_password(
        &self,
        user_id: UserId,
        old_password: String,
        new_password: Password,
    ) -> Result<String, AuthError> {
        let profile = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AuthError::NotFound("Usuário".to_string()))?;

        let user = self
            .users
            .find_by_email(&profile.email)
            .await?
            .ok_or_else(|| AuthError::NotFound("Usuário".to_string()))?;

        let hash = user.password_hash.clone();
        if !self.verify_password(old_password, hash).await? {
            return Err(AuthError::Validation("Senha atual incorreta".to_string()));
        }

        let new_hash = self.hash_password(new_password).await?;
        self.users.update_password(&user_id, &new_hash).await?;

        Ok("Senha alterada com sucesso".to_string())
    }

    /// List all user profiles (administrative surface).
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, AuthError> {
        self.users.list_all().await
    }

    fn issue_token(&self, user: &UserProfile) -> Result<String, AuthError> {
        let claims = AccessClaims::new(user.id, user.email.as_str(), user.role, self.token_ttl_hours);

        self.jwt_handler
            .encode(&claims)
            .map_err(|e| AuthError::Unknown(format!("Token generation failed: {}", e)))
    }

    async fn resolve_subject(&self, claims: &AccessClaims) -> Result<UserProfile, AuthError> {
        let user_id = UserId::from_string(&claims.sub).map_err(|_| AuthError::TokenInvalid)?;

        self.users
            .find_active_by_id(&user_id)
            .await?
            .ok_or(AuthError::SubjectNotFound)
    }

    // bcrypt is CPU-bound; keep it off the async executor threads.
    async fn hash_password(&self, password: Password) -> Result<String, AuthError> {
        let hasher = Arc::clone(&self.password_hasher);
        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|e| AuthError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(|e| AuthError::Unknown(format!("Password hashing failed: {}", e)))
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let hasher = Arc::clone(&self.password_hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Unknown(format!("Verification task failed: {}", e)))?
            // A malformed stored hash is a storage integrity problem,
            // not a user error.
            .map_err(|e| AuthError::DatabaseError(format!("Corrupt password hash: {}", e)))
    }

    fn map_jwt_error(err: JwtError) -> AuthError {
        match err {
            JwtError::TokenExpired => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        }
    }
}
