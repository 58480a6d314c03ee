use std::str::FromStr;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::user::errors::AuthError;
use crate::user::models::EmailAddress;
use crate::user::models::NewUser;
use crate::user::models::Role;
use crate::user::models::User;
use crate::user::models::UserId;
use crate::user::models::UserProfile;

const PROFILE_COLUMNS: &str = "id, name, email, role, is_active, created_at, updated_at";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Full row, hash included. Only the email lookup reads this shape.
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Hash-free row used by every other lookup.
#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    name: String,
    email: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AuthError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            name: row.name,
            email: EmailAddress::new(&row.email)?,
            password_hash: row.password_hash,
            role: parse_role(&row.role)?,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = AuthError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            id: UserId(row.id),
            name: row.name,
            email: EmailAddress::new(&row.email)?,
            role: parse_role(&row.role)?,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn parse_role(raw: &str) -> Result<Role, AuthError> {
    Role::from_str(raw).map_err(|e| AuthError::DatabaseError(e.to_string()))
}

#[async_trait]
impl crate::user::ports::UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, role, is_active, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, AuthError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn find_active_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, AuthError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1 AND is_active = TRUE"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<UserProfile, AuthError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user.id.0)
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Two concurrent registrations race past the pre-check; the
            // unique constraint settles it.
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AuthError::EmailAlreadyExists;
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        UserProfile::try_from(row)
    }

    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.0)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound("Usuário".to_string()));
        }

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<UserProfile>, AuthError> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(UserProfile::try_from).collect()
    }
}
