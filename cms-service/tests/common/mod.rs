use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::JwtHandler;
use chrono::Utc;
use cms_service::config::RateLimitConfig;
use cms_service::domain::user::errors::AuthError;
use cms_service::domain::user::models::EmailAddress;
use cms_service::domain::user::models::NewUser;
use cms_service::domain::user::models::Role;
use cms_service::domain::user::models::User;
use cms_service::domain::user::models::UserId;
use cms_service::domain::user::models::UserProfile;
use cms_service::domain::user::ports::UserRepository;
use cms_service::domain::user::service::AuthService;
use cms_service::inbound::http::rate_limit::RateLimiter;
use cms_service::inbound::http::router::create_router;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// In-memory stand-in for the Postgres repository, so the suite runs
/// without a database.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Flip a stored account to inactive.
    pub fn deactivate(&self, id: &UserId) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.get_mut(id) {
            user.is_active = false;
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| &u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.get(id).map(User::profile))
    }

    async fn find_active_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.get(id).filter(|u| u.is_active).map(User::profile))
    }

    async fn create(&self, user: NewUser) -> Result<UserProfile, AuthError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailAlreadyExists);
        }

        let now = Utc::now();
        let record = User {
            id: user.id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let profile = record.profile();
        users.insert(record.id, record);

        Ok(profile)
    }

    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), AuthError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(())
            }
            None => Err(AuthError::NotFound("Usuário".to_string())),
        }
    }

    async fn list_all(&self) -> Result<Vec<UserProfile>, AuthError> {
        let users = self.users.lock().unwrap();
        let mut profiles: Vec<UserProfile> = users.values().map(User::profile).collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(profiles)
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub users: Arc<InMemoryUserRepository>,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Generous limits: the rate limiter has its own test.
        Self::spawn_with_rate_limit(RateLimitConfig {
            auth_max_attempts: 1000,
            auth_window_secs: 900,
        })
        .await
    }

    pub async fn spawn_with_rate_limit(rate_limit: RateLimitConfig) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let users = InMemoryUserRepository::new();
        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            TEST_JWT_SECRET,
            24,
            Role::User,
        ));
        let rate_limiter = RateLimiter::new(rate_limit);

        let router = create_router(auth_service, rate_limiter);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
            )
            .await
            .expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            users,
            jwt_handler: JwtHandler::new(TEST_JWT_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register an account through the API and return (user id, token).
    pub async fn register_user(&self, name: &str, email: &str, password: &str, role: &str) -> (UserId, String) {
        let response = self
            .post("/api/auth/register")
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
                "role": role,
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        let id = UserId::from_string(body["data"]["user"]["id"].as_str().unwrap()).unwrap();
        let token = body["data"]["token"].as_str().unwrap().to_string();

        (id, token)
    }
}
