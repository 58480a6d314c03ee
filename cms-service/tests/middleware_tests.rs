mod common;

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::middleware;
use axum::routing::post;
use axum::Router;
use cms_service::config::RateLimitConfig;
use cms_service::domain::user::models::EmailAddress;
use cms_service::domain::user::models::Password;
use cms_service::domain::user::models::RegisterCommand;
use cms_service::domain::user::models::Role;
use cms_service::domain::user::service::AuthService;
use cms_service::inbound::http::middleware::authenticate;
use cms_service::inbound::http::middleware::require_admin;
use cms_service::inbound::http::middleware::require_editor;
use cms_service::inbound::http::rate_limit::RateLimiter;
use cms_service::inbound::http::router::AppState;
use common::InMemoryUserRepository;
use common::TEST_JWT_SECRET;
use reqwest::StatusCode;

/// Harness around a route protected by [`authenticate`] plus a role
/// gate, counting how often the inner handler actually runs.
struct GatedRoute {
    address: String,
    client: reqwest::Client,
    auth_service: Arc<AuthService>,
    hits: Arc<AtomicUsize>,
}

impl GatedRoute {
    async fn spawn(editor_gate: bool) -> Self {
        let users = InMemoryUserRepository::new();
        let auth_service = Arc::new(AuthService::new(
            users,
            TEST_JWT_SECRET,
            24,
            Role::User,
        ));
        let state = AppState {
            auth_service: auth_service.clone(),
            rate_limiter: RateLimiter::new(RateLimitConfig {
                auth_max_attempts: 1000,
                auth_window_secs: 900,
            }),
        };

        let hits = Arc::new(AtomicUsize::new(0));
        let handler_hits = hits.clone();
        let handler = move || {
            let handler_hits = handler_hits.clone();
            async move {
                handler_hits.fetch_add(1, Ordering::SeqCst);
                "ok"
            }
        };

        // Same wiring order as the main router: the gate sits inside
        // authenticate.
        let router = Router::new().route("/gated", post(handler));
        let router = if editor_gate {
            router.route_layer(middleware::from_fn(require_editor))
        } else {
            router.route_layer(middleware::from_fn(require_admin))
        };
        let router = router
            .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            client: reqwest::Client::new(),
            auth_service,
            hits,
        }
    }

    async fn token_for(&self, email: &str, role: Role) -> String {
        let command = RegisterCommand {
            name: "Test".to_string(),
            email: EmailAddress::new(email).unwrap(),
            password: Password::new("senha-segura").unwrap(),
            role: Some(role),
        };
        self.auth_service
            .register(command)
            .await
            .expect("registration failed")
            .token
    }

    async fn request(&self, token: Option<&str>) -> reqwest::Response {
        let mut builder = self.client.post(format!("{}/gated", self.address));
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder.send().await.expect("Failed to execute request")
    }

    fn handler_runs(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

#[tokio::test]
async fn test_editor_gate_admits_editor_and_admin() {
    let route = GatedRoute::spawn(true).await;

    let editor = route.token_for("editor@example.com", Role::Editor).await;
    let admin = route.token_for("admin@example.com", Role::Admin).await;

    assert_eq!(route.request(Some(&editor)).await.status(), StatusCode::OK);
    assert_eq!(route.request(Some(&admin)).await.status(), StatusCode::OK);
    assert_eq!(route.handler_runs(), 2);
}

#[tokio::test]
async fn test_editor_gate_rejects_plain_user() {
    let route = GatedRoute::spawn(true).await;

    let user = route.token_for("user@example.com", Role::User).await;

    let response = route.request(Some(&user)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["data"]["message"],
        "Acesso negado. Apenas administradores ou editores podem acessar."
    );
    assert_eq!(route.handler_runs(), 0);
}

#[tokio::test]
async fn test_admin_gate_rejects_editor() {
    let route = GatedRoute::spawn(false).await;

    let editor = route.token_for("editor@example.com", Role::Editor).await;

    let response = route.request(Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["data"]["message"],
        "Acesso negado. Apenas administradores podem acessar."
    );
    assert_eq!(route.handler_runs(), 0);
}

#[tokio::test]
async fn test_gate_never_reached_without_token() {
    let route = GatedRoute::spawn(true).await;

    let response = route.request(None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "Token de acesso não fornecido");
    assert_eq!(route.handler_runs(), 0);
}
