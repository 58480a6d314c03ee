use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::change_password::change_password;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::handlers::verify::verify;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_admin;
use super::rate_limit::limit_auth_attempts;
use super::rate_limit::RateLimiter;
use crate::domain::user::service::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub rate_limiter: Arc<RateLimiter>,
}

pub fn create_router(auth_service: Arc<AuthService>, rate_limiter: Arc<RateLimiter>) -> Router {
    let state = AppState {
        auth_service,
        rate_limiter,
    };

    // Credential endpoints: public, but rate limited
    let credential_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            limit_auth_attempts,
        ));

    // Refresh reads the bearer token itself (it may be expired)
    let public_routes = Router::new().route("/api/auth/refresh", post(refresh));

    let protected_routes = Router::new()
        .route("/api/auth/verify", post(verify))
        .route("/api/auth/change-password", post(change_password))
        .route("/api/auth/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/api/users", get(list_users))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(credential_routes)
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
