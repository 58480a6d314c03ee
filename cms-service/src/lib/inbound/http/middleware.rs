use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::user::errors::AuthError;
use crate::user::models::UserProfile;
use crate::inbound::http::router::AppState;

/// Request extension carrying the identity resolved for this request.
///
/// Derived fresh on every request from the bearer token plus a live
/// directory lookup; never cached across requests.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub profile: UserProfile,
}

/// Middleware that resolves the bearer token to a live user identity.
///
/// Rejects before the handler runs when the header is missing, the
/// token fails verification, or the subject is gone or inactive.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())?.to_string();

    let profile = state
        .auth_service
        .verify_token(&token)
        .await
        .map_err(|e| {
            // Expired and invalid both map to 401 but are logged apart.
            match &e {
                AuthError::TokenExpired => tracing::warn!("Rejected expired token"),
                AuthError::TokenInvalid => tracing::warn!("Rejected invalid token"),
                AuthError::SubjectNotFound => {
                    tracing::warn!("Rejected token for missing or inactive user")
                }
                other => tracing::error!(error = %other, "Token verification failed"),
            }
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(CurrentUser { profile });

    Ok(next.run(req).await)
}

/// Role gate: EDITOR or ADMIN.
pub async fn require_editor(req: Request, next: Next) -> Result<Response, ApiError> {
    let user = current_user(&req)?;

    if user.profile.role.can_edit() {
        Ok(next.run(req).await)
    } else {
        Err(ApiError::Forbidden(
            "Acesso negado. Apenas administradores ou editores podem acessar.".to_string(),
        ))
    }
}

/// Role gate: ADMIN only.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let user = current_user(&req)?;

    if user.profile.role.is_admin() {
        Ok(next.run(req).await)
    } else {
        Err(ApiError::Forbidden(
            "Acesso negado. Apenas administradores podem acessar.".to_string(),
        ))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// Shared with the refresh handler, which reads the bearer token
/// without going through [`authenticate`].
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let not_provided = || ApiError::Unauthorized("Token de acesso não fornecido".to_string());

    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .ok_or_else(not_provided)?;

    let auth_str = auth_header.to_str().map_err(|_| not_provided())?;

    auth_str.strip_prefix("Bearer ").ok_or_else(not_provided)
}

fn current_user(req: &Request) -> Result<&CurrentUser, ApiError> {
    // Gates run behind `authenticate`; a missing extension means the
    // route was wired without it.
    req.extensions().get::<CurrentUser>().ok_or_else(|| {
        ApiError::Unauthorized("Token de acesso não fornecido".to_string())
    })
}
