use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::middleware::bearer_token;
use crate::inbound::http::router::AppState;

/// Exchanges a bearer token for a fresh one. Not behind the
/// authentication middleware: the presented token may already be
/// expired, which the refresh flow deliberately tolerates.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<RefreshResponseData>, ApiError> {
    let token = bearer_token(&headers)?;

    let response = state
        .auth_service
        .refresh_token(token)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        RefreshResponseData {
            user: (&response.user).into(),
            token: response.token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshResponseData {
    pub user: UserData,
    pub token: String,
}
