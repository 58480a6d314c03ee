use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;

/// Tokens are not revocable server-side; logout is an acknowledgment
/// and the client discards its stored token.
pub async fn logout(
    Extension(_current_user): Extension<CurrentUser>,
) -> Result<ApiSuccess<LogoutResponseData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        LogoutResponseData {
            message: "Logout realizado com sucesso".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
