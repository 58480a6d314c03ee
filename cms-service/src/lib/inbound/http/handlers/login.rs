use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::validation::validate_required;
use crate::inbound::http::router::AppState;
use crate::user::models::EmailAddress;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // All shape checks happen before the directory is touched
    validate_required(&[("email", &body.email), ("password", &body.password)])
        .map_err(ApiError::from)?;

    let email = EmailAddress::new(&body.email).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let response = state
        .auth_service
        .login(email, body.password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            user: (&response.user).into(),
            token: response.token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: UserData,
    pub token: String,
}
