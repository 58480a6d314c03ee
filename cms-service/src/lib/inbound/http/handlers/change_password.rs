use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::validation::validate_required;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::user::models::Password;

pub async fn change_password(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<ChangePasswordRequestBody>,
) -> Result<ApiSuccess<ChangePasswordResponseData>, ApiError> {
    validate_required(&[
        ("oldPassword", &body.old_password),
        ("newPassword", &body.new_password),
    ])
    .map_err(ApiError::from)?;

    let new_password =
        Password::new(&body.new_password).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let message = state
        .auth_service
        .change_password(current_user.profile.id, body.old_password, new_password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ChangePasswordResponseData { message },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequestBody {
    #[serde(default)]
    old_password: String,
    #[serde(default)]
    new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangePasswordResponseData {
    pub message: String,
}
