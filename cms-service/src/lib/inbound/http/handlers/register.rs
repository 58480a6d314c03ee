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
use crate::user::models::Password;
use crate::user::models::RegisterCommand;
use crate::user::models::Role;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let command = body.try_into_command()?;

    let response = state
        .auth_service
        .register(command)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        RegisterResponseData {
            user: (&response.user).into(),
            token: response.token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    role: Option<String>,
}

impl RegisterRequestBody {
    fn try_into_command(self) -> Result<RegisterCommand, ApiError> {
        validate_required(&[
            ("name", &self.name),
            ("email", &self.email),
            ("password", &self.password),
        ])
        .map_err(ApiError::from)?;

        let email =
            EmailAddress::new(&self.email).map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let password =
            Password::new(&self.password).map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let role = self
            .role
            .map(|r| r.parse::<Role>())
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        Ok(RegisterCommand {
            name: self.name,
            email,
            password,
            role,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub user: UserData,
    pub token: String,
}
