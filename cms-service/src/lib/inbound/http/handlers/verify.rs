use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::middleware::CurrentUser;

/// The authentication middleware has already verified the token and
/// re-checked the subject; this just echoes the resolved identity.
pub async fn verify(
    Extension(current_user): Extension<CurrentUser>,
) -> Result<ApiSuccess<VerifyResponseData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        VerifyResponseData {
            user: (&current_user.profile).into(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyResponseData {
    pub user: UserData,
}
