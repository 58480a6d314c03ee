use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::validation::Pagination;
use crate::inbound::http::router::AppState;

/// Administrative listing of all accounts, paginated.
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<ApiSuccess<ListUsersResponseData>, ApiError> {
    let pagination = Pagination::new(query.page, query.limit).map_err(ApiError::from)?;

    let users = state
        .auth_service
        .list_users()
        .await
        .map_err(ApiError::from)?;

    let total = users.len();
    let page: Vec<UserData> = users
        .iter()
        .skip(pagination.offset())
        .take(pagination.limit as usize)
        .map(UserData::from)
        .collect();

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ListUsersResponseData {
            users: page,
            total,
            page: pagination.page,
            limit: pagination.limit,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListUsersQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListUsersResponseData {
    pub users: Vec<UserData>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}
