//! # REST API for staff users

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::AppState;
use shared::{CreateUserRequest, UserRole};

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub role: Option<String>,
}

/// List users, optionally filtered by `?role=Teacher` or `?role=Front Desk`
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> impl IntoResponse {
    info!("GET /api/users - role: {:?}", query.role);

    let role = match query.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => match UserRole::parse(raw) {
            Some(role) => Some(role),
            None => {
                warn!("Unknown role filter: {}", raw);
                return (StatusCode::BAD_REQUEST, format!("Unknown role: {}", raw)).into_response();
            }
        },
        None => None,
    };

    match state.user_service.list_users(role).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list users: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing users").into_response()
        }
    }
}

/// Create a staff user
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> impl IntoResponse {
    info!("POST /api/users - request: {:?}", request);

    match state.user_service.create_user(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to create user: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}
