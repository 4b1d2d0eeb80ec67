//! User management handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use serde::Deserialize;

use crate::{get_user_email, read_json, AppError, AppState, SuccessResponse};
use moneykids_core::models::{User, UserRole};

/// Request body for creating a user
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// GET /api/users - List all users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<User>>, AppError> {
    let user_email = get_user_email(request.headers());

    let users = state.db.list_users()?;

    state.db.log_audit(
        &user_email,
        "list",
        Some("user"),
        None,
        Some(&format!("count={}", users.len())),
    )?;

    Ok(Json(users))
}

/// POST /api/users - Create a user (with a zero balance)
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<User>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: CreateUserRequest = read_json(request).await?;

    let role: UserRole = match req.role.as_deref() {
        Some(role) => role.parse().map_err(|e: String| AppError::bad_request(&e))?,
        None => UserRole::default(),
    };

    let user = state.db.create_user(&req.name, role)?;

    state.db.log_audit(
        &user_email,
        "create",
        Some("user"),
        Some(user.id),
        Some(&format!("role={}", user.role)),
    )?;

    Ok(Json(user))
}

/// GET /api/users/:id - Get a single user
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<User>, AppError> {
    let user_email = get_user_email(request.headers());

    let user = state
        .db
        .get_user(id)?
        .ok_or_else(|| AppError::not_found(&format!("User {} not found", id)))?;

    state
        .db
        .log_audit(&user_email, "get", Some("user"), Some(id), None)?;

    Ok(Json(user))
}

/// DELETE /api/users/:id - Delete a user and everything they own
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    state.db.delete_user(id)?;

    state
        .db
        .log_audit(&user_email, "delete", Some("user"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
