//! Chore and quest handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use serde::Deserialize;

use crate::{get_user_email, read_json, AppError, AppState, SuccessResponse};
use moneykids_core::models::{NewTask, Task, TaskCompletion, TaskStatus, TaskUpdate};

/// Query parameters for listing tasks
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub user_id: Option<i64>,
    pub status: Option<String>,
}

/// Request body for a status change
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// Request body for quest progress
#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub progress: u8,
}

fn parse_status(s: &str) -> Result<TaskStatus, AppError> {
    s.parse().map_err(|e: String| AppError::bad_request(&e))
}

/// GET /api/tasks - List tasks, optionally filtered by user and status
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TaskListQuery>,
    request: Request,
) -> Result<Json<Vec<Task>>, AppError> {
    let user_email = get_user_email(request.headers());

    let status = params.status.as_deref().map(parse_status).transpose()?;
    let tasks = state.db.list_tasks(params.user_id, status)?;

    state.db.log_audit(
        &user_email,
        "list",
        Some("task"),
        params.user_id,
        Some(&format!("count={}", tasks.len())),
    )?;

    Ok(Json(tasks))
}

/// POST /api/tasks - Create a chore or quest
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Task>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: NewTask = read_json(request).await?;

    let task = state.db.create_task(&req)?;

    state.db.log_audit(
        &user_email,
        "create",
        Some("task"),
        Some(task.id),
        Some(&format!("kind={}, reward={:.2}", task.kind, task.reward)),
    )?;

    Ok(Json(task))
}

/// GET /api/tasks/:id - Get a single task
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Task>, AppError> {
    let user_email = get_user_email(request.headers());

    let task = state
        .db
        .get_task(id)?
        .ok_or_else(|| AppError::not_found(&format!("Task {} not found", id)))?;

    state
        .db
        .log_audit(&user_email, "get", Some("task"), Some(id), None)?;

    Ok(Json(task))
}

/// PUT /api/tasks/:id - Update task fields
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Task>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: TaskUpdate = read_json(request).await?;

    let task = state.db.update_task(id, &req)?;

    state
        .db
        .log_audit(&user_email, "update", Some("task"), Some(id), None)?;

    Ok(Json(task))
}

/// DELETE /api/tasks/:id - Delete a task
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    state.db.delete_task(id)?;

    state
        .db
        .log_audit(&user_email, "delete", Some("task"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// PATCH /api/tasks/:id/status - Move a task to a new status
pub async fn update_task_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Task>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: StatusRequest = read_json(request).await?;
    let status = parse_status(&req.status)?;

    let task = state.db.update_task_status(id, status)?;

    state.db.log_audit(
        &user_email,
        "update_status",
        Some("task"),
        Some(id),
        Some(&format!("status={}", status)),
    )?;

    Ok(Json(task))
}

/// POST /api/tasks/:id/accept - Start a pending quest
pub async fn accept_quest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Task>, AppError> {
    let user_email = get_user_email(request.headers());

    let task = state.db.accept_quest(id)?;

    state
        .db
        .log_audit(&user_email, "accept", Some("task"), Some(id), None)?;

    Ok(Json(task))
}

/// POST /api/tasks/:id/complete - Complete a task and pay its reward
pub async fn complete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<TaskCompletion>, AppError> {
    let user_email = get_user_email(request.headers());

    let completion = state.db.complete_task(id)?;

    state.db.log_audit(
        &user_email,
        "complete",
        Some("task"),
        Some(id),
        Some(&format!("reward={:.2}", completion.task.reward)),
    )?;

    Ok(Json(completion))
}

/// PUT /api/tasks/:id/progress - Record quest progress
pub async fn set_task_progress(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Task>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: ProgressRequest = read_json(request).await?;

    let task = state.db.set_task_progress(id, req.progress)?;

    state.db.log_audit(
        &user_email,
        "progress",
        Some("task"),
        Some(id),
        Some(&format!("progress={}", req.progress)),
    )?;

    Ok(Json(task))
}
