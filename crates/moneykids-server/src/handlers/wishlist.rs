//! Wishlist handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use serde::Deserialize;

use crate::{get_user_email, read_json, AppError, AppState, SuccessResponse};
use moneykids_core::models::{
    NewWishlistItem, WishlistItem, WishlistItemUpdate, WishlistProgress,
};

/// Request body for reordering: either a single move or a full order
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub from: Option<usize>,
    pub to: Option<usize>,
    pub ids: Option<Vec<i64>>,
}

/// Query parameters for savings progress
#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    #[serde(default)]
    pub monthly_contribution: f64,
    #[serde(default)]
    pub annual_rate_percent: f64,
}

/// GET /api/wishlist/:user_id - List a user's wishlist by priority
pub async fn list_wishlist(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<Json<Vec<WishlistItem>>, AppError> {
    let user_email = get_user_email(request.headers());

    let items = state.db.list_wishlist(user_id)?;

    state.db.log_audit(
        &user_email,
        "list",
        Some("wishlist"),
        Some(user_id),
        Some(&format!("count={}", items.len())),
    )?;

    Ok(Json(items))
}

/// POST /api/wishlist/:user_id - Add an item at the lowest priority
pub async fn add_wishlist_item(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<Json<WishlistItem>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: NewWishlistItem = read_json(request).await?;

    let item = state.db.add_wishlist_item(user_id, &req)?;

    state.db.log_audit(
        &user_email,
        "create",
        Some("wishlist_item"),
        Some(item.id),
        Some(&format!("user_id={}, price={:.2}", user_id, item.price)),
    )?;

    Ok(Json(item))
}

/// PUT /api/wishlist/:user_id/reorder - Move one item or set the whole order
pub async fn reorder_wishlist(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<Json<Vec<WishlistItem>>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: ReorderRequest = read_json(request).await?;

    let (items, details) = match (req.ids, req.from, req.to) {
        (Some(ids), None, None) => {
            let items = state.db.set_wishlist_order(user_id, &ids)?;
            (items, format!("ids={:?}", ids))
        }
        (None, Some(from), Some(to)) => {
            let items = state.db.move_wishlist_item(user_id, from, to)?;
            (items, format!("from={}, to={}", from, to))
        }
        _ => {
            return Err(AppError::bad_request(
                "Provide either 'ids' or both 'from' and 'to'",
            ))
        }
    };

    state.db.log_audit(
        &user_email,
        "reorder",
        Some("wishlist"),
        Some(user_id),
        Some(&details),
    )?;

    Ok(Json(items))
}

/// GET /api/wishlist/:user_id/progress - Savings progress per item
pub async fn get_wishlist_progress(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(params): Query<ProgressQuery>,
    request: Request,
) -> Result<Json<Vec<WishlistProgress>>, AppError> {
    let user_email = get_user_email(request.headers());

    let progress = state.db.wishlist_progress(
        user_id,
        params.monthly_contribution,
        params.annual_rate_percent,
    )?;

    state.db.log_audit(
        &user_email,
        "progress",
        Some("wishlist"),
        Some(user_id),
        Some(&format!(
            "monthly={:.2}, rate={}",
            params.monthly_contribution, params.annual_rate_percent
        )),
    )?;

    Ok(Json(progress))
}

/// GET /api/wishlist/items/:id - Get a single wishlist item
pub async fn get_wishlist_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<WishlistItem>, AppError> {
    let user_email = get_user_email(request.headers());

    let item = state
        .db
        .get_wishlist_item(id)?
        .ok_or_else(|| AppError::not_found(&format!("Wishlist item {} not found", id)))?;

    state
        .db
        .log_audit(&user_email, "get", Some("wishlist_item"), Some(id), None)?;

    Ok(Json(item))
}

/// PUT /api/wishlist/items/:id - Update a wishlist item
pub async fn update_wishlist_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<WishlistItem>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: WishlistItemUpdate = read_json(request).await?;

    let item = state.db.update_wishlist_item(id, &req)?;

    state
        .db
        .log_audit(&user_email, "update", Some("wishlist_item"), Some(id), None)?;

    Ok(Json(item))
}

/// DELETE /api/wishlist/items/:id - Delete an item and renumber the rest
pub async fn delete_wishlist_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    state.db.delete_wishlist_item(id)?;

    state
        .db
        .log_audit(&user_email, "delete", Some("wishlist_item"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
