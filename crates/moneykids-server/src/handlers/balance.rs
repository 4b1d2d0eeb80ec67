//! Balance, transaction and forecast handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{clamp_limit, get_user_email, read_json, AppError, AppState};
use moneykids_core::models::{Balance, BalanceSummary, ForecastPoint, Transaction};

/// Request body for deposits and withdrawals
#[derive(Debug, Deserialize)]
pub struct MoneyRequest {
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Transaction plus the balance after it
#[derive(Debug, Serialize)]
pub struct MoneyResponse {
    pub transaction: Transaction,
    pub balance: f64,
}

/// Request body for setting the savings goal (null clears it)
#[derive(Debug, Deserialize)]
pub struct SavingsGoalRequest {
    pub savings_goal: Option<f64>,
}

/// Query parameters for transaction history
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_history_limit() -> i64 {
    100
}

/// Query parameters for the balance forecast
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    #[serde(default = "default_forecast_days")]
    pub days: u32,
}

fn default_forecast_days() -> u32 {
    30
}

/// GET /api/balance/:user_id - Balance summary with goal progress
pub async fn get_balance_summary(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<Json<BalanceSummary>, AppError> {
    let user_email = get_user_email(request.headers());

    let summary = state.db.balance_summary(user_id)?;

    state
        .db
        .log_audit(&user_email, "get", Some("balance"), Some(user_id), None)?;

    Ok(Json(summary))
}

/// POST /api/balance/:user_id/deposit - Pay money in
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<Json<MoneyResponse>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: MoneyRequest = read_json(request).await?;

    let transaction = state
        .db
        .deposit(user_id, req.amount, req.description.as_deref())?;
    let balance = state.db.get_balance(user_id)?.current_amount;

    state.db.log_audit(
        &user_email,
        "deposit",
        Some("balance"),
        Some(user_id),
        Some(&format!("amount={:.2}", req.amount)),
    )?;

    Ok(Json(MoneyResponse {
        transaction,
        balance,
    }))
}

/// POST /api/balance/:user_id/withdraw - Take money out
pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<Json<MoneyResponse>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: MoneyRequest = read_json(request).await?;

    let transaction = state
        .db
        .withdraw(user_id, req.amount, req.description.as_deref())?;
    let balance = state.db.get_balance(user_id)?.current_amount;

    state.db.log_audit(
        &user_email,
        "withdraw",
        Some("balance"),
        Some(user_id),
        Some(&format!("amount={:.2}", req.amount)),
    )?;

    Ok(Json(MoneyResponse {
        transaction,
        balance,
    }))
}

/// PUT /api/balance/:user_id/goal - Set or clear the savings goal
pub async fn set_savings_goal(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<Json<Balance>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: SavingsGoalRequest = read_json(request).await?;

    let balance = state.db.set_savings_goal(user_id, req.savings_goal)?;

    state.db.log_audit(
        &user_email,
        "update",
        Some("savings_goal"),
        Some(user_id),
        Some(&format!("goal={:?}", req.savings_goal)),
    )?;

    Ok(Json(balance))
}

/// GET /api/balance/:user_id/transactions - Transaction history, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(params): Query<HistoryQuery>,
    request: Request,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let user_email = get_user_email(request.headers());
    let limit = clamp_limit(params.limit);
    let offset = params.offset.max(0);

    let transactions = state.db.list_transactions(user_id, offset, limit)?;

    state.db.log_audit(
        &user_email,
        "list",
        Some("transaction"),
        Some(user_id),
        Some(&format!("offset={}, limit={}", offset, limit)),
    )?;

    Ok(Json(transactions))
}

/// GET /api/balance/:user_id/forecast - Linear balance forecast
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(params): Query<ForecastQuery>,
    request: Request,
) -> Result<Json<Vec<ForecastPoint>>, AppError> {
    let user_email = get_user_email(request.headers());

    let forecast = state
        .db
        .balance_forecast(user_id, params.days, chrono::Utc::now())?;

    state.db.log_audit(
        &user_email,
        "forecast",
        Some("balance"),
        Some(user_id),
        Some(&format!("days={}", params.days)),
    )?;

    Ok(Json(forecast))
}
