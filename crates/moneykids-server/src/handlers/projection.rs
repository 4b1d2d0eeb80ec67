//! Savings projection and calculator handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{get_user_email, read_json, AppError, AppState};
use moneykids_core::projection::{
    future_value, project, required_monthly_savings, CompoundPeriod, FutureValue,
    ProjectionInput, ProjectionSeries,
};

/// Request body for the future value calculator
#[derive(Debug, Deserialize)]
pub struct FutureValueRequest {
    pub principal: f64,
    pub annual_rate_percent: f64,
    #[serde(flatten)]
    pub period: CompoundPeriod,
    #[serde(default)]
    pub monthly_deposit: f64,
}

/// Request body for the required savings calculator
#[derive(Debug, Deserialize)]
pub struct RequiredSavingsRequest {
    pub target_amount: f64,
    pub annual_rate_percent: f64,
    #[serde(flatten)]
    pub period: CompoundPeriod,
    #[serde(default)]
    pub initial_principal: f64,
}

#[derive(Debug, Serialize)]
pub struct RequiredSavingsResponse {
    pub monthly_savings: f64,
}

/// POST /api/projection - Year-by-year compound growth
pub async fn run_projection(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ProjectionSeries>, AppError> {
    let user_email = get_user_email(request.headers());
    let input: ProjectionInput = read_json(request).await?;

    input.validate()?;
    let series = project(&input);

    state.db.log_audit(
        &user_email,
        "project",
        Some("projection"),
        None,
        Some(&format!(
            "years={}, rate={}",
            input.horizon_years, input.annual_rate_percent
        )),
    )?;

    Ok(Json(series))
}

/// POST /api/projection/future-value - Closed-form savings summary
pub async fn calculate_future_value(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<FutureValue>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: FutureValueRequest = read_json(request).await?;

    let result = future_value(
        req.principal,
        req.annual_rate_percent,
        req.period,
        req.monthly_deposit,
    )?;

    state.db.log_audit(
        &user_email,
        "future_value",
        Some("projection"),
        None,
        Some(&format!(
            "years={}, months={}",
            req.period.years, req.period.months
        )),
    )?;

    Ok(Json(result))
}

/// POST /api/projection/required-savings - Monthly deposit needed for a target
pub async fn calculate_required_savings(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<RequiredSavingsResponse>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: RequiredSavingsRequest = read_json(request).await?;

    let monthly_savings = required_monthly_savings(
        req.target_amount,
        req.annual_rate_percent,
        req.period,
        req.initial_principal,
    )?;

    state.db.log_audit(
        &user_email,
        "required_savings",
        Some("projection"),
        None,
        Some(&format!("target={:.2}", req.target_amount)),
    )?;

    Ok(Json(RequiredSavingsResponse { monthly_savings }))
}
