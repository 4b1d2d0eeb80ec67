//! Compound-growth projection engine
//!
//! Simulates a savings balance that compounds monthly and receives a fixed
//! contribution at the end of every month. The main entry point is
//! [`project`], which returns one balance per simulated year:
//!
//! ```
//! use moneykids_core::projection::{project, ProjectionInput};
//!
//! let series = project(&ProjectionInput {
//!     principal: 1000.0,
//!     monthly_contribution: 1000.0,
//!     annual_rate_percent: 3.0,
//!     horizon_years: 1,
//! });
//! assert_eq!(series.len(), 2);
//! assert_eq!(series.final_balance(), 13197.0);
//! ```
//!
//! Year 0 is the principal exactly as given. Every later year is rounded to
//! the nearest whole currency unit, half away from zero. Rounding is applied
//! only at year boundaries; the monthly steps run at full precision.
//!
//! The module also carries the closed-form helpers used by the savings
//! calculator screens: [`future_value`], [`required_monthly_savings`] and
//! [`months_to_reach`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Longest horizon accepted by [`ProjectionInput::validate`]
pub const MAX_HORIZON_YEARS: u32 = 100;

/// Highest annual rate accepted by [`ProjectionInput::validate`]
pub const MAX_ANNUAL_RATE_PERCENT: f64 = 100.0;

/// Inputs to a projection run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Balance at year 0
    pub principal: f64,
    /// Amount added at the end of each month
    pub monthly_contribution: f64,
    /// Nominal yearly interest rate in percent (3.0 = 3%)
    pub annual_rate_percent: f64,
    /// Number of whole years to simulate
    pub horizon_years: u32,
}

impl ProjectionInput {
    /// Check the input ranges a caller must guarantee before calling [`project`].
    ///
    /// The engine itself never fails; this is the validation hook for
    /// user-facing callers (HTTP handlers, CLI).
    pub fn validate(&self) -> Result<()> {
        check_amount("principal", self.principal)?;
        check_amount("monthly contribution", self.monthly_contribution)?;
        check_rate(self.annual_rate_percent)?;
        if self.horizon_years == 0 || self.horizon_years > MAX_HORIZON_YEARS {
            return Err(Error::InvalidData(format!(
                "horizon must be between 1 and {} years",
                MAX_HORIZON_YEARS
            )));
        }
        Ok(())
    }

    /// Periodic (monthly) rate as a fraction
    pub fn monthly_rate(&self) -> f64 {
        monthly_rate(self.annual_rate_percent)
    }
}

/// Balance at the end of a simulated year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub year: u32,
    pub balance: f64,
}

/// Year-indexed output of [`project`]; element `i` is year `i`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectionSeries(Vec<ProjectionPoint>);

impl ProjectionSeries {
    pub fn points(&self) -> &[ProjectionPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Balance at the last simulated year (the principal for a zero horizon)
    pub fn final_balance(&self) -> f64 {
        self.0.last().map(|p| p.balance).unwrap_or(0.0)
    }

    /// Balance for a given year, if it was simulated
    pub fn balance_at(&self, year: u32) -> Option<f64> {
        self.0.get(year as usize).map(|p| p.balance)
    }

    pub fn into_points(self) -> Vec<ProjectionPoint> {
        self.0
    }
}

impl std::ops::Index<usize> for ProjectionSeries {
    type Output = ProjectionPoint;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

/// One month of compounding followed by the end-of-month contribution
fn monthly_step(balance: f64, monthly_rate: f64, contribution: f64) -> f64 {
    balance * (1.0 + monthly_rate) + contribution
}

/// Round to two decimal places, half away from zero
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn check_amount(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidData(format!(
            "{} must be a non-negative number",
            name
        )));
    }
    Ok(())
}

fn check_rate(annual_rate_percent: f64) -> Result<()> {
    if !annual_rate_percent.is_finite()
        || !(0.0..=MAX_ANNUAL_RATE_PERCENT).contains(&annual_rate_percent)
    {
        return Err(Error::InvalidData(format!(
            "annual rate must be between 0 and {}%",
            MAX_ANNUAL_RATE_PERCENT
        )));
    }
    Ok(())
}

fn check_result(value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::InvalidData(
            "result is too large to represent".to_string(),
        ));
    }
    Ok(value)
}

/// Project a savings balance year by year.
///
/// Returns `horizon_years + 1` points. Pure and total over the ranges checked
/// by [`ProjectionInput::validate`]; a zero horizon yields just the principal.
pub fn project(input: &ProjectionInput) -> ProjectionSeries {
    let rate = input.monthly_rate();
    let months = input.horizon_years.saturating_mul(12);

    let mut points = Vec::with_capacity(input.horizon_years as usize + 1);
    points.push(ProjectionPoint {
        year: 0,
        balance: input.principal,
    });

    let mut balance = input.principal;
    for month in 1..=months {
        balance = monthly_step(balance, rate, input.monthly_contribution);
        if month % 12 == 0 {
            points.push(ProjectionPoint {
                year: month / 12,
                balance: balance.round(),
            });
        }
    }

    ProjectionSeries(points)
}

/// Number of months to reach `target`, or `None` if it is not reached within
/// `max_months`. Returns `Some(0)` when the principal already covers it.
pub fn months_to_reach(
    principal: f64,
    monthly_contribution: f64,
    annual_rate_percent: f64,
    target: f64,
    max_months: u32,
) -> Option<u32> {
    if principal >= target {
        return Some(0);
    }

    let rate = monthly_rate(annual_rate_percent);
    let mut balance = principal;
    for month in 1..=max_months {
        balance = monthly_step(balance, rate, monthly_contribution);
        if balance >= target {
            return Some(month);
        }
    }
    None
}

/// Length of a savings period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompoundPeriod {
    pub years: u32,
    #[serde(default)]
    pub months: u32,
}

impl CompoundPeriod {
    pub fn years(years: u32) -> Self {
        Self { years, months: 0 }
    }

    /// Length in months, or `None` if it does not fit in a `u32`
    pub fn total_months(&self) -> Option<u32> {
        self.years.checked_mul(12)?.checked_add(self.months)
    }

    /// Length in months, rejecting periods longer than [`MAX_HORIZON_YEARS`]
    pub fn bounded_months(&self) -> Result<u32> {
        match self.total_months() {
            Some(months) if months <= MAX_HORIZON_YEARS * 12 => Ok(months),
            _ => Err(Error::InvalidData(format!(
                "savings period must be at most {} years",
                MAX_HORIZON_YEARS
            ))),
        }
    }
}

/// Closed-form summary of a savings plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FutureValue {
    /// Balance at the end of the period
    pub future_value: f64,
    /// Principal plus all contributions
    pub total_deposits: f64,
    /// Growth on top of the deposits
    pub total_interest: f64,
}

/// Future value of a principal plus monthly deposits, compounded monthly.
///
/// All outputs are rounded to cents.
pub fn future_value(
    principal: f64,
    annual_rate_percent: f64,
    period: CompoundPeriod,
    monthly_deposit: f64,
) -> Result<FutureValue> {
    check_amount("principal", principal)?;
    check_amount("monthly deposit", monthly_deposit)?;
    check_rate(annual_rate_percent)?;
    let months = period.bounded_months()?;

    let rate = monthly_rate(annual_rate_percent);
    let n = f64::from(months);
    let growth = (1.0 + rate).powf(n);

    let base = principal * growth;
    let deposits = if monthly_deposit > 0.0 {
        if rate == 0.0 {
            monthly_deposit * n
        } else {
            monthly_deposit * (growth - 1.0) / rate
        }
    } else {
        0.0
    };

    let future_value = check_result(base + deposits)?;
    let total_deposits = check_result(principal + monthly_deposit * n)?;

    Ok(FutureValue {
        future_value: round_cents(future_value),
        total_deposits: round_cents(total_deposits),
        total_interest: round_cents(future_value - total_deposits),
    })
}

/// Monthly deposit needed to grow `initial_principal` into `target` over `period`.
///
/// Returns 0 when the principal already covers the target.
pub fn required_monthly_savings(
    target: f64,
    annual_rate_percent: f64,
    period: CompoundPeriod,
    initial_principal: f64,
) -> Result<f64> {
    check_amount("target", target)?;
    check_amount("initial principal", initial_principal)?;
    check_rate(annual_rate_percent)?;
    let months = period.bounded_months()?;

    if target <= initial_principal {
        return Ok(0.0);
    }
    if months == 0 {
        return Err(Error::InvalidData(
            "savings period must be at least one month".to_string(),
        ));
    }

    let n = f64::from(months);
    let rate = monthly_rate(annual_rate_percent);
    if rate == 0.0 {
        return Ok(round_cents((target - initial_principal) / n));
    }

    let growth = (1.0 + rate).powf(n);
    let remaining = target - initial_principal * growth;
    if remaining <= 0.0 {
        return Ok(0.0);
    }

    check_result(round_cents(remaining * rate / (growth - 1.0)))
}
