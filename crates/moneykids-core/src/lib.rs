//! MoneyKids Core Library
//!
//! Shared functionality for the MoneyKids allowance tracker:
//! - Compound-growth projection engine and savings calculators
//! - Encrypted SQLite store for users, balances, tasks and wishlists
//! - Linear balance forecasts from recent activity
//! - Wishlist priority ordering

pub mod db;
pub mod error;
pub mod forecast;
pub mod models;
pub mod projection;
pub mod reorder;

pub use db::{AuditEntry, Database};
pub use error::{Error, Result};
pub use projection::{
    future_value, months_to_reach, project, required_monthly_savings, CompoundPeriod, FutureValue,
    ProjectionInput, ProjectionPoint, ProjectionSeries,
};
