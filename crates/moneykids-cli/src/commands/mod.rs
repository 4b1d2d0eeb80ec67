//! Command implementations for the MoneyKids CLI
//!
//! Each submodule contains related command implementations:
//! - `core` - Database opening and initialization
//! - `serve` - Web server
//! - `status` - Database status
//! - `users` - Household members
//! - `balance` - Deposits, withdrawals, goals and forecasts
//! - `tasks` - Chores and quests
//! - `wishlist` - Wishlist ordering and progress
//! - `project` - Savings projection table

mod balance;
mod core;
mod project;
mod serve;
mod status;
mod tasks;
mod users;
mod wishlist;

pub use self::core::*;
pub use balance::*;
pub use project::*;
pub use serve::*;
pub use status::*;
pub use tasks::*;
pub use users::*;
pub use wishlist::*;

/// Truncate a string to max length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount with thousands separators and two decimals
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, grouped, cents % 100)
}
