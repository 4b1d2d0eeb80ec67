//! Balance commands (show, deposit, withdraw, history, goal, forecast)

use anyhow::Result;
use chrono::Utc;
use moneykids_core::Database;

use super::{format_money, truncate};

pub fn cmd_balance_show(db: &Database, user_id: i64) -> Result<()> {
    let summary = db.balance_summary(user_id)?;

    println!();
    println!("💰 Balance: {}", format_money(summary.current_balance));

    if let (Some(amount), Some(kind), Some(date)) = (
        summary.last_transaction_amount,
        summary.last_transaction_type,
        summary.last_transaction_date,
    ) {
        println!(
            "   Last: {} {} on {}",
            kind,
            format_money(amount),
            date.format("%Y-%m-%d")
        );
    }

    match (summary.savings_goal, summary.achievement_rate) {
        (Some(goal), Some(rate)) => {
            println!("   🎯 Goal: {} ({:.1}% reached)", format_money(goal), rate);
        }
        _ => println!("   🎯 Goal: not set"),
    }

    Ok(())
}

pub fn cmd_balance_deposit(
    db: &Database,
    user_id: i64,
    amount: f64,
    description: Option<&str>,
) -> Result<()> {
    db.deposit(user_id, amount, description)?;
    let balance = db.get_balance(user_id)?;

    println!(
        "✅ Deposited {}. New balance: {}",
        format_money(amount),
        format_money(balance.current_amount)
    );
    Ok(())
}

pub fn cmd_balance_withdraw(
    db: &Database,
    user_id: i64,
    amount: f64,
    description: Option<&str>,
) -> Result<()> {
    db.withdraw(user_id, amount, description)?;
    let balance = db.get_balance(user_id)?;

    println!(
        "✅ Withdrew {}. New balance: {}",
        format_money(amount),
        format_money(balance.current_amount)
    );
    Ok(())
}

pub fn cmd_balance_history(db: &Database, user_id: i64, limit: i64) -> Result<()> {
    let transactions = db.list_transactions(user_id, 0, limit.max(1))?;

    if transactions.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }

    println!();
    println!("📜 Recent transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let signed = tx.signed_amount();
        let amount_color = if signed < 0.0 {
            "\x1b[31m" // red
        } else {
            "\x1b[32m" // green
        };
        println!(
            "   {} │ {}{:>10}\x1b[0m │ {:<10} │ {}",
            tx.created_at.format("%Y-%m-%d"),
            amount_color,
            format_money(signed),
            tx.transaction_type.as_str(),
            truncate(tx.description.as_deref().unwrap_or(""), 40)
        );
    }

    Ok(())
}

pub fn cmd_balance_goal(db: &Database, user_id: i64, amount: Option<f64>) -> Result<()> {
    let balance = db.set_savings_goal(user_id, amount)?;

    match balance.savings_goal {
        Some(goal) => println!("🎯 Savings goal set to {}", format_money(goal)),
        None => println!("🎯 Savings goal cleared"),
    }
    Ok(())
}

pub fn cmd_balance_forecast(db: &Database, user_id: i64, days: u32) -> Result<()> {
    let points = db.balance_forecast(user_id, days, Utc::now())?;

    if points.is_empty() {
        println!("Nothing to forecast.");
        return Ok(());
    }

    println!();
    println!("🔮 Forecast ({} days, based on the last 30 days)", days);
    println!("   ─────────────────────────────");

    for point in points {
        println!(
            "   {} │ {:>12}",
            point.date.format("%Y-%m-%d"),
            format_money(point.predicted_amount)
        );
    }

    Ok(())
}
