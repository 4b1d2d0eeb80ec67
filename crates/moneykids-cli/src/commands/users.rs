//! User management commands

use anyhow::{Context, Result};
use moneykids_core::models::UserRole;
use moneykids_core::Database;

use super::{format_money, truncate};

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Add one with:");
        println!("  moneykids users add Hana");
        return Ok(());
    }

    println!();
    println!("👪 Users");
    println!("   ─────────────────────────────────────────────");

    for user in users {
        let balance = db.get_balance(user.id)?;
        println!(
            "   {:>4} │ {:<24} │ {:<6} │ {:>10}",
            user.id,
            truncate(&user.name, 24),
            user.role.as_str(),
            format_money(balance.current_amount)
        );
    }

    Ok(())
}

pub fn cmd_users_add(db: &Database, name: &str, role: &str) -> Result<()> {
    let role: UserRole = role
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("Invalid --role")?;

    let user = db.create_user(name, role)?;
    println!("✅ Added {} ({}) with ID {}", user.name, user.role, user.id);

    Ok(())
}

pub fn cmd_users_remove(db: &Database, id: i64) -> Result<()> {
    let user = db
        .get_user(id)?
        .with_context(|| format!("User {} not found", id))?;

    db.delete_user(id)?;
    println!("🗑️  Removed {} and all of their data", user.name);

    Ok(())
}
