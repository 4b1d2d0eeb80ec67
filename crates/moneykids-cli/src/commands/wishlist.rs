//! Wishlist commands

use anyhow::{Context, Result};
use moneykids_core::models::NewWishlistItem;
use moneykids_core::Database;

use super::{format_money, truncate};

pub fn cmd_wishlist_list(db: &Database, user_id: i64) -> Result<()> {
    let items = db.list_wishlist(user_id)?;

    if items.is_empty() {
        println!("Wishlist is empty. Add something with:");
        println!("  moneykids wishlist add {} \"Bike\" 3000", user_id);
        return Ok(());
    }

    println!();
    println!("🎁 Wishlist");
    println!("   ─────────────────────────────────────────────");

    for item in items {
        println!(
            "   {:>2}. {:<30} │ {:>10} │ #{}",
            item.priority,
            truncate(&item.name, 30),
            format_money(item.price),
            item.id
        );
    }

    Ok(())
}

pub fn cmd_wishlist_add(
    db: &Database,
    user_id: i64,
    name: &str,
    price: f64,
    url: Option<&str>,
) -> Result<()> {
    let mut item = NewWishlistItem::new(name, price);
    item.url = url.map(str::to_string);

    let item = db.add_wishlist_item(user_id, &item)?;
    println!(
        "✅ Added '{}' ({}) at priority {}",
        item.name,
        format_money(item.price),
        item.priority
    );
    Ok(())
}

pub fn cmd_wishlist_move(db: &Database, user_id: i64, from: usize, to: usize) -> Result<()> {
    let items = db.move_wishlist_item(user_id, from, to)?;
    let moved = items
        .iter()
        .find(|item| item.priority == to as i64)
        .context("Moved item missing from wishlist")?;

    println!("↕️  '{}' is now priority {}", moved.name, to);
    Ok(())
}

pub fn cmd_wishlist_remove(db: &Database, id: i64) -> Result<()> {
    let item = db
        .get_wishlist_item(id)?
        .with_context(|| format!("Wishlist item {} not found", id))?;

    db.delete_wishlist_item(id)?;
    println!("🗑️  Removed '{}'", item.name);
    Ok(())
}

pub fn cmd_wishlist_progress(db: &Database, user_id: i64, monthly: f64, rate: f64) -> Result<()> {
    let progress = db.wishlist_progress(user_id, monthly, rate)?;

    if progress.is_empty() {
        println!("Wishlist is empty.");
        return Ok(());
    }

    println!();
    println!("🎯 Wishlist progress");
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in progress {
        let eta = match entry.months_to_afford {
            Some(0) => "affordable now".to_string(),
            Some(1) => "1 month".to_string(),
            Some(months) => format!("{} months", months),
            None => "out of reach".to_string(),
        };
        println!(
            "   {:>2}. {:<24} │ {:>5.1}% │ {:>10} to go │ {}",
            entry.priority,
            truncate(&entry.name, 24),
            entry.progress_percent,
            format_money(entry.remaining),
            eta
        );
    }

    Ok(())
}
