//! Wishlist operations

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

use super::{parse_date, parse_datetime, with_transaction, Database};
use crate::error::{Error, Result};
use crate::models::{NewWishlistItem, WishlistItem, WishlistItemUpdate, WishlistProgress};
use crate::projection::{months_to_reach, MAX_ANNUAL_RATE_PERCENT};
use crate::reorder;

/// Give up on `months_to_afford` after 50 years
pub const MAX_AFFORD_MONTHS: u32 = 50 * 12;

const ITEM_COLUMNS: &str = "id, user_id, name, price, priority, url, description, target_date, created_at, updated_at";

fn row_to_item(row: &Row) -> rusqlite::Result<WishlistItem> {
    let target_date_str: Option<String> = row.get(7)?;
    let created_at_str: String = row.get(8)?;
    let updated_at_str: String = row.get(9)?;

    Ok(WishlistItem {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        price: row.get(3)?,
        priority: row.get(4)?,
        url: row.get(5)?,
        description: row.get(6)?,
        target_date: target_date_str.as_deref().and_then(parse_date),
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

fn load_item(conn: &Connection, id: i64) -> Result<WishlistItem> {
    conn.query_row(
        &format!("SELECT {} FROM wishlist_items WHERE id = ?", ITEM_COLUMNS),
        params![id],
        row_to_item,
    )
    .optional()?
    .ok_or_else(|| Error::NotFound(format!("Wishlist item {} not found", id)))
}

fn load_wishlist(conn: &Connection, user_id: i64) -> Result<Vec<WishlistItem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM wishlist_items WHERE user_id = ? ORDER BY priority, id",
        ITEM_COLUMNS
    ))?;
    let items = stmt
        .query_map(params![user_id], row_to_item)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(items)
}

fn ordered_ids(conn: &Connection, user_id: i64) -> Result<Vec<i64>> {
    let mut stmt =
        conn.prepare("SELECT id FROM wishlist_items WHERE user_id = ? ORDER BY priority, id")?;
    let ids = stmt
        .query_map(params![user_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<i64>, _>>()?;
    Ok(ids)
}

fn write_priorities(conn: &Connection, ids: &[i64]) -> Result<()> {
    let mut stmt = conn.prepare(
        "UPDATE wishlist_items SET priority = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ? AND priority != ?",
    )?;
    for (id, priority) in reorder::renumber(ids) {
        stmt.execute(params![priority, id, priority])?;
    }
    Ok(())
}

impl Database {
    /// Add an item at the end of a user's wishlist
    pub fn add_wishlist_item(&self, user_id: i64, item: &NewWishlistItem) -> Result<WishlistItem> {
        item.validate()?;
        self.require_user(user_id)?;

        let conn = self.conn()?;
        let id = with_transaction(&conn, |conn| {
            let next: i64 = conn.query_row(
                "SELECT COALESCE(MAX(priority), 0) + 1 FROM wishlist_items WHERE user_id = ?",
                params![user_id],
                |row| row.get(0),
            )?;
            conn.execute(
                r#"
                INSERT INTO wishlist_items (user_id, name, price, priority, url, description, target_date)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    user_id,
                    item.name.trim(),
                    item.price,
                    next,
                    item.url,
                    item.description,
                    item.target_date.map(|d| d.format("%Y-%m-%d").to_string()),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        info!(item_id = id, user_id, "Added wishlist item");
        load_item(&conn, id)
    }

    /// List a user's wishlist by priority
    pub fn list_wishlist(&self, user_id: i64) -> Result<Vec<WishlistItem>> {
        self.require_user(user_id)?;
        let conn = self.conn()?;
        load_wishlist(&conn, user_id)
    }

    /// Get a wishlist item by ID
    pub fn get_wishlist_item(&self, id: i64) -> Result<Option<WishlistItem>> {
        let conn = self.conn()?;
        let item = conn
            .query_row(
                &format!("SELECT {} FROM wishlist_items WHERE id = ?", ITEM_COLUMNS),
                params![id],
                row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    /// Apply a partial update to a wishlist item
    pub fn update_wishlist_item(&self, id: i64, update: &WishlistItemUpdate) -> Result<WishlistItem> {
        update.validate()?;

        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE wishlist_items SET
                name = COALESCE(?, name),
                price = COALESCE(?, price),
                url = COALESCE(?, url),
                description = COALESCE(?, description),
                target_date = COALESCE(?, target_date),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
            params![
                update.name.as_deref().map(str::trim),
                update.price,
                update.url,
                update.description,
                update.target_date.map(|d| d.format("%Y-%m-%d").to_string()),
                id
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Wishlist item {} not found", id)));
        }

        load_item(&conn, id)
    }

    /// Delete an item and close the gap in priorities
    pub fn delete_wishlist_item(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        with_transaction(&conn, |conn| {
            let item = load_item(conn, id)?;
            conn.execute("DELETE FROM wishlist_items WHERE id = ?", params![id])?;
            let remaining = ordered_ids(conn, item.user_id)?;
            write_priorities(conn, &remaining)
        })?;

        info!(item_id = id, "Deleted wishlist item");
        Ok(())
    }

    /// Move the item at priority `from` to priority `to`
    pub fn move_wishlist_item(
        &self,
        user_id: i64,
        from: usize,
        to: usize,
    ) -> Result<Vec<WishlistItem>> {
        self.require_user(user_id)?;

        let conn = self.conn()?;
        with_transaction(&conn, |conn| {
            let mut ids = ordered_ids(conn, user_id)?;
            reorder::move_item(&mut ids, from, to)?;
            write_priorities(conn, &ids)
        })?;

        load_wishlist(&conn, user_id)
    }

    /// Replace the whole order; `ids` must list every item exactly once
    pub fn set_wishlist_order(&self, user_id: i64, ids: &[i64]) -> Result<Vec<WishlistItem>> {
        self.require_user(user_id)?;

        let conn = self.conn()?;
        with_transaction(&conn, |conn| {
            let current = ordered_ids(conn, user_id)?;
            if !reorder::is_permutation(&current, ids) {
                return Err(Error::InvalidData(
                    "Order must list each wishlist item exactly once".to_string(),
                ));
            }
            write_priorities(conn, ids)
        })?;

        load_wishlist(&conn, user_id)
    }

    /// Savings progress toward every wishlist item
    pub fn wishlist_progress(
        &self,
        user_id: i64,
        monthly_contribution: f64,
        annual_rate_percent: f64,
    ) -> Result<Vec<WishlistProgress>> {
        if !monthly_contribution.is_finite() || monthly_contribution < 0.0 {
            return Err(Error::InvalidData(
                "monthly_contribution must be a non-negative number".to_string(),
            ));
        }
        if !(0.0..=MAX_ANNUAL_RATE_PERCENT).contains(&annual_rate_percent) {
            return Err(Error::InvalidData(format!(
                "annual_rate_percent must be between 0 and {}",
                MAX_ANNUAL_RATE_PERCENT
            )));
        }

        let balance = self.get_balance(user_id)?.current_amount;
        let items = self.list_wishlist(user_id)?;

        Ok(items
            .into_iter()
            .map(|item| {
                let progress_percent = if item.price <= 0.0 {
                    100.0
                } else {
                    ((balance / item.price * 100.0).min(100.0) * 100.0).round() / 100.0
                };
                WishlistProgress {
                    item_id: item.id,
                    progress_percent,
                    remaining: ((item.price - balance).max(0.0) * 100.0).round() / 100.0,
                    months_to_afford: months_to_reach(
                        balance,
                        monthly_contribution,
                        annual_rate_percent,
                        item.price,
                        MAX_AFFORD_MONTHS,
                    ),
                    name: item.name,
                    price: item.price,
                    priority: item.priority,
                }
            })
            .collect())
    }
}
