//! Balance, transaction and forecast operations

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::{format_datetime, parse_column, parse_datetime, with_transaction, Database};
use crate::error::{Error, Result};
use crate::forecast::{self, HISTORY_DAYS, MAX_FORECAST_DAYS};
use crate::models::{
    achievement_rate, Balance, BalanceSummary, ForecastPoint, NewTransaction, Transaction,
};

const TRANSACTION_COLUMNS: &str =
    "id, user_id, amount, transaction_type, description, task_id, created_at";

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn row_to_transaction(row: &Row) -> rusqlite::Result<Transaction> {
    let type_str: String = row.get(3)?;
    let created_at_str: String = row.get(6)?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        transaction_type: parse_column(3, &type_str)?,
        description: row.get(4)?,
        task_id: row.get(5)?,
        created_at: parse_datetime(&created_at_str),
    })
}

/// Move money on an open write transaction.
///
/// The caller owns the surrounding SQL transaction; this only checks funds,
/// updates the balance row and inserts the ledger entry.
pub(crate) fn apply_transaction(
    conn: &Connection,
    user_id: i64,
    tx: &NewTransaction,
    task_id: Option<i64>,
) -> Result<Transaction> {
    let current: f64 = conn
        .query_row(
            "SELECT current_amount FROM balances WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))?;

    let signed = if tx.transaction_type.is_credit() {
        tx.amount
    } else {
        -tx.amount
    };
    let new_balance = round_cents(current + signed);
    if new_balance < 0.0 {
        return Err(Error::InsufficientFunds {
            balance: current,
            requested: tx.amount,
        });
    }

    conn.execute(
        "UPDATE balances SET current_amount = ?, updated_at = CURRENT_TIMESTAMP WHERE user_id = ?",
        params![new_balance, user_id],
    )?;
    conn.execute(
        r#"
        INSERT INTO transactions (user_id, amount, transaction_type, description, task_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
        params![
            user_id,
            tx.amount,
            tx.transaction_type.as_str(),
            tx.description,
            task_id
        ],
    )?;
    let id = conn.last_insert_rowid();

    let transaction = conn.query_row(
        &format!("SELECT {} FROM transactions WHERE id = ?", TRANSACTION_COLUMNS),
        params![id],
        row_to_transaction,
    )?;
    Ok(transaction)
}

impl Database {
    /// Get the stored balance for a user
    pub fn get_balance(&self, user_id: i64) -> Result<Balance> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT user_id, current_amount, savings_goal, updated_at FROM balances WHERE user_id = ?",
            params![user_id],
            |row| {
                let updated_at_str: String = row.get(3)?;
                Ok(Balance {
                    user_id: row.get(0)?,
                    current_amount: row.get(1)?,
                    savings_goal: row.get(2)?,
                    updated_at: parse_datetime(&updated_at_str),
                })
            },
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))
    }

    /// Record a money movement and update the balance atomically
    pub fn record_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<Transaction> {
        tx.validate()?;

        let conn = self.conn()?;
        let transaction = with_transaction(&conn, |conn| apply_transaction(conn, user_id, tx, None))?;

        info!(
            user_id,
            amount = tx.amount,
            kind = %tx.transaction_type,
            "Recorded transaction"
        );
        Ok(transaction)
    }

    /// Pay money into a user's balance
    pub fn deposit(
        &self,
        user_id: i64,
        amount: f64,
        description: Option<&str>,
    ) -> Result<Transaction> {
        self.record_transaction(user_id, &NewTransaction::deposit(amount, description))
    }

    /// Take money out of a user's balance
    pub fn withdraw(
        &self,
        user_id: i64,
        amount: f64,
        description: Option<&str>,
    ) -> Result<Transaction> {
        self.record_transaction(user_id, &NewTransaction::withdrawal(amount, description))
    }

    /// List a user's transactions, newest first
    pub fn list_transactions(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Transaction>> {
        self.require_user(user_id)?;

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}
            FROM transactions
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![user_id, limit, offset.max(0)], row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    fn transactions_since(&self, user_id: i64, since: DateTime<Utc>) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE user_id = ? AND created_at >= ?",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![user_id, format_datetime(&since)], row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Set or clear the savings goal
    pub fn set_savings_goal(&self, user_id: i64, goal: Option<f64>) -> Result<Balance> {
        if let Some(goal) = goal {
            if !goal.is_finite() || goal <= 0.0 {
                return Err(Error::InvalidData(
                    "Savings goal must be greater than zero".to_string(),
                ));
            }
        }

        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE balances SET savings_goal = ?, updated_at = CURRENT_TIMESTAMP WHERE user_id = ?",
            params![goal, user_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("User {} not found", user_id)));
        }
        drop(conn);

        self.get_balance(user_id)
    }

    /// Balance with last activity and goal progress
    pub fn balance_summary(&self, user_id: i64) -> Result<BalanceSummary> {
        let balance = self.get_balance(user_id)?;
        let last = self.list_transactions(user_id, 0, 1)?.into_iter().next();

        Ok(BalanceSummary {
            user_id,
            current_balance: balance.current_amount,
            last_transaction_amount: last.as_ref().map(|t| t.amount),
            last_transaction_type: last.as_ref().map(|t| t.transaction_type),
            last_transaction_date: last.as_ref().map(|t| t.created_at),
            savings_goal: balance.savings_goal,
            achievement_rate: achievement_rate(balance.current_amount, balance.savings_goal),
        })
    }

    /// Linear forecast of the balance for `days` days starting at `now`
    pub fn balance_forecast(
        &self,
        user_id: i64,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<ForecastPoint>> {
        if days > MAX_FORECAST_DAYS {
            return Err(Error::InvalidData(format!(
                "Forecast is limited to {} days",
                MAX_FORECAST_DAYS
            )));
        }

        let balance = self.get_balance(user_id)?;
        let recent = self.transactions_since(user_id, now - Duration::days(HISTORY_DAYS))?;
        let average = forecast::daily_average(&recent, now);

        debug!(user_id, days, average, "Computed balance forecast");
        Ok(forecast::linear_forecast(
            balance.current_amount,
            average,
            now.date_naive(),
            days,
        ))
    }
}
