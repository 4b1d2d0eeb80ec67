//! User operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_column, parse_datetime, with_transaction, Database};
use crate::error::{Error, Result};
use crate::models::{User, UserRole};

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let role_str: String = row.get(2)?;
    let created_at_str: String = row.get(3)?;

    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        role: parse_column(2, &role_str)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Create a user together with their zero balance
    pub fn create_user(&self, name: &str, role: UserRole) -> Result<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("Name must not be empty".to_string()));
        }

        let conn = self.conn()?;
        let id = with_transaction(&conn, |conn| {
            conn.execute(
                "INSERT INTO users (name, role) VALUES (?, ?)",
                params![name, role.as_str()],
            )?;
            let id = conn.last_insert_rowid();
            conn.execute("INSERT INTO balances (user_id) VALUES (?)", params![id])?;
            Ok(id)
        })?;
        drop(conn);

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))
    }

    /// List all users
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, role, created_at FROM users ORDER BY id")?;

        let users = stmt
            .query_map([], row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, name, role, created_at FROM users WHERE id = ?",
                params![id],
                row_to_user,
            )
            .optional()?;

        Ok(user)
    }

    /// Get a user or fail with `NotFound`
    pub(crate) fn require_user(&self, id: i64) -> Result<User> {
        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))
    }

    /// Delete a user and everything they own
    pub fn delete_user(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM users WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }
}
