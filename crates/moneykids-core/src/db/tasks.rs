//! Task operations (chores and quests)

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

use super::balance::apply_transaction;
use super::{format_datetime, parse_column, parse_datetime, with_transaction, Database};
use crate::error::{Error, Result};
use crate::models::{
    NewTask, NewTransaction, Task, TaskCompletion, TaskKind, TaskStatus, TaskUpdate,
};

const TASK_SELECT: &str = r#"
    SELECT t.id, t.user_id, t.title, t.description, t.reward, t.kind, t.frequency,
           t.difficulty, t.status, t.progress, t.deadline,
           (SELECT COUNT(*) FROM task_completions c WHERE c.task_id = t.id),
           t.created_at, t.updated_at
    FROM tasks t
"#;

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let kind_str: String = row.get(5)?;
    let frequency_str: Option<String> = row.get(6)?;
    let difficulty_str: Option<String> = row.get(7)?;
    let status_str: String = row.get(8)?;
    let progress: i64 = row.get(9)?;
    let deadline_str: Option<String> = row.get(10)?;
    let created_at_str: String = row.get(12)?;
    let updated_at_str: String = row.get(13)?;

    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        reward: row.get(4)?,
        kind: parse_column(5, &kind_str)?,
        frequency: frequency_str.map(|s| parse_column(6, &s)).transpose()?,
        difficulty: difficulty_str.map(|s| parse_column(7, &s)).transpose()?,
        status: parse_column(8, &status_str)?,
        progress: progress.clamp(0, 100) as u8,
        deadline: deadline_str.map(|s| parse_datetime(&s)),
        completion_count: row.get(11)?,
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

fn load_task(conn: &Connection, id: i64) -> Result<Task> {
    conn.query_row(&format!("{} WHERE t.id = ?", TASK_SELECT), params![id], row_to_task)
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Task {} not found", id)))
}

fn reject_terminal(task: &Task) -> Result<()> {
    if task.status.is_terminal() {
        return Err(Error::InvalidTransition(format!(
            "Task {} is already {}",
            task.id, task.status
        )));
    }
    Ok(())
}

impl Database {
    /// Create a chore or quest
    pub fn create_task(&self, task: &NewTask) -> Result<Task> {
        task.validate()?;
        self.require_user(task.user_id)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO tasks (user_id, title, description, reward, kind, frequency, difficulty, deadline)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                task.user_id,
                task.title.trim(),
                task.description,
                task.reward,
                task.kind.as_str(),
                task.frequency.map(|f| f.as_str()),
                task.difficulty.map(|d| d.as_str()),
                task.deadline.as_ref().map(format_datetime),
            ],
        )?;
        let id = conn.last_insert_rowid();

        info!(task_id = id, user_id = task.user_id, kind = %task.kind, "Created task");
        load_task(&conn, id)
    }

    /// Get a task by ID
    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let conn = self.conn()?;
        let task = conn
            .query_row(&format!("{} WHERE t.id = ?", TASK_SELECT), params![id], row_to_task)
            .optional()?;
        Ok(task)
    }

    /// List tasks, optionally for one user and one status
    pub fn list_tasks(&self, user_id: Option<i64>, status: Option<TaskStatus>) -> Result<Vec<Task>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            {}
            WHERE (?1 IS NULL OR t.user_id = ?1)
              AND (?2 IS NULL OR t.status = ?2)
            ORDER BY t.deadline IS NULL, t.deadline, t.id
            "#,
            TASK_SELECT
        ))?;

        let tasks = stmt
            .query_map(params![user_id, status.map(|s| s.as_str())], row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// Apply a partial update to an open task
    pub fn update_task(&self, id: i64, update: &TaskUpdate) -> Result<Task> {
        let conn = self.conn()?;
        let task = load_task(&conn, id)?;
        reject_terminal(&task)?;
        update.validate(task.kind)?;

        conn.execute(
            r#"
            UPDATE tasks SET
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                reward = COALESCE(?, reward),
                frequency = COALESCE(?, frequency),
                difficulty = COALESCE(?, difficulty),
                deadline = COALESCE(?, deadline),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
            params![
                update.title.as_deref().map(str::trim),
                update.description,
                update.reward,
                update.frequency.map(|f| f.as_str()),
                update.difficulty.map(|d| d.as_str()),
                update.deadline.as_ref().map(format_datetime),
                id
            ],
        )?;

        load_task(&conn, id)
    }

    /// Move a task to a new status.
    ///
    /// Moving to `completed` goes through [`Database::complete_task`] so the
    /// reward is always paid.
    pub fn update_task_status(&self, id: i64, status: TaskStatus) -> Result<Task> {
        if status == TaskStatus::Completed {
            return Ok(self.complete_task(id)?.task);
        }

        let conn = self.conn()?;
        let task = load_task(&conn, id)?;
        if !task.status.can_transition_to(status) {
            return Err(Error::InvalidTransition(format!(
                "Task {} cannot move from {} to {}",
                id, task.status, status
            )));
        }

        conn.execute(
            "UPDATE tasks SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            params![status.as_str(), id],
        )?;

        info!(task_id = id, from = %task.status, to = %status, "Task status changed");
        load_task(&conn, id)
    }

    /// Delete a task (its transactions stay in the ledger)
    pub fn delete_task(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM tasks WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Task {} not found", id)));
        }
        Ok(())
    }

    /// Start working on a pending quest
    pub fn accept_quest(&self, id: i64) -> Result<Task> {
        let task = self
            .get_task(id)?
            .ok_or_else(|| Error::NotFound(format!("Task {} not found", id)))?;
        if task.kind != TaskKind::Quest {
            return Err(Error::InvalidData(format!("Task {} is not a quest", id)));
        }
        if task.status != TaskStatus::Pending {
            return Err(Error::InvalidTransition(format!(
                "Quest {} is {}, only pending quests can be accepted",
                id, task.status
            )));
        }
        self.update_task_status(id, TaskStatus::InProgress)
    }

    /// Record quest progress in percent
    pub fn set_task_progress(&self, id: i64, progress: u8) -> Result<Task> {
        if progress > 100 {
            return Err(Error::InvalidData(
                "Progress must be between 0 and 100".to_string(),
            ));
        }

        let conn = self.conn()?;
        let task = load_task(&conn, id)?;
        if task.kind != TaskKind::Quest {
            return Err(Error::InvalidData(format!("Task {} is not a quest", id)));
        }
        reject_terminal(&task)?;

        conn.execute(
            "UPDATE tasks SET progress = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            params![progress, id],
        )?;
        load_task(&conn, id)
    }

    /// Complete a task and pay its reward in one SQL transaction.
    ///
    /// Recurring chores go back to `pending` for the next cycle; quests and
    /// one-time chores end as `completed`.
    pub fn complete_task(&self, id: i64) -> Result<TaskCompletion> {
        let conn = self.conn()?;

        let completion = with_transaction(&conn, |conn| {
            let task = load_task(conn, id)?;
            reject_terminal(&task)?;

            let transaction = if task.reward > 0.0 {
                let reward = NewTransaction {
                    amount: task.reward,
                    transaction_type: task.kind.reward_type(),
                    description: Some(format!("Reward: {}", task.title)),
                };
                Some(apply_transaction(conn, task.user_id, &reward, Some(task.id))?)
            } else {
                None
            };

            conn.execute(
                "INSERT INTO task_completions (task_id, user_id, reward, transaction_id) VALUES (?, ?, ?, ?)",
                params![task.id, task.user_id, task.reward, transaction.as_ref().map(|t| t.id)],
            )?;

            let recurring = task.kind == TaskKind::Regular
                && task.frequency.map(|f| f.is_recurring()).unwrap_or(false);
            let (status, progress) = if recurring {
                (TaskStatus::Pending, 0)
            } else {
                (TaskStatus::Completed, 100)
            };
            conn.execute(
                "UPDATE tasks SET status = ?, progress = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
                params![status.as_str(), progress, id],
            )?;

            let balance: f64 = conn.query_row(
                "SELECT current_amount FROM balances WHERE user_id = ?",
                params![task.user_id],
                |row| row.get(0),
            )?;

            Ok(TaskCompletion {
                task: load_task(conn, id)?,
                transaction,
                balance,
            })
        })?;

        info!(
            task_id = id,
            reward = completion.task.reward,
            balance = completion.balance,
            "Task completed"
        );
        Ok(completion)
    }
}
