//! Chore and quest commands

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use moneykids_core::models::{Difficulty, NewTask, TaskFrequency, TaskStatus};
use moneykids_core::Database;

use super::{format_money, truncate};

/// Parse a YYYY-MM-DD deadline as the end of that day (UTC)
pub fn parse_deadline(input: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid deadline '{}', expected YYYY-MM-DD", input))?;
    let end_of_day = date
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| anyhow!("Invalid deadline '{}'", input))?;
    Ok(end_of_day.and_utc())
}

pub fn cmd_tasks_list(db: &Database, user_id: Option<i64>, status: Option<&str>) -> Result<()> {
    let status = status
        .map(|s| s.parse::<TaskStatus>().map_err(|e| anyhow!(e)))
        .transpose()?;
    let tasks = db.list_tasks(user_id, status)?;

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    println!();
    println!("📋 Tasks");
    println!("   ─────────────────────────────────────────────────────────────");

    for task in tasks {
        let detail = match (task.frequency, task.difficulty) {
            (Some(freq), _) => freq.to_string(),
            (None, Some(difficulty)) => format!("{} quest", difficulty),
            (None, None) => task.kind.to_string(),
        };
        let deadline = task
            .deadline
            .map(|d| format!(" (due {})", d.format("%Y-%m-%d")))
            .unwrap_or_default();

        println!(
            "   {:>4} │ {:<28} │ {:>8} │ {:<12} │ {}{}",
            task.id,
            truncate(&task.title, 28),
            format_money(task.reward),
            task.status.as_str(),
            detail,
            deadline
        );
    }

    Ok(())
}

pub fn cmd_tasks_add(
    db: &Database,
    user_id: i64,
    title: &str,
    reward: f64,
    frequency: &str,
    description: Option<&str>,
) -> Result<()> {
    let frequency: TaskFrequency = frequency
        .parse()
        .map_err(|e: String| anyhow!(e))
        .context("Invalid --frequency")?;

    let mut task = NewTask::regular(user_id, title, reward, frequency);
    task.description = description.map(str::to_string);

    let task = db.create_task(&task)?;
    println!(
        "✅ Added chore #{} '{}' ({}, reward {})",
        task.id,
        task.title,
        frequency,
        format_money(task.reward)
    );
    Ok(())
}

pub fn cmd_tasks_quest(
    db: &Database,
    user_id: i64,
    title: &str,
    reward: f64,
    difficulty: &str,
    deadline: Option<&str>,
    description: Option<&str>,
) -> Result<()> {
    let difficulty: Difficulty = difficulty
        .parse()
        .map_err(|e: String| anyhow!(e))
        .context("Invalid --difficulty")?;

    let mut task = NewTask::quest(user_id, title, reward, difficulty);
    task.description = description.map(str::to_string);
    task.deadline = deadline.map(parse_deadline).transpose()?;

    let task = db.create_task(&task)?;
    println!(
        "⚔️  Added {} quest #{} '{}' (reward {})",
        difficulty,
        task.id,
        task.title,
        format_money(task.reward)
    );
    Ok(())
}

pub fn cmd_tasks_accept(db: &Database, id: i64) -> Result<()> {
    let task = db.accept_quest(id)?;
    println!("⚔️  Quest '{}' accepted", task.title);
    Ok(())
}

pub fn cmd_tasks_complete(db: &Database, id: i64) -> Result<()> {
    let completion = db.complete_task(id)?;

    match &completion.transaction {
        Some(tx) => println!(
            "🎉 '{}' done! Paid {}. New balance: {}",
            completion.task.title,
            format_money(tx.amount),
            format_money(completion.balance)
        ),
        None => println!("🎉 '{}' done!", completion.task.title),
    }
    if completion.task.status == TaskStatus::Pending {
        println!("   This chore repeats and is ready to be done again.");
    }
    Ok(())
}

pub fn cmd_tasks_cancel(db: &Database, id: i64) -> Result<()> {
    let task = db.update_task_status(id, TaskStatus::Cancelled)?;
    println!("🚫 '{}' cancelled", task.title);
    Ok(())
}

pub fn cmd_tasks_remove(db: &Database, id: i64) -> Result<()> {
    db.delete_task(id)?;
    println!("🗑️  Task {} deleted", id);
    Ok(())
}
