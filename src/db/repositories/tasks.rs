use anyhow::{anyhow, bail, Result};
use chrono::{NaiveDate, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    helpers::{format_date, format_datetime, parse_date, parse_datetime},
    models::Task,
};

fn row_to_task(row: &Row) -> Result<Task> {
    let created_at: String = row.get("created_at")?;
    let is_completed: i64 = row.get("is_completed")?;
    let due_date: Option<String> = row.get("due_date")?;

    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        is_completed: is_completed != 0,
        due_date: due_date
            .map(|value| parse_date(&value, "due_date"))
            .transpose()?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

fn fetch_task(conn: &Connection, task_id: i64) -> Result<Option<Task>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, is_completed, due_date, created_at
         FROM tasks
         WHERE id = ?1",
    )?;
    let task = stmt
        .query_row(params![task_id], |row| Ok(row_to_task(row)))
        .optional()?
        .transpose()?;
    Ok(task)
}

impl Database {
    /// Creates an open task. Titles are trimmed and must not be empty.
    pub async fn create_task(&self, title: &str, due_date: Option<NaiveDate>) -> Result<Task> {
        let title = title.trim().to_string();
        if title.is_empty() {
            bail!("Task title must not be empty");
        }

        self.execute(move |conn| {
            let now = Utc::now().trunc_subsecs(3);
            conn.execute(
                "INSERT INTO tasks (title, is_completed, due_date, created_at)
                 VALUES (?1, 0, ?2, ?3)",
                params![
                    title,
                    due_date.as_ref().map(format_date),
                    format_datetime(&now)
                ],
            )?;

            let task_id = conn.last_insert_rowid();
            fetch_task(conn, task_id)?.ok_or_else(|| anyhow!("Task not found after insert"))
        })
        .await
    }

    /// Newest first.
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, is_completed, due_date, created_at
                 FROM tasks
                 ORDER BY created_at DESC, id DESC",
            )?;

            let mut rows = stmt.query([])?;
            let mut tasks = Vec::new();
            while let Some(row) = rows.next()? {
                tasks.push(row_to_task(row)?);
            }
            Ok(tasks)
        })
        .await
    }

    /// Open tasks before completed ones, newest first within each group.
    pub async fn task_summary(&self, limit: usize) -> Result<Vec<Task>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, is_completed, due_date, created_at
                 FROM tasks
                 ORDER BY is_completed ASC, created_at DESC, id DESC
                 LIMIT ?1",
            )?;

            let mut rows = stmt.query(params![limit])?;
            let mut tasks = Vec::new();
            while let Some(row) = rows.next()? {
                tasks.push(row_to_task(row)?);
            }
            Ok(tasks)
        })
        .await
    }

    pub async fn set_task_completed(&self, task_id: i64, is_completed: bool) -> Result<Task> {
        self.execute(move |conn| {
            let updated = conn.execute(
                "UPDATE tasks SET is_completed = ?1 WHERE id = ?2",
                params![is_completed, task_id],
            )?;
            if updated == 0 {
                bail!("Task {task_id} not found");
            }
            fetch_task(conn, task_id)?.ok_or_else(|| anyhow!("Task {task_id} not found"))
        })
        .await
    }

    pub async fn delete_task(&self, task_id: i64) -> Result<()> {
        self.execute(move |conn| {
            let deleted = conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            if deleted == 0 {
                bail!("Task {task_id} not found");
            }
            Ok(())
        })
        .await
    }
}
