use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::{SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use crate::domain::{
    repository::TodoRepository,
    todo::{Todo, TodoDraft, TodoId},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                due_date TEXT,
                is_resolved INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn create(&self, draft: TodoDraft) -> Result<Todo> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO todos (title, description, due_date, is_resolved, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.due_date.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(draft.is_resolved)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&*self.pool)
        .await?;
        Ok(Todo {
            id: TodoId(result.last_insert_rowid()),
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            is_resolved: draft.is_resolved,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, id: TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query(
            "SELECT id, title, description, due_date, is_resolved, created_at, updated_at
             FROM todos WHERE id = ?1",
        )
        .bind(id.0)
        .fetch_optional(&*self.pool)
        .await?;
        row.map(row_to_todo).transpose()
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query(
            "SELECT id, title, description, due_date, is_resolved, created_at, updated_at
             FROM todos ORDER BY id ASC",
        )
        .fetch_all(&*self.pool)
        .await?;
        rows.into_iter().map(row_to_todo).collect()
    }

    async fn update(&self, id: TodoId, draft: TodoDraft) -> Result<Option<Todo>> {
        let Some(existing) = self.get(id).await? else { return Ok(None) };
        let now = Utc::now();
        sqlx::query(
            "UPDATE todos SET title = ?2, description = ?3, due_date = ?4, is_resolved = ?5, updated_at = ?6
             WHERE id = ?1",
        )
        .bind(id.0)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.due_date.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(draft.is_resolved)
        .bind(now.to_rfc3339())
        .execute(&*self.pool)
        .await?;
        Ok(Some(Todo {
            id,
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            is_resolved: draft.is_resolved,
            created_at: existing.created_at,
            updated_at: now,
        }))
    }

    async fn delete(&self, id: TodoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_todo(row: SqliteRow) -> Result<Todo> {
    let due_date: Option<String> = row.get("due_date");
    let due_date = due_date
        .map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT))
        .transpose()?;
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Todo {
        id: TodoId(row.get("id")),
        title: row.get("title"),
        description: row.get("description"),
        due_date,
        is_resolved: row.get("is_resolved"),
        created_at: DateTime::parse_from_rfc3339(&created_at)?.with_timezone(&Utc),
        updated_at: DateTime::parse_from_rfc3339(&updated_at)?.with_timezone(&Utc),
    })
}
