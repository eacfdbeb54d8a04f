//!
//! PostgreSQL-backed stores.
//!
//! All consistency relies on single-statement atomicity: inserts and updates
//! use `RETURNING` so the store-assigned id and timestamps come back in the
//! same round-trip, and the task update uses `COALESCE` so absent patch
//! fields keep their stored values. Unique-constraint violations surface as
//! `sqlx::Error` and convert to `Conflict` in `error.rs`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{NewTask, NewUser, Task, TaskPatch, User};
use crate::store::{TaskStore, UserStore};

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, role) VALUES ($1, $2, $3) \
             RETURNING id, email, password_hash, role, created_at",
        )
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}

pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn insert(&self, new_task: NewTask) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (title, description) VALUES ($1, $2) \
             RETURNING id, title, description, completed, created_at, updated_at",
        )
        .bind(&new_task.title)
        .bind(&new_task.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn list(&self) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, title, description, completed, created_at, updated_at FROM tasks",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn get(&self, id: i64) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            "SELECT id, title, description, completed, created_at, updated_at \
             FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn update(&self, id: i64, patch: TaskPatch) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 completed = COALESCE($4, completed), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING id, title, description, completed, created_at, updated_at",
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.completed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
