//!
//! # Persistence Layer
//!
//! Store traits and their implementations. Services depend on the traits
//! only; `main` wires in the Postgres implementations while tests use the
//! in-memory ones, keeping business-logic tests deterministic and free of a
//! running database.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewTask, NewUser, Task, TaskPatch, User};

/// Credential store: persisted user records keyed by unique email.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Inserts a new user. The store's uniqueness constraint is the
    /// authoritative guard: a duplicate email yields `Conflict` even when a
    /// caller's existence check passed moments earlier.
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError>;
}

/// Task store: persisted work items with store-assigned ids and timestamps.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, new_task: NewTask) -> Result<Task, AppError>;

    async fn list(&self) -> Result<Vec<Task>, AppError>;

    async fn get(&self, id: i64) -> Result<Option<Task>, AppError>;

    /// Applies the patch field-wise; `None` fields keep their stored value.
    /// Returns `None` when no task has the given id.
    async fn update(&self, id: i64, patch: TaskPatch) -> Result<Option<Task>, AppError>;

    /// Returns `false` when no task had the given id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
