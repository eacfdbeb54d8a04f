//!
//! In-memory stores.
//!
//! These reproduce the persistence contract — store-assigned monotonic ids,
//! store-owned timestamps, uniqueness enforced at insert — without a
//! database. They are the test doubles used across the unit and integration
//! suites.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, AtomicI64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::AppError;
use crate::models::{NewTask, NewUser, Task, TaskPatch, User};
use crate::store::{TaskStore, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
    next_id: AtomicI32,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().expect("user store lock poisoned");
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().expect("user store lock poisoned");

        // Duplicate check and insert happen under one lock, mirroring the
        // atomicity of the database's unique constraint.
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict("Resource already exists".into()));
        }

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<BTreeMap<i64, Task>>,
    next_id: AtomicI64,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, new_task: NewTask) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().expect("task store lock poisoned");
        let now = Utc::now();
        let task = Task {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            title: new_task.title,
            description: new_task.description,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn list(&self) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().expect("task store lock poisoned");
        Ok(tasks.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.read().expect("task store lock poisoned");
        Ok(tasks.get(&id).cloned())
    }

    async fn update(&self, id: i64, patch: TaskPatch) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().expect("task store lock poisoned");
        let Some(task) = tasks.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        task.updated_at = Utc::now();

        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tasks = self.tasks.write().expect("task store lock poisoned");
        Ok(tasks.remove(&id).is_some())
    }
}
