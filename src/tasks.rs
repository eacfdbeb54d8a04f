use std::sync::Arc;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskCreateRequest, TaskPatch, TaskUpdateRequest};
use crate::store::TaskStore;

/// CRUD over tasks.
///
/// Tasks are global: the request identity is never consulted here. The store
/// assigns ids and owns both timestamps.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Creates a task. A new task is always open (`completed = false`).
    pub async fn create(&self, input: TaskCreateRequest) -> Result<Task, AppError> {
        if input.title.trim().is_empty() {
            return Err(AppError::Validation("title: must not be blank".into()));
        }

        self.store
            .insert(NewTask {
                title: input.title,
                description: input.description,
            })
            .await
    }

    /// All tasks, in the store's native order.
    pub async fn list(&self) -> Result<Vec<Task>, AppError> {
        self.store.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Task, AppError> {
        self.store.get(id).await?.ok_or_else(|| task_not_found(id))
    }

    /// Applies a partial update: provided fields overwrite, absent fields
    /// are preserved, and the store bumps `updated_at`.
    pub async fn update(&self, id: i64, input: TaskUpdateRequest) -> Result<Task, AppError> {
        if let Some(title) = &input.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("title: must not be blank".into()));
            }
        }

        let patch = TaskPatch {
            title: input.title,
            description: input.description,
            completed: input.completed,
        };

        self.store
            .update(id, patch)
            .await?
            .ok_or_else(|| task_not_found(id))
    }

    /// Removes a task permanently.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(task_not_found(id))
        }
    }
}

fn task_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Task not found with id: {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryTaskStore;
    use pretty_assertions::assert_eq;

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryTaskStore::new()))
    }

    fn create_request(title: &str) -> TaskCreateRequest {
        TaskCreateRequest {
            title: title.to_string(),
            description: None,
        }
    }

    #[actix_rt::test]
    async fn test_create_rejects_blank_title() {
        let service = service();

        for blank in ["", "   ", "\t\n"] {
            match service.create(create_request(blank)).await {
                Err(AppError::Validation(_)) => {}
                other => panic!("expected Validation for {:?}, got {:?}", blank, other),
            }
        }
    }

    #[actix_rt::test]
    async fn test_create_defaults_and_assigned_id() {
        let service = service();

        let task = service
            .create(TaskCreateRequest {
                title: "Ship the release".to_string(),
                description: Some("Cut the tag first".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(task.id, 1);
        assert!(!task.completed);
        assert_eq!(task.title, "Ship the release");
        assert_eq!(task.description.as_deref(), Some("Cut the tag first"));
    }

    #[actix_rt::test]
    async fn test_update_with_completed_only_preserves_other_fields() {
        let service = service();
        let task = service
            .create(TaskCreateRequest {
                title: "Review the patch".to_string(),
                description: Some("Branch feature/auth".to_string()),
            })
            .await
            .unwrap();

        let updated = service
            .update(
                task.id,
                TaskUpdateRequest {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Review the patch");
        assert_eq!(updated.description.as_deref(), Some("Branch feature/auth"));
        assert!(updated.completed);
    }

    #[actix_rt::test]
    async fn test_update_rejects_blank_title() {
        let service = service();
        let task = service.create(create_request("Valid")).await.unwrap();

        let result = service
            .update(
                task.id,
                TaskUpdateRequest {
                    title: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[actix_rt::test]
    async fn test_missing_id_yields_not_found_everywhere() {
        let service = service();

        assert!(matches!(service.get(42).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            service.delete(42).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.update(42, TaskUpdateRequest::default()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_rt::test]
    async fn test_list_returns_all_tasks() {
        let service = service();
        service.create(create_request("one")).await.unwrap();
        service.create(create_request("two")).await.unwrap();

        let tasks = service.list().await.unwrap();
        assert_eq!(tasks.len(), 2);
    }
}
