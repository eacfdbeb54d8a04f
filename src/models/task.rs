use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A work item as stored and as returned by the API.
///
/// The id is assigned by the store and immutable once set; `created_at` and
/// `updated_at` are likewise store-owned. Tasks carry no owner: they are
/// global to the deployment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a task.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskCreateRequest {
    /// Required, non-blank (whitespace-only counts as blank).
    #[validate(length(max = 200), custom = "not_blank")]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Payload for partially updating a task.
///
/// Every field is independently optional; omitted fields leave the stored
/// value unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskUpdateRequest {
    #[validate(length(max = 200), custom = "not_blank")]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub completed: Option<bool>,
}

/// Fields the task service hands to the store on insert. `completed` is not
/// here: a new task is always open.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
}

/// Field-wise overwrite set for an update; `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("non_blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
