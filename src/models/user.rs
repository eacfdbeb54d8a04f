use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Role assigned to every account on registration. There is no path by which
/// a caller can request a different one.
pub const DEFAULT_ROLE: &str = "USER";

/// A persisted identity record, owned exclusively by the credential store.
///
/// Immutable after creation; no exposed operation updates or deletes it.
/// The password hash never leaves the process: it is skipped on
/// serialization so no response body can carry it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Fields the auth service hands to the credential store on registration.
/// The password has already been hashed by the time this exists.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: String,
}
