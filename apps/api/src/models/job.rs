use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A posting in the catalog. Created and deleted by admins only; deletion
/// cascades to every application referencing it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub job_type: String,
    pub company: String,
    pub description: String,
    /// Email of the posting admin (by value, not a foreign key).
    pub posted_by: String,
    pub posted_at: DateTime<Utc>,
}

/// A job annotated with its current applicant count. The count is derived
/// per listing call, never stored.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: Job,
    pub applicant_count: i64,
}
