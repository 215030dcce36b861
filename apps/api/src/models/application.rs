use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One user's application to one job. At most one row may exist per
/// (job_id, user_email) — enforced by the schema, not application logic.
/// Never updated; deleted only as a cascade of job deletion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_email: String,
    /// Display name snapshot taken at apply time.
    pub user_name: String,
    /// Relative path of the stored resume artifact, e.g. `uploads/<name>`.
    pub resume_path: String,
    pub applied_at: DateTime<Utc>,
}
