//! Job catalog: posting lifecycle and applicant listings.

pub mod handlers;

use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::Application;
use crate::models::job::{Job, JobWithCount};
use crate::storage::ResumeStore;

/// All jobs, most recent first, each annotated with its current applicant
/// count. The count is derived per call, never stored.
pub async fn list_jobs(pool: &PgPool) -> Result<Vec<JobWithCount>, AppError> {
    let jobs = sqlx::query_as(
        "SELECT j.id, j.title, j.job_type, j.company, j.description, j.posted_by, j.posted_at, \
                COUNT(a.id) AS applicant_count \
         FROM jobs j \
         LEFT JOIN applications a ON a.job_id = j.id \
         GROUP BY j.id \
         ORDER BY j.posted_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(jobs)
}

pub struct NewJob<'a> {
    pub title: &'a str,
    pub job_type: &'a str,
    pub company: &'a str,
    pub description: &'a str,
    /// Email of the posting admin.
    pub posted_by: &'a str,
}

/// Creates a posting. No dedup check: identical postings are permitted.
pub async fn create_job(pool: &PgPool, new: NewJob<'_>) -> Result<Job, AppError> {
    let job = sqlx::query_as(
        "INSERT INTO jobs (id, title, job_type, company, description, posted_by, posted_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(new.title)
    .bind(new.job_type)
    .bind(new.company)
    .bind(new.description)
    .bind(new.posted_by)
    .bind(chrono::Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(job)
}

/// Deletes a posting and cascades to every application referencing it, in one
/// transaction. Unknown ids are a silent no-op. Resume files of the cascaded
/// applications are removed best-effort after commit; a failed removal is
/// logged and never fails the delete.
pub async fn delete_job(
    pool: &PgPool,
    store: &dyn ResumeStore,
    job_id: Uuid,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(&mut *tx)
        .await?;
    let resume_paths: Vec<String> =
        sqlx::query_scalar("DELETE FROM applications WHERE job_id = $1 RETURNING resume_path")
            .bind(job_id)
            .fetch_all(&mut *tx)
            .await?;

    tx.commit().await?;

    if deleted.rows_affected() == 0 {
        debug!(%job_id, "delete of unknown job id; nothing to do");
        return Ok(());
    }

    info!(%job_id, applications = resume_paths.len(), "job deleted with cascade");
    for path in resume_paths {
        if let Err(e) = store.remove(&path).await {
            warn!(%path, error = %e, "failed to remove resume of deleted application");
        }
    }
    Ok(())
}

/// The job (if it still exists) and its applications, most recent first.
/// A missing job is not an error: the caller renders what it gets.
pub async fn list_applicants(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<(Option<Job>, Vec<Application>), AppError> {
    let job = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?;
    let applicants = sqlx::query_as(
        "SELECT * FROM applications WHERE job_id = $1 ORDER BY applied_at DESC",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?;

    Ok((job, applicants))
}
