//! Application ledger: one application per (user, job), linked to a stored
//! resume artifact.

pub mod handlers;

use axum::body::Bytes;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::auth::session::SessionUser;
use crate::errors::AppError;
use crate::models::application::Application;
use crate::storage::ResumeStore;

/// Extensions accepted for resume uploads, matched case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Extension allow-list check on the client-supplied filename. Content is
/// deliberately not inspected.
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// The `resume` part of the multipart form, as received.
pub struct ResumeUpload {
    pub filename: String,
    pub data: Bytes,
}

/// All applications a user has submitted.
pub async fn list_for_user(pool: &PgPool, email: &str) -> Result<Vec<Application>, AppError> {
    let applications = sqlx::query_as(
        "SELECT * FROM applications WHERE user_email = $1 ORDER BY applied_at DESC",
    )
    .bind(email)
    .fetch_all(pool)
    .await?;

    Ok(applications)
}

/// Records an application.
///
/// The early duplicate lookup is a fast path only; the real invariant is the
/// UNIQUE (job_id, user_email) index. Two concurrent applies both reaching
/// the INSERT race safely: ON CONFLICT DO NOTHING returns no row to the
/// loser, which maps to `AlreadyApplied` and cleans up its stored file.
pub async fn apply(
    pool: &PgPool,
    store: &dyn ResumeStore,
    user: &SessionUser,
    job_id: Uuid,
    upload: Option<ResumeUpload>,
) -> Result<Application, AppError> {
    let existing: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM applications WHERE job_id = $1 AND user_email = $2")
            .bind(job_id)
            .bind(&user.email)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Err(AppError::AlreadyApplied);
    }

    let upload = upload
        .filter(|u| !u.filename.is_empty())
        .ok_or(AppError::MissingFile)?;
    if !allowed_file(&upload.filename) {
        return Err(AppError::UnsupportedFileType);
    }

    let resume_path = store
        .store(&user.email, job_id, &upload.filename, &upload.data)
        .await?;

    let inserted: Option<Application> = sqlx::query_as(
        "INSERT INTO applications (id, job_id, user_email, user_name, resume_path, applied_at) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (job_id, user_email) DO NOTHING \
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(job_id)
    .bind(&user.email)
    .bind(&user.name) // display name snapshot at apply time
    .bind(&resume_path)
    .bind(chrono::Utc::now())
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(application) => Ok(application),
        None => {
            // lost the race to a concurrent apply for the same (user, job);
            // artifact names are attempt-unique, so this path is always the
            // loser's own file, never the surviving application's
            if let Err(e) = store.remove(&resume_path).await {
                warn!(path = %resume_path, error = %e, "failed to clean up resume after duplicate apply");
            }
            Err(AppError::AlreadyApplied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions_case_insensitive() {
        assert!(allowed_file("resume.pdf"));
        assert!(allowed_file("resume.PDF"));
        assert!(allowed_file("resume.doc"));
        assert!(allowed_file("resume.DocX"));
    }

    #[test]
    fn test_disallowed_extensions_rejected() {
        assert!(!allowed_file("resume.EXE"));
        assert!(!allowed_file("resume.pdf.exe"));
        assert!(!allowed_file("resume.txt"));
    }

    #[test]
    fn test_extension_required() {
        assert!(!allowed_file("resume"));
        assert!(!allowed_file(""));
        assert!(!allowed_file("resume."));
    }

    #[test]
    fn test_only_last_extension_counts() {
        // mirrors a plain rsplit on the final dot
        assert!(allowed_file("resume.exe.pdf"));
        assert!(allowed_file(".pdf"));
    }
}
