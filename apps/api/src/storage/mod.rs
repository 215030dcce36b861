//! Upload intake: stores resume blobs under the configured storage root and
//! hands back the relative reference recorded on each application.
//!
//! Size limits are not enforced here — the router's `DefaultBodyLimit` caps
//! request bodies at the transport boundary before a byte reaches this module.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;

/// Blob store for resume artifacts. Carried in `AppState` as
/// `Arc<dyn ResumeStore>` so tests and future backends can swap it out.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Stores a resume and returns the relative reference for later serving.
    /// Does not itself serve files.
    async fn store(
        &self,
        owner_email: &str,
        job_id: Uuid,
        filename: &str,
        data: &[u8],
    ) -> Result<String, AppError>;

    /// Removes a previously stored resume. A missing file is not an error.
    async fn remove(&self, resume_path: &str) -> Result<(), AppError>;
}

/// Filesystem-backed store rooted at `Config.upload_dir`.
pub struct FsResumeStore {
    root: PathBuf,
}

impl FsResumeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the storage root if absent. Called once at startup.
    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("creating upload dir {}", self.root.display()))
    }
}

#[async_trait]
impl ResumeStore for FsResumeStore {
    async fn store(
        &self,
        owner_email: &str,
        job_id: Uuid,
        filename: &str,
        data: &[u8],
    ) -> Result<String, AppError> {
        let name = artifact_name(owner_email, job_id, filename);
        tokio::fs::write(self.root.join(&name), data)
            .await
            .map_err(|e| AppError::Storage(format!("writing {name}: {e}")))?;

        debug!(%name, bytes = data.len(), "resume stored");
        Ok(format!("uploads/{name}"))
    }

    async fn remove(&self, resume_path: &str) -> Result<(), AppError> {
        // stored references look like "uploads/<name>"; anything else is
        // reduced to its final component before touching the filesystem
        let name = resume_path.strip_prefix("uploads/").unwrap_or(resume_path);
        let Some(name) = Path::new(name).file_name().and_then(|n| n.to_str()) else {
            return Ok(());
        };

        match tokio::fs::remove_file(self.root.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("removing {name}: {e}"))),
        }
    }
}

/// Collision-resistant artifact name: owner email + job id + a per-attempt
/// nonce + client filename, sanitized as one unit. The nonce keeps two
/// stores of the same (owner, job, filename) from aliasing, so removing one
/// upload can never touch another's file.
fn artifact_name(owner_email: &str, job_id: Uuid, filename: &str) -> String {
    // drop any directory components the client may have sent
    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let nonce = Uuid::new_v4();
    sanitize(&format!("{owner_email}_{job_id}_{nonce}_{base}"))
}

/// Maps every character outside `[A-Za-z0-9._-]` to `_`, which removes path
/// separators and anything else unsafe in a filename.
fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
