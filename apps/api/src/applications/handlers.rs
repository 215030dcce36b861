use anyhow::anyhow;
use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::applications::{self, ResumeUpload};
use crate::auth::session::CurrentUser;
use crate::errors::AppError;
use crate::flash::{self, FlashLevel};
use crate::jobs;
use crate::models::user::Role;
use crate::routes::JobPath;
use crate::state::AppState;

/// GET /user
/// Jobs with counts, the user's own applications, and the set of job ids
/// already applied to. Admins landing here are bounced to their dashboard.
pub async fn user_dashboard(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    if user.role == Role::Admin {
        return Ok(Redirect::to("/admin").into_response());
    }

    let (jar, notice) = flash::take(jar);
    let jobs = jobs::list_jobs(&state.db).await?;
    let my_applications = applications::list_for_user(&state.db, &user.email).await?;
    let applied_job_ids: Vec<Uuid> = my_applications.iter().map(|a| a.job_id).collect();

    Ok((
        jar,
        Json(json!({
            "jobs": jobs,
            "applied_job_ids": applied_job_ids,
            "my_applications": my_applications,
            "notice": notice,
        })),
    )
        .into_response())
}

/// POST /user/apply/:id (multipart, field `resume`)
pub async fn apply_job(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    jar: CookieJar,
    JobPath(job_id): JobPath,
    mut multipart: Multipart,
) -> Result<(CookieJar, Redirect), AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Internal(anyhow!("multipart read failed: {e}")))?
    {
        if field.name() == Some("resume") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Internal(anyhow!("resume upload read failed: {e}")))?;
            upload = Some(ResumeUpload { filename, data });
        }
    }

    let application =
        applications::apply(&state.db, state.store.as_ref(), &user, job_id, upload).await?;

    info!(application_id = %application.id, %job_id, email = %user.email, "application submitted");
    Ok((
        flash::push(jar, FlashLevel::Success, "Application submitted successfully!"),
        Redirect::to("/user"),
    ))
}
