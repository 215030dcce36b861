use axum::{extract::State, response::Redirect, Form, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::session::AdminUser;
use crate::errors::AppError;
use crate::flash::{self, FlashLevel};
use crate::jobs::{self, NewJob};
use crate::routes::JobPath;
use crate::state::AppState;

/// GET /admin
pub async fn admin_dashboard(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let (jar, notice) = flash::take(jar);
    let jobs = jobs::list_jobs(&state.db).await?;
    Ok((jar, Json(json!({ "jobs": jobs, "notice": notice }))))
}

#[derive(Deserialize)]
pub struct AddJobForm {
    pub title: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub company: String,
    pub description: String,
}

/// POST /admin/add-job
pub async fn add_job(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AddJobForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let job = jobs::create_job(
        &state.db,
        NewJob {
            title: &form.title,
            job_type: &form.job_type,
            company: &form.company,
            description: &form.description,
            posted_by: &admin.email,
        },
    )
    .await?;

    info!(job_id = %job.id, company = %job.company, posted_by = %admin.email, "job posted");
    Ok((
        flash::push(jar, FlashLevel::Success, "Job posted successfully!"),
        Redirect::to("/admin"),
    ))
}

/// GET /admin/delete-job/:id
pub async fn delete_job(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    jar: CookieJar,
    JobPath(job_id): JobPath,
) -> Result<(CookieJar, Redirect), AppError> {
    jobs::delete_job(&state.db, state.store.as_ref(), job_id).await?;
    Ok((
        flash::push(jar, FlashLevel::Success, "Job deleted successfully!"),
        Redirect::to("/admin"),
    ))
}

/// GET /admin/applicants/:id
/// `job` is null when the id no longer exists; the applicant list is then empty.
pub async fn view_applicants(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    JobPath(job_id): JobPath,
) -> Result<Json<Value>, AppError> {
    let (job, applicants) = jobs::list_applicants(&state.db, job_id).await?;
    Ok(Json(json!({ "job": job, "applicants": applicants })))
}
