pub mod health;

use axum::{
    async_trait,
    extract::{DefaultBodyLimit, FromRequestParts, Path},
    http::request::Parts,
    response::Response,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::applications::handlers as application_handlers;
use crate::auth::handlers as auth_handlers;
use crate::config::MAX_UPLOAD_BYTES;
use crate::errors::flash_redirect;
use crate::flash::FlashLevel;
use crate::jobs::handlers as job_handlers;
use crate::state::AppState;

/// Job id path segment. A malformed id behaves like a missing one: back to
/// the landing page with a notice, never a bare 400. `/` re-routes by role.
pub struct JobPath(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for JobPath {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Response> {
        match Path::<Uuid>::from_request_parts(parts, state).await {
            Ok(Path(job_id)) => Ok(JobPath(job_id)),
            Err(_) => Err(flash_redirect("/", FlashLevel::Warning, "No such job")),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Public surface
        .route("/", get(auth_handlers::index))
        .route(
            "/register",
            get(auth_handlers::register_page).post(auth_handlers::register),
        )
        .route(
            "/login",
            get(auth_handlers::login_page).post(auth_handlers::login),
        )
        .route("/logout", get(auth_handlers::logout))
        // Admin surface (guarded by the AdminUser extractor)
        .route("/admin", get(job_handlers::admin_dashboard))
        .route("/admin/add-job", post(job_handlers::add_job))
        .route("/admin/delete-job/:id", get(job_handlers::delete_job))
        .route("/admin/applicants/:id", get(job_handlers::view_applicants))
        // User surface (guarded by the CurrentUser extractor)
        .route("/user", get(application_handlers::user_dashboard))
        .route("/user/apply/:id", post(application_handlers::apply_job))
        // 16 MiB request ceiling; oversized uploads never reach the intake
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::{header, Request, StatusCode};
    use axum_extra::extract::cookie::Key;
    use sqlx::postgres::PgPoolOptions;

    use crate::config::Config;
    use crate::storage::FsResumeStore;

    fn test_state() -> AppState {
        AppState {
            // lazy pool: never connects unless a query runs
            db: PgPoolOptions::new()
                .connect_lazy("postgres://localhost/placement_test")
                .unwrap(),
            store: Arc::new(FsResumeStore::new(std::env::temp_dir())),
            config: Config {
                database_url: String::new(),
                secret_key: "0123456789abcdef0123456789abcdef".to_string(),
                upload_dir: String::new(),
                admin_emails: vec![],
                port: 8080,
                rust_log: "info".to_string(),
            },
            key: Key::generate(),
        }
    }

    #[tokio::test]
    async fn test_malformed_job_id_redirects_with_notice() {
        let state = test_state();
        let mut parts = Request::builder()
            .uri("/admin/delete-job/not-a-uuid")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let response = JobPath::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }
}
