#![allow(dead_code)]

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::flash::{self, FlashLevel};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Browser-flow variants never surface raw status codes: they become a 303
/// redirect to the appropriate landing page plus a one-shot flash notice.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Admin access required")]
    Forbidden,

    #[error("Already applied to this job")]
    AlreadyApplied,

    #[error("No resume file uploaded")]
    MissingFile,

    #[error("Invalid file type")]
    UnsupportedFileType,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::DuplicateEmail => {
                flash_redirect("/register", FlashLevel::Danger, "Email already registered")
            }
            AppError::InvalidCredentials => {
                flash_redirect("/login", FlashLevel::Danger, "Invalid email or password")
            }
            AppError::Unauthenticated => {
                flash_redirect("/login", FlashLevel::Warning, "Please login first")
            }
            AppError::Forbidden => {
                flash_redirect("/user", FlashLevel::Danger, "Admin access required")
            }
            AppError::AlreadyApplied => flash_redirect(
                "/user",
                FlashLevel::Warning,
                "You have already applied to this job",
            ),
            AppError::MissingFile => {
                flash_redirect("/user", FlashLevel::Danger, "No resume file uploaded")
            }
            AppError::UnsupportedFileType => flash_redirect(
                "/user",
                FlashLevel::Danger,
                "Invalid file type. Only PDF, DOC, DOCX allowed",
            ),
            AppError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "NOT_FOUND", &msg),
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred",
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred",
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred",
                )
            }
        }
    }
}

/// 303 to `target` carrying a flash notice for the next page view.
pub(crate) fn flash_redirect(target: &str, level: FlashLevel, message: &str) -> Response {
    let mut response = Redirect::to(target).into_response();
    // base64 payload is always a valid header value; fall back to clearing
    // the cookie rather than panicking if that ever stops holding
    let cookie = HeaderValue::from_str(&flash::set_cookie_value(level, message))
        .unwrap_or_else(|_| HeaderValue::from_static("flash=; Path=/"));
    response.headers_mut().append(header::SET_COOKIE, cookie);
    response
}

fn json_error(status: StatusCode, code: &str, message: &str) -> Response {
    let body = Json(json!({
        "error": {
            "code": code,
            "message": message
        }
    }));
    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    #[test]
    fn test_browser_flow_errors_redirect_with_flash() {
        let cases = [
            (AppError::DuplicateEmail, "/register"),
            (AppError::InvalidCredentials, "/login"),
            (AppError::Unauthenticated, "/login"),
            (AppError::Forbidden, "/user"),
            (AppError::AlreadyApplied, "/user"),
            (AppError::MissingFile, "/user"),
            (AppError::UnsupportedFileType, "/user"),
        ];
        for (err, target) in cases {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&response), target);
            assert!(response.headers().contains_key(header::SET_COOKIE));
        }
    }

    #[test]
    fn test_database_error_is_opaque_500() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.headers().contains_key(header::LOCATION));
    }

    #[test]
    fn test_not_found_is_404() {
        let response = AppError::NotFound("job".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
