//! Cookie-backed identity context and the two capability guards.
//!
//! The signed `session` cookie holds the principal established at login.
//! `CurrentUser` and `AdminUser` are the authorization gate: extractors that
//! run before any handler body, rejecting with `Unauthenticated` or
//! `Forbidden`. `AdminUser` checks authentication first, so an anonymous
//! request to an admin route is always `Unauthenticated`, never `Forbidden`.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, SignedCookieJar};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::user::{Role, User};
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// The authenticated principal, scoped to the browser session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        SessionUser {
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role(),
        }
    }
}

/// Reads the principal from the jar. A missing, unsigned, or malformed
/// cookie is simply an anonymous request.
pub fn read(jar: &SignedCookieJar) -> Option<SessionUser> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| serde_json::from_str(c.value()).ok())
}

/// Establishes a session at login.
pub fn establish(jar: SignedCookieJar, user: &SessionUser) -> SignedCookieJar {
    // serialization of this shape cannot fail
    let payload = serde_json::to_string(user).unwrap_or_default();
    jar.add(
        Cookie::build((SESSION_COOKIE, payload))
            .path("/")
            .http_only(true)
            .build(),
    )
}

/// Ends the session at logout.
pub fn clear(jar: SignedCookieJar) -> SignedCookieJar {
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    jar.remove(removal)
}

/// Guard: any authenticated principal.
pub struct CurrentUser(pub SessionUser);

/// Guard: authenticated principal with the admin role.
pub struct AdminUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let jar = SignedCookieJar::from_headers(&parts.headers, state.key.clone());
        read(&jar).map(CurrentUser).ok_or(AppError::Unauthenticated)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(AppError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::{header, HeaderMap, Request};
    use axum::response::IntoResponse;
    use axum_extra::extract::cookie::Key;
    use sqlx::postgres::PgPoolOptions;

    use crate::config::Config;
    use crate::storage::FsResumeStore;

    fn test_state(key: Key) -> AppState {
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
            key,
        }
    }

    fn session_user(role: Role) -> SessionUser {
        SessionUser {
            email: "u@example.com".to_string(),
            name: "U".to_string(),
            role,
        }
    }

    /// Builds request parts whose Cookie header carries a signed session.
    fn parts_with_session(key: &Key, user: &SessionUser) -> Parts {
        let jar = establish(SignedCookieJar::from_headers(&HeaderMap::new(), key.clone()), user);
        let set_cookie = (jar, ())
            .into_response()
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or_default().to_string())
            .unwrap();

        let request = Request::builder()
            .uri("/")
            .header(header::COOKIE, set_cookie)
            .body(())
            .unwrap();
        request.into_parts().0
    }

    #[test]
    fn test_session_cookie_round_trip() {
        let key = Key::generate();
        let user = session_user(Role::User);
        let jar = establish(SignedCookieJar::from_headers(&HeaderMap::new(), key), &user);
        assert_eq!(read(&jar), Some(user));
    }

    #[test]
    fn test_clear_ends_the_session() {
        let key = Key::generate();
        let jar = establish(
            SignedCookieJar::from_headers(&HeaderMap::new(), key),
            &session_user(Role::Admin),
        );
        assert_eq!(read(&clear(jar)), None);
    }

    #[tokio::test]
    async fn test_anonymous_is_unauthenticated() {
        let state = test_state(Key::generate());
        let mut parts = Request::builder().uri("/").body(()).unwrap().into_parts().0;

        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Unauthenticated));

        // authentication failure takes precedence over role failure
        let err = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_authenticated_non_admin_is_forbidden() {
        let key = Key::generate();
        let state = test_state(key.clone());
        let mut parts = parts_with_session(&key, &session_user(Role::User));

        assert!(CurrentUser::from_request_parts(&mut parts, &state).await.is_ok());

        let err = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_admin_passes_both_guards() {
        let key = Key::generate();
        let state = test_state(key.clone());
        let mut parts = parts_with_session(&key, &session_user(Role::Admin));

        assert!(CurrentUser::from_request_parts(&mut parts, &state).await.is_ok());
        assert!(AdminUser::from_request_parts(&mut parts, &state).await.is_ok());
    }

    #[tokio::test]
    async fn test_tampered_cookie_is_anonymous() {
        let state = test_state(Key::generate());
        // signed with a different key than the state's
        let mut parts = parts_with_session(&Key::generate(), &session_user(Role::Admin));

        let err = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Unauthenticated));
    }
}
