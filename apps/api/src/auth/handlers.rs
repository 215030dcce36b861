use axum::{
    extract::State,
    response::Redirect,
    Form, Json,
};
use axum_extra::extract::cookie::{CookieJar, SignedCookieJar};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::{credentials, session};
use crate::auth::session::SessionUser;
use crate::errors::AppError;
use crate::flash::{self, FlashLevel};
use crate::models::user::Role;
use crate::state::AppState;

/// GET /
/// Routes by role: admins to their dashboard, users to theirs, anonymous to login.
pub async fn index(jar: SignedCookieJar) -> Redirect {
    match session::read(&jar) {
        Some(user) if user.role == Role::Admin => Redirect::to("/admin"),
        Some(_) => Redirect::to("/user"),
        None => Redirect::to("/login"),
    }
}

/// GET /register
pub async fn register_page(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let (jar, notice) = flash::take(jar);
    (jar, Json(json!({ "page": "register", "notice": notice })))
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// POST /register
/// Note the absence of a role field: self-registration is always "user"
/// unless the email is on the configured admin allow-list.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let role = credentials::role_for(&state.config.admin_emails, &form.email);
    credentials::register(&state.db, &form.name, &form.email, &form.password, role).await?;

    info!(email = %form.email, role = role.as_str(), "user registered");
    Ok((
        flash::push(jar, FlashLevel::Success, "Registration successful! Please login."),
        Redirect::to("/login"),
    ))
}

/// GET /login
pub async fn login_page(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let (jar, notice) = flash::take(jar);
    (jar, Json(json!({ "page": "login", "notice": notice })))
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    signed: SignedCookieJar,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(SignedCookieJar, CookieJar, Redirect), AppError> {
    let user = credentials::verify(&state.db, &form.email, &form.password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let principal = SessionUser::from(&user);
    let target = if principal.role == Role::Admin { "/admin" } else { "/user" };

    info!(email = %principal.email, role = principal.role.as_str(), "login");
    Ok((
        session::establish(signed, &principal),
        flash::push(jar, FlashLevel::Success, format!("Welcome {}!", principal.name)),
        Redirect::to(target),
    ))
}

/// GET /logout
pub async fn logout(
    signed: SignedCookieJar,
    jar: CookieJar,
) -> (SignedCookieJar, CookieJar, Redirect) {
    (
        session::clear(signed),
        flash::push(jar, FlashLevel::Info, "Logged out successfully"),
        Redirect::to("/login"),
    )
}
