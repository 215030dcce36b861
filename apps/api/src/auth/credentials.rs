//! Credential store: salted one-way hashing at registration, constant-shape
//! verification at login.

use password_auth::{generate_hash, verify_password};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{Role, User};

/// Creates an account. The unique index on `users.email` is the duplicate
/// check; a violation maps to `DuplicateEmail`.
pub async fn register(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(generate_hash(password))
    .bind(role.as_str())
    .bind(chrono::Utc::now())
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::DuplicateEmail),
        Err(e) => Err(e.into()),
    }
}

/// Looks up by email and checks the password hash. Unknown email and wrong
/// password collapse into the same `None` — callers cannot distinguish them,
/// and neither can a probing client.
pub async fn verify(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user.filter(|u| verify_password(password, &u.password_hash).is_ok()))
}

/// Role granted at self-registration. Client input never participates:
/// admin goes only to emails on the configured allow-list.
pub fn role_for(admin_emails: &[String], email: &str) -> Role {
    if admin_emails.iter().any(|a| a.eq_ignore_ascii_case(email)) {
        Role::Admin
    } else {
        Role::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hash = generate_hash("hunter2hunter2");
        assert!(verify_password("hunter2hunter2", &hash).is_ok());
        assert!(verify_password("hunter3hunter3", &hash).is_err());
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(generate_hash("same-password"), generate_hash("same-password"));
    }

    #[test]
    fn test_role_for_respects_allow_list() {
        let admins = vec!["hr@acme.com".to_string()];
        assert_eq!(role_for(&admins, "hr@acme.com"), Role::Admin);
        assert_eq!(role_for(&admins, "HR@ACME.COM"), Role::Admin);
        assert_eq!(role_for(&admins, "someone@acme.com"), Role::User);
        assert_eq!(role_for(&[], "hr@acme.com"), Role::User);
    }
}
