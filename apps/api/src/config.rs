use anyhow::{bail, Context, Result};

/// Maximum accepted request body, enforced at the transport boundary
/// (`DefaultBodyLimit` on the router) rather than inside the upload path.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Signs the session cookie. Must be at least 32 bytes.
    pub secret_key: String,
    pub upload_dir: String,
    /// Emails granted the admin role at registration. Self-registration is
    /// otherwise always "user" — there is no client-supplied role field.
    pub admin_emails: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let secret_key = require_env("SECRET_KEY")?;
        if secret_key.len() < 32 {
            bail!("SECRET_KEY must be at least 32 bytes");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            secret_key,
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "static/uploads".to_string()),
            admin_emails: std::env::var("ADMIN_EMAILS")
                .map(|raw| parse_admin_emails(&raw))
                .unwrap_or_default(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
