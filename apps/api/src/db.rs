use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
/// Failure here is fatal: the process must not serve traffic without a store.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            UUID PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL CHECK (role IN ('admin', 'user')),
    created_at    TIMESTAMPTZ NOT NULL
)
"#;

const CREATE_JOBS: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    id          UUID PRIMARY KEY,
    title       TEXT NOT NULL,
    job_type    TEXT NOT NULL,
    company     TEXT NOT NULL,
    description TEXT NOT NULL,
    posted_by   TEXT NOT NULL,
    posted_at   TIMESTAMPTZ NOT NULL
)
"#;

// UNIQUE (job_id, user_email) is the race-safe arbiter for duplicate
// applications; callers insert with ON CONFLICT DO NOTHING and treat a
// missing returned row as "already applied".
const CREATE_APPLICATIONS: &str = r#"
CREATE TABLE IF NOT EXISTS applications (
    id          UUID PRIMARY KEY,
    job_id      UUID NOT NULL,
    user_email  TEXT NOT NULL,
    user_name   TEXT NOT NULL,
    resume_path TEXT NOT NULL,
    applied_at  TIMESTAMPTZ NOT NULL,
    UNIQUE (job_id, user_email)
)
"#;

/// Bootstraps the three record sets. Idempotent; runs at every startup.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_USERS).execute(pool).await?;
    sqlx::query(CREATE_JOBS).execute(pool).await?;
    sqlx::query(CREATE_APPLICATIONS).execute(pool).await?;

    info!("Database schema ready");
    Ok(())
}
