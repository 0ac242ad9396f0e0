use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

/// Connect to the SQLite database, creating the file and its parent directory
/// on first run, and make sure the schema exists.
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        if let Some(dir) = Path::new(path).parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).context("create data dir")?;
            }
        }
    }

    let opts = SqliteConnectOptions::from_str(database_url)
        .context("parse DATABASE_URL")?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(opts)
        .await
        .context("connect to database")?;

    ensure_schema(&pool).await?;
    info!(url = %database_url, "database initialized");
    Ok(pool)
}

/// Uniqueness of email and membership code is enforced here, at the storage
/// level; application-side pre-checks are an optimization only.
pub(crate) async fn ensure_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            email            TEXT NOT NULL UNIQUE,
            password_hash    TEXT NOT NULL,
            first_name       TEXT,
            last_name        TEXT,
            phone            TEXT,
            membership_level TEXT NOT NULL DEFAULT 'Bronze',
            membership_code  TEXT UNIQUE,
            points           INTEGER NOT NULL DEFAULT 0,
            joined_at        TEXT,
            created_at       TEXT NOT NULL,
            updated_at       TEXT NOT NULL,
            last_login_at    TEXT,
            is_active        INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await
    .context("create users table")?;
    Ok(())
}
