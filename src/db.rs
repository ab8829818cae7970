//! SQLite connection pool for the milestone catalog.
//!
//! File databases run in WAL mode so the server's readers never block on
//! an import. `[db].path = ":memory:"` opens a private in-memory database,
//! which only lives as long as its single pooled connection.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::config::Config;

const MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a pool on the database named by `[db].path`.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    connect_path(&config.db.path).await
}

/// Open a pool on the database at `path`, creating the file and its parent
/// directories if missing.
pub async fn connect_path(path: &Path) -> Result<SqlitePool> {
    let in_memory = is_in_memory(path);
    if !in_memory {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let mut pool_options = SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS);
    if in_memory {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options
        .connect_with(connect_options(path))
        .await
        .with_context(|| format!("Failed to open database {}", path.display()))?;

    tracing::debug!(path = %path.display(), in_memory, "connected to database");
    Ok(pool)
}

fn is_in_memory(path: &Path) -> bool {
    path.as_os_str() == ":memory:"
}

fn connect_options(path: &Path) -> SqliteConnectOptions {
    if is_in_memory(path) {
        return SqliteConnectOptions::new()
            .in_memory(true)
            .busy_timeout(BUSY_TIMEOUT);
    }
    SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT)
}
