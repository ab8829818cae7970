use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

/// Connect and create the schema. Idempotent.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create the milestones table and its indexes on an open pool.
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    // `code` is indexed but not UNIQUE; the importer drops duplicate codes.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS milestones (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL,
            level INTEGER NOT NULL,
            domain TEXT NOT NULL,
            milestone TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_milestones_code ON milestones(code)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_milestones_domain_level ON milestones(domain, level)",
    )
    .execute(pool)
    .await?;

    tracing::debug!("schema up to date");
    Ok(())
}
