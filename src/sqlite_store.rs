//! SQLite-backed [`MilestoneStore`] implementation.
//!
//! Maps each store operation onto the `milestones` table created by
//! [`crate::migrate`]. The `(domain, level)` lookup is served by the
//! `idx_milestones_domain_level` index.

use std::collections::BTreeSet;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use milestone_core::models::MilestoneRecord;
use milestone_core::store::MilestoneStore;

use crate::config::Config;
use crate::{db, migrate};

/// SQLite implementation of the [`MilestoneStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to the configured database and make sure the schema exists.
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = db::connect(config).await?;
        migrate::apply_schema(&pool).await?;
        Ok(Self::new(pool))
    }
}

fn record_from_row(row: &SqliteRow) -> MilestoneRecord {
    MilestoneRecord {
        code: row.get("code"),
        level: row.get("level"),
        domain: row.get("domain"),
        milestone: row.get("milestone"),
    }
}

#[async_trait]
impl MilestoneStore for SqliteStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<MilestoneRecord>> {
        let row = sqlx::query(
            "SELECT code, level, domain, milestone FROM milestones WHERE code = ? ORDER BY id ASC LIMIT 1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(record_from_row))
    }

    async fn find_by_domain_and_level(
        &self,
        domain: &str,
        level: i64,
    ) -> Result<Vec<MilestoneRecord>> {
        let rows = sqlx::query(
            "SELECT code, level, domain, milestone FROM milestones WHERE domain = ? AND level = ? ORDER BY id ASC",
        )
        .bind(domain)
        .bind(level)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    async fn distinct_codes(&self) -> Result<BTreeSet<String>> {
        let codes: Vec<String> = sqlx::query_scalar("SELECT DISTINCT code FROM milestones")
            .fetch_all(&self.pool)
            .await?;
        Ok(codes.into_iter().collect())
    }

    async fn distinct_domains(&self) -> Result<BTreeSet<String>> {
        let domains: Vec<String> = sqlx::query_scalar("SELECT DISTINCT domain FROM milestones")
            .fetch_all(&self.pool)
            .await?;
        Ok(domains.into_iter().collect())
    }

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.count().await? == 0)
    }

    async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM milestones")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    async fn bulk_insert(&self, records: &[MilestoneRecord]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query("INSERT INTO milestones (code, level, domain, milestone) VALUES (?, ?, ?, ?)")
                .bind(&record.code)
                .bind(record.level)
                .bind(&record.domain)
                .bind(&record.milestone)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(records.len())
    }
}
