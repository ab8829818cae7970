//! Storage abstraction for Milestone Lookup.
//!
//! The [`MilestoneStore`] trait defines every storage operation the query
//! service, importer, and HTTP listing endpoints need, so the SQLite
//! backend and the in-memory backend are interchangeable.
//!
//! Implementations must be `Send + Sync` to be shared across request
//! handlers.

pub mod memory;

use std::collections::BTreeSet;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::MilestoneRecord;

/// Abstract storage backend for milestone records.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`find_by_code`](MilestoneStore::find_by_code) | Exact lookup by skill code |
/// | [`find_by_domain_and_level`](MilestoneStore::find_by_domain_and_level) | Secondary-index lookup, zero or more records |
/// | [`distinct_codes`](MilestoneStore::distinct_codes) | All codes, deduplicated |
/// | [`distinct_domains`](MilestoneStore::distinct_domains) | All domains, deduplicated |
/// | [`is_empty`](MilestoneStore::is_empty) | Whether reference data has been loaded |
/// | [`count`](MilestoneStore::count) | Number of stored records |
/// | [`bulk_insert`](MilestoneStore::bulk_insert) | One-time population of the store |
#[async_trait]
pub trait MilestoneStore: Send + Sync {
    /// Look up a record by its code.
    ///
    /// If several records share a code, the first one inserted is returned.
    async fn find_by_code(&self, code: &str) -> Result<Option<MilestoneRecord>>;

    /// All records for a `(domain, level)` pair, in insertion order.
    async fn find_by_domain_and_level(
        &self,
        domain: &str,
        level: i64,
    ) -> Result<Vec<MilestoneRecord>>;

    async fn distinct_codes(&self) -> Result<BTreeSet<String>>;

    async fn distinct_domains(&self) -> Result<BTreeSet<String>>;

    async fn is_empty(&self) -> Result<bool>;

    async fn count(&self) -> Result<usize>;

    /// Insert all records in one batch. Returns the number inserted.
    async fn bulk_insert(&self, records: &[MilestoneRecord]) -> Result<usize>;
}
