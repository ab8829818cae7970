//! In-memory [`MilestoneStore`] implementation for testing and embedding.
//!
//! Records live in a `Vec` behind `std::sync::RwLock`, with a code index
//! and a non-unique `(domain, level)` secondary index pointing into it.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::MilestoneRecord;

use super::MilestoneStore;

#[derive(Default)]
struct Inner {
    records: Vec<MilestoneRecord>,
    by_code: HashMap<String, usize>,
    by_domain_level: HashMap<(String, i64), Vec<usize>>,
}

/// In-memory milestone store.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `records`.
    pub fn with_records(records: Vec<MilestoneRecord>) -> Self {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.write() {
            for record in records {
                inner.push(record);
            }
        }
        store
    }
}

impl Inner {
    fn push(&mut self, record: MilestoneRecord) {
        let idx = self.records.len();
        self.by_code.entry(record.code.clone()).or_insert(idx);
        self.by_domain_level
            .entry((record.domain.clone(), record.level))
            .or_default()
            .push(idx);
        self.records.push(record);
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("in-memory store lock poisoned")
}

#[async_trait]
impl MilestoneStore for InMemoryStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<MilestoneRecord>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .by_code
            .get(code)
            .map(|&idx| inner.records[idx].clone()))
    }

    async fn find_by_domain_and_level(
        &self,
        domain: &str,
        level: i64,
    ) -> Result<Vec<MilestoneRecord>> {
        let inner = self.inner.read().map_err(poisoned)?;
        let hits = match inner.by_domain_level.get(&(domain.to_string(), level)) {
            Some(idxs) => idxs.iter().map(|&i| inner.records[i].clone()).collect(),
            None => Vec::new(),
        };
        Ok(hits)
    }

    async fn distinct_codes(&self) -> Result<BTreeSet<String>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.records.iter().map(|r| r.code.clone()).collect())
    }

    async fn distinct_domains(&self) -> Result<BTreeSet<String>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.records.iter().map(|r| r.domain.clone()).collect())
    }

    async fn is_empty(&self) -> Result<bool> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.records.is_empty())
    }

    async fn count(&self) -> Result<usize> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.records.len())
    }

    async fn bulk_insert(&self, records: &[MilestoneRecord]) -> Result<usize> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        for record in records {
            inner.push(record.clone());
        }
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<MilestoneRecord> {
        vec![
            MilestoneRecord::new("MAN-1", 1, "Mand", "Emits 2 words, signs, or PECS"),
            MilestoneRecord::new("MAN-2", 1, "Mand", "Emits 4 different mands"),
            MilestoneRecord::new("TAC-1", 1, "Tact", "Tacts 2 items"),
            MilestoneRecord::new("TAC-6", 2, "Tact", "Tacts 10 items"),
        ]
    }

    #[tokio::test]
    async fn test_find_by_code() {
        let store = InMemoryStore::with_records(sample());
        let hit = store.find_by_code("TAC-6").await.unwrap().unwrap();
        assert_eq!(hit.domain, "Tact");
        assert_eq!(hit.level, 2);
        assert!(store.find_by_code("XYZ-9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_domain_and_level_keeps_insertion_order() {
        let store = InMemoryStore::with_records(sample());
        let hits = store.find_by_domain_and_level("Mand", 1).await.unwrap();
        let codes: Vec<&str> = hits.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["MAN-1", "MAN-2"]);
    }

    #[tokio::test]
    async fn test_find_by_domain_and_level_empty() {
        let store = InMemoryStore::with_records(sample());
        assert!(store
            .find_by_domain_and_level("Mand", 3)
            .await
            .unwrap()
            .is_empty());
        assert!(store
            .find_by_domain_and_level("Echoic", 1)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_distinct_codes_deduplicates_shared_codes() {
        let mut records = sample();
        records.push(MilestoneRecord::new("MAN-1", 3, "Mand", "Duplicate entry"));
        let store = InMemoryStore::with_records(records);

        let codes = store.distinct_codes().await.unwrap();
        assert_eq!(codes.len(), 4);
        assert!(codes.contains("MAN-1"));

        // First inserted record wins for exact lookup.
        let hit = store.find_by_code("MAN-1").await.unwrap().unwrap();
        assert_eq!(hit.level, 1);
    }

    #[tokio::test]
    async fn test_distinct_domains() {
        let store = InMemoryStore::with_records(sample());
        let domains: Vec<String> = store.distinct_domains().await.unwrap().into_iter().collect();
        assert_eq!(domains, vec!["Mand".to_string(), "Tact".to_string()]);
    }

    #[tokio::test]
    async fn test_bulk_insert_and_emptiness() {
        let store = InMemoryStore::new();
        assert!(store.is_empty().await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);

        let inserted = store.bulk_insert(&sample()).await.unwrap();
        assert_eq!(inserted, 4);
        assert!(!store.is_empty().await.unwrap());
        assert_eq!(store.count().await.unwrap(), 4);
    }
}
