//! Query execution and reply formatting.
//!
//! [`QueryService`] owns an injected [`MilestoneStore`] and turns a parsed
//! [`Intent`] into a [`QueryResult`]. A lookup that finds nothing is a
//! successful outcome ([`QueryResult::NotFound`]) carrying an explanatory
//! reply, not an error.

use std::sync::Arc;

use crate::intent::{self, Intent};
use crate::models::MilestoneRecord;
use crate::store::MilestoneStore;

pub const MILESTONE_NOT_FOUND: &str = "Milestone not found";
pub const NO_MILESTONES_FOR_DOMAIN_LEVEL: &str = "No milestones found for this domain and level";

/// Outcome of handling one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    /// Matching data; the reply text.
    Found(String),
    /// Valid query with no matching data; the reply text.
    NotFound(String),
    /// The message was not a recognized query.
    Rejected,
    /// The store could not be read.
    Failed,
}

impl QueryResult {
    /// The reply text for `Found` and `NotFound`.
    pub fn reply(&self) -> Option<&str> {
        match self {
            QueryResult::Found(text) | QueryResult::NotFound(text) => Some(text.as_str()),
            QueryResult::Rejected | QueryResult::Failed => None,
        }
    }
}

/// Stateless read path over a milestone store.
#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn MilestoneStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn MilestoneStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn MilestoneStore> {
        &self.store
    }

    /// Parse `message` and handle the resulting intent.
    pub async fn respond(&self, message: &str) -> QueryResult {
        let intent = intent::parse(message);
        tracing::debug!(?intent, "classified message");
        self.handle(intent).await
    }

    /// Execute one intent against the store. Store errors are not retried.
    pub async fn handle(&self, intent: Intent) -> QueryResult {
        match intent {
            Intent::CodeLookup { code } => match self.store.find_by_code(&code).await {
                Ok(Some(record)) => QueryResult::Found(format_record(&record)),
                Ok(None) => QueryResult::NotFound(MILESTONE_NOT_FOUND.to_string()),
                Err(e) => {
                    tracing::error!(%code, error = %format!("{e:#}"), "code lookup failed");
                    QueryResult::Failed
                }
            },
            Intent::DomainLevelLookup { domain, level } => {
                match self.store.find_by_domain_and_level(&domain, level).await {
                    Ok(records) if records.is_empty() => {
                        QueryResult::NotFound(NO_MILESTONES_FOR_DOMAIN_LEVEL.to_string())
                    }
                    Ok(records) => QueryResult::Found(format_listing(&domain, level, &records)),
                    Err(e) => {
                        tracing::error!(
                            %domain,
                            level,
                            error = %format!("{e:#}"),
                            "domain/level lookup failed"
                        );
                        QueryResult::Failed
                    }
                }
            }
            Intent::Unrecognized => QueryResult::Rejected,
        }
    }
}

fn format_record(record: &MilestoneRecord) -> String {
    format!(
        "Milestone: {}, Domain: {}, Level: {}",
        record.milestone, record.domain, record.level
    )
}

fn format_listing(domain: &str, level: i64, records: &[MilestoneRecord]) -> String {
    let lines: Vec<String> = records
        .iter()
        .map(|r| format!("Code: {}, Milestone: {}", r.code, r.milestone))
        .collect();
    format!(
        "Milestones for domain {} at level {}:\n{}",
        domain,
        level,
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use anyhow::{bail, Result};
    use async_trait::async_trait;

    use super::*;
    use crate::store::memory::InMemoryStore;

    fn service(records: Vec<MilestoneRecord>) -> QueryService {
        QueryService::new(Arc::new(InMemoryStore::with_records(records)))
    }

    /// A store whose every read fails.
    struct BrokenStore;

    #[async_trait]
    impl MilestoneStore for BrokenStore {
        async fn find_by_code(&self, _code: &str) -> Result<Option<MilestoneRecord>> {
            bail!("connection refused")
        }
        async fn find_by_domain_and_level(
            &self,
            _domain: &str,
            _level: i64,
        ) -> Result<Vec<MilestoneRecord>> {
            bail!("connection refused")
        }
        async fn distinct_codes(&self) -> Result<BTreeSet<String>> {
            bail!("connection refused")
        }
        async fn distinct_domains(&self) -> Result<BTreeSet<String>> {
            bail!("connection refused")
        }
        async fn is_empty(&self) -> Result<bool> {
            bail!("connection refused")
        }
        async fn count(&self) -> Result<usize> {
            bail!("connection refused")
        }
        async fn bulk_insert(&self, _records: &[MilestoneRecord]) -> Result<usize> {
            bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn test_code_lookup_found() {
        let svc = service(vec![MilestoneRecord::new(
            "ABC-1",
            2,
            "Language",
            "Says please",
        )]);
        let result = svc
            .handle(Intent::CodeLookup {
                code: "ABC-1".to_string(),
            })
            .await;
        assert_eq!(
            result,
            QueryResult::Found("Milestone: Says please, Domain: Language, Level: 2".to_string())
        );
    }

    #[tokio::test]
    async fn test_code_lookup_not_found() {
        let svc = service(vec![]);
        let result = svc
            .handle(Intent::CodeLookup {
                code: "ABC-1".to_string(),
            })
            .await;
        assert_eq!(result, QueryResult::NotFound("Milestone not found".to_string()));
        assert_eq!(result.reply(), Some("Milestone not found"));
    }

    #[tokio::test]
    async fn test_domain_level_lookup_lists_all_matches() {
        let svc = service(vec![
            MilestoneRecord::new("LAN-1", 2, "Language", "Says please"),
            MilestoneRecord::new("LAN-2", 3, "Language", "Names colours"),
            MilestoneRecord::new("LAN-3", 2, "Language", "Says thank you"),
        ]);
        let result = svc
            .handle(Intent::DomainLevelLookup {
                domain: "Language".to_string(),
                level: 2,
            })
            .await;
        assert_eq!(
            result,
            QueryResult::Found(
                "Milestones for domain Language at level 2:\n\
                 Code: LAN-1, Milestone: Says please\n\
                 Code: LAN-3, Milestone: Says thank you"
                    .to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_domain_level_lookup_not_found() {
        let svc = service(vec![MilestoneRecord::new(
            "LAN-1",
            2,
            "Language",
            "Says please",
        )]);
        let result = svc
            .handle(Intent::DomainLevelLookup {
                domain: "Language".to_string(),
                level: 9,
            })
            .await;
        assert_eq!(
            result,
            QueryResult::NotFound("No milestones found for this domain and level".to_string())
        );
    }

    #[tokio::test]
    async fn test_oversized_level_is_not_found() {
        let svc = service(vec![MilestoneRecord::new("MAN-1", 1, "Mand", "First")]);
        assert_eq!(
            svc.respond("Domain: Mand, Level: 99999999999999999999").await,
            QueryResult::NotFound("No milestones found for this domain and level".to_string())
        );
    }

    #[tokio::test]
    async fn test_unrecognized_is_rejected() {
        let svc = service(vec![]);
        assert_eq!(svc.handle(Intent::Unrecognized).await, QueryResult::Rejected);
        assert_eq!(svc.respond("hello world").await, QueryResult::Rejected);
        assert_eq!(QueryResult::Rejected.reply(), None);
    }

    #[tokio::test]
    async fn test_store_failure_is_failed() {
        let svc = QueryService::new(Arc::new(BrokenStore));
        assert_eq!(svc.respond("ABC-1").await, QueryResult::Failed);
        assert_eq!(
            svc.respond("Domain: Language, Level: 2").await,
            QueryResult::Failed
        );
        // Unrecognized messages never touch the store.
        assert_eq!(svc.respond("hello").await, QueryResult::Rejected);
    }

    #[tokio::test]
    async fn test_respond_parses_then_handles() {
        let svc = service(vec![MilestoneRecord::new(
            "MAN-1",
            1,
            "Mand",
            "Emits 2 words, signs, or PECS",
        )]);
        assert_eq!(
            svc.respond(" MAN-1 ").await,
            QueryResult::Found(
                "Milestone: Emits 2 words, signs, or PECS, Domain: Mand, Level: 1".to_string()
            )
        );
        assert_eq!(
            svc.respond("Domain: Mand, Level: 1").await,
            QueryResult::Found(
                "Milestones for domain Mand at level 1:\nCode: MAN-1, Milestone: Emits 2 words, signs, or PECS"
                    .to_string()
            )
        );
    }
}
