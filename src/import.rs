//! One-time CSV import of milestone reference data.
//!
//! The reference file has the header `Skill Code, Level, Domain, Milestone`.
//! [`load_if_empty`] only reads it when the store holds no records, so
//! running the import any number of times never duplicates data.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use milestone_core::intent::is_milestone_code;
use milestone_core::models::MilestoneRecord;
use milestone_core::store::MilestoneStore;

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: level '{value}' is not an integer")]
    InvalidLevel { row: usize, value: String },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Result of a guarded import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The store already had data; the file was not read.
    Skipped { existing: usize },
    /// The store was empty and has been populated.
    Imported { inserted: usize },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Skill Code")]
    code: String,
    #[serde(rename = "Level")]
    level: String,
    #[serde(rename = "Domain")]
    domain: String,
    #[serde(rename = "Milestone")]
    milestone: String,
}

/// Parse milestone records from CSV data.
///
/// Rows with a malformed code, or repeating an earlier code, are skipped
/// with a warning. A non-integer level fails the whole import.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<MilestoneRecord>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for (i, result) in csv_reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1.
        let row_no = i + 2;
        let row = result?;

        let level: i64 = row.level.parse().map_err(|_| ImportError::InvalidLevel {
            row: row_no,
            value: row.level.clone(),
        })?;

        if !is_milestone_code(&row.code) {
            tracing::warn!(row = row_no, code = %row.code, "skipping row with malformed skill code");
            continue;
        }
        if !seen.insert(row.code.clone()) {
            tracing::warn!(row = row_no, code = %row.code, "skipping duplicate skill code");
            continue;
        }

        records.push(MilestoneRecord {
            code: row.code,
            level,
            domain: row.domain,
            milestone: row.milestone,
        });
    }

    Ok(records)
}

/// Read milestone records from a CSV file.
pub fn read_records_from_path(path: &Path) -> Result<Vec<MilestoneRecord>, ImportError> {
    let file = std::fs::File::open(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_records(file)
}

/// Populate `store` from the CSV at `path`, but only if it is empty.
pub async fn load_if_empty(
    store: &dyn MilestoneStore,
    path: &Path,
) -> Result<ImportOutcome, ImportError> {
    if !store.is_empty().await? {
        let existing = store.count().await?;
        tracing::info!(existing, "data already exists, skipping CSV load");
        return Ok(ImportOutcome::Skipped { existing });
    }

    let records = read_records_from_path(path)?;
    let inserted = store.bulk_insert(&records).await?;
    tracing::info!(inserted, path = %path.display(), "CSV data loaded");
    Ok(ImportOutcome::Imported { inserted })
}

/// CLI entry point for `milestones import`.
///
/// `csv_override` replaces `[import].csv_path` for this run.
pub async fn run_import(config: &Config, csv_override: Option<&Path>) -> anyhow::Result<()> {
    let path = csv_override.unwrap_or(config.import.csv_path.as_path());
    let store = SqliteStore::open(config).await?;

    match load_if_empty(&store, path).await? {
        ImportOutcome::Imported { inserted } => {
            println!("Imported {} milestones from {}.", inserted, path.display());
        }
        ImportOutcome::Skipped { existing } => {
            println!(
                "Data already exists ({} milestones), skipping CSV load.",
                existing
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use milestone_core::store::memory::InMemoryStore;

    const CSV: &str = "\
Skill Code,Level,Domain,Milestone
MAN-1,1,Mand,\"Emits 2 words, signs, or PECS\"
MAN-2, 1 ,Mand,Emits 4 different mands
TAC-1,1,Tact,Tacts 2 items
";

    #[test]
    fn test_read_records() {
        let records = read_records(CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            MilestoneRecord::new("MAN-1", 1, "Mand", "Emits 2 words, signs, or PECS")
        );
        assert_eq!(records[1].level, 1);
    }

    #[test]
    fn test_skips_duplicate_and_malformed_codes() {
        let csv = "\
Skill Code,Level,Domain,Milestone
MAN-1,1,Mand,First
MAN-1,2,Mand,Second
bad code,1,Mand,Third
";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].milestone, "First");
    }

    #[test]
    fn test_invalid_level_reports_row() {
        let csv = "\
Skill Code,Level,Domain,Milestone
MAN-1,1,Mand,First
MAN-2,one,Mand,Second
";
        let err = read_records(csv.as_bytes()).unwrap_err();
        match err {
            ImportError::InvalidLevel { row, value } => {
                assert_eq!(row, 3);
                assert_eq!(value, "one");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_column_is_csv_error() {
        let csv = "Skill Code,Level,Domain\nMAN-1,1,Mand\n";
        assert!(matches!(
            read_records(csv.as_bytes()),
            Err(ImportError::Csv(_))
        ));
    }

    #[tokio::test]
    async fn test_load_if_empty_is_idempotent() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("milestones.csv");
        std::fs::write(&path, CSV).unwrap();

        let store = InMemoryStore::new();
        let first = load_if_empty(&store, &path).await.unwrap();
        assert_eq!(first, ImportOutcome::Imported { inserted: 3 });

        let second = load_if_empty(&store, &path).await.unwrap();
        assert_eq!(second, ImportOutcome::Skipped { existing: 3 });
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_load_if_empty_skips_without_reading_file() {
        let store = InMemoryStore::with_records(vec![MilestoneRecord::new(
            "MAN-1", 1, "Mand", "First",
        )]);
        let outcome = load_if_empty(&store, Path::new("/nonexistent.csv"))
            .await
            .unwrap();
        assert_eq!(outcome, ImportOutcome::Skipped { existing: 1 });
    }

    #[tokio::test]
    async fn test_load_if_empty_missing_file() {
        let store = InMemoryStore::new();
        let err = load_if_empty(&store, Path::new("/nonexistent.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
        assert!(store.is_empty().await.unwrap());
    }
}
