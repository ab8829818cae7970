use anyhow::Result;

use milestone_core::store::MilestoneStore;

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

/// CLI entry point for `milestones codes`.
pub async fn run_codes(config: &Config) -> Result<()> {
    let store = SqliteStore::open(config).await?;
    for code in store.distinct_codes().await? {
        println!("{}", code);
    }
    Ok(())
}

/// CLI entry point for `milestones domains`.
pub async fn run_domains(config: &Config) -> Result<()> {
    let store = SqliteStore::open(config).await?;
    for domain in store.distinct_domains().await? {
        println!("{}", domain);
    }
    Ok(())
}
