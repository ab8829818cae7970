//! Message lookup from the command line.
//!
//! Runs a message through the same validation, parsing, and query path as
//! `POST /api/chatbot` and prints the reply.

use std::sync::Arc;

use anyhow::{bail, Result};

use milestone_core::query::{QueryResult, QueryService};

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

/// CLI entry point for `milestones lookup "<message>"`.
pub async fn run_lookup(config: &Config, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        bail!("Message must be a non-empty string");
    }

    let store = SqliteStore::open(config).await?;
    let service = QueryService::new(Arc::new(store));

    match service.respond(message).await {
        QueryResult::Found(reply) | QueryResult::NotFound(reply) => {
            println!("{}", reply);
            Ok(())
        }
        QueryResult::Rejected => bail!(
            "Invalid request format: expected a code like MAN-1 or \"Domain: <name>, Level: <n>\""
        ),
        QueryResult::Failed => bail!("Server error occurred while reading the database"),
    }
}
