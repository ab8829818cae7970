//! # Milestone Lookup
//!
//! A catalog lookup service for developmental milestone records.
//!
//! Milestones are loaded once from a reference CSV into SQLite and served
//! through a message-based query API: a message is either a skill code
//! (`MAN-1`) or a domain/level request (`Domain: Mand, Level: 1`).
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌────────────┐   ┌──────────┐
//! │ CSV file  │──▶│  Importer  │──▶│  SQLite  │
//! └───────────┘   └────────────┘   └────┬─────┘
//!                                       │
//!                   ┌───────────────────┤
//!                   ▼                   ▼
//!              ┌──────────┐       ┌──────────┐
//!              │   CLI    │       │   HTTP   │
//!              └──────────┘       └──────────┘
//! ```
//!
//! The record model, store trait, intent parser, and query service live in
//! the `milestone-core` crate.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |
//! | [`sqlite_store`] | SQLite `MilestoneStore` backend |
//! | [`import`] | One-time CSV import |
//! | [`lookup`] | CLI message lookup |
//! | [`listing`] | CLI code/domain listing |
//! | [`server`] | HTTP server |
//! | [`logging`] | Tracing subscriber setup |

pub mod config;
pub mod db;
pub mod import;
pub mod listing;
pub mod logging;
pub mod lookup;
pub mod migrate;
pub mod server;
pub mod sqlite_store;
