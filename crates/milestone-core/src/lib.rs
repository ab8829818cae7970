//! # Milestone Core
//!
//! Shared logic for Milestone Lookup: the record model, the store
//! abstraction with an in-memory backend, the intent parser, and the
//! query service that turns a parsed intent into a reply.
//!
//! This crate contains no sqlx, HTTP, or filesystem dependencies. The
//! SQLite backend, CSV importer, and HTTP server live in the
//! `milestone-lookup` application crate.

pub mod intent;
pub mod models;
pub mod query;
pub mod store;
pub mod validate;
