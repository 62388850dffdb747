//! msgstore-export - WhatsApp Message History Extraction
//!
//! A Rust library for extracting, aggregating and reporting conversational
//! records from a WhatsApp Android `msgstore.db` SQLite datastore.
//!
//! # Features
//!
//! - Read-only extraction of chats, contacts, messages and revoked messages
//! - Portable JSON snapshot with deterministic ordering
//! - SHA-256 integrity digest of the source file
//! - Aggregate statistics (counts, top-K active chats, daily time series)
//! - Role-colored terminal transcript rendering

/// Configuration management
pub mod config;
/// Read-only datastore access and extraction queries
pub mod db;
/// Integrity digest of the source file
pub mod digest;
/// Error types
pub mod error;
/// Logging setup and utilities
pub mod logging;
/// Typed entity records and snapshot serialization
pub mod models;
/// Transcript rendering
pub mod report;
/// msgstore.db schema definitions
pub mod schema;
/// Extraction pipeline orchestration
pub mod service;
/// Snapshot sink and loader
pub mod snapshot;
/// Aggregation over extracted snapshots
pub mod stats;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use db::Msgstore;
pub use error::{ExtractError, Result};
pub use models::{MessageRecord, RevokedMessageRecord, SenderIdentity, Snapshot};
pub use service::{run_export, ExportOptions, ExportOutcome};
