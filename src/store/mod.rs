/*!
 * Segment store module for persistent storage of segments, translation
 * memory, AI audit records and workflow snapshots.
 *
 * This module provides SQLite-based persistence for:
 * - Content segments with idempotent upsert semantics
 * - The long-term Translation Memory Index
 * - AI output audit records
 * - Full workflow snapshots written by the autosave controller
 * - The durable initialization registry
 */

// Allow dead code and unused imports - store types are for library consumers
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

// Re-export main types
pub use connection::StoreConnection;
pub use repository::Repository;
