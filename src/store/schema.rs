/*!
 * Database schema definitions and migrations.
 *
 * This module contains the SQL schema for all store tables
 * and handles schema migrations for version upgrades.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing store schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        info!(
            "Migrating store schema from v{} to v{}",
            current_version, SCHEMA_VERSION
        );
        migrate_schema(conn, current_version)?;
    } else {
        debug!("Store schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all store tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    // WAL mode for better concurrency and crash recovery
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS segments (
            id TEXT NOT NULL,
            project_id TEXT NOT NULL,
            segment_index INTEGER NOT NULL,
            segment_type TEXT NOT NULL,
            segment_name TEXT NOT NULL,
            source_text TEXT NOT NULL,
            translated_text TEXT,
            complexity_level TEXT NOT NULL DEFAULT 'medium',
            cultural_sensitivity_level TEXT NOT NULL DEFAULT 'medium',
            regulatory_risk_level TEXT NOT NULL DEFAULT 'medium',
            translation_status TEXT NOT NULL DEFAULT 'pending',
            translation_method TEXT,
            confidence INTEGER NOT NULL DEFAULT 0,
            tm_match_percentage INTEGER,
            PRIMARY KEY (project_id, id)
        );

        CREATE INDEX IF NOT EXISTS idx_segments_project
            ON segments (project_id, segment_index);

        CREATE TABLE IF NOT EXISTS tm_entries (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            segment_id TEXT NOT NULL,
            source_text TEXT NOT NULL,
            translated_text TEXT NOT NULL,
            source_language TEXT NOT NULL,
            target_language TEXT NOT NULL,
            domain_context TEXT,
            entry_kind TEXT NOT NULL DEFAULT 'segment',
            match_type TEXT NOT NULL DEFAULT 'new',
            usage_count INTEGER NOT NULL DEFAULT 0,
            approved_by TEXT,
            created_at INTEGER NOT NULL,
            last_used_at INTEGER NOT NULL,
            UNIQUE (project_id, segment_id)
        );

        CREATE INDEX IF NOT EXISTS idx_tm_entries_language_pair
            ON tm_entries (source_language, target_language);

        CREATE TABLE IF NOT EXISTS ai_audit_log (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            segment_id TEXT NOT NULL,
            source_text TEXT NOT NULL,
            raw_output TEXT NOT NULL,
            model TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_ai_audit_segment
            ON ai_audit_log (project_id, segment_id);

        CREATE TABLE IF NOT EXISTS workflow_snapshots (
            project_id TEXT PRIMARY KEY,
            segments_json TEXT NOT NULL,
            current_phase INTEGER NOT NULL,
            phases_completed_json TEXT NOT NULL,
            progress INTEGER NOT NULL,
            content_hash TEXT NOT NULL,
            saved_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS init_registry (
            key TEXT PRIMARY KEY,
            initialized_at INTEGER NOT NULL
        );
        "#,
    )
    .context("Failed to create store tables")?;

    Ok(())
}

/// Migrate schema from an older version
fn migrate_schema(conn: &Connection, from_version: i32) -> Result<()> {
    // No migrations yet; recreate missing tables and bump the version
    let _ = from_version;
    create_all_tables(conn)?;
    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}
