/*!
 * Repository layer for store operations.
 *
 * This module provides a high-level API for all segment-store operations,
 * abstracting away the SQL details and providing type-safe access. The
 * engine treats this as a generic keyed-record service: idempotent upserts,
 * filtered updates and selects.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};

use super::connection::StoreConnection;
use super::models::{
    AiAuditRecord, ContentSegment, SnapshotRecord, TmEntryRecord, TranslationMethod,
    TranslationStatus,
};

/// Repository for store operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: StoreConnection,
}

impl Repository {
    /// Create a new repository with the given store connection
    pub fn new(db: StoreConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = StoreConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = StoreConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Get the underlying connection
    pub fn connection(&self) -> &StoreConnection {
        &self.db
    }

    // =========================================================================
    // Segment Operations
    // =========================================================================

    /// Insert a segment if it does not already exist.
    ///
    /// Idempotent upsert keyed by `(project_id, id)`; a duplicate insert is
    /// ignored, not an error. Returns true when a new row was created.
    pub async fn upsert_segment(&self, segment: &ContentSegment) -> Result<bool> {
        let segment = segment.clone();

        self.db
            .execute_async(move |conn| {
                let changed = conn.execute(
                    r#"
                    INSERT OR IGNORE INTO segments (
                        id, project_id, segment_index, segment_type, segment_name,
                        source_text, translated_text, complexity_level,
                        cultural_sensitivity_level, regulatory_risk_level,
                        translation_status, translation_method, confidence,
                        tm_match_percentage
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                    "#,
                    params![
                        segment.id,
                        segment.project_id,
                        segment.segment_index,
                        segment.segment_type.to_string(),
                        segment.segment_name,
                        segment.source_text,
                        segment.translated_text,
                        segment.complexity_level.to_string(),
                        segment.cultural_sensitivity_level.to_string(),
                        segment.regulatory_risk_level.to_string(),
                        segment.translation_status.to_string(),
                        segment.translation_method.map(|m| m.to_string()),
                        segment.confidence as i64,
                        segment.tm_match_percentage.map(|p| p as i64),
                    ],
                )?;
                Ok(changed > 0)
            })
            .await
    }

    /// Get a segment by project and segment id
    pub async fn get_segment(
        &self,
        project_id: &str,
        segment_id: &str,
    ) -> Result<Option<ContentSegment>> {
        let project_id = project_id.to_string();
        let segment_id = segment_id.to_string();

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        &format!(
                            "SELECT {} FROM segments WHERE project_id = ?1 AND id = ?2",
                            SEGMENT_COLUMNS
                        ),
                        params![project_id, segment_id],
                        row_to_segment,
                    )
                    .optional()?;
                Ok(result)
            })
            .await
    }

    /// List all segments for a project, ordered by segment index
    pub async fn list_segments(&self, project_id: &str) -> Result<Vec<ContentSegment>> {
        let project_id = project_id.to_string();

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM segments WHERE project_id = ?1 ORDER BY segment_index",
                    SEGMENT_COLUMNS
                ))?;
                let rows = stmt.query_map(params![project_id], row_to_segment)?;
                let mut segments = Vec::new();
                for row in rows {
                    segments.push(row?);
                }
                Ok(segments)
            })
            .await
    }

    /// Record a finished translation on a segment row.
    ///
    /// Only called after a successful leverage result; a failed translation
    /// attempt never touches the row.
    pub async fn update_segment_translation(
        &self,
        project_id: &str,
        segment_id: &str,
        translated_text: &str,
        method: TranslationMethod,
        confidence: u8,
        tm_match_percentage: Option<u8>,
    ) -> Result<()> {
        let project_id = project_id.to_string();
        let segment_id = segment_id.to_string();
        let translated_text = translated_text.to_string();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    UPDATE segments
                    SET translated_text = ?1,
                        translation_status = ?2,
                        translation_method = ?3,
                        confidence = ?4,
                        tm_match_percentage = ?5
                    WHERE project_id = ?6 AND id = ?7
                    "#,
                    params![
                        translated_text,
                        TranslationStatus::Complete.to_string(),
                        method.to_string(),
                        confidence as i64,
                        tm_match_percentage.map(|p| p as i64),
                        project_id,
                        segment_id,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    // =========================================================================
    // Translation Memory Operations
    // =========================================================================

    /// List TM entries for a language pair, optionally scoped by domain.
    ///
    /// Scoring/classification against a concrete source text happens in
    /// `leverage::matching`; this returns raw candidates only.
    pub async fn list_tm_entries(
        &self,
        source_language: &str,
        target_language: &str,
        domain_context: Option<&str>,
    ) -> Result<Vec<TmEntryRecord>> {
        let source_language = source_language.to_string();
        let target_language = target_language.to_string();
        let domain_context = domain_context.map(|d| d.to_string());

        self.db
            .execute_async(move |conn| {
                let mut entries = Vec::new();
                match &domain_context {
                    Some(domain) => {
                        let mut stmt = conn.prepare(&format!(
                            "SELECT {} FROM tm_entries
                             WHERE source_language = ?1 AND target_language = ?2
                               AND (domain_context IS NULL OR domain_context = ?3)",
                            TM_COLUMNS
                        ))?;
                        let rows = stmt.query_map(
                            params![source_language, target_language, domain],
                            row_to_tm_entry,
                        )?;
                        for row in rows {
                            entries.push(row?);
                        }
                    }
                    None => {
                        let mut stmt = stmt_tm_by_pair(conn)?;
                        let rows = stmt
                            .query_map(params![source_language, target_language], row_to_tm_entry)?;
                        for row in rows {
                            entries.push(row?);
                        }
                    }
                }
                Ok(entries)
            })
            .await
    }

    /// Get the TM entry recorded for a segment, if any
    pub async fn get_tm_entry(
        &self,
        project_id: &str,
        segment_id: &str,
    ) -> Result<Option<TmEntryRecord>> {
        let project_id = project_id.to_string();
        let segment_id = segment_id.to_string();

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        &format!(
                            "SELECT {} FROM tm_entries WHERE project_id = ?1 AND segment_id = ?2",
                            TM_COLUMNS
                        ),
                        params![project_id, segment_id],
                        row_to_tm_entry,
                    )
                    .optional()?;
                Ok(result)
            })
            .await
    }

    /// Strengthen an existing TM entry after human review.
    ///
    /// Increments usage count and refreshes approval metadata in place.
    /// Returns false (a no-op) when no prior entry exists; approval never
    /// fabricates new memory, that is the batch-save promotion's job.
    pub async fn touch_tm_entry(
        &self,
        project_id: &str,
        segment_id: &str,
        reviewer_id: &str,
    ) -> Result<bool> {
        let project_id = project_id.to_string();
        let segment_id = segment_id.to_string();
        let reviewer_id = reviewer_id.to_string();
        let now = chrono::Utc::now().timestamp();

        self.db
            .execute_async(move |conn| {
                let changed = conn.execute(
                    r#"
                    UPDATE tm_entries
                    SET usage_count = usage_count + 1,
                        last_used_at = ?1,
                        approved_by = ?2
                    WHERE project_id = ?3 AND segment_id = ?4
                    "#,
                    params![now, reviewer_id, project_id, segment_id],
                )?;
                Ok(changed > 0)
            })
            .await
    }

    /// Insert or refresh a TM entry keyed by `(project_id, segment_id)`.
    ///
    /// This is the promotion path that seeds new long-term memory during a
    /// batch save. The recorded match type comes from the caller and is
    /// preserved as-is.
    pub async fn upsert_tm_entry(&self, entry: &TmEntryRecord) -> Result<()> {
        let entry = entry.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO tm_entries (
                        id, project_id, segment_id, source_text, translated_text,
                        source_language, target_language, domain_context, entry_kind,
                        match_type, usage_count, approved_by, created_at, last_used_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                    ON CONFLICT (project_id, segment_id) DO UPDATE SET
                        source_text = excluded.source_text,
                        translated_text = excluded.translated_text,
                        domain_context = excluded.domain_context,
                        match_type = excluded.match_type,
                        last_used_at = excluded.last_used_at
                    "#,
                    params![
                        entry.id,
                        entry.project_id,
                        entry.segment_id,
                        entry.source_text,
                        entry.translated_text,
                        entry.source_language,
                        entry.target_language,
                        entry.domain_context,
                        entry.entry_kind.to_string(),
                        entry.match_type.to_string(),
                        entry.usage_count,
                        entry.approved_by,
                        entry.created_at,
                        entry.last_used_at,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    // =========================================================================
    // AI Audit Operations
    // =========================================================================

    /// Record raw AI output for a segment
    pub async fn insert_ai_audit(&self, record: &AiAuditRecord) -> Result<()> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO ai_audit_log (
                        id, project_id, segment_id, source_text, raw_output, model, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    "#,
                    params![
                        record.id,
                        record.project_id,
                        record.segment_id,
                        record.source_text,
                        record.raw_output,
                        record.model,
                        record.created_at,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    /// Count audit records for a segment (used in tests and reporting)
    pub async fn count_ai_audits(&self, project_id: &str, segment_id: &str) -> Result<i64> {
        let project_id = project_id.to_string();
        let segment_id = segment_id.to_string();

        self.db
            .execute_async(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM ai_audit_log WHERE project_id = ?1 AND segment_id = ?2",
                    params![project_id, segment_id],
                    |row| row.get(0),
                )?;
                Ok(count)
            })
            .await
    }

    // =========================================================================
    // Snapshot Operations
    // =========================================================================

    /// Persist a full workflow snapshot as one atomic logical write.
    ///
    /// Replaces the previous snapshot for the project; segment rows are
    /// refreshed inside the same transaction so a reader never observes a
    /// half-written save.
    pub async fn save_snapshot(
        &self,
        snapshot: &SnapshotRecord,
        segments: &[ContentSegment],
    ) -> Result<()> {
        let snapshot = snapshot.clone();
        let segments = segments.to_vec();

        self.db
            .transaction_async(move |tx| {
                tx.execute(
                    r#"
                    INSERT OR REPLACE INTO workflow_snapshots (
                        project_id, segments_json, current_phase,
                        phases_completed_json, progress, content_hash, saved_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    "#,
                    params![
                        snapshot.project_id,
                        snapshot.segments_json,
                        snapshot.current_phase as i64,
                        snapshot.phases_completed_json,
                        snapshot.progress as i64,
                        snapshot.content_hash,
                        snapshot.saved_at,
                    ],
                )?;

                for segment in &segments {
                    tx.execute(
                        r#"
                        INSERT OR REPLACE INTO segments (
                            id, project_id, segment_index, segment_type, segment_name,
                            source_text, translated_text, complexity_level,
                            cultural_sensitivity_level, regulatory_risk_level,
                            translation_status, translation_method, confidence,
                            tm_match_percentage
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                        "#,
                        params![
                            segment.id,
                            segment.project_id,
                            segment.segment_index,
                            segment.segment_type.to_string(),
                            segment.segment_name,
                            segment.source_text,
                            segment.translated_text,
                            segment.complexity_level.to_string(),
                            segment.cultural_sensitivity_level.to_string(),
                            segment.regulatory_risk_level.to_string(),
                            segment.translation_status.to_string(),
                            segment.translation_method.map(|m| m.to_string()),
                            segment.confidence as i64,
                            segment.tm_match_percentage.map(|p| p as i64),
                        ],
                    )?;
                }

                Ok(())
            })
            .await
    }

    /// Load the latest snapshot for a project, if one exists
    pub async fn latest_snapshot(&self, project_id: &str) -> Result<Option<SnapshotRecord>> {
        let project_id = project_id.to_string();

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT project_id, segments_json, current_phase,
                               phases_completed_json, progress, content_hash, saved_at
                        FROM workflow_snapshots WHERE project_id = ?1
                        "#,
                        params![project_id],
                        |row| {
                            Ok(SnapshotRecord {
                                project_id: row.get(0)?,
                                segments_json: row.get(1)?,
                                current_phase: row.get::<_, i64>(2)? as u8,
                                phases_completed_json: row.get(3)?,
                                progress: row.get::<_, i64>(4)? as u8,
                                content_hash: row.get(5)?,
                                saved_at: row.get(6)?,
                            })
                        },
                    )
                    .optional()?;
                Ok(result)
            })
            .await
    }

    // =========================================================================
    // Initialization Registry
    // =========================================================================

    /// Check the durable initialization marker for a key
    pub async fn is_initialized(&self, key: &str) -> Result<bool> {
        let key = key.to_string();

        self.db
            .execute_async(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM init_registry WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )?;
                Ok(count > 0)
            })
            .await
    }

    /// Record the durable initialization marker for a key
    pub async fn mark_initialized(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        let now = chrono::Utc::now().timestamp();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "INSERT OR IGNORE INTO init_registry (key, initialized_at) VALUES (?1, ?2)",
                    params![key, now],
                )?;
                debug!("Initialization marker recorded for key {}", key);
                Ok(())
            })
            .await
    }
}

// Shared column lists keep SELECTs and row mappers in sync
const SEGMENT_COLUMNS: &str = "id, project_id, segment_index, segment_type, segment_name, \
     source_text, translated_text, complexity_level, cultural_sensitivity_level, \
     regulatory_risk_level, translation_status, translation_method, confidence, \
     tm_match_percentage";

const TM_COLUMNS: &str = "id, project_id, segment_id, source_text, translated_text, \
     source_language, target_language, domain_context, entry_kind, match_type, \
     usage_count, approved_by, created_at, last_used_at";

fn stmt_tm_by_pair(conn: &Connection) -> Result<rusqlite::Statement<'_>> {
    Ok(conn.prepare(&format!(
        "SELECT {} FROM tm_entries WHERE source_language = ?1 AND target_language = ?2",
        TM_COLUMNS
    ))?)
}

fn row_to_segment(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContentSegment> {
    Ok(ContentSegment {
        id: row.get(0)?,
        project_id: row.get(1)?,
        segment_index: row.get(2)?,
        segment_type: row
            .get::<_, String>(3)?
            .parse()
            .unwrap_or(super::models::SegmentType::Body),
        segment_name: row.get(4)?,
        source_text: row.get(5)?,
        translated_text: row.get(6)?,
        complexity_level: row
            .get::<_, String>(7)?
            .parse()
            .unwrap_or(super::models::RiskLevel::Medium),
        cultural_sensitivity_level: row
            .get::<_, String>(8)?
            .parse()
            .unwrap_or(super::models::RiskLevel::Medium),
        regulatory_risk_level: row
            .get::<_, String>(9)?
            .parse()
            .unwrap_or(super::models::RiskLevel::Medium),
        translation_status: row
            .get::<_, String>(10)?
            .parse()
            .unwrap_or(TranslationStatus::Pending),
        translation_method: row
            .get::<_, Option<String>>(11)?
            .and_then(|m| m.parse().ok()),
        confidence: row.get::<_, i64>(12)? as u8,
        tm_match_percentage: row.get::<_, Option<i64>>(13)?.map(|p| p as u8),
    })
}

fn row_to_tm_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<TmEntryRecord> {
    Ok(TmEntryRecord {
        id: row.get(0)?,
        project_id: row.get(1)?,
        segment_id: row.get(2)?,
        source_text: row.get(3)?,
        translated_text: row.get(4)?,
        source_language: row.get(5)?,
        target_language: row.get(6)?,
        domain_context: row.get(7)?,
        entry_kind: row
            .get::<_, String>(8)?
            .parse()
            .unwrap_or(super::models::TmEntryKind::Segment),
        match_type: row
            .get::<_, String>(9)?
            .parse()
            .unwrap_or(super::models::TmMatchKind::New),
        usage_count: row.get(10)?,
        approved_by: row.get(11)?,
        created_at: row.get(12)?,
        last_used_at: row.get(13)?,
    })
}
