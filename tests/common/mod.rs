/*!
 * Common test utilities for the locadapt test suite
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

use locadapt::autosave::SnapshotSink;
use locadapt::store::models::{
    AiAuditRecord, ContentSegment, SegmentType, SnapshotRecord, TmEntryKind, TmEntryRecord,
    TmMatchKind, TranslationMethod, TranslationStatus,
};

/// Build a pending segment for tests
pub fn make_segment(id: &str, project_id: &str, index: i64, source_text: &str) -> ContentSegment {
    ContentSegment::new(
        id,
        project_id,
        index,
        SegmentType::Body,
        format!("Segment {}", index),
        source_text,
    )
}

/// Build a completed segment with the given method and match percentage
pub fn make_translated_segment(
    id: &str,
    project_id: &str,
    index: i64,
    method: TranslationMethod,
    tm_match_percentage: Option<u8>,
) -> ContentSegment {
    let mut segment = make_segment(id, project_id, index, "Take once daily with food.");
    segment.translated_text = Some("Prendre une fois par jour avec de la nourriture.".to_string());
    segment.translation_status = TranslationStatus::Complete;
    segment.translation_method = Some(method);
    segment.confidence = 90;
    segment.tm_match_percentage = tm_match_percentage;
    segment
}

/// Build a segment-kind TM entry for seeding the memory index
pub fn make_tm_entry(project_id: &str, segment_id: &str, source_text: &str) -> TmEntryRecord {
    TmEntryRecord {
        id: format!("tm-{}", segment_id),
        project_id: project_id.to_string(),
        segment_id: segment_id.to_string(),
        source_text: source_text.to_string(),
        translated_text: "traduction approuvée".to_string(),
        source_language: "eng".to_string(),
        target_language: "fra".to_string(),
        domain_context: None,
        entry_kind: TmEntryKind::Segment,
        match_type: TmMatchKind::Exact,
        usage_count: 0,
        approved_by: None,
        created_at: 0,
        last_used_at: 0,
    }
}

/// Snapshot sink recording every write in memory
#[derive(Default)]
pub struct MemorySink {
    pub snapshots: Mutex<Vec<SnapshotRecord>>,
    pub tm_entries: Mutex<Vec<TmEntryRecord>>,
    pub ai_audits: Mutex<Vec<AiAuditRecord>>,
    /// When true, promotion calls fail while the primary save succeeds
    pub fail_promotions: bool,
    /// Number of initial save attempts that fail before writes succeed
    pub fail_first_saves: usize,
    save_attempts: AtomicUsize,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_failing_promotions() -> Arc<Self> {
        Arc::new(Self {
            fail_promotions: true,
            ..Self::default()
        })
    }

    pub fn with_failing_saves(fail_first_saves: usize) -> Arc<Self> {
        Arc::new(Self {
            fail_first_saves,
            ..Self::default()
        })
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.lock().len()
    }
}

#[async_trait]
impl SnapshotSink for MemorySink {
    async fn save_snapshot(
        &self,
        snapshot: &SnapshotRecord,
        _segments: &[ContentSegment],
    ) -> Result<()> {
        let attempt = self.save_attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.fail_first_saves {
            anyhow::bail!("simulated storage outage");
        }
        self.snapshots.lock().push(snapshot.clone());
        Ok(())
    }

    async fn promote_tm_entry(&self, entry: &TmEntryRecord) -> Result<()> {
        if self.fail_promotions {
            anyhow::bail!("promotion unavailable");
        }
        self.tm_entries.lock().push(entry.clone());
        Ok(())
    }

    async fn record_ai_audit(&self, record: &AiAuditRecord) -> Result<()> {
        if self.fail_promotions {
            anyhow::bail!("audit unavailable");
        }
        self.ai_audits.lock().push(record.clone());
        Ok(())
    }
}

/// Snapshot sink whose primary save always fails (simulated network error)
#[derive(Default)]
pub struct FailingSink {
    pub attempts: AtomicUsize,
}

impl FailingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSink for FailingSink {
    async fn save_snapshot(
        &self,
        _snapshot: &SnapshotRecord,
        _segments: &[ContentSegment],
    ) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        anyhow::bail!("simulated network error")
    }

    async fn promote_tm_entry(&self, _entry: &TmEntryRecord) -> Result<()> {
        anyhow::bail!("simulated network error")
    }

    async fn record_ai_audit(&self, _record: &AiAuditRecord) -> Result<()> {
        anyhow::bail!("simulated network error")
    }
}
