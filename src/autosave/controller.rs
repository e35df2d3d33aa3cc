/*!
 * Autosave/persistence controller.
 *
 * Makes the in-memory segment collection durable without excessive write
 * traffic or data loss on transient failure: debounced saves, byte-level
 * change detection, bounded retry with exponential backoff, and
 * fire-and-forget promotion of qualifying segments into the Translation
 * Memory Index.
 *
 * The segment collection is owned by the caller; the controller only reads
 * it to serialize. An overlapping save simply re-serializes the by-then
 * newer state, so last-write-wins at full-snapshot granularity.
 */

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Notify;

use crate::app_config::AutosaveConfig;
use crate::errors::PersistenceError;
use crate::store::Repository;
use crate::store::models::{
    AiAuditRecord, ContentSegment, SnapshotRecord, TmEntryRecord, TranslationMethod,
    TranslationStatus,
};
use crate::workflow::WorkflowState;

use super::debounce::DebounceMachine;

/// Ephemeral save status for the editing session; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutosaveStatus {
    pub is_saving: bool,
    pub last_saved: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// Result of one save attempt cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Snapshot was written
    Saved,
    /// Nothing to do
    Skipped {
        /// Why the save was skipped, e.g. "no-changes"
        reason: &'static str,
    },
}

/// Persistence seam the controller writes through.
///
/// `Repository` is the production implementation; tests substitute failure
/// doubles to exercise the retry path.
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    /// Persist the full snapshot as one atomic logical write
    async fn save_snapshot(
        &self,
        snapshot: &SnapshotRecord,
        segments: &[ContentSegment],
    ) -> Result<()>;

    /// Seed or refresh a TM entry (best-effort promotion)
    async fn promote_tm_entry(&self, entry: &TmEntryRecord) -> Result<()>;

    /// Record raw AI output (best-effort audit)
    async fn record_ai_audit(&self, record: &AiAuditRecord) -> Result<()>;
}

#[async_trait]
impl SnapshotSink for Repository {
    async fn save_snapshot(
        &self,
        snapshot: &SnapshotRecord,
        segments: &[ContentSegment],
    ) -> Result<()> {
        Repository::save_snapshot(self, snapshot, segments).await
    }

    async fn promote_tm_entry(&self, entry: &TmEntryRecord) -> Result<()> {
        self.upsert_tm_entry(entry).await
    }

    async fn record_ai_audit(&self, record: &AiAuditRecord) -> Result<()> {
        self.insert_ai_audit(record).await
    }
}

/// Language/domain context stamped onto promoted records
#[derive(Debug, Clone)]
pub struct PromotionContext {
    /// Normalized source language code
    pub source_language: String,
    /// Normalized target language code
    pub target_language: String,
    /// Optional domain scope, e.g. therapeutic area
    pub domain_context: Option<String>,
    /// Model identifier recorded on AI audit rows
    pub model: String,
}

/// Serialized form of the full workflow snapshot
#[derive(Serialize)]
struct SnapshotPayload<'a> {
    segments: &'a [ContentSegment],
    current_phase: u8,
    phases_completed: Vec<u8>,
    progress: u8,
}

/// Debounced, durable persistence for one project's editing session
pub struct AutosaveController {
    sink: Arc<dyn SnapshotSink>,
    project_id: String,
    /// Caller-owned segment collection; read-only here
    segments: Arc<RwLock<Vec<ContentSegment>>>,
    /// Caller-owned workflow progress marker; read-only here
    workflow: Arc<RwLock<WorkflowState>>,
    settings: AutosaveConfig,
    promotion: PromotionContext,
    status: RwLock<AutosaveStatus>,
    machine: Mutex<DebounceMachine>,
    last_saved_hash: Mutex<Option<String>>,
    notify: Notify,
    alive: AtomicBool,
}

impl AutosaveController {
    /// Create a controller watching the given segment collection
    pub fn new(
        sink: Arc<dyn SnapshotSink>,
        project_id: impl Into<String>,
        segments: Arc<RwLock<Vec<ContentSegment>>>,
        workflow: Arc<RwLock<WorkflowState>>,
        settings: AutosaveConfig,
        promotion: PromotionContext,
    ) -> Arc<Self> {
        let machine = DebounceMachine::new(Duration::from_millis(settings.debounce_ms));
        Arc::new(Self {
            sink,
            project_id: project_id.into(),
            segments,
            workflow,
            settings,
            promotion,
            status: RwLock::new(AutosaveStatus::default()),
            machine: Mutex::new(machine),
            last_saved_hash: Mutex::new(None),
            notify: Notify::new(),
            alive: AtomicBool::new(true),
        })
    }

    /// Spawn the background task that drives debounced saves
    pub fn spawn(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.run().await })
    }

    /// Signal that the segment collection (or workflow marker) changed
    pub fn data_changed(&self) {
        if !self.alive.load(Ordering::SeqCst) {
            return;
        }
        self.machine.lock().on_data_changed(Instant::now());
        self.notify.notify_one();
    }

    /// Save immediately, bypassing both the debounce timer and the
    /// change-detection skip. Used for explicit "save now" and for
    /// save-before-navigation.
    pub async fn force_save(&self) -> Result<SaveOutcome, PersistenceError> {
        self.save(true).await
    }

    /// Run a save cycle without waiting for the debounce window, still
    /// honoring change detection: an unchanged collection is skipped with
    /// reason "no-changes"
    pub async fn save_now(&self) -> Result<SaveOutcome, PersistenceError> {
        self.save(false).await
    }

    /// Current save status snapshot
    pub fn status(&self) -> AutosaveStatus {
        self.status.read().clone()
    }

    /// Tear down: cancel any pending timer and stop applying new state.
    /// An in-flight save that was already dispatched runs to completion.
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.machine.lock().cancel();
        self.notify.notify_one();
    }

    /// Event loop: sleep until the debounce deadline, fire the save when
    /// the collection has been quiescent for the full window
    async fn run(&self) {
        while self.alive.load(Ordering::SeqCst) {
            let deadline = self.machine.lock().deadline();

            match deadline {
                Some(deadline) => {
                    let sleep_until = tokio::time::Instant::from_std(deadline);
                    tokio::select! {
                        _ = self.notify.notified() => continue,
                        _ = tokio::time::sleep_until(sleep_until) => {
                            let fire = self.machine.lock().on_timer_elapsed(Instant::now());
                            if fire {
                                if let Err(e) = self.save(false).await {
                                    // Surfaced through status; the next cycle retries
                                    warn!("Autosave cycle failed: {}", e);
                                }
                                self.machine.lock().on_save_finished();
                            }
                        }
                    }
                }
                None => self.notify.notified().await,
            }
        }
        debug!("Autosave loop for project {} stopped", self.project_id);
    }

    /// One save cycle: serialize, diff, persist with bounded retries, then
    /// drain best-effort promotions
    async fn save(&self, force: bool) -> Result<SaveOutcome, PersistenceError> {
        let (segments, snapshot, payload_hash) = self.serialize_snapshot()?;

        if !force {
            let last = self.last_saved_hash.lock().clone();
            if last.as_deref() == Some(payload_hash.as_str()) {
                debug!(
                    "Autosave skipped for project {}: no-changes",
                    self.project_id
                );
                return Ok(SaveOutcome::Skipped {
                    reason: "no-changes",
                });
            }
        }

        self.status.write().is_saving = true;

        let mut last_error = String::new();
        let max_attempts = self.settings.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.sink.save_snapshot(&snapshot, &segments).await {
                Ok(()) => {
                    *self.last_saved_hash.lock() = Some(payload_hash);
                    {
                        let mut status = self.status.write();
                        status.is_saving = false;
                        status.last_saved = Some(Utc::now());
                        status.error = None;
                    }
                    info!(
                        "Autosaved project {} ({} segments, attempt {})",
                        self.project_id,
                        segments.len(),
                        attempt
                    );

                    // Promotions run after the primary save commits and
                    // never affect its result
                    self.run_promotions(&segments).await;

                    return Ok(SaveOutcome::Saved);
                }
                Err(e) => {
                    last_error = e.to_string();
                    warn!(
                        "Autosave attempt {}/{} failed for project {}: {}",
                        attempt, max_attempts, self.project_id, last_error
                    );
                    if attempt < max_attempts {
                        let backoff = Duration::from_secs(1u64 << attempt);
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        {
            let mut status = self.status.write();
            status.is_saving = false;
            status.error = Some(last_error.clone());
        }
        error!(
            "Autosave exhausted {} attempts for project {}: {}",
            max_attempts, self.project_id, last_error
        );

        Err(PersistenceError::RetriesExhausted {
            attempts: max_attempts,
            message: last_error,
        })
    }

    /// Serialize the current collection + workflow marker and hash it
    fn serialize_snapshot(
        &self,
    ) -> Result<(Vec<ContentSegment>, SnapshotRecord, String), PersistenceError> {
        let segments = self.segments.read().clone();
        let workflow = self.workflow.read().clone();

        let payload = SnapshotPayload {
            segments: &segments,
            current_phase: workflow.current_phase,
            phases_completed: workflow.phases_completed.iter().copied().collect(),
            progress: workflow.overall_progress(),
        };

        let segments_json = serde_json::to_string(&payload.segments)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        let full_json = serde_json::to_string(&payload)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        let hash = format!("{:x}", Sha256::digest(full_json.as_bytes()));

        let snapshot = SnapshotRecord {
            project_id: self.project_id.clone(),
            segments_json,
            current_phase: payload.current_phase,
            phases_completed_json: serde_json::to_string(&payload.phases_completed)
                .map_err(|e| PersistenceError::Serialization(e.to_string()))?,
            progress: payload.progress,
            content_hash: hash.clone(),
            saved_at: Utc::now().timestamp(),
        };

        Ok((segments, snapshot, hash))
    }

    /// Drain best-effort secondary writes after the primary save commits.
    ///
    /// Failures here are logged and swallowed; they must never escalate
    /// into a persistence failure.
    async fn run_promotions(&self, segments: &[ContentSegment]) {
        for segment in segments {
            match (segment.translation_method, segment.translation_status) {
                (Some(TranslationMethod::Tm), TranslationStatus::Complete) => {
                    let Some(translated) = segment.translated_text.as_ref() else {
                        continue;
                    };
                    let entry = TmEntryRecord::for_promotion(
                        &segment.project_id,
                        &segment.id,
                        &segment.source_text,
                        translated,
                        &self.promotion.source_language,
                        &self.promotion.target_language,
                        self.promotion.domain_context.clone(),
                        segment.promotion_match_type(),
                    );
                    if let Err(e) = self.sink.promote_tm_entry(&entry).await {
                        warn!("TM promotion failed for segment {}: {}", segment.id, e);
                    }
                }
                (Some(TranslationMethod::Ai), _) => {
                    let Some(translated) = segment.translated_text.as_ref() else {
                        continue;
                    };
                    let record = AiAuditRecord::new(
                        &segment.project_id,
                        &segment.id,
                        &segment.source_text,
                        translated,
                        &self.promotion.model,
                    );
                    if let Err(e) = self.sink.record_ai_audit(&record).await {
                        warn!("AI audit record failed for segment {}: {}", segment.id, e);
                    }
                }
                _ => {}
            }
        }
    }
}
