/*!
 * Tests for the autosave/persistence controller
 */

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use locadapt::app_config::AutosaveConfig;
use locadapt::autosave::{AutosaveController, PromotionContext, SaveOutcome, SnapshotSink};
use locadapt::errors::PersistenceError;
use locadapt::store::models::{TmMatchKind, TranslationMethod};
use locadapt::workflow::WorkflowState;

use crate::common::{FailingSink, MemorySink, make_segment, make_translated_segment};

fn promotion_context() -> PromotionContext {
    PromotionContext {
        source_language: "eng".to_string(),
        target_language: "fra".to_string(),
        domain_context: Some("oncology".to_string()),
        model: "adaptive-md-1".to_string(),
    }
}

fn controller_with(
    sink: Arc<dyn SnapshotSink>,
    settings: AutosaveConfig,
) -> (
    Arc<AutosaveController>,
    Arc<RwLock<Vec<locadapt::ContentSegment>>>,
    Arc<RwLock<WorkflowState>>,
) {
    let segments = Arc::new(RwLock::new(vec![
        make_segment("seg-1", "proj-1", 1, "Take once daily with food."),
        make_segment("seg-2", "proj-1", 2, "Consult your physician."),
    ]));
    let workflow = Arc::new(RwLock::new(WorkflowState::new()));
    let controller = AutosaveController::new(
        sink,
        "proj-1",
        Arc::clone(&segments),
        Arc::clone(&workflow),
        settings,
        promotion_context(),
    );
    (controller, segments, workflow)
}

#[tokio::test]
async fn test_saveNow_unchangedCollection_shouldSkipSecondSave() {
    let sink = MemorySink::new();
    let (controller, _segments, _workflow) =
        controller_with(Arc::clone(&sink) as Arc<dyn SnapshotSink>, AutosaveConfig::default());

    let first = controller.save_now().await.unwrap();
    assert_eq!(first, SaveOutcome::Saved);

    let second = controller.save_now().await.unwrap();
    assert_eq!(
        second,
        SaveOutcome::Skipped {
            reason: "no-changes"
        }
    );
    assert_eq!(sink.snapshot_count(), 1);
}

#[tokio::test]
async fn test_saveNow_afterEdit_shouldSaveAgain() {
    let sink = MemorySink::new();
    let (controller, segments, _workflow) =
        controller_with(Arc::clone(&sink) as Arc<dyn SnapshotSink>, AutosaveConfig::default());

    controller.save_now().await.unwrap();
    segments.write()[0].source_text = "Take twice daily with food.".to_string();

    let outcome = controller.save_now().await.unwrap();
    assert_eq!(outcome, SaveOutcome::Saved);
    assert_eq!(sink.snapshot_count(), 2);
}

#[tokio::test]
async fn test_forceSave_unchangedCollection_shouldBypassChangeDetection() {
    let sink = MemorySink::new();
    let (controller, _segments, _workflow) =
        controller_with(Arc::clone(&sink) as Arc<dyn SnapshotSink>, AutosaveConfig::default());

    controller.save_now().await.unwrap();
    let outcome = controller.force_save().await.unwrap();
    assert_eq!(outcome, SaveOutcome::Saved);
    assert_eq!(sink.snapshot_count(), 2);
}

#[tokio::test]
async fn test_save_workflowAdvance_shouldCountAsChange() {
    let sink = MemorySink::new();
    let (controller, _segments, workflow) =
        controller_with(Arc::clone(&sink) as Arc<dyn SnapshotSink>, AutosaveConfig::default());

    controller.save_now().await.unwrap();

    workflow
        .write()
        .complete_phase(
            1,
            locadapt::workflow::PhaseOutcome::Capture {
                asset_name: "launch-email".to_string(),
                segment_count: 2,
            },
        )
        .unwrap();

    let outcome = controller.save_now().await.unwrap();
    assert_eq!(outcome, SaveOutcome::Saved);

    let snapshots = sink.snapshots.lock();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[1].current_phase, 2);
    assert_eq!(snapshots[1].progress, 14);
}

#[tokio::test(start_paused = true)]
async fn test_save_withFailingSink_shouldExhaustRetriesAndKeepData() {
    let sink = FailingSink::new();
    let (controller, segments, _workflow) =
        controller_with(Arc::clone(&sink) as Arc<dyn SnapshotSink>, AutosaveConfig::default());

    let err = controller.save_now().await.unwrap_err();
    match err {
        PersistenceError::RetriesExhausted { attempts, message } => {
            assert_eq!(attempts, 3);
            assert!(message.contains("simulated network error"));
        }
        other => panic!("unexpected error: {}", other),
    }

    assert_eq!(sink.attempt_count(), 3);

    let status = controller.status();
    assert!(!status.is_saving);
    assert!(status.last_saved.is_none());
    assert!(
        status
            .error
            .as_deref()
            .is_some_and(|e| e.contains("simulated network error"))
    );

    // The in-memory collection is untouched by the failed save
    let segments = segments.read();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].source_text, "Take once daily with food.");
}

#[tokio::test(start_paused = true)]
async fn test_save_successAfterFailure_shouldClearError() {
    // First cycle burns all three attempts; the second cycle succeeds
    let sink = MemorySink::with_failing_saves(3);
    let (controller, _segments, _workflow) =
        controller_with(Arc::clone(&sink) as Arc<dyn SnapshotSink>, AutosaveConfig::default());

    controller.save_now().await.unwrap_err();
    assert!(controller.status().error.is_some());

    let outcome = controller.force_save().await.unwrap();
    assert_eq!(outcome, SaveOutcome::Saved);

    let status = controller.status();
    assert!(status.error.is_none());
    assert!(status.last_saved.is_some());
    assert_eq!(sink.snapshot_count(), 1);
}

#[tokio::test]
async fn test_save_withQualifyingSegments_shouldRunPromotions() {
    let sink = MemorySink::new();
    let segments = Arc::new(RwLock::new(vec![
        make_translated_segment("seg-1", "proj-1", 1, TranslationMethod::Tm, Some(100)),
        make_translated_segment("seg-2", "proj-1", 2, TranslationMethod::Tm, Some(85)),
        make_translated_segment("seg-3", "proj-1", 3, TranslationMethod::Ai, Some(10)),
        make_segment("seg-4", "proj-1", 4, "Still pending."),
    ]));
    let workflow = Arc::new(RwLock::new(WorkflowState::new()));
    let controller = AutosaveController::new(
        Arc::clone(&sink) as Arc<dyn SnapshotSink>,
        "proj-1",
        segments,
        workflow,
        AutosaveConfig::default(),
        promotion_context(),
    );

    controller.save_now().await.unwrap();

    let tm_entries = sink.tm_entries.lock();
    assert_eq!(tm_entries.len(), 2);
    assert_eq!(tm_entries[0].segment_id, "seg-1");
    assert_eq!(tm_entries[0].match_type, TmMatchKind::Exact);
    assert_eq!(tm_entries[0].source_language, "eng");
    assert_eq!(tm_entries[0].domain_context.as_deref(), Some("oncology"));
    assert_eq!(tm_entries[1].segment_id, "seg-2");
    assert_eq!(tm_entries[1].match_type, TmMatchKind::Fuzzy);

    let audits = sink.ai_audits.lock();
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].segment_id, "seg-3");
    assert_eq!(audits[0].model, "adaptive-md-1");
}

#[tokio::test]
async fn test_save_withFailingPromotions_shouldStillSucceed() {
    let sink = MemorySink::with_failing_promotions();
    let segments = Arc::new(RwLock::new(vec![make_translated_segment(
        "seg-1",
        "proj-1",
        1,
        TranslationMethod::Tm,
        Some(100),
    )]));
    let workflow = Arc::new(RwLock::new(WorkflowState::new()));
    let controller = AutosaveController::new(
        Arc::clone(&sink) as Arc<dyn SnapshotSink>,
        "proj-1",
        segments,
        workflow,
        AutosaveConfig::default(),
        promotion_context(),
    );

    let outcome = controller.save_now().await.unwrap();
    assert_eq!(outcome, SaveOutcome::Saved);
    assert_eq!(sink.snapshot_count(), 1);
    assert!(sink.tm_entries.lock().is_empty());
    assert!(controller.status().error.is_none());
}

#[tokio::test]
async fn test_spawn_afterDataChanged_shouldSaveOnceQuiescent() {
    let sink = MemorySink::new();
    let (controller, _segments, _workflow) = controller_with(
        Arc::clone(&sink) as Arc<dyn SnapshotSink>,
        AutosaveConfig {
            debounce_ms: 30,
            ..AutosaveConfig::default()
        },
    );

    let handle = controller.spawn();
    controller.data_changed();
    controller.data_changed();

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(sink.snapshot_count(), 1);

    controller.shutdown();
    let _ = handle.await;
}

#[tokio::test]
async fn test_dataChanged_afterShutdown_shouldBeIgnored() {
    let sink = MemorySink::new();
    let (controller, _segments, _workflow) = controller_with(
        Arc::clone(&sink) as Arc<dyn SnapshotSink>,
        AutosaveConfig {
            debounce_ms: 10,
            ..AutosaveConfig::default()
        },
    );

    let handle = controller.spawn();
    controller.shutdown();
    controller.data_changed();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(sink.snapshot_count(), 0);
    let _ = handle.await;
}

#[tokio::test]
async fn test_status_beforeAnySave_shouldBeDefault() {
    let sink = MemorySink::new();
    let (controller, _segments, _workflow) =
        controller_with(Arc::clone(&sink) as Arc<dyn SnapshotSink>, AutosaveConfig::default());

    let status = controller.status();
    assert!(!status.is_saving);
    assert!(status.last_saved.is_none());
    assert!(status.error.is_none());
}
