/*!
 * End-to-end test: seed a translation memory, batch translate, walk the
 * seven workflow phases, and persist through the autosave controller
 * backed by the real SQLite repository.
 */

use std::sync::Arc;

use parking_lot::RwLock;

use locadapt::app_config::{AutosaveConfig, TranslationConfig};
use locadapt::autosave::{AutosaveController, PromotionContext, SaveOutcome};
use locadapt::leverage::LeverageEngine;
use locadapt::provider::mock::MockTranslator;
use locadapt::store::Repository;
use locadapt::store::models::{TmMatchKind, TranslationMethod, TranslationStatus};
use locadapt::workflow::{PhaseOutcome, WorkflowState};

use crate::common::{make_segment, make_tm_entry};

#[tokio::test]
async fn test_fullAdaptationRun_shouldTranslatePersistAndPromote() {
    let repo = Repository::new_in_memory().unwrap();

    // A prior campaign left one approved translation in memory
    repo.upsert_tm_entry(&make_tm_entry(
        "proj-prior",
        "seg-prior",
        "Take once daily with food.",
    ))
    .await
    .unwrap();

    let engine = LeverageEngine::new(
        repo.clone(),
        Arc::new(MockTranslator::working()),
        TranslationConfig {
            inter_call_delay_ms: 0,
            ..TranslationConfig::default()
        },
    );

    let segments = vec![
        make_segment("seg-1", "proj-1", 1, "Take once daily with food."),
        make_segment("seg-2", "proj-1", 2, "Consult your physician before use."),
        make_segment("seg-3", "proj-1", 3, "Keep out of reach of children."),
    ];

    // Phase 1: capture
    let mut workflow = WorkflowState::new();
    workflow
        .complete_phase(
            1,
            PhaseOutcome::Capture {
                asset_name: "launch-email".to_string(),
                segment_count: segments.len(),
            },
        )
        .unwrap();

    // Phase 2: batch translation with TM leverage
    let results = engine
        .translate_all_segments(&segments, "en", "fr", None, |_, _| {})
        .await;
    assert_eq!(results.len(), 3);

    // The memory hit leverages fully; the cold segments are AI-generated
    assert_eq!(results["seg-1"].tm_stats.leverage_percentage, 100);
    assert_eq!(results["seg-2"].tm_stats.leverage_percentage, 0);

    let translated = repo.list_segments("proj-1").await.unwrap();
    assert!(
        translated
            .iter()
            .all(|s| s.translation_status == TranslationStatus::Complete)
    );
    assert_eq!(
        translated[0].translation_method,
        Some(TranslationMethod::Tm)
    );
    assert_eq!(
        translated[1].translation_method,
        Some(TranslationMethod::Ai)
    );

    let leverage_score = results["seg-1"].tm_stats.leverage_percentage / 3;
    workflow
        .complete_phase(
            2,
            PhaseOutcome::Translation {
                leverage_score,
                segments_translated: results.len(),
            },
        )
        .unwrap();

    // Phases 3-7
    workflow
        .complete_phase(
            3,
            PhaseOutcome::Cultural {
                sensitivity_flags: vec![],
                adaptations_applied: 1,
            },
        )
        .unwrap();
    workflow
        .complete_phase(
            4,
            PhaseOutcome::Regulatory {
                compliance_score: 97,
                open_findings: 0,
            },
        )
        .unwrap();
    workflow
        .complete_phase(
            5,
            PhaseOutcome::Quality {
                quality_score: 91,
                review_notes: vec![],
            },
        )
        .unwrap();
    workflow
        .complete_phase(
            6,
            PhaseOutcome::Dam {
                package_id: "pkg-001".to_string(),
                asset_count: 1,
            },
        )
        .unwrap();
    let summary = workflow
        .complete_phase(
            7,
            PhaseOutcome::Lineage {
                lineage_ref: "lineage-001".to_string(),
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(summary.completed_phases, 7);
    assert_eq!(summary.quality_score, 91);
    assert_eq!(summary.compliance_score, 97);
    assert_eq!(summary.tm_leverage, leverage_score);

    // Persist the finished session through the autosave controller
    let segments = Arc::new(RwLock::new(translated));
    let workflow = Arc::new(RwLock::new(workflow));
    let controller = AutosaveController::new(
        Arc::new(repo.clone()),
        "proj-1",
        Arc::clone(&segments),
        workflow,
        AutosaveConfig::default(),
        PromotionContext {
            source_language: "eng".to_string(),
            target_language: "fra".to_string(),
            domain_context: None,
            model: "mock-translator".to_string(),
        },
    );

    assert_eq!(controller.save_now().await.unwrap(), SaveOutcome::Saved);
    assert_eq!(
        controller.save_now().await.unwrap(),
        SaveOutcome::Skipped {
            reason: "no-changes"
        }
    );

    let snapshot = repo.latest_snapshot("proj-1").await.unwrap().unwrap();
    assert_eq!(snapshot.current_phase, 7);
    assert_eq!(snapshot.progress, 100);
    assert!(!snapshot.content_hash.is_empty());

    // The TM-leveraged segment was promoted with its match type preserved
    let promoted = repo.get_tm_entry("proj-1", "seg-1").await.unwrap().unwrap();
    assert_eq!(promoted.match_type, TmMatchKind::Exact);
    assert_eq!(promoted.source_text, "Take once daily with food.");

    // AI-generated segments were audited, not promoted
    assert!(repo.get_tm_entry("proj-1", "seg-2").await.unwrap().is_none());
    assert_eq!(repo.count_ai_audits("proj-1", "seg-2").await.unwrap(), 1);
    assert_eq!(repo.count_ai_audits("proj-1", "seg-3").await.unwrap(), 1);

    let status = controller.status();
    assert!(status.error.is_none());
    assert!(status.last_saved.is_some());
}

#[tokio::test]
async fn test_restartAfterSave_shouldRecoverSessionFromStore() {
    let repo = Repository::new_in_memory().unwrap();
    let engine = LeverageEngine::new(
        repo.clone(),
        Arc::new(MockTranslator::working()),
        TranslationConfig {
            inter_call_delay_ms: 0,
            ..TranslationConfig::default()
        },
    );

    let segments = vec![make_segment("seg-1", "proj-1", 1, "Shake well before use.")];
    engine
        .translate_all_segments(&segments, "en", "fr", None, |_, _| {})
        .await;

    let mut workflow = WorkflowState::new();
    workflow
        .complete_phase(
            1,
            PhaseOutcome::Capture {
                asset_name: "insert".to_string(),
                segment_count: 1,
            },
        )
        .unwrap();

    let stored = repo.list_segments("proj-1").await.unwrap();
    let controller = AutosaveController::new(
        Arc::new(repo.clone()),
        "proj-1",
        Arc::new(RwLock::new(stored)),
        Arc::new(RwLock::new(workflow)),
        AutosaveConfig::default(),
        PromotionContext {
            source_language: "eng".to_string(),
            target_language: "fra".to_string(),
            domain_context: None,
            model: "mock-translator".to_string(),
        },
    );
    controller.save_now().await.unwrap();

    // A fresh session over the same store sees the saved state
    let snapshot = repo.latest_snapshot("proj-1").await.unwrap().unwrap();
    assert_eq!(snapshot.current_phase, 2);
    let recovered: Vec<locadapt::ContentSegment> =
        serde_json::from_str(&snapshot.segments_json).unwrap();
    assert_eq!(recovered.len(), 1);
    assert_eq!(recovered[0].id, "seg-1");
    assert!(recovered[0].translated_text.is_some());
}
