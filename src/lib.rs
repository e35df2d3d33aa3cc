/*!
 * # locadapt - Localization Adaptation Engine
 *
 * A Rust library for multi-phase localization of marketed content assets.
 *
 * ## Features
 *
 * - Per-segment translation with translation-memory leverage scoring
 *   (exact/fuzzy/new word breakdown and leverage percentage)
 * - Seven-phase adaptation workflow state machine with strict completion
 *   gating and a terminal closing report
 * - Debounced, durable autosave with change detection, bounded retries
 *   and best-effort promotion into the translation-memory index
 * - SQLite-backed segment store with idempotent upsert semantics
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `leverage`: The TM leverage engine:
 *   - `leverage::engine`: Orchestration of the translate path
 *   - `leverage::matching`: Fuzzy candidate scoring and classification
 *   - `leverage::result`: Leverage breakdowns and their invariants
 * - `workflow`: Phase model and workflow state machine
 * - `autosave`: Debounce state machine and persistence controller
 * - `store`: SQLite persistence (segments, TM index, audit, snapshots)
 * - `provider`: Clients for the generative translation service
 * - `init_registry`: Durable one-time initialization markers
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the engine
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod autosave;
pub mod errors;
pub mod init_registry;
pub mod language_utils;
pub mod leverage;
pub mod provider;
pub mod store;
pub mod workflow;

// Re-export main types for easier usage
pub use app_config::Config;
pub use autosave::{AutosaveController, AutosaveStatus, SaveOutcome};
pub use errors::{
    AdaptationError, PersistenceError, ProviderError, TranslationError, WorkflowError,
};
pub use leverage::{LeverageEngine, LeverageResult, TmStats};
pub use store::Repository;
pub use store::models::ContentSegment;
pub use workflow::{AdaptationProject, CompletionSummary, Phase, PhaseOutcome, WorkflowState};
