/*!
 * Adaptation workflow module.
 *
 * Seven ordered phases with strict completion gating, loose read access,
 * and a terminal closing report.
 */

pub mod machine;
pub mod models;

// Re-export main types
pub use models::{
    AdaptationProject, CompletionSummary, Phase, PhaseOutcome, TOTAL_PHASES, WorkflowState,
};
