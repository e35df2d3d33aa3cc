/*!
 * Autosave module: debounced, durable persistence of the editing session.
 */

pub mod controller;
pub mod debounce;

// Re-export main types
pub use controller::{
    AutosaveController, AutosaveStatus, PromotionContext, SaveOutcome, SnapshotSink,
};
pub use debounce::{DebounceMachine, SaveState};
