/*!
 * Adaptation workflow state machine.
 *
 * Pure, synchronous transitions over `WorkflowState`: no I/O of its own.
 * Persistence is the autosave controller's job, invoked by the caller
 * after each transition. Invalid transitions are rejected synchronously
 * and leave the state unchanged.
 *
 * Read access is loose, completion ordering is strict: users may browse
 * future-phase placeholders or past results freely once work has started,
 * but cannot mark work done out of order.
 */

use log::{debug, info};

use crate::errors::WorkflowError;

use super::models::{AdaptationProject, CompletionSummary, PhaseOutcome, TOTAL_PHASES, WorkflowState};

impl WorkflowState {
    /// Overall progress as an integer percentage, rounded
    pub fn overall_progress(&self) -> u8 {
        (100.0 * self.phases_completed.len() as f64 / TOTAL_PHASES as f64).round() as u8
    }

    /// Whether all seven phases are completed
    pub fn is_terminal(&self) -> bool {
        self.phases_completed.len() == TOTAL_PHASES as usize
    }

    /// Whether a phase is open for inspection.
    ///
    /// True for the current phase and everything before it, for any
    /// already-completed phase, and for every phase once any phase has
    /// been completed. Re-completion still obeys the strict ordering in
    /// `complete_phase`.
    pub fn can_access_phase(&self, phase_number: u8) -> bool {
        if phase_number == 0 || phase_number > TOTAL_PHASES {
            return false;
        }
        phase_number <= self.current_phase
            || self.phases_completed.contains(&phase_number)
            || !self.phases_completed.is_empty()
    }

    /// Mark a phase completed, storing its outcome.
    ///
    /// A phase may be completed when it is the current phase, or
    /// re-completed when already done (overwriting its stored outcome,
    /// supporting "go back and redo"). Completing a later phase while
    /// predecessors are open is rejected with `PhaseOutOfOrder`.
    ///
    /// Returns the closing summary when this call completes phase 7.
    pub fn complete_phase(
        &mut self,
        phase_number: u8,
        outcome: PhaseOutcome,
    ) -> Result<Option<CompletionSummary>, WorkflowError> {
        if phase_number == 0 || phase_number > TOTAL_PHASES {
            return Err(WorkflowError::InvalidPhase(phase_number));
        }

        let outcome_phase = outcome.phase().number();
        if outcome_phase != phase_number {
            return Err(WorkflowError::OutcomeMismatch {
                attempted: phase_number,
                outcome_phase,
            });
        }

        let is_redo = self.phases_completed.contains(&phase_number);
        if !is_redo && phase_number != self.current_phase {
            return Err(WorkflowError::PhaseOutOfOrder {
                attempted: phase_number,
                current: self.current_phase,
            });
        }

        self.phase_data.insert(phase_number, outcome);
        self.phases_completed.insert(phase_number);

        if phase_number == self.current_phase && phase_number < TOTAL_PHASES {
            self.current_phase = phase_number + 1;
        }

        debug!(
            "Phase {} completed ({} of {} done, progress {}%)",
            phase_number,
            self.phases_completed.len(),
            TOTAL_PHASES,
            self.overall_progress()
        );

        if phase_number == TOTAL_PHASES {
            let summary = self.summary();
            info!(
                "Workflow terminal: quality {}, compliance {}, TM leverage {}",
                summary.quality_score, summary.compliance_score, summary.tm_leverage
            );
            return Ok(Some(summary));
        }

        Ok(None)
    }

    /// Synthesize the closing report.
    ///
    /// The only place the state machine reads across phase boundaries;
    /// absent fields default to 0 since phases are produced by
    /// heterogeneous external producers.
    pub fn summary(&self) -> CompletionSummary {
        CompletionSummary {
            total_phases: TOTAL_PHASES,
            completed_phases: self.phases_completed.len() as u8,
            quality_score: self.quality_score_or(0),
            compliance_score: self.compliance_score_or(0),
            tm_leverage: self.leverage_score_or(0),
        }
    }
}

impl AdaptationProject {
    /// Delegate: complete a phase on this project's workflow
    pub fn complete_phase(
        &mut self,
        phase_number: u8,
        outcome: PhaseOutcome,
    ) -> Result<Option<CompletionSummary>, WorkflowError> {
        self.workflow.complete_phase(phase_number, outcome)
    }

    /// Delegate: phase accessibility for this project
    pub fn can_access_phase(&self, phase_number: u8) -> bool {
        self.workflow.can_access_phase(phase_number)
    }

    /// Delegate: overall progress percentage
    pub fn overall_progress(&self) -> u8 {
        self.workflow.overall_progress()
    }
}
