/*!
 * Debounce state machine.
 *
 * Segment edits arrive in bursts (typing, bulk translation); per-edit
 * persistence would overwhelm the store. The timer logic is modeled as an
 * explicit three-state machine driven by "data changed" and "timer
 * elapsed" events, so the quiescence rule is testable without real timers.
 */

use std::time::{Duration, Instant};

/// State of the debounced save cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    /// No save pending
    Idle,
    /// A save will fire once the deadline passes without further changes
    PendingSave(Instant),
    /// A save is in flight; a change during the save re-arms afterwards
    Saving { rearm: Option<Instant> },
}

/// Debounce machine over a fixed quiescence window
#[derive(Debug, Clone)]
pub struct DebounceMachine {
    state: SaveState,
    window: Duration,
}

impl DebounceMachine {
    /// Create a machine with the given quiescence window
    pub fn new(window: Duration) -> Self {
        Self {
            state: SaveState::Idle,
            window,
        }
    }

    /// Current state
    pub fn state(&self) -> SaveState {
        self.state
    }

    /// Deadline the owner should sleep until, if a save is pending
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            SaveState::PendingSave(deadline) => Some(deadline),
            _ => None,
        }
    }

    /// The segment collection changed; (re)start the quiescence window
    pub fn on_data_changed(&mut self, now: Instant) {
        let deadline = now + self.window;
        self.state = match self.state {
            SaveState::Idle | SaveState::PendingSave(_) => SaveState::PendingSave(deadline),
            SaveState::Saving { .. } => SaveState::Saving {
                rearm: Some(deadline),
            },
        };
    }

    /// The timer elapsed; returns true when a save should fire now.
    ///
    /// Spurious firings (timer elapsed before the deadline, or while idle)
    /// are safe and return false.
    pub fn on_timer_elapsed(&mut self, now: Instant) -> bool {
        match self.state {
            SaveState::PendingSave(deadline) if now >= deadline => {
                self.state = SaveState::Saving { rearm: None };
                true
            }
            _ => false,
        }
    }

    /// The in-flight save finished (successfully or not)
    pub fn on_save_finished(&mut self) {
        self.state = match self.state {
            SaveState::Saving { rearm: Some(d) } => SaveState::PendingSave(d),
            _ => SaveState::Idle,
        };
    }

    /// Cancel any pending timer; used on teardown
    pub fn cancel(&mut self) {
        if let SaveState::PendingSave(_) = self.state {
            self.state = SaveState::Idle;
        }
    }
}
