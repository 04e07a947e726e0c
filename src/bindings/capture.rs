//! # Remap Capture State Machine
//!
//! Governs interactive remapping: the overlay asks for a remap of one
//! action, the next freshly pressed button becomes its new binding.
//!
//! ## States
//!
//! | State | Meaning |
//! |-------|---------|
//! | `Idle` | Normal operation, buttons drive the game |
//! | `AwaitingCapture(action)` | Waiting for the first new button press |
//!
//! At most one capture session exists system-wide. There is no timeout: the
//! session stays open until a button is captured or the overlay cancels it.
//! While a capture is pending the poll loop suppresses all normal action
//! handling, so the capturing press never also fires a jump or duck.
//!
//! Axis movement is deliberately not capturable; only buttons have a stable
//! index to bind to.

use tracing::{debug, info};

use super::Action;

/// Remap state machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemapState {
    /// No remap in progress.
    Idle,
    /// Waiting for the first false→true button edge to bind to this action.
    AwaitingCapture(Action),
}

/// A completed capture: `action` is now bound to button `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOutcome {
    pub action: Action,
    pub index: u16,
}

/// The single system-wide remap session.
#[derive(Debug)]
pub struct RemapSession {
    state: RemapState,
}

impl Default for RemapSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RemapSession {
    /// Creates an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self { state: RemapState::Idle }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RemapState {
        self.state
    }

    /// Whether a capture is pending.
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        matches!(self.state, RemapState::AwaitingCapture(_))
    }

    /// Starts waiting for a button press to bind to `action`.
    ///
    /// Only jump and duck are remappable; requests for other actions are
    /// refused. A second `begin` while already waiting retargets the session
    /// rather than stacking a second one.
    ///
    /// Returns `true` if the session is now awaiting capture for `action`.
    pub fn begin(&mut self, action: Action) -> bool {
        if !action.is_remappable() {
            debug!("Refusing remap of non-remappable action '{}'", action);
            return false;
        }
        info!("Awaiting button capture for '{}'", action);
        self.state = RemapState::AwaitingCapture(action);
        true
    }

    /// Cancels a pending capture. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        if self.is_capturing() {
            info!("Remap capture cancelled");
            self.state = RemapState::Idle;
            true
        } else {
            false
        }
    }

    /// Scans one tick of button state for the capturing press.
    ///
    /// Button indices are checked in ascending order; the first false→true
    /// edge wins. On capture the session returns to `Idle` and the outcome
    /// is handed back for the caller to commit. Returns `None` (and stays
    /// waiting) when nothing new was pressed, or when no capture is pending.
    pub fn try_capture(&mut self, prev: &[bool], current: &[bool]) -> Option<CaptureOutcome> {
        let RemapState::AwaitingCapture(action) = self.state else {
            return None;
        };

        for (index, &pressed) in current.iter().enumerate() {
            let was_pressed = prev.get(index).copied().unwrap_or(false);
            if pressed && !was_pressed {
                let index = index as u16;
                info!("Captured button {} for '{}'", index, action);
                self.state = RemapState::Idle;
                return Some(CaptureOutcome { action, index });
            }
        }

        None
    }
}
