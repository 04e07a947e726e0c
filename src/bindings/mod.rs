//! # Binding Module
//!
//! Maps logical game actions to physical controller button indices.
//!
//! This module handles:
//! - The fixed set of logical actions the runner understands
//! - The binding configuration with built-in defaults
//! - Durable persistence through a key-value store
//! - The interactive remap state machine (press-a-button capture)
//!
//! ## Default Bindings
//!
//! Button indices follow the standard gamepad layout (the same numbering the
//! Web Gamepad API reports):
//!
//! | Action | Index | Standard layout button |
//! |--------|-------|------------------------|
//! | Jump | 0 | South (A / Cross) |
//! | Duck | 1 | East (B / Circle) |
//! | D-Pad Up | 12 | D-Pad Up |
//! | D-Pad Down | 13 | D-Pad Down |

pub mod capture;
pub mod store;

pub use capture::{CaptureOutcome, RemapSession};
pub use store::{BindingStore, FileStore, KeyValueStore};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A logical game action, independent of physical control layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Make the dinosaur jump (Space in the game).
    Jump,
    /// Make the dinosaur duck (ArrowDown in the game).
    Duck,
    /// D-pad up, an alternate jump trigger.
    DpadUp,
    /// D-pad down, an alternate duck trigger.
    DpadDown,
}

impl Action {
    /// Actions the interactive remap flow accepts. The d-pad entries are
    /// fixed alternates and cannot be re-bound.
    pub const REMAPPABLE: [Action; 2] = [Action::Jump, Action::Duck];

    /// Whether this action can be interactively re-bound.
    #[must_use]
    pub fn is_remappable(self) -> bool {
        matches!(self, Action::Jump | Action::Duck)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Jump => "jump",
            Action::Duck => "duck",
            Action::DpadUp => "dpad_up",
            Action::DpadDown => "dpad_down",
        };
        f.write_str(name)
    }
}

/// Default button index for jump (South / A).
pub const DEFAULT_JUMP: u16 = 0;
/// Default button index for duck (East / B).
pub const DEFAULT_DUCK: u16 = 1;
/// Default button index for d-pad up.
pub const DEFAULT_DPAD_UP: u16 = 12;
/// Default button index for d-pad down.
pub const DEFAULT_DPAD_DOWN: u16 = 13;

/// Fully resolved binding configuration.
///
/// `jump` and `duck` are always present; a lookup never fails. The d-pad
/// alternates are optional, and the poll loop simply skips an unset one.
///
/// # Examples
///
/// ```
/// use dino_pad::bindings::BindingConfig;
///
/// let config = BindingConfig::default();
/// assert_eq!(config.jump, 0);
/// assert_eq!(config.dpad_down, Some(13));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BindingConfig {
    pub jump: u16,
    pub duck: u16,
    pub dpad_up: Option<u16>,
    pub dpad_down: Option<u16>,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            jump: DEFAULT_JUMP,
            duck: DEFAULT_DUCK,
            dpad_up: Some(DEFAULT_DPAD_UP),
            dpad_down: Some(DEFAULT_DPAD_DOWN),
        }
    }
}

impl BindingConfig {
    /// Looks up the button index bound to an action.
    ///
    /// Always `Some` for [`Action::Jump`] and [`Action::Duck`].
    #[must_use]
    pub fn index_for(&self, action: Action) -> Option<u16> {
        match action {
            Action::Jump => Some(self.jump),
            Action::Duck => Some(self.duck),
            Action::DpadUp => self.dpad_up,
            Action::DpadDown => self.dpad_down,
        }
    }

    /// Re-binds an action to a new button index.
    pub fn set(&mut self, action: Action, index: u16) {
        match action {
            Action::Jump => self.jump = index,
            Action::Duck => self.duck = index,
            Action::DpadUp => self.dpad_up = Some(index),
            Action::DpadDown => self.dpad_down = Some(index),
        }
    }
}

/// Partially specified bindings as they appear in storage.
///
/// Every field is optional so stale or hand-edited payloads merge cleanly
/// over the defaults instead of being rejected wholesale.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct StoredBindings {
    #[serde(default)]
    pub jump: Option<u16>,
    #[serde(default)]
    pub duck: Option<u16>,
    #[serde(default)]
    pub dpad_up: Option<u16>,
    #[serde(default)]
    pub dpad_down: Option<u16>,
}

impl StoredBindings {
    /// Merges stored values over the built-in defaults. Stored values win
    /// per key; anything missing keeps its default.
    #[must_use]
    pub fn merge_over_defaults(self) -> BindingConfig {
        let defaults = BindingConfig::default();
        BindingConfig {
            jump: self.jump.unwrap_or(defaults.jump),
            duck: self.duck.unwrap_or(defaults.duck),
            dpad_up: self.dpad_up.or(defaults.dpad_up),
            dpad_down: self.dpad_down.or(defaults.dpad_down),
        }
    }
}

impl From<BindingConfig> for StoredBindings {
    fn from(config: BindingConfig) -> Self {
        Self {
            jump: Some(config.jump),
            duck: Some(config.duck),
            dpad_up: config.dpad_up,
            dpad_down: config.dpad_down,
        }
    }
}
