//! # Device Snapshots
//!
//! Transient per-tick capture of one controller's state.
//!
//! A snapshot is recreated on every poll tick and never persisted. The poll
//! loop keeps exactly one older snapshot around to compute edges (button
//! state changes between two consecutive ticks).
//!
//! Axis values follow the Web Gamepad convention: −1.0..1.0 with positive
//! vertical meaning "stick pushed down". The vertical axis of the left stick
//! is `axes[1]`.

use std::fmt;

/// Stable identifier of a connected controller for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PadId(pub usize);

impl fmt::Display for PadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One controller's state as captured on a single poll tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PadSnapshot {
    pub id: PadId,
    pub connected: bool,
    /// Pressed state per button, ordered by standard-layout index.
    pub buttons: Vec<bool>,
    /// Analog axis values (−1.0..1.0), `[lx, ly, rx, ry]`.
    pub axes: Vec<f32>,
    /// Whether this device exposes a rumble actuator.
    pub can_rumble: bool,
}

impl PadSnapshot {
    /// Whether the button at `index` is currently held. Out-of-range
    /// indices read as not pressed.
    #[must_use]
    pub fn pressed(&self, index: u16) -> bool {
        self.buttons.get(index as usize).copied().unwrap_or(false)
    }

    /// Vertical value of the left stick, if the device reports one.
    #[must_use]
    pub fn vertical_axis(&self) -> Option<f32> {
        self.axes.get(1).copied()
    }
}

/// True when the button at `index` transitioned false→true between two
/// consecutive snapshots.
#[must_use]
pub fn just_pressed(prev: &[bool], current: &[bool], index: u16) -> bool {
    let index = index as usize;
    let now = current.get(index).copied().unwrap_or(false);
    let before = prev.get(index).copied().unwrap_or(false);
    now && !before
}

/// True when the button at `index` transitioned true→false between two
/// consecutive snapshots.
#[must_use]
pub fn just_released(prev: &[bool], current: &[bool], index: u16) -> bool {
    let index = index as usize;
    let now = current.get(index).copied().unwrap_or(false);
    let before = prev.get(index).copied().unwrap_or(false);
    !now && before
}
