//! # Haptic Feedback Dispatcher
//!
//! Fires timed rumble pulses in response to game events.
//!
//! Feedback is strictly best-effort: at most one device receives each pulse
//! (the first connected one that exposes a rumble actuator), a missing
//! actuator is a silent no-op, and device errors are swallowed inside the
//! backend. Nothing here can fail the poll loop.

use tracing::trace;

use crate::config::{HapticsConfig, PulseConfig};
use crate::gamepad::{GamepadBackend, PadSnapshot};

/// A single rumble pulse: how long and how hard.
///
/// Magnitudes are normalized 0.0..1.0 for the two motors of a dual-rumble
/// actuator (strong = low-frequency motor, weak = high-frequency motor).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseProfile {
    pub duration_ms: u32,
    pub strong: f32,
    pub weak: f32,
}

impl From<PulseConfig> for PulseProfile {
    fn from(config: PulseConfig) -> Self {
        Self {
            duration_ms: config.duration_ms,
            strong: config.strong,
            weak: config.weak,
        }
    }
}

/// Routes pulses to the first rumble-capable device.
#[derive(Debug)]
pub struct HapticDispatcher {
    enabled: bool,
    /// Pulse fired on every jump.
    pub jump_pulse: PulseProfile,
    /// Pulse fired when the dinosaur crashes.
    pub crash_pulse: PulseProfile,
}

impl HapticDispatcher {
    /// Builds a dispatcher from the haptics configuration.
    #[must_use]
    pub fn new(config: &HapticsConfig) -> Self {
        Self {
            enabled: config.enabled,
            jump_pulse: config.jump_pulse.into(),
            crash_pulse: config.crash_pulse.into(),
        }
    }

    /// Sends `profile` to the first connected rumble-capable pad.
    ///
    /// No capable device, haptics disabled, or an actuator error all degrade
    /// to doing nothing.
    pub fn pulse(
        &self,
        pads: &[PadSnapshot],
        backend: &mut dyn GamepadBackend,
        profile: &PulseProfile,
    ) {
        if !self.enabled {
            return;
        }

        let Some(pad) = pads.iter().find(|p| p.connected && p.can_rumble) else {
            trace!("No rumble-capable pad connected, skipping pulse");
            return;
        };

        trace!(
            "Pulsing pad {} for {}ms (strong {:.2}, weak {:.2})",
            pad.id, profile.duration_ms, profile.strong, profile.weak
        );
        backend.pulse(pad.id, profile);
    }
}
