//! # Gilrs Backend
//!
//! Production [`GamepadBackend`] implementation on top of gilrs.
//!
//! ## Button Index Order
//!
//! Snapshots expose buttons as an ordered boolean list so bindings can refer
//! to plain indices. The order follows the standard gamepad layout (the
//! numbering the Web Gamepad API uses), which is what the default bindings
//! assume:
//!
//! | Index | Button | Index | Button |
//! |-------|--------|-------|--------|
//! | 0 | South (A) | 9 | Start |
//! | 1 | East (B) | 10 | Left stick click |
//! | 2 | West (X) | 11 | Right stick click |
//! | 3 | North (Y) | 12 | D-Pad Up |
//! | 4 | L1 | 13 | D-Pad Down |
//! | 5 | R1 | 14 | D-Pad Left |
//! | 6 | L2 | 15 | D-Pad Right |
//! | 7 | R2 | 16 | Mode (Guide) |
//! | 8 | Select | | |
//!
//! ## Axis Orientation
//!
//! gilrs reports stick Y with positive up; snapshots use the Web convention
//! (positive down) because the analog duck check expects "stick pushed down"
//! to be a positive deflection.

use std::collections::HashMap;

use gilrs::ff::{BaseEffect, BaseEffectType, Effect, EffectBuilder, Repeat, Replay, Ticks};
use gilrs::{Axis, Button, Gamepad, GamepadId, Gilrs};
use tracing::{debug, info};

use crate::error::{DinoPadError, Result};
use crate::haptics::PulseProfile;

use super::backend::GamepadBackend;
use super::snapshot::{PadId, PadSnapshot};

/// Buttons in standard gamepad layout order.
pub const BUTTON_ORDER: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
];

/// Shortest pulse an actuator is asked to play, in milliseconds. Some
/// drivers drop effects shorter than this entirely.
const MIN_PULSE_MS: u32 = 10;

/// Gamepad access via the gilrs event pump.
pub struct GilrsBackend {
    gilrs: Gilrs,
    /// Snapshot id → gilrs id, refreshed every poll.
    ids: HashMap<usize, GamepadId>,
    /// Most recent rumble effect. Kept alive here because dropping a gilrs
    /// effect stops it.
    active_effect: Option<Effect>,
}

impl GilrsBackend {
    /// Initializes the gamepad subsystem.
    ///
    /// # Errors
    ///
    /// Returns [`DinoPadError::Gamepad`] when the platform input backend
    /// cannot be initialized.
    pub fn new() -> Result<Self> {
        let gilrs = Gilrs::new()
            .map_err(|e| DinoPadError::Gamepad(format!("failed to initialize gilrs: {}", e)))?;

        for (_, gamepad) in gilrs.gamepads() {
            info!(
                "Found gamepad: {} (rumble: {})",
                gamepad.name(),
                gamepad.is_ff_supported()
            );
        }

        Ok(Self {
            gilrs,
            ids: HashMap::new(),
            active_effect: None,
        })
    }

    fn snapshot(id: PadId, gamepad: &Gamepad<'_>) -> PadSnapshot {
        let buttons = BUTTON_ORDER
            .iter()
            .map(|&button| gamepad.is_pressed(button))
            .collect();

        let axis = |axis: Axis| gamepad.axis_data(axis).map(|d| d.value()).unwrap_or(0.0);
        // Flip Y to the Web convention: positive = down.
        let axes = vec![
            axis(Axis::LeftStickX),
            -axis(Axis::LeftStickY),
            axis(Axis::RightStickX),
            -axis(Axis::RightStickY),
        ];

        PadSnapshot {
            id,
            connected: gamepad.is_connected(),
            buttons,
            axes,
            can_rumble: gamepad.is_ff_supported(),
        }
    }
}

impl GamepadBackend for GilrsBackend {
    fn poll(&mut self) -> Vec<PadSnapshot> {
        // Drain the event queue; gilrs updates its cached gamepad state as
        // events are pumped.
        while self.gilrs.next_event().is_some() {}

        self.ids.clear();
        let mut pads = Vec::new();
        for (gilrs_id, gamepad) in self.gilrs.gamepads() {
            let id = PadId(usize::from(gilrs_id));
            self.ids.insert(id.0, gilrs_id);
            pads.push(Self::snapshot(id, &gamepad));
        }

        // Stable iteration order for deterministic "first connected" picks.
        pads.sort_by_key(|pad| pad.id);
        pads
    }

    fn pulse(&mut self, id: PadId, profile: &PulseProfile) {
        let Some(&gilrs_id) = self.ids.get(&id.0) else {
            debug!("Pulse requested for unknown pad {}", id);
            return;
        };

        match self.gilrs.connected_gamepad(gilrs_id) {
            Some(gamepad) if gamepad.is_ff_supported() => {}
            _ => return,
        }

        let duration = Ticks::from_ms(profile.duration_ms.max(MIN_PULSE_MS));
        let result = EffectBuilder::new()
            .add_effect(BaseEffect {
                kind: BaseEffectType::Strong {
                    magnitude: to_magnitude(profile.strong),
                },
                scheduling: Replay {
                    play_for: duration,
                    ..Default::default()
                },
                envelope: Default::default(),
            })
            .add_effect(BaseEffect {
                kind: BaseEffectType::Weak {
                    magnitude: to_magnitude(profile.weak),
                },
                scheduling: Replay {
                    play_for: duration,
                    ..Default::default()
                },
                envelope: Default::default(),
            })
            .repeat(Repeat::For(duration))
            .gamepads(&[gilrs_id])
            .finish(&mut self.gilrs);

        match result {
            Ok(effect) => {
                if let Err(e) = effect.play() {
                    debug!("Failed to play rumble effect: {}", e);
                }
                // Replacing the previous effect also stops it if it was
                // still running.
                self.active_effect = Some(effect);
            }
            Err(e) => debug!("Failed to upload rumble effect: {}", e),
        }
    }
}

/// Scales a normalized 0.0..1.0 magnitude to the u16 range the force
/// feedback API expects. Out-of-range input is clamped.
fn to_magnitude(value: f32) -> u16 {
    (value.clamp(0.0, 1.0) * f32::from(u16::MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_order_matches_default_bindings() {
        // The default bindings (jump=0, duck=1, dpad_up=12, dpad_down=13)
        // rely on this exact layout.
        assert_eq!(BUTTON_ORDER[0], Button::South);
        assert_eq!(BUTTON_ORDER[1], Button::East);
        assert_eq!(BUTTON_ORDER[12], Button::DPadUp);
        assert_eq!(BUTTON_ORDER[13], Button::DPadDown);
    }

    #[test]
    fn test_button_order_covers_standard_layout() {
        assert_eq!(BUTTON_ORDER.len(), 17);
    }

    #[test]
    fn test_magnitude_scaling() {
        assert_eq!(to_magnitude(0.0), 0);
        assert_eq!(to_magnitude(1.0), u16::MAX);
        // Half strength lands near the middle of the range
        let half = to_magnitude(0.5) as i32;
        assert!((half - i32::from(u16::MAX) / 2).abs() <= 1);
    }

    #[test]
    fn test_magnitude_clamps_out_of_range() {
        assert_eq!(to_magnitude(-0.5), 0);
        assert_eq!(to_magnitude(2.0), u16::MAX);
    }

    #[test]
    fn test_min_pulse_clamp() {
        assert_eq!(MIN_PULSE_MS, 10);
        assert_eq!(3u32.max(MIN_PULSE_MS), 10);
        assert_eq!(100u32.max(MIN_PULSE_MS), 100);
    }

    // Integration test - only runs with a real controller connected
    #[test]
    #[ignore] // Run with: cargo test -- --ignored
    fn test_poll_with_real_hardware() {
        let mut backend = GilrsBackend::new().expect("gilrs init failed");
        let pads = backend.poll();

        for pad in &pads {
            println!(
                "pad {}: {} buttons, {} axes, rumble: {}",
                pad.id,
                pad.buttons.len(),
                pad.axes.len(),
                pad.can_rumble
            );
            assert_eq!(pad.buttons.len(), BUTTON_ORDER.len());
            assert_eq!(pad.axes.len(), 4);
        }
    }

    // Integration test - only runs with a rumble-capable controller
    #[test]
    #[ignore]
    fn test_pulse_with_real_hardware() {
        let mut backend = GilrsBackend::new().expect("gilrs init failed");
        let pads = backend.poll();

        if let Some(pad) = pads.iter().find(|p| p.can_rumble) {
            let profile = PulseProfile { duration_ms: 200, strong: 0.8, weak: 0.3 };
            backend.pulse(pad.id, &profile);
            std::thread::sleep(std::time::Duration::from_millis(300));
        } else {
            println!("No rumble-capable pad connected (this is OK)");
        }
    }
}
