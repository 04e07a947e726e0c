//! Trait abstraction for gamepad polling and rumble to enable testing

use crate::haptics::PulseProfile;

use super::snapshot::{PadId, PadSnapshot};

/// Trait for gamepad device access
///
/// One `poll` per tick returns a snapshot of every known device. A device
/// whose state cannot be read must be reported as disconnected for that tick
/// rather than surfacing an error; the poll loop runs for the life of the
/// process and never terminates on device trouble.
pub trait GamepadBackend {
    /// Snapshot all known devices, ordered by stable id.
    fn poll(&mut self) -> Vec<PadSnapshot>;

    /// Play a rumble pulse on one device, best-effort. Unknown ids and
    /// actuator failures are swallowed.
    fn pulse(&mut self, id: PadId, profile: &PulseProfile);
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted backend for testing: returns queued snapshots tick by tick
    /// and records every pulse request.
    #[derive(Default)]
    pub struct ScriptedBackend {
        pub ticks: VecDeque<Vec<PadSnapshot>>,
        pub pulses: Vec<(PadId, PulseProfile)>,
    }

    impl ScriptedBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_tick(&mut self, pads: Vec<PadSnapshot>) {
            self.ticks.push_back(pads);
        }
    }

    impl GamepadBackend for ScriptedBackend {
        fn poll(&mut self) -> Vec<PadSnapshot> {
            self.ticks.pop_front().unwrap_or_default()
        }

        fn pulse(&mut self, id: PadId, profile: &PulseProfile) {
            self.pulses.push((id, *profile));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::ScriptedBackend;
    use super::*;

    #[test]
    fn test_scripted_backend_replays_ticks_in_order() {
        let mut backend = ScriptedBackend::new();
        backend.push_tick(vec![]);
        backend.push_tick(vec![PadSnapshot {
            id: PadId(3),
            connected: true,
            buttons: vec![true],
            axes: vec![],
            can_rumble: false,
        }]);

        assert!(backend.poll().is_empty());
        assert_eq!(backend.poll()[0].id, PadId(3));
        // Exhausted script reads as "no devices"
        assert!(backend.poll().is_empty());
    }

    #[test]
    fn test_scripted_backend_records_pulses() {
        let mut backend = ScriptedBackend::new();
        let profile = PulseProfile { duration_ms: 100, strong: 0.8, weak: 0.3 };
        backend.pulse(PadId(1), &profile);

        assert_eq!(backend.pulses, vec![(PadId(1), profile)]);
    }
}
