//! # Uinput Keyboard Sink
//!
//! Production [`KeySink`](super::KeySink) backed by a Linux uinput virtual
//! keyboard.
//!
//! Events emitted here travel through the kernel input layer, so from the
//! browser's point of view they are ordinary keyboard input: they reach the
//! focused window exactly like a hardware Space or ArrowDown press, at both
//! the window and document level.
//!
//! Creating the device needs write access to `/dev/uinput` (typically the
//! `input` group or a udev rule).

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key};
use tracing::info;

use crate::error::{DinoPadError, Result};

use super::{KeySink, LogicalKey};

/// Name the virtual device registers under.
const DEVICE_NAME: &str = "dino-pad virtual keyboard";

/// Virtual keyboard emitting Space and ArrowDown.
pub struct UinputKeyboard {
    device: VirtualDevice,
}

impl UinputKeyboard {
    /// Creates the virtual keyboard device.
    ///
    /// # Errors
    ///
    /// Returns [`DinoPadError::KeySynthesis`] when `/dev/uinput` is missing
    /// or not writable.
    pub fn new() -> Result<Self> {
        let mut keys = AttributeSet::<Key>::new();
        keys.insert(Key::KEY_SPACE);
        keys.insert(Key::KEY_DOWN);

        let device = VirtualDeviceBuilder::new()
            .and_then(|builder| builder.name(DEVICE_NAME).with_keys(&keys)?.build())
            .map_err(|e| {
                DinoPadError::KeySynthesis(format!(
                    "failed to create uinput device (is /dev/uinput writable?): {}",
                    e
                ))
            })?;

        info!("Created virtual keyboard '{}'", DEVICE_NAME);
        Ok(Self { device })
    }

    fn key_code(key: LogicalKey) -> Key {
        match key {
            LogicalKey::Jump => Key::KEY_SPACE,
            LogicalKey::Duck => Key::KEY_DOWN,
        }
    }

    fn emit(&mut self, key: LogicalKey, value: i32) -> Result<()> {
        let event = InputEvent::new(EventType::KEY, Self::key_code(key).code(), value);
        self.device
            .emit(&[event])
            .map_err(|e| DinoPadError::KeySynthesis(format!("failed to emit key event: {}", e)))
    }
}

impl KeySink for UinputKeyboard {
    fn key_down(&mut self, key: LogicalKey) -> Result<()> {
        self.emit(key, 1)
    }

    fn key_up(&mut self, key: LogicalKey) -> Result<()> {
        self.emit(key, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codes() {
        assert_eq!(UinputKeyboard::key_code(LogicalKey::Jump), Key::KEY_SPACE);
        assert_eq!(UinputKeyboard::key_code(LogicalKey::Duck), Key::KEY_DOWN);
    }

    // Integration test - needs write access to /dev/uinput
    #[test]
    #[ignore] // Run with: cargo test -- --ignored
    fn test_create_and_emit_with_real_uinput() {
        let mut keyboard = UinputKeyboard::new().expect("uinput unavailable");
        keyboard.key_down(LogicalKey::Jump).unwrap();
        keyboard.key_up(LogicalKey::Jump).unwrap();
    }
}
