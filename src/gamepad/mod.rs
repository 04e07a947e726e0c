//! # Gamepad Module
//!
//! Controller polling and rumble output.
//!
//! This module handles:
//! - Per-tick device snapshots (button booleans plus analog axes)
//! - Edge detection between consecutive snapshots
//! - The [`GamepadBackend`] seam, with a gilrs production implementation
//! - Rumble pulses via force feedback

pub mod backend;
pub mod gilrs_backend;
pub mod snapshot;

pub use backend::GamepadBackend;
pub use gilrs_backend::GilrsBackend;
pub use snapshot::{just_pressed, just_released, PadId, PadSnapshot};
