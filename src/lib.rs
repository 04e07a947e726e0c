//! # Dino Pad Library
//!
//! Play the Chromium T-Rex runner with a gamepad.
//!
//! This library provides the core functionality for bridging controller
//! input to the keyboard events the game listens for: per-frame device
//! polling, remappable button bindings with persistence, synthetic key
//! timing, and rumble feedback.

pub mod bindings;
pub mod config;
pub mod error;
pub mod game;
pub mod gamepad;
pub mod haptics;
pub mod overlay;
pub mod session;
pub mod synth;
