//! # Error Types
//!
//! Custom error types for Dino Pad using `thiserror`.
//!
//! Almost everything in this crate degrades instead of failing: storage
//! corruption falls back to defaults, device read errors count as "no
//! controller this tick", and rumble failures are swallowed. The variants
//! below cover the remaining cases, mostly startup and the synthetic
//! keyboard seam.

use thiserror::Error;

/// Main error type for Dino Pad
#[derive(Debug, Error)]
pub enum DinoPadError {
    /// Gamepad subsystem errors (initialization, device enumeration)
    #[error("gamepad error: {0}")]
    Gamepad(String),

    /// Synthetic keyboard errors (uinput device creation or event emission)
    #[error("key synthesis error: {0}")]
    KeySynthesis(String),

    /// Binding storage errors (key-value backend unavailable)
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Dino Pad
pub type Result<T> = std::result::Result<T, DinoPadError>;
