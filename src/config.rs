//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every field has a default matching the behavior the T-Rex runner expects,
//! so an empty file (or no file at all) yields a working setup. The defaults
//! mirror the timing constants the game was tuned against: a 120 ms jump
//! hold, a 0.4 stick dead zone and the two rumble profiles.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub synth: SynthConfig,

    #[serde(default)]
    pub haptics: HapticsConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Poll loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    /// Ticks per second. 60 matches a typical display refresh; the game was
    /// written against per-frame polling.
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,

    /// Vertical stick deflection (0..1) required before analog duck engages.
    #[serde(default = "default_axis_deadzone")]
    pub axis_deadzone: f32,
}

/// Synthetic keyboard configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SynthConfig {
    /// How long the synthetic Space key is held on a jump, in milliseconds.
    /// Wall-clock, independent of the tick rate.
    #[serde(default = "default_jump_hold_ms")]
    pub jump_hold_ms: u64,
}

/// Haptic feedback configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HapticsConfig {
    #[serde(default = "default_haptics_enabled")]
    pub enabled: bool,

    /// Short, strong pulse fired on every jump.
    #[serde(default = "default_jump_pulse")]
    pub jump_pulse: PulseConfig,

    /// Longer, harder pulse fired when the dinosaur crashes.
    #[serde(default = "default_crash_pulse")]
    pub crash_pulse: PulseConfig,
}

/// A single rumble pulse description
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct PulseConfig {
    pub duration_ms: u32,
    pub strong: f32,
    pub weak: f32,
}

/// Binding storage configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding the persisted binding file.
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

// Default value functions
fn default_tick_rate_hz() -> u32 { 60 }
fn default_axis_deadzone() -> f32 { 0.4 }

fn default_jump_hold_ms() -> u64 { 120 }

fn default_haptics_enabled() -> bool { true }
fn default_jump_pulse() -> PulseConfig {
    PulseConfig { duration_ms: 100, strong: 0.8, weak: 0.3 }
}
fn default_crash_pulse() -> PulseConfig {
    PulseConfig { duration_ms: 400, strong: 1.0, weak: 0.6 }
}

fn default_storage_dir() -> String { "./data".to_string() }

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate_hz(),
            axis_deadzone: default_axis_deadzone(),
        }
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self { jump_hold_ms: default_jump_hold_ms() }
    }
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            enabled: default_haptics_enabled(),
            jump_pulse: default_jump_pulse(),
            crash_pulse: default_crash_pulse(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { dir: default_storage_dir() }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dino_pad::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, or fall back to defaults when the
    /// file does not exist.
    ///
    /// A present-but-invalid file is still an error; silently ignoring a file
    /// the user wrote would hide typos.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if self.poll.tick_rate_hz < 30 || self.poll.tick_rate_hz > 240 {
            return Err(crate::error::DinoPadError::Config(
                toml::de::Error::custom("tick_rate_hz must be between 30 and 240")
            ));
        }

        if self.poll.axis_deadzone < 0.0 || self.poll.axis_deadzone > 0.9 {
            return Err(crate::error::DinoPadError::Config(
                toml::de::Error::custom("axis_deadzone must be between 0.0 and 0.9")
            ));
        }

        if self.synth.jump_hold_ms == 0 || self.synth.jump_hold_ms > 2000 {
            return Err(crate::error::DinoPadError::Config(
                toml::de::Error::custom("jump_hold_ms must be between 1 and 2000")
            ));
        }

        for (name, pulse) in [
            ("jump_pulse", &self.haptics.jump_pulse),
            ("crash_pulse", &self.haptics.crash_pulse),
        ] {
            if pulse.duration_ms == 0 || pulse.duration_ms > 5000 {
                return Err(crate::error::DinoPadError::Config(
                    toml::de::Error::custom(format!("{} duration_ms must be between 1 and 5000", name))
                ));
            }

            for (axis, value) in [("strong", pulse.strong), ("weak", pulse.weak)] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(crate::error::DinoPadError::Config(
                        toml::de::Error::custom(format!("{} {} magnitude must be between 0.0 and 1.0", name, axis))
                    ));
                }
            }
        }

        if self.storage.dir.is_empty() {
            return Err(crate::error::DinoPadError::Config(
                toml::de::Error::custom("storage dir cannot be empty")
            ));
        }

        Ok(())
    }
}
