//! # Overlay Surface
//!
//! The thin user-facing layer: remap commands in, binding notifications out.
//!
//! The overlay owns no state. Commands (`map jump`, `map duck`, `cancel`,
//! `reset`, `show`) are parsed from terminal lines and handed to the
//! controller session; the session pushes [`OverlayEvent`]s back whenever
//! bindings change or the "press a button" prompt should appear or
//! disappear.

use crate::bindings::{Action, BindingConfig};

/// Commands the user can issue to the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayCommand {
    /// Start capturing a new binding for an action.
    BeginRemap(Action),
    /// Abandon a pending capture.
    CancelRemap,
    /// Restore the default bindings.
    Reset,
    /// Print the current bindings.
    Show,
}

/// Push notifications from the session to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    /// Bindings changed (remap commit or reset); refresh the display.
    BindingsChanged(BindingConfig),
    /// A capture started; show the "press a button" prompt for this action.
    PromptShown(Action),
    /// The capture ended (committed or cancelled); hide the prompt.
    PromptHidden,
}

/// Parses one terminal line into a command. Unknown input yields `None`.
#[must_use]
pub fn parse_command(line: &str) -> Option<OverlayCommand> {
    match line.trim().to_lowercase().as_str() {
        "map jump" => Some(OverlayCommand::BeginRemap(Action::Jump)),
        "map duck" => Some(OverlayCommand::BeginRemap(Action::Duck)),
        "cancel" => Some(OverlayCommand::CancelRemap),
        "reset" => Some(OverlayCommand::Reset),
        "show" => Some(OverlayCommand::Show),
        _ => None,
    }
}

/// Formats the current bindings for display.
#[must_use]
pub fn render_bindings(config: &BindingConfig) -> String {
    let optional = |index: Option<u16>| match index {
        Some(i) => i.to_string(),
        None => "—".to_string(),
    };
    format!(
        "bindings: jump={} duck={} dpad_up={} dpad_down={}",
        config.jump,
        config.duck,
        optional(config.dpad_up),
        optional(config.dpad_down),
    )
}

/// Formats a session notification for display.
#[must_use]
pub fn render_event(event: &OverlayEvent) -> String {
    match event {
        OverlayEvent::BindingsChanged(config) => render_bindings(config),
        OverlayEvent::PromptShown(action) => {
            format!("press a controller button to map {}...", action)
        }
        OverlayEvent::PromptHidden => String::new(),
    }
}

/// One-line usage hint printed at startup.
#[must_use]
pub fn help_text() -> &'static str {
    "commands: 'map jump', 'map duck', 'cancel', 'reset', 'show'"
}
