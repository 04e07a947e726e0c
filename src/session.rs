//! # Controller Session / Poll Loop
//!
//! The per-tick driver that turns controller state into game input.
//!
//! [`ControllerSession`] owns every piece of mutable poll state: the binding
//! configuration, the remap session, the previous button snapshot, the
//! sticky controller selection, the duck aggregate and the crash latch. The
//! loop driver calls [`tick`](ControllerSession::tick) once per display
//! refresh and passes the session explicitly; nothing here lives in module
//! globals.
//!
//! ## Per-Tick Flow
//!
//! 1. Resolve the active controller (sticky: keep the previously selected
//!    pad until it disconnects, then fall back to the first connected one).
//!    No controller clears all transient state.
//! 2. On the first tick with a controller (or right after a reselect),
//!    adopt its snapshot without firing anything — buttons held during
//!    connect must not fire spurious actions.
//! 3. While a remap capture is pending, scan for the capturing press and
//!    suppress all normal action handling.
//! 4. Otherwise detect jump edges, the duck aggregate, and the crash edge.
//!
//! ## Duck Aggregation
//!
//! Duck has three sources: the bound button, the d-pad down alternate, and
//! the stick pushed past the dead zone. They are OR-ed into one aggregate
//! *before* edge detection, so releasing one source while another still
//! holds never synthesizes a release.

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::bindings::{Action, BindingConfig, BindingStore, KeyValueStore, RemapSession};
use crate::config::Config;
use crate::gamepad::{just_pressed, GamepadBackend, PadId, PadSnapshot};
use crate::haptics::HapticDispatcher;
use crate::overlay::{OverlayCommand, OverlayEvent};
use crate::synth::{InputSynthesizer, KeySink};

/// Owns all controller-input state and drives one poll tick at a time.
pub struct ControllerSession<S: KeyValueStore> {
    bindings: BindingStore<S>,
    remap: RemapSession,
    haptics: HapticDispatcher,
    events: UnboundedSender<OverlayEvent>,
    axis_deadzone: f32,
    /// Button snapshot from the previous tick; `None` right after connect,
    /// reselect, or disconnect.
    prev_buttons: Option<Vec<bool>>,
    /// Sticky active controller; reselected only when it disconnects.
    selected: Option<PadId>,
    duck_active: bool,
    last_crash: bool,
}

impl<S: KeyValueStore> ControllerSession<S> {
    /// Builds a session over a loaded binding store.
    pub fn new(
        bindings: BindingStore<S>,
        config: &Config,
        events: UnboundedSender<OverlayEvent>,
    ) -> Self {
        Self {
            bindings,
            remap: RemapSession::new(),
            haptics: HapticDispatcher::new(&config.haptics),
            events,
            axis_deadzone: config.poll.axis_deadzone,
            prev_buttons: None,
            selected: None,
            duck_active: false,
            last_crash: false,
        }
    }

    /// Current bindings, for display.
    #[must_use]
    pub fn bindings(&self) -> &BindingConfig {
        self.bindings.config()
    }

    /// Runs one poll tick.
    ///
    /// `pads` is this tick's device snapshot list, `crash` the host game's
    /// crash flag when the capability is present.
    pub fn tick<K: KeySink + 'static>(
        &mut self,
        pads: &[PadSnapshot],
        synth: &mut InputSynthesizer<K>,
        backend: &mut dyn GamepadBackend,
        crash: Option<bool>,
    ) {
        let Some(pad) = self.select_pad(pads) else {
            self.on_no_controller(synth);
            return;
        };

        let Some(prev) = self.prev_buttons.take() else {
            // First tick with this controller: adopt its state so buttons
            // held during connect never fire as edges.
            self.prev_buttons = Some(pad.buttons.clone());
            return;
        };

        if self.remap.is_capturing() {
            if let Some(outcome) = self.remap.try_capture(&prev, &pad.buttons) {
                self.bindings.commit(outcome.action, outcome.index);
                self.send(OverlayEvent::BindingsChanged(*self.bindings.config()));
                self.send(OverlayEvent::PromptHidden);
            }
            // Normal action handling is suppressed for the whole capture
            // tick; the capturing press must not also jump or duck.
            self.prev_buttons = Some(pad.buttons.clone());
            return;
        }

        let config = *self.bindings.config();

        // Jump: edge-triggered, from the bound button or the d-pad alternate.
        let jump_edge = just_pressed(&prev, &pad.buttons, config.jump)
            || config
                .dpad_up
                .is_some_and(|index| just_pressed(&prev, &pad.buttons, index));
        if jump_edge {
            synth.press_jump();
            let profile = self.haptics.jump_pulse;
            self.haptics.pulse(pads, backend, &profile);
        }

        // Duck: aggregate the three sources, then edge-detect the aggregate.
        let duck_now = pad.pressed(config.duck)
            || config.dpad_down.is_some_and(|index| pad.pressed(index))
            || pad
                .vertical_axis()
                .is_some_and(|value| value > self.axis_deadzone);
        if duck_now && !self.duck_active {
            synth.press_duck();
        } else if !duck_now && self.duck_active {
            synth.release_duck();
        }
        self.duck_active = duck_now;

        // Crash rumble is advisory; hosts without the capability skip it.
        if let Some(crashed) = crash {
            if crashed && !self.last_crash {
                let profile = self.haptics.crash_pulse;
                self.haptics.pulse(pads, backend, &profile);
            }
            self.last_crash = crashed;
        }

        self.prev_buttons = Some(pad.buttons.clone());
    }

    /// Handles a command from the overlay.
    pub fn handle_command(&mut self, command: OverlayCommand) {
        match command {
            OverlayCommand::BeginRemap(action) => self.begin_remap(action),
            OverlayCommand::CancelRemap => self.cancel_remap(),
            OverlayCommand::Reset => self.reset_bindings(),
            OverlayCommand::Show => {
                self.send(OverlayEvent::BindingsChanged(*self.bindings.config()))
            }
        }
    }

    /// Starts waiting for a button press to re-bind `action`.
    pub fn begin_remap(&mut self, action: Action) {
        if self.remap.begin(action) {
            self.send(OverlayEvent::PromptShown(action));
        }
    }

    /// Abandons a pending capture, if any.
    pub fn cancel_remap(&mut self) {
        if self.remap.cancel() {
            self.send(OverlayEvent::PromptHidden);
        }
    }

    /// Restores and persists the default bindings.
    pub fn reset_bindings(&mut self) {
        self.bindings.reset();
        self.send(OverlayEvent::BindingsChanged(*self.bindings.config()));
    }

    /// Resolves the active controller for this tick.
    ///
    /// Selection is sticky: once a pad is active it stays active until it
    /// disconnects, even if a lower-numbered pad appears later. A reselect
    /// invalidates the previous snapshot (the button layout belongs to the
    /// old pad).
    fn select_pad<'a>(&mut self, pads: &'a [PadSnapshot]) -> Option<&'a PadSnapshot> {
        if let Some(selected) = self.selected {
            if let Some(pad) = pads.iter().find(|p| p.id == selected && p.connected) {
                return Some(pad);
            }
        }

        let pad = pads.iter().find(|p| p.connected)?;
        if self.selected != Some(pad.id) {
            debug!("Active controller is now pad {}", pad.id);
            self.prev_buttons = None;
        }
        self.selected = Some(pad.id);
        Some(pad)
    }

    /// Clears transient state while no controller is connected.
    fn on_no_controller<K: KeySink + 'static>(&mut self, synth: &mut InputSynthesizer<K>) {
        self.prev_buttons = None;
        self.selected = None;
        if self.duck_active {
            // Don't leave the dinosaur stuck ducking when the pad vanishes.
            synth.release_duck();
            self.duck_active = false;
        }
    }

    fn send(&self, event: OverlayEvent) {
        // The overlay having gone away is not the poll loop's problem.
        let _ = self.events.send(event);
    }
}
