//! # Input Event Synthesizer
//!
//! Turns logical action transitions into the keyboard input the game
//! expects.
//!
//! The runner only ever reads two keys: Space (jump / confirm) and ArrowDown
//! (duck). Synthesized events must be indistinguishable from real key
//! presses, which is what the [`KeySink`] seam is for — the production sink
//! is a uinput virtual keyboard, so events arrive through the kernel like
//! any hardware keyboard's.
//!
//! ## Jump Hold Timing
//!
//! The game reads a jump as a short Space tap. A jump press therefore
//! schedules its own release after a fixed wall-clock hold (default 120 ms)
//! on a deferred timer, independent of the poll tick rate. The timer races
//! against the next press: a fresh press for the same key always cancels a
//! pending auto-release first, otherwise a stale release could land after
//! the new press and desynchronize the hold.

pub mod uinput;

pub use uinput::UinputKeyboard;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::Result;

/// The two logical keys the game listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalKey {
    /// Space — jump / confirm.
    Jump,
    /// ArrowDown — duck.
    Duck,
}

/// Trait for emitting key transitions into the host system
pub trait KeySink: Send {
    /// Emit a key-down for `key`.
    fn key_down(&mut self, key: LogicalKey) -> Result<()>;

    /// Emit a key-up for `key`.
    fn key_up(&mut self, key: LogicalKey) -> Result<()>;
}

/// Synthesizes press/hold/release sequences with the timing the game
/// expects.
///
/// Sink errors are logged and swallowed; a missed key event is an input
/// glitch, not a reason to stop the poll loop.
pub struct InputSynthesizer<K: KeySink + 'static> {
    sink: Arc<Mutex<K>>,
    jump_hold: Duration,
    pending_jump_release: Option<JoinHandle<()>>,
}

impl<K: KeySink + 'static> InputSynthesizer<K> {
    /// Creates a synthesizer over `sink` with the given jump hold duration.
    pub fn new(sink: K, jump_hold: Duration) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
            jump_hold,
            pending_jump_release: None,
        }
    }

    /// Presses Space and schedules its release after the hold duration.
    ///
    /// Must run inside a tokio runtime (the release is a deferred task).
    /// A pending auto-release from an earlier jump is cancelled before the
    /// new press is emitted.
    pub fn press_jump(&mut self) {
        self.cancel_pending_release();
        emit(&self.sink, LogicalKey::Jump, true);

        let sink = Arc::clone(&self.sink);
        let hold = self.jump_hold;
        self.pending_jump_release = Some(tokio::spawn(async move {
            tokio::time::sleep(hold).await;
            emit(&sink, LogicalKey::Jump, false);
        }));
    }

    /// Releases Space immediately, cancelling any pending auto-release.
    pub fn release_jump(&mut self) {
        self.cancel_pending_release();
        emit(&self.sink, LogicalKey::Jump, false);
    }

    /// Presses ArrowDown. Ducking is level-held, so there is no scheduled
    /// release; [`release_duck`](Self::release_duck) ends it.
    pub fn press_duck(&mut self) {
        emit(&self.sink, LogicalKey::Duck, true);
    }

    /// Releases ArrowDown.
    pub fn release_duck(&mut self) {
        emit(&self.sink, LogicalKey::Duck, false);
    }

    fn cancel_pending_release(&mut self) {
        if let Some(handle) = self.pending_jump_release.take() {
            handle.abort();
        }
    }
}

fn emit<K: KeySink>(sink: &Arc<Mutex<K>>, key: LogicalKey, down: bool) {
    let Ok(mut sink) = sink.lock() else {
        warn!("Key sink lock poisoned, dropping {:?} event", key);
        return;
    };
    let result = if down { sink.key_down(key) } else { sink.key_up(key) };
    if let Err(e) = result {
        warn!("Failed to emit {:?} ({}): {}", key, if down { "down" } else { "up" }, e);
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;

    /// Recorded key transition: the key and whether it was a press.
    pub type KeyEvent = (LogicalKey, bool);

    /// Recording sink for testing, with optional fault injection.
    pub struct RecordingSink {
        pub events: Arc<Mutex<Vec<KeyEvent>>>,
        pub fail: bool,
    }

    impl RecordingSink {
        pub fn new() -> (Self, Arc<Mutex<Vec<KeyEvent>>>) {
            let events = Arc::new(Mutex::new(Vec::new()));
            (
                Self { events: Arc::clone(&events), fail: false },
                events,
            )
        }
    }

    impl KeySink for RecordingSink {
        fn key_down(&mut self, key: LogicalKey) -> Result<()> {
            if self.fail {
                return Err(crate::error::DinoPadError::KeySynthesis(
                    "mock sink error".to_string(),
                ));
            }
            self.events.lock().unwrap().push((key, true));
            Ok(())
        }

        fn key_up(&mut self, key: LogicalKey) -> Result<()> {
            if self.fail {
                return Err(crate::error::DinoPadError::KeySynthesis(
                    "mock sink error".to_string(),
                ));
            }
            self.events.lock().unwrap().push((key, false));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::RecordingSink;
    use super::*;

    const HOLD: Duration = Duration::from_millis(120);

    #[tokio::test(start_paused = true)]
    async fn test_jump_press_then_auto_release() {
        let (sink, events) = RecordingSink::new();
        let mut synth = InputSynthesizer::new(sink, HOLD);

        synth.press_jump();
        assert_eq!(*events.lock().unwrap(), vec![(LogicalKey::Jump, true)]);

        // Just before the hold elapses: still held.
        tokio::time::sleep(Duration::from_millis(119)).await;
        assert_eq!(events.lock().unwrap().len(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(
            *events.lock().unwrap(),
            vec![(LogicalKey::Jump, true), (LogicalKey::Jump, false)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_fires_exactly_once() {
        let (sink, events) = RecordingSink::new();
        let mut synth = InputSynthesizer::new(sink, HOLD);

        synth.press_jump();
        // Far past the hold: only one release, no matter how long we wait.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(events.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_press_cancels_pending_release() {
        let (sink, events) = RecordingSink::new();
        let mut synth = InputSynthesizer::new(sink, HOLD);

        synth.press_jump();
        tokio::time::sleep(Duration::from_millis(60)).await;
        synth.press_jump();

        // 119 ms after the second press; the first press's timer (due at
        // 120 ms from the start) must not have fired a stale release.
        tokio::time::sleep(Duration::from_millis(119)).await;
        assert_eq!(
            *events.lock().unwrap(),
            vec![(LogicalKey::Jump, true), (LogicalKey::Jump, true)]
        );

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(events.lock().unwrap().len(), 3);
        assert_eq!(events.lock().unwrap()[2], (LogicalKey::Jump, false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_release_cancels_auto_release() {
        let (sink, events) = RecordingSink::new();
        let mut synth = InputSynthesizer::new(sink, HOLD);

        synth.press_jump();
        synth.release_jump();
        assert_eq!(
            *events.lock().unwrap(),
            vec![(LogicalKey::Jump, true), (LogicalKey::Jump, false)]
        );

        // The aborted timer must not produce a second release.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(events.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duck_press_and_release_are_immediate() {
        let (sink, events) = RecordingSink::new();
        let mut synth = InputSynthesizer::new(sink, HOLD);

        synth.press_duck();
        synth.release_duck();
        assert_eq!(
            *events.lock().unwrap(),
            vec![(LogicalKey::Duck, true), (LogicalKey::Duck, false)]
        );

        // No timers involved in ducking.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(events.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sink_errors_are_swallowed() {
        let (mut sink, events) = RecordingSink::new();
        sink.fail = true;
        let mut synth = InputSynthesizer::new(sink, HOLD);

        // Must not panic; the loop keeps running on sink trouble.
        synth.press_jump();
        synth.press_duck();
        synth.release_duck();
        assert!(events.lock().unwrap().is_empty());
    }
}
