//! # Host Game State
//!
//! Optional access to the running game's crash flag.
//!
//! The runner exposes (when reachable at all) a single boolean: whether the
//! dinosaur has crashed. The poll loop watches its false→true edge to fire
//! the crash rumble. The whole capability is advisory — a host that exposes
//! nothing is a perfectly valid state, not an error, and the bridge then
//! simply never rumbles on crashes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Capability trait for hosts that can report the game's crash state.
pub trait CrashSignal {
    /// Whether the dinosaur is currently crashed.
    fn crashed(&self) -> bool;
}

/// A [`CrashSignal`] backed by a shared atomic flag.
///
/// Whatever glue observes the game (a devtools bridge, an extension, a test)
/// flips the flag; the poll loop reads it once per tick.
#[derive(Debug, Clone, Default)]
pub struct SharedCrashFlag {
    flag: Arc<AtomicBool>,
}

impl SharedCrashFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for the writing side.
    #[must_use]
    pub fn handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Updates the crash state.
    pub fn set(&self, crashed: bool) {
        self.flag.store(crashed, Ordering::Relaxed);
    }
}

impl CrashSignal for SharedCrashFlag {
    fn crashed(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
