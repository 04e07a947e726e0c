//! # Dino Pad
//!
//! Play the Chromium T-Rex runner with a gamepad.
//!
//! This application polls connected controllers at display rate and turns
//! button presses into the Space / ArrowDown keyboard events the game
//! listens for, via a uinput virtual keyboard.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber;

use dino_pad::bindings::{BindingStore, FileStore};
use dino_pad::config::Config;
use dino_pad::gamepad::{GamepadBackend, GilrsBackend};
use dino_pad::overlay::{help_text, parse_command, render_bindings, render_event};
use dino_pad::session::ControllerSession;
use dino_pad::synth::{InputSynthesizer, UinputKeyboard};

/// Configuration file used when no path is given on the command line.
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Microseconds per second, for the tick period calculation.
const MICROS_PER_SECOND: u64 = 1_000_000;

/// Main entry point for the Dino Pad application
///
/// Initializes the bridge and runs the main poll loop that samples
/// controller state once per tick (60Hz by default) and synthesizes
/// keyboard input for the game.
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load the TOML configuration (defaults when the file is absent)
///    - Create the gilrs gamepad backend and the uinput virtual keyboard
///    - Load persisted button bindings
///
/// 2. **Main Loop**
///    - Poll all controllers once per tick and run the session logic
///      (edge detection, remap capture, duck aggregation, haptics)
///    - Read remap commands (`map jump`, `map duck`, `cancel`, `reset`,
///      `show`) from stdin
///    - Print binding changes and capture prompts as the session pushes
///      them back
///    - Handle Ctrl+C for graceful shutdown
///
/// # Errors
///
/// Returns error if:
/// - The configuration file exists but is invalid
/// - The gamepad backend cannot be initialized
/// - The uinput virtual keyboard cannot be created (needs write access to
///   `/dev/uinput`)
///
/// # Examples
///
/// Run the application:
/// ```bash
/// cargo run --release
/// ```
///
/// Expected output:
/// ```text
/// INFO dino_pad: Dino Pad v0.1.0 starting...
/// INFO dino_pad::synth::uinput: Created virtual keyboard 'dino-pad virtual keyboard'
/// INFO dino_pad: Polling controllers at 60Hz
/// bindings: jump=0 duck=1 dpad_up=12 dpad_down=13
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("Dino Pad v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("failed to load configuration from {config_path}"))?;

    let mut backend = GilrsBackend::new().context("failed to initialize gamepad backend")?;
    let keyboard = UinputKeyboard::new().context("failed to create virtual keyboard")?;
    let mut synth =
        InputSynthesizer::new(keyboard, Duration::from_millis(config.synth.jump_hold_ms));

    let store = BindingStore::load(FileStore::new(&config.storage.dir));
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
    let mut session = ControllerSession::new(store, &config, event_tx);

    println!("{}", help_text());
    println!("{}", render_bindings(session.bindings()));

    // Tick period in microseconds so non-divisor rates (e.g. 144Hz) stay
    // accurate.
    let period = Duration::from_micros(MICROS_PER_SECOND / u64::from(config.poll.tick_rate_hz));
    let mut poll_interval = interval(period);
    // A stalled tick (suspend, debugger) must not cause a catch-up burst of
    // synthetic key events.
    poll_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Polling controllers at {}Hz", config.poll.tick_rate_hz);
    info!("Press Ctrl+C to exit");

    let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    // Main poll loop
    loop {
        tokio::select! {
            // Sample controllers and drive the game at the tick rate
            _ = poll_interval.tick() => {
                let pads = backend.poll();
                session.tick(&pads, &mut synth, &mut backend, None);
            }

            // Remap commands from the terminal
            line = stdin_lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => {
                        if let Some(command) = parse_command(&line) {
                            session.handle_command(command);
                        } else if !line.trim().is_empty() {
                            println!("{}", help_text());
                        }
                    }
                    Ok(None) => {
                        // stdin closed (piped input ended); keep polling
                        stdin_open = false;
                    }
                    Err(e) => {
                        warn!("Failed to read stdin: {}", e);
                        stdin_open = false;
                    }
                }
            }

            // Binding changes and capture prompts pushed by the session
            Some(event) = event_rx.recv() => {
                let rendered = render_event(&event);
                if !rendered.is_empty() {
                    println!("{rendered}");
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    Ok(())
}
