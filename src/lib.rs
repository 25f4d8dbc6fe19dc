//! Mirror a Klipper printer's status onto a WS281x LED strip.
//!
//! The pieces, leaf to root:
//! - [`color`]: the `Color` type and blending/brightness math
//! - [`strip`]: the `LedStrip` driver trait, an in-memory strip, and the
//!   clear-on-exit guard
//! - [`render`]: progress bars, fades, chases and bounces
//! - [`status`]: Moonraker status queries behind the `PrinterStatus` trait
//! - [`monitor`]: the poll-and-draw loop tying it all together
//!
//! Plus the shared plumbing: configuration, errors, interruptible sleeps and
//! Ctrl-C handling. The real LED driver lives in `ws281x` behind the
//! `hardware` feature.

pub mod color;
pub mod config;
pub mod error;
pub mod monitor;
pub mod render;
pub mod sleep;
pub mod status;
pub mod strip;
#[cfg(feature = "hardware")]
pub mod ws281x;

#[cfg(test)]
mod testing;

pub use color::Color;
pub use config::Config;
pub use error::{Error, Result};
pub use monitor::Monitor;
pub use sleep::{InterruptibleSleeper, Sleeper};
pub use strip::{LedStrip, VirtualStrip};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Signal handling ────────────────────────────────────────────────

/// Set up a Ctrl+C / SIGTERM handler that sets `running` to false.
///
/// A second signal while the first is still pending exits the process on the
/// spot (status 130), for when a request with no timeout never returns.
///
/// # Rust concept: Arc and AtomicBool
/// The flag is shared between the monitor loop and the handler thread that
/// `ctrlc` spawns. `Arc` gives both shared ownership; `AtomicBool` lets the
/// handler flip it without a mutex.
pub fn setup_signal_handler() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        if !r.swap(false, Ordering::SeqCst) {
            std::process::exit(130);
        }
    })?;

    Ok(running)
}

/// Check if the main loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_running_follows_the_flag() {
        let running = AtomicBool::new(true);
        assert!(is_running(&running));
        running.store(false, Ordering::SeqCst);
        assert!(!is_running(&running));
    }
}
