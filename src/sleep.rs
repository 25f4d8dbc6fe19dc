//! Pacing: every blocking delay in the program goes through a [`Sleeper`].
//!
//! The production sleeper watches the Ctrl-C flag and turns a pending
//! interrupt into [`Error::Interrupted`], which unwinds whatever loop is
//! sleeping. Tests swap in a sleeper that records delays instead of waiting.

use crate::{Error, Result, is_running};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::{Duration, Instant};

/// Longest uninterrupted stretch the real sleeper blocks for.
const SLICE: Duration = Duration::from_millis(50);

pub trait Sleeper {
    /// Block for `duration`, or fail with [`Error::Interrupted`] if the
    /// process has been asked to stop.
    fn sleep(&mut self, duration: Duration) -> Result<()>;

    /// Whether a stop has been requested, without sleeping.
    fn is_interrupted(&self) -> bool {
        false
    }
}

/// Thread sleep in short slices, checking the shared running flag between
/// slices and once more on wake.
pub struct InterruptibleSleeper {
    running: Arc<AtomicBool>,
}

impl InterruptibleSleeper {
    pub fn new(running: Arc<AtomicBool>) -> Self {
        Self { running }
    }

    fn check(&self) -> Result<()> {
        if is_running(&self.running) {
            Ok(())
        } else {
            Err(Error::Interrupted)
        }
    }
}

impl Sleeper for InterruptibleSleeper {
    fn sleep(&mut self, duration: Duration) -> Result<()> {
        let deadline = Instant::now() + duration;
        loop {
            self.check()?;
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            thread::sleep((deadline - now).min(SLICE));
        }
    }

    fn is_interrupted(&self) -> bool {
        !is_running(&self.running)
    }
}
