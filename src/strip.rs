//! The LED strip seam: what the renderer needs from a driver.
//!
//! The real WS281x driver lives behind the `hardware` feature (`ws281x.rs`).
//! [`VirtualStrip`] implements the same trait in memory so the renderer and
//! the monitor can be exercised on any machine.
//!
//! ## Rust concepts
//! - Traits with default methods (`fill`, `clear`)
//! - `Drop` as a scope guard: cleanup that runs on every exit path,
//!   including `?` early returns and panics
//! - `Deref`/`DerefMut` so the guard can be used like the strip it wraps

use crate::{Color, Result};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// A fixed-length addressable LED strip.
///
/// Pixel writes and brightness changes are buffered until [`LedStrip::show`].
pub trait LedStrip {
    /// Number of pixels on the strip.
    fn len(&self) -> usize;

    /// Buffer a color for one pixel. Indices past the end are ignored.
    fn set_pixel(&mut self, index: usize, color: Color);

    /// Buffer the global brightness (0-255) applied by the driver.
    fn set_brightness(&mut self, brightness: u8);

    /// Push the buffered pixels and brightness out to the LEDs.
    fn show(&mut self) -> Result<()>;

    /// Buffer the same color on every pixel.
    fn fill(&mut self, color: Color) {
        for index in 0..self.len() {
            self.set_pixel(index, color);
        }
    }

    /// Turn every pixel off and flush.
    fn clear(&mut self) -> Result<()> {
        self.fill(Color::OFF);
        self.show()
    }
}

// ── Scope guard ──────────────────────────────────────────────────────

/// Borrows a strip and clears it when dropped.
///
/// Clearing happens whether the borrow ends normally, through an error
/// returned with `?`, or by a panic unwinding the stack. A failure to clear
/// is logged; there is nobody left to return it to.
pub struct ClearOnDrop<'a, S: LedStrip + ?Sized> {
    strip: &'a mut S,
}

impl<'a, S: LedStrip + ?Sized> ClearOnDrop<'a, S> {
    pub fn new(strip: &'a mut S) -> Self {
        Self { strip }
    }
}

impl<S: LedStrip + ?Sized> Deref for ClearOnDrop<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.strip
    }
}

impl<S: LedStrip + ?Sized> DerefMut for ClearOnDrop<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.strip
    }
}

impl<S: LedStrip + ?Sized> Drop for ClearOnDrop<'_, S> {
    fn drop(&mut self) {
        match self.strip.clear() {
            Ok(()) => tracing::debug!("strip cleared"),
            Err(e) => tracing::warn!("failed to clear strip on exit: {}", e),
        }
    }
}

// ── In-memory strip ──────────────────────────────────────────────────

/// One flushed state of a [`VirtualStrip`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub pixels: Vec<Color>,
    pub brightness: u8,
}

impl Frame {
    /// Number of pixels that are not off.
    pub fn lit(&self) -> usize {
        self.pixels.iter().filter(|&&c| c != Color::OFF).count()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, pixel) in self.pixels.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{pixel}")?;
        }
        write!(f, "] @{}", self.brightness)
    }
}

/// A strip that only exists in memory.
///
/// Every `show` is logged at `debug`. Built with [`VirtualStrip::recording`]
/// it also keeps each flushed [`Frame`], which is what the tests inspect.
#[derive(Clone, Debug)]
pub struct VirtualStrip {
    pixels: Vec<Color>,
    brightness: u8,
    shows: usize,
    history: Option<Vec<Frame>>,
}

impl VirtualStrip {
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![Color::OFF; len],
            brightness: 255,
            shows: 0,
            history: None,
        }
    }

    /// Like [`VirtualStrip::new`], but remembers every flushed frame.
    pub fn recording(len: usize) -> Self {
        Self {
            history: Some(Vec::new()),
            ..Self::new(len)
        }
    }

    /// The buffered pixels (what the next `show` would send).
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// How many times `show` has been called.
    pub fn show_count(&self) -> usize {
        self.shows
    }

    /// Recorded frames, oldest first. Empty unless built with `recording`.
    pub fn frames(&self) -> &[Frame] {
        self.history.as_deref().unwrap_or(&[])
    }

    /// The most recently flushed frame, if recording.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames().last()
    }

    fn snapshot(&self) -> Frame {
        Frame {
            pixels: self.pixels.clone(),
            brightness: self.brightness,
        }
    }
}

impl LedStrip for VirtualStrip {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn set_pixel(&mut self, index: usize, color: Color) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    fn show(&mut self) -> Result<()> {
        self.shows += 1;
        let frame = self.snapshot();
        tracing::debug!("show #{}: {}", self.shows, frame);
        if let Some(history) = self.history.as_mut() {
            history.push(frame);
        }
        Ok(())
    }
}
