//! Strip renderer: progress bars and the ambient animations.
//!
//! All drawing goes through the [`LedStrip`] trait and all waiting goes
//! through a [`Sleeper`], so an interrupt surfaces as `Err(Interrupted)` from
//! whichever animation happens to be running.
//!
//! ## Rust concepts
//! - Generic methods over `S: LedStrip + ?Sized` (works for trait objects too)
//! - Integer math for the progress split so 55% of 10 pixels is exactly 5.5
//! - `?` inside animation loops to bail out on the first failed frame

use crate::color::{brightness_correct, mix_color};
use crate::{Color, LedStrip, Result, Sleeper};
use std::time::Duration;

/// Delay between chase positions.
pub const CHASE_STEP: Duration = Duration::from_millis(10);

/// How quickly a [`Renderer::fade`] ramps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeSpeed {
    Slow,
    Fast,
}

impl FadeSpeed {
    /// Delay per brightness step.
    pub fn step(self) -> Duration {
        match self {
            FadeSpeed::Slow => Duration::from_millis(50),
            FadeSpeed::Fast => Duration::from_millis(5),
        }
    }

    /// Pause at peak brightness.
    pub fn hold(self) -> Duration {
        self.step() * 5
    }
}

/// Draws on a strip, pacing animations with its own [`Sleeper`].
pub struct Renderer<Z> {
    sleeper: Z,
    brightness: u8,
}

impl<Z: Sleeper> Renderer<Z> {
    /// `brightness` is the strip's ceiling: progress bars are drawn at it and
    /// fades peak at it.
    pub fn new(sleeper: Z, brightness: u8) -> Self {
        Self {
            sleeper,
            brightness,
        }
    }

    #[cfg(test)]
    pub(crate) fn sleeper(&self) -> &Z {
        &self.sleeper
    }

    /// Whether the sleeper has seen a stop request.
    pub fn interrupted(&self) -> bool {
        self.sleeper.is_interrupted()
    }

    /// Wait between polls with the same sleeper the animations use.
    pub fn sleep(&mut self, duration: Duration) -> Result<()> {
        self.sleeper.sleep(duration)
    }

    /// Draw `percent` as a bar of `progress` over `base`.
    ///
    /// The bar grows from pixel 0, or from the last pixel when `reverse` is
    /// set. A partially filled pixel at the edge of the bar is blended
    /// between the two colors by how full it is. Percentages above 100 draw
    /// a full bar.
    pub fn render_progress<S: LedStrip + ?Sized>(
        &self,
        strip: &mut S,
        percent: u8,
        base: Color,
        progress: Color,
        reverse: bool,
    ) -> Result<()> {
        let len = strip.len();
        let scaled = usize::from(percent.min(100)) * len;
        let whole = scaled / 100;
        let remainder = (scaled % 100) as f32 / 100.0;

        let progress_pixel = brightness_correct(progress, self.brightness);
        let base_pixel = brightness_correct(base, self.brightness);

        strip.set_brightness(self.brightness);
        for position in 0..len {
            let color = if position < whole {
                progress_pixel
            } else if position == whole && remainder > 0.0 {
                brightness_correct(mix_color(progress, base, Some(remainder)), self.brightness)
            } else {
                base_pixel
            };
            let index = if reverse { len - 1 - position } else { position };
            strip.set_pixel(index, color);
        }

        tracing::trace!(percent, whole, remainder, "progress frame");
        strip.show()
    }

    /// Fill the strip with `color` and breathe it: brightness ramps from 0
    /// up to the ceiling, holds, then ramps back down to 0.
    pub fn fade<S: LedStrip + ?Sized>(
        &mut self,
        strip: &mut S,
        color: Color,
        speed: FadeSpeed,
    ) -> Result<()> {
        let step = speed.step();

        strip.set_brightness(0);
        strip.fill(color);
        strip.show()?;

        for level in 0..self.brightness {
            strip.set_brightness(level);
            strip.show()?;
            self.sleeper.sleep(step)?;
        }

        self.sleeper.sleep(speed.hold())?;

        for level in (0..=self.brightness).rev() {
            strip.set_brightness(level);
            strip.show()?;
            self.sleeper.sleep(step)?;
        }

        Ok(())
    }

    /// Sweep a single lit pixel from one end of the strip to the other.
    ///
    /// The sweep visits `len + 1` positions; the extra one past the last
    /// pixel lights nothing, so every chase ends (or, reversed, starts) on a
    /// dark frame.
    pub fn chase<S: LedStrip + ?Sized>(
        &mut self,
        strip: &mut S,
        color: Color,
        reverse: bool,
    ) -> Result<()> {
        let len = strip.len();
        let mut positions: Vec<usize> = (0..=len).collect();
        if reverse {
            positions.reverse();
        }

        strip.set_brightness(self.brightness);
        for lit in positions {
            for pixel in 0..len {
                strip.set_pixel(pixel, if pixel == lit { color } else { Color::OFF });
            }
            tracing::trace!(lit, "chase frame");
            strip.show()?;
            self.sleeper.sleep(CHASE_STEP)?;
        }

        Ok(())
    }

    /// Chase forward, then back.
    pub fn bounce<S: LedStrip + ?Sized>(&mut self, strip: &mut S, color: Color) -> Result<()> {
        self.chase(strip, color, false)?;
        self.chase(strip, color, true)
    }
}
