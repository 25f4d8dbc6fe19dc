//! The main loop: poll the printer, draw what it is doing, repeat.
//!
//! One state poll per iteration decides what happens next:
//!
//! | state            | action                                         |
//! |------------------|------------------------------------------------|
//! | printing (new)   | bed heating → extruder heating → print progress |
//! | printing (same)  | wait one poll interval                          |
//! | standby          | one slow fade                                   |
//! | paused           | one bounce                                      |
//! | error            | one fast fade                                   |
//! | anything else    | wait one poll interval                          |
//!
//! Leaving standby, paused or error waits one poll interval before acting on
//! the new state; repeating one of them re-polls straight after the
//! animation.
//!
//! The print phases run once per printing run: they block, re-reading their
//! own percentage every poll interval, until each reaches its threshold.
//!
//! ## Rust concepts
//! - Generics over the status source, the sleeper and the strip so the whole
//!   loop runs against fakes in tests
//! - A `Drop` guard ([`ClearOnDrop`]) instead of a `finally` block
//! - `Error::Interrupted` unwinding nested loops through `?`

use crate::config::{Config, Palette};
use crate::render::{FadeSpeed, Renderer};
use crate::status::{HEATER_BED, HEATER_EXTRUDER, PrinterState, PrinterStatus};
use crate::strip::ClearOnDrop;
use crate::{Color, Error, LedStrip, Result, Sleeper};
use std::fmt;
use std::time::Duration;

/// One leg of a print job, in the order they run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    BedHeating,
    ExtruderHeating,
    Printing,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::BedHeating, Phase::ExtruderHeating, Phase::Printing];

    /// The phase is over once its reading reaches this percentage.
    pub fn threshold(self) -> u8 {
        match self {
            Phase::BedHeating | Phase::ExtruderHeating => 99,
            Phase::Printing => 100,
        }
    }

    /// `(base, progress)` colors for the bar.
    pub fn colors(self, palette: &Palette) -> (Color, Color) {
        match self {
            Phase::BedHeating | Phase::ExtruderHeating => {
                (palette.heating_base, palette.heating_progress)
            }
            Phase::Printing => (palette.print_base, palette.print_progress),
        }
    }

    fn read<P: PrinterStatus + ?Sized>(self, status: &mut P) -> Result<u8> {
        match self {
            Phase::BedHeating => status.fetch_heating_percent(HEATER_BED),
            Phase::ExtruderHeating => status.fetch_heating_percent(HEATER_EXTRUDER),
            Phase::Printing => status.fetch_printing_percent(),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::BedHeating => "bed heating",
            Phase::ExtruderHeating => "extruder heating",
            Phase::Printing => "printing",
        })
    }
}

/// States drawn by repeating an animation for as long as they last.
fn animates(state: &PrinterState) -> bool {
    matches!(
        state,
        PrinterState::Standby | PrinterState::Paused | PrinterState::Error
    )
}

/// Polls a [`PrinterStatus`] and mirrors it onto a strip.
pub struct Monitor<P, Z> {
    status: P,
    renderer: Renderer<Z>,
    palette: Palette,
    reverse: bool,
    poll_interval: Duration,
    previous: Option<PrinterState>,
}

impl<P: PrinterStatus, Z: Sleeper> Monitor<P, Z> {
    pub fn new(status: P, sleeper: Z, config: &Config) -> Self {
        Self {
            status,
            renderer: Renderer::new(sleeper, config.strip.brightness),
            palette: config.palette,
            reverse: config.reverse,
            poll_interval: config.poll_interval,
            previous: None,
        }
    }

    pub fn status(&self) -> &P {
        &self.status
    }

    pub fn renderer(&self) -> &Renderer<Z> {
        &self.renderer
    }

    /// Run until interrupted.
    ///
    /// The strip is cleared on the way out no matter how the loop ends. An
    /// interrupt is a normal exit and returns `Ok(())`, including one that
    /// lands while a status request is blocked and makes it fail. Any other
    /// error is returned as-is.
    pub fn run<S: LedStrip + ?Sized>(&mut self, strip: &mut S) -> Result<()> {
        let mut strip = ClearOnDrop::new(strip);
        tracing::info!("Monitoring printer, {} pixels", strip.len());

        loop {
            match self.step(&mut *strip) {
                Ok(()) => {}
                Err(Error::Interrupted) => {
                    tracing::info!("Interrupted, clearing strip");
                    return Ok(());
                }
                Err(e) if self.renderer.interrupted() => {
                    tracing::info!(error = %e, "Interrupted during a request, clearing strip");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Poll the printer state once and act on it.
    pub fn step<S: LedStrip + ?Sized>(&mut self, strip: &mut S) -> Result<()> {
        let state = self.status.fetch_printer_state()?;
        let changed = self.previous.as_ref() != Some(&state);
        if changed {
            tracing::info!(state = %state, "printer state changed");
            if self.previous.as_ref().is_some_and(animates) {
                self.renderer.sleep(self.poll_interval)?;
            }
        }
        self.previous = Some(state.clone());

        match state {
            PrinterState::Printing => {
                if changed {
                    self.run_print_phases(strip)?;
                }
                self.renderer.sleep(self.poll_interval)
            }
            PrinterState::Standby => self.renderer.fade(strip, self.palette.standby, FadeSpeed::Slow),
            PrinterState::Paused => self.renderer.bounce(strip, self.palette.paused),
            PrinterState::Error => self.renderer.fade(strip, self.palette.error, FadeSpeed::Fast),
            PrinterState::Other(_) => self.renderer.sleep(self.poll_interval),
        }
    }

    fn run_print_phases<S: LedStrip + ?Sized>(&mut self, strip: &mut S) -> Result<()> {
        for phase in Phase::ALL {
            self.run_phase(strip, phase)?;
        }
        tracing::info!("Print phases complete");
        Ok(())
    }

    /// Draw `phase` as a progress bar until its reading hits the threshold.
    fn run_phase<S: LedStrip + ?Sized>(&mut self, strip: &mut S, phase: Phase) -> Result<()> {
        let (base, progress) = phase.colors(&self.palette);
        let threshold = phase.threshold();

        let mut percent = phase.read(&mut self.status)?;
        if percent < threshold {
            tracing::info!("{} started at {}%", phase, percent);
        }
        while percent < threshold {
            tracing::debug!(%phase, percent, "progress");
            self.renderer
                .render_progress(strip, percent, base, progress, self.reverse)?;
            self.renderer.sleep(self.poll_interval)?;
            percent = phase.read(&mut self.status)?;
        }
        Ok(())
    }
}
