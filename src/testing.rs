//! Test doubles shared by the unit tests.

use crate::status::{PrinterState, PrinterStatus};
use crate::{Error, Result, Sleeper};
use std::collections::VecDeque;
use std::time::Duration;

/// Records every requested delay without waiting.
///
/// With `interrupt_after(n)`, the n+1-th sleep fails with
/// [`Error::Interrupted`], standing in for a Ctrl-C.
#[derive(Default)]
pub(crate) struct RecordingSleeper {
    pub(crate) slept: Vec<Duration>,
    limit: Option<usize>,
}

impl RecordingSleeper {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn interrupt_after(sleeps: usize) -> Self {
        Self {
            slept: Vec::new(),
            limit: Some(sleeps),
        }
    }

    pub(crate) fn count(&self, duration: Duration) -> usize {
        self.slept.iter().filter(|&&d| d == duration).count()
    }

    pub(crate) fn total(&self) -> Duration {
        self.slept.iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) -> Result<()> {
        if self.limit.is_some_and(|limit| self.slept.len() >= limit) {
            return Err(Error::Interrupted);
        }
        self.slept.push(duration);
        Ok(())
    }
}

/// Replays scripted readings. Once the state script runs dry the next
/// state poll reports [`Error::Interrupted`], which ends the monitor loop.
#[derive(Default)]
pub(crate) struct ScriptedStatus {
    states: VecDeque<PrinterState>,
    bed: VecDeque<u8>,
    extruder: VecDeque<u8>,
    printing: VecDeque<u8>,
    pub(crate) state_polls: usize,
    pub(crate) bed_polls: usize,
    pub(crate) extruder_polls: usize,
    pub(crate) printing_polls: usize,
}

impl ScriptedStatus {
    pub(crate) fn new(states: impl IntoIterator<Item = PrinterState>) -> Self {
        Self {
            states: states.into_iter().collect(),
            ..Self::default()
        }
    }

    pub(crate) fn with_bed(mut self, readings: impl IntoIterator<Item = u8>) -> Self {
        self.bed = readings.into_iter().collect();
        self
    }

    pub(crate) fn with_extruder(mut self, readings: impl IntoIterator<Item = u8>) -> Self {
        self.extruder = readings.into_iter().collect();
        self
    }

    pub(crate) fn with_printing(mut self, readings: impl IntoIterator<Item = u8>) -> Self {
        self.printing = readings.into_iter().collect();
        self
    }
}

/// Next scripted reading; a drained script reports "done".
fn next_or_done(readings: &mut VecDeque<u8>) -> u8 {
    readings.pop_front().unwrap_or(100)
}

impl PrinterStatus for ScriptedStatus {
    fn fetch_printer_state(&mut self) -> Result<PrinterState> {
        self.state_polls += 1;
        self.states.pop_front().ok_or(Error::Interrupted)
    }

    fn fetch_heating_percent(&mut self, component: &str) -> Result<u8> {
        match component {
            "heater_bed" => {
                self.bed_polls += 1;
                Ok(next_or_done(&mut self.bed))
            }
            "extruder" => {
                self.extruder_polls += 1;
                Ok(next_or_done(&mut self.extruder))
            }
            other => Err(Error::MissingObject(other.to_string())),
        }
    }

    fn fetch_printing_percent(&mut self) -> Result<u8> {
        self.printing_polls += 1;
        Ok(next_or_done(&mut self.printing))
    }
}
