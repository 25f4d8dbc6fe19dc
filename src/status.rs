//! Printer status: what state Klipper is in and how far along it is.
//!
//! Moonraker exposes Klipper's printer objects at
//! `/printer/objects/query?<object>`, answering with
//! `{"result": {"status": {"<object>": {...}}}}`. We only ever ask for one
//! object at a time and pull one or two fields out of it.
//!
//! ## Rust concepts
//! - A trait ([`PrinterStatus`]) as the seam between the loop and the network
//! - `serde` derive for the response envelope, `from_value` for the payload
//! - `#[serde(from = "String")]` to map free-form strings onto an enum

use crate::config::MoonrakerConfig;
use crate::{Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// Heater object for the bed.
pub const HEATER_BED: &str = "heater_bed";
/// Heater object for the (first) hotend.
pub const HEATER_EXTRUDER: &str = "extruder";

// ── Printer state ────────────────────────────────────────────────────

/// `print_stats.state` as reported by Klipper.
///
/// Anything we don't draw specially (`complete`, `cancelled`, states added
/// by future Klipper versions) lands in `Other` with the raw text kept for
/// logging.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PrinterState {
    Standby,
    Printing,
    Paused,
    Error,
    Other(String),
}

impl From<String> for PrinterState {
    fn from(state: String) -> Self {
        match state.as_str() {
            "standby" => PrinterState::Standby,
            "printing" => PrinterState::Printing,
            "paused" => PrinterState::Paused,
            "error" => PrinterState::Error,
            _ => PrinterState::Other(state),
        }
    }
}

impl From<&str> for PrinterState {
    fn from(state: &str) -> Self {
        PrinterState::from(state.to_string())
    }
}

impl fmt::Display for PrinterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrinterState::Standby => f.write_str("standby"),
            PrinterState::Printing => f.write_str("printing"),
            PrinterState::Paused => f.write_str("paused"),
            PrinterState::Error => f.write_str("error"),
            PrinterState::Other(raw) => f.write_str(raw),
        }
    }
}

// ── Status capability ────────────────────────────────────────────────

/// Where the monitor gets its readings from.
///
/// Every call is a fresh, blocking read; nothing is cached between calls.
pub trait PrinterStatus {
    fn fetch_printer_state(&mut self) -> Result<PrinterState>;

    /// How close `component` (a heater object name such as
    /// [`HEATER_BED`]) is to its target, 0-100. A heater with no target
    /// reads 0.
    fn fetch_heating_percent(&mut self, component: &str) -> Result<u8>;

    /// Print progress, 0-100.
    fn fetch_printing_percent(&mut self) -> Result<u8>;
}

// ── Readings ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct PrintStats {
    state: PrinterState,
}

/// Current and target temperature of a heater object.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct HeaterReading {
    pub temperature: f64,
    pub target: f64,
}

impl HeaterReading {
    /// `floor(temperature / target * 100)`, saturated to 0-100. A zero
    /// target (heater off) reads 0 rather than dividing by zero.
    pub fn percent(&self) -> u8 {
        if self.target == 0.0 {
            return 0;
        }
        saturate_percent(self.temperature / self.target * 100.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
struct DisplayStatus {
    /// Fraction complete, 0.0-1.0.
    progress: f64,
}

impl DisplayStatus {
    fn percent(&self) -> u8 {
        saturate_percent(self.progress * 100.0)
    }
}

fn saturate_percent(value: f64) -> u8 {
    // `as` saturates, and maps NaN to 0
    value.floor().clamp(0.0, 100.0) as u8
}

// ── Moonraker client ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct QueryEnvelope {
    result: QueryResult,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    status: serde_json::Map<String, serde_json::Value>,
}

/// Extract and decode one object from a query response body.
fn decode_object<T: DeserializeOwned>(body: QueryEnvelope, object: &str) -> Result<T> {
    let mut status = body.result.status;
    let value = status
        .remove(object)
        .ok_or_else(|| Error::MissingObject(object.to_string()))?;
    Ok(serde_json::from_value(value)?)
}

/// Blocking HTTP client for Moonraker's object query endpoint.
pub struct MoonrakerClient {
    url_base: String,
    http: reqwest::blocking::Client,
}

impl MoonrakerClient {
    pub fn new(config: &MoonrakerConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            url_base: config.base_url(),
            http,
        })
    }

    fn query_url(&self, object: &str) -> String {
        format!("{}/printer/objects/query?{}", self.url_base, object)
    }

    fn query<T: DeserializeOwned>(&self, object: &str) -> Result<T> {
        tracing::trace!(base = %self.url_base, object, "querying printer object");
        let body: QueryEnvelope = self
            .http
            .get(self.query_url(object))
            .send()?
            .error_for_status()?
            .json()?;
        decode_object(body, object)
    }
}

impl PrinterStatus for MoonrakerClient {
    fn fetch_printer_state(&mut self) -> Result<PrinterState> {
        let stats: PrintStats = self.query("print_stats")?;
        Ok(stats.state)
    }

    fn fetch_heating_percent(&mut self, component: &str) -> Result<u8> {
        let heater: HeaterReading = self.query(component)?;
        let percent = heater.percent();
        tracing::debug!(
            component,
            temperature = heater.temperature,
            target = heater.target,
            percent,
            "heater reading"
        );
        Ok(percent)
    }

    fn fetch_printing_percent(&mut self) -> Result<u8> {
        let shown: DisplayStatus = self.query("display_status")?;
        let percent = shown.percent();
        tracing::debug!(progress = shown.progress, percent, "print progress");
        Ok(percent)
    }
}
