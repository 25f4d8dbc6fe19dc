//! Static configuration: strip wiring, colors, and the printer endpoint.
//!
//! Everything here is fixed for the life of the process. The binary builds a
//! [`Config`] from its command-line flags once and hands pieces of it to each
//! component; nothing reads global state.

use crate::Color;
use std::time::Duration;

/// WS281x wiring and signal parameters.
///
/// The field names follow the rpi_ws281x C library the driver wraps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripConfig {
    /// Number of LED pixels.
    pub count: usize,
    /// GPIO pin connected to the pixels (18 uses PWM, 10 uses SPI).
    pub pin: i32,
    /// LED signal frequency in hertz.
    pub freq_hz: u32,
    /// DMA channel used to generate the signal.
    pub dma: i32,
    /// Global brightness ceiling, 0 (dark) to 255 (brightest).
    pub brightness: u8,
    /// Invert the signal (NPN transistor level shifter).
    pub invert: bool,
    /// PWM channel; 1 for GPIOs 13, 19, 41, 45 or 53.
    pub channel: usize,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            count: 10,
            pin: 10,
            freq_hz: 800_000,
            dma: 10,
            brightness: 100,
            invert: false,
            channel: 0,
        }
    }
}

/// The colors each printer state is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub heating_base: Color,
    pub heating_progress: Color,
    pub print_base: Color,
    pub print_progress: Color,
    pub standby: Color,
    pub paused: Color,
    pub error: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            heating_base: Color::new(0, 0, 255),
            heating_progress: Color::new(255, 0, 0),
            print_base: Color::new(0, 0, 0),
            print_progress: Color::new(0, 255, 0),
            standby: Color::new(255, 0, 255),
            paused: Color::new(0, 255, 0),
            error: Color::new(255, 0, 0),
        }
    }
}

/// Where the Moonraker API lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoonrakerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request timeout; `None` waits forever.
    pub timeout: Option<Duration>,
}

impl MoonrakerConfig {
    /// Base URL the object queries are appended to.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for MoonrakerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 7125,
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Complete process configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub strip: StripConfig,
    pub palette: Palette,
    /// Fill progress from the last pixel and run chases backwards.
    pub reverse: bool,
    /// Delay between state polls and between progress updates.
    pub poll_interval: Duration,
    pub moonraker: MoonrakerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strip: StripConfig::default(),
            palette: Palette::default(),
            reverse: true,
            poll_interval: Duration::from_secs(2),
            moonraker: MoonrakerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strip_defaults_match_reference_wiring() {
        let strip = StripConfig::default();
        assert_eq!(strip.count, 10);
        assert_eq!(strip.pin, 10);
        assert_eq!(strip.freq_hz, 800_000);
        assert_eq!(strip.dma, 10);
        assert_eq!(strip.brightness, 100);
        assert!(!strip.invert);
        assert_eq!(strip.channel, 0);
    }

    #[test]
    fn config_defaults() {
        let config = Config::default();
        assert!(config.reverse);
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.palette.standby, Color::new(255, 0, 255));
    }

    #[test]
    fn moonraker_base_url() {
        let moonraker = MoonrakerConfig {
            host: "voron.local".to_string(),
            port: 7125,
            timeout: None,
        };
        assert_eq!(moonraker.base_url(), "http://voron.local:7125");
        assert_eq!(MoonrakerConfig::default().base_url(), "http://localhost:7125");
    }
}
