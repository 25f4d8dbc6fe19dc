//! Klipper LED status daemon
//!
//! Polls Moonraker for the printer's state and draws it on a WS281x strip:
//! heating and print progress as bars, standby as a slow purple breath,
//! paused as a bouncing pixel, errors as a fast red flash. Ctrl+C (or
//! SIGTERM from systemd) turns the strip off and exits.
//!
//! Built without the `hardware` feature, the same loop drives an in-memory
//! strip instead; run with `RUST_LOG=debug` to see every frame.
//!
//! ## Usage
//! ```sh
//! cargo build --release --features hardware
//! sudo ./target/release/klipper-led-status --count 30 --brightness 80
//! ```

use clap::Parser;
use klipper_led_status::config::{MoonrakerConfig, Palette, StripConfig};
use klipper_led_status::status::MoonrakerClient;
use klipper_led_status::{
    Color, Config, InterruptibleSleeper, Monitor, Result, setup_signal_handler,
};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Mirror Klipper printer status onto a WS281x LED strip
#[derive(Parser, Debug)]
#[command(name = "klipper-led-status")]
#[command(version)]
struct Args {
    /// Moonraker host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Moonraker port
    #[arg(long, default_value_t = 7125)]
    port: u16,

    /// HTTP request timeout in seconds (0 waits forever)
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Milliseconds between state polls and progress updates
    #[arg(long, default_value_t = 2000)]
    poll_interval_ms: u64,

    /// Number of LED pixels
    #[arg(long, default_value_t = StripConfig::default().count)]
    count: usize,

    /// GPIO pin connected to the pixels (18 uses PWM, 10 uses SPI)
    #[arg(long, default_value_t = StripConfig::default().pin)]
    pin: i32,

    /// LED signal frequency in hertz
    #[arg(long, default_value_t = StripConfig::default().freq_hz)]
    freq_hz: u32,

    /// DMA channel used to generate the signal
    #[arg(long, default_value_t = StripConfig::default().dma)]
    dma: i32,

    /// Maximum brightness, 0-255
    #[arg(long, default_value_t = StripConfig::default().brightness)]
    brightness: u8,

    /// Invert the signal (NPN transistor level shift)
    #[arg(long)]
    invert: bool,

    /// PWM channel (1 for GPIOs 13, 19, 41, 45 or 53)
    #[arg(long, default_value_t = StripConfig::default().channel)]
    channel: usize,

    /// Fill progress from the last pixel and reverse chases
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    reverse: bool,

    /// Colors accept #rrggbb or r,g,b
    #[arg(long, default_value_t = Palette::default().heating_base)]
    heating_base_color: Color,

    #[arg(long, default_value_t = Palette::default().heating_progress)]
    heating_progress_color: Color,

    #[arg(long, default_value_t = Palette::default().print_base)]
    print_base_color: Color,

    #[arg(long, default_value_t = Palette::default().print_progress)]
    print_progress_color: Color,

    #[arg(long, default_value_t = Palette::default().standby)]
    standby_color: Color,

    #[arg(long, default_value_t = Palette::default().paused)]
    paused_color: Color,

    #[arg(long, default_value_t = Palette::default().error)]
    error_color: Color,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            strip: StripConfig {
                count: self.count,
                pin: self.pin,
                freq_hz: self.freq_hz,
                dma: self.dma,
                brightness: self.brightness,
                invert: self.invert,
                channel: self.channel,
            },
            palette: Palette {
                heating_base: self.heating_base_color,
                heating_progress: self.heating_progress_color,
                print_base: self.print_base_color,
                print_progress: self.print_progress_color,
                standby: self.standby_color,
                paused: self.paused_color,
                error: self.error_color,
            },
            reverse: self.reverse,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            moonraker: MoonrakerConfig {
                host: self.host,
                port: self.port,
                timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
            },
        }
    }
}

#[cfg(feature = "hardware")]
fn open_strip(config: &Config) -> Result<klipper_led_status::ws281x::Ws281xStrip> {
    klipper_led_status::ws281x::Ws281xStrip::new(&config.strip)
}

#[cfg(not(feature = "hardware"))]
fn open_strip(config: &Config) -> Result<klipper_led_status::VirtualStrip> {
    tracing::warn!("Built without the 'hardware' feature: drawing to a virtual strip");
    tracing::warn!("Build with: cargo build --release --features hardware");
    Ok(klipper_led_status::VirtualStrip::new(config.strip.count))
}

fn run(config: &Config) -> Result<()> {
    tracing::info!("Klipper LED status v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Moonraker: {}", config.moonraker.base_url());
    tracing::info!(
        "Strip: {} pixels on GPIO {}, brightness {}",
        config.strip.count,
        config.strip.pin,
        config.strip.brightness
    );

    let running = setup_signal_handler()?;
    let client = MoonrakerClient::new(&config.moonraker)?;
    let mut strip = open_strip(config)?;

    let mut monitor = Monitor::new(client, InterruptibleSleeper::new(running), config);
    monitor.run(&mut strip)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(false) // Disable ANSI color codes for systemd/journald
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = Args::parse().into_config();

    match run(&config) {
        Ok(()) => {
            tracing::info!("Shut down cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_config_defaults() {
        let args = Args::try_parse_from(["klipper-led-status"]).unwrap();
        assert_eq!(args.into_config(), Config::default());
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "klipper-led-status",
            "--host",
            "voron.local",
            "--count",
            "30",
            "--reverse",
            "false",
            "--timeout-secs",
            "0",
            "--standby-color",
            "#00ffff",
            "--error-color",
            "255,128,0",
        ])
        .unwrap();
        let config = args.into_config();

        assert_eq!(config.moonraker.host, "voron.local");
        assert_eq!(config.moonraker.timeout, None);
        assert_eq!(config.strip.count, 30);
        assert!(!config.reverse);
        assert_eq!(config.palette.standby, Color::new(0, 255, 255));
        assert_eq!(config.palette.error, Color::new(255, 128, 0));
    }

    #[test]
    fn bad_color_is_rejected() {
        let result = Args::try_parse_from(["klipper-led-status", "--paused-color", "green"]);
        assert!(result.is_err());
    }
}
