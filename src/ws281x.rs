//! WS281x hardware driver, via the rpi_ws281x C library.
//!
//! Only built with the `hardware` feature, so everything else (including all
//! the tests) compiles on machines without the C toolchain the bindings need.

use crate::config::StripConfig;
use crate::{Color, Error, LedStrip, Result};
use rs_ws281x::{ChannelBuilder, Controller, ControllerBuilder, StripType};

/// A strip on one channel of the Pi's PWM/SPI/PCM peripheral.
pub struct Ws281xStrip {
    controller: Controller,
    channel: usize,
    len: usize,
}

impl Ws281xStrip {
    /// Initialize the peripheral. Needs root (or the SPI group for pin 10).
    pub fn new(config: &StripConfig) -> Result<Self> {
        let count = i32::try_from(config.count)
            .map_err(|_| Error::Driver(format!("{} pixels is too many", config.count)))?;

        let controller = ControllerBuilder::new()
            .freq(config.freq_hz)
            .dma(config.dma)
            .channel(
                config.channel,
                ChannelBuilder::new()
                    .pin(config.pin)
                    .count(count)
                    .strip_type(StripType::Ws2811Rgb)
                    .brightness(config.brightness)
                    .invert(config.invert)
                    .build(),
            )
            .build()
            .map_err(|e| Error::Driver(format!("failed to initialize WS281x: {e}")))?;

        tracing::info!(
            pin = config.pin,
            dma = config.dma,
            channel = config.channel,
            count = config.count,
            "WS281x strip ready"
        );

        Ok(Self {
            controller,
            channel: config.channel,
            len: config.count,
        })
    }
}

impl LedStrip for Ws281xStrip {
    fn len(&self) -> usize {
        self.len
    }

    fn set_pixel(&mut self, index: usize, color: Color) {
        // The C library stores 0x00RRGGBB; on the Pi's little-endian ARM
        // that is [blue, green, red, white] in memory.
        if let Some(led) = self.controller.leds_mut(self.channel).get_mut(index) {
            *led = [color.b, color.g, color.r, 0];
        }
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.controller.set_brightness(self.channel, brightness);
    }

    fn show(&mut self) -> Result<()> {
        self.controller
            .render()
            .map_err(|e| Error::Driver(format!("render failed: {e}")))
    }
}
