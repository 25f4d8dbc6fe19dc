//! Color type and the small amount of color math the renderer needs.
//!
//! ## Rust concepts
//! - `Copy` value types: a `Color` is three bytes, so we pass it by value
//! - `FromStr` so `clap` can parse colors straight from the command line
//! - Integer widening with `u16::from` instead of `as` to avoid overflow

use std::fmt;
use std::str::FromStr;

/// An RGB triple, decoupled from whatever LED driver is in use.
///
/// At the hardware boundary the driver converts this into its own pixel
/// layout (see `ws281x.rs`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const OFF: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parses `#rrggbb`, `rrggbb` or `r,g,b`.
impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.contains(',') {
            let parts: Vec<&str> = s.split(',').map(str::trim).collect();
            let [r, g, b] = parts.as_slice() else {
                return Err(format!("expected three comma-separated channels, got `{s}`"));
            };
            let channel = |v: &str| {
                v.parse::<u8>()
                    .map_err(|_| format!("channel `{v}` is not a number between 0 and 255"))
            };
            return Ok(Color::new(channel(*r)?, channel(*g)?, channel(*b)?));
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("expected #rrggbb or r,g,b, got `{s}`"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| format!("`{s}` is not valid hex"))
        };
        Ok(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Mean of two integers, rounded half to even.
pub fn average(a: u32, b: u32) -> u32 {
    let sum = u64::from(a) + u64::from(b);
    let half = sum / 2;
    let rounded = if sum % 2 == 1 && half % 2 == 1 {
        half + 1
    } else {
        half
    };
    rounded as u32
}

/// Blend two colors.
///
/// With a weight, each channel is `c1 * weight + c2 * (1 - weight)`, so a
/// weight of 1 gives back `c1` and 0 gives back `c2`. Without one, each
/// channel is the plain [`average`].
pub fn mix_color(c1: Color, c2: Color, weight: Option<f32>) -> Color {
    match weight {
        Some(weight) => {
            let w = weight.clamp(0.0, 1.0);
            let blend = |a: u8, b: u8| (f32::from(a) * w + f32::from(b) * (1.0 - w)).round() as u8;
            Color::new(blend(c1.r, c2.r), blend(c1.g, c2.g), blend(c1.b, c2.b))
        }
        None => {
            let mean = |a: u8, b: u8| average(u32::from(a), u32::from(b)) as u8;
            Color::new(mean(c1.r, c2.r), mean(c1.g, c2.g), mean(c1.b, c2.b))
        }
    }
}

/// Scale every channel by `brightness / 255`, truncating.
pub fn brightness_correct(color: Color, brightness: u8) -> Color {
    let scale = |c: u8| (u16::from(c) * u16::from(brightness) / 255) as u8;
    Color::new(scale(color.r), scale(color.g), scale(color.b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, 0)]
    #[case(10, 20, 15)]
    #[case(1, 2, 2)] // 1.5 rounds up to the even 2
    #[case(2, 3, 2)] // 2.5 rounds down to the even 2
    #[case(255, 0, 128)] // 127.5 -> 128
    #[case(u32::MAX, u32::MAX, u32::MAX)]
    fn average_rounds_half_to_even(#[case] a: u32, #[case] b: u32, #[case] expected: u32) {
        assert_eq!(average(a, b), expected);
    }

    #[test]
    fn average_is_commutative() {
        for a in (0..=600).step_by(7) {
            for b in (0..=600).step_by(11) {
                assert_eq!(average(a, b), average(b, a), "a={a} b={b}");
            }
        }
    }

    #[test]
    fn mix_with_full_weight_returns_first_color() {
        let c1 = Color::new(255, 10, 200);
        let c2 = Color::new(0, 250, 3);
        assert_eq!(mix_color(c1, c2, Some(1.0)), c1);
    }

    #[test]
    fn mix_with_zero_weight_returns_second_color() {
        let c1 = Color::new(255, 10, 200);
        let c2 = Color::new(0, 250, 3);
        assert_eq!(mix_color(c1, c2, Some(0.0)), c2);
    }

    #[test]
    fn mix_at_half_weight_is_midpoint() {
        let red = Color::new(255, 0, 0);
        let blue = Color::new(0, 0, 255);
        assert_eq!(mix_color(red, blue, Some(0.5)), Color::new(128, 0, 128));
    }

    #[test]
    fn mix_clamps_out_of_range_weights() {
        let c1 = Color::new(200, 100, 50);
        let c2 = Color::new(0, 0, 0);
        assert_eq!(mix_color(c1, c2, Some(3.0)), c1);
        assert_eq!(mix_color(c1, c2, Some(-1.0)), c2);
    }

    #[test]
    fn mix_without_weight_averages_channels() {
        let c1 = Color::new(255, 100, 3);
        let c2 = Color::new(0, 50, 0);
        assert_eq!(mix_color(c1, c2, None), Color::new(128, 75, 2));
    }

    #[test]
    fn brightness_255_is_identity() {
        let c = Color::new(100, 200, 50);
        assert_eq!(brightness_correct(c, 255), c);
    }

    #[test]
    fn brightness_0_is_black() {
        assert_eq!(brightness_correct(Color::new(255, 255, 255), 0), Color::OFF);
    }

    #[rstest]
    #[case(Color::new(255, 0, 0), 100, Color::new(100, 0, 0))]
    #[case(Color::new(0, 255, 128), 100, Color::new(0, 100, 50))]
    #[case(Color::new(10, 20, 30), 128, Color::new(5, 10, 15))]
    fn brightness_truncates(#[case] input: Color, #[case] brightness: u8, #[case] expected: Color) {
        assert_eq!(brightness_correct(input, brightness), expected);
    }

    #[rstest]
    #[case("#ff00ff", Color::new(255, 0, 255))]
    #[case("00ff7f", Color::new(0, 255, 127))]
    #[case("0, 0, 255", Color::new(0, 0, 255))]
    #[case("12,34,56", Color::new(12, 34, 56))]
    fn parse_color(#[case] input: &str, #[case] expected: Color) {
        assert_eq!(input.parse::<Color>(), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("#ff00f")]
    #[case("#gg0000")]
    #[case("1,2")]
    #[case("1,2,300")]
    #[case("1,2,3,4")]
    fn parse_color_rejects_garbage(#[case] input: &str) {
        assert!(input.parse::<Color>().is_err());
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(Color::new(255, 0, 127).to_string(), "#ff007f");
    }
}
