//! Floating point HSV color model
//!
//! The sweep effect picks a hue in degrees and renders it with a fixed, dim
//! saturation/value pair, so unlike `smart_leds::hsv` (0-255 hue circle)
//! this works on `f32` degrees.

use libm::{fabsf, fmodf};

use crate::color::Rgb;

/// HSV color with hue in degrees and saturation/value in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsvF {
    /// Hue in degrees, wrapped into `[0, 360)` on conversion
    pub hue: f32,
    /// Saturation (0.0-1.0)
    pub sat: f32,
    /// Value (0.0-1.0)
    pub val: f32,
}

impl HsvF {
    pub const fn new(hue: f32, sat: f32, val: f32) -> Self {
        Self { hue, sat, val }
    }

    /// Convert to an 8-bit RGB color
    pub fn to_rgb(self) -> Rgb {
        hsv_to_rgb(self)
    }
}

/// Convert HSV to RGB
///
/// Standard piecewise conversion over six 60 degree sectors
/// `[0,60) [60,120) [120,180) [180,240) [240,300) [300,360)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
pub fn hsv_to_rgb(color: HsvF) -> Rgb {
    let sat = color.sat.clamp(0.0, 1.0);
    let val = color.val.clamp(0.0, 1.0);
    let mut hue = fmodf(color.hue, 360.0);
    if hue < 0.0 {
        hue += 360.0;
    }

    let c = val * sat;
    let x = c * (1.0 - fabsf(fmodf(hue / 60.0, 2.0) - 1.0));
    let m = val - c;

    let (r, g, b) = if hue < 60.0 {
        (c, x, 0.0)
    } else if hue < 120.0 {
        (x, c, 0.0)
    } else if hue < 180.0 {
        (0.0, c, x)
    } else if hue < 240.0 {
        (0.0, x, c)
    } else if hue < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    Rgb {
        r: ((r + m) * 255.0) as u8,
        g: ((g + m) * 255.0) as u8,
        b: ((b + m) * 255.0) as u8,
    }
}
