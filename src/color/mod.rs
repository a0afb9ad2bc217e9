mod hsv;
mod utils;

use smart_leds::RGB8;

pub use hsv::{HsvF, hsv_to_rgb};
pub use utils::{rgb_from_bytes, rgb_to_bytes};

pub type Rgb = RGB8;

/// Color of a LED that is switched off
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
