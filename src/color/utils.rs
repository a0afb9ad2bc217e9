use crate::color::Rgb;

/// Create an RGB color from `[r, g, b]` bytes
pub const fn rgb_from_bytes(bytes: [u8; 3]) -> Rgb {
    Rgb {
        r: bytes[0],
        g: bytes[1],
        b: bytes[2],
    }
}

/// Split an RGB color into `[r, g, b]` bytes
pub const fn rgb_to_bytes(color: Rgb) -> [u8; 3] {
    [color.r, color.g, color.b]
}
