//! Linear RGB colors.
//!
//! Scene colors are stored linear, the way the shader consumes them. Hex
//! literals and the debug panel's color picker are sRGB, so conversions
//! happen at those two edges.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB` in sRGB.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::from_srgb([channel(16), channel(8), channel(0)])
    }

    pub fn from_srgb(srgb: [f32; 3]) -> Self {
        Self::new(
            srgb_to_linear(srgb[0]),
            srgb_to_linear(srgb[1]),
            srgb_to_linear(srgb[2]),
        )
    }

    pub fn to_srgb(self) -> [f32; 3] {
        [
            linear_to_srgb(self.r),
            linear_to_srgb(self.g),
            linear_to_srgb(self.b),
        ]
    }

    pub fn to_hex(self) -> u32 {
        let [r, g, b] = self.to_srgb().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u32);
        (r << 16) | (g << 8) | b
    }

    pub fn scaled(self, factor: f32) -> [f32; 4] {
        [self.r * factor, self.g * factor, self.b * factor, 1.0]
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        for hex in [0xa778d8, 0xc0c0c0, 0xffffff, 0x000000] {
            assert_eq!(Color::from_hex(hex).to_hex(), hex);
        }
    }

    #[test]
    fn test_srgb_mid_grey_is_darker_in_linear() {
        assert_eq!(Color::from_hex(0x000000), Color::BLACK);
        let grey = Color::from_hex(0x808080);
        assert!(grey.r > 0.2 && grey.r < 0.25);
    }
}
