use serde::{Deserialize, Serialize};

/// Linear RGB colour, components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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

    /// Build from a packed `0xRRGGBB` value
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_white() {
        let c = Color::from_hex(0xffffff);
        assert_eq!(c, Color::WHITE);
    }

    #[test]
    fn test_from_hex_channels() {
        let c = Color::from_hex(0x93cfef);
        assert!((c.r - 0x93 as f32 / 255.0).abs() < 1e-6);
        assert!((c.g - 0xcf as f32 / 255.0).abs() < 1e-6);
        assert!((c.b - 0xef as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_hex_round_trip_of_specular_grey() {
        assert_eq!(Color::from_hex(0x333333).to_hex(), 0x333333);
    }
}
