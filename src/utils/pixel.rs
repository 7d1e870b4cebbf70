use std::fmt::{Debug, Display};

/// Rec. 601 luma weights, matching what most browsers use for `grayscale()`.
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// One RGBA8 pixel.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Rgba {
        Rgba { r, g, b, a }
    }

    pub fn from_u8_array(array: &[u8; 4]) -> Rgba {
        Rgba {
            r: array[0],
            g: array[1],
            b: array[2],
            a: array[3],
        }
    }

    pub fn to_u8_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Opaque gray pixel. `value` is rounded and clamped into 0..=255.
    pub fn gray(value: f32) -> Rgba {
        let v = value.round().clamp(0.0, 255.0) as u8;
        Rgba {
            r: v,
            g: v,
            b: v,
            a: 255,
        }
    }

    /// Luminance in 0..=255, rounded so that gray pixels map to themselves.
    pub fn luma(&self) -> f32 {
        (LUMA_WEIGHTS[0] * self.r as f32
            + LUMA_WEIGHTS[1] * self.g as f32
            + LUMA_WEIGHTS[2] * self.b as f32)
            .round()
    }

    pub fn is_gray(&self) -> bool {
        self.r == self.g && self.g == self.b
    }

    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_of_gray_is_identity() {
        for v in 0..=255u8 {
            assert_eq!(Rgba::new(v, v, v, 255).luma(), v as f32);
        }
    }

    #[test]
    fn test_gray_clamps_and_rounds() {
        assert_eq!(Rgba::gray(-12.0), Rgba::new(0, 0, 0, 255));
        assert_eq!(Rgba::gray(300.0), Rgba::new(255, 255, 255, 255));
        assert_eq!(Rgba::gray(127.6), Rgba::new(128, 128, 128, 255));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Rgba::new(255, 8, 0, 255).to_hex(), "FF0800");
        assert_eq!(Rgba::new(1, 2, 3, 4).to_string(), "#010203");
    }
}
