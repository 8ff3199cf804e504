use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A destination/source pixel value with 16 bits per channel, the scale all
/// arithmetic transfer modes operate on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{Rgb: r={:04X}, g={:04X}, b={:04X}}}", self.r, self.g, self.b)
    }
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(0xFFFF, 0xFFFF, 0xFFFF);

    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Rgb { r, g, b }
    }

    /// Widens an 8-bit-per-channel color so that 0xFF maps to 0xFFFF.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Rgb {
            r: r as u16 * 0x101,
            g: g as u16 * 0x101,
            b: b as u16 * 0x101,
        }
    }

    pub const fn to_rgb8(self) -> (u8, u8, u8) {
        ((self.r >> 8) as u8, (self.g >> 8) as u8, (self.b >> 8) as u8)
    }

    pub const fn is_black(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }

    pub const fn is_white(self) -> bool {
        self.r == 0xFFFF && self.g == 0xFFFF && self.b == 0xFFFF
    }

    /// Integer luminance on the same 0..=65535 scale as the channels.
    /// The 77/151/28 weights sum to 256, so white maps to exactly 0xFFFF.
    pub const fn luminance(self) -> u16 {
        ((self.r as u32 * 77 + self.g as u32 * 151 + self.b as u32 * 28) >> 8) as u16
    }
}

impl From<(u16, u16, u16)> for Rgb {
    fn from(value: (u16, u16, u16)) -> Self {
        Rgb {
            r: value.0,
            g: value.1,
            b: value.2,
        }
    }
}

impl From<Rgb> for (u16, u16, u16) {
    fn from(value: Rgb) -> (u16, u16, u16) {
        (value.r, value.g, value.b)
    }
}

/// The two-entry indexed color model used for 1-bit pixel data.
///
/// The index order is reversed from the usual 1-bit convention: index 0 is
/// white, index 1 is black. Decoders must go through this mapping instead of
/// a generic binary color model, otherwise monochrome images come out
/// inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonochromePalette {
    colors: [Rgb; 2],
}

pub const MONOCHROME: MonochromePalette = MonochromePalette {
    colors: [Rgb::WHITE, Rgb::BLACK],
};

impl MonochromePalette {
    pub const fn len(&self) -> usize {
        self.colors.len()
    }

    pub const fn is_empty(&self) -> bool {
        false
    }

    pub fn color(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }

    pub fn index_of(&self, color: Rgb) -> Option<usize> {
        self.colors.iter().position(|c| *c == color)
    }

    /// Maps a raw pixel bit to its color (0 = white, 1 = black).
    pub const fn bit_color(&self, bit: bool) -> Rgb {
        self.colors[bit as usize]
    }
}

impl Default for MonochromePalette {
    fn default() -> Self {
        MONOCHROME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monochrome_index_order_is_reversed() {
        assert_eq!(Some(Rgb::WHITE), MONOCHROME.color(0));
        assert_eq!(Some(Rgb::BLACK), MONOCHROME.color(1));
        assert_eq!(None, MONOCHROME.color(2));
    }

    #[test]
    fn test_monochrome_index_of() {
        assert_eq!(Some(0), MONOCHROME.index_of(Rgb::WHITE));
        assert_eq!(Some(1), MONOCHROME.index_of(Rgb::BLACK));
        assert_eq!(None, MONOCHROME.index_of(Rgb::new(0x8000, 0, 0)));
    }

    #[test]
    fn test_bit_color() {
        assert_eq!(Rgb::WHITE, MONOCHROME.bit_color(false));
        assert_eq!(Rgb::BLACK, MONOCHROME.bit_color(true));
    }

    #[test]
    fn test_rgb8_widening() {
        assert_eq!(Rgb::WHITE, Rgb::from_rgb8(255, 255, 255));
        assert_eq!(Rgb::BLACK, Rgb::from_rgb8(0, 0, 0));
        assert_eq!(Rgb::new(0x8080, 0, 0), Rgb::from_rgb8(0x80, 0, 0));
        assert_eq!((0x12, 0x34, 0x56), Rgb::from_rgb8(0x12, 0x34, 0x56).to_rgb8());
    }

    #[test]
    fn test_luminance_endpoints() {
        assert_eq!(0xFFFF, Rgb::WHITE.luminance());
        assert_eq!(0, Rgb::BLACK.luminance());
        // mid gray stays mid gray
        assert_eq!(0x8000, Rgb::new(0x8000, 0x8000, 0x8000).luminance());
    }
}
