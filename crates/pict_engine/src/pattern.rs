use serde::{Deserialize, Serialize};

/// An 8x8 monochrome fill pattern, tiled infinitely over the destination.
///
/// Each row is one byte, leftmost pixel in the high bit. Patterns are
/// immutable once constructed; the canonical pen patterns are available as
/// constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    rows: [u8; 8],
}

impl Pattern {
    /// Solid white pattern (all bits clear).
    pub const WHITE: Pattern = Pattern::solid(false);

    /// Solid black pattern (all bits set).
    pub const BLACK: Pattern = Pattern::solid(true);

    /// 50% checkerboard.
    pub const GRAY: Pattern = Pattern::from_seed(0xAA55_AA55);

    pub const LIGHT_GRAY: Pattern = Pattern::from_seed(0x8822_8822);

    pub const DARK_GRAY: Pattern = Pattern::from_seed(0x77DD_77DD);

    pub const fn solid(black: bool) -> Self {
        Pattern {
            rows: [if black { 0xFF } else { 0x00 }; 8],
        }
    }

    /// Builds a pattern from a 32-bit seed: four rows of 8 bits (high byte
    /// first), repeated vertically to fill all 8 rows.
    pub const fn from_seed(seed: u32) -> Self {
        let r0 = (seed >> 24) as u8;
        let r1 = (seed >> 16) as u8;
        let r2 = (seed >> 8) as u8;
        let r3 = seed as u8;
        Pattern {
            rows: [r0, r1, r2, r3, r0, r1, r2, r3],
        }
    }

    pub const fn from_rows(rows: [u8; 8]) -> Self {
        Pattern { rows }
    }

    /// Samples the pattern at a destination coordinate. Total: any
    /// non-negative coordinate wraps via `(x mod 8, y mod 8)`.
    pub const fn sample(&self, x: u32, y: u32) -> bool {
        let row = self.rows[(y % 8) as usize];
        (row >> (7 - (x % 8))) & 1 != 0
    }

    /// The raw row byte at `y mod 8`, for renderers that blit whole rows.
    pub const fn row(&self, y: u32) -> u8 {
        self.rows[(y % 8) as usize]
    }
}
