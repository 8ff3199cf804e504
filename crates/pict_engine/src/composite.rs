use log::trace;

use crate::{ArithmeticOp, BooleanOp, CompositeError, MONOCHROME, ModeFamily, Pattern, Rgb, TransferMode};

/// The value a transfer mode combines with the destination pixel: a source
/// pixel for source modes, the pen pattern for pattern modes.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Source(Rgb),
    Pattern(&'a Pattern),
}

/// Applies one transfer mode with a fixed foreground/background pair to
/// destination pixels.
///
/// A `Compositor` is an immutable value snapshot of the interpreter's pen
/// state. It holds no buffers and performs no I/O, so it can be shared freely
/// between decode passes; sequencing of writes into a shared destination
/// buffer is the caller's concern.
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    mode: TransferMode,
    foreground: Rgb,
    background: Rgb,
    blend_weight: u16,
    one_bit_destination: bool,
}

impl Compositor {
    /// Weight used for `blend` when the caller does not supply one (50%).
    pub const DEFAULT_BLEND_WEIGHT: u16 = 0x8000;

    pub fn new(mode: TransferMode, foreground: Rgb, background: Rgb) -> Self {
        Compositor {
            mode,
            foreground,
            background,
            blend_weight: Self::DEFAULT_BLEND_WEIGHT,
            one_bit_destination: false,
        }
    }

    /// Marks the destination as a bitmap or 1-bit pixel map, which makes the
    /// arithmetic modes revert to their boolean counterparts.
    pub fn with_one_bit_destination(mut self, one_bit: bool) -> Self {
        self.one_bit_destination = one_bit;
        self
    }

    /// Sets the `blend` weight on the 0..=65535 scale.
    ///
    /// # Errors
    ///
    /// [`CompositeError::InvalidWeight`] if `weight` exceeds 65535.
    pub fn with_blend_weight(mut self, weight: u32) -> crate::Result<Self> {
        if weight > 0xFFFF {
            return Err(CompositeError::InvalidWeight { weight });
        }
        self.blend_weight = weight as u16;
        Ok(self)
    }

    pub const fn mode(&self) -> TransferMode {
        self.mode
    }

    pub const fn foreground(&self) -> Rgb {
        self.foreground
    }

    pub const fn background(&self) -> Rgb {
        self.background
    }

    /// Computes the new destination pixel at `(x, y)`.
    ///
    /// The coordinate only matters for pattern operands and for the dithered
    /// monochrome path of `grayishTextOr`; source modes ignore it.
    ///
    /// # Errors
    ///
    /// [`CompositeError::UndefinedOperation`] when an Xor/NotXor inversion
    /// hits a destination pixel that is neither black nor white. The legacy
    /// model leaves that case undefined and this engine never guesses;
    /// callers may apply a documented fallback such as leaving the
    /// destination unchanged.
    pub fn apply(&self, operand: Operand, dest: Rgb, x: u32, y: u32) -> crate::Result<Rgb> {
        let src = Self::resolve_operand(operand, x, y);
        match self.mode.family() {
            ModeFamily::Source { op, not } | ModeFamily::Pattern { op, not } => self.apply_boolean(op, not, src, dest),
            ModeFamily::Arithmetic(op) => self.apply_arithmetic(op, src, dest),
            ModeFamily::GrayishTextOr => Ok(self.apply_grayish(x, y)),
        }
    }

    fn resolve_operand(operand: Operand, x: u32, y: u32) -> Rgb {
        match operand {
            Operand::Source(color) => color,
            Operand::Pattern(pattern) => MONOCHROME.bit_color(pattern.sample(x, y)),
        }
    }

    /// The boolean mode table. `coverage` is the operand's blackness on the
    /// 0..=65535 scale, so pure black/white operands hit the table rows
    /// exactly and other colors get the weighted blend in between. The
    /// weighting is a luminance-based linear blend; the legacy documentation
    /// only calls for "weighted portions" without giving a formula.
    fn apply_boolean(&self, op: BooleanOp, not: bool, src: Rgb, dest: Rgb) -> crate::Result<Rgb> {
        let mut coverage = 0xFFFF - src.luminance();
        if not {
            coverage = 0xFFFF - coverage;
        }
        match op {
            BooleanOp::Copy => Ok(mix(self.background, self.foreground, coverage)),
            BooleanOp::Or => Ok(mix(dest, self.foreground, coverage)),
            BooleanOp::Bic => Ok(mix(dest, self.background, coverage)),
            BooleanOp::Xor => {
                if coverage != 0xFFFF {
                    return Ok(dest);
                }
                if dest.is_black() {
                    Ok(Rgb::WHITE)
                } else if dest.is_white() {
                    Ok(Rgb::BLACK)
                } else {
                    Err(CompositeError::UndefinedOperation { mode: self.mode })
                }
            }
        }
    }

    fn apply_arithmetic(&self, op: ArithmeticOp, src: Rgb, dest: Rgb) -> crate::Result<Rgb> {
        if self.one_bit_destination {
            if let Some(boolean_op) = op.reversion() {
                trace!("1-bit destination: {} reverts to {:?}", self.mode, boolean_op);
                return self.apply_boolean(boolean_op, false, src, dest);
            }
        }
        let result = match op {
            ArithmeticOp::Blend => channel_op(src, dest, |s, d| mix_channel(d, s, self.blend_weight)),
            ArithmeticOp::AddPin => channel_op(src, dest, |s, d| s.saturating_add(d)),
            ArithmeticOp::AddOver => channel_op(src, dest, u16::wrapping_add),
            ArithmeticOp::SubPin => channel_op(src, dest, |s, d| d.saturating_sub(s)),
            ArithmeticOp::SubOver => channel_op(src, dest, |s, d| d.wrapping_sub(s)),
            ArithmeticOp::AddMax => channel_op(src, dest, std::cmp::max),
            ArithmeticOp::AddMin => channel_op(src, dest, std::cmp::min),
            ArithmeticOp::Transparent => {
                // whole-pixel equality with the background, not per channel
                if src == self.background { dest } else { src }
            }
        };
        Ok(result)
    }

    /// On color destinations `grayishTextOr` draws a 50/50 blend of the
    /// foreground and background colors; on 1-bit destinations it dithers
    /// with the fixed gray pattern.
    fn apply_grayish(&self, x: u32, y: u32) -> Rgb {
        if self.one_bit_destination {
            MONOCHROME.bit_color(Pattern::GRAY.sample(x, y))
        } else {
            mix(self.background, self.foreground, Self::DEFAULT_BLEND_WEIGHT)
        }
    }
}

/// Linear blend from `a` (weight 0) to `b` (weight 65535), exact at both
/// endpoints.
fn mix(a: Rgb, b: Rgb, weight: u16) -> Rgb {
    Rgb::new(
        mix_channel(a.r, b.r, weight),
        mix_channel(a.g, b.g, weight),
        mix_channel(a.b, b.b, weight),
    )
}

fn mix_channel(a: u16, b: u16, weight: u16) -> u16 {
    let w = weight as u32;
    ((a as u32 * (0xFFFF - w) + b as u32 * w + 0x7FFF) / 0xFFFF) as u16
}

fn channel_op(src: Rgb, dest: Rgb, op: impl Fn(u16, u16) -> u16) -> Rgb {
    Rgb::new(op(src.r, dest.r), op(src.g, dest.g), op(src.b, dest.b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FG: Rgb = Rgb::new(0xCCCC, 0x2222, 0x1111);
    const BG: Rgb = Rgb::new(0x1111, 0x8888, 0xEEEE);
    const DEST: Rgb = Rgb::new(0x1234, 0x5678, 0x9ABC);

    fn compositor(mode: TransferMode) -> Compositor {
        Compositor::new(mode, FG, BG)
    }

    // ==================== Boolean Mode Tests ====================

    #[test]
    fn test_src_copy_black_and_white() {
        let c = compositor(TransferMode::source(BooleanOp::Copy, false));
        assert_eq!(FG, c.apply(Operand::Source(Rgb::BLACK), DEST, 0, 0).unwrap());
        assert_eq!(BG, c.apply(Operand::Source(Rgb::WHITE), DEST, 0, 0).unwrap());
    }

    #[test]
    fn test_not_src_copy_swaps_operand_sense() {
        let c = compositor(TransferMode::source(BooleanOp::Copy, true));
        assert_eq!(BG, c.apply(Operand::Source(Rgb::BLACK), DEST, 0, 0).unwrap());
        assert_eq!(FG, c.apply(Operand::Source(Rgb::WHITE), DEST, 0, 0).unwrap());
    }

    #[test]
    fn test_src_copy_gray_operand_blends() {
        let c = Compositor::new(TransferMode::source(BooleanOp::Copy, false), Rgb::BLACK, Rgb::WHITE);
        let gray = Rgb::new(0x8000, 0x8000, 0x8000);
        // blackness 0x7FFF: result lands halfway between bg and fg
        assert_eq!(Rgb::new(0x8000, 0x8000, 0x8000), c.apply(Operand::Source(gray), DEST, 0, 0).unwrap());
    }

    #[test]
    fn test_src_or() {
        let c = compositor(TransferMode::source(BooleanOp::Or, false));
        assert_eq!(FG, c.apply(Operand::Source(Rgb::BLACK), DEST, 0, 0).unwrap());
        // white operand leaves the destination alone
        assert_eq!(DEST, c.apply(Operand::Source(Rgb::WHITE), DEST, 0, 0).unwrap());
    }

    #[test]
    fn test_src_bic() {
        let c = compositor(TransferMode::source(BooleanOp::Bic, false));
        assert_eq!(BG, c.apply(Operand::Source(Rgb::BLACK), DEST, 0, 0).unwrap());
        assert_eq!(DEST, c.apply(Operand::Source(Rgb::WHITE), DEST, 0, 0).unwrap());
    }

    #[test]
    fn test_src_xor_inverts_monochrome_dest() {
        let c = compositor(TransferMode::source(BooleanOp::Xor, false));
        assert_eq!(Rgb::WHITE, c.apply(Operand::Source(Rgb::BLACK), Rgb::BLACK, 0, 0).unwrap());
        assert_eq!(Rgb::BLACK, c.apply(Operand::Source(Rgb::BLACK), Rgb::WHITE, 0, 0).unwrap());
        // white operand leaves any destination alone
        assert_eq!(DEST, c.apply(Operand::Source(Rgb::WHITE), DEST, 0, 0).unwrap());
    }

    #[test]
    fn test_src_xor_undefined_on_colored_dest() {
        let c = compositor(TransferMode::source(BooleanOp::Xor, false));
        let result = c.apply(Operand::Source(Rgb::BLACK), DEST, 0, 0);
        assert_eq!(Err(CompositeError::UndefinedOperation { mode: c.mode() }), result);
    }

    #[test]
    fn test_not_src_xor_inverts_on_white_operand() {
        let c = compositor(TransferMode::source(BooleanOp::Xor, true));
        assert_eq!(Rgb::WHITE, c.apply(Operand::Source(Rgb::WHITE), Rgb::BLACK, 0, 0).unwrap());
        assert_eq!(DEST, c.apply(Operand::Source(Rgb::BLACK), DEST, 0, 0).unwrap());
    }

    // ==================== Pattern Operand Tests ====================

    #[test]
    fn test_pat_copy_samples_pattern() {
        let c = compositor(TransferMode::pattern(BooleanOp::Copy, false));
        // gray pattern: (0,0) set -> fg, (1,0) clear -> bg
        assert_eq!(FG, c.apply(Operand::Pattern(&Pattern::GRAY), DEST, 0, 0).unwrap());
        assert_eq!(BG, c.apply(Operand::Pattern(&Pattern::GRAY), DEST, 1, 0).unwrap());
        // tiles with the destination coordinate
        assert_eq!(FG, c.apply(Operand::Pattern(&Pattern::GRAY), DEST, 8, 8).unwrap());
    }

    #[test]
    fn test_pat_or_white_pattern_is_identity() {
        let c = compositor(TransferMode::pattern(BooleanOp::Or, false));
        for (x, y) in [(0, 0), (3, 5), (13, 2)] {
            assert_eq!(DEST, c.apply(Operand::Pattern(&Pattern::WHITE), DEST, x, y).unwrap());
        }
    }

    // ==================== Arithmetic Mode Tests ====================

    #[test]
    fn test_add_pin_clamps() {
        let c = compositor(TransferMode::arithmetic(ArithmeticOp::AddPin));
        let src = Rgb::new(60000, 1, 0xFFFF);
        let dest = Rgb::new(10000, 2, 1);
        assert_eq!(Rgb::new(0xFFFF, 3, 0xFFFF), c.apply(Operand::Source(src), dest, 0, 0).unwrap());
    }

    #[test]
    fn test_add_over_wraps() {
        let c = compositor(TransferMode::arithmetic(ArithmeticOp::AddOver));
        let src = Rgb::new(60000, 1, 0);
        let dest = Rgb::new(10000, 2, 0);
        assert_eq!(Rgb::new(4464, 3, 0), c.apply(Operand::Source(src), dest, 0, 0).unwrap());
    }

    #[test]
    fn test_sub_pin_clamps_at_zero() {
        let c = compositor(TransferMode::arithmetic(ArithmeticOp::SubPin));
        let src = Rgb::new(10, 0, 0x1000);
        let dest = Rgb::new(4, 7, 0x3000);
        assert_eq!(Rgb::new(0, 7, 0x2000), c.apply(Operand::Source(src), dest, 0, 0).unwrap());
    }

    #[test]
    fn test_sub_over_wraps_below_zero() {
        let c = compositor(TransferMode::arithmetic(ArithmeticOp::SubOver));
        let src = Rgb::new(10, 0, 0);
        let dest = Rgb::new(4, 7, 0);
        // 4 - 10 wraps to 65530
        assert_eq!(Rgb::new(65530, 7, 0), c.apply(Operand::Source(src), dest, 0, 0).unwrap());
    }

    #[test]
    fn test_add_max_add_min() {
        let src = Rgb::new(100, 50000, 7);
        let dest = Rgb::new(200, 40000, 7);

        let c = compositor(TransferMode::arithmetic(ArithmeticOp::AddMax));
        assert_eq!(Rgb::new(200, 50000, 7), c.apply(Operand::Source(src), dest, 0, 0).unwrap());

        let c = compositor(TransferMode::arithmetic(ArithmeticOp::AddMin));
        assert_eq!(Rgb::new(100, 40000, 7), c.apply(Operand::Source(src), dest, 0, 0).unwrap());
    }

    #[test]
    fn test_transparent_matches_whole_pixel() {
        let c = compositor(TransferMode::arithmetic(ArithmeticOp::Transparent));
        // src == background: destination is left alone
        assert_eq!(DEST, c.apply(Operand::Source(BG), DEST, 0, 0).unwrap());
        // one channel differing is enough to copy
        let near_bg = Rgb::new(BG.r, BG.g, BG.b ^ 1);
        assert_eq!(near_bg, c.apply(Operand::Source(near_bg), DEST, 0, 0).unwrap());
    }

    #[test]
    fn test_blend_weight_endpoints() {
        let src = Rgb::new(0x4000, 0xC000, 0);
        let mode = TransferMode::arithmetic(ArithmeticOp::Blend);

        let c = compositor(mode).with_blend_weight(0xFFFF).unwrap();
        assert_eq!(src, c.apply(Operand::Source(src), DEST, 0, 0).unwrap());

        let c = compositor(mode).with_blend_weight(0).unwrap();
        assert_eq!(DEST, c.apply(Operand::Source(src), DEST, 0, 0).unwrap());
    }

    #[test]
    fn test_blend_weight_out_of_range() {
        let mode = TransferMode::arithmetic(ArithmeticOp::Blend);
        let result = compositor(mode).with_blend_weight(0x10000);
        assert!(matches!(result, Err(CompositeError::InvalidWeight { weight: 0x10000 })));
    }

    // ==================== Reversion Tests ====================

    #[test]
    fn test_blend_reverts_to_src_copy_on_one_bit_dest() {
        let blend = compositor(TransferMode::arithmetic(ArithmeticOp::Blend)).with_one_bit_destination(true);
        let copy = compositor(TransferMode::source(BooleanOp::Copy, false));
        for src in [Rgb::BLACK, Rgb::WHITE, Rgb::new(0x4000, 0x9000, 0x2000)] {
            for dest in [Rgb::BLACK, Rgb::WHITE] {
                assert_eq!(
                    copy.apply(Operand::Source(src), dest, 0, 0).unwrap(),
                    blend.apply(Operand::Source(src), dest, 0, 0).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_add_pin_reverts_to_src_bic() {
        let c = compositor(TransferMode::arithmetic(ArithmeticOp::AddPin)).with_one_bit_destination(true);
        assert_eq!(BG, c.apply(Operand::Source(Rgb::BLACK), Rgb::BLACK, 0, 0).unwrap());
        assert_eq!(Rgb::WHITE, c.apply(Operand::Source(Rgb::WHITE), Rgb::WHITE, 0, 0).unwrap());
    }

    #[test]
    fn test_transparent_does_not_revert() {
        let c = compositor(TransferMode::arithmetic(ArithmeticOp::Transparent)).with_one_bit_destination(true);
        assert_eq!(Rgb::BLACK, c.apply(Operand::Source(BG), Rgb::BLACK, 0, 0).unwrap());
        assert_eq!(Rgb::WHITE, c.apply(Operand::Source(Rgb::WHITE), Rgb::BLACK, 0, 0).unwrap());
    }

    // ==================== Grayish Text Tests ====================

    #[test]
    fn test_grayish_blends_on_color_dest() {
        let c = Compositor::new(TransferMode::grayish_text_or(), Rgb::BLACK, Rgb::WHITE);
        let result = c.apply(Operand::Source(Rgb::BLACK), DEST, 0, 0).unwrap();
        assert_eq!(Rgb::new(0x7FFF, 0x7FFF, 0x7FFF), result);
    }

    #[test]
    fn test_grayish_dithers_on_one_bit_dest() {
        let c = Compositor::new(TransferMode::grayish_text_or(), Rgb::BLACK, Rgb::WHITE).with_one_bit_destination(true);
        // follows the gray pattern: (0,0) black, (1,0) white
        assert_eq!(Rgb::BLACK, c.apply(Operand::Source(Rgb::BLACK), Rgb::WHITE, 0, 0).unwrap());
        assert_eq!(Rgb::WHITE, c.apply(Operand::Source(Rgb::BLACK), Rgb::WHITE, 1, 0).unwrap());
    }
}
