use serde::{Deserialize, Serialize};

/// Raw transfer mode codes as encoded in pictures.
pub mod mode_code {
    pub const SRC_COPY: u16 = 0;
    pub const SRC_OR: u16 = 1;
    pub const SRC_XOR: u16 = 2;
    pub const SRC_BIC: u16 = 3;
    pub const NOT_SRC_COPY: u16 = 4;
    pub const NOT_SRC_OR: u16 = 5;
    pub const NOT_SRC_XOR: u16 = 6;
    pub const NOT_SRC_BIC: u16 = 7;

    pub const PAT_COPY: u16 = 8;
    pub const PAT_OR: u16 = 9;
    pub const PAT_XOR: u16 = 10;
    pub const PAT_BIC: u16 = 11;
    pub const NOT_PAT_COPY: u16 = 12;
    pub const NOT_PAT_OR: u16 = 13;
    pub const NOT_PAT_XOR: u16 = 14;
    pub const NOT_PAT_BIC: u16 = 15;

    pub const BLEND: u16 = 32;
    pub const ADD_PIN: u16 = 33;
    pub const ADD_OVER: u16 = 34;
    pub const SUB_PIN: u16 = 35;
    pub const TRANSPARENT: u16 = 36;
    pub const ADD_MAX: u16 = 37;
    pub const SUB_OVER: u16 = 38;
    pub const ADD_MIN: u16 = 39;

    /// Text-only mode, never stored in pictures.
    pub const GRAYISH_TEXT_OR: u16 = 49;

    /// Added to a source or pattern mode to request highlighted rendering.
    pub const HILITE: u16 = 50;

    /// Added to a source mode to request dithered rendering.
    pub const DITHER: u16 = 64;
}

/// The four boolean pixel rules shared by source and pattern modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanOp {
    Copy = 0,
    Or = 1,
    Xor = 2,
    Bic = 3,
}

/// The per-channel arithmetic modes. Discriminants are the raw mode codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Blend = 32,
    AddPin = 33,
    AddOver = 34,
    SubPin = 35,
    Transparent = 36,
    AddMax = 37,
    SubOver = 38,
    AddMin = 39,
}

impl ArithmeticOp {
    /// The boolean source mode this arithmetic mode reverts to on a 1-bit
    /// destination. `Transparent` never reverts and keeps its per-pixel
    /// equality rule on any depth.
    pub const fn reversion(self) -> Option<BooleanOp> {
        match self {
            ArithmeticOp::Blend => Some(BooleanOp::Copy),
            ArithmeticOp::AddPin | ArithmeticOp::AddMax => Some(BooleanOp::Bic),
            ArithmeticOp::AddOver | ArithmeticOp::SubOver => Some(BooleanOp::Xor),
            ArithmeticOp::SubPin | ArithmeticOp::AddMin => Some(BooleanOp::Or),
            ArithmeticOp::Transparent => None,
        }
    }
}

/// Which kind of operand a mode combines with the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeFamily {
    /// Boolean rule over a source pixel; `not` inverts the operand sense.
    Source { op: BooleanOp, not: bool },
    /// Boolean rule over a pen pattern bit; `not` inverts the operand sense.
    Pattern { op: BooleanOp, not: bool },
    Arithmetic(ArithmeticOp),
    /// Text-only "grayish" rendering.
    GrayishTextOr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModeModifier {
    #[default]
    None,
    Dither,
    Hilite,
}

/// A decoded transfer mode: base family plus at most one modifier.
///
/// Raw codes are decomposed here at the boundary, the compositing engine
/// never does arithmetic on codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferMode {
    family: ModeFamily,
    modifier: ModeModifier,
}

impl TransferMode {
    pub const fn source(op: BooleanOp, not: bool) -> Self {
        TransferMode {
            family: ModeFamily::Source { op, not },
            modifier: ModeModifier::None,
        }
    }

    pub const fn pattern(op: BooleanOp, not: bool) -> Self {
        TransferMode {
            family: ModeFamily::Pattern { op, not },
            modifier: ModeModifier::None,
        }
    }

    pub const fn arithmetic(op: ArithmeticOp) -> Self {
        TransferMode {
            family: ModeFamily::Arithmetic(op),
            modifier: ModeModifier::None,
        }
    }

    pub const fn grayish_text_or() -> Self {
        TransferMode {
            family: ModeFamily::GrayishTextOr,
            modifier: ModeModifier::None,
        }
    }

    pub const fn with_modifier(self, modifier: ModeModifier) -> Self {
        TransferMode { modifier, ..self }
    }

    /// Resolves a raw picture mode code.
    ///
    /// Dither codes are `base + 64` for source modes, hilite codes are
    /// `base + 50` for source and pattern modes. The two ranges overlap at
    /// 64/65; those codes resolve as dither (the documented `ditherCopy`
    /// constant lives there), so `hilite + notPatXor` and `hilite + notPatBic`
    /// are not reachable through raw codes.
    ///
    /// # Errors
    ///
    /// Returns [`CompositeError::UnsupportedMode`](crate::CompositeError::UnsupportedMode)
    /// for any code outside the known ranges; unknown codes are never coerced
    /// to a default mode.
    pub fn from_code(code: u16) -> crate::Result<Self> {
        const DITHER_LAST: u16 = mode_code::DITHER + mode_code::NOT_SRC_BIC;
        const HILITE_LAST: u16 = mode_code::DITHER - 1;

        let (modifier, base) = match code {
            mode_code::DITHER..=DITHER_LAST => (ModeModifier::Dither, code - mode_code::DITHER),
            mode_code::HILITE..=HILITE_LAST => (ModeModifier::Hilite, code - mode_code::HILITE),
            _ => (ModeModifier::None, code),
        };

        let family = match base {
            mode_code::SRC_COPY..=mode_code::NOT_SRC_BIC => ModeFamily::Source {
                op: Self::boolean_op(base & 0b11),
                not: base & 0b100 != 0,
            },
            mode_code::PAT_COPY..=mode_code::NOT_PAT_BIC => ModeFamily::Pattern {
                op: Self::boolean_op(base & 0b11),
                not: base & 0b100 != 0,
            },
            mode_code::BLEND => ModeFamily::Arithmetic(ArithmeticOp::Blend),
            mode_code::ADD_PIN => ModeFamily::Arithmetic(ArithmeticOp::AddPin),
            mode_code::ADD_OVER => ModeFamily::Arithmetic(ArithmeticOp::AddOver),
            mode_code::SUB_PIN => ModeFamily::Arithmetic(ArithmeticOp::SubPin),
            mode_code::TRANSPARENT => ModeFamily::Arithmetic(ArithmeticOp::Transparent),
            mode_code::ADD_MAX => ModeFamily::Arithmetic(ArithmeticOp::AddMax),
            mode_code::SUB_OVER => ModeFamily::Arithmetic(ArithmeticOp::SubOver),
            mode_code::ADD_MIN => ModeFamily::Arithmetic(ArithmeticOp::AddMin),
            mode_code::GRAYISH_TEXT_OR => ModeFamily::GrayishTextOr,
            _ => return Err(crate::CompositeError::UnsupportedMode { code }),
        };

        Ok(TransferMode { family, modifier })
    }

    const fn boolean_op(bits: u16) -> BooleanOp {
        match bits {
            1 => BooleanOp::Or,
            2 => BooleanOp::Xor,
            3 => BooleanOp::Bic,
            _ => BooleanOp::Copy,
        }
    }

    /// Re-encodes the mode as a raw picture code.
    ///
    /// `None` for [`ModeFamily::GrayishTextOr`], which is never stored in
    /// pictures, and for hilite on `notPatXor`/`notPatBic`: their would-be
    /// codes 64/65 belong to the dither range, so emitting them would decode
    /// as a different mode.
    pub fn to_code(self) -> Option<u16> {
        let base = match self.family {
            ModeFamily::Source { op, not } => op as u16 | if not { 0b100 } else { 0 },
            ModeFamily::Pattern { op, not } => mode_code::PAT_COPY | op as u16 | if not { 0b100 } else { 0 },
            ModeFamily::Arithmetic(op) => op as u16,
            ModeFamily::GrayishTextOr => return None,
        };
        match self.modifier {
            ModeModifier::None => Some(base),
            ModeModifier::Dither => Some(base + mode_code::DITHER),
            ModeModifier::Hilite => {
                let code = base + mode_code::HILITE;
                if code >= mode_code::DITHER { None } else { Some(code) }
            }
        }
    }

    pub const fn family(self) -> ModeFamily {
        self.family
    }

    pub const fn modifier(self) -> ModeModifier {
        self.modifier
    }

    pub const fn is_source_mode(self) -> bool {
        matches!(self.family, ModeFamily::Source { .. })
    }

    pub const fn is_pattern_mode(self) -> bool {
        matches!(self.family, ModeFamily::Pattern { .. })
    }

    pub const fn is_arithmetic(self) -> bool {
        matches!(self.family, ModeFamily::Arithmetic(_))
    }

    pub const fn is_text_only(self) -> bool {
        matches!(self.family, ModeFamily::GrayishTextOr)
    }

    pub const fn is_dithered(self) -> bool {
        matches!(self.modifier, ModeModifier::Dither)
    }

    pub const fn is_hilited(self) -> bool {
        matches!(self.modifier, ModeModifier::Hilite)
    }
}

impl std::fmt::Display for TransferMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self.family {
            ModeFamily::Source { op, not } => match (op, not) {
                (BooleanOp::Copy, false) => "srcCopy",
                (BooleanOp::Or, false) => "srcOr",
                (BooleanOp::Xor, false) => "srcXor",
                (BooleanOp::Bic, false) => "srcBic",
                (BooleanOp::Copy, true) => "notSrcCopy",
                (BooleanOp::Or, true) => "notSrcOr",
                (BooleanOp::Xor, true) => "notSrcXor",
                (BooleanOp::Bic, true) => "notSrcBic",
            },
            ModeFamily::Pattern { op, not } => match (op, not) {
                (BooleanOp::Copy, false) => "patCopy",
                (BooleanOp::Or, false) => "patOr",
                (BooleanOp::Xor, false) => "patXor",
                (BooleanOp::Bic, false) => "patBic",
                (BooleanOp::Copy, true) => "notPatCopy",
                (BooleanOp::Or, true) => "notPatOr",
                (BooleanOp::Xor, true) => "notPatXor",
                (BooleanOp::Bic, true) => "notPatBic",
            },
            ModeFamily::Arithmetic(op) => match op {
                ArithmeticOp::Blend => "blend",
                ArithmeticOp::AddPin => "addPin",
                ArithmeticOp::AddOver => "addOver",
                ArithmeticOp::SubPin => "subPin",
                ArithmeticOp::Transparent => "transparent",
                ArithmeticOp::AddMax => "addMax",
                ArithmeticOp::SubOver => "subOver",
                ArithmeticOp::AddMin => "addMin",
            },
            ModeFamily::GrayishTextOr => "grayishTextOr",
        };
        match self.modifier {
            ModeModifier::None => write!(f, "{name}"),
            ModeModifier::Dither => write!(f, "dither+{name}"),
            ModeModifier::Hilite => write!(f, "hilite+{name}"),
        }
    }
}
