use bitflags::bitflags;

bitflags! {
    /// Text face flags as stored in the picture format.
    ///
    /// The bit positions are part of the wire format and must not change.
    /// Any subset is valid, including the empty set.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct TextStyle: u8 {
        const BOLD = 1;
        const ITALIC = 2;
        const UNDERLINE = 4;
        const OUTLINE = 8;
        const SHADOW = 16;
        const CONDENSED = 32;
        const EXTENDED = 64;
    }
}

impl TextStyle {
    pub fn is_bold(self) -> bool {
        self.contains(TextStyle::BOLD)
    }

    pub fn is_italic(self) -> bool {
        self.contains(TextStyle::ITALIC)
    }

    pub fn is_underlined(self) -> bool {
        self.contains(TextStyle::UNDERLINE)
    }

    pub fn is_outlined(self) -> bool {
        self.contains(TextStyle::OUTLINE)
    }

    pub fn is_shadowed(self) -> bool {
        self.contains(TextStyle::SHADOW)
    }

    pub fn is_condensed(self) -> bool {
        self.contains(TextStyle::CONDENSED)
    }

    pub fn is_extended(self) -> bool {
        self.contains(TextStyle::EXTENDED)
    }
}
