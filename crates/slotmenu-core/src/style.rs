//! Visual styling: [`Color`], [`AttrMask`], and [`Style`].
//!
//! Colours follow the sixteen-entry legacy chat palette addressed by the
//! hex digits `0`–`f`, which is what `&` formatting codes select.

use std::ops::{BitAnd, BitOr};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGB colour packed into a `u32` (0x00RRGGBB).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Self = Self(0x000000);
    pub const DARK_BLUE: Self = Self(0x0000AA);
    pub const DARK_GREEN: Self = Self(0x00AA00);
    pub const DARK_AQUA: Self = Self(0x00AAAA);
    pub const DARK_RED: Self = Self(0xAA0000);
    pub const DARK_PURPLE: Self = Self(0xAA00AA);
    pub const GOLD: Self = Self(0xFFAA00);
    pub const GRAY: Self = Self(0xAAAAAA);
    pub const DARK_GRAY: Self = Self(0x555555);
    pub const BLUE: Self = Self(0x5555FF);
    pub const GREEN: Self = Self(0x55FF55);
    pub const AQUA: Self = Self(0x55FFFF);
    pub const RED: Self = Self(0xFF5555);
    pub const LIGHT_PURPLE: Self = Self(0xFF55FF);
    pub const YELLOW: Self = Self(0xFFFF55);
    pub const WHITE: Self = Self(0xFFFFFF);

    const PALETTE: [Self; 16] = [
        Self::BLACK,
        Self::DARK_BLUE,
        Self::DARK_GREEN,
        Self::DARK_AQUA,
        Self::DARK_RED,
        Self::DARK_PURPLE,
        Self::GOLD,
        Self::GRAY,
        Self::DARK_GRAY,
        Self::BLUE,
        Self::GREEN,
        Self::AQUA,
        Self::RED,
        Self::LIGHT_PURPLE,
        Self::YELLOW,
        Self::WHITE,
    ];

    /// Palette colour selected by a formatting code (`'0'`–`'9'`, `'a'`–`'f'`,
    /// case-insensitive).
    pub fn from_code(code: char) -> Option<Self> {
        code.to_digit(16).map(|d| Self::PALETTE[d as usize])
    }

    /// Red component.
    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Green component.
    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Blue component.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

// ---------------------------------------------------------------------------
// AttrMask
// ---------------------------------------------------------------------------

/// Bitmask of text attributes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttrMask(pub u8);

impl AttrMask {
    pub const NONE: Self = Self(0);
    pub const BOLD: Self = Self(1 << 0);
    pub const ITALIC: Self = Self(1 << 1);
    pub const UNDERLINE: Self = Self(1 << 2);
    pub const STRIKETHROUGH: Self = Self(1 << 3);
    pub const OBFUSCATED: Self = Self(1 << 4);

    /// Attribute selected by a formatting code (`k`, `l`, `m`, `n`, `o`).
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_lowercase() {
            'k' => Some(Self::OBFUSCATED),
            'l' => Some(Self::BOLD),
            'm' => Some(Self::STRIKETHROUGH),
            'n' => Some(Self::UNDERLINE),
            'o' => Some(Self::ITALIC),
            _ => None,
        }
    }

    /// Whether this mask contains all the bits from `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Whether the mask is empty.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for AttrMask {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for AttrMask {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Visual style of a run of text or an icon glyph. `fg == None` means the
/// host's default colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    pub fg: Option<Color>,
    pub attrs: AttrMask,
}

impl Style {
    /// Set the foreground colour (builder).
    #[inline]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = Some(fg);
        self
    }

    /// Set the attribute mask (builder).
    #[inline]
    pub const fn with_attrs(mut self, attrs: AttrMask) -> Self {
        self.attrs = attrs;
        self
    }
}
