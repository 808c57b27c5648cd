//! The [`Icon`] type: what a single slot looks like.

use crate::style::Style;
use crate::text::StyledText;

/// The visual representation written to a surface slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Icon {
    /// Glyph drawn in the slot.
    pub glyph: char,
    /// Style of the glyph.
    pub style: Style,
    /// Display name shown when hovering the slot.
    pub name: StyledText,
    /// Extra description lines.
    pub lore: Vec<StyledText>,
    /// Stack size shown on the slot.
    pub amount: u8,
}

impl Icon {
    /// An icon with the given glyph and `&`-formatted name.
    pub fn new(glyph: char, name: &str) -> Self {
        Self::default().with_glyph(glyph).with_name(name)
    }

    /// Set the glyph (builder).
    #[inline]
    pub fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }

    /// Set the glyph style (builder).
    #[inline]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the display name, translating `&` codes (builder).
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = StyledText::parse(name);
        self
    }

    /// Set the lore lines, translating `&` codes (builder).
    pub fn with_lore<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lore = lines
            .into_iter()
            .map(|l| StyledText::parse(l.as_ref()))
            .collect();
        self
    }

    /// Set the stack size, clamped to at least 1 (builder).
    #[inline]
    pub fn with_amount(mut self, amount: u8) -> Self {
        self.amount = amount.max(1);
        self
    }
}

impl Default for Icon {
    fn default() -> Self {
        Self {
            glyph: ' ',
            style: Style::default(),
            name: StyledText::default(),
            lore: Vec::new(),
            amount: 1,
        }
    }
}
