//! [`StyledText`]: display text split into styled spans.
//!
//! Text is usually written with `&` formatting codes, e.g. `"&6Scroll &lup"`.
//! A colour code (`&0`–`&f`) switches the colour and clears attributes,
//! `&k`/`&l`/`&m`/`&n`/`&o` add an attribute, and `&r` resets to the base
//! style. An `&` that is not followed by a known code is kept as text.

use std::fmt;

use crate::style::{AttrMask, Color, Style};

/// Marker character introducing a formatting code.
pub const CODE_MARKER: char = '&';

/// A run of characters sharing one style.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub text: String,
    pub style: Style,
}

/// Text made of styled [`Span`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyledText {
    spans: Vec<Span>,
}

impl StyledText {
    // -- Constructors --

    /// Text without any formatting codes translated.
    pub fn plain(s: &str) -> Self {
        Self::new(s, Style::default())
    }

    /// Text with a single style; formatting codes are not translated.
    pub fn new(s: &str, style: Style) -> Self {
        let spans = if s.is_empty() {
            Vec::new()
        } else {
            vec![Span {
                text: s.to_string(),
                style,
            }]
        };
        Self { spans }
    }

    /// Translate `&` formatting codes in `s`.
    pub fn parse(s: &str) -> Self {
        Self::parse_with(s, Style::default())
    }

    /// Translate `&` formatting codes in `s`, starting from `base` (which
    /// `&r` returns to).
    pub fn parse_with(s: &str, base: Style) -> Self {
        let mut out = Self::default();
        let mut current = base;
        let mut buf = String::new();
        let mut chars = s.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch == CODE_MARKER {
                if let Some(&code) = chars.peek() {
                    if let Some(next) = apply_code(current, base, code) {
                        chars.next();
                        if next != current {
                            out.push(std::mem::take(&mut buf), current);
                            current = next;
                        }
                        continue;
                    }
                }
            }
            buf.push(ch);
        }
        out.push(buf, current);
        out
    }

    // -- Accessors --

    /// The styled spans, in order. Never contains empty spans.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// The visible text with all styling removed.
    pub fn content(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Number of visible characters.
    pub fn len(&self) -> usize {
        self.spans.iter().map(|s| s.text.chars().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Style of the first visible character, or the default style.
    pub fn leading_style(&self) -> Style {
        self.spans.first().map(|s| s.style).unwrap_or_default()
    }

    /// Iterate over visible characters with their style.
    pub fn chars(&self) -> impl Iterator<Item = (char, Style)> + '_ {
        self.spans
            .iter()
            .flat_map(|span| span.text.chars().map(move |c| (c, span.style)))
    }

    fn push(&mut self, text: String, style: Style) {
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(&text),
            _ => self.spans.push(Span { text, style }),
        }
    }
}

/// Style that results from applying formatting `code` to `current`, or
/// `None` if `code` is not a formatting code.
fn apply_code(current: Style, base: Style, code: char) -> Option<Style> {
    if let Some(color) = Color::from_code(code) {
        return Some(Style {
            fg: Some(color),
            attrs: AttrMask::NONE,
        });
    }
    if let Some(attr) = AttrMask::from_code(code) {
        return Some(current.with_attrs(current.attrs | attr));
    }
    if code.eq_ignore_ascii_case(&'r') {
        return Some(base);
    }
    None
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            f.write_str(&span.text)?;
        }
        Ok(())
    }
}

impl From<&str> for StyledText {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for StyledText {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}
