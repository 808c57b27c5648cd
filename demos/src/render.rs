//! Terminal rendering of surfaces with crossterm.

use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Attribute, Color as CtColor, Print, ResetColor, SetAttribute, SetForegroundColor},
};

use slotmenu_core::{AttrMask, Color, LocalSurface, SlotPos, Style, StyledText, Surface};

const EMPTY_SLOT: char = '·';

/// Maps a slot colour to a [`crossterm::style::Color`].
fn to_ct_color(c: Option<Color>) -> CtColor {
    match c {
        Some(c) => CtColor::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        },
        None => CtColor::Reset,
    }
}

fn set_style<W: Write>(out: &mut W, style: Style) -> io::Result<()> {
    queue!(out, SetForegroundColor(to_ct_color(style.fg)))?;
    let attrs = [
        (AttrMask::BOLD, Attribute::Bold),
        (AttrMask::ITALIC, Attribute::Italic),
        (AttrMask::UNDERLINE, Attribute::Underlined),
        (AttrMask::STRIKETHROUGH, Attribute::CrossedOut),
        (AttrMask::OBFUSCATED, Attribute::RapidBlink),
    ];
    for (mask, attr) in attrs {
        if style.attrs.contains(mask) {
            queue!(out, SetAttribute(attr))?;
        }
    }
    Ok(())
}

fn reset<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)
}

/// Print formatted text, restoring the terminal style afterwards.
pub fn print_text<W: Write>(out: &mut W, text: &StyledText) -> io::Result<()> {
    for span in text.spans() {
        set_style(out, span.style)?;
        queue!(out, Print(&span.text))?;
        reset(out)?;
    }
    Ok(())
}

/// Draw a surface as its title followed by one line per row.
pub fn render_surface<W: Write>(out: &mut W, surface: &LocalSurface) -> io::Result<()> {
    print_text(out, &surface.title())?;
    let slots = surface.slots();
    let filled = format!("  ({}, {}/{} filled)\r\n", surface.id(), slots.occupied(), slots.size());
    queue!(out, Print(filled))?;
    for z in 0..slots.rows() {
        for icon in slots.row(z) {
            match icon {
                Some(icon) => {
                    set_style(out, icon.style)?;
                    queue!(out, Print(icon.glyph))?;
                    reset(out)?;
                }
                None => queue!(out, Print(EMPTY_SLOT))?,
            }
            queue!(out, Print(' '))?;
        }
        queue!(out, Print("\r\n"))?;
    }
    out.flush()
}

/// Describe the item in `slot`: its name and lore, one line each.
pub fn describe_slot<W: Write>(out: &mut W, surface: &LocalSurface, slot: usize) -> io::Result<()> {
    let Some(icon) = surface.at(slot) else {
        let pos = SlotPos::from_index(slot);
        queue!(out, Print(format!("slot {slot} {pos} is empty\r\n")))?;
        return out.flush();
    };
    print_text(out, &icon.name)?;
    queue!(out, Print("\r\n"))?;
    for line in &icon.lore {
        queue!(out, Print("  "))?;
        print_text(out, line)?;
        queue!(out, Print("\r\n"))?;
    }
    out.flush()
}
