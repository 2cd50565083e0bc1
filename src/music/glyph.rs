// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Glyph keys handed to the renderer.
//!
//! The game font stores one character per staff position for each kind of
//! symbol, so a glyph is just a symbol kind plus a staff offset. Drawing the
//! characters is the renderer's job.

/// First code point of the note head bank
pub const NOTES_START: u32 = 0xE000;
/// First code point of the flat bank
pub const FLATS_START: u32 = 0xE020;
/// First code point of the natural bank
pub const NATURALS_START: u32 = 0xE040;
/// First code point of the sharp bank
pub const SHARPS_START: u32 = 0xE060;

/// Characters reserved per bank
const BANK_SIZE: i32 = 0x20;

/// A symbol to draw, keyed by clef-relative staff offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// Clef symbol at the start of the staff
    Clef(char),
    Note(i32),
    Flat(i32),
    Natural(i32),
    Sharp(i32),
}

impl Glyph {
    /// Staff offset for positioned glyphs
    pub fn offset(&self) -> Option<i32> {
        match *self {
            Glyph::Clef(_) => None,
            Glyph::Note(o) | Glyph::Flat(o) | Glyph::Natural(o) | Glyph::Sharp(o) => Some(o),
        }
    }

    /// Font character for this glyph, if the offset falls inside its bank
    pub fn code_point(&self) -> Option<char> {
        let (base, offset) = match *self {
            Glyph::Clef(symbol) => return Some(symbol),
            Glyph::Note(o) => (NOTES_START, o),
            Glyph::Flat(o) => (FLATS_START, o),
            Glyph::Natural(o) => (NATURALS_START, o),
            Glyph::Sharp(o) => (SHARPS_START, o),
        };
        if !(0..BANK_SIZE).contains(&offset) {
            return None;
        }
        char::from_u32(base + offset as u32)
    }
}

/// Font text for a glyph sequence; glyphs outside the font are skipped
pub fn render_glyphs(glyphs: &[Glyph]) -> String {
    glyphs.iter().filter_map(Glyph::code_point).collect()
}
