// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Clefs and the range of notes each one can show.
//!
//! A staff has five lines, four spaces and up to four ledger positions above
//! and below, seventeen positions in all. Each clef pins its lowest position
//! (offset 1) to a note; everything else follows from that.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::{NotationError, Result};
use super::glyph::Glyph;
use super::note::{Letter, Note, LETTERS_PER_OCTAVE};

pub const STAFF_LINES: usize = 5;
pub const STAFF_SPACES: usize = 4;
/// Ledger positions available above and below the staff
pub const LEDGER_POSITIONS: u8 = 4;
/// Every position a note can occupy, ledger positions included
pub const TOTAL_STAFF_POSITIONS: usize =
    STAFF_LINES + STAFF_SPACES + 2 * LEDGER_POSITIONS as usize;

/// Flat, natural and sharp spellings are offered on every position
const SPELLINGS_PER_POSITION: usize = 3;

/// How many ledger positions below and above the staff may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawLedgerLimits")]
pub struct LedgerLimits {
    low: u8,
    high: u8,
}

/// Unclamped form read from settings files
#[derive(Deserialize)]
struct RawLedgerLimits {
    low: u8,
    high: u8,
}

impl From<RawLedgerLimits> for LedgerLimits {
    fn from(raw: RawLedgerLimits) -> Self {
        LedgerLimits::new(raw.low, raw.high)
    }
}

impl LedgerLimits {
    /// Create limits, clamping each side to [`LEDGER_POSITIONS`]
    pub fn new(low: u8, high: u8) -> Self {
        Self {
            low: low.min(LEDGER_POSITIONS),
            high: high.min(LEDGER_POSITIONS),
        }
    }

    /// No ledger positions at all
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn low(&self) -> u8 {
        self.low
    }

    pub fn high(&self) -> u8 {
        self.high
    }
}

impl Default for LedgerLimits {
    fn default() -> Self {
        Self::new(LEDGER_POSITIONS, LEDGER_POSITIONS)
    }
}

/// Staff geometry of a clef
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clef {
    name: &'static str,
    symbol: char,
    lowest_note: Note,
    /// Per sharp in the key signature: true moves up a fifth, false down a fourth
    sharps_pattern: [bool; 6],
    /// Per flat in the key signature: true moves down a fifth, false up a fourth
    flats_pattern: [bool; 6],
}

/// All supported clefs
pub static CLEFS: [Clef; 7] = [
    Clef::new(
        "Bass",
        '\u{E0A9}',
        Note::new(Letter::C, 0, 2),
        [false, true, false, false, true, false],
        [false, true, false, true, false, true],
    ),
    Clef::new(
        "Treble",
        '\u{E0AE}',
        Note::new(Letter::A, 0, 3),
        [false, true, false, false, true, false],
        [false, true, false, true, false, true],
    ),
    Clef::new(
        "Baritone",
        '\u{E0AB}',
        Note::new(Letter::E, 0, 2),
        [true, false, true, false, false, true],
        [true, false, true, false, true, false],
    ),
    Clef::new(
        "Tenor",
        '\u{E0AD}',
        Note::new(Letter::G, 0, 2),
        [true, false, true, false, true, false],
        [false, true, false, true, false, true],
    ),
    Clef::new(
        "Alto",
        '\u{E0AF}',
        Note::new(Letter::B, 0, 2),
        [false, true, false, false, true, false],
        [false, true, false, true, false, true],
    ),
    Clef::new(
        "Mezzo-Soprano",
        '\u{E0AA}',
        Note::new(Letter::D, 0, 3),
        [false, true, false, true, false, true],
        [true, false, true, false, true, false],
    ),
    Clef::new(
        "Soprano",
        '\u{E0AC}',
        Note::new(Letter::F, 0, 3),
        [true, false, true, false, true, false],
        [true, false, true, false, true, false],
    ),
];

impl Clef {
    const fn new(
        name: &'static str,
        symbol: char,
        lowest_note: Note,
        sharps_pattern: [bool; 6],
        flats_pattern: [bool; 6],
    ) -> Self {
        Self {
            name,
            symbol,
            lowest_note,
            sharps_pattern,
            flats_pattern,
        }
    }

    /// Every clef, in menu order
    pub fn all() -> &'static [Clef] {
        &CLEFS
    }

    /// Find a clef by name, ignoring case
    pub fn by_name(name: &str) -> Option<&'static Clef> {
        CLEFS.iter().find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Like [`Clef::by_name`], but reports unknown names as an error
    pub fn lookup(name: &str) -> Result<&'static Clef> {
        Self::by_name(name).ok_or_else(|| NotationError::UnknownClef(name.to_string()))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    /// The note on the lowest ledger position (staff offset 1)
    pub fn lowest_note(&self) -> Note {
        self.lowest_note
    }

    pub fn sharps_pattern(&self) -> &[bool; 6] {
        &self.sharps_pattern
    }

    pub fn flats_pattern(&self) -> &[bool; 6] {
        &self.flats_pattern
    }

    /// The clef symbol as a glyph
    pub fn glyph(&self) -> Glyph {
        Glyph::Clef(self.symbol)
    }

    /// Flat, natural and sharp on each position a scale may start from,
    /// lowest first, assuming every ledger position is allowed
    ///
    /// A scale climbs seven positions, so starts stop seven short of the top.
    fn starting_candidates(&self) -> Vec<Note> {
        let positions = TOTAL_STAFF_POSITIONS - LETTERS_PER_OCTAVE;
        let mut candidates = Vec::with_capacity(positions * SPELLINGS_PER_POSITION);

        let mut letter = self.lowest_note.letter();
        let mut octave = self.lowest_note.octave();
        for _ in 0..positions {
            for accidental in [-1, 0, 1] {
                candidates.push(Note::new(letter, accidental, octave));
            }
            letter = letter.next();
            if letter == Letter::C {
                octave += 1;
            }
        }
        candidates
    }

    /// Notes a scale may start on, given how many ledger positions are allowed
    ///
    /// Must be recomputed whenever the ledger limits change.
    pub fn all_playable_notes(&self, limits: LedgerLimits) -> BTreeSet<Note> {
        let candidates = self.starting_candidates();
        let skip_low = SPELLINGS_PER_POSITION * LEDGER_POSITIONS.saturating_sub(limits.low()) as usize;
        let skip_high = SPELLINGS_PER_POSITION * LEDGER_POSITIONS.saturating_sub(limits.high()) as usize;
        let end = candidates.len().saturating_sub(skip_high);

        candidates
            .into_iter()
            .take(end)
            .skip(skip_low)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(s: &str) -> Note {
        Note::parse(s).unwrap()
    }

    #[test]
    fn test_staff_size() {
        assert_eq!(TOTAL_STAFF_POSITIONS, 17);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Clef::by_name("Treble").unwrap().lowest_note(), note("A3"));
        assert_eq!(Clef::by_name("bass").unwrap().lowest_note(), note("C2"));
        assert_eq!(Clef::by_name("Mezzo-Soprano").unwrap().symbol(), '\u{E0AA}');
        assert!(Clef::by_name("Banjo").is_none());
        assert_eq!(
            Clef::lookup("Banjo"),
            Err(NotationError::UnknownClef("Banjo".to_string()))
        );
        assert_eq!(Clef::all().len(), 7);
    }

    #[test]
    fn test_full_range_treble() {
        let clef = Clef::by_name("Treble").unwrap();
        let notes = clef.all_playable_notes(LedgerLimits::default());
        assert_eq!(notes.len(), 30);
        assert_eq!(notes.iter().next(), Some(&note("Ab3")));
        assert_eq!(notes.iter().last(), Some(&note("C#5")));
        assert!(notes.contains(&note("C4")));
        assert!(notes.contains(&note("Bb3")));
        assert!(!notes.contains(&note("D5")));
    }

    #[test]
    fn test_no_ledger_positions() {
        let clef = Clef::by_name("Treble").unwrap();
        let notes = clef.all_playable_notes(LedgerLimits::none());
        let expected: BTreeSet<Note> = ["Eb4", "E4", "E#4", "Fb4", "F4", "F#4"]
            .iter()
            .map(|s| note(s))
            .collect();
        assert_eq!(notes, expected);

        for n in &notes {
            let offset = n.staff_offset(clef);
            assert!(offset > LEDGER_POSITIONS as i32);
            assert!(offset + (LETTERS_PER_OCTAVE as i32) <= TOTAL_STAFF_POSITIONS as i32 - LEDGER_POSITIONS as i32);
        }
    }

    #[test]
    fn test_asymmetric_limits() {
        let clef = Clef::by_name("Bass").unwrap();
        let notes = clef.all_playable_notes(LedgerLimits::new(1, 2));
        // Lowest allowed position is the ledger position just below the staff
        assert_eq!(notes.iter().next(), Some(&note("Fb2")));
        assert_eq!(notes.iter().last(), Some(&note("C#3")));
        assert_eq!(notes.len(), 3 * (10 - 3 - 2));
    }

    #[test]
    fn test_limits_are_clamped() {
        let limits = LedgerLimits::new(9, 5);
        assert_eq!(limits, LedgerLimits::default());
    }

    #[test]
    fn test_deserialized_limits_are_clamped() {
        let limits: LedgerLimits = serde_yaml::from_str("low: 9\nhigh: 2").unwrap();
        assert_eq!(limits, LedgerLimits::new(4, 2));

        let clef = Clef::by_name("Treble").unwrap();
        assert_eq!(clef.all_playable_notes(limits).len(), 3 * (10 - 2));
    }

    #[test]
    fn test_octave_boundary_on_walk() {
        let clef = Clef::by_name("Alto").unwrap();
        let notes = clef.all_playable_notes(LedgerLimits::default());
        assert!(notes.contains(&note("B2")));
        assert!(notes.contains(&note("C3")));
        assert!(!notes.contains(&note("C2")));
    }
}
