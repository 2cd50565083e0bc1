// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Spelled pitches: letters, pitch classes, notes and scale steps.
//!
//! Unlike a MIDI note number, a [`Note`] keeps its spelling: `C#4` and `Db4`
//! are different notes that happen to sound the same. The spelling decides
//! where the note sits on the staff and which accidentals are drawn.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::clef::Clef;
use super::error::{NotationError, Result};
use super::glyph::Glyph;
use super::key_signature::KeySignature;

/// Number of letter names in an octave
pub const LETTERS_PER_OCTAVE: usize = 7;

/// Scale length whose steps advance one letter at a time
pub const DIATONIC_LENGTH: usize = 7;

/// Text used for one sharp
pub const SHARP: char = '#';

/// Text used for one flat
pub const FLAT: char = 'b';

/// Letter names of the musical alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Letter {
    /// All letters in alphabetical order
    pub const ALL: [Letter; 7] = [
        Letter::A,
        Letter::B,
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
    ];

    /// Position in the alphabet (A = 0)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Next letter, wrapping G back to A
    pub fn next(self) -> Self {
        Letter::ALL[(self.index() + 1) % LETTERS_PER_OCTAVE]
    }

    /// Parse an upper-case letter
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            _ => None,
        }
    }

    /// The letter as a character
    pub fn as_char(self) -> char {
        (b'A' + self as u8) as char
    }

    /// Half steps between this letter and the next one with no accidentals
    pub fn natural_gap_to_next(self) -> i8 {
        match self {
            Letter::B | Letter::E => 1,
            _ => 2,
        }
    }

    /// A and B belong to the octave that started at the C below them
    fn precedes_c(self) -> bool {
        matches!(self, Letter::A | Letter::B)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One step of a scale pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// One half step (`H`)
    Half,
    /// Two half steps (`W`)
    Whole,
    /// Three half steps (`3`)
    AugmentedSecond,
}

impl Step {
    /// Size of the step in half steps
    pub fn half_steps(self) -> u8 {
        match self {
            Step::Half => 1,
            Step::Whole => 2,
            Step::AugmentedSecond => 3,
        }
    }

    /// Build a step from its size in half steps
    pub fn from_half_steps(half_steps: u8) -> Result<Self> {
        match half_steps {
            1 => Ok(Step::Half),
            2 => Ok(Step::Whole),
            3 => Ok(Step::AugmentedSecond),
            other => Err(NotationError::InvalidStepSize(other)),
        }
    }

    /// Parse a pattern character (`H`, `W` or `3`)
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'H' => Some(Step::Half),
            'W' => Some(Step::Whole),
            '3' => Some(Step::AugmentedSecond),
            _ => None,
        }
    }

    /// The pattern character for this step
    pub fn as_char(self) -> char {
        match self {
            Step::Half => 'H',
            Step::Whole => 'W',
            Step::AugmentedSecond => '3',
        }
    }
}

/// Render an accidental count as repeated `#` or `b`
pub fn accidental_text(accidental: i8) -> String {
    let symbol = if accidental < 0 { FLAT } else { SHARP };
    std::iter::repeat(symbol)
        .take(accidental.unsigned_abs() as usize)
        .collect()
}

/// A letter with accidentals but no octave (e.g. `F#`, `Bb`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitchClass {
    letter: Letter,
    accidental: i8,
}

impl PitchClass {
    /// Create a pitch class from a letter and a signed accidental count
    pub const fn new(letter: Letter, accidental: i8) -> Self {
        Self { letter, accidental }
    }

    /// Parse a pitch class from a string such as `"C"`, `"F#"` or `"Ebb"`
    pub fn parse(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let letter = chars
            .next()
            .and_then(Letter::from_char)
            .ok_or_else(|| NotationError::InvalidNoteLetter(s.to_string()))?;
        let accidental = parse_accidentals(s, chars)?;
        Ok(Self { letter, accidental })
    }

    pub fn letter(&self) -> Letter {
        self.letter
    }

    pub fn accidental(&self) -> i8 {
        self.accidental
    }

    /// Place this pitch class in an octave
    pub fn at_octave(self, octave: i8) -> Note {
        Note::new(self.letter, self.accidental, octave)
    }
}

impl FromStr for PitchClass {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self> {
        PitchClass::parse(s)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, accidental_text(self.accidental))
    }
}

fn parse_accidentals(source: &str, chars: impl Iterator<Item = char>) -> Result<i8> {
    let mut accidental: i8 = 0;
    for c in chars {
        let next = match c {
            SHARP => accidental.checked_add(1),
            FLAT => accidental.checked_sub(1),
            other => {
                return Err(NotationError::InvalidAccidental {
                    note: source.to_string(),
                    accidental: other,
                })
            }
        };
        accidental =
            next.ok_or_else(|| NotationError::TooManyAccidentals(source.to_string()))?;
    }
    Ok(accidental)
}

/// A spelled note: letter, accidental count and octave
///
/// Octaves follow scientific pitch notation, so they change between B and C
/// (`B3` is directly below `C4`). Notes order by written height on the staff,
/// then by accidental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    letter: Letter,
    accidental: i8,
    octave: i8,
}

/// Text or staff spelling of a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spelling {
    /// Plain text such as `F#` or `F#4`
    Text(String),
    /// Accidental glyphs followed by the note head glyph
    Staff(Vec<Glyph>),
}

impl Note {
    /// Create a note from its parts
    pub const fn new(letter: Letter, accidental: i8, octave: i8) -> Self {
        Self {
            letter,
            accidental,
            octave,
        }
    }

    /// Parse a note such as `"C4"`, `"F#3"` or `"Bbb2"`
    ///
    /// The first character is the letter, the last is a single octave digit,
    /// and everything between must be `#` or `b`.
    pub fn parse(s: &str) -> Result<Self> {
        let letter = s
            .chars()
            .next()
            .and_then(Letter::from_char)
            .ok_or_else(|| NotationError::InvalidNoteLetter(s.to_string()))?;

        let last = s.chars().last().filter(|_| s.chars().count() >= 2);
        let octave = last
            .and_then(|c| c.to_digit(10))
            .ok_or_else(|| NotationError::InvalidOctave(s.to_string()))? as i8;

        let middle = s.chars().skip(1).take(s.chars().count() - 2);
        let accidental = parse_accidentals(s, middle)?;

        Ok(Self {
            letter,
            accidental,
            octave,
        })
    }

    pub fn letter(&self) -> Letter {
        self.letter
    }

    /// Signed accidental count: positive for sharps, negative for flats
    pub fn accidental(&self) -> i8 {
        self.accidental
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    /// The note without its octave
    pub fn pitch_class(&self) -> PitchClass {
        PitchClass::new(self.letter, self.accidental)
    }

    /// True when both notes use the same letter, whatever the accidental or octave
    pub fn is_letter_equal(&self, other: &Note) -> bool {
        self.letter == other.letter
    }

    /// The note `half_steps` (1-3) above this one within a scale of `scale_length` steps
    pub fn up_by(&self, half_steps: u8, scale_length: usize) -> Result<Note> {
        let step = Step::from_half_steps(half_steps)?;
        self.step_up(step, scale_length)
    }

    /// The note one scale step above this one
    ///
    /// Seven-step scales move to the next letter and fix up the accidental so
    /// the interval is right. Every other length keeps the letter and stacks
    /// accidentals instead. Fails with [`NotationError::NoteOutOfRange`] when
    /// the accidental or octave would overflow.
    pub fn step_up(&self, step: Step, scale_length: usize) -> Result<Note> {
        let out_of_range = || NotationError::NoteOutOfRange(self.to_string());
        let raised = self
            .accidental
            .checked_add(step.half_steps() as i8)
            .ok_or_else(out_of_range)?;

        if scale_length != DIATONIC_LENGTH {
            return Ok(Note::new(self.letter, raised, self.octave));
        }

        let octave = if self.letter == Letter::B {
            self.octave.checked_add(1).ok_or_else(out_of_range)?
        } else {
            self.octave
        };
        let accidental = raised
            .checked_sub(self.letter.natural_gap_to_next())
            .ok_or_else(out_of_range)?;
        Ok(Note::new(self.letter.next(), accidental, octave))
    }

    /// Absolute written height, counted in letters
    fn staff_ordinal(&self) -> i32 {
        let octave = self.octave as i32 + self.letter.precedes_c() as i32;
        octave * LETTERS_PER_OCTAVE as i32 + self.letter.index() as i32
    }

    /// Staff position relative to the clef, where the clef's lowest note is 1
    pub fn staff_offset(&self, clef: &Clef) -> i32 {
        self.staff_ordinal() - clef.lowest_note().staff_ordinal() + 1
    }

    /// Accidental glyphs drawn in front of this note
    ///
    /// A natural note yields a natural sign only when `with_natural` is set.
    /// Otherwise one sharp or flat glyph is produced per accidental.
    pub fn accidental_glyphs(&self, clef: &Clef, with_natural: bool) -> Vec<Glyph> {
        let offset = self.staff_offset(clef);
        match self.accidental.cmp(&0) {
            Ordering::Equal if with_natural => vec![Glyph::Natural(offset)],
            Ordering::Equal => Vec::new(),
            Ordering::Greater => vec![Glyph::Sharp(offset); self.accidental as usize],
            Ordering::Less => vec![Glyph::Flat(offset); self.accidental.unsigned_abs() as usize],
        }
    }

    /// Glyphs for this note on a staff with the given key signature
    pub fn staff_glyphs(&self, clef: &Clef, key_signature: &KeySignature) -> Vec<Glyph> {
        let mut glyphs = if !key_signature.contains(self.letter) {
            self.accidental_glyphs(clef, false)
        } else if key_signature.sign_differs(self) {
            self.accidental_glyphs(clef, true)
        } else {
            Vec::new()
        };
        glyphs.push(Glyph::Note(self.staff_offset(clef)));
        glyphs
    }

    /// Plain text form, with or without the octave digit
    pub fn label(&self, show_octave: bool) -> String {
        let mut label = self.pitch_class().to_string();
        if show_octave {
            label.push_str(&self.octave.to_string());
        }
        label
    }

    /// Text form without a clef, staff glyphs with one
    pub fn spelled_form(
        &self,
        clef: Option<&Clef>,
        key_signature: &KeySignature,
        show_octave: bool,
    ) -> Spelling {
        match clef {
            Some(clef) => Spelling::Staff(self.staff_glyphs(clef, key_signature)),
            None => Spelling::Text(self.label(show_octave)),
        }
    }
}

impl PartialOrd for Note {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Note {
    fn cmp(&self, other: &Self) -> Ordering {
        self.staff_ordinal()
            .cmp(&other.staff_ordinal())
            .then(self.accidental.cmp(&other.accidental))
    }
}

impl FromStr for Note {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self> {
        Note::parse(s)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(s: &str) -> Note {
        Note::parse(s).unwrap()
    }

    fn treble() -> &'static Clef {
        Clef::by_name("Treble").unwrap()
    }

    #[test]
    fn test_letter_next_wraps() {
        assert_eq!(Letter::A.next(), Letter::B);
        assert_eq!(Letter::B.next(), Letter::C);
        assert_eq!(Letter::G.next(), Letter::A);
    }

    #[test]
    fn test_parse_note() {
        let n = note("C4");
        assert_eq!(n.letter(), Letter::C);
        assert_eq!(n.accidental(), 0);
        assert_eq!(n.octave(), 4);

        assert_eq!(note("F#3").accidental(), 1);
        assert_eq!(note("Bbb2").accidental(), -2);
        assert_eq!(note("G##5").accidental(), 2);
    }

    #[test]
    fn test_parse_note_errors() {
        assert!(matches!(
            Note::parse("H4"),
            Err(NotationError::InvalidNoteLetter(_))
        ));
        assert!(matches!(
            Note::parse(""),
            Err(NotationError::InvalidNoteLetter(_))
        ));
        assert!(matches!(Note::parse("C"), Err(NotationError::InvalidOctave(_))));
        assert!(matches!(Note::parse("C#x"), Err(NotationError::InvalidOctave(_))));
        assert!(matches!(
            Note::parse("Cx4"),
            Err(NotationError::InvalidAccidental { accidental: 'x', .. })
        ));
    }

    #[test]
    fn test_accidental_count_limits() {
        let too_many = format!("C{}4", "b".repeat(200));
        assert_eq!(
            Note::parse(&too_many),
            Err(NotationError::TooManyAccidentals(too_many.clone()))
        );

        let most_flats = format!("C{}4", "b".repeat(128));
        assert_eq!(note(&most_flats).accidental(), i8::MIN);
        assert_eq!(note(&most_flats).to_string(), most_flats);
    }

    #[test]
    fn test_step_up_reports_overflow() {
        let lowest = Note::new(Letter::C, i8::MIN, 4);
        assert!(matches!(
            lowest.up_by(1, DIATONIC_LENGTH),
            Err(NotationError::NoteOutOfRange(_))
        ));

        let highest = Note::new(Letter::C, i8::MAX, 4);
        assert!(matches!(highest.up_by(1, 6), Err(NotationError::NoteOutOfRange(_))));

        let top_octave = Note::new(Letter::B, 0, i8::MAX);
        assert!(matches!(
            top_octave.up_by(1, DIATONIC_LENGTH),
            Err(NotationError::NoteOutOfRange(_))
        ));
    }

    #[test]
    fn test_display_round_trip() {
        for s in ["C4", "F#3", "Bbb2", "E#0"] {
            assert_eq!(note(s).to_string(), s);
        }
        assert_eq!(note("Ab3").label(false), "Ab");
    }

    #[test]
    fn test_pitch_class_parse() {
        let pc = PitchClass::parse("Eb").unwrap();
        assert_eq!(pc.letter(), Letter::E);
        assert_eq!(pc.accidental(), -1);
        assert_eq!(pc.at_octave(3), note("Eb3"));
        assert!(PitchClass::parse("e").is_err());
    }

    #[test]
    fn test_letter_equal() {
        assert!(note("C4").is_letter_equal(&note("C#2")));
        assert!(!note("C4").is_letter_equal(&note("D4")));
    }

    #[test]
    fn test_up_by_diatonic() {
        assert_eq!(note("C4").up_by(2, 7).unwrap(), note("D4"));
        assert_eq!(note("E4").up_by(1, 7).unwrap(), note("F4"));
        assert_eq!(note("E4").up_by(2, 7).unwrap(), note("F#4"));
        assert_eq!(note("B3").up_by(1, 7).unwrap(), note("C4"));
        assert_eq!(note("F4").up_by(1, 7).unwrap(), note("Gb4"));
        assert_eq!(note("F4").up_by(3, 7).unwrap(), note("G#4"));
        assert_eq!(note("G3").up_by(2, 7).unwrap(), note("A3"));
    }

    #[test]
    fn test_up_by_other_lengths_keeps_letter() {
        assert_eq!(note("C4").up_by(2, 5).unwrap(), note("C##4"));
        assert_eq!(note("C4").up_by(1, 12).unwrap(), note("C#4"));
        assert_eq!(note("B3").up_by(1, 6).unwrap(), note("B#3"));
    }

    #[test]
    fn test_up_by_rejects_bad_steps() {
        assert_eq!(
            note("C4").up_by(0, 7),
            Err(NotationError::InvalidStepSize(0))
        );
        assert_eq!(
            note("C4").up_by(4, 7),
            Err(NotationError::InvalidStepSize(4))
        );
    }

    #[test]
    fn test_octave_returns_after_full_pattern() {
        use Step::*;
        let major = [Whole, Whole, Half, Whole, Whole, Whole, Half];
        for start in ["C4", "F#3", "Bb2", "B3", "Cb5"] {
            let start = note(start);
            let end = major
                .iter()
                .try_fold(start, |n, &step| n.step_up(step, major.len()))
                .unwrap();
            assert_eq!(end.letter(), start.letter());
            assert_eq!(end.accidental(), start.accidental());
            assert_eq!(end.octave(), start.octave() + 1);
        }
    }

    #[test]
    fn test_staff_offset_treble() {
        let clef = treble();
        assert_eq!(note("A3").staff_offset(clef), 1);
        assert_eq!(note("B3").staff_offset(clef), 2);
        assert_eq!(note("C4").staff_offset(clef), 3);
        assert_eq!(note("E4").staff_offset(clef), 5);
        assert_eq!(note("F5").staff_offset(clef), 13);
        assert_eq!(note("C6").staff_offset(clef), 17);
        // Accidentals do not move the note head
        assert_eq!(note("C#4").staff_offset(clef), 3);
    }

    #[test]
    fn test_staff_offset_monotonic() {
        for clef in Clef::all() {
            let mut n = note("C2");
            let mut last = n.staff_offset(clef);
            for _ in 0..30 {
                n = n.step_up(Step::Whole, DIATONIC_LENGTH).unwrap();
                let offset = n.staff_offset(clef);
                assert_eq!(offset, last + 1, "{} on {}", n, clef.name());
                last = offset;
            }
        }
    }

    #[test]
    fn test_note_ordering_follows_height() {
        assert!(note("B3") < note("C4"));
        assert!(note("G3") < note("A3"));
        assert!(note("Cb4") < note("C4"));
        assert!(note("C#4") < note("Db4"));
    }

    #[test]
    fn test_accidental_glyphs() {
        let clef = treble();
        assert_eq!(note("C4").accidental_glyphs(clef, true), vec![Glyph::Natural(3)]);
        assert!(note("C4").accidental_glyphs(clef, false).is_empty());
        assert_eq!(
            note("C##4").accidental_glyphs(clef, false),
            vec![Glyph::Sharp(3), Glyph::Sharp(3)]
        );
        assert_eq!(note("Db4").accidental_glyphs(clef, true), vec![Glyph::Flat(4)]);
    }

    #[test]
    fn test_staff_glyphs_without_key_signature() {
        let clef = treble();
        let none = KeySignature::default();
        assert_eq!(note("C4").staff_glyphs(clef, &none), vec![Glyph::Note(3)]);
        assert_eq!(
            note("F#4").staff_glyphs(clef, &none),
            vec![Glyph::Sharp(6), Glyph::Note(6)]
        );
    }

    #[test]
    fn test_staff_glyphs_with_key_signature() {
        let clef = treble();
        let d_major = KeySignature::new(2).unwrap();
        // F# is implied by the key signature
        assert_eq!(note("F#4").staff_glyphs(clef, &d_major), vec![Glyph::Note(6)]);
        // F natural contradicts it
        assert_eq!(
            note("F4").staff_glyphs(clef, &d_major),
            vec![Glyph::Natural(6), Glyph::Note(6)]
        );
        // G is not covered, so no natural is drawn
        assert_eq!(note("G4").staff_glyphs(clef, &d_major), vec![Glyph::Note(7)]);
    }

    #[test]
    fn test_spelled_form() {
        let none = KeySignature::default();
        assert_eq!(
            note("Eb4").spelled_form(None, &none, false),
            Spelling::Text("Eb".to_string())
        );
        assert_eq!(
            note("Eb4").spelled_form(None, &none, true),
            Spelling::Text("Eb4".to_string())
        );
        assert_eq!(
            note("Eb4").spelled_form(Some(treble()), &none, false),
            Spelling::Staff(vec![Glyph::Flat(5), Glyph::Note(5)])
        );
    }
}
