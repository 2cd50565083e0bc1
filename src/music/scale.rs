// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale types and concrete scales.
//!
//! A [`ScaleInfo`] is a named step pattern plus the keys it is reasonable to
//! spell it in. A [`Scale`] is one instance of it: a starting note on a clef.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::clef::Clef;
use super::error::{NotationError, Result};
use super::glyph::Glyph;
use super::key_signature::KeySignature;
use super::note::{Note, PitchClass, Step};

/// Half steps in an octave; every pattern must add up to this
pub const OCTAVE_HALF_STEPS: u32 = 12;

/// Octaves a starting note may be written in
pub const START_OCTAVES: std::ops::RangeInclusive<i8> = 0..=8;

/// Which menu a scale type belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleFamily {
    /// Major and the three minor scales
    Standard,
    /// Ionian through Locrian
    ChurchMode,
    /// Loaded from settings
    Custom,
}

impl fmt::Display for ScaleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleFamily::Standard => write!(f, "Standard"),
            ScaleFamily::ChurchMode => write!(f, "Church Mode"),
            ScaleFamily::Custom => write!(f, "Custom"),
        }
    }
}

/// Parse a pattern string such as `"WWHWWWH"`
pub fn parse_pattern(pattern: &str) -> Result<Vec<Step>> {
    pattern
        .chars()
        .map(|c| {
            Step::from_char(c).ok_or_else(|| NotationError::InvalidPatternStep {
                pattern: pattern.to_string(),
                step: c,
            })
        })
        .collect()
}

/// Half-step values for a typed guess: `H` = 1, `W` = 2, `3` = 3, anything else 0
pub fn guess_values(guess: &str) -> Vec<u8> {
    guess
        .chars()
        .map(|c| Step::from_char(c).map_or(0, Step::half_steps))
        .collect()
}

/// Render steps back into pattern characters
pub fn pattern_string(steps: &[Step]) -> String {
    steps.iter().map(|s| s.as_char()).collect()
}

/// A type of scale: name, step pattern and sensible starting pitch classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleInfo {
    name: String,
    family: ScaleFamily,
    pattern: Vec<Step>,
    valid_starts: Vec<PitchClass>,
}

impl ScaleInfo {
    /// Create a scale type, checking that the pattern spans exactly one octave
    pub fn new(
        name: impl Into<String>,
        family: ScaleFamily,
        pattern: Vec<Step>,
        valid_starts: Vec<PitchClass>,
    ) -> Result<Self> {
        let name = name.into();
        let half_steps: u32 = pattern.iter().map(|s| s.half_steps() as u32).sum();
        if half_steps != OCTAVE_HALF_STEPS {
            return Err(NotationError::InvalidScaleSize { name, half_steps });
        }
        Ok(Self {
            name,
            family,
            pattern,
            valid_starts,
        })
    }

    /// Create a scale type from a pattern string and starting pitch class names
    pub fn parse<S: AsRef<str>>(
        name: impl Into<String>,
        family: ScaleFamily,
        pattern: &str,
        starts: &[S],
    ) -> Result<Self> {
        let steps = parse_pattern(pattern)?;
        let starts = starts
            .iter()
            .map(|s| PitchClass::parse(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(name, family, steps, starts)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> ScaleFamily {
        self.family
    }

    pub fn pattern(&self) -> &[Step] {
        &self.pattern
    }

    /// Number of steps in the pattern (the octave note is not counted)
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    pub fn valid_starts(&self) -> &[PitchClass] {
        &self.valid_starts
    }

    /// The pattern as `H`/`W`/`3` characters
    pub fn pattern_string(&self) -> String {
        pattern_string(&self.pattern)
    }

    /// Every starting note across the usable octaves
    pub fn possible_starts(&self) -> impl Iterator<Item = Note> + '_ {
        START_OCTAVES.flat_map(move |octave| {
            self.valid_starts.iter().map(move |pc| pc.at_octave(octave))
        })
    }

    /// Whether a scale of this type may start on `note`
    pub fn accepts_start(&self, note: &Note) -> bool {
        START_OCTAVES.contains(&note.octave()) && self.valid_starts.contains(&note.pitch_class())
    }

    /// Exact comparison of a typed guess against this pattern
    pub fn matches(&self, guess: &str) -> bool {
        let values = guess_values(guess);
        values.len() == self.pattern.len()
            && values
                .iter()
                .zip(&self.pattern)
                .all(|(&v, s)| v == s.half_steps())
    }
}

/// A scale type loaded from settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CustomScaleDefinition {
    /// Name shown to the player
    pub name: String,
    /// Step pattern, e.g. "WHWHWHWH"
    pub pattern: String,
    /// Pitch classes the scale may start on, e.g. ["C", "F#"]
    pub starts: Vec<String>,
}

impl CustomScaleDefinition {
    /// Validate and convert into a scale type
    pub fn to_scale_info(&self) -> Result<ScaleInfo> {
        ScaleInfo::parse(
            self.name.clone(),
            ScaleFamily::Custom,
            &self.pattern,
            self.starts.as_slice(),
        )
    }
}

const FLATS_7_MAJOR: [&str; 15] = [
    "Cb", "Gb", "Db", "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#",
];
const FLATS_7_MINOR: [&str; 15] = [
    "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#", "G#", "D#", "A#",
];
const FLATS_7_DORIAN: [&str; 15] = [
    "Db", "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#", "G#", "D#",
];
const FLATS_7_PHRYGIAN: [&str; 15] = [
    "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#", "G#", "D#", "A#", "E#",
];
const FLATS_7_LYDIAN: [&str; 15] = [
    "Fb", "Cb", "Gb", "Db", "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#",
];
const FLATS_7_MIXOLYDIAN: [&str; 15] = [
    "Gb", "Db", "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#", "G#",
];
const FLATS_7_LOCRIAN: [&str; 15] = [
    "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#", "G#", "D#", "A#", "E#", "B#",
];

/// Built-in scale types in menu order
const BUILTIN_SCALES: [(&str, ScaleFamily, &str, &[&str; 15]); 11] = [
    ("Major", ScaleFamily::Standard, "WWHWWWH", &FLATS_7_MAJOR),
    ("Natural Minor", ScaleFamily::Standard, "WHWWHWW", &FLATS_7_MINOR),
    ("Harmonic Minor", ScaleFamily::Standard, "WHWWH3H", &FLATS_7_MINOR),
    ("Melodic Minor", ScaleFamily::Standard, "WHWWWWH", &FLATS_7_MINOR),
    ("Ionian", ScaleFamily::ChurchMode, "WWHWWWH", &FLATS_7_MAJOR),
    ("Dorian", ScaleFamily::ChurchMode, "WHWWWHW", &FLATS_7_DORIAN),
    ("Phrygian", ScaleFamily::ChurchMode, "HWWWHWW", &FLATS_7_PHRYGIAN),
    ("Lydian", ScaleFamily::ChurchMode, "WWWHWWH", &FLATS_7_LYDIAN),
    ("Mixolydian", ScaleFamily::ChurchMode, "WWHWWHW", &FLATS_7_MIXOLYDIAN),
    ("Aeolian", ScaleFamily::ChurchMode, "WHWWHWW", &FLATS_7_MINOR),
    ("Locrian", ScaleFamily::ChurchMode, "HWWHWWW", &FLATS_7_LOCRIAN),
];

static BUILTIN_REGISTRY: Lazy<ScaleRegistry> = Lazy::new(|| {
    ScaleRegistry::from_table(&BUILTIN_SCALES).expect("built-in scale table is valid")
});

/// Ordered collection of scale types, looked up by name
#[derive(Debug, Clone, Default)]
pub struct ScaleRegistry {
    scales: Vec<Arc<ScaleInfo>>,
}

impl ScaleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in scale types
    pub fn builtin() -> Self {
        BUILTIN_REGISTRY.clone()
    }

    /// Built-in scale types followed by the given custom definitions
    pub fn with_custom(definitions: &[CustomScaleDefinition]) -> Result<Self> {
        let mut registry = Self::builtin();
        for def in definitions {
            registry.register_custom(def)?;
        }
        Ok(registry)
    }

    fn from_table(table: &[(&str, ScaleFamily, &str, &[&str; 15])]) -> Result<Self> {
        let mut registry = Self::new();
        for (name, family, pattern, starts) in table {
            registry.register(ScaleInfo::parse(*name, *family, pattern, &starts[..])?);
        }
        Ok(registry)
    }

    /// Add a scale type, replacing any existing one with the same name
    pub fn register(&mut self, info: ScaleInfo) {
        let info = Arc::new(info);
        match self
            .scales
            .iter_mut()
            .find(|s| s.name().eq_ignore_ascii_case(info.name()))
        {
            Some(slot) => *slot = info,
            None => self.scales.push(info),
        }
    }

    /// Validate and add a custom scale type
    pub fn register_custom(&mut self, def: &CustomScaleDefinition) -> Result<()> {
        self.register(def.to_scale_info()?);
        Ok(())
    }

    /// Find a scale type by name, ignoring case
    pub fn get(&self, name: &str) -> Option<Arc<ScaleInfo>> {
        let name = name.trim();
        self.scales
            .iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Like [`ScaleRegistry::get`], but reports unknown names as an error
    pub fn lookup(&self, name: &str) -> Result<Arc<ScaleInfo>> {
        self.get(name)
            .ok_or_else(|| NotationError::UnknownScaleType(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ScaleInfo>> {
        self.scales.iter()
    }

    /// Scale types of one family, in registry order
    pub fn family(&self, family: ScaleFamily) -> impl Iterator<Item = &Arc<ScaleInfo>> {
        self.scales.iter().filter(move |s| s.family() == family)
    }

    /// Names of every registered scale type
    pub fn names(&self) -> Vec<String> {
        self.scales.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }
}

/// A concrete scale: a scale type started on a note, written on a clef
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    info: Arc<ScaleInfo>,
    notes: Vec<Note>,
    clef: &'static Clef,
    key_signature: KeySignature,
}

impl Scale {
    /// Create a scale with no key signature
    ///
    /// Every note is spelled up front, so a start whose accidentals would
    /// overflow is rejected here.
    pub fn new(info: Arc<ScaleInfo>, starting_note: Note, clef: &'static Clef) -> Result<Self> {
        let length = info.len();
        let mut notes = Vec::with_capacity(length + 1);
        let mut current = starting_note;
        notes.push(current);
        for &step in info.pattern() {
            current = current.step_up(step, length)?;
            notes.push(current);
        }
        Ok(Self {
            info,
            notes,
            clef,
            key_signature: KeySignature::default(),
        })
    }

    /// Build a scale from a scale type name, starting note and clef name
    pub fn parse(
        registry: &ScaleRegistry,
        scale_type: &str,
        starting_note: &str,
        clef: &str,
    ) -> Result<Self> {
        let info = registry.lookup(scale_type)?;
        let starting_note = Note::parse(starting_note)?;
        let clef = Clef::lookup(clef)?;
        Self::new(info, starting_note, clef)
    }

    /// Write the scale against a key signature
    pub fn with_key_signature(mut self, key_signature: KeySignature) -> Self {
        self.key_signature = key_signature;
        self
    }

    pub fn info(&self) -> &ScaleInfo {
        &self.info
    }

    /// Name of the scale type
    pub fn name(&self) -> &str {
        self.info.name()
    }

    pub fn pattern(&self) -> &[Step] {
        self.info.pattern()
    }

    pub fn starting_note(&self) -> Note {
        self.notes[0]
    }

    pub fn clef(&self) -> &'static Clef {
        self.clef
    }

    pub fn key_signature(&self) -> KeySignature {
        self.key_signature
    }

    /// Notes of the scale from the start up to and including the octave
    pub fn notes_in_order(&self) -> Vec<Note> {
        self.notes.clone()
    }

    /// Borrowed form of [`Scale::notes_in_order`]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Clef symbol followed by each note's accidental and note head glyphs
    pub fn glyphs(&self) -> Vec<Glyph> {
        let mut glyphs = vec![self.clef.glyph()];
        for note in &self.notes {
            glyphs.extend(note.staff_glyphs(self.clef, &self.key_signature));
        }
        glyphs
    }

    /// Plain text names of the notes in order
    pub fn labels(&self, show_octave: bool) -> Vec<String> {
        self.notes
            .iter()
            .map(|n| n.label(show_octave))
            .collect()
    }

    /// The pattern as `H`/`W`/`3` characters
    pub fn pattern_string(&self) -> String {
        self.info.pattern_string()
    }

    /// Whether a typed pattern matches this scale's pattern exactly
    pub fn verify(&self, guess: &str) -> bool {
        self.info.matches(guess)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels(false).join(" "))
    }
}
