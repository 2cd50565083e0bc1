// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for the notation engine.

use thiserror::Error;

/// Errors produced while parsing, spelling, building or generating scales
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    /// Note string does not start with a letter A-G
    #[error("Invalid note letter in {0:?}")]
    InvalidNoteLetter(String),

    /// Note string does not end with a single octave digit
    #[error("Invalid octave in {0:?}")]
    InvalidOctave(String),

    /// Something other than `#` or `b` between the letter and the octave
    #[error("Invalid accidental {accidental:?} in {note:?}")]
    InvalidAccidental { note: String, accidental: char },

    /// More sharps or flats than a note can hold
    #[error("Too many accidentals in {0:?}")]
    TooManyAccidentals(String),

    /// Stepping up would take the note past the representable accidentals or octaves
    #[error("Note {0} cannot be raised any further")]
    NoteOutOfRange(String),

    /// A scale step must be 1, 2 or 3 half steps
    #[error("Invalid step size: {0} half steps")]
    InvalidStepSize(u8),

    /// A pattern character other than `H`, `W` or `3`
    #[error("Invalid step {step:?} in pattern {pattern:?}")]
    InvalidPatternStep { pattern: String, step: char },

    /// The steps of a scale pattern do not add up to an octave
    #[error("Scale {name:?} spans {half_steps} half steps, expected 12")]
    InvalidScaleSize { name: String, half_steps: u32 },

    /// Key signatures hold at most seven sharps or flats
    #[error("Invalid key signature: {0}")]
    InvalidKeySignature(i8),

    /// Accidental comparison requested for a letter the key signature does not cover
    #[error("Note {note} is not affected by key signature {key_signature}")]
    NoteNotInKeySignature { note: String, key_signature: i8 },

    /// No scale type with this name is registered
    #[error("Unknown scale type: {0}")]
    UnknownScaleType(String),

    /// No clef with this name exists
    #[error("Unknown clef: {0}")]
    UnknownClef(String),

    /// The chosen scale type has no starting note on the chosen clef
    #[error("No valid starting note for {scale_type} on {clef} clef")]
    NoValidStart { scale_type: String, clef: String },
}

/// Result alias for notation operations
pub type Result<T> = std::result::Result<T, NotationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = NotationError::InvalidStepSize(4);
        assert_eq!(err.to_string(), "Invalid step size: 4 half steps");

        let err = NotationError::NoValidStart {
            scale_type: "Major".to_string(),
            clef: "Treble".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No valid starting note for Major on Treble clef"
        );
    }
}
