// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Key signatures counted in sharps or flats.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{NotationError, Result};
use super::note::{Letter, Note, LETTERS_PER_OCTAVE};

/// Order in which sharps are added; flats use the reverse
pub const ORDER_OF_SHARPS: [Letter; 7] = [
    Letter::F,
    Letter::C,
    Letter::G,
    Letter::D,
    Letter::A,
    Letter::E,
    Letter::B,
];

/// Number of sharps (positive) or flats (negative) in a key signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawKeySignature")]
pub struct KeySignature {
    count: i8,
}

/// Unchecked form read from settings files
#[derive(Deserialize)]
struct RawKeySignature {
    count: i8,
}

impl TryFrom<RawKeySignature> for KeySignature {
    type Error = NotationError;

    fn try_from(raw: RawKeySignature) -> Result<Self> {
        KeySignature::new(raw.count)
    }
}

impl KeySignature {
    /// Create a key signature with `count` sharps (positive) or flats (negative)
    pub fn new(count: i8) -> Result<Self> {
        if count.unsigned_abs() as usize > LETTERS_PER_OCTAVE {
            return Err(NotationError::InvalidKeySignature(count));
        }
        Ok(Self { count })
    }

    pub fn count(&self) -> i8 {
        self.count
    }

    pub fn is_sharps(&self) -> bool {
        self.count > 0
    }

    pub fn is_flats(&self) -> bool {
        self.count < 0
    }

    /// Letters carrying an accidental in this key signature, in the order they are written
    pub fn letters(&self) -> Vec<Letter> {
        let n = self.count.unsigned_abs() as usize;
        if self.is_flats() {
            ORDER_OF_SHARPS.iter().rev().take(n).copied().collect()
        } else {
            ORDER_OF_SHARPS[..n].to_vec()
        }
    }

    /// Whether the key signature puts an accidental on this letter
    pub fn contains(&self, letter: Letter) -> bool {
        let n = self.count.unsigned_abs() as usize;
        if self.is_flats() {
            ORDER_OF_SHARPS[LETTERS_PER_OCTAVE - n..].contains(&letter)
        } else {
            ORDER_OF_SHARPS[..n].contains(&letter)
        }
    }

    /// Whether the note's accidental is of a different kind than the key signature's
    ///
    /// Only meaningful for letters the key signature covers; anything else is
    /// rejected with [`NotationError::NoteNotInKeySignature`].
    pub fn accidental_differs(&self, note: &Note) -> Result<bool> {
        if !self.contains(note.letter()) {
            return Err(NotationError::NoteNotInKeySignature {
                note: note.to_string(),
                key_signature: self.count,
            });
        }
        Ok(self.sign_differs(note))
    }

    pub(crate) fn sign_differs(&self, note: &Note) -> bool {
        note.accidental().signum() != self.count.signum()
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.count {
            0 => write!(f, "no sharps or flats"),
            1 => write!(f, "1 sharp"),
            -1 => write!(f, "1 flat"),
            n if n > 0 => write!(f, "{} sharps", n),
            n => write!(f, "{} flats", -n),
        }
    }
}
