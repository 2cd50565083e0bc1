// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music notation engine.
//!
//! This module provides spelled notes, key signatures, clefs and scale
//! types, and works out how each note of a scale is written on a staff.

pub mod clef;
pub mod error;
pub mod glyph;
pub mod key_signature;
pub mod note;
pub mod scale;

pub use clef::{Clef, LedgerLimits, CLEFS};
pub use error::NotationError;
pub use glyph::{render_glyphs, Glyph};
pub use key_signature::KeySignature;
pub use note::{Letter, Note, PitchClass, Spelling, Step};
pub use scale::{CustomScaleDefinition, Scale, ScaleFamily, ScaleInfo, ScaleRegistry};
