// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale drill library
//!
//! Spells scales on a staff and picks random ones for a sight-reading quiz.
//!
//! - [`music`]: notes, key signatures, clefs, scale types and staff glyphs
//! - [`generators`]: random scale selection within the player's settings
//! - [`drill`]: guessing rounds and scoring
//! - [`config`]: settings files and hot reload

pub mod config;
pub mod drill;
pub mod generators;
pub mod music;
