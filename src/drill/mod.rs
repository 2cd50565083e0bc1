// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Rounds and scoring.
//!
//! Each round shows one scale. Naming its pattern correctly scores the
//! round's current value; every wrong guess halves that value. A round the
//! player never solves costs a fixed penalty.

use tracing::debug;

use crate::music::error::Result;
use crate::music::scale::{Scale, ScaleRegistry};

/// Points a round is worth before any wrong guesses
pub const DEFAULT_ROUND_VALUE: f64 = 10.0;

/// Score change for a round that was never solved
pub const FAILED_ROUND_PENALTY: f64 = -10.0;

/// Result of one guess
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuessOutcome {
    /// The pattern matched; the round pays out its value
    Correct { awarded: f64 },
    /// The pattern did not match; the round is now worth less
    Incorrect { remaining: f64 },
}

impl GuessOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, GuessOutcome::Correct { .. })
    }
}

/// One scale waiting to be identified
#[derive(Debug, Clone)]
pub struct Round {
    scale: Scale,
    value: f64,
    attempts: u32,
}

impl Round {
    /// Create a round worth [`DEFAULT_ROUND_VALUE`]
    pub fn new(scale: Scale) -> Self {
        Self::with_value(scale, DEFAULT_ROUND_VALUE)
    }

    pub fn with_value(scale: Scale, value: f64) -> Self {
        Self {
            scale,
            value,
            attempts: 0,
        }
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    /// Points currently on offer
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Number of guesses made so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Guess the scale's pattern, e.g. `"WWHWWWH"`
    pub fn guess(&mut self, pattern: &str) -> GuessOutcome {
        self.attempts += 1;
        if self.scale.verify(pattern) {
            debug!("Guess {} correct after {} attempts", pattern, self.attempts);
            GuessOutcome::Correct {
                awarded: self.value,
            }
        } else {
            self.value *= 0.5;
            debug!("Guess {} wrong, round now worth {}", pattern, self.value);
            GuessOutcome::Incorrect {
                remaining: self.value,
            }
        }
    }

    /// Guess by scale type name; the named type's pattern is what gets compared
    ///
    /// Scale types sharing a pattern (Major and Ionian) are equally correct.
    pub fn guess_scale_type(&mut self, registry: &ScaleRegistry, name: &str) -> Result<GuessOutcome> {
        let info = registry.lookup(name)?;
        Ok(self.guess(&info.pattern_string()))
    }
}

/// Running score across rounds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBoard {
    score: f64,
    solved: u32,
    failed: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn solved(&self) -> u32 {
        self.solved
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }

    /// Add the points from a guess
    pub fn record(&mut self, outcome: GuessOutcome) {
        if let GuessOutcome::Correct { awarded } = outcome {
            self.score += awarded;
            self.solved += 1;
        }
    }

    /// Apply the penalty for a round that ran out unsolved
    pub fn record_failure(&mut self) {
        self.score += FAILED_ROUND_PENALTY;
        self.failed += 1;
    }
}
