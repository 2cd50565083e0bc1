// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Random scale generation within the player's settings.
//!
//! A round picks a scale type, then a clef, then a starting note, each
//! uniformly from what the settings allow. The random source is always
//! passed in so that seeded runs repeat exactly.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::music::clef::{Clef, LedgerLimits};
use crate::music::error::{NotationError, Result};
use crate::music::note::Note;
use crate::music::scale::{Scale, ScaleInfo, ScaleRegistry};

/// Scale types enabled when the settings enable none
pub const DEFAULT_SCALE_TYPES: [&str; 4] =
    ["Major", "Natural Minor", "Harmonic Minor", "Melodic Minor"];

/// Clefs enabled when the settings enable none
pub const DEFAULT_CLEFS: [&str; 2] = ["Treble", "Bass"];

/// What the player has enabled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConstraints {
    /// Enabled scale type names
    pub scale_types: Vec<String>,
    /// Enabled clef names
    pub clefs: Vec<String>,
    /// Ledger positions allowed below and above the staff
    pub ledger: LedgerLimits,
}

impl Default for GenerationConstraints {
    fn default() -> Self {
        Self {
            scale_types: DEFAULT_SCALE_TYPES.iter().map(|s| s.to_string()).collect(),
            clefs: DEFAULT_CLEFS.iter().map(|s| s.to_string()).collect(),
            ledger: LedgerLimits::default(),
        }
    }
}

fn is_enabled(enabled: &[String], name: &str) -> bool {
    enabled.iter().any(|e| e.trim().eq_ignore_ascii_case(name))
}

/// Registered scale types the constraints enable, in registry order
///
/// Falls back to the default scale types when nothing enabled is registered.
pub fn enabled_scale_types(
    registry: &ScaleRegistry,
    constraints: &GenerationConstraints,
) -> Vec<Arc<ScaleInfo>> {
    let enabled: Vec<_> = registry
        .iter()
        .filter(|s| is_enabled(&constraints.scale_types, s.name()))
        .cloned()
        .collect();
    if !enabled.is_empty() {
        return enabled;
    }

    warn!(
        "No known scale types enabled in {:?}, using defaults",
        constraints.scale_types
    );
    DEFAULT_SCALE_TYPES
        .iter()
        .filter_map(|name| registry.get(name))
        .collect()
}

/// Clefs the constraints enable, in table order
///
/// Falls back to the default clefs when no enabled name is a known clef.
pub fn enabled_clefs(constraints: &GenerationConstraints) -> Vec<&'static Clef> {
    let enabled: Vec<_> = Clef::all()
        .iter()
        .filter(|c| is_enabled(&constraints.clefs, c.name()))
        .collect();
    if !enabled.is_empty() {
        return enabled;
    }

    warn!("No known clefs enabled in {:?}, using defaults", constraints.clefs);
    DEFAULT_CLEFS
        .iter()
        .filter_map(|name| Clef::by_name(name))
        .collect()
}

/// Starting notes for a scale type on a clef: its valid starts that the clef can show
pub fn starting_notes(info: &ScaleInfo, clef: &Clef, ledger: LedgerLimits) -> Vec<Note> {
    clef.all_playable_notes(ledger)
        .into_iter()
        .filter(|n| info.accepts_start(n))
        .collect()
}

/// Pick a random scale within the constraints
///
/// Fails with [`NotationError::NoValidStart`] when the chosen scale type has
/// no starting note on the chosen clef; the caller decides whether to relax
/// the constraints or try again.
pub fn generate_scale<R: Rng + ?Sized>(
    rng: &mut R,
    registry: &ScaleRegistry,
    constraints: &GenerationConstraints,
) -> Result<Scale> {
    let scale_types = enabled_scale_types(registry, constraints);
    let info = scale_types
        .choose(rng)
        .cloned()
        .ok_or_else(|| NotationError::UnknownScaleType(constraints.scale_types.join(", ")))?;

    let clefs = enabled_clefs(constraints);
    let clef = *clefs
        .choose(rng)
        .ok_or_else(|| NotationError::UnknownClef(constraints.clefs.join(", ")))?;

    let starts = starting_notes(&info, clef, constraints.ledger);
    let start = *starts.choose(rng).ok_or_else(|| NotationError::NoValidStart {
        scale_type: info.name().to_string(),
        clef: clef.name().to_string(),
    })?;

    debug!(
        "Generated {} on {} starting at {} ({} candidates)",
        info.name(),
        clef.name(),
        start,
        starts.len()
    );
    Scale::new(info, start, clef)
}

/// Scale generator owning its registry and random source
#[derive(Debug, Clone)]
pub struct ScaleGenerator {
    registry: ScaleRegistry,
    rng: StdRng,
}

impl ScaleGenerator {
    /// Create a generator seeded from the operating system
    pub fn new(registry: ScaleRegistry) -> Self {
        Self {
            registry,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a generator whose output is fixed by `seed`
    pub fn with_seed(registry: ScaleRegistry, seed: u64) -> Self {
        Self {
            registry,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn registry(&self) -> &ScaleRegistry {
        &self.registry
    }

    /// Generate the next scale
    pub fn generate(&mut self, constraints: &GenerationConstraints) -> Result<Scale> {
        generate_scale(&mut self.rng, &self.registry, constraints)
    }
}

impl Default for ScaleGenerator {
    fn default() -> Self {
        Self::new(ScaleRegistry::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::scale::{CustomScaleDefinition, ScaleFamily};

    fn constraints(scale_types: &[&str], clefs: &[&str], ledger: LedgerLimits) -> GenerationConstraints {
        GenerationConstraints {
            scale_types: scale_types.iter().map(|s| s.to_string()).collect(),
            clefs: clefs.iter().map(|s| s.to_string()).collect(),
            ledger,
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let c = GenerationConstraints::default();
        let mut a = ScaleGenerator::with_seed(ScaleRegistry::builtin(), 42);
        let mut b = ScaleGenerator::with_seed(ScaleRegistry::builtin(), 42);
        for _ in 0..20 {
            assert_eq!(a.generate(&c).unwrap(), b.generate(&c).unwrap());
        }
    }

    #[test]
    fn test_generation_respects_constraints() {
        let registry = ScaleRegistry::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let c = constraints(&["Dorian", "Lydian"], &["Alto"], LedgerLimits::new(1, 0));
        let alto = Clef::by_name("Alto").unwrap();
        let playable = alto.all_playable_notes(c.ledger);

        for _ in 0..200 {
            let scale = generate_scale(&mut rng, &registry, &c).unwrap();
            assert!(["Dorian", "Lydian"].contains(&scale.name()));
            assert_eq!(scale.clef().name(), "Alto");
            assert!(playable.contains(&scale.starting_note()));
            assert!(scale.info().accepts_start(&scale.starting_note()));
        }
    }

    #[test]
    fn test_every_enabled_choice_appears() {
        let registry = ScaleRegistry::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let c = GenerationConstraints::default();
        let mut names = std::collections::HashSet::new();
        let mut clefs = std::collections::HashSet::new();
        for _ in 0..400 {
            let scale = generate_scale(&mut rng, &registry, &c).unwrap();
            names.insert(scale.name().to_string());
            clefs.insert(scale.clef().name());
        }
        assert_eq!(names.len(), 4);
        assert_eq!(clefs.len(), 2);
    }

    #[test]
    fn test_unknown_names_fall_back_to_defaults() {
        let registry = ScaleRegistry::builtin();
        let c = constraints(&["Bebop"], &["Banjo"], LedgerLimits::default());

        let types: Vec<_> = enabled_scale_types(&registry, &c)
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(types, DEFAULT_SCALE_TYPES.to_vec());

        let clefs: Vec<_> = enabled_clefs(&c).iter().map(|c| c.name()).collect();
        assert_eq!(clefs, DEFAULT_CLEFS.to_vec());
    }

    #[test]
    fn test_names_match_ignoring_case() {
        let registry = ScaleRegistry::builtin();
        let c = constraints(&["harmonic minor"], &["TENOR"], LedgerLimits::default());
        assert_eq!(enabled_scale_types(&registry, &c)[0].name(), "Harmonic Minor");
        assert_eq!(enabled_clefs(&c)[0].name(), "Tenor");
    }

    #[test]
    fn test_no_valid_start() {
        let defs = vec![CustomScaleDefinition {
            name: "Only C".to_string(),
            pattern: "WWHWWWH".to_string(),
            starts: vec!["C".to_string()],
        }];
        let registry = ScaleRegistry::with_custom(&defs).unwrap();
        // Without ledger positions, treble starts are limited to E and F
        let c = constraints(&["Only C"], &["Treble"], LedgerLimits::none());
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            generate_scale(&mut rng, &registry, &c),
            Err(NotationError::NoValidStart {
                scale_type: "Only C".to_string(),
                clef: "Treble".to_string(),
            })
        );
    }

    #[test]
    fn test_starting_notes_intersection() {
        let registry = ScaleRegistry::builtin();
        let major = registry.get("Major").unwrap();
        let treble = Clef::by_name("Treble").unwrap();
        let starts = starting_notes(&major, treble, LedgerLimits::none());
        let labels: Vec<_> = starts.iter().map(|n| n.to_string()).collect();
        assert_eq!(labels, vec!["Eb4", "E4", "F4", "F#4"]);
    }

    #[test]
    fn test_custom_family_generation() {
        let defs = vec![CustomScaleDefinition {
            name: "Whole Tone".to_string(),
            pattern: "WWWWWW".to_string(),
            starts: vec!["C".to_string(), "Db".to_string()],
        }];
        let mut generator =
            ScaleGenerator::with_seed(ScaleRegistry::with_custom(&defs).unwrap(), 9);
        let c = constraints(&["Whole Tone"], &["Bass"], LedgerLimits::default());
        let scale = generator.generate(&c).unwrap();
        assert_eq!(scale.info().family(), ScaleFamily::Custom);
        assert_eq!(scale.notes_in_order().len(), 7);
    }
}
