// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Player settings.
//!
//! This module loads, validates and saves the settings that decide which
//! scale types and clefs appear and how far off the staff notes may go.
//! Settings are stored as YAML, or as TOML when the file ends in `.toml`.

pub mod watcher;

pub use watcher::{validate_settings, SettingsEvent, SettingsWatcher};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::generators::{GenerationConstraints, DEFAULT_CLEFS, DEFAULT_SCALE_TYPES};
use crate::music::clef::{LedgerLimits, LEDGER_POSITIONS};
use crate::music::note::LETTERS_PER_OCTAVE;
use crate::music::scale::{CustomScaleDefinition, ScaleRegistry};

/// Settings for scale generation
///
/// Unknown keys are rejected, so a stray YAML file is never mistaken for
/// settings that happen to use every default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Enabled scale type names
    #[serde(default = "default_scale_types")]
    pub scale_types: Vec<String>,
    /// Enabled clef names
    #[serde(default = "default_clefs")]
    pub clefs: Vec<String>,
    /// Most sharps a key signature may carry (0-7)
    #[serde(default = "default_key_signature_limit")]
    pub max_sharps_key_signature: i32,
    /// Most flats a key signature may carry (0-7)
    #[serde(default = "default_key_signature_limit")]
    pub max_flats_key_signature: i32,
    /// Ledger positions allowed above the staff (0-4)
    #[serde(default = "default_ledger_limit")]
    pub max_high_ledger_positions: i32,
    /// Ledger positions allowed below the staff (0-4)
    #[serde(default = "default_ledger_limit")]
    pub max_low_ledger_positions: i32,
    /// Extra scale types
    #[serde(default)]
    pub custom_scales: Vec<CustomScaleDefinition>,
}

fn default_scale_types() -> Vec<String> {
    DEFAULT_SCALE_TYPES.iter().map(|s| s.to_string()).collect()
}
fn default_clefs() -> Vec<String> {
    DEFAULT_CLEFS.iter().map(|s| s.to_string()).collect()
}
fn default_key_signature_limit() -> i32 {
    4
}
fn default_ledger_limit() -> i32 {
    LEDGER_POSITIONS as i32
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale_types: default_scale_types(),
            clefs: default_clefs(),
            max_sharps_key_signature: default_key_signature_limit(),
            max_flats_key_signature: default_key_signature_limit(),
            max_high_ledger_positions: default_ledger_limit(),
            max_low_ledger_positions: default_ledger_limit(),
            custom_scales: Vec::new(),
        }
    }
}

enum Format {
    Yaml,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext == "toml" => Format::Toml,
            _ => Format::Yaml,
        }
    }
}

impl Settings {
    /// Load settings from a YAML or TOML file and validate them
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        let settings = match Format::of(path) {
            Format::Toml => Self::from_toml(&contents)?,
            Format::Yaml => Self::from_yaml(&contents)?,
        };
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Load settings, or use the defaults when the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse and validate settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut settings: Self =
            serde_yaml::from_str(yaml).context("Failed to parse YAML settings")?;
        settings.validate();
        Ok(settings)
    }

    /// Parse and validate settings from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut settings: Self = toml::from_str(text).context("Failed to parse TOML settings")?;
        settings.validate();
        Ok(settings)
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize settings to YAML")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize settings to TOML")
    }

    /// Save settings, choosing the format from the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = match Format::of(path) {
            Format::Toml => self.to_toml()?,
            Format::Yaml => self.to_yaml()?,
        };
        fs::write(path, text).with_context(|| format!("Failed to write settings file: {:?}", path))
    }

    /// Bring every field back into range
    ///
    /// Empty scale type or clef lists become the defaults; limits are clamped.
    pub fn validate(&mut self) {
        if self.scale_types.is_empty() {
            debug!("No scale types enabled, restoring defaults");
            self.scale_types = default_scale_types();
        }
        if self.clefs.is_empty() {
            debug!("No clefs enabled, restoring defaults");
            self.clefs = default_clefs();
        }

        let max_key = LETTERS_PER_OCTAVE as i32;
        self.max_sharps_key_signature = self.max_sharps_key_signature.clamp(0, max_key);
        self.max_flats_key_signature = self.max_flats_key_signature.clamp(0, max_key);

        let max_ledger = LEDGER_POSITIONS as i32;
        self.max_high_ledger_positions = self.max_high_ledger_positions.clamp(0, max_ledger);
        self.max_low_ledger_positions = self.max_low_ledger_positions.clamp(0, max_ledger);
    }

    /// Flip a scale type on or off
    pub fn toggle_scale_type(&mut self, name: &str) {
        toggle(&mut self.scale_types, name);
    }

    /// Flip a clef on or off
    pub fn toggle_clef(&mut self, name: &str) {
        toggle(&mut self.clefs, name);
    }

    /// Allowed ledger positions, clamped
    pub fn ledger_limits(&self) -> LedgerLimits {
        let clamp = |v: i32| v.clamp(0, LEDGER_POSITIONS as i32) as u8;
        LedgerLimits::new(
            clamp(self.max_low_ledger_positions),
            clamp(self.max_high_ledger_positions),
        )
    }

    /// What the generator may choose from
    pub fn constraints(&self) -> GenerationConstraints {
        GenerationConstraints {
            scale_types: self.scale_types.clone(),
            clefs: self.clefs.clone(),
            ledger: self.ledger_limits(),
        }
    }

    /// Built-in scale types plus this file's custom ones
    pub fn registry(&self) -> Result<ScaleRegistry> {
        ScaleRegistry::with_custom(&self.custom_scales).context("Invalid custom scale")
    }
}

fn toggle(list: &mut Vec<String>, name: &str) {
    match list.iter().position(|n| n.eq_ignore_ascii_case(name)) {
        Some(index) => {
            list.remove(index);
        }
        None => list.push(name.to_string()),
    }
}
