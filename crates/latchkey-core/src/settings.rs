//! User-tunable autofill settings

use crate::origin::HostPattern;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Longest password the generator will produce
pub const MAX_PASSWORD_LENGTH: usize = 1024;

/// Options for generated passwords
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub numbers: bool,
    pub symbols: bool,
    /// Leave out look-alike characters (i, l, o, 0, 1, ...)
    pub exclude_similar: bool,
}

impl GeneratorOptions {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PASSWORD_LENGTH).contains(&self.length) {
            return Err(Error::InvalidRecord(format!(
                "Password length must be between 1 and {}, got {}",
                MAX_PASSWORD_LENGTH, self.length
            )));
        }
        Ok(())
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: 16,
            uppercase: true,
            lowercase: true,
            numbers: true,
            symbols: true,
            exclude_similar: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutofillSettings {
    /// Minimum form score before suggestions are offered
    pub confidence_threshold: f64,
    pub max_suggestions: usize,
    /// Pixel radius for pairing formless username and password fields
    pub formless_max_distance: f64,
    pub auto_lock_minutes: u64,
    /// Hosts (exact or glob) that never get a save prompt
    pub never_save: Vec<String>,
    pub generator: GeneratorOptions,
}

impl Default for AutofillSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.7,
            max_suggestions: 5,
            formless_max_distance: 200.0,
            auto_lock_minutes: 15,
            never_save: Vec::new(),
            generator: GeneratorOptions::default(),
        }
    }
}

impl AutofillSettings {
    /// Default settings location under the user's config directory
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Store("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("latchkey").join("settings.json"))
    }

    /// Load settings from a file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: AutofillSettings = serde_json::from_str(&content)?;
        settings.validate()?;

        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::InvalidRecord(format!(
                "confidence_threshold must be between 0 and 1, got {}",
                self.confidence_threshold
            )));
        }
        if self.max_suggestions == 0 {
            return Err(Error::InvalidRecord(
                "max_suggestions must be at least 1".to_string(),
            ));
        }
        self.generator.validate()?;
        for pattern in &self.never_save {
            HostPattern::parse(pattern)?;
        }
        Ok(())
    }

    /// Parsed never-save patterns; invalid entries are skipped
    pub fn never_save_patterns(&self) -> Vec<HostPattern> {
        self.never_save
            .iter()
            .filter_map(|p| match HostPattern::parse(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!("Ignoring never-save entry: {}", e);
                    None
                }
            })
            .collect()
    }

    pub fn is_never_save(&self, origin: &str) -> bool {
        self.never_save_patterns()
            .iter()
            .any(|pattern| pattern.matches(origin))
    }

    /// Add a host to the never-save list; returns false if already present
    pub fn add_never_save(&mut self, host: &str) -> Result<bool> {
        let pattern = HostPattern::parse(host)?;
        let entry = pattern.as_str().to_string();

        if self.never_save.iter().any(|existing| *existing == entry) {
            return Ok(false);
        }

        self.never_save.push(entry);
        Ok(true)
    }
}
