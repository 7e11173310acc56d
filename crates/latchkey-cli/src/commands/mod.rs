pub mod classify;
pub mod completion;
pub mod detect;
pub mod generate;
pub mod imports;
pub mod matching;
pub mod never_save;
pub mod save;
pub mod search;
pub mod serve;
pub mod strength;
pub mod suggest;

use anyhow::Result;
use latchkey_core::{AutofillSettings, JsonFileStore};
use std::path::PathBuf;

/// Where the vault and the settings file live
#[derive(Debug, Clone)]
pub struct Locations {
    pub vault: PathBuf,
    pub settings: PathBuf,
}

impl Locations {
    /// Use the given paths, falling back to the per-user defaults
    pub fn resolve(vault: Option<PathBuf>, settings: Option<PathBuf>) -> Result<Self> {
        let vault = match vault {
            Some(path) => path,
            None => JsonFileStore::default_path()?,
        };
        let settings = match settings {
            Some(path) => path,
            None => AutofillSettings::default_path()?,
        };

        tracing::debug!(
            "Using vault {} and settings {}",
            vault.display(),
            settings.display()
        );
        Ok(Self { vault, settings })
    }

    pub fn load_settings(&self) -> Result<AutofillSettings> {
        Ok(AutofillSettings::load(&self.settings)?)
    }

    pub fn open_store(&self) -> Result<JsonFileStore> {
        Ok(JsonFileStore::open(&self.vault)?)
    }
}

/// Print any serializable value as pretty JSON on stdout
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Quote a value for CSV-style table output
pub(crate) fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
