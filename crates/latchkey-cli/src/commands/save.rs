use super::print_json;
use crate::OutputFormat;
use anyhow::Result;
use chrono::Utc;
use latchkey_core::{AutofillSettings, CredentialStore, PageSnapshot};
use latchkey_detectors::{AutofillEngine, SaveOutcome};
use std::path::Path;

/// Save the values entered in a submitted page snapshot
pub fn save_page(
    file: &Path,
    store: &mut dyn CredentialStore,
    settings: &AutofillSettings,
) -> Result<SaveOutcome> {
    let page = PageSnapshot::from_file(file)?;
    Ok(AutofillEngine::new(settings).save(&page, store, Utc::now())?)
}

pub fn execute(
    file: &Path,
    store: &mut dyn CredentialStore,
    settings: &AutofillSettings,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Saving submitted credentials from {}", file.display());
    let outcome = save_page(file, store, settings)?;

    match format {
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Table => match &outcome {
            SaveOutcome::Saved { id, outcome } => println!("saved,{},{:?}", id, outcome),
            SaveOutcome::Incomplete => println!("incomplete,,"),
            SaveOutcome::Suppressed => println!("suppressed,,"),
        },
        OutputFormat::Pretty => {
            use console::style;

            match &outcome {
                SaveOutcome::Saved { id, outcome } => println!(
                    "{} Credential {} ({:?})",
                    style("[OK]").green(),
                    id,
                    outcome
                ),
                SaveOutcome::Incomplete => println!(
                    "{} No username and password found in the submitted fields",
                    style("[WARN]").yellow()
                ),
                SaveOutcome::Suppressed => println!(
                    "{} This site is on the never-save list",
                    style("[INFO]").dim()
                ),
            }
        }
    }

    Ok(())
}
