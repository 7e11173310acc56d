use super::{csv_field, print_json};
use crate::OutputFormat;
use anyhow::Result;
use latchkey_core::{AutofillSettings, CredentialRecord, CredentialStore};
use latchkey_detectors::AutofillEngine;
use serde::Serialize;

/// What search prints; secrets never leave the vault here
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: String,
    pub display_name: String,
    pub username: String,
    pub origin: String,
    pub category: String,
    pub is_favorite: bool,
}

impl From<CredentialRecord> for SearchHit {
    fn from(record: CredentialRecord) -> Self {
        Self {
            id: record.id,
            display_name: record.display_name,
            username: record.username,
            origin: record.origin,
            category: record.category,
            is_favorite: record.is_favorite,
        }
    }
}

pub fn search(
    store: &dyn CredentialStore,
    settings: &AutofillSettings,
    query: Option<&str>,
    url: Option<&str>,
) -> Result<Vec<SearchHit>> {
    let records = AutofillEngine::new(settings).search(store, query, url)?;
    Ok(records.into_iter().map(SearchHit::from).collect())
}

pub fn execute(
    store: &dyn CredentialStore,
    settings: &AutofillSettings,
    query: Option<&str>,
    url: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let hits = search(store, settings, query, url)?;
    tracing::info!("Found {} matching credentials", hits.len());

    match format {
        OutputFormat::Json => print_json(&hits)?,
        OutputFormat::Table => {
            println!("Name,Username,Origin,Category");
            for hit in &hits {
                println!(
                    "{},{},{},{}",
                    csv_field(&hit.display_name),
                    csv_field(&hit.username),
                    csv_field(&hit.origin),
                    csv_field(&hit.category)
                );
            }
        }
        OutputFormat::Pretty => {
            use console::style;

            if hits.is_empty() {
                println!("{}", style("No matching credentials").yellow());
                return Ok(());
            }
            for hit in &hits {
                println!(
                    "{:<20} {:<28} {}",
                    style(&hit.display_name).bold(),
                    style(&hit.username).green(),
                    style(&hit.origin).dim()
                );
            }
        }
    }

    Ok(())
}
