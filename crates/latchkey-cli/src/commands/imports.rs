use super::search::SearchHit;
use super::{csv_field, print_json};
use crate::OutputFormat;
use anyhow::Result;
use latchkey_core::{CredentialRecord, CredentialStore};

/// Credentials waiting to be imported, optionally clearing the queue
pub fn pending(store: &mut dyn CredentialStore, clear: bool) -> Result<Vec<CredentialRecord>> {
    let records = if clear {
        store.take_pending_imports()?
    } else {
        store.pending_imports()?
    };

    tracing::info!(
        "{} credentials pending import{}",
        records.len(),
        if clear { " (cleared)" } else { "" }
    );
    Ok(records)
}

pub fn execute(store: &mut dyn CredentialStore, clear: bool, format: OutputFormat) -> Result<()> {
    let records = pending(store, clear)?;

    match format {
        OutputFormat::Json => print_json(&records)?,
        OutputFormat::Table => {
            println!("Name,Username,Origin,Created");
            for record in &records {
                println!(
                    "{},{},{},{}",
                    csv_field(&record.display_name),
                    csv_field(&record.username),
                    csv_field(&record.origin),
                    record.created_at.to_rfc3339()
                );
            }
        }
        OutputFormat::Pretty => {
            use console::style;

            if records.is_empty() {
                println!("{}", style("No credentials pending import").dim());
                return Ok(());
            }

            println!(
                "\n{}",
                style(format!("Pending Imports ({})", records.len())).bold().cyan()
            );
            for record in records {
                let hit = SearchHit::from(record);
                println!(
                    "  {:<20} {:<28} {}",
                    style(&hit.display_name).bold(),
                    style(&hit.username).green(),
                    style(&hit.origin).dim()
                );
            }
            if clear {
                println!("\n  {} Import queue cleared", style("[OK]").green());
            }
            println!();
        }
    }

    Ok(())
}
