use super::{csv_field, print_json};
use crate::OutputFormat;
use anyhow::Result;
use latchkey_core::{AutofillSettings, CredentialStore, PageSnapshot};
use latchkey_detectors::{AutofillEngine, FillResponse};
use std::path::Path;

/// Build fill suggestions for a page snapshot file
pub fn suggest_for_page(
    file: &Path,
    store: &dyn CredentialStore,
    settings: &AutofillSettings,
) -> Result<FillResponse> {
    let page = PageSnapshot::from_file(file)?;
    Ok(AutofillEngine::new(settings).fill(&page, store))
}

pub fn execute(
    file: &Path,
    store: &dyn CredentialStore,
    settings: &AutofillSettings,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Looking up suggestions for {}", file.display());
    let response = suggest_for_page(file, store, settings)?;

    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Table => output_table(&response),
        OutputFormat::Pretty => output_pretty(&response),
    }

    Ok(())
}

fn output_pretty(response: &FillResponse) {
    use console::style;

    let Some(form) = &response.form else {
        println!("\n{}\n", style("No login form to fill").yellow());
        return;
    };

    println!(
        "\n{}",
        style(format!("Suggestions: {}", form.origin)).bold().cyan()
    );
    println!(
        "  Form confidence {}",
        style(format!("{:.0}%", form.confidence * 100.0)).green()
    );
    println!();

    if response.suggestions.is_empty() {
        println!("  {}", style("No saved logins for this site").yellow());
    }

    for (i, suggestion) in response.suggestions.iter().enumerate() {
        let favorite = if suggestion.is_favorite { " *" } else { "" };
        println!(
            "  {}. {}{} {}",
            i + 1,
            style(&suggestion.display_name).bold(),
            favorite,
            style(&suggestion.username).green()
        );
        println!(
            "     {} ({})",
            style(&suggestion.origin).dim(),
            suggestion.domain_match.tier.as_str()
        );
    }

    if let Some(save_info) = &response.save_info {
        println!(
            "\n  {} Save prompt watches {} and {}",
            style("[INFO]").dim(),
            save_info.username_field,
            save_info.password_field
        );
    }
    println!();
}

fn output_table(response: &FillResponse) {
    println!("Name,Username,Origin,Match,Confidence");
    for suggestion in &response.suggestions {
        println!(
            "{},{},{},{},{:.2}",
            csv_field(&suggestion.display_name),
            csv_field(&suggestion.username),
            csv_field(&suggestion.origin),
            suggestion.domain_match.tier.as_str(),
            suggestion.domain_match.confidence()
        );
    }
}
