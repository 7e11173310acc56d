use super::{csv_field, print_json};
use crate::OutputFormat;
use anyhow::Result;
use latchkey_core::{AutofillSettings, PageSnapshot};
use latchkey_detectors::{DetectionReport, FormDetector};
use std::path::Path;

/// Run login form detection over a page snapshot file
pub fn detect_page(file: &Path, settings: &AutofillSettings) -> Result<DetectionReport> {
    let page = PageSnapshot::from_file(file)?;
    Ok(FormDetector::detect(&page, settings))
}

pub fn execute(file: &Path, settings: &AutofillSettings, format: OutputFormat) -> Result<()> {
    tracing::info!("Detecting login forms in {}", file.display());
    let report = detect_page(file, settings)?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => output_table(&report),
        OutputFormat::Pretty => output_pretty(&report, settings.confidence_threshold),
    }

    Ok(())
}

fn output_pretty(report: &DetectionReport, threshold: f64) {
    use console::style;

    println!(
        "\n{}",
        style(format!("Login Forms: {}", report.origin)).bold().cyan()
    );
    println!();

    let Some(best_index) = report.best_index() else {
        println!("  {}", style("No login form detected").yellow());
        println!();
        return;
    };

    for (i, candidate) in report.candidates.iter().enumerate() {
        let marker = if i == best_index {
            style("*").green().bold()
        } else {
            style(" ").dim()
        };
        let confidence = format!("{:.0}%", candidate.confidence * 100.0);
        let confidence = if candidate.meets_threshold(threshold) {
            style(confidence).green()
        } else {
            style(confidence).yellow()
        };

        println!("  {} Form #{} ({})", marker, i + 1, confidence);
        for (field, role) in candidate.classified() {
            println!("      {:<24} {}", field.id, style(role.as_str()).dim());
        }
    }

    if report.candidates[best_index].meets_threshold(threshold) {
        println!(
            "\n  {} Suggestions would be offered for form #{}",
            style("[OK]").green(),
            best_index + 1
        );
    } else {
        println!(
            "\n  {} Best score is below the {:.0}% threshold",
            style("[INFO]").dim(),
            threshold * 100.0
        );
    }
    println!();
}

fn output_table(report: &DetectionReport) {
    println!("Form,Confidence,Username Field,Password Field,Fields");
    for (i, candidate) in report.candidates.iter().enumerate() {
        println!(
            "{},{:.2},{},{},{}",
            i + 1,
            candidate.confidence,
            csv_field(candidate.username_field.as_deref().unwrap_or_default()),
            csv_field(candidate.password_field.as_deref().unwrap_or_default()),
            candidate.fields.len()
        );
    }
}
