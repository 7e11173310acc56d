use super::{csv_field, print_json};
use crate::OutputFormat;
use anyhow::Result;
use latchkey_core::{FieldRole, InputClassification, PageSnapshot};
use latchkey_detectors::FieldClassifier;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedField {
    pub id: String,
    pub role: FieldRole,
    pub input: InputClassification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Classify every field of a page snapshot file
pub fn classify_page(file: &Path) -> Result<Vec<ClassifiedField>> {
    let page = PageSnapshot::from_file(file)?;

    Ok(page
        .fields
        .iter()
        .map(|field| ClassifiedField {
            id: field.id.clone(),
            role: FieldClassifier::classify(field),
            input: field.input,
            label: field.label.clone(),
        })
        .collect())
}

pub fn execute(file: &Path, format: OutputFormat) -> Result<()> {
    tracing::info!("Classifying fields in {}", file.display());
    let fields = classify_page(file)?;

    match format {
        OutputFormat::Json => print_json(&fields)?,
        OutputFormat::Table => output_table(&fields),
        OutputFormat::Pretty => output_pretty(&fields, file),
    }

    Ok(())
}

fn output_pretty(fields: &[ClassifiedField], file: &Path) {
    use console::style;

    println!(
        "\n{}",
        style(format!("Field Roles: {}", file.display())).bold().cyan()
    );
    println!();

    if fields.is_empty() {
        println!("  {}", style("No fields in snapshot").yellow());
        return;
    }

    for field in fields {
        let role = match field.role {
            FieldRole::Password => style(field.role.as_str()).red().bold(),
            FieldRole::Username | FieldRole::Email => style(field.role.as_str()).green().bold(),
            FieldRole::Unknown => style(field.role.as_str()).dim(),
        };
        println!(
            "  {:<24} {:<10} {}",
            field.id,
            role,
            style(field.label.as_deref().unwrap_or(field.input.as_str())).dim()
        );
    }
    println!();
}

fn output_table(fields: &[ClassifiedField]) {
    println!("Field,Role,Input");
    for field in fields {
        println!(
            "{},{},{}",
            csv_field(&field.id),
            field.role.as_str(),
            field.input.as_str()
        );
    }
}
