use super::print_json;
use crate::OutputFormat;
use anyhow::Result;
use latchkey_core::AutofillSettings;
use std::path::Path;

/// Add a host to the never-save list and persist the settings file
///
/// Returns false when the host was already listed.
pub fn add(settings_path: &Path, host: &str) -> Result<bool> {
    let mut settings = AutofillSettings::load(settings_path)?;
    let added = settings.add_never_save(host)?;

    if added {
        settings.save(settings_path)?;
        tracing::info!("Added {} to the never-save list", host);
    } else {
        tracing::debug!("{} is already on the never-save list", host);
    }
    Ok(added)
}

pub fn execute(
    settings_path: &Path,
    host: Option<&str>,
    list: bool,
    format: OutputFormat,
) -> Result<()> {
    use console::style;

    if let Some(host) = host {
        let added = add(settings_path, host)?;
        if format == OutputFormat::Pretty {
            if added {
                println!("{} Never saving logins for {}", style("[OK]").green(), host);
            } else {
                println!("{} {} is already listed", style("[INFO]").dim(), host);
            }
        }
    }

    if list || host.is_none() {
        let settings = AutofillSettings::load(settings_path)?;
        match format {
            OutputFormat::Json => print_json(&settings.never_save)?,
            OutputFormat::Table => {
                println!("Host");
                for entry in &settings.never_save {
                    println!("{}", entry);
                }
            }
            OutputFormat::Pretty => {
                if settings.never_save.is_empty() {
                    println!("{}", style("Never-save list is empty").dim());
                }
                for entry in &settings.never_save {
                    println!("  {}", entry);
                }
            }
        }
    }

    Ok(())
}
