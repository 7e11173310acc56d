//! Newline-delimited JSON request loop
//!
//! Reads one [`Request`] per line and writes one [`Response`] per line. The
//! session starts locked and lives as long as the loop.

use crate::dispatch::{Request, Response, dispatch};
use anyhow::Result;
use latchkey_core::{AutofillSettings, CredentialStore, SessionContext};
use std::io::{BufRead, Write};
use std::path::Path;

pub fn execute<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    store: &mut dyn CredentialStore,
    settings: &mut AutofillSettings,
    settings_path: Option<&Path>,
) -> Result<()> {
    let mut session = SessionContext::new(settings.auto_lock_minutes);
    let mut handled = 0usize;

    tracing::info!("Serving requests on stdin");

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                let response = dispatch(request, &mut session, store, settings);

                match response {
                    Response::NeverSave { added: true, .. } => {
                        persist_never_save(settings, settings_path, response)
                    }
                    response => response,
                }
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed request: {}", e);
                Response::Error {
                    message: format!("Invalid request: {}", e),
                }
            }
        };

        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
        handled += 1;
    }

    tracing::info!("Input closed after {} requests", handled);
    Ok(())
}

/// Write a new never-save entry to disk, undoing it in memory if that fails
fn persist_never_save(
    settings: &mut AutofillSettings,
    settings_path: Option<&Path>,
    response: Response,
) -> Response {
    let Some(path) = settings_path else {
        return response;
    };

    match settings.save(path) {
        Ok(()) => response,
        Err(e) => {
            tracing::warn!("Failed to save settings to {}: {}", path.display(), e);
            settings.never_save.pop();
            Response::Error {
                message: format!("Could not save settings: {}", e),
            }
        }
    }
}
