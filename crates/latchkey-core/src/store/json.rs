use super::{CredentialStore, UpsertOutcome};
use crate::credential::CredentialRecord;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const VAULT_VERSION: u32 = 1;

/// On-disk layout of a vault file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultFile {
    pub version: u32,
    #[serde(default)]
    pub credentials: Vec<CredentialRecord>,
    /// Records created here that a companion app has not imported yet
    #[serde(default)]
    pub pending_imports: Vec<CredentialRecord>,
}

impl Default for VaultFile {
    fn default() -> Self {
        Self {
            version: VAULT_VERSION,
            credentials: Vec::new(),
            pending_imports: Vec::new(),
        }
    }
}

impl VaultFile {
    /// Read and parse a vault file from the given path
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading vault file from: {}", path.display());

        let file = File::open(path)?;
        let vault: VaultFile = serde_json::from_reader(BufReader::new(file))?;
        vault.validate()?;

        tracing::info!(
            "Loaded vault with {} credentials ({} pending import)",
            vault.credentials.len(),
            vault.pending_imports.len()
        );

        Ok(vault)
    }

    /// Write the vault to a file, creating parent directories as needed
    ///
    /// The data goes to a temporary file in the same directory which then
    /// replaces `path`, so readers see either the old or the new vault.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        tracing::debug!("Writing vault file to: {}", path.display());

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!(
            "Wrote vault with {} credentials to {}",
            self.credentials.len(),
            path.display()
        );

        Ok(())
    }

    /// Check that the vault is well-formed
    pub fn validate(&self) -> Result<()> {
        if self.version != VAULT_VERSION {
            return Err(Error::Store(format!(
                "Unsupported vault version {} (expected {})",
                self.version, VAULT_VERSION
            )));
        }

        for record in &self.credentials {
            record.validate()?;
        }

        let mut ids: Vec<&str> = self.credentials.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(Error::InvalidRecord(format!(
                "Duplicate credential id {}",
                pair[0]
            )));
        }

        Ok(())
    }
}

/// Credential store backed by a JSON vault file
///
/// Every write is flushed to disk immediately.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    vault: VaultFile,
}

impl JsonFileStore {
    /// Open a vault file; a missing file is an empty vault
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let vault = if path.exists() {
            VaultFile::from_file(&path)?
        } else {
            tracing::debug!("No vault at {}, starting empty", path.display());
            VaultFile::default()
        };

        Ok(Self { path, vault })
    }

    /// Default vault location under the user's data directory
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| Error::Store("Could not determine data directory".to_string()))?;
        Ok(data_dir.join("latchkey").join("vault.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `vault` to disk and adopt it only once the write succeeded
    fn commit(&mut self, vault: VaultFile) -> Result<()> {
        vault.to_file(&self.path)?;
        self.vault = vault;
        Ok(())
    }
}

impl CredentialStore for JsonFileStore {
    fn list_all(&self) -> Result<Vec<CredentialRecord>> {
        Ok(self.vault.credentials.clone())
    }

    fn upsert(&mut self, record: CredentialRecord) -> Result<UpsertOutcome> {
        record.validate()?;

        let mut vault = self.vault.clone();
        let outcome = match vault.credentials.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record;
                UpsertOutcome::Updated
            }
            None => {
                vault.pending_imports.push(record.clone());
                vault.credentials.push(record);
                UpsertOutcome::Created
            }
        };

        self.commit(vault)?;
        Ok(outcome)
    }

    fn pending_imports(&self) -> Result<Vec<CredentialRecord>> {
        Ok(self.vault.pending_imports.clone())
    }

    fn take_pending_imports(&mut self) -> Result<Vec<CredentialRecord>> {
        let mut vault = self.vault.clone();
        let pending = std::mem::take(&mut vault.pending_imports);
        self.commit(vault)?;
        Ok(pending)
    }
}
