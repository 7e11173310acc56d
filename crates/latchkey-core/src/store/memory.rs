use super::{CredentialStore, UpsertOutcome};
use crate::Result;
use crate::credential::CredentialRecord;

/// In-process store, used by tests and as a scratch vault
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: Vec<CredentialRecord>,
    pending: Vec<CredentialRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<CredentialRecord>) -> Self {
        Self {
            records,
            pending: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CredentialStore for MemoryStore {
    fn list_all(&self) -> Result<Vec<CredentialRecord>> {
        Ok(self.records.clone())
    }

    fn upsert(&mut self, record: CredentialRecord) -> Result<UpsertOutcome> {
        record.validate()?;

        if let Some(existing) = self.records.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
            return Ok(UpsertOutcome::Updated);
        }

        self.pending.push(record.clone());
        self.records.push(record);
        Ok(UpsertOutcome::Created)
    }

    fn pending_imports(&self) -> Result<Vec<CredentialRecord>> {
        Ok(self.pending.clone())
    }

    fn take_pending_imports(&mut self) -> Result<Vec<CredentialRecord>> {
        Ok(std::mem::take(&mut self.pending))
    }
}
