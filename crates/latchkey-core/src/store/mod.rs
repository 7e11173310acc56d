//! Credential store adapter
//!
//! The engine only needs a flat list of records it can scan and a way to
//! insert or replace one. Lookups by origin are a linear scan through the
//! [`DomainMatcher`]; vaults are small enough that no index is kept.

mod json;
mod memory;

pub use json::{JsonFileStore, VaultFile};
pub use memory::MemoryStore;

use crate::Result;
use crate::credential::CredentialRecord;
use crate::origin::{DomainMatch, DomainMatcher};
use serde::{Deserialize, Serialize};

/// Whether an upsert inserted a new record or replaced one with the same id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// A stored record together with how well its origin matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialMatch {
    pub record: CredentialRecord,
    #[serde(rename = "match")]
    pub domain_match: DomainMatch,
}

pub trait CredentialStore {
    fn list_all(&self) -> Result<Vec<CredentialRecord>>;

    /// Insert a record, or replace the record with the same id
    fn upsert(&mut self, record: CredentialRecord) -> Result<UpsertOutcome>;

    /// Records created since the last call to [`take_pending_imports`]
    ///
    /// [`take_pending_imports`]: CredentialStore::take_pending_imports
    fn pending_imports(&self) -> Result<Vec<CredentialRecord>>;

    fn take_pending_imports(&mut self) -> Result<Vec<CredentialRecord>>;

    /// Stored records whose origin matches, with their match grade
    ///
    /// A failing store yields no matches rather than an error.
    fn find_matches(&self, origin: &str) -> Vec<CredentialMatch> {
        let records = match self.list_all() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Failed to read credential store: {}", e);
                return Vec::new();
            }
        };

        let matches: Vec<CredentialMatch> = records
            .into_iter()
            .filter_map(|record| {
                let domain_match = DomainMatcher::compare(origin, &record.origin);
                domain_match.is_match().then_some(CredentialMatch {
                    record,
                    domain_match,
                })
            })
            .collect();

        tracing::debug!("Found {} stored credentials for {}", matches.len(), origin);
        matches
    }

    fn find_by_origin(&self, origin: &str) -> Vec<CredentialRecord> {
        self.find_matches(origin)
            .into_iter()
            .map(|m| m.record)
            .collect()
    }
}
