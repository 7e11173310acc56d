//! Fill, save and search flows over a credential store
//!
//! The engine ties detection to storage: it picks the best login form on a
//! page, looks up credentials for the page origin and turns them into
//! per-field datasets, and on submit turns entered values back into a
//! stored record.

use crate::{Error, Result};
use crate::classifier::FieldClassifier;
use crate::detector::FormDetector;
use crate::scorer::CandidateForm;
use chrono::{DateTime, Utc};
use latchkey_core::origin::extract_host;
use latchkey_core::{
    AutofillSettings, CredentialMatch, CredentialRecord, CredentialStore, DomainMatch,
    DomainMatcher, FieldRole, NewCredential, PageSnapshot, UpsertOutcome,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unknown-role values longer than this without an `@` are taken as secrets
const UNKNOWN_SECRET_MIN_LENGTH: usize = 7;

/// Values to write into a form, keyed by field id
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FillDataset {
    pub values: BTreeMap<String, String>,
}

impl FillDataset {
    fn for_form(form: &CandidateForm, record: &CredentialRecord) -> Self {
        let values = form
            .classified()
            .filter_map(|(field, role)| match role {
                FieldRole::Username | FieldRole::Email => {
                    Some((field.id.clone(), record.username.clone()))
                }
                FieldRole::Password => Some((field.id.clone(), record.secret.clone())),
                FieldRole::Unknown => None,
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.values.get(field_id).map(String::as_str)
    }
}

impl fmt::Debug for FillDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillDataset")
            .field("fields", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// One offered credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub credential_id: String,
    pub display_name: String,
    pub username: String,
    pub origin: String,
    #[serde(rename = "match")]
    pub domain_match: DomainMatch,
    pub is_favorite: bool,
    pub dataset: FillDataset,
}

/// Field ids to watch for a save prompt after submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveInfo {
    pub username_field: String,
    pub password_field: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FillResponse {
    pub form: Option<CandidateForm>,
    pub suggestions: Vec<Suggestion>,
    pub save_info: Option<SaveInfo>,
}

impl FillResponse {
    pub fn is_empty(&self) -> bool {
        self.form.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved { id: String, outcome: UpsertOutcome },
    /// A username or a secret could not be found among the entered values
    Incomplete,
    /// The origin is on the never-save list
    Suppressed,
}

pub struct AutofillEngine<'a> {
    settings: &'a AutofillSettings,
}

impl<'a> AutofillEngine<'a> {
    pub fn new(settings: &'a AutofillSettings) -> Self {
        Self { settings }
    }

    /// Build fill suggestions for the best login form on a page
    pub fn fill(&self, page: &PageSnapshot, store: &dyn CredentialStore) -> FillResponse {
        let report = FormDetector::detect(page, self.settings);
        let Some(form) = report.best_above(self.settings.confidence_threshold) else {
            tracing::debug!(
                "No login form on {} reached the {:.2} threshold",
                page.origin,
                self.settings.confidence_threshold
            );
            return FillResponse::default();
        };

        let matches = self.ranked_matches(&page.origin, store);
        let suggestions: Vec<Suggestion> = matches
            .into_iter()
            .map(|m| Suggestion {
                dataset: FillDataset::for_form(form, &m.record),
                credential_id: m.record.id,
                display_name: m.record.display_name,
                username: m.record.username,
                origin: m.record.origin,
                domain_match: m.domain_match,
                is_favorite: m.record.is_favorite,
            })
            .collect();

        let save_info = match (&form.username_field, &form.password_field) {
            (Some(username_field), Some(password_field)) => Some(SaveInfo {
                username_field: username_field.clone(),
                password_field: password_field.clone(),
            }),
            _ => None,
        };

        tracing::info!(
            "Offering {} suggestions on {} (form confidence {:.2})",
            suggestions.len(),
            page.origin,
            form.confidence
        );

        FillResponse {
            form: Some(form.clone()),
            suggestions,
            save_info,
        }
    }

    /// Matches for an origin, strongest first, capped at `max_suggestions`
    pub fn ranked_matches(&self, origin: &str, store: &dyn CredentialStore) -> Vec<CredentialMatch> {
        let mut matches = Self::all_matches(origin, store);
        matches.truncate(self.settings.max_suggestions);
        matches
    }

    /// Every match for an origin, strongest first, then favorites, then most recent
    pub fn all_matches(origin: &str, store: &dyn CredentialStore) -> Vec<CredentialMatch> {
        let mut matches = store.find_matches(origin);
        matches.sort_by(|a, b| {
            b.domain_match
                .tier
                .cmp(&a.domain_match.tier)
                .then(b.record.is_favorite.cmp(&a.record.is_favorite))
                .then(b.record.updated_at.cmp(&a.record.updated_at))
        });
        matches
    }

    /// Store the values entered into a submitted form
    pub fn save(
        &self,
        page: &PageSnapshot,
        store: &mut dyn CredentialStore,
        now: DateTime<Utc>,
    ) -> Result<SaveOutcome> {
        if page.origin.trim().is_empty() {
            return Err(Error::InvalidData(
                "Submitted page has no origin".to_string(),
            ));
        }

        if self.settings.is_never_save(&page.origin) {
            tracing::info!("Not saving credentials for {} (never-save list)", page.origin);
            return Ok(SaveOutcome::Suppressed);
        }

        let Some((username, secret)) = Self::extract_credentials(page) else {
            tracing::debug!("Submitted form on {} lacks a username or password", page.origin);
            return Ok(SaveOutcome::Incomplete);
        };

        let existing = store
            .find_by_origin(&page.origin)
            .into_iter()
            .find(|record| record.username == username);

        let record = match existing {
            Some(mut record) => {
                tracing::debug!("Updating stored credential {}", record.id);
                record.update_secret(secret, now);
                record
            }
            None => {
                let host = extract_host(&page.origin).unwrap_or_else(|| page.origin.clone());
                NewCredential {
                    display_name: None,
                    username,
                    secret,
                    origin: page.origin.clone(),
                    notes: Some(format!("Auto-saved from {}", host)),
                    category: None,
                    is_favorite: false,
                }
                .into_record(now)
            }
        };

        let id = record.id.clone();
        let outcome = store.upsert(record)?;
        tracing::info!("Saved credential {} for {} ({:?})", id, page.origin, outcome);

        Ok(SaveOutcome::Saved { id, outcome })
    }

    /// Username and secret entered on a page
    ///
    /// The first non-empty value for each slot wins.
    pub fn extract_credentials(page: &PageSnapshot) -> Option<(String, String)> {
        let classified = FieldClassifier::classify_all(&page.fields);

        let mut username: Option<String> = None;
        let mut secret: Option<String> = None;

        for (field, role) in &classified {
            let Some(value) = field.filled_value() else {
                continue;
            };

            let slot = match role {
                FieldRole::Username | FieldRole::Email => &mut username,
                FieldRole::Password => &mut secret,
                FieldRole::Unknown => {
                    if value.chars().count() >= UNKNOWN_SECRET_MIN_LENGTH && !value.contains('@') {
                        &mut secret
                    } else {
                        &mut username
                    }
                }
            };
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }

        username.zip(secret)
    }

    /// Search stored credentials by URL and free-text query
    pub fn search(
        &self,
        store: &dyn CredentialStore,
        query: Option<&str>,
        url: Option<&str>,
    ) -> Result<Vec<CredentialRecord>> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let url = url.map(str::trim).filter(|u| !u.is_empty());

        let results: Vec<CredentialRecord> = store
            .list_all()?
            .into_iter()
            .filter(|record| url.is_none_or(|url| DomainMatcher::matches(url, &record.origin)))
            .filter(|record| query.is_none_or(|query| record.matches_query(query)))
            .take(self.settings.max_suggestions)
            .collect();

        tracing::debug!(
            "Search (query {:?}, url {:?}) returned {} credentials",
            query,
            url,
            results.len()
        );
        Ok(results)
    }
}
