use crate::origin::friendly_name;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const DEFAULT_CATEGORY: &str = "General";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// A saved login
///
/// The secret is opaque at this layer: whatever the backing store keeps is
/// passed through untouched.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub id: String,
    #[serde(alias = "name")]
    pub display_name: String,
    pub username: String,
    #[serde(alias = "password")]
    pub secret: String,
    /// URL or app identifier the login belongs to
    #[serde(alias = "url")]
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl CredentialRecord {
    /// Create a record with a fresh id and a name derived from the origin
    pub fn new(
        origin: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let origin = origin.into();
        Self {
            id: Uuid::new_v4().to_string(),
            display_name: friendly_name(&origin),
            username: username.into(),
            secret: secret.into(),
            origin,
            notes: None,
            category: default_category(),
            created_at: now,
            updated_at: now,
            is_favorite: false,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Replace the secret, keeping id and creation time
    pub fn update_secret(&mut self, secret: impl Into<String>, now: DateTime<Utc>) {
        self.secret = secret.into();
        self.updated_at = now;
    }

    /// Case-insensitive search over name, username and origin
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.display_name.to_lowercase().contains(&query)
            || self.username.to_lowercase().contains(&query)
            || self.origin.to_lowercase().contains(&query)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.id.is_empty() {
            return Err(crate::Error::InvalidRecord(
                "Credential has an empty id".to_string(),
            ));
        }
        if self.origin.is_empty() {
            return Err(crate::Error::InvalidRecord(format!(
                "Credential {} has an empty origin",
                self.id
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .field("origin", &self.origin)
            .field("category", &self.category)
            .field("updated_at", &self.updated_at)
            .field("is_favorite", &self.is_favorite)
            .finish()
    }
}

/// A credential submitted by a caller, before it gets an id
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCredential {
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub username: String,
    #[serde(alias = "password")]
    pub secret: String,
    #[serde(alias = "url")]
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl NewCredential {
    pub fn into_record(self, now: DateTime<Utc>) -> CredentialRecord {
        let mut record = CredentialRecord::new(self.origin, self.username, self.secret, now);
        if let Some(name) = self.display_name.filter(|n| !n.trim().is_empty()) {
            record.display_name = name;
        }
        if let Some(category) = self.category.filter(|c| !c.trim().is_empty()) {
            record.category = category;
        }
        record.notes = self.notes;
        record.is_favorite = self.is_favorite;
        record
    }
}

impl fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCredential")
            .field("display_name", &self.display_name)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .field("origin", &self.origin)
            .finish()
    }
}
