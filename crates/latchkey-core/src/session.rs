//! Per-session state, passed explicitly to every request handler

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

const MAX_ACTIVITY_ENTRIES: usize = 100;
const MAX_AUTO_LOCK_MINUTES: u64 = 60 * 24 * 365;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Who is signed in and when they were last active
///
/// The session locks once `auto_lock` has elapsed since the last activity.
#[derive(Debug, Clone)]
pub struct SessionContext {
    user: Option<UserProfile>,
    last_activity: Option<DateTime<Utc>>,
    auto_lock: Duration,
    activities: VecDeque<ActivityEntry>,
}

impl SessionContext {
    pub fn new(auto_lock_minutes: u64) -> Self {
        Self {
            user: None,
            last_activity: None,
            auto_lock: Duration::minutes(auto_lock_minutes.min(MAX_AUTO_LOCK_MINUTES) as i64),
            activities: VecDeque::new(),
        }
    }

    pub fn authenticate(&mut self, user: UserProfile, now: DateTime<Utc>) {
        tracing::info!("Session unlocked for {}", user.email);
        self.user = Some(user);
        self.last_activity = Some(now);
    }

    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!("Signed out {}", user.email);
        }
        self.last_activity = None;
        self.activities.clear();
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// True when nobody is signed in or the idle timeout has passed
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        match (&self.user, self.last_activity) {
            (Some(_), Some(last)) => now - last >= self.auto_lock,
            _ => true,
        }
    }

    /// Record activity, pushing back the auto-lock deadline
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if self.user.is_some() {
            self.last_activity = Some(now);
        }
    }

    pub fn locks_at(&self) -> Option<DateTime<Utc>> {
        self.user.as_ref()?;
        self.last_activity.map(|last| last + self.auto_lock)
    }

    /// Append to the activity log, keeping the most recent entries
    pub fn log_activity(
        &mut self,
        kind: impl Into<String>,
        detail: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.activities.push_back(ActivityEntry {
            kind: kind.into(),
            detail,
            timestamp: now,
        });
        while self.activities.len() > MAX_ACTIVITY_ENTRIES {
            self.activities.pop_front();
        }
    }

    pub fn activities(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.activities.iter()
    }
}
