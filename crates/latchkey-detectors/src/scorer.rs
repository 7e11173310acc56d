use lazy_static::lazy_static;
use latchkey_core::{FieldDescriptor, FieldRole};
use regex::Regex;
use serde::{Deserialize, Serialize};

const PASSWORD_POINTS: u32 = 40;
const USERNAME_POINTS: u32 = 30;
const STRUCTURE_POINTS: u32 = 15;
const ORIGIN_POINTS: u32 = 10;
const USERNAME_HINT_POINTS: u32 = 5;
const PASSWORD_HINT_POINTS: u32 = 5;

lazy_static! {
    static ref LOGIN_PATTERN: Regex =
        Regex::new(r"(?i)sign[- ]?in|log[- ]?in|auth|login|credential").unwrap();
}

/// Where a group of fields was found
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringContext {
    pub origin: String,
    pub title: Option<String>,
    /// Container id, class and text, or the page text for formless groups
    pub structure_text: String,
}

impl ScoringContext {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_structure_text(mut self, text: impl Into<String>) -> Self {
        self.structure_text = text.into();
        self
    }
}

/// A scored group of classified fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateForm {
    pub origin: String,
    pub fields: Vec<FieldDescriptor>,
    pub roles: Vec<FieldRole>,
    /// Id of the first username or email field
    pub username_field: Option<String>,
    /// Id of the first password field
    pub password_field: Option<String>,
    pub confidence: f64,
}

impl CandidateForm {
    pub fn is_candidate(&self) -> bool {
        self.password_field.is_some() && self.confidence > 0.0
    }

    pub fn meets_threshold(&self, threshold: f64) -> bool {
        self.is_candidate() && self.confidence >= threshold
    }

    pub fn role_of(&self, field_id: &str) -> Option<FieldRole> {
        self.fields
            .iter()
            .position(|f| f.id == field_id)
            .and_then(|i| self.roles.get(i).copied())
    }

    /// Fields paired with their roles
    pub fn classified(&self) -> impl Iterator<Item = (&FieldDescriptor, FieldRole)> {
        self.fields.iter().zip(self.roles.iter().copied())
    }
}

/// Scores how likely a group of fields is a login form
///
/// Points: password field 40, username or email field 30, login wording in
/// the structural context 15, login wording in the origin or title 10, and
/// 5 each for explicit `username`/`email` and `current-password` hints.
/// Groups without a password field score zero.
pub struct FormScorer;

impl FormScorer {
    pub fn score(fields: &[(FieldDescriptor, FieldRole)], context: &ScoringContext) -> CandidateForm {
        let username = fields.iter().find(|(_, role)| role.is_username_like());
        let password = fields.iter().find(|(_, role)| *role == FieldRole::Password);

        let points = match password {
            Some((password_field, _)) => {
                Self::points(username.map(|(f, _)| f), password_field, context)
            }
            None => 0,
        };
        let confidence = points.min(100) as f64 / 100.0;

        tracing::debug!(
            "Scored group of {} fields on {}: {:.2}",
            fields.len(),
            context.origin,
            confidence
        );

        CandidateForm {
            origin: context.origin.clone(),
            fields: fields.iter().map(|(f, _)| f.clone()).collect(),
            roles: fields.iter().map(|(_, r)| *r).collect(),
            username_field: username.map(|(f, _)| f.id.clone()),
            password_field: password.map(|(f, _)| f.id.clone()),
            confidence,
        }
    }

    fn points(
        username: Option<&FieldDescriptor>,
        password: &FieldDescriptor,
        context: &ScoringContext,
    ) -> u32 {
        let mut points = PASSWORD_POINTS;

        if let Some(username) = username {
            points += USERNAME_POINTS;
            if username.has_hint("username") || username.has_hint("email") {
                points += USERNAME_HINT_POINTS;
            }
        }

        if password.has_hint("current-password") {
            points += PASSWORD_HINT_POINTS;
        }

        if LOGIN_PATTERN.is_match(&context.structure_text) {
            points += STRUCTURE_POINTS;
        }

        let title = context.title.as_deref().unwrap_or_default();
        if LOGIN_PATTERN.is_match(&context.origin) || LOGIN_PATTERN.is_match(title) {
            points += ORIGIN_POINTS;
        }

        points
    }
}
