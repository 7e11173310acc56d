use latchkey_core::{FieldDescriptor, FieldRole, InputClassification};

const USERNAME_HINTS: [&str; 4] = ["username", "emailaddress", "email", "login"];
const PASSWORD_HINTS: [&str; 3] = ["password", "current-password", "new-password"];

const PASSWORD_KEYWORDS: [&str; 3] = ["password", "pwd", "pass"];
const EMAIL_KEYWORDS: [&str; 3] = ["email", "e-mail", "mail"];
const USERNAME_KEYWORDS: [&str; 5] = ["username", "user", "login", "identifier", "account"];

/// Assigns a semantic role to a single form field
///
/// Rules are tried in order and the first one that fires wins:
/// declared autofill hints, then the platform input classification, then
/// keywords in the visible hint text and label. Editable text inputs that
/// match nothing default to [`FieldRole::Username`] so save prompts still
/// see them.
pub struct FieldClassifier;

impl FieldClassifier {
    pub fn classify(field: &FieldDescriptor) -> FieldRole {
        let role = Self::from_hints(field)
            .or_else(|| Self::from_input(field.input))
            .or_else(|| Self::from_text(&field.visible_text()))
            .unwrap_or_else(|| Self::fallback(field));

        tracing::debug!("Classified field {} as {}", field.id, role.as_str());
        role
    }

    /// Classify every field of a flattened page, preserving order
    pub fn classify_all(fields: &[FieldDescriptor]) -> Vec<(FieldDescriptor, FieldRole)> {
        fields
            .iter()
            .map(|field| (field.clone(), Self::classify(field)))
            .collect()
    }

    fn from_hints(field: &FieldDescriptor) -> Option<FieldRole> {
        for token in field.hints.iter().flat_map(|h| h.split_whitespace()) {
            let token = token.to_lowercase();
            if USERNAME_HINTS.contains(&token.as_str()) {
                return Some(FieldRole::Username);
            }
            if PASSWORD_HINTS.contains(&token.as_str()) {
                return Some(FieldRole::Password);
            }
        }
        None
    }

    fn from_input(input: InputClassification) -> Option<FieldRole> {
        match input {
            InputClassification::Password => Some(FieldRole::Password),
            InputClassification::Email => Some(FieldRole::Email),
            InputClassification::Text | InputClassification::Other => None,
        }
    }

    fn from_text(text: &str) -> Option<FieldRole> {
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

        if contains_any(&PASSWORD_KEYWORDS) {
            Some(FieldRole::Password)
        } else if contains_any(&EMAIL_KEYWORDS) {
            Some(FieldRole::Email)
        } else if contains_any(&USERNAME_KEYWORDS) {
            Some(FieldRole::Username)
        } else {
            None
        }
    }

    fn fallback(field: &FieldDescriptor) -> FieldRole {
        if field.editable && field.input == InputClassification::Text {
            FieldRole::Username
        } else {
            FieldRole::Unknown
        }
    }
}
