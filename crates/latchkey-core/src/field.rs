use serde::{Deserialize, Serialize};

// Android `InputType` masks and the variations that matter for credentials.
const TYPE_MASK_CLASS: u32 = 0x0000_000f;
const TYPE_MASK_VARIATION: u32 = 0x0000_0ff0;
const TYPE_CLASS_TEXT: u32 = 0x0000_0001;
const TYPE_CLASS_NUMBER: u32 = 0x0000_0002;
const TYPE_TEXT_VARIATION_EMAIL_ADDRESS: u32 = 0x0000_0020;
const TYPE_TEXT_VARIATION_PASSWORD: u32 = 0x0000_0080;
const TYPE_TEXT_VARIATION_VISIBLE_PASSWORD: u32 = 0x0000_0090;
const TYPE_TEXT_VARIATION_WEB_EMAIL_ADDRESS: u32 = 0x0000_00d0;
const TYPE_TEXT_VARIATION_WEB_PASSWORD: u32 = 0x0000_00e0;
const TYPE_NUMBER_VARIATION_PASSWORD: u32 = 0x0000_0010;

/// Platform-neutral input classification of a form field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputClassification {
    Password,
    Email,
    #[default]
    Text,
    Other,
}

impl InputClassification {
    /// Translate an HTML `<input type="...">` value
    pub fn from_html_type(input_type: &str) -> Self {
        match input_type.trim().to_lowercase().as_str() {
            "password" => InputClassification::Password,
            "email" => InputClassification::Email,
            "" | "text" | "search" | "tel" | "url" => InputClassification::Text,
            _ => InputClassification::Other,
        }
    }

    /// Translate an Android `InputType` bit mask
    ///
    /// Only the class and variation bits are inspected; flag bits such as
    /// `TYPE_TEXT_FLAG_NO_SUGGESTIONS` are ignored.
    pub fn from_android_input_type(input_type: u32) -> Self {
        let class = input_type & TYPE_MASK_CLASS;
        let variation = input_type & TYPE_MASK_VARIATION;

        match class {
            TYPE_CLASS_TEXT => match variation {
                TYPE_TEXT_VARIATION_PASSWORD
                | TYPE_TEXT_VARIATION_VISIBLE_PASSWORD
                | TYPE_TEXT_VARIATION_WEB_PASSWORD => InputClassification::Password,
                TYPE_TEXT_VARIATION_EMAIL_ADDRESS | TYPE_TEXT_VARIATION_WEB_EMAIL_ADDRESS => {
                    InputClassification::Email
                }
                _ => InputClassification::Text,
            },
            TYPE_CLASS_NUMBER if variation == TYPE_NUMBER_VARIATION_PASSWORD => {
                InputClassification::Password
            }
            _ => InputClassification::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputClassification::Password => "password",
            InputClassification::Email => "email",
            InputClassification::Text => "text",
            InputClassification::Other => "other",
        }
    }
}

/// Semantic role assigned to a field by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Username,
    Email,
    Password,
    Unknown,
}

impl FieldRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldRole::Username => "username",
            FieldRole::Email => "email",
            FieldRole::Password => "password",
            FieldRole::Unknown => "unknown",
        }
    }

    /// Email fields are filled with the stored username
    pub fn is_username_like(&self) -> bool {
        matches!(self, FieldRole::Username | FieldRole::Email)
    }
}

/// On-screen position of a field, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64) -> Self {
        Self {
            left,
            top,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Euclidean distance between the top-left corners
    pub fn distance_to(&self, other: &Bounds) -> f64 {
        let dx = self.left - other.left;
        let dy = self.top - other.top;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A single form field, flattened out of a DOM or view tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Opaque platform handle (DOM id, autofill id, ...)
    pub id: String,
    /// Declared autofill hints, in declaration order
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub input: InputClassification,
    #[serde(default)]
    pub hint_text: String,
    /// Visible label or placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default = "default_editable")]
    pub editable: bool,
    /// Id of the enclosing structural form, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

fn default_editable() -> bool {
    true
}

impl FieldDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hints: Vec::new(),
            input: InputClassification::Text,
            hint_text: String::new(),
            label: None,
            value: None,
            editable: true,
            container: None,
            bounds: None,
        }
    }

    pub fn with_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hints = hints.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_input(mut self, input: InputClassification) -> Self {
        self.input = input;
        self
    }

    pub fn with_hint_text(mut self, hint_text: impl Into<String>) -> Self {
        self.hint_text = hint_text.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn in_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    pub fn at(mut self, left: f64, top: f64) -> Self {
        self.bounds = Some(Bounds::new(left, top));
        self
    }

    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Lower-cased hint text and label, joined for keyword search
    pub fn visible_text(&self) -> String {
        let label = self.label.as_deref().unwrap_or_default();
        format!("{} {}", self.hint_text, label).to_lowercase()
    }

    /// Non-empty value, if the field holds one
    pub fn filled_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn has_hint(&self, hint: &str) -> bool {
        self.hints
            .iter()
            .flat_map(|h| h.split_whitespace())
            .any(|token| token.eq_ignore_ascii_case(hint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_type_translation() {
        assert_eq!(
            InputClassification::from_html_type("password"),
            InputClassification::Password
        );
        assert_eq!(
            InputClassification::from_html_type("EMAIL"),
            InputClassification::Email
        );
        assert_eq!(
            InputClassification::from_html_type("tel"),
            InputClassification::Text
        );
        assert_eq!(
            InputClassification::from_html_type("checkbox"),
            InputClassification::Other
        );
    }

    #[test]
    fn test_android_input_type_translation() {
        // TYPE_CLASS_TEXT | TYPE_TEXT_VARIATION_PASSWORD
        assert_eq!(
            InputClassification::from_android_input_type(0x81),
            InputClassification::Password
        );
        // TYPE_CLASS_TEXT | TYPE_TEXT_VARIATION_WEB_PASSWORD
        assert_eq!(
            InputClassification::from_android_input_type(0xe1),
            InputClassification::Password
        );
        // TYPE_CLASS_TEXT | TYPE_TEXT_VARIATION_EMAIL_ADDRESS
        assert_eq!(
            InputClassification::from_android_input_type(0x21),
            InputClassification::Email
        );
        // TYPE_CLASS_NUMBER | TYPE_NUMBER_VARIATION_PASSWORD
        assert_eq!(
            InputClassification::from_android_input_type(0x12),
            InputClassification::Password
        );
        // Flags above the variation bits are ignored
        assert_eq!(
            InputClassification::from_android_input_type(0x0008_0081),
            InputClassification::Password
        );
        assert_eq!(
            InputClassification::from_android_input_type(0x01),
            InputClassification::Text
        );
        assert_eq!(
            InputClassification::from_android_input_type(0),
            InputClassification::Other
        );
    }

    #[test]
    fn test_has_hint_splits_tokens() {
        let field = FieldDescriptor::new("f").with_hints(["section-login Username"]);
        assert!(field.has_hint("username"));
        assert!(!field.has_hint("password"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let field: FieldDescriptor = serde_json::from_str(r#"{"id": "user"}"#).unwrap();
        assert!(field.editable);
        assert_eq!(field.input, InputClassification::Text);
        assert!(field.hints.is_empty());
        assert!(field.bounds.is_none());
    }

    #[test]
    fn test_bounds_distance() {
        let a = Bounds::new(0.0, 0.0);
        let b = Bounds::new(30.0, 40.0);
        assert_eq!(a.distance_to(&b), 50.0);
        assert_eq!(b.distance_to(&a), 50.0);
    }
}
