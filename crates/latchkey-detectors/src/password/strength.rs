use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref COMMON_SEQUENCE: Regex = Regex::new(r"(?i)123|abc|qwe").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrengthLabel {
    #[serde(rename = "Very Weak")]
    VeryWeak,
    Weak,
    Fair,
    Strong,
    #[serde(rename = "Very Strong")]
    VeryStrong,
}

impl StrengthLabel {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => StrengthLabel::VeryStrong,
            60..=79 => StrengthLabel::Strong,
            40..=59 => StrengthLabel::Fair,
            20..=39 => StrengthLabel::Weak,
            _ => StrengthLabel::VeryWeak,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthLabel::VeryWeak => "Very Weak",
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Fair => "Fair",
            StrengthLabel::Strong => "Strong",
            StrengthLabel::VeryStrong => "Very Strong",
        }
    }
}

/// Heuristic strength estimate, scored 0 to 100
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordStrength {
    pub score: u32,
    pub label: StrengthLabel,
    pub feedback: Vec<String>,
}

impl PasswordStrength {
    pub fn evaluate(password: &str) -> Self {
        let length = password.chars().count();
        let mut score: i32 = 0;
        let mut feedback = Vec::new();

        if length >= 12 {
            score += 25;
        } else if length >= 8 {
            score += 15;
        } else {
            feedback.push("Use at least 8 characters".to_string());
        }

        let classes: [(fn(&char) -> bool, &str); 4] = [
            (char::is_ascii_lowercase, "Add lowercase letters"),
            (char::is_ascii_uppercase, "Add uppercase letters"),
            (char::is_ascii_digit, "Add numbers"),
            (|c| !c.is_ascii_alphanumeric(), "Add symbols"),
        ];
        for (present, advice) in classes {
            if password.chars().any(|c| present(&c)) {
                score += 15;
            } else {
                feedback.push(advice.to_string());
            }
        }

        if length >= 16 {
            score += 10;
        }
        if length >= 20 {
            score += 5;
        }

        if has_repeated_run(password, 3) {
            score -= 10;
        }
        if COMMON_SEQUENCE.is_match(password) {
            score -= 15;
        }

        let score = score.clamp(0, 100) as u32;
        Self {
            score,
            label: StrengthLabel::from_score(score),
            feedback,
        }
    }
}

/// True if some character repeats at least `run` times in a row
fn has_repeated_run(password: &str, run: usize) -> bool {
    let mut previous = None;
    let mut count = 0;

    for c in password.chars() {
        if Some(c) == previous {
            count += 1;
        } else {
            previous = Some(c);
            count = 1;
        }
        if count >= run {
            return true;
        }
    }
    false
}
