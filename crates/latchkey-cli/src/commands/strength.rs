use super::print_json;
use crate::OutputFormat;
use anyhow::Result;
use latchkey_detectors::{PasswordStrength, StrengthLabel};

pub fn execute(password: &str, format: OutputFormat) -> Result<()> {
    let strength = PasswordStrength::evaluate(password);

    match format {
        OutputFormat::Json => print_json(&strength)?,
        OutputFormat::Table => {
            println!("Score,Strength,Feedback");
            println!(
                "{},{},\"{}\"",
                strength.score,
                strength.label.as_str(),
                strength.feedback.join("; ")
            );
        }
        OutputFormat::Pretty => {
            use console::style;

            let label = match strength.label {
                StrengthLabel::VeryStrong | StrengthLabel::Strong => {
                    style(strength.label.as_str()).green().bold()
                }
                StrengthLabel::Fair => style(strength.label.as_str()).yellow().bold(),
                StrengthLabel::Weak | StrengthLabel::VeryWeak => {
                    style(strength.label.as_str()).red().bold()
                }
            };
            println!("{} ({}/100)", label, strength.score);
            for advice in &strength.feedback {
                println!("  - {}", advice);
            }
        }
    }

    Ok(())
}
