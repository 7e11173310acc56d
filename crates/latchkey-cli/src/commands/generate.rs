use super::print_json;
use crate::OutputFormat;
use anyhow::Result;
use latchkey_core::GeneratorOptions;
use latchkey_detectors::{PasswordGenerator, PasswordStrength};
use serde::Serialize;

/// Overrides applied on top of the configured generator options
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    pub length: Option<usize>,
    pub no_uppercase: bool,
    pub no_lowercase: bool,
    pub no_numbers: bool,
    pub no_symbols: bool,
    pub allow_similar: bool,
}

impl GenerateArgs {
    pub fn apply(&self, defaults: &GeneratorOptions) -> Result<GeneratorOptions> {
        let options = GeneratorOptions {
            length: self.length.unwrap_or(defaults.length),
            uppercase: defaults.uppercase && !self.no_uppercase,
            lowercase: defaults.lowercase && !self.no_lowercase,
            numbers: defaults.numbers && !self.no_numbers,
            symbols: defaults.symbols && !self.no_symbols,
            exclude_similar: defaults.exclude_similar && !self.allow_similar,
        };
        options.validate()?;
        Ok(options)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPassword {
    pub password: String,
    pub strength: PasswordStrength,
}

pub fn generate(options: &GeneratorOptions) -> GeneratedPassword {
    let password = PasswordGenerator::generate(options);
    let strength = PasswordStrength::evaluate(&password);
    GeneratedPassword { password, strength }
}

pub fn execute(args: &GenerateArgs, defaults: &GeneratorOptions, format: OutputFormat) -> Result<()> {
    let options = args.apply(defaults)?;
    let generated = generate(&options);

    match format {
        OutputFormat::Json => print_json(&generated)?,
        OutputFormat::Table => println!(
            "{},{},{}",
            generated.password,
            generated.strength.score,
            generated.strength.label.as_str()
        ),
        OutputFormat::Pretty => {
            use console::style;

            println!("{}", style(&generated.password).bold());
            println!(
                "{}",
                style(format!(
                    "{} ({}/100)",
                    generated.strength.label.as_str(),
                    generated.strength.score
                ))
                .dim()
            );
        }
    }

    Ok(())
}
