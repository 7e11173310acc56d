use latchkey_core::GeneratorOptions;
use rand::Rng;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const LOWERCASE_DISTINCT: &str = "abcdefghjkmnpqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const UPPERCASE_DISTINCT: &str = "ABCDEFGHJKMNPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const DIGITS_DISTINCT: &str = "23456789";
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

pub struct PasswordGenerator;

impl PasswordGenerator {
    pub fn generate(options: &GeneratorOptions) -> String {
        Self::generate_with(options, &mut rand::thread_rng())
    }

    /// Generate with a caller-supplied random source
    pub fn generate_with<R: Rng + ?Sized>(options: &GeneratorOptions, rng: &mut R) -> String {
        let charset: Vec<char> = Self::charset(options).chars().collect();

        tracing::debug!(
            "Generating {}-character password from {} symbols",
            options.length,
            charset.len()
        );

        (0..options.length)
            .map(|_| charset[rng.gen_range(0..charset.len())])
            .collect()
    }

    /// Characters a password may be drawn from; lowercase when nothing is selected
    pub fn charset(options: &GeneratorOptions) -> String {
        let pick = |distinct: &'static str, full: &'static str| {
            if options.exclude_similar { distinct } else { full }
        };

        let mut charset = String::new();
        if options.lowercase {
            charset.push_str(pick(LOWERCASE_DISTINCT, LOWERCASE));
        }
        if options.uppercase {
            charset.push_str(pick(UPPERCASE_DISTINCT, UPPERCASE));
        }
        if options.numbers {
            charset.push_str(pick(DIGITS_DISTINCT, DIGITS));
        }
        if options.symbols {
            charset.push_str(SYMBOLS);
        }

        if charset.is_empty() {
            charset.push_str(pick(LOWERCASE_DISTINCT, LOWERCASE));
        }
        charset
    }
}
