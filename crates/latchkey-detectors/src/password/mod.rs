//! Password generation and strength estimation

mod generator;
mod strength;

pub use generator::PasswordGenerator;
pub use strength::{PasswordStrength, StrengthLabel};
