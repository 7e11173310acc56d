use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Credential store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, Error>;
