use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Core(#[from] latchkey_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
