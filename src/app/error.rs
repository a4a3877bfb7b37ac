use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriftError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("State store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transient fetch error: {0}")]
    Transient(String),

    #[error("Permanent fetch error: {0}")]
    Permanent(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DriftError>;
