use thiserror::Error;

/// Errors raised at the edges of the display engine: reading tickets and
/// loading configuration. Building and formatting a display never fails.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid ticket: {0}")]
    InvalidTicket(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type DisplayResult<T> = Result<T, DisplayError>;
