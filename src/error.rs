//! Error types for navsmoke

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavsmokeError {
    /// An expected page condition did not hold. Fatal to the run.
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// The browser could not be launched or connected to.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// A CDP operation against a live page failed.
    #[error("browser operation failed: {0}")]
    Browser(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NavsmokeError {
    /// True for failures that should be reported as a failed check rather
    /// than a broken harness.
    pub fn is_assertion(&self) -> bool {
        matches!(self, NavsmokeError::Assertion(_))
    }
}

pub type Result<T> = std::result::Result<T, NavsmokeError>;
