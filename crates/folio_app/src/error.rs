//! Error types for folio_app

use thiserror::Error;

/// Errors that can occur in the Folio page controller
#[derive(Error, Debug)]
pub enum FolioError {
    /// Failed to read a configuration file
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for `SiteConfig`
    #[error("Config parsing failed: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration parsed but holds unusable values
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A transport rejected a contact-form submission
    #[error("Submission failed: {0}")]
    Submission(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for FolioError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<FolioError>() {
            Ok(err) => err,
            Err(err) => FolioError::Other(format!("{err:#}")),
        }
    }
}

/// Result type for folio_app operations
pub type Result<T> = std::result::Result<T, FolioError>;
