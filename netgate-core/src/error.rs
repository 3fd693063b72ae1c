//! Error types for the NetGate core

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core errors
///
/// Business outcomes (declines, restriction denials, empty reports) are not
/// errors; they are variants of [`crate::ClassifiedResult`].
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration, e.g. an unknown region identifier
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Response document could not be parsed or has an unexpected shape
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// IO error (config file loading)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedDocument(err.to_string())
    }
}
