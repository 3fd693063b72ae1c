//! Error types for the NetGate client

use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Client errors
///
/// A transport fault is never turned into a business outcome: "could not ask"
/// stays distinct from "declined".
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration, document or other core error
    #[error(transparent)]
    Core(#[from] netgate_core::Error),

    /// Network or HTTP client failure
    #[error("Transport error calling {operation}: {message}")]
    Transport {
        /// SOAP operation
        operation: String,
        /// Underlying error
        message: String,
    },

    /// Timeout
    #[error("Timeout after {seconds}s: {operation}")]
    Timeout {
        /// Timeout duration
        seconds: u64,
        /// SOAP operation
        operation: String,
    },

    /// Service answered with a SOAP fault
    #[error("SOAP fault {code}: {reason}")]
    SoapFault {
        /// Fault code
        code: String,
        /// Fault reason
        reason: String,
    },

    /// Non-success HTTP status without a SOAP fault body
    #[error("Unexpected HTTP status {status_code}: {body}")]
    UnexpectedStatus {
        /// HTTP status code
        status_code: u16,
        /// Response body
        body: String,
    },

    /// Request envelope could not be written
    #[error("XML error: {0}")]
    Xml(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Core(netgate_core::Error::from(err))
    }
}

impl Error {
    /// True for failures reaching the service (network, timeout, HTTP status)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Transport { .. } | Error::Timeout { .. } | Error::UnexpectedStatus { .. }
        )
    }
}
