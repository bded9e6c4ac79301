//! Error taxonomy for the measurement engine.

use thiserror::Error;

/// Errors that can occur while validating or running a measurement.
///
/// Every handler converts its internal failures into one of these variants
/// before the dispatcher ever sees them, so the dispatcher's last-resort
/// clause always has a well-formed `rawOutput` string to report.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("invalid option `{field}`: {reason}")]
    InvalidOptions { field: String, reason: String },

    #[error("Private IP ranges are not allowed")]
    PrivateDestination,

    #[error("{tool} exited with status {status}: {stderr}")]
    ToolProcessFailure {
        tool: &'static str,
        status: i32,
        stderr: String,
    },

    #[error("network error: {message} ({code})")]
    NetworkFailure { message: String, code: String },

    #[error("failed to parse {tool} output: {reason}")]
    ParseError { tool: &'static str, reason: String },

    #[error("enrichment failed: {0}")]
    EnrichmentFailure(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProbeError>;

impl ProbeError {
    /// Builds a `NetworkFailure` from an I/O error, using its `ErrorKind`
    /// (e.g. `ConnectionRefused`) as the code component.
    pub fn network_io(e: std::io::Error) -> Self {
        ProbeError::NetworkFailure {
            code: format!("{:?}", e.kind()),
            message: e.to_string(),
        }
    }

    /// Builds a `NetworkFailure` with an explicit message and code, for
    /// failures that don't carry a `std::io::Error` (TLS handshake, DNS
    /// resolution, timeouts).
    pub fn network(message: impl Into<String>, code: impl Into<String>) -> Self {
        ProbeError::NetworkFailure {
            message: message.into(),
            code: code.into(),
        }
    }
}
