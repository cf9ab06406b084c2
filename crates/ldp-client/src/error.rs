//! Error types for pod resource operations.

use core::error::Error;

use derive_more::Display;
use error_stack::Report;

/// Result type for pod resource operations.
pub type PodResult<T> = Result<T, Report<PodError>>;

/// Errors that can occur while talking to a pod.
///
/// All of these are recoverable from the caller's point of view: operations
/// report a classified failure instead of aborting the host.
#[derive(Debug, Display)]
pub enum PodError {
    /// Client-side configuration problems (bad base URL, builder failure)
    #[display("Configuration error: {message}")]
    Configuration { message: String },

    /// Transport-level failures (refused connection, DNS failure, I/O error)
    #[display("Network error: {message}")]
    Network { message: String },

    /// The pod answered with a status code outside the accepted set
    #[display("Unexpected status code: {status}")]
    UnexpectedStatus { status: u16 },
}

impl Error for PodError {}
