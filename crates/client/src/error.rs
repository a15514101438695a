//! Shared error types for the client crate.

use thiserror::Error;

/// Errors surfaced while talking to the progress endpoints.
///
/// A benign already-completed reply is not an error; it is reported as
/// [`crate::api::MarkOutcome::AlreadyComplete`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Network failure, timeout, or request construction problem.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// The server answered outside the 2xx range.
    #[error("server returned HTTP {0}")]
    HttpStatus(reqwest::StatusCode),
    /// The server reported `success: false`; its message is preserved verbatim.
    #[error("server rejected the request: {0}")]
    Rejected(String),
    /// The body could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
    /// The configured base URL cannot produce an endpoint URL.
    #[error("invalid endpoint url: {0}")]
    BadEndpoint(#[from] url::ParseError),
}
