//! Error types for the download API client.
//!
//! Each variant is produced at the point the failure is observed (transport,
//! body decoding, status handling) so callers never need to inspect message
//! text to tell them apart.

use thiserror::Error;

/// Errors returned by a [`DownloadApi`](super::DownloadApi) call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    /// Transport-level failure (DNS, refused or timed-out connect, TLS, reset body).
    #[error("connection error calling {endpoint}: {source}")]
    Connection {
        /// The API endpoint that was called.
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend is asleep or returned 503.
    #[error("download service unavailable (HTTP {status})")]
    ServiceUnavailable {
        /// HTTP status of the response.
        status: u16,
    },

    /// The body was not JSON, or was JSON without the expected fields.
    #[error("unexpected response (HTTP {status}): {reason}")]
    UnexpectedResponse {
        /// HTTP status of the response.
        status: u16,
        /// What was wrong with the body.
        reason: String,
    },

    /// The backend answered with a structured error.
    #[error("server error (HTTP {status}): {message}")]
    Server {
        /// HTTP status of the response.
        status: u16,
        /// Message reported by the backend, passed through verbatim.
        message: String,
    },
}

impl ApiError {
    /// Creates a connection error.
    ///
    /// Transport timeouts stay connection errors; only the controller deadline
    /// reports a timeout.
    pub fn connection(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Connection {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// Creates an unexpected-response error.
    pub fn unexpected(status: u16, reason: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            status,
            reason: reason.into(),
        }
    }

    /// Creates a structured server error.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }
}
