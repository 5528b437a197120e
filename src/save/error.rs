//! Error types for saving a resolved file to disk.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while saving a file.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error saving {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout saving {url}")]
    Timeout { url: String },

    /// Non-success HTTP status.
    #[error("HTTP {status} saving {url}")]
    HttpStatus { url: String, status: u16 },

    /// File system error (create dir, create file, write).
    #[error("IO error writing to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The resolved URL is malformed.
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

impl SaveError {
    /// Creates a network error, promoting transport timeouts to [`SaveError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_error_http_status_display() {
        let error = SaveError::HttpStatus {
            url: "https://api.example.com/files/a.mp4".into(),
            status: 404,
        };
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(msg.contains("/files/a.mp4"), "Expected URL in: {msg}");
    }

    #[test]
    fn test_save_error_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let msg = SaveError::io("/tmp/clip.mp4", io_error).to_string();
        assert!(msg.contains("/tmp/clip.mp4"), "Expected path in: {msg}");
    }
}
