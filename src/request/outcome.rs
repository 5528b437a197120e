//! Terminal outcomes of a download request and their user-facing text.

use std::fmt;

use url::Url;

use crate::api::{ApiError, DownloadResult};
use crate::platform::platforms;

/// Severity tag attached to presenter notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Why a request failed. Every variant is terminal; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Input was blank.
    EmptyInput,
    /// Input is not an absolute http(s) URL.
    InvalidUrl,
    /// No platform pattern matched.
    UnsupportedPlatform,
    /// The deadline elapsed or the request was aborted.
    Timeout,
    /// Transport-level failure.
    ConnectionError,
    /// The backend is asleep or returned 503.
    ServiceUnavailable,
    /// Non-JSON or malformed response body.
    UnexpectedResponse,
    /// Any other failure; the message is passed through.
    ServerError(String),
}

impl FailureReason {
    /// Input problems are warnings; everything after the request starts is an error.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::EmptyInput | Self::InvalidUrl | Self::UnsupportedPlatform => Severity::Warning,
            Self::Timeout
            | Self::ConnectionError
            | Self::ServiceUnavailable
            | Self::UnexpectedResponse
            | Self::ServerError(_) => Severity::Error,
        }
    }

    /// Stable short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::InvalidUrl => "invalid_url",
            Self::UnsupportedPlatform => "unsupported_platform",
            Self::Timeout => "timeout",
            Self::ConnectionError => "connection_error",
            Self::ServiceUnavailable => "service_unavailable",
            Self::UnexpectedResponse => "unexpected_response",
            Self::ServerError(_) => "server_error",
        }
    }

    /// Message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyInput => "Please paste a video URL.".to_string(),
            Self::InvalidUrl => {
                "Please enter a valid URL starting with http:// or https://.".to_string()
            }
            Self::UnsupportedPlatform => {
                let names: Vec<&str> = platforms().iter().map(|d| d.display_name).collect();
                format!("This platform is not supported. Supported: {}.", names.join(", "))
            }
            Self::Timeout => "The request timed out. The video may be too large or the server is busy; please try again.".to_string(),
            Self::ConnectionError => "Could not connect to the download server. Check your connection and try again.".to_string(),
            Self::ServiceUnavailable => "The download service is waking up. Please wait a minute and try again.".to_string(),
            Self::UnexpectedResponse => "The server returned an unexpected response. Please try again later.".to_string(),
            Self::ServerError(message) => message.clone(),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServerError(message) => write!(f, "server_error: {message}"),
            other => f.write_str(other.kind()),
        }
    }
}

impl From<ApiError> for FailureReason {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Connection { .. } => Self::ConnectionError,
            ApiError::ServiceUnavailable { .. } => Self::ServiceUnavailable,
            ApiError::UnexpectedResponse { .. } => Self::UnexpectedResponse,
            ApiError::Server { message, .. } => Self::ServerError(message),
            error @ ApiError::ClientBuild { .. } => Self::ServerError(error.to_string()),
        }
    }
}

/// Resolved file the presentation layer should save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTarget {
    /// Absolute URL of the finished file.
    pub url: String,
    /// File name to save under.
    pub filename: String,
    /// Media title reported by the API.
    pub title: String,
    /// Size reported by the API.
    pub file_size_bytes: u64,
}

impl SaveTarget {
    /// Builds a save target, resolving `download_url` against `api_base_url`.
    #[must_use]
    pub fn from_result(api_base_url: &str, result: DownloadResult) -> Self {
        Self {
            url: resolve_download_url(api_base_url, &result.download_url),
            filename: result.filename,
            title: result.title,
            file_size_bytes: result.file_size_bytes,
        }
    }
}

/// Keeps absolute URLs; prefixes anything else with the API base.
#[must_use]
pub fn resolve_download_url(api_base_url: &str, download_url: &str) -> String {
    let is_absolute = Url::parse(download_url).is_ok_and(|u| u.has_host());
    if is_absolute {
        return download_url.to_string();
    }
    let base = api_base_url.trim_end_matches('/');
    if download_url.starts_with('/') {
        format!("{base}{download_url}")
    } else {
        format!("{base}/{download_url}")
    }
}

/// Result of one `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Succeeded(SaveTarget),
    Failed(FailureReason),
}

impl DownloadOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// The failure reason, if this outcome failed.
    #[must_use]
    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Succeeded(_) => None,
            Self::Failed(reason) => Some(reason),
        }
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::Succeeded(_) => Severity::Success,
            Self::Failed(reason) => reason.severity(),
        }
    }

    /// Notification text for the presentation layer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Succeeded(target) => format!("Download ready: {}", target.title),
            Self::Failed(reason) => reason.user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_failures_are_warnings() {
        for reason in [
            FailureReason::EmptyInput,
            FailureReason::InvalidUrl,
            FailureReason::UnsupportedPlatform,
        ] {
            assert_eq!(reason.severity(), Severity::Warning, "{reason}");
        }
    }

    #[test]
    fn test_request_failures_are_errors() {
        for reason in [
            FailureReason::Timeout,
            FailureReason::ConnectionError,
            FailureReason::ServiceUnavailable,
            FailureReason::UnexpectedResponse,
            FailureReason::ServerError("x".into()),
        ] {
            assert_eq!(reason.severity(), Severity::Error, "{reason}");
        }
    }

    #[test]
    fn test_server_error_message_is_passed_through() {
        let reason = FailureReason::ServerError("Video is private".into());
        assert_eq!(reason.user_message(), "Video is private");
    }

    #[test]
    fn test_unsupported_message_lists_platforms() {
        let msg = FailureReason::UnsupportedPlatform.user_message();
        assert!(msg.contains("YouTube"), "{msg}");
        assert!(msg.contains("Vimeo"), "{msg}");
    }

    #[test]
    fn test_api_error_mapping() {
        assert_eq!(
            FailureReason::from(ApiError::ServiceUnavailable { status: 503 }),
            FailureReason::ServiceUnavailable
        );
        assert_eq!(
            FailureReason::from(ApiError::unexpected(200, "bad")),
            FailureReason::UnexpectedResponse
        );
        assert_eq!(
            FailureReason::from(ApiError::server(400, "nope")),
            FailureReason::ServerError("nope".into())
        );
    }

    #[test]
    fn test_resolve_relative_with_leading_slash() {
        assert_eq!(
            resolve_download_url("https://api.example.com", "/files/a.mp4"),
            "https://api.example.com/files/a.mp4"
        );
    }

    #[test]
    fn test_resolve_relative_without_leading_slash() {
        assert_eq!(
            resolve_download_url("https://api.example.com/", "files/a.mp4"),
            "https://api.example.com/files/a.mp4"
        );
    }

    #[test]
    fn test_resolve_keeps_absolute() {
        assert_eq!(
            resolve_download_url("https://api.example.com", "https://cdn.example.net/a.mp4"),
            "https://cdn.example.net/a.mp4"
        );
    }

    #[test]
    fn test_save_target_from_result() {
        let target = SaveTarget::from_result(
            "http://127.0.0.1:7860",
            DownloadResult {
                title: "Clip".into(),
                download_url: "/download/abc.mp4".into(),
                filename: "abc.mp4".into(),
                file_size_bytes: 10,
            },
        );
        assert_eq!(target.url, "http://127.0.0.1:7860/download/abc.mp4");
        assert_eq!(target.filename, "abc.mp4");
        assert_eq!(target.file_size_bytes, 10);
    }

    #[test]
    fn test_outcome_accessors() {
        let failed = DownloadOutcome::Failed(FailureReason::Timeout);
        assert!(!failed.is_success());
        assert_eq!(failed.failure(), Some(&FailureReason::Timeout));
        assert_eq!(failed.severity(), Severity::Error);

        let ok = DownloadOutcome::Succeeded(SaveTarget {
            url: "u".into(),
            filename: "f".into(),
            title: "Title".into(),
            file_size_bytes: 0,
        });
        assert!(ok.is_success());
        assert_eq!(ok.severity(), Severity::Success);
        assert_eq!(ok.user_message(), "Download ready: Title");
    }
}
