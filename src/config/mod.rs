//! Controller configuration.
//!
//! The API base URL and timing policy are injected into
//! [`DownloadRequestController`](crate::request::DownloadRequestController) at
//! construction. [`FileConfig`] provides optional on-disk defaults for the CLI.

mod file;

pub use file::{
    FileConfig, LoadedConfig, VerbositySetting, load_default_file_config, load_file_config,
    parse_config_str, resolve_default_config_path,
};

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default API base URL when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:7860";

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "VIDFETCH_API_URL";

/// Hard deadline for one API request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(55);

/// Delay before the "still working" advisory.
pub const STILL_WORKING_AFTER: Duration = Duration::from_secs(10);

/// Delay before the "large file" advisory.
pub const LARGE_FILE_AFTER: Duration = Duration::from_secs(20);

/// Upper bound accepted for a configured request timeout.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Errors raised while building or loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The API base URL is not an absolute http(s) URL.
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidApiBaseUrl { url: String, reason: String },

    /// A config value is out of range or of the wrong type.
    #[error("invalid config value for `{key}` on line {line}: {reason}")]
    InvalidValue {
        key: String,
        line: usize,
        reason: String,
    },

    /// A config line is not `key = value`.
    #[error("invalid config syntax on line {line}: expected key = value")]
    Syntax { line: usize },

    /// A config key is not recognized.
    #[error("unknown config key `{key}` on line {line}")]
    UnknownKey { key: String, line: usize },

    /// The config file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Cosmetic status shown while a request is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryStage {
    StillWorking,
    LargeFile,
}

impl AdvisoryStage {
    /// User-facing text for this stage.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::StillWorking => "Still working on it...",
            Self::LargeFile => "This looks like a large file, please wait...",
        }
    }
}

/// An advisory fired `after` the request starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advisory {
    pub after: Duration,
    pub stage: AdvisoryStage,
}

/// Configuration injected into the request controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    api_base_url: String,
    /// Deadline after which the pending request is cancelled.
    pub request_timeout: Duration,
    /// Staged advisories; they never affect the deadline.
    pub advisories: Vec<Advisory>,
}

impl ControllerConfig {
    /// Creates a config with default timing for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiBaseUrl`] unless the URL is an absolute
    /// `http`/`https` URL with a host.
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: validate_api_base_url(api_base_url)?,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            advisories: default_advisories(),
        })
    }

    /// Overrides the request deadline.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Replaces the advisory schedule.
    #[must_use]
    pub fn with_advisories(mut self, advisories: Vec<Advisory>) -> Self {
        self.advisories = advisories;
        self
    }

    /// API base URL without a trailing slash.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

/// The 10s / 20s advisory schedule.
#[must_use]
pub fn default_advisories() -> Vec<Advisory> {
    vec![
        Advisory {
            after: STILL_WORKING_AFTER,
            stage: AdvisoryStage::StillWorking,
        },
        Advisory {
            after: LARGE_FILE_AFTER,
            stage: AdvisoryStage::LargeFile,
        },
    ]
}

fn validate_api_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let invalid = |reason: &str| ConfigError::InvalidApiBaseUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };
    let parsed = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host().is_none() {
        return Err(invalid("missing host"));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
