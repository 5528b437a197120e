//! `reqwest`-backed [`DownloadApi`] implementation.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::{ApiError, DownloadApi, DownloadResult};
use crate::http;

/// Path of the download endpoint, appended to the configured base URL.
pub const DOWNLOAD_PATH: &str = "/api/download";

/// Quality preference sent with every request. Not user-selectable.
pub const QUALITY_BEST: &str = "best";

/// Marker text served by a sleeping hosted backend.
const SLEEPING_MARKER: &str = "Your space is sleeping";

#[derive(Debug, Serialize)]
struct DownloadRequestBody<'a> {
    url: &'a str,
    quality: &'static str,
}

/// HTTP client for the download API.
///
/// Create once and reuse; the inner client pools connections.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    endpoint: String,
}

impl ApiClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// A trailing `/` on the base is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = http::build_client(None).map_err(|source| ApiError::ClientBuild { source })?;
        let endpoint = format!("{base_url}{DOWNLOAD_PATH}");
        Ok(Self {
            client,
            base_url,
            endpoint,
        })
    }

    /// Full URL of the download endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DownloadApi for ApiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn request_download(&self, url: &str) -> Result<DownloadResult, ApiError> {
        let body = DownloadRequestBody {
            url,
            quality: QUALITY_BEST,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::connection(&self.endpoint, e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::connection(&self.endpoint, e))?;
        debug!(status, content_type = ?content_type, bytes = text.len(), "API responded");

        classify_response(status, content_type.as_deref(), &text)
    }
}

/// Classifies a raw API response.
///
/// - JSON body, success status: parsed into [`DownloadResult`], or
///   [`ApiError::UnexpectedResponse`] when fields are missing.
/// - JSON body, error status: [`ApiError::Server`] carrying the backend's
///   `detail`/`error`/`message`, except 503 which is
///   [`ApiError::ServiceUnavailable`].
/// - Anything else: [`ApiError::ServiceUnavailable`] for 503 or a sleeping
///   backend page, otherwise [`ApiError::UnexpectedResponse`].
///
/// # Errors
///
/// Returns the classified [`ApiError`] for every non-success outcome.
pub fn classify_response(
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> Result<DownloadResult, ApiError> {
    let is_json = content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"));
    let is_success = (200..300).contains(&status);

    if !is_json {
        if status == 503 || body.contains(SLEEPING_MARKER) {
            warn!(status, "download service is unavailable");
            return Err(ApiError::ServiceUnavailable { status });
        }
        return Err(ApiError::unexpected(status, "response body is not JSON"));
    }

    if !is_success {
        if status == 503 {
            return Err(ApiError::ServiceUnavailable { status });
        }
        return Err(ApiError::server(status, server_message(status, body)));
    }

    serde_json::from_str::<DownloadResult>(body)
        .map_err(|e| ApiError::unexpected(status, format!("malformed download response: {e}")))
}

fn server_message(status: u16, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|value| {
            ["detail", "error", "message"]
                .iter()
                .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        })
        .map_or_else(|| format!("Server error (HTTP {status})"), str::to_string)
}
