//! Client for the remote download API.
//!
//! The API is treated as opaque: it receives a social video URL, performs the
//! download on its side, and answers with where the finished file can be
//! fetched from.
//!
//! ```text
//! POST {base}/api/download
//! { "url": "<input url>", "quality": "best" }
//! ->
//! { "title": "...", "download_url": "...", "filename": "...", "file_size": 123 }
//! ```

mod client;
mod error;

pub use client::{ApiClient, DOWNLOAD_PATH, QUALITY_BEST, classify_response};
pub use error::ApiError;

use std::fmt;

use async_trait::async_trait;
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Successful API response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DownloadResult {
    /// Title of the downloaded media.
    pub title: String,
    /// Where to fetch the file from; absolute or relative to the API base.
    pub download_url: String,
    /// Suggested file name.
    pub filename: String,
    /// File size in bytes.
    ///
    /// Some backends report this as a float (`1048576.0`); whole non-negative
    /// floats are accepted.
    #[serde(rename = "file_size", deserialize_with = "deserialize_file_size")]
    pub file_size_bytes: u64,
}

fn deserialize_file_size<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct FileSizeVisitor;

    impl Visitor<'_> for FileSizeVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative whole number of bytes")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u64, E> {
            u64::try_from(value).map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
        }

        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::float_cmp
        )]
        fn visit_f64<E: de::Error>(self, value: f64) -> Result<u64, E> {
            // 2^64 is the first float past u64::MAX.
            let whole = value.is_finite() && value >= 0.0 && value.fract() == 0.0;
            if whole && value < 18_446_744_073_709_551_616.0 {
                Ok(value as u64)
            } else {
                Err(E::invalid_value(Unexpected::Float(value), &self))
            }
        }
    }

    deserializer.deserialize_any(FileSizeVisitor)
}

/// Seam between the request controller and the network.
///
/// [`ApiClient`] is the production implementation; tests substitute doubles to
/// observe whether a call was issued at all.
#[async_trait]
pub trait DownloadApi: Send + Sync {
    /// Base URL that relative download URLs are resolved against.
    fn base_url(&self) -> &str;

    /// Asks the backend to download `url`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] classifying the failure.
    async fn request_download(&self, url: &str) -> Result<DownloadResult, ApiError>;
}
