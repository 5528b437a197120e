//! Streams a resolved [`SaveTarget`] to disk.
//!
//! The request controller stops at producing a save target; this module is
//! what a terminal presentation layer uses to carry out the save.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use vidfetch_core::save::FileSaver;
//! use vidfetch_core::request::SaveTarget;
//!
//! # async fn example(target: SaveTarget) -> Result<(), Box<dyn std::error::Error>> {
//! let saver = FileSaver::new()?;
//! let saved = saver.save(&target, Path::new("./videos")).await?;
//! println!("Saved to: {}", saved.path.display());
//! # Ok(())
//! # }
//! ```

mod error;
mod filename;

pub use error::SaveError;

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::http;
use crate::request::SaveTarget;
use filename::{choose_filename, resolve_unique_path};

/// Read timeout for saving a finished file (large videos take a while).
pub const SAVE_READ_TIMEOUT_SECS: u64 = 600;

/// Where a file ended up.
#[derive(Debug, Clone)]
pub struct SavedFile {
    pub path: PathBuf,
    pub bytes_written: u64,
}

/// HTTP client that streams resolved files to disk.
#[derive(Debug, Clone)]
pub struct FileSaver {
    client: Client,
}

impl FileSaver {
    /// Creates a saver with the default read timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, SaveError> {
        let client = http::build_client(Some(Duration::from_secs(SAVE_READ_TIMEOUT_SECS)))
            .map_err(|source| SaveError::ClientBuild { source })?;
        Ok(Self { client })
    }

    /// Downloads `target.url` into `output_dir` under `target.filename`.
    ///
    /// The directory is created if missing; an existing file is never
    /// overwritten (a numeric suffix is added instead). A partial file is
    /// removed when streaming fails.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] for invalid URLs, network failures, non-success
    /// statuses, and file system errors.
    #[instrument(skip(self, target), fields(url = %target.url))]
    pub async fn save(&self, target: &SaveTarget, output_dir: &Path) -> Result<SavedFile, SaveError> {
        let parsed = Url::parse(&target.url).map_err(|_| SaveError::InvalidUrl {
            url: target.url.clone(),
        })?;

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| SaveError::io(output_dir, e))?;

        let response = self
            .client
            .get(parsed.as_str())
            .send()
            .await
            .map_err(|e| SaveError::network(&target.url, e))?;
        if !response.status().is_success() {
            return Err(SaveError::HttpStatus {
                url: target.url.clone(),
                status: response.status().as_u16(),
            });
        }

        let filename = choose_filename(&target.filename, &parsed);
        let path = resolve_unique_path(output_dir, &filename);
        debug!(path = %path.display(), "resolved output path");

        let mut file = File::create(&path)
            .await
            .map_err(|e| SaveError::io(&path, e))?;
        let streamed = stream_to_file(&mut file, response, &target.url, &path).await;
        let bytes_written = match streamed {
            Ok(bytes) => bytes,
            Err(error) => {
                debug!(path = %path.display(), "cleaning up partial file after error");
                let _ = tokio::fs::remove_file(&path).await;
                return Err(error);
            }
        };

        if target.file_size_bytes > 0 && target.file_size_bytes != bytes_written {
            warn!(
                expected = target.file_size_bytes,
                actual = bytes_written,
                "saved size differs from size reported by API"
            );
        }
        info!(path = %path.display(), bytes = bytes_written, "file saved");

        Ok(SavedFile {
            path,
            bytes_written,
        })
    }
}

async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, SaveError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| SaveError::network(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| SaveError::io(path, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(|e| SaveError::io(path, e))?;
    Ok(bytes_written)
}
