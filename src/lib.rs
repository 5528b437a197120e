//! vidfetch core library
//!
//! Detects which social platform a pasted video URL belongs to, validates it,
//! and asks a remote download API to fetch it, reporting progress and the
//! final file through a presentation-layer trait.
//!
//! # Architecture
//!
//! - [`platform`] - ordered URL pattern table and platform detection
//! - [`request`] - request controller, state machine, outcomes, presenter seam
//! - [`api`] - HTTP client for the remote download API
//! - [`config`] - injected controller configuration and file defaults
//! - [`save`] - streams a resolved file to disk for terminal front-ends

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod config;
mod http;
pub mod platform;
pub mod request;
pub mod save;
mod user_agent;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, DownloadApi, DownloadResult};
pub use config::{ConfigError, ControllerConfig};
pub use platform::{Platform, PlatformDefinition, detect_platform, platforms};
pub use request::{
    DownloadOutcome, DownloadRequestController, FailureReason, Presenter, SaveTarget, Severity,
};
pub use save::{FileSaver, SaveError};
