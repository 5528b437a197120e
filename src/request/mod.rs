//! Download request lifecycle.
//!
//! A request is validated locally (blank input, URL syntax, platform match)
//! before any network traffic. Once validated, a single API call runs against
//! a deadline while staged advisory messages keep the user informed. The call
//! settles into a [`DownloadOutcome`]; on success the presentation layer is
//! asked to save the resolved file.
//!
//! # Architecture
//!
//! - [`DownloadRequestController`] - validation, bounded API call, outcome reporting
//! - [`DownloadRequest`] / [`RequestStatus`] - per-request state machine
//! - [`Presenter`] - presentation-layer seam
//! - [`DownloadOutcome`] / [`FailureReason`] - classified terminal results

mod controller;
mod outcome;
mod presenter;
mod state;
mod timers;

pub use controller::DownloadRequestController;
pub use outcome::{DownloadOutcome, FailureReason, SaveTarget, Severity, resolve_download_url};
pub use presenter::Presenter;
pub use state::{DownloadRequest, RequestStatus, TransitionError};
