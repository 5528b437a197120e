//! Per-request state machine.
//!
//! `Idle -> Validating -> Requesting -> Succeeded | Failed`. A request may also
//! fail straight out of `Idle` or `Validating`. Terminal states accept no
//! further transitions.

use std::time::{Duration, Instant};

use thiserror::Error;

use super::outcome::FailureReason;
use crate::platform::{PlatformDefinition, normalize_for_matching};

/// Lifecycle status of a [`DownloadRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Validating,
    Requesting,
    Succeeded,
    Failed(FailureReason),
}

impl RequestStatus {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Requesting => "requesting",
            Self::Succeeded => "succeeded",
            Self::Failed(_) => "failed",
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }
}

/// Rejected state transition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot move request from {from} to {to}")]
    Invalid {
        from: &'static str,
        to: &'static str,
    },

    #[error("request URL has not passed validation")]
    UrlNotValidated,

    #[error("request has no matched platform")]
    NoPlatform,
}

/// One download attempt, created per `submit`.
#[derive(Debug)]
pub struct DownloadRequest {
    raw_url: String,
    normalized_url: String,
    matched_platform: Option<&'static PlatformDefinition>,
    status: RequestStatus,
    started_at: Option<Instant>,
    url_validated: bool,
}

impl DownloadRequest {
    #[must_use]
    pub fn new(raw_url: &str) -> Self {
        Self {
            raw_url: raw_url.to_string(),
            normalized_url: normalize_for_matching(raw_url),
            matched_platform: None,
            status: RequestStatus::Idle,
            started_at: None,
            url_validated: false,
        }
    }

    /// Input exactly as entered.
    #[must_use]
    pub fn raw_url(&self) -> &str {
        &self.raw_url
    }

    /// Trimmed, lower-cased form used for pattern matching.
    #[must_use]
    pub fn normalized_url(&self) -> &str {
        &self.normalized_url
    }

    /// Trimmed, original-case form sent to the API.
    #[must_use]
    pub fn url_for_api(&self) -> &str {
        self.raw_url.trim()
    }

    #[must_use]
    pub fn matched_platform(&self) -> Option<&'static PlatformDefinition> {
        self.matched_platform
    }

    #[must_use]
    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// Time since the request entered `Requesting`.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|started| started.elapsed())
    }

    /// `Idle -> Validating`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Invalid`] from any other state.
    pub fn begin_validation(&mut self) -> Result<(), TransitionError> {
        self.expect_status(&RequestStatus::Idle, "validating")?;
        self.status = RequestStatus::Validating;
        Ok(())
    }

    /// Records that the URL passed syntax validation.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Invalid`] unless validating.
    pub fn mark_url_valid(&mut self) -> Result<(), TransitionError> {
        self.expect_status(&RequestStatus::Validating, "validating")?;
        self.url_validated = true;
        Ok(())
    }

    /// Records the matched platform.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Invalid`] unless validating.
    pub fn set_platform(
        &mut self,
        platform: &'static PlatformDefinition,
    ) -> Result<(), TransitionError> {
        self.expect_status(&RequestStatus::Validating, "validating")?;
        self.matched_platform = Some(platform);
        Ok(())
    }

    /// `Validating -> Requesting`, stamping `started_at`.
    ///
    /// # Errors
    ///
    /// Fails unless the URL was validated and a platform matched.
    pub fn begin_requesting(&mut self) -> Result<(), TransitionError> {
        self.expect_status(&RequestStatus::Validating, "requesting")?;
        if !self.url_validated {
            return Err(TransitionError::UrlNotValidated);
        }
        if self.matched_platform.is_none() {
            return Err(TransitionError::NoPlatform);
        }
        self.status = RequestStatus::Requesting;
        self.started_at = Some(Instant::now());
        Ok(())
    }

    /// `Requesting -> Succeeded`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Invalid`] unless requesting.
    pub fn succeed(&mut self) -> Result<(), TransitionError> {
        self.expect_status(&RequestStatus::Requesting, "succeeded")?;
        self.status = RequestStatus::Succeeded;
        Ok(())
    }

    /// Any non-terminal state `-> Failed(reason)`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Invalid`] from a terminal state.
    pub fn fail(&mut self, reason: FailureReason) -> Result<(), TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::Invalid {
                from: self.status.label(),
                to: "failed",
            });
        }
        self.status = RequestStatus::Failed(reason);
        Ok(())
    }

    fn expect_status(
        &self,
        expected: &RequestStatus,
        to: &'static str,
    ) -> Result<(), TransitionError> {
        if &self.status == expected {
            Ok(())
        } else {
            Err(TransitionError::Invalid {
                from: self.status.label(),
                to,
            })
        }
    }
}
