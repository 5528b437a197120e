//! Orchestrates a single download request from raw input to save target.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::outcome::{DownloadOutcome, FailureReason, SaveTarget};
use super::presenter::Presenter;
use super::state::DownloadRequest;
use super::timers::RequestTimers;
use crate::api::{ApiClient, ApiError, DownloadApi};
use crate::config::ControllerConfig;
use crate::platform::{PlatformDefinition, detect_platform, match_platform};

/// Validates input, calls the download API with a bounded wait, and reports the
/// outcome to the presentation layer.
///
/// Each [`submit`](Self::submit) is independent; concurrent calls are not
/// serialized or queued. Nothing is retried.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use vidfetch_core::config::ControllerConfig;
/// use vidfetch_core::request::{DownloadRequestController, Presenter};
///
/// # async fn example(presenter: Arc<dyn Presenter>) -> Result<(), Box<dyn std::error::Error>> {
/// let config = ControllerConfig::new("https://my-space.example.com")?;
/// let controller = DownloadRequestController::new(config, presenter)?;
/// let outcome = controller.submit("https://youtu.be/dQw4w9WgXcQ").await;
/// println!("{}", outcome.user_message());
/// # Ok(())
/// # }
/// ```
pub struct DownloadRequestController {
    config: ControllerConfig,
    api: Arc<dyn DownloadApi>,
    presenter: Arc<dyn Presenter>,
    live_timers: Arc<AtomicUsize>,
}

impl DownloadRequestController {
    /// Creates a controller talking to the configured API over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: ControllerConfig, presenter: Arc<dyn Presenter>) -> Result<Self, ApiError> {
        let api = ApiClient::new(config.api_base_url())?;
        Ok(Self::with_api(config, Arc::new(api), presenter))
    }

    /// Creates a controller with an explicit API implementation.
    #[must_use]
    pub fn with_api(
        config: ControllerConfig,
        api: Arc<dyn DownloadApi>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            config,
            api,
            presenter,
            live_timers: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Number of request timers currently alive across all in-flight submits.
    #[must_use]
    pub fn active_timers(&self) -> usize {
        self.live_timers.load(Ordering::SeqCst)
    }

    /// Re-detects the platform for the current input and updates the indicator.
    pub fn on_input_changed(&self, text: Option<&str>) -> Option<&'static PlatformDefinition> {
        let platform = text.and_then(detect_platform);
        self.presenter.show_platform(platform);
        platform
    }

    /// Reads the current input from the presenter and submits it.
    pub async fn on_submit(&self) -> DownloadOutcome {
        let text = self.presenter.input_text().unwrap_or_default();
        self.submit(&text).await
    }

    /// Runs one download request to completion.
    pub async fn submit(&self, raw_url: &str) -> DownloadOutcome {
        self.submit_with_cancel(raw_url, CancellationToken::new())
            .await
    }

    /// Like [`submit`](Self::submit), but cancelling `abort` settles a pending
    /// request as [`FailureReason::Timeout`].
    #[instrument(skip(self, abort), fields(url = %raw_url.trim()))]
    pub async fn submit_with_cancel(
        &self,
        raw_url: &str,
        abort: CancellationToken,
    ) -> DownloadOutcome {
        let mut request = DownloadRequest::new(raw_url);

        let outcome = match self.validate(&mut request) {
            Ok(()) => self.execute(&mut request, &abort).await,
            Err(reason) => DownloadOutcome::Failed(reason),
        };

        let settled = match &outcome {
            DownloadOutcome::Succeeded(_) => request.succeed(),
            DownloadOutcome::Failed(reason) => request.fail(reason.clone()),
        };
        if let Err(error) = settled {
            warn!(error = %error, "request settled from unexpected state");
        }

        match &outcome {
            DownloadOutcome::Succeeded(target) => info!(
                title = %target.title,
                filename = %target.filename,
                bytes = target.file_size_bytes,
                elapsed = ?request.elapsed(),
                "download ready"
            ),
            DownloadOutcome::Failed(reason) => warn!(
                reason = %reason,
                severity = %reason.severity(),
                elapsed = ?request.elapsed(),
                "download failed"
            ),
        }
        self.presenter
            .notify(outcome.severity(), &outcome.user_message());
        outcome
    }

    /// Fail-fast input checks; no network traffic happens here.
    fn validate(&self, request: &mut DownloadRequest) -> Result<(), FailureReason> {
        request
            .begin_validation()
            .map_err(|e| FailureReason::ServerError(e.to_string()))?;

        let candidate = request.url_for_api();
        if candidate.is_empty() {
            return Err(FailureReason::EmptyInput);
        }
        if !is_absolute_http_url(candidate) {
            debug!("input failed URL syntax check");
            return Err(FailureReason::InvalidUrl);
        }
        request
            .mark_url_valid()
            .map_err(|e| FailureReason::ServerError(e.to_string()))?;

        let Some(found) = match_platform(request.url_for_api()) else {
            self.presenter.show_platform(None);
            return Err(FailureReason::UnsupportedPlatform);
        };
        debug!(
            platform = found.definition.key,
            content_id = found.content_id,
            "platform confirmed"
        );
        let platform = found.definition;
        self.presenter.show_platform(Some(platform));
        request
            .set_platform(platform)
            .map_err(|e| FailureReason::ServerError(e.to_string()))
    }

    async fn execute(
        &self,
        request: &mut DownloadRequest,
        abort: &CancellationToken,
    ) -> DownloadOutcome {
        if let Err(error) = request.begin_requesting() {
            return DownloadOutcome::Failed(FailureReason::ServerError(error.to_string()));
        }

        self.presenter.set_loading(true);
        let cancel = abort.child_token();
        let timers = self.start_timers(&cancel);

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(FailureReason::Timeout),
            result = self.api.request_download(request.url_for_api()) => {
                result.map_err(FailureReason::from)
            }
        };

        timers.shutdown().await;
        self.presenter.show_advisory(None);
        self.presenter.set_loading(false);

        if matches!(result, Err(FailureReason::Timeout)) {
            if abort.is_cancelled() {
                info!("request aborted by caller");
            } else {
                warn!(
                    timeout_secs = self.config.request_timeout.as_secs_f64(),
                    "request deadline elapsed"
                );
            }
        }

        match result {
            Ok(result) => {
                let target = SaveTarget::from_result(self.api.base_url(), result);
                debug!(url = %target.url, "resolved save target");
                self.presenter.save_file(&target);
                DownloadOutcome::Succeeded(target)
            }
            Err(reason) => DownloadOutcome::Failed(reason),
        }
    }

    /// Spawns the deadline timer and the advisory timers for one request.
    fn start_timers(&self, cancel: &CancellationToken) -> RequestTimers {
        let mut timers = RequestTimers::new(Arc::clone(&self.live_timers));

        let deadline = cancel.clone();
        timers.spawn("deadline", self.config.request_timeout, move || {
            deadline.cancel();
        });

        for advisory in &self.config.advisories {
            let presenter = Arc::clone(&self.presenter);
            let message = advisory.stage.message();
            timers.spawn("advisory", advisory.after, move || {
                presenter.show_advisory(Some(message));
            });
        }
        timers
    }
}

fn is_absolute_http_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
}
