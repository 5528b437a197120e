//! Integration tests for the request controller.
//!
//! Timing-sensitive tests run against a scripted API on a paused clock; the
//! wire-level tests run the real HTTP client against a mock server.

mod support;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use vidfetch_core::config::{AdvisoryStage, ControllerConfig, DEFAULT_REQUEST_TIMEOUT};
use vidfetch_core::{ApiError, DownloadOutcome, DownloadRequestController, FailureReason, Severity};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{Event, RecordingPresenter, Script, ScriptedApi, sample_result};

const API_BASE: &str = "http://127.0.0.1:7860";
const YOUTUBE_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

fn scripted(
    script: Script,
    input: &str,
) -> (
    DownloadRequestController,
    Arc<ScriptedApi>,
    Arc<RecordingPresenter>,
) {
    let api = Arc::new(ScriptedApi::new(API_BASE, script));
    let presenter = Arc::new(RecordingPresenter::with_input(input));
    let config = ControllerConfig::new(API_BASE).unwrap();
    let controller = DownloadRequestController::with_api(config, api.clone(), presenter.clone());
    (controller, api, presenter)
}

fn http_controller(
    base: &str,
    config: impl FnOnce(ControllerConfig) -> ControllerConfig,
) -> (DownloadRequestController, Arc<RecordingPresenter>) {
    let presenter = Arc::new(RecordingPresenter::default());
    let config = config(ControllerConfig::new(base).unwrap());
    let controller = DownloadRequestController::new(config, presenter.clone()).unwrap();
    (controller, presenter)
}

// ==================== Validation (no network) ====================

#[tokio::test]
async fn test_empty_input_fails_without_api_call() {
    let (controller, api, presenter) = scripted(Script::Respond(sample_result("/f.mp4")), "");

    let outcome = controller.submit("   ").await;

    assert_eq!(outcome, DownloadOutcome::Failed(FailureReason::EmptyInput));
    assert_eq!(api.calls(), 0);
    assert!(presenter.loading_toggles().is_empty());
    let notes = presenter.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].0, Severity::Warning);
}

#[tokio::test]
async fn test_invalid_url_fails_without_api_call() {
    let (controller, api, presenter) = scripted(Script::Respond(sample_result("/f.mp4")), "");

    for input in ["not a url", "youtube.com/watch?v=dQw4w9WgXcQ", "ftp://vimeo.com/1"] {
        let outcome = controller.submit(input).await;
        assert_eq!(
            outcome,
            DownloadOutcome::Failed(FailureReason::InvalidUrl),
            "{input}"
        );
    }
    assert_eq!(api.calls(), 0);
    assert!(presenter.loading_toggles().is_empty());
}

#[tokio::test]
async fn test_unsupported_platform_hides_indicator_without_api_call() {
    let (controller, api, presenter) = scripted(Script::Respond(sample_result("/f.mp4")), "");

    let outcome = controller.submit("https://example.com/video/123").await;

    assert_eq!(
        outcome,
        DownloadOutcome::Failed(FailureReason::UnsupportedPlatform)
    );
    assert_eq!(api.calls(), 0);
    assert!(presenter.events().contains(&Event::Platform(None)));
    let (severity, message) = &presenter.notifications()[0];
    assert_eq!(*severity, Severity::Warning);
    assert!(message.contains("YouTube"), "{message}");
}

// ==================== Success path ====================

#[tokio::test]
async fn test_success_resolves_relative_url_and_saves() {
    let (controller, api, presenter) = scripted(
        Script::Respond(sample_result("/downloads/never_gonna.mp4")),
        "",
    );

    let outcome = controller.submit(&format!("  {YOUTUBE_URL}  ")).await;

    let DownloadOutcome::Succeeded(target) = &outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(target.url, "http://127.0.0.1:7860/downloads/never_gonna.mp4");
    assert_eq!(target.filename, "never_gonna.mp4");
    assert_eq!(api.calls(), 1);
    assert_eq!(api.last_url().as_deref(), Some(YOUTUBE_URL));
    assert_eq!(presenter.saves(), vec![target.clone()]);
    assert_eq!(presenter.loading_toggles(), vec![true, false]);
    assert_eq!(
        presenter.notifications(),
        vec![(
            Severity::Success,
            "Download ready: Never Gonna Give You Up".to_string()
        )]
    );
    assert_eq!(controller.active_timers(), 0);
}

#[tokio::test]
async fn test_api_receives_original_case() {
    let (controller, api, _presenter) =
        scripted(Script::Respond(sample_result("/f.mp4")), "");

    let input = "https://www.instagram.com/reel/CxYzAbC123/";
    let outcome = controller.submit(input).await;

    assert!(outcome.is_success());
    assert_eq!(api.last_url().as_deref(), Some(input));
}

#[tokio::test]
async fn test_absolute_download_url_is_kept() {
    let (controller, _api, presenter) = scripted(
        Script::Respond(sample_result("https://cdn.example.net/v/abc.mp4")),
        "",
    );

    controller.submit("https://vimeo.com/76979871").await;

    assert_eq!(presenter.saves()[0].url, "https://cdn.example.net/v/abc.mp4");
}

#[tokio::test]
async fn test_on_submit_reads_presenter_input() {
    let (controller, api, presenter) = scripted(
        Script::Respond(sample_result("/f.mp4")),
        "https://vm.tiktok.com/ZMabc123/",
    );

    let outcome = controller.on_submit().await;

    assert!(outcome.is_success());
    assert_eq!(api.calls(), 1);
    assert!(presenter.events().contains(&Event::Platform(Some("tiktok"))));
}

#[tokio::test]
async fn test_on_submit_without_input_is_empty_input() {
    let api = Arc::new(ScriptedApi::new(API_BASE, Script::Hang));
    let presenter = Arc::new(RecordingPresenter::default());
    let controller = DownloadRequestController::with_api(
        ControllerConfig::new(API_BASE).unwrap(),
        api.clone(),
        presenter,
    );

    let outcome = controller.on_submit().await;

    assert_eq!(outcome.failure(), Some(&FailureReason::EmptyInput));
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn test_input_changes_update_indicator() {
    let (controller, _api, presenter) = scripted(Script::Hang, "");

    let found = controller.on_input_changed(Some("https://x.com/user/status/1234567890"));
    assert_eq!(found.map(|d| d.key), Some("twitter"));
    controller.on_input_changed(Some("https://example.com"));
    controller.on_input_changed(None);

    assert_eq!(
        presenter.events(),
        vec![
            Event::Platform(Some("twitter")),
            Event::Platform(None),
            Event::Platform(None),
        ]
    );
}

// ==================== Deadline and advisories ====================

#[tokio::test]
async fn test_hung_request_times_out_with_both_advisories() {
    tokio::time::pause();
    let (controller, api, presenter) = scripted(Script::Hang, "");
    let started = tokio::time::Instant::now();

    let outcome = controller.submit(YOUTUBE_URL).await;

    assert_eq!(outcome, DownloadOutcome::Failed(FailureReason::Timeout));
    assert!(started.elapsed() >= DEFAULT_REQUEST_TIMEOUT);
    assert_eq!(api.calls(), 1);
    assert_eq!(
        presenter.advisories(),
        vec![
            Some(AdvisoryStage::StillWorking.message().to_string()),
            Some(AdvisoryStage::LargeFile.message().to_string()),
            None,
        ]
    );
    assert_eq!(presenter.loading_toggles(), vec![true, false]);
    let (severity, message) = presenter.notifications().pop().unwrap();
    assert_eq!(severity, Severity::Error);
    assert!(message.contains("timed out"), "{message}");
    assert_eq!(controller.active_timers(), 0);
}

#[tokio::test]
async fn test_response_before_second_advisory_shows_only_first() {
    tokio::time::pause();
    let (controller, _api, presenter) = scripted(
        Script::RespondAfter(Duration::from_secs(15), sample_result("/f.mp4")),
        "",
    );

    let outcome = controller.submit(YOUTUBE_URL).await;

    assert!(outcome.is_success());
    assert_eq!(
        presenter.advisories(),
        vec![Some(AdvisoryStage::StillWorking.message().to_string()), None]
    );
    assert_eq!(controller.active_timers(), 0);
}

#[tokio::test]
async fn test_fast_response_shows_no_advisory() {
    tokio::time::pause();
    let (controller, _api, presenter) = scripted(
        Script::RespondAfter(Duration::from_secs(2), sample_result("/f.mp4")),
        "",
    );

    controller.submit(YOUTUBE_URL).await;
    // Timers must not fire after the request settled.
    tokio::time::sleep(Duration::from_secs(120)).await;

    assert_eq!(presenter.advisories(), vec![None]);
    assert_eq!(controller.active_timers(), 0);
}

#[tokio::test]
async fn test_abort_settles_as_timeout() {
    let (controller, _api, presenter) = scripted(Script::Hang, "");
    let abort = CancellationToken::new();
    let trigger = abort.clone();

    let (outcome, ()) = tokio::join!(controller.submit_with_cancel(YOUTUBE_URL, abort), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    assert_eq!(outcome, DownloadOutcome::Failed(FailureReason::Timeout));
    assert_eq!(presenter.loading_toggles(), vec![true, false]);
    assert_eq!(controller.active_timers(), 0);
}

#[tokio::test]
async fn test_concurrent_submits_are_independent() {
    tokio::time::pause();
    let (controller, api, presenter) = scripted(
        Script::RespondAfter(Duration::from_secs(1), sample_result("/f.mp4")),
        "",
    );

    let (first, second) = tokio::join!(
        controller.submit(YOUTUBE_URL),
        controller.submit("https://vimeo.com/76979871")
    );

    assert!(first.is_success());
    assert!(second.is_success());
    assert_eq!(api.calls(), 2);
    assert_eq!(presenter.saves().len(), 2);
    assert_eq!(controller.active_timers(), 0);
}

// ==================== Error classification ====================

#[tokio::test]
async fn test_api_errors_map_to_failure_reasons() {
    let cases: [(fn() -> ApiError, FailureReason); 3] = [
        (
            || ApiError::ServiceUnavailable { status: 503 },
            FailureReason::ServiceUnavailable,
        ),
        (
            || ApiError::unexpected(200, "not json"),
            FailureReason::UnexpectedResponse,
        ),
        (
            || ApiError::server(422, "Video is private"),
            FailureReason::ServerError("Video is private".to_string()),
        ),
    ];

    for (make, expected) in cases {
        let (controller, _api, presenter) = scripted(Script::Fail(make), "");
        let outcome = controller.submit(YOUTUBE_URL).await;
        assert_eq!(outcome, DownloadOutcome::Failed(expected.clone()));
        assert_eq!(presenter.notifications()[0].0, Severity::Error);
        assert_eq!(presenter.notifications()[0].1, expected.user_message());
        assert!(presenter.saves().is_empty());
    }
}

// ==================== Over HTTP ====================

#[tokio::test]
async fn test_http_success_resolves_against_api_base() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Clip",
            "download_url": "files/clip.mp4",
            "filename": "clip.mp4",
            "file_size": 42
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (controller, presenter) = http_controller(&format!("{}/", server.uri()), |c| c);
    let outcome = controller.submit(YOUTUBE_URL).await;

    let DownloadOutcome::Succeeded(target) = outcome else {
        panic!("expected success");
    };
    assert_eq!(target.url, format!("{}/files/clip.mp4", server.uri()));
    assert_eq!(target.file_size_bytes, 42);
    assert_eq!(presenter.saves().len(), 1);
}

#[tokio::test]
async fn test_http_sleeping_backend_is_service_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_raw("<html><body>Your space is sleeping</body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let (controller, _presenter) = http_controller(&server.uri(), |c| c);
    let outcome = controller.submit(YOUTUBE_URL).await;

    assert_eq!(
        outcome,
        DownloadOutcome::Failed(FailureReason::ServiceUnavailable)
    );
}

#[tokio::test]
async fn test_http_html_success_is_unexpected_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let (controller, _presenter) = http_controller(&server.uri(), |c| c);
    let outcome = controller.submit(YOUTUBE_URL).await;

    assert_eq!(
        outcome,
        DownloadOutcome::Failed(FailureReason::UnexpectedResponse)
    );
}

#[tokio::test]
async fn test_http_json_error_detail_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Video unavailable"})),
        )
        .mount(&server)
        .await;

    let (controller, presenter) = http_controller(&server.uri(), |c| c);
    let outcome = controller.submit(YOUTUBE_URL).await;

    assert_eq!(
        outcome,
        DownloadOutcome::Failed(FailureReason::ServerError("Video unavailable".into()))
    );
    assert_eq!(presenter.notifications()[0].1, "Video unavailable");
}

#[tokio::test]
async fn test_http_slow_backend_hits_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "title": "Slow",
                    "download_url": "/f.mp4",
                    "filename": "f.mp4",
                    "file_size": 1
                }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let (controller, presenter) = http_controller(&server.uri(), |c| {
        c.with_request_timeout(Duration::from_millis(300))
            .with_advisories(Vec::new())
    });
    let started = std::time::Instant::now();
    let outcome = controller.submit(YOUTUBE_URL).await;

    assert_eq!(outcome, DownloadOutcome::Failed(FailureReason::Timeout));
    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(presenter.saves().is_empty());
    assert_eq!(controller.active_timers(), 0);
}

#[tokio::test]
async fn test_http_connection_refused_is_connection_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let (controller, _presenter) = http_controller(&base, |c| c);
    let outcome = controller.submit(YOUTUBE_URL).await;

    assert_eq!(
        outcome,
        DownloadOutcome::Failed(FailureReason::ConnectionError)
    );
}
