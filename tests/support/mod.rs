//! Shared doubles for controller tests: a recording presenter and a scripted API.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use vidfetch_core::{
    ApiError, DownloadApi, DownloadResult, PlatformDefinition, Presenter, SaveTarget, Severity,
};

/// One presenter call, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Platform(Option<&'static str>),
    Loading(bool),
    Advisory(Option<String>),
    Notify(Severity, String),
    Save(SaveTarget),
}

/// Presenter that records every call.
#[derive(Default)]
pub struct RecordingPresenter {
    input: Mutex<Option<String>>,
    events: Mutex<Vec<Event>>,
}

impl RecordingPresenter {
    pub fn with_input(text: &str) -> Self {
        Self {
            input: Mutex::new(Some(text.to_string())),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn advisories(&self) -> Vec<Option<String>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Advisory(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<(Severity, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Notify(severity, message) => Some((severity, message)),
                _ => None,
            })
            .collect()
    }

    pub fn saves(&self) -> Vec<SaveTarget> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Save(target) => Some(target),
                _ => None,
            })
            .collect()
    }

    pub fn loading_toggles(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Loading(on) => Some(on),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Presenter for RecordingPresenter {
    fn input_text(&self) -> Option<String> {
        self.input.lock().unwrap().clone()
    }

    fn show_platform(&self, platform: Option<&'static PlatformDefinition>) {
        self.push(Event::Platform(platform.map(|d| d.key)));
    }

    fn set_loading(&self, loading: bool) {
        self.push(Event::Loading(loading));
    }

    fn show_advisory(&self, message: Option<&str>) {
        self.push(Event::Advisory(message.map(str::to_string)));
    }

    fn notify(&self, severity: Severity, message: &str) {
        self.push(Event::Notify(severity, message.to_string()));
    }

    fn save_file(&self, target: &SaveTarget) {
        self.push(Event::Save(target.clone()));
    }
}

/// How the scripted API answers.
pub enum Script {
    Respond(DownloadResult),
    RespondAfter(Duration, DownloadResult),
    Fail(fn() -> ApiError),
    Hang,
}

/// [`DownloadApi`] double that counts calls.
pub struct ScriptedApi {
    base_url: String,
    script: Script,
    calls: AtomicUsize,
    last_url: Mutex<Option<String>>,
}

impl ScriptedApi {
    pub fn new(base_url: &str, script: Script) -> Self {
        Self {
            base_url: base_url.to_string(),
            script,
            calls: AtomicUsize::new(0),
            last_url: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_url(&self) -> Option<String> {
        self.last_url.lock().unwrap().clone()
    }
}

#[async_trait]
impl DownloadApi for ScriptedApi {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request_download(&self, url: &str) -> Result<DownloadResult, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_url.lock().unwrap() = Some(url.to_string());
        match &self.script {
            Script::Respond(result) => Ok(result.clone()),
            Script::RespondAfter(delay, result) => {
                tokio::time::sleep(*delay).await;
                Ok(result.clone())
            }
            Script::Fail(make) => Err(make()),
            Script::Hang => std::future::pending().await,
        }
    }
}

pub fn sample_result(download_url: &str) -> DownloadResult {
    DownloadResult {
        title: "Never Gonna Give You Up".to_string(),
        download_url: download_url.to_string(),
        filename: "never_gonna.mp4".to_string(),
        file_size_bytes: 1024,
    }
}
