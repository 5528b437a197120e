//! Terminal presentation layer: spinner, notifications, and log setup.

use std::ffi::OsString;
use std::io::{self, IsTerminal};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vidfetch_core::{PlatformDefinition, Presenter, SaveTarget, Severity};

const LOADING_MESSAGE: &str = "Requesting download...";

/// Installs the global subscriber. `RUST_LOG` wins over `default_level`.
pub(crate) fn init_tracing(default_level: &str, no_color: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let ansi = color_enabled(
        no_color,
        std::env::var_os("NO_COLOR"),
        std::env::var_os("TERM"),
    );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(ansi)
        .init();
}

fn color_enabled(flag: bool, no_color: Option<OsString>, term: Option<OsString>) -> bool {
    if flag || no_color.is_some_and(|v| !v.is_empty()) {
        return false;
    }
    term.is_none_or(|t| t != "dumb")
}

fn should_use_spinner(stderr_is_terminal: bool, quiet: bool, dumb_terminal: bool) -> bool {
    stderr_is_terminal && !quiet && !dumb_terminal
}

/// [`Presenter`] that renders to stderr/stdout and remembers the save target
/// so the caller can stream it to disk once `submit` returns.
pub(crate) struct TerminalPresenter {
    input: Mutex<Option<String>>,
    spinner: Mutex<Option<ProgressBar>>,
    save_target: Mutex<Option<SaveTarget>>,
    use_spinner: bool,
    quiet: bool,
}

impl TerminalPresenter {
    pub(crate) fn new(quiet: bool) -> Self {
        let dumb = std::env::var_os("TERM").is_some_and(|t| t == "dumb");
        Self {
            input: Mutex::new(None),
            spinner: Mutex::new(None),
            save_target: Mutex::new(None),
            use_spinner: should_use_spinner(io::stderr().is_terminal(), quiet, dumb),
            quiet,
        }
    }

    pub(crate) fn set_input(&self, text: &str) {
        *lock(&self.input) = Some(text.to_string());
    }

    /// Takes the target recorded by the last successful request.
    pub(crate) fn take_save_target(&self) -> Option<SaveTarget> {
        lock(&self.save_target).take()
    }

    /// Prints a line without tearing the spinner.
    fn print_line(&self, to_stdout: bool, line: &str) {
        let spinner = lock(&self.spinner);
        let emit = || {
            if to_stdout {
                println!("{line}");
            } else {
                eprintln!("{line}");
            }
        };
        match spinner.as_ref() {
            Some(bar) => bar.suspend(emit),
            None => emit(),
        }
    }
}

impl Presenter for TerminalPresenter {
    fn input_text(&self) -> Option<String> {
        lock(&self.input).clone()
    }

    fn show_platform(&self, platform: Option<&'static PlatformDefinition>) {
        match platform {
            Some(definition) => info!(platform = definition.display_name, "platform detected"),
            None => debug!("no platform detected"),
        }
    }

    fn set_loading(&self, loading: bool) {
        let mut spinner = lock(&self.spinner);
        if loading {
            if self.use_spinner && spinner.is_none() {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template("{spinner} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar.set_message(LOADING_MESSAGE);
                bar.enable_steady_tick(Duration::from_millis(100));
                *spinner = Some(bar);
            }
        } else if let Some(bar) = spinner.take() {
            bar.finish_and_clear();
        }
    }

    fn show_advisory(&self, message: Option<&str>) {
        let spinner = lock(&self.spinner);
        if let Some(bar) = spinner.as_ref() {
            bar.set_message(message.unwrap_or(LOADING_MESSAGE).to_string());
        } else if let Some(message) = message {
            drop(spinner);
            if !self.quiet {
                self.print_line(false, message);
            }
        }
    }

    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => {
                if !self.quiet {
                    self.print_line(true, message);
                }
            }
            Severity::Warning => self.print_line(false, &format!("warning: {message}")),
            Severity::Error => self.print_line(false, &format!("error: {message}")),
        }
    }

    fn save_file(&self, target: &SaveTarget) {
        *lock(&self.save_target) = Some(target.clone());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
