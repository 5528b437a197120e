//! The presentation-layer seam.
//!
//! The controller never touches UI state directly; it reads the current input
//! and writes indicator, loading, advisory, and notification state through
//! this trait. Implementations confine the actual UI updates to whatever
//! thread owns the UI; methods may be called from timer tasks.

use crate::platform::PlatformDefinition;

use super::outcome::{SaveTarget, Severity};

/// Everything the controller needs from a presentation layer.
pub trait Presenter: Send + Sync {
    /// Current contents of the URL input, if the input exists.
    fn input_text(&self) -> Option<String>;

    /// Shows the detected platform, or hides the indicator for `None`.
    fn show_platform(&self, platform: Option<&'static PlatformDefinition>);

    /// Toggles the loading state (disabled submit, spinner).
    fn set_loading(&self, loading: bool);

    /// Shows a staged advisory message, or clears it for `None`.
    fn show_advisory(&self, message: Option<&str>);

    /// Shows a transient notification.
    fn notify(&self, severity: Severity, message: &str);

    /// Saves the resolved file under the given name.
    fn save_file(&self, target: &SaveTarget);
}
