//! Shared User-Agent string for API and save HTTP clients.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/vidfetch";

/// Default User-Agent for every outbound request (identifies the tool and version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("vidfetch/{version} (+{PROJECT_UA_URL})")
}
