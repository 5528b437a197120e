//! Platform detection for pasted video URLs.
//!
//! Detection is a lookup against a fixed, ordered table of platform
//! definitions (see [`platforms`]). Platforms are tried in declaration order and
//! each platform's patterns in their own declared order; the first platform with
//! any matching pattern wins.
//!
//! # Example
//!
//! ```
//! use vidfetch_core::platform::{Platform, detect_platform};
//!
//! let found = detect_platform("https://youtu.be/dQw4w9WgXcQ").unwrap();
//! assert_eq!(found.platform, Platform::YouTube);
//! assert!(detect_platform("https://example.com/video").is_none());
//! ```

mod table;

use std::fmt;

use regex::Regex;
use tracing::{debug, trace};

pub use table::platforms;

/// Supported social video platforms, in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    YouTube,
    Instagram,
    TikTok,
    Facebook,
    Twitter,
    Vimeo,
}

impl Platform {
    /// Stable short key used in logs and by the presentation layer.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::YouTube => "youtube",
            Self::Instagram => "instagram",
            Self::TikTok => "tiktok",
            Self::Facebook => "facebook",
            Self::Twitter => "twitter",
            Self::Vimeo => "vimeo",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One row of the platform table.
///
/// `icon` and `color` are presentation metadata; the matcher never looks at them.
#[derive(Debug)]
pub struct PlatformDefinition {
    /// Typed identifier.
    pub platform: Platform,
    /// Unique short key (e.g. `"youtube"`).
    pub key: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Icon identifier for the platform indicator.
    pub icon: &'static str,
    /// Brand color for the platform indicator.
    pub color: &'static str,
    /// Patterns tested in order against the normalized URL.
    pub patterns: Vec<Regex>,
    /// Same patterns, case-insensitive, for capturing ids from the original input.
    id_patterns: Vec<Regex>,
}

impl PlatformDefinition {
    /// Index of the first pattern matching an already normalized URL.
    fn first_match(&self, normalized: &str) -> Option<usize> {
        self.patterns.iter().position(|pattern| pattern.is_match(normalized))
    }

    /// Captures the content id with pattern `index` against original-case input.
    fn capture_id<'a>(&self, index: usize, trimmed: &'a str) -> Option<&'a str> {
        self.id_patterns
            .get(index)?
            .captures(trimmed)?
            .get(1)
            .map(|m| m.as_str())
    }

    /// Whether any of this platform's patterns match the normalized URL.
    #[must_use]
    pub fn matches_normalized(&self, normalized: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(normalized))
    }
}

/// A successful classification plus the content id captured by the winning pattern.
#[derive(Debug, Clone, Copy)]
pub struct PlatformMatch<'a> {
    pub definition: &'static PlatformDefinition,
    /// First capture group of the winning pattern (video id, short code, ...).
    pub content_id: Option<&'a str>,
}

/// Trims and lower-cases input for pattern matching.
///
/// The original-case URL is what gets sent upstream; this form is only used
/// for classification.
#[must_use]
pub fn normalize_for_matching(url: &str) -> String {
    url.trim().to_lowercase()
}

/// Identifies the platform a URL belongs to.
///
/// Returns `None` for empty, malformed, or unrecognized input. This never fails.
#[must_use]
pub fn detect_platform(url: &str) -> Option<&'static PlatformDefinition> {
    let normalized = normalize_for_matching(url);
    if normalized.is_empty() {
        return None;
    }
    let found = platforms()
        .iter()
        .find(|definition| definition.matches_normalized(&normalized));
    match found {
        Some(definition) => trace!(platform = definition.key, "platform detected"),
        None => trace!("no platform pattern matched"),
    }
    found
}

/// Classifies a URL and captures the content id of the winning pattern.
///
/// Classification runs on the normalized form; the id is captured from the
/// trimmed input so case-sensitive ids keep their case.
#[must_use]
pub fn match_platform(url: &str) -> Option<PlatformMatch<'_>> {
    let normalized = normalize_for_matching(url);
    if normalized.is_empty() {
        return None;
    }
    let trimmed = url.trim();
    platforms().iter().find_map(|definition| {
        definition.first_match(&normalized).map(|index| {
            let content_id = definition.capture_id(index, trimmed);
            debug!(platform = definition.key, content_id, "platform matched");
            PlatformMatch {
                definition,
                content_id,
            }
        })
    })
}

/// Looks up a platform definition by its short key.
#[must_use]
pub fn definition_for(platform: Platform) -> Option<&'static PlatformDefinition> {
    platforms().iter().find(|definition| definition.platform == platform)
}
