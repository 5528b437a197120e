//! The ordered platform table.
//!
//! Order matters: platforms are tried top to bottom and the first match wins.
//! Patterns run against trimmed, lower-cased input.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::{Platform, PlatformDefinition};

const YOUTUBE_PATTERNS: &[&str] = &[
    r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([a-z0-9_-]{11})",
    r"youtube\.com/shorts/([a-z0-9_-]{11})",
];

const INSTAGRAM_PATTERNS: &[&str] = &[
    r"instagram\.com/(?:p|reel|tv)/([a-z0-9_-]+)",
    r"instagram\.com/stories/[a-z0-9_.-]+/(\d+)",
];

const TIKTOK_PATTERNS: &[&str] = &[
    r"tiktok\.com/@[a-z0-9_.-]+/video/(\d+)",
    r"vm\.tiktok\.com/([a-z0-9]+)",
    r"vt\.tiktok\.com/([a-z0-9]+)",
];

const FACEBOOK_PATTERNS: &[&str] = &[
    r"facebook\.com/videos/(\d+)",
    r"facebook\.com/[^/?#]+/videos/(?:[^/?#]+/)?(\d+)",
    r"facebook\.com/watch/?\?v=(\d+)",
    r"facebook\.com/reels?/(\d+)",
    r"facebook\.com/share/[rvp]/([a-z0-9]+)",
    r"facebook\.com/groups/[^/?#]+/posts/(\d+)",
    r"facebook\.com/[^/?#]+/posts/([a-z0-9]+)",
    r"facebook\.com/story\.php\?story_fbid=(\w+)",
    r"facebook\.com/permalink\.php\?story_fbid=(\w+)",
    r"fb\.watch/([a-z0-9_-]+)",
];

// Both hosts are anchored to a host boundary so `netflix.com` or
// `nottwitter.com` never match.
const TWITTER_PATTERNS: &[&str] = &[
    r"(?:^|[/.])twitter\.com/[^/?#]+/status/(\d+)",
    r"(?:^|[/.])x\.com/[^/?#]+/status/(\d+)",
];

const VIMEO_PATTERNS: &[&str] = &[
    r"vimeo\.com/(\d+)",
    r"player\.vimeo\.com/video/(\d+)",
];

#[allow(clippy::expect_used)]
fn compile(patterns: &[&str], case_insensitive: bool) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(case_insensitive)
                .build()
                .expect("platform regex is valid") // Static pattern, safe to panic
        })
        .collect()
}

fn definition(
    platform: Platform,
    display_name: &'static str,
    icon: &'static str,
    color: &'static str,
    patterns: &[&str],
) -> PlatformDefinition {
    PlatformDefinition {
        platform,
        key: platform.key(),
        display_name,
        icon,
        color,
        patterns: compile(patterns, false),
        id_patterns: compile(patterns, true),
    }
}

static PLATFORMS: LazyLock<Vec<PlatformDefinition>> = LazyLock::new(|| {
    vec![
        definition(Platform::YouTube, "YouTube", "fab fa-youtube", "#FF0000", YOUTUBE_PATTERNS),
        definition(
            Platform::Instagram,
            "Instagram",
            "fab fa-instagram",
            "#E4405F",
            INSTAGRAM_PATTERNS,
        ),
        definition(Platform::TikTok, "TikTok", "fab fa-tiktok", "#000000", TIKTOK_PATTERNS),
        definition(Platform::Facebook, "Facebook", "fab fa-facebook", "#1877F2", FACEBOOK_PATTERNS),
        definition(Platform::Twitter, "Twitter/X", "fab fa-x-twitter", "#1DA1F2", TWITTER_PATTERNS),
        definition(Platform::Vimeo, "Vimeo", "fab fa-vimeo-v", "#1AB7EA", VIMEO_PATTERNS),
    ]
});

/// Returns the platform table in detection order.
#[must_use]
pub fn platforms() -> &'static [PlatformDefinition] {
    PLATFORMS.as_slice()
}
