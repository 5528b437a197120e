//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use vidfetch_core::config::MAX_REQUEST_TIMEOUT_SECS;

/// Fetch a social media video through a remote download API.
///
/// Paste a YouTube, Instagram, TikTok, Facebook, Twitter/X, or Vimeo link; the
/// API downloads it and vidfetch saves the finished file locally.
#[derive(Parser, Debug)]
#[command(name = "vidfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Video URL (read from stdin when omitted)
    pub url: Option<String>,

    /// Base URL of the download API (overrides VIDFETCH_API_URL and config file)
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Request deadline in seconds
    #[arg(short = 't', long, value_parser = clap::value_parser!(u64).range(1..=MAX_REQUEST_TIMEOUT_SECS))]
    pub timeout: Option<u64>,

    /// Directory to save the finished file into
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Only detect the platform; do not contact the API
    #[arg(long)]
    pub detect: bool,

    /// Resolve the download but do not save the file
    #[arg(long = "no-save")]
    pub no_save: bool,

    /// List supported platforms and exit
    #[arg(long = "list-platforms")]
    pub list_platforms: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
