//! Layers CLI flags, environment, and the config file into runtime settings.
//!
//! Precedence for each value: CLI flag, then `VIDFETCH_API_URL` (API URL only),
//! then the config file, then the built-in default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use vidfetch_core::ControllerConfig;
use vidfetch_core::config::{
    DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT, FileConfig, VerbositySetting,
};

use crate::cli::Args;

/// Where the effective API base URL came from, for debug logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApiUrlSource {
    Flag,
    Env,
    File,
    Default,
}

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) controller: ControllerConfig,
    pub(crate) api_url_source: ApiUrlSource,
    pub(crate) output_dir: PathBuf,
}

/// Filter level used when `RUST_LOG` is unset.
pub(crate) fn default_log_level(args: &Args, file_config: Option<&FileConfig>) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => file_config
            .and_then(|c| c.verbosity)
            .map_or("info", VerbositySetting::log_level),
        1 => "debug",
        _ => "trace",
    }
}

pub(crate) fn resolve_settings(
    args: &Args,
    env_api_url: Option<String>,
    file_config: Option<&FileConfig>,
    home: Option<&Path>,
) -> Result<Settings> {
    let env_api_url = env_api_url.filter(|v| !v.trim().is_empty());
    let (api_base_url, api_url_source) = if let Some(url) = &args.api_url {
        (url.clone(), ApiUrlSource::Flag)
    } else if let Some(url) = env_api_url {
        (url, ApiUrlSource::Env)
    } else if let Some(url) = file_config.and_then(|c| c.api_base_url.clone()) {
        (url, ApiUrlSource::File)
    } else {
        (DEFAULT_API_BASE_URL.to_string(), ApiUrlSource::Default)
    };

    let request_timeout = args
        .timeout
        .or_else(|| file_config.and_then(|c| c.request_timeout_secs))
        .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs);

    let controller = ControllerConfig::new(&api_base_url)
        .with_context(|| format!("API base URL from {api_url_source:?} is not usable"))?
        .with_request_timeout(request_timeout);

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| file_config.and_then(|c| c.output_dir.clone()))
        .map_or_else(|| PathBuf::from("."), |dir| expand_home(&dir, home));

    Ok(Settings {
        controller,
        api_url_source,
        output_dir,
    })
}

/// Expands a leading `~` using `home`; other paths pass through.
fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
