//! On-disk defaults for the CLI.
//!
//! The file is a flat list of `key = value` lines; `#` starts a comment.
//!
//! ```text
//! api_base_url = "https://my-space.example.com"
//! request_timeout_secs = 55
//! output_dir = "~/Videos"
//! verbosity = "verbose"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ConfigError, MAX_REQUEST_TIMEOUT_SECS};

/// Parsed config file. Every field is optional; unset fields fall through to
/// the next layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub verbosity: Option<VerbositySetting>,
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the tracing filter level for this setting.
    #[must_use]
    pub fn log_level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "default" => Some(Self::Default),
            "verbose" => Some(Self::Verbose),
            "quiet" => Some(Self::Quiet),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed config when the file exists.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/vidfetch/config.toml`
/// 2. `$HOME/.config/vidfetch/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("vidfetch")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("vidfetch")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if present.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
pub fn load_default_file_config() -> Result<LoadedConfig, ConfigError> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(p) if p.exists() => Some(load_file_config(p)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

/// Loads and parses a config file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when reading fails, or a parse error.
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config_str(&raw)?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Parses config file contents.
///
/// # Errors
///
/// Returns [`ConfigError`] on syntax errors, unknown keys, or invalid values.
pub fn parse_config_str(raw: &str) -> Result<FileConfig, ConfigError> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            return Err(ConfigError::Syntax { line: line_no });
        };
        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            line: line_no,
            reason: reason.to_string(),
        };

        match key {
            "api_base_url" => {
                let parsed = parse_string_literal(value).ok_or_else(|| invalid("expected a quoted string"))?;
                cfg.api_base_url = Some(parsed);
            }
            "request_timeout_secs" => {
                let parsed: u64 = value.parse().map_err(|_| invalid("expected an integer"))?;
                if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&parsed) {
                    return Err(invalid(&format!(
                        "expected range 1..={MAX_REQUEST_TIMEOUT_SECS}"
                    )));
                }
                cfg.request_timeout_secs = Some(parsed);
            }
            "output_dir" => {
                let parsed = parse_string_literal(value).ok_or_else(|| invalid("expected a quoted string"))?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).ok_or_else(|| invalid("expected a quoted string"))?;
                cfg.verbosity = Some(
                    VerbositySetting::parse(&parsed)
                        .ok_or_else(|| invalid("expected default, verbose, quiet, or debug"))?,
                );
            }
            other => {
                return Err(ConfigError::UnknownKey {
                    key: other.to_string(),
                    line: line_no,
                });
            }
        }
    }
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_quotes = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => return &line[..idx],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(value: &str) -> Option<String> {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(str::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let raw = r#"
# defaults for vidfetch
api_base_url = "https://my-space.example.com"  # hosted backend
request_timeout_secs = 90
output_dir = "/tmp/videos"
verbosity = "verbose"
"#;
        let cfg = parse_config_str(raw).unwrap();
        assert_eq!(cfg.api_base_url.as_deref(), Some("https://my-space.example.com"));
        assert_eq!(cfg.request_timeout_secs, Some(90));
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/tmp/videos")));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
    }

    #[test]
    fn test_parse_empty_config_is_default() {
        assert_eq!(parse_config_str("\n# nothing\n").unwrap(), FileConfig::default());
    }

    #[test]
    fn test_hash_inside_quotes_is_kept() {
        let cfg = parse_config_str(r#"api_base_url = "https://h.example.com/#frag""#).unwrap();
        assert_eq!(cfg.api_base_url.as_deref(), Some("https://h.example.com/#frag"));
    }

    #[test]
    fn test_missing_equals_is_syntax_error() {
        let err = parse_config_str("api_base_url").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 1 }));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = parse_config_str("\nconcurrency = 4").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey { line: 2, .. }));
    }

    #[test]
    fn test_timeout_out_of_range_is_rejected() {
        assert!(matches!(
            parse_config_str("request_timeout_secs = 0").unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
        assert!(matches!(
            parse_config_str("request_timeout_secs = 601").unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
        assert!(parse_config_str("request_timeout_secs = 600").is_ok());
    }

    #[test]
    fn test_unquoted_string_is_rejected() {
        let err = parse_config_str("api_base_url = https://x.example.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_bad_verbosity_is_rejected() {
        let err = parse_config_str(r#"verbosity = "loud""#).unwrap_err();
        assert!(err.to_string().contains("verbosity"));
    }

    #[test]
    fn test_verbosity_log_levels() {
        assert_eq!(VerbositySetting::Default.log_level(), "info");
        assert_eq!(VerbositySetting::Verbose.log_level(), "debug");
        assert_eq!(VerbositySetting::Quiet.log_level(), "error");
        assert_eq!(VerbositySetting::Debug.log_level(), "trace");
    }

    #[test]
    fn test_load_file_config_reads_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "request_timeout_secs = 30\n").unwrap();
        let cfg = load_file_config(&path).unwrap();
        assert_eq!(cfg.request_timeout_secs, Some(30));
    }

    #[test]
    fn test_load_file_config_missing_file_is_io_error() {
        let err = load_file_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
