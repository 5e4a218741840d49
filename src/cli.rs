//! Command-line interface parsing for gethosts
//!
//! This module handles parsing of CLI arguments using clap, including Go-style
//! durations for the cache window and the optional `prefix@pattern` argument.

use clap::Parser;
use directories::BaseDirs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::config::FetchConfig;
use crate::filter::PatternFilter;

/// Default download location of the host list
pub const DEFAULT_URL: &str = "https://<forman-host>/hosts";

/// Name of the cache directory under the user's home
const CACHE_DIR_NAME: &str = ".gethosts";

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The duration string is not understood
    #[error("Invalid duration: '{0}'. Use a number with a unit, e.g. 90s, 30m, 1h30m")]
    InvalidDuration(String),

    /// No cache directory was given and the home directory is unknown
    #[error("Could not determine home directory; pass --cachedir")]
    NoHomeDir,
}

/// gethosts - Print a cached host list fetched from a remote inventory
#[derive(Parser, Debug)]
#[command(name = "gethosts")]
#[command(about = "Fetch, cache and filter a remote host list")]
#[command(version)]
pub struct Cli {
    /// URL of the host list
    #[arg(long, env = "GETHOSTS_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Directory holding the cache file [default: ~/.gethosts]
    #[arg(long, env = "GETHOSTS_CACHE_DIR", value_name = "DIR")]
    pub cachedir: Option<PathBuf>,

    /// Name of the cache file
    #[arg(long, env = "GETHOSTS_CACHE_FILE", default_value = "hostslist.txt")]
    pub cachefile: String,

    /// User name for authentication
    #[arg(long, env = "GETHOSTS_USER", default_value = "")]
    pub user: String,

    /// Password for authentication
    #[arg(long, env = "GETHOSTS_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Cache duration before trying to refresh
    #[arg(long, env = "GETHOSTS_CACHE_DURATION", default_value = "1h", value_parser = parse_duration)]
    pub cacheduration: Duration,

    /// Accept invalid TLS certificates (self-signed servers)
    ///
    /// Disables certificate validation for the download. Anyone able to
    /// intercept the connection can then read the credentials and forge the
    /// host list.
    #[arg(long, env = "GETHOSTS_INSECURE")]
    pub insecure: bool,

    /// Fail the download when the server answers with a non-2xx status
    ///
    /// By default the body is parsed whatever the status, and a warning is
    /// logged.
    #[arg(long, env = "GETHOSTS_STRICT_STATUS")]
    pub strict_status: bool,

    /// Give up on the download after this long
    #[arg(long, env = "GETHOSTS_TIMEOUT", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Log level for messages on stderr (RUST_LOG takes precedence)
    #[arg(long, env = "GETHOSTS_LOG", default_value = "info")]
    pub log_level: String,

    /// Only print hosts starting with PATTERN; `prefix@PATTERN` also
    /// prints `prefix` in front of every match
    pub pattern: Option<String>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Download and cache settings
    pub fetch: FetchConfig,
    /// Output filter, if a pattern was given
    pub filter: Option<PatternFilter>,
}

/// Parses a Go-style duration such as `1h`, `1h30m`, `1.5h` or `250ms`
///
/// Supported units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare
/// `0` is accepted as zero and a leading `+` is allowed. Negative durations
/// and values beyond `u64::MAX` nanoseconds are rejected.
pub fn parse_duration(s: &str) -> Result<Duration, CliError> {
    let invalid = || CliError::InvalidDuration(s.to_string());
    let trimmed = s.trim();
    let input = trimmed.strip_prefix('+').unwrap_or(trimmed);

    if input == "0" {
        return Ok(Duration::ZERO);
    }
    if input.is_empty() {
        return Err(invalid());
    }

    let mut nanos = 0f64;
    let mut rest = input;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(invalid());
        }
        let value: f64 = rest[..number_len].parse().map_err(|_| invalid())?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return Err(invalid()),
        };
        rest = &rest[unit_len..];

        nanos += value * scale;
    }

    let nanos = nanos.round();
    if !nanos.is_finite() || nanos >= u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(Duration::from_nanos(nanos as u64))
}

/// Default cache directory, `~/.gethosts`
pub fn default_cache_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CACHE_DIR_NAME))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with the resolved cache directory
    /// * `Err(CliError::NoHomeDir)` if no cache dir was given and there is no home
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let cache_dir = match &cli.cachedir {
            Some(dir) => dir.clone(),
            None => default_cache_dir().ok_or(CliError::NoHomeDir)?,
        };

        Ok(StartupConfig {
            fetch: FetchConfig {
                url: cli.url.clone(),
                user: cli.user.clone(),
                password: cli.password.clone(),
                cache_dir,
                cache_file: cli.cachefile.clone(),
                cache_duration: cli.cacheduration,
                insecure: cli.insecure,
                timeout: cli.timeout,
                strict_status: cli.strict_status,
            },
            filter: cli.pattern.as_deref().map(PatternFilter::parse),
        })
    }
}
