//! Harness configuration.
//!
//! Values are layered, later layers winning: built-in defaults, then an
//! optional TOML file, then `BOA_*` environment variables. Command-line
//! options are applied on top by the CLI. Invalid environment values fall
//! back to the layer below without failing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `BOA_EXECUTABLE` | `./boa` | Analyzer executable |
//! | `BOA_SOURCE_SUFFIX` | `.c` | Test source suffix |
//! | `BOA_ASSERTS_SUFFIX` | `.asserts` | Assertion file suffix |
//! | `BOA_TIMEOUT_SECS` | 120 | Analyzer timeout (secs, min 1) |
//! | `BOA_PROTOCOL` | `legacy` | Diagnostic encoding (`legacy`, `json`) |
//! | `BOA_LOG` | `warn` | Log filter |
//! | `BOA_LOG_FORMAT` | `pretty` | Log format (`pretty`, `json`) |
//! | `BOA_LOG_FILE` | unset | Write logs to this file instead of stderr |
//!
//! # File format
//!
//! ```toml
//! analyzer = "./build/boa"
//! timeout_secs = 30
//! flags = ["-mem2reg"]
//!
//! [log]
//! level = "debug"
//! format = "json"
//! file = "boa-test.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::protocol::ProtocolMode;
use crate::telemetry::{LogConfig, LogFormat};

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Effective harness configuration.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Analyzer executable.
    pub analyzer: PathBuf,
    /// Flags passed to the analyzer before any given on the command line.
    pub flags: Vec<String>,
    pub source_suffix: String,
    pub asserts_suffix: String,
    /// Hard limit on one analyzer run.
    pub timeout: Duration,
    pub protocol: ProtocolMode,
    pub log: LogConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            analyzer: PathBuf::from("./boa"),
            flags: Vec::new(),
            source_suffix: ".c".to_string(),
            asserts_suffix: ".asserts".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            protocol: ProtocolMode::Legacy,
            log: LogConfig::default(),
        }
    }
}

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// On-disk configuration. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub analyzer: Option<PathBuf>,
    pub flags: Option<Vec<String>>,
    pub source_suffix: Option<String>,
    pub asserts_suffix: Option<String>,
    pub timeout_secs: Option<u64>,
    pub protocol: Option<ProtocolMode>,
    pub log: Option<FileLogConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
    pub file: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &text)
    }
}

/// Parse a `u64` env var, returning `default` on missing or invalid.
fn parse_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(val) => val.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Read a non-empty string env var.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an env var with `FromStr`, returning `default` on missing or invalid.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_string(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl HarnessConfig {
    /// Overlay values from a configuration file.
    pub fn merge_file(mut self, file: FileConfig) -> Self {
        if let Some(analyzer) = file.analyzer {
            self.analyzer = analyzer;
        }
        if let Some(flags) = file.flags {
            self.flags = flags;
        }
        if let Some(suffix) = file.source_suffix {
            self.source_suffix = suffix;
        }
        if let Some(suffix) = file.asserts_suffix {
            self.asserts_suffix = suffix;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(protocol) = file.protocol {
            self.protocol = protocol;
        }
        if let Some(log) = file.log {
            if let Some(level) = log.level {
                self.log.level = level;
            }
            if let Some(format) = log.format {
                self.log.format = format;
            }
            if let Some(file) = log.file {
                self.log.output_path = Some(file);
            }
        }
        self
    }

    /// Overlay values from `BOA_*` environment variables.
    pub fn merge_env(mut self) -> Self {
        if let Some(exe) = env_string("BOA_EXECUTABLE") {
            self.analyzer = PathBuf::from(exe);
        }
        if let Some(suffix) = env_string("BOA_SOURCE_SUFFIX") {
            self.source_suffix = suffix;
        }
        if let Some(suffix) = env_string("BOA_ASSERTS_SUFFIX") {
            self.asserts_suffix = suffix;
        }
        let secs = parse_u64("BOA_TIMEOUT_SECS", self.timeout.as_secs()).max(1);
        self.timeout = Duration::from_secs(secs);
        self.protocol = parse_env("BOA_PROTOCOL", self.protocol);
        if let Some(level) = env_string("BOA_LOG") {
            self.log.level = level;
        }
        self.log.format = parse_env("BOA_LOG_FORMAT", self.log.format);
        if let Some(file) = env_string("BOA_LOG_FILE") {
            self.log.output_path = Some(PathBuf::from(file));
        }
        self
    }
}

/// Load configuration: defaults, then `file` if given, then environment.
pub fn load(file: Option<&Path>) -> Result<HarnessConfig, ConfigError> {
    let mut config = HarnessConfig::default();
    if let Some(path) = file {
        config = config.merge_file(FileConfig::read(path)?);
    }
    Ok(config.merge_env())
}
