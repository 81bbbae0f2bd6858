//! Runtime configuration for command sessions and the `relgraph` binary.
//!
//! Values come from an optional TOML file; command-line flags are applied on
//! top by the binary.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphError, Result};
use crate::report::DEFAULT_EMPTY_TOKEN;

/// Output rendering for `report` commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// `"r" "e" N;` lines.
    #[default]
    Text,
    /// One JSON array per report.
    Json,
}

/// What a session does with a line it cannot parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// Log a warning and continue with the next line.
    #[default]
    Skip,
    /// Stop the run with the parse error.
    Abort,
}

/// `[report]` section.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Printed in text mode when no relation has anything to report.
    pub empty_token: String,
    /// Rendering used for `report` output.
    pub format: ReportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            empty_token: DEFAULT_EMPTY_TOKEN.to_owned(),
            format: ReportFormat::Text,
        }
    }
}

/// `[session]` section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Handling of unparsable lines.
    pub on_parse_error: ParseErrorPolicy,
    /// Run the structural verifier after every mutating command.
    pub verify_each_command: bool,
}

/// `[log]` section.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default `EnvFilter` directive, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_owned(),
        }
    }
}

/// Complete configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Report rendering.
    pub report: ReportConfig,
    /// Command session behaviour.
    pub session: SessionConfig,
    /// Logging defaults.
    pub log: LogConfig,
}

impl Config {
    /// Aborts on the first bad line and verifies after every mutation.
    pub fn strict() -> Self {
        Self {
            session: SessionConfig {
                on_parse_error: ParseErrorPolicy::Abort,
                verify_each_command: true,
            },
            ..Self::default()
        }
    }

    /// Loads `explicit`, or the default per-user file when it exists, or
    /// falls back to [`Config::default`].
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(&path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parses a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|err| GraphError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let config = Self::from_toml(&contents).map_err(|err| match err {
            GraphError::Config { message, .. } => GraphError::Config {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        debug!(path = %path.display(), "config.loaded");
        Ok(config)
    }

    /// Parses TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|err| GraphError::Config {
            path: PathBuf::new(),
            message: err.to_string(),
        })
    }
}

/// `$CONFIG_DIR/relgraph/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("relgraph").join("config.toml"))
}
