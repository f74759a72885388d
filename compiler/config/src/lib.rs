#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Restgate Configuration
//!
//! Settings for a generator run, stored as TOML:
//! - where the request is read from and where generated modules go
//! - which mode flags apply when none are given on the command line
//! - the module paths generated code imports from
//! - logging
//!
//! Every section has defaults, so an empty file is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a configuration could not be loaded or saved
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("config I/O error: {0}")]
    FileRead(#[from] std::io::Error),
    /// The file is not valid TOML for [`Config`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be rendered as TOML
    #[error("cannot render config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// An explicitly named config file does not exist
    #[error("config file {0} does not exist")]
    NotFound(PathBuf),
    /// The platform has no user config directory
    #[error("no user config directory on this platform")]
    ConfigDirUnavailable,
}

/// Settings for one generator run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Code generation settings
    #[serde(default)]
    pub codegen: CodegenConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,
    /// Log file path (optional, stderr otherwise)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self { LoggingConfig { level: default_level(), file: None } }
}

/// Code generation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Path to the generation request (JSON)
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,
    /// Where to write generated modules
    #[serde(default = "Config::default_output_dir")]
    pub output_dir: PathBuf,
    /// Generator parameter applied on top of the request's own ("genapi", "genclient", ...)
    #[serde(default)]
    pub parameter: Option<String>,
    /// Run rustfmt on every written file
    #[serde(default)]
    pub rustfmt: bool,
    /// Module paths generated code imports from
    #[serde(default)]
    pub paths: PathsConfig,
}

fn default_input_path() -> PathBuf { PathBuf::from("request.json") }

impl Default for CodegenConfig {
    fn default() -> Self {
        CodegenConfig {
            input_path: default_input_path(),
            output_dir: Config::default_output_dir(),
            parameter: None,
            rustfmt: false,
            paths: PathsConfig::default(),
        }
    }
}

/// Module paths generated code imports from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Message types
    pub proto_module: String,
    /// Region wrapper structs
    pub api_module: String,
    /// Client bindings
    pub client_module: String,
    /// Test request helpers
    pub testutil_module: String,
    /// The runtime crate
    pub runtime_crate: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            proto_module: "crate::edgeproto".to_string(),
            api_module: "crate::ormapi".to_string(),
            client_module: "crate::mctestclient".to_string(),
            testutil_module: "crate::testutil".to_string(),
            runtime_crate: "restgate_runtime".to_string(),
        }
    }
}

impl Config {
    /// Read a TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
    }

    /// Load from `path` if given, else from the default path if that file exists, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if !path.exists() => Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Ok(default) if default.exists() => Self::from_file(default),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Write this configuration to `path` as TOML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// `{config_dir()}/restgate/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("restgate").join("config.toml"))
            .ok_or(ConfigError::ConfigDirUnavailable)
    }

    /// `OUT_DIR` inside a build script, else `./generated`
    pub fn default_output_dir() -> PathBuf {
        Self::output_dir_from(std::env::var("OUT_DIR").ok(), std::env::current_dir().ok())
    }

    fn output_dir_from(out_dir: Option<String>, cwd: Option<PathBuf>) -> PathBuf {
        match (out_dir, cwd) {
            (Some(out_dir), _) => PathBuf::from(out_dir),
            (None, Some(cwd)) => cwd.join("generated"),
            (None, None) => PathBuf::from("generated"),
        }
    }
}
