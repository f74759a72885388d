#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
//! Command line surface of the `restgate` binary.

use std::path::PathBuf;

use clap::Parser;
use codegen::ModeFlags;
use config::Config;
use thiserror::Error;

/// Errors that end a `restgate` run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Generic error with a custom message.
    #[error("{0}")]
    Message(String),
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// Logging could not be set up.
    #[error(transparent)]
    Logging(#[from] logging::LoggingError),
    /// Generation failed.
    #[error(transparent)]
    Pipeline(#[from] pipeline::PipelineError),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Generate gateway code from an annotated service description.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "restgate", about = "Generate REST gateway code from annotated RPC services", version)]
pub struct Cli {
    /// Generation request (JSON); overrides `codegen.input_path`
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Directory generated modules are written to; overrides `codegen.output_dir`
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Configuration file (defaults to the user config dir, if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Generate region wrapper structs only
    #[arg(long)]
    pub genapi: bool,
    /// Generate client bindings
    #[arg(long)]
    pub genclient: bool,
    /// Generate permission tests
    #[arg(long)]
    pub gentest: bool,
    /// Generate test request helpers
    #[arg(long)]
    pub gentestutil: bool,
    /// Log level or filter directive; overrides `logging.level`
    #[arg(long)]
    pub log_level: Option<String>,
    /// Run rustfmt on generated files
    #[arg(long)]
    pub rustfmt: bool,
}

impl Cli {
    /// Mode flags given on the command line
    pub fn flags(&self) -> ModeFlags {
        ModeFlags {
            api: self.genapi,
            client: self.genclient,
            test: self.gentest,
            testutil: self.gentestutil,
        }
    }

    /// Load the configuration and apply command line overrides
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(input) = &self.input {
            config.codegen.input_path = input.clone();
        }
        if let Some(output) = &self.output {
            config.codegen.output_dir = output.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        config.codegen.rustfmt |= self.rustfmt;
        Ok(config)
    }
}

/// Run the generator for parsed arguments.
pub fn run(cli: &Cli) -> Result<pipeline::RunSummary> {
    let config = cli.resolve_config()?;
    logging::init(&config.logging.level, config.logging.file.as_deref())?;
    tracing::debug!("configuration: {:?}", config);
    Ok(pipeline::run(&config, cli.flags())?)
}
