//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Harbor using clap.

pub mod commands;

use crate::config::{load_config, load_config_or_default, HarborConfig};
use crate::domain::HarborError;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "harbor.toml";

/// Harbor - DynamoDB table restore from S3 snapshots
#[derive(Parser, Debug)]
#[command(name = "harbor")]
#[command(version, about, long_about = None)]
#[command(author = "Harbor Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults to ./harbor.toml when present)
    #[arg(short, long, env = "HARBOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HARBOR_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Restore a DynamoDB table from an export file
    Import(commands::import::ImportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Load and validate an export file without touching DynamoDB
    Inspect(commands::inspect::InspectArgs),
}

/// Output format for command results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON document on stdout
    Json,
}

/// Loads configuration for a command
///
/// An explicit path must exist. Without one, `harbor.toml` in the working
/// directory is used if present, and defaults plus environment otherwise.
pub fn resolve_config(path: Option<&Path>) -> crate::domain::Result<HarborConfig> {
    match path {
        Some(path) => load_config(path),
        None => load_config_or_default(DEFAULT_CONFIG_FILE),
    }
}

/// Exit code for a command that failed before producing a result
///
/// 2 for configuration problems, 5 for everything else.
pub fn failure_exit_code(error: &HarborError) -> i32 {
    match error {
        HarborError::Configuration(_) => 2,
        _ => 5,
    }
}

/// Display name of the configuration source
pub fn config_label(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => DEFAULT_CONFIG_FILE.to_string(),
        None => "(defaults and environment)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_import() {
        let cli = Cli::parse_from(["harbor", "import", "--source-key", "users.json"]);
        assert!(cli.config.is_none());
        assert!(matches!(cli.command, Commands::Import(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["harbor", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["harbor", "--log-level", "debug", "inspect", "--source-key", "k"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Inspect(_)));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["harbor", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["harbor", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_failure_exit_code() {
        assert_eq!(failure_exit_code(&HarborError::Configuration("x".into())), 2);
        assert_eq!(failure_exit_code(&HarborError::MissingSourceKey), 5);
        assert_eq!(failure_exit_code(&HarborError::Validation("x".into())), 5);
    }

    #[test]
    fn test_resolve_config_missing_explicit_path() {
        let err = resolve_config(Some(Path::new("/nonexistent/harbor.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_config_label_explicit() {
        assert_eq!(config_label(Some(Path::new("a.toml"))), "a.toml");
    }
}
