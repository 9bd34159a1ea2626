//! Configuration management for the CLI
//!
//! Configuration comes from, in order of precedence:
//! - the file named by `--config` / `LOCUS_CONFIG`
//! - the first of `.locus.yaml`, `.locus.json`, `locus.yaml`, `locus.json`
//!   in the working directory
//! - `<config dir>/locus/config.yaml` or `config.json`
//! - built-in defaults
//!
//! Command-line flags override individual values afterwards.

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use locus_validate::OrchestratorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Validation settings
    pub validation: ValidationConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Orchestrator limits and scan switches
    #[serde(flatten)]
    pub orchestrator: OrchestratorConfig,

    /// JSON Schema applied to every validated document
    pub schema: Option<PathBuf>,

    /// Run the platform support checks
    pub platform_checks: bool,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no `-v` flag is given (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            orchestrator: OrchestratorConfig::default(),
            schema: None,
            platform_checks: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let config = if is_yaml(path) {
            serde_yaml::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Default configuration file paths, in search order
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".locus.yaml"),
            PathBuf::from(".locus.json"),
            PathBuf::from("locus.yaml"),
            PathBuf::from("locus.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let locus_dir = config_dir.join("locus");
            paths.push(locus_dir.join("config.yaml"));
            paths.push(locus_dir.join("config.json"));
        }

        paths
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(path.extension().and_then(|s| s.to_str()), Some("yaml") | Some("yml"))
}
