//! Configuration management for the generator.
//!
//! This module handles loading and validating the optional `keymapgen.toml`
//! file. Configuration only supplies default output paths and diagnostic
//! switches; it never changes the generated text.

use crate::constants::DEFAULT_CONFIG_FILE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default output locations used when the command line omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Header artifact path (e.g., "`include/keycodes.h`")
    #[serde(default)]
    pub header: Option<PathBuf>,
    /// Source artifact path (e.g., "`src/keycodes.c`")
    #[serde(default)]
    pub source: Option<PathBuf>,
}

/// Which parse warnings get logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Log duplicate scan codes and identifiers
    #[serde(default = "default_true")]
    pub warn_duplicates: bool,
    /// Log empty or non-C identifiers
    #[serde(default = "default_true")]
    pub warn_degenerate: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            warn_duplicates: true,
            warn_degenerate: true,
        }
    }
}

/// Generator configuration.
///
/// # File Format
///
/// ```toml
/// [paths]
/// header = "include/keycodes.h"
/// source = "src/keycodes.c"
///
/// [diagnostics]
/// warn_duplicates = true
/// warn_degenerate = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default output paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Warning switches
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration.
    ///
    /// An explicit path must exist. Without one, `keymapgen.toml` in the
    /// working directory is used if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Self::load_from(path)
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from(default_path)
                } else {
                    Ok(Self::new())
                }
            }
        }
    }

    /// Loads and validates configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - header and source paths, when both set, are different files
    pub fn validate(&self) -> Result<()> {
        if let (Some(header), Some(source)) = (&self.paths.header, &self.paths.source) {
            if header == source {
                anyhow::bail!(
                    "Header and source outputs must be different files (both are {})",
                    header.display()
                );
            }
        }

        Ok(())
    }

    /// Picks the header path: command line first, then configuration.
    #[must_use]
    pub fn header_path(&self, cli: Option<&Path>) -> Option<PathBuf> {
        cli.map(Path::to_path_buf).or_else(|| self.paths.header.clone())
    }

    /// Picks the source path: command line first, then configuration.
    #[must_use]
    pub fn source_path(&self, cli: Option<&Path>) -> Option<PathBuf> {
        cli.map(Path::to_path_buf).or_else(|| self.paths.source.clone())
    }
}
