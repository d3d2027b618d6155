//! Configuration handling for confgen.
//! Loads the optional confgen.json / confgen.yml / confgen.yaml file and
//! merges it with command-line overrides.

use crate::cli::Args;
use crate::constants::{CONFIG_FILES, DEFAULT_OUTPUT_DIR};
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Generation settings.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root directory the write pass materializes files into
    pub output_dir: Option<PathBuf>,
    /// Extra comments written after the provenance marker
    pub header_comments: Vec<String>,
    /// Remove files under the output root that the current run did not produce
    pub clean_stale: bool,
    /// Glob patterns, relative to the output root, never removed as stale
    pub keep: Vec<String>,
}

impl Config {
    /// Applies command-line overrides on top of file values.
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(output_dir) = &args.output_dir {
            self.output_dir = Some(output_dir.clone());
        }
        if args.clean_stale {
            self.clean_stale = true;
        }
        self
    }

    /// Effective output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Compiles the keep patterns.
    ///
    /// # Errors
    /// * `Error::ConfigError` if a pattern is not a valid glob
    pub fn keep_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.keep {
            builder.add(Glob::new(pattern).map_err(|e| {
                Error::ConfigError(format!("invalid keep pattern '{}': {}", pattern, e))
            })?);
        }
        builder
            .build()
            .map_err(|e| Error::ConfigError(format!("keep patterns failed to compile: {}", e)))
    }
}

/// Looks for the first existing configuration file in `dir`.
///
/// # Arguments
/// * `dir` - Directory to search
/// * `config_files` - List of configuration files to try
///
/// # Returns
/// * `Result<Option<String>>` - Contents of the first found configuration file
pub fn load_config<P: AsRef<Path>>(dir: P, config_files: &[&str]) -> Result<Option<String>> {
    for file in config_files {
        let config_path = dir.as_ref().join(file);
        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            return Ok(Some(std::fs::read_to_string(&config_path)?));
        }
    }
    Ok(None)
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor valid YAML
pub fn parse_config(content: &str) -> Result<Config> {
    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {}", e))),
    }
}

/// Resolves the configuration for a run.
///
/// An explicit `--config` path must exist. Otherwise the working directory is
/// searched for [`CONFIG_FILES`]; finding none yields the defaults.
pub fn get_config(args: &Args) -> Result<Config> {
    let content = match &args.config {
        Some(path) => {
            if !path.is_file() {
                return Err(Error::ConfigError(format!(
                    "Invalid configuration path: {}",
                    path.display()
                )));
            }
            Some(std::fs::read_to_string(path)?)
        }
        None => load_config(std::env::current_dir()?, &CONFIG_FILES)?,
    };

    let config = match content {
        Some(content) => parse_config(&content)?,
        None => {
            debug!("No configuration file found, using defaults");
            Config::default()
        }
    };
    Ok(config.with_args(args))
}
