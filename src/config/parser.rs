//! Configuration parser for loading expectations files.
//!
//! This module handles loading expectations from YAML files and environment
//! variables, with proper precedence and error handling.

use crate::checker::CheckMode;
use crate::error::{ConfigError, PlanAssertError, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::AssertConfig;

/// Environment variable overriding `plan.path`.
pub const ENV_PLAN: &str = "TFPLAN_ASSERT_PLAN";
/// Environment variable overriding `plan.max_depth`.
pub const ENV_MAX_DEPTH: &str = "TFPLAN_ASSERT_MAX_DEPTH";
/// Environment variable overriding `mode`.
pub const ENV_MODE: &str = "TFPLAN_ASSERT_MODE";

/// Configuration parser for loading expectations.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving relative paths.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<AssertConfig> {
        let path = path.as_ref();
        info!("Loading expectations from: {}", path.display());

        if !path.exists() {
            return Err(PlanAssertError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            PlanAssertError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<AssertConfig> {
        debug!("Parsing YAML expectations");

        let config: AssertConfig = serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            PlanAssertError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })?;

        debug!("Parsed {} expected resources", config.resources.len());
        Ok(config)
    }

    /// Loads configuration with environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an override
    /// holds an unusable value.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<AssertConfig> {
        let mut config = self.load_file(path)?;
        Self::apply_overrides(&mut config, |name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies overrides looked up by variable name.
    ///
    /// A relative plan path from the environment is resolved against the
    /// working directory, like `--plan`, not against the expectations file.
    ///
    /// # Errors
    ///
    /// Returns an error if an override holds an unusable value or the
    /// working directory cannot be determined.
    pub fn apply_overrides<F>(config: &mut AssertConfig, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(plan) = lookup(ENV_PLAN) {
            debug!("Overriding plan.path from environment");
            config.plan.path = std::path::absolute(&plan)?.display().to_string();
        }

        if let Some(depth) = lookup(ENV_MAX_DEPTH) {
            debug!("Overriding plan.max_depth from environment");
            config.plan.max_depth = depth.trim().parse().map_err(|_| ConfigError::InvalidOverride {
                name: ENV_MAX_DEPTH.to_string(),
                value: depth.clone(),
            })?;
        }

        if let Some(mode) = lookup(ENV_MODE) {
            debug!("Overriding mode from environment");
            config.mode = CheckMode::from_str(mode.trim(), true).map_err(|_| {
                ConfigError::InvalidOverride {
                    name: ENV_MODE.to_string(),
                    value: mode.clone(),
                }
            })?;
        }

        Ok(())
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                PlanAssertError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Default expectations file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "tfplan-assert.yaml",
    "tfplan-assert.yml",
    ".tfplan-assert.yaml",
];

/// Finds the expectations file in the given directory or its parents.
///
/// # Errors
///
/// Returns an error if no expectations file is found.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found expectations file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(PlanAssertError::Config(ConfigError::FileNotFound {
        path: start.join(DEFAULT_CONFIG_FILES[0]),
    }))
}
