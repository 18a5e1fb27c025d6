//! Contributor configuration.
//!
//! Defaults match the host conventions; a JSON file and `CIENV_*`
//! environment variables can override them.

use std::path::Path;

use anyhow::Context;
use cienv_host::WorkspaceDir;
use serde::{Deserialize, Serialize};

use crate::decision::DEFAULT_WORKSPACE_SUBDIR;
use crate::error::{ConfigError, ConfigResult};

pub const ENV_REDIRECT_MESSAGE: &str = "CIENV_REDIRECT_MESSAGE";
pub const ENV_VERIFY_WRITE: &str = "CIENV_VERIFY_WRITE";
pub const ENV_WORKSPACE_SUBDIR: &str = "CIENV_WORKSPACE_SUBDIR";

/// Settings for one environment contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributorConfig {
    /// Write `CI_MESSAGE` to a workspace file. When off, it is injected
    /// like any other variable.
    pub redirect_enabled: bool,

    /// Check the file's existence and size after writing.
    pub verify_after_write: bool,

    /// Workspace directory name under a pipeline run's root directory.
    pub workspace_subdir: String,
}

impl Default for ContributorConfig {
    fn default() -> Self {
        Self {
            redirect_enabled: true,
            verify_after_write: true,
            workspace_subdir: DEFAULT_WORKSPACE_SUBDIR.to_string(),
        }
    }
}

impl ContributorConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    /// Reject settings a run's workspace could not honour.
    pub fn validate(self) -> ConfigResult<Self> {
        if !WorkspaceDir::is_valid_child_name(&self.workspace_subdir) {
            return Err(ConfigError::InvalidValue {
                key: "workspace_subdir".to_string(),
                value: self.workspace_subdir,
            });
        }
        Ok(self)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Defaults with process environment overrides applied.
    pub fn from_env() -> ConfigResult<Self> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Optional config file, then process environment overrides.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        let base = match path {
            Some(p) => Self::load(p)
                .with_context(|| format!("loading contributor config from {}", p.display()))?,
            None => Self::default(),
        };
        base.with_env_overrides(|key| std::env::var(key).ok())
            .context("applying CIENV_* overrides")
    }

    /// Apply `CIENV_*` overrides read through `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_REDIRECT_MESSAGE) {
            self.redirect_enabled = parse_bool(ENV_REDIRECT_MESSAGE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_VERIFY_WRITE) {
            self.verify_after_write = parse_bool(ENV_VERIFY_WRITE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_WORKSPACE_SUBDIR) {
            let trimmed = raw.trim();
            if !WorkspaceDir::is_valid_child_name(trimmed) {
                return Err(ConfigError::InvalidValue {
                    key: ENV_WORKSPACE_SUBDIR.to_string(),
                    value: raw,
                });
            }
            self.workspace_subdir = trimmed.to_string();
        }
        self.validate()
    }
}

fn parse_bool(key: &str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
