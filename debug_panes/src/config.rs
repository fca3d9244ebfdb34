//! Orchestrator configuration schema.
//!
//! Loaded from a TOML file; every field has a default so partial files work.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MuxError, MuxResult};
use crate::split::SizeSpec;

/// How a title shared by several registered panes is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitlePolicy {
    /// Refuse to pick and report the ambiguity.
    #[default]
    Error,
    /// Pick the earliest registered pane.
    First,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanesConfig {
    /// Multiplexer executable.
    pub tmux_program: String,
    /// Named server socket (`tmux -L`).
    pub socket_name: Option<String>,
    /// Size used for splits that do not specify one.
    pub default_size: String,
    /// Whether newly created panes clear before each refresh.
    pub clearing: bool,
    /// Resolution of ambiguous title references.
    pub title_policy: TitlePolicy,
    /// Upper bound on each external action, in milliseconds.
    pub action_timeout_ms: Option<u64>,
}

impl Default for PanesConfig {
    fn default() -> Self {
        Self {
            tmux_program: "tmux".into(),
            socket_name: None,
            default_size: "50%".into(),
            clearing: true,
            title_policy: TitlePolicy::Error,
            action_timeout_ms: None,
        }
    }
}

impl PanesConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> MuxResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| MuxError::Config(e.to_string()))?;
        config.default_size()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> MuxResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            MuxError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    /// Validated default split size.
    pub fn default_size(&self) -> MuxResult<SizeSpec> {
        self.default_size.parse()
    }

    /// Per-action timeout, if configured.
    pub fn action_timeout(&self) -> Option<Duration> {
        self.action_timeout_ms.map(Duration::from_millis)
    }
}
