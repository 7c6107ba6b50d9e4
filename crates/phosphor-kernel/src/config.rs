//! Configuration for phosphor.
//!
//! Loaded from `~/.config/phosphor/config.toml`. Every field has a default,
//! so an empty or missing file gives a working terminal.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use phosphor_types::{ChatMode, VfsPath};
use serde::{Deserialize, Serialize};

use crate::chat::ModePrompts;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::paths;
use crate::script::ScriptedSequence;
use crate::stream::BacklogPacing;
use crate::vfs::MatchCase;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhosphorConfig {
    /// Handle reported by `whoami` and shown in the prompt.
    #[serde(default = "default_user")]
    pub user: String,

    /// Host name shown in the prompt and `/etc/hostname`.
    #[serde(default = "default_host")]
    pub host: String,

    /// Home directory inside the simulated tree.
    #[serde(default = "default_home")]
    pub home: VfsPath,

    /// Reveal cadence for streamed replies.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Inputs remembered for recall.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default)]
    pub pacing: BacklogPacing,

    #[serde(default)]
    pub completion_case: MatchCase,

    #[serde(default)]
    pub default_mode: ChatMode,

    #[serde(default)]
    pub prompts: ModePrompts,

    /// Extra Easter eggs, checked before the built-in ones.
    #[serde(default)]
    pub scripts: Vec<ScriptedSequence>,

    /// Play the boot sequence when the REPL starts.
    #[serde(default = "default_boot_animation")]
    pub boot_animation: bool,
}

fn default_user() -> String {
    "operator".to_string()
}

fn default_host() -> String {
    "phosphor".to_string()
}

fn default_home() -> VfsPath {
    VfsPath::parse("/home/operator")
}

fn default_tick_interval() -> u64 {
    20
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_boot_animation() -> bool {
    true
}

impl Default for PhosphorConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
            host: default_host(),
            home: default_home(),
            tick_interval_ms: default_tick_interval(),
            history_limit: default_history_limit(),
            pacing: BacklogPacing::default(),
            completion_case: MatchCase::default(),
            default_mode: ChatMode::default(),
            prompts: ModePrompts::default(),
            scripts: Vec::new(),
            boot_animation: default_boot_animation(),
        }
    }
}

impl PhosphorConfig {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        paths::config_file()
    }

    /// Tick interval, never zero.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
