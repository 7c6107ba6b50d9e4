//! XDG Base Directory paths for phosphor.
//!
//! | Purpose | XDG Variable | Default |
//! |---------|--------------|---------|
//! | Data | `$XDG_DATA_HOME` | `~/.local/share` |
//! | Config | `$XDG_CONFIG_HOME` | `~/.config` |
//!
//! Only host paths live here. The simulated tree never touches them.

use std::path::PathBuf;

use directories::BaseDirs;

const APP: &str = "phosphor";

/// The user's home directory, or `/tmp` when `$HOME` is unset.
pub fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

/// `$XDG_DATA_HOME`, falling back to `~/.local/share`.
pub fn xdg_data_home() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| home_dir().join(".local").join("share"))
}

/// `$XDG_CONFIG_HOME`, falling back to `~/.config`.
pub fn xdg_config_home() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| home_dir().join(".config"))
}

/// Persistent state, e.g. `~/.local/share/phosphor`.
pub fn data_dir() -> PathBuf {
    xdg_data_home().join(APP)
}

/// Configuration, e.g. `~/.config/phosphor`.
pub fn config_dir() -> PathBuf {
    xdg_config_home().join(APP)
}

/// The TOML file [`PhosphorConfig::load`](crate::PhosphorConfig::load) reads.
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Where the line editor persists its history.
pub fn history_file() -> PathBuf {
    data_dir().join("history.txt")
}
