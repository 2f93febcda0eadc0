//! Configuration loading and management

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::input::DEFAULT_ACTIVE_CLASS;

/// Overrides the socket location
pub const SOCKET_ENV: &str = "GEOREF_INPUT_SOCKET";
/// Class applied to pressed elements; empty disables it
pub const ACTIVE_CLASS_ENV: &str = "GEOREF_INPUT_ACTIVE_CLASS";
/// Program used to open relayed URLs
pub const OPENER_ENV: &str = "GEOREF_INPUT_OPENER";

#[cfg(target_os = "macos")]
const DEFAULT_OPENER: &str = "open";
#[cfg(not(target_os = "macos"))]
const DEFAULT_OPENER: &str = "xdg-open";

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the Unix domain socket for IPC
    pub socket_path: PathBuf,

    /// Directory for runtime data
    pub data_dir: PathBuf,

    /// Class added to a pressed element until release
    pub active_class: Option<String>,

    /// Program launched with the URL for `openNewTab`
    pub opener: String,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = lookup("HOME").context("HOME is not set")?;
        let data_dir = PathBuf::from(&home)
            .join(".local")
            .join("share")
            .join("georef-input");

        let socket_path = lookup(SOCKET_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("daemon.sock"));

        let active_class = match lookup(ACTIVE_CLASS_ENV) {
            Some(class) if class.is_empty() => None,
            Some(class) => Some(class),
            None => Some(DEFAULT_ACTIVE_CLASS.to_owned()),
        };

        let opener = lookup(OPENER_ENV).unwrap_or_else(|| DEFAULT_OPENER.to_owned());

        Ok(Self {
            socket_path,
            data_dir,
            active_class,
            opener,
        })
    }

    /// Ensure data directory exists
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("failed to create {}", self.data_dir.display()))?;
        Ok(())
    }
}
