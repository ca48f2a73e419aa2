//! Configuration file (TOML)
//!
//! ```toml
//! steam_root = "/home/me/.steam/steam"
//! account_id = 22202
//! backup = true
//! log_level = "debug"
//! ```

use crate::error::{Result, StoreError};
use crate::steam;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Steam installation root; detected when absent
    #[serde(default)]
    pub steam_root: Option<PathBuf>,

    /// Account whose shortcuts are edited; read from `loginusers.vdf` when absent
    #[serde(default)]
    pub account_id: Option<u32>,

    /// Copy the store to `<store>.bak` before each rewrite
    #[serde(default = "default_true")]
    pub backup: bool,

    /// Default tracing directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steam_root: None,
            account_id: None,
            backup: true,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Steam root from the config, else the platform default
    pub fn steam_root(&self) -> Option<PathBuf> {
        self.steam_root.clone().or_else(steam::default_root)
    }

    /// Account from the config, else the most recent login
    pub fn account_id(&self, steam_root: &Path) -> Result<u32> {
        if let Some(id) = self.account_id {
            return Ok(id);
        }

        let loginusers = steam::loginusers_path(steam_root);
        let content = fs::read_to_string(&loginusers)?;
        steam::most_recent_account(&content).ok_or_else(|| {
            StoreError::StoreNotFound(format!(
                "no most recent user in {}",
                loginusers.display()
            ))
        })
    }

    /// Path of the shortcuts store this configuration points at
    pub fn resolve_store_path(&self) -> Result<PathBuf> {
        let root = self.steam_root().ok_or_else(|| {
            StoreError::StoreNotFound("Steam root not configured and not detected".to_string())
        })?;
        let account = self.account_id(&root)?;
        Ok(steam::shortcuts_path(&root, account))
    }
}
