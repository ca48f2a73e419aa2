//! Locations inside a Steam installation
//!
//! Only the layout this crate touches: the per-account `shortcuts.vdf` and
//! artwork directories, and the `loginusers.vdf` lookup that picks the
//! account. Registry lookups are left to the caller.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Offset between a 64-bit SteamID and its 32-bit account id
pub const STEAM_ID64_BASE: u64 = 76_561_197_960_265_728;

/// `<root>/userdata/<account>/config`
pub fn user_config_dir(steam_root: &Path, account_id: u32) -> PathBuf {
    steam_root
        .join("userdata")
        .join(account_id.to_string())
        .join("config")
}

/// `<root>/userdata/<account>/config/shortcuts.vdf`
pub fn shortcuts_path(steam_root: &Path, account_id: u32) -> PathBuf {
    user_config_dir(steam_root, account_id).join("shortcuts.vdf")
}

/// Artwork directory for grids, heroes, logos and non-catalog icons
pub fn grid_dir(steam_root: &Path, account_id: u32) -> PathBuf {
    user_config_dir(steam_root, account_id).join("grid")
}

/// Icon directory for catalog apps
pub fn library_cache_dir(steam_root: &Path) -> PathBuf {
    steam_root.join("appcache").join("librarycache")
}

/// `<root>/config/loginusers.vdf`
pub fn loginusers_path(steam_root: &Path) -> PathBuf {
    steam_root.join("config").join("loginusers.vdf")
}

/// Convert a 64-bit SteamID to its account id
pub fn account_id(steam_id64: u64) -> Option<u32> {
    steam_id64
        .checked_sub(STEAM_ID64_BASE)
        .and_then(|id| u32::try_from(id).ok())
}

fn steam_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"7656119[0-9]+").expect("valid regex"))
}

fn most_recent_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)"mostrecent"\s+"1""#).expect("valid regex"))
}

/// Account id of the most recently logged-in user in `loginusers.vdf`
///
/// Line based: the last SteamID seen before a `"MostRecent" "1"` line wins.
pub fn most_recent_account(loginusers: &str) -> Option<u32> {
    let mut current: Option<u64> = None;

    for line in loginusers.lines() {
        if line.contains("PersonaName") {
            continue;
        }
        if let Some(found) = steam_id_re().find(line) {
            current = found.as_str().parse().ok();
        } else if most_recent_re().is_match(line) {
            return current.and_then(account_id);
        }
    }

    None
}

/// Default Steam root on this machine, if it can be found without the registry
///
/// Prefers the Flatpak install when present.
#[cfg(unix)]
pub fn default_root() -> Option<PathBuf> {
    let home = PathBuf::from(std::env::var_os("HOME")?);
    let flatpak = home.join(".var/app/com.valvesoftware.Steam/data/Steam");
    if flatpak.exists() {
        return Some(flatpak);
    }
    Some(home.join(".steam/steam"))
}

#[cfg(not(unix))]
pub fn default_root() -> Option<PathBuf> {
    None
}
