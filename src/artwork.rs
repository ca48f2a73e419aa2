//! Artwork file names in the grid directory
//!
//! The launcher finds artwork by file name: the app id plus a suffix per
//! asset kind. Non-catalog shortcuts also get a landscape grid alias under
//! their legacy 64-bit id, which older launcher builds still look up.

use crate::core::Entry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Grid,
    Hero,
    Logo,
    Icon,
}

impl FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grid" => Ok(AssetKind::Grid),
            "hero" => Ok(AssetKind::Hero),
            "logo" => Ok(AssetKind::Logo),
            "icon" => Ok(AssetKind::Icon),
            _ => Err(format!(
                "Invalid asset kind '{}'. Valid options: grid, hero, logo, icon",
                s
            )),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::Grid => "grid",
            AssetKind::Hero => "hero",
            AssetKind::Logo => "logo",
            AssetKind::Icon => "icon",
        };
        f.write_str(name)
    }
}

/// Grid orientation; only grids distinguish the two
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "p" | "portrait" => Ok(Orientation::Portrait),
            "l" | "landscape" => Ok(Orientation::Landscape),
            _ => Err(format!(
                "Invalid orientation '{}'. Valid options: p, l",
                s
            )),
        }
    }
}

/// File name for an asset of `kind` belonging to `app_id`
///
/// Icons of non-catalog shortcuts keep the extension of `source_url`, since
/// the launcher reads them through the store's `icon` field rather than by
/// name; every other asset is saved as `.jpg`.
///
/// # Examples
///
/// ```
/// use shortcut_store::artwork::{asset_file_name, AssetKind, Orientation};
///
/// assert_eq!(asset_file_name("123", AssetKind::Grid, Orientation::Portrait, "", false), "123p.jpg");
/// assert_eq!(
///     asset_file_name("123", AssetKind::Icon, Orientation::default(), "https://x/a.png", true),
///     "123_icon.png"
/// );
/// ```
pub fn asset_file_name(
    app_id: &str,
    kind: AssetKind,
    orientation: Orientation,
    source_url: &str,
    non_catalog: bool,
) -> String {
    match kind {
        AssetKind::Hero => format!("{}_hero.jpg", app_id),
        AssetKind::Logo => format!("{}_logo.jpg", app_id),
        AssetKind::Grid => match orientation {
            Orientation::Portrait => format!("{}p.jpg", app_id),
            Orientation::Landscape => format!("{}.jpg", app_id),
        },
        AssetKind::Icon if non_catalog => {
            format!("{}_icon{}", app_id, url_extension(source_url))
        }
        AssetKind::Icon => format!("{}_icon.jpg", app_id),
    }
}

/// File name for an asset of a shortcut entry
pub fn entry_asset_file_name(
    entry: &Entry,
    kind: AssetKind,
    orientation: Orientation,
    source_url: &str,
) -> String {
    asset_file_name(
        &entry.identifier.to_string(),
        kind,
        orientation,
        source_url,
        true,
    )
}

/// Legacy alias for a shortcut's landscape grid: `(link name, target name)`
pub fn legacy_grid_alias(entry: &Entry) -> (String, String) {
    (
        format!("{}.jpg", entry.legacy_identifier),
        format!("{}.jpg", entry.identifier),
    )
}

/// Extension of the last path segment of a URL, with its dot
fn url_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();
    Path::new(segment)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}
