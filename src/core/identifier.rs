//! Shortcut identifier derivation
//!
//! Non-catalog shortcuts are addressed by a 32-bit id and, for artwork
//! written by older launcher builds, by a 64-bit "legacy" game id. Both come
//! from the checksum of the executable path followed by the display name.
//! The arithmetic below mirrors the launcher's own shift-and-truncate steps
//! with fixed-width wrapping integers; it must not be simplified.

use super::checksum::checksum;
use serde::{Deserialize, Serialize};

/// High bit marking an id as belonging to a non-catalog shortcut
pub const SHORTCUT_FLAG: u32 = 0x8000_0000;

/// Game-id type bits OR'ed into the low word of the 64-bit form
pub const SHORTCUT_GAME_ID_TYPE: u64 = 0x0200_0000;

/// Identifier pair for one shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShortcutIds {
    /// Current 32-bit id (explicit `appid` field, or checksum fallback)
    pub identifier: u32,

    /// Legacy 64-bit game id, always checksum-derived
    pub legacy_identifier: u64,
}

/// Raw checksum of a shortcut: `checksum(exe ++ name)`, no separator
pub fn legacy_identifier_raw(name: &str, executable_path: &str) -> u32 {
    let mut message = Vec::with_capacity(executable_path.len() + name.len());
    message.extend_from_slice(executable_path.as_bytes());
    message.extend_from_slice(name.as_bytes());
    checksum(&message)
}

/// Widen a 32-bit base into the launcher's 64-bit game-id form
#[inline]
fn game_id(base: u32) -> u64 {
    (u64::from(base | SHORTCUT_FLAG) << 32) | SHORTCUT_GAME_ID_TYPE
}

/// Derive the identifier pair for a shortcut
///
/// An explicit id of zero is treated as absent.
///
/// # Examples
///
/// ```
/// use shortcut_store::derive;
///
/// let ids = derive("Test Game", "\"C:\\game.exe\"", None);
/// assert_eq!(ids.identifier, 3_858_095_309);
/// assert_eq!(ids.legacy_identifier, 16_570_393_177_039_568_896);
/// ```
pub fn derive(name: &str, executable_path: &str, explicit_identifier: Option<u32>) -> ShortcutIds {
    let raw = legacy_identifier_raw(name, executable_path);

    let base = match explicit_identifier {
        Some(id) if id != 0 => id,
        _ => raw,
    };

    ShortcutIds {
        identifier: (game_id(base) >> 32) as u32,
        legacy_identifier: game_id(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_concatenation_order() {
        assert_eq!(
            legacy_identifier_raw("Test Game", "\"C:\\game.exe\""),
            0xE5F5_DCCD
        );
        // Swapped inputs hash a different message
        assert_ne!(
            legacy_identifier_raw("\"C:\\game.exe\"", "Test Game"),
            0xE5F5_DCCD
        );
    }

    #[test]
    fn test_derive_without_explicit_id() {
        let ids = derive("Test Game", "\"C:\\game.exe\"", None);
        assert_eq!(ids.identifier, 0xE5F5_DCCD | SHORTCUT_FLAG);
        assert_eq!(ids.identifier, 3_858_095_309);
        assert_eq!(ids.legacy_identifier, 16_570_393_177_039_568_896);
    }

    #[test]
    fn test_derive_with_explicit_id() {
        let ids = derive("Test Game", "\"C:\\game.exe\"", Some(0x1234_5678));
        assert_eq!(ids.identifier, 0x9234_5678);
        // Legacy id ignores the explicit value
        assert_eq!(ids.legacy_identifier, 16_570_393_177_039_568_896);
    }

    #[test]
    fn test_explicit_zero_falls_back_to_checksum() {
        assert_eq!(
            derive("Foo", "\"/usr/bin/foo\"", Some(0)),
            derive("Foo", "\"/usr/bin/foo\"", None)
        );
        assert_eq!(derive("Foo", "\"/usr/bin/foo\"", None).identifier, 3_810_698_013);
    }

    #[test]
    fn test_empty_inputs() {
        let ids = derive("", "", None);
        assert_eq!(ids.identifier, SHORTCUT_FLAG);
        assert_eq!(ids.legacy_identifier, 9_223_372_036_888_330_240);
    }

    #[test]
    fn test_flag_already_set_is_stable() {
        let ids = derive("x", "y", Some(0xFFFF_FFFF));
        assert_eq!(ids.identifier, 0xFFFF_FFFF);
    }

    #[test]
    fn test_changing_inputs_changes_legacy() {
        let a = derive("Game", "/bin/game", None);
        let b = derive("Game 2", "/bin/game", None);
        let c = derive("Game", "/bin/game2", None);
        assert_ne!(a.legacy_identifier, b.legacy_identifier);
        assert_ne!(a.legacy_identifier, c.legacy_identifier);
    }
}
