//! # shortcut-store
//!
//! Reads and edits the binary `shortcuts.vdf` store in which the Steam
//! client keeps user-added (non-catalog) applications, and derives the ids
//! the client uses to name artwork for them.
//!
//! - **Structural reader** that walks every field by its type tag and keeps
//!   the byte span of each record
//! - **In-place writer** that sets one record's `icon` and leaves every other
//!   byte of the file untouched, unknown fields included
//! - **Id derivation** matching the client's CRC-based shortcut ids, both the
//!   current 32-bit form and the legacy 64-bit form
//! - **Locked, atomic file updates** through [`Shortcuts`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shortcut_store::{Shortcuts, Result};
//!
//! # fn main() -> Result<()> {
//! let mut shortcuts = Shortcuts::open("userdata/22202/config/shortcuts.vdf")?;
//!
//! for entry in shortcuts.entries() {
//!     println!("{} {} ({})", entry.position, entry.name, entry.identifier);
//! }
//!
//! shortcuts.set_icon(0, "/home/me/.steam/steam/userdata/22202/config/grid/3858095309_icon.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Working on buffers
//!
//! ```
//! use shortcut_store::{parse, upsert_icon};
//!
//! let store = b"\x00shortcuts\x00\
//!     \x000\x00\x01AppName\x00Test Game\x00\x01exe\x00\"C:\\game.exe\"\x00\x08\
//!     \x08\x08";
//!
//! let entries = parse(store).unwrap();
//! assert_eq!(entries[0].identifier, 3_858_095_309);
//!
//! let updated = upsert_icon(store, 0, "/cache/123_icon.png").unwrap();
//! assert_eq!(parse(&updated).unwrap()[0].icon_path.as_deref(), Some("/cache/123_icon.png"));
//! ```

pub mod artwork;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod lock;
pub mod steam;

pub use crate::core::{
    checksum, derive, legacy_identifier_raw, parse, parse_store, upsert_icon, upsert_icon_parsed,
    Entry, ParsedStore, ShortcutIds, Span,
};
pub use config::Config;
pub use error::{Result, StoreError};
pub use io::StoreFile;

use std::path::Path;
use tracing::{debug, info};

/// A shortcuts store opened for editing
///
/// Holds the store's lock for its whole lifetime, together with the bytes
/// last read or written and their parse.
///
/// # Examples
///
/// ```rust,no_run
/// use shortcut_store::Shortcuts;
///
/// let mut shortcuts = Shortcuts::open("shortcuts.vdf")?.with_backup(false);
/// if let Some(entry) = shortcuts.entries().iter().find(|e| e.name == "Test Game") {
///     let position = entry.position;
///     shortcuts.set_icon(position, "/cache/123_icon.png")?;
/// }
/// # Ok::<(), shortcut_store::StoreError>(())
/// ```
#[derive(Debug)]
pub struct Shortcuts {
    file: StoreFile,
    raw: Vec<u8>,
    store: ParsedStore,
    backup: bool,
}

impl Shortcuts {
    /// Lock, read and parse the store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Opening shortcuts store at {:?}", path.as_ref());
        let file = StoreFile::open(path)?;
        let raw = file.read_all()?;
        let store = parse_store(&raw)?;

        Ok(Shortcuts {
            file,
            raw,
            store,
            backup: true,
        })
    }

    /// Open the store a [`Config`] points at, honouring its backup setting
    pub fn open_with_config(config: &Config) -> Result<Self> {
        let path = config.resolve_store_path()?;
        Ok(Self::open(path)?.with_backup(config.backup))
    }

    /// Whether rewrites first copy the store to `<store>.bak` (default `true`)
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    /// Entries in file order
    pub fn entries(&self) -> &[Entry] {
        &self.store.entries
    }

    pub fn entry(&self, position: usize) -> Result<&Entry> {
        self.store
            .entries
            .get(position)
            .ok_or(StoreError::EntryNotFound {
                position,
                count: self.store.entries.len(),
            })
    }

    /// Set the icon of the entry at `position` and persist the store
    ///
    /// Nothing is written if the edit fails.
    pub fn set_icon(&mut self, position: usize, icon_path: &str) -> Result<&Entry> {
        debug!("Setting icon of shortcut {} to {}", position, icon_path);

        let updated = upsert_icon_parsed(&self.raw, &self.store, position, icon_path)?;
        let store = parse_store(&updated)?;

        self.file.write_all(&updated, self.backup)?;
        self.raw = updated;
        self.store = store;

        self.entry(position)
    }

    /// Current store bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
