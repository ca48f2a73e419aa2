//! Shortcuts store core: checksum, id derivation, reader and writer
//!
//! Everything here works on in-memory byte buffers. File access, locking
//! and persistence live in [`crate::io`].

pub mod checksum;
pub mod escape;
pub mod identifier;
pub mod reader;
pub mod record;
pub mod writer;

pub use checksum::checksum;
pub use identifier::{derive, legacy_identifier_raw, ShortcutIds};
pub use reader::{parse, parse_store, ParsedStore};
pub use record::{Entry, Field, KnownKey, Record, Span};
pub use writer::{upsert_icon, upsert_icon_parsed};
