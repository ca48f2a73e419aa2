//! Parsed shapes of the shortcuts store
//!
//! A record is kept as the list of its fields. Fields this crate understands
//! carry the spans of their value bytes; everything else is an opaque span
//! of raw bytes that is never interpreted, only copied.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Half-open byte range into the store buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Binary VDF type tags
pub mod tag {
    pub const MAP: u8 = 0x00;
    pub const STRING: u8 = 0x01;
    pub const INT32: u8 = 0x02;
    pub const FLOAT32: u8 = 0x03;
    pub const POINTER: u8 = 0x04;
    pub const WIDE_STRING: u8 = 0x05;
    pub const COLOR: u8 = 0x06;
    pub const UINT64: u8 = 0x07;
    pub const MAP_END: u8 = 0x08;
    pub const INT64: u8 = 0x0A;
}

/// Fields the reader and writer look up by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownKey {
    AppName,
    Exe,
    AppId,
    Icon,
}

impl KnownKey {
    /// Canonical key name as written by this crate
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownKey::AppName => "AppName",
            KnownKey::Exe => "exe",
            KnownKey::AppId => "appid",
            KnownKey::Icon => "icon",
        }
    }

    /// Value type the field must have to be recognised
    pub fn value_tag(&self) -> u8 {
        match self {
            KnownKey::AppId => tag::INT32,
            _ => tag::STRING,
        }
    }

    /// Match a raw key name; case is not significant
    pub fn named(name: &[u8]) -> Option<Self> {
        [KnownKey::AppName, KnownKey::Exe, KnownKey::AppId, KnownKey::Icon]
            .into_iter()
            .find(|key| name.eq_ignore_ascii_case(key.as_str().as_bytes()))
    }
}

/// One field inside a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// A field this crate reads or rewrites
    Known {
        key: KnownKey,
        /// Tag byte through value terminator
        span: Span,
        /// Value bytes, terminator excluded
        value: Span,
    },
    /// A known name stored with another value type, copied verbatim
    Mistyped { key: KnownKey, span: Span },
    /// Anything else, copied verbatim
    Opaque(Span),
}

impl Field {
    pub fn span(&self) -> Span {
        match self {
            Field::Known { span, .. } | Field::Mistyped { span, .. } => *span,
            Field::Opaque(span) => *span,
        }
    }
}

/// One shortcut object as laid out in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Tag byte of the record's map field through its closing `0x08`
    pub span: Span,
    pub fields: Vec<Field>,
}

impl Record {
    /// First field matching `key`
    pub fn find(&self, key: KnownKey) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| matches!(field, Field::Known { key: k, .. } if *k == key))
    }

    /// Value span of the first field matching `key`
    pub fn value_of(&self, key: KnownKey) -> Option<Span> {
        match self.find(key)? {
            Field::Known { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Span of the first field named `key` whose value has the wrong type
    pub fn mistyped(&self, key: KnownKey) -> Option<Span> {
        self.fields.iter().find_map(|field| match field {
            Field::Mistyped { key: k, span } if *k == key => Some(*span),
            _ => None,
        })
    }
}

/// One non-catalog application entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Zero-based index in file order; recomputed on every read
    pub position: usize,

    /// Display name (`AppName`)
    pub name: String,

    /// Launch command (`exe`)
    pub executable_path: String,

    /// Current id, explicit or checksum-derived
    pub identifier: u32,

    /// Legacy 64-bit game id used by older artwork file names
    pub legacy_identifier: u64,

    /// Cached icon path (`icon`), if set
    pub icon_path: Option<String>,

    /// Byte range of the record in the buffer it was parsed from
    pub span: Span,
}
