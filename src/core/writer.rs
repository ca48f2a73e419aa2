//! Shortcuts store writer
//!
//! Edits one record's `icon` field and leaves every other byte of the store
//! as it was read. The replacement buffer is assembled from three slices:
//! raw bytes before the edit, the new bytes, raw bytes after the edit.

use super::escape::{unescape, SENTINEL};
use super::reader::{parse_store, ParsedStore};
use super::record::{tag, Field, KnownKey, Record, Span};
use crate::error::{Result, StoreError};
use tracing::debug;

/// A single splice into the raw store
#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    /// Overwrite the value bytes of an existing field
    Replace { value: Span, bytes: Vec<u8> },
    /// Insert a whole new field at `at`
    Insert { at: usize, bytes: Vec<u8> },
}

/// Set the icon of the shortcut at `position`, returning the new store bytes
///
/// Fails with `EntryNotFound` when `position` is past the last record and
/// with `MalformedStore` when the record cannot be bounded. On failure no
/// buffer is produced.
pub fn upsert_icon(raw: &[u8], position: usize, icon_path: &str) -> Result<Vec<u8>> {
    let store = parse_store(raw)?;
    upsert_icon_parsed(raw, &store, position, icon_path)
}

/// Same as [`upsert_icon`], reusing a parse of `raw`
pub fn upsert_icon_parsed(
    raw: &[u8],
    store: &ParsedStore,
    position: usize,
    icon_path: &str,
) -> Result<Vec<u8>> {
    validate_icon_path(icon_path)?;

    if store.len != raw.len() {
        return Err(StoreError::malformed(
            0,
            format!(
                "parsed layout covers {} bytes but the buffer has {}",
                store.len,
                raw.len()
            ),
        ));
    }

    let record = store.record(position)?;
    let edit = plan(record, icon_path)?;

    debug!("Updating icon of shortcut {} ({:?})", position, edit_kind(&edit));

    Ok(apply(raw, &edit))
}

fn validate_icon_path(icon_path: &str) -> Result<()> {
    if icon_path.bytes().any(|b| b == 0x00 || b == SENTINEL) {
        return Err(StoreError::InvalidFieldValue(format!(
            "icon path {:?} contains a control byte that cannot be stored",
            icon_path
        )));
    }
    Ok(())
}

fn plan(record: &Record, icon_path: &str) -> Result<Edit> {
    if let Some(value) = record.value_of(KnownKey::Icon) {
        if !record.span.contains(&value) {
            return Err(StoreError::malformed(record.span.start, "icon field outside its shortcut"));
        }
        return Ok(Edit::Replace {
            value,
            bytes: icon_path.as_bytes().to_vec(),
        });
    }

    if let Some(span) = record.mistyped(KnownKey::Icon) {
        return Err(StoreError::malformed(
            span.start,
            "existing 'icon' field does not hold a string",
        ));
    }

    let exe = match record.find(KnownKey::Exe) {
        Some(Field::Known { span, .. }) if record.span.contains(span) => *span,
        _ => {
            return Err(StoreError::malformed(
                record.span.start,
                "cannot locate 'exe' field to place the icon after",
            ))
        }
    };

    Ok(Edit::Insert {
        at: exe.end,
        bytes: icon_field(icon_path),
    })
}

/// Encode `01 "icon" 00 <path> 00`
///
/// Built with sentinels the way the tokenizer sees fields, then un-escaped
/// into raw form. The path was checked to hold neither byte.
fn icon_field(icon_path: &str) -> Vec<u8> {
    let key = KnownKey::Icon.as_str().as_bytes();
    let mut escaped = Vec::with_capacity(key.len() + icon_path.len() + 3);
    escaped.push(tag::STRING);
    escaped.extend_from_slice(key);
    escaped.push(SENTINEL);
    escaped.extend_from_slice(icon_path.as_bytes());
    escaped.push(SENTINEL);
    unescape(&escaped)
}

fn apply(raw: &[u8], edit: &Edit) -> Vec<u8> {
    let (start, end, bytes) = match edit {
        Edit::Replace { value, bytes } => (value.start, value.end, bytes),
        Edit::Insert { at, bytes } => (*at, *at, bytes),
    };

    let mut out = Vec::with_capacity(raw.len() - (end - start) + bytes.len());
    out.extend_from_slice(&raw[..start]);
    out.extend_from_slice(bytes);
    out.extend_from_slice(&raw[end..]);
    out
}

fn edit_kind(edit: &Edit) -> &'static str {
    match edit {
        Edit::Replace { .. } => "replace",
        Edit::Insert { .. } => "insert",
    }
}
