//! Shortcuts store reader
//!
//! Layout of a store (`00` is shown escaped as `03` while tokenizing):
//!
//! ```text
//! 00 "shortcuts" 00
//!     00 "0" 00                      <- record 0
//!         02 "appid" 00 <4 bytes LE>
//!         01 "AppName" 00 <name> 00
//!         01 "Exe" 00 <exe> 00
//!         ...
//!         00 "tags" 00 ... 08
//!     08
//!     00 "1" 00 ... 08               <- record 1
//! 08
//! 08
//! ```
//!
//! The walk is structural: every field is bounded by its type tag, so values
//! that happen to contain `0x08` or `0x01` never split a record.

use super::escape::EscapedBuffer;
use super::identifier::derive;
use super::record::{tag, Entry, Field, KnownKey, Record, Span};
use crate::error::{Result, StoreError};
use tracing::{debug, warn};

/// Name of the top-level object holding the records
pub const ROOT_KEY: &str = "shortcuts";

/// Deepest object nesting accepted before the input is rejected
const MAX_DEPTH: usize = 32;

/// A store walked into records, with the entries read from them
#[derive(Debug, Clone)]
pub struct ParsedStore {
    pub records: Vec<Record>,
    pub entries: Vec<Entry>,
    /// Length of the parsed input in bytes
    pub len: usize,
}

impl ParsedStore {
    pub fn record(&self, position: usize) -> Result<&Record> {
        self.records.get(position).ok_or(StoreError::EntryNotFound {
            position,
            count: self.records.len(),
        })
    }
}

/// Parse the store into its ordered entries
pub fn parse(raw: &[u8]) -> Result<Vec<Entry>> {
    Ok(parse_store(raw)?.entries)
}

/// Parse the store, keeping the field layout of every record
pub fn parse_store(raw: &[u8]) -> Result<ParsedStore> {
    let tokenizer = Tokenizer {
        buf: EscapedBuffer::new(raw),
    };

    let records = tokenizer.records()?;
    let entries = records
        .iter()
        .enumerate()
        .map(|(position, record)| tokenizer.entry(position, record))
        .collect::<Result<Vec<_>>>()?;

    debug!("Parsed {} shortcuts from {} bytes", entries.len(), raw.len());

    Ok(ParsedStore {
        records,
        entries,
        len: raw.len(),
    })
}

/// One field as walked, before classification
#[derive(Debug)]
struct Node {
    tag: u8,
    key: Span,
    value: Span,
    span: Span,
    children: Vec<Node>,
}

/// How a field's value is bounded
enum Payload {
    Object,
    String,
    Fixed(usize),
}

impl Payload {
    fn of(field_tag: u8, offset: usize) -> Result<Self> {
        match field_tag {
            tag::MAP => Ok(Payload::Object),
            tag::STRING => Ok(Payload::String),
            tag::INT32 | tag::FLOAT32 | tag::POINTER | tag::COLOR => Ok(Payload::Fixed(4)),
            tag::UINT64 | tag::INT64 => Ok(Payload::Fixed(8)),
            tag::WIDE_STRING => Err(StoreError::malformed(
                offset,
                "wide string fields are not supported",
            )),
            other => Err(StoreError::malformed(
                offset,
                format!("unknown field type 0x{:02x}", other),
            )),
        }
    }
}

struct Tokenizer<'a> {
    buf: EscapedBuffer<'a>,
}

impl<'a> Tokenizer<'a> {
    fn records(&self) -> Result<Vec<Record>> {
        let (root, end) = self.body(0, 0)?;

        if end < self.buf.raw_len() {
            warn!(
                "Ignoring {} bytes after the end of the store",
                self.buf.raw_len() - end
            );
        }

        if root.is_empty() {
            return Ok(Vec::new());
        }

        let list = root
            .into_iter()
            .find(|node| node.tag == tag::MAP && self.key_is(node, ROOT_KEY))
            .ok_or_else(|| StoreError::malformed(0, "missing top-level 'shortcuts' object"))?;

        let mut records = Vec::with_capacity(list.children.len());
        for node in list.children {
            if node.tag != tag::MAP {
                debug!(
                    "Skipping non-object field at byte {} in shortcut list",
                    node.span.start
                );
                continue;
            }
            records.push(self.record(node));
        }

        Ok(records)
    }

    fn record(&self, node: Node) -> Record {
        let fields = node
            .children
            .into_iter()
            .map(|child| {
                let name = self.buf.raw_slice(child.key.start, child.key.end).unwrap_or_default();
                match KnownKey::named(name) {
                    Some(key) if key.value_tag() == child.tag => Field::Known {
                        key,
                        span: child.span,
                        value: child.value,
                    },
                    Some(key) => Field::Mistyped {
                        key,
                        span: child.span,
                    },
                    None => Field::Opaque(child.span),
                }
            })
            .collect();

        Record {
            span: node.span,
            fields,
        }
    }

    fn entry(&self, position: usize, record: &Record) -> Result<Entry> {
        let name = self.required_string(record, KnownKey::AppName)?;
        let executable_path = self.required_string(record, KnownKey::Exe)?;

        let icon_path = match record.value_of(KnownKey::Icon) {
            Some(value) => Some(self.string(value, KnownKey::Icon)?),
            None => None,
        };

        let explicit = record
            .value_of(KnownKey::AppId)
            .and_then(|value| self.buf.raw_slice(value.start, value.end))
            .and_then(|bytes| <[u8; 4]>::try_from(bytes).ok())
            .map(u32::from_le_bytes);

        let ids = derive(&name, &executable_path, explicit);

        Ok(Entry {
            position,
            name,
            executable_path,
            identifier: ids.identifier,
            legacy_identifier: ids.legacy_identifier,
            icon_path,
            span: record.span,
        })
    }

    fn required_string(&self, record: &Record, key: KnownKey) -> Result<String> {
        let value = record.value_of(key).ok_or_else(|| {
            StoreError::malformed(
                record.span.start,
                format!("shortcut has no '{}' field", key.as_str()),
            )
        })?;
        self.string(value, key)
    }

    fn string(&self, value: Span, key: KnownKey) -> Result<String> {
        let bytes = self
            .buf
            .raw_slice(value.start, value.end)
            .ok_or_else(|| StoreError::malformed(value.start, "string value out of bounds"))?;

        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|source| StoreError::EncodingError {
                field: key.as_str().to_string(),
                offset: value.start,
                source,
            })
    }

    fn key_is(&self, node: &Node, name: &str) -> bool {
        self.buf
            .raw_slice(node.key.start, node.key.end)
            .is_some_and(|key| key.eq_ignore_ascii_case(name.as_bytes()))
    }

    /// Walk fields from `pos` up to the closing `0x08`
    ///
    /// Returns the fields and the position just past the closer. Reaching
    /// the trailer closes the object at the end of the input.
    fn body(&self, mut pos: usize, depth: usize) -> Result<(Vec<Node>, usize)> {
        if depth > MAX_DEPTH {
            return Err(StoreError::malformed(pos, "objects nested too deeply"));
        }

        let mut nodes = Vec::new();
        loop {
            if self.buf.in_trailer(pos) {
                if depth > 0 {
                    debug!("Store ends inside an object; closing at byte {}", pos);
                }
                return Ok((nodes, self.buf.raw_len()));
            }

            match self.buf.tag_at(pos) {
                Some(tag::MAP_END) => return Ok((nodes, pos + 1)),
                Some(_) => {
                    let node = self.field(pos, depth)?;
                    pos = node.span.end;
                    nodes.push(node);
                }
                None => return Err(StoreError::malformed(pos, "unterminated object")),
            }
        }
    }

    fn field(&self, start: usize, depth: usize) -> Result<Node> {
        let field_tag = self
            .buf
            .tag_at(start)
            .ok_or_else(|| StoreError::malformed(start, "unexpected end of store"))?;
        let payload = Payload::of(field_tag, start)?;

        let (key, after_key) = self.cstring(start + 1, "field name")?;

        let (value, end, children) = match payload {
            Payload::Object => {
                let (children, end) = self.body(after_key, depth + 1)?;
                (Span::new(after_key, end), end, children)
            }
            Payload::String => {
                let (value, end) = self.cstring(after_key, "string value")?;
                (value, end, Vec::new())
            }
            Payload::Fixed(width) => {
                let end = self.fixed(after_key, width)?;
                (Span::new(after_key, end), end, Vec::new())
            }
        };

        Ok(Node {
            tag: field_tag,
            key,
            value,
            span: Span::new(start, end),
            children,
        })
    }

    /// Sentinel-terminated string at `pos`: (content span, position after terminator)
    fn cstring(&self, pos: usize, what: &str) -> Result<(Span, usize)> {
        match self.buf.find_terminator(pos) {
            Some(end) if !self.buf.in_trailer(end) => Ok((Span::new(pos, end), end + 1)),
            _ => Err(StoreError::malformed(pos, format!("unterminated {}", what))),
        }
    }

    fn fixed(&self, pos: usize, width: usize) -> Result<usize> {
        let end = pos + width;
        if end > self.buf.raw_len() {
            return Err(StoreError::malformed(pos, "truncated value"));
        }
        Ok(end)
    }
}
