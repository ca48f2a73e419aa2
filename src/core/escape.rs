//! Escaped view over a raw store buffer
//!
//! Inside the store `0x00` both terminates strings and tags nested objects.
//! The tokenizer works on a copy where every `0x00` reads as the sentinel
//! `0x03`, so string ends can be found with a single byte search, and a
//! `0x08 0x03` trailer is appended so the last record always closes.
//!
//! The substitution is one byte for one byte, so offsets in the escaped view
//! are offsets in the raw buffer. Type tags and fixed-width payloads are read
//! from the raw bytes, where the substitution has not collapsed `0x00` and
//! `0x03` into one value.

/// Byte that replaces `0x00` in the escaped view
pub const SENTINEL: u8 = 0x03;

/// Bytes appended after the escaped payload
pub const TRAILER: [u8; 2] = [0x08, SENTINEL];

/// Replace every `0x00` with the sentinel
pub fn escape(raw: &[u8]) -> Vec<u8> {
    raw.iter()
        .map(|&b| if b == 0x00 { SENTINEL } else { b })
        .collect()
}

/// Turn sentinels back into `0x00`
///
/// Only valid for bytes this crate produced in escaped form: content read
/// from a store may contain literal `0x03` bytes that were never nulls.
pub fn unescape(escaped: &[u8]) -> Vec<u8> {
    escaped
        .iter()
        .map(|&b| if b == SENTINEL { 0x00 } else { b })
        .collect()
}

/// Raw bytes paired with their escaped, trailer-terminated view
#[derive(Debug)]
pub struct EscapedBuffer<'a> {
    raw: &'a [u8],
    escaped: Vec<u8>,
}

impl<'a> EscapedBuffer<'a> {
    pub fn new(raw: &'a [u8]) -> Self {
        let mut escaped = escape(raw);
        escaped.extend_from_slice(&TRAILER);

        EscapedBuffer { raw, escaped }
    }

    /// Length of the original input, trailer excluded
    pub fn raw_len(&self) -> usize {
        self.raw.len()
    }

    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    pub fn escaped(&self) -> &[u8] {
        &self.escaped
    }

    /// Whether `pos` falls in the appended trailer
    pub fn in_trailer(&self, pos: usize) -> bool {
        pos >= self.raw.len()
    }

    /// Type tag at `pos`
    ///
    /// Reads the raw byte when inside the input, the trailer byte past it,
    /// and `None` beyond the trailer.
    pub fn tag_at(&self, pos: usize) -> Option<u8> {
        match self.raw.get(pos) {
            Some(&b) => Some(b),
            None => self.escaped.get(pos).copied(),
        }
    }

    /// Position of the next sentinel at or after `from`
    pub fn find_sentinel(&self, from: usize) -> Option<usize> {
        self.escaped
            .get(from..)?
            .iter()
            .position(|&b| b == SENTINEL)
            .map(|i| from + i)
    }

    /// Position of the next string terminator at or after `from`
    ///
    /// Like [`find_sentinel`](Self::find_sentinel), but skips sentinel bytes
    /// that were already `0x03` in the input: only escaped nulls and the
    /// trailer terminate.
    pub fn find_terminator(&self, mut from: usize) -> Option<usize> {
        loop {
            let pos = self.find_sentinel(from)?;
            if self.raw.get(pos).map_or(true, |&b| b == 0x00) {
                return Some(pos);
            }
            from = pos + 1;
        }
    }

    /// Raw bytes in `start..end`, if entirely inside the input
    pub fn raw_slice(&self, start: usize, end: usize) -> Option<&'a [u8]> {
        self.raw.get(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_replaces_nulls_only() {
        assert_eq!(escape(&[0x00, 0x01, 0x03, 0x00, 0x08]), vec![0x03, 0x01, 0x03, 0x03, 0x08]);
    }

    #[test]
    fn test_unescape_own_output() {
        let field = [0x01, b'i', SENTINEL, b'p', SENTINEL];
        assert_eq!(unescape(&field), vec![0x01, b'i', 0x00, b'p', 0x00]);
    }

    #[test]
    fn test_buffer_appends_trailer() {
        let raw = [0x00, b'a', 0x00];
        let buf = EscapedBuffer::new(&raw);

        assert_eq!(buf.raw_len(), 3);
        assert_eq!(buf.escaped(), &[0x03, b'a', 0x03, 0x08, 0x03]);
        assert!(!buf.in_trailer(2));
        assert!(buf.in_trailer(3));
    }

    #[test]
    fn test_tag_at_prefers_raw() {
        let raw = [0x00, 0x03];
        let buf = EscapedBuffer::new(&raw);

        assert_eq!(buf.tag_at(0), Some(0x00));
        assert_eq!(buf.tag_at(1), Some(0x03));
        assert_eq!(buf.tag_at(2), Some(0x08));
        assert_eq!(buf.tag_at(3), Some(SENTINEL));
        assert_eq!(buf.tag_at(4), None);
    }

    #[test]
    fn test_find_sentinel() {
        let raw = [b'a', b'b', 0x00, b'c'];
        let buf = EscapedBuffer::new(&raw);

        assert_eq!(buf.find_sentinel(0), Some(2));
        assert_eq!(buf.find_sentinel(3), Some(5)); // trailer sentinel
        assert_eq!(buf.find_sentinel(6), None);
        assert_eq!(buf.find_sentinel(100), None);
    }

    #[test]
    fn test_find_terminator_skips_literal_sentinels() {
        let raw = [b'a', 0x03, b'b', 0x00, b'c'];
        let buf = EscapedBuffer::new(&raw);

        assert_eq!(buf.find_sentinel(0), Some(1));
        assert_eq!(buf.find_terminator(0), Some(3));
        assert_eq!(buf.find_terminator(4), Some(6)); // trailer sentinel
    }

    #[test]
    fn test_empty_input() {
        let buf = EscapedBuffer::new(&[]);
        assert_eq!(buf.escaped(), &TRAILER);
        assert_eq!(buf.tag_at(0), Some(0x08));
    }
}
