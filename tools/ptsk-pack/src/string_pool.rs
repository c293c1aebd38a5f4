//! STR0 string pool
//!
//! Strings are stored NUL-terminated and addressed by their byte offset. Offsets are
//! handed out once and never move; interning an equal string again returns the
//! original offset.

use hashbrown::HashMap;

/// Interning table owned by one build
#[derive(Debug, Default)]
pub struct StringPool {
    offsets: HashMap<String, u32>,
    blob: Vec<u8>,
}

/// Finished STR0 payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedStrings {
    pub bytes: Vec<u8>,
    /// Number of distinct strings
    pub count: u32,
}

impl StringPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s` and return its offset. The empty string maps to 0.
    pub fn intern(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }
        if let Some(&offset) = self.offsets.get(s) {
            return offset;
        }
        let offset = self.blob.len() as u32;
        self.blob.extend_from_slice(s.as_bytes());
        self.blob.push(0);
        self.offsets.insert(s.to_string(), offset);
        offset
    }

    /// Number of distinct strings interned so far
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Current payload size in bytes
    pub fn byte_len(&self) -> usize {
        self.blob.len()
    }

    /// Consume the pool; offsets issued earlier index into the returned bytes.
    pub fn finish(self) -> FinishedStrings {
        FinishedStrings {
            count: self.offsets.len() as u32,
            bytes: self.blob,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_string_same_offset() {
        let mut pool = StringPool::new();
        let a = pool.intern("Betelgeuse");
        let b = pool.intern("Betelgeuse");
        assert_eq!(a, b);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_distinct_strings_distinct_offsets() {
        let mut pool = StringPool::new();
        let a = pool.intern("And");
        let b = pool.intern("Andromeda");
        let c = pool.intern("Ant");
        assert_eq!(a, 0);
        assert_eq!(b, 4);
        assert_eq!(c, 14);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_empty_maps_to_zero() {
        let mut pool = StringPool::new();
        assert_eq!(pool.intern(""), 0);
        assert!(pool.is_empty());
        assert_eq!(pool.byte_len(), 0);
    }

    #[test]
    fn test_finish_layout() {
        let mut pool = StringPool::new();
        let vega = pool.intern("Vega");
        let lyra = pool.intern("Lyra");
        pool.intern("Vega");
        let finished = pool.finish();
        assert_eq!(finished.bytes, b"Vega\0Lyra\0");
        assert_eq!(finished.count, 2);
        assert_eq!(&finished.bytes[vega as usize..vega as usize + 4], b"Vega");
        assert_eq!(&finished.bytes[lyra as usize..lyra as usize + 4], b"Lyra");
    }

    #[test]
    fn test_utf8_is_stored_verbatim() {
        let mut pool = StringPool::new();
        pool.intern("Boötes");
        let after = pool.intern("x");
        // 'ö' is two bytes in UTF-8
        assert_eq!(after, 8);
        assert_eq!(pool.finish().bytes, "Boötes\0x\0".as_bytes());
    }
}
