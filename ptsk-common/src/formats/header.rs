//! Catalog header and section directory entries

use super::PTSK_CATALOG_FORMAT;

/// Fixed catalog header (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogHeader {
    pub magic: [u8; 8],
    pub version: u32,
    pub section_count: u32,
}

impl CatalogHeader {
    pub const SIZE: usize = 16;

    pub fn new(section_count: u32) -> Self {
        Self {
            magic: *PTSK_CATALOG_FORMAT.magic,
            version: PTSK_CATALOG_FORMAT.version,
            section_count,
        }
    }

    /// Total size of header plus directory for `section_count` sections
    pub const fn layout_size(section_count: usize) -> usize {
        Self::SIZE + section_count * SectionEntry::SIZE
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..8].copy_from_slice(&self.magic);
        bytes[8..12].copy_from_slice(&self.version.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.section_count.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut magic = [0u8; 8];
        magic.copy_from_slice(&bytes[0..8]);
        Some(Self {
            magic,
            version: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            section_count: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        })
    }
}

/// One directory entry (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionEntry {
    /// ASCII fourcc
    pub tag: [u8; 4],
    /// Absolute byte offset of the payload from the file start
    pub offset: u32,
    /// Payload length in bytes (padding excluded)
    pub length: u32,
    /// Number of elements in the payload
    pub count: u32,
}

impl SectionEntry {
    pub const SIZE: usize = 16;

    /// Byte offset one past the end of the payload
    pub fn end(&self) -> usize {
        self.offset as usize + self.length as usize
    }

    pub fn tag_str(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }

    /// Write entry to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.tag);
        bytes[4..8].copy_from_slice(&self.offset.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.length.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.count.to_le_bytes());
        bytes
    }

    /// Read entry from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            tag: [bytes[0], bytes[1], bytes[2], bytes[3]],
            offset: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            length: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            count: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_bytes() {
        let bytes = CatalogHeader::new(7).to_bytes();
        assert_eq!(&bytes[0..8], b"PTSKCAT4");
        assert_eq!(&bytes[8..12], &[4, 0, 0, 0]);
        assert_eq!(&bytes[12..16], &[7, 0, 0, 0]);

        let parsed = CatalogHeader::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, CatalogHeader::new(7));
    }

    #[test]
    fn test_layout_size() {
        // 8 magic + 4 version + 4 count + 16 per section
        assert_eq!(CatalogHeader::layout_size(7), 8 + 4 + 4 + 16 * 7);
        assert_eq!(CatalogHeader::layout_size(0), 16);
    }

    #[test]
    fn test_section_entry_bytes() {
        let entry = SectionEntry {
            tag: *b"STAR",
            offset: 0x0102_0304,
            length: 48,
            count: 2,
        };
        let bytes = entry.to_bytes();
        assert_eq!(&bytes[0..4], b"STAR");
        assert_eq!(&bytes[4..8], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(SectionEntry::from_bytes(&bytes), Some(entry));
        assert_eq!(entry.end(), 0x0102_0304 + 48);
        assert_eq!(entry.tag_str(), "STAR");
    }

    #[test]
    fn test_short_bytes() {
        assert!(CatalogHeader::from_bytes(&[0u8; 15]).is_none());
        assert!(SectionEntry::from_bytes(&[0u8; 15]).is_none());
    }
}
