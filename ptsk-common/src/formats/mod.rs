//! PTSKCAT4 binary catalog format
//!
//! All multi-byte values are little-endian.
//!
//! # Layout
//! ```text
//! 0x00: magic "PTSKCAT4" (8 bytes)
//! 0x08: version u32 (= 4)
//! 0x0C: section_count u32
//! 0x10: section_count × directory entry (16 bytes each)
//!       tag [u8; 4], offset u32, length u32, count u32
//! var:  section payloads, each starting 4-byte aligned from the file start
//! ```
//!
//! Every section except STR0 is a dense array of one fixed-size record type. All
//! record types implement [`BinaryRecord`].

mod header;
mod records;
mod serialization;

pub use header::*;
pub use records::*;
pub use serialization::{BinaryRecord, decode_records, encode_records};

/// Catalog file format specification.
///
/// Single source of truth for the magic bytes, version and file extension.
#[derive(Debug, Clone, Copy)]
pub struct CatalogFormat {
    /// Magic bytes at the start of every catalog
    pub magic: &'static [u8; 8],

    /// Format version
    pub version: u32,

    /// Conventional file extension without dot
    pub extension: &'static str,

    /// Alignment of each section payload, measured from the file start
    pub section_alignment: usize,
}

/// The PTSKCAT4 format specification
pub const PTSK_CATALOG_FORMAT: CatalogFormat = CatalogFormat {
    magic: b"PTSKCAT4",
    version: 4,
    extension: "bin",
    section_alignment: 4,
};

/// Section kinds, in the order the packer writes them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// NUL-terminated UTF-8 strings, addressed by byte offset
    Strings,
    /// CST0 records
    Constellations,
    /// STAR records
    Stars,
    /// ASTR records
    Asterisms,
    /// APLY records
    Polylines,
    /// ASTN records
    Nodes,
    /// ART0 records
    ArtOverlays,
}

impl SectionKind {
    /// Every section, in pack order
    pub const ALL: [SectionKind; 7] = [
        SectionKind::Strings,
        SectionKind::Constellations,
        SectionKind::Stars,
        SectionKind::Asterisms,
        SectionKind::Polylines,
        SectionKind::Nodes,
        SectionKind::ArtOverlays,
    ];

    /// ASCII fourcc written into the directory
    pub const fn fourcc(self) -> &'static [u8; 4] {
        match self {
            SectionKind::Strings => b"STR0",
            SectionKind::Constellations => b"CST0",
            SectionKind::Stars => b"STAR",
            SectionKind::Asterisms => b"ASTR",
            SectionKind::Polylines => b"APLY",
            SectionKind::Nodes => b"ASTN",
            SectionKind::ArtOverlays => b"ART0",
        }
    }

    /// Fixed record size, or `None` for the variable-length string pool
    pub const fn record_size(self) -> Option<usize> {
        match self {
            SectionKind::Strings => None,
            SectionKind::Constellations => Some(ConstellationRecord::SIZE),
            SectionKind::Stars => Some(StarRecord::SIZE),
            SectionKind::Asterisms => Some(AsterismRecord::SIZE),
            SectionKind::Polylines => Some(PolylineRecord::SIZE),
            SectionKind::Nodes => Some(NodeRecord::SIZE),
            SectionKind::ArtOverlays => Some(ArtOverlayRecord::SIZE),
        }
    }

    pub fn from_fourcc(tag: &[u8; 4]) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.fourcc() == tag)
    }
}
