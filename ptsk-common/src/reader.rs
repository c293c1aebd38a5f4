//! Catalog reader
//!
//! Parses a complete PTSKCAT4 blob into typed record arrays and checks the
//! cross-references a renderer relies on: string offsets, star id/constellation
//! agreement, and asterism -> polyline -> node ranges.

use hashbrown::HashMap;
use std::sync::OnceLock;

use crate::constellations::CONSTELLATION_COUNT;
use crate::formats::{
    ArtOverlayRecord, AsterismRecord, BinaryRecord, CatalogHeader, ConstellationRecord,
    NodeRecord, PTSK_CATALOG_FORMAT, PolylineRecord, SectionEntry, SectionKind, StarRecord,
    decode_records,
};
use crate::ids::StarId;

/// Error type for catalog parsing.
#[derive(Debug, thiserror::Error)]
pub enum CatalogReadError {
    #[error("Catalog truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("Unexpected magic: {0:?}")]
    BadMagic([u8; 8]),

    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u32),

    #[error("Section count must be positive")]
    NoSections,

    #[error("Missing section {0}")]
    MissingSection(&'static str),

    #[error("Section {tag} ends at byte {end}, past the end of the catalog ({len} bytes)")]
    SectionOutOfBounds { tag: String, end: usize, len: usize },

    #[error("Section {tag} offset {offset} is not {alignment}-byte aligned")]
    MisalignedSection {
        tag: String,
        offset: u32,
        alignment: usize,
    },

    #[error("Section {tag} too small: {length} bytes, expected at least {expected}")]
    SectionTooSmall {
        tag: String,
        length: usize,
        expected: usize,
    },

    #[error("Invalid string reference at offset {0}")]
    BadString(u32),

    #[error("{what} range {start}..{end} exceeds {available} entries")]
    RangeOutOfBounds {
        what: &'static str,
        start: usize,
        end: usize,
        available: usize,
    },

    #[error("Constellation index {0} out of range")]
    ConstellationOutOfRange(u16),

    #[error("Star id {id} encodes constellation {encoded} but record says {recorded}")]
    ConstellationMismatch { id: u32, encoded: u32, recorded: u16 },
}

/// Parser for PTSKCAT4 blobs.
pub struct CatalogReader;

impl CatalogReader {
    /// Quick magic check without a full parse
    pub fn can_read(bytes: &[u8]) -> bool {
        bytes.len() >= CatalogHeader::SIZE && &bytes[0..8] == PTSK_CATALOG_FORMAT.magic
    }

    /// Parse and validate a whole catalog.
    pub fn parse(bytes: &[u8]) -> Result<Catalog, CatalogReadError> {
        let header = CatalogHeader::from_bytes(bytes).ok_or(CatalogReadError::Truncated {
            needed: CatalogHeader::SIZE,
            available: bytes.len(),
        })?;
        if &header.magic != PTSK_CATALOG_FORMAT.magic {
            return Err(CatalogReadError::BadMagic(header.magic));
        }
        if header.version != PTSK_CATALOG_FORMAT.version {
            return Err(CatalogReadError::UnsupportedVersion(header.version));
        }
        if header.section_count == 0 {
            return Err(CatalogReadError::NoSections);
        }

        let layout_size = CatalogHeader::layout_size(header.section_count as usize);
        if bytes.len() < layout_size {
            return Err(CatalogReadError::Truncated {
                needed: layout_size,
                available: bytes.len(),
            });
        }

        let mut directory = Vec::with_capacity(header.section_count as usize);
        for i in 0..header.section_count as usize {
            let at = CatalogHeader::SIZE + i * SectionEntry::SIZE;
            // Length was checked against layout_size above
            if let Some(entry) = SectionEntry::from_bytes(&bytes[at..]) {
                check_bounds(&entry, bytes.len())?;
                directory.push(entry);
            }
        }

        let strings_entry = find_section(&directory, SectionKind::Strings)?;
        let strings = payload(bytes, strings_entry).to_vec();

        let catalog = Catalog {
            header,
            string_count: strings_entry.count,
            strings,
            constellations: read_section(bytes, &directory)?,
            stars: read_section(bytes, &directory)?,
            asterisms: read_section(bytes, &directory)?,
            polylines: read_section(bytes, &directory)?,
            nodes: read_section(bytes, &directory)?,
            overlays: read_section(bytes, &directory)?,
            directory,
            star_index: OnceLock::new(),
        };
        catalog.validate()?;
        Ok(catalog)
    }
}

fn check_bounds(entry: &SectionEntry, len: usize) -> Result<(), CatalogReadError> {
    let alignment = PTSK_CATALOG_FORMAT.section_alignment;
    if entry.offset as usize % alignment != 0 {
        return Err(CatalogReadError::MisalignedSection {
            tag: entry.tag_str(),
            offset: entry.offset,
            alignment,
        });
    }
    if entry.end() > len {
        return Err(CatalogReadError::SectionOutOfBounds {
            tag: entry.tag_str(),
            end: entry.end(),
            len,
        });
    }
    Ok(())
}

fn find_section(
    directory: &[SectionEntry],
    kind: SectionKind,
) -> Result<&SectionEntry, CatalogReadError> {
    directory
        .iter()
        .find(|entry| &entry.tag == kind.fourcc())
        .ok_or_else(|| {
            CatalogReadError::MissingSection(std::str::from_utf8(kind.fourcc()).unwrap_or("????"))
        })
}

fn payload<'a>(bytes: &'a [u8], entry: &SectionEntry) -> &'a [u8] {
    &bytes[entry.offset as usize..entry.end()]
}

fn read_section<T: BinaryRecord>(
    bytes: &[u8],
    directory: &[SectionEntry],
) -> Result<Vec<T>, CatalogReadError> {
    let entry = find_section(directory, T::SECTION)?;
    let expected = entry.count as usize * T::SIZE;
    let data = payload(bytes, entry);
    decode_records(data, entry.count as usize).ok_or_else(|| CatalogReadError::SectionTooSmall {
        tag: entry.tag_str(),
        length: data.len(),
        expected,
    })
}

/// A parsed catalog.
#[derive(Debug)]
pub struct Catalog {
    pub header: CatalogHeader,
    pub directory: Vec<SectionEntry>,
    strings: Vec<u8>,
    string_count: u32,
    pub constellations: Vec<ConstellationRecord>,
    pub stars: Vec<StarRecord>,
    pub asterisms: Vec<AsterismRecord>,
    pub polylines: Vec<PolylineRecord>,
    pub nodes: Vec<NodeRecord>,
    pub overlays: Vec<ArtOverlayRecord>,

    star_index: OnceLock<HashMap<u32, usize>>,
}

impl Catalog {
    /// Resolve a string id (byte offset into STR0)
    pub fn string(&self, id: u32) -> Result<&str, CatalogReadError> {
        let start = id as usize;
        if start >= self.strings.len() {
            return Err(CatalogReadError::BadString(id));
        }
        let len = self.strings[start..]
            .iter()
            .position(|&b| b == 0)
            .ok_or(CatalogReadError::BadString(id))?;
        std::str::from_utf8(&self.strings[start..start + len])
            .map_err(|_| CatalogReadError::BadString(id))
    }

    /// Element count recorded for STR0 (number of distinct strings)
    pub fn string_count(&self) -> u32 {
        self.string_count
    }

    pub fn section(&self, kind: SectionKind) -> Option<&SectionEntry> {
        self.directory.iter().find(|e| &e.tag == kind.fourcc())
    }

    /// Abbreviation and full name of a constellation
    pub fn constellation(&self, index: u16) -> Result<(&str, &str), CatalogReadError> {
        let record = self
            .constellations
            .get(index as usize)
            .ok_or(CatalogReadError::ConstellationOutOfRange(index))?;
        Ok((self.string(record.abbr_str)?, self.string(record.name_str)?))
    }

    /// Find a star by id (O(1) via lazily built index)
    pub fn star_by_id(&self, id: StarId) -> Option<&StarRecord> {
        let index = self.star_index.get_or_init(|| {
            let mut index = HashMap::with_capacity(self.stars.len());
            for (i, star) in self.stars.iter().enumerate() {
                index.entry(star.id).or_insert(i);
            }
            index
        });
        index.get(&id.raw()).map(|&i| &self.stars[i])
    }

    pub fn stars_in(&self, constellation: u16) -> impl Iterator<Item = &StarRecord> {
        self.stars
            .iter()
            .filter(move |s| s.constellation == constellation)
    }

    pub fn asterisms_in(&self, constellation: u16) -> impl Iterator<Item = &AsterismRecord> {
        self.asterisms
            .iter()
            .filter(move |a| a.constellation == constellation)
    }

    pub fn overlays_in(&self, constellation: u16) -> impl Iterator<Item = &ArtOverlayRecord> {
        self.overlays
            .iter()
            .filter(move |o| o.constellation == constellation)
    }

    /// Polylines belonging to an asterism
    pub fn polylines_of(&self, asterism: &AsterismRecord) -> &[PolylineRecord] {
        let start = asterism.polyline_start as usize;
        let end = start + asterism.polyline_count as usize;
        self.polylines.get(start..end).unwrap_or(&[])
    }

    /// Star ids along a polyline
    pub fn polyline_nodes(&self, polyline: &PolylineRecord) -> Vec<StarId> {
        let start = polyline.node_start as usize;
        let end = start + polyline.node_count as usize;
        self.nodes
            .get(start..end)
            .unwrap_or(&[])
            .iter()
            .map(|n| StarId(n.star_id))
            .collect()
    }

    fn validate(&self) -> Result<(), CatalogReadError> {
        for c in &self.constellations {
            self.string(c.abbr_str)?;
            self.string(c.name_str)?;
        }

        for star in &self.stars {
            check_constellation(star.constellation)?;
            let encoded = StarId(star.id).cc();
            if encoded != star.constellation as u32 {
                return Err(CatalogReadError::ConstellationMismatch {
                    id: star.id,
                    encoded,
                    recorded: star.constellation,
                });
            }
            self.string(star.name_str)?;
        }

        for asterism in &self.asterisms {
            check_constellation(asterism.constellation)?;
            self.string(asterism.name_str)?;
            let start = asterism.polyline_start as usize;
            check_range(
                "Asterism polyline",
                start,
                asterism.polyline_count as usize,
                self.polylines.len(),
            )?;
        }

        for polyline in &self.polylines {
            check_range(
                "Polyline node",
                polyline.node_start as usize,
                polyline.node_count as usize,
                self.nodes.len(),
            )?;
        }

        for overlay in &self.overlays {
            check_constellation(overlay.constellation)?;
            self.string(overlay.key_str)?;
        }

        Ok(())
    }
}

fn check_constellation(index: u16) -> Result<(), CatalogReadError> {
    if index as usize >= CONSTELLATION_COUNT {
        return Err(CatalogReadError::ConstellationOutOfRange(index));
    }
    Ok(())
}

fn check_range(
    what: &'static str,
    start: usize,
    count: usize,
    available: usize,
) -> Result<(), CatalogReadError> {
    if start + count > available {
        return Err(CatalogReadError::RangeOutOfBounds {
            what,
            start,
            end: start + count,
            available,
        });
    }
    Ok(())
}
