//! Section packer
//!
//! Lays out the header, the section directory and the section payloads. Payloads
//! start on a 4-byte boundary measured from the file start; the gap before each one
//! is zero-filled and not counted in any section length.

use ptsk_common::{
    BinaryRecord, CatalogHeader, PTSK_CATALOG_FORMAT, SectionEntry, SectionKind, encode_records,
};

use crate::error::{BuildError, Result};
use crate::string_pool::FinishedStrings;

/// One section ready to be packed
#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    pub payload: Vec<u8>,
    pub count: u32,
}

impl Section {
    /// Encode a typed record array
    pub fn from_records<T: BinaryRecord>(records: &[T]) -> Result<Self> {
        Ok(Self {
            kind: T::SECTION,
            payload: encode_records(records),
            count: to_u32(T::SECTION, "element count", records.len())?,
        })
    }

    /// The STR0 payload
    pub fn strings(strings: FinishedStrings) -> Self {
        Self {
            kind: SectionKind::Strings,
            payload: strings.bytes,
            count: strings.count,
        }
    }

    fn check(&self) -> Result<()> {
        if let Some(size) = self.kind.record_size() {
            let expected = self.count as usize * size;
            if self.payload.len() != expected {
                return Err(invariant(
                    self.kind,
                    format!(
                        "payload is {} bytes, expected {} ({} records of {} bytes)",
                        self.payload.len(),
                        expected,
                        self.count,
                        size
                    ),
                ));
            }
        }
        Ok(())
    }
}

fn invariant(kind: SectionKind, reason: String) -> BuildError {
    BuildError::InternalInvariantViolation {
        section: String::from_utf8_lossy(kind.fourcc()).into_owned(),
        reason,
    }
}

fn to_u32(kind: SectionKind, what: &str, n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| invariant(kind, format!("{what} {n} does not fit in u32")))
}

fn align_up(n: usize, alignment: usize) -> usize {
    n.div_ceil(alignment) * alignment
}

/// Pack sections, in the given order, into one catalog blob.
pub fn pack_sections(sections: &[Section]) -> Result<Vec<u8>> {
    let alignment = PTSK_CATALOG_FORMAT.section_alignment;
    let layout_size = CatalogHeader::layout_size(sections.len());

    let mut directory = Vec::with_capacity(sections.len());
    let mut cursor = layout_size;
    for section in sections {
        section.check()?;
        cursor = align_up(cursor, alignment);
        let entry = SectionEntry {
            tag: *section.kind.fourcc(),
            offset: to_u32(section.kind, "offset", cursor)?,
            length: to_u32(section.kind, "length", section.payload.len())?,
            count: section.count,
        };
        tracing::debug!(
            "{}: offset {}, {} bytes, {} elements",
            entry.tag_str(),
            entry.offset,
            entry.length,
            entry.count
        );
        cursor += section.payload.len();
        directory.push(entry);
    }

    let section_count = u32::try_from(sections.len())
        .map_err(|_| BuildError::InternalInvariantViolation {
            section: "header".to_string(),
            reason: format!("{} sections", sections.len()),
        })?;

    let mut out = Vec::with_capacity(cursor);
    out.extend_from_slice(&CatalogHeader::new(section_count).to_bytes());
    for entry in &directory {
        out.extend_from_slice(&entry.to_bytes());
    }
    for (section, entry) in sections.iter().zip(&directory) {
        out.resize(entry.offset as usize, 0);
        out.extend_from_slice(&section.payload);
    }
    Ok(out)
}
