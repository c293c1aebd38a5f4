//! Binary serialization trait for catalog records.
//!
//! Every fixed-size record implements `BinaryRecord`, which ties the record type to
//! its section and its on-disk size. Builders collect `Vec<Record>` and only turn them
//! into bytes through [`encode_records`], so a section payload is always a whole
//! number of records.

use super::SectionKind;
use bytemuck::Pod;

/// Trait for fixed-size records stored in a catalog section.
///
/// Records are `#[repr(C)]` and derive `Pod`, which rejects any layout with implicit
/// padding at compile time. Each record type also asserts that its in-memory size
/// equals `SIZE`.
pub trait BinaryRecord: Pod {
    /// Size of one serialized record in bytes.
    const SIZE: usize;

    /// Section this record type is stored in.
    const SECTION: SectionKind;

    /// Append the little-endian encoding of this record to `out`.
    fn write_to(&self, out: &mut Vec<u8>);

    /// Decode one record from the start of `bytes`.
    ///
    /// Returns `None` if the slice is shorter than `SIZE`.
    fn read_from(bytes: &[u8]) -> Option<Self>;
}

/// Encode a record array into a section payload.
///
/// On little-endian targets the in-memory representation already is the wire
/// representation, so the array is copied as raw bytes.
pub fn encode_records<T: BinaryRecord>(records: &[T]) -> Vec<u8> {
    if cfg!(target_endian = "little") {
        return bytemuck::cast_slice(records).to_vec();
    }
    let mut out = Vec::with_capacity(records.len() * T::SIZE);
    for record in records {
        record.write_to(&mut out);
    }
    out
}

/// Decode a whole section payload into records.
///
/// Trailing bytes shorter than one record are ignored.
pub fn decode_records<T: BinaryRecord>(bytes: &[u8], count: usize) -> Option<Vec<T>> {
    if bytes.len() < count * T::SIZE {
        return None;
    }
    bytes
        .chunks_exact(T::SIZE)
        .take(count)
        .map(T::read_from)
        .collect()
}
