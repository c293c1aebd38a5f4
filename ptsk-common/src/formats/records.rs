//! Fixed-size catalog records
//!
//! # Record layouts
//! ```text
//! CST0 (16): abbr_str u32, name_str u32, reserved u32 × 2
//! STAR (24): id u32, ra f32, dec f32, mag f32, constellation u16, flags u16, name_str u32
//! ASTR (20): constellation u16, reserved u16, name_str u32, polyline_start u32,
//!            polyline_count u16, reserved u16, label_star u32
//! APLY (12): node_start u32, node_count u16, style u16, reserved u32
//! ASTN  (4): star_id u32
//! ART0 (16): constellation u16, reserved u16, key_str u32, anchor_a u32, anchor_b u32
//! ```

use bytemuck::{Pod, Zeroable};

use super::{BinaryRecord, SectionKind};
use crate::ids::StarFlags;

#[inline]
fn u16_at(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

#[inline]
fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[inline]
fn f32_at(bytes: &[u8], at: usize) -> f32 {
    f32::from_bits(u32_at(bytes, at))
}

// ============================================================================
// CST0
// ============================================================================

/// Constellation table entry
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ConstellationRecord {
    pub abbr_str: u32,
    pub name_str: u32,
    /// Reserved for skeleton line ranges (first line, line count)
    pub reserved: [u32; 2],
}

impl ConstellationRecord {
    pub const SIZE: usize = 16;

    pub fn new(abbr_str: u32, name_str: u32) -> Self {
        Self {
            abbr_str,
            name_str,
            reserved: [0; 2],
        }
    }
}

impl BinaryRecord for ConstellationRecord {
    const SIZE: usize = Self::SIZE;
    const SECTION: SectionKind = SectionKind::Constellations;

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.abbr_str.to_le_bytes());
        out.extend_from_slice(&self.name_str.to_le_bytes());
        out.extend_from_slice(&self.reserved[0].to_le_bytes());
        out.extend_from_slice(&self.reserved[1].to_le_bytes());
    }

    fn read_from(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            abbr_str: u32_at(bytes, 0),
            name_str: u32_at(bytes, 4),
            reserved: [u32_at(bytes, 8), u32_at(bytes, 12)],
        })
    }
}

// ============================================================================
// STAR
// ============================================================================

/// One materialized star
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct StarRecord {
    pub id: u32,
    /// Right ascension in degrees
    pub ra: f32,
    /// Declination in degrees
    pub dec: f32,
    pub mag: f32,
    pub constellation: u16,
    /// [`StarFlags`](crate::StarFlags) bits
    pub flags: u16,
    pub name_str: u32,
}

impl StarRecord {
    pub const SIZE: usize = 24;

    pub fn new(
        id: u32,
        ra: f32,
        dec: f32,
        mag: f32,
        constellation: u16,
        flags: u16,
        name_str: u32,
    ) -> Self {
        Self {
            id,
            ra,
            dec,
            mag,
            constellation,
            flags,
            name_str,
        }
    }

    /// Typed view of `flags`; unknown bits are kept
    pub fn star_flags(&self) -> StarFlags {
        StarFlags::from_bits_retain(self.flags)
    }
}

impl BinaryRecord for StarRecord {
    const SIZE: usize = Self::SIZE;
    const SECTION: SectionKind = SectionKind::Stars;

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.id.to_le_bytes());
        out.extend_from_slice(&self.ra.to_le_bytes());
        out.extend_from_slice(&self.dec.to_le_bytes());
        out.extend_from_slice(&self.mag.to_le_bytes());
        out.extend_from_slice(&self.constellation.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.name_str.to_le_bytes());
    }

    fn read_from(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            id: u32_at(bytes, 0),
            ra: f32_at(bytes, 4),
            dec: f32_at(bytes, 8),
            mag: f32_at(bytes, 12),
            constellation: u16_at(bytes, 16),
            flags: u16_at(bytes, 18),
            name_str: u32_at(bytes, 20),
        })
    }
}

// ============================================================================
// ASTR
// ============================================================================

/// Named asterism; its polylines are `polyline_start..polyline_start + polyline_count` in APLY
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct AsterismRecord {
    pub constellation: u16,
    pub _reserved0: u16,
    pub name_str: u32,
    pub polyline_start: u32,
    pub polyline_count: u16,
    pub _reserved1: u16,
    /// Primary id of the label star, 0 if none
    pub label_star: u32,
}

impl AsterismRecord {
    pub const SIZE: usize = 20;

    pub fn new(
        constellation: u16,
        name_str: u32,
        polyline_start: u32,
        polyline_count: u16,
        label_star: u32,
    ) -> Self {
        Self {
            constellation,
            _reserved0: 0,
            name_str,
            polyline_start,
            polyline_count,
            _reserved1: 0,
            label_star,
        }
    }
}

impl BinaryRecord for AsterismRecord {
    const SIZE: usize = Self::SIZE;
    const SECTION: SectionKind = SectionKind::Asterisms;

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.constellation.to_le_bytes());
        out.extend_from_slice(&self._reserved0.to_le_bytes());
        out.extend_from_slice(&self.name_str.to_le_bytes());
        out.extend_from_slice(&self.polyline_start.to_le_bytes());
        out.extend_from_slice(&self.polyline_count.to_le_bytes());
        out.extend_from_slice(&self._reserved1.to_le_bytes());
        out.extend_from_slice(&self.label_star.to_le_bytes());
    }

    fn read_from(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            constellation: u16_at(bytes, 0),
            _reserved0: u16_at(bytes, 2),
            name_str: u32_at(bytes, 4),
            polyline_start: u32_at(bytes, 8),
            polyline_count: u16_at(bytes, 12),
            _reserved1: u16_at(bytes, 14),
            label_star: u32_at(bytes, 16),
        })
    }
}

// ============================================================================
// APLY
// ============================================================================

/// One polyline; its nodes are `node_start..node_start + node_count` in ASTN
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PolylineRecord {
    pub node_start: u32,
    pub node_count: u16,
    pub style: u16,
    pub _reserved: u32,
}

impl PolylineRecord {
    pub const SIZE: usize = 12;

    pub fn new(node_start: u32, node_count: u16, style: u16) -> Self {
        Self {
            node_start,
            node_count,
            style,
            _reserved: 0,
        }
    }
}

impl BinaryRecord for PolylineRecord {
    const SIZE: usize = Self::SIZE;
    const SECTION: SectionKind = SectionKind::Polylines;

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.node_start.to_le_bytes());
        out.extend_from_slice(&self.node_count.to_le_bytes());
        out.extend_from_slice(&self.style.to_le_bytes());
        out.extend_from_slice(&self._reserved.to_le_bytes());
    }

    fn read_from(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            node_start: u32_at(bytes, 0),
            node_count: u16_at(bytes, 4),
            style: u16_at(bytes, 6),
            _reserved: u32_at(bytes, 8),
        })
    }
}

// ============================================================================
// ASTN
// ============================================================================

/// One polyline node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct NodeRecord {
    pub star_id: u32,
}

impl NodeRecord {
    pub const SIZE: usize = 4;

    pub fn new(star_id: u32) -> Self {
        Self { star_id }
    }
}

impl BinaryRecord for NodeRecord {
    const SIZE: usize = Self::SIZE;
    const SECTION: SectionKind = SectionKind::Nodes;

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.star_id.to_le_bytes());
    }

    fn read_from(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            star_id: u32_at(bytes, 0),
        })
    }
}

// ============================================================================
// ART0
// ============================================================================

/// Decorative art asset anchored between two stars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct ArtOverlayRecord {
    pub constellation: u16,
    pub _reserved: u16,
    pub key_str: u32,
    pub anchor_a: u32,
    pub anchor_b: u32,
}

impl ArtOverlayRecord {
    pub const SIZE: usize = 16;

    pub fn new(constellation: u16, key_str: u32, anchor_a: u32, anchor_b: u32) -> Self {
        Self {
            constellation,
            _reserved: 0,
            key_str,
            anchor_a,
            anchor_b,
        }
    }
}

impl BinaryRecord for ArtOverlayRecord {
    const SIZE: usize = Self::SIZE;
    const SECTION: SectionKind = SectionKind::ArtOverlays;

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.constellation.to_le_bytes());
        out.extend_from_slice(&self._reserved.to_le_bytes());
        out.extend_from_slice(&self.key_str.to_le_bytes());
        out.extend_from_slice(&self.anchor_a.to_le_bytes());
        out.extend_from_slice(&self.anchor_b.to_le_bytes());
    }

    fn read_from(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            constellation: u16_at(bytes, 0),
            _reserved: u16_at(bytes, 2),
            key_str: u32_at(bytes, 4),
            anchor_a: u32_at(bytes, 8),
            anchor_b: u32_at(bytes, 12),
        })
    }
}

const _: () = assert!(size_of::<ConstellationRecord>() == ConstellationRecord::SIZE);
const _: () = assert!(size_of::<StarRecord>() == StarRecord::SIZE);
const _: () = assert!(size_of::<AsterismRecord>() == AsterismRecord::SIZE);
const _: () = assert!(size_of::<PolylineRecord>() == PolylineRecord::SIZE);
const _: () = assert!(size_of::<NodeRecord>() == NodeRecord::SIZE);
const _: () = assert!(size_of::<ArtOverlayRecord>() == ArtOverlayRecord::SIZE);
