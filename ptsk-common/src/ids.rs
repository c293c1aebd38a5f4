//! Star identifiers and star record flags.
//!
//! A star identifier packs three decimal fields into one `u32`:
//!
//! ```text
//! id = cc * 10000 + pp * 100 + ss
//! ```
//!
//! - `cc`: constellation index (0..=87)
//! - `pp`: skeleton group number (0..=99, 0 for stars outside any skeleton group)
//! - `ss`: sequence number inside the group (1..=99)

use crate::constellations::CONSTELLATION_COUNT;
use std::fmt;

/// Identifier of one STAR record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StarId(pub u32);

impl StarId {
    /// Written in place of an absent star reference (e.g. an asterism without a label star)
    pub const NONE: StarId = StarId(0);

    /// Largest value representable by the `pp` and `ss` fields
    pub const MAX_COMPONENT: u32 = 99;

    /// Pack constellation index, group and sequence into an identifier.
    ///
    /// Returns `None` when any field does not fit its decimal range; values are never
    /// wrapped.
    pub fn from_parts(cc: u16, pp: u32, ss: u32) -> Option<Self> {
        if cc as usize >= CONSTELLATION_COUNT || pp > Self::MAX_COMPONENT || ss > Self::MAX_COMPONENT
        {
            return None;
        }
        Some(Self(cc as u32 * 10_000 + pp * 100 + ss))
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    /// Constellation index
    pub fn cc(self) -> u32 {
        self.0 / 10_000
    }

    /// Skeleton group number
    pub fn pp(self) -> u32 {
        (self.0 / 100) % 100
    }

    /// Sequence number within the group
    pub fn ss(self) -> u32 {
        self.0 % 100
    }
}

impl fmt::Display for StarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}{:02}", self.cc(), self.pp(), self.ss())
    }
}

bitflags::bitflags! {
    /// Bitset stored in the `flags` field of a STAR record
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StarFlags: u16 {
        /// Magnitude below the bright threshold
        const BRIGHT = 0x01;
        /// Node of an official skeleton line
        const LINE_NODE = 0x02;
        /// Duplicate of a star that already has a primary record; do not label
        const NO_LABEL = 0x04;
        /// Reserved in the wire format; no builder sets it yet
        const AUX_ONLY = 0x08;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;

    #[test]
    fn test_star_id_layout() {
        let id = StarId::from_parts(59, 3, 7).unwrap();
        assert_eq!(id.raw(), 590_307);
        assert_eq!((id.cc(), id.pp(), id.ss()), (59, 3, 7));
        assert_eq!(id.to_string(), "590307");
    }

    #[test]
    fn test_star_id_rejects_out_of_range_parts() {
        assert!(StarId::from_parts(0, 100, 1).is_none());
        assert!(StarId::from_parts(0, 1, 100).is_none());
        assert!(StarId::from_parts(88, 1, 1).is_none());
        assert!(StarId::from_parts(87, 99, 99).is_some());
    }

    #[test]
    fn test_star_id_is_injective_per_constellation() {
        let mut seen = HashSet::new();
        for pp in 0..=99 {
            for ss in 0..=99 {
                let id = StarId::from_parts(12, pp, ss).unwrap();
                assert!(seen.insert(id), "collision at pp={pp} ss={ss}");
            }
        }
        assert_eq!(seen.len(), 10_000);
    }

    #[test]
    fn test_star_id_ranges_do_not_overlap_across_constellations() {
        for cc in 0..87u16 {
            let last = StarId::from_parts(cc, 99, 99).unwrap();
            let next_first = StarId::from_parts(cc + 1, 0, 0).unwrap();
            assert!(last < next_first);
            assert_eq!(last.cc(), cc as u32);
            assert_eq!(next_first.cc(), cc as u32 + 1);
        }
    }

    #[test]
    fn test_flags_combine() {
        let mut flags = StarFlags::LINE_NODE | StarFlags::BRIGHT;
        assert_eq!(flags.bits(), 0x03);
        assert!(flags.contains(StarFlags::LINE_NODE));
        assert!(!flags.contains(StarFlags::NO_LABEL));
        flags |= StarFlags::NO_LABEL;
        assert_eq!(flags.bits(), 0x07);
        assert_eq!(StarFlags::AUX_ONLY.bits(), 0x08);
    }

    #[test]
    fn test_flags_keep_unknown_bits_from_records() {
        let flags = StarFlags::from_bits_retain(0x12);
        assert!(flags.contains(StarFlags::LINE_NODE));
        assert_eq!(flags.bits(), 0x12);
        assert_eq!(StarFlags::from_bits(0x12), None);
    }
}
