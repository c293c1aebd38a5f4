//! Star identifier allocation and STAR record construction
//!
//! Records are produced in two passes over the resolved constellations:
//!
//! 1. Skeleton pass: one record per skeleton node, `pp` from the group and `ss` from
//!    the node position (starting at 1). The first record of a key becomes its
//!    primary record; later occurrences are flagged `NO_LABEL`.
//! 2. Fallback pass: every declared key still without a primary record gets one with
//!    `pp = 0` and `ss` counting up from 1 within its constellation.
//!
//! Asterisms and art overlays only ever reference primary records.

use hashbrown::{HashMap, HashSet};
use ptsk_common::{CONSTELLATION_COUNT, Constellation, StarFlags, StarId, StarRecord};

use crate::descriptor::SkeletonGroup;
use crate::error::{BuildError, Result};
use crate::model::{ConstellationData, StarProperty};
use crate::string_pool::StringPool;

/// Compute the identifier of a star from its constellation abbreviation, group and
/// sequence number.
pub fn make_id(abbr: &str, pp: i64, ss: i64) -> Result<StarId> {
    let constellation = Constellation::from_abbr(abbr)
        .ok_or_else(|| BuildError::UnknownConstellation(abbr.to_string()))?;
    make_id_for(constellation, pp, ss)
}

fn make_id_for(constellation: Constellation, pp: i64, ss: i64) -> Result<StarId> {
    let out_of_range = || BuildError::StarIdOutOfRange {
        constellation: constellation.abbr.to_string(),
        pp,
        ss,
    };
    let pp = u32::try_from(pp).map_err(|_| out_of_range())?;
    let ss = u32::try_from(ss).map_err(|_| out_of_range())?;
    StarId::from_parts(constellation.index, pp, ss).ok_or_else(out_of_range)
}

/// Hands out identifiers and refuses to issue the same one twice
#[derive(Debug, Default)]
struct IdAllocator {
    issued: HashSet<StarId>,
}

impl IdAllocator {
    fn allocate(
        &mut self,
        constellation: Constellation,
        key: &str,
        pp: i64,
        ss: i64,
    ) -> Result<StarId> {
        let id = make_id_for(constellation, pp, ss)?;
        if !self.issued.insert(id) {
            return Err(BuildError::DuplicateStarId {
                constellation: constellation.abbr.to_string(),
                key: key.to_string(),
                id,
            });
        }
        Ok(id)
    }
}

/// STAR records plus the primary-record index used for cross references
#[derive(Debug)]
pub struct StarTable {
    pub records: Vec<StarRecord>,
    /// Indexed by constellation index
    primary: Vec<HashMap<String, StarId>>,
}

impl StarTable {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            primary: vec![HashMap::new(); CONSTELLATION_COUNT],
        }
    }

    /// Primary record identifier of `key` in the given constellation
    pub fn primary(&self, constellation: u16, key: &str) -> Option<StarId> {
        self.primary
            .get(constellation as usize)
            .and_then(|keys| keys.get(key).copied())
    }

    /// Number of primary records (one per placed or declared key)
    pub fn primary_count(&self) -> usize {
        self.primary.iter().map(HashMap::len).sum()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn push(
        &mut self,
        id: StarId,
        property: &StarProperty,
        constellation: Constellation,
        flags: StarFlags,
        pool: &mut StringPool,
    ) {
        let name_str = pool.intern(&property.name);
        self.records.push(StarRecord::new(
            id.raw(),
            property.ra as f32,
            property.dec as f32,
            property.mag as f32,
            constellation.index,
            flags.bits(),
            name_str,
        ));
    }
}

/// Build every STAR record. Star names are interned in record order.
pub fn build_stars(
    data: &[ConstellationData],
    pool: &mut StringPool,
    bright_magnitude: f64,
) -> Result<StarTable> {
    let mut table = StarTable::new();
    let mut ids = IdAllocator::default();

    let brightness = |property: &StarProperty| {
        if property.mag < bright_magnitude {
            StarFlags::BRIGHT
        } else {
            StarFlags::empty()
        }
    };

    // Skeleton pass
    for cd in data {
        let constellation = cd.constellation;
        for group in &cd.skeleton {
            let pp = group_number(cd, group)?;
            for (i, key) in group.nodes.iter().enumerate() {
                let property =
                    cd.properties
                        .get(key)
                        .ok_or_else(|| BuildError::UnresolvedStarKey {
                            constellation: constellation.abbr.to_string(),
                            key: key.clone(),
                            referrer: format!("skeleton group {pp}"),
                        })?;
                let id = ids.allocate(constellation, key, pp, i as i64 + 1)?;

                let mut flags = StarFlags::LINE_NODE | brightness(property);
                let primaries = &mut table.primary[constellation.index as usize];
                if primaries.contains_key(key.as_str()) {
                    flags |= StarFlags::NO_LABEL;
                } else {
                    primaries.insert(key.clone(), id);
                }
                table.push(id, property, constellation, flags, pool);
            }
        }
    }
    let skeleton_records = table.len();

    // Fallback pass
    for cd in data {
        let constellation = cd.constellation;
        let mut ss = 1;
        for property in cd.properties.iter() {
            if table.primary(constellation.index, &property.key).is_some() {
                continue;
            }
            let id = ids.allocate(constellation, &property.key, 0, ss)?;
            ss += 1;
            table.primary[constellation.index as usize].insert(property.key.clone(), id);
            table.push(id, property, constellation, brightness(property), pool);
        }
        tracing::debug!(
            "{}: {} declared stars, {} skeleton groups, {} unplaced",
            constellation.abbr,
            cd.properties.len(),
            cd.skeleton.len(),
            ss - 1
        );
    }

    tracing::info!(
        "Stars: {} records ({} skeleton nodes, {} fallback)",
        table.len(),
        skeleton_records,
        table.len() - skeleton_records
    );
    Ok(table)
}

/// Integer group number of a skeleton group
fn group_number(cd: &ConstellationData, group: &SkeletonGroup) -> Result<i64> {
    let value = group.pp.as_f64().ok_or_else(|| {
        BuildError::malformed(
            &cd.source,
            format!("skeleton group number {:?} is not a number", group.pp),
        )
    })?;
    if value.fract() != 0.0 || !value.is_finite() {
        return Err(BuildError::malformed(
            &cd.source,
            format!("skeleton group number {value} is not an integer"),
        ));
    }
    Ok(value as i64)
}
