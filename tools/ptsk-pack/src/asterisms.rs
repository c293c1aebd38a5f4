//! ASTR / APLY / ASTN / ART0 construction
//!
//! Every key is resolved to the primary record of its star, never to a `NO_LABEL`
//! duplicate. Polylines append their node ids to one shared ASTN sequence; each
//! asterism owns a contiguous run of APLY entries.

use ptsk_common::{
    ArtOverlayRecord, AsterismRecord, Constellation, NodeRecord, PolylineRecord, StarId,
};

use crate::error::{BuildError, Result};
use crate::model::ConstellationData;
use crate::stars::StarTable;
use crate::string_pool::StringPool;

/// Polyline style written to APLY; only one style exists so far
pub const DEFAULT_POLYLINE_STYLE: u16 = 0;

#[derive(Debug, Default)]
pub struct AsterismTables {
    pub asterisms: Vec<AsterismRecord>,
    pub polylines: Vec<PolylineRecord>,
    pub nodes: Vec<NodeRecord>,
    pub overlays: Vec<ArtOverlayRecord>,
}

struct Resolver<'a> {
    stars: &'a StarTable,
    constellation: Constellation,
}

impl Resolver<'_> {
    fn resolve(&self, key: &str, referrer: impl FnOnce() -> String) -> Result<StarId> {
        self.stars
            .primary(self.constellation.index, key)
            .ok_or_else(|| BuildError::UnresolvedStarKey {
                constellation: self.constellation.abbr.to_string(),
                key: key.to_string(),
                referrer: referrer(),
            })
    }
}

fn narrow(cd: &ConstellationData, what: &str, n: usize) -> Result<u16> {
    u16::try_from(n).map_err(|_| {
        BuildError::malformed(&cd.source, format!("{what} has {n} entries (max {})", u16::MAX))
    })
}

fn offset(section: &str, n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| BuildError::InternalInvariantViolation {
        section: section.to_string(),
        reason: format!("offset {n} does not fit in u32"),
    })
}

/// Build asterisms for every constellation, then art overlays for every
/// constellation. Names and overlay keys are interned in that order.
pub fn build_asterisms(
    data: &[ConstellationData],
    stars: &StarTable,
    pool: &mut StringPool,
) -> Result<AsterismTables> {
    let mut tables = AsterismTables::default();

    for cd in data {
        let resolver = Resolver {
            stars,
            constellation: cd.constellation,
        };
        for asterism in &cd.asterisms {
            let polyline_start = offset("APLY", tables.polylines.len())?;
            for (i, polyline) in asterism.polylines.iter().enumerate() {
                let node_start = offset("ASTN", tables.nodes.len())?;
                for key in polyline {
                    let id = resolver
                        .resolve(key, || format!("asterism '{}' polyline {i}", asterism.name))?;
                    tables.nodes.push(NodeRecord::new(id.raw()));
                }
                let node_count = narrow(
                    cd,
                    &format!("polyline {i} of asterism '{}'", asterism.name),
                    polyline.len(),
                )?;
                tables.polylines.push(PolylineRecord::new(
                    node_start,
                    node_count,
                    DEFAULT_POLYLINE_STYLE,
                ));
            }
            let polyline_count = narrow(
                cd,
                &format!("asterism '{}'", asterism.name),
                asterism.polylines.len(),
            )?;

            let label = match asterism.label.as_deref() {
                None | Some("") => StarId::NONE,
                Some(key) => {
                    resolver.resolve(key, || format!("label of asterism '{}'", asterism.name))?
                }
            };

            let name_str = pool.intern(&asterism.name);
            tables.asterisms.push(AsterismRecord::new(
                cd.constellation.index,
                name_str,
                polyline_start,
                polyline_count,
                label.raw(),
            ));
        }
    }

    for cd in data {
        let resolver = Resolver {
            stars,
            constellation: cd.constellation,
        };
        for overlay in &cd.art_overlays {
            let referrer = || format!("art overlay '{}'", overlay.key);
            let anchor_a = resolver.resolve(&overlay.anchor_a, referrer)?;
            let anchor_b = resolver.resolve(&overlay.anchor_b, referrer)?;
            let key_str = pool.intern(&overlay.key);
            tables.overlays.push(ArtOverlayRecord::new(
                cd.constellation.index,
                key_str,
                anchor_a.raw(),
                anchor_b.raw(),
            ));
        }
    }

    tracing::info!(
        "Asterisms: {} asterisms, {} polylines, {} nodes, {} art overlays",
        tables.asterisms.len(),
        tables.polylines.len(),
        tables.nodes.len(),
        tables.overlays.len()
    );
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildSection;
    use crate::descriptor::{LoadedDescriptor, parse_descriptor};
    use crate::model::resolve;
    use crate::stars::build_stars;
    use std::path::PathBuf;

    fn build(json: &str) -> Result<(StarTable, AsterismTables)> {
        let path = PathBuf::from("fixture.json");
        let loaded = LoadedDescriptor {
            descriptor: parse_descriptor(&path, json).unwrap(),
            path,
        };
        let data = resolve(vec![loaded], &BuildSection::default()).unwrap();
        let mut pool = StringPool::new();
        let stars = build_stars(&data, &mut pool, 2.0)?;
        let tables = build_asterisms(&data, &stars, &mut pool)?;
        Ok((stars, tables))
    }

    const ORION: &str = r#"{
        "abbr": "Ori",
        "stars": [
            { "key": "A", "ra": 88.79, "dec": 7.41, "mag": 0.5 },
            { "key": "B", "ra": 78.63, "dec": -8.2, "mag": 0.13 },
            { "key": "C", "ra": 83.0, "dec": -0.3, "mag": 2.2 }
        ],
        "skeleton": [
            { "pp": 1, "nodes": ["A", "B"] },
            { "pp": 2, "nodes": ["B", "C"] }
        ],
        "asterisms": [
            { "name": "Pair", "label": "C", "polylines": [["A", "C"]] },
            { "name": "Two", "polylines": [["A", "B"], ["B", "C", "A"]] }
        ],
        "art_overlays": [ { "key": "hunter", "anchorA": "B", "anchorB": "C" } ]
    }"#;

    #[test]
    fn test_polyline_resolves_to_primary_ids() {
        let (stars, tables) = build(ORION).unwrap();
        let a = stars.primary(59, "A").unwrap().raw();
        let b = stars.primary(59, "B").unwrap().raw();
        let c = stars.primary(59, "C").unwrap().raw();
        assert_eq!((a, b, c), (590101, 590102, 590202));

        let pair = &tables.asterisms[0];
        assert_eq!(pair.polyline_start, 0);
        assert_eq!(pair.polyline_count, 1);
        assert_eq!(pair.label_star, c);
        assert_eq!(tables.polylines[0].node_count, 2);
        assert_eq!(tables.polylines[0].node_start, 0);
        assert_eq!(tables.nodes[0].star_id, a);
        assert_eq!(tables.nodes[1].star_id, c);
    }

    #[test]
    fn test_references_never_point_at_duplicates() {
        let (stars, tables) = build(ORION).unwrap();
        // B appears in two groups; its second record is 590201
        assert!(stars.records.iter().any(|r| r.id == 590201));
        assert!(tables.nodes.iter().all(|n| n.star_id != 590201));
        assert_eq!(tables.overlays[0].anchor_a, 590102);
    }

    #[test]
    fn test_polylines_share_node_sequence() {
        let (_, tables) = build(ORION).unwrap();
        let two = &tables.asterisms[1];
        assert_eq!(two.polyline_start, 1);
        assert_eq!(two.polyline_count, 2);
        assert_eq!(two.label_star, 0);
        assert_eq!(tables.polylines[1].node_start, 2);
        assert_eq!(tables.polylines[2].node_start, 4);
        assert_eq!(tables.polylines[2].node_count, 3);
        assert_eq!(tables.nodes.len(), 7);
        assert!(tables.polylines.iter().all(|p| p.style == DEFAULT_POLYLINE_STYLE));
    }

    #[test]
    fn test_empty_label_means_no_label() {
        let json = r#"{
            "abbr": "Ori",
            "stars": [ { "key": "A", "ra": 0, "dec": 0 } ],
            "asterisms": [ { "name": "Solo", "label": "", "polylines": [["A"]] } ]
        }"#;
        let (_, tables) = build(json).unwrap();
        assert_eq!(tables.asterisms[0].label_star, 0);
    }

    #[test]
    fn test_unresolved_references() {
        let bad_node = r#"{
            "abbr": "Ori",
            "stars": [ { "key": "A", "ra": 0, "dec": 0 } ],
            "asterisms": [ { "name": "X", "polylines": [["A", "Z"]] } ]
        }"#;
        assert!(matches!(
            build(bad_node).unwrap_err(),
            BuildError::UnresolvedStarKey { ref key, .. } if key == "Z"
        ));

        let bad_label = r#"{
            "abbr": "Ori",
            "stars": [ { "key": "A", "ra": 0, "dec": 0 } ],
            "asterisms": [ { "name": "X", "label": "Q", "polylines": [["A"]] } ]
        }"#;
        assert!(matches!(
            build(bad_label).unwrap_err(),
            BuildError::UnresolvedStarKey { ref key, .. } if key == "Q"
        ));

        let bad_anchor = r#"{
            "abbr": "Ori",
            "stars": [ { "key": "A", "ra": 0, "dec": 0 } ],
            "art_overlays": [ { "key": "art", "anchorA": "A", "anchorB": "nope" } ]
        }"#;
        assert!(matches!(
            build(bad_anchor).unwrap_err(),
            BuildError::UnresolvedStarKey { ref key, .. } if key == "nope"
        ));
    }
}
