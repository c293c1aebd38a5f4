//! In-memory catalog model
//!
//! Resolves loaded descriptors against the constellation table and collects the
//! star property table (pass 1 of the build). Everything downstream works on
//! [`ConstellationData`] in descriptor file order.

use hashbrown::HashMap;
use ptsk_common::Constellation;
use std::path::{Path, PathBuf};

use crate::config::BuildSection;
use crate::coords::{parse_dec, parse_ra};
use crate::descriptor::{
    ArtOverlayEntry, AsterismEntry, ConstellationDescriptor, LoadedDescriptor, SkeletonGroup,
};
use crate::error::{BuildError, Result};

/// Parsed position, brightness and display name of one declared star
#[derive(Debug, Clone, PartialEq)]
pub struct StarProperty {
    pub key: String,
    /// Right ascension in degrees
    pub ra: f64,
    /// Declination in degrees
    pub dec: f64,
    pub mag: f64,
    pub name: String,
}

/// Star properties of one constellation, in declaration order
#[derive(Debug, Clone, Default)]
pub struct StarProperties {
    entries: Vec<StarProperty>,
    by_key: HashMap<String, usize>,
}

impl StarProperties {
    /// Insert or replace a property. A replaced key keeps its original position.
    pub fn insert(&mut self, property: StarProperty) {
        match self.by_key.get(&property.key) {
            Some(&i) => self.entries[i] = property,
            None => {
                self.by_key.insert(property.key.clone(), self.entries.len());
                self.entries.push(property);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&StarProperty> {
        self.by_key.get(key).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &StarProperty> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything the builders need to know about one constellation
#[derive(Debug, Clone)]
pub struct ConstellationData {
    pub constellation: Constellation,
    pub source: PathBuf,
    pub properties: StarProperties,
    pub skeleton: Vec<SkeletonGroup>,
    pub asterisms: Vec<AsterismEntry>,
    pub art_overlays: Vec<ArtOverlayEntry>,
}

/// Resolve descriptors (already in file-name order) into the build model.
pub fn resolve(
    descriptors: Vec<LoadedDescriptor>,
    settings: &BuildSection,
) -> Result<Vec<ConstellationData>> {
    let mut seen: HashMap<u16, PathBuf> = HashMap::new();
    let mut out = Vec::with_capacity(descriptors.len());

    for LoadedDescriptor { path, descriptor } in descriptors {
        let constellation = Constellation::from_abbr(&descriptor.abbr)
            .ok_or_else(|| BuildError::UnknownConstellation(descriptor.abbr.clone()))?;

        if let Some(first) = seen.get(&constellation.index) {
            return Err(BuildError::DuplicateConstellation {
                abbr: descriptor.abbr.clone(),
                first: first.clone(),
                second: path,
            });
        }
        seen.insert(constellation.index, path.clone());

        check_name(&path, &descriptor, constellation, settings)?;
        let properties = collect_properties(&path, &descriptor, constellation)?;

        let ConstellationDescriptor {
            skeleton,
            asterisms,
            art_overlays,
            ..
        } = descriptor;
        out.push(ConstellationData {
            constellation,
            source: path,
            properties,
            skeleton,
            asterisms,
            art_overlays,
        });
    }

    Ok(out)
}

fn check_name(
    path: &Path,
    descriptor: &ConstellationDescriptor,
    constellation: Constellation,
    settings: &BuildSection,
) -> Result<()> {
    let Some(name) = descriptor.name.as_deref() else {
        return Ok(());
    };
    if name == constellation.name {
        return Ok(());
    }
    if settings.strict_names {
        return Err(BuildError::malformed(
            path,
            format!(
                "name '{}' does not match '{}' for {}",
                name, constellation.name, constellation.abbr
            ),
        ));
    }
    tracing::warn!(
        "{}: name '{}' differs from catalog name '{}'; the catalog name is used",
        path.display(),
        name,
        constellation.name
    );
    Ok(())
}

/// Pass 1: parse every declared star of one descriptor
pub fn collect_properties(
    path: &Path,
    descriptor: &ConstellationDescriptor,
    constellation: Constellation,
) -> Result<StarProperties> {
    let mut properties = StarProperties::default();
    for star in &descriptor.stars {
        let coordinate_error = |source| BuildError::InvalidCoordinate {
            constellation: constellation.abbr.to_string(),
            key: star.key.clone(),
            source,
        };
        let ra = parse_ra(&star.ra).map_err(coordinate_error)?;
        let dec = parse_dec(&star.dec).map_err(coordinate_error)?;
        let mag = match &star.mag {
            None => 0.0,
            Some(value) => value.as_f64().ok_or_else(|| {
                BuildError::malformed(
                    path,
                    format!("magnitude {:?} of star '{}' is not a number", value, star.key),
                )
            })?,
        };
        properties.insert(StarProperty {
            key: star.key.clone(),
            ra,
            dec,
            mag,
            name: star.name.clone().unwrap_or_else(|| star.key.clone()),
        });
    }
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::parse_descriptor;

    fn loaded(name: &str, json: &str) -> LoadedDescriptor {
        let path = PathBuf::from(name);
        LoadedDescriptor {
            descriptor: parse_descriptor(&path, json).unwrap(),
            path,
        }
    }

    #[test]
    fn test_collect_properties_defaults() {
        let d = parse_descriptor(
            Path::new("Lyr.json"),
            r#"{ "abbr": "Lyr", "stars": [
                { "key": "alpha", "ra": "18:36:56.3", "dec": "+38:47:01", "mag": 0.03, "name": "Vega" },
                { "key": "beta", "ra": 282.52, "dec": 33.36 }
            ] }"#,
        )
        .unwrap();
        let lyra = Constellation::from_abbr("Lyr").unwrap();
        let props = collect_properties(Path::new("Lyr.json"), &d, lyra).unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("alpha").unwrap().name, "Vega");
        let beta = props.get("beta").unwrap();
        assert_eq!(beta.name, "beta");
        assert_eq!(beta.mag, 0.0);
        assert_eq!(beta.ra, 282.52);
    }

    #[test]
    fn test_duplicate_key_replaces_in_place() {
        let mut props = StarProperties::default();
        for (key, mag) in [("a", 1.0), ("b", 2.0), ("a", 3.0)] {
            props.insert(StarProperty {
                key: key.into(),
                ra: 0.0,
                dec: 0.0,
                mag,
                name: key.into(),
            });
        }
        let keys: Vec<_> = props.iter().map(|p| (p.key.as_str(), p.mag)).collect();
        assert_eq!(keys, vec![("a", 3.0), ("b", 2.0)]);
    }

    #[test]
    fn test_invalid_coordinate() {
        let d = parse_descriptor(
            Path::new("Ori.json"),
            r#"{ "abbr": "Ori", "stars": [ { "key": "x", "ra": "5:55", "dec": 0 } ] }"#,
        )
        .unwrap();
        let ori = Constellation::from_abbr("Ori").unwrap();
        let err = collect_properties(Path::new("Ori.json"), &d, ori).unwrap_err();
        assert!(matches!(err, BuildError::InvalidCoordinate { ref key, .. } if key == "x"));
    }

    #[test]
    fn test_resolve_unknown_constellation() {
        let err = resolve(
            vec![loaded("Xyz.json", r#"{ "abbr": "Xyz" }"#)],
            &BuildSection::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::UnknownConstellation(ref a) if a == "Xyz"));
    }

    #[test]
    fn test_resolve_duplicate_constellation() {
        let err = resolve(
            vec![
                loaded("a.json", r#"{ "abbr": "Ori" }"#),
                loaded("b.json", r#"{ "abbr": "Ori" }"#),
            ],
            &BuildSection::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateConstellation { .. }));
    }

    #[test]
    fn test_name_mismatch_warns_or_fails() {
        let descriptors = || vec![loaded("Ori.json", r#"{ "abbr": "Ori", "name": "Hunter" }"#)];
        let lenient = resolve(descriptors(), &BuildSection::default()).unwrap();
        assert_eq!(lenient[0].constellation.name, "Orion");

        let strict = BuildSection {
            strict_names: true,
            ..BuildSection::default()
        };
        let err = resolve(descriptors(), &strict).unwrap_err();
        assert!(matches!(err, BuildError::MalformedDescriptor { .. }));
    }
}
