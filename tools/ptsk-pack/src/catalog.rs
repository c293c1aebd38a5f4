//! Catalog build pipeline
//!
//! descriptors → model → STAR → ASTR/APLY/ASTN/ART0 → STR0/CST0 → pack → write.
//! The whole blob is assembled in memory; a failure at any stage leaves no output.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ptsk_common::{Constellation, ConstellationRecord, PTSK_CATALOG_FORMAT};

use crate::asterisms::build_asterisms;
use crate::config::BuildConfig;
use crate::descriptor::{LoadedDescriptor, load_descriptors};
use crate::error::{BuildError, Result};
use crate::model::resolve;
use crate::packer::{Section, pack_sections};
use crate::stars::build_stars;
use crate::string_pool::StringPool;

/// Element counts of a built catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub descriptors: usize,
    pub strings: u32,
    pub constellations: usize,
    pub stars: usize,
    pub asterisms: usize,
    pub polylines: usize,
    pub nodes: usize,
    pub overlays: usize,
    pub total_bytes: usize,
}

/// A packed catalog held in memory
#[derive(Debug, Clone)]
pub struct BuiltCatalog {
    pub bytes: Vec<u8>,
    pub stats: CatalogStats,
}

/// Build a catalog from descriptors already loaded in file-name order.
pub fn build_catalog(
    descriptors: Vec<LoadedDescriptor>,
    config: &BuildConfig,
) -> Result<BuiltCatalog> {
    let descriptor_count = descriptors.len();
    if descriptor_count == 0 {
        tracing::warn!("No descriptors; the catalog will only contain the constellation table");
    }
    let data = resolve(descriptors, &config.build)?;

    let mut pool = StringPool::new();
    let constellations: Vec<ConstellationRecord> = Constellation::all()
        .map(|c| {
            let abbr_str = pool.intern(c.abbr);
            let name_str = pool.intern(c.name);
            ConstellationRecord::new(abbr_str, name_str)
        })
        .collect();

    let stars = build_stars(&data, &mut pool, config.build.bright_magnitude)?;
    let tables = build_asterisms(&data, &stars, &mut pool)?;
    tracing::debug!("String pool: {} strings, {} bytes", pool.len(), pool.byte_len());
    let strings = pool.finish();

    let stats = CatalogStats {
        descriptors: descriptor_count,
        strings: strings.count,
        constellations: constellations.len(),
        stars: stars.records.len(),
        asterisms: tables.asterisms.len(),
        polylines: tables.polylines.len(),
        nodes: tables.nodes.len(),
        overlays: tables.overlays.len(),
        total_bytes: 0,
    };

    let sections = [
        Section::strings(strings),
        Section::from_records(&constellations)?,
        Section::from_records(&stars.records)?,
        Section::from_records(&tables.asterisms)?,
        Section::from_records(&tables.polylines)?,
        Section::from_records(&tables.nodes)?,
        Section::from_records(&tables.overlays)?,
    ];
    let bytes = pack_sections(&sections)?;

    Ok(BuiltCatalog {
        stats: CatalogStats {
            total_bytes: bytes.len(),
            ..stats
        },
        bytes,
    })
}

/// Load every descriptor in `src_dir` and build the catalog.
pub fn build_from_dir(src_dir: &Path, config: &BuildConfig) -> Result<BuiltCatalog> {
    let descriptors = load_descriptors(src_dir, &config.build.descriptor_extension)?;
    build_catalog(descriptors, config)
}

/// Whether `path` carries the conventional catalog extension
pub fn has_catalog_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PTSK_CATALOG_FORMAT.extension))
}

fn tmp_path_for(path: &Path) -> Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        BuildError::io(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "output path has no file name",
            ),
        )
    })?;
    let mut tmp_name = OsString::from(name);
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

/// Write `bytes` to `path` through a temporary sibling file and a rename, so a
/// failed write never leaves a truncated catalog at `path`. The temporary file is
/// removed again on failure.
pub fn write_catalog(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }

    let tmp_path = tmp_path_for(path)?;
    let result = write_tmp(&tmp_path, bytes).and_then(|()| replace(&tmp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
        return result;
    }
    tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn write_tmp(tmp_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut f = fs::File::create(tmp_path).map_err(|e| BuildError::io(tmp_path, e))?;
    f.write_all(bytes)
        .and_then(|()| f.sync_all())
        .map_err(|e| BuildError::io(tmp_path, e))
}

fn replace(tmp_path: &Path, path: &Path) -> Result<()> {
    #[cfg(windows)]
    {
        if path.exists() {
            // Windows rename fails if destination exists.
            fs::remove_file(path).map_err(|e| BuildError::io(path, e))?;
        }
    }

    fs::rename(tmp_path, path).map_err(|e| BuildError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::parse_descriptor;
    use ptsk_common::{CatalogReader, SectionKind};
    use tempfile::tempdir;

    fn loaded(name: &str, json: &str) -> LoadedDescriptor {
        let path = PathBuf::from(name);
        LoadedDescriptor {
            descriptor: parse_descriptor(&path, json).unwrap(),
            path,
        }
    }

    const LYRA: &str = r#"{
        "abbr": "Lyr",
        "name": "Lyra",
        "stars": [
            { "key": "alpha", "ra": "18:36:56.3", "dec": "+38:47:01", "mag": 0.03, "name": "Vega" },
            { "key": "beta", "ra": 282.52, "dec": 33.36, "mag": 3.52, "name": "Sheliak" },
            { "key": "gamma", "ra": 284.74, "dec": 32.69, "mag": 3.25, "name": "Sulafat" }
        ],
        "skeleton": [ { "pp": 1, "nodes": ["alpha", "beta", "gamma"] } ],
        "asterisms": [ { "name": "Harp", "label": "alpha", "polylines": [["beta", "gamma"]] } ],
        "art_overlays": [ { "key": "lyra_harp", "anchorA": "alpha", "anchorB": "gamma" } ]
    }"#;

    #[test]
    fn test_build_catalog_sections_and_stats() {
        let built = build_catalog(vec![loaded("Lyr.json", LYRA)], &BuildConfig::default()).unwrap();
        assert_eq!(built.stats.constellations, 88);
        assert_eq!(built.stats.stars, 3);
        assert_eq!(built.stats.asterisms, 1);
        assert_eq!(built.stats.polylines, 1);
        assert_eq!(built.stats.nodes, 2);
        assert_eq!(built.stats.overlays, 1);
        assert_eq!(built.stats.total_bytes, built.bytes.len());
        // 174 distinct constellation strings ("Ara" and "Leo" are both abbr and name)
        // + 3 star names + asterism + overlay key
        assert_eq!(built.stats.strings, 174 + 3 + 1 + 1);

        let catalog = CatalogReader::parse(&built.bytes).unwrap();
        let tags: Vec<_> = catalog.directory.iter().map(|e| e.tag_str()).collect();
        assert_eq!(tags, ["STR0", "CST0", "STAR", "ASTR", "APLY", "ASTN", "ART0"]);
        assert_eq!(catalog.section(SectionKind::Strings).unwrap().offset, 16 + 7 * 16);
    }

    #[test]
    fn test_constellation_strings_come_first() {
        let built = build_catalog(vec![], &BuildConfig::default()).unwrap();
        let catalog = CatalogReader::parse(&built.bytes).unwrap();
        assert_eq!(catalog.constellations[0].abbr_str, 0);
        assert_eq!(catalog.constellations[0].name_str, 4);
        assert_eq!(catalog.string(catalog.constellations[59].name_str).unwrap(), "Orion");
        assert!(catalog.stars.is_empty());
        assert_eq!(catalog.string_count(), 174);
        assert_eq!(catalog.constellations[5].abbr_str, catalog.constellations[5].name_str);
    }

    #[test]
    fn test_build_is_deterministic() {
        let first = build_catalog(vec![loaded("Lyr.json", LYRA)], &BuildConfig::default()).unwrap();
        let second =
            build_catalog(vec![loaded("Lyr.json", LYRA)], &BuildConfig::default()).unwrap();
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn test_write_catalog_creates_parent_and_replaces() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested").join("catalog.bin");
        write_catalog(&out, b"first").unwrap();
        write_catalog(&out, b"second").unwrap();
        assert_eq!(fs::read(&out).unwrap(), b"second");
        assert!(!dir.path().join("nested").join("catalog.bin.tmp").exists());
    }

    #[test]
    fn test_catalog_extension() {
        assert!(has_catalog_extension(Path::new("out/stars.bin")));
        assert!(has_catalog_extension(Path::new("STARS.BIN")));
        assert!(!has_catalog_extension(Path::new("stars.json")));
        assert!(!has_catalog_extension(Path::new("stars")));
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let dir = tempdir().unwrap();
        // A directory in the way makes the final rename fail
        let out = dir.path().join("catalog.bin");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("keep"), b"x").unwrap();

        let err = write_catalog(&out, b"payload").unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
        assert!(!dir.path().join("catalog.bin.tmp").exists());
        assert!(out.join("keep").exists());
    }

    #[test]
    fn test_unresolved_key_aborts_build() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Ori.json"),
            r#"{ "abbr": "Ori", "skeleton": [ { "pp": 1, "nodes": ["ghost"] } ] }"#,
        )
        .unwrap();
        let err = build_from_dir(dir.path(), &BuildConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::UnresolvedStarKey { .. }));
    }
}
