//! Constellation descriptor files
//!
//! One JSON file per constellation:
//!
//! ```json
//! {
//!   "abbr": "Ori",
//!   "name": "Orion",
//!   "stars": [
//!     { "key": "alpha", "ra": "05:55:10.3", "dec": "+07:24:25", "mag": 0.5, "name": "Betelgeuse" }
//!   ],
//!   "skeleton": [ { "pp": 1, "nodes": ["alpha", "gamma"] } ],
//!   "asterisms": [ { "name": "Belt", "label": "epsilon", "polylines": [["delta", "epsilon", "zeta"]] } ],
//!   "art_overlays": [ { "key": "orion_hunter", "anchorA": "alpha", "anchorB": "rigel" } ]
//! }
//! ```
//!
//! Descriptors are loaded in file-name order so repeated builds see the same input order.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{BuildError, Result};

/// A JSON value that may be written either as a number or as a string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    Number(f64),
    Text(String),
}

impl NumericValue {
    /// Plain decimal interpretation (no sexagesimal forms)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumericValue::Number(n) => Some(*n),
            NumericValue::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Top-level descriptor for one constellation
#[derive(Debug, Clone, Deserialize)]
pub struct ConstellationDescriptor {
    pub abbr: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stars: Vec<StarEntry>,
    #[serde(default)]
    pub skeleton: Vec<SkeletonGroup>,
    #[serde(default)]
    pub asterisms: Vec<AsterismEntry>,
    #[serde(default)]
    pub art_overlays: Vec<ArtOverlayEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StarEntry {
    pub key: String,
    pub ra: NumericValue,
    pub dec: NumericValue,
    /// Defaults to 0.0 when absent
    #[serde(default)]
    pub mag: Option<NumericValue>,
    /// Display name; defaults to the key
    #[serde(default)]
    pub name: Option<String>,
}

/// One skeleton line path
#[derive(Debug, Clone, Deserialize)]
pub struct SkeletonGroup {
    /// Group number (`pp` in the star id)
    pub pp: NumericValue,
    #[serde(default)]
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AsterismEntry {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub polylines: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtOverlayEntry {
    pub key: String,
    #[serde(rename = "anchorA")]
    pub anchor_a: String,
    #[serde(rename = "anchorB")]
    pub anchor_b: String,
}

/// A descriptor together with the file it came from
#[derive(Debug, Clone)]
pub struct LoadedDescriptor {
    pub path: PathBuf,
    pub descriptor: ConstellationDescriptor,
}

/// Parse one descriptor from JSON text
pub fn parse_descriptor(path: &Path, text: &str) -> Result<ConstellationDescriptor> {
    serde_json::from_str(text).map_err(|e| BuildError::malformed(path, e.to_string()))
}

/// Load one descriptor file
pub fn load_descriptor(path: &Path) -> Result<LoadedDescriptor> {
    let text = std::fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
    let descriptor = parse_descriptor(path, &text)?;
    tracing::debug!(
        "Loaded {} ({}): {} stars, {} skeleton groups, {} asterisms, {} overlays",
        path.display(),
        descriptor.abbr,
        descriptor.stars.len(),
        descriptor.skeleton.len(),
        descriptor.asterisms.len(),
        descriptor.art_overlays.len()
    );
    Ok(LoadedDescriptor {
        path: path.to_path_buf(),
        descriptor,
    })
}

/// List descriptor files directly inside `dir`, sorted by file name
pub fn descriptor_paths(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| BuildError::io(dir, e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// Load every descriptor in `dir`, in file-name order
pub fn load_descriptors(dir: &Path, extension: &str) -> Result<Vec<LoadedDescriptor>> {
    let paths = descriptor_paths(dir, extension)?;
    tracing::info!(
        "Found {} descriptor(s) in {}",
        paths.len(),
        dir.display()
    );
    paths.iter().map(|p| load_descriptor(p)).collect()
}
