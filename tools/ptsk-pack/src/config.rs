//! catalog.toml build configuration
//!
//! ```toml
//! [build]
//! bright_magnitude = 2.0
//! descriptor_extension = "json"
//! strict_names = false
//! ```
//!
//! Every key is optional. When no `--config` is given, `<src_dir>/catalog.toml` is
//! used if it exists.

use serde::Deserialize;
use std::path::Path;

use crate::error::{BuildError, Result};

/// File name looked up in the source directory when no config path is given
pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    #[serde(default)]
    pub build: BuildSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSection {
    /// Stars strictly brighter (numerically lower) than this get the BRIGHT flag.
    pub bright_magnitude: f64,

    /// Extension of descriptor files, compared case-insensitively.
    pub descriptor_extension: String,

    /// Fail instead of warn when a descriptor's `name` disagrees with the
    /// built-in constellation table.
    pub strict_names: bool,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            bright_magnitude: 2.0,
            descriptor_extension: "json".to_string(),
            strict_names: false,
        }
    }
}

impl BuildConfig {
    /// Parse a config from TOML text
    pub fn from_toml(path: &Path, text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| BuildError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        Self::from_toml(path, &text)
    }

    /// Pick the explicit config, else `<src_dir>/catalog.toml`, else defaults
    pub fn resolve(explicit: Option<&Path>, src_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!("Using config {}", path.display());
            return Self::load(path);
        }
        let implicit = src_dir.join(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            tracing::debug!("Using config {}", implicit.display());
            return Self::load(&implicit);
        }
        Ok(Self::default())
    }
}
