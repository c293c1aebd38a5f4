//! Shared types for the PTSKCAT4 star catalog
//!
//! This crate holds everything both sides of the catalog agree on:
//! - `ptsk-pack` (descriptor directory -> catalog blob)
//! - runtime readers (catalog blob -> typed views)
//!
//! # Modules
//!
//! - [`constellations`] - The fixed 88-entry IAU constellation table
//! - [`ids`] - Star identifiers and star flag bits
//! - [`formats`] - Header, section directory and fixed-size record layouts
//! - [`reader`] - Parser that turns a catalog blob back into typed records

pub mod constellations;
pub mod formats;
pub mod ids;
pub mod reader;

pub use constellations::{CONSTELLATIONS, CONSTELLATION_COUNT, Constellation, constellation_index};
pub use formats::{
    ArtOverlayRecord, AsterismRecord, BinaryRecord, CatalogFormat, CatalogHeader,
    ConstellationRecord, NodeRecord, PTSK_CATALOG_FORMAT, PolylineRecord, SectionEntry,
    SectionKind, StarRecord, decode_records, encode_records,
};
pub use ids::{StarFlags, StarId};
pub use reader::{Catalog, CatalogReadError, CatalogReader};
