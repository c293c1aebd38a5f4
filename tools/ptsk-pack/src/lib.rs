//! ptsk-pack library
//!
//! Builds PTSKCAT4 star catalogs from per-constellation descriptor files. The binary
//! is a thin CLI over [`build_from_dir`] and [`write_catalog`].

pub mod asterisms;
pub mod catalog;
pub mod config;
pub mod coords;
pub mod descriptor;
pub mod error;
pub mod model;
pub mod packer;
pub mod stars;
pub mod string_pool;

pub use catalog::{
    BuiltCatalog, CatalogStats, build_catalog, build_from_dir, has_catalog_extension,
    write_catalog,
};
pub use config::{BuildConfig, BuildSection};
pub use error::{BuildError, Result};
pub use stars::make_id;
pub use string_pool::StringPool;

// Re-export the wire format so callers can inspect what they built
pub use ptsk_common::{Catalog, CatalogReader, PTSK_CATALOG_FORMAT, StarFlags, StarId};
