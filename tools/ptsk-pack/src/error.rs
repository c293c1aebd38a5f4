//! Build error kinds
//!
//! Every error aborts the whole build; nothing is retried and no partial catalog is
//! written.

use std::path::PathBuf;

use ptsk_common::StarId;

use crate::coords::CoordinateError;

/// Error type for catalog builds.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Malformed descriptor {}: {reason}", .path.display())]
    MalformedDescriptor { path: PathBuf, reason: String },

    #[error("Invalid coordinate for star '{key}' in {constellation}: {source}")]
    InvalidCoordinate {
        constellation: String,
        key: String,
        #[source]
        source: CoordinateError,
    },

    #[error("Unresolved star key '{key}' in {constellation} (referenced by {referrer})")]
    UnresolvedStarKey {
        constellation: String,
        key: String,
        referrer: String,
    },

    #[error("Unknown constellation abbreviation '{0}'")]
    UnknownConstellation(String),

    #[error("Constellation {abbr} is declared by both {} and {}", .first.display(), .second.display())]
    DuplicateConstellation {
        abbr: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error(
        "Star id out of range in {constellation}: pp={pp}, ss={ss} (both must be within 0..={max})",
        max = StarId::MAX_COMPONENT
    )]
    StarIdOutOfRange {
        constellation: String,
        pp: i64,
        ss: i64,
    },

    #[error("Star '{key}' in {constellation} would reuse star id {id}")]
    DuplicateStarId {
        constellation: String,
        key: String,
        id: StarId,
    },

    #[error("Internal invariant violated in section {section}: {reason}")]
    InternalInvariantViolation { section: String, reason: String },

    #[error("Invalid config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        BuildError::MalformedDescriptor {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = BuildError> = std::result::Result<T, E>;
