use std::{fmt, time::Duration};

use thiserror::Error;

/// The three input sources joined at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Geometry,
    Attributes,
    Population,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Geometry => "geometry",
            SourceKind::Attributes => "attributes",
            SourceKind::Population => "population",
        })
    }
}

/// Errors that abort the pipeline. Join misses, missing values and degenerate
/// scales are not errors; they resolve to "no data" or zero-sized output.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to load {source_kind} source: {reason:#}")]
    LoadFailure { source_kind: SourceKind, reason: anyhow::Error },

    #[error("timed out after {0:?} waiting for data sources")]
    LoadTimeout(Duration),

    #[error("invalid configuration: {0:#}")]
    Config(anyhow::Error),

    #[error("failed to render: {0:#}")]
    Render(anyhow::Error),
}

impl AtlasError {
    pub(crate) fn load(source_kind: SourceKind, reason: anyhow::Error) -> Self {
        AtlasError::LoadFailure { source_kind, reason }
    }
}

pub type AtlasResult<T> = std::result::Result<T, AtlasError>;
