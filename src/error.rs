//! Error types for the session engine and catalog loading.

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use thiserror::Error;

/// Which catalog an unknown id was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Destination,
    Task,
}

impl Display for CatalogKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Destination => write!(f, "destination"),
            Self::Task => write!(f, "task"),
        }
    }
}

/// Rejected session action. The snapshot is left untouched.
///
/// Callers that only pass ids taken from the catalog never see `NotFound`;
/// it exists to validate input at the HTTP and terminal boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{kind} {id} not found")]
    NotFound { kind: CatalogKind, id: u32 },
    #[error("no destination selected")]
    NoDestinationSelected,
    #[error("points total would overflow")]
    PointsOverflow,
}

/// Failure to load or validate a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid catalog: {0}")]
    Invalid(String),
}
