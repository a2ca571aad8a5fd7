use serde::{Deserialize, Serialize};

/// A tourist city shown in the destination grid.
///
/// Destinations are **static**: they come from the catalog loaded at startup
/// and are never created, mutated or deleted while the process runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Destination {
    pub id: u32,
    pub name: String,
    /// URI of the cover image. Loading and caching are left to the
    /// presentation layer.
    pub image_ref: String,
    /// Short tagline, e.g. the landmark the city is known for.
    pub description: String,
}

impl Destination {
    /// Case-insensitive substring match of `needle` against the name.
    ///
    /// An empty needle matches every destination.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}
