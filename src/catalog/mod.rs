//! Static destination and eco task tables.
//!
//! The catalog is loaded once at startup, validated, and shared read-only
//! (`Arc<Catalog>`) by every session. The built-in reference data lives in
//! `reference.json` next to this file; a custom catalog with the same shape
//! can be loaded from disk.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::models::{Destination, EcoTask};

const REFERENCE: &str = include_str!("reference.json");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    pub destinations: Vec<Destination>,
    pub tasks: Vec<EcoTask>,
}

impl Catalog {
    /// Parse and validate a catalog from JSON text.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The built-in catalog: four cities and five 5-point eco rules.
    pub fn reference() -> Result<Self, CatalogError> {
        Self::from_json(REFERENCE)
    }

    /// Load a catalog file from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            "Loaded catalog from {} ({} destinations, {} tasks)",
            path.display(),
            catalog.destinations.len(),
            catalog.tasks.len()
        );
        Ok(catalog)
    }

    pub fn destination(&self, id: u32) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.id == id)
    }

    pub fn task(&self, id: u32) -> Option<&EcoTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Destinations whose name contains `text` (case-insensitive), in
    /// catalog order.
    pub fn filter_destinations(&self, text: &str) -> Vec<Destination> {
        self.destinations
            .iter()
            .filter(|d| d.matches(text))
            .cloned()
            .collect()
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.tasks.is_empty() {
            return Err(CatalogError::Invalid("catalog has no tasks".to_string()));
        }

        let mut seen = HashSet::new();
        for destination in &self.destinations {
            if !seen.insert(destination.id) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate destination id {}",
                    destination.id
                )));
            }
            if destination.name.trim().is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "destination {} has an empty name",
                    destination.id
                )));
            }
        }

        let mut seen = HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.id) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate task id {}",
                    task.id
                )));
            }
            if task.points == 0 {
                return Err(CatalogError::Invalid(format!(
                    "task {} awards no points",
                    task.id
                )));
            }
        }

        Ok(())
    }
}
