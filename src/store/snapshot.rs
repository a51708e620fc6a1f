//! JSON snapshot format for seeding an in-memory store.

use crate::error::StoreError;
use crate::types::{Entity, Relationship};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Serialized form of a metadata graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    /// subtype -> supertype
    #[serde(default)]
    pub subtypes: BTreeMap<String, String>,
}

impl StoreSnapshot {
    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        serde_json::from_str(raw)
            .map_err(|e| StoreError::InvalidInput(format!("Malformed store snapshot: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Unavailable(format!(
                "Failed to read store snapshot {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&raw)
    }
}
