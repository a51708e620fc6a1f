//! Core data model: entities, vertices, edges, and the context containers built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

/// Immutable snapshot of a cataloged metadata element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub guid: String,
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
}

impl Entity {
    pub fn new(guid: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            type_name: type_name.into(),
            updated_at: None,
            classifications: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn updated_at(mut self, ts: DateTime<Utc>) -> Self {
        self.updated_at = Some(ts);
        self
    }

    pub fn classified(mut self, classification: impl Into<String>) -> Self {
        self.classifications.push(classification.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Vertex reference to this entity.
    pub fn vertex(&self) -> Vertex {
        Vertex::new(self.guid.clone(), self.type_name.clone())
    }
}

/// Reference to an entity used as an edge endpoint.
///
/// Identity is the guid: two vertices with the same guid are equal whatever
/// type name they carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    pub guid: String,
    pub type_name: String,
}

impl Vertex {
    pub fn new(guid: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            type_name: type_name.into(),
        }
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.guid == other.guid
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.guid.hash(state);
    }
}

impl Ord for Vertex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.guid.cmp(&other.guid)
    }
}

impl PartialOrd for Vertex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Directed edge between two vertices inside a context graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DirectedEdge {
    pub from_vertex: Vertex,
    pub to_vertex: Vertex,
    pub relationship_type: String,
}

impl DirectedEdge {
    pub fn new(from: Vertex, to: Vertex, relationship_type: impl Into<String>) -> Self {
        Self {
            from_vertex: from,
            to_vertex: to,
            relationship_type: relationship_type.into(),
        }
    }
}

/// Relationship record as held by the metadata store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub guid: String,
    pub type_name: String,
    pub end1: Vertex,
    pub end2: Vertex,
}

impl Relationship {
    pub fn new(
        guid: impl Into<String>,
        type_name: impl Into<String>,
        end1: Vertex,
        end2: Vertex,
    ) -> Self {
        Self {
            guid: guid.into(),
            type_name: type_name.into(),
            end1,
            end2,
        }
    }

    /// The end opposite to `guid`, or `None` when `guid` is on neither end.
    pub fn other_end(&self, guid: &str) -> Option<&Vertex> {
        if self.end1.guid == guid {
            Some(&self.end2)
        } else if self.end2.guid == guid {
            Some(&self.end1)
        } else {
            None
        }
    }

    /// Edge keeping the store orientation (end1 -> end2).
    pub fn to_edge(&self) -> DirectedEdge {
        DirectedEdge::new(self.end1.clone(), self.end2.clone(), self.type_name.clone())
    }
}

/// A set of directed edges relevant to one entity's lineage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipsContext {
    relationships: BTreeSet<DirectedEdge>,
}

impl RelationshipsContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge; returns false when it was already present.
    pub fn add(&mut self, edge: DirectedEdge) -> bool {
        self.relationships.insert(edge)
    }

    pub fn relationships(&self) -> impl Iterator<Item = &DirectedEdge> {
        self.relationships.iter()
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    /// Deduplicated guids of both endpoints of every edge.
    pub fn vertex_guids(&self) -> BTreeSet<String> {
        let mut guids = BTreeSet::new();
        for edge in &self.relationships {
            guids.insert(edge.from_vertex.guid.clone());
            guids.insert(edge.to_vertex.guid.clone());
        }
        guids
    }
}

impl FromIterator<DirectedEdge> for RelationshipsContext {
    fn from_iter<I: IntoIterator<Item = DirectedEdge>>(iter: I) -> Self {
        Self {
            relationships: iter.into_iter().collect(),
        }
    }
}

/// Multimap from relationship category to the contexts built for it.
///
/// Empty contexts are never stored, so the map is empty exactly when every
/// category holds nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextMap {
    categories: BTreeMap<String, Vec<RelationshipsContext>>,
}

impl ContextMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a context under `category`. Empty contexts are dropped.
    pub fn put(&mut self, category: impl Into<String>, context: RelationshipsContext) {
        if context.is_empty() {
            return;
        }
        self.categories
            .entry(category.into())
            .or_default()
            .push(context);
    }

    pub fn get(&self, category: &str) -> &[RelationshipsContext] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Total number of contexts across all categories.
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.values().all(Vec::is_empty)
    }

    /// Deduplicated guids of every vertex touched by any context.
    pub fn vertex_guids(&self) -> BTreeSet<String> {
        self.categories
            .values()
            .flatten()
            .flat_map(RelationshipsContext::vertex_guids)
            .collect()
    }

    /// All edges of every category folded into one context.
    pub fn merged(&self) -> RelationshipsContext {
        self.categories
            .values()
            .flatten()
            .flat_map(|ctx| ctx.relationships().cloned())
            .collect()
    }
}

/// Filter applied when scanning the store for entities of a type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindEntitiesParameters {
    /// Only entities updated strictly after this instant.
    #[serde(default)]
    pub updated_after: Option<DateTime<Utc>>,
    /// When non-empty, only entities carrying at least one of these classifications.
    #[serde(default)]
    pub limit_by_classifications: Vec<String>,
}

impl FindEntitiesParameters {
    pub fn updated_after(ts: DateTime<Utc>) -> Self {
        Self {
            updated_after: Some(ts),
            ..Self::default()
        }
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        if let Some(after) = self.updated_after {
            match entity.updated_at {
                Some(updated) if updated > after => {}
                _ => return false,
            }
        }
        if !self.limit_by_classifications.is_empty()
            && !entity
                .classifications
                .iter()
                .any(|c| self.limit_by_classifications.contains(c))
        {
            return false;
        }
        true
    }
}

/// Deduplicated identifiers produced by a publication operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationResult {
    succeeded_ids: BTreeSet<String>,
}

impl PublicationResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.succeeded_ids.iter().map(String::as_str)
    }

    pub fn contains(&self, guid: &str) -> bool {
        self.succeeded_ids.contains(guid)
    }

    pub fn len(&self) -> usize {
        self.succeeded_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.succeeded_ids.is_empty()
    }

    pub fn into_ids(self) -> BTreeSet<String> {
        self.succeeded_ids
    }
}

impl FromIterator<String> for PublicationResult {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            succeeded_ids: iter.into_iter().collect(),
        }
    }
}
