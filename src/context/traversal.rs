//! Rule-driven relationship traversal shared by the context strategies.
//!
//! A traversal expands vertices breadth-first from a root entity. Each rule
//! names a relationship type, the category its edges are filed under, the
//! direction to walk, which vertices it applies to, and whether the far end
//! is expanded in turn. A vertex is expanded at most once per build and each
//! store relationship is recorded at most once, so cyclic graphs terminate.

use crate::error::BuildError;
use crate::store::EntityStore;
use crate::types::{ContextMap, Entity, Relationship, RelationshipsContext, Vertex};
use std::collections::{BTreeMap, HashSet, VecDeque};
use tracing::trace;

/// Default bound on how many hops a traversal may follow from its root.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Which end of a relationship the expanded vertex must occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Vertex is end1; walk to end2.
    Outgoing,
    /// Vertex is end2; walk to end1.
    Incoming,
    Both,
}

/// Vertices a rule is evaluated on.
#[derive(Debug, Clone, Copy)]
pub enum AppliesTo {
    Root,
    Types(&'static [&'static str]),
    RootAndTypes(&'static [&'static str]),
    Any,
}

#[derive(Debug, Clone, Copy)]
pub struct TraversalRule {
    pub relationship_type: &'static str,
    pub category: &'static str,
    pub direction: Direction,
    pub applies_to: AppliesTo,
    pub follow: bool,
}

impl TraversalRule {
    fn applies(&self, vertex: &Vertex, is_root: bool) -> bool {
        let type_name = vertex.type_name.as_str();
        match self.applies_to {
            AppliesTo::Root => is_root,
            AppliesTo::Types(types) => types.contains(&type_name),
            AppliesTo::RootAndTypes(types) => is_root || types.contains(&type_name),
            AppliesTo::Any => true,
        }
    }

    fn neighbour<'r>(&self, relationship: &'r Relationship, guid: &str) -> Option<&'r Vertex> {
        match self.direction {
            Direction::Outgoing if relationship.end1.guid == guid => Some(&relationship.end2),
            Direction::Incoming if relationship.end2.guid == guid => Some(&relationship.end1),
            Direction::Both => relationship.other_end(guid),
            _ => None,
        }
    }
}

pub struct Traversal<'a> {
    store: &'a dyn EntityStore,
    user_id: &'a str,
    max_depth: usize,
}

impl<'a> Traversal<'a> {
    pub fn new(store: &'a dyn EntityStore, user_id: &'a str, max_depth: usize) -> Self {
        Self {
            store,
            user_id,
            max_depth,
        }
    }

    /// Walk the graph from `root` and file every edge found under its rule's category.
    ///
    /// Each expanded vertex contributes at most one context per category.
    pub async fn run(
        &self,
        root: &Entity,
        rules: &[TraversalRule],
    ) -> Result<ContextMap, BuildError> {
        let mut contexts = ContextMap::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut recorded: HashSet<String> = HashSet::new();
        let mut pending: VecDeque<(Vertex, usize)> = VecDeque::new();

        let root_vertex = root.vertex();
        visited.insert(root_vertex.guid.clone());
        pending.push_back((root_vertex, 0));

        while let Some((vertex, depth)) = pending.pop_front() {
            let mut local: BTreeMap<&'static str, RelationshipsContext> = BTreeMap::new();

            for rule in rules.iter().filter(|r| r.applies(&vertex, depth == 0)) {
                let related = self
                    .store
                    .relationships(self.user_id, &vertex.guid, rule.relationship_type)
                    .await?;

                for relationship in &related {
                    let Some(neighbour) = rule.neighbour(relationship, &vertex.guid) else {
                        continue;
                    };
                    if !recorded.insert(relationship.guid.clone()) {
                        continue;
                    }
                    local
                        .entry(rule.category)
                        .or_default()
                        .add(relationship.to_edge());

                    if rule.follow
                        && depth < self.max_depth
                        && visited.insert(neighbour.guid.clone())
                    {
                        pending.push_back((neighbour.clone(), depth + 1));
                    }
                }
            }

            trace!(
                guid = %vertex.guid,
                depth,
                categories = local.len(),
                "Expanded vertex"
            );
            for (category, context) in local {
                contexts.put(category, context);
            }
        }

        Ok(contexts)
    }
}
