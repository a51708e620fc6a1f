//! Glossary term lineage context.

use crate::context::traversal::{AppliesTo, Direction, Traversal, TraversalRule};
use crate::context::ContextStrategy;
use crate::error::BuildError;
use crate::store::EntityStore;
use crate::types::{ContextMap, Entity};
use async_trait::async_trait;

pub const SEMANTIC_ASSIGNMENT: &str = "SemanticAssignment";
pub const TERM_CATEGORIZATION: &str = "TermCategorization";
pub const SYNONYM: &str = "Synonym";

const TERM_TYPES: &[&str] = &["GlossaryTerm", "ControlledGlossaryTerm"];

/// Data elements assigned to the term, the glossary categories it is filed
/// under, and its synonym closure. Synonyms are glossary terms themselves,
/// so their assignments and categories are collected too.
const GLOSSARY_RULES: &[TraversalRule] = &[
    TraversalRule {
        relationship_type: SEMANTIC_ASSIGNMENT,
        category: SEMANTIC_ASSIGNMENT,
        direction: Direction::Incoming,
        applies_to: AppliesTo::RootAndTypes(TERM_TYPES),
        follow: false,
    },
    TraversalRule {
        relationship_type: TERM_CATEGORIZATION,
        category: TERM_CATEGORIZATION,
        direction: Direction::Incoming,
        applies_to: AppliesTo::RootAndTypes(TERM_TYPES),
        follow: false,
    },
    TraversalRule {
        relationship_type: SYNONYM,
        category: SYNONYM,
        direction: Direction::Both,
        applies_to: AppliesTo::RootAndTypes(TERM_TYPES),
        follow: true,
    },
];

pub struct GlossaryContextStrategy {
    max_depth: usize,
}

impl GlossaryContextStrategy {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

#[async_trait]
impl ContextStrategy for GlossaryContextStrategy {
    fn name(&self) -> &'static str {
        "glossary"
    }

    async fn build(
        &self,
        store: &dyn EntityStore,
        user_id: &str,
        entity: &Entity,
    ) -> Result<ContextMap, BuildError> {
        Traversal::new(store, user_id, self.max_depth)
            .run(entity, GLOSSARY_RULES)
            .await
    }
}
