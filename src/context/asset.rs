//! Asset context: the structural neighbourhood of an element up to its owning asset.

use crate::context::traversal::{AppliesTo, Direction, Traversal, TraversalRule};
use crate::error::BuildError;
use crate::store::EntityStore;
use crate::types::{Entity, RelationshipsContext};
use tracing::debug;

/// Containment relationships; end1 is always the container.
pub const CONTAINMENT_TYPES: &[&str] = &[
    "NestedSchemaAttribute",
    "AttributeForSchema",
    "SchemaTypeOption",
    "AssetSchemaType",
    "DataContentForDataSet",
    "NestedFile",
    "FolderHierarchy",
];

const fn upward(relationship_type: &'static str) -> TraversalRule {
    TraversalRule {
        relationship_type,
        category: "AssetContext",
        direction: Direction::Incoming,
        applies_to: AppliesTo::Any,
        follow: true,
    }
}

const fn downward(relationship_type: &'static str) -> TraversalRule {
    TraversalRule {
        relationship_type,
        category: "AssetContext",
        direction: Direction::Outgoing,
        applies_to: AppliesTo::Root,
        follow: false,
    }
}

const ASSET_RULES: &[TraversalRule] = &[
    upward("NestedSchemaAttribute"),
    upward("AttributeForSchema"),
    upward("SchemaTypeOption"),
    upward("AssetSchemaType"),
    upward("DataContentForDataSet"),
    upward("NestedFile"),
    upward("FolderHierarchy"),
    downward("NestedSchemaAttribute"),
    downward("AttributeForSchema"),
    downward("SchemaTypeOption"),
    downward("AssetSchemaType"),
    downward("DataContentForDataSet"),
    downward("NestedFile"),
    downward("FolderHierarchy"),
];

/// Walks every containment chain above the element and the direct children below it.
pub struct AssetContextStrategy {
    max_depth: usize,
}

impl AssetContextStrategy {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub async fn build(
        &self,
        store: &dyn EntityStore,
        user_id: &str,
        entity: &Entity,
    ) -> Result<RelationshipsContext, BuildError> {
        let map = Traversal::new(store, user_id, self.max_depth)
            .run(entity, ASSET_RULES)
            .await?;
        let context = map.merged();
        debug!(
            guid = %entity.guid,
            type_name = %entity.type_name,
            edges = context.len(),
            "Built asset context"
        );
        Ok(context)
    }
}
