//! Process lineage context: ports, port delegation, and the flows around a process.

use crate::context::traversal::{AppliesTo, Direction, Traversal, TraversalRule};
use crate::context::ContextStrategy;
use crate::error::BuildError;
use crate::store::EntityStore;
use crate::types::{ContextMap, Entity};
use async_trait::async_trait;

pub const PROCESS_PORT: &str = "ProcessPort";
pub const PORT_DELEGATION: &str = "PortDelegation";
pub const PORT_SCHEMA: &str = "PortSchema";
pub const DATA_FLOW: &str = "DataFlow";
pub const CONTROL_FLOW: &str = "ControlFlow";
pub const PROCESS_CALL: &str = "ProcessCall";

const PORT_TYPES: &[&str] = &["Port", "PortAlias", "PortImplementation"];

const PROCESS_RULES: &[TraversalRule] = &[
    TraversalRule {
        relationship_type: PROCESS_PORT,
        category: PROCESS_PORT,
        direction: Direction::Outgoing,
        applies_to: AppliesTo::Root,
        follow: true,
    },
    TraversalRule {
        relationship_type: DATA_FLOW,
        category: DATA_FLOW,
        direction: Direction::Both,
        applies_to: AppliesTo::Root,
        follow: false,
    },
    TraversalRule {
        relationship_type: CONTROL_FLOW,
        category: CONTROL_FLOW,
        direction: Direction::Both,
        applies_to: AppliesTo::Root,
        follow: false,
    },
    TraversalRule {
        relationship_type: PROCESS_CALL,
        category: PROCESS_CALL,
        direction: Direction::Both,
        applies_to: AppliesTo::Root,
        follow: false,
    },
    // Delegation chains between aliases and implementations may loop.
    TraversalRule {
        relationship_type: PORT_DELEGATION,
        category: PORT_DELEGATION,
        direction: Direction::Both,
        applies_to: AppliesTo::Types(PORT_TYPES),
        follow: true,
    },
    TraversalRule {
        relationship_type: PORT_SCHEMA,
        category: PORT_SCHEMA,
        direction: Direction::Outgoing,
        applies_to: AppliesTo::Types(PORT_TYPES),
        follow: false,
    },
];

pub struct ProcessContextStrategy {
    max_depth: usize,
}

impl ProcessContextStrategy {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

#[async_trait]
impl ContextStrategy for ProcessContextStrategy {
    fn name(&self) -> &'static str {
        "process"
    }

    async fn build(
        &self,
        store: &dyn EntityStore,
        user_id: &str,
        entity: &Entity,
    ) -> Result<ContextMap, BuildError> {
        Traversal::new(store, user_id, self.max_depth)
            .run(entity, PROCESS_RULES)
            .await
    }
}
