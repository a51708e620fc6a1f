//! Random fault placement: bulk results are exactly the healthy, non-empty entities.

use asset_lineage::audit::MemoryAuditSink;
use asset_lineage::config::PublisherConfig;
use asset_lineage::context::ContextBuilder;
use asset_lineage::engine::{LineagePublisher, RequestScope};
use asset_lineage::publish::{ChannelHandle, MemoryChannel};
use asset_lineage::store::InMemoryEntityStore;
use asset_lineage::types::{Entity, FindEntitiesParameters, Relationship, Vertex};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
enum Shape {
    Assigned,
    Empty,
    Rejected,
}

fn shape() -> impl Strategy<Value = Shape> {
    prop_oneof![Just(Shape::Assigned), Just(Shape::Empty), Just(Shape::Rejected)]
}

#[test]
fn test_bulk_result_is_exactly_the_published_entities() {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap();
    let mut runner = proptest::test_runner::TestRunner::new(proptest::test_runner::Config {
        cases: 64,
        ..Default::default()
    });

    runner
        .run(
            &(prop::collection::vec(shape(), 1..16), 1usize..6),
            |(shapes, max_workers)| {
                let store = InMemoryEntityStore::new();
                let channel = Arc::new(MemoryChannel::new());
                let mut expected = BTreeSet::new();

                for (i, shape) in shapes.iter().enumerate() {
                    let guid = format!("term-{:02}", i);
                    store.add_entity(Entity::new(guid.clone(), "GlossaryTerm"));
                    if !matches!(shape, Shape::Empty) {
                        store.add_relationship(Relationship::new(
                            format!("assign-{}", i),
                            "SemanticAssignment",
                            Vertex::new(format!("col-{}", i), "RelationalColumn"),
                            Vertex::new(guid.clone(), "GlossaryTerm"),
                        ));
                    }
                    match shape {
                        Shape::Assigned => {
                            expected.insert(guid);
                        }
                        Shape::Rejected => channel.reject(guid),
                        Shape::Empty => {}
                    }
                }

                let publisher = LineagePublisher::new(
                    Arc::new(store),
                    Arc::new(ContextBuilder::default()),
                    ChannelHandle::ready(channel.clone()),
                    &PublisherConfig {
                        max_workers,
                        ..PublisherConfig::default()
                    },
                );
                let scope = RequestScope::new("srv", "tester", Arc::new(MemoryAuditSink::new()));

                let result = rt
                    .block_on(publisher.publish_entities(
                        &scope,
                        "GlossaryTerm",
                        &FindEntitiesParameters::default(),
                    ))
                    .unwrap();

                prop_assert_eq!(result.into_ids(), expected.clone());
                prop_assert_eq!(channel.len(), expected.len());
                Ok(())
            },
        )
        .unwrap();
}
