//! Integration tests for asset context publication

use super::support::{FaultyStore, Harness};
use asset_lineage::audit::AuditEvent;
use asset_lineage::error::LineageError;
use asset_lineage::publish::{LineageEvent, MemoryChannel};
use asset_lineage::store::InMemoryEntityStore;
use asset_lineage::types::{Entity, Relationship, Vertex};
use std::sync::Arc;

fn vertex(guid: &str, type_name: &str) -> Vertex {
    Vertex::new(guid, type_name)
}

/// A owns B and C directly; B also owns C.
fn triangle() -> InMemoryEntityStore {
    let store = InMemoryEntityStore::new();
    store.add_entity(Entity::new("A", "RelationalTable"));
    store.add_entity(Entity::new("B", "RelationalColumn"));
    store.add_entity(Entity::new("C", "RelationalColumn"));
    store.add_relationship(Relationship::new(
        "ab",
        "NestedSchemaAttribute",
        vertex("A", "RelationalTable"),
        vertex("B", "RelationalColumn"),
    ));
    store.add_relationship(Relationship::new(
        "bc",
        "NestedSchemaAttribute",
        vertex("B", "RelationalColumn"),
        vertex("C", "RelationalColumn"),
    ));
    store.add_relationship(Relationship::new(
        "ac",
        "AttributeForSchema",
        vertex("A", "RelationalTable"),
        vertex("C", "RelationalColumn"),
    ));
    store
}

#[tokio::test]
async fn touched_vertices_are_reported_once_each() {
    let harness = Harness::new(Arc::new(triangle()), MemoryChannel::new(), 1);

    let result = harness
        .publisher
        .publish_asset_context(&harness.scope(), "RelationalColumn", "C")
        .await
        .unwrap();

    assert_eq!(result.ids().collect::<Vec<_>>(), vec!["A", "B", "C"]);

    let events = harness.channel.events();
    assert_eq!(events.len(), 1);
    let LineageEvent::AssetContext { context, entity, .. } = &events[0] else {
        panic!("expected an asset context event");
    };
    assert_eq!(entity.guid, "C");
    assert_eq!(context.len(), 3);
    assert!(harness.audit.events().iter().any(|e| matches!(
        e,
        AuditEvent::AssetContextPublished { vertex_count: 3, .. }
    )));
}

#[tokio::test]
async fn empty_asset_context_is_still_published() {
    let store = InMemoryEntityStore::new();
    store.add_entity(Entity::new("orphan", "DataFile"));
    let harness = Harness::new(Arc::new(store), MemoryChannel::new(), 1);

    let result = harness
        .publisher
        .publish_asset_context(&harness.scope(), "DataFile", "orphan")
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(harness.channel.published_guids(), vec!["orphan"]);
}

#[tokio::test]
async fn asset_context_includes_direct_children() {
    let harness = Harness::new(Arc::new(triangle()), MemoryChannel::new(), 1);

    let result = harness
        .publisher
        .publish_asset_context(&harness.scope(), "RelationalTable", "A")
        .await
        .unwrap();

    // A's own children only; the B->C edge is one hop too far down
    assert_eq!(result.ids().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    let LineageEvent::AssetContext { context, .. } = &harness.channel.events()[0] else {
        panic!("expected an asset context event");
    };
    assert_eq!(context.len(), 2);
}

#[tokio::test]
async fn missing_entity_returns_empty_result() {
    let harness = Harness::new(Arc::new(triangle()), MemoryChannel::new(), 1);
    let result = harness
        .publisher
        .publish_asset_context(&harness.scope(), "RelationalColumn", "Z")
        .await
        .unwrap();
    assert!(result.is_empty());
    assert!(harness.channel.is_empty());
}

#[tokio::test]
async fn build_and_publish_failures_surface_to_the_caller() {
    let store = FaultyStore::new(triangle());
    store.fail_on("C");
    let harness = Harness::new(Arc::new(store), MemoryChannel::new(), 1);
    let err = harness
        .publisher
        .publish_asset_context(&harness.scope(), "RelationalColumn", "C")
        .await
        .unwrap_err();
    assert!(matches!(err, LineageError::ContextBuild(_)));

    let channel = MemoryChannel::new();
    channel.reject("C");
    let harness = Harness::new(Arc::new(triangle()), channel, 1);
    let err = harness
        .publisher
        .publish_asset_context(&harness.scope(), "RelationalColumn", "C")
        .await
        .unwrap_err();
    assert!(matches!(err, LineageError::Publish(_)));
}
