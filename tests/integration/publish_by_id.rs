//! Integration tests for single-entity publication

use super::support::{add_assigned_term, FaultyStore, Harness};
use asset_lineage::audit::AuditEvent;
use asset_lineage::error::LineageError;
use asset_lineage::publish::{LineageEvent, MemoryChannel};
use asset_lineage::store::InMemoryEntityStore;
use asset_lineage::types::{Entity, Relationship, Vertex};
use std::sync::Arc;

fn process_store() -> InMemoryEntityStore {
    let store = InMemoryEntityStore::new();
    store.add_entity(Entity::new("proc-1", "Process"));
    store.add_relationship(Relationship::new(
        "pp-1",
        "ProcessPort",
        Vertex::new("proc-1", "Process"),
        Vertex::new("port-in", "PortImplementation"),
    ));
    store.add_relationship(Relationship::new(
        "deleg-1",
        "PortDelegation",
        Vertex::new("port-in", "PortImplementation"),
        Vertex::new("alias-in", "PortAlias"),
    ));
    store.add_relationship(Relationship::new(
        "deleg-2",
        "PortDelegation",
        Vertex::new("alias-in", "PortAlias"),
        Vertex::new("port-in", "PortImplementation"),
    ));
    store
}

#[tokio::test]
async fn publishing_twice_yields_the_same_result() {
    let harness = Harness::new(Arc::new(process_store()), MemoryChannel::new(), 1);
    let scope = harness.scope();

    let first = harness
        .publisher
        .publish_entity(&scope, "Process", "proc-1")
        .await
        .unwrap();
    let second = harness
        .publisher
        .publish_entity(&scope, "Process", "proc-1")
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.ids().collect::<Vec<_>>(), vec!["proc-1"]);
    assert_eq!(harness.channel.len(), 2);
}

#[tokio::test]
async fn process_context_follows_ports_through_delegation_loops() {
    let harness = Harness::new(Arc::new(process_store()), MemoryChannel::new(), 1);
    harness
        .publisher
        .publish_entity(&harness.scope(), "Process", "proc-1")
        .await
        .unwrap();

    let events = harness.channel.events();
    let LineageEvent::LineageContext { contexts, .. } = &events[0] else {
        panic!("expected a lineage context event");
    };
    assert_eq!(contexts.get("ProcessPort").len(), 1);
    let delegation_edges: usize = contexts.get("PortDelegation").iter().map(|c| c.len()).sum();
    assert_eq!(delegation_edges, 2);
    assert_eq!(
        contexts.vertex_guids().into_iter().collect::<Vec<_>>(),
        vec!["alias-in", "port-in", "proc-1"]
    );
}

#[tokio::test]
async fn missing_entity_is_not_an_error() {
    let harness = Harness::new(Arc::new(process_store()), MemoryChannel::new(), 1);

    let result = harness
        .publisher
        .publish_entity(&harness.scope(), "Process", "no-such-guid")
        .await
        .unwrap();

    assert!(result.is_empty());
    assert!(harness.channel.is_empty());
    assert!(harness
        .audit
        .events()
        .iter()
        .any(|e| matches!(e, AuditEvent::EntityNotFound { guid, .. } if guid == "no-such-guid")));
}

#[tokio::test]
async fn entity_of_another_type_is_not_found() {
    let store = process_store();
    add_assigned_term(&store, "term-1");
    let harness = Harness::new(Arc::new(store), MemoryChannel::new(), 1);

    let result = harness
        .publisher
        .publish_entity(&harness.scope(), "Process", "term-1")
        .await
        .unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn unit_failure_is_absorbed() {
    let store = FaultyStore::new(process_store());
    store.fail_on("proc-1");
    let harness = Harness::new(Arc::new(store), MemoryChannel::new(), 1);

    let result = harness
        .publisher
        .publish_entity(&harness.scope(), "Process", "proc-1")
        .await
        .unwrap();

    assert!(result.is_empty());
    assert!(harness
        .audit
        .events()
        .iter()
        .any(|e| matches!(e, AuditEvent::EntityFailed { guid, .. } if guid == "proc-1")));
}

#[tokio::test]
async fn blank_guid_is_invalid_input() {
    let harness = Harness::new(Arc::new(process_store()), MemoryChannel::new(), 1);
    let err = harness
        .publisher
        .publish_entity(&harness.scope(), "Process", "")
        .await
        .unwrap_err();
    assert!(matches!(err, LineageError::InvalidInput(_)));
}
