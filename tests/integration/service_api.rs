//! Integration tests for the service facade and the out-topic channel

use super::support::{add_assigned_term, SERVER, USER};
use asset_lineage::api::{LineageService, PublishEntitiesRequest, PublishEntityRequest};
use asset_lineage::audit::{AuditBus, AuditEvent, AuditRecord};
use asset_lineage::config::PublisherConfig;
use asset_lineage::context::ContextBuilder;
use asset_lineage::engine::LineagePublisher;
use asset_lineage::publish::ChannelHandle;
use asset_lineage::store::InMemoryEntityStore;
use asset_lineage::types::FindEntitiesParameters;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tempfile::TempDir;

fn service(
    store: InMemoryEntityStore,
    channel: ChannelHandle,
) -> (LineageService, Receiver<AuditRecord>) {
    let publisher = LineagePublisher::new(
        Arc::new(store),
        Arc::new(ContextBuilder::default()),
        channel,
        &PublisherConfig::default(),
    );
    let (bus, records) = AuditBus::new_pair();
    let mut service = LineageService::new(Arc::new(bus));
    service.register(SERVER, Arc::new(publisher));
    (service, records)
}

fn entities_request(entity_type: &str) -> PublishEntitiesRequest {
    PublishEntitiesRequest {
        server_name: SERVER.into(),
        user_id: USER.into(),
        entity_type: entity_type.into(),
        params: FindEntitiesParameters::default(),
    }
}

#[tokio::test]
async fn bulk_publish_writes_one_line_per_entity() {
    let temp = TempDir::new().unwrap();
    let topic = temp.path().join("topics").join("out.jsonl");
    let store = InMemoryEntityStore::new();
    for guid in ["t3", "t1", "t2"] {
        add_assigned_term(&store, guid);
    }
    let (service, records) = service(store, ChannelHandle::open_out_topic(&topic));

    let response = service.publish_entities(&entities_request("GlossaryTerm")).await;
    assert!(response.is_ok());
    assert_eq!(response.guids, vec!["t1", "t2", "t3"]);

    let written = std::fs::read_to_string(&topic).unwrap();
    let lines: Vec<serde_json::Value> = written
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|v| v["eventType"] == "LineageContext"));

    let audited: Vec<AuditEvent> = records.try_iter().map(|r| r.event).collect();
    assert!(matches!(audited.first(), Some(AuditEvent::ScanStarted { .. })));
}

#[tokio::test]
async fn unavailable_channel_yields_empty_success() {
    let store = InMemoryEntityStore::new();
    add_assigned_term(&store, "t1");
    let (service, records) =
        service(store, ChannelHandle::Unavailable("topic not configured".into()));

    let response = service.publish_entities(&entities_request("GlossaryTerm")).await;
    assert!(response.is_ok());
    assert!(response.guids.is_empty());
    assert!(records
        .try_iter()
        .any(|r| matches!(r.event, AuditEvent::PublisherUnavailable { .. })));
}

#[tokio::test]
async fn request_errors_carry_status_codes() {
    let store = InMemoryEntityStore::new();
    add_assigned_term(&store, "t1");
    store.restrict_to_users(["admin"]);
    let (service, _records) = service(store, ChannelHandle::Unavailable("unused".into()));

    let response = service.publish_entities(&entities_request("GlossaryTerm")).await;
    let error = response.error.unwrap();
    assert_eq!(error.http_code, 403);
    assert_eq!(error.kind, "unauthorized");

    let response = service
        .publish_entity(&PublishEntityRequest {
            server_name: "otherServer".into(),
            user_id: USER.into(),
            entity_type: "GlossaryTerm".into(),
            guid: "t1".into(),
        })
        .await;
    assert_eq!(response.error.map(|e| e.http_code), Some(400));
}

#[tokio::test]
async fn asset_context_through_the_service() {
    let temp = TempDir::new().unwrap();
    let topic = temp.path().join("out.jsonl");
    let store = InMemoryEntityStore::new();
    add_assigned_term(&store, "t1");
    let (service, _records) = service(store, ChannelHandle::open_out_topic(&topic));

    let response = service
        .publish_asset_context(&PublishEntityRequest {
            server_name: SERVER.into(),
            user_id: USER.into(),
            entity_type: "GlossaryTerm".into(),
            guid: "t1".into(),
        })
        .await;
    assert!(response.is_ok());
    assert!(response.guids.is_empty());

    let written = std::fs::read_to_string(&topic).unwrap();
    let event: serde_json::Value = serde_json::from_str(written.trim()).unwrap();
    assert_eq!(event["eventType"], "AssetContext");
    assert_eq!(event["entity"]["guid"], "t1");
}
