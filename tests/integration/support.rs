//! Shared fixtures: a fault-injecting store and publisher builders.

use asset_lineage::audit::MemoryAuditSink;
use asset_lineage::config::PublisherConfig;
use asset_lineage::context::ContextBuilder;
use asset_lineage::engine::{LineagePublisher, RequestScope};
use asset_lineage::error::StoreError;
use asset_lineage::publish::{ChannelHandle, MemoryChannel};
use asset_lineage::store::{EntityStore, InMemoryEntityStore};
use asset_lineage::types::{Entity, FindEntitiesParameters, Relationship, Vertex};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub const USER: &str = "garygeeke";
pub const SERVER: &str = "cocoMDS1";

/// Wraps an in-memory store; relationship lookups for chosen guids fail or panic.
pub struct FaultyStore {
    pub inner: InMemoryEntityStore,
    failing: Mutex<HashSet<String>>,
    panicking: Mutex<HashSet<String>>,
}

impl FaultyStore {
    pub fn new(inner: InMemoryEntityStore) -> Self {
        Self {
            inner,
            failing: Mutex::new(HashSet::new()),
            panicking: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail_on(&self, guid: &str) {
        self.failing.lock().unwrap().insert(guid.to_string());
    }

    pub fn panic_on(&self, guid: &str) {
        self.panicking.lock().unwrap().insert(guid.to_string());
    }

    fn should_panic(&self, guid: &str) -> bool {
        self.panicking.lock().unwrap().contains(guid)
    }
}

#[async_trait]
impl EntityStore for FaultyStore {
    async fn find_entities_by_type(
        &self,
        user_id: &str,
        type_name: &str,
        params: &FindEntitiesParameters,
    ) -> Result<Vec<Entity>, StoreError> {
        self.inner.find_entities_by_type(user_id, type_name, params).await
    }

    async fn get_entity(
        &self,
        user_id: &str,
        guid: &str,
        type_name: &str,
    ) -> Result<Option<Entity>, StoreError> {
        self.inner.get_entity(user_id, guid, type_name).await
    }

    async fn relationships(
        &self,
        user_id: &str,
        guid: &str,
        relationship_type: &str,
    ) -> Result<Vec<Relationship>, StoreError> {
        if self.should_panic(guid) {
            panic!("relationship index corrupted for {}", guid);
        }
        if self.failing.lock().unwrap().contains(guid) {
            return Err(StoreError::Unavailable(format!("shard holding {} is down", guid)));
        }
        self.inner.relationships(user_id, guid, relationship_type).await
    }
}

pub fn term(guid: &str) -> Entity {
    Entity::new(guid, "GlossaryTerm")
}

/// A glossary term with one data element assigned to it.
pub fn add_assigned_term(store: &InMemoryEntityStore, guid: &str) {
    store.add_entity(term(guid));
    store.add_relationship(Relationship::new(
        format!("assign-{}", guid),
        "SemanticAssignment",
        Vertex::new(format!("column-{}", guid), "RelationalColumn"),
        Vertex::new(guid, "GlossaryTerm"),
    ));
}

pub struct Harness {
    pub publisher: LineagePublisher,
    pub channel: Arc<MemoryChannel>,
    pub audit: Arc<MemoryAuditSink>,
}

impl Harness {
    pub fn new(store: Arc<dyn EntityStore>, channel: MemoryChannel, max_workers: usize) -> Self {
        let channel = Arc::new(channel);
        let config = PublisherConfig {
            max_workers,
            ..PublisherConfig::default()
        };
        let publisher = LineagePublisher::new(
            store,
            Arc::new(ContextBuilder::default()),
            ChannelHandle::ready(channel.clone()),
            &config,
        );
        Self {
            publisher,
            channel,
            audit: Arc::new(MemoryAuditSink::new()),
        }
    }

    pub fn scope(&self) -> RequestScope {
        RequestScope::new(SERVER, USER, self.audit.clone())
    }
}
