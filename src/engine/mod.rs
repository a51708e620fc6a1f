//! Lineage Publication Engine
//!
//! Orchestrates scan, per-entity context build, and publish. Request-level
//! failures (invalid input, authorization, store outages) are returned to the
//! caller; per-entity failures are absorbed by the unit that hit them and only
//! show up on the audit trail. Callers can not tell an entity with nothing to
//! publish from one that failed: both are absent from the result.

pub mod dispatch;
pub mod unit;

pub use dispatch::BatchSummary;
pub use unit::UnitOutcome;

use crate::audit::{AuditEvent, AuditSink};
use crate::config::PublisherConfig;
use crate::context::ContextBuilder;
use crate::error::LineageError;
use crate::publish::{ChannelHandle, LineageEvent, PublishChannel};
use crate::store::EntityStore;
use crate::types::{Entity, FindEntitiesParameters, PublicationResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use unit::PublishUnit;

/// Per-request caller identity and audit handle.
#[derive(Clone)]
pub struct RequestScope {
    pub server_name: String,
    pub user_id: String,
    audit: Arc<dyn AuditSink>,
}

impl RequestScope {
    pub fn new(
        server_name: impl Into<String>,
        user_id: impl Into<String>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            server_name: server_name.into(),
            user_id: user_id.into(),
            audit,
        }
    }

    pub fn audit(&self, event: AuditEvent) {
        self.audit.notify(&self.server_name, &self.user_id, event);
    }
}

pub struct LineagePublisher {
    store: Arc<dyn EntityStore>,
    builder: Arc<ContextBuilder>,
    channel: ChannelHandle,
    max_workers: usize,
}

impl LineagePublisher {
    pub fn new(
        store: Arc<dyn EntityStore>,
        builder: Arc<ContextBuilder>,
        channel: ChannelHandle,
        config: &PublisherConfig,
    ) -> Self {
        Self {
            store,
            builder,
            channel,
            max_workers: config.max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Publish the context of every `entity_type` entity matching `params`.
    pub async fn publish_entities(
        &self,
        scope: &RequestScope,
        entity_type: &str,
        params: &FindEntitiesParameters,
    ) -> Result<PublicationResult, LineageError> {
        require("entity type", entity_type)?;
        let started = Instant::now();

        scope.audit(AuditEvent::ScanStarted {
            entity_type: entity_type.to_string(),
        });
        let entities = self
            .store
            .find_entities_by_type(&scope.user_id, entity_type, params)
            .await?;

        if entities.is_empty() {
            scope.audit(AuditEvent::EntitiesNotFound {
                entity_type: entity_type.to_string(),
            });
            return Ok(PublicationResult::empty());
        }

        let count = entities.len();
        scope.audit(AuditEvent::EntitiesFound {
            entity_type: entity_type.to_string(),
            count,
        });
        scope.audit(AuditEvent::EntitiesListed {
            entity_type: entity_type.to_string(),
            guids: entities.iter().map(|e| e.guid.clone()).collect(),
        });

        let Some(channel) = self.channel_or_report(scope) else {
            return Ok(PublicationResult::empty());
        };

        scope.audit(AuditEvent::PublishSequenceStarted {
            entity_type: entity_type.to_string(),
            count,
        });
        let outcomes = dispatch::dispatch(self.unit(scope, channel), entities, self.max_workers).await;
        let summary = BatchSummary::from_outcomes(&outcomes);
        let result: PublicationResult = outcomes
            .into_iter()
            .filter_map(UnitOutcome::into_published_guid)
            .collect();

        scope.audit(AuditEvent::PublishSequenceEnded {
            entity_type: entity_type.to_string(),
            published: result.len(),
            empty: summary.empty,
            failed: summary.failed,
        });
        info!(
            entity_type,
            found = count,
            published = result.len(),
            empty = summary.empty,
            failed = summary.failed,
            duration_ms = started.elapsed().as_millis() as u64,
            "Publish sequence finished"
        );
        Ok(result)
    }

    /// Publish the context of one entity on the caller's task.
    pub async fn publish_entity(
        &self,
        scope: &RequestScope,
        entity_type: &str,
        guid: &str,
    ) -> Result<PublicationResult, LineageError> {
        let Some(entity) = self.fetch(scope, entity_type, guid).await? else {
            return Ok(PublicationResult::empty());
        };
        let Some(channel) = self.channel_or_report(scope) else {
            return Ok(PublicationResult::empty());
        };

        let outcome = self.unit(scope, channel).run(entity).await;
        Ok(outcome.into_published_guid().into_iter().collect())
    }

    /// Build and publish the asset context of one entity.
    ///
    /// The event is sent even when the context is empty. The result lists
    /// every entity the context touches, not just the requested one.
    pub async fn publish_asset_context(
        &self,
        scope: &RequestScope,
        entity_type: &str,
        guid: &str,
    ) -> Result<PublicationResult, LineageError> {
        let Some(entity) = self.fetch(scope, entity_type, guid).await? else {
            return Ok(PublicationResult::empty());
        };
        let Some(channel) = self.channel_or_report(scope) else {
            return Ok(PublicationResult::empty());
        };

        let context = self
            .builder
            .build_asset_context(self.store.as_ref(), &scope.user_id, &entity)
            .await?;
        let touched = context.vertex_guids();

        channel
            .publish(LineageEvent::asset_context(&entity, context))
            .await?;

        scope.audit(AuditEvent::AssetContextPublished {
            guid: entity.guid.clone(),
            vertex_count: touched.len(),
        });
        Ok(touched.into_iter().collect())
    }

    async fn fetch(
        &self,
        scope: &RequestScope,
        entity_type: &str,
        guid: &str,
    ) -> Result<Option<Entity>, LineageError> {
        require("entity type", entity_type)?;
        require("guid", guid)?;

        let entity = self
            .store
            .get_entity(&scope.user_id, guid, entity_type)
            .await?;
        let event = match &entity {
            Some(_) => AuditEvent::EntityFound {
                entity_type: entity_type.to_string(),
                guid: guid.to_string(),
            },
            None => AuditEvent::EntityNotFound {
                entity_type: entity_type.to_string(),
                guid: guid.to_string(),
            },
        };
        scope.audit(event);
        Ok(entity)
    }

    fn channel_or_report(&self, scope: &RequestScope) -> Option<Arc<dyn PublishChannel>> {
        match self.channel.get() {
            Ok(channel) => Some(channel),
            Err(e) => {
                warn!(error = %e, "Publisher not available, nothing will be published");
                scope.audit(AuditEvent::PublisherUnavailable {
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    fn unit(&self, scope: &RequestScope, channel: Arc<dyn PublishChannel>) -> PublishUnit {
        PublishUnit {
            store: Arc::clone(&self.store),
            builder: Arc::clone(&self.builder),
            channel,
            scope: scope.clone(),
        }
    }
}

fn require(name: &str, value: &str) -> Result<(), LineageError> {
    if value.trim().is_empty() {
        Err(LineageError::InvalidInput(format!("{} must not be empty", name)))
    } else {
        Ok(())
    }
}
