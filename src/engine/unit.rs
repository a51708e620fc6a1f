//! Build-and-publish unit: one entity's attempt within a request.
//!
//! A unit always resolves to an outcome. Build errors, publish errors and
//! panics are recorded on the audit trail and absorbed here.

use crate::audit::AuditEvent;
use crate::context::ContextBuilder;
use crate::engine::RequestScope;
use crate::error::{BuildError, LineageError};
use crate::publish::{LineageEvent, PublishChannel};
use crate::store::EntityStore;
use crate::types::Entity;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    Published(String),
    /// Context built but had no edges.
    Empty(String),
    /// No strategy for the entity's type.
    Unsupported(String),
    Failed { guid: String, reason: String },
}

impl UnitOutcome {
    pub fn guid(&self) -> &str {
        match self {
            UnitOutcome::Published(guid)
            | UnitOutcome::Empty(guid)
            | UnitOutcome::Unsupported(guid)
            | UnitOutcome::Failed { guid, .. } => guid,
        }
    }

    pub fn into_published_guid(self) -> Option<String> {
        match self {
            UnitOutcome::Published(guid) => Some(guid),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub(crate) struct PublishUnit {
    pub(crate) store: Arc<dyn EntityStore>,
    pub(crate) builder: Arc<ContextBuilder>,
    pub(crate) channel: Arc<dyn PublishChannel>,
    pub(crate) scope: RequestScope,
}

impl PublishUnit {
    pub(crate) async fn run(&self, entity: Entity) -> UnitOutcome {
        self.scope.audit(AuditEvent::BuildingContextStarted {
            entity_type: entity.type_name.clone(),
            guid: entity.guid.clone(),
        });

        let outcome = match AssertUnwindSafe(self.build_and_publish(&entity))
            .catch_unwind()
            .await
        {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => UnitOutcome::Failed {
                guid: entity.guid.clone(),
                reason: e.to_string(),
            },
            Err(panic) => UnitOutcome::Failed {
                guid: entity.guid.clone(),
                reason: BuildError::Panicked(panic_message(panic.as_ref())).to_string(),
            },
        };

        self.report(&entity, &outcome);
        outcome
    }

    async fn build_and_publish(&self, entity: &Entity) -> Result<UnitOutcome, LineageError> {
        let contexts = self
            .builder
            .build(self.store.as_ref(), &self.scope.user_id, entity)
            .await?;

        if contexts.is_empty() {
            return Ok(if self.builder.supports(&entity.type_name) {
                UnitOutcome::Empty(entity.guid.clone())
            } else {
                UnitOutcome::Unsupported(entity.guid.clone())
            });
        }

        debug!(
            guid = %entity.guid,
            type_name = %entity.type_name,
            contexts = contexts.len(),
            "Publishing lineage context"
        );
        self.channel
            .publish(LineageEvent::lineage_context(entity, contexts))
            .await?;
        Ok(UnitOutcome::Published(entity.guid.clone()))
    }

    fn report(&self, entity: &Entity, outcome: &UnitOutcome) {
        let entity_type = entity.type_name.clone();
        let guid = entity.guid.clone();
        let event = match outcome {
            UnitOutcome::Published(_) => AuditEvent::EntityPublished { entity_type, guid },
            UnitOutcome::Empty(_) => AuditEvent::ContextEmpty { entity_type, guid },
            UnitOutcome::Unsupported(_) => AuditEvent::UnsupportedType { entity_type, guid },
            UnitOutcome::Failed { reason, .. } => {
                error!(
                    guid = %entity.guid,
                    type_name = %entity.type_name,
                    error = %reason,
                    "Failed to publish entity context"
                );
                AuditEvent::EntityFailed {
                    entity_type,
                    guid,
                    error: reason.clone(),
                }
            }
        };
        self.scope.audit(event);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
