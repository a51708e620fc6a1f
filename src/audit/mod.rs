//! Audit trail for publication requests.
//!
//! Lifecycle notifications are fire-and-forget: sinks never fail the request
//! and the publication result does not depend on their delivery.

pub mod sinks;

pub use sinks::{AuditBus, MemoryAuditSink, TracingAuditSink};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    ScanStarted {
        entity_type: String,
    },
    EntitiesNotFound {
        entity_type: String,
    },
    EntitiesFound {
        entity_type: String,
        count: usize,
    },
    EntitiesListed {
        entity_type: String,
        guids: Vec<String>,
    },
    EntityFound {
        entity_type: String,
        guid: String,
    },
    EntityNotFound {
        entity_type: String,
        guid: String,
    },
    PublisherUnavailable {
        reason: String,
    },
    PublishSequenceStarted {
        entity_type: String,
        count: usize,
    },
    BuildingContextStarted {
        entity_type: String,
        guid: String,
    },
    EntityPublished {
        entity_type: String,
        guid: String,
    },
    ContextEmpty {
        entity_type: String,
        guid: String,
    },
    UnsupportedType {
        entity_type: String,
        guid: String,
    },
    EntityFailed {
        entity_type: String,
        guid: String,
        error: String,
    },
    PublishSequenceEnded {
        entity_type: String,
        published: usize,
        empty: usize,
        failed: usize,
    },
    AssetContextPublished {
        guid: String,
        vertex_count: usize,
    },
}

impl AuditEvent {
    pub fn severity(&self) -> Severity {
        match self {
            AuditEvent::PublisherUnavailable { .. } | AuditEvent::EntityFailed { .. } => {
                Severity::Error
            }
            AuditEvent::UnsupportedType { .. } | AuditEvent::EntityNotFound { .. } => {
                Severity::Warning
            }
            _ => Severity::Info,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AuditEvent::ScanStarted { entity_type } => {
                format!("Scanning the metadata store for {} entities", entity_type)
            }
            AuditEvent::EntitiesNotFound { entity_type } => {
                format!("Found 0 {} entities", entity_type)
            }
            AuditEvent::EntitiesFound { entity_type, count } => {
                format!("Found {} {} entities", count, entity_type)
            }
            AuditEvent::EntitiesListed { entity_type, guids } => {
                format!("{} entities: {}", entity_type, guids.join(","))
            }
            AuditEvent::EntityFound { entity_type, guid } => {
                format!("Found {} entity {}", entity_type, guid)
            }
            AuditEvent::EntityNotFound { entity_type, guid } => {
                format!("{} entity {} was not found", entity_type, guid)
            }
            AuditEvent::PublisherUnavailable { reason } => {
                format!("The lineage publisher is not available: {}", reason)
            }
            AuditEvent::PublishSequenceStarted { entity_type, count } => {
                format!("Publishing context for {} {} entities", count, entity_type)
            }
            AuditEvent::BuildingContextStarted { entity_type, guid } => {
                format!("Building context for {} entity {}", entity_type, guid)
            }
            AuditEvent::EntityPublished { entity_type, guid } => {
                format!("Published context for {} entity {}", entity_type, guid)
            }
            AuditEvent::ContextEmpty { entity_type, guid } => {
                format!("Context for {} entity {} is empty, nothing published", entity_type, guid)
            }
            AuditEvent::UnsupportedType { entity_type, guid } => {
                format!("Unsupported type {} for entity {}, context not published", entity_type, guid)
            }
            AuditEvent::EntityFailed {
                entity_type,
                guid,
                error,
            } => format!(
                "Failed to publish context for {} entity {}: {}",
                entity_type, guid, error
            ),
            AuditEvent::PublishSequenceEnded {
                entity_type,
                published,
                empty,
                failed,
            } => format!(
                "Published {} {} entities ({} empty, {} failed)",
                published, entity_type, empty, failed
            ),
            AuditEvent::AssetContextPublished { guid, vertex_count } => format!(
                "Published asset context for {} touching {} entities",
                guid, vertex_count
            ),
        }
    }
}

/// Timestamped audit envelope carrying the request it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub ts: String,
    pub server_name: String,
    pub user_id: String,
    #[serde(flatten)]
    pub event: AuditEvent,
}

impl AuditRecord {
    pub fn with_now(server_name: &str, user_id: &str, event: AuditEvent) -> Self {
        Self {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            server_name: server_name.to_string(),
            user_id: user_id.to_string(),
            event,
        }
    }
}

/// Receiver of lifecycle notifications.
pub trait AuditSink: Send + Sync {
    fn notify(&self, server_name: &str, user_id: &str, event: AuditEvent);
}
