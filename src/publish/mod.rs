//! Publish Channel
//!
//! Outbound sink for lineage events. A channel delivers or reports failure;
//! it never retries on its own. Channels are shared by all dispatch workers.

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonLinesChannel;
pub use memory::MemoryChannel;

use crate::error::PublishError;
use crate::types::{ContextMap, Entity, RelationshipsContext, Vertex};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Event handed to a publish channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "eventType")]
pub enum LineageEvent {
    LineageContext {
        ts: String,
        entity: Vertex,
        contexts: ContextMap,
    },
    AssetContext {
        ts: String,
        entity: Vertex,
        context: RelationshipsContext,
    },
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl LineageEvent {
    pub fn lineage_context(entity: &Entity, contexts: ContextMap) -> Self {
        LineageEvent::LineageContext {
            ts: now(),
            entity: entity.vertex(),
            contexts,
        }
    }

    pub fn asset_context(entity: &Entity, context: RelationshipsContext) -> Self {
        LineageEvent::AssetContext {
            ts: now(),
            entity: entity.vertex(),
            context,
        }
    }

    pub fn entity(&self) -> &Vertex {
        match self {
            LineageEvent::LineageContext { entity, .. } => entity,
            LineageEvent::AssetContext { entity, .. } => entity,
        }
    }
}

/// Outbound event sink.
#[async_trait]
pub trait PublishChannel: Send + Sync {
    /// Deliver one event. Ownership moves to the channel.
    async fn publish(&self, event: LineageEvent) -> Result<(), PublishError>;
}

/// A channel as obtained at startup: either usable or known to be unavailable.
#[derive(Clone)]
pub enum ChannelHandle {
    Ready(Arc<dyn PublishChannel>),
    Unavailable(String),
}

impl ChannelHandle {
    pub fn ready(channel: Arc<dyn PublishChannel>) -> Self {
        ChannelHandle::Ready(channel)
    }

    /// Open the out-topic file. Failure leaves the handle unavailable.
    pub fn open_out_topic(path: &Path) -> Self {
        match JsonLinesChannel::open(path) {
            Ok(channel) => ChannelHandle::Ready(Arc::new(channel)),
            Err(e) => {
                warn!(
                    out_topic = %path.display(),
                    error = %e,
                    "Out topic could not be opened, publishing disabled"
                );
                ChannelHandle::Unavailable(e.to_string())
            }
        }
    }

    pub fn get(&self) -> Result<Arc<dyn PublishChannel>, PublishError> {
        match self {
            ChannelHandle::Ready(channel) => Ok(Arc::clone(channel)),
            ChannelHandle::Unavailable(reason) => Err(PublishError::Unavailable(reason.clone())),
        }
    }
}
