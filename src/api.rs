//! Lineage Service API
//!
//! Request/response surface over one or more [`LineagePublisher`]s. Requests
//! name the server they are addressed to; the service builds the per-request
//! scope and turns request-level errors into an [`ErrorDescriptor`] carrying
//! an HTTP-style status code.

use crate::audit::{AuditSink, TracingAuditSink};
use crate::engine::{LineagePublisher, RequestScope};
use crate::error::LineageError;
use crate::types::{FindEntitiesParameters, PublicationResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Publish the context of every entity of a type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEntitiesRequest {
    pub server_name: String,
    pub user_id: String,
    pub entity_type: String,
    #[serde(default)]
    pub params: FindEntitiesParameters,
}

/// Address one entity; used for both lineage and asset context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEntityRequest {
    pub server_name: String,
    pub user_id: String,
    pub entity_type: String,
    pub guid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDescriptor {
    pub http_code: u16,
    pub kind: String,
    pub message: String,
}

impl From<&LineageError> for ErrorDescriptor {
    fn from(err: &LineageError) -> Self {
        let (http_code, kind) = match err {
            LineageError::InvalidInput(_) => (400, "invalid_input"),
            LineageError::Unauthorized(_) => (403, "unauthorized"),
            LineageError::StoreUnavailable(_) => (503, "store_unavailable"),
            LineageError::ContextBuild(_) => (500, "context_build"),
            LineageError::Publish(_) => (500, "publish"),
            LineageError::Config(_) => (500, "config"),
        };
        Self {
            http_code,
            kind: kind.to_string(),
            message: err.to_string(),
        }
    }
}

/// Sorted guids on success, an error descriptor otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidListResponse {
    pub guids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDescriptor>,
}

impl GuidListResponse {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl From<Result<PublicationResult, LineageError>> for GuidListResponse {
    fn from(result: Result<PublicationResult, LineageError>) -> Self {
        match result {
            Ok(published) => Self {
                guids: published.into_ids().into_iter().collect(),
                error: None,
            },
            Err(e) => Self {
                guids: Vec::new(),
                error: Some(ErrorDescriptor::from(&e)),
            },
        }
    }
}

pub struct LineageService {
    publishers: HashMap<String, Arc<LineagePublisher>>,
    audit: Arc<dyn AuditSink>,
}

impl Default for LineageService {
    fn default() -> Self {
        Self::new(Arc::new(TracingAuditSink))
    }
}

impl LineageService {
    pub fn new(audit: Arc<dyn AuditSink>) -> Self {
        Self {
            publishers: HashMap::new(),
            audit,
        }
    }

    pub fn register(&mut self, server_name: impl Into<String>, publisher: Arc<LineagePublisher>) {
        self.publishers.insert(server_name.into(), publisher);
    }

    pub fn server_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.publishers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub async fn publish_entities(&self, request: &PublishEntitiesRequest) -> GuidListResponse {
        let result = match self.route(&request.server_name, &request.user_id) {
            Ok((publisher, scope)) => {
                publisher
                    .publish_entities(&scope, &request.entity_type, &request.params)
                    .await
            }
            Err(e) => Err(e),
        };
        respond("publish_entities", result)
    }

    pub async fn publish_entity(&self, request: &PublishEntityRequest) -> GuidListResponse {
        let result = match self.route(&request.server_name, &request.user_id) {
            Ok((publisher, scope)) => {
                publisher
                    .publish_entity(&scope, &request.entity_type, &request.guid)
                    .await
            }
            Err(e) => Err(e),
        };
        respond("publish_entity", result)
    }

    pub async fn publish_asset_context(&self, request: &PublishEntityRequest) -> GuidListResponse {
        let result = match self.route(&request.server_name, &request.user_id) {
            Ok((publisher, scope)) => {
                publisher
                    .publish_asset_context(&scope, &request.entity_type, &request.guid)
                    .await
            }
            Err(e) => Err(e),
        };
        respond("publish_asset_context", result)
    }

    fn route(
        &self,
        server_name: &str,
        user_id: &str,
    ) -> Result<(&LineagePublisher, RequestScope), LineageError> {
        let publisher = self.publishers.get(server_name).ok_or_else(|| {
            LineageError::InvalidInput(format!("unknown server name '{}'", server_name))
        })?;
        let scope = RequestScope::new(server_name, user_id, Arc::clone(&self.audit));
        Ok((publisher.as_ref(), scope))
    }
}

fn respond(operation: &str, result: Result<PublicationResult, LineageError>) -> GuidListResponse {
    let response = GuidListResponse::from(result);
    match &response.error {
        Some(error) => debug!(operation, code = error.http_code, kind = %error.kind, "Request failed"),
        None => debug!(operation, guids = response.guids.len(), "Request completed"),
    }
    response
}
