//! CLI route: single route table and run context. Dispatches to the service and presentation.

use crate::api::{GuidListResponse, LineageService, PublishEntitiesRequest, PublishEntityRequest};
use crate::cli::parse::{Commands, EntityArgs, RequestArgs};
use crate::cli::presentation::{format_response_json, format_response_text};
use crate::cli::{command_name, CliError};
use crate::config::{ConfigLoader, LineageConfig};
use crate::context::ContextBuilder;
use crate::engine::LineagePublisher;
use crate::error::LineageError;
use crate::publish::ChannelHandle;
use crate::store::{InMemoryEntityStore, StoreSnapshot};
use crate::types::FindEntitiesParameters;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{info, warn};

/// Runtime context for CLI execution: the configured service and the runtime driving it.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    runtime: Runtime,
    service: LineageService,
    server_name: String,
    workspace_root: PathBuf,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, LineageError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::from_config(workspace_root, config)
    }

    pub fn from_config(workspace_root: PathBuf, config: LineageConfig) -> Result<Self, LineageError> {
        config.validate().map_err(|errors| {
            let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
            LineageError::Config(joined.join("; "))
        })?;

        let store = open_store(&config, &workspace_root)?;
        let builder = ContextBuilder::from_config(&config.context)?;
        let channel = ChannelHandle::open_out_topic(&config.publisher.out_topic_path(&workspace_root));
        let publisher = LineagePublisher::new(
            Arc::new(store),
            Arc::new(builder),
            channel,
            &config.publisher,
        );

        let mut service = LineageService::default();
        service.register(config.server_name.clone(), Arc::new(publisher));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| LineageError::Config(format!("Failed to start async runtime: {}", e)))?;

        Ok(Self {
            runtime,
            service,
            server_name: config.server_name,
            workspace_root,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, CliError> {
        let started = Instant::now();
        let name = command_name(command);
        let response = self.runtime.block_on(self.dispatch(command));
        info!(
            command = name,
            guids = response.guids.len(),
            ok = response.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );

        if let Some(error) = response.error {
            return Err(CliError::Request(error));
        }
        match command.request().format.as_str() {
            "json" => format_response_json(&response),
            _ => Ok(format_response_text(name, &response)),
        }
    }

    async fn dispatch(&self, command: &Commands) -> GuidListResponse {
        match command {
            Commands::PublishEntities {
                entity_type,
                updated_after,
                classifications,
                request,
            } => {
                let request = PublishEntitiesRequest {
                    server_name: self.server_name.clone(),
                    user_id: request.user.clone(),
                    entity_type: entity_type.clone(),
                    params: FindEntitiesParameters {
                        updated_after: *updated_after,
                        limit_by_classifications: classifications.clone(),
                    },
                };
                self.service.publish_entities(&request).await
            }
            Commands::PublishEntity { entity, request } => {
                self.service
                    .publish_entity(&self.entity_request(entity, request))
                    .await
            }
            Commands::PublishAssetContext { entity, request } => {
                self.service
                    .publish_asset_context(&self.entity_request(entity, request))
                    .await
            }
        }
    }

    fn entity_request(&self, entity: &EntityArgs, request: &RequestArgs) -> PublishEntityRequest {
        PublishEntityRequest {
            server_name: self.server_name.clone(),
            user_id: request.user.clone(),
            entity_type: entity.entity_type.clone(),
            guid: entity.guid.clone(),
        }
    }
}

fn open_store(config: &LineageConfig, workspace_root: &Path) -> Result<InMemoryEntityStore, LineageError> {
    match config.store.snapshot_path(workspace_root) {
        Some(path) => {
            let snapshot = StoreSnapshot::load(&path)?;
            let store = InMemoryEntityStore::from_snapshot(snapshot);
            info!(
                snapshot = %path.display(),
                entities = store.entity_count(),
                "Loaded metadata snapshot"
            );
            Ok(store)
        }
        None => {
            warn!("No store snapshot configured, starting with an empty metadata store");
            Ok(InMemoryEntityStore::new())
        }
    }
}
