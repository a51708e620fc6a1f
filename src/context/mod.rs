//! Context domain: builds the lineage relationship context of an entity.
//!
//! Bulk and single-entity publication dispatch through [`ContextBuilder::build`],
//! which selects a strategy by type name. The asset context is a separate,
//! explicitly requested traversal.

pub mod asset;
pub mod glossary;
pub mod process;
pub mod registry;
pub mod traversal;

pub use asset::AssetContextStrategy;
pub use glossary::GlossaryContextStrategy;
pub use process::ProcessContextStrategy;
pub use registry::{StrategyRegistry, GLOSSARY_TERM, PROCESS};
pub use traversal::{Traversal, DEFAULT_MAX_DEPTH};

use crate::config::ContextConfig;
use crate::error::{BuildError, LineageError};
use crate::store::EntityStore;
use crate::types::{ContextMap, Entity, RelationshipsContext};
use async_trait::async_trait;
use tracing::warn;

/// Builds the context map for entities of the types it is registered under.
#[async_trait]
pub trait ContextStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn build(
        &self,
        store: &dyn EntityStore,
        user_id: &str,
        entity: &Entity,
    ) -> Result<ContextMap, BuildError>;
}

pub struct ContextBuilder {
    registry: StrategyRegistry,
    asset: AssetContextStrategy,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(
            StrategyRegistry::with_defaults(DEFAULT_MAX_DEPTH),
            AssetContextStrategy::new(DEFAULT_MAX_DEPTH),
        )
    }
}

impl ContextBuilder {
    pub fn new(registry: StrategyRegistry, asset: AssetContextStrategy) -> Self {
        Self { registry, asset }
    }

    pub fn from_config(config: &ContextConfig) -> Result<Self, LineageError> {
        let mut registry = StrategyRegistry::with_defaults(config.max_depth);
        for alias in &config.type_aliases {
            registry
                .alias(alias.type_name.as_str(), &alias.target)
                .map_err(|e| {
                    LineageError::Config(format!("type alias '{}': {}", alias.type_name, e))
                })?;
        }
        Ok(Self::new(registry, AssetContextStrategy::new(config.max_depth)))
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn supports(&self, type_name: &str) -> bool {
        self.registry.contains(type_name)
    }

    /// Context map for `entity` using the strategy registered for its type.
    ///
    /// Unregistered types produce an empty map and a warning, never an error.
    pub async fn build(
        &self,
        store: &dyn EntityStore,
        user_id: &str,
        entity: &Entity,
    ) -> Result<ContextMap, BuildError> {
        match self.registry.resolve(&entity.type_name) {
            Some(strategy) => strategy.build(store, user_id, entity).await,
            None => {
                warn!(
                    type_name = %entity.type_name,
                    guid = %entity.guid,
                    "Unsupported type name, the context can not be published"
                );
                Ok(ContextMap::new())
            }
        }
    }

    pub async fn build_asset_context(
        &self,
        store: &dyn EntityStore,
        user_id: &str,
        entity: &Entity,
    ) -> Result<RelationshipsContext, BuildError> {
        self.asset.build(store, user_id, entity).await
    }
}
