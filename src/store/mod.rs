//! Entity Store Gateway
//!
//! Read-only view of the metadata repository consumed by the publication
//! pipeline. Implementations must be safe to call from many workers at once.

pub mod memory;
pub mod snapshot;

pub use memory::InMemoryEntityStore;
pub use snapshot::StoreSnapshot;

use crate::error::StoreError;
use crate::types::{Entity, FindEntitiesParameters, Relationship};
use async_trait::async_trait;

/// Query interface over the metadata repository.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Entities of `type_name` (or one of its subtypes) matching `params`.
    ///
    /// Returns an empty list, not an error, when nothing matches.
    async fn find_entities_by_type(
        &self,
        user_id: &str,
        type_name: &str,
        params: &FindEntitiesParameters,
    ) -> Result<Vec<Entity>, StoreError>;

    /// Entity with `guid`, provided its type is `type_name` or a subtype of it.
    async fn get_entity(
        &self,
        user_id: &str,
        guid: &str,
        type_name: &str,
    ) -> Result<Option<Entity>, StoreError>;

    /// Relationships of `relationship_type` that have `guid` at either end.
    async fn relationships(
        &self,
        user_id: &str,
        guid: &str,
        relationship_type: &str,
    ) -> Result<Vec<Relationship>, StoreError>;
}
