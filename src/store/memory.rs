//! In-memory entity store.

use crate::error::StoreError;
use crate::store::snapshot::StoreSnapshot;
use crate::store::EntityStore;
use crate::types::{Entity, FindEntitiesParameters, Relationship};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Default)]
struct StoreState {
    entities: HashMap<String, Entity>,
    relationships: Vec<Relationship>,
    /// subtype -> direct supertype
    supertypes: HashMap<String, String>,
    known_types: HashSet<String>,
    allowed_users: Option<HashSet<String>>,
    unavailable: Option<String>,
}

impl StoreState {
    fn is_a(&self, type_name: &str, wanted: &str) -> bool {
        let mut current = type_name;
        let mut seen = HashSet::new();
        loop {
            if current == wanted {
                return true;
            }
            if !seen.insert(current) {
                return false;
            }
            match self.supertypes.get(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn check_access(&self, user_id: &str) -> Result<(), StoreError> {
        if let Some(reason) = &self.unavailable {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        if user_id.trim().is_empty() {
            return Err(StoreError::InvalidInput("user id must not be empty".into()));
        }
        match &self.allowed_users {
            Some(users) if !users.contains(user_id) => Err(StoreError::Unauthorized(format!(
                "user '{}' may not read the metadata store",
                user_id
            ))),
            _ => Ok(()),
        }
    }

    fn check_type(&self, type_name: &str) -> Result<(), StoreError> {
        if self.known_types.contains(type_name) {
            Ok(())
        } else {
            Err(StoreError::InvalidInput(format!(
                "unknown type name '{}'",
                type_name
            )))
        }
    }
}

/// Entity store holding its whole graph in memory.
///
/// Used by the CLI (loaded from a JSON snapshot) and by tests. Access control
/// and availability can be switched at runtime to exercise request-level
/// failures.
#[derive(Default)]
pub struct InMemoryEntityStore {
    state: RwLock<StoreState>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = Self::new();
        for (sub, sup) in snapshot.subtypes {
            store.register_subtype(sub, sup);
        }
        for entity in snapshot.entities {
            store.add_entity(entity);
        }
        for relationship in snapshot.relationships {
            store.add_relationship(relationship);
        }
        store
    }

    /// Declare a type name without adding entities of it.
    pub fn register_type(&self, type_name: impl Into<String>) {
        self.state.write().known_types.insert(type_name.into());
    }

    pub fn register_subtype(&self, subtype: impl Into<String>, supertype: impl Into<String>) {
        let subtype = subtype.into();
        let supertype = supertype.into();
        let mut state = self.state.write();
        state.known_types.insert(subtype.clone());
        state.known_types.insert(supertype.clone());
        state.supertypes.insert(subtype, supertype);
    }

    pub fn add_entity(&self, entity: Entity) {
        let mut state = self.state.write();
        state.known_types.insert(entity.type_name.clone());
        state.entities.insert(entity.guid.clone(), entity);
    }

    pub fn add_relationship(&self, relationship: Relationship) {
        let mut state = self.state.write();
        state.known_types.insert(relationship.type_name.clone());
        state.relationships.push(relationship);
    }

    /// Restrict reads to the given users. Everyone else gets `Unauthorized`.
    pub fn restrict_to_users<I, S>(&self, users: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.write().allowed_users = Some(users.into_iter().map(Into::into).collect());
    }

    /// Make every call fail with `Unavailable` until `set_available` is called.
    pub fn set_unavailable(&self, reason: impl Into<String>) {
        self.state.write().unavailable = Some(reason.into());
    }

    pub fn set_available(&self) {
        self.state.write().unavailable = None;
    }

    pub fn entity_count(&self) -> usize {
        self.state.read().entities.len()
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn find_entities_by_type(
        &self,
        user_id: &str,
        type_name: &str,
        params: &FindEntitiesParameters,
    ) -> Result<Vec<Entity>, StoreError> {
        let state = self.state.read();
        state.check_access(user_id)?;
        state.check_type(type_name)?;

        let found: Vec<Entity> = state
            .entities
            .values()
            .filter(|e| state.is_a(&e.type_name, type_name) && params.matches(e))
            .cloned()
            .collect();
        debug!(type_name, found = found.len(), "Scanned in-memory store");
        Ok(found)
    }

    async fn get_entity(
        &self,
        user_id: &str,
        guid: &str,
        type_name: &str,
    ) -> Result<Option<Entity>, StoreError> {
        let state = self.state.read();
        state.check_access(user_id)?;
        state.check_type(type_name)?;

        Ok(state
            .entities
            .get(guid)
            .filter(|e| state.is_a(&e.type_name, type_name))
            .cloned())
    }

    async fn relationships(
        &self,
        user_id: &str,
        guid: &str,
        relationship_type: &str,
    ) -> Result<Vec<Relationship>, StoreError> {
        let state = self.state.read();
        state.check_access(user_id)?;

        Ok(state
            .relationships
            .iter()
            .filter(|r| r.type_name == relationship_type && r.other_end(guid).is_some())
            .cloned()
            .collect())
    }
}
