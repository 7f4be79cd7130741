//! Entity storage
//!
//! Owns every entity record, keyed by unique name, together with the label
//! index derived from them. Both are updated in the same call so the index
//! never lags behind the records.

use super::entity::Entity;
use super::label_index::LabelIndex;
use super::store::{GraphError, GraphResult};
use super::types::Label;
use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct EntityStore {
    entities: IndexMap<String, Entity>,
    label_index: LabelIndex,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity and register it under its label
    pub fn insert(&mut self, label: Label, name: &str) -> GraphResult<()> {
        if self.entities.contains_key(name) {
            return Err(GraphError::DuplicateEntity(name.to_string()));
        }

        self.label_index.insert(label.clone(), name);
        self.entities.insert(name.to_string(), Entity::new(label, name));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.get_mut(name)
    }

    /// Fetch an entity or fail with `EntityNotFound`
    pub fn require(&self, name: &str) -> GraphResult<&Entity> {
        self.get(name)
            .ok_or_else(|| GraphError::EntityNotFound(name.to_string()))
    }

    pub fn require_mut(&mut self, name: &str) -> GraphResult<&mut Entity> {
        self.entities
            .get_mut(name)
            .ok_or_else(|| GraphError::EntityNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Check that `name` exists and carries `label`
    pub fn require_labeled(&self, label: &Label, name: &str) -> GraphResult<&Entity> {
        let entity = self.require(name)?;
        if !entity.has_label(label) {
            return Err(GraphError::LabeledEntityNotFound {
                label: label.clone(),
                name: name.to_string(),
            });
        }
        Ok(entity)
    }

    /// Remove an entity record and its label index entry
    ///
    /// Relationships are not this store's concern; callers must drop them
    /// first (see `GraphStore::delete_entity`).
    pub(crate) fn remove(&mut self, label: &Label, name: &str) -> GraphResult<Entity> {
        self.require_labeled(label, name)?;
        self.label_index.remove(label, name);
        self.entities
            .shift_remove(name)
            .ok_or_else(|| GraphError::EntityNotFound(name.to_string()))
    }

    /// Names of live entities carrying `label`
    pub fn members(&self, label: &Label) -> GraphResult<Vec<String>> {
        self.label_index
            .members(label)
            .map(|members| members.iter().cloned().collect())
            .ok_or_else(|| GraphError::LabelNotFound(label.clone()))
    }

    /// Names of entities whose bag maps `key` to exactly `value`
    pub fn with_property(&self, key: &str, value: &str) -> Vec<String> {
        self.entities
            .values()
            .filter(|entity| entity.properties.matches(key, value))
            .map(|entity| entity.name.clone())
            .collect()
    }

    pub fn label_index(&self) -> &LabelIndex {
        &self.label_index
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.label_index.clear();
    }
}
