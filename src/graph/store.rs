//! In-memory graph store
//!
//! `GraphStore` is the engine instance. It composes the entity store (with its
//! label index) and the relationship store, and is the only place where an
//! operation touches more than one of them. Every operation either succeeds or
//! fails before mutating anything.

use super::entity::Entity;
use super::entity_store::EntityStore;
use super::property::{KeySelector, PropertyRemoval};
use super::relationship::{Relationship, RelationshipRef, TypeFilter};
use super::relationship_store::{Neighbor, RelationshipAssertion, RelationshipStore};
use super::types::{Label, RelationType};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Entity \"{0}\" already exists")]
    DuplicateEntity(String),

    #[error("Entity \"{0}\" does not exist")]
    EntityNotFound(String),

    #[error("No entity \"{name}\" with label \"{label}\"")]
    LabeledEntityNotFound { label: Label, name: String },

    #[error("Label \"{0}\" does not exist")]
    LabelNotFound(Label),

    #[error("Relationship endpoint \"{0}\" does not exist")]
    EndpointNotFound(String),

    #[error("No relationship exists from \"{from}\" to \"{to}\"")]
    RelationshipNotFound { from: String, to: String },

    #[error("No relationship of type {types} from \"{from}\" to \"{to}\"")]
    NoMatchingType { from: String, to: String, types: String },

    #[error("None of the requested properties exist on {owner}")]
    NoMatchingProperty { owner: String },

    #[error("No entities match the requested properties")]
    NoMatchingEntities,

    #[error("No related entities of type {types} for \"{name}\"")]
    NoMatchingNeighbors { name: String, types: String },

    #[error("Entity \"{0}\" has no outgoing relationships")]
    NoRelationships(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Selected properties of one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub label: Label,
    pub name: String,
    /// Requested keys; `None` marks a key the entity does not have
    pub properties: IndexMap<String, Option<String>>,
}

/// Selected properties of one relationship
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipSnapshot {
    pub source: String,
    pub target: String,
    pub relationship: RelationType,
    pub properties: IndexMap<String, Option<String>>,
}

/// Entities matching one `key:value` pair of a property search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyMatch {
    pub key: String,
    pub value: String,
    pub entities: Vec<String>,
}

/// What a cascading entity delete removed
#[derive(Debug, Clone)]
pub struct EntityDeletion {
    pub entity: Entity,
    pub relationships_removed: usize,
}

/// Graph statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStatistics {
    pub entity_count: usize,
    pub relationship_count: usize,
    pub label_count: usize,
}

/// In-memory graph storage
///
/// Single owner, single thread of execution. Callers that share a store across
/// threads must hold one lock over the whole store: entity deletion touches
/// entities, relationships and the label index together.
#[derive(Debug, Default)]
pub struct GraphStore {
    entities: EntityStore,
    relationships: RelationshipStore,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Entities ----------------------------------------------------------

    /// Create an entity; fails with `DuplicateEntity` if the name is taken
    pub fn add_entity(&mut self, label: impl Into<Label>, name: &str) -> GraphResult<()> {
        let label = label.into();
        debug!(%label, name, "adding entity");
        self.entities.insert(label, name)
    }

    /// Insert or overwrite one entity property, returning the previous value
    pub fn set_property(&mut self, name: &str, key: &str, value: &str) -> GraphResult<Option<String>> {
        let entity = self.entities.require_mut(name)?;
        Ok(entity.set_property(key, value))
    }

    /// Insert or overwrite several entity properties at once
    pub fn set_properties(&mut self, name: &str, properties: &[(String, String)]) -> GraphResult<()> {
        let entity = self.entities.require_mut(name)?;
        for (key, value) in properties {
            entity.set_property(key.as_str(), value.as_str());
        }
        debug!(name, count = properties.len(), "set entity properties");
        Ok(())
    }

    pub fn get_properties(&self, name: &str, keys: &KeySelector) -> GraphResult<EntitySnapshot> {
        let entity = self.entities.require(name)?;
        Ok(EntitySnapshot {
            label: entity.label.clone(),
            name: entity.name.clone(),
            properties: entity.properties.select(keys),
        })
    }

    /// Delete entity properties
    ///
    /// With an explicit key list, fails with `NoMatchingProperty` when none of
    /// the keys existed.
    pub fn delete_properties(&mut self, name: &str, keys: &KeySelector) -> GraphResult<PropertyRemoval> {
        let entity = self.entities.require_mut(name)?;
        let removal = entity.properties.remove_selected(keys);
        if !removal.any_found() {
            return Err(GraphError::NoMatchingProperty {
                owner: format!("entity \"{}\"", name),
            });
        }
        debug!(name, all = keys.is_all(), "deleted entity properties");
        Ok(removal)
    }

    /// Delete an entity and every relationship it takes part in
    ///
    /// `label` must be the entity's label. All checks run before any removal,
    /// so a failed call changes nothing.
    pub fn delete_entity(&mut self, label: impl Into<Label>, name: &str) -> GraphResult<EntityDeletion> {
        let label = label.into();
        self.entities.require_labeled(&label, name)?;

        let incoming = self.relationships.incoming(name).len();
        let relationships_removed = self.relationships.drop_all_involving(name);
        let entity = self.entities.remove(&label, name)?;

        info!(%label, name, relationships_removed, incoming, "deleted entity");
        Ok(EntityDeletion {
            entity,
            relationships_removed,
        })
    }

    /// Names of entities carrying `label`; `LabelNotFound` if there are none
    pub fn find_by_label(&self, label: &Label) -> GraphResult<Vec<String>> {
        self.entities.members(label)
    }

    /// Find entities by exact property match
    ///
    /// Each pair is matched independently and yields one group if anything
    /// matched it. Fails with `NoMatchingEntities` when no pair matched.
    pub fn find_by_property(&self, pairs: &[(String, String)]) -> GraphResult<Vec<PropertyMatch>> {
        let matches: Vec<PropertyMatch> = pairs
            .iter()
            .filter_map(|(key, value)| {
                let entities = self.entities.with_property(key, value);
                if entities.is_empty() {
                    None
                } else {
                    Some(PropertyMatch {
                        key: key.clone(),
                        value: value.clone(),
                        entities,
                    })
                }
            })
            .collect();

        if matches.is_empty() {
            return Err(GraphError::NoMatchingEntities);
        }
        Ok(matches)
    }

    // ---- Relationships -----------------------------------------------------

    /// Create `source -[rel_type]-> target`, or confirm it already exists
    pub fn add_relationship(
        &mut self,
        source: &str,
        target: &str,
        rel_type: impl Into<RelationType>,
    ) -> GraphResult<RelationshipAssertion> {
        let rel_type = rel_type.into();
        debug!(source, target, %rel_type, "adding relationship");
        self.relationships.add(&self.entities, source, target, rel_type)
    }

    pub fn set_relationship_property(
        &mut self,
        rel: &RelationshipRef,
        key: &str,
        value: &str,
    ) -> GraphResult<Option<String>> {
        let relationship = self.resolve_mut(rel)?;
        Ok(relationship.properties.set(key, value))
    }

    pub fn set_relationship_properties(
        &mut self,
        rel: &RelationshipRef,
        properties: &[(String, String)],
    ) -> GraphResult<()> {
        let relationship = self.resolve_mut(rel)?;
        for (key, value) in properties {
            relationship.properties.set(key.as_str(), value.as_str());
        }
        debug!(
            source = rel.source.as_str(),
            target = rel.target.as_str(),
            count = properties.len(),
            "set relationship properties"
        );
        Ok(())
    }

    pub fn get_relationship_properties(
        &self,
        rel: &RelationshipRef,
        keys: &KeySelector,
    ) -> GraphResult<RelationshipSnapshot> {
        let id = self.relationships.resolve(rel)?;
        let relationship = self
            .relationships
            .get(id)
            .ok_or_else(|| relationship_not_found(rel))?;
        Ok(RelationshipSnapshot {
            source: relationship.source.clone(),
            target: relationship.target.clone(),
            relationship: relationship.rel_type.clone(),
            properties: relationship.properties.select(keys),
        })
    }

    pub fn delete_relationship_properties(
        &mut self,
        rel: &RelationshipRef,
        keys: &KeySelector,
    ) -> GraphResult<PropertyRemoval> {
        let relationship = self.resolve_mut(rel)?;
        let removal = relationship.properties.remove_selected(keys);
        if !removal.any_found() {
            return Err(GraphError::NoMatchingProperty {
                owner: format!(
                    "relationship \"{}\" -[{}]-> \"{}\"",
                    relationship.source, relationship.rel_type, relationship.target
                ),
            });
        }
        Ok(removal)
    }

    /// Delete relationships from `source` to `target` whose type passes `filter`
    pub fn delete_relationship(
        &mut self,
        source: &str,
        target: &str,
        filter: &TypeFilter,
    ) -> GraphResult<Vec<Relationship>> {
        let removed = self.relationships.remove_between(source, target, filter)?;
        debug!(source, target, removed = removed.len(), "deleted relationships");
        Ok(removed)
    }

    /// One-hop outgoing neighbors of `source`
    pub fn neighbors(&self, source: &str, filter: &TypeFilter) -> GraphResult<Vec<Neighbor>> {
        self.entities.require(source)?;
        self.relationships.neighbors(source, filter)
    }

    fn resolve_mut(&mut self, rel: &RelationshipRef) -> GraphResult<&mut Relationship> {
        let id = self.relationships.resolve(rel)?;
        self.relationships
            .get_mut(id)
            .ok_or_else(|| relationship_not_found(rel))
    }

    // ---- Accessors ---------------------------------------------------------

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn relationship(&self, source: &str, target: &str, rel_type: &RelationType) -> Option<&Relationship> {
        self.relationships.find(source, target, rel_type)
    }

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn relationships(&self) -> &RelationshipStore {
        &self.relationships
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn statistics(&self) -> GraphStatistics {
        GraphStatistics {
            entity_count: self.entities.len(),
            relationship_count: self.relationships.len(),
            label_count: self.entities.label_index().label_count(),
        }
    }

    /// Clear all data
    pub fn clear(&mut self) {
        self.relationships.clear();
        self.entities.clear();
    }
}

fn relationship_not_found(rel: &RelationshipRef) -> GraphError {
    GraphError::RelationshipNotFound {
        from: rel.source.clone(),
        to: rel.target.clone(),
    }
}
