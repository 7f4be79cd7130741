//! Core graph engine
//!
//! This module implements the property graph data model with:
//! - Entities with a unique name, one label and string properties
//! - Directed, typed relationships with string properties, one per
//!   (source, target, type) triple
//! - A label index kept in step with entity creation and deletion
//! - Cascading deletes so no relationship outlives either endpoint

pub mod entity;
pub mod entity_store;
pub mod label_index;
pub mod property;
pub mod relationship;
pub mod relationship_store;
pub mod store;
pub mod types;

// Re-export main types
pub use entity::Entity;
pub use entity_store::EntityStore;
pub use label_index::LabelIndex;
pub use property::{KeyRemoval, KeySelector, PropertyBag, PropertyRemoval, WILDCARD};
pub use relationship::{Relationship, RelationshipRef, TypeFilter};
pub use relationship_store::{Neighbor, RelationshipAssertion, RelationshipStore};
pub use store::{
    EntityDeletion, EntitySnapshot, GraphError, GraphResult, GraphStatistics, GraphStore,
    PropertyMatch, RelationshipSnapshot,
};
pub use types::{Label, RelationType, RelationshipId};
