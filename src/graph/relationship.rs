//! Relationship records
//!
//! A relationship is a directed, typed edge between two entities. At most one
//! relationship exists per `(source, target, type)` triple.

use super::property::{PropertyBag, WILDCARD};
use super::types::{RelationType, RelationshipId};
use serde::{Deserialize, Serialize};

/// A directed edge in the property graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// Arena slot of this relationship
    pub id: RelationshipId,

    /// Source entity name (edge goes FROM this entity)
    pub source: String,

    /// Target entity name (edge goes TO this entity)
    pub target: String,

    /// Type of relationship (e.g., "friend")
    pub rel_type: RelationType,

    /// Properties associated with this relationship
    pub properties: PropertyBag,
}

impl Relationship {
    pub fn new(
        id: RelationshipId,
        source: impl Into<String>,
        target: impl Into<String>,
        rel_type: impl Into<RelationType>,
    ) -> Self {
        Relationship {
            id,
            source: source.into(),
            target: target.into(),
            rel_type: rel_type.into(),
            properties: PropertyBag::new(),
        }
    }

    /// Check if this relationship goes FROM a specific entity
    pub fn starts_from(&self, name: &str) -> bool {
        self.source == name
    }

    /// Check if this relationship goes TO a specific entity
    pub fn ends_at(&self, name: &str) -> bool {
        self.target == name
    }

    /// Check if either endpoint is `name`
    pub fn involves(&self, name: &str) -> bool {
        self.starts_from(name) || self.ends_at(name)
    }
}

impl PartialEq for Relationship {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Relationship {}

impl std::hash::Hash for Relationship {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Reference to a relationship by its ordered endpoint pair
///
/// The type is optional; an untyped reference addresses the earliest-created
/// relationship between the pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipRef {
    pub source: String,
    pub target: String,
    pub rel_type: Option<RelationType>,
}

impl RelationshipRef {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        RelationshipRef {
            source: source.into(),
            target: target.into(),
            rel_type: None,
        }
    }

    pub fn typed(
        source: impl Into<String>,
        target: impl Into<String>,
        rel_type: impl Into<RelationType>,
    ) -> Self {
        RelationshipRef {
            source: source.into(),
            target: target.into(),
            rel_type: Some(rel_type.into()),
        }
    }
}

/// Which relationship types an operation applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeFilter {
    /// Every type (`ALL`, or no types given)
    All,
    /// Only these types
    Only(Vec<RelationType>),
}

impl TypeFilter {
    /// Build a filter from already-trimmed fields
    ///
    /// No fields, or a lone `ALL`, selects every type.
    pub fn from_fields(fields: Vec<String>) -> Self {
        if fields.is_empty() || (fields.len() == 1 && fields[0] == WILDCARD) {
            TypeFilter::All
        } else {
            TypeFilter::Only(fields.into_iter().map(RelationType::from).collect())
        }
    }

    pub fn single(rel_type: impl Into<RelationType>) -> Self {
        TypeFilter::Only(vec![rel_type.into()])
    }

    pub fn accepts(&self, rel_type: &RelationType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(types) => types.contains(rel_type),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, TypeFilter::All)
    }
}
