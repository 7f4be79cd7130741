//! Entity records
//!
//! An entity is a named graph node with exactly one label and a property bag.

use super::property::PropertyBag;
use super::types::Label;
use serde::{Deserialize, Serialize};

/// A node in the property graph
///
/// The name is globally unique within a store; equality and hashing use the
/// name alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique name of this entity
    pub name: String,

    /// Type tag, e.g. "Person"
    pub label: Label,

    /// Properties associated with this entity
    pub properties: PropertyBag,
}

impl Entity {
    pub fn new(label: impl Into<Label>, name: impl Into<String>) -> Self {
        Entity {
            name: name.into(),
            label: label.into(),
            properties: PropertyBag::new(),
        }
    }

    pub fn has_label(&self, label: &Label) -> bool {
        &self.label == label
    }

    /// Set a property value, returning the previous one
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.properties.set(key, value)
    }

    pub fn get_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key)
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Entity {}

impl std::hash::Hash for Entity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
