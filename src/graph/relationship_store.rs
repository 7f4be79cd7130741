//! Relationship storage
//!
//! Relationships live in an arena addressed by `RelationshipId`. Two indices
//! refer into it by id only:
//! - outgoing: source -> (target, type) -> id, which enforces one relationship
//!   per triple and keeps creation order per source
//! - incoming: target -> ids, used to cascade deletes without a full scan

use super::entity_store::EntityStore;
use super::relationship::{Relationship, RelationshipRef, TypeFilter};
use super::store::{GraphError, GraphResult};
use super::types::{RelationType, RelationshipId};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::HashMap;

type OutgoingKey = (String, RelationType);

/// Result of asserting a relationship triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipAssertion {
    Created(RelationshipId),
    /// The triple already existed; its properties were left untouched
    AlreadyPresent(RelationshipId),
}

impl RelationshipAssertion {
    pub fn id(&self) -> RelationshipId {
        match self {
            RelationshipAssertion::Created(id) | RelationshipAssertion::AlreadyPresent(id) => *id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, RelationshipAssertion::Created(_))
    }
}

/// One outgoing hop from a source entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    pub name: String,
    pub relationship: RelationType,
}

#[derive(Debug, Default)]
pub struct RelationshipStore {
    /// Arena; a `None` slot is free and listed in `free_ids`
    slots: Vec<Option<Relationship>>,

    /// Free slot ids for reuse
    free_ids: Vec<u64>,

    outgoing: HashMap<String, IndexMap<OutgoingKey, RelationshipId>>,

    incoming: HashMap<String, IndexSet<RelationshipId>>,

    count: usize,
}

impl RelationshipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the relationship `source -[rel_type]-> target`
    ///
    /// Both endpoints must exist in `entities`. Re-asserting an existing
    /// triple is a no-op reported as `AlreadyPresent`.
    pub fn add(
        &mut self,
        entities: &EntityStore,
        source: &str,
        target: &str,
        rel_type: RelationType,
    ) -> GraphResult<RelationshipAssertion> {
        for endpoint in [source, target] {
            if !entities.contains(endpoint) {
                return Err(GraphError::EndpointNotFound(endpoint.to_string()));
            }
        }

        let key = (target.to_string(), rel_type);
        if let Some(&id) = self.outgoing.get(source).and_then(|out| out.get(&key)) {
            return Ok(RelationshipAssertion::AlreadyPresent(id));
        }

        let id = self.allocate_id();
        let relationship = Relationship::new(id, source, target, key.1.clone());

        let idx = id.as_u64() as usize;
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        self.slots[idx] = Some(relationship);

        self.outgoing
            .entry(source.to_string())
            .or_default()
            .insert(key, id);
        self.incoming
            .entry(target.to_string())
            .or_default()
            .insert(id);
        self.count += 1;

        Ok(RelationshipAssertion::Created(id))
    }

    fn allocate_id(&mut self) -> RelationshipId {
        match self.free_ids.pop() {
            Some(id) => RelationshipId::new(id),
            None => RelationshipId::new(self.slots.len() as u64),
        }
    }

    pub fn get(&self, id: RelationshipId) -> Option<&Relationship> {
        self.slots.get(id.as_u64() as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: RelationshipId) -> Option<&mut Relationship> {
        self.slots.get_mut(id.as_u64() as usize).and_then(Option::as_mut)
    }

    /// Look up the relationship for an exact triple
    pub fn find(&self, source: &str, target: &str, rel_type: &RelationType) -> Option<&Relationship> {
        let key = (target.to_string(), rel_type.clone());
        self.outgoing
            .get(source)
            .and_then(|out| out.get(&key))
            .and_then(|&id| self.get(id))
    }

    /// Ids of every relationship from `source` to `target`, oldest first
    fn ids_between(&self, source: &str, target: &str) -> Vec<RelationshipId> {
        self.outgoing
            .get(source)
            .map(|out| {
                out.iter()
                    .filter(|((t, _), _)| t == target)
                    .map(|(_, &id)| id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every relationship from `source` to `target`, oldest first
    pub fn between(&self, source: &str, target: &str) -> Vec<&Relationship> {
        self.ids_between(source, target)
            .into_iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// Resolve a possibly type-qualified reference to a single relationship
    ///
    /// Without a type the earliest-created relationship of the pair is chosen.
    pub fn resolve(&self, rel: &RelationshipRef) -> GraphResult<RelationshipId> {
        let ids = self.ids_between(&rel.source, &rel.target);
        if ids.is_empty() {
            return Err(GraphError::RelationshipNotFound {
                from: rel.source.clone(),
                to: rel.target.clone(),
            });
        }

        match &rel.rel_type {
            None => Ok(ids[0]),
            Some(rel_type) => ids
                .into_iter()
                .find(|&id| self.get(id).map(|r| &r.rel_type == rel_type).unwrap_or(false))
                .ok_or_else(|| GraphError::NoMatchingType {
                    from: rel.source.clone(),
                    to: rel.target.clone(),
                    types: rel_type.to_string(),
                }),
        }
    }

    /// Remove relationships from `source` to `target` accepted by `filter`
    pub fn remove_between(
        &mut self,
        source: &str,
        target: &str,
        filter: &TypeFilter,
    ) -> GraphResult<Vec<Relationship>> {
        let ids = self.ids_between(source, target);
        if ids.is_empty() {
            return Err(GraphError::RelationshipNotFound {
                from: source.to_string(),
                to: target.to_string(),
            });
        }

        let matching: Vec<RelationshipId> = ids
            .into_iter()
            .filter(|&id| self.get(id).map(|r| filter.accepts(&r.rel_type)).unwrap_or(false))
            .collect();
        if matching.is_empty() {
            return Err(GraphError::NoMatchingType {
                from: source.to_string(),
                to: target.to_string(),
                types: describe_filter(filter),
            });
        }

        Ok(matching.into_iter().filter_map(|id| self.detach(id)).collect())
    }

    /// Outgoing relationships of `source`, oldest first
    pub fn outgoing(&self, source: &str) -> Vec<&Relationship> {
        self.outgoing
            .get(source)
            .map(|out| out.values().filter_map(|&id| self.get(id)).collect())
            .unwrap_or_default()
    }

    /// Incoming relationships of `target`, oldest first
    pub fn incoming(&self, target: &str) -> Vec<&Relationship> {
        self.incoming
            .get(target)
            .map(|ids| ids.iter().filter_map(|&id| self.get(id)).collect())
            .unwrap_or_default()
    }

    /// One-hop neighbors of `source` over relationships accepted by `filter`
    ///
    /// Does not check that `source` exists as an entity.
    pub fn neighbors(&self, source: &str, filter: &TypeFilter) -> GraphResult<Vec<Neighbor>> {
        let outgoing = self.outgoing(source);
        if outgoing.is_empty() {
            return Err(GraphError::NoRelationships(source.to_string()));
        }

        let neighbors: Vec<Neighbor> = outgoing
            .into_iter()
            .filter(|rel| filter.accepts(&rel.rel_type))
            .map(|rel| Neighbor {
                name: rel.target.clone(),
                relationship: rel.rel_type.clone(),
            })
            .collect();

        if neighbors.is_empty() {
            return Err(GraphError::NoMatchingNeighbors {
                name: source.to_string(),
                types: describe_filter(filter),
            });
        }
        Ok(neighbors)
    }

    /// Drop every relationship where `name` is source or target
    ///
    /// Returns the number of relationships removed.
    pub(crate) fn drop_all_involving(&mut self, name: &str) -> usize {
        let mut ids: IndexSet<RelationshipId> = self
            .outgoing
            .get(name)
            .map(|out| out.values().copied().collect())
            .unwrap_or_default();
        if let Some(incoming) = self.incoming.get(name) {
            ids.extend(incoming.iter().copied());
        }

        ids.into_iter().filter_map(|id| self.detach(id)).count()
    }

    /// Unlink a relationship from the arena and both indices
    fn detach(&mut self, id: RelationshipId) -> Option<Relationship> {
        let relationship = self.slots.get_mut(id.as_u64() as usize)?.take()?;
        self.free_ids.push(id.as_u64());
        self.count -= 1;

        if let Some(out) = self.outgoing.get_mut(&relationship.source) {
            out.shift_remove(&(relationship.target.clone(), relationship.rel_type.clone()));
            if out.is_empty() {
                self.outgoing.remove(&relationship.source);
            }
        }
        if let Some(incoming) = self.incoming.get_mut(&relationship.target) {
            incoming.shift_remove(&id);
            if incoming.is_empty() {
                self.incoming.remove(&relationship.target);
            }
        }

        Some(relationship)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_ids.clear();
        self.outgoing.clear();
        self.incoming.clear();
        self.count = 0;
    }
}

fn describe_filter(filter: &TypeFilter) -> String {
    match filter {
        TypeFilter::All => "ALL".to_string(),
        TypeFilter::Only(types) => types
            .iter()
            .map(RelationType::as_str)
            .collect::<Vec<_>>()
            .join(", "),
    }
}
