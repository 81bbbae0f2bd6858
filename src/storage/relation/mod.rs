//! A single named relation: a directed graph of named entities kept in
//! (indegree descending, name ascending) order.
//!
//! Three structures are maintained together:
//!
//! - the entity order, an arena-backed linked sequence that also owns the
//!   entities,
//! - the name index, mapping names to entity handles,
//! - the degree index, one bucket per distinct indegree pointing at the first
//!   entity of its run.
//!
//! Every mutation changes an indegree by exactly one, so an entity only ever
//! moves to an adjacent bucket (see `order_ops`).

use crate::error::{GraphError, Result};
use crate::primitives::ordered_map::{OrderedMap, OrderedSet};
use crate::primitives::sequence::Sequence;
use crate::report::RelationReport;

use super::degree::{BucketId, DegreeBucket, DegreeIndex};
use super::entity::{Entity, EntityId};

mod edge_ops;
mod entity_ops;
mod order_ops;
mod tests;

/// One named relation and its degree-ordered entities.
#[derive(Debug)]
pub struct Relation {
    name: String,
    entities: Sequence<Entity>,
    name_index: OrderedMap<String, EntityId>,
    degrees: DegreeIndex,
    edge_count: usize,
}

impl Relation {
    /// Creates an empty relation.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: Sequence::new(),
            name_index: OrderedMap::new(),
            degrees: DegreeIndex::new(),
            edge_count: 0,
        }
    }

    /// Relation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` when the relation has no entities at all.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns `true` when `name` is an entity of this relation.
    pub fn contains_entity(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    /// Indegree of `name`, or `None` if it is not an entity here.
    pub fn indegree(&self, name: &str) -> Option<usize> {
        let id = self.lookup(name)?;
        self.entities.get(id.0).map(Entity::indegree)
    }

    /// Returns `true` when the edge `source -> target` exists.
    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        match (self.lookup(source), self.lookup(target)) {
            (Some(src), Some(dst)) => self
                .entities
                .get(dst.0)
                .is_some_and(|entity| entity.sources.contains(&src)),
            _ => false,
        }
    }

    /// Names of the in-neighbours of `name`, in handle order.
    pub fn sources_of(&self, name: &str) -> Vec<&str> {
        self.neighbour_names(name, |entity| &entity.sources)
    }

    /// Names of the out-neighbours of `name`, in handle order.
    pub fn destinations_of(&self, name: &str) -> Vec<&str> {
        self.neighbour_names(name, |entity| &entity.destinations)
    }

    fn neighbour_names<'a, F>(&'a self, name: &str, side: F) -> Vec<&'a str>
    where
        F: Fn(&'a Entity) -> &'a OrderedSet<EntityId>,
    {
        let Some(entity) = self.lookup(name).and_then(|id| self.entities.get(id.0)) else {
            return Vec::new();
        };
        side(entity)
            .iter()
            .filter_map(|id| self.entities.get(id.0))
            .map(Entity::name)
            .collect()
    }

    /// `(name, indegree)` pairs in entity order.
    pub fn entities(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.entities
            .iter()
            .map(|(_, entity)| (entity.name(), entity.indegree()))
    }

    /// `(value, first member name)` for every bucket, highest value first.
    pub fn degree_buckets(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.degrees.iter().map(|(_, bucket)| {
            let first = self.entities.get(bucket.first.0).map_or("", Entity::name);
            (bucket.value, first)
        })
    }

    /// Highest indegree present, or `None` for a relation with no entities.
    pub fn max_indegree(&self) -> Option<usize> {
        let head = self.degrees.head()?;
        self.degrees.get(head).ok().map(|bucket| bucket.value)
    }

    /// Entities tied for the maximum indegree.
    ///
    /// Returns `None` when the relation has no entity with a positive
    /// indegree.
    pub fn report(&self) -> Result<Option<RelationReport>> {
        let Some(head) = self.degrees.head() else {
            return Ok(None);
        };
        let bucket = self.degrees.get(head)?;
        if bucket.value == 0 {
            return Ok(None);
        }
        let entities = self
            .entities
            .iter_from(Some(bucket.first.0))
            .take_while(|(_, entity)| entity.bucket == Some(head))
            .map(|(_, entity)| entity.name.clone())
            .collect();
        Ok(Some(RelationReport {
            relation: self.name.clone(),
            entities,
            degree: bucket.value,
        }))
    }

    /// Drops every entity, edge and bucket.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.name_index.clear();
        self.degrees.clear();
        self.edge_count = 0;
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<EntityId> {
        self.name_index.get(name).copied()
    }

    pub(crate) fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.entities.get(id.0).ok_or_else(|| {
            GraphError::corruption(format!("relation {}: stale entity {id:?}", self.name))
        })
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        let name = &self.name;
        self.entities.get_mut(id.0).ok_or_else(|| {
            GraphError::corruption(format!("relation {name}: stale entity {id:?}"))
        })
    }

    pub(crate) fn bucket_of(&self, id: EntityId) -> Result<BucketId> {
        self.entity(id)?.bucket.ok_or_else(|| {
            GraphError::corruption(format!(
                "relation {}: entity {id:?} has no degree bucket",
                self.name
            ))
        })
    }

    pub(crate) fn order(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities.iter().map(|(id, entity)| (EntityId(id), entity))
    }

    pub(crate) fn buckets(&self) -> impl Iterator<Item = (BucketId, &DegreeBucket)> + '_ {
        self.degrees.iter()
    }

    pub(crate) fn degree_index(&self) -> &DegreeIndex {
        &self.degrees
    }

    pub(crate) fn name_entries(&self) -> impl Iterator<Item = (&String, &EntityId)> + '_ {
        self.name_index.iter()
    }

    pub(crate) fn name_index_len(&self) -> usize {
        self.name_index.len()
    }

    pub(crate) fn entity_by_id(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }
}
