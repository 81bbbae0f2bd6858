//! Entities and their adjacency sets.

use crate::primitives::ordered_map::OrderedSet;
use crate::primitives::sequence::SlotId;

use super::degree::BucketId;

/// Stable handle to an entity inside one relation.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct EntityId(pub(crate) SlotId);

/// One named participant in one relation.
///
/// Adjacency sets hold handles into the owning relation's arena; they never
/// refer to entities of another relation.
#[derive(Debug)]
pub struct Entity {
    pub(crate) name: String,
    pub(crate) sources: OrderedSet<EntityId>,
    pub(crate) destinations: OrderedSet<EntityId>,
    pub(crate) bucket: Option<BucketId>,
}

impl Entity {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            sources: OrderedSet::new(),
            destinations: OrderedSet::new(),
            bucket: None,
        }
    }

    /// Entity name, unique within its relation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of distinct entities with an edge into this one.
    pub fn indegree(&self) -> usize {
        self.sources.len()
    }

    /// Number of distinct entities this one has an edge into.
    pub fn outdegree(&self) -> usize {
        self.destinations.len()
    }

    /// In-neighbours.
    pub fn sources(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.sources.iter().copied()
    }

    /// Out-neighbours.
    pub fn destinations(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.destinations.iter().copied()
    }

    /// Degree bucket currently holding this entity.
    pub fn bucket(&self) -> Option<BucketId> {
        self.bucket
    }
}
