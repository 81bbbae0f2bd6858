use smallvec::SmallVec;
use tracing::debug;

use crate::error::{GraphError, Result};
use crate::storage::entity::{Entity, EntityId};

use super::Relation;

/// Neighbour handles collected before a cascade; most entities have few.
type NeighbourBuf = SmallVec<[EntityId; 8]>;

impl Relation {
    /// Adds an entity with indegree 0.
    ///
    /// Returns `Ok(false)` without touching the relation when `name` is
    /// already an entity here.
    pub fn insert_entity(&mut self, name: &str) -> Result<bool> {
        if self.name_index.contains_key(name) {
            return Ok(false);
        }
        let id = EntityId(self.entities.allocate(Entity::new(name))?);

        // Indegree 0 is the lowest possible value, so its bucket can only be the tail.
        let zero_bucket = match self.degrees.tail() {
            Some(tail) if self.degrees.get(tail)?.value == 0 => Some(tail),
            _ => None,
        };
        match zero_bucket {
            Some(bucket) => self.place_in_bucket(id, bucket)?,
            None => self.place_in_new_bucket(id, 0, None)?,
        }
        self.name_index.insert(name.to_owned(), id);
        debug!(relation = %self.name, entity = name, "relation.entity.create");
        Ok(true)
    }

    /// Removes an entity and every edge incident to it.
    ///
    /// Returns `Ok(false)` when `name` is not an entity here.
    pub fn delete_entity(&mut self, name: &str) -> Result<bool> {
        let Some(id) = self.lookup(name) else {
            return Ok(false);
        };

        // Edges go first: unlinking them needs this entity's bucket to be intact.
        let sources: NeighbourBuf = self.entity(id)?.sources().collect();
        for source in sources {
            self.unlink_edge(source, id)?;
        }
        let destinations: NeighbourBuf = self.entity(id)?.destinations().collect();
        for destination in destinations {
            self.unlink_edge(id, destination)?;
        }

        let entity = self.entity(id)?;
        if entity.indegree() != 0 || entity.outdegree() != 0 {
            return Err(GraphError::corruption(format!(
                "relation {}: {name} still has edges after cascade",
                self.name
            )));
        }

        self.name_index.remove(name);
        self.remove_from_order(id)?;
        self.entities.remove(id.0)?;
        debug!(relation = %self.name, entity = name, "relation.entity.drop");
        Ok(true)
    }

    /// Handle for `name`, creating the entity first if needed.
    pub(crate) fn ensure_entity(&mut self, name: &str) -> Result<EntityId> {
        self.insert_entity(name)?;
        self.lookup(name).ok_or_else(|| {
            GraphError::corruption(format!(
                "relation {}: {name} missing from name index after insert",
                self.name
            ))
        })
    }
}
