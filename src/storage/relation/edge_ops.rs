use tracing::trace;

use crate::error::Result;
use crate::storage::entity::EntityId;

use super::order_ops::Shift;
use super::Relation;

impl Relation {
    /// Adds the edge `source -> target`, creating missing entities.
    ///
    /// Returns `Ok(false)` when the edge already exists.
    pub fn insert_edge(&mut self, source: &str, target: &str) -> Result<bool> {
        let src = self.ensure_entity(source)?;
        let dst = self.ensure_entity(target)?;
        let inserted = self.link_edge(src, dst)?;
        if inserted {
            trace!(relation = %self.name, source, target, "relation.edge.insert");
        }
        Ok(inserted)
    }

    /// Removes the edge `source -> target`.
    ///
    /// Returns `Ok(false)` when either entity or the edge is absent. Entities
    /// are never removed here, even when left without edges.
    pub fn delete_edge(&mut self, source: &str, target: &str) -> Result<bool> {
        let (Some(src), Some(dst)) = (self.lookup(source), self.lookup(target)) else {
            return Ok(false);
        };
        let removed = self.unlink_edge(src, dst)?;
        if removed {
            trace!(relation = %self.name, source, target, "relation.edge.delete");
        }
        Ok(removed)
    }

    pub(crate) fn link_edge(&mut self, src: EntityId, dst: EntityId) -> Result<bool> {
        if !self.entity_mut(dst)?.sources.insert(src) {
            return Ok(false);
        }
        self.entity_mut(src)?.destinations.insert(dst);
        self.edge_count += 1;
        self.rebucket(dst, Shift::Up)?;
        Ok(true)
    }

    pub(crate) fn unlink_edge(&mut self, src: EntityId, dst: EntityId) -> Result<bool> {
        if !self.entity_mut(dst)?.sources.remove(&src) {
            return Ok(false);
        }
        self.entity_mut(src)?.destinations.remove(&dst);
        self.edge_count -= 1;
        self.rebucket(dst, Shift::Down)?;
        Ok(true)
    }
}
