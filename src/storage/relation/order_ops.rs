use tracing::trace;

use crate::error::{GraphError, Result};
use crate::storage::degree::{BucketId, DegreeBucket};
use crate::storage::entity::EntityId;

use super::Relation;

/// Direction of a single-step indegree change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Shift {
    Up,
    Down,
}

impl Relation {
    /// Moves `id` into the bucket matching its indegree after a ±1 change.
    ///
    /// The caller has already updated the adjacency sets; the entity's bucket
    /// still holds the previous indegree.
    pub(crate) fn rebucket(&mut self, id: EntityId, shift: Shift) -> Result<()> {
        let current = self.bucket_of(id)?;
        let old = self.degrees.get(current)?.value;
        let (target, neighbour) = match shift {
            Shift::Up => (old + 1, self.degrees.higher(current)),
            Shift::Down => {
                let target = old.checked_sub(1).ok_or_else(|| {
                    GraphError::corruption(format!(
                        "relation {}: indegree underflow on {id:?}",
                        self.name
                    ))
                })?;
                (target, self.degrees.lower(current))
            }
        };
        let actual = self.entity(id)?.indegree();
        if actual != target {
            return Err(GraphError::corruption(format!(
                "relation {}: {id:?} has indegree {actual}, bucket expects {target}",
                self.name
            )));
        }

        // `current` may disappear here; `neighbour` is a different bucket and survives.
        self.remove_from_order(id)?;

        match neighbour {
            Some(bucket) if self.degrees.get(bucket)?.value == target => {
                self.place_in_bucket(id, bucket)?;
            }
            _ => {
                let lower = match shift {
                    Shift::Up => match neighbour {
                        Some(higher) => self.degrees.lower(higher),
                        None => self.degrees.head(),
                    },
                    Shift::Down => neighbour,
                };
                self.place_in_new_bucket(id, target, lower)?;
            }
        }
        trace!(relation = %self.name, entity = ?id, from = old, to = target, "relation.rebucket");
        Ok(())
    }

    /// Detaches `id` from the entity order, fixing up or dropping its bucket.
    pub(crate) fn remove_from_order(&mut self, id: EntityId) -> Result<()> {
        let bucket = self.bucket_of(id)?;
        if self.degrees.get(bucket)?.first == id {
            let successor = match self.entities.next(id.0).map(EntityId) {
                Some(next) if self.entity(next)?.bucket == Some(bucket) => Some(next),
                _ => None,
            };
            match successor {
                Some(next) => self.degrees.get_mut(bucket)?.first = next,
                None => {
                    self.degrees.remove(bucket)?;
                }
            }
        }
        self.entities.unlink(id.0)?;
        self.entity_mut(id)?.bucket = None;
        Ok(())
    }

    /// Links a detached entity into the run of an existing bucket, keeping the
    /// run sorted by name.
    pub(crate) fn place_in_bucket(&mut self, id: EntityId, bucket: BucketId) -> Result<()> {
        let first = self.degrees.get(bucket)?.first;
        let position = {
            let name = self.entity(id)?.name.as_str();
            self.entities.find_from(Some(first.0), |_, other| {
                other.bucket != Some(bucket) || other.name.as_str() > name
            })
        };
        self.entities.link_before(id.0, position)?;
        if position == Some(first.0) {
            self.degrees.get_mut(bucket)?.first = id;
        }
        self.entity_mut(id)?.bucket = Some(bucket);
        Ok(())
    }

    /// Links a detached entity as the sole member of a new bucket placed
    /// immediately above `lower` (or at the tail when `lower` is `None`).
    pub(crate) fn place_in_new_bucket(
        &mut self,
        id: EntityId,
        value: usize,
        lower: Option<BucketId>,
    ) -> Result<()> {
        let anchor = match lower {
            Some(bucket) => Some(self.degrees.get(bucket)?.first),
            None => None,
        };
        self.entities.link_before(id.0, anchor.map(|entity| entity.0))?;
        let bucket = self
            .degrees
            .insert_before(lower, DegreeBucket { value, first: id })?;
        self.entity_mut(id)?.bucket = Some(bucket);
        Ok(())
    }
}
