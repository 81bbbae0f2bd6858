//! Degree buckets: one per distinct indegree, highest first.

use tracing::debug;

use crate::error::{GraphError, Result};
use crate::primitives::sequence::{Sequence, SlotId};

use super::entity::EntityId;

/// Stable handle to a degree bucket.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct BucketId(pub(crate) SlotId);

/// All entities of one relation that share an indegree.
///
/// Members form a contiguous, name-ascending run of the entity order that
/// starts at `first`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DegreeBucket {
    /// Indegree shared by every member.
    pub value: usize,
    /// First member in entity order.
    pub first: EntityId,
}

/// Buckets of one relation ordered from highest to lowest value.
#[derive(Debug, Default)]
pub struct DegreeIndex {
    buckets: Sequence<DegreeBucket>,
}

impl DegreeIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `true` when there are no buckets (the relation has no entities).
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Bucket with the highest value.
    pub fn head(&self) -> Option<BucketId> {
        self.buckets.head().map(BucketId)
    }

    /// Bucket with the lowest value.
    pub fn tail(&self) -> Option<BucketId> {
        self.buckets.tail().map(BucketId)
    }

    /// Neighbour with the next higher value.
    pub fn higher(&self, id: BucketId) -> Option<BucketId> {
        self.buckets.prev(id.0).map(BucketId)
    }

    /// Neighbour with the next lower value.
    pub fn lower(&self, id: BucketId) -> Option<BucketId> {
        self.buckets.next(id.0).map(BucketId)
    }

    /// Bucket behind `id`; a stale handle is reported as corruption.
    pub fn get(&self, id: BucketId) -> Result<&DegreeBucket> {
        self.buckets
            .get(id.0)
            .ok_or_else(|| GraphError::corruption(format!("stale degree bucket {id:?}")))
    }

    pub(crate) fn get_mut(&mut self, id: BucketId) -> Result<&mut DegreeBucket> {
        self.buckets
            .get_mut(id.0)
            .ok_or_else(|| GraphError::corruption(format!("stale degree bucket {id:?}")))
    }

    /// Creates a bucket immediately above `lower`, or at the tail when
    /// `lower` is `None`.
    pub(crate) fn insert_before(
        &mut self,
        lower: Option<BucketId>,
        bucket: DegreeBucket,
    ) -> Result<BucketId> {
        let id = BucketId(self.buckets.insert_before(lower.map(|b| b.0), bucket)?);
        debug!(value = bucket.value, bucket = ?id, "degree.bucket.create");
        Ok(id)
    }

    pub(crate) fn remove(&mut self, id: BucketId) -> Result<DegreeBucket> {
        let bucket = self.buckets.remove(id.0)?;
        debug!(value = bucket.value, bucket = ?id, "degree.bucket.drop");
        Ok(bucket)
    }

    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Buckets from highest to lowest value.
    pub fn iter(&self) -> impl Iterator<Item = (BucketId, &DegreeBucket)> + '_ {
        self.buckets.iter().map(|(id, bucket)| (BucketId(id), bucket))
    }
}
