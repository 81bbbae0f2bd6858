//! In-memory relation storage.
//!
//! [`RelationSet`] owns every [`Relation`]; each relation owns its entities
//! and degree buckets and hands out only handles to them.

pub mod degree;
pub mod entity;
pub mod relation;
pub mod relation_set;

pub use degree::{BucketId, DegreeBucket, DegreeIndex};
pub use entity::{Entity, EntityId};
pub use relation::Relation;
pub use relation_set::RelationSet;
