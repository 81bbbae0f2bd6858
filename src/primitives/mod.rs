//! In-memory building blocks for the relation engine.
//!
//! Both primitives own their nodes outright and hand out values or handles;
//! neither knows anything about entities or degrees.

/// Height-balanced ordered map and set with a pluggable comparator.
///
/// Backs the global name set, per-relation name lookup, and per-entity
/// adjacency sets.
pub mod ordered_map;

/// Arena-backed doubly linked sequence with stable handles.
///
/// Backs both the per-relation entity order and the degree-bucket list.
pub mod sequence;
