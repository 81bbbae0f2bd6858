//! The set of all relations plus the global known-name registry.

use tracing::debug;

use crate::error::{GraphError, Result};
use crate::primitives::ordered_map::{OrderedMap, OrderedSet};
use crate::report::Report;

use super::relation::Relation;

/// Every relation plus the global set of known entity names.
///
/// This is the façade the command layer drives: names must be registered
/// with [`RelationSet::add_entity`] before they can take part in an edge.
#[derive(Debug, Default)]
pub struct RelationSet {
    relations: OrderedMap<String, Relation>,
    known_names: OrderedSet<String>,
}

impl RelationSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` globally. Returns `false` if it was already known.
    pub fn add_entity(&mut self, name: &str) -> bool {
        let added = self.known_names.insert(name.to_owned());
        if added {
            debug!(entity = name, "relation_set.name.add");
        }
        added
    }

    /// Forgets `name` and removes it, with all incident edges, from every
    /// relation. Returns `false` if the name was not known.
    pub fn delete_entity(&mut self, name: &str) -> Result<bool> {
        self.relations
            .try_for_each_mut(|_, relation| relation.delete_entity(name).map(|_| ()))?;
        let removed = self.known_names.remove(name);
        if removed {
            debug!(entity = name, "relation_set.name.drop");
        }
        Ok(removed)
    }

    /// Adds `source -> target` to `relation`, creating the relation on first
    /// use. Both names must already be known; otherwise nothing happens.
    pub fn add_edge(&mut self, source: &str, target: &str, relation: &str) -> Result<bool> {
        if !self.is_known(source) || !self.is_known(target) {
            return Ok(false);
        }
        if !self.relations.contains_key(relation) {
            self.relations
                .insert(relation.to_owned(), Relation::new(relation));
            debug!(relation, "relation_set.relation.create");
        }
        let rel = self.relations.get_mut(relation).ok_or_else(|| {
            GraphError::corruption(format!("relation {relation} vanished after insert"))
        })?;
        rel.insert_edge(source, target)
    }

    /// Removes `source -> target` from `relation` if both exist.
    pub fn delete_edge(&mut self, source: &str, target: &str, relation: &str) -> Result<bool> {
        match self.relations.get_mut(relation) {
            Some(rel) => rel.delete_edge(source, target),
            None => Ok(false),
        }
    }

    /// Maximum-indegree report over every relation, in relation-name order.
    /// Relations without a positive indegree are skipped.
    pub fn report(&self) -> Result<Report> {
        let mut report = Report::default();
        for relation in self.relations.values() {
            if let Some(entry) = relation.report()? {
                report.push(entry);
            }
        }
        Ok(report)
    }

    /// Relation named `name`.
    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    /// Relations in name order, including empty ones.
    pub fn relations(&self) -> impl Iterator<Item = &Relation> + '_ {
        self.relations.values()
    }

    /// Number of relations ever created.
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Returns `true` when `name` is a known entity name.
    pub fn is_known(&self, name: &str) -> bool {
        self.known_names.contains(name)
    }

    /// Known names in ascending order.
    pub fn known_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.known_names.iter().map(String::as_str)
    }

    /// Drops every relation and known name.
    pub fn clear(&mut self) {
        self.relations.clear();
        self.known_names.clear();
        debug!("relation_set.clear");
    }
}
