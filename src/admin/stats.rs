use serde::Serialize;

use crate::storage::RelationSet;

/// Counters over a whole relation set.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    /// Relations ever created, including empty ones.
    pub relations: usize,
    /// Globally known entity names.
    pub known_names: usize,
    /// Relations with at least one positive indegree.
    pub non_empty_relations: usize,
    /// One entry per relation, in name order.
    pub per_relation: Vec<RelationStats>,
}

/// Counters for one relation.
#[derive(Debug, Clone, Serialize)]
pub struct RelationStats {
    /// Relation name.
    pub name: String,
    /// Entities in the relation.
    pub entities: usize,
    /// Edges in the relation.
    pub edges: usize,
    /// Distinct indegree values present.
    pub buckets: usize,
    /// 0 for a relation without entities.
    pub max_indegree: usize,
}

/// Collects [`StatsReport`] counters.
pub fn stats(set: &RelationSet) -> StatsReport {
    let per_relation: Vec<RelationStats> = set
        .relations()
        .map(|relation| RelationStats {
            name: relation.name().to_owned(),
            entities: relation.len(),
            edges: relation.edge_count(),
            buckets: relation.degree_index().len(),
            max_indegree: relation.max_indegree().unwrap_or(0),
        })
        .collect();
    StatsReport {
        relations: per_relation.len(),
        known_names: set.known_names().count(),
        non_empty_relations: per_relation
            .iter()
            .filter(|relation| relation.max_indegree > 0)
            .count(),
        per_relation,
    }
}
