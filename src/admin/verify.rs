use serde::Serialize;

use crate::storage::{EntityId, Relation, RelationSet};

const MAX_FINDINGS: usize = 32;

/// Indicates the severity level of a verification finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifySeverity {
    /// Informational message about the verification process.
    Info,
    /// Broken invariant.
    Error,
}

/// Represents a single issue discovered during verification.
#[derive(Clone, Debug, Serialize)]
pub struct VerifyFinding {
    /// The severity level of this finding.
    pub severity: VerifySeverity,
    /// Relation the finding belongs to, if any.
    pub relation: Option<String>,
    /// Human-readable description of the issue.
    pub message: String,
}

/// Statistics collected during the verification process.
#[derive(Clone, Debug, Default, Serialize)]
pub struct VerifyCounts {
    /// Relations examined.
    pub relations: u64,
    /// Entities walked in entity order.
    pub entities: u64,
    /// Edges counted from in-neighbour sets.
    pub edges: u64,
    /// Degree buckets walked.
    pub buckets: u64,
}

/// Complete report of a verification pass.
#[derive(Clone, Debug, Serialize)]
pub struct VerifyReport {
    /// Whether verification passed without finding any issues.
    pub success: bool,
    /// Issues discovered, capped at a fixed number.
    pub findings: Vec<VerifyFinding>,
    /// Statistics about the data structures examined.
    pub counts: VerifyCounts,
}

impl VerifyReport {
    /// First error message, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.findings
            .iter()
            .find(|finding| finding.severity == VerifySeverity::Error)
            .map(|finding| finding.message.as_str())
    }
}

struct Findings<'a> {
    relation: &'a str,
    out: &'a mut Vec<VerifyFinding>,
    truncated: &'a mut bool,
}

impl Findings<'_> {
    fn error(&mut self, message: impl Into<String>) {
        if self.out.len() >= MAX_FINDINGS {
            *self.truncated = true;
            return;
        }
        self.out.push(VerifyFinding {
            severity: VerifySeverity::Error,
            relation: Some(self.relation.to_owned()),
            message: message.into(),
        });
    }
}

/// Checks every structural invariant of a relation set.
///
/// Covered: entity order (indegree descending, then name ascending), bucket
/// values against in-neighbour counts, bucket `first` pointers, distinct and
/// descending bucket values, name index against entity order, adjacency
/// symmetry, and membership of every entity name in the known-name set.
pub fn verify(set: &RelationSet) -> VerifyReport {
    let mut findings = Vec::new();
    let mut counts = VerifyCounts::default();
    let mut truncated = false;

    for relation in set.relations() {
        counts.relations += 1;
        let mut sink = Findings {
            relation: relation.name(),
            out: &mut findings,
            truncated: &mut truncated,
        };
        check_relation(relation, &mut sink, &mut counts);
        for (name, _) in relation.entities() {
            if !set.is_known(name) {
                sink.error(format!("entity {name} is not a known name"));
            }
        }
    }

    let success = findings.is_empty();
    if truncated {
        findings.push(VerifyFinding {
            severity: VerifySeverity::Info,
            relation: None,
            message: format!("findings truncated after {MAX_FINDINGS}"),
        });
    }
    VerifyReport {
        success,
        findings,
        counts,
    }
}

/// Checks one relation in isolation; returns the error messages found.
pub fn verify_relation(relation: &Relation) -> Vec<String> {
    let mut findings = Vec::new();
    let mut truncated = false;
    let mut counts = VerifyCounts::default();
    let mut sink = Findings {
        relation: relation.name(),
        out: &mut findings,
        truncated: &mut truncated,
    };
    check_relation(relation, &mut sink, &mut counts);
    findings.into_iter().map(|finding| finding.message).collect()
}

fn check_relation(relation: &Relation, sink: &mut Findings<'_>, counts: &mut VerifyCounts) {
    check_order_and_buckets(relation, sink, counts);
    check_bucket_list(relation, sink, counts);
    check_name_index(relation, sink);
    check_symmetry(relation, sink, counts);
}

fn check_order_and_buckets(
    relation: &Relation,
    sink: &mut Findings<'_>,
    counts: &mut VerifyCounts,
) {
    let degrees = relation.degree_index();
    let mut prev: Option<(&str, usize, EntityId)> = None;
    let mut walked = 0usize;

    for (id, entity) in relation.order() {
        walked += 1;
        counts.entities += 1;
        let indegree = entity.indegree();

        match entity.bucket() {
            None => sink.error(format!("{} has no degree bucket", entity.name())),
            Some(bucket_id) => match degrees.get(bucket_id) {
                Err(_) => sink.error(format!("{} points at a stale bucket", entity.name())),
                Ok(bucket) => {
                    if bucket.value != indegree {
                        sink.error(format!(
                            "{} has indegree {indegree} but sits in bucket {}",
                            entity.name(),
                            bucket.value
                        ));
                    }
                    let starts_run = match prev {
                        Some((_, _, prev_id)) => relation
                            .entity_by_id(prev_id)
                            .and_then(|p| p.bucket())
                            != Some(bucket_id),
                        None => true,
                    };
                    if starts_run && bucket.first != id {
                        sink.error(format!(
                            "bucket {} does not start at its first member {}",
                            bucket.value,
                            entity.name()
                        ));
                    }
                    if !starts_run && bucket.first == id {
                        sink.error(format!(
                            "bucket {} starts at {} which is not first in its run",
                            bucket.value,
                            entity.name()
                        ));
                    }
                }
            },
        }

        if let Some((prev_name, prev_degree, _)) = prev {
            let ordered = prev_degree > indegree
                || (prev_degree == indegree && prev_name < entity.name());
            if !ordered {
                sink.error(format!(
                    "order violated between {prev_name} ({prev_degree}) and {} ({indegree})",
                    entity.name()
                ));
            }
        }
        prev = Some((entity.name(), indegree, id));
    }

    if walked != relation.len() {
        sink.error(format!(
            "entity order walked {walked} entities but reports {}",
            relation.len()
        ));
    }
}

fn check_bucket_list(relation: &Relation, sink: &mut Findings<'_>, counts: &mut VerifyCounts) {
    let mut prev_value: Option<usize> = None;
    let mut last: Option<usize> = None;
    for (_, bucket) in relation.buckets() {
        counts.buckets += 1;
        if let Some(prev) = prev_value {
            if prev <= bucket.value {
                sink.error(format!(
                    "bucket values not strictly descending: {prev} then {}",
                    bucket.value
                ));
            }
        }
        match relation.entity_by_id(bucket.first) {
            None => sink.error(format!("bucket {} points at a stale entity", bucket.value)),
            Some(first) if first.indegree() != bucket.value => sink.error(format!(
                "bucket {} first member {} has indegree {}",
                bucket.value,
                first.name(),
                first.indegree()
            )),
            Some(_) => {}
        }
        prev_value = Some(bucket.value);
        last = Some(bucket.value);
    }
    if relation.is_empty() != relation.degree_index().is_empty() {
        sink.error("degree index and entity order disagree on emptiness");
    }
    if !relation.is_empty() && last.is_some_and(|value| value != 0) {
        let has_zero = relation.entities().any(|(_, degree)| degree == 0);
        if has_zero {
            sink.error("entities with indegree 0 exist but the tail bucket is not 0");
        }
    }
}

fn check_name_index(relation: &Relation, sink: &mut Findings<'_>) {
    if relation.name_index_len() != relation.len() {
        sink.error(format!(
            "name index holds {} names for {} entities",
            relation.name_index_len(),
            relation.len()
        ));
    }
    for (name, id) in relation.name_entries() {
        match relation.entity_by_id(*id) {
            Some(entity) if entity.name() == name => {}
            Some(entity) => sink.error(format!(
                "name index maps {name} to entity {}",
                entity.name()
            )),
            None => sink.error(format!("name index maps {name} to a stale entity")),
        }
    }
}

fn check_symmetry(relation: &Relation, sink: &mut Findings<'_>, counts: &mut VerifyCounts) {
    let mut edges = 0usize;
    for (id, entity) in relation.order() {
        for source in entity.sources() {
            edges += 1;
            match relation.entity_by_id(source) {
                Some(src) if src.destinations.contains(&id) => {}
                Some(src) => sink.error(format!(
                    "{} lists {} as source without the reverse link",
                    entity.name(),
                    src.name()
                )),
                None => sink.error(format!("{} has a stale source", entity.name())),
            }
        }
        for destination in entity.destinations() {
            match relation.entity_by_id(destination) {
                Some(dst) if dst.sources.contains(&id) => {}
                Some(dst) => sink.error(format!(
                    "{} lists {} as destination without the reverse link",
                    entity.name(),
                    dst.name()
                )),
                None => sink.error(format!("{} has a stale destination", entity.name())),
            }
        }
    }
    counts.edges += edges as u64;
    if edges != relation.edge_count() {
        sink.error(format!(
            "edge counter says {} but adjacency holds {edges}",
            relation.edge_count()
        ));
    }
}
