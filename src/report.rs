//! Maximum-indegree reports and their text/JSON renderings.

use std::fmt;

use serde::Serialize;

use crate::error::Result;

/// Token emitted when no relation has an entity with positive indegree.
pub const DEFAULT_EMPTY_TOKEN: &str = "none";

/// Entities tied for the maximum indegree in one relation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RelationReport {
    /// Relation name.
    pub relation: String,
    /// Names of the entities holding the maximum, ascending.
    pub entities: Vec<String>,
    /// The maximum indegree.
    pub degree: usize,
}

impl fmt::Display for RelationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.relation)?;
        for entity in &self.entities {
            write!(f, " \"{entity}\"")?;
        }
        write!(f, " {};", self.degree)
    }
}

/// Report over a whole relation set, one entry per non-empty relation in
/// relation-name order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    relations: Vec<RelationReport>,
}

impl Report {
    pub(crate) fn push(&mut self, entry: RelationReport) {
        self.relations.push(entry);
    }

    /// Returns `true` when no relation had anything to report.
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Per-relation entries.
    pub fn relations(&self) -> &[RelationReport] {
        &self.relations
    }

    /// Text form with a custom token for the empty case.
    pub fn render_text(&self, empty_token: &str) -> String {
        if self.relations.is_empty() {
            return empty_token.to_owned();
        }
        self.relations
            .iter()
            .map(RelationReport::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Single-line JSON array form.
    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_text(DEFAULT_EMPTY_TOKEN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(relation: &str, entities: &[&str], degree: usize) -> RelationReport {
        RelationReport {
            relation: relation.into(),
            entities: entities.iter().map(|e| e.to_string()).collect(),
            degree,
        }
    }

    #[test]
    fn empty_report_uses_token() {
        let report = Report::default();
        assert_eq!(report.to_string(), "none");
        assert_eq!(report.render_text("nothing"), "nothing");
        assert_eq!(report.render_json().unwrap(), "[]");
    }

    #[test]
    fn relations_are_space_separated() {
        let mut report = Report::default();
        report.push(entry("r1", &["a"], 2));
        report.push(entry("r2", &["b", "c"], 1));
        assert_eq!(report.to_string(), r#""r1" "a" 2; "r2" "b" "c" 1;"#);
    }

    #[test]
    fn json_lists_entries() {
        let mut report = Report::default();
        report.push(entry("r1", &["a", "b"], 3));
        assert_eq!(
            report.render_json().unwrap(),
            r#"[{"relation":"r1","entities":["a","b"],"degree":3}]"#
        );
    }
}
