#![cfg(test)]

use super::*;
use crate::admin::verify_relation;

fn assert_consistent(relation: &Relation) {
    let findings = verify_relation(relation);
    assert!(findings.is_empty(), "invariants broken: {findings:#?}");
}

fn order(relation: &Relation) -> Vec<(String, usize)> {
    relation
        .entities()
        .map(|(name, degree)| (name.to_owned(), degree))
        .collect()
}

fn buckets(relation: &Relation) -> Vec<(usize, String)> {
    relation
        .degree_buckets()
        .map(|(value, first)| (value, first.to_owned()))
        .collect()
}

fn pairs(items: &[(&str, usize)]) -> Vec<(String, usize)> {
    items.iter().map(|(n, d)| (n.to_string(), *d)).collect()
}

fn report_line(relation: &Relation) -> Option<String> {
    relation.report().unwrap().map(|r| r.to_string())
}

mod entity_lifecycle {
    use super::*;

    #[test]
    fn entities_without_edges_report_nothing() -> Result<()> {
        let mut rel = Relation::new("r");
        for name in ["c", "a", "b"] {
            assert!(rel.insert_entity(name)?);
        }
        assert_eq!(order(&rel), pairs(&[("a", 0), ("b", 0), ("c", 0)]));
        assert_eq!(buckets(&rel), vec![(0, "a".to_string())]);
        assert_eq!(report_line(&rel), None);
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn duplicate_insert_is_noop() -> Result<()> {
        let mut rel = Relation::new("r");
        assert!(rel.insert_entity("a")?);
        rel.insert_edge("b", "a")?;
        assert!(!rel.insert_entity("a")?);
        assert_eq!(rel.len(), 2);
        assert_eq!(rel.indegree("a"), Some(1));
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn new_entity_joins_existing_zero_bucket_in_name_order() -> Result<()> {
        let mut rel = Relation::new("r");
        rel.insert_edge("m", "x")?;
        rel.insert_entity("a")?;
        rel.insert_entity("z")?;
        assert_eq!(
            order(&rel),
            pairs(&[("x", 1), ("a", 0), ("m", 0), ("z", 0)])
        );
        assert_eq!(
            buckets(&rel),
            vec![(1, "x".to_string()), (0, "a".to_string())]
        );
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn new_entity_creates_zero_bucket_when_tail_is_positive() -> Result<()> {
        let mut rel = Relation::new("r");
        rel.insert_edge("a", "b")?;
        rel.insert_edge("b", "a")?;
        assert_eq!(buckets(&rel), vec![(1, "a".to_string())]);
        rel.insert_entity("c")?;
        assert_eq!(
            buckets(&rel),
            vec![(1, "a".to_string()), (0, "c".to_string())]
        );
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn delete_unknown_entity_is_noop() -> Result<()> {
        let mut rel = Relation::new("r");
        rel.insert_edge("a", "b")?;
        assert!(!rel.delete_entity("zzz")?);
        assert_eq!(rel.len(), 2);
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn delete_entity_cascades_over_incident_edges() -> Result<()> {
        let mut rel = Relation::new("r");
        for source in ["b", "c", "d"] {
            rel.insert_edge(source, "a")?;
        }
        rel.insert_edge("a", "b")?;
        rel.insert_edge("c", "b")?;
        assert!(rel.delete_entity("a")?);

        assert!(!rel.contains_entity("a"));
        for name in ["b", "c", "d"] {
            assert!(rel.destinations_of(name).iter().all(|n| *n != "a"));
            assert!(rel.sources_of(name).iter().all(|n| *n != "a"));
        }
        assert_eq!(rel.edge_count(), 1);
        assert_eq!(buckets(&rel), vec![(1, "b".to_string()), (0, "c".to_string())]);
        assert!(rel.degree_buckets().all(|(value, _)| value != 3));
        assert_eq!(report_line(&rel).as_deref(), Some(r#""r" "b" 1;"#));
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn delete_entity_with_self_loop() -> Result<()> {
        let mut rel = Relation::new("r");
        rel.insert_edge("a", "a")?;
        rel.insert_edge("a", "b")?;
        assert_eq!(rel.indegree("a"), Some(1));
        assert!(rel.delete_entity("a")?);
        assert_eq!(order(&rel), pairs(&[("b", 0)]));
        assert_eq!(rel.edge_count(), 0);
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn deleting_last_entity_empties_degree_index() -> Result<()> {
        let mut rel = Relation::new("r");
        rel.insert_entity("solo")?;
        assert!(rel.delete_entity("solo")?);
        assert!(rel.is_empty());
        assert_eq!(rel.degree_buckets().count(), 0);
        assert_eq!(rel.max_indegree(), None);
        assert_eq!(report_line(&rel), None);
        // the relation is still usable afterwards
        rel.insert_edge("x", "y")?;
        assert_eq!(report_line(&rel).as_deref(), Some(r#""r" "y" 1;"#));
        assert_consistent(&rel);
        Ok(())
    }
}

mod edge_lifecycle {
    use super::*;

    #[test]
    fn single_maximum() -> Result<()> {
        let mut rel = Relation::new("r1");
        rel.insert_edge("b", "a")?;
        rel.insert_edge("c", "a")?;
        assert_eq!(rel.indegree("a"), Some(2));
        assert_eq!(buckets(&rel)[0], (2, "a".to_string()));
        assert_eq!(report_line(&rel).as_deref(), Some(r#""r1" "a" 2;"#));
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn all_entities_tied_at_same_nonzero_degree() -> Result<()> {
        let mut rel = Relation::new("ring");
        rel.insert_edge("a", "b")?;
        rel.insert_edge("b", "c")?;
        rel.insert_edge("c", "a")?;
        assert_eq!(buckets(&rel), vec![(1, "a".to_string())]);
        assert_eq!(
            report_line(&rel).as_deref(),
            Some(r#""ring" "a" "b" "c" 1;"#)
        );
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn duplicate_edge_is_noop() -> Result<()> {
        let mut rel = Relation::new("r");
        assert!(rel.insert_edge("a", "b")?);
        assert!(!rel.insert_edge("a", "b")?);
        assert_eq!(rel.indegree("b"), Some(1));
        assert_eq!(rel.edge_count(), 1);
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn deleting_missing_edge_is_noop() -> Result<()> {
        let mut rel = Relation::new("r");
        rel.insert_edge("a", "b")?;
        assert!(!rel.delete_edge("b", "a")?);
        assert!(!rel.delete_edge("a", "ghost")?);
        assert!(!rel.delete_edge("ghost", "b")?);
        assert!(!rel.contains_entity("ghost"));
        assert_eq!(rel.edge_count(), 1);
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn delete_edge_keeps_entities() -> Result<()> {
        let mut rel = Relation::new("r");
        rel.insert_edge("a", "b")?;
        assert!(rel.delete_edge("a", "b")?);
        assert_eq!(order(&rel), pairs(&[("a", 0), ("b", 0)]));
        assert_eq!(report_line(&rel), None);
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn increase_then_decrease_creates_fresh_bucket() -> Result<()> {
        let mut rel = Relation::new("r");
        rel.insert_edge("b", "a")?;
        rel.insert_edge("c", "a")?;
        rel.insert_edge("d", "a")?;
        assert_eq!(buckets(&rel)[0], (3, "a".to_string()));
        assert!(rel.delete_edge("c", "a")?);
        assert_eq!(
            buckets(&rel),
            vec![(2, "a".to_string()), (0, "b".to_string())]
        );
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn decrease_merges_into_existing_lower_bucket() -> Result<()> {
        let mut rel = Relation::new("r");
        // a: 3, b: 2, c: 2
        for source in ["x", "y", "z"] {
            rel.insert_edge(source, "a")?;
        }
        rel.insert_edge("x", "c")?;
        rel.insert_edge("y", "c")?;
        rel.insert_edge("x", "b")?;
        rel.insert_edge("y", "b")?;
        assert_eq!(
            buckets(&rel),
            vec![(3, "a".to_string()), (2, "b".to_string()), (0, "x".to_string())]
        );

        rel.delete_edge("z", "a")?;
        assert_eq!(
            buckets(&rel),
            vec![(2, "a".to_string()), (0, "x".to_string())]
        );
        assert_eq!(
            report_line(&rel).as_deref(),
            Some(r#""r" "a" "b" "c" 2;"#)
        );
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn increase_merges_into_existing_higher_bucket_mid_run() -> Result<()> {
        let mut rel = Relation::new("r");
        // a: 2, c: 2, b: 1
        rel.insert_edge("x", "a")?;
        rel.insert_edge("y", "a")?;
        rel.insert_edge("x", "c")?;
        rel.insert_edge("y", "c")?;
        rel.insert_edge("x", "b")?;
        assert_eq!(order(&rel)[..3], pairs(&[("a", 2), ("c", 2), ("b", 1)])[..]);

        rel.insert_edge("y", "b")?;
        assert_eq!(order(&rel)[..3], pairs(&[("a", 2), ("b", 2), ("c", 2)])[..]);
        assert_eq!(buckets(&rel)[0], (2, "a".to_string()));
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn increase_becomes_new_first_of_higher_bucket() -> Result<()> {
        let mut rel = Relation::new("r");
        rel.insert_edge("x", "m")?;
        rel.insert_entity("a")?;
        assert_eq!(buckets(&rel)[0], (1, "m".to_string()));
        rel.insert_edge("x", "a")?;
        assert_eq!(buckets(&rel)[0], (1, "a".to_string()));
        assert_eq!(report_line(&rel).as_deref(), Some(r#""r" "a" "m" 1;"#));
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn leaving_a_bucket_advances_its_first_pointer() -> Result<()> {
        let mut rel = Relation::new("r");
        rel.insert_edge("x", "a")?;
        rel.insert_edge("x", "b")?;
        rel.insert_edge("x", "c")?;
        assert_eq!(buckets(&rel)[0], (1, "a".to_string()));
        rel.insert_edge("y", "a")?;
        assert_eq!(
            buckets(&rel)[..2],
            [(2, "a".to_string()), (1, "b".to_string())]
        );
        rel.delete_edge("x", "b")?;
        assert_eq!(buckets(&rel)[1], (1, "c".to_string()));
        assert_consistent(&rel);
        Ok(())
    }

    #[test]
    fn new_bucket_inserted_between_existing_values() -> Result<()> {
        let mut rel = Relation::new("r");
        // a: 3, b: 1 -> raise b to 2, which sits between
        for source in ["x", "y", "z"] {
            rel.insert_edge(source, "a")?;
        }
        rel.insert_edge("x", "b")?;
        rel.insert_edge("y", "b")?;
        assert_eq!(
            buckets(&rel),
            vec![(3, "a".to_string()), (2, "b".to_string()), (0, "x".to_string())]
        );
        // lower a to 2 while b is already 2, then to 1 with no bucket at 1
        rel.delete_edge("x", "a")?;
        rel.delete_edge("y", "a")?;
        assert_eq!(
            buckets(&rel),
            vec![(2, "b".to_string()), (1, "a".to_string()), (0, "x".to_string())]
        );
        assert_consistent(&rel);
        Ok(())
    }
}

mod teardown {
    use super::*;

    #[test]
    fn clear_resets_everything() -> Result<()> {
        let mut rel = Relation::new("r");
        rel.insert_edge("a", "b")?;
        rel.clear();
        assert!(rel.is_empty());
        assert_eq!(rel.edge_count(), 0);
        assert!(!rel.contains_entity("a"));
        assert_eq!(report_line(&rel), None);
        assert_consistent(&rel);
        Ok(())
    }
}
