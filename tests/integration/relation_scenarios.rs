#![allow(missing_docs)]

use relgraph::admin::{stats, verify};
use relgraph::{RelationSet, Result};

fn seeded(names: &[&str]) -> RelationSet {
    let mut set = RelationSet::new();
    for name in names {
        set.add_entity(name);
    }
    set
}

fn assert_verified(set: &RelationSet) {
    let report = verify(set);
    assert!(report.success, "{:#?}", report.findings);
}

#[test]
fn report_follows_edge_churn() -> Result<()> {
    let mut set = seeded(&["a", "b", "c", "d"]);
    assert_eq!(set.report()?.to_string(), "none");

    set.add_edge("b", "a", "r1")?;
    set.add_edge("c", "a", "r1")?;
    assert_eq!(set.report()?.to_string(), r#""r1" "a" 2;"#);

    set.add_edge("d", "a", "r1")?;
    set.delete_edge("c", "a", "r1")?;
    assert_eq!(set.report()?.to_string(), r#""r1" "a" 2;"#);
    let relation = set.relation("r1").expect("r1");
    assert_eq!(relation.indegree("a"), Some(2));
    assert_eq!(relation.sources_of("a").len(), 2);
    assert!(relation.contains_edge("d", "a"));
    assert!(!relation.contains_edge("c", "a"));

    set.delete_entity("a")?;
    assert_eq!(set.report()?.to_string(), "none");
    assert!(!set.relation("r1").expect("r1").contains_entity("a"));
    assert_verified(&set);
    Ok(())
}

#[test]
fn multiple_relations_report_in_name_order() -> Result<()> {
    let mut set = seeded(&["a", "b", "c", "x"]);
    set.add_edge("a", "b", "r2")?;
    set.add_edge("a", "c", "r2")?;
    set.add_edge("x", "a", "r1")?;
    set.add_edge("b", "a", "r1")?;
    set.add_edge("a", "x", "empty")?;
    set.delete_edge("a", "x", "empty")?;

    assert_eq!(
        set.report()?.to_string(),
        r#""r1" "a" 2; "r2" "b" "c" 1;"#
    );
    assert_eq!(set.report()?.render_text("-"), r#""r1" "a" 2; "r2" "b" "c" 1;"#);

    let summary = stats(&set);
    assert_eq!(summary.relations, 3);
    assert_eq!(summary.non_empty_relations, 2);
    assert_eq!(summary.known_names, 4);
    assert_verified(&set);
    Ok(())
}

#[test]
fn unknown_names_never_create_edges() -> Result<()> {
    let mut set = seeded(&["a"]);
    assert!(!set.add_edge("a", "ghost", "r")?);
    assert!(!set.add_edge("ghost", "a", "r")?);
    assert!(set.relation("r").is_none());
    assert!(!set.delete_entity("ghost")?);
    assert!(!set.delete_edge("a", "ghost", "r")?);
    assert_eq!(set.report()?.to_string(), "none");
    Ok(())
}

#[test]
fn deleting_a_name_cascades_across_relations() -> Result<()> {
    let mut set = seeded(&["hub", "a", "b"]);
    for rel in ["follows", "likes"] {
        set.add_edge("a", "hub", rel)?;
        set.add_edge("b", "hub", rel)?;
        set.add_edge("hub", "a", rel)?;
    }
    assert_eq!(
        set.report()?.to_string(),
        r#""follows" "hub" 2; "likes" "hub" 2;"#
    );

    assert!(set.delete_entity("hub")?);
    assert!(!set.is_known("hub"));
    for rel in ["follows", "likes"] {
        let relation = set.relation(rel).expect("relation kept");
        assert!(!relation.contains_entity("hub"));
        assert_eq!(relation.edge_count(), 0);
        assert_eq!(relation.len(), 2);
    }
    assert_eq!(set.report()?.to_string(), "none");

    // a re-added name starts over
    set.add_entity("hub");
    set.add_edge("hub", "a", "follows")?;
    assert_eq!(set.report()?.to_string(), r#""follows" "a" 1;"#);
    assert_verified(&set);
    Ok(())
}

#[test]
fn tied_maximum_lists_every_holder() -> Result<()> {
    let names = ["e", "d", "c", "b", "a"];
    let mut set = seeded(&names);
    for (i, src) in names.iter().enumerate() {
        let dst = names[(i + 1) % names.len()];
        set.add_edge(src, dst, "cycle")?;
    }
    assert_eq!(
        set.report()?.to_string(),
        r#""cycle" "a" "b" "c" "d" "e" 1;"#
    );
    let relation = set.relation("cycle").expect("cycle");
    assert_eq!(relation.degree_buckets().collect::<Vec<_>>(), vec![(1, "a")]);

    set.add_edge("a", "c", "cycle")?;
    assert_eq!(set.report()?.to_string(), r#""cycle" "c" 2;"#);
    assert_verified(&set);
    Ok(())
}

#[test]
fn clear_is_explicit_teardown() -> Result<()> {
    let mut set = seeded(&["a", "b"]);
    set.add_edge("a", "b", "r")?;
    set.clear();
    assert_eq!(set.relation_count(), 0);
    assert_eq!(set.known_names().count(), 0);
    assert!(!set.add_edge("a", "b", "r")?);
    Ok(())
}
