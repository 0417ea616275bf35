use strata::graphlib::{EdgeKey, Graph, GraphOptions};
use strata::parent_dummy_chains::parent_dummy_chains;
use strata::{Dummy, GraphLabel, LayoutGraph, NodeLabel};

fn new_graph() -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        compound: true,
        ..Default::default()
    });
    g.set_graph(GraphLabel::default());
    g
}

fn ranked(rank: i32) -> NodeLabel {
    NodeLabel {
        rank: Some(rank),
        ..Default::default()
    }
}

fn dummy(v: &str, w: &str, rank: i32) -> NodeLabel {
    NodeLabel {
        rank: Some(rank),
        dummy: Some(Dummy::Edge),
        edge_obj: Some(EdgeKey::unnamed(v, w)),
        ..Default::default()
    }
}

fn subgraph(g: &mut LayoutGraph, sg: &str, min_rank: i32, max_rank: i32) {
    let node = g.node_mut(sg).unwrap();
    node.min_rank = Some(min_rank);
    node.max_rank = Some(max_rank);
}

#[test]
fn does_not_set_a_parent_if_both_endpoints_are_at_the_root() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(2));
    g.set_node("d1", dummy("a", "b", 1));
    g.graph_mut().dummy_chains = vec!["d1".to_string()];
    g.set_path(&["a", "d1", "b"]);

    parent_dummy_chains(&mut g);

    assert_eq!(g.parent("d1"), None);
}

#[test]
fn uses_the_tail_parent_for_the_first_node_if_it_is_not_the_root() {
    let mut g = new_graph();
    g.set_parent("a", "sg1");
    subgraph(&mut g, "sg1", 0, 2);
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(2));
    g.set_node("d1", dummy("a", "b", 1));
    g.graph_mut().dummy_chains = vec!["d1".to_string()];
    g.set_path(&["a", "d1", "b"]);

    parent_dummy_chains(&mut g);

    assert_eq!(g.parent("d1"), Some("sg1"));
}

#[test]
fn uses_the_head_parent_for_the_first_node_if_the_tail_is_at_the_root() {
    let mut g = new_graph();
    g.set_parent("b", "sg1");
    subgraph(&mut g, "sg1", 1, 3);
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(2));
    g.set_node("d1", dummy("a", "b", 1));
    g.graph_mut().dummy_chains = vec!["d1".to_string()];
    g.set_path(&["a", "d1", "b"]);

    parent_dummy_chains(&mut g);

    assert_eq!(g.parent("d1"), Some("sg1"));
}

#[test]
fn handles_a_long_chain_starting_in_a_subgraph() {
    let mut g = new_graph();
    g.set_parent("a", "sg1");
    subgraph(&mut g, "sg1", 0, 2);
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(4));
    g.set_node("d1", dummy("a", "b", 1));
    g.set_node("d2", dummy("a", "b", 2));
    g.set_node("d3", dummy("a", "b", 3));
    g.graph_mut().dummy_chains = vec!["d1".to_string()];
    g.set_path(&["a", "d1", "d2", "d3", "b"]);

    parent_dummy_chains(&mut g);

    assert_eq!(g.parent("d1"), Some("sg1"));
    assert_eq!(g.parent("d2"), Some("sg1"));
    assert_eq!(g.parent("d3"), None);
}

#[test]
fn handles_a_long_chain_ending_in_a_subgraph() {
    let mut g = new_graph();
    g.set_parent("b", "sg1");
    subgraph(&mut g, "sg1", 3, 5);
    g.set_node("a", ranked(1));
    g.set_node("b", ranked(5));
    g.set_node("d1", dummy("a", "b", 2));
    g.set_node("d2", dummy("a", "b", 3));
    g.set_node("d3", dummy("a", "b", 4));
    g.graph_mut().dummy_chains = vec!["d1".to_string()];
    g.set_path(&["a", "d1", "d2", "d3", "b"]);

    parent_dummy_chains(&mut g);

    assert_eq!(g.parent("d1"), None);
    assert_eq!(g.parent("d2"), Some("sg1"));
    assert_eq!(g.parent("d3"), Some("sg1"));
}

#[test]
fn handles_nested_subgraphs() {
    let mut g = new_graph();
    g.set_parent("a", "sg2");
    g.set_parent("sg2", "sg1");
    subgraph(&mut g, "sg1", 0, 4);
    subgraph(&mut g, "sg2", 1, 3);
    g.set_parent("b", "sg4");
    g.set_parent("sg4", "sg3");
    subgraph(&mut g, "sg3", 6, 10);
    subgraph(&mut g, "sg4", 7, 9);
    for (v, rank) in [("a", 2), ("b", 8)] {
        g.set_node(v, ranked(rank));
    }
    for i in 1..=5 {
        g.set_node(format!("d{i}"), dummy("a", "b", i + 2));
    }
    g.graph_mut().dummy_chains = vec!["d1".to_string()];
    g.set_path(&["a", "d1", "d2", "d3", "d4", "d5", "b"]);

    parent_dummy_chains(&mut g);

    assert_eq!(g.parent("d1"), Some("sg2"));
    assert_eq!(g.parent("d2"), Some("sg1"));
    assert_eq!(g.parent("d3"), None);
    assert_eq!(g.parent("d4"), Some("sg3"));
    assert_eq!(g.parent("d5"), Some("sg4"));
}
