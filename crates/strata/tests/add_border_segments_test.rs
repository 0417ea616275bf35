use strata::add_border_segments::add_border_segments;
use strata::graphlib::{Graph, GraphOptions};
use strata::{BorderSide, Dummy, GraphLabel, LayoutGraph, NodeLabel};

fn new_graph() -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        compound: true,
        ..Default::default()
    });
    g.set_graph(GraphLabel::default());
    g
}

fn span(g: &mut LayoutGraph, sg: &str, min_rank: i32, max_rank: i32) {
    let node = g.node_mut(sg).unwrap();
    node.min_rank = Some(min_rank);
    node.max_rank = Some(max_rank);
}

fn check_border(g: &LayoutGraph, v: &str, side: BorderSide, rank: i32, parent: &str) {
    let node = g.node(v).unwrap();
    assert_eq!(node.dummy, Some(Dummy::Border));
    assert_eq!(node.border_type, Some(side));
    assert_eq!(node.rank, Some(rank));
    assert_eq!((node.width, node.height), (0.0, 0.0));
    assert_eq!(g.parent(v), Some(parent));
}

#[test]
fn does_not_add_border_nodes_for_a_non_compound_graph() {
    let mut g = new_graph();
    g.set_node("a", NodeLabel {
        rank: Some(0),
        ..Default::default()
    });
    add_border_segments(&mut g);
    assert_eq!(g.node_count(), 1);
}

#[test]
fn does_not_add_border_nodes_for_a_graph_with_no_clusters() {
    let mut g = new_graph();
    g.set_node("a", NodeLabel {
        min_rank: Some(0),
        max_rank: Some(0),
        ..Default::default()
    });
    add_border_segments(&mut g);
    assert_eq!(g.node_count(), 1);
}

#[test]
fn adds_a_border_for_a_single_rank_subgraph() {
    let mut g = new_graph();
    g.set_parent("a", "sg");
    span(&mut g, "sg", 1, 1);
    add_border_segments(&mut g);

    let sg = g.node("sg").unwrap().clone();
    let left = &sg.border_left[&1];
    let right = &sg.border_right[&1];
    check_border(&g, left, BorderSide::Left, 1, "sg");
    check_border(&g, right, BorderSide::Right, 1, "sg");
    assert_eq!(sg.border_left.len(), 1);
    assert_eq!(sg.border_right.len(), 1);
}

#[test]
fn adds_a_border_for_a_multi_rank_subgraph() {
    let mut g = new_graph();
    g.set_parent("a", "sg");
    span(&mut g, "sg", 1, 2);
    add_border_segments(&mut g);

    let sg = g.node("sg").unwrap().clone();
    for rank in [1, 2] {
        check_border(&g, &sg.border_left[&rank], BorderSide::Left, rank, "sg");
        check_border(&g, &sg.border_right[&rank], BorderSide::Right, rank, "sg");
    }
    assert!(g.has_edge(&sg.border_left[&1], &sg.border_left[&2], None));
    assert!(g.has_edge(&sg.border_right[&1], &sg.border_right[&2], None));
    assert_eq!(g.edge(&sg.border_left[&1], &sg.border_left[&2], None).unwrap().weight, 1.0);
}

#[test]
fn adds_borders_for_nested_subgraphs() {
    let mut g = new_graph();
    g.set_parent("a", "sg2");
    g.set_parent("sg2", "sg1");
    span(&mut g, "sg1", 1, 1);
    span(&mut g, "sg2", 1, 1);
    add_border_segments(&mut g);

    let sg1 = g.node("sg1").unwrap().clone();
    let sg2 = g.node("sg2").unwrap().clone();
    check_border(&g, &sg1.border_left[&1], BorderSide::Left, 1, "sg1");
    check_border(&g, &sg1.border_right[&1], BorderSide::Right, 1, "sg1");
    check_border(&g, &sg2.border_left[&1], BorderSide::Left, 1, "sg2");
    check_border(&g, &sg2.border_right[&1], BorderSide::Right, 1, "sg2");
    assert_eq!(g.node_count(), 3 + 4);
}
