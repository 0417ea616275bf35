use strata::graphlib::{EdgeKey, Graph, GraphOptions};
use strata::rank::network_simplex::{
    calc_cut_value, enter_edge, init_cut_values, init_low_lim_values, leave_edge, network_simplex,
};
use strata::rank::tree::{TreeEdgeLabel, TreeGraph, TreeNodeLabel};
use strata::{EdgeLabel, GraphLabel, LayoutGraph, NodeLabel, util};

fn new_graph() -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        ..Default::default()
    });
    g.set_graph(GraphLabel::default());
    g.set_default_node_label(NodeLabel::default);
    g.set_default_edge_label(EdgeLabel::default);
    g
}

fn gansner_graph() -> LayoutGraph {
    let mut g = new_graph();
    g.set_path(&["a", "b", "c", "d", "h"]);
    g.set_path(&["a", "e", "g", "h"]);
    g.set_path(&["a", "f", "g"]);
    g
}

fn gansner_tree() -> TreeGraph {
    let mut t: TreeGraph = Graph::new(GraphOptions {
        directed: false,
        ..Default::default()
    });
    t.set_default_node_label(TreeNodeLabel::default);
    t.set_default_edge_label(TreeEdgeLabel::default);
    t.set_path(&["a", "b", "c", "d", "h", "g", "e"]);
    t.set_edge("g", "f");
    t
}

fn undirected_tree() -> TreeGraph {
    let mut t: TreeGraph = Graph::new(GraphOptions {
        directed: false,
        ..Default::default()
    });
    t.set_default_node_label(TreeNodeLabel::default);
    t.set_default_edge_label(TreeEdgeLabel::default);
    t
}

fn ns(g: &mut LayoutGraph) {
    network_simplex(g);
    util::normalize_ranks(g);
}

fn rank_of(g: &LayoutGraph, v: &str) -> i32 {
    g.node(v).unwrap().rank.unwrap()
}

fn cutvalue(t: &TreeGraph, v: &str, w: &str) -> f64 {
    t.edge(v, w, None).unwrap().cutvalue
}

fn undirected(e: &EdgeKey) -> (String, String) {
    if e.v < e.w {
        (e.v.clone(), e.w.clone())
    } else {
        (e.w.clone(), e.v.clone())
    }
}

#[test]
fn can_assign_a_rank_to_a_single_node() {
    let mut g = new_graph();
    g.ensure_node("a");
    ns(&mut g);
    assert_eq!(rank_of(&g, "a"), 0);
}

#[test]
fn can_assign_a_rank_to_a_2_node_connected_graph() {
    let mut g = new_graph();
    g.set_edge("a", "b");
    ns(&mut g);
    assert_eq!(rank_of(&g, "a"), 0);
    assert_eq!(rank_of(&g, "b"), 1);
}

#[test]
fn can_assign_ranks_for_a_diamond() {
    let mut g = new_graph();
    g.set_path(&["a", "b", "d"]);
    g.set_path(&["a", "c", "d"]);
    ns(&mut g);
    assert_eq!(rank_of(&g, "a"), 0);
    assert_eq!(rank_of(&g, "b"), 1);
    assert_eq!(rank_of(&g, "c"), 1);
    assert_eq!(rank_of(&g, "d"), 2);
}

#[test]
fn uses_the_minlen_attribute_on_the_edge() {
    let mut g = new_graph();
    g.set_path(&["a", "b", "d"]);
    g.set_edge("a", "c");
    g.set_edge_with_label(
        "c",
        "d",
        EdgeLabel {
            minlen: 2,
            ..Default::default()
        },
    );
    ns(&mut g);
    assert_eq!(rank_of(&g, "a"), 0);
    // Longest path biases towards the lowest rank it can assign.
    assert_eq!(rank_of(&g, "b"), 2);
    assert_eq!(rank_of(&g, "c"), 1);
    assert_eq!(rank_of(&g, "d"), 3);
}

#[test]
fn can_rank_the_gansner_graph() {
    let mut g = gansner_graph();
    ns(&mut g);
    let ranks: Vec<i32> = ["a", "b", "c", "d", "h", "e", "f", "g"]
        .iter()
        .map(|v| rank_of(&g, v))
        .collect();
    assert_eq!(ranks, vec![0, 1, 2, 3, 4, 1, 1, 2]);
}

#[test]
fn can_handle_multi_edges() {
    let mut g = new_graph();
    g.set_path(&["a", "b", "c", "d"]);
    g.set_edge_named("a", "e", None::<String>, Some(EdgeLabel::weighted(2.0)));
    g.set_edge("e", "d");
    g.set_edge_named(
        "b",
        "c",
        Some("multi"),
        Some(EdgeLabel {
            weight: 1.0,
            minlen: 2,
            ..Default::default()
        }),
    );
    ns(&mut g);
    assert_eq!(rank_of(&g, "a"), 0);
    assert_eq!(rank_of(&g, "b"), 1);
    // b -> c has minlen 1 and 2, so it should be 2 ranks apart.
    assert_eq!(rank_of(&g, "c"), 3);
    assert_eq!(rank_of(&g, "d"), 4);
    assert_eq!(rank_of(&g, "e"), 1);
}

#[test]
fn keeps_every_edge_at_least_minlen_long_on_a_wide_graph() {
    let mut g = new_graph();
    for i in 0..6 {
        let v = format!("n{i}");
        let w = format!("n{}", i + 1);
        g.set_edge(v.clone(), w);
        g.set_edge("root", v.clone());
        g.set_edge(v, "sink");
    }
    ns(&mut g);
    for e in g.edge_keys() {
        assert!(rank_of(&g, &e.w) - rank_of(&g, &e.v) >= 1, "{e}");
    }
}

#[test]
fn leave_edge_returns_none_if_there_is_no_negative_cutvalue() {
    let mut t = undirected_tree();
    t.set_edge_with_label("a", "b", TreeEdgeLabel { cutvalue: 1.0 });
    t.set_edge_with_label("b", "c", TreeEdgeLabel { cutvalue: 1.0 });
    assert_eq!(leave_edge(&t), None);
}

#[test]
fn leave_edge_returns_an_edge_with_a_negative_cutvalue() {
    let mut t = undirected_tree();
    t.set_edge_with_label("a", "b", TreeEdgeLabel { cutvalue: 1.0 });
    t.set_edge_with_label("b", "c", TreeEdgeLabel { cutvalue: -1.0 });
    assert_eq!(leave_edge(&t), Some(EdgeKey::unnamed("b", "c")));
}

#[test]
fn enter_edge_finds_an_edge_from_the_head_to_tail_component() {
    let mut g = new_graph();
    g.set_node("a", NodeLabel { rank: Some(0), ..Default::default() });
    g.set_node("b", NodeLabel { rank: Some(2), ..Default::default() });
    g.set_node("c", NodeLabel { rank: Some(3), ..Default::default() });
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "c");

    let mut t = undirected_tree();
    t.set_path(&["b", "c", "a"]);
    init_low_lim_values(&mut t, Some("c"));

    let f = enter_edge(&t, &g, &EdgeKey::unnamed("b", "c")).unwrap();
    assert_eq!(undirected(&f), ("a".to_string(), "b".to_string()));
}

#[test]
fn enter_edge_works_when_the_root_of_the_tree_is_in_the_tail_component() {
    let mut g = new_graph();
    g.set_node("a", NodeLabel { rank: Some(0), ..Default::default() });
    g.set_node("b", NodeLabel { rank: Some(2), ..Default::default() });
    g.set_node("c", NodeLabel { rank: Some(3), ..Default::default() });
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "c");

    let mut t = undirected_tree();
    t.set_path(&["b", "c", "a"]);
    init_low_lim_values(&mut t, Some("b"));

    let f = enter_edge(&t, &g, &EdgeKey::unnamed("b", "c")).unwrap();
    assert_eq!(undirected(&f), ("a".to_string(), "b".to_string()));
}

#[test]
fn init_low_lim_values_assigns_low_lim_and_parent() {
    let mut t = undirected_tree();
    for v in ["a", "b", "c", "d", "e"] {
        t.ensure_node(v);
    }
    t.set_path(&["a", "b", "a", "c", "d", "c", "e"]);
    init_low_lim_values(&mut t, Some("a"));

    let label = |v: &str| t.node(v).unwrap().clone();
    let (a, b, c, d, e) = (label("a"), label("b"), label("c"), label("d"), label("e"));
    assert_eq!(a.parent, None);
    assert_eq!(b.parent.as_deref(), Some("a"));
    assert_eq!(c.parent.as_deref(), Some("a"));
    assert_eq!(d.parent.as_deref(), Some("c"));
    assert_eq!(e.parent.as_deref(), Some("c"));

    let mut lims = vec![a.lim, b.lim, c.lim, d.lim, e.lim];
    lims.sort();
    assert_eq!(lims, vec![1, 2, 3, 4, 5]);
    assert_eq!((a.low, a.lim), (1, 5));
    for child in [&b, &c] {
        assert!(a.low <= child.low && child.lim < a.lim);
    }
    for child in [&d, &e] {
        assert!(c.low <= child.low && child.lim < c.lim);
    }
}

#[test]
fn init_cut_values_matches_the_gansner_example() {
    let g = gansner_graph();
    let mut t = gansner_tree();
    init_low_lim_values(&mut t, Some("a"));
    init_cut_values(&mut t, &g);

    assert_eq!(cutvalue(&t, "a", "b"), 3.0);
    assert_eq!(cutvalue(&t, "b", "c"), 3.0);
    assert_eq!(cutvalue(&t, "c", "d"), 3.0);
    assert_eq!(cutvalue(&t, "d", "h"), 3.0);
    assert_eq!(cutvalue(&t, "g", "h"), -1.0);
    assert_eq!(cutvalue(&t, "e", "g"), 0.0);
    assert_eq!(cutvalue(&t, "f", "g"), 0.0);
}

#[test]
fn calc_cut_value_for_a_two_node_tree() {
    let mut g = new_graph();
    g.set_edge("a", "b");
    let mut t = undirected_tree();
    t.set_edge("a", "b");
    init_low_lim_values(&mut t, Some("a"));
    assert_eq!(calc_cut_value(&t, &g, "b"), 1.0);
}

#[test]
fn calc_cut_value_for_a_three_node_path_pointing_away() {
    let mut g = new_graph();
    g.set_path(&["a", "b", "c"]);
    let mut t = undirected_tree();
    t.set_path(&["a", "b", "c"]);
    init_low_lim_values(&mut t, Some("a"));
    init_cut_values(&mut t, &g);
    assert_eq!(calc_cut_value(&t, &g, "b"), 1.0);
    assert_eq!(calc_cut_value(&t, &g, "c"), 1.0);
}

#[test]
fn calc_cut_value_with_an_edge_into_the_child_subtree() {
    let mut g = new_graph();
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "c");
    let mut t = undirected_tree();
    t.set_path(&["a", "b", "c"]);
    init_low_lim_values(&mut t, Some("a"));
    init_cut_values(&mut t, &g);
    // a -> b and a -> c both cross the cut below a.
    assert_eq!(calc_cut_value(&t, &g, "b"), 2.0);
    // b -> c and a -> c both point into c.
    assert_eq!(calc_cut_value(&t, &g, "c"), 2.0);
}
