use strata::graphlib::{Graph, GraphOptions};
use strata::util::{self, Rect};
use strata::{Dummy, EdgeLabel, GraphLabel, LayoutError, LayoutGraph, NodeLabel, Point};

fn new_graph(options: GraphOptions) -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(options);
    g.set_graph(GraphLabel::default());
    g.set_default_edge_label(EdgeLabel::default);
    g
}

fn ranked(rank: i32) -> NodeLabel {
    NodeLabel {
        rank: Some(rank),
        ..Default::default()
    }
}

fn rank_of(g: &LayoutGraph, v: &str) -> i32 {
    g.node(v).unwrap().rank.unwrap()
}

#[test]
fn simplify_copies_an_edge_without_multi_edges() {
    let mut g = new_graph(GraphOptions {
        multigraph: true,
        ..Default::default()
    });
    g.set_edge_with_label(
        "a",
        "b",
        EdgeLabel {
            weight: 1.0,
            minlen: 1,
            ..Default::default()
        },
    );
    let g2 = util::simplify(&g);
    let e = g2.edge("a", "b", None).unwrap();
    assert_eq!((e.weight, e.minlen), (1.0, 1));
    assert_eq!(g2.edge_count(), 1);
}

#[test]
fn simplify_collapses_multi_edges() {
    let mut g = new_graph(GraphOptions {
        multigraph: true,
        ..Default::default()
    });
    g.set_edge_with_label(
        "a",
        "b",
        EdgeLabel {
            weight: 1.0,
            minlen: 1,
            ..Default::default()
        },
    );
    g.set_edge_named(
        "a",
        "b",
        Some("multi"),
        Some(EdgeLabel {
            weight: 2.0,
            minlen: 2,
            ..Default::default()
        }),
    );
    let g2 = util::simplify(&g);
    assert!(!g2.is_multigraph());
    let e = g2.edge("a", "b", None).unwrap();
    assert_eq!((e.weight, e.minlen), (3.0, 2));
    assert_eq!(g2.edge_count(), 1);
}

#[test]
fn simplify_copies_the_graph_label() {
    let mut g = new_graph(GraphOptions::default());
    g.graph_mut().nodesep = 7.0;
    assert_eq!(util::simplify(&g).graph().nodesep, 7.0);
}

#[test]
fn as_non_compound_graph_drops_subgraph_nodes() {
    let mut g = new_graph(GraphOptions {
        compound: true,
        multigraph: true,
        ..Default::default()
    });
    g.set_node("a", ranked(0));
    g.set_parent("a", "sg1");
    g.set_edge_named("a", "b", Some("x"), None);
    let g2 = util::as_non_compound_graph(&g);
    assert!(!g2.is_compound());
    assert!(g2.has_node("a"));
    assert!(!g2.has_node("sg1"));
    assert!(g2.has_edge("a", "b", Some("x")));
    assert_eq!(g2.node("a").unwrap().rank, Some(0));
}

#[test]
fn intersect_rect_lands_on_the_border() {
    let rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 10.0,
        height: 10.0,
    };
    let cases = [
        (Point { x: 0.0, y: 100.0 }, Point { x: 0.0, y: 5.0 }),
        (Point { x: 0.0, y: -100.0 }, Point { x: 0.0, y: -5.0 }),
        (Point { x: 100.0, y: 0.0 }, Point { x: 5.0, y: 0.0 }),
        (Point { x: -100.0, y: 0.0 }, Point { x: -5.0, y: 0.0 }),
        (Point { x: 100.0, y: 50.0 }, Point { x: 5.0, y: 2.5 }),
        (Point { x: 20.0, y: 40.0 }, Point { x: 2.5, y: 5.0 }),
    ];
    for (point, expected) in cases {
        assert_eq!(util::intersect_rect(rect, point).unwrap(), expected, "{point:?}");
    }
}

#[test]
fn intersect_rect_is_relative_to_the_center() {
    let rect = Rect {
        x: 100.0,
        y: 50.0,
        width: 20.0,
        height: 10.0,
    };
    let p = util::intersect_rect(rect, Point { x: 100.0, y: 0.0 }).unwrap();
    assert_eq!(p, Point { x: 100.0, y: 45.0 });
}

#[test]
fn intersect_rect_fails_for_the_center_point() {
    let rect = Rect {
        x: 3.0,
        y: 4.0,
        width: 10.0,
        height: 10.0,
    };
    let err = util::intersect_rect(rect, Point { x: 3.0, y: 4.0 }).unwrap_err();
    assert!(matches!(err, LayoutError::Intersection { x, y } if x == 3.0 && y == 4.0));
}

#[test]
fn build_layer_matrix_groups_nodes_by_rank_and_order() {
    let mut g = new_graph(GraphOptions::default());
    for (v, rank, order) in [("a", 0, 0), ("b", 0, 1), ("c", 1, 0), ("d", 1, 1), ("e", 2, 0)] {
        g.set_node(
            v,
            NodeLabel {
                rank: Some(rank),
                order: Some(order),
                ..Default::default()
            },
        );
    }
    g.set_node(
        "b",
        NodeLabel {
            rank: Some(0),
            order: Some(0),
            ..Default::default()
        },
    );
    g.set_node(
        "a",
        NodeLabel {
            rank: Some(0),
            order: Some(1),
            ..Default::default()
        },
    );
    assert_eq!(
        util::build_layer_matrix(&g),
        vec![
            vec!["b".to_string(), "a".to_string()],
            vec!["c".to_string(), "d".to_string()],
            vec!["e".to_string()],
        ]
    );
}

#[test]
fn normalize_ranks_shifts_the_minimum_to_zero() {
    let mut g = new_graph(GraphOptions::default());
    g.set_node("a", ranked(-3));
    g.set_node("b", ranked(-2));
    g.set_node("c", ranked(5));
    g.ensure_node("d");
    util::normalize_ranks(&mut g);
    assert_eq!(rank_of(&g, "a"), 0);
    assert_eq!(rank_of(&g, "b"), 1);
    assert_eq!(rank_of(&g, "c"), 8);
    assert_eq!(g.node("d").unwrap().rank, None);
}

#[test]
fn normalize_ranks_works_for_a_single_rank() {
    let mut g = new_graph(GraphOptions::default());
    g.set_node("a", ranked(4));
    util::normalize_ranks(&mut g);
    assert_eq!(rank_of(&g, "a"), 0);
}

#[test]
fn remove_empty_ranks_removes_border_ranks_without_nodes() {
    let mut g = new_graph(GraphOptions::default());
    g.graph_mut().node_rank_factor = Some(4);
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(4));
    util::remove_empty_ranks(&mut g);
    assert_eq!(rank_of(&g, "a"), 0);
    assert_eq!(rank_of(&g, "b"), 1);
}

#[test]
fn remove_empty_ranks_keeps_reserved_ranks() {
    let mut g = new_graph(GraphOptions::default());
    g.graph_mut().node_rank_factor = Some(4);
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(8));
    util::remove_empty_ranks(&mut g);
    assert_eq!(rank_of(&g, "a"), 0);
    assert_eq!(rank_of(&g, "b"), 2);
}

#[test]
fn max_rank_and_min_max() {
    let mut g = new_graph(GraphOptions::default());
    assert_eq!(util::max_rank(&g), None);
    g.set_node("a", ranked(2));
    g.set_node("b", ranked(7));
    assert_eq!(util::max_rank(&g), Some(7));
    assert_eq!(util::min_max([3.0, -1.0, 2.0]), Some((-1.0, 3.0)));
    assert_eq!(util::min_max(std::iter::empty()), None);
}

#[test]
fn add_dummy_node_marks_the_node_and_avoids_collisions() {
    let mut g = new_graph(GraphOptions::default());
    g.ensure_node("_d1");
    let v = util::add_dummy_node(&mut g, Dummy::Edge, NodeLabel::new(5.0, 6.0), "_d");
    assert_ne!(v, "_d1");
    assert!(v.starts_with("_d"));
    let node = g.node(&v).unwrap();
    assert_eq!(node.dummy, Some(Dummy::Edge));
    assert_eq!((node.width, node.height), (5.0, 6.0));

    let border = util::add_border_node(&mut g, "_bt", Some(3), Some(1));
    let node = g.node(&border).unwrap();
    assert_eq!(node.dummy, Some(Dummy::Border));
    assert_eq!((node.rank, node.order), (Some(3), Some(1)));
}

#[test]
fn unique_id_never_repeats() {
    let mut g = new_graph(GraphOptions::default());
    let a = util::unique_id(&mut g, "_root");
    let b = util::unique_id(&mut g, "_root");
    assert_ne!(a, b);
}
