use strata::graphlib::{EdgeKey, Graph, GraphOptions, alg};
use strata::greedy_fas::greedy_fas;
use strata::{EdgeLabel, LayoutGraph};

fn new_graph() -> LayoutGraph {
    Graph::new(GraphOptions {
        multigraph: true,
        ..Default::default()
    })
}

fn weight(label: &EdgeLabel) -> f64 {
    label.weight
}

fn check_fas(g: &LayoutGraph, fas: &[EdgeKey]) {
    let n = g.node_count();
    let m = g.edge_count();
    let mut reversed = g.clone();
    for e in fas {
        let label = reversed.remove_edge_key(e).unwrap();
        reversed.set_edge_named(e.w.clone(), e.v.clone(), Some(format!("{e:?}")), Some(label));
    }
    assert!(alg::find_cycles(&reversed).is_empty());
    // Eades, Lin and Smyth bound the set at m/2 - n/6.
    assert!((fas.len() as f64) <= (m as f64 / 2.0 - n as f64 / 6.0).max(1.0));
}

#[test]
fn returns_the_empty_set_for_empty_graphs() {
    assert!(greedy_fas(&new_graph(), weight).is_empty());
}

#[test]
fn returns_the_empty_set_for_single_node_graphs() {
    let mut g = new_graph();
    g.ensure_node("a");
    assert!(greedy_fas(&g, weight).is_empty());
}

#[test]
fn returns_an_empty_set_if_the_input_graph_is_acyclic() {
    let mut g = new_graph();
    g.set_edge("a", "b");
    g.set_edge("b", "c");
    g.set_edge("b", "d");
    g.set_edge("a", "e");
    assert!(greedy_fas(&g, weight).is_empty());
}

#[test]
fn returns_a_single_edge_with_a_simple_cycle() {
    let mut g = new_graph();
    g.set_edge("a", "b");
    g.set_edge("b", "a");
    let fas = greedy_fas(&g, weight);
    assert_eq!(fas.len(), 1);
    check_fas(&g, &fas);
}

#[test]
fn returns_a_single_edge_for_a_cycle_inside_a_path() {
    let mut g = new_graph();
    g.set_path(&["n1", "n2", "n3", "n4", "n5", "n3"]);
    g.set_path(&["n4", "n6"]);
    let fas = greedy_fas(&g, weight);
    assert_eq!(fas.len(), 1);
    check_fas(&g, &fas);
}

#[test]
fn returns_two_edges_for_two_4_node_cycles() {
    let mut g = new_graph();
    g.set_path(&["n1", "n2", "n3", "n4", "n1"]);
    g.set_path(&["n5", "n6", "n7", "n8", "n5"]);
    g.set_edge("n2", "n5");
    let fas = greedy_fas(&g, weight);
    assert_eq!(fas.len(), 2);
    check_fas(&g, &fas);
}

#[test]
fn works_with_arbitrarily_weighted_edges() {
    let mut g1 = new_graph();
    g1.set_edge_with_label("n1", "n2", EdgeLabel::weighted(2.0));
    g1.set_edge_with_label("n2", "n1", EdgeLabel::weighted(1.0));
    assert_eq!(greedy_fas(&g1, weight), vec![EdgeKey::unnamed("n2", "n1")]);

    let mut g2 = new_graph();
    g2.set_edge_with_label("n1", "n2", EdgeLabel::weighted(1.0));
    g2.set_edge_with_label("n2", "n1", EdgeLabel::weighted(2.0));
    assert_eq!(greedy_fas(&g2, weight), vec![EdgeKey::unnamed("n1", "n2")]);
}

#[test]
fn returns_every_parallel_edge_of_a_chosen_pair() {
    let mut g = new_graph();
    g.set_edge_named("a", "b", Some("foo"), Some(EdgeLabel::weighted(5.0)));
    g.set_edge_named("b", "a", Some("bar"), Some(EdgeLabel::weighted(2.0)));
    g.set_edge_named("b", "a", Some("baz"), Some(EdgeLabel::weighted(2.0)));

    let mut fas = greedy_fas(&g, weight);
    fas.sort_by(|a, b| a.name.cmp(&b.name));
    let names: Vec<(&str, &str, Option<&str>)> = fas
        .iter()
        .map(|e| (e.v.as_str(), e.w.as_str(), e.name.as_deref()))
        .collect();
    assert_eq!(names, vec![("b", "a", Some("bar")), ("b", "a", Some("baz"))]);
}

#[test]
fn breaks_cycles_whose_edges_weigh_nothing() {
    for w in [0.0, 0.4] {
        let mut g = new_graph();
        g.set_default_edge_label(move || EdgeLabel::weighted(w));
        g.set_path(&["a", "b", "c", "a"]);
        let fas = greedy_fas(&g, weight);
        assert_eq!(fas.len(), 1, "weight {w}");
        check_fas(&g, &fas);
    }
}

#[test]
fn fractional_weights_are_not_rounded() {
    let mut g = new_graph();
    g.set_edge_with_label("n1", "n2", EdgeLabel::weighted(0.3));
    g.set_edge_with_label("n2", "n1", EdgeLabel::weighted(0.2));
    assert_eq!(greedy_fas(&g, weight), vec![EdgeKey::unnamed("n2", "n1")]);
}
