//! Left and right border nodes for every rank a subgraph spans.

use crate::model::{BorderSide, Dummy, EdgeLabel, LayoutGraph, NodeLabel};
use crate::util;

pub fn add_border_segments(g: &mut LayoutGraph) {
    for v in compound_postorder(g) {
        let Some((min_rank, max_rank)) = g.node(&v).and_then(|n| Some((n.min_rank?, n.max_rank?)))
        else {
            continue;
        };
        if let Some(node) = g.node_mut(&v) {
            node.border_left.clear();
            node.border_right.clear();
        }
        for rank in min_rank..=max_rank {
            add_border_node(g, BorderSide::Left, "_bl", &v, rank);
            add_border_node(g, BorderSide::Right, "_br", &v, rank);
        }
    }
}

/// Nodes that have children, children before parents.
fn compound_postorder(g: &LayoutGraph) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut stack: Vec<(&str, bool)> = g.children_root().into_iter().rev().map(|v| (v, false)).collect();
    while let Some((v, expanded)) = stack.pop() {
        let children = g.children(v);
        if children.is_empty() {
            continue;
        }
        if expanded {
            out.push(v.to_string());
            continue;
        }
        stack.push((v, true));
        stack.extend(children.into_iter().rev().map(|c| (c, false)));
    }
    out
}

fn add_border_node(g: &mut LayoutGraph, side: BorderSide, prefix: &str, sg: &str, rank: i32) {
    let borders = |n: &NodeLabel| match side {
        BorderSide::Left => n.border_left.get(&(rank - 1)).cloned(),
        BorderSide::Right => n.border_right.get(&(rank - 1)).cloned(),
    };
    let prev = g.node(sg).and_then(borders);

    let label = NodeLabel {
        rank: Some(rank),
        border_type: Some(side),
        ..Default::default()
    };
    let curr = util::add_dummy_node(g, Dummy::Border, label, prefix);
    if let Some(node) = g.node_mut(sg) {
        match side {
            BorderSide::Left => node.border_left.insert(rank, curr.clone()),
            BorderSide::Right => node.border_right.insert(rank, curr.clone()),
        };
    }
    g.set_parent(curr.clone(), sg);
    if let Some(prev) = prev {
        g.set_edge_with_label(prev, curr, EdgeLabel::weighted(1.0));
    }
}
