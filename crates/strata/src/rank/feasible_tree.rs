//! Tight spanning trees.
//!
//! Starting from an initial ranking, grow a tree of tight edges from the first node. When
//! it stops growing, take the minimum-slack edge leaving the tree and shift the whole tree
//! by that slack so the edge becomes tight. The result is a spanning tree whose edges all
//! have zero slack, and ranks that stay feasible throughout.

use super::tree::{TreeEdgeLabel, TreeGraph, TreeNodeLabel};
use super::util::slack;
use crate::graphlib::{EdgeKey, Graph, GraphOptions};
use crate::model::LayoutGraph;

pub fn feasible_tree(g: &mut LayoutGraph) -> TreeGraph {
    grow(g, false)
}

/// Like [`feasible_tree`], but nodes carrying a `layer` join the tree without a slack check.
pub fn feasible_tree_with_layer(g: &mut LayoutGraph) -> TreeGraph {
    grow(g, true)
}

fn grow(g: &mut LayoutGraph, pinned_tight: bool) -> TreeGraph {
    let mut t: TreeGraph = Graph::new(GraphOptions {
        directed: false,
        ..Default::default()
    });
    let Some(start) = g.nodes().next().map(str::to_string) else {
        return t;
    };
    let size = g.node_count();
    t.set_node(start, TreeNodeLabel::default());

    while tight_tree(&mut t, g, pinned_tight) < size {
        match find_min_slack_edge(&t, g) {
            Some(e) => {
                let delta = if t.has_node(&e.v) { slack(g, &e) } else { -slack(g, &e) };
                shift_ranks(&t, g, delta);
            }
            None => {
                // Disconnected input: continue as a forest from the next unreached node.
                let Some(next) = g.nodes().find(|v| !t.has_node(v)).map(str::to_string) else {
                    break;
                };
                t.set_node(next, TreeNodeLabel::default());
            }
        }
    }
    t
}

/// Extends `t` with every node reachable over tight edges and returns the tree size.
fn tight_tree(t: &mut TreeGraph, g: &LayoutGraph, pinned_tight: bool) -> usize {
    struct Frame {
        v: String,
        edges: Vec<EdgeKey>,
        pos: usize,
    }

    for start in t.node_ids() {
        let edges = g.node_edges(&start);
        let mut stack = vec![Frame {
            v: start,
            edges,
            pos: 0,
        }];
        while let Some(frame) = stack.last_mut() {
            let Some(e) = frame.edges.get(frame.pos).cloned() else {
                stack.pop();
                continue;
            };
            frame.pos += 1;
            let w = if e.v == frame.v { &e.w } else { &e.v };
            if t.has_node(w) {
                continue;
            }
            let pinned = pinned_tight && g.node(w).is_some_and(|n| n.layer.is_some());
            if !pinned && slack(g, &e) != 0 {
                continue;
            }
            let w = w.clone();
            t.set_node(w.clone(), TreeNodeLabel::default());
            t.set_edge_with_label(frame.v.clone(), w.clone(), TreeEdgeLabel::default());
            let edges = g.node_edges(&w);
            stack.push(Frame { v: w, edges, pos: 0 });
        }
    }
    t.node_count()
}

/// The first edge of minimum slack with exactly one endpoint in `t`.
fn find_min_slack_edge(t: &TreeGraph, g: &LayoutGraph) -> Option<EdgeKey> {
    let mut best: Option<(i32, &EdgeKey)> = None;
    for e in g.edges() {
        if t.has_node(&e.v) == t.has_node(&e.w) {
            continue;
        }
        let s = slack(g, e);
        if best.is_none_or(|(min, _)| s < min) {
            best = Some((s, e));
        }
    }
    best.map(|(_, e)| e.clone())
}

fn shift_ranks(t: &TreeGraph, g: &mut LayoutGraph, delta: i32) {
    for v in t.nodes() {
        if let Some(rank) = g.node_mut(v).and_then(|n| n.rank.as_mut()) {
            *rank += delta;
        }
    }
}
