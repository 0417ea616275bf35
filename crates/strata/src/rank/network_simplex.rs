//! Network simplex ranking (Gansner et al., "A Technique for Drawing Directed Graphs").
//!
//! 1. Simplify multi-edges and rank with longest path.
//! 2. Build a feasible tight tree.
//! 3. Number the tree in postorder (`low`/`lim`) and compute every tree edge's cut value.
//! 4. While some tree edge has a negative cut value, swap it for the non-tree edge of minimum
//!    slack that reconnects the two halves, then re-rank along the new tree.

use super::feasible_tree::feasible_tree;
use super::tree::{TreeEdgeLabel, TreeGraph, TreeNodeLabel};
use super::util::{longest_path, minlen, slack};
use crate::graphlib::{EdgeKey, alg};
use crate::model::LayoutGraph;
use crate::util::simplify;
use rustc_hash::FxHashSet;
use tracing::trace;

pub fn network_simplex(g: &mut LayoutGraph) {
    let mut sg = simplify(g);
    longest_path(&mut sg);
    let mut t = feasible_tree(&mut sg);
    init_low_lim_values(&mut t, None);
    init_cut_values(&mut t, &sg);

    let mut pivots = 0_usize;
    while let Some(e) = leave_edge(&t) {
        let Some(f) = enter_edge(&t, &sg, &e) else {
            break;
        };
        exchange_edges(&mut t, &mut sg, &e, &f);
        pivots += 1;
    }
    trace!(pivots, "network simplex converged");

    for (v, node) in sg.node_labels() {
        if let Some(label) = g.node_mut(v) {
            label.rank = node.rank;
        }
    }
}

/// Computes the cut value of every tree edge, leaves first.
pub fn init_cut_values(t: &mut TreeGraph, g: &LayoutGraph) {
    let roots: Vec<String> = t.node_ids();
    let roots: Vec<&str> = roots.iter().map(String::as_str).collect();
    for v in alg::postorder(t, &roots) {
        assign_cut_value(t, g, &v);
    }
}

fn assign_cut_value(t: &mut TreeGraph, g: &LayoutGraph, child: &str) {
    let Some(parent) = t.node(child).and_then(|n| n.parent.clone()) else {
        return;
    };
    let cutvalue = calc_cut_value(t, g, child);
    if let Some(edge) = t.edge_mut(child, &parent, None) {
        edge.cutvalue = cutvalue;
    }
}

/// Cut value of the tree edge between `child` and its tree parent. Relies on the cut values
/// of the child's own tree edges being current.
pub fn calc_cut_value(t: &TreeGraph, g: &LayoutGraph, child: &str) -> f64 {
    let Some(parent) = t.node(child).and_then(|n| n.parent.as_deref()) else {
        return 0.0;
    };
    let (child_is_tail, mut cut_value) = match g.edge(child, parent, None) {
        Some(e) => (true, e.weight),
        None => (false, g.edge(parent, child, None).map_or(0.0, |e| e.weight)),
    };

    for e in g.node_edges(child) {
        let is_out_edge = e.v == child;
        let other = if is_out_edge { &e.w } else { &e.v };
        if other == parent {
            continue;
        }
        let points_to_head = is_out_edge == child_is_tail;
        let other_weight = g.edge_by_key(&e).map_or(0.0, |label| label.weight);
        cut_value += if points_to_head { other_weight } else { -other_weight };

        if let Some(tree_edge) = t.edge(child, other, None) {
            let other_cut_value = tree_edge.cutvalue;
            cut_value += if points_to_head {
                -other_cut_value
            } else {
                other_cut_value
            };
        }
    }
    cut_value
}

/// Postorder numbering of the tree from `root` (or the first node). Remaining components,
/// if any, are numbered after it.
pub fn init_low_lim_values(t: &mut TreeGraph, root: Option<&str>) {
    struct Frame {
        v: String,
        parent: Option<String>,
        next: Vec<String>,
        pos: usize,
        low: i32,
    }

    let mut roots: Vec<String> = Vec::new();
    roots.extend(root.map(str::to_string));
    roots.extend(t.node_ids());

    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut next_lim = 1;
    for r in roots {
        if !visited.insert(r.clone()) {
            continue;
        }
        let next = neighbors(t, &r);
        let mut stack = vec![Frame {
            v: r,
            parent: None,
            next,
            pos: 0,
            low: next_lim,
        }];
        while let Some(frame) = stack.last_mut() {
            if let Some(w) = frame.next.get(frame.pos).cloned() {
                frame.pos += 1;
                if visited.insert(w.clone()) {
                    let parent = Some(frame.v.clone());
                    let next = neighbors(t, &w);
                    stack.push(Frame {
                        v: w,
                        parent,
                        next,
                        pos: 0,
                        low: next_lim,
                    });
                }
                continue;
            }
            let Some(done) = stack.pop() else { break };
            if let Some(label) = t.node_mut(&done.v) {
                label.low = done.low;
                label.lim = next_lim;
                label.parent = done.parent;
            }
            next_lim += 1;
        }
    }
}

fn neighbors(t: &TreeGraph, v: &str) -> Vec<String> {
    t.neighbors(v).into_iter().map(str::to_string).collect()
}

/// A tree edge with a negative cut value, if any remain.
pub fn leave_edge(t: &TreeGraph) -> Option<EdgeKey> {
    t.edge_labels()
        .find(|(_, label)| label.cutvalue < 0.0)
        .map(|(e, _)| e.clone())
}

/// The minimum-slack graph edge that reconnects the two components left after removing
/// tree edge `edge`, oriented so the swap keeps the ranking feasible.
pub fn enter_edge(t: &TreeGraph, g: &LayoutGraph, edge: &EdgeKey) -> Option<EdgeKey> {
    let (mut v, mut w) = (edge.v.as_str(), edge.w.as_str());
    // Tree edges are undirected; recover the graph direction.
    if !g.has_edge(v, w, None) {
        std::mem::swap(&mut v, &mut w);
    }

    let v_label = t.node(v)?;
    let w_label = t.node(w)?;
    let (tail_label, flip) = if v_label.lim > w_label.lim {
        (w_label, true)
    } else {
        (v_label, false)
    };

    let mut best: Option<(i32, &EdgeKey)> = None;
    for e in g.edges() {
        let (Some(ev), Some(ew)) = (t.node(&e.v), t.node(&e.w)) else {
            continue;
        };
        if flip != is_descendant(ev, tail_label) || flip == is_descendant(ew, tail_label) {
            continue;
        }
        let s = slack(g, e);
        if best.is_none_or(|(min, _)| s < min) {
            best = Some((s, e));
        }
    }
    best.map(|(_, e)| e.clone())
}

fn is_descendant(v: &TreeNodeLabel, root: &TreeNodeLabel) -> bool {
    root.low <= v.lim && v.lim <= root.lim
}

pub fn exchange_edges(t: &mut TreeGraph, g: &mut LayoutGraph, e: &EdgeKey, f: &EdgeKey) {
    t.remove_edge(&e.v, &e.w, None);
    t.set_edge_with_label(f.v.clone(), f.w.clone(), TreeEdgeLabel::default());
    init_low_lim_values(t, None);
    init_cut_values(t, g);
    update_ranks(t, g);
}

/// Re-derives ranks from the tree: each node sits `minlen` away from its tree parent, on the
/// side the graph edge between them points to.
fn update_ranks(t: &TreeGraph, g: &mut LayoutGraph) {
    let roots: Vec<&str> = t
        .node_labels()
        .filter(|(_, n)| n.parent.is_none())
        .map(|(v, _)| v)
        .collect();
    for v in alg::preorder(t, &roots) {
        let Some(parent) = t.node(&v).and_then(|n| n.parent.as_deref()) else {
            continue;
        };
        let parent_rank = g.node(parent).and_then(|n| n.rank).unwrap_or(0);
        let rank = if let Some(key) = g.out_edges(parent, Some(&v)).first() {
            parent_rank + minlen(g, key)
        } else if let Some(key) = g.out_edges(&v, Some(parent)).first() {
            parent_rank - minlen(g, key)
        } else {
            continue;
        };
        if let Some(node) = g.node_mut(&v) {
            node.rank = Some(rank);
        }
    }
}
