//! Break cycles by reversing a feedback arc set (FAS).
//!
//! Reversed edges keep their label, are re-inserted under a fresh `rev` name, and remember
//! their original name in `forward_name` so [`undo`] can put them back.

use crate::graphlib::EdgeKey;
use crate::model::{Acyclicer, LayoutGraph};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Chooses the edges whose reversal makes the graph acyclic.
pub trait FeedbackArcStrategy {
    fn feedback_arc_set(&self, g: &LayoutGraph) -> Vec<EdgeKey>;
}

/// Reverses every back edge met by a depth-first search.
#[derive(Debug, Clone, Copy, Default)]
pub struct DfsFas;

/// Eades-Lin-Smyth bucket heuristic weighted by edge `weight`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyFas;

impl FeedbackArcStrategy for DfsFas {
    fn feedback_arc_set(&self, g: &LayoutGraph) -> Vec<EdgeKey> {
        dfs_fas(g)
    }
}

impl FeedbackArcStrategy for GreedyFas {
    fn feedback_arc_set(&self, g: &LayoutGraph) -> Vec<EdgeKey> {
        crate::greedy_fas::greedy_fas(g, |label| {
            if label.weight.is_finite() {
                label.weight.max(0.0)
            } else {
                0.0
            }
        })
    }
}

impl Acyclicer {
    pub fn strategy(self) -> &'static dyn FeedbackArcStrategy {
        match self {
            Acyclicer::Greedy => &GreedyFas,
            Acyclicer::Dfs => &DfsFas,
        }
    }
}

pub fn run(g: &mut LayoutGraph) {
    let acyclicer = g.graph().acyclicer;
    let fas = acyclicer.strategy().feedback_arc_set(g);
    debug!(?acyclicer, reversed = fas.len(), "breaking cycles");

    for e in fas {
        if e.v == e.w {
            continue;
        }
        let Some(mut label) = g.remove_edge_key(&e) else {
            continue;
        };
        label.forward_name = e.name.clone();
        label.reversed = true;
        let name = unique_rev_name(g, &e.w, &e.v);
        g.set_edge_named(e.w, e.v, Some(name), Some(label));
    }
}

pub fn undo(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        if !g.edge_by_key(&e).is_some_and(|label| label.reversed) {
            continue;
        }
        let Some(mut label) = g.remove_edge_key(&e) else {
            continue;
        };
        let forward_name = label.forward_name.take();
        label.reversed = false;
        g.set_edge_named(e.w, e.v, forward_name, Some(label));
    }
}

fn unique_rev_name(g: &mut LayoutGraph, v: &str, w: &str) -> String {
    loop {
        let name = g.graph_mut().ids.next_id("rev");
        if !g.has_edge(v, w, Some(&name)) {
            return name;
        }
    }
}

struct DfsFrame {
    v: String,
    out: Vec<EdgeKey>,
    pos: usize,
}

fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeKey> {
    let mut fas: Vec<EdgeKey> = Vec::new();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut on_stack: FxHashSet<String> = FxHashSet::default();

    for start in g.nodes() {
        if !visited.insert(start.to_string()) {
            continue;
        }
        on_stack.insert(start.to_string());
        let mut stack = vec![DfsFrame {
            v: start.to_string(),
            out: g.out_edges(start, None),
            pos: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(e) = frame.out.get(frame.pos).cloned() else {
                on_stack.remove(&frame.v);
                stack.pop();
                continue;
            };
            frame.pos += 1;
            if e.v == e.w {
                continue;
            }
            if on_stack.contains(&e.w) {
                fas.push(e);
            } else if visited.insert(e.w.clone()) {
                on_stack.insert(e.w.clone());
                let out = g.out_edges(&e.w, None);
                stack.push(DfsFrame { v: e.w, out, pos: 0 });
            }
        }
    }
    fas
}
