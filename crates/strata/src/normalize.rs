//! Split long edges into chains of unit-length edges through dummy nodes.
//!
//! The original label moves into the edge-label arena while the chain exists. The dummy on the
//! edge's `label_rank` takes the label's size so ordering and positioning make room for it.
//! [`undo`] collects the dummies' coordinates into `points` and restores the edge.

use crate::graphlib::EdgeKey;
use crate::model::{Dummy, EdgeLabel, LayoutGraph, NodeLabel, Point};
use crate::util;
use tracing::debug;

pub fn run(g: &mut LayoutGraph) {
    g.graph_mut().dummy_chains.clear();
    for e in g.edge_keys() {
        normalize_edge(g, e);
    }
    debug!(chains = g.graph().dummy_chains.len(), "normalized long edges");
}

fn normalize_edge(g: &mut LayoutGraph, e: EdgeKey) {
    let rank = |v: &str| g.node(v).and_then(|n| n.rank);
    let (Some(v_rank), Some(w_rank)) = (rank(&e.v), rank(&e.w)) else {
        return;
    };
    if w_rank <= v_rank + 1 {
        return;
    }
    let Some(mut label) = g.remove_edge_key(&e) else {
        return;
    };

    label.points.clear();
    let (weight, label_rank) = (label.weight, label.label_rank);
    let (width, height, labelpos) = (label.width, label.height, label.labelpos);
    let label_id = g.graph_mut().edge_labels.stash(label);

    let mut v = e.v.clone();
    for (i, r) in (v_rank + 1..w_rank).enumerate() {
        let mut attrs = NodeLabel {
            rank: Some(r),
            edge_label: Some(label_id),
            edge_obj: Some(e.clone()),
            ..Default::default()
        };
        let mut kind = Dummy::Edge;
        if label_rank == Some(r) {
            attrs.width = width;
            attrs.height = height;
            attrs.labelpos = Some(labelpos);
            kind = Dummy::EdgeLabel;
        }
        let dummy = util::add_dummy_node(g, kind, attrs, "_d");
        g.set_edge_named(v, dummy.clone(), e.name.clone(), Some(EdgeLabel::weighted(weight)));
        if i == 0 {
            g.graph_mut().dummy_chains.push(dummy.clone());
        }
        v = dummy;
    }
    g.set_edge_named(v, e.w.clone(), e.name.clone(), Some(EdgeLabel::weighted(weight)));
}

pub fn undo(g: &mut LayoutGraph) {
    let chains = std::mem::take(&mut g.graph_mut().dummy_chains);
    for start in chains {
        let Some(node) = g.node(&start) else { continue };
        let (Some(edge_obj), Some(label_id)) = (node.edge_obj.clone(), node.edge_label) else {
            continue;
        };
        let Some(mut label) = g.graph_mut().edge_labels.take(label_id) else {
            continue;
        };

        let mut v = start;
        loop {
            let Some(node) = g.node(&v) else { break };
            let kind = node.dummy;
            if !matches!(kind, Some(Dummy::Edge | Dummy::EdgeLabel)) {
                break;
            }
            let (x, y) = (node.x.unwrap_or(0.0), node.y.unwrap_or(0.0));
            let (width, height) = (node.width, node.height);
            let next = g.first_successor(&v).map(str::to_string);
            g.remove_node(&v);

            label.points.push(Point { x, y });
            if kind == Some(Dummy::EdgeLabel) {
                label.x = Some(x);
                label.y = Some(y);
                label.width = width;
                label.height = height;
            }
            let Some(next) = next else { break };
            v = next;
        }
        g.set_edge_key(edge_obj, label);
    }
}
