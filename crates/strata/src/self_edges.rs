//! Self loops take no part in ranking or ordering. They are parked on their node, given a
//! slot right of it once the order is known, and drawn as a small arc beside the node.

use crate::model::{Dummy, LayoutGraph, NodeLabel, Point, SelfEdge};
use crate::util;

pub fn remove_self_edges(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        if e.v != e.w {
            continue;
        }
        let Some(label) = g.remove_edge_key(&e) else {
            continue;
        };
        let id = g.graph_mut().edge_labels.stash(label);
        if let Some(node) = g.node_mut(&e.v) {
            node.self_edges.push(SelfEdge { edge: e, label: id });
        }
    }
}

/// Gives every parked loop a dummy right after its node, shifting later nodes in the rank.
pub fn insert_self_edges(g: &mut LayoutGraph) {
    for layer in util::build_layer_matrix(g) {
        let mut order_shift = 0;
        for (i, v) in layer.iter().enumerate() {
            let Some(node) = g.node_mut(v) else { continue };
            node.order = Some(i + order_shift);
            let rank = node.rank;
            let self_edges = std::mem::take(&mut node.self_edges);
            for se in self_edges {
                order_shift += 1;
                let (width, height) = g
                    .graph()
                    .edge_labels
                    .get(se.label)
                    .map_or((0.0, 0.0), |l| (l.width, l.height));
                let label = NodeLabel {
                    width,
                    height,
                    rank,
                    order: Some(i + order_shift),
                    edge_obj: Some(se.edge),
                    edge_label: Some(se.label),
                    ..Default::default()
                };
                util::add_dummy_node(g, Dummy::SelfEdge, label, "_se");
            }
        }
    }
}

pub fn position_self_edges(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        let Some(node) = g.node(&v) else { continue };
        if node.dummy != Some(Dummy::SelfEdge) {
            continue;
        }
        let (Some(edge_obj), Some(label_id)) = (node.edge_obj.clone(), node.edge_label) else {
            continue;
        };
        let (dummy_x, dummy_y) = (node.x.unwrap_or(0.0), node.y.unwrap_or(0.0));
        let Some(owner) = g.node(&edge_obj.v) else { continue };
        let x = owner.x.unwrap_or(0.0) + owner.width / 2.0;
        let y = owner.y.unwrap_or(0.0);
        let dx = dummy_x - x;
        let dy = owner.height / 2.0;

        g.remove_node(&v);
        let Some(mut label) = g.graph_mut().edge_labels.take(label_id) else {
            continue;
        };
        label.points = vec![
            Point { x: x + 2.0 * dx / 3.0, y: y - dy },
            Point { x: x + 5.0 * dx / 6.0, y: y - dy },
            Point { x: x + dx, y },
            Point { x: x + 5.0 * dx / 6.0, y: y + dy },
            Point { x: x + 2.0 * dx / 3.0, y: y + dy },
        ];
        label.x = Some(dummy_x);
        label.y = Some(dummy_y);
        g.set_edge_key(edge_obj, label);
    }
}
