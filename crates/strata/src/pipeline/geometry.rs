//! Post-positioning geometry: compound boxes, label anchors, translation and edge clipping.

use crate::error::LayoutError;
use crate::model::{Dummy, LabelPos, LayoutGraph, NodeLabel, Point};
use crate::util::{self, Rect};
use std::collections::BTreeMap;

/// Sizes every subgraph from its outermost border nodes, then drops all border dummies.
pub(super) fn remove_border_nodes(g: &mut LayoutGraph) {
    let coord = |g: &LayoutGraph, v: Option<&String>| {
        v.and_then(|v| g.node(v))
            .map(|n| (n.x.unwrap_or(0.0), n.y.unwrap_or(0.0)))
    };
    // Border chains may drift between ranks; the box spans all of them.
    let extreme = |g: &LayoutGraph, borders: &BTreeMap<i32, String>, pick: fn(f64, f64) -> f64| {
        borders
            .values()
            .filter_map(|v| g.node(v)?.x)
            .reduce(pick)
    };

    for v in g.node_ids() {
        if !g.has_children(&v) {
            continue;
        }
        let Some(node) = g.node(&v) else { continue };
        let top = coord(g, node.border_top.as_ref());
        let bottom = coord(g, node.border_bottom.as_ref());
        let left = extreme(g, &node.border_left, f64::min);
        let right = extreme(g, &node.border_right, f64::max);
        let (Some(t), Some(b), Some(l), Some(r)) = (top, bottom, left, right) else {
            continue;
        };

        let Some(node) = g.node_mut(&v) else { continue };
        node.width = (r - l).abs();
        node.height = (b.1 - t.1).abs();
        node.x = Some(l.min(r) + node.width / 2.0);
        node.y = Some(t.1 + node.height / 2.0);
    }

    for v in g.node_ids() {
        if g.node(&v).is_some_and(|n| n.dummy == Some(Dummy::Border)) {
            g.remove_node(&v);
        }
    }
}

/// Moves label anchors from the label dummy's center to beside the edge, for labels placed
/// left or right of it. The offset only came out of the width if label space was reserved.
pub(super) fn fixup_edge_label_coords(g: &mut LayoutGraph) {
    let widened = g.graph().edge_label_space;
    g.for_each_edge_mut(|_, edge| {
        let Some(x) = edge.x.as_mut() else { return };
        if widened && matches!(edge.labelpos, LabelPos::L | LabelPos::R) {
            edge.width -= edge.labeloffset;
        }
        match edge.labelpos {
            LabelPos::L => *x -= edge.width / 2.0 + edge.labeloffset,
            LabelPos::R => *x += edge.width / 2.0 + edge.labeloffset,
            LabelPos::C => {}
        }
    });
}

/// Shifts the drawing so its top-left corner sits at the margins and records the overall size.
pub(super) fn translate_graph(g: &mut LayoutGraph) {
    let mut min_x = f64::INFINITY;
    let mut max_x: f64 = 0.0;
    let mut min_y = f64::INFINITY;
    let mut max_y: f64 = 0.0;
    let mut extend = |x: f64, y: f64, w: f64, h: f64| {
        min_x = min_x.min(x - w / 2.0);
        max_x = max_x.max(x + w / 2.0);
        min_y = min_y.min(y - h / 2.0);
        max_y = max_y.max(y + h / 2.0);
    };

    for (_, node) in g.node_labels() {
        extend(node.x.unwrap_or(0.0), node.y.unwrap_or(0.0), node.width, node.height);
    }
    for (_, edge) in g.edge_labels() {
        if let Some(x) = edge.x {
            extend(x, edge.y.unwrap_or(0.0), edge.width, edge.height);
        }
    }
    if !min_x.is_finite() {
        min_x = 0.0;
    }
    if !min_y.is_finite() {
        min_y = 0.0;
    }

    let (margin_x, margin_y) = (g.graph().marginx, g.graph().marginy);
    min_x -= margin_x;
    min_y -= margin_y;

    g.for_each_node_mut(|_, node| {
        node.x = Some(node.x.unwrap_or(0.0) - min_x);
        node.y = Some(node.y.unwrap_or(0.0) - min_y);
    });
    g.for_each_edge_mut(|_, edge| {
        for p in &mut edge.points {
            p.x -= min_x;
            p.y -= min_y;
        }
        if let Some(x) = edge.x.as_mut() {
            *x -= min_x;
        }
        if let Some(y) = edge.y.as_mut() {
            *y -= min_y;
        }
    });

    let graph = g.graph_mut();
    graph.width = Some(max_x - min_x + margin_x);
    graph.height = Some(max_y - min_y + margin_y);
}

fn rect_of(node: &NodeLabel) -> Rect {
    Rect {
        x: node.x.unwrap_or(0.0),
        y: node.y.unwrap_or(0.0),
        width: node.width,
        height: node.height,
    }
}

fn center_of(node: &NodeLabel) -> Point {
    Point {
        x: node.x.unwrap_or(0.0),
        y: node.y.unwrap_or(0.0),
    }
}

/// Clips every route to its endpoints' boundaries: the first point lies on the tail's box, the
/// last on the head's.
pub(super) fn assign_node_intersects(g: &mut LayoutGraph) -> Result<(), LayoutError> {
    for e in g.edge_keys() {
        let (Some(node_v), Some(node_w)) = (g.node(&e.v), g.node(&e.w)) else {
            continue;
        };
        let (rect_v, rect_w) = (rect_of(node_v), rect_of(node_w));
        let (center_v, center_w) = (center_of(node_v), center_of(node_w));
        let Some(edge) = g.edge_mut_by_key(&e) else { continue };

        let (p1, p2) = match (edge.points.first(), edge.points.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => (center_w, center_v),
        };
        let start = util::intersect_rect(rect_v, p1)?;
        let end = util::intersect_rect(rect_w, p2)?;
        edge.points.insert(0, start);
        edge.points.push(end);
    }
    Ok(())
}

pub(super) fn reverse_points_for_reversed_edges(g: &mut LayoutGraph) {
    g.for_each_edge_mut(|_, edge| {
        if edge.reversed {
            edge.points.reverse();
        }
    });
}
