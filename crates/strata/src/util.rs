//! Helpers shared by several phases.

use crate::error::LayoutError;
use crate::graphlib::{Graph, GraphOptions};
use crate::model::{Dummy, EdgeLabel, LayoutGraph, NodeLabel, Point};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Next id with `prefix` that is not already a node of `g`.
pub fn unique_id(g: &mut LayoutGraph, prefix: &str) -> String {
    loop {
        let id = g.graph_mut().ids.next_id(prefix);
        if !g.has_node(&id) {
            return id;
        }
    }
}

/// Adds a synthetic node of kind `dummy` and returns its id.
pub fn add_dummy_node(g: &mut LayoutGraph, dummy: Dummy, mut label: NodeLabel, prefix: &str) -> String {
    let v = unique_id(g, prefix);
    label.dummy = Some(dummy);
    g.set_node(v.clone(), label);
    v
}

/// Adds a zero-size border node.
pub fn add_border_node(g: &mut LayoutGraph, prefix: &str, rank: Option<i32>, order: Option<usize>) -> String {
    let label = NodeLabel {
        rank,
        order,
        ..Default::default()
    };
    add_dummy_node(g, Dummy::Border, label, prefix)
}

/// Collapses multi-edges into one edge per node pair: weights add up, the largest `minlen`
/// wins.
pub fn simplify(g: &LayoutGraph) -> LayoutGraph {
    let mut simplified: LayoutGraph = Graph::new(GraphOptions::default());
    simplified.set_graph(g.graph().clone());
    for (v, label) in g.node_labels() {
        simplified.set_node(v, label.clone());
    }
    for (e, label) in g.edge_labels() {
        let (weight, minlen) = simplified
            .edge(&e.v, &e.w, None)
            .map_or((0.0, 1), |prev| (prev.weight, prev.minlen));
        simplified.set_edge_with_label(
            e.v.clone(),
            e.w.clone(),
            EdgeLabel {
                weight: weight + label.weight,
                minlen: minlen.max(label.minlen),
                ..Default::default()
            },
        );
    }
    simplified
}

/// Copy of `g` without compound nodes or hierarchy.
pub fn as_non_compound_graph(g: &LayoutGraph) -> LayoutGraph {
    let mut simplified: LayoutGraph = Graph::new(GraphOptions {
        multigraph: g.is_multigraph(),
        ..Default::default()
    });
    simplified.set_graph(g.graph().clone());
    for (v, label) in g.node_labels() {
        if !g.has_children(v) {
            simplified.set_node(v, label.clone());
        }
    }
    for (e, label) in g.edge_labels() {
        simplified.set_edge_key(e.clone(), label.clone());
    }
    simplified
}

/// Point where the segment from the center of `rect` towards `point` leaves the rectangle.
pub fn intersect_rect(rect: Rect, point: Point) -> Result<Point, LayoutError> {
    let dx = point.x - rect.x;
    let dy = point.y - rect.y;
    if dx == 0.0 && dy == 0.0 {
        return Err(LayoutError::Intersection {
            x: point.x,
            y: point.y,
        });
    }

    let mut w = rect.width / 2.0;
    let mut h = rect.height / 2.0;
    let (sx, sy) = if dx == 0.0 || dy.abs() * w > dx.abs() * h {
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };

    Ok(Point {
        x: rect.x + sx,
        y: rect.y + sy,
    })
}

/// Node ids grouped by rank, each rank sorted by `order`. Nodes without a rank are left out.
pub fn build_layer_matrix(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut layers: Vec<Vec<(usize, &str)>> = Vec::new();
    for (v, node) in g.node_labels() {
        let Some(rank) = node.rank else { continue };
        let Ok(rank) = usize::try_from(rank) else { continue };
        if layers.len() <= rank {
            layers.resize_with(rank + 1, Vec::new);
        }
        layers[rank].push((node.order.unwrap_or(usize::MAX), v));
    }
    layers
        .into_iter()
        .map(|mut layer| {
            layer.sort_by_key(|&(order, _)| order);
            layer.into_iter().map(|(_, v)| v.to_string()).collect()
        })
        .collect()
}

/// Shifts ranks so the smallest is 0.
pub fn normalize_ranks(g: &mut LayoutGraph) {
    let Some(min) = g.node_labels().filter_map(|(_, n)| n.rank).min() else {
        return;
    };
    g.for_each_node_mut(|_, node| {
        if let Some(rank) = node.rank.as_mut() {
            *rank -= min;
        }
    });
}

/// Drops ranks that hold no node, except every `node_rank_factor`-th one, which the nesting
/// graph reserved.
pub fn remove_empty_ranks(g: &mut LayoutGraph) {
    let Some(offset) = g.node_labels().filter_map(|(_, n)| n.rank).min() else {
        return;
    };
    let mut layers: FxHashMap<i32, Vec<String>> = FxHashMap::default();
    let mut top = 0;
    for (v, node) in g.node_labels() {
        if let Some(rank) = node.rank {
            let r = rank - offset;
            top = top.max(r);
            layers.entry(r).or_default().push(v.to_string());
        }
    }

    let factor = g.graph().node_rank_factor.unwrap_or(1).max(1);
    let mut delta = 0;
    for i in 0..=top {
        match layers.get(&i) {
            None if i % factor != 0 => delta -= 1,
            Some(vs) if delta != 0 => {
                for v in vs {
                    if let Some(node) = g.node_mut(v) {
                        if let Some(rank) = node.rank.as_mut() {
                            *rank += delta;
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

pub fn max_rank(g: &LayoutGraph) -> Option<i32> {
    g.node_labels().filter_map(|(_, n)| n.rank).max()
}

/// `(min, max)` over `values`, or `None` when empty.
pub fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, x| match acc {
        None => Some((x, x)),
        Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
    })
}
