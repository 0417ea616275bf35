//! Coordinate assignment.
//!
//! `y` follows directly from the ranks: each rank is as tall as its tallest node and ranks are
//! `ranksep` apart. `x` comes from Brandes-Köpf, see [`bk`]. Compound nodes are skipped here;
//! their boxes are derived from their border nodes afterwards.

pub mod bk;

use crate::model::LayoutGraph;
use crate::util;

pub fn position(g: &mut LayoutGraph) {
    let mut leaves = util::as_non_compound_graph(g);
    position_y(&mut leaves);
    let xs = bk::position_x(&leaves);

    for (v, node) in leaves.node_labels() {
        let Some(target) = g.node_mut(v) else { continue };
        target.y = node.y;
        if let Some(&x) = xs.get(v) {
            target.x = Some(x);
        }
    }
}

pub fn position_y(g: &mut LayoutGraph) {
    let layering = util::build_layer_matrix(g);
    let rank_sep = g.graph().ranksep;
    let mut prev_y = 0.0;
    for layer in &layering {
        let max_height = layer
            .iter()
            .filter_map(|v| g.node(v))
            .map(|n| n.height)
            .fold(0.0, f64::max);
        for v in layer {
            if let Some(node) = g.node_mut(v) {
                node.y = Some(prev_y + max_height / 2.0);
            }
        }
        prev_y += max_height + rank_sep;
    }
}
