use super::types::{BarycenterEntry, LayerGraph, edge_weight};

/// Weighted mean `order` of each movable node's predecessors in the layer graph. Nodes with
/// no incoming weight have no barycenter and are free to stay where they are.
pub fn barycenter(g: &LayerGraph, movable: &[String]) -> Vec<BarycenterEntry> {
    movable
        .iter()
        .map(|v| {
            let mut sum = 0.0;
            let mut weight = 0.0;
            for e in g.in_edges(v, None) {
                let w = edge_weight(g, &e);
                let order = g.node(&e.v).and_then(|n| n.order).unwrap_or(0);
                sum += w * order as f64;
                weight += w;
            }
            if weight > 0.0 {
                BarycenterEntry {
                    v: v.clone(),
                    barycenter: Some(sum / weight),
                    weight: Some(weight),
                }
            } else {
                BarycenterEntry {
                    v: v.clone(),
                    barycenter: None,
                    weight: None,
                }
            }
        })
        .collect()
}
