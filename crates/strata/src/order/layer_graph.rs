use super::types::{LayerGraph, LayerGraphLabel, LayerNode, Relationship, WeightLabel};
use crate::graphlib::{Graph, GraphOptions};
use crate::model::{LayoutGraph, NodeLabel};
use crate::util;
use rustc_hash::FxHashMap;

fn in_rank(node: &NodeLabel, rank: i32) -> bool {
    node.rank == Some(rank)
        || matches!((node.min_rank, node.max_rank), (Some(lo), Some(hi)) if lo <= rank && rank <= hi)
}

/// Builds the layer graph of `rank`: every node in the rank (subgraphs spanning it included),
/// the compound hierarchy among them under a fresh root, and edges from the adjacent rank on
/// the `relationship` side, collapsed per node pair with summed weights.
pub fn build_layer_graph(g: &mut LayoutGraph, rank: i32, relationship: Relationship) -> LayerGraph {
    let members: Vec<String> = g
        .node_labels()
        .filter(|(_, n)| in_rank(n, rank))
        .map(|(v, _)| v.to_string())
        .collect();
    let root = util::unique_id(g, "_root");
    build(g, rank, &members, relationship, root)
}

/// One layer graph per entry of `ranks`, in that order. Nodes are bucketed by rank in a single
/// pass.
pub fn build_layer_graphs(
    g: &mut LayoutGraph,
    ranks: &[i32],
    relationship: Relationship,
) -> Vec<LayerGraph> {
    let mut by_rank: FxHashMap<i32, Vec<String>> = FxHashMap::default();
    for (v, node) in g.node_labels() {
        match (node.rank, node.min_rank, node.max_rank) {
            (Some(r), _, _) => by_rank.entry(r).or_default().push(v.to_string()),
            (None, Some(lo), Some(hi)) => {
                for r in lo..=hi {
                    by_rank.entry(r).or_default().push(v.to_string());
                }
            }
            _ => {}
        }
    }

    ranks
        .iter()
        .map(|&rank| {
            let members = by_rank.remove(&rank).unwrap_or_default();
            let root = util::unique_id(g, "_root");
            build(g, rank, &members, relationship, root)
        })
        .collect()
}

fn build(
    g: &LayoutGraph,
    rank: i32,
    members: &[String],
    relationship: Relationship,
    root: String,
) -> LayerGraph {
    let mut lg: LayerGraph = Graph::new(GraphOptions {
        compound: true,
        ..Default::default()
    });
    lg.set_graph(LayerGraphLabel { root: root.clone() });

    for v in members {
        let Some(node) = g.node(v) else { continue };
        let label = if g.has_children(v) {
            LayerNode::subgraph(node, rank)
        } else {
            LayerNode::leaf(node)
        };
        lg.set_node(v.clone(), label);
        let parent = g.parent(v).unwrap_or(&root);
        lg.set_parent(v.clone(), parent.to_string());

        let edges = match relationship {
            Relationship::InEdges => g.in_edges(v, None),
            Relationship::OutEdges => g.out_edges(v, None),
        };
        for e in edges {
            let u = if e.v == *v { &e.w } else { &e.v };
            if !lg.has_node(u) {
                let label = g.node(u).map(LayerNode::leaf).unwrap_or_default();
                lg.set_node(u.clone(), label);
            }
            let prev = lg.edge(u, v, None).map_or(0.0, |l| l.weight);
            let weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
            lg.set_edge_with_label(
                u.clone(),
                v.clone(),
                WeightLabel {
                    weight: prev + weight,
                },
            );
        }
    }
    lg
}
