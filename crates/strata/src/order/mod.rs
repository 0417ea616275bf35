//! Crossing minimization.
//!
//! Starting from a DFS layering, sweep down and up the ranks, reordering each rank by the
//! barycenters of its neighbors in the rank just fixed. Sweeps alternate direction and left or
//! right tie bias, and stop after four rounds without improvement. The whole search runs twice,
//! the second time using the previous order as a tiebreaker. The layering with the fewest
//! weighted crossings wins, and a sweep must beat the initial layering strictly to replace it.

mod barycenter;
mod constraints;
mod cross_count;
mod init_order;
mod layer_graph;
mod resolve_conflicts;
mod sort;
mod sort_subgraph;
mod types;

pub use barycenter::barycenter;
pub use constraints::add_subgraph_constraints;
pub use cross_count::cross_count;
pub use init_order::init_order;
pub use layer_graph::{build_layer_graph, build_layer_graphs};
pub use resolve_conflicts::resolve_conflicts;
pub use sort::sort;
pub use sort_subgraph::sort_subgraph;
pub use types::{
    BarycenterEntry, ConstraintGraph, LayerGraph, LayerGraphLabel, LayerNode, Relationship,
    SortEntry, SortOptions, SortResult, WeightLabel,
};

use crate::graphlib::{Graph, GraphOptions};
use crate::model::LayoutGraph;
use crate::util;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

pub fn order(g: &mut LayoutGraph) {
    let keep_node_order = g.graph().keep_node_order;
    let max_rank = util::max_rank(g).unwrap_or(0);
    let down_ranks: Vec<i32> = (1..=max_rank).collect();
    let up_ranks: Vec<i32> = (0..max_rank).rev().collect();
    let mut down = build_layer_graphs(g, &down_ranks, Relationship::InEdges);
    let mut up = build_layer_graphs(g, &up_ranks, Relationship::OutEdges);

    // A sweep must beat the initial layering to replace it.
    let initial = init_order(g);
    assign_order(g, &initial);
    let mut best = util::build_layer_matrix(g);
    let mut best_cc = cross_count(g, &best);
    trace!(crossings = best_cc, "initial layering");

    for use_prev in [false, true] {
        let layering = init_order(g);
        assign_order(g, &layering);

        let mut i = 0_usize;
        let mut last_best = 0;
        while last_best < 4 {
            let layer_graphs = if i % 2 == 1 { &mut down } else { &mut up };
            let opts = SortOptions {
                bias_right: i % 4 >= 2,
                use_prev,
                keep_node_order,
            };
            sweep_layer_graphs(g, layer_graphs, opts);

            let layering = util::build_layer_matrix(g);
            let cc = cross_count(g, &layering);
            trace!(iteration = i, use_prev, crossings = cc, "ordering sweep");
            if cc < best_cc {
                last_best = 0;
                best = layering;
                best_cc = cc;
            }
            i += 1;
            last_best += 1;
        }
    }

    debug!(crossings = best_cc, "ordering settled");
    assign_order(g, &best);
}

fn sweep_layer_graphs(g: &mut LayoutGraph, layer_graphs: &mut [LayerGraph], opts: SortOptions) {
    let mut cg: ConstraintGraph = Graph::new(GraphOptions::default());
    for lg in layer_graphs.iter_mut() {
        refresh_layer_graph(g, lg);
        let root = lg.graph().root.clone();
        let sorted = sort_subgraph(lg, &root, &cg, opts);
        for (i, v) in sorted.vs.iter().enumerate() {
            if let Some(node) = g.node_mut(v) {
                node.order = Some(i);
            }
        }
        add_subgraph_constraints(lg, &mut cg, &sorted.vs);
    }
}

/// Copies the current `order` and `fixorder` of every leaf into the layer graph.
fn refresh_layer_graph(g: &LayoutGraph, lg: &mut LayerGraph) {
    lg.for_each_node_mut(|v, node| {
        if node.border_left.is_some() || node.border_right.is_some() {
            return;
        }
        if let Some(source) = g.node(v) {
            node.order = source.order;
            node.fixorder = source.fixorder;
        }
    });
}

pub fn assign_order(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    for layer in layering {
        for (i, v) in layer.iter().enumerate() {
            if let Some(node) = g.node_mut(v) {
                node.order = Some(i);
            }
        }
    }
}

/// Seeds `fixorder` from the caller's node order: each listed real node gets the next free
/// slot in its rank.
pub fn init_data_order(g: &mut LayoutGraph, node_order: &[String]) {
    let mut next_slot: FxHashMap<i32, usize> = FxHashMap::default();
    for v in node_order {
        let Some(node) = g.node_mut(v) else { continue };
        if node.is_dummy() {
            continue;
        }
        let Some(rank) = node.rank else { continue };
        let slot = next_slot.entry(rank).or_insert(0);
        node.fixorder = Some(*slot);
        *slot += 1;
    }
}
