//! Moving data between the caller's graph and the working graph.

use crate::error::{Error, Result};
use crate::graphlib::{Graph, GraphOptions};
use crate::model::{EdgeLabel, GraphLabel, LayoutGraph, NodeLabel};
use rustc_hash::FxHashSet;

/// Rejects inputs the pipeline cannot lay out: compound cycles and edges incident to
/// subgraphs.
pub(super) fn validate(g: &LayoutGraph) -> Result<()> {
    let mut acyclic: FxHashSet<&str> = FxHashSet::default();
    for start in g.nodes() {
        let mut chain: FxHashSet<&str> = FxHashSet::default();
        let mut v = start;
        loop {
            if acyclic.contains(v) {
                break;
            }
            if !chain.insert(v) {
                return Err(Error::InvalidHierarchy { node: v.to_string() });
            }
            let Some(parent) = g.parent(v) else { break };
            v = parent;
        }
        acyclic.extend(chain);
    }

    for e in g.edges() {
        if g.has_children(&e.v) || g.has_children(&e.w) {
            return Err(Error::CompoundEndpoint {
                v: e.v.clone(),
                w: e.w.clone(),
            });
        }
    }
    Ok(())
}

/// Fresh compound multigraph carrying only the attributes the layout reads.
pub(super) fn build_layout_graph(input: &LayoutGraph) -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
        ..Default::default()
    });

    let opts = input.graph();
    g.set_graph(GraphLabel {
        rankdir: opts.rankdir,
        align: opts.align,
        nodesep: opts.nodesep,
        ranksep: opts.ranksep,
        edgesep: opts.edgesep,
        marginx: opts.marginx,
        marginy: opts.marginy,
        ranker: opts.ranker,
        acyclicer: opts.acyclicer,
        edge_label_space: opts.edge_label_space,
        keep_node_order: opts.keep_node_order,
        node_order: opts.node_order.clone(),
        ..Default::default()
    });

    for (v, node) in input.node_labels() {
        g.set_node(
            v,
            NodeLabel {
                width: node.width,
                height: node.height,
                layer: node.layer,
                fixorder: node.fixorder,
                ..Default::default()
            },
        );
    }
    for v in input.nodes() {
        if let Some(parent) = input.parent(v) {
            g.set_parent(v, parent);
        }
    }

    for (e, edge) in input.edge_labels() {
        g.set_edge_key(
            e.clone(),
            EdgeLabel {
                minlen: edge.minlen,
                weight: edge.weight,
                width: edge.width,
                height: edge.height,
                labelpos: edge.labelpos,
                labeloffset: edge.labeloffset,
                ..Default::default()
            },
        );
    }
    g
}

/// Seeds `fixorder` from the order each node had in a previous layout.
pub(super) fn inherit_order(g: &mut LayoutGraph, prev: &LayoutGraph) {
    g.for_each_node_mut(|v, node| {
        node.fixorder = prev.node(v).and_then(|n| n.order);
    });
}

pub(super) fn update_input_graph(input: &mut LayoutGraph, g: &LayoutGraph) {
    for v in input.node_ids() {
        let Some(laid_out) = g.node(&v) else { continue };
        let compound = g.has_children(&v);
        let Some(node) = input.node_mut(&v) else { continue };
        node.x = laid_out.x;
        node.y = laid_out.y;
        node.rank = laid_out.rank;
        node.order = laid_out.order;
        if compound {
            node.width = laid_out.width;
            node.height = laid_out.height;
        }
    }

    for e in input.edge_keys() {
        let Some(laid_out) = g.edge_by_key(&e) else { continue };
        let Some(edge) = input.edge_mut_by_key(&e) else { continue };
        edge.points = laid_out.points.clone();
        if laid_out.x.is_some() {
            edge.x = laid_out.x;
            edge.y = laid_out.y;
        }
    }

    let graph = input.graph_mut();
    graph.width = g.graph().width;
    graph.height = g.graph().height;
}
