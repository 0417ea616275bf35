//! The layout entry points.
//!
//! `layout` validates the caller's graph, copies the whitelisted inputs into a fresh working
//! graph, threads that graph through every phase and finally writes the results back. The
//! caller's graph is only touched once every phase has succeeded.

mod geometry;
mod input;

use crate::error::Result;
use crate::model::{Dummy, LabelPos, LayoutGraph, NodeLabel};
use crate::{
    acyclic, add_border_segments, coordinate_system, nesting_graph, normalize, order,
    parent_dummy_chains, position, rank, self_edges, util,
};
use tracing::{debug, debug_span};

/// Lays out `g` in place: node `x`/`y`/`rank`/`order`, compound sizes, edge `points` and label
/// anchors, and the overall `width`/`height` on the graph label.
pub fn layout(g: &mut LayoutGraph) -> Result<()> {
    let _span = debug_span!("layout", nodes = g.node_count(), edges = g.edge_count()).entered();
    input::validate(g)?;
    let mut work = input::build_layout_graph(g);
    run_layout(&mut work)?;
    input::update_input_graph(g, &work);
    Ok(())
}

/// Like [`layout`], but nodes keep their relative order from `prev` where possible.
pub fn layout_with_previous(g: &mut LayoutGraph, prev: &LayoutGraph) -> Result<()> {
    let _span = debug_span!("layout", nodes = g.node_count(), edges = g.edge_count()).entered();
    input::validate(g)?;
    let mut work = input::build_layout_graph(g);
    if !work.graph().keep_node_order {
        input::inherit_order(&mut work, prev);
    }
    run_layout(&mut work)?;
    input::update_input_graph(g, &work);
    Ok(())
}

fn run_layout(g: &mut LayoutGraph) -> Result<()> {
    if g.graph().edge_label_space {
        debug_span!("make_space_for_edge_labels").in_scope(|| make_space_for_edge_labels(g));
    }
    debug_span!("remove_self_edges").in_scope(|| self_edges::remove_self_edges(g));
    debug_span!("acyclic").in_scope(|| acyclic::run(g));
    debug_span!("nesting_graph").in_scope(|| nesting_graph::run(g));
    scale_layers(g);
    debug_span!("rank").in_scope(|| rank_flat(g));
    inject_edge_label_proxies(g);
    util::remove_empty_ranks(g);
    nesting_graph::cleanup(g);
    util::normalize_ranks(g);
    assign_rank_min_max(g);
    remove_edge_label_proxies(g);
    debug_span!("normalize").in_scope(|| normalize::run(g));
    debug_span!("parent_dummy_chains").in_scope(|| parent_dummy_chains::parent_dummy_chains(g));
    debug_span!("add_border_segments").in_scope(|| add_border_segments::add_border_segments(g));
    if g.graph().keep_node_order {
        let node_order = g.graph().node_order.clone();
        order::init_data_order(g, &node_order);
    }
    debug_span!("order").in_scope(|| order::order(g));
    debug_span!("insert_self_edges").in_scope(|| self_edges::insert_self_edges(g));
    coordinate_system::adjust(g);
    debug_span!("position").in_scope(|| position::position(g));
    self_edges::position_self_edges(g);
    geometry::remove_border_nodes(g);
    debug_span!("normalize_undo").in_scope(|| normalize::undo(g));
    geometry::fixup_edge_label_coords(g);
    coordinate_system::undo(g);
    geometry::translate_graph(g);
    debug_span!("assign_node_intersects").in_scope(|| geometry::assign_node_intersects(g))?;
    geometry::reverse_points_for_reversed_edges(g);
    acyclic::undo(g);
    Ok(())
}

/// Gives labelled edges a rank of their own: every edge is stretched to twice its length and
/// the rank separation is halved to compensate.
fn make_space_for_edge_labels(g: &mut LayoutGraph) {
    let graph = g.graph_mut();
    graph.ranksep /= 2.0;
    let vertical = !graph.rankdir.is_horizontal();
    g.for_each_edge_mut(|_, edge| {
        edge.minlen *= 2;
        if edge.labelpos != LabelPos::C {
            if vertical {
                edge.width += edge.labeloffset;
            } else {
                edge.height += edge.labeloffset;
            }
        }
    });
}

/// Converts manual `layer` pins into working ranks, past the nesting root and any border
/// ranks.
fn scale_layers(g: &mut LayoutGraph) {
    let factor = g.graph().node_rank_factor.unwrap_or(1);
    let step = if g.graph().edge_label_space { factor * 2 } else { factor };
    g.for_each_node_mut(|_, node| {
        if let Some(layer) = node.layer.as_mut() {
            *layer = factor + *layer * step;
        }
    });
}

/// Ranks a copy of `g` without compound nodes and copies the ranks back.
fn rank_flat(g: &mut LayoutGraph) {
    let mut flat = util::as_non_compound_graph(g);
    rank::rank(&mut flat);
    for (v, node) in flat.node_labels() {
        if let Some(target) = g.node_mut(v) {
            target.rank = node.rank;
        }
    }
}

/// Pins the label rank of each labelled edge with a proxy node halfway along it, so empty rank
/// removal moves it together with the rest of the graph.
fn inject_edge_label_proxies(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        if !g.edge_by_key(&e).is_some_and(|label| label.has_label()) {
            continue;
        }
        let rank = |v: &str| g.node(v).and_then(|n| n.rank);
        let (Some(v_rank), Some(w_rank)) = (rank(&e.v), rank(&e.w)) else {
            continue;
        };
        let label = NodeLabel {
            rank: Some((w_rank - v_rank) / 2 + v_rank),
            edge_obj: Some(e),
            ..Default::default()
        };
        util::add_dummy_node(g, Dummy::EdgeProxy, label, "_ep");
    }
}

fn remove_edge_label_proxies(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        let Some(node) = g.node(&v) else { continue };
        if node.dummy != Some(Dummy::EdgeProxy) {
            continue;
        }
        let rank = node.rank;
        if let Some(e) = node.edge_obj.clone() {
            if let Some(label) = g.edge_mut_by_key(&e) {
                label.label_rank = rank;
            }
        }
        g.remove_node(&v);
    }
}

/// Records each subgraph's rank span, read off its top and bottom border nodes.
fn assign_rank_min_max(g: &mut LayoutGraph) {
    let mut max_rank = 0;
    for v in g.node_ids() {
        let Some(node) = g.node(&v) else { continue };
        let (Some(top), Some(bottom)) = (node.border_top.as_deref(), node.border_bottom.as_deref())
        else {
            continue;
        };
        let min = g.node(top).and_then(|n| n.rank);
        let max = g.node(bottom).and_then(|n| n.rank);
        if let Some(max) = max {
            max_rank = max_rank.max(max);
        }
        if let Some(node) = g.node_mut(&v) {
            node.min_rank = min;
            node.max_rank = max;
        }
    }
    g.graph_mut().max_rank = Some(max_rank);
    debug!(max_rank, "rank spans assigned");
}
