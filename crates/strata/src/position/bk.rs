//! Brandes-Köpf horizontal coordinate assignment.
//!
//! "Fast and Simple Horizontal Coordinate Assignment", Brandes and Köpf, with the usual
//! adjustments: four alignments (up/down crossed with left/right) are computed, shifted onto
//! the narrowest one and then either one is picked or the median of the four is taken.

use crate::graphlib::{Graph, GraphOptions};
use crate::model::{Align, BorderSide, Dummy, LabelPos, LayoutGraph, NodeLabel};
use crate::util;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Unordered node pairs whose segments may not be aligned.
pub type Conflicts = FxHashMap<String, FxHashSet<String>>;

pub type Xs = FxHashMap<String, f64>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockAlignment {
    /// Block root of each node.
    pub root: FxHashMap<String, String>,
    /// Next node in the block, cycling back to the root.
    pub align: FxHashMap<String, String>,
}

pub fn position_x(g: &LayoutGraph) -> Xs {
    let layering = util::build_layer_matrix(g);
    let mut conflicts = find_type1_conflicts(g, &layering);
    for (v, ws) in find_type2_conflicts(g, &layering) {
        conflicts.entry(v).or_default().extend(ws);
    }

    let mut xss: Vec<(Align, Xs)> = Vec::with_capacity(4);
    for up in [true, false] {
        let mut adjusted: Vec<Vec<String>> = if up {
            layering.clone()
        } else {
            layering.iter().rev().cloned().collect()
        };
        for left in [true, false] {
            if !left {
                adjusted = adjusted
                    .into_iter()
                    .map(|layer| layer.into_iter().rev().collect())
                    .collect();
            }

            let neighbors = |v: &str| -> Vec<String> {
                let ws = if up { g.predecessors(v) } else { g.successors(v) };
                ws.into_iter().map(str::to_string).collect()
            };
            let alignment = vertical_alignment(&adjusted, &conflicts, neighbors);
            let mut xs = horizontal_compaction(g, &adjusted, &alignment.root, &alignment.align, !left);
            if !left {
                xs.values_mut().for_each(|x| *x = -*x);
            }

            let align = match (up, left) {
                (true, true) => Align::UL,
                (true, false) => Align::UR,
                (false, true) => Align::DL,
                (false, false) => Align::DR,
            };
            xss.push((align, xs));
        }
    }

    let smallest = find_smallest_width_alignment(g, &xss);
    debug!(?smallest, "narrowest alignment");
    align_coordinates(&mut xss, smallest);
    balance(&xss, g.graph().align)
}

/// Marks non-inner segments that cross an inner segment (dummy to dummy). Alignment prefers
/// keeping long edges straight, so those crossings are given up.
pub fn find_type1_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts = Conflicts::default();
    for pair in layering.windows(2) {
        let (prev_layer, layer) = (&pair[0], &pair[1]);
        let mut k0 = 0;
        let mut scan_pos = 0;
        let last = layer.len().saturating_sub(1);

        for (i, v) in layer.iter().enumerate() {
            let w = find_other_inner_segment_node(g, v);
            let k1 = w
                .and_then(|w| g.node(w))
                .and_then(|n| n.order)
                .unwrap_or(prev_layer.len());
            if w.is_none() && i != last {
                continue;
            }

            for scan_node in &layer[scan_pos..=i] {
                let scan_dummy = is_dummy(g, scan_node);
                for u in g.predecessors(scan_node) {
                    let Some(u_label) = g.node(u) else { continue };
                    let u_pos = u_label.order.unwrap_or(0);
                    if (u_pos < k0 || k1 < u_pos) && !(u_label.is_dummy() && scan_dummy) {
                        add_conflict(&mut conflicts, u, scan_node);
                    }
                }
            }
            scan_pos = i + 1;
            k0 = k1;
        }
    }
    conflicts
}

/// Marks dummy segments that cross a subgraph border segment between the same two ranks.
pub fn find_type2_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts = Conflicts::default();

    let scan = |conflicts: &mut Conflicts,
                south: &[String],
                range: std::ops::Range<usize>,
                prev_north_border: Option<usize>,
                next_north_border: Option<usize>| {
        for v in &south[range] {
            if !is_dummy(g, v) {
                continue;
            }
            for u in g.predecessors(v) {
                let Some(u_node) = g.node(u) else { continue };
                if !u_node.is_dummy() {
                    continue;
                }
                let order = u_node.order.unwrap_or(0);
                let before = prev_north_border.is_some_and(|p| order < p);
                let after = next_north_border.is_some_and(|n| order > n);
                if before || after {
                    add_conflict(conflicts, u, v);
                }
            }
        }
    };

    for pair in layering.windows(2) {
        let (north, south) = (&pair[0], &pair[1]);
        let mut prev_north_pos: Option<usize> = None;
        let mut next_north_pos: Option<usize> = None;
        let mut south_pos = 0;

        for (south_lookahead, v) in south.iter().enumerate() {
            let border = g.node(v).and_then(|n| n.dummy) == Some(Dummy::Border);
            if let Some(pred) = g.first_predecessor(v).filter(|_| border) {
                next_north_pos = Some(g.node(pred).and_then(|n| n.order).unwrap_or(0));
                scan(&mut conflicts, south, south_pos..south_lookahead, prev_north_pos, next_north_pos);
                south_pos = south_lookahead;
                prev_north_pos = next_north_pos;
            }
            scan(&mut conflicts, south, south_pos..south.len(), next_north_pos, Some(north.len()));
        }
    }
    conflicts
}

/// For a dummy `v`, the dummy predecessor that forms an inner segment with it.
fn find_other_inner_segment_node<'a>(g: &'a LayoutGraph, v: &str) -> Option<&'a str> {
    if !is_dummy(g, v) {
        return None;
    }
    g.predecessors(v).into_iter().find(|u| is_dummy(g, u))
}

fn is_dummy(g: &LayoutGraph, v: &str) -> bool {
    g.node(v).is_some_and(NodeLabel::is_dummy)
}

pub fn add_conflict(conflicts: &mut Conflicts, v: &str, w: &str) {
    let (v, w) = if v > w { (w, v) } else { (v, w) };
    conflicts.entry(v.to_string()).or_default().insert(w.to_string());
}

pub fn has_conflict(conflicts: &Conflicts, v: &str, w: &str) -> bool {
    let (v, w) = if v > w { (w, v) } else { (v, w) };
    conflicts.get(v).is_some_and(|ws| ws.contains(w))
}

/// Groups nodes into vertical blocks. Each node tries to align with the median of its
/// neighbors in the previous layer, left to right, skipping conflicting segments and segments
/// that would cross an alignment already made in this layer.
pub fn vertical_alignment<F>(
    layering: &[Vec<String>],
    conflicts: &Conflicts,
    neighbor_fn: F,
) -> BlockAlignment
where
    F: Fn(&str) -> Vec<String>,
{
    let mut root: FxHashMap<String, String> = FxHashMap::default();
    let mut align: FxHashMap<String, String> = FxHashMap::default();
    let mut pos: FxHashMap<&str, usize> = FxHashMap::default();

    for layer in layering {
        for (order, v) in layer.iter().enumerate() {
            root.insert(v.clone(), v.clone());
            align.insert(v.clone(), v.clone());
            pos.insert(v, order);
        }
    }

    for layer in layering {
        let mut prev_idx: Option<usize> = None;
        for v in layer {
            let mut ws = neighbor_fn(v);
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|w| pos.get(w.as_str()).copied().unwrap_or(usize::MAX));

            let lo = (ws.len() - 1) / 2;
            let hi = ws.len() / 2;
            for w in &ws[lo..=hi] {
                let Some(&w_pos) = pos.get(w.as_str()) else { continue };
                let unaligned = align.get(v).is_some_and(|a| a == v);
                if unaligned
                    && prev_idx.is_none_or(|p| p < w_pos)
                    && !has_conflict(conflicts, v, w)
                {
                    let w_root = root.get(w).cloned().unwrap_or_else(|| w.clone());
                    align.insert(w.clone(), v.clone());
                    align.insert(v.clone(), w_root.clone());
                    root.insert(v.clone(), w_root);
                    prev_idx = Some(w_pos);
                }
            }
        }
    }

    BlockAlignment { root, align }
}

/// Places every block as far left as its separation constraints allow, then pulls blocks
/// right towards their successors where that does not widen the layout.
pub fn horizontal_compaction(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    root: &FxHashMap<String, String>,
    align: &FxHashMap<String, String>,
    reverse_sep: bool,
) -> Xs {
    let block_g = build_block_graph(g, layering, root, reverse_sep);
    let border_type = if reverse_sep {
        BorderSide::Left
    } else {
        BorderSide::Right
    };
    let mut xs = Xs::default();

    iterate(&block_g, Sweep::Predecessors, |elem| {
        let x = block_g
            .in_edges(elem, None)
            .iter()
            .map(|e| {
                let sep = block_g.edge_by_key(e).copied().unwrap_or(0.0);
                xs.get(&e.v).copied().unwrap_or(0.0) + sep
            })
            .fold(0.0, f64::max);
        xs.insert(elem.to_string(), x);
    });

    iterate(&block_g, Sweep::Successors, |elem| {
        let min = block_g
            .out_edges(elem, None)
            .iter()
            .map(|e| {
                let sep = block_g.edge_by_key(e).copied().unwrap_or(0.0);
                xs.get(&e.w).copied().unwrap_or(0.0) - sep
            })
            .fold(f64::INFINITY, f64::min);
        let pinned = g.node(elem).and_then(|n| n.border_type) == Some(border_type);
        if min.is_finite() && !pinned {
            let x = xs.entry(elem.to_string()).or_insert(0.0);
            *x = x.max(min);
        }
    });

    align
        .keys()
        .map(|v| {
            let r = root.get(v).unwrap_or(v);
            (v.clone(), xs.get(r).copied().unwrap_or(0.0))
        })
        .collect()
}

type BlockGraph = Graph<(), f64, ()>;

#[derive(Debug, Clone, Copy)]
enum Sweep {
    Predecessors,
    Successors,
}

/// Walks the block graph depth-first along `sweep`, calling `set` on a node each time it is
/// popped after its neighbors were pushed.
fn iterate<S>(block_g: &BlockGraph, sweep: Sweep, mut set: S)
where
    S: FnMut(&str),
{
    let mut stack: Vec<String> = block_g.node_ids();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    while let Some(elem) = stack.pop() {
        if visited.contains(&elem) {
            set(&elem);
            continue;
        }
        visited.insert(elem.clone());
        let next = match sweep {
            Sweep::Predecessors => block_g.predecessors(&elem),
            Sweep::Successors => block_g.successors(&elem),
        };
        let next: Vec<String> = next.into_iter().map(str::to_string).collect();
        stack.push(elem);
        stack.extend(next);
    }
}

/// One node per block root; an edge from each block to the block on its right, weighted with
/// the minimum separation between them.
fn build_block_graph(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    root: &FxHashMap<String, String>,
    reverse_sep: bool,
) -> BlockGraph {
    let mut block_g: BlockGraph = Graph::new(GraphOptions::default());
    let (nodesep, edgesep) = (g.graph().nodesep, g.graph().edgesep);
    for layer in layering {
        let mut u: Option<&str> = None;
        for v in layer {
            let v_root = root.get(v).unwrap_or(v).clone();
            block_g.ensure_node(v_root.clone());
            if let Some(u) = u {
                let u_root = root.get(u).map_or(u, String::as_str).to_string();
                let prev = block_g.edge(&u_root, &v_root, None).copied().unwrap_or(0.0);
                let s = sep(g, nodesep, edgesep, reverse_sep, v, u);
                block_g.set_edge_with_label(u_root, v_root, s.max(prev));
            }
            u = Some(v);
        }
    }
    block_g
}

/// Minimum center distance between neighbors `v` and `w`. Edge label dummies placed left or
/// right of their edge are shifted by half their width.
fn sep(g: &LayoutGraph, nodesep: f64, edgesep: f64, reverse_sep: bool, v: &str, w: &str) -> f64 {
    let (Some(v_label), Some(w_label)) = (g.node(v), g.node(w)) else {
        return 0.0;
    };
    let signed = |delta: f64| if reverse_sep { delta } else { -delta };
    let gap = |n: &NodeLabel| (if n.is_dummy() { edgesep } else { nodesep }) / 2.0;

    let mut sum = v_label.width / 2.0;
    sum += signed(label_shift(v_label));
    sum += gap(v_label) + gap(w_label);
    sum += w_label.width / 2.0;
    sum += signed(-label_shift(w_label));
    sum
}

fn label_shift(n: &NodeLabel) -> f64 {
    match n.labelpos {
        Some(LabelPos::L) => -n.width / 2.0,
        Some(LabelPos::R) => n.width / 2.0,
        _ => 0.0,
    }
}

fn width(g: &LayoutGraph, v: &str) -> f64 {
    g.node(v).map_or(0.0, |n| n.width)
}

/// The alignment with the smallest total extent. Ties keep the first in `xss` order.
pub fn find_smallest_width_alignment(g: &LayoutGraph, xss: &[(Align, Xs)]) -> Align {
    let mut best = (Align::UL, f64::INFINITY);
    for (align, xs) in xss {
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for (v, &x) in xs {
            let half = width(g, v) / 2.0;
            max = max.max(x + half);
            min = min.min(x - half);
        }
        let extent = max - min;
        if extent < best.1 {
            best = (*align, extent);
        }
    }
    best.0
}

/// Shifts every alignment onto `align_to`: left-biased ones share its minimum, right-biased
/// ones its maximum.
pub fn align_coordinates(xss: &mut [(Align, Xs)], align_to: Align) {
    let Some((to_min, to_max)) = xss
        .iter()
        .find(|(a, _)| *a == align_to)
        .and_then(|(_, xs)| util::min_max(xs.values().copied()))
    else {
        return;
    };

    for (align, xs) in xss.iter_mut() {
        if *align == align_to {
            continue;
        }
        let Some((min, max)) = util::min_max(xs.values().copied()) else {
            continue;
        };
        let delta = if align.is_left() { to_min - min } else { to_max - max };
        if delta != 0.0 {
            xs.values_mut().for_each(|x| *x += delta);
        }
    }
}

/// Final coordinates: the requested alignment if any, otherwise the mean of the two median
/// candidates of the four alignments.
pub fn balance(xss: &[(Align, Xs)], align: Option<Align>) -> Xs {
    let lookup = |a: Align| xss.iter().find(|(x, _)| *x == a).map(|(_, xs)| xs);
    let Some(reference) = lookup(Align::UL) else {
        return Xs::default();
    };

    if let Some(chosen) = align.and_then(lookup) {
        return reference
            .keys()
            .map(|v| (v.clone(), chosen.get(v).copied().unwrap_or(0.0)))
            .collect();
    }

    reference
        .keys()
        .map(|v| {
            let mut vals: Vec<f64> = xss
                .iter()
                .map(|(_, xs)| xs.get(v).copied().unwrap_or(0.0))
                .collect();
            vals.sort_by(f64::total_cmp);
            let x = match vals.len() {
                4 => (vals[1] + vals[2]) / 2.0,
                0 => 0.0,
                n => vals[n / 2],
            };
            (v.clone(), x)
        })
        .collect()
}
