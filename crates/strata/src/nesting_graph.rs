//! Nesting graph for compound graphs.
//!
//! A synthetic root is linked to every top-level node, and each subgraph gets a top and a
//! bottom border node wired to its children. Existing `minlen`s are scaled by `2 * height + 1`
//! so the extra ranks can sit between real ones. The ranker then sees one connected graph in
//! which every subgraph spans a contiguous, properly nested range of ranks.

use crate::model::{Dummy, EdgeLabel, LayoutGraph, NodeLabel};
use crate::util;
use rustc_hash::FxHashMap;
use tracing::debug;

pub fn run(g: &mut LayoutGraph) {
    let root = util::add_dummy_node(g, Dummy::Root, NodeLabel::default(), "_root");
    let depths = tree_depths(g);
    let height = depths.values().copied().max().unwrap_or(1) - 1;
    let node_sep = 2 * height + 1;

    g.graph_mut().nesting_root = Some(root.clone());
    g.for_each_edge_mut(|_, e| e.minlen *= node_sep);

    let weight = g.edge_labels().map(|(_, e)| e.weight).sum::<f64>() + 1.0;
    let nesting = Nesting {
        root: &root,
        node_sep,
        weight,
        height,
        depths: &depths,
    };
    let top_level: Vec<String> = g.children_root().into_iter().map(str::to_string).collect();
    for v in top_level {
        nesting.visit(g, v);
    }

    g.graph_mut().node_rank_factor = Some(node_sep);
    debug!(height, node_sep, "nesting graph built");
}

/// Removes the synthetic root and every nesting edge. Border nodes stay; later phases read
/// their ranks.
pub fn cleanup(g: &mut LayoutGraph) {
    if let Some(root) = g.graph_mut().nesting_root.take() {
        g.remove_node(&root);
    }
    for e in g.edge_keys() {
        if g.edge_by_key(&e).is_some_and(|label| label.nesting_edge) {
            g.remove_edge_key(&e);
        }
    }
}

/// Depth of every node in the compound forest; top-level nodes have depth 1.
fn tree_depths(g: &LayoutGraph) -> FxHashMap<String, i32> {
    let mut depths: FxHashMap<String, i32> = FxHashMap::default();
    let mut stack: Vec<(String, i32)> = g
        .children_root()
        .into_iter()
        .map(|v| (v.to_string(), 1))
        .collect();
    while let Some((v, depth)) = stack.pop() {
        for child in g.children(&v) {
            stack.push((child.to_string(), depth + 1));
        }
        depths.insert(v, depth);
    }
    depths
}

struct Nesting<'a> {
    root: &'a str,
    node_sep: i32,
    weight: f64,
    height: i32,
    depths: &'a FxHashMap<String, i32>,
}

/// A subgraph whose children are being wired to its border nodes.
struct Frame {
    v: String,
    top: String,
    bottom: String,
    children: Vec<String>,
    next: usize,
}

impl Nesting<'_> {
    /// Wires `v` and everything below it. Children are linked to their parent's borders as
    /// soon as their own subtree is done.
    fn visit(&self, g: &mut LayoutGraph, v: String) {
        let Some(first) = self.enter(g, v) else {
            return;
        };
        let mut stack = vec![first];
        while let Some(frame) = stack.last_mut() {
            if let Some(child) = frame.children.get(frame.next).cloned() {
                frame.next += 1;
                match self.enter(g, child.clone()) {
                    Some(sub) => stack.push(sub),
                    None => {
                        let (top, bottom, parent) = (frame.top.clone(), frame.bottom.clone(), frame.v.clone());
                        self.link(g, &parent, &top, &bottom, &child);
                    }
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            if g.parent(&done.v).is_none() {
                let depth = self.depths.get(&done.v).copied().unwrap_or(1);
                g.set_edge_with_label(
                    self.root,
                    done.top.clone(),
                    EdgeLabel {
                        weight: 0.0,
                        minlen: self.height + depth,
                        nesting_edge: true,
                        ..Default::default()
                    },
                );
            }
            if let Some(parent) = stack.last() {
                let (top, bottom, pv) = (parent.top.clone(), parent.bottom.clone(), parent.v.clone());
                self.link(g, &pv, &top, &bottom, &done.v);
            }
        }
    }

    /// Leaves are hung off the root and yield `None`. Subgraphs get their border nodes and a
    /// frame for their children.
    fn enter(&self, g: &mut LayoutGraph, v: String) -> Option<Frame> {
        let children: Vec<String> = g.children(&v).into_iter().map(str::to_string).collect();
        if children.is_empty() {
            if v != self.root {
                g.set_edge_with_label(
                    self.root,
                    v,
                    EdgeLabel {
                        weight: 0.0,
                        minlen: self.node_sep,
                        ..Default::default()
                    },
                );
            }
            return None;
        }

        let top = util::add_border_node(g, "_bt", None, None);
        let bottom = util::add_border_node(g, "_bb", None, None);
        g.set_parent(top.clone(), v.clone());
        g.set_parent(bottom.clone(), v.clone());
        if let Some(label) = g.node_mut(&v) {
            label.border_top = Some(top.clone());
            label.border_bottom = Some(bottom.clone());
        }
        Some(Frame {
            v,
            top,
            bottom,
            children,
            next: 0,
        })
    }

    fn link(&self, g: &mut LayoutGraph, v: &str, top: &str, bottom: &str, child: &str) {
        let (child_top, child_bottom, bordered) = match g.node(child) {
            Some(node) => (
                node.border_top.clone().unwrap_or_else(|| child.to_string()),
                node.border_bottom.clone().unwrap_or_else(|| child.to_string()),
                node.border_top.is_some(),
            ),
            None => (child.to_string(), child.to_string(), false),
        };
        let weight = if bordered { self.weight } else { 2.0 * self.weight };
        let minlen = if child_top != child_bottom {
            1
        } else {
            self.height - self.depths.get(v).copied().unwrap_or(1) + 1
        };

        g.set_edge_with_label(
            top,
            child_top,
            EdgeLabel {
                weight,
                minlen,
                nesting_edge: true,
                ..Default::default()
            },
        );
        g.set_edge_with_label(
            child_bottom,
            bottom,
            EdgeLabel {
                weight,
                minlen,
                nesting_edge: true,
                ..Default::default()
            },
        );
    }
}
