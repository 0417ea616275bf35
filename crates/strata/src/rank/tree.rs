//! Spanning-tree labels used while ranking.

use crate::graphlib::Graph;

/// Undirected spanning tree over the ranked graph.
pub type TreeGraph = Graph<TreeNodeLabel, TreeEdgeLabel, ()>;

/// `low..=lim` is the postorder interval of the node's subtree; `parent` is the tree parent
/// relative to the root used for numbering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNodeLabel {
    pub low: i32,
    pub lim: i32,
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeEdgeLabel {
    pub cutvalue: f64,
}
