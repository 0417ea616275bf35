use crate::graphlib::{EdgeKey, Graph};
use crate::model::NodeLabel;

/// Which side of a rank a layer graph looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    InEdges,
    OutEdges,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerGraphLabel {
    pub root: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightLabel {
    pub weight: f64,
}

/// Ordering view of a node in one rank. Subgraph nodes carry their border nodes for that
/// rank instead of an order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerNode {
    pub order: Option<usize>,
    pub fixorder: Option<usize>,
    pub border_left: Option<String>,
    pub border_right: Option<String>,
}

impl LayerNode {
    pub fn leaf(node: &NodeLabel) -> Self {
        Self {
            order: node.order,
            fixorder: node.fixorder,
            ..Default::default()
        }
    }

    pub fn subgraph(node: &NodeLabel, rank: i32) -> Self {
        Self {
            border_left: node.border_left.get(&rank).cloned(),
            border_right: node.border_right.get(&rank).cloned(),
            ..Default::default()
        }
    }
}

/// One rank's movable nodes, their hierarchy, and aggregated edges from the adjacent rank.
pub type LayerGraph = Graph<LayerNode, WeightLabel, LayerGraphLabel>;

/// Left-to-right constraints between sibling subgraphs.
pub type ConstraintGraph = Graph<(), (), ()>;

#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub v: String,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

/// A group of nodes that sorts as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct SortEntry {
    pub vs: Vec<String>,
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
    pub fixorder: Option<usize>,
    pub order: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortResult {
    pub vs: Vec<String>,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOptions {
    pub bias_right: bool,
    pub use_prev: bool,
    pub keep_node_order: bool,
}

pub(crate) fn edge_weight(g: &LayerGraph, e: &EdgeKey) -> f64 {
    g.edge_by_key(e).map_or(0.0, |label| label.weight)
}
