//! Rank assignment.
//!
//! Every ranker satisfies `rank(w) - rank(v) >= minlen` for each edge `v -> w`. Results are
//! not normalized here; the pipeline shifts them afterwards.

pub mod feasible_tree;
pub mod network_simplex;
pub mod tree;
pub mod util;

use crate::model::{LayoutGraph, Ranker};
use tracing::debug;

pub trait RankStrategy {
    fn assign_ranks(&self, g: &mut LayoutGraph);
}

/// Fast, but ranks pile up towards the sinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestPath;

/// Longest path tightened into a feasible tree. Honors manual `layer` pins.
#[derive(Debug, Clone, Copy, Default)]
pub struct TightTree;

/// Minimizes total weighted edge length.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkSimplex;

impl RankStrategy for LongestPath {
    fn assign_ranks(&self, g: &mut LayoutGraph) {
        util::longest_path(g);
    }
}

impl RankStrategy for TightTree {
    fn assign_ranks(&self, g: &mut LayoutGraph) {
        util::longest_path_with_layer(g);
        feasible_tree::feasible_tree_with_layer(g);
    }
}

impl RankStrategy for NetworkSimplex {
    fn assign_ranks(&self, g: &mut LayoutGraph) {
        network_simplex::network_simplex(g);
    }
}

impl Ranker {
    pub fn strategy(self) -> &'static dyn RankStrategy {
        match self {
            Ranker::NetworkSimplex => &NetworkSimplex,
            Ranker::TightTree => &TightTree,
            Ranker::LongestPath => &LongestPath,
        }
    }
}

/// Ranks `g` with the ranker selected on its graph label.
pub fn rank(g: &mut LayoutGraph) {
    let ranker = g.graph().ranker;
    debug!(?ranker, nodes = g.node_count(), "assigning ranks");
    ranker.strategy().assign_ranks(g);
}
