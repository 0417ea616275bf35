//! Slot entries backing [`Graph`](super::Graph).

use super::EdgeKey;

#[derive(Debug, Clone)]
pub(in crate::graph) struct NodeEntry<N> {
    pub(in crate::graph) id: String,
    pub(in crate::graph) label: N,
    pub(in crate::graph) parent: Option<usize>,
    pub(in crate::graph) children: Vec<usize>,
    pub(in crate::graph) out: Vec<usize>,
    pub(in crate::graph) in_: Vec<usize>,
}

impl<N> NodeEntry<N> {
    pub(in crate::graph) fn new(id: String, label: N) -> Self {
        Self {
            id,
            label,
            parent: None,
            children: Vec::new(),
            out: Vec::new(),
            in_: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(in crate::graph) struct EdgeEntry<E> {
    pub(in crate::graph) key: EdgeKey,
    pub(in crate::graph) v_ix: usize,
    pub(in crate::graph) w_ix: usize,
    pub(in crate::graph) label: E,
}

impl<E> EdgeEntry<E> {
    /// Endpoint opposite to `ix` (the edge's own tail for self loops).
    pub(in crate::graph) fn other(&self, ix: usize) -> usize {
        if self.v_ix == ix { self.w_ix } else { self.v_ix }
    }
}
