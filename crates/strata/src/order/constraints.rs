use super::types::{ConstraintGraph, LayerGraph};
use rustc_hash::FxHashMap;

/// Records, for the sorted `vs`, which sibling subgraph came first under each common
/// parent. Later sweeps must keep those subgraphs in the same left-to-right order.
pub fn add_subgraph_constraints(g: &LayerGraph, cg: &mut ConstraintGraph, vs: &[String]) {
    // Last subgraph seen under each parent; `None` keys the top level.
    let mut last_seen: FxHashMap<Option<&str>, &str> = FxHashMap::default();

    for v in vs {
        let mut child = g.parent(v);
        while let Some(c) = child {
            let parent = g.parent(c);
            match last_seen.insert(parent, c) {
                Some(prev) if prev != c => {
                    cg.set_edge(prev, c);
                    break;
                }
                _ => child = parent,
            }
        }
    }
}
