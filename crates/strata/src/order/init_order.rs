use crate::model::LayoutGraph;
use rustc_hash::FxHashSet;

/// Initial layering. Nodes with a `fixorder` come first in `fixorder` order; the rest are
/// appended by a depth-first walk over successors, starting from the lowest ranks. Subgraph
/// nodes are not ordered.
pub fn init_order(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut simple: Vec<(&str, i32)> = g
        .node_labels()
        .filter(|(v, _)| !g.has_children(v))
        .filter_map(|(v, n)| Some((v, n.rank?)))
        .collect();
    let Some(max_rank) = simple.iter().map(|&(_, r)| r).max() else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<String>> = vec![Vec::new(); usize::try_from(max_rank).unwrap_or(0) + 1];
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let place = |v: &str, rank: i32, layers: &mut Vec<Vec<String>>| {
        if let Some(layer) = usize::try_from(rank).ok().and_then(|r| layers.get_mut(r)) {
            layer.push(v.to_string());
        }
    };

    simple.sort_by_key(|&(_, r)| r);

    let mut fixed: Vec<(&str, i32, usize)> = simple
        .iter()
        .filter_map(|&(v, r)| Some((v, r, g.node(v)?.fixorder?)))
        .collect();
    fixed.sort_by_key(|&(_, _, f)| f);
    for (v, rank, _) in fixed {
        visited.insert(v);
        place(v, rank, &mut layers);
    }

    for &(start, rank) in &simple {
        if !visited.insert(start) {
            continue;
        }
        place(start, rank, &mut layers);
        let mut stack: Vec<(Vec<&str>, usize)> = vec![(g.successors(start), 0)];
        while let Some((succs, pos)) = stack.last_mut() {
            let Some(&w) = succs.get(*pos) else {
                stack.pop();
                continue;
            };
            *pos += 1;
            if !visited.insert(w) {
                continue;
            }
            if let Some(rank) = g.node(w).and_then(|n| n.rank) {
                place(w, rank, &mut layers);
            }
            stack.push((g.successors(w), 0));
        }
    }
    layers
}
