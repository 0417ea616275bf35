use crate::graphlib::EdgeKey;
use crate::model::LayoutGraph;
use rustc_hash::FxHashSet;

/// Initial ranking: a node sits as low as its successors allow, and sinks get rank 0.
///
/// Ranks are not normalized. Most are negative, and everything leans towards the sinks.
pub fn longest_path(g: &mut LayoutGraph) {
    struct Frame {
        v: String,
        out: Vec<EdgeKey>,
        pos: usize,
        rank: Option<i32>,
    }

    let sources: Vec<String> = g.sources().into_iter().map(str::to_string).collect();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    for source in sources {
        if !visited.insert(source.clone()) {
            continue;
        }
        let out = g.out_edges(&source, None);
        let mut stack = vec![Frame {
            v: source,
            out,
            pos: 0,
            rank: None,
        }];

        while let Some(frame) = stack.last_mut() {
            if let Some(e) = frame.out.get(frame.pos).cloned() {
                frame.pos += 1;
                if visited.insert(e.w.clone()) {
                    let out = g.out_edges(&e.w, None);
                    stack.push(Frame {
                        v: e.w,
                        out,
                        pos: 0,
                        rank: None,
                    });
                } else {
                    let w_rank = g.node(&e.w).and_then(|n| n.rank).unwrap_or(0);
                    let candidate = w_rank - minlen(g, &e);
                    frame.rank = Some(frame.rank.map_or(candidate, |r| r.min(candidate)));
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            let rank = done.rank.unwrap_or(0);
            if let Some(node) = g.node_mut(&done.v) {
                node.rank = Some(rank);
            }
            if let Some(parent) = stack.last_mut() {
                let via = &parent.out[parent.pos - 1];
                let candidate = rank - minlen(g, via);
                parent.rank = Some(parent.rank.map_or(candidate, |r| r.min(candidate)));
            }
        }
    }
}

/// Longest path shifted to start at 0, then pushed down so that every node with a `layer`
/// sits at least on that layer and its descendants still respect `minlen`.
pub fn longest_path_with_layer(g: &mut LayoutGraph) {
    longest_path(g);
    crate::util::normalize_ranks(g);

    let pinned: Vec<String> = g
        .node_labels()
        .filter(|(_, n)| n.layer.is_some())
        .map(|(v, _)| v.to_string())
        .collect();

    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut stack: Vec<(String, i32)> = pinned
        .into_iter()
        .rev()
        .filter_map(|v| {
            let layer = g.node(&v).and_then(|n| n.layer)?;
            Some((v, layer))
        })
        .collect();
    while let Some((v, at_least)) = stack.pop() {
        let Some(node) = g.node_mut(&v) else { continue };
        let target = node.layer.unwrap_or(at_least);
        let current = node.rank.unwrap_or(0);
        let raised = current < target;
        if raised {
            node.rank = Some(target);
        }
        let rank = node.rank.unwrap_or(0);
        if visited.insert(v.clone()) || raised {
            for e in g.out_edges(&v, None) {
                let next = rank + minlen(g, &e);
                stack.push((e.w, next));
            }
        }
    }
}

/// `rank(w) - rank(v) - minlen`; zero means the edge is tight.
pub fn slack(g: &LayoutGraph, e: &EdgeKey) -> i32 {
    let rank = |v: &str| g.node(v).and_then(|n| n.rank).unwrap_or(0);
    rank(&e.w) - rank(&e.v) - minlen(g, e)
}

pub(crate) fn minlen(g: &LayoutGraph, e: &EdgeKey) -> i32 {
    g.edge_by_key(e).map_or(1, |label| label.minlen)
}
