//! Assign dummy chain nodes to compound parents.
//!
//! Each chain walks from its tail up to the lowest common ancestor of the edge's endpoints and
//! then down towards the head. A dummy is parented to the subgraph on that path whose rank
//! range covers it.

use crate::model::LayoutGraph;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy)]
struct PostorderNum {
    low: usize,
    lim: usize,
}

pub fn parent_dummy_chains(g: &mut LayoutGraph) {
    let nums = postorder_nums(g);
    let chains = g.graph().dummy_chains.clone();

    for start in chains {
        let Some(edge_obj) = g.node(&start).and_then(|n| n.edge_obj.clone()) else {
            continue;
        };
        let (path, lca) = find_path(g, &nums, &edge_obj.v, &edge_obj.w);
        let mut path_idx = 0;
        let mut ascending = true;
        let mut v = start;

        while v != edge_obj.w {
            let Some(rank) = g.node(&v).and_then(|n| n.rank) else {
                break;
            };
            let mut path_v: Option<String> = path.get(path_idx).cloned().flatten();

            if ascending {
                while path_idx < path.len() && path_v != lca {
                    let max_rank = path_v.as_deref().and_then(|p| g.node(p)).and_then(|n| n.max_rank);
                    if !max_rank.is_some_and(|m| m < rank) {
                        break;
                    }
                    path_idx += 1;
                    path_v = path.get(path_idx).cloned().flatten();
                }
                if path_v == lca {
                    ascending = false;
                }
            }

            if !ascending {
                while path_idx + 1 < path.len() {
                    let min_rank = path[path_idx + 1]
                        .as_deref()
                        .and_then(|p| g.node(p))
                        .and_then(|n| n.min_rank);
                    if !min_rank.is_some_and(|m| m <= rank) {
                        break;
                    }
                    path_idx += 1;
                }
                path_v = path.get(path_idx).cloned().flatten();
            }

            if let Some(parent) = path_v {
                g.set_parent(v.clone(), parent);
            }
            let Some(next) = g.first_successor(&v).map(str::to_string) else {
                break;
            };
            v = next;
        }
    }
}

/// Ancestors of `v` up to and including the lowest common ancestor, followed by the
/// ancestors of `w` below it, top-down. `None` stands for the graph root.
fn find_path(
    g: &LayoutGraph,
    nums: &FxHashMap<String, PostorderNum>,
    v: &str,
    w: &str,
) -> (Vec<Option<String>>, Option<String>) {
    let (Some(v_num), Some(w_num)) = (nums.get(v), nums.get(w)) else {
        return (vec![None], None);
    };
    let low = v_num.low.min(w_num.low);
    let lim = v_num.lim.max(w_num.lim);

    let mut v_path: Vec<Option<String>> = Vec::new();
    let mut parent: Option<String> = Some(v.to_string());
    loop {
        parent = parent.as_deref().and_then(|p| g.parent(p)).map(str::to_string);
        v_path.push(parent.clone());
        let Some(p) = parent.as_deref() else { break };
        let Some(num) = nums.get(p) else { break };
        if num.low <= low && lim <= num.lim {
            break;
        }
    }
    let lca = parent;

    let mut w_path: Vec<Option<String>> = Vec::new();
    let mut current = w.to_string();
    loop {
        let next = g.parent(&current).map(str::to_string);
        if next == lca {
            break;
        }
        let Some(next) = next else { break };
        w_path.push(Some(next.clone()));
        current = next;
    }

    v_path.extend(w_path.into_iter().rev());
    (v_path, lca)
}

fn postorder_nums(g: &LayoutGraph) -> FxHashMap<String, PostorderNum> {
    struct Frame<'a> {
        v: &'a str,
        children: Vec<&'a str>,
        pos: usize,
        low: usize,
    }

    let mut result: FxHashMap<String, PostorderNum> = FxHashMap::default();
    let mut lim = 0;
    for root in g.children_root() {
        let mut stack = vec![Frame {
            v: root,
            children: g.children(root),
            pos: 0,
            low: lim,
        }];
        while let Some(frame) = stack.last_mut() {
            if let Some(&child) = frame.children.get(frame.pos) {
                frame.pos += 1;
                stack.push(Frame {
                    v: child,
                    children: g.children(child),
                    pos: 0,
                    low: lim,
                });
                continue;
            }
            let Some(done) = stack.pop() else { break };
            result.insert(done.v.to_string(), PostorderNum { low: done.low, lim });
            lim += 1;
        }
    }
    result
}
