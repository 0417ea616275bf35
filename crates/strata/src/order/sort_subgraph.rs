use super::barycenter::barycenter;
use super::resolve_conflicts::resolve_conflicts;
use super::sort::sort;
use super::types::{BarycenterEntry, ConstraintGraph, LayerGraph, SortEntry, SortOptions, SortResult};
use rustc_hash::FxHashMap;

/// Sorts the children of `v` in the layer graph, recursing into nested subgraphs. A subgraph
/// is sorted as one block framed by its border nodes, using the barycenter of its contents.
///
/// Subgraphs are handled bottom-up with an explicit stack; each finished result waits in a
/// map until its parent picks it up.
pub fn sort_subgraph(g: &LayerGraph, v: &str, cg: &ConstraintGraph, opts: SortOptions) -> SortResult {
    let mut done: FxHashMap<String, SortResult> = FxHashMap::default();
    for sg in subgraph_postorder(g, v) {
        let result = sort_one(g, &sg, cg, opts, &mut done);
        done.insert(sg, result);
    }
    done.remove(v).unwrap_or_default()
}

/// `v` and every nested subgraph below it, children before parents.
fn subgraph_postorder(g: &LayerGraph, v: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut stack: Vec<(&str, bool)> = vec![(v, false)];
    while let Some((u, expanded)) = stack.pop() {
        if expanded {
            out.push(u.to_string());
            continue;
        }
        stack.push((u, true));
        for child in g.children(u).into_iter().rev() {
            if g.has_children(child) {
                stack.push((child, false));
            }
        }
    }
    out
}

fn sort_one(
    g: &LayerGraph,
    v: &str,
    cg: &ConstraintGraph,
    opts: SortOptions,
    done: &mut FxHashMap<String, SortResult>,
) -> SortResult {
    let node = g.node(v);
    let bl = node.and_then(|n| n.border_left.clone());
    let br = node.and_then(|n| n.border_right.clone());
    let movable: Vec<String> = g
        .children(v)
        .into_iter()
        .filter(|w| Some(*w) != bl.as_deref() && Some(*w) != br.as_deref())
        .map(str::to_string)
        .collect();

    let mut barycenters = barycenter(g, &movable);
    for entry in &mut barycenters {
        if let Some(sub) = done.get(&entry.v) {
            if let Some(b) = sub.barycenter {
                merge_barycenters(entry, b, sub.weight.unwrap_or(0.0));
            }
        }
    }

    let mut entries = resolve_conflicts(&barycenters, cg);
    expand_subgraphs(&mut entries, done);
    for entry in &mut entries {
        if let Some(first) = entry.vs.first().and_then(|w| g.node(w)) {
            entry.fixorder = first.fixorder;
            entry.order = first.order;
        }
    }

    let mut result = sort(entries, opts);

    if let (Some(bl), Some(br)) = (bl, br) {
        let mut vs = Vec::with_capacity(result.vs.len() + 2);
        vs.push(bl.clone());
        vs.append(&mut result.vs);
        vs.push(br.clone());
        result.vs = vs;

        let order_of = |w: &str| g.node(w).and_then(|n| n.order).unwrap_or(0) as f64;
        let bl_pred = g.first_predecessor(&bl);
        let br_pred = g.first_predecessor(&br);
        if let (Some(bl_pred), Some(br_pred)) = (bl_pred, br_pred) {
            let barycenter = result.barycenter.unwrap_or(0.0);
            let weight = result.weight.unwrap_or(0.0);
            result.barycenter =
                Some((barycenter * weight + order_of(bl_pred) + order_of(br_pred)) / (weight + 2.0));
            result.weight = Some(weight + 2.0);
        }
    }
    result
}

fn merge_barycenters(target: &mut BarycenterEntry, barycenter: f64, weight: f64) {
    match (target.barycenter, target.weight) {
        (Some(tb), Some(tw)) if tw + weight > 0.0 => {
            target.barycenter = Some((tb * tw + barycenter * weight) / (tw + weight));
            target.weight = Some(tw + weight);
        }
        _ => {
            target.barycenter = Some(barycenter);
            target.weight = Some(weight);
        }
    }
}

fn expand_subgraphs(entries: &mut [SortEntry], done: &mut FxHashMap<String, SortResult>) {
    for entry in entries {
        let vs = std::mem::take(&mut entry.vs);
        for v in vs {
            match done.remove(&v) {
                Some(sub) => entry.vs.extend(sub.vs),
                None => entry.vs.push(v),
            }
        }
    }
}
