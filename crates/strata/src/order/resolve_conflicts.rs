use super::types::{BarycenterEntry, ConstraintGraph, SortEntry};
use rustc_hash::FxHashMap;

struct ConflictEntry {
    indegree: usize,
    ins: Vec<usize>,
    outs: Vec<usize>,
    vs: Vec<String>,
    i: usize,
    barycenter: Option<f64>,
    weight: Option<f64>,
    merged: bool,
}

/// Coalesces entries whose barycenters disagree with the constraint graph.
///
/// Entries are visited in topological order of `cg`. When a constrained predecessor has a
/// barycenter at or past its successor's, or either barycenter is unknown, the two merge into
/// one entry with the combined weight. The result keeps `cg`'s left-to-right constraints
/// whatever order the sort picks later. Each entry's `i` is the smallest input index it
/// absorbed.
pub fn resolve_conflicts(entries: &[BarycenterEntry], cg: &ConstraintGraph) -> Vec<SortEntry> {
    let mut mapped: Vec<ConflictEntry> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| ConflictEntry {
            indegree: 0,
            ins: Vec::new(),
            outs: Vec::new(),
            vs: vec![entry.v.clone()],
            i,
            barycenter: entry.barycenter,
            weight: entry.weight,
            merged: false,
        })
        .collect();
    let index: FxHashMap<&str, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.v.as_str(), i))
        .collect();

    for e in cg.edges() {
        let (Some(&v), Some(&w)) = (index.get(e.v.as_str()), index.get(e.w.as_str())) else {
            continue;
        };
        mapped[w].indegree += 1;
        mapped[v].outs.push(w);
    }

    let mut sources: Vec<usize> = (0..mapped.len()).filter(|&i| mapped[i].indegree == 0).collect();
    let mut processed: Vec<usize> = Vec::new();
    while let Some(v) = sources.pop() {
        processed.push(v);

        let ins = mapped[v].ins.clone();
        for &u in ins.iter().rev() {
            if mapped[u].merged {
                continue;
            }
            let should_merge = match (mapped[u].barycenter, mapped[v].barycenter) {
                (Some(ub), Some(vb)) => ub >= vb,
                _ => true,
            };
            if should_merge {
                merge_entries(&mut mapped, v, u);
            }
        }

        let outs = mapped[v].outs.clone();
        for w in outs {
            mapped[w].ins.push(v);
            mapped[w].indegree -= 1;
            if mapped[w].indegree == 0 {
                sources.push(w);
            }
        }
    }

    let mut out = Vec::new();
    for ix in processed {
        let entry = &mut mapped[ix];
        if entry.merged {
            continue;
        }
        out.push(SortEntry {
            vs: std::mem::take(&mut entry.vs),
            i: entry.i,
            barycenter: entry.barycenter,
            weight: entry.weight,
            fixorder: None,
            order: None,
        });
    }
    out
}

fn merge_entries(mapped: &mut [ConflictEntry], target: usize, source: usize) {
    let mut sum = 0.0;
    let mut weight = 0.0;
    for ix in [target, source] {
        if let (Some(b), Some(w)) = (mapped[ix].barycenter, mapped[ix].weight) {
            sum += b * w;
            weight += w;
        }
    }

    let mut vs = std::mem::take(&mut mapped[source].vs);
    vs.append(&mut mapped[target].vs);
    mapped[target].vs = vs;
    if weight > 0.0 {
        mapped[target].barycenter = Some(sum / weight);
        mapped[target].weight = Some(weight);
    }
    mapped[target].i = mapped[target].i.min(mapped[source].i);
    mapped[source].merged = true;
}
