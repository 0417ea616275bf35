//! Greedy feedback arc set (Eades, Lin and Smyth).
//!
//! Sinks and sources are peeled off first. A node counts as a sink or source by its remaining
//! edge count, so edges of weight 0 still tie it into a cycle. When neither is left the node
//! with the largest `out - in` weight goes next and its incoming edges join the arc set.

use crate::graphlib::EdgeKey;
use crate::model::{EdgeLabel, LayoutGraph};
use rustc_hash::FxHashMap;
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, VecDeque};

/// `f64` weight delta ordered with `total_cmp`.
#[derive(Debug, Clone, Copy)]
struct Delta(f64);

impl PartialEq for Delta {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Delta {}

impl PartialOrd for Delta {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Delta {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Class {
    Sink,
    Source,
    Middle(f64),
}

#[derive(Debug, Clone, Default)]
struct Entry {
    in_w: f64,
    out_w: f64,
    in_n: usize,
    out_n: usize,
    middle: Option<Delta>,
    removed: bool,
}

impl Entry {
    fn class(&self) -> Class {
        if self.out_n == 0 {
            Class::Sink
        } else if self.in_n == 0 {
            Class::Source
        } else {
            Class::Middle(self.out_w - self.in_w)
        }
    }
}

struct FasState {
    entries: Vec<Entry>,
    ins: Vec<Vec<(usize, f64)>>,
    outs: Vec<Vec<(usize, f64)>>,
    sinks: VecDeque<usize>,
    sources: VecDeque<usize>,
    /// Largest delta last; among equal deltas the earliest node.
    middle: BTreeSet<(Delta, Reverse<usize>)>,
    remaining: usize,
}

impl FasState {
    fn classify(&mut self, ix: usize) {
        if let Some(old) = self.entries[ix].middle.take() {
            self.middle.remove(&(old, Reverse(ix)));
        }
        match self.entries[ix].class() {
            Class::Sink => self.sinks.push_back(ix),
            Class::Source => self.sources.push_back(ix),
            Class::Middle(delta) => {
                self.entries[ix].middle = Some(Delta(delta));
                self.middle.insert((Delta(delta), Reverse(ix)));
            }
        }
    }

    fn next_peelable(queue: &mut VecDeque<usize>, entries: &[Entry]) -> Option<usize> {
        while let Some(ix) = queue.pop_front() {
            if !entries[ix].removed {
                return Some(ix);
            }
        }
        None
    }

    /// Removes `ix`, updating its neighbours. Returns its incoming edges when `collect` is
    /// set.
    fn remove(&mut self, ix: usize, collect: bool) -> Vec<(usize, usize)> {
        self.entries[ix].removed = true;
        if let Some(old) = self.entries[ix].middle.take() {
            self.middle.remove(&(old, Reverse(ix)));
        }
        self.remaining -= 1;

        let mut out = Vec::new();
        for i in 0..self.ins[ix].len() {
            let (u, weight) = self.ins[ix][i];
            if self.entries[u].removed {
                continue;
            }
            if collect {
                out.push((u, ix));
            }
            let entry = &mut self.entries[u];
            entry.out_w -= weight;
            entry.out_n -= 1;
            if entry.out_n == 0 || entry.middle.is_some() {
                self.classify(u);
            }
        }
        for i in 0..self.outs[ix].len() {
            let (w, weight) = self.outs[ix][i];
            if self.entries[w].removed {
                continue;
            }
            let entry = &mut self.entries[w];
            entry.in_w -= weight;
            entry.in_n -= 1;
            if entry.in_n == 0 || entry.middle.is_some() {
                self.classify(w);
            }
        }
        out
    }
}

/// Returns an edge set whose reversal leaves `g` acyclic. Parallel edges are aggregated
/// while choosing, and every edge of a chosen pair is returned. Self loops are ignored.
pub fn greedy_fas(g: &LayoutGraph, weight_fn: impl Fn(&EdgeLabel) -> f64) -> Vec<EdgeKey> {
    if g.node_count() <= 1 {
        return Vec::new();
    }

    let ids: Vec<&str> = g.nodes().collect();
    let index: FxHashMap<&str, usize> = ids.iter().enumerate().map(|(i, v)| (*v, i)).collect();
    let n = ids.len();

    let mut pair_ix: FxHashMap<(usize, usize), usize> = FxHashMap::default();
    let mut pairs: Vec<(usize, usize, f64)> = Vec::new();
    for (e, label) in g.edge_labels() {
        let (Some(&v), Some(&w)) = (index.get(e.v.as_str()), index.get(e.w.as_str())) else {
            continue;
        };
        if v == w {
            continue;
        }
        let weight = weight_fn(label);
        match pair_ix.get(&(v, w)) {
            Some(&p) => pairs[p].2 += weight,
            None => {
                pair_ix.insert((v, w), pairs.len());
                pairs.push((v, w, weight));
            }
        }
    }

    let mut entries = vec![Entry::default(); n];
    let mut ins = vec![Vec::new(); n];
    let mut outs = vec![Vec::new(); n];
    for &(v, w, weight) in &pairs {
        outs[v].push((w, weight));
        ins[w].push((v, weight));
        entries[v].out_w += weight;
        entries[v].out_n += 1;
        entries[w].in_w += weight;
        entries[w].in_n += 1;
    }

    let mut state = FasState {
        entries,
        ins,
        outs,
        sinks: VecDeque::new(),
        sources: VecDeque::new(),
        middle: BTreeSet::new(),
        remaining: n,
    };
    for ix in 0..n {
        state.classify(ix);
    }

    let mut chosen: Vec<(usize, usize)> = Vec::new();
    while state.remaining > 0 {
        if let Some(ix) = FasState::next_peelable(&mut state.sinks, &state.entries) {
            state.remove(ix, false);
            continue;
        }
        if let Some(ix) = FasState::next_peelable(&mut state.sources, &state.entries) {
            state.remove(ix, false);
            continue;
        }
        let Some(&(_, Reverse(ix))) = state.middle.last() else {
            break;
        };
        chosen.extend(state.remove(ix, true));
    }

    chosen
        .into_iter()
        .flat_map(|(v, w)| g.out_edges(ids[v], Some(ids[w])))
        .collect()
}
