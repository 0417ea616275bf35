use crate::model::LayoutGraph;
use rustc_hash::FxHashMap;

/// Weighted number of edge crossings between consecutive ranks of `layering`.
pub fn cross_count(g: &LayoutGraph, layering: &[Vec<String>]) -> f64 {
    layering
        .windows(2)
        .map(|pair| two_layer_cross_count(g, &pair[0], &pair[1]))
        .sum()
}

/// Bilayer cross counting (Barth, Jünger and Mutzel) with an accumulator tree over south
/// positions.
fn two_layer_cross_count(g: &LayoutGraph, north: &[String], south: &[String]) -> f64 {
    let south_pos: FxHashMap<&str, usize> = south
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect();

    let mut tree = AccumulatorTree::new(south.len());
    let mut cc = 0.0;
    for v in north {
        let mut targets: Vec<(usize, f64)> = g
            .out_edges(v, None)
            .into_iter()
            .filter_map(|e| {
                let pos = *south_pos.get(e.w.as_str())?;
                Some((pos, g.edge_by_key(&e).map_or(0.0, |l| l.weight)))
            })
            .collect();
        targets.sort_by_key(|&(pos, _)| pos);
        for (pos, weight) in targets {
            cc += weight * tree.add(pos, weight);
        }
    }
    cc
}

/// Complete binary tree whose leaves are south positions. Internal nodes hold subtree sums.
struct AccumulatorTree {
    first_leaf: usize,
    sums: Vec<f64>,
}

impl AccumulatorTree {
    fn new(leaves: usize) -> Self {
        let width = leaves.max(1).next_power_of_two();
        Self {
            first_leaf: width - 1,
            sums: vec![0.0; 2 * width - 1],
        }
    }

    /// Adds `weight` at leaf `pos` and returns the weight already placed to its right.
    fn add(&mut self, pos: usize, weight: f64) -> f64 {
        let mut index = pos + self.first_leaf;
        self.sums[index] += weight;
        let mut right = 0.0;
        while index > 0 {
            if index % 2 == 1 {
                right += self.sums[index + 1];
            }
            index = (index - 1) / 2;
            self.sums[index] += weight;
        }
        right
    }
}
