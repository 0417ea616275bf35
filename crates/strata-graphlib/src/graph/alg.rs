//! Traversals and cycle detection.
//!
//! Everything here walks with an explicit stack, so depth is bounded by memory rather than
//! by the call stack.

use super::{Graph, HashSet};

/// One suspended DFS call: the node, its neighbor list, and the next neighbor to visit.
struct Frame {
    ix: usize,
    next: Vec<usize>,
    pos: usize,
}

impl Frame {
    fn new(ix: usize, next: Vec<usize>) -> Self {
        Self { ix, next, pos: 0 }
    }
}

fn walk<N, E, G>(g: &Graph<N, E, G>, roots: &[&str], post: bool) -> Vec<String>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let step = |ix: usize| {
        if g.is_directed() {
            g.successor_ixs(ix)
        } else {
            g.neighbor_ixs(ix)
        }
    };

    let mut visited: HashSet<usize> = HashSet::default();
    let mut out: Vec<String> = Vec::new();
    for root in roots {
        let Some(root_ix) = g.node_ix(root) else {
            continue;
        };
        if !visited.insert(root_ix) {
            continue;
        }
        if !post {
            out.push((*root).to_string());
        }
        let mut stack = vec![Frame::new(root_ix, step(root_ix))];
        while let Some(frame) = stack.last_mut() {
            if let Some(&w) = frame.next.get(frame.pos) {
                frame.pos += 1;
                if visited.insert(w) {
                    if !post {
                        out.extend(g.node_id(w).map(str::to_string));
                    }
                    stack.push(Frame::new(w, step(w)));
                }
                continue;
            }
            let done = frame.ix;
            stack.pop();
            if post {
                out.extend(g.node_id(done).map(str::to_string));
            }
        }
    }
    out
}

/// Depth-first preorder from each of `roots`, following successors (neighbors for
/// undirected graphs).
pub fn preorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Vec<String>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    walk(g, roots, false)
}

/// Depth-first postorder from each of `roots`.
pub fn postorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Vec<String>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    walk(g, roots, true)
}

/// Weakly connected components, each listed in discovery order.
pub fn components<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut seen: HashSet<usize> = HashSet::default();
    let mut out: Vec<Vec<String>> = Vec::new();
    for start in g.live_node_ixs() {
        if !seen.insert(start) {
            continue;
        }
        let mut cmpt: Vec<String> = Vec::new();
        let mut stack = vec![start];
        while let Some(v) = stack.pop() {
            cmpt.extend(g.node_id(v).map(str::to_string));
            for w in g.neighbor_ixs(v) {
                if seen.insert(w) {
                    stack.push(w);
                }
            }
        }
        out.push(cmpt);
    }
    out
}

struct TarjanState {
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
}

impl TarjanState {
    fn enter<N, E, G>(&mut self, g: &Graph<N, E, G>, v: usize, frames: &mut Vec<Frame>)
    where
        N: Default + 'static,
        E: Default + 'static,
        G: Default,
    {
        self.index[v] = Some(self.next_index);
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
        frames.push(Frame::new(v, g.successor_ixs(v)));
    }
}

/// Strongly connected components (Tarjan), in completion order.
pub fn tarjan<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let slots = g.nodes.len();
    let mut st = TarjanState {
        index: vec![None; slots],
        lowlink: vec![0; slots],
        on_stack: vec![false; slots],
        stack: Vec::new(),
        next_index: 0,
    };
    let mut out: Vec<Vec<String>> = Vec::new();

    for start in g.live_node_ixs() {
        if st.index[start].is_some() {
            continue;
        }
        let mut frames: Vec<Frame> = Vec::new();
        st.enter(g, start, &mut frames);

        while let Some(frame) = frames.last_mut() {
            let v = frame.ix;
            if let Some(&w) = frame.next.get(frame.pos) {
                frame.pos += 1;
                match st.index[w] {
                    None => st.enter(g, w, &mut frames),
                    Some(w_index) if st.on_stack[w] => {
                        st.lowlink[v] = st.lowlink[v].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();
            if let Some(parent) = frames.last() {
                st.lowlink[parent.ix] = st.lowlink[parent.ix].min(st.lowlink[v]);
            }
            if Some(st.lowlink[v]) == st.index[v] {
                let mut cmpt: Vec<String> = Vec::new();
                while let Some(w) = st.stack.pop() {
                    st.on_stack[w] = false;
                    cmpt.extend(g.node_id(w).map(str::to_string));
                    if w == v {
                        break;
                    }
                }
                out.push(cmpt);
            }
        }
    }
    out
}

/// Strongly connected components that contain a cycle: more than one node, or a single
/// node with a self loop.
pub fn find_cycles<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    tarjan(g)
        .into_iter()
        .filter(|cmpt| match cmpt.as_slice() {
            [single] => !g.out_edges(single, Some(single)).is_empty(),
            _ => true,
        })
        .collect()
}

pub fn is_acyclic<N, E, G>(g: &Graph<N, E, G>) -> bool
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    find_cycles(g).is_empty()
}
