//! The [`Graph`] container.
//!
//! Nodes and edges are stored in slot vectors: removal leaves a tombstone, so slot indices
//! handed out during a traversal stay valid. Per-node adjacency and child lists are updated
//! on every mutation instead of being rebuilt on demand. Iteration always follows insertion
//! order and skips tombstones.

pub mod alg;
mod edge_key;
mod entries;
mod options;

pub use edge_key::EdgeKey;
pub use options::GraphOptions;

use edge_key::EdgeKeyView;
use entries::{EdgeEntry, NodeEntry};
use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

pub struct Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    options: GraphOptions,

    graph_label: G,
    default_node_label: Box<dyn Fn() -> N + Send + Sync>,
    default_edge_label: Box<dyn Fn() -> E + Send + Sync>,

    nodes: Vec<Option<NodeEntry<N>>>,
    node_index: HashMap<String, usize>,
    live_nodes: usize,

    edges: Vec<Option<EdgeEntry<E>>>,
    edge_index: HashMap<EdgeKey, usize>,
    live_edges: usize,
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            graph_label: G::default(),
            default_node_label: Box::new(N::default),
            default_edge_label: Box::new(E::default),
            nodes: Vec::new(),
            node_index: HashMap::default(),
            live_nodes: 0,
            edges: Vec::new(),
            edge_index: HashMap::default(),
            live_edges: 0,
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_multigraph(&self) -> bool {
        self.options.multigraph
    }

    pub fn is_compound(&self) -> bool {
        self.options.compound
    }

    pub fn is_directed(&self) -> bool {
        self.options.directed
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.graph_label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    pub fn set_default_node_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> N + Send + Sync + 'static,
    {
        self.default_node_label = Box::new(f);
        self
    }

    pub fn set_default_edge_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.default_edge_label = Box::new(f);
        self
    }

    // ---- slot helpers -------------------------------------------------------------------

    fn slot(&self, ix: usize) -> Option<&NodeEntry<N>> {
        self.nodes.get(ix).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, ix: usize) -> Option<&mut NodeEntry<N>> {
        self.nodes.get_mut(ix).and_then(Option::as_mut)
    }

    fn slot_of(&self, id: &str) -> Option<&NodeEntry<N>> {
        self.node_index.get(id).and_then(|&ix| self.slot(ix))
    }

    fn edge_slot(&self, ix: usize) -> Option<&EdgeEntry<E>> {
        self.edges.get(ix).and_then(Option::as_ref)
    }

    fn id_of(&self, ix: usize) -> Option<&str> {
        self.slot(ix).map(|n| n.id.as_str())
    }

    fn insert_node(&mut self, id: String, label: N) -> usize {
        let ix = self.nodes.len();
        self.node_index.insert(id.clone(), ix);
        self.nodes.push(Some(NodeEntry::new(id, label)));
        self.live_nodes += 1;
        ix
    }

    fn ensure_node_ix(&mut self, id: &str) -> usize {
        if let Some(&ix) = self.node_index.get(id) {
            return ix;
        }
        let label = (self.default_node_label)();
        self.insert_node(id.to_string(), label)
    }

    // ---- nodes --------------------------------------------------------------------------

    /// Stable slot index of `id`. Indices are never reused while the graph lives.
    pub fn node_ix(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub fn node_id(&self, ix: usize) -> Option<&str> {
        self.id_of(ix)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&ix) = self.node_index.get(id.as_str()) {
            if let Some(entry) = self.slot_mut(ix) {
                entry.label = label;
            }
            return self;
        }
        self.insert_node(id, label);
        self
    }

    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        self.ensure_node_ix(&id);
        self
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.slot_of(id).map(|n| &n.label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        let ix = self.node_ix(id)?;
        self.slot_mut(ix).map(|n| &mut n.label)
    }

    pub fn node_count(&self) -> usize {
        self.live_nodes
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().flatten().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes().map(str::to_string).collect()
    }

    /// Nodes paired with their labels, in insertion order.
    pub fn node_labels(&self) -> impl Iterator<Item = (&str, &N)> {
        self.nodes.iter().flatten().map(|n| (n.id.as_str(), &n.label))
    }

    pub fn for_each_node_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut N),
    {
        for entry in self.nodes.iter_mut().flatten() {
            f(&entry.id, &mut entry.label);
        }
    }

    /// Removes `id`, its incident edges, and its parent link. Children of `id` become
    /// roots.
    pub fn remove_node(&mut self, id: &str) -> Option<N> {
        let ix = self.node_ix(id)?;
        let (incident, children, parent) = {
            let entry = self.slot(ix)?;
            let incident: Vec<usize> = entry.out.iter().chain(entry.in_.iter()).copied().collect();
            (incident, entry.children.clone(), entry.parent)
        };
        for eix in incident {
            self.detach_edge(eix);
        }
        for child in children {
            if let Some(c) = self.slot_mut(child) {
                c.parent = None;
            }
        }
        if let Some(p) = parent.and_then(|p| self.slot_mut(p)) {
            p.children.retain(|&c| c != ix);
        }
        self.node_index.remove(id);
        self.live_nodes -= 1;
        self.nodes[ix].take().map(|entry| entry.label)
    }

    // ---- edges --------------------------------------------------------------------------

    fn key_view<'a>(&self, v: &'a str, w: &'a str, name: Option<&'a str>) -> EdgeKeyView<'a> {
        let (v, w) = if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        };
        let name = if self.options.multigraph { name } else { None };
        EdgeKeyView { v, w, name }
    }

    fn canonical_key(&self, v: String, w: String, name: Option<String>) -> EdgeKey {
        let (v, w) = if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        };
        let name = if self.options.multigraph { name } else { None };
        EdgeKey { v, w, name }
    }

    fn edge_ix(&self, v: &str, w: &str, name: Option<&str>) -> Option<usize> {
        self.edge_index.get(&self.key_view(v, w, name)).copied()
    }

    fn detach_edge(&mut self, eix: usize) -> Option<EdgeEntry<E>> {
        let entry = self.edges.get_mut(eix)?.take()?;
        self.edge_index.remove(&entry.key);
        if let Some(v) = self.slot_mut(entry.v_ix) {
            v.out.retain(|&e| e != eix);
        }
        if let Some(w) = self.slot_mut(entry.w_ix) {
            w.in_.retain(|&e| e != eix);
        }
        self.live_edges -= 1;
        Some(entry)
    }

    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().flatten().map(|e| &e.key)
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges().cloned().collect()
    }

    /// Edges paired with their labels, in insertion order.
    pub fn edge_labels(&self) -> impl Iterator<Item = (&EdgeKey, &E)> {
        self.edges.iter().flatten().map(|e| (&e.key, &e.label))
    }

    pub fn for_each_edge_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&EdgeKey, &mut E),
    {
        for entry in self.edges.iter_mut().flatten() {
            f(&entry.key, &mut entry.label);
        }
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, None)
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, Some(label))
    }

    /// Inserts or updates an edge. A `None` label keeps the existing label of an edge that
    /// is already present, or uses the default edge label for a new one. Missing endpoints
    /// are created with the default node label.
    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> &mut Self {
        let key = self.canonical_key(v.into(), w.into(), name.map(Into::into));
        if let Some(&eix) = self.edge_index.get(&key) {
            if let Some(label) = label {
                if let Some(entry) = self.edges[eix].as_mut() {
                    entry.label = label;
                }
            }
            return self;
        }

        let label = label.unwrap_or_else(|| (self.default_edge_label)());
        let v_ix = self.ensure_node_ix(&key.v);
        let w_ix = self.ensure_node_ix(&key.w);
        let eix = self.edges.len();
        self.edge_index.insert(key.clone(), eix);
        self.edges.push(Some(EdgeEntry {
            key,
            v_ix,
            w_ix,
            label,
        }));
        if let Some(v) = self.slot_mut(v_ix) {
            v.out.push(eix);
        }
        if let Some(w) = self.slot_mut(w_ix) {
            w.in_.push(eix);
        }
        self.live_edges += 1;
        self
    }

    pub fn set_edge_key(&mut self, key: EdgeKey, label: E) -> &mut Self {
        self.set_edge_named(key.v, key.w, key.name, Some(label))
    }

    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edge_ix(v, w, name).is_some()
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        let eix = self.edge_ix(v, w, name)?;
        self.edge_slot(eix).map(|e| &e.label)
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let eix = self.edge_ix(v, w, name)?;
        self.edges[eix].as_mut().map(|e| &mut e.label)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        self.edge_mut(&key.v, &key.w, key.name.as_deref())
    }

    /// Removes the edge and hands its label back.
    pub fn remove_edge(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<E> {
        let eix = self.edge_ix(v, w, name)?;
        self.detach_edge(eix).map(|e| e.label)
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> Option<E> {
        self.remove_edge(&key.v, &key.w, key.name.as_deref())
    }

    // ---- adjacency ----------------------------------------------------------------------

    /// Every incident edge slot of `ix`, in edge insertion order.
    fn incident_slots(entry: &NodeEntry<N>) -> Vec<usize> {
        let mut slots: Vec<usize> = entry.out.iter().chain(entry.in_.iter()).copied().collect();
        slots.sort_unstable();
        slots.dedup();
        slots
    }

    /// Edge slots leaving `ix`. Undirected graphs treat every incident edge as leaving.
    fn out_slots(&self, ix: usize) -> Vec<usize> {
        match self.slot(ix) {
            Some(entry) if self.options.directed => entry.out.clone(),
            Some(entry) => Self::incident_slots(entry),
            None => Vec::new(),
        }
    }

    fn in_slots(&self, ix: usize) -> Vec<usize> {
        match self.slot(ix) {
            Some(entry) if self.options.directed => entry.in_.clone(),
            Some(entry) => Self::incident_slots(entry),
            None => Vec::new(),
        }
    }

    pub(crate) fn successor_ixs(&self, ix: usize) -> Vec<usize> {
        let mut seen: HashSet<usize> = HashSet::default();
        self.out_slots(ix)
            .into_iter()
            .filter_map(|eix| self.edge_slot(eix).map(|e| e.other(ix)))
            .filter(|&w| seen.insert(w))
            .collect()
    }

    pub(crate) fn predecessor_ixs(&self, ix: usize) -> Vec<usize> {
        let mut seen: HashSet<usize> = HashSet::default();
        self.in_slots(ix)
            .into_iter()
            .filter_map(|eix| self.edge_slot(eix).map(|e| e.other(ix)))
            .filter(|&u| seen.insert(u))
            .collect()
    }

    pub(crate) fn neighbor_ixs(&self, ix: usize) -> Vec<usize> {
        let mut out = self.predecessor_ixs(ix);
        for w in self.successor_ixs(ix) {
            if !out.contains(&w) {
                out.push(w);
            }
        }
        out
    }

    pub(crate) fn live_node_ixs(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(ix, n)| n.as_ref().map(|_| ix))
    }

    fn ids(&self, ixs: Vec<usize>) -> Vec<&str> {
        ixs.into_iter().filter_map(|ix| self.id_of(ix)).collect()
    }

    pub fn successors(&self, v: &str) -> Vec<&str> {
        match self.node_ix(v) {
            Some(ix) => self.ids(self.successor_ixs(ix)),
            None => Vec::new(),
        }
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        match self.node_ix(v) {
            Some(ix) => self.ids(self.predecessor_ixs(ix)),
            None => Vec::new(),
        }
    }

    /// Predecessors followed by successors, without duplicates.
    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        match self.node_ix(v) {
            Some(ix) => self.ids(self.neighbor_ixs(ix)),
            None => Vec::new(),
        }
    }

    pub fn first_successor(&self, v: &str) -> Option<&str> {
        let ix = self.node_ix(v)?;
        let eix = *self.out_slots(ix).first()?;
        self.edge_slot(eix).and_then(|e| self.id_of(e.other(ix)))
    }

    pub fn first_predecessor(&self, v: &str) -> Option<&str> {
        let ix = self.node_ix(v)?;
        let eix = *self.in_slots(ix).first()?;
        self.edge_slot(eix).and_then(|e| self.id_of(e.other(ix)))
    }

    fn keys_towards(&self, ix: usize, slots: Vec<usize>, other: Option<&str>) -> Vec<EdgeKey> {
        let other_ix = match other {
            Some(w) => match self.node_ix(w) {
                Some(w_ix) => Some(w_ix),
                None => return Vec::new(),
            },
            None => None,
        };
        slots
            .into_iter()
            .filter_map(|eix| self.edge_slot(eix))
            .filter(|e| other_ix.is_none_or(|o| e.other(ix) == o))
            .map(|e| e.key.clone())
            .collect()
    }

    /// Edges leaving `v`, optionally restricted to those reaching `w`.
    pub fn out_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        match self.node_ix(v) {
            Some(ix) => self.keys_towards(ix, self.out_slots(ix), w),
            None => Vec::new(),
        }
    }

    /// Edges entering `v`, optionally restricted to those coming from `u`.
    pub fn in_edges(&self, v: &str, u: Option<&str>) -> Vec<EdgeKey> {
        match self.node_ix(v) {
            Some(ix) => self.keys_towards(ix, self.in_slots(ix), u),
            None => Vec::new(),
        }
    }

    /// In-edges followed by out-edges of `v`.
    pub fn node_edges(&self, v: &str) -> Vec<EdgeKey> {
        let Some(entry) = self.slot_of(v) else {
            return Vec::new();
        };
        let mut slots = entry.in_.clone();
        slots.extend(entry.out.iter().filter(|e| !entry.in_.contains(e)));
        slots
            .into_iter()
            .filter_map(|eix| self.edge_slot(eix).map(|e| e.key.clone()))
            .collect()
    }

    pub fn sources(&self) -> Vec<&str> {
        if !self.options.directed {
            return self.nodes().collect();
        }
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.in_.is_empty())
            .map(|n| n.id.as_str())
            .collect()
    }

    pub fn sinks(&self) -> Vec<&str> {
        if !self.options.directed {
            return self.nodes().collect();
        }
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.out.is_empty())
            .map(|n| n.id.as_str())
            .collect()
    }

    // ---- hierarchy ----------------------------------------------------------------------

    /// Moves `child` under `parent`, creating either node if needed. No-op on
    /// non-compound graphs. Cycles are not rejected here.
    pub fn set_parent(&mut self, child: impl Into<String>, parent: impl Into<String>) -> &mut Self {
        if !self.options.compound {
            return self;
        }
        let child = child.into();
        let parent = parent.into();
        let child_ix = self.ensure_node_ix(&child);
        let parent_ix = self.ensure_node_ix(&parent);
        self.unlink_parent(child_ix);
        if let Some(c) = self.slot_mut(child_ix) {
            c.parent = Some(parent_ix);
        }
        if let Some(p) = self.slot_mut(parent_ix) {
            p.children.push(child_ix);
        }
        self
    }

    pub fn clear_parent(&mut self, child: &str) -> &mut Self {
        if let Some(ix) = self.node_ix(child) {
            self.unlink_parent(ix);
        }
        self
    }

    fn unlink_parent(&mut self, child_ix: usize) {
        let Some(prev) = self.slot_mut(child_ix).and_then(|c| c.parent.take()) else {
            return;
        };
        if let Some(p) = self.slot_mut(prev) {
            p.children.retain(|&c| c != child_ix);
        }
    }

    pub fn parent(&self, child: &str) -> Option<&str> {
        self.slot_of(child)
            .and_then(|c| c.parent)
            .and_then(|p| self.id_of(p))
    }

    pub fn children(&self, parent: &str) -> Vec<&str> {
        match self.slot_of(parent) {
            Some(p) => p.children.iter().filter_map(|&c| self.id_of(c)).collect(),
            None => Vec::new(),
        }
    }

    pub fn has_children(&self, v: &str) -> bool {
        self.slot_of(v).is_some_and(|n| !n.children.is_empty())
    }

    /// Nodes without a parent, in insertion order.
    pub fn children_root(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.parent.is_none())
            .map(|n| n.id.as_str())
            .collect()
    }
}

impl<N, E, G> Clone for Graph<N, E, G>
where
    N: Default + Clone + 'static,
    E: Default + Clone + 'static,
    G: Default + Clone,
{
    /// Clones structure and labels. Default label factories are reset to `Default`.
    fn clone(&self) -> Self {
        Self {
            options: self.options,
            graph_label: self.graph_label.clone(),
            default_node_label: Box::new(N::default),
            default_edge_label: Box::new(E::default),
            nodes: self.nodes.clone(),
            node_index: self.node_index.clone(),
            live_nodes: self.live_nodes,
            edges: self.edges.clone(),
            edge_index: self.edge_index.clone(),
            live_edges: self.live_edges,
        }
    }
}
