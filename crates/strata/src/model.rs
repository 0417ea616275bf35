//! Label types carried by the layout graph, plus the graph-level options.
//!
//! Inputs are plain public fields with documented defaults. Fields the pipeline writes are
//! public as well so phases can be driven one at a time in tests.

use crate::graphlib::{EdgeKey, Graph};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// The graph type every phase operates on.
pub type LayoutGraph = Graph<NodeLabel, EdgeLabel, GraphLabel>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    /// Parses case-insensitively. Unknown names fall back to top-to-bottom.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "bt" => Self::BT,
            "lr" => Self::LR,
            "rl" => Self::RL,
            _ => Self::TB,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LR | Self::RL)
    }
}

impl From<String> for RankDir {
    fn from(s: String) -> Self {
        Self::from_name(&s)
    }
}

/// One of the four Brandes-Köpf alignments: vertical direction (up/down) and horizontal
/// bias (left/right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Align {
    UL,
    UR,
    DL,
    DR,
}

impl Align {
    pub const ALL: [Align; 4] = [Align::UL, Align::UR, Align::DL, Align::DR];

    /// `None` for anything that is not one of the four names, which selects the balanced
    /// median of all alignments.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ul" => Some(Self::UL),
            "ur" => Some(Self::UR),
            "dl" => Some(Self::DL),
            "dr" => Some(Self::DR),
            _ => None,
        }
    }

    pub fn is_up(self) -> bool {
        matches!(self, Self::UL | Self::UR)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Self::UL | Self::DL)
    }
}

fn de_align<'de, D>(deserializer: D) -> Result<Option<Align>, D::Error>
where
    D: Deserializer<'de>,
{
    let name: Option<String> = Option::deserialize(deserializer)?;
    Ok(name.as_deref().and_then(Align::from_name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Ranker {
    NetworkSimplex,
    #[default]
    TightTree,
    LongestPath,
}

impl Ranker {
    /// Never fails: unrecognized names select the default tight-tree ranker.
    pub fn from_name(name: &str) -> Self {
        match name {
            "network-simplex" => Self::NetworkSimplex,
            "longest-path" => Self::LongestPath,
            _ => Self::TightTree,
        }
    }
}

impl From<String> for Ranker {
    fn from(s: String) -> Self {
        Self::from_name(&s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Acyclicer {
    Greedy,
    #[default]
    Dfs,
}

impl Acyclicer {
    /// Only `"greedy"` selects the greedy heuristic; anything else is DFS.
    pub fn from_name(name: &str) -> Self {
        match name {
            "greedy" => Self::Greedy,
            _ => Self::Dfs,
        }
    }
}

impl From<String> for Acyclicer {
    fn from(s: String) -> Self {
        Self::from_name(&s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum LabelPos {
    L,
    C,
    #[default]
    R,
}

impl LabelPos {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "l" => Self::L,
            "c" => Self::C,
            _ => Self::R,
        }
    }
}

impl From<String> for LabelPos {
    fn from(s: String) -> Self {
        Self::from_name(&s)
    }
}

/// Marks synthetic nodes and what they stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dummy {
    Edge,
    EdgeLabel,
    EdgeProxy,
    SelfEdge,
    Border,
    Root,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Index of an edge label parked in the [`EdgeLabelArena`] while its edge is out of the
/// graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelId(usize);

/// Owns edge labels whose edges were temporarily replaced by dummy nodes.
#[derive(Debug, Clone, Default)]
pub struct EdgeLabelArena {
    slots: Vec<Option<EdgeLabel>>,
}

impl EdgeLabelArena {
    pub fn stash(&mut self, label: EdgeLabel) -> LabelId {
        self.slots.push(Some(label));
        LabelId(self.slots.len() - 1)
    }

    pub fn get(&self, id: LabelId) -> Option<&EdgeLabel> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: LabelId) -> Option<&mut EdgeLabel> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn take(&mut self, id: LabelId) -> Option<EdgeLabel> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EdgeLabel> {
        self.slots.iter_mut().flatten()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Monotonic counter for synthetic ids.
#[derive(Debug, Clone, Default)]
pub struct IdGen {
    next: u64,
}

impl IdGen {
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}{}", self.next)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphLabel {
    pub rankdir: RankDir,
    #[serde(deserialize_with = "de_align")]
    pub align: Option<Align>,
    pub nodesep: f64,
    pub ranksep: f64,
    pub edgesep: f64,
    pub marginx: f64,
    pub marginy: f64,
    pub ranker: Ranker,
    pub acyclicer: Acyclicer,
    /// Halve `ranksep` and double every `minlen` so labelled edges get a rank of their own.
    #[serde(alias = "edgeLabelSpace")]
    pub edge_label_space: bool,
    #[serde(alias = "keepNodeOrder")]
    pub keep_node_order: bool,
    /// Caller order used to seed `fixorder` when `keep_node_order` is set.
    #[serde(alias = "nodeOrder")]
    pub node_order: Vec<String>,

    #[serde(skip)]
    pub width: Option<f64>,
    #[serde(skip)]
    pub height: Option<f64>,

    #[serde(skip)]
    pub nesting_root: Option<String>,
    #[serde(skip)]
    pub node_rank_factor: Option<i32>,
    #[serde(skip)]
    pub dummy_chains: Vec<String>,
    #[serde(skip)]
    pub max_rank: Option<i32>,
    #[serde(skip)]
    pub ids: IdGen,
    #[serde(skip)]
    pub edge_labels: EdgeLabelArena,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            align: None,
            nodesep: 50.0,
            ranksep: 50.0,
            edgesep: 20.0,
            marginx: 0.0,
            marginy: 0.0,
            ranker: Ranker::default(),
            acyclicer: Acyclicer::default(),
            edge_label_space: true,
            keep_node_order: false,
            node_order: Vec::new(),
            width: None,
            height: None,
            nesting_root: None,
            node_rank_factor: None,
            dummy_chains: Vec::new(),
            max_rank: None,
            ids: IdGen::default(),
            edge_labels: EdgeLabelArena::default(),
        }
    }
}

impl GraphLabel {
    /// Reads layout options from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A self loop parked on its node between ranking and positioning.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfEdge {
    pub edge: EdgeKey,
    pub label: LabelId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rank: Option<i32>,
    pub order: Option<usize>,
    /// Manual rank pin, honored by the tight-tree ranker.
    pub layer: Option<i32>,
    /// Preferred position within the rank.
    pub fixorder: Option<usize>,

    pub dummy: Option<Dummy>,
    pub labelpos: Option<LabelPos>,
    pub edge_label: Option<LabelId>,
    pub edge_obj: Option<EdgeKey>,

    pub min_rank: Option<i32>,
    pub max_rank: Option<i32>,
    pub border_top: Option<String>,
    pub border_bottom: Option<String>,
    pub border_left: BTreeMap<i32, String>,
    pub border_right: BTreeMap<i32, String>,
    pub border_type: Option<BorderSide>,

    pub self_edges: Vec<SelfEdge>,
}

impl NodeLabel {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.dummy.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub width: f64,
    pub height: f64,
    pub minlen: i32,
    pub weight: f64,
    pub labelpos: LabelPos,
    pub labeloffset: f64,
    pub label_rank: Option<i32>,
    pub nesting_edge: bool,
    pub reversed: bool,
    pub forward_name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub points: Vec<Point>,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            minlen: 1,
            weight: 1.0,
            labelpos: LabelPos::R,
            labeloffset: 10.0,
            label_rank: None,
            nesting_edge: false,
            reversed: false,
            forward_name: None,
            x: None,
            y: None,
            points: Vec::new(),
        }
    }
}

impl EdgeLabel {
    /// An unlabelled edge with the given weight, as used for synthetic chains.
    pub fn weighted(weight: f64) -> Self {
        Self {
            weight,
            ..Default::default()
        }
    }

    pub fn has_label(&self) -> bool {
        self.width != 0.0 && self.height != 0.0
    }
}
