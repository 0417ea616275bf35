//! Hierarchical (layered) graph layout.
//!
//! Ranks nodes into layers, orders each layer to reduce edge crossings and assigns coordinates
//! with Brandes-Köpf. Compound graphs are supported: subgraphs are laid out as boxes around
//! their children.
//!
//! ```
//! use strata::graphlib::{Graph, GraphOptions};
//! use strata::{EdgeLabel, GraphLabel, LayoutGraph, NodeLabel};
//!
//! let mut g: LayoutGraph = Graph::new(GraphOptions::default());
//! g.set_graph(GraphLabel::default());
//! g.set_node("a", NodeLabel::new(50.0, 100.0));
//! g.set_node("b", NodeLabel::new(75.0, 200.0));
//! g.set_edge_with_label("a", "b", EdgeLabel::default());
//! strata::layout(&mut g).unwrap();
//! assert!(g.node("b").unwrap().y > g.node("a").unwrap().y);
//! ```

pub use strata_graphlib as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod acyclic;
pub mod add_border_segments;
pub mod coordinate_system;
pub mod error;
pub mod greedy_fas;
pub mod model;
pub mod nesting_graph;
pub mod normalize;
pub mod order;
pub mod parent_dummy_chains;
pub mod position;
pub mod rank;
pub mod self_edges;
pub mod util;

mod pipeline;

pub use error::{Error, LayoutError, Result};
pub use model::{
    Acyclicer, Align, BorderSide, Dummy, EdgeLabel, GraphLabel, LabelPos, LayoutGraph, NodeLabel,
    Point, RankDir, Ranker,
};
pub use pipeline::{layout, layout_with_previous};
