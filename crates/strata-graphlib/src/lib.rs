//! Graph container used by `strata`.
//!
//! A directed (or undirected) multigraph with an optional compound hierarchy. Edges are
//! addressed by `(v, w, name)`; parent/child links form a forest that callers are expected
//! to keep acyclic.

mod graph;

pub use graph::{EdgeKey, Graph, GraphOptions, alg};
