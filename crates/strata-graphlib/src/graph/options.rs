//! Graph configuration options.

/// Structural flags fixed at construction time.
///
/// `multigraph` allows several edges between the same endpoints, told apart by name.
/// `compound` enables parent/child links. Undirected graphs store every edge with its
/// endpoints in canonical (lexicographic) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphOptions {
    pub multigraph: bool,
    pub compound: bool,
    pub directed: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            multigraph: false,
            compound: false,
            directed: true,
        }
    }
}
