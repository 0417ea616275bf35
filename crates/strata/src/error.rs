#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid compound hierarchy: `{node}` is its own ancestor")]
    InvalidHierarchy { node: String },
    #[error("edge `{v}` -> `{w}` touches a compound node; edges may only join leaf nodes")]
    CompoundEndpoint { v: String, w: String },
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("invalid layout options: {0}")]
    Config(#[from] serde_json::Error),
}

/// Failures raised while positioning, after the input passed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// An edge endpoint landed on the center of the rectangle it should be clipped to. This
    /// usually means manual `layer` values contradict the edge directions.
    #[error(
        "cannot clip an edge at ({x}, {y}): the point is the rectangle center; check manual `layer` values against edge directions"
    )]
    Intersection { x: f64, y: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
