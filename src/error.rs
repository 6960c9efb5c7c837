//! Typed failures for graph mutations. Every error leaves the graph
//! unchanged; presentation is the caller's concern.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex not found: {0}")]
    VertexNotFound(u32),

    #[error("edge not found: {0}")]
    EdgeNotFound(u32),

    #[error("no edge connects vertices {0} and {1}")]
    NoEdgeBetween(u32, u32),

    #[error("bend index {index} out of range for edge {edge}")]
    BendNotFound { edge: u32, index: usize },

    #[error("self-loops are disabled")]
    SelfLoopDisallowed,

    #[error("an edge between {0} and {1} already exists")]
    ParallelEdgeDisallowed(u32, u32),

    #[error("coordinate must be finite")]
    NonFinite,

    #[error("invalid document: {0}")]
    InvalidDocument(String),
}
