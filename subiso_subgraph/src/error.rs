//! Error types for graph construction and matcher setup.
//!
//! All errors surface before the search starts. Once a [`crate::MatchingState`]
//! exists the search itself is infallible: finding nothing is an empty result.

use thiserror::Error;

/// Reasons a graph, or a query/target pair, cannot be searched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidGraphError {
    /// The query has more vertices than the target, so no injective mapping exists.
    #[error("query graph has {query} vertices but target graph only has {target}")]
    QueryLargerThanTarget {
        /// Query vertex count.
        query: usize,
        /// Target vertex count.
        target: usize,
    },

    /// An adjacency entry names a vertex that does not exist.
    #[error("vertex {vertex} lists neighbor {neighbor}, but the graph has {order} vertices")]
    NeighborOutOfRange {
        /// Vertex whose adjacency is malformed.
        vertex: usize,
        /// The offending neighbor id.
        neighbor: usize,
        /// Number of vertices in the graph.
        order: usize,
    },

    /// A vertex is adjacent to itself.
    #[error("vertex {vertex} has a self loop")]
    SelfLoop {
        /// The looping vertex.
        vertex: usize,
    },

    /// A neighbor appears twice in one adjacency list.
    #[error("vertex {vertex} lists neighbor {neighbor} more than once")]
    DuplicateNeighbor {
        /// Vertex whose adjacency is malformed.
        vertex: usize,
        /// The repeated neighbor.
        neighbor: usize,
    },

    /// `from` lists `to` as a neighbor but not the other way round.
    #[error("edge {from}-{to} is not symmetric: {to} does not list {from}")]
    AsymmetricEdge {
        /// Vertex listing the neighbor.
        from: usize,
        /// Vertex missing the back reference.
        to: usize,
    },
}
