//! Common test cases for subiso.
//!
//! This module defines small edge-list graphs and pairs them up as query /
//! target cases with the number of embeddings each pair is known to have.
//! The fixtures are plain edge lists so that this crate does not depend on
//! the graph type of the matcher.

use crate::config::{Config, Dedupe};

/// An undirected graph given by vertex count and edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeList {
    /// Human readable name.
    pub name: &'static str,
    /// Number of vertices.
    pub order: usize,
    /// Undirected edges, each listed once.
    pub edges: &'static [(usize, usize)],
}

impl EdgeList {
    /// Degree of every vertex.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        let mut deg = vec![0; self.order];
        for &(u, v) in self.edges {
            deg[u] += 1;
            deg[v] += 1;
        }
        deg
    }
}

/// A complete test case definition.
#[derive(Debug, Clone)]
pub struct GraphCase {
    /// The name of the test case.
    pub name: &'static str,
    /// The configuration for the search.
    pub config: Config,
    /// The pattern to search for.
    pub query: &'static EdgeList,
    /// The graph to search in.
    pub target: &'static EdgeList,
    /// The expected number of matches.
    pub expected_matches: usize,
}

// #####################
// GRAPHS
// #####################
/// No vertices at all.
pub static EMPTY: EdgeList = EdgeList {
    name: "empty",
    order: 0,
    edges: &[],
};

/// One isolated vertex.
pub static SINGLE_VERTEX: EdgeList = EdgeList {
    name: "single_vertex",
    order: 1,
    edges: &[],
};

/// Two isolated vertices.
pub static TWO_ISOLATED: EdgeList = EdgeList {
    name: "two_isolated",
    order: 2,
    edges: &[],
};

/// K2.
pub static SINGLE_EDGE: EdgeList = EdgeList {
    name: "single_edge",
    order: 2,
    edges: &[(0, 1)],
};

/// Two disjoint copies of K2.
pub static TWO_EDGES: EdgeList = EdgeList {
    name: "two_edges",
    order: 4,
    edges: &[(0, 1), (2, 3)],
};

/// Path on three vertices, 0-1-2.
pub static PATH3: EdgeList = EdgeList {
    name: "path3",
    order: 3,
    edges: &[(0, 1), (1, 2)],
};

/// K3.
pub static TRIANGLE: EdgeList = EdgeList {
    name: "triangle",
    order: 3,
    edges: &[(0, 1), (1, 2), (2, 0)],
};

/// K3 plus vertex 3 with no edges.
pub static TRIANGLE_PLUS_ISOLATED: EdgeList = EdgeList {
    name: "triangle_plus_isolated",
    order: 4,
    edges: &[(0, 1), (1, 2), (2, 0)],
};

/// C4.
pub static SQUARE: EdgeList = EdgeList {
    name: "square",
    order: 4,
    edges: &[(0, 1), (1, 2), (2, 3), (3, 0)],
};

/// C5, every vertex has degree two.
pub static PENTAGON: EdgeList = EdgeList {
    name: "pentagon",
    order: 5,
    edges: &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)],
};

/// K4.
pub static K4: EdgeList = EdgeList {
    name: "k4",
    order: 4,
    edges: &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
};

/// K1,3 with centre 0.
pub static STAR3: EdgeList = EdgeList {
    name: "star3",
    order: 4,
    edges: &[(0, 1), (0, 2), (0, 3)],
};

/// Every graph fixture, used for sanity checks.
pub static ALL_GRAPHS: [&EdgeList; 12] = [
    &EMPTY,
    &SINGLE_VERTEX,
    &TWO_ISOLATED,
    &SINGLE_EDGE,
    &TWO_EDGES,
    &PATH3,
    &TRIANGLE,
    &TRIANGLE_PLUS_ISOLATED,
    &SQUARE,
    &PENTAGON,
    &K4,
    &STAR3,
];

/// Shorthand for a case with default configuration.
const fn plain(
    name: &'static str,
    query: &'static EdgeList,
    target: &'static EdgeList,
    expected_matches: usize,
) -> GraphCase {
    GraphCase {
        name,
        config: Config::new(true, Dedupe::None, false),
        query,
        target,
        expected_matches,
    }
}

/// Shorthand for a case with a dedupe mode.
const fn deduped(
    name: &'static str,
    query: &'static EdgeList,
    target: &'static EdgeList,
    dedupe: Dedupe,
    expected_matches: usize,
) -> GraphCase {
    GraphCase {
        name,
        config: Config::new(true, dedupe, false),
        query,
        target,
        expected_matches,
    }
}

// #####################
// CASES
// #####################
lazy_static::lazy_static! {
    /// Raw match counts with every vertex and edge compatible.
    pub static ref GRAPH_TEST_CASES: Vec<GraphCase> = vec![
        plain("triangle_in_triangle_plus_isolated", &TRIANGLE, &TRIANGLE_PLUS_ISOLATED, 6),
        plain("triangle_self", &TRIANGLE, &TRIANGLE, 6),
        plain("path3_in_triangle", &PATH3, &TRIANGLE, 6),
        plain("edge_in_triangle", &SINGLE_EDGE, &TRIANGLE, 6),
        plain("edge_in_path3", &SINGLE_EDGE, &PATH3, 4),
        plain("edge_in_two_edges", &SINGLE_EDGE, &TWO_EDGES, 4),
        plain("triangle_in_square", &TRIANGLE, &SQUARE, 0),
        plain("square_self", &SQUARE, &SQUARE, 8),
        plain("square_in_k4", &SQUARE, &K4, 24),
        plain("square_in_pentagon", &SQUARE, &PENTAGON, 0),
        plain("k4_self", &K4, &K4, 24),
        plain("path3_in_star3", &PATH3, &STAR3, 6),
        plain("path3_in_square", &PATH3, &SQUARE, 8),
        plain("path3_in_pentagon", &PATH3, &PENTAGON, 10),
        plain("star3_in_pentagon", &STAR3, &PENTAGON, 0),
        plain("empty_in_triangle", &EMPTY, &TRIANGLE, 1),
        plain("vertex_in_triangle_plus_isolated", &SINGLE_VERTEX, &TRIANGLE_PLUS_ISOLATED, 4),
        plain("two_isolated_in_path3", &TWO_ISOLATED, &PATH3, 6),
        GraphCase {
            name: "square_in_k4_without_degree_filter",
            config: Config::new(false, Dedupe::None, false),
            query: &SQUARE,
            target: &K4,
            expected_matches: 24,
        },
    ];

    /// Match counts after deduplication.
    pub static ref DEDUPE_TEST_CASES: Vec<GraphCase> = vec![
        deduped("square_in_k4_none", &SQUARE, &K4, Dedupe::None, 24),
        deduped("square_in_k4_vertices", &SQUARE, &K4, Dedupe::Vertices, 1),
        deduped("square_in_k4_edges", &SQUARE, &K4, Dedupe::Edges, 3),
        deduped("path3_in_star3_vertices", &PATH3, &STAR3, Dedupe::Vertices, 3),
        deduped("path3_in_star3_edges", &PATH3, &STAR3, Dedupe::Edges, 3),
        deduped("path3_in_square_vertices", &PATH3, &SQUARE, Dedupe::Vertices, 4),
        deduped("path3_in_square_edges", &PATH3, &SQUARE, Dedupe::Edges, 4),
        deduped("edge_in_path3_vertices", &SINGLE_EDGE, &PATH3, Dedupe::Vertices, 2),
        deduped("triangle_in_triangle_plus_isolated_vertices", &TRIANGLE, &TRIANGLE_PLUS_ISOLATED, Dedupe::Vertices, 1),
    ];
}
