//! Immutable adjacency-list graphs.
//!
//! Both the query and the target of a search are [`Graph`]s. A graph is
//! validated once when it is built and never changes afterwards, so the
//! search can index adjacency lists without bounds checks failing.

use std::collections::HashSet;

use crate::error::InvalidGraphError;

/// A simple undirected graph with vertices `0..order()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    /// Ordered neighbor set of each vertex.
    adjacency: Vec<Vec<usize>>,
}

impl Graph {
    /// Builds a graph from per-vertex neighbor lists.
    ///
    /// The neighbor order is kept as given.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidGraphError`] for out-of-range neighbors, self
    /// loops, repeated neighbors or an edge only listed on one side.
    pub fn from_adjacency(adjacency: Vec<Vec<usize>>) -> Result<Self, InvalidGraphError> {
        let order = adjacency.len();

        for (vertex, neighbors) in adjacency.iter().enumerate() {
            let mut seen = HashSet::with_capacity(neighbors.len());
            for &neighbor in neighbors {
                if neighbor >= order {
                    return Err(InvalidGraphError::NeighborOutOfRange {
                        vertex,
                        neighbor,
                        order,
                    });
                }
                if neighbor == vertex {
                    return Err(InvalidGraphError::SelfLoop { vertex });
                }
                if !seen.insert(neighbor) {
                    return Err(InvalidGraphError::DuplicateNeighbor { vertex, neighbor });
                }
            }
        }

        for (vertex, neighbors) in adjacency.iter().enumerate() {
            for &neighbor in neighbors {
                if !adjacency[neighbor].contains(&vertex) {
                    return Err(InvalidGraphError::AsymmetricEdge {
                        from: vertex,
                        to: neighbor,
                    });
                }
            }
        }

        Ok(Self { adjacency })
    }

    /// Builds a graph with `order` vertices from an undirected edge list.
    ///
    /// Each edge is listed once. Neighbor lists come out sorted.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidGraphError`] when an endpoint is out of range, an
    /// edge is a loop, or the same edge is given twice.
    pub fn from_edges(order: usize, edges: &[(usize, usize)]) -> Result<Self, InvalidGraphError> {
        let mut adjacency = vec![Vec::new(); order];
        for &(u, v) in edges {
            if u >= order || v >= order {
                let (vertex, neighbor) = if u >= order { (v, u) } else { (u, v) };
                return Err(InvalidGraphError::NeighborOutOfRange {
                    vertex,
                    neighbor,
                    order,
                });
            }
            if u == v {
                return Err(InvalidGraphError::SelfLoop { vertex: u });
            }
            adjacency[u].push(v);
            adjacency[v].push(u);
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
        }
        Self::from_adjacency(adjacency)
    }

    /// Number of vertices.
    #[must_use]
    pub fn order(&self) -> usize {
        self.adjacency.len()
    }

    /// True when the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Degree of `v`.
    ///
    /// # Panics
    ///
    /// Panics if `v` is not a vertex of this graph.
    #[must_use]
    pub fn degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }

    /// Neighbors of `v`, in adjacency order.
    ///
    /// # Panics
    ///
    /// Panics if `v` is not a vertex of this graph.
    #[must_use]
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.adjacency[v]
    }

    /// True when `u` and `v` are adjacent.
    #[must_use]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adjacency.get(u).is_some_and(|n| n.contains(&v))
    }

    /// Every undirected edge once, as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(u, neighbors)| {
            neighbors
                .iter()
                .copied()
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
        })
    }

    /// Largest vertex degree, zero for an empty graph.
    #[must_use]
    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl TryFrom<&subiso_common::EdgeList> for Graph {
    type Error = InvalidGraphError;

    fn try_from(list: &subiso_common::EdgeList) -> Result<Self, Self::Error> {
        Self::from_edges(list.order, list.edges)
    }
}
