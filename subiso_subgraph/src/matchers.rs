//! Pluggable vertex and edge compatibility predicates.
//!
//! The engine never inspects what a vertex or an edge "is". Callers decide
//! compatibility through these traits, usually by capturing their own label
//! tables in a closure.

/// Decides whether a query vertex may be mapped onto a target vertex.
///
/// Consulted once per pair when the compatibility matrix is built.
pub trait VertexMatcher {
    /// True when `query` may be mapped onto `target`.
    fn matches(&self, query: usize, target: usize) -> bool;
}

/// An oriented edge `from -> to` of either graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Endpoint the edge is seen from.
    pub from: usize,
    /// The other endpoint.
    pub to: usize,
}

impl Edge {
    /// Creates the oriented edge `from -> to`.
    #[must_use]
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// The same edge seen from the other endpoint.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self::new(self.to, self.from)
    }
}

/// Decides whether a query edge may be carried by a target edge.
///
/// Checked lazily during refinement, because which target edge carries a
/// query edge depends on where its endpoints are mapped. Both edges are
/// given with matching orientation: `query.from` is mapped onto
/// `target.from`. A pair is only accepted when the matcher agrees in both
/// orientations, so direction-sensitive matchers are honoured.
pub trait EdgeMatcher {
    /// True when `query` may be carried by `target`.
    fn matches(&self, query: Edge, target: Edge) -> bool;
}

impl<F> VertexMatcher for F
where
    F: Fn(usize, usize) -> bool,
{
    fn matches(&self, query: usize, target: usize) -> bool {
        self(query, target)
    }
}

impl<F> EdgeMatcher for F
where
    F: Fn(Edge, Edge) -> bool,
{
    fn matches(&self, query: Edge, target: Edge) -> bool {
        self(query, target)
    }
}

/// Accepts every vertex pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnyVertex;

impl VertexMatcher for AnyVertex {
    fn matches(&self, _: usize, _: usize) -> bool {
        true
    }
}

/// Accepts every edge pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnyEdge;

impl EdgeMatcher for AnyEdge {
    fn matches(&self, _: Edge, _: Edge) -> bool {
        true
    }
}

/// Accepts a vertex pair when both carry equal labels.
#[derive(Clone, Copy, Debug)]
pub struct VertexLabels<'a, L> {
    /// Label of each query vertex.
    pub query: &'a [L],
    /// Label of each target vertex.
    pub target: &'a [L],
}

impl<'a, L: PartialEq> VertexLabels<'a, L> {
    /// Pairs up the label tables of the two graphs.
    #[must_use]
    pub const fn new(query: &'a [L], target: &'a [L]) -> Self {
        Self { query, target }
    }
}

impl<L: PartialEq> VertexMatcher for VertexLabels<'_, L> {
    fn matches(&self, query: usize, target: usize) -> bool {
        self.query[query] == self.target[target]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_matchers() {
        let even = |q: usize, t: usize| (q + t) % 2 == 0;
        assert!(VertexMatcher::matches(&even, 1, 3));
        assert!(!VertexMatcher::matches(&even, 1, 2));

        let forward = |q: Edge, t: Edge| q.from < q.to && t.from < t.to;
        assert!(EdgeMatcher::matches(&forward, Edge::new(0, 1), Edge::new(2, 3)));
        assert!(!EdgeMatcher::matches(
            &forward,
            Edge::new(0, 1),
            Edge::new(2, 3).reversed()
        ));
    }

    #[test]
    fn labels_compare_by_index() {
        let q = ['C', 'O'];
        let t = ['O', 'C', 'C'];
        let labels = VertexLabels::new(&q, &t);
        assert!(labels.matches(0, 1));
        assert!(labels.matches(1, 0));
        assert!(!labels.matches(0, 0));
    }

    #[test]
    fn any_accepts_everything() {
        assert!(AnyVertex.matches(7, 0));
        assert!(AnyEdge.matches(Edge::new(0, 1), Edge::new(5, 4)));
    }
}
