//! Complete query-to-target mappings and collections of them.

use std::collections::HashSet;

use itertools::Itertools;
use subiso_common::Dedupe;

use crate::graph::Graph;

/// A collection of mappings found during a search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MappingSet {
    /// The mappings, in search order.
    pub items: Vec<Mapping>,
}

impl MappingSet {
    /// Creates a set from a list of mappings.
    #[must_use]
    pub const fn new(items: Vec<Mapping>) -> Self {
        Self { items }
    }

    /// Returns true if no matches were found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the count of found matches.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterates over the mappings in search order.
    pub fn iter(&self) -> std::slice::Iter<'_, Mapping> {
        self.items.iter()
    }

    /// Keeps the first mapping of each class under `mode`.
    ///
    /// `query` is needed to compute edge signatures.
    pub fn dedupe(&mut self, mode: Dedupe, query: &Graph) {
        match mode {
            Dedupe::None => {}
            Dedupe::Vertices => {
                let mut seen: HashSet<Vec<usize>> = HashSet::new();
                self.items.retain(|m| seen.insert(m.vertex_signature()));
            }
            Dedupe::Edges => {
                let mut seen: HashSet<Vec<(usize, usize)>> = HashSet::new();
                self.items.retain(|m| seen.insert(m.edge_signature(query)));
            }
        }
    }
}

impl IntoIterator for MappingSet {
    type Item = Mapping;
    type IntoIter = std::vec::IntoIter<Mapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a MappingSet {
    type Item = &'a Mapping;
    type IntoIter = std::slice::Iter<'a, Mapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Mapping> for MappingSet {
    fn from_iter<I: IntoIterator<Item = Mapping>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A complete assignment: query vertex `q` is mapped onto `self.get(q)`.
///
/// Ordering is lexicographic over the images, which is also the order in
/// which the search reports mappings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mapping {
    /// Image of each query vertex.
    targets: Vec<usize>,
}

impl Mapping {
    /// Wraps the image of each query vertex.
    #[must_use]
    pub const fn new(targets: Vec<usize>) -> Self {
        Self { targets }
    }

    /// Image of query vertex `q`.
    #[must_use]
    pub fn get(&self, q: usize) -> Option<usize> {
        self.targets.get(q).copied()
    }

    /// Number of mapped query vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True for the mapping of an empty query.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Images indexed by query vertex.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.targets
    }

    /// `(query, target)` pairs in query order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.targets.iter().copied().enumerate()
    }

    /// Consumes the mapping, returning the images.
    #[must_use]
    pub fn into_vec(self) -> Vec<usize> {
        self.targets
    }

    /// Sorted, deduplicated target vertices used.
    #[must_use]
    pub fn vertex_signature(&self) -> Vec<usize> {
        self.targets.iter().copied().sorted_unstable().dedup().collect()
    }

    /// Sorted target edges carrying a query edge, each as `(min, max)`.
    #[must_use]
    pub fn edge_signature(&self, query: &Graph) -> Vec<(usize, usize)> {
        query
            .edges()
            .map(|(u, v)| {
                let (a, b) = (self.targets[u], self.targets[v]);
                (a.min(b), a.max(b))
            })
            .sorted_unstable()
            .collect()
    }

    /// True when no two query vertices share an image.
    #[must_use]
    pub fn is_injective(&self) -> bool {
        self.targets.iter().all_unique()
    }

    /// True when every query edge lands on a target edge.
    #[must_use]
    pub fn preserves_edges(&self, query: &Graph, target: &Graph) -> bool {
        self.len() == query.order()
            && query
                .edges()
                .all(|(u, v)| target.has_edge(self.targets[u], self.targets[v]))
    }
}

impl From<Vec<usize>> for Mapping {
    fn from(targets: Vec<usize>) -> Self {
        Self::new(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Graph {
        Graph::try_from(&subiso_common::SQUARE).unwrap()
    }

    #[test]
    fn accessors() {
        let m = Mapping::new(vec![2, 0, 1]);
        assert_eq!(m.get(0), Some(2));
        assert_eq!(m.get(3), None);
        assert_eq!(m.iter().collect::<Vec<_>>(), vec![(0, 2), (1, 0), (2, 1)]);
        assert_eq!(m.vertex_signature(), vec![0, 1, 2]);
        assert!(m.is_injective());
        assert!(!Mapping::new(vec![1, 1]).is_injective());
    }

    #[test]
    fn edge_preservation() {
        let path = Graph::try_from(&subiso_common::PATH3).unwrap();
        assert!(Mapping::new(vec![0, 1, 2]).preserves_edges(&path, &square()));
        assert!(!Mapping::new(vec![0, 2, 1]).preserves_edges(&path, &square()));
        assert_eq!(
            Mapping::new(vec![3, 0, 1]).edge_signature(&path),
            vec![(0, 1), (0, 3)]
        );
    }

    #[test]
    fn dedupe_by_vertices_and_edges() {
        let path = Graph::try_from(&subiso_common::PATH3).unwrap();
        let items = vec![
            Mapping::new(vec![0, 1, 2]),
            Mapping::new(vec![2, 1, 0]),
            Mapping::new(vec![1, 0, 2]),
        ];

        let mut by_vertices: MappingSet = items.iter().cloned().collect();
        by_vertices.dedupe(Dedupe::Vertices, &path);
        assert_eq!(by_vertices.len(), 1);
        assert_eq!(by_vertices.items[0], items[0]);

        let mut by_edges = MappingSet::new(items.clone());
        by_edges.dedupe(Dedupe::Edges, &path);
        assert_eq!(by_edges.into_iter().collect::<Vec<_>>(), vec![items[0].clone(), items[2].clone()]);

        let mut untouched = MappingSet::new(items.clone());
        untouched.dedupe(Dedupe::None, &path);
        assert_eq!(untouched.len(), 3);
    }
}
