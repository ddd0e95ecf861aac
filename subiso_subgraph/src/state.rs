//! Search state for Ullmann-style subgraph matching.
//!
//! A [`MatchingState`] pairs the compatibility matrix with both directions of
//! the partial mapping. Committing a pair freezes its row and then prunes
//! the rows below it until they are arc consistent again; the pruning is
//! logged in the matrix trail and undone in one step on backtrack.

use std::collections::VecDeque;

use subiso_common::Config;

use crate::error::InvalidGraphError;
use crate::graph::Graph;
use crate::mapping::Mapping;
use crate::matchers::{AnyEdge, Edge, EdgeMatcher, VertexMatcher};
use crate::matrix::CompatibilityMatrix;
use crate::profiling::Timer;

/// Partial mapping of a query graph into a target graph.
///
/// All mutation goes through [`MatchingState::add`] and
/// [`MatchingState::remove`]. An `add` is transactional: it either commits
/// the pair and the refinement it triggers, or leaves the state untouched.
#[derive(Debug)]
pub struct MatchingState<'g, E> {
    /// Pattern graph.
    query: &'g Graph,
    /// Graph being searched.
    target: &'g Graph,
    /// Edge compatibility, consulted during refinement.
    edges: &'g E,
    /// Remaining admissible pairs.
    matrix: CompatibilityMatrix,
    /// Query vertex -> target vertex.
    m1: Vec<Option<usize>>,
    /// Target vertex -> query vertex.
    m2: Vec<Option<usize>>,
    /// Committed rows, oldest first.
    commits: Vec<usize>,
}

// Manual impl: only `&E` is held, so `E` need not be `Clone`.
impl<E> Clone for MatchingState<'_, E> {
    fn clone(&self) -> Self {
        Self {
            query: self.query,
            target: self.target,
            edges: self.edges,
            matrix: self.matrix.clone(),
            m1: self.m1.clone(),
            m2: self.m2.clone(),
            commits: self.commits.clone(),
        }
    }
}

impl<'g> MatchingState<'g, AnyEdge> {
    /// Creates a state where every edge pair is compatible.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidGraphError::QueryLargerThanTarget`] when the query has
    /// more vertices than the target.
    pub fn new<V: VertexMatcher>(
        query: &'g Graph,
        target: &'g Graph,
        vertices: &V,
    ) -> Result<Self, InvalidGraphError> {
        Self::with_options(query, target, vertices, &AnyEdge, &Config::default())
    }
}

impl<'g, E: EdgeMatcher> MatchingState<'g, E> {
    /// Creates a state for matching `query` into `target`.
    ///
    /// Cell `(i, j)` starts live iff the vertex matcher accepts the pair and,
    /// with `config.degree_filter`, `deg(query, i) <= deg(target, j)`. Edge
    /// compatibility is checked later, during refinement.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidGraphError::QueryLargerThanTarget`] when the query has
    /// more vertices than the target.
    pub fn with_options<V: VertexMatcher>(
        query: &'g Graph,
        target: &'g Graph,
        vertices: &V,
        edges: &'g E,
        config: &Config,
    ) -> Result<Self, InvalidGraphError> {
        let (n, m) = (query.order(), target.order());
        if n > m {
            return Err(InvalidGraphError::QueryLargerThanTarget {
                query: n,
                target: m,
            });
        }

        // build up compatibility matrix
        let mut matrix = CompatibilityMatrix::new(n, m);
        for i in 0..n {
            for j in 0..m {
                let degree_ok = !config.degree_filter || query.degree(i) <= target.degree(j);
                if degree_ok && vertices.matches(i, j) {
                    matrix.set(i, j);
                }
            }
        }

        tracing::debug!(
            "compatibility matrix built: {}x{} with {} live cells (max degree {} vs {})",
            n,
            m,
            matrix.live_count(),
            query.max_degree(),
            target.max_degree()
        );

        Ok(Self {
            query,
            target,
            edges,
            matrix,
            m1: vec![None; n],
            m2: vec![None; m],
            commits: Vec::with_capacity(n),
        })
    }

    /// Number of query vertices.
    #[must_use]
    pub fn n_max(&self) -> usize {
        self.m1.len()
    }

    /// Number of target vertices.
    #[must_use]
    pub fn m_max(&self) -> usize {
        self.m2.len()
    }

    /// Number of committed query vertices.
    #[must_use]
    pub fn size(&self) -> usize {
        self.commits.len()
    }

    /// Read access to the compatibility matrix.
    #[must_use]
    pub const fn matrix(&self) -> &CompatibilityMatrix {
        &self.matrix
    }

    /// The query graph.
    #[must_use]
    pub const fn query(&self) -> &'g Graph {
        self.query
    }

    /// The target graph.
    #[must_use]
    pub const fn target(&self) -> &'g Graph {
        self.target
    }

    /// First unmapped row. With in-order commits this is [`Self::size`].
    #[must_use]
    pub fn next_n(&self) -> usize {
        self.m1
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.n_max())
    }

    /// Smallest unused live column of row `n` greater than `after`.
    #[must_use]
    pub fn next_m(&self, n: usize, after: Option<usize>) -> Option<usize> {
        let start = after.map_or(0, |m| m + 1);
        (start..self.m_max()).find(|&m| self.m2[m].is_none() && self.matrix.get(n, m))
    }

    /// Attempts to commit query vertex `i` to target vertex `j`.
    ///
    /// Returns false, leaving the state as it was, when `i` is already
    /// committed, `j` is already used, `(i, j)` is no longer a candidate, or
    /// refinement shows the commitment cannot be completed.
    #[contracts::debug_ensures(!ret || self.m1[i] == Some(j))]
    #[contracts::debug_ensures(self.m1.iter().flatten().count() == self.commits.len())]
    pub fn add(&mut self, i: usize, j: usize) -> bool {
        if self.m1[i].is_some() || self.m2[j].is_some() || !self.matrix.get(i, j) {
            return false;
        }

        // freeze row i on column j
        self.matrix.mark_row(i, i);
        self.matrix.set(i, j);

        if self.verify(i, j) && self.refine(i) {
            self.commits.push(i);
            self.m1[i] = Some(j);
            self.m2[j] = Some(i);
            true
        } else {
            // undo the freeze and whatever refinement hid
            self.matrix.reset_rows(i, i);
            false
        }
    }

    /// Undoes the most recent successful `add(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `(i, j)` is not committed, or if a later commitment is still
    /// in place. Either means the add/remove discipline has been broken.
    #[contracts::debug_ensures(self.m1[i].is_none() && self.m2[j].is_none())]
    #[contracts::debug_ensures(self.matrix.owned_by(i) == 0)]
    pub fn remove(&mut self, i: usize, j: usize) {
        assert_eq!(
            self.m1[i],
            Some(j),
            "remove({i}, {j}): query vertex {i} is not mapped to {j}"
        );
        assert_eq!(
            self.commits.last(),
            Some(&i),
            "remove({i}, {j}): a later commitment is still in place"
        );

        self.commits.pop();
        self.m1[i] = None;
        self.m2[j] = None;
        self.matrix.reset_rows(i, i);
    }

    /// Undoes every commitment, newest first.
    pub fn reset(&mut self) {
        while let Some(&i) = self.commits.last() {
            let Some(j) = self.m1[i] else {
                unreachable!("committed row {i} has no image");
            };
            self.remove(i, j);
        }
    }

    /// Refines the compatibility matrix after row `row` was fixed.
    ///
    /// Only unmapped rows after `row` are revised; earlier rows are already
    /// fixed. Every live cell that fails [`Self::verify`] is removed on behalf
    /// of `row`. A row that loses cells puts its unmapped neighbors back on the
    /// worklist, since they may have lost support. If a row is left with no
    /// candidate the commitment can never be completed and refinement stops.
    fn refine(&mut self, row: usize) -> bool {
        let _timer = Timer::new("matching_state::refine");

        let n_max = self.n_max();
        let mut queued = vec![false; n_max];
        let mut worklist = VecDeque::new();
        for n in row + 1..n_max {
            if self.m1[n].is_none() {
                queued[n] = true;
                worklist.push_back(n);
            }
        }

        while let Some(n) = worklist.pop_front() {
            queued[n] = false;

            let stale: Vec<usize> = self
                .matrix
                .candidates(n)
                .filter(|&m| !self.verify(n, m))
                .collect();
            if stale.is_empty() {
                continue;
            }

            for m in stale {
                self.matrix.mark(n, m, row);
            }

            // row n is dead
            if !self.matrix.has_candidate(n) {
                return false;
            }

            for &n1 in self.query.neighbors(n) {
                if n1 > row && self.m1[n1].is_none() && !queued[n1] {
                    queued[n1] = true;
                    worklist.push_back(n1);
                }
            }
        }
        true
    }

    /// Checks that `(n, m)` can still be part of a complete mapping.
    ///
    /// Each neighbor `n1` of `n` needs a live candidate `m1` among the
    /// neighbors of `m` whose edge the edge matcher accepts in both
    /// orientations. A committed neighbor only has its chosen column left, so
    /// for it this asks that the chosen target is adjacent to `m`.
    fn verify(&self, n: usize, m: usize) -> bool {
        self.query.neighbors(n).iter().all(|&n1| {
            self.target.neighbors(m).iter().any(|&m1| {
                let (qe, te) = (Edge::new(n, n1), Edge::new(m, m1));
                self.matrix.get(n1, m1)
                    && self.edges.matches(qe, te)
                    && self.edges.matches(qe.reversed(), te.reversed())
            })
        })
    }

    /// True iff every query vertex is mapped.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.size() == self.n_max()
    }

    /// Same as [`Self::is_complete`]: every step validated consistency.
    #[must_use]
    pub fn is_feasible(&self) -> bool {
        self.is_complete()
    }

    /// True if query vertex `n` is not mapped.
    #[must_use]
    pub fn is_unmapped(&self, n: usize) -> bool {
        self.m1[n].is_none()
    }

    /// Copy of the query -> target array.
    #[must_use]
    pub fn mapping(&self) -> Vec<Option<usize>> {
        self.m1.clone()
    }

    /// Copy of the target -> query array.
    #[must_use]
    pub fn reverse_mapping(&self) -> Vec<Option<usize>> {
        self.m2.clone()
    }

    /// The current mapping, if it is complete.
    #[must_use]
    pub fn to_mapping(&self) -> Option<Mapping> {
        self.m1
            .iter()
            .copied()
            .collect::<Option<Vec<usize>>>()
            .map(Mapping::new)
    }
}
