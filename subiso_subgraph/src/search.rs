//! Depth-first driver over a [`MatchingState`].
//!
//! The driver is an iterator: each call to `next` resumes the search where the
//! previous match was reported and runs until the next complete mapping, or
//! until the search space is exhausted.

use crate::mapping::Mapping;
use crate::matchers::EdgeMatcher;
use crate::profiling::Timer;
use crate::state::MatchingState;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// A committed `(row, column)` pair on the search stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Frame {
    /// Query vertex.
    row: usize,
    /// Target vertex it is mapped onto.
    col: usize,
}

/// Counters collected while searching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Calls to `add`.
    pub attempts: u64,
    /// Calls to `add` that were rolled back or refused.
    pub rejections: u64,
    /// Frames popped to resume an earlier row.
    pub backtracks: u64,
    /// Complete mappings reported.
    pub matches: u64,
}

/// Lazily enumerates every complete mapping reachable from a state.
///
/// Rows are committed in increasing order and each row tries its columns in
/// increasing order, so the mappings come out in lexicographic order and
/// every run over the same inputs gives the same sequence. To search again,
/// build a fresh state.
#[derive(Debug)]
pub struct SearchDriver<'g, E> {
    /// State mutated along the current path.
    state: MatchingState<'g, E>,
    /// Commitments made by this driver, oldest first.
    stack: Vec<Frame>,
    /// Last column tried for the row being extended.
    cursor: Option<usize>,
    /// The state holds a reported mapping that must be undone first.
    pending: bool,
    /// Nothing left to report.
    done: bool,
    /// Counters.
    stats: SearchStats,
}

impl<'g, E: EdgeMatcher> SearchDriver<'g, E> {
    /// Starts a search from `state`.
    ///
    /// Commitments already present in `state` are treated as fixed: the
    /// driver only backtracks over the ones it makes itself.
    #[must_use]
    pub fn new(state: MatchingState<'g, E>) -> Self {
        let dead_row = (0..state.n_max())
            .find(|&n| state.is_unmapped(n) && !state.matrix().has_candidate(n));
        if let Some(row) = dead_row {
            tracing::debug!("query vertex {} has no candidates, nothing to search", row);
        }

        Self {
            state,
            stack: Vec::new(),
            cursor: None,
            pending: false,
            done: dead_row.is_some(),
            stats: SearchStats::default(),
        }
    }

    /// Counters so far.
    #[must_use]
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }

    /// The underlying state.
    #[must_use]
    pub const fn state(&self) -> &MatchingState<'g, E> {
        &self.state
    }

    /// Tries the columns of `row` after the cursor; commits the first that
    /// survives refinement.
    fn extend(&mut self, row: usize) -> Option<usize> {
        let mut after = self.cursor.take();
        while let Some(col) = self.state.next_m(row, after) {
            self.stats.attempts += 1;
            if self.state.add(row, col) {
                return Some(col);
            }
            self.stats.rejections += 1;
            after = Some(col);
        }
        None
    }

    /// Undoes the newest frame and resumes its row after its column.
    ///
    /// Returns false when there is nothing left to undo.
    fn backtrack(&mut self) -> bool {
        let Some(frame) = self.stack.pop() else {
            return false;
        };
        self.stats.backtracks += 1;
        tracing::trace!(
            "backtracking: unmapping query vertex {} from target vertex {}",
            frame.row,
            frame.col
        );
        self.state.remove(frame.row, frame.col);
        self.cursor = Some(frame.col);
        true
    }

    /// Marks the search exhausted and logs the counters.
    fn finish(&mut self) -> Option<Mapping> {
        self.done = true;
        tracing::debug!(
            "search exhausted: {} matches, {} attempts, {} rejected, {} backtracks",
            self.stats.matches,
            self.stats.attempts,
            self.stats.rejections,
            self.stats.backtracks
        );
        None
    }
}

impl<E: EdgeMatcher> Iterator for SearchDriver<'_, E> {
    type Item = Mapping;

    fn next(&mut self) -> Option<Mapping> {
        if self.done {
            return None;
        }
        let _timer = Timer::new("search_driver::next");

        if self.pending {
            self.pending = false;
            if !self.backtrack() {
                return self.finish();
            }
        }

        loop {
            if self.state.is_complete() {
                self.pending = true;
                self.stats.matches += 1;
                return self.state.to_mapping();
            }

            let row = self.state.next_n();
            match self.extend(row) {
                Some(col) => {
                    self.stack.push(Frame { row, col });
                }
                None => {
                    if !self.backtrack() {
                        return self.finish();
                    }
                }
            }
        }
    }
}

/// Collects every mapping, one worker per candidate of the first open row.
///
/// Each worker gets its own deep copy of `state`, commits its column and
/// searches the rest of the tree alone. Branches are concatenated in column
/// order, so the result equals `SearchDriver::new(state).collect()`.
#[cfg(feature = "rayon")]
#[must_use]
pub fn collect_parallel<E>(state: MatchingState<'_, E>) -> Vec<Mapping>
where
    E: EdgeMatcher + Sync,
{
    if state.is_complete() {
        return SearchDriver::new(state).collect();
    }

    let row = state.next_n();
    let columns: Vec<usize> = std::iter::successors(state.next_m(row, None), |&c| {
        state.next_m(row, Some(c))
    })
    .collect();

    tracing::debug!(
        "forking {} branches at query vertex {}",
        columns.len(),
        row
    );

    columns
        .into_par_iter()
        .map(|col| {
            let mut branch = state.clone();
            if branch.add(row, col) {
                SearchDriver::new(branch).collect::<Vec<_>>()
            } else {
                Vec::new()
            }
        })
        .collect::<Vec<Vec<Mapping>>>()
        .into_iter()
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use subiso_common::{
        EMPTY, K4, PATH3, PENTAGON, SQUARE, STAR3, TRIANGLE, TRIANGLE_PLUS_ISOLATED,
    };

    use super::*;
    use crate::graph::Graph;
    use crate::matchers::AnyVertex;

    fn run(q: &Graph, t: &Graph) -> Vec<Mapping> {
        let st = MatchingState::new(q, t, &AnyVertex).unwrap();
        SearchDriver::new(st).collect()
    }

    #[test]
    fn triangle_into_triangle_with_isolated_vertex() {
        let q = Graph::try_from(&TRIANGLE).unwrap();
        let t = Graph::try_from(&TRIANGLE_PLUS_ISOLATED).unwrap();
        let found: Vec<Vec<usize>> = run(&q, &t).into_iter().map(Mapping::into_vec).collect();
        assert_eq!(
            found,
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0],
            ]
        );
    }

    #[test]
    fn degree_three_query_has_no_match() {
        let q = Graph::try_from(&STAR3).unwrap();
        let t = Graph::try_from(&PENTAGON).unwrap();
        let st = MatchingState::new(&q, &t, &AnyVertex).unwrap();
        assert!(!st.is_feasible());
        let mut driver = SearchDriver::new(st);
        assert_eq!(driver.next(), None);
        assert_eq!(driver.stats(), SearchStats::default());
    }

    #[test]
    fn identity_is_found() {
        let g = Graph::try_from(&SQUARE).unwrap();
        let found = run(&g, &g);
        assert_eq!(found.len(), 8);
        assert!(found.contains(&Mapping::new(vec![0, 1, 2, 3])));
    }

    #[test]
    fn empty_query_matches_once() {
        let q = Graph::try_from(&EMPTY).unwrap();
        let t = Graph::try_from(&TRIANGLE).unwrap();
        assert_eq!(run(&q, &t), vec![Mapping::default()]);
    }

    #[test]
    fn lazy_first_match() {
        let q = Graph::try_from(&PATH3).unwrap();
        let t = Graph::try_from(&K4).unwrap();
        let st = MatchingState::new(&q, &t, &AnyVertex).unwrap();
        let mut driver = SearchDriver::new(st);
        assert_eq!(driver.next(), Some(Mapping::new(vec![0, 1, 2])));
        assert_eq!(driver.stats().matches, 1);
        assert_eq!(driver.state().size(), 3);
        assert_eq!(driver.count(), 23);
    }

    #[test]
    fn state_is_clean_after_exhaustion() {
        let q = Graph::try_from(&PATH3).unwrap();
        let t = Graph::try_from(&SQUARE).unwrap();
        let st = MatchingState::new(&q, &t, &AnyVertex).unwrap();
        let matrix = st.matrix().clone();
        let mut driver = SearchDriver::new(st);
        assert_eq!(driver.by_ref().count(), 8);
        assert_eq!(driver.next(), None);
        assert_eq!(driver.state().size(), 0);
        assert_eq!(driver.state().matrix(), &matrix);
    }

    #[test]
    fn prefixed_state_is_not_undone() {
        let q = Graph::try_from(&TRIANGLE).unwrap();
        let t = Graph::try_from(&TRIANGLE_PLUS_ISOLATED).unwrap();
        let mut st = MatchingState::new(&q, &t, &AnyVertex).unwrap();
        assert!(st.add(0, 1));
        let found: Vec<Mapping> = SearchDriver::new(st).collect();
        assert_eq!(
            found,
            vec![Mapping::new(vec![1, 0, 2]), Mapping::new(vec![1, 2, 0])]
        );
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_matches_sequential() {
        let q = Graph::try_from(&PATH3).unwrap();
        let t = Graph::try_from(&K4).unwrap();
        let st = MatchingState::new(&q, &t, &AnyVertex).unwrap();
        let parallel = collect_parallel(st.clone());
        let sequential: Vec<Mapping> = SearchDriver::new(st).collect();
        assert_eq!(parallel, sequential);
    }
}

#[cfg(test)]
mod property_tests {
    use itertools::Itertools;
    use quickcheck::{Arbitrary, Gen, quickcheck};

    use super::*;
    use crate::graph::Graph;
    use crate::matchers::{AnyVertex, Edge};

    /// A small random simple graph.
    #[derive(Clone, Debug)]
    struct SmallGraph {
        order: usize,
        edges: Vec<(usize, usize)>,
    }

    impl SmallGraph {
        fn arbitrary_with(g: &mut Gen, min_order: usize, max_extra: usize) -> Self {
            let order = min_order + usize::arbitrary(g) % (max_extra + 1);
            let edges = (0..order)
                .tuple_combinations()
                .filter(|_| u8::arbitrary(g) % 2 == 0)
                .collect();
            Self { order, edges }
        }

        fn graph(&self) -> Graph {
            Graph::from_edges(self.order, &self.edges).unwrap()
        }
    }

    /// A query with at most four vertices and a target at least as large.
    #[derive(Clone, Debug)]
    struct Pair {
        query: SmallGraph,
        target: SmallGraph,
    }

    impl Arbitrary for Pair {
        fn arbitrary(g: &mut Gen) -> Self {
            let query = SmallGraph::arbitrary_with(g, 0, 4);
            let target = SmallGraph::arbitrary_with(g, query.order, 2);
            Self { query, target }
        }
    }

    fn brute_force(q: &Graph, t: &Graph) -> Vec<Mapping> {
        (0..t.order())
            .permutations(q.order())
            .map(Mapping::new)
            .filter(|m| m.preserves_edges(q, t))
            .sorted()
            .collect()
    }

    quickcheck! {
        fn prop_search_equals_brute_force(pair: Pair) -> bool {
            let (q, t) = (pair.query.graph(), pair.target.graph());
            let st = MatchingState::new(&q, &t, &AnyVertex).unwrap();
            let found: Vec<Mapping> = SearchDriver::new(st).collect();
            found == brute_force(&q, &t)
        }

        fn prop_every_match_is_sound(pair: Pair) -> bool {
            let (q, t) = (pair.query.graph(), pair.target.graph());
            let st = MatchingState::new(&q, &t, &AnyVertex).unwrap();
            SearchDriver::new(st).all(|m| {
                m.is_injective()
                    && m.preserves_edges(&q, &t)
                    && m.iter().all(|(u, v)| q.degree(u) <= t.degree(v))
            })
        }

        fn prop_search_is_deterministic(pair: Pair) -> bool {
            let (q, t) = (pair.query.graph(), pair.target.graph());
            let first: Vec<Mapping> =
                SearchDriver::new(MatchingState::new(&q, &t, &AnyVertex).unwrap()).collect();
            let second: Vec<Mapping> =
                SearchDriver::new(MatchingState::new(&q, &t, &AnyVertex).unwrap()).collect();
            first == second
        }

        fn prop_add_remove_round_trip(pair: Pair) -> bool {
            let (q, t) = (pair.query.graph(), pair.target.graph());
            let mut st = MatchingState::new(&q, &t, &AnyVertex).unwrap();

            // commit row 0 where possible, then probe every column of the next row
            if st.n_max() > 1 {
                let m_max = st.m_max();
                let _ = (0..m_max).find(|&c| st.add(0, c));
            }

            let row = st.next_n();
            if row == st.n_max() {
                return true;
            }
            (0..st.m_max()).all(|col| {
                let matrix = st.matrix().clone();
                let (m1, m2, size) = (st.mapping(), st.reverse_mapping(), st.size());
                let mut inverse_ok = true;
                if st.add(row, col) {
                    let (fwd, back) = (st.mapping(), st.reverse_mapping());
                    inverse_ok = fwd
                        .iter()
                        .enumerate()
                        .all(|(q, t)| t.is_none_or(|t| back[t] == Some(q)))
                        && back
                            .iter()
                            .enumerate()
                            .all(|(t, q)| q.is_none_or(|q| fwd[q] == Some(t)));
                    st.remove(row, col);
                }
                inverse_ok
                    && st.matrix() == &matrix
                    && st.mapping() == m1
                    && st.reverse_mapping() == m2
                    && st.size() == size
            })
        }

        fn prop_directed_edge_matcher_filters_results(pair: Pair) -> bool {
            let (q, t) = (pair.query.graph(), pair.target.graph());
            // upward query edges need upward target edges
            let upward = |qe: Edge, te: Edge| qe.from > qe.to || te.from < te.to;
            let config = subiso_common::Config::default();
            let st = MatchingState::with_options(&q, &t, &AnyVertex, &upward, &config).unwrap();
            let found: Vec<Mapping> = SearchDriver::new(st).collect();
            let expected: Vec<Mapping> = brute_force(&q, &t)
                .into_iter()
                .filter(|m| {
                    q.edges().all(|(u, v)| {
                        let (a, b) = (m.as_slice()[u], m.as_slice()[v]);
                        upward(Edge::new(u, v), Edge::new(a, b))
                            && upward(Edge::new(v, u), Edge::new(b, a))
                    })
                })
                .collect();
            found == expected
        }

        fn prop_edge_matcher_filters_results(pair: Pair) -> bool {
            let (q, t) = (pair.query.graph(), pair.target.graph());
            // target edges may only carry query edges with the same parity of
            // endpoint sum
            let parity = |qe: Edge, te: Edge| (qe.from + qe.to) % 2 == (te.from + te.to) % 2;
            let config = subiso_common::Config::default();
            let st = MatchingState::with_options(&q, &t, &AnyVertex, &parity, &config).unwrap();
            let found: Vec<Mapping> = SearchDriver::new(st).collect();
            let expected: Vec<Mapping> = brute_force(&q, &t)
                .into_iter()
                .filter(|m| {
                    q.edges().all(|(u, v)| {
                        parity(Edge::new(u, v), Edge::new(m.as_slice()[u], m.as_slice()[v]))
                    })
                })
                .collect();
            found == expected
        }
    }
}
