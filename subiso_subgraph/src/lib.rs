//! Backtracking subgraph isomorphism with Ullmann refinement.
//!
//! A query graph is matched against a target graph by committing query
//! vertices one at a time and pruning a compatibility matrix after every
//! commitment. The search is exposed lazily through [`SearchDriver`] or
//! eagerly through [`SubgraphMatcher::enumerate_all`].

mod error;
mod graph;
mod mapping;
mod matchers;
mod matrix;
mod search;
mod state;

pub mod profiling;
pub mod test_harness;

pub use error::InvalidGraphError;
pub use graph::Graph;
pub use mapping::{Mapping, MappingSet};
pub use matchers::{AnyEdge, AnyVertex, Edge, EdgeMatcher, VertexLabels, VertexMatcher};
pub use matrix::{CellState, CompatibilityMatrix};
#[cfg(feature = "rayon")]
pub use search::collect_parallel;
pub use search::{SearchDriver, SearchStats};
pub use state::MatchingState;

pub use subiso_common::{Config, ConfigBuilder, Dedupe};

use tracing::{debug, info};

/// Matches one query graph against one target graph.
#[derive(Clone, Copy, Debug)]
pub struct SubgraphMatcher<'g, 'cfg> {
    /// Pattern graph.
    query: &'g Graph,
    /// Graph being searched.
    target: &'g Graph,
    /// Search options.
    config: &'cfg Config,
}

impl<'g, 'cfg> SubgraphMatcher<'g, 'cfg> {
    /// Pairs up a query, a target and a configuration.
    #[must_use]
    pub const fn new(query: &'g Graph, target: &'g Graph, config: &'cfg Config) -> Self {
        Self {
            query,
            target,
            config,
        }
    }

    /// Builds a fresh matching state for this pair.
    fn state<V, E>(
        &self,
        vertices: &V,
        edges: &'g E,
    ) -> Result<MatchingState<'g, E>, InvalidGraphError>
    where
        V: VertexMatcher,
        E: EdgeMatcher,
    {
        MatchingState::with_options(self.query, self.target, vertices, edges, self.config)
    }

    /// Lazy search: mappings are produced one at a time, in lexicographic
    /// order. Deduplication is not applied.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidGraphError::QueryLargerThanTarget`] when the query has
    /// more vertices than the target.
    pub fn iter<V, E>(
        &self,
        vertices: &V,
        edges: &'g E,
    ) -> Result<SearchDriver<'g, E>, InvalidGraphError>
    where
        V: VertexMatcher,
        E: EdgeMatcher,
    {
        Ok(SearchDriver::new(self.state(vertices, edges)?))
    }

    /// Collects every mapping, then deduplicates according to the config.
    ///
    /// With the `rayon` feature and `config.parallel`, the branches of the
    /// first query vertex are searched on the rayon pool. The result is the
    /// same either way.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidGraphError::QueryLargerThanTarget`] when the query has
    /// more vertices than the target.
    pub fn enumerate_all<V, E>(
        &self,
        vertices: &V,
        edges: &'g E,
    ) -> Result<MappingSet, InvalidGraphError>
    where
        V: VertexMatcher,
        E: EdgeMatcher + Sync,
    {
        info!(
            "starting subgraph search: query has {} vertices / {} edges, target has {} vertices / {} edges",
            self.query.order(),
            self.query.edge_count(),
            self.target.order(),
            self.target.edge_count()
        );

        let state = self.state(vertices, edges)?;
        let mut results: MappingSet = self.run(state).into_iter().collect();
        let raw = results.len();

        results.dedupe(self.config.dedupe, self.query);
        if self.config.dedupe.is_enabled() {
            debug!(
                "dedupe {:?} kept {} of {} mappings",
                self.config.dedupe,
                results.len(),
                raw
            );
        }

        info!("subgraph search finished: {} mappings", results.len());
        Ok(results)
    }

    #[cfg(feature = "rayon")]
    fn run<E: EdgeMatcher + Sync>(&self, state: MatchingState<'g, E>) -> Vec<Mapping> {
        if self.config.parallel {
            collect_parallel(state)
        } else {
            SearchDriver::new(state).collect()
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn run<E: EdgeMatcher>(&self, state: MatchingState<'g, E>) -> Vec<Mapping> {
        if self.config.parallel {
            debug!("parallel search requested without the rayon feature, searching sequentially");
        }
        SearchDriver::new(state).collect()
    }
}

/// Every mapping of `query` into `target` with all vertices and edges
/// compatible, deduplicated according to `config`.
///
/// # Errors
///
/// Returns [`InvalidGraphError::QueryLargerThanTarget`] when the query has
/// more vertices than the target.
pub fn find_subgraphs(
    query: &Graph,
    target: &Graph,
    config: &Config,
) -> Result<MappingSet, InvalidGraphError> {
    SubgraphMatcher::new(query, target, config).enumerate_all(&AnyVertex, &AnyEdge)
}
