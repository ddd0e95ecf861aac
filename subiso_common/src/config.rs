//! Configuration for the subgraph isomorphism search.
//!
//! This module exposes a small, stable surface for consumers to parameterize
//! how matching should behave.
//!
//! The three knobs are:
//! - degree_filter: whether a query vertex may only be paired with target
//!   vertices of at least the same degree when the compatibility matrix is
//!   first built.
//! - dedupe: how to collapse matches after the search has finished.
//! - parallel: whether eager enumeration forks one worker per top-level
//!   branch (only honoured when `subiso_subgraph` is built with `rayon`).
//!
//! Quick examples
//!
//! Defaults (degree filter on, no dedupe, sequential):
//! ```
//! use subiso_common::{Config, Dedupe};
//! let cfg = Config::default();
//! assert_eq!(cfg.dedupe, Dedupe::None);
//! ```
//!
//! Collapse automorphisms by the set of target vertices used:
//! ```
//! use subiso_common::{Config, Dedupe};
//! let cfg = Config::builder().dedupe(Dedupe::Vertices).build();
//! assert!(cfg.degree_filter);
//! ```

/// Global search configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Only admit `(q, t)` when `deg(q) <= deg(t)`.
    pub degree_filter: bool,
    /// How to deduplicate matches after search.
    pub dedupe: Dedupe,
    /// Fork one worker per top-level candidate during eager enumeration.
    pub parallel: bool,
}

impl Config {
    /// Create a new configuration.
    #[must_use]
    pub const fn new(degree_filter: bool, dedupe: Dedupe, parallel: bool) -> Self {
        Self {
            degree_filter,
            dedupe,
            parallel,
        }
    }

    /// Start a [`ConfigBuilder`] seeded with the defaults.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

impl Default for Config {
    /// Degree filtering on, every mapping reported, single threaded.
    fn default() -> Self {
        Self::new(true, Dedupe::None, false)
    }
}

/// Control how matches are deduplicated.
///
/// - None:
///   Every mapping found is reported, including the ones that only differ by
///   an automorphism of the query.
/// - Vertices:
///   Two mappings are the same if they use the same SET of target vertices.
///   The first one found (in search order) is kept.
/// - Edges:
///   Two mappings are the same if the query edges land on the same SET of
///   target edges. Useful when several vertex subsets share edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dedupe {
    /// Keep every mapping.
    #[default]
    None,
    /// Keep one mapping per distinct target vertex set.
    Vertices,
    /// Keep one mapping per distinct target edge set.
    Edges,
}

impl Dedupe {
    /// True when any deduplication is requested.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Builder for [`Config`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    /// Configuration being assembled.
    config: Config,
}

impl ConfigBuilder {
    /// Enable or disable degree filtering of the initial compatibility matrix.
    #[must_use]
    pub const fn degree_filter(mut self, enabled: bool) -> Self {
        self.config.degree_filter = enabled;
        self
    }

    /// Set the deduplication mode.
    #[must_use]
    pub const fn dedupe(mut self, dedupe: Dedupe) -> Self {
        self.config.dedupe = dedupe;
        self
    }

    /// Shorthand for `dedupe(Dedupe::None)`.
    #[must_use]
    pub const fn none(self) -> Self {
        self.dedupe(Dedupe::None)
    }

    /// Enable or disable parallel enumeration.
    #[must_use]
    pub const fn parallel(mut self, enabled: bool) -> Self {
        self.config.parallel = enabled;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}
