//! Shared helpers for tests that run the matcher over the common fixtures.

use std::sync::Once;

use subiso_common::GraphCase;

use crate::{Graph, find_subgraphs};

static INIT: Once = Once::new();

/// Configures logging for the test runner.
///
/// The level is taken from `RUST_LOG`; output goes through the test writer so
/// it is captured per test.
pub fn setup_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Runs one fixture case and compares the number of mappings found.
///
/// # Errors
///
/// Fails if either edge list is not a valid simple graph, if the search
/// rejects the pair, or if the count differs from the expected one.
#[track_caller]
pub fn run_case(case: &GraphCase) -> Result<(), Box<dyn std::error::Error>> {
    setup_test_logging();

    let query = Graph::from_edges(case.query.order, case.query.edges)?;
    let target = Graph::from_edges(case.target.order, case.target.edges)?;
    let found = find_subgraphs(&query, &target, &case.config)?;

    if found.len() != case.expected_matches {
        tracing::error!(
            "Expected {} matches, found {} for query {} in target {}",
            case.expected_matches,
            found.len(),
            case.query.name,
            case.target.name
        );
        return Err(format!(
            "{}: expected {} matches, found {}",
            case.name,
            case.expected_matches,
            found.len()
        )
        .into());
    }

    Ok(())
}
