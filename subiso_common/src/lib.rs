//! Common configuration and shared test cases for the subiso workspace.
//!
//! This crate provides the search configuration consumed by `subiso_subgraph`
//! and a collection of small edge-list fixtures with known match counts.

mod config;
mod test_cases;

pub use crate::config::*;
pub use crate::test_cases::*;
