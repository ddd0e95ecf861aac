//! Runs the matcher over the bundled fixtures and prints what it finds.

use subiso_common::{ALL_GRAPHS, Config, Dedupe, K4, SQUARE};
use subiso_subgraph::{
    AnyEdge, Graph, SubgraphMatcher, VertexLabels, find_subgraphs, profiling,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::builder().dedupe(Dedupe::Edges).build();

    let query = Graph::try_from(&SQUARE)?;
    let target = Graph::try_from(&K4)?;
    let cycles = find_subgraphs(&query, &target, &config)?;
    println!("Found {} distinct 4-cycles in {}", cycles.len(), K4.name);
    for mapping in &cycles {
        println!("  {:?}", mapping.as_slice());
    }

    // every fixture against every fixture at least as large
    let plain = Config::default();
    for q in ALL_GRAPHS {
        for t in ALL_GRAPHS.iter().filter(|t| t.order >= q.order) {
            let found = find_subgraphs(&Graph::try_from(q)?, &Graph::try_from(*t)?, &plain)?;
            if !found.is_empty() {
                println!("{:>24} in {:<24} {:>4} embeddings", q.name, t.name, found.len());
            }
        }
    }

    // two colours on the square, matched into a two-coloured K4
    let query_colours = ['r', 'b', 'r', 'b'];
    let target_colours = ['r', 'r', 'b', 'b'];
    let labels = VertexLabels::new(&query_colours, &target_colours);
    let matcher = SubgraphMatcher::new(&query, &target, &plain);
    let mut search = matcher.iter(&labels, &AnyEdge)?;
    let first = search.next();
    println!(
        "First colour-preserving embedding: {:?}",
        first.as_ref().map(|m| m.as_slice())
    );
    println!("Search stats so far: {:?}", search.stats());

    profiling::report();

    Ok(())
}
