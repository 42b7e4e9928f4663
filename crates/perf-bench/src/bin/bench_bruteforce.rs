use std::hint::black_box;

use fraud_ring_core::{BruteForceFinder, CycleFinder};
use perf_bench::*;

fn main() {
    let graph = generate_benchmark_graph();
    let stats = graph.stats();

    let finder = BruteForceFinder::default();
    let detection = black_box(finder.find_cycles(black_box(&graph)));

    println!(
        "--- Brute-Force Benchmark Results ({} accounts, {} edges) ---",
        stats.num_accounts, stats.num_edges
    );
    println!("Cycles Found: {}", detection.stats.cycles_found);
    println!("Nodes Visited: {}", detection.stats.nodes_visited);
    println!("Budget Exhausted: {}", detection.stats.budget_exhausted);
    println!("Elapsed Time: {:?}", detection.stats.execution_time);
}
