use std::hint::black_box;

use fraud_ring_core::{CycleFinder, TarjanFinder, strongly_connected_components};
use perf_bench::*;

fn main() {
    let graph = generate_benchmark_graph();
    let stats = graph.stats();

    let components = strongly_connected_components(&graph.successor_index());
    let non_trivial = components.iter().filter(|c| c.len() > 1).count();

    let finder = TarjanFinder::default();
    let detection = black_box(finder.find_cycles(black_box(&graph)));

    println!(
        "--- Tarjan Benchmark Results ({} accounts, {} edges) ---",
        stats.num_accounts, stats.num_edges
    );
    println!("Components: {} ({} non-trivial)", components.len(), non_trivial);
    println!("Cycles Found: {}", detection.stats.cycles_found);
    println!("Elapsed Time: {:?}", detection.stats.execution_time);
}
