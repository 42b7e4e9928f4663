use fraud_ring_core::TransactionGraph;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub const NUM_ACCOUNTS: usize = 200;
pub const NUM_TRANSACTIONS: usize = 4_000;
pub const RING_COUNT: usize = 40;
pub const SEED: u64 = 0x5eed;

/// Builds the benchmark graph: `RING_COUNT` rings of 3 to 6 consecutive
/// accounts plus random filler payments, from a fixed seed so every run
/// measures the same graph.
pub fn generate_benchmark_graph() -> TransactionGraph {
    let mut rng = SmallRng::seed_from_u64(SEED);
    let mut graph = TransactionGraph::new(NUM_ACCOUNTS, NUM_TRANSACTIONS);

    for ring in 0..RING_COUNT {
        let len = rng.random_range(3..=6);
        let start = (ring * 5) % NUM_ACCOUNTS;
        for i in 0..len {
            let from = (start + i) % NUM_ACCOUNTS;
            let to = (start + (i + 1) % len) % NUM_ACCOUNTS;
            graph.add_transaction(from, to, 1_000.0, ring as i64);
        }
    }

    while graph.transactions().len() < NUM_TRANSACTIONS {
        let from = rng.random_range(0..NUM_ACCOUNTS);
        let to = rng.random_range(0..NUM_ACCOUNTS);
        // Self-payments are dropped by the graph; the loop simply retries.
        graph.add_transaction(from, to, rng.random_range(10.0..3_010.0), 0);
    }

    graph
}
