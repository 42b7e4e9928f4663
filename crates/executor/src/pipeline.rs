use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::info;

use super::config::Config;
use super::error::Error;
use super::loader::GraphLoader;
use super::producer::Producer;
use super::searcher::{CycleSearcher, FinderReport};
use super::types::TransactionSource;
use common::types::Transaction;
use fraud_ring_core::{BruteForceFinder, SearchLimits, TarjanFinder, TransactionGraph};

/// Outcome of a full detection run.
#[derive(Debug)]
pub struct RunOutcome {
    pub graph: Arc<TransactionGraph>,
    pub seed_time: Duration,
    pub brute_force: FinderReport,
    pub tarjan: FinderReport,
}

/// Seeds a graph from `source`: the source streams batches over a bounded
/// channel into a loader task that owns the graph until the stream ends.
pub async fn ingest<S>(source: S, channel_capacity: usize) -> Result<TransactionGraph, Error>
where
    S: TransactionSource,
{
    let graph = TransactionGraph::from_accounts(source.accounts(), source.expected_transactions());
    let (sender, receiver) = mpsc::channel::<Vec<Transaction>>(channel_capacity.max(1));

    let producer_handle = Producer::new(source).run(sender);
    let loader_handle = tokio::spawn(GraphLoader::new(graph, receiver).load());

    let (produced, loaded) = tokio::join!(producer_handle, loader_handle);
    produced??;
    loaded?
}

/// Runs both finders concurrently against the same frozen graph.
pub async fn detect(
    graph: Arc<TransactionGraph>,
    limits: SearchLimits,
) -> Result<(FinderReport, FinderReport), Error> {
    let brute_force = CycleSearcher::new(BruteForceFinder::new(limits)).spawn(graph.clone());
    let tarjan = CycleSearcher::new(TarjanFinder::new(limits)).spawn(graph);

    let (brute_force, tarjan) = tokio::join!(brute_force, tarjan);
    Ok((brute_force?, tarjan?))
}

/// Ingests `source`, then runs detection with the configured limits.
pub async fn run<S>(source: S, config: &Config) -> Result<RunOutcome, Error>
where
    S: TransactionSource,
{
    let timer = Instant::now();
    let graph = Arc::new(ingest(source, config.pipeline.channel_capacity).await?);
    let seed_time = timer.elapsed();

    info!(
        elapsed_ms = seed_time.as_secs_f64() * 1_000.0,
        "Graph created"
    );

    let (brute_force, tarjan) = detect(graph.clone(), SearchLimits::from(&config.search)).await?;

    Ok(RunOutcome {
        graph,
        seed_time,
        brute_force,
        tarjan,
    })
}
