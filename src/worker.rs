// Report scheduler: one aggregate -> report cycle per tick, strictly sequential.

use crate::aggregator::Aggregator;
use crate::error::Result;
use crate::reporter::Reporter;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::Instrument;

pub struct WorkerDeps {
    pub aggregator: Arc<Aggregator>,
    pub reporter: Arc<Reporter>,
    pub shutdown_rx: oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    /// Period between cycle starts. A cycle longer than this delays the next
    /// one; missed ticks are skipped, never queued.
    pub interval: Duration,
}

/// Totals returned when the worker stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub cycles: u64,
    pub delivered: u64,
}

/// Builds one snapshot and sends it. Collector failures are absorbed by the
/// aggregator; the returned error is the delivery outcome only.
pub async fn run_cycle(aggregator: &Aggregator, reporter: &Reporter) -> Result<()> {
    tracing::info!(start = %chrono::Local::now().to_rfc3339(), "start report cycle");
    let snapshot = aggregator.snapshot().await;
    let result = reporter.report(&snapshot).await;
    tracing::info!(end = %chrono::Local::now().to_rfc3339(), delivered = result.is_ok(), "end report cycle");
    result
}

/// Spawns the scheduler. The first cycle runs immediately. On shutdown an
/// in-flight cycle finishes before the task exits.
pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<CycleStats> {
    let WorkerDeps {
        aggregator,
        reporter,
        mut shutdown_rx,
    } = deps;

    let worker_span = tracing::span!(
        tracing::Level::DEBUG,
        "worker",
        interval_secs = config.interval.as_secs_f64()
    );

    tokio::spawn(
        async move {
            let mut tick = interval(config.interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut stats = CycleStats::default();

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        stats.cycles += 1;
                        if run_cycle(&aggregator, &reporter).await.is_ok() {
                            stats.delivered += 1;
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Worker shutting down");
                        break;
                    }
                }
            }
            tracing::info!(
                cycles_total = stats.cycles,
                delivered_total = stats.delivered,
                "worker stopped"
            );
            stats
        }
        .instrument(worker_span),
    )
}
