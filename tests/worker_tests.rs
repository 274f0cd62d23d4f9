// Worker: immediate first cycle, one POST per cycle, graceful shutdown

mod common;

use axum::http::StatusCode;
use common::{FixedCollector, MockEndpoint, client, sample_metrics};
use fleet_agent::aggregator::{Aggregator, IpSource};
use fleet_agent::collectors::Collector;
use fleet_agent::reporter::Reporter;
use fleet_agent::worker::{WorkerConfig, WorkerDeps, run_cycle, spawn};
use std::sync::Arc;
use std::time::Duration;

fn ok_collectors() -> Vec<Box<dyn Collector>> {
    sample_metrics()
        .into_iter()
        .map(|(name, metric)| Box::new(FixedCollector::ok(name, metric)) as Box<dyn Collector>)
        .collect()
}

#[tokio::test]
async fn cycle_with_failing_collectors_posts_once() {
    let endpoint = MockEndpoint::start(StatusCode::OK).await;
    let collectors: Vec<Box<dyn Collector>> = sample_metrics()
        .into_iter()
        .map(|(name, _)| Box::new(FixedCollector::failing(name)) as Box<dyn Collector>)
        .collect();
    let aggregator = Aggregator::new(collectors, IpSource::Loopback, true);
    let reporter = Reporter::new(client(), endpoint.report_url());

    run_cycle(&aggregator, &reporter).await.unwrap();

    let bodies = endpoint.bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["cpu"]["percent"], 0.0);
    assert_eq!(bodies[0]["system_load"]["date"], "");
    assert_eq!(bodies[0]["docker"], serde_json::json!({}));
}

#[tokio::test]
async fn cycle_reports_delivery_failure() {
    let endpoint = MockEndpoint::start(StatusCode::BAD_GATEWAY).await;
    let aggregator = Aggregator::new(ok_collectors(), IpSource::Loopback, true);
    let reporter = Reporter::new(client(), endpoint.report_url());

    assert!(run_cycle(&aggregator, &reporter).await.is_err());
    assert_eq!(endpoint.bodies().len(), 1);
}

#[tokio::test]
async fn worker_ticks_until_shutdown() {
    let endpoint = MockEndpoint::start(StatusCode::OK).await;
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let deps = WorkerDeps {
        aggregator: Arc::new(Aggregator::new(ok_collectors(), IpSource::Loopback, true)),
        reporter: Arc::new(Reporter::new(client(), endpoint.report_url())),
        shutdown_rx,
    };
    let handle = spawn(
        deps,
        WorkerConfig {
            interval: Duration::from_millis(50),
        },
    );

    tokio::time::sleep(Duration::from_millis(180)).await;
    shutdown_tx.send(()).unwrap();
    let stats = handle.await.unwrap();

    assert!(stats.cycles >= 2, "cycles = {}", stats.cycles);
    assert_eq!(stats.delivered, stats.cycles);
    assert_eq!(endpoint.bodies().len() as u64, stats.cycles);
}

#[tokio::test]
async fn shutdown_lets_in_flight_cycle_finish() {
    let endpoint = MockEndpoint::start(StatusCode::OK).await;
    let slow: Vec<Box<dyn Collector>> = vec![Box::new(
        FixedCollector::failing("cpu").delayed(Duration::from_millis(300)),
    )];
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let deps = WorkerDeps {
        aggregator: Arc::new(Aggregator::new(slow, IpSource::Loopback, true)),
        reporter: Arc::new(Reporter::new(client(), endpoint.report_url())),
        shutdown_rx,
    };
    let handle = spawn(
        deps,
        WorkerConfig {
            interval: Duration::from_secs(3600),
        },
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown_tx.send(()).unwrap();
    let stats = handle.await.unwrap();

    assert_eq!(stats.cycles, 1);
    assert_eq!(stats.delivered, 1);
    assert_eq!(endpoint.bodies().len(), 1);
}
