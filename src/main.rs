use anyhow::Result;
use fleet_agent::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let client = reporter::http_client(app_config.report_timeout())?;

    let aggregator = Arc::new(aggregator::Aggregator::from_config(
        &app_config,
        client.clone(),
    ));
    let reporter = Arc::new(reporter::Reporter::new(
        client,
        app_config.report.addr.clone(),
    ));

    tracing::info!(
        name = version::NAME,
        version = version::VERSION,
        addr = %reporter.addr(),
        interval_secs = app_config.agent.interval_secs,
        debug = app_config.agent.debug,
        collectors = ?aggregator.collector_names(),
        "agent starting"
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            aggregator,
            reporter,
            shutdown_rx,
        },
        worker::WorkerConfig {
            interval: app_config.interval(),
        },
    );

    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    tracing::info!("Received shutdown signal");
    let _ = shutdown_tx.send(());
    worker_handle.await?;
    Ok(())
}
