// Runs every collector once per cycle and assembles the snapshot.

use crate::collectors::{self, Collector};
use crate::config::AppConfig;
use crate::error::Result;
use crate::executor::ShellExecutor;
use crate::models::{Metric, Snapshot};
use crate::public_ip::{LOOPBACK, PublicIpResolver};
use crate::sysinfo_repo::SysinfoRepo;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Where the snapshot's `public_ip` comes from.
pub enum IpSource {
    /// Debug mode: loopback, no network call.
    Loopback,
    Lookup(PublicIpResolver),
}

pub struct Aggregator {
    collectors: Vec<Box<dyn Collector>>,
    ip_source: IpSource,
    parallel: bool,
}

impl Aggregator {
    pub fn new(collectors: Vec<Box<dyn Collector>>, ip_source: IpSource, parallel: bool) -> Self {
        Self {
            collectors,
            ip_source,
            parallel,
        }
    }

    /// Full host collector set, shell executor and IP source from config.
    pub fn from_config(config: &AppConfig, client: reqwest::Client) -> Self {
        let runner = Arc::new(ShellExecutor::new(
            config.collection.shell.clone(),
            config.command_timeout(),
        ));
        let sysinfo = Arc::new(SysinfoRepo::new());
        let ip_source = if config.agent.debug {
            IpSource::Loopback
        } else {
            IpSource::Lookup(PublicIpResolver::new(
                client,
                config.report.ip_lookup_url.clone(),
            ))
        };
        Self::new(
            collectors::registry(&config.collection, runner, sysinfo),
            ip_source,
            config.collection.parallel,
        )
    }

    pub fn collector_names(&self) -> Vec<&str> {
        self.collectors.iter().map(|c| c.name()).collect()
    }

    /// Builds this cycle's snapshot. Never fails: a collector error is logged
    /// and its sub-record keeps the zero value.
    #[instrument(skip(self), fields(collectors = self.collectors.len(), parallel = self.parallel))]
    pub async fn snapshot(&self) -> Snapshot {
        let (public_ip, results) = tokio::join!(self.public_ip(), self.run_collectors());

        let mut snapshot = Snapshot {
            public_ip,
            ..Default::default()
        };
        for (name, result) in results {
            match result {
                Ok(metric) => snapshot.apply(metric),
                Err(e) => warn!(collector = name, error = %e, "collector failed, reporting zero values"),
            }
        }
        snapshot.time = chrono::Utc::now().timestamp();
        snapshot
    }

    async fn run_collectors(&self) -> Vec<(&str, Result<Metric>)> {
        if self.parallel {
            join_all(
                self.collectors
                    .iter()
                    .map(|c| async move { (c.name(), c.collect().await) }),
            )
            .await
        } else {
            let mut results = Vec::with_capacity(self.collectors.len());
            for c in &self.collectors {
                results.push((c.name(), c.collect().await));
            }
            results
        }
    }

    async fn public_ip(&self) -> String {
        match &self.ip_source {
            IpSource::Loopback => LOOPBACK.to_string(),
            IpSource::Lookup(resolver) => match resolver.resolve().await {
                Ok(ip) => ip,
                Err(e) => {
                    warn!(error = %e, operation = "resolve_public_ip", "falling back to loopback");
                    LOOPBACK.to_string()
                }
            },
        }
    }
}
