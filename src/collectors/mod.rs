//! Metric collectors.
//!
//! Each [`Collector`] produces one sub-record of the snapshot or fails. The
//! aggregator iterates a registry of boxed collectors built by [`registry`];
//! collectors never retry and never substitute defaults themselves.

pub mod cluster;
pub mod cpu;
pub mod disk;
pub mod docker;
pub mod load;
pub mod memory;
pub mod network;

use crate::config::CollectionConfig;
use crate::error::Result;
use crate::executor::CommandRunner;
use crate::models::{ClusterKind, Metric};
use crate::sysinfo_repo::SysinfoRepo;
use async_trait::async_trait;
use std::sync::Arc;

pub use cluster::ClusterCollector;
pub use cpu::CpuCollector;
pub use disk::DiskCollector;
pub use docker::DockerCollector;
pub use load::LoadCollector;
pub use memory::MemoryCollector;
pub use network::NetworkCollector;

/// A source of one snapshot sub-record.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Name used in logs (e.g. `"cpu"`, `"k8s_pod"`).
    fn name(&self) -> &str;

    /// Collects the sub-record for the current cycle.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying command, counter or parser.
    async fn collect(&self) -> Result<Metric>;
}

/// Builds the full collector set for one host.
pub fn registry(
    config: &CollectionConfig,
    runner: Arc<dyn CommandRunner>,
    sysinfo: Arc<SysinfoRepo>,
) -> Vec<Box<dyn Collector>> {
    let mut collectors: Vec<Box<dyn Collector>> = vec![
        Box::new(CpuCollector::new(
            runner.clone(),
            config.cpu_sample_secs,
            config.precision,
        )),
        Box::new(MemoryCollector::new(sysinfo.clone(), config.precision)),
        Box::new(DiskCollector::new(
            runner.clone(),
            sysinfo.clone(),
            config.cpu_sample_secs,
            config.precision,
        )),
        Box::new(NetworkCollector::new(
            sysinfo.clone(),
            config.network_interface.clone(),
            config.network_sample_secs,
        )),
        Box::new(LoadCollector::new(runner.clone(), sysinfo)),
        Box::new(DockerCollector::new(runner.clone(), &config.docker_bin)),
    ];
    collectors.extend(ClusterKind::ALL.into_iter().map(|kind| {
        Box::new(ClusterCollector::new(runner.clone(), &config.kubectl_bin, kind))
            as Box<dyn Collector>
    }));
    collectors
}
