// Root filesystem usage plus mean device %util from sar.

use super::Collector;
use crate::error::{AgentError, Result};
use crate::executor::CommandRunner;
use crate::models::{DiskStat, Metric};
use crate::sysinfo_repo::{FilesystemUsage, SysinfoRepo};
use crate::units::round_to;
use async_trait::async_trait;
use std::sync::Arc;

pub struct DiskCollector {
    runner: Arc<dyn CommandRunner>,
    sysinfo: Arc<SysinfoRepo>,
    sample_secs: u64,
    precision: u32,
}

impl DiskCollector {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        sysinfo: Arc<SysinfoRepo>,
        sample_secs: u64,
        precision: u32,
    ) -> Self {
        Self {
            runner,
            sysinfo,
            sample_secs,
            precision,
        }
    }

    fn command(&self) -> String {
        // %util is the 10th column of each per-device "Average:" row.
        format!(
            "LC_ALL=C sar -pd {} 1 | grep Average | awk '{{print $10}}'",
            self.sample_secs
        )
    }
}

/// Mean of the numeric lines in `output`. Empty and non-numeric lines are
/// skipped and do not count towards the denominator.
pub fn mean_utilization(output: &str) -> Result<f64> {
    let (sum, count) = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.parse::<f64>().ok())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return Err(AgentError::EmptySampleSet("disk utilization"));
    }
    Ok(sum / count as f64)
}

/// Usage as `df` reports it: used / (used + available), where used excludes
/// every free block and blocks reserved for root count as neither.
pub fn disk_stat(fs: FilesystemUsage, utilize: f64, precision: u32) -> DiskStat {
    let used = fs.total.saturating_sub(fs.free);
    let capacity = used.saturating_add(fs.available);
    let percent = if capacity > 0 {
        (used as f64 / capacity as f64) * 100.0
    } else {
        0.0
    };
    DiskStat {
        percent: round_to(percent, precision),
        total: fs.total,
        free: fs.available,
        utilize: round_to(utilize, precision),
    }
}

#[async_trait]
impl Collector for DiskCollector {
    fn name(&self) -> &str {
        "disk"
    }

    async fn collect(&self) -> Result<Metric> {
        let fs = self.sysinfo.root_filesystem().await?;
        let out = self.runner.run(&self.command()).await?;
        let utilize = mean_utilization(&out)?;
        Ok(Metric::Disk(disk_stat(fs, utilize, self.precision)))
    }
}
