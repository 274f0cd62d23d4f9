// CPU usage from a single sar sample: 100 - %idle.

use super::Collector;
use crate::error::{AgentError, Result};
use crate::executor::CommandRunner;
use crate::models::{CpuStat, Metric};
use crate::units::round_to;
use async_trait::async_trait;
use std::sync::Arc;

pub struct CpuCollector {
    runner: Arc<dyn CommandRunner>,
    sample_secs: u64,
    precision: u32,
}

impl CpuCollector {
    pub fn new(runner: Arc<dyn CommandRunner>, sample_secs: u64, precision: u32) -> Self {
        Self {
            runner,
            sample_secs,
            precision,
        }
    }

    fn command(&self) -> String {
        // %idle is the 8th column of the "Average: all" row.
        format!(
            "LC_ALL=C sar -P ALL {} 1 | grep Average | grep all | awk '{{print $8}}'",
            self.sample_secs
        )
    }
}

/// Parses the idle percentage printed by the sampling command.
pub fn parse_usage(output: &str, precision: u32) -> Result<CpuStat> {
    let text = output.trim();
    let idle: f64 = text
        .parse()
        .map_err(|_| AgentError::parse(format!("cpu idle '{text}'")))?;
    Ok(CpuStat {
        percent: round_to(100.0 - idle, precision),
    })
}

#[async_trait]
impl Collector for CpuCollector {
    fn name(&self) -> &str {
        "cpu"
    }

    async fn collect(&self) -> Result<Metric> {
        let out = self.runner.run(&self.command()).await?;
        parse_usage(&out, self.precision).map(Metric::Cpu)
    }
}
