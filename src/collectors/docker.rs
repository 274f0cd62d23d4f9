// Container stats from `docker stats --no-stream` with a fixed column template.

use super::Collector;
use crate::error::{AgentError, Result};
use crate::executor::CommandRunner;
use crate::models::{ContainerStat, ContainerStats, Metric};
use crate::units::{parse_bytes_or_zero, parse_percent};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Column template; one comma-separated line per container.
pub const STATS_TEMPLATE: &str = "{{.Name}},{{.Container}},{{.PIDs}},{{.CPUPerc}},{{.MemPerc}},{{.MemUsage}},{{.BlockIO}},{{.NetIO}}";

const FIELD_COUNT: usize = 8;

pub struct DockerCollector {
    runner: Arc<dyn CommandRunner>,
    command: String,
}

impl DockerCollector {
    pub fn new(runner: Arc<dyn CommandRunner>, docker_bin: &str) -> Self {
        Self {
            runner,
            command: format!("{docker_bin} stats --no-stream --format '{STATS_TEMPLATE}'"),
        }
    }
}

/// Splits `"<a> / <b>"` and converts both sides to bytes.
fn byte_pair(field: &str, what: &str) -> Result<(u64, u64)> {
    let (left, right) = field
        .split_once('/')
        .ok_or_else(|| AgentError::parse(format!("{what} '{field}' is not '<a> / <b>'")))?;
    Ok((parse_bytes_or_zero(left)?, parse_bytes_or_zero(right)?))
}

/// Parses one line produced with [`STATS_TEMPLATE`].
pub fn parse_line(line: &str) -> Result<ContainerStat> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(AgentError::parse(format!(
            "expected {FIELD_COUNT} fields, got {}",
            fields.len()
        )));
    }
    let (mem_usage, mem_limit) = byte_pair(fields[5], "memory usage")?;
    let (block_input, block_output) = byte_pair(fields[6], "block io")?;
    let (net_input, net_output) = byte_pair(fields[7], "net io")?;
    Ok(ContainerStat {
        name: fields[0].to_string(),
        container: fields[1].to_string(),
        pid: fields[2].to_string(),
        cpu: parse_percent(fields[3])?,
        mem_percent: parse_percent(fields[4])?,
        mem_limit,
        mem_usage,
        net_input,
        net_output,
        block_input,
        block_output,
    })
}

/// Parses the whole stats output. Lines that fail to parse are logged and
/// dropped; a later line with the same name replaces an earlier one.
pub fn parse_stats(output: &str) -> ContainerStats {
    let mut stats = ContainerStats::new();
    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        match parse_line(line) {
            Ok(stat) => {
                stats.insert(stat.name.clone(), stat);
            }
            Err(e) => warn!(error = %e, line, "dropping container stats line"),
        }
    }
    stats
}

#[async_trait]
impl Collector for DockerCollector {
    fn name(&self) -> &str {
        "docker"
    }

    async fn collect(&self) -> Result<Metric> {
        let out = self.runner.run(&self.command).await?;
        Ok(Metric::Docker(parse_stats(&out)))
    }
}
