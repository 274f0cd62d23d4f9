// Virtual memory counters; percent is (total - available) / total.

use super::Collector;
use crate::error::Result;
use crate::models::{MemStat, Metric};
use crate::sysinfo_repo::{MemoryCounters, SysinfoRepo};
use crate::units::round_to;
use async_trait::async_trait;
use std::sync::Arc;

pub struct MemoryCollector {
    sysinfo: Arc<SysinfoRepo>,
    precision: u32,
}

impl MemoryCollector {
    pub fn new(sysinfo: Arc<SysinfoRepo>, precision: u32) -> Self {
        Self { sysinfo, precision }
    }
}

pub fn mem_stat(counters: MemoryCounters, precision: u32) -> MemStat {
    let used = counters.total.saturating_sub(counters.available);
    let percent = if counters.total > 0 {
        (used as f64 / counters.total as f64) * 100.0
    } else {
        0.0
    };
    MemStat {
        percent: round_to(percent, precision),
        free: counters.free,
        available: counters.available,
        total: counters.total,
    }
}

#[async_trait]
impl Collector for MemoryCollector {
    fn name(&self) -> &str {
        "memory"
    }

    async fn collect(&self) -> Result<Metric> {
        let counters = self.sysinfo.memory().await?;
        Ok(Metric::Memory(mem_stat(counters, self.precision)))
    }
}
