// Interface throughput from two byte-counter samples.
//
// The collector holds its future for the whole sampling window (10 s by
// default). Run under the parallel aggregator the window overlaps the other
// collectors; run sequentially it adds the full window to the cycle.

use super::Collector;
use crate::error::Result;
use crate::models::{Metric, NetStat};
use crate::sysinfo_repo::{InterfaceCounters, SysinfoRepo};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub struct NetworkCollector {
    sysinfo: Arc<SysinfoRepo>,
    interface: Option<String>,
    window_secs: u64,
}

impl NetworkCollector {
    pub fn new(sysinfo: Arc<SysinfoRepo>, interface: Option<String>, window_secs: u64) -> Self {
        Self {
            sysinfo,
            interface,
            window_secs,
        }
    }
}

/// Bytes per second over the window, converted to kilobits (`* 8 / 1000`).
/// Integer arithmetic throughout; counter resets read as zero traffic.
pub fn throughput(start: InterfaceCounters, end: InterfaceCounters, window_secs: u64) -> NetStat {
    let window = window_secs.max(1);
    let kbits = |from: u64, to: u64| (to.saturating_sub(from) / window) * 8 / 1000;
    NetStat {
        input: kbits(start.received, end.received),
        output: kbits(start.transmitted, end.transmitted),
    }
}

#[async_trait]
impl Collector for NetworkCollector {
    fn name(&self) -> &str {
        "network"
    }

    async fn collect(&self) -> Result<Metric> {
        let start = self
            .sysinfo
            .interface_counters(self.interface.clone())
            .await?;
        tokio::time::sleep(Duration::from_secs(self.window_secs)).await;
        let end = self
            .sysinfo
            .interface_counters(self.interface.clone())
            .await?;
        Ok(Metric::Net(throughput(start, end, self.window_secs)))
    }
}
