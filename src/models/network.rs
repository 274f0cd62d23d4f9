// Network throughput sub-record

use serde::{Deserialize, Serialize};

/// Interface throughput in kilobits per second.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetStat {
    pub input: u64,
    pub output: u64,
}
