// Container runtime stat models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One container's row from the runtime's stats table, in canonical units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerStat {
    pub name: String,
    pub pid: String,
    pub container: String,
    pub cpu: f64,
    pub mem_percent: f64,
    pub mem_limit: u64,
    pub mem_usage: u64,
    pub net_input: u64,
    pub net_output: u64,
    pub block_input: u64,
    pub block_output: u64,
}

/// Container stats keyed by container name.
pub type ContainerStats = BTreeMap<String, ContainerStat>;
