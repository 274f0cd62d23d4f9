// CPU, memory, disk and load sub-records

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuStat {
    /// Busy percentage (100 - idle), rounded.
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemStat {
    pub percent: f64,
    pub free: u64,
    pub available: u64,
    pub total: u64,
}

/// Root filesystem usage plus mean device I/O utilization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskStat {
    pub percent: f64,
    pub total: u64,
    pub free: u64,
    pub utilize: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemLoad {
    pub date: String,
    pub run_time: String,
    pub login_users: u32,
    pub one_minute_load: f64,
    pub five_minute_load: f64,
    #[serde(rename = "fifth_minute_load")]
    pub fifteen_minute_load: f64,
}
