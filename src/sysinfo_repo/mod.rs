// OS counters: memory, interface bytes and load via sysinfo; root filesystem
// via statvfs.

mod linux;

use crate::error::{AgentError, Result};
use std::sync::{Arc, Mutex};
use sysinfo::{Networks, System};
use tracing::instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryCounters {
    pub total: u64,
    pub free: u64,
    pub available: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilesystemUsage {
    pub total: u64,
    /// Free blocks, including those reserved for root.
    pub free: u64,
    /// Free blocks usable by unprivileged users.
    pub available: u64,
}

/// Cumulative byte counters since boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterfaceCounters {
    pub received: u64,
    pub transmitted: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

pub struct SysinfoRepo {
    sys: Arc<Mutex<System>>,
    networks: Arc<Mutex<Networks>>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        let networks = Networks::new_with_refreshed_list();
        Self {
            sys: Arc::new(Mutex::new(sys)),
            networks: Arc::new(Mutex::new(networks)),
        }
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "memory"))]
    pub async fn memory(&self) -> Result<MemoryCounters> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| AgentError::host(format!("sysinfo lock poisoned: {}", e)))?;
            sys.refresh_memory();
            Ok(MemoryCounters {
                total: sys.total_memory(),
                free: sys.free_memory(),
                available: sys.available_memory(),
            })
        })
        .await
        .map_err(|e| AgentError::host(format!("sysinfo task join: {}", e)))?
    }

    /// Usage of the filesystem mounted at `/`.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "root_filesystem"))]
    pub async fn root_filesystem(&self) -> Result<FilesystemUsage> {
        tokio::task::spawn_blocking(|| {
            linux::statvfs("/").map_err(|e| AgentError::host(format!("statvfs /: {}", e)))
        })
        .await
        .map_err(|e| AgentError::host(format!("sysinfo task join: {}", e)))?
    }

    /// Byte counters for `interface`, or for the interface carrying the
    /// default route when `None`.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "interface_counters"))]
    pub async fn interface_counters(&self, interface: Option<String>) -> Result<InterfaceCounters> {
        let networks = self.networks.clone();
        tokio::task::spawn_blocking(move || {
            let name = match interface {
                Some(name) => name,
                None => linux::primary_interface()
                    .map_err(|e| AgentError::host(format!("reading route table: {}", e)))?
                    .ok_or_else(|| AgentError::host("no default route"))?,
            };
            tracing::trace!(interface = %name, "reading interface counters");
            let mut networks_guard = networks
                .lock()
                .map_err(|e| AgentError::host(format!("sysinfo networks lock poisoned: {}", e)))?;
            networks_guard.refresh(true);
            networks_guard
                .list()
                .get(&name)
                .map(|data| InterfaceCounters {
                    received: data.total_received(),
                    transmitted: data.total_transmitted(),
                })
                .ok_or_else(|| AgentError::host(format!("interface {} not found", name)))
        })
        .await
        .map_err(|e| AgentError::host(format!("sysinfo task join: {}", e)))?
    }

    pub fn load_average(&self) -> LoadAverage {
        let avg = System::load_average();
        LoadAverage {
            one: avg.one,
            five: avg.five,
            fifteen: avg.fifteen,
        }
    }
}
