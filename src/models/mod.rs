// Snapshot and metric sub-record models (wire format)

mod container;
mod network;
mod snapshot;
mod system;

pub use container::{ContainerStat, ContainerStats};
pub use network::NetStat;
pub use snapshot::{ClusterKind, Metric, Snapshot};
pub use system::{CpuStat, DiskStat, MemStat, SystemLoad};
