// Per-cycle snapshot and the tagged collector output merged into it

use serde::{Deserialize, Serialize};

use super::{ContainerStats, CpuStat, DiskStat, MemStat, NetStat, SystemLoad};

/// One report cycle. Every sub-record is present; a collector that failed
/// leaves its sub-record at the zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub public_ip: String,
    /// Seconds since the Unix epoch.
    pub time: i64,
    pub cpu: CpuStat,
    pub memory: MemStat,
    pub disk: DiskStat,
    pub net: NetStat,
    pub system_load: SystemLoad,
    pub docker: ContainerStats,
    pub k8s_node: String,
    pub k8s_deployment: String,
    pub k8s_replicaset: String,
    pub k8s_pod: String,
    pub k8s_service: String,
}

/// Cluster resource kinds dumped as YAML into the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterKind {
    Nodes,
    Deployments,
    ReplicaSets,
    Pods,
    Services,
}

impl ClusterKind {
    pub const ALL: [ClusterKind; 5] = [
        ClusterKind::Nodes,
        ClusterKind::Deployments,
        ClusterKind::ReplicaSets,
        ClusterKind::Pods,
        ClusterKind::Services,
    ];

    /// Resource argument for `kubectl get`.
    pub fn resource(self) -> &'static str {
        match self {
            ClusterKind::Nodes => "nodes",
            ClusterKind::Deployments => "deployments",
            ClusterKind::ReplicaSets => "replicasets",
            ClusterKind::Pods => "pods",
            ClusterKind::Services => "services",
        }
    }

    /// Snapshot field the dump is stored in.
    pub fn field(self) -> &'static str {
        match self {
            ClusterKind::Nodes => "k8s_node",
            ClusterKind::Deployments => "k8s_deployment",
            ClusterKind::ReplicaSets => "k8s_replicaset",
            ClusterKind::Pods => "k8s_pod",
            ClusterKind::Services => "k8s_service",
        }
    }
}

/// Output of a single collector.
#[derive(Debug, Clone, PartialEq)]
pub enum Metric {
    Cpu(CpuStat),
    Memory(MemStat),
    Disk(DiskStat),
    Net(NetStat),
    SystemLoad(SystemLoad),
    Docker(ContainerStats),
    Cluster { kind: ClusterKind, yaml: String },
}

impl Snapshot {
    /// Stores a collector's sub-record in its slot.
    pub fn apply(&mut self, metric: Metric) {
        match metric {
            Metric::Cpu(v) => self.cpu = v,
            Metric::Memory(v) => self.memory = v,
            Metric::Disk(v) => self.disk = v,
            Metric::Net(v) => self.net = v,
            Metric::SystemLoad(v) => self.system_load = v,
            Metric::Docker(v) => self.docker = v,
            Metric::Cluster { kind, yaml } => *self.cluster_slot(kind) = yaml,
        }
    }

    fn cluster_slot(&mut self, kind: ClusterKind) -> &mut String {
        match kind {
            ClusterKind::Nodes => &mut self.k8s_node,
            ClusterKind::Deployments => &mut self.k8s_deployment,
            ClusterKind::ReplicaSets => &mut self.k8s_replicaset,
            ClusterKind::Pods => &mut self.k8s_pod,
            ClusterKind::Services => &mut self.k8s_service,
        }
    }
}
