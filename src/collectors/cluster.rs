// Cluster resource dumps from `kubectl get <kind> -o yaml`.

use super::Collector;
use crate::error::{AgentError, Result};
use crate::executor::CommandRunner;
use crate::models::{ClusterKind, Metric};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

const UNREACHABLE: &str = "The connection to the server";
const NO_RESOURCES: &str = "No resources found";
const UNSUPPORTED_KIND: &str = "the server doesn't have a resource type";

/// What a `kubectl get` invocation amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterOutput {
    Resources(String),
    /// API server unreachable or not configured.
    Unreachable,
    NoResources,
    UnsupportedKind,
}

impl ClusterOutput {
    /// Soft outcomes contribute an empty dump.
    pub fn into_yaml(self) -> String {
        match self {
            ClusterOutput::Resources(yaml) => yaml,
            _ => String::new(),
        }
    }
}

fn sentinel(text: &str) -> Option<ClusterOutput> {
    if text.contains(UNREACHABLE) {
        Some(ClusterOutput::Unreachable)
    } else if text.contains(NO_RESOURCES) {
        Some(ClusterOutput::NoResources)
    } else if text.contains(UNSUPPORTED_KIND) {
        Some(ClusterOutput::UnsupportedKind)
    } else {
        None
    }
}

/// Classifies a command result. Sentinels are looked for first, in stdout on
/// success and in the stderr text on failure; only output that matches none
/// of them is passed through as a resource dump or a hard error.
pub fn classify(result: Result<String>) -> Result<ClusterOutput> {
    let text = match &result {
        Ok(out) => out.as_str(),
        Err(AgentError::ExternalCommand { stderr, .. }) => stderr.as_str(),
        Err(_) => "",
    };
    if let Some(soft) = sentinel(text) {
        return Ok(soft);
    }
    result.map(ClusterOutput::Resources)
}

pub struct ClusterCollector {
    runner: Arc<dyn CommandRunner>,
    kind: ClusterKind,
    command: String,
}

impl ClusterCollector {
    pub fn new(runner: Arc<dyn CommandRunner>, kubectl_bin: &str, kind: ClusterKind) -> Self {
        Self {
            runner,
            kind,
            command: format!("{} get {} -o yaml", kubectl_bin, kind.resource()),
        }
    }
}

#[async_trait]
impl Collector for ClusterCollector {
    fn name(&self) -> &str {
        self.kind.field()
    }

    async fn collect(&self) -> Result<Metric> {
        let output = classify(self.runner.run(&self.command).await)?;
        if !matches!(output, ClusterOutput::Resources(_)) {
            debug!(kind = self.kind.resource(), outcome = ?output, "cluster soft failure");
        }
        Ok(Metric::Cluster {
            kind: self.kind,
            yaml: output.into_yaml(),
        })
    }
}
