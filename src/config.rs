use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    pub report: ReportConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Seconds between report cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Use the loopback address instead of looking up the public IP.
    #[serde(default = "default_debug")]
    pub debug: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            debug: default_debug(),
        }
    }
}

fn default_interval_secs() -> u64 {
    30
}

fn default_debug() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Collector endpoint receiving the JSON POST.
    pub addr: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_ip_lookup_url() -> String {
    "http://ip-api.com/json".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// sar sampling window for CPU and disk I/O.
    #[serde(default = "default_cpu_sample_secs")]
    pub cpu_sample_secs: u64,
    #[serde(default = "default_network_sample_secs")]
    pub network_sample_secs: u64,
    /// Interface to sample; the interface carrying the default route when unset.
    #[serde(default)]
    pub network_interface: Option<String>,
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    /// Decimal places kept for every percentage.
    #[serde(default = "default_precision")]
    pub precision: u32,
    /// Run collectors concurrently within a cycle.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    #[serde(default = "default_shell")]
    pub shell: String,
    #[serde(default = "default_docker_bin")]
    pub docker_bin: String,
    #[serde(default = "default_kubectl_bin")]
    pub kubectl_bin: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            cpu_sample_secs: default_cpu_sample_secs(),
            network_sample_secs: default_network_sample_secs(),
            network_interface: None,
            command_timeout_secs: default_command_timeout_secs(),
            precision: default_precision(),
            parallel: default_parallel(),
            shell: default_shell(),
            docker_bin: default_docker_bin(),
            kubectl_bin: default_kubectl_bin(),
        }
    }
}

fn default_cpu_sample_secs() -> u64 {
    1
}

fn default_network_sample_secs() -> u64 {
    10
}

fn default_command_timeout_secs() -> u64 {
    30
}

fn default_precision() -> u32 {
    2
}

fn default_parallel() -> bool {
    true
}

fn default_shell() -> String {
    "/bin/sh".into()
}

fn default_docker_bin() -> String {
    "/usr/bin/docker".into()
}

fn default_kubectl_bin() -> String {
    "kubectl".into()
}

const MAX_PRECISION: u32 = 6;

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.agent.interval_secs)
    }

    pub fn report_timeout(&self) -> Duration {
        Duration::from_secs(self.report.timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.collection.command_timeout_secs)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.agent.interval_secs > 0,
            "agent.interval_secs must be > 0, got {}",
            self.agent.interval_secs
        );
        anyhow::ensure!(
            self.report.addr.starts_with("http://") || self.report.addr.starts_with("https://"),
            "report.addr must be an http:// or https:// URL, got {:?}",
            self.report.addr
        );
        anyhow::ensure!(
            self.report.timeout_secs > 0,
            "report.timeout_secs must be > 0, got {}",
            self.report.timeout_secs
        );
        anyhow::ensure!(
            !self.report.ip_lookup_url.is_empty(),
            "report.ip_lookup_url must be non-empty"
        );
        anyhow::ensure!(
            self.collection.cpu_sample_secs > 0,
            "collection.cpu_sample_secs must be > 0, got {}",
            self.collection.cpu_sample_secs
        );
        anyhow::ensure!(
            self.collection.network_sample_secs > 0,
            "collection.network_sample_secs must be > 0, got {}",
            self.collection.network_sample_secs
        );
        anyhow::ensure!(
            self.collection.command_timeout_secs > 0,
            "collection.command_timeout_secs must be > 0, got {}",
            self.collection.command_timeout_secs
        );
        anyhow::ensure!(
            self.collection.precision <= MAX_PRECISION,
            "collection.precision must be <= {}, got {}",
            MAX_PRECISION,
            self.collection.precision
        );
        anyhow::ensure!(
            self.collection
                .network_interface
                .as_deref()
                .is_none_or(|i| !i.is_empty()),
            "collection.network_interface must be non-empty when set"
        );
        Ok(())
    }
}
