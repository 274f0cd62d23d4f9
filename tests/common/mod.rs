// Shared test helpers: scripted command runner, fixed collectors, mock collector endpoint.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use fleet_agent::collectors::Collector;
use fleet_agent::error::{AgentError, Result};
use fleet_agent::executor::CommandRunner;
use fleet_agent::models::*;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const LOOKUP_IP: &str = "203.0.113.7";

enum Reply {
    Stdout(String),
    Stderr(String),
}

/// Answers commands by substring match, first match wins. Unmatched commands
/// fail as if the binary were missing.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: Vec<(String, Reply)>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout(mut self, pattern: &str, out: &str) -> Self {
        self.replies
            .push((pattern.to_string(), Reply::Stdout(out.to_string())));
        self
    }

    pub fn stderr(mut self, pattern: &str, err: &str) -> Self {
        self.replies
            .push((pattern.to_string(), Reply::Stderr(err.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command_line: &str) -> Result<String> {
        self.calls.lock().unwrap().push(command_line.to_string());
        match self
            .replies
            .iter()
            .find(|(pattern, _)| command_line.contains(pattern.as_str()))
        {
            Some((_, Reply::Stdout(out))) => Ok(out.clone()),
            Some((_, Reply::Stderr(err))) => Err(AgentError::ExternalCommand {
                command: command_line.to_string(),
                stderr: err.clone(),
            }),
            None => Err(AgentError::Launch {
                command: command_line.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not scripted"),
            }),
        }
    }
}

/// Returns a fixed metric, or fails when `metric` is `None`. Optionally
/// sleeps first.
pub struct FixedCollector {
    name: &'static str,
    metric: Option<Metric>,
    delay: Duration,
}

impl FixedCollector {
    pub fn ok(name: &'static str, metric: Metric) -> Self {
        Self {
            name,
            metric: Some(metric),
            delay: Duration::ZERO,
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            name,
            metric: None,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Collector for FixedCollector {
    fn name(&self) -> &str {
        self.name
    }

    async fn collect(&self) -> Result<Metric> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.metric
            .clone()
            .ok_or_else(|| AgentError::parse(format!("{} forced to fail", self.name)))
    }
}

/// One non-default value per sub-record, keyed by collector name.
pub fn sample_metrics() -> Vec<(&'static str, Metric)> {
    let mut docker = ContainerStats::new();
    docker.insert(
        "web".into(),
        ContainerStat {
            name: "web".into(),
            pid: "5".into(),
            container: "abc123".into(),
            cpu: 12.34,
            mem_percent: 56.78,
            mem_limit: 200 * 1024 * 1024,
            mem_usage: 100 * 1024 * 1024,
            net_input: 3_000,
            net_output: 4_000,
            block_input: 1_000,
            block_output: 2_000,
        },
    );
    vec![
        ("cpu", Metric::Cpu(CpuStat { percent: 12.35 })),
        (
            "memory",
            Metric::Memory(MemStat {
                percent: 66.67,
                free: 500,
                available: 1_000,
                total: 3_000,
            }),
        ),
        (
            "disk",
            Metric::Disk(DiskStat {
                percent: 75.0,
                total: 1_000,
                free: 250,
                utilize: 15.0,
            }),
        ),
        (
            "network",
            Metric::Net(NetStat {
                input: 1_000,
                output: 2_000,
            }),
        ),
        (
            "system_load",
            Metric::SystemLoad(SystemLoad {
                date: "2026-10-19 12:00:00".into(),
                run_time: "1天1小时1分钟1秒".into(),
                login_users: 2,
                one_minute_load: 0.5,
                five_minute_load: 0.25,
                fifteen_minute_load: 0.125,
            }),
        ),
        ("docker", Metric::Docker(docker)),
        (
            "k8s_pod",
            Metric::Cluster {
                kind: ClusterKind::Pods,
                yaml: "apiVersion: v1\nitems: []\n".into(),
            },
        ),
    ]
}

/// Snapshot with every sample metric applied.
pub fn full_snapshot() -> Snapshot {
    let mut s = Snapshot {
        public_ip: "127.0.0.1".into(),
        time: 1_760_000_000,
        ..Default::default()
    };
    for (_, m) in sample_metrics() {
        s.apply(m);
    }
    s
}

#[derive(Clone)]
struct EndpointState {
    bodies: Arc<Mutex<Vec<Value>>>,
    status: StatusCode,
}

/// In-process collector endpoint: `POST /report` records the JSON body and
/// answers `status`; `GET /json` answers like the IP lookup service.
pub struct MockEndpoint {
    pub base: String,
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl MockEndpoint {
    pub async fn start(status: StatusCode) -> Self {
        let bodies = Arc::new(Mutex::new(Vec::new()));
        let state = EndpointState {
            bodies: bodies.clone(),
            status,
        };
        let app = Router::new()
            .route("/report", post(record))
            .route(
                "/json",
                get(|| async { Json(serde_json::json!({ "status": "success", "query": LOOKUP_IP })) }),
            )
            .with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base: format!("http://{}", addr),
            bodies,
        }
    }

    pub fn report_url(&self) -> String {
        format!("{}/report", self.base)
    }

    pub fn lookup_url(&self) -> String {
        format!("{}/json", self.base)
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }
}

async fn record(State(state): State<EndpointState>, Json(body): Json<Value>) -> StatusCode {
    state.bodies.lock().unwrap().push(body);
    state.status
}

/// A URL nothing listens on.
pub async fn closed_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/report", addr)
}

pub fn client() -> reqwest::Client {
    fleet_agent::reporter::http_client(Duration::from_secs(5)).unwrap()
}
