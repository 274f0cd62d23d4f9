// Load averages, system date, uptime and logged-in users.

use super::Collector;
use crate::error::{AgentError, Result};
use crate::executor::CommandRunner;
use crate::models::{Metric, SystemLoad};
use crate::sysinfo_repo::SysinfoRepo;
use crate::units::Uptime;
use async_trait::async_trait;
use std::sync::Arc;

const DATE_COMMAND: &str = "date '+%Y-%m-%d %H:%M:%S'";
const UPTIME_COMMAND: &str = "cat /proc/uptime";
const USERS_COMMAND: &str = "users";

pub struct LoadCollector {
    runner: Arc<dyn CommandRunner>,
    sysinfo: Arc<SysinfoRepo>,
}

impl LoadCollector {
    pub fn new(runner: Arc<dyn CommandRunner>, sysinfo: Arc<SysinfoRepo>) -> Self {
        Self { runner, sysinfo }
    }
}

/// Whole seconds from `/proc/uptime` ("<uptime> <idle>"), fraction dropped.
pub fn parse_uptime_secs(output: &str) -> Result<u64> {
    let first = output.split_whitespace().next().unwrap_or_default();
    let secs: f64 = first
        .parse()
        .map_err(|_| AgentError::parse(format!("uptime '{}'", output.trim())))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(AgentError::parse(format!("uptime '{}'", output.trim())));
    }
    Ok(secs as u64)
}

/// Number of whitespace-separated names; empty output is zero users.
pub fn count_users(output: &str) -> u32 {
    output.split_whitespace().count() as u32
}

#[async_trait]
impl Collector for LoadCollector {
    fn name(&self) -> &str {
        "system_load"
    }

    async fn collect(&self) -> Result<Metric> {
        let date = self.runner.run(DATE_COMMAND).await?;
        let load = self.sysinfo.load_average();
        let uptime = parse_uptime_secs(&self.runner.run(UPTIME_COMMAND).await?)?;
        let users = self.runner.run(USERS_COMMAND).await?;

        Ok(Metric::SystemLoad(SystemLoad {
            date: date.trim_end_matches('\n').to_string(),
            run_time: Uptime::from_secs(uptime).to_string(),
            login_users: count_users(&users),
            one_minute_load: load.one,
            five_minute_load: load.five,
            fifteen_minute_load: load.fifteen,
        }))
    }
}
