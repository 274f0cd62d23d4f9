// Shell command execution with captured output.

use crate::error::{AgentError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Runs a shell command line and returns its standard output.
///
/// Collectors depend on this trait rather than on [`ShellExecutor`] so their
/// parsing can be exercised with canned output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `command_line` through the shell (pipes allowed).
    ///
    /// # Errors
    ///
    /// `ExternalCommand` if anything was written to stderr (whatever the exit
    /// code), `Launch` if the process could not be started, `CommandTimeout`
    /// if it did not finish in time.
    async fn run(&self, command_line: &str) -> Result<String>;
}

pub struct ShellExecutor {
    shell: String,
    timeout: Duration,
}

impl ShellExecutor {
    pub fn new(shell: impl Into<String>, timeout: Duration) -> Self {
        Self {
            shell: shell.into(),
            timeout,
        }
    }
}

#[async_trait]
impl CommandRunner for ShellExecutor {
    async fn run(&self, command_line: &str) -> Result<String> {
        let mut command = Command::new(&self.shell);
        command
            .arg("-c")
            .arg(command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so a timeout reaches every stage of a pipeline.
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn().map_err(|source| AgentError::Launch {
            command: command_line.to_string(),
            source,
        })?;
        let pid = child.id();

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| AgentError::Launch {
                command: command_line.to_string(),
                source,
            })?,
            Err(_) => {
                kill_process_group(pid);
                return Err(AgentError::CommandTimeout {
                    command: command_line.to_string(),
                    timeout: self.timeout,
                });
            }
        };

        if !output.stderr.is_empty() {
            return Err(AgentError::ExternalCommand {
                command: command_line.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        debug!(
            command = command_line,
            status = ?output.status.code(),
            stdout_len = output.stdout.len(),
            "command finished"
        );
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// SIGKILLs the group led by `pid`. The shell itself is also killed when the
/// child handle drops.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    let Some(pgid) = pid.and_then(|p| libc::pid_t::try_from(p).ok()) else {
        return;
    };
    // SAFETY: kill has no memory-safety preconditions.
    if unsafe { libc::kill(-pgid, libc::SIGKILL) } != 0 {
        debug!(pgid, error = %std::io::Error::last_os_error(), "process group already gone");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}
