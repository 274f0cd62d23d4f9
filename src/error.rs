// Error taxonomy for the collection and reporting path.

use std::time::Duration;

/// Errors raised while collecting metrics or delivering a snapshot.
///
/// Collector failures never reach the snapshot: the aggregator logs them and
/// leaves the sub-record at its zero value. Reporter failures abort only the
/// current cycle.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A byte-size suffix outside B, kB, MB, GB, KiB, MiB, GiB.
    #[error("unrecognized unit '{0}'")]
    UnrecognizedUnit(String),

    /// The spawned process wrote to standard error.
    #[error("command `{command}` wrote to stderr: {stderr}")]
    ExternalCommand { command: String, stderr: String },

    /// The process could not be started (or its output could not be read).
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process did not finish within the configured bound and was killed.
    #[error("command `{command}` timed out after {timeout:?}")]
    CommandTimeout { command: String, timeout: Duration },

    /// A numeric or textual field did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// An average was requested over zero usable samples.
    #[error("no usable samples for {0}")]
    EmptySampleSet(&'static str),

    /// OS counters could not be read.
    #[error("host counters unavailable: {0}")]
    Host(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Connection, timeout or body errors from the HTTP client.
    #[error("transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The collector endpoint answered with anything but 200.
    #[error("unexpected response status {0}")]
    NonSuccessStatus(u16),
}

pub type Result<T> = std::result::Result<T, AgentError>;

impl AgentError {
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        AgentError::Parse(msg.into())
    }

    pub fn host<S: Into<String>>(msg: S) -> Self {
        AgentError::Host(msg.into())
    }
}
