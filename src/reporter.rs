// Snapshot delivery: JSON POST to the collector endpoint.

use crate::error::{AgentError, Result};
use crate::models::Snapshot;
use crate::version::{NAME, VERSION};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{error, info, instrument};

/// HTTP client shared by the reporter and the public IP lookup.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(format!("{NAME}/{VERSION}"))
        .build()?)
}

pub struct Reporter {
    client: reqwest::Client,
    addr: String,
}

impl Reporter {
    pub fn new(client: reqwest::Client, addr: impl Into<String>) -> Self {
        Self {
            client,
            addr: addr.into(),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Serializes and POSTs one snapshot. Only HTTP 200 counts as delivered.
    ///
    /// Every outcome is logged here with the full snapshot; the error is
    /// returned so the caller can tell, but there is nothing to retry.
    #[instrument(skip(self, snapshot), fields(addr = %self.addr, time = snapshot.time))]
    pub async fn report(&self, snapshot: &Snapshot) -> Result<()> {
        let body = match serde_json::to_string(snapshot) {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, snapshot = ?snapshot, "failed to serialize snapshot");
                return Err(AgentError::Serialization(e));
            }
        };

        let resp = match self
            .client
            .post(&self.addr)
            .header(CONTENT_TYPE, "application/json")
            .body(body.clone())
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                error!(error = %e, snapshot = %body, "failed to post snapshot");
                return Err(AgentError::Transport(e));
            }
        };

        let status = resp.status();
        if status != StatusCode::OK {
            error!(status = status.as_u16(), snapshot = %body, "failed to post snapshot");
            return Err(AgentError::NonSuccessStatus(status.as_u16()));
        }
        info!(snapshot = %body, "snapshot delivered");
        Ok(())
    }
}
