// Public IP lookup: one GET, the address is the `query` field of the JSON body.

use crate::error::{AgentError, Result};
use serde::Deserialize;
use std::net::Ipv4Addr;
use tracing::instrument;

pub const LOOPBACK: Ipv4Addr = Ipv4Addr::LOCALHOST;

#[derive(Debug, Deserialize)]
struct IpInfo {
    query: String,
}

pub struct PublicIpResolver {
    client: reqwest::Client,
    url: String,
}

impl PublicIpResolver {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn resolve(&self) -> Result<String> {
        let resp = self.client.get(&self.url).send().await?;
        if !resp.status().is_success() {
            return Err(AgentError::NonSuccessStatus(resp.status().as_u16()));
        }
        let info: IpInfo = resp.json().await?;
        if info.query.is_empty() {
            return Err(AgentError::parse("ip lookup returned an empty address"));
        }
        Ok(info.query)
    }
}
