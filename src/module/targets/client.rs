///! Target catalogue client
///!
///! Talks to the AAVSO target tool API (hosted on filtergraph) with basic
///! auth. The API key is the username; the password is the fixed string
///! "api_token".

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::types::TargetRecord;
use crate::error::{Error, Result};

const AAVSO_TARGETS_URL: &str = "https://filtergraph.com/aavso/api/v1/targets";
const REQUEST_TIMEOUT_SECONDS: u64 = 60;

/// Source of catalogue target records. The pipeline only sees this trait,
/// so tests can swap in a canned source.
#[async_trait]
pub trait TargetSource: Send + Sync {
    async fn fetch(&self, params: &[(String, String)]) -> Result<Vec<TargetRecord>>;
}

pub struct AavsoClient {
    client: Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TargetsResponse {
    targets: Vec<TargetRecord>,
}

impl AavsoClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
                .user_agent("Mozilla/5.0 varstar-finder/0.1")
                .build()
                .expect("Failed to build reqwest client"),
            api_key,
        }
    }

    async fn fetch_inner(&self, params: &[(String, String)]) -> anyhow::Result<Vec<TargetRecord>> {
        let response = self
            .client
            .get(AAVSO_TARGETS_URL)
            .basic_auth(&self.api_key, Some("api_token"))
            .query(params)
            .send()
            .await
            .context("Failed to GET target catalogue")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error {} from target catalogue", response.status());
        }

        let body: TargetsResponse = response
            .json()
            .await
            .context("Failed to decode target catalogue JSON")?;

        Ok(body.targets)
    }
}

#[async_trait]
impl TargetSource for AavsoClient {
    async fn fetch(&self, params: &[(String, String)]) -> Result<Vec<TargetRecord>> {
        let targets = self
            .fetch_inner(params)
            .await
            .map_err(Error::upstream)?;
        tracing::info!("Fetched {} targets from the catalogue", targets.len());
        Ok(targets)
    }
}
