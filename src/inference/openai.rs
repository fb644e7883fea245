use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::RelayError;
use crate::inference::CompletionUpstream;
use crate::types::{ChatReq, ChatResp};

/// Forwards completion requests to an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    url: String,
}

impl OpenAiClient {
    pub fn new(url: impl Into<String>) -> reqwest::Result<Self> {
        let client = Client::builder().pool_max_idle_per_host(10).build()?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionUpstream for OpenAiClient {
    async fn complete(&self, api_key: &str, req: &ChatReq) -> Result<String, RelayError> {
        debug!(url = %self.url, model = %req.model, "forwarding completion request");
        let start = Instant::now();

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(req)
            .send()
            .await
            .inspect_err(|e| warn!(error = %e, "upstream request failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            warn!(
                status = status.as_u16(),
                elapsed_ms = start.elapsed().as_millis(),
                "upstream rejected completion request"
            );
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = resp.json().await?;
        info!(
            elapsed_ms = start.elapsed().as_millis(),
            "upstream completion received"
        );
        Ok(ChatResp::from_value(data).reply_text())
    }
}
