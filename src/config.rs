use std::fmt;
use std::net::SocketAddr;

use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const MODEL: &str = "gpt-4o-mini";
pub const SYSTEM_PROMPT: &str = "You are a helpful study tutor. Be clear and concise.";
pub const TEMPERATURE: f64 = 0.7;
pub const SERVICE_NAME: &str = "study-ai worker";

/// Relay configuration, assembled once at startup and shared read-only.
#[derive(Clone, Parser)]
#[command(name = "study-relay", version, about)]
pub struct RelayConfig {
    /// Credential sent to the upstream as a bearer token.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Value of the Access-Control-Allow-Origin response header.
    #[arg(long, env = "ALLOW_ORIGIN", default_value = "*")]
    pub allow_origin: String,

    /// Address the HTTP listener binds to.
    #[arg(long = "bind", env = "BIND_ADDR", default_value = "0.0.0.0:8787")]
    pub bind_addr: SocketAddr,

    /// Chat completions endpoint the relay forwards to.
    #[arg(long, env = "OPENAI_CHAT_COMPLETIONS_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    #[arg(skip = MODEL.to_string())]
    pub model: String,

    #[arg(skip = SYSTEM_PROMPT.to_string())]
    pub system_prompt: String,

    #[arg(skip = TEMPERATURE)]
    pub temperature: f64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            allow_origin: "*".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8787)),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            model: MODEL.to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            temperature: TEMPERATURE,
        }
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field(
                "openai_api_key",
                &self.api_key().map(|_| "<redacted>"),
            )
            .field("allow_origin", &self.allow_origin)
            .field("bind_addr", &self.bind_addr)
            .field("upstream_url", &self.upstream_url)
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl RelayConfig {
    /// The configured credential, treating an empty value as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key.as_deref().filter(|key| !key.is_empty())
    }

    pub fn allow_origin_header(&self) -> anyhow::Result<HeaderValue> {
        HeaderValue::from_str(&self.allow_origin)
            .with_context(|| format!("invalid ALLOW_ORIGIN value: {:?}", self.allow_origin))
    }
}
