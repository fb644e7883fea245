pub mod openai;

use async_trait::async_trait;

use crate::error::RelayError;
use crate::types::ChatReq;

pub use openai::OpenAiClient;

/// The single outbound call a relay request makes.
///
/// Implementations return the reply text on a 2xx, [`RelayError::Upstream`]
/// on any other status, and [`RelayError::Transport`] when the call itself fails.
#[async_trait]
pub trait CompletionUpstream: Send + Sync {
    async fn complete(&self, api_key: &str, req: &ChatReq) -> Result<String, RelayError>;
}
