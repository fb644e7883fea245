use std::sync::Arc;

use crate::config::RelayConfig;
use crate::inference::CompletionUpstream;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub upstream: Arc<dyn CompletionUpstream>,
}

impl AppState {
    pub fn new(config: RelayConfig, upstream: Arc<dyn CompletionUpstream>) -> Self {
        Self {
            config: Arc::new(config),
            upstream,
        }
    }
}
