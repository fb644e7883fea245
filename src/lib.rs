//! # study-relay
//!
//! CORS-enabled relay between a static study front-end and the OpenAI chat
//! completions API. `POST` any path with `{"prompt": "..."}` and get back
//! `{"reply": "..."}` or `{"error": "..."}`.

pub mod appstate;
pub mod config;
pub mod error;
pub mod inference;
pub mod routes;
pub mod types;

pub use appstate::AppState;
pub use config::RelayConfig;
pub use error::RelayError;
pub use inference::{CompletionUpstream, OpenAiClient};
pub use routes::router as create_router;
