use axum::{
    Json,
    body::{Body, to_bytes},
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::appstate::AppState;
use crate::error::RelayError;
use crate::types::{ChatReq, CompletionPrompt, ReplyResp};

/// Largest request body the relay buffers before answering 413.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Catch-all dispatch for every method/path pair that is not `GET /health`.
///
/// Only the POST branch reads the body.
pub async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
    match req.method().clone() {
        Method::OPTIONS => preflight().await,
        Method::POST => match relay(&state, req.into_body()).await {
            Ok(reply) => Json(reply).into_response(),
            Err(e) => {
                match &e {
                    RelayError::MissingApiKey => error!("{e}"),
                    RelayError::Upstream { status, .. } => {
                        warn!(status = *status, "relay failed: upstream rejection")
                    }
                    _ => warn!(status = e.status().as_u16(), error = %e, "relay failed"),
                }
                e.into_response()
            }
        },
        _ => not_found().await,
    }
}

/// CORS preflight: empty body, the CORS headers are added by the router layers.
pub async fn preflight() -> Response {
    StatusCode::OK.into_response()
}

pub async fn not_found() -> Response {
    RelayError::NotFound.into_response()
}

/// Validates the body, then makes the one upstream call.
async fn relay(state: &AppState, body: Body) -> Result<ReplyResp, RelayError> {
    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| RelayError::PayloadTooLarge)?;
    let body: Value = serde_json::from_slice(&body).map_err(|_| RelayError::InvalidJson)?;
    let prompt = CompletionPrompt::from_body(&body)?;
    let api_key = state.config.api_key().ok_or(RelayError::MissingApiKey)?;

    debug!(prompt_chars = prompt.as_str().chars().count(), "relaying prompt");
    let req = ChatReq::for_prompt(&state.config, prompt);
    let reply = state.upstream.complete(api_key, &req).await?;

    info!(reply_chars = reply.chars().count(), "relay completed");
    Ok(ReplyResp { reply })
}
