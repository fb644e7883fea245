pub mod health;
pub mod relay;

use axum::{
    Router,
    http::{
        HeaderValue,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::appstate::AppState;

pub const ALLOW_METHODS: &str = "POST, OPTIONS, GET";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Builds the relay router with the fixed CORS header set on every response.
pub fn router(state: AppState) -> anyhow::Result<Router> {
    let allow_origin = state.config.allow_origin_header()?;

    Ok(Router::new()
        .merge(health::router())
        .fallback(relay::dispatch)
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            allow_origin,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
        .layer(TraceLayer::new_for_http()))
}
