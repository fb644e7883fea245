use axum::{Json, Router, routing::get};
use tracing::debug;

use crate::appstate::AppState;
use crate::config::SERVICE_NAME;
use crate::routes::relay;
use crate::types::HealthResp;

/// `GET /health`. Every other method on the path falls through to the relay dispatch.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/health",
        get(health)
            .head(relay::not_found)
            .fallback(relay::dispatch),
    )
}

pub async fn health() -> Json<HealthResp> {
    debug!("health check");
    Json(HealthResp {
        ok: true,
        service: SERVICE_NAME,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse};

    #[tokio::test]
    async fn health_reports_service_name() {
        let Json(body) = health().await;
        assert!(body.ok);
        assert_eq!(body.service, "study-ai worker");

        let response = Json(body).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
