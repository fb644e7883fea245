//! Relay error taxonomy and its mapping onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::types::ErrResp;

/// Every way a relay request can fail. The `Display` text is the `error`
/// string sent to the caller.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Not found")]
    NotFound,

    /// The body went over the buffering limit or its stream broke mid-read.
    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Invalid JSON body")]
    InvalidJson,

    #[error("Missing 'prompt' string in body")]
    MissingPrompt,

    #[error("Server misconfigured: OPENAI_API_KEY not set")]
    MissingApiKey,

    /// The upstream answered with a non-2xx status; its body is passed through verbatim.
    #[error("OpenAI {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The upstream call could not complete, or its success body could not be read.
    #[error("{0}")]
    Transport(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::NotFound => StatusCode::NOT_FOUND,
            RelayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::InvalidJson | RelayError::MissingPrompt => StatusCode::BAD_REQUEST,
            RelayError::MissingApiKey | RelayError::Transport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RelayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

/// Keeps the whole source chain, e.g.
/// `error sending request for url (..): client error (Connect): tcp connect error: Connection refused`.
impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Transport(format!("{:#}", anyhow::Error::new(err)))
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrResp {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_wire_format() {
        assert_eq!(RelayError::NotFound.to_string(), "Not found");
        assert_eq!(RelayError::InvalidJson.to_string(), "Invalid JSON body");
        assert_eq!(
            RelayError::MissingPrompt.to_string(),
            "Missing 'prompt' string in body"
        );
        assert_eq!(
            RelayError::MissingApiKey.to_string(),
            "Server misconfigured: OPENAI_API_KEY not set"
        );
        let upstream = RelayError::Upstream {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(upstream.to_string(), "OpenAI 429: rate limited");
    }

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(RelayError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            RelayError::PayloadTooLarge.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(RelayError::InvalidJson.status(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::MissingPrompt.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RelayError::MissingApiKey.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::Transport("connection refused".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let upstream = RelayError::Upstream {
            status: 401,
            body: String::new(),
        };
        assert_eq!(upstream.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn out_of_range_upstream_status_maps_to_bad_gateway() {
        let upstream = RelayError::Upstream {
            status: 1000,
            body: String::new(),
        };
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
    }
}
