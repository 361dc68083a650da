use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thisslime::TracingError;

use crate::sync::SyncError;

/// What the proxy answers with when a request can't be served. The message is
/// what callers see; the held value is what gets logged.
#[derive(Debug, thiserror::Error, TracingError)]
#[span(level = INFO)]
pub enum ProxyError {
    #[error("Method not allowed")]
    #[event(level = WARN)]
    MethodNotAllowed(Method),

    /// Holds the first parameter found missing.
    #[error("Missing required parameters")]
    #[event(level = WARN)]
    MissingParameters(&'static str),

    /// GitHub refused the exchange; holds its description of why.
    #[error("{0}")]
    #[event(level = WARN)]
    Upstream(String),

    #[error("{0}")]
    #[event(level = WARN)]
    Unauthorized(&'static str),

    #[error("{0}")]
    #[event(level = WARN)]
    BadLeaderboardUpdate(&'static str),

    /// Holds the name of the missing setting.
    #[error("Server configuration error: Admin token not configured")]
    #[event(level = ERROR)]
    NotConfigured(&'static str),

    #[error("Failed to update leaderboard")]
    Leaderboard(#[from] SyncError),

    #[error("Internal server error")]
    #[event(level = ERROR)]
    Internal(#[from] reqwest::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingParameters(_) | Self::Upstream(_) | Self::BadLeaderboardUpdate(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Leaderboard(_) => StatusCode::BAD_GATEWAY,
            Self::NotConfigured(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        self.trace();
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
