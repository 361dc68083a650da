use axum::{
    body::Bytes,
    extract::State,
    http::{header::ACCEPT, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{ProxyError, ProxyState};
use crate::sync::oauth::TokenRequest;

#[derive(Serialize)]
struct UpstreamRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

/// JavaScript-style truthiness, since that's what callers of this endpoint expect.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => true,
    }
}

fn upstream_error(answer: &Value) -> Option<String> {
    let error = answer.get("error").filter(|e| is_truthy(e))?;

    let message = answer
        .get("error_description")
        .filter(|d| is_truthy(d))
        .unwrap_or(error);

    Some(match message {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

#[instrument(skip_all, fields(%method))]
pub(super) async fn exchange(
    State(state): State<ProxyState>,
    method: Method,
    body: Bytes,
) -> Result<Response, ProxyError> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    if method != Method::POST {
        return Err(ProxyError::MethodNotAllowed(method));
    }

    let request: TokenRequest = serde_json::from_slice(&body).unwrap_or_else(|err| {
        debug!(%err, "unreadable request body");
        TokenRequest::default()
    });

    if let Some(field) = request.missing() {
        return Err(ProxyError::MissingParameters(field));
    }

    let answer: Value = state
        .github
        .http()
        .post(state.token_url.clone())
        .header(ACCEPT, "application/json")
        .json(&UpstreamRequest {
            client_id: &request.client_id,
            client_secret: &state.client_secret,
            code: &request.code,
            redirect_uri: &request.redirect_uri,
        })
        .send()
        .await?
        .json()
        .await?;

    if let Some(message) = upstream_error(&answer) {
        return Err(ProxyError::Upstream(message));
    }

    debug!("token exchanged");

    Ok(Json(answer).into_response())
}
