use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thisslime::TracingError;
use tracing::{debug, info, instrument};

use super::{ProxyError, ProxyState};
use crate::sync::{PlayerRecord, SyncError};

/// Body of a leaderboard write, sent by a logged-in client to the proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardUpdate {
    #[serde(default)]
    pub player_data: Option<PlayerRecord>,

    #[serde(default)]
    pub gist_id: Option<String>,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();

    (!token.is_empty()).then_some(token)
}

/// Writes the caller's record with the server's token, under the login their
/// own token belongs to.
#[instrument(skip_all, fields(%method))]
pub(super) async fn update(
    State(state): State<ProxyState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    if method != Method::POST {
        return Err(ProxyError::MethodNotAllowed(method));
    }

    let token = bearer_token(&headers)
        .ok_or(ProxyError::Unauthorized("No authorization token provided"))?;

    let user = match state.github.clone().with_token(token).user().await {
        Ok(user) => user,
        Err(SyncError::Status(err)) => {
            err.trace();
            return Err(ProxyError::Unauthorized("Invalid user token"));
        }
        Err(err) => return Err(err.into()),
    };

    info!(login = %user.login, "authenticated user");

    let request: LeaderboardUpdate = serde_json::from_slice(&body).unwrap_or_else(|err| {
        debug!(%err, "unreadable request body");
        LeaderboardUpdate::default()
    });

    let (Some(mut record), Some(gist_id)) = (request.player_data, request.gist_id) else {
        return Err(ProxyError::BadLeaderboardUpdate("Missing required data"));
    };

    let Some(store) = &state.leaderboard else {
        return Err(ProxyError::NotConfigured("leaderboard"));
    };

    if store.gist_id() != Some(gist_id.as_str()) {
        return Err(ProxyError::BadLeaderboardUpdate("Invalid gist ID"));
    }

    record.username.clone_from(&user.login);
    store
        .update(|board| board.upsert(record.clone(), Utc::now()))
        .await?;

    info!(login = %user.login, "leaderboard updated");

    Ok(Json(json!({
        "success": true,
        "message": "Leaderboard updated successfully",
        "username": user.login,
    }))
    .into_response())
}

#[cfg(test)]
mod tests {
    use crate::{
        proxy::{router, ProxyState},
        sync::{
            github::tests::{client, FakeGithub},
            leaderboard::{Leaderboard, FILE_NAME},
        },
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(github_url: &str, configured: bool) -> Router {
        let state = ProxyState::new(
            client(github_url),
            "http://127.0.0.1:9/token".parse().unwrap(),
            "shh",
        );

        if configured {
            router(state.with_leaderboard("board", "server-token"))
        } else {
            router(state)
        }
    }

    async fn call(app: Router, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method("POST")
            .uri("/api/update-leaderboard")
            .header("content-type", "application/json");

        if let Some(token) = token {
            request = request.header("authorization", format!("Bearer {token}"));
        }

        let response = app
            .oneshot(request.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }

    fn update(gist_id: &str) -> Value {
        json!({
            "gistId": gist_id,
            "playerData": {
                "username": "mallory",
                "stats": {"gamesPlayed": 3, "gamesWon": 2, "currentStreak": 2, "maxStreak": 2, "guessDistribution": [0, 1, 1, 0, 0, 0]},
                "lastPlayedDate": "2025-04-01"
            }
        })
    }

    #[tokio::test]
    async fn caller_must_present_a_token() {
        let url = FakeGithub::default().serve().await;

        let (status, body) = call(app(&url, true), None, update("board")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "No authorization token provided" }));

        let (status, body) = call(app(&url, true), Some("bad"), update("board")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Invalid user token" }));
    }

    #[tokio::test]
    async fn body_must_name_player_and_gist() {
        let url = FakeGithub::default().serve().await;

        let (status, body) = call(app(&url, true), Some("good"), json!({ "gistId": "board" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing required data" }));

        let (status, body) = call(app(&url, true), Some("good"), update("someone-elses")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid gist ID" }));
    }

    #[tokio::test]
    async fn unconfigured_server_refuses() {
        let url = FakeGithub::default().serve().await;

        let (status, body) = call(app(&url, false), Some("good"), update("board")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Server configuration error: Admin token not configured" })
        );
    }

    #[tokio::test]
    async fn record_is_filed_under_verified_login() {
        let fake = FakeGithub::with_file(FILE_NAME, r#"{"players": {}}"#);
        let url = fake.clone().serve().await;

        let (status, body) = call(app(&url, true), Some("good"), update("board")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "message": "Leaderboard updated successfully",
                "username": "octocat",
            })
        );

        let written = Leaderboard::from_json(&fake.content(FILE_NAME).unwrap()).unwrap();
        assert!(written.player("mallory").is_none());

        let octocat = written.player("octocat").unwrap();
        assert_eq!(octocat.username, "octocat");
        assert_eq!(octocat.stats.games_won, 2);
        assert!(octocat.last_updated.is_some());
    }
}
