use reqwest::{header::ACCEPT, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::SyncError;

pub const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
pub const SCOPE: &str = "gist";

/// Body of a token exchange, sent by the client to the proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub redirect_uri: String,
}

impl TokenRequest {
    /// The first field left empty, if any.
    pub fn missing(&self) -> Option<&'static str> {
        [
            ("code", &self.code),
            ("client_id", &self.client_id),
            ("redirect_uri", &self.redirect_uri),
        ]
        .into_iter()
        .find_map(|(name, value)| value.is_empty().then_some(name))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Where to send the player to grant the game access to their gists.
pub fn authorize_url(client_id: &str, redirect_uri: &Url) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        AUTHORIZE_URL,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri.as_str()),
            ("scope", SCOPE),
        ],
    )
}

/// Trades an authorization code for an access token through the proxy.
#[instrument(skip(http, code))]
pub async fn exchange_code(
    http: &reqwest::Client,
    proxy_url: &Url,
    client_id: &str,
    redirect_uri: &Url,
    code: &str,
) -> Result<String, SyncError> {
    let request = TokenRequest {
        code: code.trim().to_owned(),
        client_id: client_id.to_owned(),
        redirect_uri: redirect_uri.to_string(),
    };

    let response: TokenResponse = http
        .post(proxy_url.clone())
        .header(ACCEPT, "application/json")
        .json(&request)
        .send()
        .await?
        .json()
        .await?;

    match response {
        TokenResponse {
            access_token: Some(token),
            ..
        } if !token.is_empty() => {
            debug!("received access token");
            Ok(token)
        }
        TokenResponse {
            error_description, error, ..
        } => Err(SyncError::OAuth(
            error_description
                .or(error)
                .unwrap_or_else(|| "no access token in response".to_owned()),
        )),
    }
}
