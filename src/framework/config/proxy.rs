use std::net::{Ipv4Addr, SocketAddr};

use serde::Deserialize;
use tracing::{trace, warn};
use url::Url;

use super::Error;

pub const SECRET_VAR: &str = "GITHUB_CLIENT_SECRET";
pub const LEADERBOARD_TOKEN_VAR: &str = "LEADERBOARD_GITHUB_TOKEN";

#[derive(Deserialize, Debug, Clone)]
pub struct ProxyConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    #[serde(default = "default_token_url")]
    pub token_url: Url,

    #[serde(default)]
    leaderboard_gist_id: Option<String>,
}

fn default_bind() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 3000))
}

fn default_token_url() -> Url {
    #[allow(clippy::unwrap_used)]
    Url::parse(crate::proxy::TOKEN_URL).unwrap()
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            token_url: default_token_url(),
            leaderboard_gist_id: None,
        }
    }
}

fn env_secret(var: &'static str) -> Option<String> {
    let secret = std::env::var(var).ok().filter(|secret| !secret.is_empty())?;
    trace!(var, "using secret from environment");

    Some(secret)
}

impl ProxyConfig {
    /// Only ever read from the environment, never from the config file.
    pub fn client_secret(&self) -> Result<String, Error> {
        env_secret(SECRET_VAR).ok_or(Error::Missing(SECRET_VAR))
    }

    /// The gist the proxy writes on players' behalf, and the token it writes
    /// with. Without both the leaderboard route refuses every request.
    pub fn leaderboard(&self) -> Option<(&str, String)> {
        let gist_id = self
            .leaderboard_gist_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());

        match (gist_id, env_secret(LEADERBOARD_TOKEN_VAR)) {
            (Some(gist_id), Some(token)) => Some((gist_id, token)),
            (Some(_), None) => {
                warn!(var = LEADERBOARD_TOKEN_VAR, "leaderboard token not set, leaderboard route disabled");
                None
            }
            (None, _) => None,
        }
    }
}
