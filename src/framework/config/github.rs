use std::time::Duration;

use serde::Deserialize;
use tracing::warn;
use url::Url;

use super::Error;

#[derive(Deserialize, Debug, Clone)]
pub struct GithubConfig {
    #[serde(default, deserialize_with = "non_empty")]
    client_id: Option<String>,

    #[serde(default)]
    redirect_uri: Option<Url>,

    #[serde(default)]
    proxy_url: Option<Url>,

    /// With this set, leaderboard writes go through the proxy.
    #[serde(default)]
    leaderboard_url: Option<Url>,

    #[serde(default = "default_api_url")]
    pub api_url: Url,

    #[serde(default, deserialize_with = "non_empty")]
    leaderboard_gist_id: Option<String>,

    #[serde(default, deserialize_with = "non_empty")]
    word_list_gist_id: Option<String>,

    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

fn default_api_url() -> Url {
    #[allow(clippy::unwrap_used)]
    Url::parse(crate::sync::github::API_URL).unwrap()
}

const fn default_timeout_secs() -> u64 {
    10
}

/// Treats an empty string (as left by `WORDWAVE__GITHUB__..=`) as unset.
fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty()))
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            redirect_uri: None,
            proxy_url: None,
            leaderboard_url: None,
            api_url: default_api_url(),
            leaderboard_gist_id: None,
            word_list_gist_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GithubConfig {
    pub fn client_id(&self) -> Result<&str, Error> {
        self.client_id
            .as_deref()
            .ok_or(Error::Missing("github.client_id"))
    }

    pub fn redirect_uri(&self) -> Result<&Url, Error> {
        self.redirect_uri
            .as_ref()
            .ok_or(Error::Missing("github.redirect_uri"))
    }

    pub fn proxy_url(&self) -> Result<&Url, Error> {
        self.proxy_url
            .as_ref()
            .ok_or(Error::Missing("github.proxy_url"))
    }

    pub fn leaderboard_url(&self) -> Option<&Url> {
        self.leaderboard_url.as_ref()
    }

    pub fn leaderboard_gist_id(&self) -> Option<&str> {
        if self.leaderboard_gist_id.is_none() {
            warn!("no github.leaderboard_gist_id in config, leaderboard is disabled");
        }

        self.leaderboard_gist_id.as_deref()
    }

    pub fn word_list_gist_id(&self) -> Option<&str> {
        self.word_list_gist_id.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
