use std::{collections::BTreeMap, time::Duration};

use reqwest::{
    header::{ACCEPT, ETAG, IF_MATCH},
    Method, RequestBuilder, StatusCode, Url,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use super::error::{ConflictError, StatusError, SyncError};

pub const API_URL: &str = "https://api.github.com";
const MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("wordwave/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GithubUser {
    pub login: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gist {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub files: BTreeMap<String, GistFile>,

    /// Taken from the response headers, not the body.
    #[serde(skip)]
    pub etag: Option<String>,
}

impl Gist {
    pub fn content(&self, file_name: &str) -> Option<&str> {
        self.files.get(file_name)?.content.as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GistFile {
    pub content: Option<String>,
}

/// Body for creating a gist or replacing its files.
#[derive(Debug, Clone, Serialize)]
pub struct GistWrite {
    pub description: String,
    pub public: bool,
    pub files: BTreeMap<String, GistWriteFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GistWriteFile {
    pub content: String,
}

impl GistWrite {
    pub fn single_file(
        description: impl Into<String>,
        file_name: impl Into<String>,
        content: String,
    ) -> Self {
        Self {
            description: description.into(),
            public: true,
            files: BTreeMap::from([(file_name.into(), GistWriteFile { content })]),
        }
    }
}

/// A thin client for the handful of GitHub REST endpoints the game uses.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: Url,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(mut api_url: Url, timeout: Duration) -> Result<Self, SyncError> {
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            api_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, SyncError> {
        let url = self.api_url.join(path)?;
        trace!(%method, %url, "github request");

        let builder = self
            .http
            .request(method, url)
            .header(ACCEPT, MEDIA_TYPE);

        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    fn require_token(&self, action: &'static str) -> Result<(), SyncError> {
        match self.token {
            Some(_) => Ok(()),
            None => Err(SyncError::not_logged_in(action)),
        }
    }

    /// The account the token belongs to.
    #[instrument(skip_all)]
    pub async fn user(&self) -> Result<GithubUser, SyncError> {
        self.require_token("look up your account")?;

        let response = self.request(Method::GET, "user")?.send().await?;
        if !response.status().is_success() {
            return Err(StatusError::from_response(&response).into());
        }

        let user: GithubUser = response.json().await?;
        debug!(login = %user.login, "fetched github user");

        Ok(user)
    }

    /// `Ok(None)` when the gist doesn't exist.
    #[instrument(skip(self))]
    pub async fn gist(&self, id: &str) -> Result<Option<Gist>, SyncError> {
        let response = self
            .request(Method::GET, &format!("gists/{id}"))?
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("gist not found");
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(StatusError::from_response(&response).into());
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let mut gist: Gist = response.json().await?;
        gist.etag = etag;

        trace!(files = gist.files.len(), etag = ?gist.etag, "fetched gist");

        Ok(Some(gist))
    }

    /// Replaces the given files of a gist. With an `etag`, the write only
    /// succeeds if nobody changed the gist since it was read.
    #[instrument(skip(self, body))]
    pub async fn update_gist(
        &self,
        id: &str,
        body: &GistWrite,
        etag: Option<&str>,
    ) -> Result<(), SyncError> {
        self.require_token("save to github")?;

        let mut request = self
            .request(Method::PATCH, &format!("gists/{id}"))?
            .json(body);

        if let Some(etag) = etag {
            request = request.header(IF_MATCH, etag);
        }

        let response = request.send().await?;

        match response.status() {
            StatusCode::PRECONDITION_FAILED => Err(ConflictError {
                gist_id: id.to_owned(),
            }
            .into()),
            status if status.is_success() => {
                debug!("gist updated");
                Ok(())
            }
            _ => Err(StatusError::from_response(&response).into()),
        }
    }
}
