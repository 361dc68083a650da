use thisslime::TracingError;

use crate::{storage::StorageError, wordle::WordsListError};

#[derive(Debug, thiserror::Error, TracingError)]
pub enum SyncError {
    #[error("request to github failed: {0}")]
    #[event(level = ERROR)]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    NotLoggedIn(#[from] NotLoggedInError),

    #[error("no gist configured for the {0}")]
    #[event(level = ERROR)]
    MissingGist(&'static str),

    #[error("login failed: {0}")]
    #[event(level = WARN)]
    OAuth(String),

    #[error("gist content is malformed: {0}")]
    #[event(level = ERROR)]
    Json(#[from] serde_json::Error),

    #[error("invalid github url: {0}")]
    #[event(level = ERROR)]
    Url(#[from] url::ParseError),

    #[error("remote word list is invalid: {0}")]
    #[event(level = WARN)]
    WordsList(#[from] WordsListError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SyncError {
    /// Only a lost race on the gist is worth another attempt.
    pub fn backoff(self) -> backoff::Error<Self> {
        match self {
            Self::Conflict(_) => backoff::Error::transient(self),
            _ => backoff::Error::permanent(self),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    pub(crate) fn missing_gist(what: &'static str) -> Self {
        Self::MissingGist(what)
    }

    pub(crate) fn not_logged_in(action: &'static str) -> Self {
        Self::NotLoggedIn(NotLoggedInError { action })
    }
}

#[derive(Debug, thiserror::Error, TracingError)]
#[error("github answered {status} for {url}")]
#[event(level = ERROR)]
pub struct StatusError {
    #[field(print = Display)]
    pub status: reqwest::StatusCode,

    #[field(print = Display)]
    pub url: reqwest::Url,
}

impl StatusError {
    pub fn from_response(response: &reqwest::Response) -> Self {
        Self {
            status: response.status(),
            url: response.url().clone(),
        }
    }
}

#[derive(Debug, thiserror::Error, TracingError)]
#[error("gist {gist_id} changed since it was read")]
#[event(level = WARN)]
pub struct ConflictError {
    #[field(print = Display)]
    pub gist_id: String,
}

#[derive(Debug, thiserror::Error, TracingError)]
#[error("you need to log in to {action}")]
#[event(level = WARN)]
pub struct NotLoggedInError {
    #[field(print = Display)]
    pub action: &'static str,
}
