use std::time::Duration;

use backoff::ExponentialBackoff;
use chrono::Utc;
use reqwest::Url;
use tracing::{debug, instrument, warn};

use super::{
    error::StatusError,
    github::{GistWrite, GithubClient},
    leaderboard::{self, Leaderboard, PlayerRecord},
    SyncError,
};
use crate::proxy::LeaderboardUpdate;

/// Where the shared leaderboard document lives.
pub trait RemoteStore {
    async fn load(&self) -> Result<Leaderboard, SyncError>;

    /// Replaces one player's record in the shared document.
    async fn save(&self, record: PlayerRecord) -> Result<(), SyncError>;
}

/// The leaderboard kept as a JSON file in a GitHub gist.
#[derive(Debug, Clone)]
pub struct GistStore {
    client: GithubClient,
    gist_id: Option<String>,
    max_elapsed: Duration,
}

impl GistStore {
    pub fn new(client: GithubClient, gist_id: Option<String>) -> Self {
        Self {
            client,
            gist_id,
            max_elapsed: Duration::from_secs(30),
        }
    }

    pub fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed = max_elapsed;
        self
    }

    pub fn gist_id(&self) -> Option<&str> {
        self.gist_id.as_deref()
    }

    /// The document and the ETag it was read at.
    async fn read(&self, gist_id: &str) -> Result<(Leaderboard, Option<String>), SyncError> {
        let Some(gist) = self.client.gist(gist_id).await? else {
            return Ok((Leaderboard::default(), None));
        };

        let board = match gist.content(leaderboard::FILE_NAME) {
            Some(content) => Leaderboard::from_json(content)?,
            None => {
                debug!("gist has no leaderboard file yet");
                Leaderboard::default()
            }
        };

        Ok((board, gist.etag))
    }

    /// Read, change, then write with `If-Match`; a concurrent writer makes the
    /// write fail with 412, in which case the whole cycle runs again.
    #[instrument(skip_all)]
    pub async fn update<F>(&self, change: F) -> Result<Leaderboard, SyncError>
    where
        F: Fn(&mut Leaderboard),
    {
        let gist_id = self
            .gist_id
            .as_deref()
            .ok_or_else(|| SyncError::missing_gist("leaderboard"))?;
        let change = &change;

        backoff::future::retry_notify(
            self.backoff(),
            move || async move {
                let (mut board, etag) = self.read(gist_id).await.map_err(SyncError::backoff)?;
                change(&mut board);

                let content = board.to_json_pretty().map_err(SyncError::from)?;
                let body = GistWrite::single_file(
                    leaderboard::DESCRIPTION,
                    leaderboard::FILE_NAME,
                    content,
                );

                self.client
                    .update_gist(gist_id, &body, etag.as_deref())
                    .await
                    .map_err(SyncError::backoff)?;

                Ok(board)
            },
            |err, _| warn!("{err}, retrying..."),
        )
        .await
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: Duration::from_millis(200),
            max_elapsed_time: Some(self.max_elapsed),
            ..Default::default()
        }
    }
}

impl RemoteStore for GistStore {
    #[instrument(skip_all)]
    async fn load(&self) -> Result<Leaderboard, SyncError> {
        let Some(gist_id) = self.gist_id.as_deref() else {
            warn!("no leaderboard gist configured");
            return Ok(Leaderboard::default());
        };

        let (board, _) = self.read(gist_id).await?;
        Ok(board)
    }

    async fn save(&self, record: PlayerRecord) -> Result<(), SyncError> {
        self.update(|board| board.upsert(record.clone(), Utc::now()))
            .await
            .map(|_| ())
    }
}

/// Reads the gist directly but hands writes to the proxy, which holds the
/// only token allowed to change it.
#[derive(Debug, Clone)]
pub struct ProxyStore {
    gist: GistStore,
    url: Url,
}

impl ProxyStore {
    pub fn new(gist: GistStore, url: Url) -> Self {
        Self { gist, url }
    }
}

impl RemoteStore for ProxyStore {
    async fn load(&self) -> Result<Leaderboard, SyncError> {
        self.gist.load().await
    }

    #[instrument(skip_all, fields(url = %self.url))]
    async fn save(&self, record: PlayerRecord) -> Result<(), SyncError> {
        let client = &self.gist.client;
        let token = client
            .token()
            .ok_or_else(|| SyncError::not_logged_in("save to the leaderboard"))?;
        let gist_id = self
            .gist
            .gist_id()
            .ok_or_else(|| SyncError::missing_gist("leaderboard"))?;

        let body = LeaderboardUpdate {
            player_data: Some(record),
            gist_id: Some(gist_id.to_owned()),
        };

        let response = client
            .http()
            .post(self.url.clone())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StatusError::from_response(&response).into());
        }

        debug!("leaderboard saved through proxy");

        Ok(())
    }
}

/// Whichever way this install writes the leaderboard.
#[derive(Debug, Clone)]
pub enum LeaderboardStore {
    Gist(GistStore),
    Proxy(ProxyStore),
}

impl RemoteStore for LeaderboardStore {
    async fn load(&self) -> Result<Leaderboard, SyncError> {
        match self {
            Self::Gist(store) => store.load().await,
            Self::Proxy(store) => store.load().await,
        }
    }

    async fn save(&self, record: PlayerRecord) -> Result<(), SyncError> {
        match self {
            Self::Gist(store) => store.save(record).await,
            Self::Proxy(store) => store.save(record).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GistStore, LeaderboardStore, ProxyStore, RemoteStore};
    use crate::{
        proxy::{router, ProxyState},
        sync::{
            github::tests::{client, FakeGithub},
            leaderboard::{Leaderboard, PlayerRecord, FILE_NAME},
        },
        wordle::Stats,
    };
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[tokio::test]
    async fn unconfigured_gist_reads_empty() {
        let store = GistStore::new(client("http://127.0.0.1:9"), None);
        assert_eq!(store.load().await.unwrap(), Leaderboard::default());
        assert!(store.update(|_| ()).await.is_err());
    }

    #[tokio::test]
    async fn missing_gist_and_missing_file_read_empty() {
        let url = FakeGithub::default().serve().await;

        let missing = GistStore::new(client(&url), Some("nope".to_owned()));
        assert_eq!(missing.load().await.unwrap(), Leaderboard::default());

        let no_file = GistStore::new(client(&url), Some("board".to_owned()));
        assert_eq!(no_file.load().await.unwrap(), Leaderboard::default());
    }

    #[tokio::test]
    async fn update_retries_after_conflict() {
        let fake = FakeGithub::with_file(FILE_NAME, r#"{"players": {}}"#);
        *fake.conflicts.lock().unwrap() = 2;
        let url = fake.clone().serve().await;

        let store = GistStore::new(client(&url).with_token("good"), Some("board".to_owned()))
            .with_max_elapsed(Duration::from_secs(10));

        let record = PlayerRecord::new("octocat", None, Stats::default());
        store
            .update(|board| board.upsert(record.clone(), Utc::now()))
            .await
            .unwrap();

        assert_eq!(*fake.conflicts.lock().unwrap(), 0);

        let written = Leaderboard::from_json(&fake.content(FILE_NAME).unwrap()).unwrap();
        assert!(written.player("octocat").is_some());
        assert_eq!(store.load().await.unwrap(), written);
    }

    #[tokio::test]
    async fn update_without_token_fails_fast() {
        let fake = FakeGithub::with_file(FILE_NAME, "{}");
        let url = fake.clone().serve().await;
        let store = GistStore::new(client(&url), Some("board".to_owned()));

        let result = store.update(|_| ()).await;
        assert!(matches!(result, Err(crate::sync::SyncError::NotLoggedIn(_))));
    }

    async fn serve_proxy(github_url: &str) -> String {
        let state = ProxyState::new(
            client(github_url),
            "http://127.0.0.1:9/token".parse().unwrap(),
            "shh",
        )
        .with_leaderboard("board", "server-token");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router(state)).await.unwrap() });

        format!("http://{address}/api/update-leaderboard")
    }

    #[tokio::test]
    async fn proxy_store_writes_through_the_proxy() {
        let fake = FakeGithub::with_file(FILE_NAME, r#"{"players": {}}"#);
        let github_url = fake.clone().serve().await;
        let proxy_url = serve_proxy(&github_url).await;

        let gist = GistStore::new(client(&github_url).with_token("good"), Some("board".to_owned()));
        let store = LeaderboardStore::Proxy(ProxyStore::new(gist, proxy_url.parse().unwrap()));

        let stats = Stats {
            games_played: 4,
            games_won: 3,
            ..Default::default()
        };
        store
            .save(PlayerRecord::new("octocat", None, stats))
            .await
            .unwrap();

        let board = store.load().await.unwrap();
        assert_eq!(board.player("octocat").unwrap().stats, stats);
    }

    #[tokio::test]
    async fn proxy_store_surfaces_rejection() {
        let fake = FakeGithub::with_file(FILE_NAME, r#"{"players": {}}"#);
        let github_url = fake.clone().serve().await;
        let proxy_url = serve_proxy(&github_url).await;

        let gist = GistStore::new(client(&github_url).with_token("bad"), Some("board".to_owned()));
        let store = ProxyStore::new(gist, proxy_url.parse().unwrap());

        let result = store
            .save(PlayerRecord::new("octocat", None, Stats::default()))
            .await;

        assert!(matches!(result, Err(crate::sync::SyncError::Status(_))));
        assert_eq!(fake.content(FILE_NAME).as_deref(), Some(r#"{"players": {}}"#));
    }
}
