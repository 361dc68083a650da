use chrono::{NaiveDate, Utc};
use thisslime::TracingError;
use tracing::{info, instrument, warn};

use crate::{
    errors::NotAdminError,
    framework::Config,
    storage::{FileStorage, LocalStore},
    sync::{word_list, CloudSync, GistStore, GithubClient, GithubUser, LeaderboardStore, ProxyStore},
    wordle::{Calendar, Session, WordsList},
    Result,
};

/// Everything a command needs: config, local storage, the GitHub client
/// and which day it is.
#[derive(Debug)]
pub struct Context {
    config: Config,
    store: LocalStore<FileStorage>,
    github: GithubClient,
    calendar: Calendar,
}

impl Context {
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Result<Self> {
        let store = LocalStore::new(FileStorage::open(config.data_dir())?);

        let mut github = Self::anonymous_client(&config)?;
        if let Some(token) = store.token() {
            github = github.with_token(token);
        }

        let calendar = Calendar::with_override(store.dev_date());
        if calendar.is_overridden() {
            info!(date = %calendar.today(), "using developer date override");
        }

        Ok(Self {
            config,
            store,
            github,
            calendar,
        })
    }

    fn anonymous_client(config: &Config) -> Result<GithubClient> {
        Ok(GithubClient::new(
            config.github.api_url.clone(),
            config.github.timeout(),
        )?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &LocalStore<FileStorage> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LocalStore<FileStorage> {
        &mut self.store
    }

    pub fn github(&self) -> &GithubClient {
        &self.github
    }

    pub fn today(&self) -> NaiveDate {
        self.calendar.today()
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Sets or clears the date override. Either way today's progress is
    /// forgotten, so the new day starts fresh.
    pub fn set_dev_date(&mut self, date: Option<NaiveDate>) -> Result<()> {
        match date {
            Some(date) => self.store.set_dev_date(date)?,
            None => self.store.clear_dev_date()?,
        }
        self.store.clear_day()?;

        self.calendar = Calendar::with_override(date);
        Ok(())
    }

    pub async fn words(&mut self) -> WordsList {
        word_list::load(
            &mut self.store,
            &self.github,
            self.config.github.word_list_gist_id(),
            Utc::now(),
        )
        .await
    }

    pub async fn session(&mut self) -> Session {
        let words = self.words().await;
        Session::load(&self.store, &words, self.today())
    }

    pub fn set_token(&mut self, token: &str) -> Result<()> {
        self.store.set_token(token)?;
        self.github = self.github.clone().with_token(token);
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        self.store.clear_token()?;
        self.github = Self::anonymous_client(&self.config)?;
        Ok(())
    }

    /// The player's cloud connection, if they are logged in.
    ///
    /// A stored token that GitHub no longer accepts is removed.
    pub async fn cloud(&mut self) -> Result<Option<CloudSync<LeaderboardStore>>> {
        if self.github.token().is_none() {
            return Ok(None);
        }

        match self.github.user().await {
            Ok(user) => Ok(Some(CloudSync::new(self.leaderboard(), user))),
            Err(err) => {
                err.trace();
                warn!("stored token was rejected, logging out");
                self.logout()?;
                Ok(None)
            }
        }
    }

    /// Writes go through the proxy when `github.leaderboard_url` is set,
    /// otherwise straight to the gist with the player's own token.
    pub fn leaderboard(&self) -> LeaderboardStore {
        let gist = GistStore::new(
            self.github.clone(),
            self.config
                .github
                .leaderboard_gist_id()
                .map(str::to_owned),
        );

        match self.config.github.leaderboard_url() {
            Some(url) => LeaderboardStore::Proxy(ProxyStore::new(gist, url.clone())),
            None => LeaderboardStore::Gist(gist),
        }
    }

    /// The logged-in user, if they are listed in `dev.admins`.
    pub async fn require_admin(&self) -> Result<GithubUser> {
        let user = self.github.user().await?;

        if !self.config.dev.is_admin(&user.login) {
            return Err(NotAdminError { login: user.login }.into());
        }

        Ok(user)
    }
}
