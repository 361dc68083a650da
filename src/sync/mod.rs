//! Keeping stats in step with the shared leaderboard on GitHub.

use chrono::NaiveDate;
use tracing::{error, info, instrument};

pub mod error;
pub use error::SyncError;

pub mod github;
pub use github::{GithubClient, GithubUser};

pub mod leaderboard;
pub use leaderboard::{Leaderboard, PlayerRecord};

pub mod oauth;

mod remote;
pub use remote::{GistStore, LeaderboardStore, ProxyStore, RemoteStore};

pub mod word_list;

use crate::{
    storage::{LocalStore, Storage},
    wordle::{daily::format_date, GameSnapshot, Session, Stats},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    NotSynced,
    Syncing,
    Synced,
    Error,
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NotSynced => "not synced",
            Self::Syncing => "syncing",
            Self::Synced => "synced",
            Self::Error => "error",
        })
    }
}

/// The outcome of comparing local data with the player's cloud record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub stats: Stats,
    pub last_played: Option<NaiveDate>,
    /// A cloud game to restore today's board from.
    pub snapshot: Option<GameSnapshot>,
    /// Whether the cloud record needs the result written back.
    pub upload: bool,
}

/// Decides what both sides should hold after a sync.
///
/// With both sides present the stats are merged field by field and the later
/// of the two last-played dates is kept; with one side present it wins
/// outright.
pub fn reconcile(
    local: Option<Stats>,
    local_last_played: Option<NaiveDate>,
    remote: Option<&PlayerRecord>,
) -> Option<Reconciled> {
    match (local, remote) {
        (Some(local), Some(remote)) => Some(Reconciled {
            stats: local.merge(&remote.stats),
            last_played: remote.last_played().max(local_last_played),
            snapshot: remote.game_state.clone(),
            upload: true,
        }),
        (None, Some(remote)) => Some(Reconciled {
            stats: remote.stats,
            last_played: remote.last_played(),
            snapshot: remote.game_state.clone(),
            upload: false,
        }),
        (Some(local), None) => Some(Reconciled {
            stats: local,
            last_played: local_last_played,
            snapshot: None,
            upload: true,
        }),
        (None, None) => None,
    }
}

/// A logged-in player's connection to the leaderboard.
#[derive(Debug)]
pub struct CloudSync<R> {
    remote: R,
    user: GithubUser,
    status: SyncStatus,
}

impl<R: RemoteStore> CloudSync<R> {
    pub fn new(remote: R, user: GithubUser) -> Self {
        Self {
            remote,
            user,
            status: SyncStatus::NotSynced,
        }
    }

    pub fn user(&self) -> &GithubUser {
        &self.user
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    fn record(&self, stats: Stats) -> PlayerRecord {
        PlayerRecord::new(&self.user.login, self.user.avatar_url.clone(), stats)
    }

    async fn save(&mut self, record: PlayerRecord) -> Result<(), SyncError> {
        self.status = SyncStatus::Syncing;

        let result = self.remote.save(record).await;
        self.finish(result)
    }

    fn finish<T>(&mut self, result: Result<T, SyncError>) -> Result<T, SyncError> {
        self.status = match result {
            Ok(_) => SyncStatus::Synced,
            Err(ref err) => {
                error!(%err, "sync failed");
                SyncStatus::Error
            }
        };

        result
    }

    /// Merges local and cloud data, writing the result to both sides.
    ///
    /// On failure local data is left untouched and the status is `Error`.
    #[instrument(skip_all, fields(user = %self.user.login))]
    pub async fn pull<S: Storage>(
        &mut self,
        store: &mut LocalStore<S>,
        today: NaiveDate,
    ) -> Result<(), SyncError> {
        self.status = SyncStatus::Syncing;

        let board = match self.remote.load().await {
            Ok(board) => board,
            Err(err) => return self.finish(Err(err)),
        };

        let Some(reconciled) = reconcile(
            store.stored_stats(),
            store.last_played(),
            board.player(&self.user.login),
        ) else {
            info!("nothing to sync yet");
            return self.finish(Ok(()));
        };

        let applied = Self::apply(store, &reconciled, today);
        self.finish(applied)?;

        if reconciled.upload {
            let mut record = self.record(reconciled.stats);
            record.last_played_date = reconciled.last_played.map(format_date);
            record.game_state = store
                .snapshot(today)
                .or_else(|| reconciled.snapshot.clone());

            self.save(record).await?;
        }

        info!(status = %self.status, "stats synced");

        Ok(())
    }

    fn apply<S: Storage>(
        store: &mut LocalStore<S>,
        reconciled: &Reconciled,
        today: NaiveDate,
    ) -> Result<(), SyncError> {
        store.set_stats(&reconciled.stats)?;

        match reconciled.last_played {
            Some(date) => store.set_last_played(date)?,
            None => store.clear_last_played()?,
        }

        // a finished local board for today is never replaced
        let local_finished = store
            .snapshot(today)
            .is_some_and(|snapshot| snapshot.game_over);

        if let Some(snapshot) = reconciled.snapshot.as_ref().filter(|s| s.is_from(today)) {
            if !local_finished {
                store.set_snapshot(snapshot)?;
            }
        }

        Ok(())
    }

    /// Records a finished game.
    #[instrument(skip_all, fields(user = %self.user.login))]
    pub async fn push_result(&mut self, session: &Session) -> Result<(), SyncError> {
        let mut record = self.record(*session.stats());
        record.last_played_date = Some(format_date(session.today()));
        record.game_state = Some(session.snapshot());

        self.save(record).await
    }

    /// Overwrites the cloud stats with zeroes.
    #[instrument(skip_all, fields(user = %self.user.login))]
    pub async fn reset(&mut self) -> Result<(), SyncError> {
        self.save(self.record(Stats::default())).await
    }
}
