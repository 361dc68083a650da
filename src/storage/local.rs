use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::{keys, Storage, StorageError};
use crate::wordle::{
    daily::{format_date, parse_date},
    GameSnapshot, Settings, Stats,
};

/// One hour, in milliseconds.
pub const WORD_LIST_CACHE_LIFETIME: i64 = 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordListCache {
    pub words: Vec<String>,
    /// Milliseconds since the epoch.
    pub timestamp: i64,
}

impl WordListCache {
    pub fn new(words: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            words,
            timestamp: now.timestamp_millis(),
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let age = now.timestamp_millis() - self.timestamp;
        (0..WORD_LIST_CACHE_LIFETIME).contains(&age)
    }
}

/// Typed access to the player's saved data.
///
/// Reads never fail: anything missing or unreadable comes back as the
/// default (or `None`), with a warning for unreadable values.
#[derive(Debug, Clone)]
pub struct LocalStore<S> {
    storage: S,
}

impl<S: Storage> LocalStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        let text = self.storage.get(key)?;

        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "ignoring malformed stored value");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let text = serde_json::to_string(value)?;
        self.storage.set(key, text)
    }

    fn read_date(&self, key: &str) -> Option<NaiveDate> {
        let text = self.storage.get(key)?;

        parse_date(&text)
            .inspect_err(|err| warn!(key, %err, "ignoring malformed stored date"))
            .ok()
    }

    fn read_flag(&self, key: &str) -> bool {
        self.storage.get(key).is_some_and(|value| value == "true")
    }

    /// Stats as saved, or `None` when nothing usable is stored.
    pub fn stored_stats(&self) -> Option<Stats> {
        self.read_json(keys::STATS)
    }

    pub fn stats(&self) -> Stats {
        self.stored_stats().unwrap_or_default()
    }

    pub fn set_stats(&mut self, stats: &Stats) -> Result<(), StorageError> {
        trace!(?stats, "saving stats");
        self.write_json(keys::STATS, stats)
    }

    pub fn last_played(&self) -> Option<NaiveDate> {
        self.read_date(keys::LAST_PLAYED)
    }

    pub fn set_last_played(&mut self, date: NaiveDate) -> Result<(), StorageError> {
        self.storage.set(keys::LAST_PLAYED, format_date(date))
    }

    pub fn clear_last_played(&mut self) -> Result<(), StorageError> {
        self.storage.remove(keys::LAST_PLAYED)
    }

    /// The saved game, only if it belongs to `today`.
    pub fn snapshot(&self, today: NaiveDate) -> Option<GameSnapshot> {
        let snapshot: GameSnapshot = self.read_json(keys::GAME_STATE)?;

        if snapshot.is_from(today) {
            Some(snapshot)
        } else {
            debug!(date = ?snapshot.date, "ignoring saved game from another day");
            None
        }
    }

    pub fn set_snapshot(&mut self, snapshot: &GameSnapshot) -> Result<(), StorageError> {
        self.write_json(keys::GAME_STATE, snapshot)
    }

    pub fn clear_snapshot(&mut self) -> Result<(), StorageError> {
        self.storage.remove(keys::GAME_STATE)
    }

    /// Forgets everything about the current day's game.
    pub fn clear_day(&mut self) -> Result<(), StorageError> {
        self.clear_last_played()?;
        self.clear_snapshot()
    }

    pub fn dev_date(&self) -> Option<NaiveDate> {
        self.read_date(keys::DEV_DATE)
    }

    pub fn set_dev_date(&mut self, date: NaiveDate) -> Result<(), StorageError> {
        self.storage.set(keys::DEV_DATE, format_date(date))
    }

    pub fn clear_dev_date(&mut self) -> Result<(), StorageError> {
        self.storage.remove(keys::DEV_DATE)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            dark_mode: self.read_flag(keys::DARK_MODE),
            color_blind: self.read_flag(keys::COLOR_BLIND),
            hard_mode: self.read_flag(keys::HARD_MODE),
        }
    }

    pub fn set_settings(&mut self, settings: &Settings) -> Result<(), StorageError> {
        self.storage
            .set(keys::DARK_MODE, settings.dark_mode.to_string())?;
        self.storage
            .set(keys::COLOR_BLIND, settings.color_blind.to_string())?;
        self.storage
            .set(keys::HARD_MODE, settings.hard_mode.to_string())
    }

    pub fn token(&self) -> Option<String> {
        self.storage
            .get(keys::GITHUB_TOKEN)
            .filter(|token| !token.is_empty())
    }

    pub fn set_token(&mut self, token: &str) -> Result<(), StorageError> {
        self.storage.set(keys::GITHUB_TOKEN, token.to_owned())
    }

    pub fn clear_token(&mut self) -> Result<(), StorageError> {
        self.storage.remove(keys::GITHUB_TOKEN)
    }

    /// The cached word list, if it was saved less than an hour before `now`.
    pub fn word_list_cache(&self, now: DateTime<Utc>) -> Option<Vec<String>> {
        let cache: WordListCache = self.read_json(keys::WORD_LIST_CACHE)?;

        if cache.is_fresh(now) {
            Some(cache.words)
        } else {
            debug!("word list cache has expired");
            None
        }
    }

    pub fn set_word_list_cache(
        &mut self,
        words: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.write_json(keys::WORD_LIST_CACHE, &WordListCache::new(words, now))
    }

    pub fn clear_word_list_cache(&mut self) -> Result<(), StorageError> {
        self.storage.remove(keys::WORD_LIST_CACHE)
    }
}
