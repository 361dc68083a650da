use std::{cmp::Ordering, collections::BTreeMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::wordle::{daily::parse_date, GameSnapshot, Stats};

pub const FILE_NAME: &str = "wordwave-leaderboard.json";
pub const DESCRIPTION: &str = "Word Wave - Global Leaderboard";
pub const VERSION: &str = "2.0";
pub const DEFAULT_LIMIT: usize = 10;

/// One player's entry in the shared document, keyed by their GitHub login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    /// The proxy overwrites this with the verified login.
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub avatar: Option<String>,

    #[serde(default)]
    pub stats: Stats,

    #[serde(default)]
    pub last_played_date: Option<String>,

    #[serde(default)]
    pub game_state: Option<GameSnapshot>,

    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl PlayerRecord {
    pub fn new(username: impl Into<String>, avatar: Option<String>, stats: Stats) -> Self {
        Self {
            username: username.into(),
            avatar,
            stats,
            last_played_date: None,
            game_state: None,
            last_updated: None,
        }
    }

    pub fn last_played(&self) -> Option<NaiveDate> {
        self.last_played_date
            .as_deref()
            .and_then(|date| parse_date(date).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    #[serde(default)]
    pub players: BTreeMap<String, PlayerRecord>,

    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,

    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    VERSION.to_owned()
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self {
            players: BTreeMap::new(),
            last_updated: None,
            version: default_version(),
        }
    }
}

impl Leaderboard {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn player(&self, username: &str) -> Option<&PlayerRecord> {
        self.players.get(username)
    }

    /// Replaces a player's record, stamping it and the document with `now`.
    pub fn upsert(&mut self, mut record: PlayerRecord, now: DateTime<Utc>) {
        record.last_updated = Some(now);
        self.last_updated = Some(now);
        self.players.insert(record.username.clone(), record);
    }

    /// Best win rate first; more games played breaks ties.
    pub fn top_players(&self, limit: usize) -> Vec<&PlayerRecord> {
        let mut players: Vec<&PlayerRecord> = self.players.values().collect();

        players.sort_by(|a, b| {
            b.stats
                .win_rate()
                .partial_cmp(&a.stats.win_rate())
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.stats.games_played.cmp(&a.stats.games_played))
        });

        players.truncate(limit);
        players
    }
}
