//! Key-value persistence for everything the player keeps between runs.

mod file;
pub use file::FileStorage;

mod memory;
pub use memory::MemoryStorage;

mod local;
pub use local::{LocalStore, WordListCache, WORD_LIST_CACHE_LIFETIME};

use thisslime::TracingError;

pub mod keys {
    pub const STATS: &str = "wordWaveStats";
    pub const LAST_PLAYED: &str = "wordWaveLastPlayed";
    pub const GAME_STATE: &str = "wordWaveGameState";
    pub const DEV_DATE: &str = "wordWaveDevDate";
    pub const WORD_LIST_CACHE: &str = "wordWaveWordListCache";
    pub const GITHUB_TOKEN: &str = "github_token";
    pub const DARK_MODE: &str = "darkMode";
    pub const COLOR_BLIND: &str = "colorBlind";
    pub const HARD_MODE: &str = "hardMode";
}

#[derive(Debug, thiserror::Error, TracingError)]
pub enum StorageError {
    #[error("couldn't access storage file: {0}")]
    #[event(level = ERROR)]
    Io(#[from] std::io::Error),

    #[error("couldn't serialize value: {0}")]
    #[event(level = ERROR)]
    Serialize(#[from] serde_json::Error),
}

/// String values under string keys, like a browser's local storage.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
