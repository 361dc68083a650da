use thiserror::Error as ThisError;
use thisslime::TracingError;

use crate::wordle::{GuessError, ParseWordError, SettingsError, WordsListError};

#[derive(Debug, ThisError, TracingError)]
#[span]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] crate::storage::StorageError),

    #[error(transparent)]
    Sync(#[from] crate::sync::SyncError),

    #[error(transparent)]
    Config(#[from] crate::framework::config::Error),

    #[error(transparent)]
    NotAdmin(#[from] NotAdminError),

    #[error("{0}")]
    #[event(level = WARN)]
    Guess(#[from] GuessError),

    #[error("{0}")]
    #[event(level = WARN)]
    Settings(#[from] SettingsError),

    #[error("{0}")]
    #[event(level = WARN)]
    Word(#[from] ParseWordError),

    #[error("{0}")]
    #[event(level = WARN)]
    WordsList(#[from] WordsListError),

    #[error("invalid date, expected YYYY-MM-DD: {0}")]
    #[event(level = WARN)]
    Date(#[from] chrono::ParseError),

    #[error("terminal or socket error: {0}")]
    #[event(level = ERROR)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, ThisError, TracingError)]
#[error("{login} isn't allowed to use developer tools")]
#[event(level = WARN)]
pub struct NotAdminError {
    #[field(print = Display)]
    pub login: String,
}
