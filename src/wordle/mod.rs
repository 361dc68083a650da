pub mod core;
pub use core::{AsEmoji, Guess, Keyboard, LetterState, ParseWordError, Word};

pub mod daily;
pub use daily::{Calendar, Countdown};

pub mod game;
pub use game::{GameSnapshot, GameState, GuessError, Submission};

pub mod session;
pub use session::Session;

pub mod settings;
pub use settings::{Settings, SettingsError};

pub mod stats;
pub use stats::Stats;

pub mod words_list;
pub use words_list::{WordsList, WordsListError};

pub const WORD_LENGTH: usize = 5;
pub const MAX_ATTEMPTS: usize = 6;
