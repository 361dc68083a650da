use std::{ops::Not, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::{
    core::{AsEmoji, Guess, Keyboard, ParseWordError, Word},
    daily::{format_date, parse_date},
    MAX_ATTEMPTS, WORD_LENGTH,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuessError {
    #[error("Not enough letters")]
    NotEnoughLetters,

    #[error("The game is already over")]
    GameOver,

    #[error("You already played today! Come back tomorrow.")]
    AlreadyPlayed,
}

/// What happened to a submitted guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Continue(Guess),
    Won(Guess),
    Lost(Guess),
}

impl Submission {
    pub fn guess(&self) -> &Guess {
        match self {
            Self::Continue(guess) | Self::Won(guess) | Self::Lost(guess) => guess,
        }
    }
}

/// One day's game.
///
/// While the game is running `guesses.len() == current_row`; once it ends,
/// `current_row` stays on the row of the final guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    current_row: usize,
    current_guess: String,
    target: Word,
    game_over: bool,
    is_win: bool,
    guesses: Vec<Guess>,
    keyboard: Keyboard,
}

impl GameState {
    pub fn new(target: Word) -> Self {
        Self {
            current_row: 0,
            current_guess: String::with_capacity(WORD_LENGTH),
            target,
            game_over: false,
            is_win: false,
            guesses: Vec::with_capacity(MAX_ATTEMPTS),
            keyboard: Keyboard::new(),
        }
    }

    /// A finished game with no board, for when the day is known to be played
    /// but nothing about the game itself survived.
    pub fn finished_without_record(target: Word) -> Self {
        let mut game = Self::new(target);
        game.game_over = true;
        game
    }

    /// Appends a letter to the pending guess. Non-letters, a full row and a
    /// finished game are ignored.
    pub fn type_letter(&mut self, letter: char) -> bool {
        if self.game_over
            || letter.is_ascii_alphabetic().not()
            || self.current_guess.len() >= WORD_LENGTH
        {
            return false;
        }

        self.current_guess.push(letter.to_ascii_uppercase());
        true
    }

    pub fn delete_letter(&mut self) -> bool {
        if self.game_over {
            return false;
        }

        self.current_guess.pop().is_some()
    }

    pub fn submit(&mut self) -> Result<Submission, GuessError> {
        if self.game_over {
            return Err(GuessError::GameOver);
        }

        if self.current_guess.len() != WORD_LENGTH {
            return Err(GuessError::NotEnoughLetters);
        }

        let word = Word::from_str(&self.current_guess).map_err(|_| GuessError::NotEnoughLetters)?;
        let guess = self.target.guess(&word);
        debug!(row = self.current_row, %guess, "guess submitted");

        self.keyboard.record(&guess);
        self.guesses.push(guess.clone());
        self.current_guess.clear();

        if guess.is_correct() {
            self.game_over = true;
            self.is_win = true;
            Ok(Submission::Won(guess))
        } else if self.current_row == MAX_ATTEMPTS - 1 {
            self.game_over = true;
            self.is_win = false;
            Ok(Submission::Lost(guess))
        } else {
            self.current_row += 1;
            Ok(Submission::Continue(guess))
        }
    }

    /// Number of guesses it took to win.
    pub fn attempts(&self) -> Option<usize> {
        self.is_win.then_some(self.current_row + 1)
    }

    pub fn current_row(&self) -> usize {
        self.current_row
    }

    pub fn current_guess(&self) -> &str {
        &self.current_guess
    }

    pub fn target(&self) -> &Word {
        &self.target
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn is_win(&self) -> bool {
        self.is_win
    }

    pub fn guesses(&self) -> &[Guess] {
        &self.guesses
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn has_started(&self) -> bool {
        self.guesses.is_empty().not()
    }

    /// `Word Wave 3/6` (or `X/6`), a blank line, then one emoji row per guess.
    pub fn share_text(&self) -> String {
        let attempts = self
            .attempts()
            .map_or_else(|| "X".to_owned(), |n| n.to_string());

        format!(
            "Word Wave {attempts}/{MAX_ATTEMPTS}\n\n{}",
            self.guesses.as_slice().as_emoji()
        )
    }

    pub fn snapshot(&self, date: NaiveDate) -> GameSnapshot {
        GameSnapshot {
            current_row: self.current_row,
            guesses: self.guesses.iter().map(Guess::word).collect(),
            game_over: self.game_over,
            is_win: self.is_win,
            target_word: Some(self.target.to_string()),
            date: Some(format_date(date)),
        }
    }

    /// Rebuilds a game by replaying the stored guesses against `target`.
    ///
    /// Only completed guesses are stored, so a restored game always starts
    /// with an empty pending guess.
    pub fn restore(snapshot: &GameSnapshot, target: Word) -> Result<Self, ParseWordError> {
        let mut game = Self::new(target);

        for word in snapshot.guesses.iter().take(MAX_ATTEMPTS) {
            let word = Word::from_str(word)?;
            let guess = game.target.guess(&word);

            game.keyboard.record(&guess);
            game.guesses.push(guess);
        }

        let solved = game.guesses.last().is_some_and(Guess::is_correct);
        let exhausted = game.guesses.len() >= MAX_ATTEMPTS;

        game.game_over = snapshot.game_over || solved || exhausted;
        game.is_win = solved;
        game.current_row = if game.game_over {
            game.guesses.len().saturating_sub(1)
        } else {
            game.guesses.len()
        };

        if game.current_row != snapshot.current_row {
            warn!(
                stored = snapshot.current_row,
                derived = game.current_row,
                "stored row disagrees with stored guesses"
            );
        }

        trace!(guesses = game.guesses.len(), over = game.game_over, "restored game");

        Ok(game)
    }
}

/// The persisted form of a game: completed guesses only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSnapshot {
    pub current_row: usize,
    pub guesses: Vec<String>,
    pub game_over: bool,
    pub is_win: bool,
    pub target_word: Option<String>,
    pub date: Option<String>,
}

impl GameSnapshot {
    pub fn date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(|date| parse_date(date).ok())
    }

    pub fn is_from(&self, date: NaiveDate) -> bool {
        self.date() == Some(date)
    }

    pub fn target(&self) -> Option<Word> {
        self.target_word
            .as_deref()
            .and_then(|word| Word::from_str(word).ok())
    }
}
