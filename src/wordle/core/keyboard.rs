use std::collections::BTreeMap;

use super::{Guess, LetterState};

pub const ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

/// Best verdict seen for each letter over the course of a game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    keys: BTreeMap<char, LetterState>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a verdict for `letter`, keeping whichever of the old and new is better.
    pub fn update(&mut self, letter: char, state: LetterState) {
        let letter = letter.to_ascii_uppercase();

        self.keys
            .entry(letter)
            .and_modify(|current| *current = (*current).max(state))
            .or_insert(state);
    }

    pub fn record(&mut self, guess: &Guess) {
        for (letter, state) in guess.iter() {
            self.update(*letter, *state);
        }
    }

    pub fn state(&self, letter: char) -> Option<LetterState> {
        self.keys.get(&letter.to_ascii_uppercase()).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<(char, Option<LetterState>)>> + '_ {
        ROWS.iter()
            .map(|row| row.chars().map(|key| (key, self.state(key))).collect())
    }
}

impl<'a> FromIterator<&'a Guess> for Keyboard {
    fn from_iter<T: IntoIterator<Item = &'a Guess>>(iter: T) -> Self {
        let mut keyboard = Self::new();
        for guess in iter {
            keyboard.record(guess);
        }

        keyboard
    }
}
