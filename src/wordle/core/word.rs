use std::{collections::HashMap, ops::Index, slice::Iter, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use super::guess::{Guess, LetterState};
use crate::wordle::WORD_LENGTH;

/// A five-letter, upper-case word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word {
    letters: Vec<char>,
}

impl Word {
    pub fn iter(&self) -> Iter<'_, char> {
        self.letters.iter()
    }

    fn letter_counts(&self) -> HashMap<char, usize> {
        let mut letter_counts: HashMap<char, usize> = HashMap::new();
        for letter in self.iter() {
            *letter_counts.entry(*letter).or_default() += 1;
        }

        letter_counts
    }

    /// Scores `word` against `self` as the answer.
    ///
    /// Exact matches are settled first so that a repeated letter in the guess
    /// can only be marked present as many times as the answer has it left over.
    pub fn guess(&self, word: &Word) -> Guess {
        let mut guess: Guess = Guess::new(word);
        debug!(answer = %self, guess = %word.to_string());

        let mut letter_counts = self.letter_counts();

        for (index, (letter, state)) in guess.iter_mut().enumerate() {
            if self[index] == *letter {
                *state = LetterState::Correct;

                if let Some(count) = letter_counts.get_mut(letter) {
                    *count = count.saturating_sub(1);
                }
            }
        }

        for (letter, state) in guess.iter_mut() {
            if *state == LetterState::Correct {
                continue;
            }

            if let Some(count) = letter_counts.get_mut(letter).filter(|count| **count > 0) {
                trace!("{}: present", letter);

                *state = LetterState::Present;
                *count -= 1;
            }
        }

        guess
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseWordError {
    #[error("word `{0}` must have 5 letters but has {}", .0.chars().count())]
    Length(String),

    #[error("word `{0}` must only contain letters a-z")]
    NotAlphabetic(String),
}

impl FromStr for Word {
    type Err = ParseWordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.chars().count() != WORD_LENGTH {
            return Err(ParseWordError::Length(s.to_owned()));
        }

        if !s.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(ParseWordError::NotAlphabetic(s.to_owned()));
        }

        let letters = s.to_ascii_uppercase().chars().collect::<Vec<char>>();

        Ok(Self { letters })
    }
}

impl TryFrom<String> for Word {
    type Error = ParseWordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<Word> for String {
    fn from(value: Word) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letters.iter().collect::<String>())
    }
}

impl IntoIterator for Word {
    type Item = char;
    type IntoIter = std::vec::IntoIter<char>;

    fn into_iter(self) -> Self::IntoIter {
        self.letters.into_iter()
    }
}

impl Index<usize> for Word {
    type Output = char;

    fn index(&self, index: usize) -> &Self::Output {
        self.letters.index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::{ParseWordError, Word};
    use crate::wordle::core::LetterState;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn parse_normalizes_case() {
        let word = Word::from_str("press").unwrap();
        assert_eq!(word.to_string(), "PRESS");
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert_eq!(
            Word::from_str("wave"),
            Err(ParseWordError::Length("wave".to_owned()))
        );
        assert_eq!(
            Word::from_str("wavess"),
            Err(ParseWordError::Length("wavess".to_owned()))
        );
    }

    #[test]
    fn parse_rejects_non_letters() {
        assert_eq!(
            Word::from_str("w4ves"),
            Err(ParseWordError::NotAlphabetic("w4ves".to_owned()))
        );
    }

    #[test]
    fn deserializes_from_string() {
        let word: Word = serde_json::from_str("\"orbit\"").unwrap();
        assert_eq!(word.to_string(), "ORBIT");

        assert!(serde_json::from_str::<Word>("\"orb\"").is_err());
    }

    #[test]
    fn press_speed() {
        let answer = Word::from_str("PRESS").unwrap();
        let guess = answer.guess(&Word::from_str("SPEED").unwrap());

        assert_eq!(
            guess.states().collect::<Vec<_>>(),
            vec![
                LetterState::Present,
                LetterState::Present,
                LetterState::Correct,
                LetterState::Absent,
                LetterState::Absent,
            ]
        );
    }

    fn all_pairs() -> Vec<(Word, Word)> {
        let words = crate::wordle::WordsList::builtin();
        let extra = ["SPEED", "EERIE", "SASSY", "LLAMA", "PEEPS", "TTTTT"]
            .into_iter()
            .map(|s| Word::from_str(s).unwrap());
        let pool: Vec<Word> = words.iter().cloned().chain(extra).collect();

        pool.iter()
            .flat_map(|a| pool.iter().map(move |b| (a.clone(), b.clone())))
            .collect()
    }

    #[test]
    fn correct_count_matches_positions() {
        for (answer, word) in all_pairs() {
            let guess = answer.guess(&word);
            let matching = (0..5).filter(|i| answer[*i] == word[*i]).count();

            assert_eq!(guess.len(), 5);
            assert_eq!(guess.count(LetterState::Correct), matching, "{answer} {word}");
        }
    }

    #[test]
    fn never_credits_more_letters_than_answer_has() {
        for (answer, word) in all_pairs() {
            let guess = answer.guess(&word);

            for letter in 'A'..='Z' {
                let credited = guess
                    .iter()
                    .filter(|(l, state)| *l == letter && *state != LetterState::Absent)
                    .count();
                let available = answer.iter().filter(|l| **l == letter).count();

                assert!(credited <= available, "{answer} {word} {letter}");
            }
        }
    }

    mod string_match {
        use paste::paste;

        macro_rules! string_match {
            ($($word:ident, $guess:ident => $result:expr;)+) => {
                use std::str::FromStr;

                paste! {
                    $(
                        #[test]
                        fn [<$word _ $guess>]() {
                            let word = super::super::Word::from_str(&stringify!($word)).unwrap();
                            let guess = word.guess(
                                &super::super::Word::from_str(&stringify!($guess)).unwrap()
                            );
                            pretty_assertions::assert_eq!(
                                guess, $result
                            )
                        }
                    )+
                }
            };
        }

        string_match! {
            press, speed => "ooO..";
            amber, amber => "OOOOO";
            amber, arbor => "O.O.O";
            amber, handy => ".o...";
            addra, opals => "..o..";
            mummy, tummy => ".OOOO";
            vital, audio => "o..o.";
            scene, eager => "o..o.";
            today, level => ".....";
            phone, crown => "..O.o";
            royal, newly => "...oo";
            blind, began => "O...o";
            movie, storm => "..o.o";
            spend, super => "O.oo.";
            still, worth => "...o.";
            build, usage => "o....";
            badly, alive => "oo...";
            split, house => "...o.";
            quite, trust => "o.o..";
            flash, death => "..O.O";
            peter, crime => ".o..o";
            these, smith => "o..oo";
            solve, shoot => "O.o..";
            event, dealt => ".o..O";
            waves, sassy => "oO...";
            orbit, robot => "ooO.O";
        }
    }
}
