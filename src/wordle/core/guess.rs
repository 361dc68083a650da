use std::{
    borrow::Cow,
    ops::{Index, IndexMut},
};

use serde::{Deserialize, Serialize};

use super::{AsEmoji, Word};

/// A submitted word with a verdict for each of its letters.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    letters: Vec<(char, LetterState)>,
}

impl Guess {
    /// Every letter starts out [`LetterState::Absent`] until the evaluator says otherwise.
    pub fn new(word: &Word) -> Self {
        let letters = word
            .iter()
            .map(|ch| (*ch, LetterState::Absent))
            .collect::<Vec<(char, LetterState)>>();

        Self { letters }
    }

    pub fn is_correct(&self) -> bool {
        self.letters
            .iter()
            .all(|(_, state)| *state == LetterState::Correct)
    }

    pub fn is_correct_at(&self, index: usize) -> bool {
        self[index].1 == LetterState::Correct
    }

    pub fn word(&self) -> String {
        self.letters.iter().map(|(letter, _)| letter).collect()
    }

    pub fn states(&self) -> impl Iterator<Item = LetterState> + '_ {
        self.letters.iter().map(|(_, state)| *state)
    }

    pub fn count(&self, state: LetterState) -> usize {
        self.states().filter(|s| *s == state).count()
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(char, LetterState)> + '_ {
        self.letters.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (char, LetterState)> + '_ {
        self.letters.iter_mut()
    }
}

impl AsEmoji for Guess {
    fn as_emoji(&self) -> Cow<str> {
        self.letters
            .iter()
            .map(|(_, state)| state.as_emoji())
            .collect::<String>()
            .into()
    }

    fn emoji_with_letters(&self) -> String {
        let (letters, states) = self.letters.iter().fold(
            (String::new(), String::new()),
            |(letters, states), (letter, state)| {
                (
                    letters + " " + &letter.to_string(),
                    states + &state.as_emoji(),
                )
            },
        );

        letters.trim().to_owned() + "\n" + &states
    }
}

impl AsEmoji for [Guess] {
    fn as_emoji(&self) -> Cow<str> {
        self.iter()
            .map(|g| g.as_emoji())
            .collect::<Vec<_>>()
            .join("\n")
            .into()
    }

    fn emoji_with_letters(&self) -> String {
        self.iter()
            .map(|g| g.emoji_with_letters())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl IntoIterator for Guess {
    type Item = (char, LetterState);
    type IntoIter = std::vec::IntoIter<(char, LetterState)>;

    fn into_iter(self) -> Self::IntoIter {
        self.letters.into_iter()
    }
}

impl Index<usize> for Guess {
    type Output = (char, LetterState);

    fn index(&self, index: usize) -> &Self::Output {
        self.letters.index(index)
    }
}

impl IndexMut<usize> for Guess {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.letters.index_mut(index)
    }
}

impl std::fmt::Display for Guess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (_, state) in &self.letters {
            write!(f, "{state}")?;
        }

        Ok(())
    }
}

impl PartialEq<&str> for Guess {
    fn eq(&self, other: &&str) -> bool {
        &self.to_string() == other
    }
}

/// Verdict for one letter of a guess.
///
/// Ordered by how much it tells the player, so the keyboard can keep the
/// best verdict seen with a plain `max`.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LetterState {
    #[default]
    Absent,
    Present,
    Correct,
}

impl AsEmoji for LetterState {
    fn as_emoji(&self) -> Cow<str> {
        match self {
            Self::Correct => "🟩", // green square
            Self::Present => "🟨", // yellow square
            Self::Absent => "⬛",  // black square
        }
        .into()
    }
}

impl std::fmt::Display for LetterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Correct => "O",
            Self::Present => "o",
            Self::Absent => ".",
        })
    }
}
