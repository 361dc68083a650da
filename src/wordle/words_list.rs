use std::{fs, path::Path, str::FromStr};

use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use tracing::{debug, instrument};
use tracing_unwrap::ResultExt;

use super::core::{ParseWordError, Word};

/// Press & science themed answers used when no remote list is available.
pub const DEFAULT_WORDS: [&str; 35] = [
    "PRESS", "STORY", "MEDIA", "WRITE", "QUOTE", //
    "ATOMS", "CELLS", "GENES", "VIRUS", "BRAIN", //
    "LASER", "ORBIT", "PROBE", "SOLAR", "LIGHT", //
    "PAPER", "PRINT", "COVER", "ISSUE", "PHOTO", //
    "FACTS", "TRUTH", "PROOF", "STUDY", "TESTS", //
    "FIELD", "TOPIC", "THEME", "DRAFT", "RADIO", //
    "WAVES", "FORCE", "POWER", "SPEED", "SPACE",
];

#[derive(Debug, Error)]
pub enum WordsListError {
    #[error("word list must contain at least one word")]
    Empty,

    #[error("invalid word in list: {0}")]
    Word(#[from] ParseWordError),

    #[error("couldn't read word list: {0}")]
    Io(#[from] std::io::Error),
}

/// The ordered list of answers that daily puzzles are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordsList {
    words: Vec<Word>,
}

impl WordsList {
    pub fn new<I, S>(words: I) -> Result<Self, WordsListError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|word| Word::from_str(word.as_ref()))
            .collect::<Result<Vec<Word>, ParseWordError>>()?;

        if words.is_empty() {
            return Err(WordsListError::Empty);
        }

        Ok(Self { words })
    }

    pub fn builtin() -> Self {
        Self::new(DEFAULT_WORDS).expect_or_log("built-in word list should be valid")
    }

    /// Reads one word per line, skipping blank lines.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WordsListError> {
        let text = fs::read_to_string(path.as_ref())?;
        let list = Self::new(text.lines().filter(|line| !line.trim().is_empty()))?;

        debug!(words = list.len(), "loaded word list");

        Ok(list)
    }

    /// The answer for `date`: the day of the year (January 1st is day 1)
    /// modulo the length of the list.
    pub fn for_date(&self, date: NaiveDate) -> &Word {
        let index = date.ordinal() as usize % self.words.len();
        &self.words[index]
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Word> + '_ {
        self.words.iter()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.words.iter().map(Word::to_string).collect()
    }
}

impl Default for WordsList {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::{WordsList, WordsListError};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn builtin_is_valid() {
        assert_eq!(WordsList::builtin().len(), 35);
    }

    #[test]
    fn empty_list_fails_fast() {
        let result = WordsList::new(Vec::<String>::new());
        assert!(matches!(result, Err(WordsListError::Empty)));
    }

    #[test]
    fn invalid_word_rejected() {
        let result = WordsList::new(["PRESS", "NOPE"]);
        assert!(matches!(result, Err(WordsListError::Word(_))));
    }

    #[test]
    fn day_of_year_indexing() {
        let words = WordsList::builtin();

        // january 1st is day 1
        assert_eq!(words.for_date(date("2025-01-01")).to_string(), "STORY");
        // day 35 wraps back to the start
        assert_eq!(words.for_date(date("2025-02-04")).to_string(), "PRESS");
        // 2024-12-31 is day 366 of a leap year, 366 % 35 == 16
        assert_eq!(words.for_date(date("2024-12-31")).to_string(), "PRINT");
    }

    #[test]
    fn same_date_same_word() {
        let words = WordsList::builtin();
        let day = date("2025-06-15");

        let first = words.for_date(day).clone();
        for _ in 0..10 {
            assert_eq!(words.for_date(day), &first);
        }

        let copy = WordsList::new(words.to_strings()).unwrap();
        assert_eq!(copy.for_date(day), &first);
    }

    #[test]
    fn lower_case_words_are_normalized() {
        let words = WordsList::new(["laser"]).unwrap();
        assert_eq!(words.for_date(date("2025-03-03")).to_string(), "LASER");
    }
}
