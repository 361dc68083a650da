use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use super::{GameSnapshot, GameState, GuessError, Stats, Submission, Word, WordsList};
use crate::storage::{LocalStore, Storage, StorageError};

/// How today's game was set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Start {
    /// Nothing saved for today.
    Fresh,
    /// An unfinished game from earlier today.
    Resumed,
    /// Today was already played; the board is read-only.
    Locked,
}

/// Today's game together with the stats it feeds into.
#[derive(Debug, Clone)]
pub struct Session {
    today: NaiveDate,
    game: GameState,
    stats: Stats,
    start: Start,
}

impl Session {
    /// Decides between a fresh, resumed or locked game.
    ///
    /// A saved snapshot's own target word wins over `word`, so a replaced
    /// target survives a restart.
    pub fn begin(
        today: NaiveDate,
        word: Word,
        stats: Stats,
        last_played: Option<NaiveDate>,
        snapshot: Option<GameSnapshot>,
    ) -> Self {
        let snapshot = snapshot.filter(|snapshot| snapshot.is_from(today));
        let restored = snapshot.as_ref().and_then(|snapshot| {
            let target = snapshot.target().unwrap_or_else(|| word.clone());

            GameState::restore(snapshot, target)
                .inspect_err(|err| warn!(%err, "couldn't restore saved game"))
                .ok()
        });

        let (game, start) = if last_played == Some(today) {
            let mut game = restored
                .unwrap_or_else(|| GameState::finished_without_record(word.clone()));

            if !game.is_over() {
                warn!("today is marked played but the saved game isn't finished");
                game = GameState::finished_without_record(game.target().clone());
            }

            (game, Start::Locked)
        } else {
            match restored {
                Some(game) if !game.is_over() => (game, Start::Resumed),
                Some(game) => {
                    warn!("today's game is finished but today isn't marked played");
                    (game, Start::Locked)
                }
                None => (GameState::new(word), Start::Fresh),
            }
        };

        debug!(?start, %today, "session started");

        Self {
            today,
            game,
            stats,
            start,
        }
    }

    /// Builds today's session from whatever is saved locally.
    #[instrument(skip_all, fields(%today))]
    pub fn load<S: Storage>(store: &LocalStore<S>, words: &WordsList, today: NaiveDate) -> Self {
        Self::begin(
            today,
            words.for_date(today).clone(),
            store.stats(),
            store.last_played(),
            store.snapshot(today),
        )
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn start(&self) -> Start {
        self.start
    }

    pub fn is_locked(&self) -> bool {
        self.start == Start::Locked
    }

    pub fn type_letter(&mut self, letter: char) -> bool {
        !self.is_locked() && self.game.type_letter(letter)
    }

    pub fn delete_letter(&mut self) -> bool {
        !self.is_locked() && self.game.delete_letter()
    }

    /// Submits the pending guess; a finished game is counted in the stats.
    pub fn submit(&mut self) -> Result<Submission, GuessError> {
        if self.is_locked() {
            return Err(GuessError::AlreadyPlayed);
        }

        let submission = self.game.submit()?;

        match &submission {
            Submission::Won(_) => {
                self.stats.record_win(self.game.current_row());
                info!(attempts = self.game.current_row() + 1, "puzzle solved");
            }
            Submission::Lost(_) => {
                self.stats.record_loss();
                info!(answer = %self.game.target(), "puzzle failed");
            }
            Submission::Continue(_) => (),
        }

        Ok(submission)
    }

    /// Swaps the answer for today's game, replaying any guesses against it.
    pub fn set_word(&mut self, word: Word) -> Result<(), super::ParseWordError> {
        let mut snapshot = self.snapshot();
        snapshot.target_word = Some(word.to_string());

        self.game = GameState::restore(&snapshot, word)?;
        Ok(())
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.game.snapshot(self.today)
    }

    /// Writes the board, and once the game is over, the stats and the
    /// last-played date.
    pub fn save<S: Storage>(&self, store: &mut LocalStore<S>) -> Result<(), StorageError> {
        store.set_snapshot(&self.snapshot())?;

        if self.game.is_over() && !self.is_locked() {
            store.set_stats(&self.stats)?;
            store.set_last_played(self.today)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, Start};
    use crate::{
        storage::{LocalStore, MemoryStorage},
        wordle::{GameSnapshot, GuessError, Stats, Submission, Word, WordsList},
    };
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 4).unwrap()
    }

    fn word(s: &str) -> Word {
        Word::from_str(s).unwrap()
    }

    fn enter(session: &mut Session, guess: &str) -> Result<Submission, GuessError> {
        for letter in guess.chars() {
            session.type_letter(letter);
        }
        session.submit()
    }

    fn finished_snapshot() -> GameSnapshot {
        GameSnapshot {
            current_row: 0,
            guesses: vec!["PRESS".to_owned()],
            game_over: true,
            is_win: true,
            target_word: Some("PRESS".to_owned()),
            date: Some("2025-02-04".to_owned()),
        }
    }

    #[test]
    fn fresh_when_nothing_saved() {
        let session = Session::begin(today(), word("PRESS"), Stats::default(), None, None);

        assert_eq!(session.start(), Start::Fresh);
        assert_eq!(session.game().target(), &word("PRESS"));
    }

    #[test]
    fn played_today_is_locked() {
        let mut session = Session::begin(
            today(),
            word("PRESS"),
            Stats::default(),
            Some(today()),
            Some(finished_snapshot()),
        );

        assert_eq!(session.start(), Start::Locked);
        assert!(session.game().is_win());
        assert!(!session.type_letter('A'));
        assert_eq!(session.submit(), Err(GuessError::AlreadyPlayed));
    }

    #[test]
    fn played_today_without_board_is_locked() {
        let mut session =
            Session::begin(today(), word("PRESS"), Stats::default(), Some(today()), None);

        assert!(session.is_locked());
        assert!(session.game().is_over());
        assert_eq!(enter(&mut session, "PRESS"), Err(GuessError::AlreadyPlayed));
    }

    #[test]
    fn unfinished_game_resumes() {
        let snapshot = GameSnapshot {
            current_row: 1,
            guesses: vec!["WAVES".to_owned()],
            target_word: Some("PRESS".to_owned()),
            date: Some("2025-02-04".to_owned()),
            ..Default::default()
        };

        let mut session =
            Session::begin(today(), word("PRESS"), Stats::default(), None, Some(snapshot));

        assert_eq!(session.start(), Start::Resumed);
        assert_eq!(session.game().current_row(), 1);

        assert!(matches!(enter(&mut session, "PRESS"), Ok(Submission::Won(_))));
        assert_eq!(session.stats().guess_distribution, [0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn finished_board_from_today_locks_without_date() {
        let mut session = Session::begin(
            today(),
            word("PRESS"),
            Stats::default(),
            Some(NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()),
            Some(finished_snapshot()),
        );

        assert_eq!(session.start(), Start::Locked);
        assert!(session.game().is_win());
        assert_eq!(enter(&mut session, "PRESS"), Err(GuessError::AlreadyPlayed));
        assert_eq!(session.stats().games_played, 0);
    }

    #[test]
    fn yesterdays_game_is_not_resumed() {
        let snapshot = GameSnapshot {
            date: Some("2025-02-03".to_owned()),
            ..finished_snapshot()
        };

        let session = Session::begin(
            today(),
            word("PRESS"),
            Stats::default(),
            Some(NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()),
            Some(snapshot),
        );

        assert_eq!(session.start(), Start::Fresh);
        assert!(session.game().guesses().is_empty());
    }

    #[test]
    fn finishing_saves_stats_and_date() {
        let mut store = LocalStore::new(MemoryStorage::new());
        let words = WordsList::builtin();

        // 2025-02-04 is day 35, which wraps to PRESS
        let mut session = Session::load(&store, &words, today());
        assert_eq!(session.game().target(), &word("PRESS"));

        enter(&mut session, "SPEED").unwrap();
        session.save(&mut store).unwrap();
        assert_eq!(store.last_played(), None);

        enter(&mut session, "PRESS").unwrap();
        session.save(&mut store).unwrap();

        assert_eq!(store.last_played(), Some(today()));
        assert_eq!(store.stats().games_won, 1);
        assert_eq!(store.stats().guess_distribution[1], 1);

        let reloaded = Session::load(&store, &words, today());
        assert!(reloaded.is_locked());
        assert_eq!(reloaded.game().guesses().len(), 2);
    }

    #[test]
    fn loss_resets_streak() {
        let stats = Stats {
            games_played: 3,
            games_won: 3,
            current_streak: 3,
            max_streak: 3,
            guess_distribution: [0, 3, 0, 0, 0, 0],
        };
        let mut session = Session::begin(today(), word("PRESS"), stats, None, None);

        for _ in 0..6 {
            enter(&mut session, "WAVES").unwrap();
        }

        assert_eq!(session.stats().games_played, 4);
        assert_eq!(session.stats().current_streak, 0);
        assert_eq!(session.stats().max_streak, 3);
    }

    #[test]
    fn replaced_word_survives_reload() {
        let mut store = LocalStore::new(MemoryStorage::new());
        let words = WordsList::builtin();

        let mut session = Session::load(&store, &words, today());
        enter(&mut session, "WAVES").unwrap();
        session.set_word(word("WAVES")).unwrap();
        session.save(&mut store).unwrap();

        let reloaded = Session::load(&store, &words, today());
        assert_eq!(reloaded.game().target(), &word("WAVES"));
        assert!(reloaded.game().is_win());
    }
}
