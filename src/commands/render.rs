//! Terminal drawing of the board, keyboard and stats.

use colored::{ColoredString, Colorize};

use crate::wordle::{
    GameState, Guess, Keyboard, LetterState, Settings, Stats, MAX_ATTEMPTS, WORD_LENGTH,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Palette {
    dark_mode: bool,
    color_blind: bool,
}

impl Palette {
    pub fn new(settings: &Settings) -> Self {
        Self {
            dark_mode: settings.dark_mode,
            color_blind: settings.color_blind,
        }
    }

    fn paint(&self, text: &str, state: Option<LetterState>) -> ColoredString {
        match (state, self.color_blind) {
            (Some(LetterState::Correct), false) => text.bold().black().on_green(),
            (Some(LetterState::Correct), true) => text.bold().black().on_truecolor(245, 121, 58),
            (Some(LetterState::Present), false) => text.bold().black().on_yellow(),
            (Some(LetterState::Present), true) => text.bold().black().on_truecolor(133, 192, 249),
            (Some(LetterState::Absent), _) => text.bold().white().on_bright_black(),
            (None, _) if self.dark_mode => text.white(),
            (None, _) => text.black(),
        }
    }

    fn tile(&self, letter: char, state: Option<LetterState>) -> String {
        self.paint(&format!(" {letter} "), state).to_string()
    }

    fn guess_row(&self, guess: &Guess) -> String {
        guess
            .iter()
            .map(|(letter, state)| self.tile(*letter, Some(*state)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn pending_row(&self, pending: &str) -> String {
        pending
            .chars()
            .chain(std::iter::repeat('_'))
            .take(WORD_LENGTH)
            .map(|letter| self.tile(letter, None))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Six rows: the guesses so far, the pending guess, then blanks.
    pub fn board(&self, game: &GameState) -> String {
        let mut rows: Vec<String> = game
            .guesses()
            .iter()
            .map(|guess| self.guess_row(guess))
            .collect();

        if !game.is_over() && rows.len() < MAX_ATTEMPTS {
            rows.push(self.pending_row(game.current_guess()));
        }

        while rows.len() < MAX_ATTEMPTS {
            rows.push(self.pending_row(""));
        }

        rows.join("\n")
    }

    pub fn keyboard(&self, keyboard: &Keyboard) -> String {
        keyboard
            .rows()
            .enumerate()
            .map(|(indent, row)| {
                let keys: Vec<String> = row
                    .into_iter()
                    .map(|(key, state)| self.paint(&key.to_string(), state).to_string())
                    .collect();

                format!("{}{}", " ".repeat(indent), keys.join(" "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One line per attempt count, bars scaled to the most common one.
/// `highlight` marks the row today's win landed on.
pub fn distribution(stats: &Stats, highlight: Option<usize>) -> Vec<String> {
    const WIDTH: u32 = 20;

    let most = stats
        .guess_distribution
        .iter()
        .copied()
        .max()
        .unwrap_or(0)
        .max(1);

    stats
        .guess_distribution
        .iter()
        .enumerate()
        .map(|(row, &count)| {
            let bar = "#".repeat(((count * WIDTH).div_ceil(most)).max(1) as usize);
            let line = format!("{} {bar} {count}", row + 1);

            if highlight == Some(row) {
                line.green().to_string()
            } else {
                line
            }
        })
        .collect()
}

pub fn summary(stats: &Stats) -> String {
    format!(
        "Played {}  Win % {}  Current Streak {}  Max Streak {}",
        stats.games_played,
        stats.win_percentage(),
        stats.current_streak,
        stats.max_streak
    )
}
