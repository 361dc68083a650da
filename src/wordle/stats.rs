use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MAX_ATTEMPTS;

/// Lifetime results for one player.
///
/// Deserializing never fails on bad field values: anything that isn't a
/// non-negative number (or a string holding one) reads as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawStats")]
pub struct Stats {
    pub games_played: u32,
    pub games_won: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub guess_distribution: [u32; MAX_ATTEMPTS],
}

impl Stats {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// `attempt` is the zero-based row the word was found on.
    pub fn record_win(&mut self, attempt: usize) {
        self.games_played += 1;
        self.games_won += 1;
        self.current_streak += 1;
        self.max_streak = self.max_streak.max(self.current_streak);

        if let Some(slot) = self.guess_distribution.get_mut(attempt) {
            *slot += 1;
        }
    }

    pub fn record_loss(&mut self) {
        self.games_played += 1;
        self.current_streak = 0;
    }

    /// Field-wise maximum of two independently kept records.
    pub fn merge(&self, other: &Self) -> Self {
        let mut guess_distribution = self.guess_distribution;
        for (mine, theirs) in guess_distribution.iter_mut().zip(other.guess_distribution) {
            *mine = (*mine).max(theirs);
        }

        Self {
            games_played: self.games_played.max(other.games_played),
            games_won: self.games_won.max(other.games_won),
            current_streak: self.current_streak.max(other.current_streak),
            max_streak: self.max_streak.max(other.max_streak),
            guess_distribution,
        }
    }

    /// Rounded to the nearest whole percent.
    pub fn win_percentage(&self) -> u32 {
        if self.games_played == 0 {
            return 0;
        }

        ((f64::from(self.games_won) / f64::from(self.games_played)) * 100.0).round() as u32
    }

    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.games_won) / f64::from(self.games_played)
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawStats {
    games_played: Value,
    games_won: Value,
    current_streak: Value,
    max_streak: Value,
    guess_distribution: Value,
}

impl From<RawStats> for Stats {
    fn from(raw: RawStats) -> Self {
        let mut guess_distribution = [0; MAX_ATTEMPTS];
        if let Value::Array(values) = &raw.guess_distribution {
            for (slot, value) in guess_distribution.iter_mut().zip(values) {
                *slot = coerce(value);
            }
        }

        Self {
            games_played: coerce(&raw.games_played),
            games_won: coerce(&raw.games_won),
            current_streak: coerce(&raw.current_streak),
            max_streak: coerce(&raw.max_streak),
            guess_distribution,
        }
    }
}

fn coerce(value: &Value) -> u32 {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() && n > 0.0 => n.trunc().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::Stats;
    use pretty_assertions::assert_eq;

    fn stats(
        games_played: u32,
        games_won: u32,
        current_streak: u32,
        max_streak: u32,
        guess_distribution: [u32; 6],
    ) -> Stats {
        Stats {
            games_played,
            games_won,
            current_streak,
            max_streak,
            guess_distribution,
        }
    }

    fn samples() -> Vec<Stats> {
        vec![
            Stats::default(),
            stats(5, 3, 0, 3, [0, 1, 1, 1, 0, 0]),
            stats(7, 4, 2, 4, [0, 0, 2, 1, 1, 0]),
            stats(40, 38, 12, 20, [1, 5, 10, 12, 8, 2]),
            stats(1, 0, 0, 0, [0; 6]),
        ]
    }

    #[test]
    fn merge_example() {
        let local = stats(5, 3, 0, 3, [0, 1, 1, 1, 0, 0]);
        let remote = stats(7, 4, 2, 4, [0, 0, 2, 1, 1, 0]);

        assert_eq!(local.merge(&remote), stats(7, 4, 2, 4, [0, 1, 2, 1, 1, 0]));
    }

    #[test]
    fn merge_is_idempotent() {
        for a in samples() {
            assert_eq!(a.merge(&a), a);
        }
    }

    #[test]
    fn merge_is_commutative_and_monotonic() {
        for a in samples() {
            for b in samples() {
                let merged = a.merge(&b);
                assert_eq!(merged, b.merge(&a));

                for source in [a, b] {
                    assert!(merged.games_played >= source.games_played);
                    assert!(merged.games_won >= source.games_won);
                    assert!(merged.current_streak >= source.current_streak);
                    assert!(merged.max_streak >= source.max_streak);
                    for i in 0..6 {
                        assert!(merged.guess_distribution[i] >= source.guess_distribution[i]);
                    }
                }

                assert!(merged.games_won <= merged.games_played);
                assert!(merged.current_streak <= merged.max_streak);
            }
        }
    }

    #[test]
    fn win_and_loss_update_streaks() {
        let mut stats = Stats::default();

        stats.record_win(2);
        stats.record_win(0);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.max_streak, 2);
        assert_eq!(stats.guess_distribution, [1, 0, 1, 0, 0, 0]);

        stats.record_loss();
        assert_eq!(stats.games_played, 3);
        assert_eq!(stats.games_won, 2);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.max_streak, 2);
        assert_eq!(stats.win_percentage(), 67);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(stats(1, 1, 1, 1, [1, 0, 0, 0, 0, 0])).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "gamesPlayed": 1,
                "gamesWon": 1,
                "currentStreak": 1,
                "maxStreak": 1,
                "guessDistribution": [1, 0, 0, 0, 0, 0],
            })
        );
    }

    #[test]
    fn lenient_parsing() {
        let parsed = Stats::from_json(
            r#"{
                "gamesPlayed": "12",
                "gamesWon": null,
                "currentStreak": "lots",
                "maxStreak": 4.9,
                "guessDistribution": [1, "2", false, -3]
            }"#,
        )
        .unwrap();

        assert_eq!(parsed, stats(12, 0, 0, 4, [1, 2, 0, 0, 0, 0]));
    }

    #[test]
    fn missing_fields_default_to_zero() {
        assert_eq!(Stats::from_json("{}").unwrap(), Stats::default());
        assert_eq!(
            Stats::from_json(r#"{"gamesPlayed": 3, "guessDistribution": "nope"}"#).unwrap(),
            stats(3, 0, 0, 0, [0; 6])
        );
    }

    #[test]
    fn long_distribution_is_truncated() {
        let parsed =
            Stats::from_json(r#"{"guessDistribution": [1, 1, 1, 1, 1, 1, 9, 9]}"#).unwrap();
        assert_eq!(parsed.guess_distribution, [1; 6]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Stats::from_json("{not json").is_err());
        assert!(Stats::from_json("42").is_err());
    }
}
