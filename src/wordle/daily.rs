use std::{ops::ControlFlow, time::Duration as StdDuration};

use chrono::{Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use tokio::time::MissedTickBehavior;
use tracing::trace;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Decides what "today" is for the purposes of picking a puzzle.
///
/// A developer override replaces the local calendar date everywhere the
/// day boundary matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calendar {
    dev_date: Option<NaiveDate>,
}

impl Calendar {
    pub fn system() -> Self {
        Self::default()
    }

    pub fn with_override(dev_date: Option<NaiveDate>) -> Self {
        Self { dev_date }
    }

    pub fn today(&self) -> NaiveDate {
        self.dev_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn is_overridden(&self) -> bool {
        self.dev_date.is_some()
    }

    pub fn dev_date(&self) -> Option<NaiveDate> {
        self.dev_date
    }
}

/// The instant the puzzle after `now`'s one becomes available.
pub fn next_puzzle_at(now: NaiveDateTime) -> NaiveDateTime {
    now.date()
        .checked_add_days(Days::new(1))
        .unwrap_or(NaiveDate::MAX)
        .and_time(NaiveTime::MIN)
}

/// Time left until a fixed instant.
///
/// Every reading is recomputed from the target, so a late tick never
/// accumulates drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    target: NaiveDateTime,
}

impl Countdown {
    pub fn until(target: NaiveDateTime) -> Self {
        Self { target }
    }

    pub fn to_next_puzzle(now: NaiveDateTime) -> Self {
        Self::until(next_puzzle_at(now))
    }

    pub fn target(&self) -> NaiveDateTime {
        self.target
    }

    pub fn remaining(&self, now: NaiveDateTime) -> chrono::Duration {
        (self.target - now).max(chrono::Duration::zero())
    }

    pub fn is_finished(&self, now: NaiveDateTime) -> bool {
        self.remaining(now).is_zero()
    }

    /// Calls `on_tick` once a second with the time left, until it breaks or
    /// the target passes.
    pub async fn run<F>(self, mut on_tick: F)
    where
        F: FnMut(chrono::Duration) -> ControlFlow<()>,
    {
        let mut interval = tokio::time::interval(StdDuration::from_secs(1));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            let now = Local::now().naive_local();
            let remaining = self.remaining(now);
            trace!(remaining = remaining.num_seconds(), "countdown tick");

            if on_tick(remaining).is_break() || remaining.is_zero() {
                break;
            }
        }
    }
}
